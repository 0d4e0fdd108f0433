//! REST endpoint catalogue for the JSONPlaceholder data API.
//!
//! Every call the frontend makes is described here as an [`Endpoint`]:
//! an HTTP method and a path relative to the API base URL. The transport
//! lives in the frontend; this module only decides *where* requests go.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{
    Album, AlbumPatch, Comment, CommentPatch, NewAlbum, NewComment, NewPhoto, NewPost, NewTodo,
    NewUser, Photo, PhotoPatch, Post, PostPatch, ResourceId, Todo, TodoPatch, User, UserPatch,
};

pub const DEFAULT_API_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// A collection exposed by the data API.
///
/// # Type Parameters
/// - `Input`: full body for create (`POST`) and replace (`PUT`)
/// - `Patch`: partial body for update (`PATCH`)
pub trait Resource: DeserializeOwned + Clone + 'static {
    /// Collection path segment, e.g. `posts`.
    const COLLECTION: &'static str;

    type Input: Serialize + Validate;

    type Patch: Serialize;
}

/// Marker for collections reachable under a parent record,
/// e.g. `/users/{id}/posts`.
pub trait Nested<Parent: Resource>: Resource {}

impl Resource for Post {
    const COLLECTION: &'static str = "posts";
    type Input = NewPost;
    type Patch = PostPatch;
}

impl Resource for Comment {
    const COLLECTION: &'static str = "comments";
    type Input = NewComment;
    type Patch = CommentPatch;
}

impl Resource for User {
    const COLLECTION: &'static str = "users";
    type Input = NewUser;
    type Patch = UserPatch;
}

impl Resource for Todo {
    const COLLECTION: &'static str = "todos";
    type Input = NewTodo;
    type Patch = TodoPatch;
}

impl Resource for Album {
    const COLLECTION: &'static str = "albums";
    type Input = NewAlbum;
    type Patch = AlbumPatch;
}

impl Resource for Photo {
    const COLLECTION: &'static str = "photos";
    type Input = NewPhoto;
    type Patch = PhotoPatch;
}

impl Nested<User> for Post {}
impl Nested<User> for Todo {}
impl Nested<User> for Album {}
impl Nested<Post> for Comment {}
impl Nested<Album> for Photo {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method: Method,
    pub path: String,
}

impl Endpoint {
    fn new(method: Method, path: String) -> Self {
        Self { method, path }
    }

    pub fn list<R: Resource>() -> Self {
        Self::new(Method::Get, format!("/{}", R::COLLECTION))
    }

    pub fn get<R: Resource>(id: ResourceId) -> Self {
        Self::new(Method::Get, format!("/{}/{}", R::COLLECTION, id))
    }

    pub fn create<R: Resource>() -> Self {
        Self::new(Method::Post, format!("/{}", R::COLLECTION))
    }

    pub fn replace<R: Resource>(id: ResourceId) -> Self {
        Self::new(Method::Put, format!("/{}/{}", R::COLLECTION, id))
    }

    pub fn update<R: Resource>(id: ResourceId) -> Self {
        Self::new(Method::Patch, format!("/{}/{}", R::COLLECTION, id))
    }

    pub fn delete<R: Resource>(id: ResourceId) -> Self {
        Self::new(Method::Delete, format!("/{}/{}", R::COLLECTION, id))
    }

    /// Records of `C` that belong to one `P`, e.g. a user's posts.
    pub fn children<P: Resource, C: Nested<P>>(parent_id: ResourceId) -> Self {
        Self::new(
            Method::Get,
            format!("/{}/{}/{}", P::COLLECTION, parent_id, C::COLLECTION),
        )
    }

    /// Absolute URL of this endpoint under `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}
