use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::api::{Endpoint, Method, Nested, Resource};
use shared::models::{Album, Comment, Photo, Post, ResourceId, Todo, User};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Network(#[from] gloo_net::Error),

    #[error("HTTP error: {status} {status_text}")]
    Status { status: u16, status_text: String },

    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationErrors),
}

/// Client for the JSONPlaceholder data API.
///
/// Each call is one HTTP request; failures are returned to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiService {
    base_url: String,
}

impl ApiService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub async fn list<R: Resource>(&self) -> Result<Vec<R>, ApiError> {
        self.fetch(Endpoint::list::<R>()).await
    }

    pub async fn get<R: Resource>(&self, id: ResourceId) -> Result<R, ApiError> {
        self.fetch(Endpoint::get::<R>(id)).await
    }

    pub async fn create<R: Resource>(&self, input: &R::Input) -> Result<R, ApiError> {
        input.validate()?;
        self.send(Endpoint::create::<R>(), input).await
    }

    /// Full replacement (`PUT`).
    pub async fn replace<R: Resource>(&self, id: ResourceId, input: &R::Input) -> Result<R, ApiError> {
        input.validate()?;
        self.send(Endpoint::replace::<R>(id), input).await
    }

    /// Partial update (`PATCH`).
    pub async fn update<R: Resource>(&self, id: ResourceId, patch: &R::Patch) -> Result<R, ApiError> {
        self.send(Endpoint::update::<R>(id), patch).await
    }

    pub async fn delete<R: Resource>(&self, id: ResourceId) -> Result<(), ApiError> {
        let endpoint = Endpoint::delete::<R>(id);
        let response = self.request(&endpoint).send().await?;
        Self::check(&endpoint, &response)
    }

    pub async fn children<P: Resource, C: Nested<P>>(&self, parent_id: ResourceId) -> Result<Vec<C>, ApiError> {
        self.fetch(Endpoint::children::<P, C>(parent_id)).await
    }

    pub async fn user_posts(&self, user_id: ResourceId) -> Result<Vec<Post>, ApiError> {
        self.children::<User, Post>(user_id).await
    }

    pub async fn user_todos(&self, user_id: ResourceId) -> Result<Vec<Todo>, ApiError> {
        self.children::<User, Todo>(user_id).await
    }

    pub async fn user_albums(&self, user_id: ResourceId) -> Result<Vec<Album>, ApiError> {
        self.children::<User, Album>(user_id).await
    }

    pub async fn post_comments(&self, post_id: ResourceId) -> Result<Vec<Comment>, ApiError> {
        self.children::<Post, Comment>(post_id).await
    }

    pub async fn album_photos(&self, album_id: ResourceId) -> Result<Vec<Photo>, ApiError> {
        self.children::<Album, Photo>(album_id).await
    }

    fn request(&self, endpoint: &Endpoint) -> RequestBuilder {
        let url = endpoint.url(&self.base_url);
        let builder = match endpoint.method {
            Method::Get => Request::get(&url),
            Method::Post => Request::post(&url),
            Method::Put => Request::put(&url),
            Method::Patch => Request::patch(&url),
            Method::Delete => Request::delete(&url),
        };
        builder.header("Content-Type", "application/json")
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, ApiError> {
        tracing::debug!(%endpoint, "api request");
        let response = self.request(&endpoint).send().await?;
        Self::check(&endpoint, &response)?;
        Ok(response.json().await?)
    }

    async fn send<B, T>(&self, endpoint: Endpoint, body: &B) -> Result<T, ApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        tracing::debug!(%endpoint, "api request with body");
        let response = self.request(&endpoint).json(body)?.send().await?;
        Self::check(&endpoint, &response)?;
        Ok(response.json().await?)
    }

    fn check(endpoint: &Endpoint, response: &Response) -> Result<(), ApiError> {
        if response.ok() {
            return Ok(());
        }
        tracing::error!(%endpoint, status = response.status(), "api request failed");
        Err(ApiError::Status {
            status: response.status(),
            status_text: response.status_text(),
        })
    }
}
