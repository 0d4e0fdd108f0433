use yew::prelude::*;
use yew_router::prelude::*;

use crate::pages::{
    admin::Admin, app_detail::AppDetail, apps::Apps, home::Home, leaderboard::Leaderboard,
    login::Login, not_found::NotFound, post_detail::PostDetail, posts::Posts, profile::Profile,
    register::Register, upload::Upload, user_albums::UserAlbums, user_posts::UserPosts,
    user_todos::UserTodos, users::Users, verify_email::VerifyEmail,
};

/// Views by path. Which of them need a session is decided by the
/// guard's route table, not here.
#[derive(Clone, Routable, PartialEq, Debug)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/apps")]
    Apps,
    #[at("/apps/:id")]
    AppDetail { id: String },
    #[at("/upload")]
    Upload,
    #[at("/leaderboard")]
    Leaderboard,
    #[at("/login")]
    Login,
    #[at("/register")]
    Register,
    #[at("/verify-email")]
    VerifyEmail,
    #[at("/admin")]
    Admin,
    #[at("/profile")]
    Profile,
    #[at("/posts")]
    Posts,
    #[at("/posts/:id")]
    PostDetail { id: u32 },
    #[at("/users")]
    Users,
    #[at("/users/:user_id/posts")]
    UserPosts { user_id: u32 },
    #[at("/users/:user_id/todos")]
    UserTodos { user_id: u32 },
    #[at("/users/:user_id/albums")]
    UserAlbums { user_id: u32 },
    #[not_found]
    #[at("/404")]
    NotFound,
}

pub fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => html! { <Home /> },
        Route::Apps => html! { <Apps /> },
        Route::AppDetail { id } => html! { <AppDetail {id} /> },
        Route::Upload => html! { <Upload /> },
        Route::Leaderboard => html! { <Leaderboard /> },
        Route::Login => html! { <Login /> },
        Route::Register => html! { <Register /> },
        Route::VerifyEmail => html! { <VerifyEmail /> },
        Route::Admin => html! { <Admin /> },
        Route::Profile => html! { <Profile /> },
        Route::Posts => html! { <Posts /> },
        Route::PostDetail { id } => html! { <PostDetail {id} /> },
        Route::Users => html! { <Users /> },
        Route::UserPosts { user_id } => html! { <UserPosts {user_id} /> },
        Route::UserTodos { user_id } => html! { <UserTodos {user_id} /> },
        Route::UserAlbums { user_id } => html! { <UserAlbums {user_id} /> },
        Route::NotFound => html! { <NotFound /> },
    }
}
