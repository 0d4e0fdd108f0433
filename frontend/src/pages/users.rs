use shared::models::User;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::hooks::{use_app, use_fetch};
use crate::router::Route;

#[function_component(Users)]
pub fn users() -> Html {
    let app = use_app();
    let users = {
        let api = app.api.clone();
        use_fetch((), move |_| async move { api.list::<User>().await })
    };

    html! {
        <div class="container">
            <h2>{ "Users" }</h2>
            { users.view(|users| html! {
                <ul class="user-list">
                    { for users.iter().map(user_item) }
                </ul>
            }) }
        </div>
    }
}

fn user_item(user: &User) -> Html {
    let id = user.id;
    html! {
        <li key={id} class="user-item">
            <div class="user-name">{ &user.name }</div>
            <div class="user-meta">{ format!("@{} · {}", user.username, user.email) }</div>
            if let Some(company) = &user.company {
                <div class="user-company">{ &company.name }</div>
            }
            <nav class="user-links">
                <Link<Route> to={Route::UserPosts { user_id: id }}>{ "Posts" }</Link<Route>>
                <Link<Route> to={Route::UserTodos { user_id: id }}>{ "Todos" }</Link<Route>>
                <Link<Route> to={Route::UserAlbums { user_id: id }}>{ "Albums" }</Link<Route>>
            </nav>
        </li>
    }
}
