use yew::prelude::*;
use yew_router::prelude::*;

use crate::hooks::use_app;
use crate::router::Route;

#[function_component(Header)]
pub fn header() -> Html {
    let app = use_app();
    let navigator = use_navigator();

    let sign_out = Callback::from(move |_: MouseEvent| {
        let auth = app.auth.clone();
        let navigator = navigator.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = auth.sign_out().await {
                tracing::error!("Failed to sign out: {}", e);
            }
            if let Some(navigator) = navigator {
                navigator.push(&Route::Home);
            }
        });
    });

    html! {
        <header class="header">
            <div class="container">
                <h1>{ "App Portal" }</h1>
                <nav>
                    <Link<Route> to={Route::Home}>{ "Home" }</Link<Route>>
                    { " | " }
                    <Link<Route> to={Route::Apps}>{ "Apps" }</Link<Route>>
                    { " | " }
                    <Link<Route> to={Route::Leaderboard}>{ "Leaderboard" }</Link<Route>>
                    { " | " }
                    <Link<Route> to={Route::Posts}>{ "Posts" }</Link<Route>>
                    { " | " }
                    <Link<Route> to={Route::Users}>{ "Users" }</Link<Route>>
                    { " | " }
                    <Link<Route> to={Route::Upload}>{ "Upload" }</Link<Route>>
                    { " | " }
                    <Link<Route> to={Route::Profile}>{ "Profile" }</Link<Route>>
                    { " | " }
                    <Link<Route> to={Route::Admin}>{ "Admin" }</Link<Route>>
                    { " | " }
                    <Link<Route> to={Route::Login}>{ "Login" }</Link<Route>>
                    { " | " }
                    <button class="btn btn-link" onclick={sign_out}>{ "Sign out" }</button>
                </nav>
            </div>
        </header>
    }
}
