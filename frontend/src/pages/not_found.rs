use yew::prelude::*;
use yew_router::prelude::*;

use crate::router::Route;

#[function_component(NotFound)]
pub fn not_found() -> Html {
    let path = use_location()
        .map(|location| location.path().to_string())
        .unwrap_or_default();

    html! {
        <div class="container">
            <div class="empty-state">
                <h2>{ "Nothing here" }</h2>
                <p>{ format!("No page lives at {path}.") }</p>
                <div class="actions">
                    <Link<Route> to={Route::Home}>{ "Home" }</Link<Route>>
                    <Link<Route> to={Route::Posts}>{ "Posts" }</Link<Route>>
                    <Link<Route> to={Route::Users}>{ "Users" }</Link<Route>>
                </div>
            </div>
        </div>
    }
}
