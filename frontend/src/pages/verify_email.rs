use yew::prelude::*;
use yew_router::prelude::*;

use crate::router::Route;

#[function_component(VerifyEmail)]
pub fn verify_email() -> Html {
    html! {
        <div class="container">
            <h2>{ "Check your inbox" }</h2>
            <p>{ "We sent you a confirmation link. Follow it, then sign in." }</p>
            <Link<Route> to={Route::Login}>
                <button class="btn btn-primary">{ "Go to login" }</button>
            </Link<Route>>
        </div>
    }
}
