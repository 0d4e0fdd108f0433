use yew::prelude::*;
use yew_router::prelude::*;

use crate::router::Route;

#[function_component(Home)]
pub fn home() -> Html {
    html! {
        <div class="container">
            <h2>{ "Welcome" }</h2>
            <p>{ "Browse community apps, see who tops the leaderboard, or share your own." }</p>
            <div class="actions">
                <Link<Route> to={Route::Apps}>
                    <button class="btn btn-primary">{ "Browse apps" }</button>
                </Link<Route>>
                <Link<Route> to={Route::Upload}>
                    <button class="btn">{ "Upload an app" }</button>
                </Link<Route>>
            </div>
        </div>
    }
}
