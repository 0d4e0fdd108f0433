use shared::session::SessionUser;
use yew::prelude::*;

use crate::hooks::use_app;

#[function_component(Profile)]
pub fn profile() -> Html {
    let app = use_app();
    let user = use_state(|| None::<SessionUser>);

    {
        let user = user.clone();
        let auth = app.auth.clone();
        use_effect_with((), move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                match auth.user().await {
                    Ok(current) => user.set(current),
                    Err(e) => tracing::error!("Failed to load profile: {}", e),
                }
            });
            || ()
        });
    }

    html! {
        <div class="container">
            <h2>{ "Profile" }</h2>
            if let Some(user) = &*user {
                <dl class="profile">
                    <dt>{ "Email" }</dt>
                    <dd>{ user.email.clone().unwrap_or_else(|| "-".to_string()) }</dd>
                    <dt>{ "User ID" }</dt>
                    <dd>{ user.id.to_string() }</dd>
                    <dt>{ "Email confirmed" }</dt>
                    <dd>{ if user.email_confirmed_at.is_some() { "yes" } else { "no" } }</dd>
                </dl>
            } else {
                <div class="loading">
                    <div class="spinner"></div>
                </div>
            }
        </div>
    }
}
