use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::hooks::use_app;
use crate::router::Route;
use crate::services::supabase::SignUpOutcome;

#[function_component(Register)]
pub fn register() -> Html {
    let app = use_app();
    let navigator = use_navigator();
    let email = use_node_ref();
    let password = use_node_ref();
    let error = use_state(|| None::<String>);

    let onsubmit = {
        let email = email.clone();
        let password = password.clone();
        let error = error.clone();

        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let (Some(email), Some(password)) = (
                email.cast::<HtmlInputElement>(),
                password.cast::<HtmlInputElement>(),
            ) else {
                return;
            };
            let (email, password) = (email.value(), password.value());

            let auth = app.auth.clone();
            let navigator = navigator.clone();
            let error = error.clone();

            wasm_bindgen_futures::spawn_local(async move {
                let next = match auth.sign_up(&email, &password).await {
                    Ok(SignUpOutcome::SignedIn(_)) => Route::Home,
                    Ok(SignUpOutcome::ConfirmationRequired { .. }) => Route::VerifyEmail,
                    Err(e) => {
                        tracing::error!("Failed to register: {}", e);
                        error.set(Some(e.to_string()));
                        return;
                    }
                };
                if let Some(navigator) = navigator {
                    navigator.push(&next);
                }
            });
        })
    };

    html! {
        <div class="container">
            <h2>{ "Create an account" }</h2>
            <form class="auth-form" {onsubmit}>
                <input ref={email} type="email" placeholder="Email" required=true />
                <input ref={password} type="password" placeholder="Password" required=true minlength="6" />
                <button class="btn btn-primary" type="submit">{ "Register" }</button>
            </form>
            if let Some(message) = &*error {
                <div class="error">{ message }</div>
            }
        </div>
    }
}
