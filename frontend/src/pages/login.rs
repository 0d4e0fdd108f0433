use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::hooks::use_app;
use crate::router::Route;

#[function_component(Login)]
pub fn login() -> Html {
    let app = use_app();
    let navigator = use_navigator();
    let email = use_node_ref();
    let password = use_node_ref();
    let error = use_state(|| None::<String>);
    let submitting = use_state(|| false);

    let onsubmit = {
        let email = email.clone();
        let password = password.clone();
        let error = error.clone();
        let submitting = submitting.clone();

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
            let submitting = submitting.clone();
            submitting.set(true);

            wasm_bindgen_futures::spawn_local(async move {
                match auth.sign_in_with_password(&email, &password).await {
                    Ok(_) => {
                        error.set(None);
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::Home);
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to sign in: {}", e);
                        error.set(Some(e.to_string()));
                    }
                }
                submitting.set(false);
            });
        })
    };

    html! {
        <div class="container">
            <h2>{ "Sign in" }</h2>
            <form class="auth-form" {onsubmit}>
                <input ref={email} type="email" placeholder="Email" required=true />
                <input ref={password} type="password" placeholder="Password" required=true />
                <button class="btn btn-primary" type="submit" disabled={*submitting}>
                    { if *submitting { "Signing in..." } else { "Sign in" } }
                </button>
            </form>
            if let Some(message) = &*error {
                <div class="error">{ message }</div>
            }
            <p>
                { "No account yet? " }
                <Link<Route> to={Route::Register}>{ "Register" }</Link<Route>>
            </p>
        </div>
    }
}
