//! Navigation guard mounted in the component tree.
//!
//! Every location change is evaluated by the shared [`NavigationGuard`]
//! before the routed view renders. A redirect replaces the current history
//! entry, so the protected path never lands in the back stack. Decisions
//! for a location the user has already left are dropped.
//!
//! [`NavigationGuard`]: shared::guard::NavigationGuard

use shared::guard::{NavigationTracker, Settlement};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::hooks::use_app;
use crate::router::Route;

#[derive(Properties, PartialEq)]
pub struct AuthGateProps {
    pub children: Html,
}

#[function_component(AuthGate)]
pub fn auth_gate(props: &AuthGateProps) -> Html {
    let app = use_app();
    let location = use_location();
    let navigator = use_navigator();
    let tracker = use_mut_ref(NavigationTracker::new);
    let rerender = use_force_update();

    let path = location
        .map(|location| location.path().to_string())
        .unwrap_or_else(|| "/".to_string());

    {
        let tracker = tracker.clone();
        use_effect_with(path.clone(), move |path| {
            let ticket = tracker.borrow_mut().begin(path.clone());
            let guard = app.guard.clone();

            wasm_bindgen_futures::spawn_local(async move {
                let decision = guard.evaluate(&ticket.attempt).await;
                let settlement = tracker.borrow_mut().settle(&ticket, decision);
                match settlement {
                    Settlement::Show => rerender.force_update(),
                    Settlement::Replace { to, reason } => {
                        tracing::info!(from = %ticket.attempt.to, %to, %reason, "navigation redirected");
                        if let Some(navigator) = navigator {
                            navigator.replace(&Route::recognize(&to).unwrap_or(Route::Login));
                        }
                    }
                    Settlement::Superseded => {
                        tracing::debug!(to = %ticket.attempt.to, "dropping stale navigation decision");
                    }
                }
            });
            || ()
        });
    }

    if tracker.borrow().may_render(&path) {
        props.children.clone()
    } else {
        html! {
            <div class="loading">
                <div class="spinner"></div>
            </div>
        }
    }
}
