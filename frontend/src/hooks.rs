use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

use yew::prelude::*;

use crate::context::AppContext;
use crate::services::api::ApiError;

#[derive(Clone, PartialEq)]
pub enum FetchState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

/// Services shared by the whole app.
#[hook]
pub fn use_app() -> AppContext {
    use_context::<AppContext>().expect("AppContext is provided at the root")
}

/// Liveness of one effect run; cancelled when its deps change or the
/// component unmounts.
#[derive(Clone, Default)]
struct Subscription {
    cancelled: Rc<Cell<bool>>,
}

impl Subscription {
    fn cancel(&self) {
        self.cancelled.set(true);
    }

    /// Run `deliver` unless the subscription was cancelled.
    fn deliver(&self, deliver: impl FnOnce()) -> bool {
        if self.cancelled.get() {
            return false;
        }
        deliver();
        true
    }
}

/// Run `fetch` whenever `deps` change and track its result.
///
/// A response for superseded deps is discarded, so a slow earlier request
/// cannot overwrite a newer one.
#[hook]
pub fn use_fetch<T, D, F, Fut>(deps: D, fetch: F) -> UseStateHandle<FetchState<T>>
where
    T: 'static,
    D: PartialEq + Clone + 'static,
    F: FnOnce(D) -> Fut + 'static,
    Fut: Future<Output = Result<T, ApiError>> + 'static,
{
    let state = use_state(|| FetchState::Loading);

    {
        let state = state.clone();
        use_effect_with(deps, move |deps| {
            state.set(FetchState::Loading);
            let request = fetch(deps.clone());
            let subscription = Subscription::default();
            let task = subscription.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let next = match request.await {
                    Ok(value) => FetchState::Ready(value),
                    Err(e) => {
                        tracing::error!("Failed to fetch: {}", e);
                        FetchState::Failed(e.to_string())
                    }
                };
                if !task.deliver(|| state.set(next)) {
                    tracing::debug!("dropping superseded fetch result");
                }
            });
            move || subscription.cancel()
        });
    }

    state
}

impl<T> FetchState<T> {
    /// Spinner while loading, the error text on failure, `ready` otherwise.
    pub fn view(&self, ready: impl FnOnce(&T) -> Html) -> Html {
        match self {
            Self::Loading => html! {
                <div class="loading">
                    <div class="spinner"></div>
                </div>
            },
            Self::Ready(value) => ready(value),
            Self::Failed(message) => html! {
                <div class="error">{ message }</div>
            },
        }
    }
}
