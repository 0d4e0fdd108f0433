mod components;
mod config;
mod context;
mod hooks;
mod pages;
mod router;
mod services;

use yew::prelude::*;
use yew_router::{BrowserRouter, Switch};

use crate::components::auth_gate::AuthGate;
use crate::components::header::Header;
use crate::context::AppContext;
use crate::pages::config_error::{ConfigError, ConfigErrorProps};
use crate::router::{switch, Route};

#[derive(Properties, PartialEq)]
struct AppProps {
    context: AppContext,
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    html! {
        <ContextProvider<AppContext> context={props.context.clone()}>
            <BrowserRouter>
                <div id="app">
                    <Header />
                    <AuthGate>
                        <Switch<Route> render={switch} />
                    </AuthGate>
                </div>
            </BrowserRouter>
        </ContextProvider<AppContext>>
    }
}

fn main() {
    // Initialize tracing
    tracing_wasm::set_as_global_default();

    match config::load() {
        Ok(config) => {
            tracing::info!(api = %config.api_base_url, "Starting app portal");
            let context = AppContext::from_config(config);
            yew::Renderer::<App>::with_props(AppProps { context }).render();
        }
        Err(err) => {
            tracing::error!(%err, "Invalid build configuration");
            yew::Renderer::<ConfigError>::with_props(ConfigErrorProps {
                message: err.to_string(),
            })
            .render();
        }
    }
}
