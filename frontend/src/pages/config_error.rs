use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ConfigErrorProps {
    pub message: String,
}

/// Rendered instead of the app when the build configuration is unusable.
#[function_component(ConfigError)]
pub fn config_error(props: &ConfigErrorProps) -> Html {
    html! {
        <div class="container">
            <div class="empty-state">
                <h2>{ "Configuration error" }</h2>
                <p>{ &props.message }</p>
                <p>{ "Set SUPABASE_URL and SUPABASE_ANON_KEY when building the frontend." }</p>
            </div>
        </div>
    }
}
