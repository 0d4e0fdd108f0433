use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct AppDetailProps {
    pub id: String,
}

#[function_component(AppDetail)]
pub fn app_detail(props: &AppDetailProps) -> Html {
    html! {
        <div class="container">
            <h2>{ format!("App {}", props.id) }</h2>
            <p>{ "Details for this app are not available yet." }</p>
        </div>
    }
}
