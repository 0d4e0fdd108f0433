use yew::prelude::*;

#[function_component(Apps)]
pub fn apps() -> Html {
    html! {
        <div class="container">
            <h2>{ "Apps" }</h2>
            <div class="empty-state">
                <p>{ "No apps published yet. Be the first to upload one." }</p>
            </div>
        </div>
    }
}
