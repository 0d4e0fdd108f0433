use yew::prelude::*;

#[function_component(Upload)]
pub fn upload() -> Html {
    html! {
        <div class="container">
            <h2>{ "Upload an App" }</h2>
            <p>{ "Share a build with the community. Uploads are reviewed before they appear in the catalogue." }</p>
        </div>
    }
}
