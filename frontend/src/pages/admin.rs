use yew::prelude::*;

#[function_component(Admin)]
pub fn admin() -> Html {
    html! {
        <div class="container">
            <h2>{ "Admin" }</h2>
            <p>{ "Review pending uploads and manage the catalogue." }</p>
        </div>
    }
}
