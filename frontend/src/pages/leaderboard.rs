use yew::prelude::*;

#[function_component(Leaderboard)]
pub fn leaderboard() -> Html {
    html! {
        <div class="container">
            <h2>{ "Leaderboard" }</h2>
            <div class="empty-state">
                <p>{ "Rankings appear once apps start collecting votes." }</p>
            </div>
        </div>
    }
}
