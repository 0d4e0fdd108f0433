use yew::prelude::*;
use yew_router::prelude::*;
use shared::models::Post;

use crate::router::Route;

#[derive(Properties, PartialEq)]
pub struct PostListProps {
    pub posts: Vec<Post>,
}

#[function_component(PostList)]
pub fn post_list(props: &PostListProps) -> Html {
    if props.posts.is_empty() {
        return html! {
            <div class="empty-state">
                <p>{ "No posts to show." }</p>
            </div>
        };
    }

    html! {
        <ul class="post-list">
            { for props.posts.iter().map(|post| html! {
                <li key={post.id} class="post-item">
                    <Link<Route> to={Route::PostDetail { id: post.id }}>
                        <span class="post-title">{ &post.title }</span>
                    </Link<Route>>
                </li>
            })}
        </ul>
    }
}
