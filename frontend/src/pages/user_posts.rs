use yew::prelude::*;

use crate::components::post_list::PostList;
use crate::hooks::{use_app, use_fetch};

#[derive(Properties, PartialEq)]
pub struct UserPostsProps {
    pub user_id: u32,
}

#[function_component(UserPosts)]
pub fn user_posts(props: &UserPostsProps) -> Html {
    let app = use_app();
    let posts = {
        let api = app.api.clone();
        use_fetch(props.user_id, move |user_id| async move { api.user_posts(user_id).await })
    };

    html! {
        <div class="container">
            <h2>{ format!("Posts by user {}", props.user_id) }</h2>
            { posts.view(|posts| html! { <PostList posts={posts.clone()} /> }) }
        </div>
    }
}
