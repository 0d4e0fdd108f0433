use shared::models::{NewPost, Post};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::components::post_list::PostList;
use crate::hooks::{use_app, use_fetch, FetchState};

/// Posts are created on behalf of this user; the data API has no accounts.
const DEMO_AUTHOR_ID: u32 = 1;

#[function_component(Posts)]
pub fn posts() -> Html {
    let app = use_app();
    let posts = {
        let api = app.api.clone();
        use_fetch((), move |_| async move { api.list::<Post>().await })
    };
    let title = use_node_ref();
    let body = use_node_ref();
    let error = use_state(|| None::<String>);

    let onsubmit = {
        let posts = posts.clone();
        let title = title.clone();
        let body = body.clone();
        let error = error.clone();

        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let (Some(title_input), Some(body_input)) = (
                title.cast::<HtmlInputElement>(),
                body.cast::<HtmlInputElement>(),
            ) else {
                return;
            };
            let new_post = NewPost {
                user_id: DEMO_AUTHOR_ID,
                title: title_input.value(),
                body: body_input.value(),
            };

            let api = app.api.clone();
            let posts = posts.clone();
            let error = error.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match api.create::<Post>(&new_post).await {
                    Ok(created) => {
                        title_input.set_value("");
                        body_input.set_value("");
                        error.set(None);
                        if let FetchState::Ready(existing) = &*posts {
                            let mut updated = Vec::with_capacity(existing.len() + 1);
                            updated.push(created);
                            updated.extend(existing.iter().cloned());
                            posts.set(FetchState::Ready(updated));
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to create post: {}", e);
                        error.set(Some(e.to_string()));
                    }
                }
            });
        })
    };

    html! {
        <div class="container">
            <h2>{ "Posts" }</h2>
            <form class="post-form" {onsubmit}>
                <input ref={title} type="text" placeholder="Title" />
                <input ref={body} type="text" placeholder="What's on your mind?" />
                <button class="btn btn-primary" type="submit">{ "Publish" }</button>
            </form>
            if let Some(message) = &*error {
                <div class="error">{ message }</div>
            }
            { posts.view(|posts| html! { <PostList posts={posts.clone()} /> }) }
        </div>
    }
}
