use shared::models::{Comment, NewPost, Post};
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::hooks::{use_app, use_fetch, FetchState};
use crate::router::Route;

#[derive(Properties, PartialEq)]
pub struct PostDetailProps {
    pub id: u32,
}

#[function_component(PostDetail)]
pub fn post_detail(props: &PostDetailProps) -> Html {
    let app = use_app();
    let navigator = use_navigator();
    let post = {
        let api = app.api.clone();
        use_fetch(props.id, move |id| async move { api.get::<Post>(id).await })
    };
    let comments = {
        let api = app.api.clone();
        use_fetch(props.id, move |id| async move { api.post_comments(id).await })
    };
    let editing = use_state(|| false);
    let error = use_state(|| None::<String>);
    let title = use_node_ref();
    let body = use_node_ref();

    let on_delete = {
        let api = app.api.clone();
        let error = error.clone();
        let id = props.id;
        Callback::from(move |_: MouseEvent| {
            let api = api.clone();
            let navigator = navigator.clone();
            let error = error.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match api.delete::<Post>(id).await {
                    Ok(()) => {
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::Posts);
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to delete post: {}", e);
                        error.set(Some(e.to_string()));
                    }
                }
            });
        })
    };

    let on_edit = {
        let editing = editing.clone();
        Callback::from(move |_: MouseEvent| editing.set(!*editing))
    };

    let on_save = {
        let api = app.api.clone();
        let post = post.clone();
        let editing = editing.clone();
        let error = error.clone();
        let title = title.clone();
        let body = body.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let FetchState::Ready(current) = &*post else {
                return;
            };
            let (Some(title), Some(body)) = (
                title.cast::<HtmlInputElement>(),
                body.cast::<HtmlInputElement>(),
            ) else {
                return;
            };
            let replacement = NewPost {
                user_id: current.user_id,
                title: title.value(),
                body: body.value(),
            };
            let id = current.id;

            let api = api.clone();
            let post = post.clone();
            let editing = editing.clone();
            let error = error.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match api.replace::<Post>(id, &replacement).await {
                    Ok(updated) => {
                        post.set(FetchState::Ready(updated));
                        editing.set(false);
                        error.set(None);
                    }
                    Err(e) => {
                        tracing::error!("Failed to update post: {}", e);
                        error.set(Some(e.to_string()));
                    }
                }
            });
        })
    };

    let post_view = post.view(|post| {
        if *editing {
            html! {
                <form class="post-form" onsubmit={on_save.clone()}>
                    <input ref={title.clone()} type="text" value={post.title.clone()} />
                    <input ref={body.clone()} type="text" value={post.body.clone()} />
                    <button class="btn btn-primary" type="submit">{ "Save" }</button>
                </form>
            }
        } else {
            html! {
                <article class="post">
                    <h2>{ &post.title }</h2>
                    <p>{ &post.body }</p>
                    <Link<Route> to={Route::UserPosts { user_id: post.user_id }}>
                        { format!("More from user {}", post.user_id) }
                    </Link<Route>>
                </article>
            }
        }
    });

    html! {
        <div class="container">
            { post_view }
            <div class="actions">
                <button class="btn" onclick={on_edit}>
                    { if *editing { "Cancel" } else { "Edit" } }
                </button>
                <button class="btn btn-danger" onclick={on_delete}>{ "Delete" }</button>
            </div>
            if let Some(message) = &*error {
                <div class="error">{ message }</div>
            }
            <h3>{ "Comments" }</h3>
            { comments.view(|comments| html! {
                <ul class="comment-list">
                    { for comments.iter().map(comment_item) }
                </ul>
            }) }
        </div>
    }
}

fn comment_item(comment: &Comment) -> Html {
    html! {
        <li key={comment.id} class="comment">
            <div class="comment-author">{ format!("{} <{}>", comment.name, comment.email) }</div>
            <p>{ &comment.body }</p>
        </li>
    }
}
