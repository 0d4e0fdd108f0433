use shared::models::{ResourceId, Todo, TodoPatch};
use yew::prelude::*;

use crate::components::todo_list::TodoList;
use crate::hooks::{use_app, use_fetch, FetchState};

#[derive(Properties, PartialEq)]
pub struct UserTodosProps {
    pub user_id: u32,
}

#[function_component(UserTodos)]
pub fn user_todos(props: &UserTodosProps) -> Html {
    let app = use_app();
    let todos = {
        let api = app.api.clone();
        use_fetch(props.user_id, move |user_id| async move { api.user_todos(user_id).await })
    };

    let on_toggle = {
        let todos = todos.clone();
        Callback::from(move |id: ResourceId| {
            let FetchState::Ready(current) = &*todos else {
                return;
            };
            let Some(todo) = current.iter().find(|todo| todo.id == id) else {
                return;
            };
            let patch = TodoPatch {
                completed: Some(!todo.completed),
                ..Default::default()
            };
            let snapshot = current.clone();

            let api = app.api.clone();
            let todos = todos.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match api.update::<Todo>(id, &patch).await {
                    Ok(updated) => {
                        let mut list = snapshot;
                        if let Some(slot) = list.iter_mut().find(|t| t.id == updated.id) {
                            *slot = updated;
                        }
                        todos.set(FetchState::Ready(list));
                    }
                    Err(e) => tracing::error!("Failed to update todo {}: {}", id, e),
                }
            });
        })
    };

    html! {
        <div class="container">
            <h2>{ format!("Todos for user {}", props.user_id) }</h2>
            { todos.view(|todos| html! {
                <TodoList todos={todos.clone()} on_toggle={on_toggle.clone()} />
            }) }
        </div>
    }
}
