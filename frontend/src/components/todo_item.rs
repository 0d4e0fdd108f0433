use shared::models::{ResourceId, Todo};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct TodoItemProps {
    pub todo: Todo,
    /// Receives the todo's id when its checkbox is clicked.
    pub on_toggle: Callback<ResourceId>,
}

#[function_component(TodoItem)]
pub fn todo_item(props: &TodoItemProps) -> Html {
    let Todo {
        id,
        ref title,
        completed,
        ..
    } = props.todo;
    let onclick = props.on_toggle.reform(move |_: MouseEvent| id);

    html! {
        <li class={classes!("todo-item", completed.then_some("todo-done"))}>
            <label>
                <input type="checkbox" class="todo-checkbox" checked={completed} {onclick} />
                <span class="todo-title">{ title }</span>
            </label>
        </li>
    }
}
