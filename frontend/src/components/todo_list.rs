use shared::models::{ResourceId, Todo};
use yew::prelude::*;

use crate::components::todo_item::TodoItem;

#[derive(Properties, PartialEq)]
pub struct TodoListProps {
    pub todos: Vec<Todo>,
    pub on_toggle: Callback<ResourceId>,
}

#[function_component(TodoList)]
pub fn todo_list(props: &TodoListProps) -> Html {
    if props.todos.is_empty() {
        return html! {
            <div class="empty-state">
                <p>{ "Nothing on this list." }</p>
            </div>
        };
    }

    let done = props.todos.iter().filter(|todo| todo.completed).count();

    html! {
        <section class="todo-list">
            <p class="todo-summary">{ format!("{done} of {} done", props.todos.len()) }</p>
            <ul>
                { for props.todos.iter().map(|todo| html! {
                    <TodoItem key={todo.id} todo={todo.clone()} on_toggle={props.on_toggle.clone()} />
                }) }
            </ul>
        </section>
    }
}
