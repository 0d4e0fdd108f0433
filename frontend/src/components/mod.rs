pub mod auth_gate;
pub mod header;
pub mod post_list;
pub mod todo_item;
pub mod todo_list;
