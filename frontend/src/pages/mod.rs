pub mod admin;
pub mod app_detail;
pub mod apps;
pub mod config_error;
pub mod home;
pub mod leaderboard;
pub mod login;
pub mod not_found;
pub mod post_detail;
pub mod posts;
pub mod profile;
pub mod register;
pub mod upload;
pub mod user_albums;
pub mod user_posts;
pub mod user_todos;
pub mod users;
pub mod verify_email;
