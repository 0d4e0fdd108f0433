//! Browser-independent core of the app portal.
//!
//! Route table, navigation guard, session oracle contract, auth provider
//! wire types, data API models and endpoint catalogue, and start-up
//! configuration. Nothing here touches the DOM, so all of it is tested on
//! the host.

pub mod api;
pub mod config;
pub mod guard;
pub mod models;
pub mod routes;
pub mod session;
