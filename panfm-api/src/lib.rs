//! Library half of the read API server. Kept separate from `main.rs` so
//! router-level integration tests (`tests/routes.rs`) can build the same
//! [`routes::create_app`] the binary serves, against a real test database.

pub mod error;
pub mod handlers;
pub mod range;
pub mod routes;
pub mod state;
