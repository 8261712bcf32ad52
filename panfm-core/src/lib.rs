//! Core library backing both PANfm binaries: the time-series [`store`], the
//! [`alert`] engine, the [`notification`] dispatcher, and the concrete
//! [`panos`] `FirewallClient` implementation.

pub mod alert;
pub mod directory;
pub mod error;
pub mod notification;
pub mod panos;
pub mod store;

pub use directory::EnvCredentialDirectory;
pub use error::{CoreError, Result};
pub use store::PostgresStore;
