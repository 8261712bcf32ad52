//! Threshold evaluation against incoming samples, cooldown-gated dispatch
//! through the [`crate::notification`] module. Persistence for
//! `AlertConfig`/`AlertHistory`/`AlertCooldown` rows lives in
//! [`crate::store::alerts`]; this module only holds the evaluation
//! algorithm and touches the store through [`crate::store::PostgresStore`].

mod engine;
mod metrics;

pub use engine::AlertEngine;
pub use metrics::metric_bag;
