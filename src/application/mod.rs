//! Application layer: the reservation lifecycle manager, the settlement
//! processor, and the read-side aggregation engine.
//!
//! Services receive the calling [`Principal`](crate::domain::principal::Principal)
//! explicitly on every operation and talk to the stores through the ports in
//! [`crate::domain::ports`].

pub mod auth;
pub mod reservations;
pub mod settlement;
pub mod stats;
