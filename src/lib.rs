//! Booking and settlement engine for a home-repair services marketplace.
//!
//! Clients book provider offers, pay for them through a simulated one-shot
//! settlement, and the marketplace derives provider balances and revenue
//! from the settled transactions. Identity resolution and the service
//! catalog are external collaborators reached through ports.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
