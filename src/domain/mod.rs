//! Domain entities, value types, and the ports the core depends on.

pub mod offer;
pub mod ports;
pub mod principal;
pub mod reservation;
pub mod transaction;
