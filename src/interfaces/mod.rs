//! Inbound/outbound adapters for the demo binary.

pub mod csv;
