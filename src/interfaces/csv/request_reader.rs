use crate::domain::offer::OfferId;
use crate::domain::principal::UserId;
use crate::domain::reservation::{ReservationId, ReservationStatus};
use crate::error::{CoreError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One marketplace request in a scenario file.
#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    /// Seed a catalog offer (`offer`, `provider`, `service`, `price`,
    /// optional `available`).
    Offer,
    /// Seed a client's home address (`actor`, `address`).
    Client,
    /// Book an offer as a client (`actor`, `offer`, `scheduled_at`,
    /// optional `notes`/`address`).
    Book,
    /// Pay for a reservation as a client (`actor`, `reservation`, `method`).
    Pay,
    /// Update a reservation status as a provider (`actor`, `reservation`,
    /// `status`).
    Status,
    /// Cancel a reservation as a client (`actor`, `reservation`).
    Cancel,
}

/// A scenario row. Columns not used by the row's `op` stay empty.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct ScenarioRow {
    pub op: Op,
    pub actor: Option<UserId>,
    pub offer: Option<OfferId>,
    pub provider: Option<UserId>,
    pub service: Option<String>,
    pub price: Option<Decimal>,
    pub available: Option<bool>,
    pub reservation: Option<ReservationId>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub status: Option<ReservationStatus>,
    pub notes: Option<String>,
    pub address: Option<String>,
    pub method: Option<String>,
}

/// Reads scenario rows from a CSV source.
///
/// Wraps `csv::Reader` with whitespace trimming and flexible record lengths,
/// yielding a lazy iterator so large scenario files stream without loading
/// fully into memory.
pub struct ScenarioReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ScenarioReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn rows(self) -> impl Iterator<Item = Result<ScenarioRow>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(CoreError::from))
    }
}
