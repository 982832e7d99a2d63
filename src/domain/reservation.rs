use super::offer::{OfferId, ProviderOffer};
use super::principal::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ReservationId = u64;

/// Lifecycle states of a reservation.
///
/// `Pending` is the initial state; `Completed` and `Cancelled` are terminal.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// A client's booking request against one provider offer.
///
/// The owning provider is denormalized from the offer at creation so that
/// ownership checks and provider listings never traverse the catalog. The
/// price is deliberately not stored here: settlement reads it from the offer
/// and freezes it into the transaction.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Reservation {
    pub id: ReservationId,
    pub client: UserId,
    pub offer: OfferId,
    pub provider: UserId,
    pub scheduled_at: DateTime<Utc>,
    pub status: ReservationStatus,
    pub notes: Option<String>,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Builds a new `Pending` reservation. The id is a placeholder until the
    /// store assigns one on insert.
    pub fn new(
        client: UserId,
        offer: &ProviderOffer,
        scheduled_at: DateTime<Utc>,
        notes: Option<String>,
        address: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            client,
            offer: offer.id,
            provider: offer.provider,
            scheduled_at,
            status: ReservationStatus::Pending,
            notes,
            address,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a status change and refreshes the modification timestamp.
    pub fn set_status(&mut self, status: ReservationStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}
