use super::reservation::ReservationId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type TransactionId = u64;

/// Settlement outcome of a payment.
///
/// The simulation only ever produces `Succeeded`; the other variants exist
/// for a future gateway integration and for refund bookkeeping.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Succeeded,
    Failed,
    Refunded,
}

/// The single settlement record for a reservation's payment.
///
/// Exactly 0 or 1 transactions exist per reservation, enforced at commit
/// time by the store. A transaction is immutable once stored.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Transaction {
    pub id: TransactionId,
    pub reservation: ReservationId,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub payment_method: String,
    pub reference: String,
    pub settled_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Builds a settled (`Succeeded`) transaction with a fresh unique
    /// reference. The id is a placeholder until the store assigns one.
    pub fn settled(reservation: ReservationId, amount: Decimal, payment_method: &str) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            reservation,
            amount,
            status: PaymentStatus::Succeeded,
            payment_method: payment_method.to_string(),
            reference: Self::new_reference(),
            settled_at: now,
            created_at: now,
        }
    }

    fn new_reference() -> String {
        let hex = Uuid::new_v4().simple().to_string();
        format!("TXN-{}", hex[..8].to_uppercase())
    }
}
