use super::offer::{OfferId, ProviderOffer};
use super::principal::UserId;
use super::reservation::{Reservation, ReservationId, ReservationStatus};
use super::transaction::{PaymentStatus, Transaction};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Read-only view of the external service catalog.
///
/// The catalog also knows each client's stored home address, which the core
/// uses to default a reservation address when the caller supplies none.
#[async_trait]
pub trait OfferDirectory: Send + Sync {
    async fn offer(&self, offer_id: OfferId) -> Result<Option<ProviderOffer>>;
    async fn client_address(&self, client_id: UserId) -> Result<Option<String>>;
}

/// Durable store of reservation records.
///
/// `create` assigns the record id. Listing methods encode the orderings the
/// operations need: creation-recency for client/provider/admin listings,
/// ascending scheduled time for the provider triage queue.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn create(&self, reservation: Reservation) -> Result<Reservation>;
    async fn get(&self, id: ReservationId) -> Result<Option<Reservation>>;
    async fn update(&self, reservation: Reservation) -> Result<()>;
    async fn for_client(&self, client: UserId) -> Result<Vec<Reservation>>;
    async fn for_provider(&self, provider: UserId) -> Result<Vec<Reservation>>;
    async fn pending_for_provider(&self, provider: UserId) -> Result<Vec<Reservation>>;
    async fn all(&self) -> Result<Vec<Reservation>>;
    async fn count_by_status(&self, status: ReservationStatus) -> Result<u64>;
    /// Counts reservations scheduled in the half-open range `[from, to)`.
    async fn count_scheduled_between(&self, from: DateTime<Utc>, to: DateTime<Utc>)
    -> Result<u64>;
}

/// Durable store of settlement transactions.
///
/// Reservation links are explicit foreign keys resolved through queries;
/// there is no live object graph to traverse.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn for_reservation(&self, reservation: ReservationId) -> Result<Option<Transaction>>;
    /// Transactions belonging to any of the given reservations, most recent
    /// settlement first.
    async fn for_reservations(&self, reservations: &[ReservationId]) -> Result<Vec<Transaction>>;
    /// Every transaction, most recent settlement first.
    async fn recent(&self) -> Result<Vec<Transaction>>;
    async fn sum_succeeded_for(&self, reservations: &[ReservationId]) -> Result<Decimal>;
    async fn sum_succeeded(&self) -> Result<Decimal>;
    async fn count_with_status(&self, status: PaymentStatus) -> Result<u64>;
}

/// Atomic unit of work for settlement.
///
/// Persists the transaction and the updated reservation together, or
/// neither. Fails with `Conflict` without writing anything if a transaction
/// already exists for the reservation; concurrent commits on the same
/// reservation serialize on this check.
#[async_trait]
pub trait SettlementUnit: Send + Sync {
    async fn commit(&self, tx: Transaction, reservation: Reservation) -> Result<Transaction>;
}

pub type OfferDirectoryRef = Arc<dyn OfferDirectory>;
pub type ReservationStoreRef = Arc<dyn ReservationStore>;
pub type TransactionStoreRef = Arc<dyn TransactionStore>;
pub type SettlementUnitRef = Arc<dyn SettlementUnit>;
