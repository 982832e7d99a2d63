use crate::domain::offer::{OfferId, ProviderOffer};
use crate::domain::ports::{
    OfferDirectory, ReservationStore, SettlementUnit, TransactionStore,
};
use crate::domain::principal::UserId;
use crate::domain::reservation::{Reservation, ReservationId, ReservationStatus};
use crate::domain::transaction::{PaymentStatus, Transaction, TransactionId};
use crate::error::{CoreError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct State {
    offers: HashMap<OfferId, ProviderOffer>,
    addresses: HashMap<UserId, String>,
    reservations: HashMap<ReservationId, Reservation>,
    transactions: HashMap<TransactionId, Transaction>,
    tx_by_reservation: HashMap<ReservationId, TransactionId>,
    next_reservation: ReservationId,
    next_transaction: TransactionId,
}

/// In-memory backend implementing every port over one shared state.
///
/// Holding all tables behind a single `RwLock` is what makes the settlement
/// unit of work atomic and race-free: `commit` takes the write lock once,
/// re-checks the per-reservation uniqueness index, and applies both writes
/// before releasing it. `Clone` shares the underlying state.
#[derive(Default, Clone)]
pub struct InMemoryBackend {
    state: Arc<RwLock<State>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a catalog offer. Test and demo helper standing in for the
    /// external catalog service.
    pub async fn put_offer(&self, offer: ProviderOffer) {
        let mut state = self.state.write().await;
        state.offers.insert(offer.id, offer);
    }

    /// Seeds a client's stored home address.
    pub async fn put_client_address(&self, client: UserId, address: &str) {
        let mut state = self.state.write().await;
        state.addresses.insert(client, address.to_string());
    }
}

#[async_trait]
impl OfferDirectory for InMemoryBackend {
    async fn offer(&self, offer_id: OfferId) -> Result<Option<ProviderOffer>> {
        let state = self.state.read().await;
        Ok(state.offers.get(&offer_id).cloned())
    }

    async fn client_address(&self, client_id: UserId) -> Result<Option<String>> {
        let state = self.state.read().await;
        Ok(state.addresses.get(&client_id).cloned())
    }
}

#[async_trait]
impl ReservationStore for InMemoryBackend {
    async fn create(&self, mut reservation: Reservation) -> Result<Reservation> {
        let mut state = self.state.write().await;
        state.next_reservation += 1;
        reservation.id = state.next_reservation;
        state.reservations.insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn get(&self, id: ReservationId) -> Result<Option<Reservation>> {
        let state = self.state.read().await;
        Ok(state.reservations.get(&id).cloned())
    }

    async fn update(&self, reservation: Reservation) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.reservations.contains_key(&reservation.id) {
            return Err(CoreError::NotFound("reservation"));
        }
        state.reservations.insert(reservation.id, reservation);
        Ok(())
    }

    async fn for_client(&self, client: UserId) -> Result<Vec<Reservation>> {
        let state = self.state.read().await;
        let mut rows: Vec<_> = state
            .reservations
            .values()
            .filter(|r| r.client == client)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn for_provider(&self, provider: UserId) -> Result<Vec<Reservation>> {
        let state = self.state.read().await;
        let mut rows: Vec<_> = state
            .reservations
            .values()
            .filter(|r| r.provider == provider)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn pending_for_provider(&self, provider: UserId) -> Result<Vec<Reservation>> {
        let state = self.state.read().await;
        let mut rows: Vec<_> = state
            .reservations
            .values()
            .filter(|r| r.provider == provider && r.status == ReservationStatus::Pending)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn all(&self) -> Result<Vec<Reservation>> {
        let state = self.state.read().await;
        let mut rows: Vec<_> = state.reservations.values().cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn count_by_status(&self, status: ReservationStatus) -> Result<u64> {
        let state = self.state.read().await;
        Ok(state
            .reservations
            .values()
            .filter(|r| r.status == status)
            .count() as u64)
    }

    async fn count_scheduled_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<u64> {
        let state = self.state.read().await;
        Ok(state
            .reservations
            .values()
            .filter(|r| r.scheduled_at >= from && r.scheduled_at < to)
            .count() as u64)
    }
}

#[async_trait]
impl TransactionStore for InMemoryBackend {
    async fn for_reservation(&self, reservation: ReservationId) -> Result<Option<Transaction>> {
        let state = self.state.read().await;
        Ok(state
            .tx_by_reservation
            .get(&reservation)
            .and_then(|id| state.transactions.get(id))
            .cloned())
    }

    async fn for_reservations(&self, reservations: &[ReservationId]) -> Result<Vec<Transaction>> {
        let state = self.state.read().await;
        let mut rows: Vec<_> = state
            .transactions
            .values()
            .filter(|t| reservations.contains(&t.reservation))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.settled_at.cmp(&a.settled_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn recent(&self) -> Result<Vec<Transaction>> {
        let state = self.state.read().await;
        let mut rows: Vec<_> = state.transactions.values().cloned().collect();
        rows.sort_by(|a, b| b.settled_at.cmp(&a.settled_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn sum_succeeded_for(&self, reservations: &[ReservationId]) -> Result<Decimal> {
        let state = self.state.read().await;
        Ok(state
            .transactions
            .values()
            .filter(|t| {
                t.status == PaymentStatus::Succeeded && reservations.contains(&t.reservation)
            })
            .fold(Decimal::ZERO, |acc, t| acc + t.amount))
    }

    async fn sum_succeeded(&self) -> Result<Decimal> {
        let state = self.state.read().await;
        Ok(state
            .transactions
            .values()
            .filter(|t| t.status == PaymentStatus::Succeeded)
            .fold(Decimal::ZERO, |acc, t| acc + t.amount))
    }

    async fn count_with_status(&self, status: PaymentStatus) -> Result<u64> {
        let state = self.state.read().await;
        Ok(state
            .transactions
            .values()
            .filter(|t| t.status == status)
            .count() as u64)
    }
}

#[async_trait]
impl SettlementUnit for InMemoryBackend {
    async fn commit(&self, mut tx: Transaction, reservation: Reservation) -> Result<Transaction> {
        let mut state = self.state.write().await;
        if state.tx_by_reservation.contains_key(&reservation.id) {
            return Err(CoreError::Conflict("reservation already paid"));
        }
        if !state.reservations.contains_key(&reservation.id) {
            return Err(CoreError::NotFound("reservation"));
        }

        state.next_transaction += 1;
        tx.id = state.next_transaction;
        state.tx_by_reservation.insert(reservation.id, tx.id);
        state.transactions.insert(tx.id, tx.clone());
        state.reservations.insert(reservation.id, reservation);
        Ok(tx)
    }
}
