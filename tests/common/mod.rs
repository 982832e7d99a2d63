#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use homeserve::application::reservations::{NewReservation, Reservations};
use homeserve::application::settlement::{Settlement, SettlementPolicy};
use homeserve::application::stats::Reports;
use homeserve::domain::offer::ProviderOffer;
use homeserve::domain::ports::{
    OfferDirectoryRef, ReservationStoreRef, SettlementUnitRef, TransactionStoreRef,
};
use homeserve::infrastructure::in_memory::InMemoryBackend;
use rust_decimal::Decimal;
use std::sync::Arc;

/// A fully wired marketplace over one in-memory backend.
pub struct Market {
    pub backend: InMemoryBackend,
    pub reservations: Reservations,
    pub settlement: Settlement,
    pub reports: Reports,
}

pub fn market() -> Market {
    market_with_policy(SettlementPolicy::default())
}

pub fn market_with_policy(policy: SettlementPolicy) -> Market {
    let backend = InMemoryBackend::new();
    let offers: OfferDirectoryRef = Arc::new(backend.clone());
    let reservation_store: ReservationStoreRef = Arc::new(backend.clone());
    let transaction_store: TransactionStoreRef = Arc::new(backend.clone());
    let unit: SettlementUnitRef = Arc::new(backend.clone());

    Market {
        reservations: Reservations::new(offers.clone(), reservation_store.clone()),
        settlement: Settlement::new(
            offers,
            reservation_store.clone(),
            transaction_store.clone(),
            unit,
            policy,
        ),
        reports: Reports::new(reservation_store, transaction_store),
        backend,
    }
}

pub async fn seed_offer(market: &Market, id: u64, provider: u64, price: Decimal, available: bool) {
    market
        .backend
        .put_offer(ProviderOffer {
            id,
            provider,
            service: "plumbing".into(),
            price,
            available,
        })
        .await;
}

/// A booking request for `offer`, scheduled one day out by default.
pub fn booking(offer: u64) -> NewReservation {
    booking_at(offer, Utc::now() + Duration::days(1))
}

pub fn booking_at(offer: u64, scheduled_at: DateTime<Utc>) -> NewReservation {
    NewReservation {
        offer,
        scheduled_at: Some(scheduled_at),
        notes: None,
        address: Some("12 Oak St".into()),
    }
}
