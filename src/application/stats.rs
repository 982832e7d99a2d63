use crate::domain::ports::{ReservationStoreRef, TransactionStoreRef};
use crate::domain::principal::UserId;
use crate::domain::reservation::ReservationStatus;
use crate::domain::transaction::PaymentStatus;
use crate::error::Result;
use chrono::{DateTime, Duration, Local, NaiveDateTime, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Snapshot of the marketplace counters for the admin dashboard.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct AdminStats {
    pub total_reservations: u64,
    pub pending_reservations: u64,
    pub completed_reservations: u64,
    pub today_reservations: u64,
    pub succeeded_transactions: u64,
    pub total_revenue: Decimal,
}

/// Read-side aggregation over the two stores.
///
/// Every query is a deterministic fold with no side effects; empty inputs
/// yield the identity element (0 or 0.00), never an error.
#[derive(Clone)]
pub struct Reports {
    reservations: ReservationStoreRef,
    transactions: TransactionStoreRef,
}

impl Reports {
    pub fn new(reservations: ReservationStoreRef, transactions: TransactionStoreRef) -> Self {
        Self {
            reservations,
            transactions,
        }
    }

    pub async fn count_by_status(&self, status: ReservationStatus) -> Result<u64> {
        self.reservations.count_by_status(status).await
    }

    /// Reservations scheduled within the local calendar day of the host.
    pub async fn count_today(&self) -> Result<u64> {
        let (from, to) = local_day_bounds(Local::now());
        self.reservations.count_scheduled_between(from, to).await
    }

    /// Sum of all succeeded settlement amounts against the provider's
    /// offers; exactly zero for a provider with no settled payments.
    pub async fn provider_balance(&self, provider: UserId) -> Result<Decimal> {
        let reservations = self.reservations.for_provider(provider).await?;
        let ids: Vec<_> = reservations.iter().map(|r| r.id).collect();
        self.transactions.sum_succeeded_for(&ids).await
    }

    /// Marketplace-wide sum of succeeded settlement amounts.
    pub async fn total_revenue(&self) -> Result<Decimal> {
        self.transactions.sum_succeeded().await
    }

    pub async fn count_succeeded(&self) -> Result<u64> {
        self.transactions
            .count_with_status(PaymentStatus::Succeeded)
            .await
    }

    pub async fn admin_stats(&self) -> Result<AdminStats> {
        Ok(AdminStats {
            total_reservations: self.reservations.all().await?.len() as u64,
            pending_reservations: self.count_by_status(ReservationStatus::Pending).await?,
            completed_reservations: self.count_by_status(ReservationStatus::Completed).await?,
            today_reservations: self.count_today().await?,
            succeeded_transactions: self.count_succeeded().await?,
            total_revenue: self.total_revenue().await?,
        })
    }
}

/// UTC bounds `[00:00:00, next midnight)` of the local calendar day
/// containing `now`.
pub fn local_day_bounds(now: DateTime<Local>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now.date_naive().and_time(NaiveTime::MIN);
    let end = start + Duration::days(1);
    (local_to_utc(start), local_to_utc(end))
}

fn local_to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    match naive.and_local_timezone(Local).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        // A DST gap can make a local midnight nonexistent; fall back to
        // reading the wall-clock value as UTC.
        None => Utc.from_utc_datetime(&naive),
    }
}
