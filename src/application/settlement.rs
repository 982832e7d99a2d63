use crate::application::auth::{Action, authorize};
use crate::domain::ports::{
    OfferDirectoryRef, ReservationStoreRef, SettlementUnitRef, TransactionStoreRef,
};
use crate::domain::principal::{Principal, Role};
use crate::domain::reservation::{ReservationId, ReservationStatus};
use crate::domain::transaction::Transaction;
use crate::error::{CoreError, Result};
use rust_decimal::Decimal;
use tracing::info;

/// Settlement behavior knobs.
///
/// `force_confirmed` mirrors the payment simulation: a successful settlement
/// always moves the reservation to `Confirmed`, whatever its prior status. A
/// real gateway integration would replace this with a status derived from
/// the gateway outcome.
#[derive(Debug, Clone, Copy)]
pub struct SettlementPolicy {
    pub force_confirmed: bool,
}

impl Default for SettlementPolicy {
    fn default() -> Self {
        Self {
            force_confirmed: true,
        }
    }
}

/// The settlement processor: turns a reservation into exactly one
/// transaction, advancing the reservation status as a side effect.
#[derive(Clone)]
pub struct Settlement {
    offers: OfferDirectoryRef,
    reservations: ReservationStoreRef,
    transactions: TransactionStoreRef,
    unit: SettlementUnitRef,
    policy: SettlementPolicy,
}

impl Settlement {
    pub fn new(
        offers: OfferDirectoryRef,
        reservations: ReservationStoreRef,
        transactions: TransactionStoreRef,
        unit: SettlementUnitRef,
        policy: SettlementPolicy,
    ) -> Self {
        Self {
            offers,
            reservations,
            transactions,
            unit,
            policy,
        }
    }

    /// Processes the one-shot payment for a reservation.
    ///
    /// Restricted to the owning client. The amount is the offer price read
    /// at settlement time and frozen into the transaction. The transaction
    /// insert and the reservation status update are committed as one atomic
    /// unit; the unit re-checks the one-transaction-per-reservation
    /// invariant under its own lock, so concurrent attempts cannot both
    /// pass the early duplicate check below.
    pub async fn process_payment(
        &self,
        principal: Principal,
        reservation: ReservationId,
        payment_method: &str,
    ) -> Result<Transaction> {
        let mut reservation = self
            .reservations
            .get(reservation)
            .await?
            .ok_or(CoreError::NotFound("reservation"))?;
        authorize(principal, &reservation, Action::Pay)?;

        if self
            .transactions
            .for_reservation(reservation.id)
            .await?
            .is_some()
        {
            return Err(CoreError::Conflict("reservation already paid"));
        }

        let offer = self
            .offers
            .offer(reservation.offer)
            .await?
            .ok_or(CoreError::NotFound("offer"))?;

        let tx = Transaction::settled(reservation.id, offer.price, payment_method);
        if self.policy.force_confirmed {
            reservation.set_status(ReservationStatus::Confirmed);
        }

        let stored = self.unit.commit(tx, reservation.clone()).await?;
        info!(
            reservation = reservation.id,
            transaction = stored.id,
            reference = %stored.reference,
            amount = %stored.amount,
            "payment settled"
        );
        Ok(stored)
    }

    /// Lists the caller's transactions, most recent settlement first.
    /// Clients see payments for their bookings, providers the payments made
    /// against their offers. Admins use [`Self::list_all`].
    pub async fn list_mine(&self, principal: Principal) -> Result<Vec<Transaction>> {
        let reservations = match principal.role {
            Role::Client => self.reservations.for_client(principal.id).await?,
            Role::Provider => self.reservations.for_provider(principal.id).await?,
            Role::Admin => return Ok(Vec::new()),
        };
        let ids: Vec<_> = reservations.iter().map(|r| r.id).collect();
        self.transactions.for_reservations(&ids).await
    }

    /// Unrestricted listing for admins, most recent settlement first.
    pub async fn list_all(&self, principal: Principal) -> Result<Vec<Transaction>> {
        if principal.role != Role::Admin {
            return Err(CoreError::Forbidden("admin listing"));
        }
        self.transactions.recent().await
    }

    /// The calling provider's settled balance.
    pub async fn my_balance(&self, principal: Principal) -> Result<Decimal> {
        if principal.role != Role::Provider {
            return Err(CoreError::Forbidden("provider balance"));
        }
        let reservations = self.reservations.for_provider(principal.id).await?;
        let ids: Vec<_> = reservations.iter().map(|r| r.id).collect();
        self.transactions.sum_succeeded_for(&ids).await
    }
}
