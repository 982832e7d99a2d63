use crate::application::auth::{Action, authorize};
use crate::domain::offer::OfferId;
use crate::domain::ports::{OfferDirectoryRef, ReservationStoreRef};
use crate::domain::principal::{Principal, Role};
use crate::domain::reservation::{Reservation, ReservationId, ReservationStatus};
use crate::error::{CoreError, Result};
use chrono::{DateTime, Utc};
use tracing::info;

/// Caller-supplied fields for a booking request.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub offer: OfferId,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub address: Option<String>,
}

/// The reservation lifecycle manager.
///
/// Owns creation and status transitions of reservations. Every operation
/// takes the explicit calling principal; ownership and role checks go
/// through [`authorize`].
#[derive(Clone)]
pub struct Reservations {
    offers: OfferDirectoryRef,
    store: ReservationStoreRef,
}

impl Reservations {
    pub fn new(offers: OfferDirectoryRef, store: ReservationStoreRef) -> Self {
        Self { offers, store }
    }

    /// Books an offer for the calling client.
    ///
    /// Fails `NotFound` if the offer does not exist and `Conflict` if it is
    /// flagged unavailable. The service address defaults to the client's
    /// stored home address when none is supplied. Offer availability is not
    /// touched; a booking does not take the offer off the catalog.
    pub async fn create(&self, principal: Principal, req: NewReservation) -> Result<Reservation> {
        if principal.role != Role::Client {
            return Err(CoreError::Forbidden("only clients may book"));
        }
        let scheduled_at = req
            .scheduled_at
            .ok_or_else(|| CoreError::Validation("scheduled time is required".into()))?;

        let offer = self
            .offers
            .offer(req.offer)
            .await?
            .ok_or(CoreError::NotFound("offer"))?;
        if !offer.available {
            return Err(CoreError::Conflict("offer is not available"));
        }

        let address = match req.address {
            Some(address) => address,
            None => self
                .offers
                .client_address(principal.id)
                .await?
                .unwrap_or_default(),
        };

        let reservation = Reservation::new(principal.id, &offer, scheduled_at, req.notes, address);
        let stored = self.store.create(reservation).await?;
        info!(
            reservation = stored.id,
            client = principal.id,
            offer = offer.id,
            provider = offer.provider,
            "reservation created"
        );
        Ok(stored)
    }

    /// Updates a reservation's status, restricted to the owning provider.
    ///
    /// Only the terminal boundary is validated: a `Completed` reservation
    /// rejects further updates with `Conflict`, any other source status
    /// accepts any target. The transition graph is deliberately not enforced
    /// here (see the lenient-transitions test).
    pub async fn set_status(
        &self,
        principal: Principal,
        id: ReservationId,
        status: ReservationStatus,
    ) -> Result<Reservation> {
        let mut reservation = self
            .store
            .get(id)
            .await?
            .ok_or(CoreError::NotFound("reservation"))?;
        authorize(principal, &reservation, Action::SetStatus)?;
        if reservation.status == ReservationStatus::Completed {
            return Err(CoreError::Conflict("reservation is already completed"));
        }

        reservation.set_status(status);
        self.store.update(reservation.clone()).await?;
        info!(reservation = id, ?status, "status updated");
        Ok(reservation)
    }

    /// Cancels a reservation, restricted to the owning client. A `Completed`
    /// reservation can no longer be cancelled.
    pub async fn cancel(&self, principal: Principal, id: ReservationId) -> Result<Reservation> {
        let mut reservation = self
            .store
            .get(id)
            .await?
            .ok_or(CoreError::NotFound("reservation"))?;
        authorize(principal, &reservation, Action::Cancel)?;
        if reservation.status == ReservationStatus::Completed {
            return Err(CoreError::Conflict("cannot cancel a completed reservation"));
        }

        reservation.set_status(ReservationStatus::Cancelled);
        self.store.update(reservation.clone()).await?;
        info!(reservation = id, "reservation cancelled");
        Ok(reservation)
    }

    /// Fetches one reservation, visible to its client, its provider, or an
    /// admin.
    pub async fn get(&self, principal: Principal, id: ReservationId) -> Result<Reservation> {
        let reservation = self
            .store
            .get(id)
            .await?
            .ok_or(CoreError::NotFound("reservation"))?;
        authorize(principal, &reservation, Action::View)?;
        Ok(reservation)
    }

    /// Lists the caller's reservations, most recently created first. Clients
    /// see their bookings, providers the bookings against their offers.
    /// Admins get an empty list here and use [`Self::list_all`] instead.
    pub async fn list_mine(&self, principal: Principal) -> Result<Vec<Reservation>> {
        match principal.role {
            Role::Client => self.store.for_client(principal.id).await,
            Role::Provider => self.store.for_provider(principal.id).await,
            Role::Admin => Ok(Vec::new()),
        }
    }

    /// The provider triage queue: `Pending` reservations against the calling
    /// provider's offers, earliest appointment first.
    pub async fn list_pending(&self, principal: Principal) -> Result<Vec<Reservation>> {
        if principal.role != Role::Provider {
            return Err(CoreError::Forbidden("provider listing"));
        }
        self.store.pending_for_provider(principal.id).await
    }

    /// Unrestricted listing for admins, most recently created first.
    pub async fn list_all(&self, principal: Principal) -> Result<Vec<Reservation>> {
        if principal.role != Role::Admin {
            return Err(CoreError::Forbidden("admin listing"));
        }
        self.store.all().await
    }
}
