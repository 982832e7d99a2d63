use crate::domain::principal::{Principal, Role};
use crate::domain::reservation::Reservation;
use crate::error::{CoreError, Result};
use tracing::warn;

/// Capabilities a principal can exercise on a reservation.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Action {
    View,
    SetStatus,
    Cancel,
    Pay,
}

/// Single capability check applied by the lifecycle manager and the
/// settlement processor instead of per-operation ownership comparisons.
///
/// Viewing is open to the owning client, the owning provider, and any admin.
/// Status updates belong to the owning provider; cancellation and payment to
/// the owning client.
pub fn authorize(principal: Principal, reservation: &Reservation, action: Action) -> Result<()> {
    let allowed = match action {
        Action::View => {
            principal.role == Role::Admin
                || reservation.client == principal.id
                || reservation.provider == principal.id
        }
        Action::SetStatus => reservation.provider == principal.id,
        Action::Cancel | Action::Pay => reservation.client == principal.id,
    };

    if allowed {
        Ok(())
    } else {
        warn!(
            principal = principal.id,
            reservation = reservation.id,
            ?action,
            "authorization denied"
        );
        Err(CoreError::Forbidden(match action {
            Action::View => "not a party to this reservation",
            Action::SetStatus => "only the owning provider may update the status",
            Action::Cancel => "only the owning client may cancel",
            Action::Pay => "only the owning client may pay",
        }))
    }
}
