use super::principal::UserId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type OfferId = u64;

/// A provider's priced listing for a service type.
///
/// Offers are owned by the external catalog; the core only reads them through
/// the `OfferDirectory` port. The price seen here at settlement time is
/// captured into the resulting transaction, so later price edits never
/// retroactively change historical transactions.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct ProviderOffer {
    pub id: OfferId,
    pub provider: UserId,
    pub service: String,
    pub price: Decimal,
    pub available: bool,
}
