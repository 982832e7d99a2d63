mod common;

use common::{booking, market, market_with_policy, seed_offer};
use homeserve::application::settlement::SettlementPolicy;
use homeserve::domain::ports::{ReservationStore, TransactionStore};
use homeserve::domain::principal::Principal;
use homeserve::domain::reservation::ReservationStatus;
use homeserve::domain::transaction::PaymentStatus;
use homeserve::error::CoreError;
use rust_decimal_macros::dec;
use std::sync::Arc;

#[tokio::test]
async fn test_payment_settles_at_captured_offer_price() {
    let m = market();
    seed_offer(&m, 1, 20, dec!(60.00), true).await;
    let client = Principal::client(10);
    let r = m.reservations.create(client, booking(1)).await.unwrap();

    let tx = m
        .settlement
        .process_payment(client, r.id, "card")
        .await
        .unwrap();

    assert_eq!(tx.amount, dec!(60.00));
    assert_eq!(tx.status, PaymentStatus::Succeeded);
    assert_eq!(tx.reservation, r.id);
    assert_eq!(tx.payment_method, "card");
    assert!(tx.reference.starts_with("TXN-"));

    let confirmed = m.backend.get(r.id).await.unwrap().unwrap();
    assert_eq!(confirmed.status, ReservationStatus::Confirmed);
}

#[tokio::test]
async fn test_payment_restricted_to_owning_client() {
    let m = market();
    seed_offer(&m, 1, 20, dec!(60.00), true).await;
    let r = m
        .reservations
        .create(Principal::client(10), booking(1))
        .await
        .unwrap();

    let err = m
        .settlement
        .process_payment(Principal::client(11), r.id, "card")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Forbidden(_)));
    assert!(m.backend.for_reservation(r.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_payment_unknown_reservation() {
    let m = market();
    let err = m
        .settlement
        .process_payment(Principal::client(10), 404, "card")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));
}

#[tokio::test]
async fn test_double_payment_conflicts_and_leaves_state_untouched() {
    let m = market();
    seed_offer(&m, 1, 20, dec!(60.00), true).await;
    let client = Principal::client(10);
    let r = m.reservations.create(client, booking(1)).await.unwrap();

    let original = m
        .settlement
        .process_payment(client, r.id, "card")
        .await
        .unwrap();

    let err = m
        .settlement
        .process_payment(client, r.id, "transfer")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Conflict(_)));

    // Exactly the original transaction remains and the reservation status
    // was not rewritten.
    let kept = m.backend.for_reservation(r.id).await.unwrap().unwrap();
    assert_eq!(kept, original);
    let reservation = m.backend.get(r.id).await.unwrap().unwrap();
    assert_eq!(reservation.status, ReservationStatus::Confirmed);

    // The provider was credited exactly once.
    assert_eq!(m.reports.provider_balance(20).await.unwrap(), dec!(60.00));
}

#[tokio::test]
async fn test_settlement_forces_confirmed_from_any_status() {
    let m = market();
    seed_offer(&m, 1, 20, dec!(60.00), true).await;
    let client = Principal::client(10);
    let r = m.reservations.create(client, booking(1)).await.unwrap();
    m.reservations
        .set_status(Principal::provider(20), r.id, ReservationStatus::InProgress)
        .await
        .unwrap();

    m.settlement
        .process_payment(client, r.id, "card")
        .await
        .unwrap();

    let reservation = m.backend.get(r.id).await.unwrap().unwrap();
    assert_eq!(reservation.status, ReservationStatus::Confirmed);
}

#[tokio::test]
async fn test_settlement_policy_can_keep_status() {
    let m = market_with_policy(SettlementPolicy {
        force_confirmed: false,
    });
    seed_offer(&m, 1, 20, dec!(60.00), true).await;
    let client = Principal::client(10);
    let r = m.reservations.create(client, booking(1)).await.unwrap();

    m.settlement
        .process_payment(client, r.id, "card")
        .await
        .unwrap();

    let reservation = m.backend.get(r.id).await.unwrap().unwrap();
    assert_eq!(reservation.status, ReservationStatus::Pending);
}

#[tokio::test]
async fn test_concurrent_payments_settle_exactly_once() {
    let m = market();
    seed_offer(&m, 1, 20, dec!(60.00), true).await;
    let client = Principal::client(10);
    let r = m.reservations.create(client, booking(1)).await.unwrap();

    let settlement = Arc::new(m.settlement.clone());
    let mut handles = Vec::new();
    for _ in 0..8 {
        let settlement = Arc::clone(&settlement);
        handles.push(tokio::spawn(async move {
            settlement.process_payment(client, r.id, "card").await
        }));
    }

    let mut successes = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(CoreError::Conflict(_)) => conflicts += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 7);
    assert_eq!(m.reports.provider_balance(20).await.unwrap(), dec!(60.00));
    assert_eq!(
        m.backend
            .count_with_status(PaymentStatus::Succeeded)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_list_mine_transactions_by_role() {
    let m = market();
    seed_offer(&m, 1, 20, dec!(60.00), true).await;
    seed_offer(&m, 2, 21, dec!(40.00), true).await;
    let client = Principal::client(10);

    let a = m.reservations.create(client, booking(1)).await.unwrap();
    let b = m.reservations.create(client, booking(2)).await.unwrap();
    m.settlement.process_payment(client, a.id, "card").await.unwrap();
    m.settlement.process_payment(client, b.id, "card").await.unwrap();

    let mine = m.settlement.list_mine(client).await.unwrap();
    assert_eq!(mine.len(), 2);

    let provider_view = m
        .settlement
        .list_mine(Principal::provider(20))
        .await
        .unwrap();
    assert_eq!(provider_view.len(), 1);
    assert_eq!(provider_view[0].reservation, a.id);

    let all = m.settlement.list_all(Principal::admin(1)).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(matches!(
        m.settlement.list_all(client).await,
        Err(CoreError::Forbidden(_))
    ));
}

#[tokio::test]
async fn test_provider_reads_own_balance() {
    let m = market();
    seed_offer(&m, 1, 20, dec!(60.00), true).await;
    let client = Principal::client(10);
    let r = m.reservations.create(client, booking(1)).await.unwrap();
    m.settlement.process_payment(client, r.id, "card").await.unwrap();

    assert_eq!(
        m.settlement.my_balance(Principal::provider(20)).await.unwrap(),
        dec!(60.00)
    );
    assert!(matches!(
        m.settlement.my_balance(client).await,
        Err(CoreError::Forbidden(_))
    ));
}
