use clap::Parser;
use homeserve::application::reservations::{NewReservation, Reservations};
use homeserve::application::settlement::{Settlement, SettlementPolicy};
use homeserve::application::stats::Reports;
use homeserve::domain::offer::ProviderOffer;
use homeserve::domain::ports::{
    OfferDirectoryRef, ReservationStoreRef, SettlementUnitRef, TransactionStoreRef,
};
use homeserve::domain::principal::Principal;
use homeserve::error::CoreError;
use homeserve::infrastructure::in_memory::InMemoryBackend;
use homeserve::interfaces::csv::report_writer::ReportWriter;
use homeserve::interfaces::csv::request_reader::{Op, ScenarioReader, ScenarioRow};
use miette::{IntoDiagnostic, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Scenario CSV file of catalog seeds and marketplace requests
    scenario: PathBuf,

    /// Keep the reservation status unchanged on settlement instead of
    /// forcing it to `confirmed`
    #[arg(long)]
    no_confirm_on_settle: bool,

    /// Emit the report as JSON instead of CSV
    #[arg(long)]
    json: bool,
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("homeserve=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr)
                .compact(),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let backend = InMemoryBackend::new();
    let offers: OfferDirectoryRef = Arc::new(backend.clone());
    let reservations_store: ReservationStoreRef = Arc::new(backend.clone());
    let transactions_store: TransactionStoreRef = Arc::new(backend.clone());
    let unit: SettlementUnitRef = Arc::new(backend.clone());

    let reservations = Reservations::new(offers.clone(), reservations_store.clone());
    let settlement = Settlement::new(
        offers,
        reservations_store.clone(),
        transactions_store.clone(),
        unit,
        SettlementPolicy {
            force_confirmed: !cli.no_confirm_on_settle,
        },
    );
    let reports = Reports::new(reservations_store, transactions_store);

    let file = File::open(&cli.scenario).into_diagnostic()?;
    let mut providers = BTreeSet::new();
    for row in ScenarioReader::new(file).rows() {
        match row {
            Ok(row) => {
                if let (Op::Offer, Some(provider)) = (row.op, row.provider) {
                    providers.insert(provider);
                }
                if let Err(e) = apply(&backend, &reservations, &settlement, row).await {
                    warn!("request rejected: {e}");
                }
            }
            Err(e) => warn!("skipping malformed row: {e}"),
        }
    }

    let stats = reports.admin_stats().await.into_diagnostic()?;
    let mut balances = Vec::new();
    for provider in providers {
        let balance = reports
            .provider_balance(provider)
            .await
            .into_diagnostic()?;
        balances.push((provider, balance));
    }

    if cli.json {
        let balances: BTreeMap<String, _> = balances
            .into_iter()
            .map(|(provider, balance)| (provider.to_string(), balance))
            .collect();
        let report = serde_json::json!({ "stats": stats, "provider_balances": balances });
        println!(
            "{}",
            serde_json::to_string_pretty(&report).into_diagnostic()?
        );
    } else {
        let stdout = io::stdout();
        let mut writer = ReportWriter::new(stdout.lock());
        writer.write_report(&stats, &balances).into_diagnostic()?;
    }

    Ok(())
}

async fn apply(
    backend: &InMemoryBackend,
    reservations: &Reservations,
    settlement: &Settlement,
    row: ScenarioRow,
) -> std::result::Result<(), CoreError> {
    let missing = |field: &str| CoreError::Validation(format!("{field} is required"));

    match row.op {
        Op::Offer => {
            backend
                .put_offer(ProviderOffer {
                    id: row.offer.ok_or_else(|| missing("offer"))?,
                    provider: row.provider.ok_or_else(|| missing("provider"))?,
                    service: row.service.unwrap_or_default(),
                    price: row.price.ok_or_else(|| missing("price"))?,
                    available: row.available.unwrap_or(true),
                })
                .await;
        }
        Op::Client => {
            backend
                .put_client_address(
                    row.actor.ok_or_else(|| missing("actor"))?,
                    &row.address.ok_or_else(|| missing("address"))?,
                )
                .await;
        }
        Op::Book => {
            let client = Principal::client(row.actor.ok_or_else(|| missing("actor"))?);
            reservations
                .create(
                    client,
                    NewReservation {
                        offer: row.offer.ok_or_else(|| missing("offer"))?,
                        scheduled_at: row.scheduled_at,
                        notes: row.notes,
                        address: row.address,
                    },
                )
                .await?;
        }
        Op::Pay => {
            let client = Principal::client(row.actor.ok_or_else(|| missing("actor"))?);
            settlement
                .process_payment(
                    client,
                    row.reservation.ok_or_else(|| missing("reservation"))?,
                    row.method.as_deref().unwrap_or("card"),
                )
                .await?;
        }
        Op::Status => {
            let provider = Principal::provider(row.actor.ok_or_else(|| missing("actor"))?);
            reservations
                .set_status(
                    provider,
                    row.reservation.ok_or_else(|| missing("reservation"))?,
                    row.status.ok_or_else(|| missing("status"))?,
                )
                .await?;
        }
        Op::Cancel => {
            let client = Principal::client(row.actor.ok_or_else(|| missing("actor"))?);
            reservations
                .cancel(
                    client,
                    row.reservation.ok_or_else(|| missing("reservation"))?,
                )
                .await?;
        }
    }
    Ok(())
}
