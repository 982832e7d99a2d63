use crate::application::stats::AdminStats;
use crate::domain::principal::UserId;
use crate::error::Result;
use rust_decimal::Decimal;
use std::io::Write;

/// Writes the end-of-run marketplace report as a two-column `metric,value`
/// CSV: the admin counters followed by one `provider_balance_<id>` row per
/// provider.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_report(
        &mut self,
        stats: &AdminStats,
        balances: &[(UserId, Decimal)],
    ) -> Result<()> {
        self.writer.write_record(["metric", "value"])?;
        self.writer.write_record([
            "reservations_total",
            &stats.total_reservations.to_string(),
        ])?;
        self.writer.write_record([
            "reservations_pending",
            &stats.pending_reservations.to_string(),
        ])?;
        self.writer.write_record([
            "reservations_completed",
            &stats.completed_reservations.to_string(),
        ])?;
        self.writer.write_record([
            "reservations_today",
            &stats.today_reservations.to_string(),
        ])?;
        self.writer.write_record([
            "transactions_succeeded",
            &stats.succeeded_transactions.to_string(),
        ])?;
        self.writer
            .write_record(["revenue_total", &stats.total_revenue.to_string()])?;
        for (provider, balance) in balances {
            self.writer.write_record([
                format!("provider_balance_{provider}"),
                balance.to_string(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
