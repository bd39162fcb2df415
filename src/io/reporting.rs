// src/io/reporting.rs

use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::model::role::Role;
use crate::simulation::engine::RoundRecord;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// One CSV row: one team in one round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    pub round: u32,
    pub role: Role,
    pub customer_demand: u32,
    pub order_placed: u32,
    pub shipment_sent: u64,
    pub stock: u64,
    pub backlog: u64,
    pub round_cost: f64,
    pub total_cost: f64,
}

/// Flattens round records into per-team rows, chain order within a round.
pub fn history_rows(history: &[Arc<RoundRecord>]) -> Vec<HistoryRow> {
    history
        .iter()
        .flat_map(|record| {
            Role::ALL.into_iter().map(move |role| {
                let totals = record.team_state.get(&role).copied().unwrap_or_default();
                HistoryRow {
                    round: record.round,
                    role,
                    customer_demand: record.customer_demand,
                    order_placed: record.orders.get(&role).copied().unwrap_or_default(),
                    shipment_sent: record.deliveries.get(&role).copied().unwrap_or_default(),
                    stock: totals.stock,
                    backlog: totals.backlog,
                    round_cost: record.round_costs.get(&role).copied().unwrap_or_default(),
                    total_cost: totals.total_cost,
                }
            })
        })
        .collect()
}

/// Writes the history as CSV to any writer.
pub fn write_history<W: Write>(writer: W, history: &[Arc<RoundRecord>]) -> Result<usize, ReportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    let rows = history_rows(history);
    for row in &rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(rows.len())
}

/// Writes the history to a CSV file (e.g., "results/run_1.csv").
pub fn write_simulation_log(
    file_path: impl AsRef<Path>,
    history: &[Arc<RoundRecord>],
) -> Result<(), ReportError> {
    let path = file_path.as_ref();
    let file = std::fs::File::create(path)?;
    let rows = write_history(file, history)?;
    info!(rows, path = %path.display(), "history exported");
    Ok(())
}
