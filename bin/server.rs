// Parking Ledger - Web Server
// REST API with Axum over a SQLite-backed ledger

use anyhow::{Context, Result};
use parking_ledger::{api, init_tracing, FeeCalculator, LedgerConfig, ParkingLedger, SqliteStore};
use tracing::info;

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = LedgerConfig::from_env()?;
    let schedule = config.fee_schedule()?;

    let store = SqliteStore::open(&config.db_path)
        .with_context(|| format!("Failed to open database {:?}", config.db_path))?;

    let ledger = ParkingLedger::new(store, FeeCalculator::new(schedule));
    info!(
        db = ?config.db_path,
        unit_seconds = ledger.fees().schedule().unit_seconds,
        "database opened"
    );
    let app = api::router(ledger);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "server running");

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
