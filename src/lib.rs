// Parking Ledger - Core Library
// Exposes the allocation-and-billing engine for the CLI, API server, and tests

pub mod model;
pub mod error;
pub mod slots;   // Nearest-slot search
pub mod fees;    // Tiered billing
pub mod store;   // Storage collaborator trait + in-memory backend
pub mod db;      // SQLite backend
pub mod ledger;  // Vehicle lifecycle
pub mod config;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use model::{
    ParkingMap, Slot, SlotCoord, SizeClass, Vehicle, VehicleStatus, NewVehicle,
    EntranceOccupancy, MIN_ENTRANCES,
};
pub use error::{LedgerError, LedgerResult, StoreError};
pub use slots::{find_nearest, SlotRef};
pub use fees::{Charge, FeeCalculator, FeeSchedule, PRODUCTION_UNIT_SECONDS};
pub use store::{Event, MemoryStore, ParkingStore};
pub use db::{setup_database, SqliteStore};
pub use ledger::{ParkOutcome, ParkRequest, ParkingLedger, Receipt, UnparkOutcome};
pub use config::LedgerConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the tracing subscriber used by the binaries.
///
/// Honors `RUST_LOG`; defaults to `info`. Logs go to stderr so CLI output stays clean.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
