// ⚠️ Error Types
// Typed failures for the ledger and its stores

use crate::model::SizeClass;
use thiserror::Error;

/// Errors raised by a [`ParkingStore`](crate::store::ParkingStore) backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to encode or decode stored value: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Errors that abort a ledger operation.
///
/// Every variant is raised before anything is written back to the store,
/// so a failed operation never leaves the map or registry half-updated.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Missing or malformed map, vehicle spec, or id.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation needs state that has not been set up yet.
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("no vehicle with id {0}")]
    NotFound(u64),

    #[error("no available slot for size class {size}")]
    NoAvailableSlot { size: SizeClass },

    /// Stored state contradicts itself, e.g. `parkedAt` points outside the map.
    #[error("inconsistent ledger state: {0}")]
    Inconsistent(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = LedgerError::NoAvailableSlot { size: SizeClass::Large };
        assert_eq!(err.to_string(), "no available slot for size class 2");

        let err = LedgerError::NotFound(7);
        assert_eq!(err.to_string(), "no vehicle with id 7");
    }

    #[test]
    fn test_store_error_converts() {
        let json_err = serde_json::from_str::<u8>("nope").unwrap_err();
        let err: LedgerError = StoreError::from(json_err).into();
        assert!(matches!(err, LedgerError::Storage(StoreError::Serde(_))));
    }
}
