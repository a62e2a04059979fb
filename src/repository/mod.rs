//! Venue loading with CSV-first fallback
//!
//! The CSV file is the preferred source. If it is absent, unreadable, or
//! holds no venues, the encrypted SQLite database is tried instead. Only
//! when both sources fail does startup abort.

pub mod csv_source;
pub mod db_source;

use std::path::Path;

use tracing::{info, warn};

pub use csv_source::{load_csv, read_venues};
pub use db_source::{load_database, query_venues};

use crate::crypto::EncryptionContext;
use crate::error::{VenueError, VenueResult};
use crate::models::Venue;

/// Result of loading one venue source
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Well-formed venues, in source order
    pub venues: Vec<Venue>,
    /// Per-row errors for skipped rows
    pub skipped: Vec<VenueError>,
}

impl LoadOutcome {
    /// Record a skipped row
    pub fn skip(&mut self, err: VenueError) {
        self.skipped.push(err);
    }
}

/// Load venues, preferring the CSV file and falling back to the database
///
/// `db` carries the fallback database path and its at-rest encryption
/// context, when configured.
///
/// # Errors
///
/// Returns [`VenueError::DatabaseUnavailable`] when neither source yields
/// any venues.
pub fn load_venues(
    csv_path: &Path,
    db: Option<(&Path, &EncryptionContext)>,
) -> VenueResult<LoadOutcome> {
    let csv_failure = match load_csv(csv_path) {
        Ok(outcome) if !outcome.venues.is_empty() => {
            info!(
                count = outcome.venues.len(),
                skipped = outcome.skipped.len(),
                "loaded venues from CSV"
            );
            return Ok(outcome);
        }
        Ok(_) => format!("{} holds no venues", csv_path.display()),
        Err(e) => e.to_string(),
    };
    warn!("CSV source unavailable: {}", csv_failure);

    let Some((db_path, ctx)) = db else {
        return Err(VenueError::DatabaseUnavailable(format!(
            "CSV failed ({}) and no database fallback is configured",
            csv_failure
        )));
    };

    match load_database(db_path, ctx) {
        Ok(outcome) if !outcome.venues.is_empty() => {
            info!(
                count = outcome.venues.len(),
                skipped = outcome.skipped.len(),
                "loaded venues from database"
            );
            Ok(outcome)
        }
        Ok(_) => Err(VenueError::DatabaseUnavailable(format!(
            "CSV failed ({}) and the database holds no venues",
            csv_failure
        ))),
        Err(e) => Err(VenueError::DatabaseUnavailable(format!(
            "CSV failed ({}) and the database failed ({})",
            csv_failure, e
        ))),
    }
}
