//! Encrypted SQLite venue source
//!
//! The fallback database is a normal SQLite file sealed as one
//! `nonce ‖ ciphertext ‖ tag` blob under the at-rest key. Opening it means
//! decrypting the blob into a scratch file, querying the `venues` table
//! read-only, and letting RAII delete the plaintext scratch file on every
//! exit path.

use std::io::Write;
use std::path::Path;

use rusqlite::{Connection, OpenFlags};
use tracing::warn;

use crate::crypto::EncryptionContext;
use crate::error::{VenueError, VenueResult};
use crate::models::Venue;
use crate::repository::LoadOutcome;

/// Query used against the fallback database
const VENUE_QUERY: &str =
    "SELECT name, email, country, state, city, capacity, genre FROM venues";

/// Load venues from the encrypted database file
pub fn load_database(path: &Path, ctx: &EncryptionContext) -> VenueResult<LoadOutcome> {
    let sealed = std::fs::read(path)
        .map_err(|e| VenueError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    let plaintext = ctx.open(&sealed)?;

    // Plaintext lives in a scratch file only as long as this function runs
    let mut scratch = tempfile::NamedTempFile::new()
        .map_err(|e| VenueError::Io(format!("Failed to create scratch file: {}", e)))?;
    scratch
        .write_all(&plaintext)
        .map_err(|e| VenueError::Io(format!("Failed to write scratch file: {}", e)))?;
    scratch
        .flush()
        .map_err(|e| VenueError::Io(format!("Failed to flush scratch file: {}", e)))?;

    let outcome = query_venues(scratch.path())?;
    Ok(outcome)
}

/// Query the `venues` table of a plaintext SQLite file
pub fn query_venues(path: &Path) -> VenueResult<LoadOutcome> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(|e| VenueError::DatabaseUnavailable(format!("Failed to open database: {}", e)))?;

    let mut stmt = conn
        .prepare(VENUE_QUERY)
        .map_err(|e| VenueError::DatabaseUnavailable(format!("Failed to query venues: {}", e)))?;

    let mut outcome = LoadOutcome::default();
    let mut rows = stmt
        .query([])
        .map_err(|e| VenueError::DatabaseUnavailable(format!("Failed to query venues: {}", e)))?;

    let mut row_number = 0usize;
    loop {
        let row = match rows.next() {
            Ok(Some(row)) => row,
            Ok(None) => break,
            Err(e) => {
                return Err(VenueError::DatabaseUnavailable(format!(
                    "Failed to read venue rows: {}",
                    e
                )))
            }
        };
        row_number += 1;

        match parse_row(row) {
            Ok(venue) => outcome.venues.push(venue),
            Err(e) => {
                let err = VenueError::DataFormat(format!("database row {}: {}", row_number, e));
                warn!("skipping venue row: {}", err);
                outcome.skip(err);
            }
        }
    }

    Ok(outcome)
}

fn parse_row(row: &rusqlite::Row<'_>) -> Result<Venue, rusqlite::Error> {
    Ok(Venue {
        name: row.get(0)?,
        email: row.get(1)?,
        country: row.get(2)?,
        state: row.get(3)?,
        city: row.get(4)?,
        capacity: row.get(5)?,
        genre: row.get(6)?,
    })
}
