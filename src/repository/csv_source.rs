//! CSV venue source
//!
//! The flat file has a header line and seven comma-separated fields per row:
//! name, email, country, state, city, capacity, genre. Malformed rows (wrong
//! field count, non-numeric capacity) are skipped and reported; they never
//! abort the load.

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::warn;

use crate::error::{VenueError, VenueResult};
use crate::models::Venue;
use crate::repository::LoadOutcome;

/// Number of fields in a well-formed venue row
pub const FIELD_COUNT: usize = 7;

/// Load venues from a CSV file
pub fn load_csv(path: &Path) -> VenueResult<LoadOutcome> {
    let file = std::fs::File::open(path)
        .map_err(|e| VenueError::Io(format!("Failed to open {}: {}", path.display(), e)))?;
    read_venues(file)
}

/// Parse venues from any reader (the first line is treated as a header)
pub fn read_venues<R: Read>(reader: R) -> VenueResult<LoadOutcome> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut outcome = LoadOutcome::default();
    for (idx, result) in csv_reader.records().enumerate() {
        // Row numbers are 1-based and count the header
        let row = idx + 2;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                outcome.skip(data_error(row, &e.to_string()));
                continue;
            }
        };

        match parse_record(&record, row) {
            Ok(venue) => outcome.venues.push(venue),
            Err(e) => outcome.skip(e),
        }
    }

    Ok(outcome)
}

fn parse_record(record: &csv::StringRecord, row: usize) -> VenueResult<Venue> {
    if record.len() != FIELD_COUNT {
        return Err(data_error(
            row,
            &format!("expected {} fields, got {}", FIELD_COUNT, record.len()),
        ));
    }

    let field = |i: usize| record.get(i).unwrap_or("").trim().to_string();

    let capacity_str = field(5);
    let capacity: i64 = capacity_str
        .parse()
        .map_err(|_| data_error(row, &format!("non-numeric capacity '{}'", capacity_str)))?;

    Ok(Venue {
        name: field(0),
        email: field(1),
        country: field(2),
        state: field(3),
        city: field(4),
        capacity,
        genre: field(6),
    })
}

fn data_error(row: usize, detail: &str) -> VenueError {
    let err = VenueError::DataFormat(format!("row {}: {}", row, detail));
    warn!("skipping venue row: {}", err);
    err
}
