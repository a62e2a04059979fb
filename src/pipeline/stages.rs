//! Filter pipeline stages
//!
//! Each stage narrows the working set `W`. Stages are pure over their inputs
//! apart from console I/O: re-running a stage with the same `W` and the same
//! answer yields the same narrowed set.
//!
//! The attribute-stage union deliberately does not de-duplicate across index
//! passes: a repeated index in one line appends its matching rows again.
//! This mirrors the tool's long-standing observed behavior.

use std::io::{BufRead, Write};

use crate::error::{VenueError, VenueResult};
use crate::models::{distinct_values, Venue, VenueAttribute};
use crate::pipeline::input::{parse_index, parse_selection, read_line, Selection};

/// Run the mandatory country stage, narrowing to one country
///
/// Distinct countries are shown in first-seen order, capped at
/// `max_displayed`. Loops until a single valid index is entered; there is no
/// escape, since a loaded venue list always has at least one country.
pub fn country_stage<R: BufRead, W: Write>(
    working: &[Venue],
    max_displayed: usize,
    input: &mut R,
    out: &mut W,
) -> VenueResult<Vec<Venue>> {
    loop {
        let countries = distinct_values(VenueAttribute::Country, working);
        let shown = countries.len().min(max_displayed);

        writeln!(out, "\nAvailable countries:")?;
        for (i, country) in countries.iter().take(shown).enumerate() {
            writeln!(out, "  {}. {}", i + 1, country)?;
        }
        write!(out, "Select a country: ")?;
        out.flush()?;

        let line = read_line(input)?;
        match parse_index(&line, shown) {
            Ok(index) => {
                let chosen = &countries[index - 1];
                return Ok(working
                    .iter()
                    .filter(|v| VenueAttribute::Country.value_of(v) == *chosen)
                    .cloned()
                    .collect());
            }
            Err(e) if e.is_interactive() => {
                writeln!(out, "{}", e)?;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Run one attribute stage (state, city, capacity, or genre)
///
/// Accepts `all` (keep `W` unchanged) or a comma-separated index list. The
/// stage result is the union of matches per selected index, in index order,
/// without cross-index de-duplication. An empty result re-prompts the stage
/// from scratch.
pub fn attribute_stage<R: BufRead, W: Write>(
    attribute: VenueAttribute,
    working: &[Venue],
    input: &mut R,
    out: &mut W,
) -> VenueResult<Vec<Venue>> {
    loop {
        let values = distinct_values(attribute, working);

        writeln!(out, "\nAvailable {} options:", attribute)?;
        for (i, value) in values.iter().enumerate() {
            writeln!(out, "  {}. {}", i + 1, value)?;
        }
        write!(
            out,
            "Select {} (comma-separated numbers, or 'all'): ",
            attribute
        )?;
        out.flush()?;

        let line = read_line(input)?;
        let selection = match parse_selection(&line, values.len()) {
            Ok(selection) => selection,
            Err(e) if e.is_interactive() => {
                writeln!(out, "{}", e)?;
                continue;
            }
            Err(e) => return Err(e),
        };

        let narrowed = match selection {
            Selection::All => working.to_vec(),
            Selection::Indices(indices) => {
                let mut buffer = Vec::new();
                for index in indices {
                    let chosen = &values[index - 1];
                    buffer.extend(
                        working
                            .iter()
                            .filter(|v| attribute.value_of(v) == *chosen)
                            .cloned(),
                    );
                }
                buffer
            }
        };

        if narrowed.is_empty() {
            writeln!(out, "No venues matched; try again.")?;
            continue;
        }
        return Ok(narrowed);
    }
}

/// Run the final manual pick over the fully narrowed working set
///
/// The whole input line is range-validated before anything commits, so an
/// out-of-range index restarts selection without side effects. Committing
/// checks each resolved venue against the session's already-selected list by
/// identity tuple; duplicates are reported and skipped, the rest of the line
/// still commits. Returns the number of venues appended.
pub fn final_stage<R: BufRead, W: Write>(
    working: &[Venue],
    selected: &mut Vec<Venue>,
    input: &mut R,
    out: &mut W,
) -> VenueResult<usize> {
    loop {
        writeln!(out, "\nMatching venues:")?;
        for (i, venue) in working.iter().enumerate() {
            writeln!(out, "  {}. {}", i + 1, venue)?;
        }
        write!(
            out,
            "Select venues to email (comma-separated numbers, or 'all'): "
        )?;
        out.flush()?;

        let line = read_line(input)?;
        let selection = match parse_selection(&line, working.len()) {
            Ok(selection) => selection,
            Err(e) if e.is_interactive() => {
                writeln!(out, "{}", e)?;
                continue;
            }
            Err(e) => return Err(e),
        };

        let indices: Vec<usize> = match selection {
            Selection::All => (1..=working.len()).collect(),
            Selection::Indices(indices) => indices,
        };

        let mut added = 0;
        for index in indices {
            let candidate = &working[index - 1];
            if selected.iter().any(|s| s.same_venue(candidate)) {
                let err = VenueError::AlreadySelected {
                    venue: candidate.to_string(),
                };
                writeln!(out, "{}", err)?;
                continue;
            }
            selected.push(candidate.clone());
            added += 1;
        }
        return Ok(added);
    }
}
