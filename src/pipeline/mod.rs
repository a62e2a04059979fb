//! Venue filter/selection pipeline
//!
//! Successive-refinement filtering over the loaded venue list: a mandatory
//! country stage, then state, city, capacity, and genre stages in fixed
//! order, then a final manual pick. Each run starts from a fresh working set
//! copied from the full list; filter state never leaks between runs.
//!
//! The invariant through every stage is `selected ⊆ W ⊆ all venues` (up to
//! the deliberate same-stage duplicate adds documented in [`stages`]).

pub mod input;
pub mod stages;

use std::io::{BufRead, Write};

use tracing::info;

pub use input::{parse_index, parse_selection, read_line, Selection};
pub use stages::{attribute_stage, country_stage, final_stage};

use crate::error::VenueResult;
use crate::models::{Venue, VenueAttribute};

/// One interactive selection run over the full venue list
#[derive(Debug, Clone)]
pub struct SelectionPipeline {
    /// Maximum entries shown in the country menu
    pub max_displayed: usize,
}

impl SelectionPipeline {
    /// Create a pipeline with the configured country-menu cap
    pub fn new(max_displayed: usize) -> Self {
        Self { max_displayed }
    }

    /// Run the full pipeline, appending picks to `selected`
    ///
    /// Returns the number of venues added in this run.
    pub fn run<R: BufRead, W: Write>(
        &self,
        venues: &[Venue],
        selected: &mut Vec<Venue>,
        input: &mut R,
        out: &mut W,
    ) -> VenueResult<usize> {
        // Fresh working set per run
        let mut working = country_stage(venues, self.max_displayed, input, out)?;

        for attribute in VenueAttribute::STAGE_ORDER {
            working = attribute_stage(attribute, &working, input, out)?;
        }

        let added = final_stage(&working, selected, input, out)?;
        info!(added, total = selected.len(), "selection run finished");
        Ok(added)
    }
}
