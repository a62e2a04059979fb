//! Filterable venue attributes
//!
//! Each filter stage of the selection pipeline is parameterized by one
//! [`VenueAttribute`]. Value extraction goes through a `match` so that
//! capacity stays an integer end to end; it is only rendered as text at the
//! display boundary.

use std::fmt;

use crate::models::Venue;

/// An attribute of a venue that a filter stage can narrow on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VenueAttribute {
    /// Country (first, mandatory stage)
    Country,
    /// State or province
    State,
    /// City
    City,
    /// Room capacity
    Capacity,
    /// Primary genre
    Genre,
}

impl VenueAttribute {
    /// The fixed stage order after the country stage
    pub const STAGE_ORDER: [VenueAttribute; 4] = [
        VenueAttribute::State,
        VenueAttribute::City,
        VenueAttribute::Capacity,
        VenueAttribute::Genre,
    ];

    /// Extract this attribute's value from a venue
    pub fn value_of(self, venue: &Venue) -> AttributeValue {
        match self {
            VenueAttribute::Country => AttributeValue::Text(venue.country.clone()),
            VenueAttribute::State => AttributeValue::Text(venue.state.clone()),
            VenueAttribute::City => AttributeValue::Text(venue.city.clone()),
            VenueAttribute::Capacity => AttributeValue::Capacity(venue.capacity),
            VenueAttribute::Genre => AttributeValue::Text(venue.genre.clone()),
        }
    }

    /// Human-readable label for prompts
    pub fn label(self) -> &'static str {
        match self {
            VenueAttribute::Country => "country",
            VenueAttribute::State => "state",
            VenueAttribute::City => "city",
            VenueAttribute::Capacity => "capacity",
            VenueAttribute::Genre => "genre",
        }
    }
}

impl fmt::Display for VenueAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single attribute value
///
/// Text values compare with exact case-sensitive equality; capacities compare
/// as integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeValue {
    /// A string-valued attribute (country, state, city, genre)
    Text(String),
    /// Room capacity
    Capacity(i64),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Text(s) => f.write_str(s),
            AttributeValue::Capacity(c) => write!(f, "{}", c),
        }
    }
}

/// Distinct values of an attribute across a venue slice, in first-seen order
///
/// First-seen order is the documented enumeration order for every menu the
/// pipeline shows, which keeps index numbering stable across re-prompts of
/// the same working set.
pub fn distinct_values(attribute: VenueAttribute, venues: &[Venue]) -> Vec<AttributeValue> {
    let mut seen = Vec::new();
    for venue in venues {
        let value = attribute.value_of(venue);
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}
