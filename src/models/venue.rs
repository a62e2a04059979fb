//! The venue record and its identity tuple
//!
//! Venues are loaded once at startup and are immutable thereafter. Identity
//! for de-duplication purposes is the (name, state, city, capacity) tuple,
//! not the full record, so two listings of the same room under different
//! genres still count as one venue.

use std::fmt;
use std::str::FromStr;

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

/// One bookable venue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    /// Venue name
    pub name: String,
    /// Booking contact address
    pub email: String,
    /// Country
    pub country: String,
    /// State or province
    pub state: String,
    /// City
    pub city: String,
    /// Room capacity
    pub capacity: i64,
    /// Primary genre booked ("all" for no restriction)
    pub genre: String,
}

impl Venue {
    /// The identity tuple used to detect an already-selected venue
    pub fn identity(&self) -> VenueIdentity<'_> {
        VenueIdentity {
            name: &self.name,
            state: &self.state,
            city: &self.city,
            capacity: self.capacity,
        }
    }

    /// Whether this venue denotes the same room as another
    pub fn same_venue(&self, other: &Venue) -> bool {
        self.identity() == other.identity()
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}, capacity {})",
            self.name, self.state, self.city, self.capacity
        )
    }
}

/// Borrowed identity tuple of a venue
///
/// Comparison is exact and case-sensitive for the string fields; capacity is
/// compared as an integer, never as a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VenueIdentity<'a> {
    /// Venue name
    pub name: &'a str,
    /// State or province
    pub state: &'a str,
    /// City
    pub city: &'a str,
    /// Room capacity
    pub capacity: i64,
}

/// Check whether a string is a syntactically valid email address
pub fn is_valid_email(address: &str) -> bool {
    EmailAddress::from_str(address).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venue(name: &str, state: &str, city: &str, capacity: i64) -> Venue {
        Venue {
            name: name.to_string(),
            email: format!("{}@mock.com", name.to_lowercase()),
            country: "US".to_string(),
            state: state.to_string(),
            city: city.to_string(),
            capacity,
            genre: "all".to_string(),
        }
    }

    #[test]
    fn test_identity_ignores_email_and_genre() {
        let mut a = venue("Venue1", "AL", "Daphne", 100);
        let mut b = venue("Venue1", "AL", "Daphne", 100);
        a.email = "one@mock.com".to_string();
        b.email = "two@mock.com".to_string();
        a.genre = "rock".to_string();
        b.genre = "jazz".to_string();
        assert!(a.same_venue(&b));
    }

    #[test]
    fn test_identity_capacity_is_numeric() {
        let a = venue("Venue1", "AL", "Daphne", 100);
        let b = venue("Venue1", "AL", "Daphne", 1000);
        assert!(!a.same_venue(&b));
    }

    #[test]
    fn test_identity_case_sensitive() {
        let a = venue("Venue1", "AL", "Daphne", 100);
        let b = venue("venue1", "AL", "Daphne", 100);
        assert!(!a.same_venue(&b));
    }

    #[test]
    fn test_display_format() {
        let v = venue("Venue1", "AL", "Daphne", 100);
        assert_eq!(v.to_string(), "Venue1 (AL, Daphne, capacity 100)");
    }

    #[test]
    fn test_valid_email() {
        assert!(is_valid_email("user@example.com"));
    }

    #[test]
    fn test_invalid_email() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("user@"));
    }
}
