//! Terminal display formatting
//!
//! Formats venue lists and settings for terminal output.

use crate::config::Settings;
use crate::models::Venue;

/// Format the selected venues as a table
pub fn format_venue_list(venues: &[Venue]) -> String {
    if venues.is_empty() {
        return "No venues selected.".to_string();
    }

    let name_width = venues
        .iter()
        .map(|v| v.name.len())
        .max()
        .unwrap_or(4)
        .max(4);
    let city_width = venues
        .iter()
        .map(|v| v.city.len())
        .max()
        .unwrap_or(4)
        .max(4);
    let email_width = venues
        .iter()
        .map(|v| v.email.len())
        .max()
        .unwrap_or(5)
        .max(5);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<5}  {:<city_width$}  {:>8}  {:<email_width$}\n",
        "Name",
        "State",
        "City",
        "Capacity",
        "Email",
        name_width = name_width,
        city_width = city_width,
        email_width = email_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<5}  {:-<city_width$}  {:->8}  {:-<email_width$}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
        city_width = city_width,
        email_width = email_width,
    ));

    for venue in venues {
        output.push_str(&format!(
            "{:<name_width$}  {:<5}  {:<city_width$}  {:>8}  {:<email_width$}\n",
            venue.name,
            venue.state,
            venue.city,
            venue.capacity,
            venue.email,
            name_width = name_width,
            city_width = city_width,
            email_width = email_width,
        ));
    }

    output.push_str(&format!("\n{} venue(s) selected.\n", venues.len()));
    output
}

/// Format the active settings (no secrets)
pub fn format_settings(settings: &Settings) -> String {
    let mut output = String::new();
    output.push_str("VenueSender Configuration\n");
    output.push_str("=========================\n");
    output.push_str(&format!("SMTP server:   {}:{}\n", settings.smtp.server, settings.smtp.port));
    output.push_str(&format!("SMTP username: {}\n", settings.smtp.username));
    output.push_str(&format!(
        "TLS:           {} (verify peer: {}, verify host: {})\n",
        if settings.smtp.use_ssl { "implicit" } else { "STARTTLS" },
        settings.smtp.verify_peer,
        settings.smtp.verify_host,
    ));
    output.push_str(&format!("Sender email:  {}\n", settings.sender_email));
    output.push_str(&format!("Venues CSV:    {}\n", settings.venues_csv.display()));
    match &settings.venues_db {
        Some(path) => output.push_str(&format!("Venues DB:     {}\n", path.display())),
        None => output.push_str("Venues DB:     (none)\n"),
    }
    output
}
