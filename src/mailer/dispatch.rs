//! Per-recipient dispatch loop
//!
//! Sends proceed in selection order, one blocking delivery at a time. A
//! failed delivery is reported and the loop continues to the next venue;
//! the aggregate outcome is returned explicitly rather than left to console
//! side effects.

use std::io::Write;

use tracing::{info, warn};

use crate::error::{VenueError, VenueResult};
use crate::mailer::transport::{build_message, MailTransport};
use crate::models::Venue;

/// The outcome of one delivery attempt
#[derive(Debug)]
pub struct DispatchOutcome {
    /// Venue name
    pub venue: String,
    /// Recipient address the message was built for
    pub recipient: String,
    /// Delivery result
    pub result: VenueResult<()>,
}

/// Aggregate result of a dispatch run
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// One outcome per selected venue, in selection order
    pub outcomes: Vec<DispatchOutcome>,
}

impl DispatchReport {
    /// Number of successful deliveries
    pub fn sent(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Number of failed deliveries
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.sent()
    }
}

/// Send one message to one venue; no retry
pub fn send_one<T: MailTransport + ?Sized>(
    transport: &T,
    venue: &Venue,
    sender: &str,
    subject: &str,
    body: &str,
) -> VenueResult<()> {
    let message = build_message(venue, sender, subject, body)?;
    transport.send(&message)
}

/// Send to every selected venue in list order, continuing past failures
pub fn send_all<T: MailTransport + ?Sized, W: Write>(
    transport: &T,
    venues: &[Venue],
    sender: &str,
    subject: &str,
    body: &str,
    out: &mut W,
) -> VenueResult<DispatchReport> {
    let total = venues.len();
    let mut report = DispatchReport::default();

    for (i, venue) in venues.iter().enumerate() {
        write!(out, "Sending {}/{} to {} <{}>... ", i + 1, total, venue.name, venue.email)?;
        out.flush()?;

        let result = send_one(transport, venue, sender, subject, body);
        match &result {
            Ok(()) => writeln!(out, "ok")?,
            Err(e) => {
                writeln!(out, "failed: {}", e)?;
                warn!(venue = %venue.name, recipient = %venue.email, "delivery failed: {}", e);
            }
        }

        report.outcomes.push(DispatchOutcome {
            venue: venue.name.clone(),
            recipient: venue.email.clone(),
            result,
        });
    }

    writeln!(
        out,
        "Dispatch complete: {} sent, {} failed.",
        report.sent(),
        report.failed()
    )?;
    info!(sent = report.sent(), failed = report.failed(), "dispatch complete");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lettre::Message;
    use std::cell::RefCell;

    /// Records recipients instead of talking to a network
    struct StubTransport {
        fail_recipient: Option<String>,
        sent_to: RefCell<Vec<String>>,
    }

    impl StubTransport {
        fn new() -> Self {
            Self {
                fail_recipient: None,
                sent_to: RefCell::new(Vec::new()),
            }
        }

        fn failing_for(recipient: &str) -> Self {
            Self {
                fail_recipient: Some(recipient.to_string()),
                sent_to: RefCell::new(Vec::new()),
            }
        }
    }

    impl MailTransport for StubTransport {
        fn send(&self, message: &Message) -> VenueResult<()> {
            let to = message.envelope().to()[0].to_string();
            if self.fail_recipient.as_deref() == Some(to.as_str()) {
                return Err(VenueError::Transport(format!("stub refused {}", to)));
            }
            self.sent_to.borrow_mut().push(to);
            Ok(())
        }
    }

    fn venues() -> Vec<Venue> {
        vec![
            Venue {
                name: "Venue1".into(),
                email: "venue1@mock.com".into(),
                country: "US".into(),
                state: "AL".into(),
                city: "Daphne".into(),
                capacity: 100,
                genre: "all".into(),
            },
            Venue {
                name: "Venue2".into(),
                email: "venue2@mock.com".into(),
                country: "US".into(),
                state: "UT".into(),
                city: "Provo".into(),
                capacity: 300,
                genre: "rock".into(),
            },
        ]
    }

    #[test]
    fn test_send_all_in_order() {
        let transport = StubTransport::new();
        let mut out = Vec::new();

        let report = send_all(
            &transport,
            &venues(),
            "band@example.com",
            "Booking",
            "Hello",
            &mut out,
        )
        .unwrap();

        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.sent(), 2);
        assert_eq!(report.failed(), 0);
        assert_eq!(
            *transport.sent_to.borrow(),
            vec!["venue1@mock.com".to_string(), "venue2@mock.com".to_string()]
        );

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("Sending 1/2 to Venue1 <venue1@mock.com>"));
        assert!(shown.contains("Sending 2/2 to Venue2 <venue2@mock.com>"));
        assert!(shown.contains("Dispatch complete: 2 sent, 0 failed."));
    }

    #[test]
    fn test_send_all_continues_past_failure() {
        let transport = StubTransport::failing_for("venue1@mock.com");
        let mut out = Vec::new();

        let report = send_all(
            &transport,
            &venues(),
            "band@example.com",
            "Booking",
            "Hello",
            &mut out,
        )
        .unwrap();

        assert_eq!(report.sent(), 1);
        assert_eq!(report.failed(), 1);
        assert!(report.outcomes[0].result.is_err());
        assert!(report.outcomes[1].result.is_ok());
        assert_eq!(*transport.sent_to.borrow(), vec!["venue2@mock.com".to_string()]);
    }

    #[test]
    fn test_send_one_bad_recipient_never_reaches_transport() {
        let transport = StubTransport::new();
        let mut bad = venues().remove(0);
        bad.email = "not-an-email".into();

        let result = send_one(&transport, &bad, "band@example.com", "s", "b");
        assert!(result.is_err());
        assert!(transport.sent_to.borrow().is_empty());
    }

    #[test]
    fn test_report_on_empty_selection() {
        let transport = StubTransport::new();
        let mut out = Vec::new();
        let report = send_all(&transport, &[], "band@example.com", "s", "b", &mut out).unwrap();
        assert_eq!(report.sent(), 0);
        assert_eq!(report.failed(), 0);
        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("Dispatch complete: 0 sent, 0 failed."));
    }
}
