//! SMTP transport and message building
//!
//! Transport failures are classified into three buckets: connection-level
//! (network, TLS, timeout), authentication rejections (SMTP 53x replies),
//! and everything else. The classification drives only reporting; dispatch
//! never retries.

use std::error::Error as StdError;
use std::time::Duration;

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Message, SmtpTransport, Transport};
use tracing::debug;

use crate::config::SmtpSettings;
use crate::error::{VenueError, VenueResult};
use crate::models::Venue;

/// Anything that can deliver one built message
pub trait MailTransport {
    /// Deliver a single message, classifying any failure
    fn send(&self, message: &Message) -> VenueResult<()>;
}

/// Production SMTP transport
pub struct SmtpMailer {
    transport: SmtpTransport,
}

impl SmtpMailer {
    /// Build a transport and verify the connection
    ///
    /// The connection probe runs under the shorter connect timeout; the
    /// returned mailer carries the overall per-message timeout.
    pub fn connect(settings: &SmtpSettings, password: &str) -> VenueResult<Self> {
        if settings.verbose {
            debug!(
                server = %settings.server,
                port = settings.port,
                use_ssl = settings.use_ssl,
                "probing SMTP connection"
            );
        }
        let probe = build_transport(settings, password, settings.connect_timeout_secs)?;
        match probe.test_connection() {
            Ok(true) => {}
            Ok(false) => {
                return Err(VenueError::Connection(format!(
                    "SMTP server {} did not answer the connection probe",
                    settings.server
                )))
            }
            Err(e) => return Err(classify_smtp_error(&e)),
        }

        let transport = build_transport(settings, password, settings.timeout_secs)?;
        Ok(Self { transport })
    }
}

impl MailTransport for SmtpMailer {
    fn send(&self, message: &Message) -> VenueResult<()> {
        self.transport
            .send(message)
            .map(|_| ())
            .map_err(|e| classify_smtp_error(&e))
    }
}

fn build_transport(
    settings: &SmtpSettings,
    password: &str,
    timeout_secs: u64,
) -> VenueResult<SmtpTransport> {
    let tls_parameters = TlsParameters::builder(settings.server.clone())
        .dangerous_accept_invalid_certs(!settings.verify_peer)
        .dangerous_accept_invalid_hostnames(!settings.verify_host)
        .build()
        .map_err(|e| VenueError::Connection(format!("TLS setup failed: {}", e)))?;

    let tls = if settings.use_ssl {
        Tls::Wrapper(tls_parameters)
    } else {
        Tls::Opportunistic(tls_parameters)
    };

    let credentials = Credentials::new(settings.username.clone(), password.to_string());

    Ok(SmtpTransport::builder_dangerous(&settings.server)
        .port(settings.port)
        .tls(tls)
        .credentials(credentials)
        .timeout(Some(Duration::from_secs(timeout_secs)))
        .build())
}

/// Build the message for one venue: To, From, Subject, plain-text body
pub fn build_message(
    venue: &Venue,
    sender: &str,
    subject: &str,
    body: &str,
) -> VenueResult<Message> {
    let from: Mailbox = sender
        .parse()
        .map_err(|e| VenueError::Config(format!("Invalid sender address '{}': {}", sender, e)))?;
    let to: Mailbox = venue.email.parse().map_err(|e| {
        VenueError::Transport(format!(
            "Invalid recipient address '{}' for {}: {}",
            venue.email, venue.name, e
        ))
    })?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_string())
        .map_err(|e| VenueError::Transport(format!("Failed to build message: {}", e)))
}

/// Map a lettre SMTP error onto the dispatch error taxonomy
pub(crate) fn classify_smtp_error(err: &lettre::transport::smtp::Error) -> VenueError {
    if err.is_timeout() || err.is_tls() {
        return VenueError::Connection(err.to_string());
    }
    if let Some(code) = err.status() {
        // 530/534/535/538 are the authentication-family replies
        if code.to_string().starts_with("53") {
            return VenueError::Auth(err.to_string());
        }
        return VenueError::Transport(err.to_string());
    }
    // Walk the source chain for socket-level failures
    let mut source = err.source();
    while let Some(inner) = source {
        if inner.downcast_ref::<std::io::Error>().is_some() {
            return VenueError::Connection(err.to_string());
        }
        source = inner.source();
    }
    VenueError::Transport(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venue() -> Venue {
        Venue {
            name: "Venue1".into(),
            email: "venue1@mock.com".into(),
            country: "US".into(),
            state: "AL".into(),
            city: "Daphne".into(),
            capacity: 100,
            genre: "all".into(),
        }
    }

    #[test]
    fn test_build_message_headers() {
        let message = build_message(&venue(), "band@example.com", "Booking inquiry", "Hello!")
            .unwrap();

        let envelope = message.envelope();
        assert_eq!(envelope.to().len(), 1);
        assert_eq!(envelope.to()[0].to_string(), "venue1@mock.com");
        assert_eq!(
            envelope.from().map(ToString::to_string),
            Some("band@example.com".to_string())
        );

        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(formatted.contains("Subject: Booking inquiry"));
        assert!(formatted.contains("Hello!"));
    }

    #[test]
    fn test_build_message_bad_recipient() {
        let mut v = venue();
        v.email = "not-an-email".into();
        let result = build_message(&v, "band@example.com", "s", "b");
        assert!(matches!(result, Err(VenueError::Transport(_))));
    }

    #[test]
    fn test_build_message_bad_sender() {
        let result = build_message(&venue(), "not-an-email", "s", "b");
        assert!(matches!(result, Err(VenueError::Config(_))));
    }
}
