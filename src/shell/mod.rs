//! Interactive console shell
//!
//! Orchestrates the session: a numbered main menu over venue selection,
//! email composition, and dispatch. All user interaction goes through
//! `BufRead`/`Write` parameters so the whole shell can be driven by
//! scripted input in tests; only the masked password prompts talk to the
//! terminal directly (delegated to rpassword, which restores the terminal
//! mode on every exit path).

use std::io::{BufRead, Write};

use tracing::info;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::crypto::store::SMTP_ACCOUNT;
use crate::crypto::{derive_context, CredentialStore};
use crate::display;
use crate::error::{VenueError, VenueResult};
use crate::mailer::{send_all, DispatchReport, MailTransport, SmtpMailer};
use crate::models::Venue;
use crate::pipeline::{read_line, SelectionPipeline};
use crate::repository::{self, LoadOutcome};

/// A composed email waiting to be sent
#[derive(Debug, Clone)]
pub struct ComposedEmail {
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub body: String,
}

/// One interactive session
pub struct Shell {
    settings: Settings,
    venues: Vec<Venue>,
    selected: Vec<Venue>,
    credentials: CredentialStore,
    email: Option<ComposedEmail>,
}

impl Shell {
    /// Create a session over a loaded venue list
    pub fn new(settings: Settings, venues: Vec<Venue>) -> Self {
        Self {
            settings,
            venues,
            selected: Vec::new(),
            credentials: CredentialStore::new(),
            email: None,
        }
    }

    /// Venues selected so far in this session
    pub fn selected(&self) -> &[Venue] {
        &self.selected
    }

    /// Pre-store the SMTP password (used when it was prompted elsewhere)
    pub fn store_smtp_password(&mut self, password: &str) -> VenueResult<()> {
        self.credentials.store(SMTP_ACCOUNT, password)
    }

    /// Run the main menu loop until the user exits
    pub fn run<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> VenueResult<()> {
        loop {
            writeln!(out)?;
            writeln!(out, "===== VenueSender =====")?;
            writeln!(out, "  1. Select venues")?;
            writeln!(out, "  2. View selected venues")?;
            writeln!(out, "  3. Compose email")?;
            writeln!(out, "  4. Send emails")?;
            writeln!(out, "  5. Show settings")?;
            writeln!(out, "  6. Exit")?;
            write!(out, "Choose an option: ")?;
            out.flush()?;

            let choice = read_line(input)?;
            match choice.as_str() {
                "1" => self.select_venues(input, out)?,
                "2" => write!(out, "{}", display::format_venue_list(&self.selected))?,
                "3" => self.compose_email(input, out)?,
                "4" => self.send_emails(out)?,
                "5" => write!(out, "{}", display::format_settings(&self.settings))?,
                "6" => {
                    writeln!(out, "Goodbye!")?;
                    return Ok(());
                }
                _ => writeln!(out, "Please enter a number between 1 and 6.")?,
            }
        }
    }

    /// Run one filter/selection pass, appending to the session selection
    fn select_venues<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        out: &mut W,
    ) -> VenueResult<()> {
        let pipeline = SelectionPipeline::new(self.settings.max_displayed);
        let added = pipeline.run(&self.venues, &mut self.selected, input, out)?;
        writeln!(
            out,
            "Added {} venue(s); {} selected in total.",
            added,
            self.selected.len()
        )?;
        Ok(())
    }

    /// Prompt for a subject and a body terminated by a lone `.`
    fn compose_email<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        out: &mut W,
    ) -> VenueResult<()> {
        write!(out, "Subject: ")?;
        out.flush()?;
        let subject = read_line(input)?;
        if subject.is_empty() {
            writeln!(out, "Subject must not be empty.")?;
            return Ok(());
        }

        writeln!(out, "Body (end with a single '.' on its own line):")?;
        let mut body = String::new();
        loop {
            let line = read_line(input)?;
            if line == "." {
                break;
            }
            body.push_str(&line);
            body.push('\n');
        }

        self.email = Some(ComposedEmail { subject, body });
        writeln!(out, "Email saved.")?;
        Ok(())
    }

    /// Build the SMTP transport and dispatch to the current selection
    fn send_emails<W: Write>(&mut self, out: &mut W) -> VenueResult<()> {
        if self.selected.is_empty() {
            writeln!(out, "No venues selected; nothing to send.")?;
            return Ok(());
        }
        let Some(email) = self.email.clone() else {
            writeln!(out, "Compose an email first.")?;
            return Ok(());
        };

        if !self.credentials.contains(SMTP_ACCOUNT) {
            let password = prompt_password(&format!(
                "SMTP password for {}: ",
                self.settings.smtp.username
            ))?;
            self.credentials.store(SMTP_ACCOUNT, &password)?;
        }

        // Decrypted only for the duration of the dispatch
        let password = self.credentials.reveal(SMTP_ACCOUNT)?;
        let mailer = match SmtpMailer::connect(&self.settings.smtp, &password) {
            Ok(mailer) => mailer,
            Err(e) => {
                writeln!(out, "Could not reach the SMTP server: {}", e)?;
                return Ok(());
            }
        };
        drop(password);

        self.dispatch_with(&mailer, &email, out)?;
        Ok(())
    }

    /// Dispatch the composed email over any transport
    fn dispatch_with<W: Write>(
        &mut self,
        transport: &dyn MailTransport,
        email: &ComposedEmail,
        out: &mut W,
    ) -> VenueResult<DispatchReport> {
        let report = send_all(
            transport,
            &self.selected,
            &self.settings.sender_email,
            &email.subject,
            &email.body,
            out,
        )?;
        info!(
            sent = report.sent(),
            failed = report.failed(),
            "session dispatch finished"
        );
        Ok(report)
    }
}

/// Load venues, prompting for the database passphrase only when the CSV
/// source fails and a fallback database is configured
pub fn load_venues_with_fallback(settings: &Settings) -> VenueResult<LoadOutcome> {
    match repository::load_venues(&settings.venues_csv, None) {
        Ok(outcome) => Ok(outcome),
        Err(VenueError::DatabaseUnavailable(csv_failure)) => {
            let Some(db_path) = settings.venues_db.as_deref() else {
                return Err(VenueError::DatabaseUnavailable(csv_failure));
            };
            let Some(params) = settings.encryption.key_params.as_ref() else {
                return Err(VenueError::DatabaseUnavailable(format!(
                    "{}; database fallback configured without key derivation parameters",
                    csv_failure
                )));
            };

            let passphrase = prompt_password("Venue database passphrase: ")?;
            let ctx = derive_context(&passphrase, params)?;
            if let Some(sealed_check) = settings.encryption.sealed_check.as_deref() {
                ctx.open_base64(sealed_check).map_err(|_| {
                    VenueError::Decryption("Wrong venue database passphrase".to_string())
                })?;
            }
            repository::load_venues(&settings.venues_csv, Some((db_path, &ctx)))
        }
        Err(e) => Err(e),
    }
}

/// Read a secret from the terminal with echo disabled
fn prompt_password(prompt: &str) -> VenueResult<Zeroizing<String>> {
    rpassword::prompt_password(prompt)
        .map(Zeroizing::new)
        .map_err(|e| VenueError::Io(format!("Failed to read password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lettre::Message;
    use std::cell::RefCell;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn settings() -> Settings {
        serde_json::from_str(
            r#"{
                "smtp": {"server": "smtp.example.com", "port": 587, "username": "booker"},
                "sender_email": "band@example.com",
                "venues_csv": "venues.csv"
            }"#,
        )
        .unwrap()
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

    struct StubTransport {
        sent_to: RefCell<Vec<String>>,
    }

    impl MailTransport for StubTransport {
        fn send(&self, message: &Message) -> VenueResult<()> {
            self.sent_to
                .borrow_mut()
                .push(message.envelope().to()[0].to_string());
            Ok(())
        }
    }

    #[test]
    fn test_exit_option() {
        let mut shell = Shell::new(settings(), venues());
        let mut input = Cursor::new("6\n".to_string());
        let mut out = Vec::new();
        shell.run(&mut input, &mut out).unwrap();

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("Goodbye!"));
    }

    #[test]
    fn test_unknown_option_reprompts() {
        let mut shell = Shell::new(settings(), venues());
        let mut input = Cursor::new("9\n6\n".to_string());
        let mut out = Vec::new();
        shell.run(&mut input, &mut out).unwrap();

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("Please enter a number between 1 and 6."));
    }

    #[test]
    fn test_select_then_view() {
        let mut shell = Shell::new(settings(), venues());
        // Select venues (US -> all -> ... -> all), view them, exit
        let mut input = Cursor::new("1\n1\nall\nall\nall\nall\nall\n2\n6\n".to_string());
        let mut out = Vec::new();
        shell.run(&mut input, &mut out).unwrap();

        assert_eq!(shell.selected().len(), 2);
        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("Added 2 venue(s); 2 selected in total."));
        assert!(shown.contains("venue2@mock.com"));
    }

    #[test]
    fn test_compose_email() {
        let mut shell = Shell::new(settings(), venues());
        let mut input =
            Cursor::new("3\nBooking inquiry\nHello,\nWe would love to play.\n.\n6\n".to_string());
        let mut out = Vec::new();
        shell.run(&mut input, &mut out).unwrap();

        let email = shell.email.as_ref().unwrap();
        assert_eq!(email.subject, "Booking inquiry");
        assert_eq!(email.body, "Hello,\nWe would love to play.\n");
    }

    #[test]
    fn test_empty_subject_rejected() {
        let mut shell = Shell::new(settings(), venues());
        let mut input = Cursor::new("3\n\n6\n".to_string());
        let mut out = Vec::new();
        shell.run(&mut input, &mut out).unwrap();

        assert!(shell.email.is_none());
        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("Subject must not be empty."));
    }

    #[test]
    fn test_send_without_selection() {
        let mut shell = Shell::new(settings(), venues());
        let mut input = Cursor::new("4\n6\n".to_string());
        let mut out = Vec::new();
        shell.run(&mut input, &mut out).unwrap();

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("No venues selected; nothing to send."));
    }

    #[test]
    fn test_dispatch_with_stub_transport() {
        let mut shell = Shell::new(settings(), venues());
        shell.selected = venues();
        let email = ComposedEmail {
            subject: "Booking".into(),
            body: "Hello".into(),
        };

        let transport = StubTransport {
            sent_to: RefCell::new(Vec::new()),
        };
        let mut out = Vec::new();
        let report = shell.dispatch_with(&transport, &email, &mut out).unwrap();

        assert_eq!(report.sent(), 2);
        assert_eq!(
            *transport.sent_to.borrow(),
            vec!["venue1@mock.com".to_string(), "venue2@mock.com".to_string()]
        );
    }

    #[test]
    fn test_fallback_requires_key_params() {
        let mut s = settings();
        s.venues_csv = PathBuf::from("/nonexistent/venues.csv");
        s.venues_db = Some(PathBuf::from("/nonexistent/venues.db.enc"));

        // No key params configured: the fallback must fail before prompting
        let result = load_venues_with_fallback(&s);
        assert!(matches!(result, Err(VenueError::DatabaseUnavailable(_))));
    }
}
