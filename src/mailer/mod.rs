//! Mail dispatch over SMTP
//!
//! A thin abstraction over [lettre](https://lettre.rs): message building and
//! the per-recipient dispatch loop are separated from the concrete SMTP
//! transport behind [`MailTransport`], so dispatch semantics are testable
//! without a network.

pub mod dispatch;
pub mod transport;

pub use dispatch::{send_all, send_one, DispatchOutcome, DispatchReport};
pub use transport::{build_message, MailTransport, SmtpMailer};
