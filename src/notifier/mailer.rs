use super::NotifierError;
use crate::config::EmailSettings;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::debug;

/// A fully addressed digest message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestEmail {
    pub from: String,
    pub to: String,
    /// Hidden from each other.
    pub bcc: Vec<String>,
    pub subject: String,
    pub html: String,
}

pub trait MailTransport {
    fn send(&self, email: &DigestEmail) -> Result<(), NotifierError>;
}

impl<T: MailTransport + ?Sized> MailTransport for &T {
    fn send(&self, email: &DigestEmail) -> Result<(), NotifierError> {
        (**self).send(email)
    }
}

/// Port on which the SMTP server expects TLS from the first byte.
pub const IMPLICIT_TLS_PORT: u16 = 465;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpSecurity {
    ImplicitTls,
    StartTls,
}

impl SmtpSecurity {
    /// Port 465 gets implicit TLS; any other port (587, 25) upgrades with STARTTLS.
    pub fn for_port(port: u16) -> Self {
        if port == IMPLICIT_TLS_PORT {
            SmtpSecurity::ImplicitTls
        } else {
            SmtpSecurity::StartTls
        }
    }
}

/// SMTP with login, over TLS chosen from the configured port.
pub struct SmtpMailer {
    transport: SmtpTransport,
}

impl SmtpMailer {
    pub fn new(settings: &EmailSettings) -> Result<Self, NotifierError> {
        let security = SmtpSecurity::for_port(settings.smtp_port);
        debug!(
            "Using {:?} for {}:{}",
            security, settings.smtp_server, settings.smtp_port
        );
        let builder = match security {
            SmtpSecurity::ImplicitTls => SmtpTransport::relay(&settings.smtp_server),
            SmtpSecurity::StartTls => SmtpTransport::starttls_relay(&settings.smtp_server),
        };
        let transport = builder
            .map_err(|e| NotifierError::Smtp(e.to_string()))?
            .port(settings.smtp_port)
            .credentials(Credentials::new(
                settings.sender_email.clone(),
                settings.sender_password.clone(),
            ))
            .build();
        Ok(Self { transport })
    }
}

impl MailTransport for SmtpMailer {
    fn send(&self, email: &DigestEmail) -> Result<(), NotifierError> {
        let message = build_message(email)?;
        let response = self
            .transport
            .send(&message)
            .map_err(|e| NotifierError::Smtp(e.to_string()))?;
        debug!("SMTP server answered {}", response.code());
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifierError> {
    address
        .parse()
        .map_err(|e: lettre::address::AddressError| NotifierError::InvalidAddress {
            address: address.to_string(),
            message: e.to_string(),
        })
}

pub(crate) fn build_message(email: &DigestEmail) -> Result<Message, NotifierError> {
    let mut builder = Message::builder()
        .from(parse_mailbox(&email.from)?)
        .to(parse_mailbox(&email.to)?)
        .subject(email.subject.as_str())
        .header(ContentType::TEXT_HTML);
    for address in &email.bcc {
        builder = builder.bcc(parse_mailbox(address)?);
    }
    builder
        .body(email.html.clone())
        .map_err(|e| NotifierError::Message(e.to_string()))
}
