use crate::config::Config;
use crate::constants::{EMAIL_ARROW, EMAIL_INTRO, EMAIL_SUBJECT};
use crate::error::{Error, Result};
use crate::renamer::RenameMapping;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

/// intro line, blank line, then one `original  →  new` line per renamed file
pub fn summary_body(mapping: &[RenameMapping]) -> String {
    let lines: Vec<String> = mapping
        .iter()
        .map(|entry| format!("{}{EMAIL_ARROW}{}", entry.original_file, entry.new_file))
        .collect();
    format!("{EMAIL_INTRO}\n\n{}", lines.join("\n"))
}

/// build the plaintext summary message
pub fn compose(config: &Config, mapping: &[RenameMapping]) -> Result<Message> {
    let message = Message::builder()
        .from(config.mail_from.clone())
        .to(config.mail_to.clone())
        .subject(EMAIL_SUBJECT)
        .header(ContentType::TEXT_PLAIN)
        .body(summary_body(mapping))?;
    Ok(message)
}

/// STARTTLS session to the configured server, authenticated, with a timeout
pub fn smtp_transport(config: &Config) -> Result<SmtpTransport> {
    let credentials = Credentials::new(config.smtp_user.clone(), config.smtp_password.clone());
    let transport = SmtpTransport::starttls_relay(&config.smtp_host)?
        .port(config.smtp_port)
        .credentials(credentials)
        .timeout(Some(config.smtp_timeout))
        .build();
    Ok(transport)
}

/// send one message, blocking until the server accepts or refuses it
pub fn send<T>(transport: &T, message: &Message) -> Result<()>
where
    T: Transport,
    Error: From<T::Error>,
{
    transport.send(message)?;
    Ok(())
}
