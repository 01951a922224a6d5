use crate::constants::{
    DEFAULT_DRAWING_DIR, DEFAULT_GIT_TIMEOUT_SECS, DEFAULT_REPO_PATH, DEFAULT_SMTP_PORT,
    DEFAULT_SMTP_TIMEOUT_SECS,
};
use crate::error::{Error, Result};
use lettre::message::Mailbox;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// settings for a single run, read once at startup
pub struct Config {
    /// directory holding the drawings named by the change list
    pub drawing_dir: PathBuf,

    /// git working copy the drawing directory lives in
    pub repo_path: PathBuf,

    // mail server
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_password: String,

    // message envelope
    pub mail_from: Mailbox,
    pub mail_to: Mailbox,

    // timeouts
    pub git_timeout: Duration,
    pub smtp_timeout: Duration,
}

impl Config {
    /// build from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// build from any variable lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let required = |name: &'static str| get(name).ok_or(Error::MissingSetting(name));

        let smtp_user = required("SMTP_USER")?;
        let mail_from = parse(
            "EMAIL_FROM",
            get("EMAIL_FROM").unwrap_or_else(|| smtp_user.clone()),
        )?;

        Ok(Self {
            drawing_dir: get("DRAWING_DIR")
                .unwrap_or_else(|| DEFAULT_DRAWING_DIR.to_string())
                .into(),
            repo_path: get("REPO_PATH")
                .unwrap_or_else(|| DEFAULT_REPO_PATH.to_string())
                .into(),
            smtp_host: required("SMTP_HOST")?,
            smtp_port: get("SMTP_PORT").map_or(Ok(DEFAULT_SMTP_PORT), |v| parse("SMTP_PORT", v))?,
            smtp_password: required("SMTP_PASS")?,
            smtp_user,
            mail_from,
            mail_to: parse("EMAIL_RECIP", required("EMAIL_RECIP")?)?,
            git_timeout: Duration::from_secs(
                get("GIT_TIMEOUT_SECS")
                    .map_or(Ok(DEFAULT_GIT_TIMEOUT_SECS), |v| parse("GIT_TIMEOUT_SECS", v))?,
            ),
            smtp_timeout: Duration::from_secs(
                get("SMTP_TIMEOUT_SECS")
                    .map_or(Ok(DEFAULT_SMTP_TIMEOUT_SECS), |v| parse("SMTP_TIMEOUT_SECS", v))?,
            ),
        })
    }
}

fn parse<T>(name: &'static str, value: String) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value.parse().map_err(|e: T::Err| Error::InvalidSetting {
        name,
        reason: format!("{value:?}: {e}"),
    })
}

// keep the password out of logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("drawing_dir", &self.drawing_dir)
            .field("repo_path", &self.repo_path)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_user", &self.smtp_user)
            .field("smtp_password", &"<redacted>")
            .field("mail_from", &self.mail_from)
            .field("mail_to", &self.mail_to)
            .field("git_timeout", &self.git_timeout)
            .field("smtp_timeout", &self.smtp_timeout)
            .finish()
    }
}
