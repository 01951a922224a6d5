use crate::renamer::RenameMapping;
use crate::workflow::Stage;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// how an error should be treated by a caller deciding whether to retry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// fix the environment or input, retrying won't help
    Config,
    /// may succeed if attempted again
    Transient,
    /// the operation was refused or is broken
    Permanent,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Config => "configuration",
            Self::Transient => "transient",
            Self::Permanent => "permanent",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing required setting {0}")]
    MissingSetting(&'static str),

    #[error("invalid setting {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    #[error("failed to read change list {}", path.display())]
    ChangeList { path: PathBuf, source: csv::Error },

    #[error("change list {} has no rows", .0.display())]
    EmptyChangeList(PathBuf),

    #[error("{file} not found in {}", dir.display())]
    SourceMissing { file: String, dir: PathBuf },

    #[error("failed to {action} {}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("repository: {0}")]
    Repository(String),

    #[error(transparent)]
    Git(#[from] git2::Error),

    #[error("git {command} failed: {detail}")]
    GitCommand { command: &'static str, detail: String },

    #[error("git {operation} timed out after {}s", timeout.as_secs())]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("failed to build email")]
    Email(#[from] lettre::error::Error),

    #[error("failed to send email: {detail}")]
    Send { detail: String, transient: bool },
}

impl Error {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::MissingSetting(_)
            | Self::InvalidSetting { .. }
            | Self::ChangeList { .. }
            | Self::EmptyChangeList(_)
            | Self::SourceMissing { .. }
            | Self::Repository(_) => ErrorClass::Config,
            Self::Timeout { .. } => ErrorClass::Transient,
            Self::Io { source, .. } => match source.kind() {
                std::io::ErrorKind::Interrupted | std::io::ErrorKind::TimedOut => {
                    ErrorClass::Transient
                }
                _ => ErrorClass::Permanent,
            },
            Self::Git(e) => match e.class() {
                git2::ErrorClass::Net | git2::ErrorClass::Ssl | git2::ErrorClass::Os => {
                    ErrorClass::Transient
                }
                _ => ErrorClass::Permanent,
            },
            Self::GitCommand { .. } | Self::Email(_) => ErrorClass::Permanent,
            Self::Send { transient, .. } => {
                if *transient {
                    ErrorClass::Transient
                } else {
                    ErrorClass::Permanent
                }
            }
        }
    }

    pub(crate) fn io(
        action: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

impl From<lettre::transport::smtp::Error> for Error {
    fn from(e: lettre::transport::smtp::Error) -> Self {
        // 5xx replies are refusals, everything else (4xx, io, tls) may clear up
        Self::Send {
            transient: !e.is_permanent(),
            detail: e.to_string(),
        }
    }
}

impl From<lettre::transport::stub::Error> for Error {
    fn from(e: lettre::transport::stub::Error) -> Self {
        Self::Send {
            transient: false,
            detail: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// a run that stopped part way, with whatever it had already done to disk
#[derive(Debug, thiserror::Error)]
#[error("aborted while {stage}")]
pub struct Aborted {
    pub stage: Stage,
    pub renamed: Vec<RenameMapping>,
    #[source]
    pub source: Error,
}
