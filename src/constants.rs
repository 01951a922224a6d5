// input
pub const DEFAULT_CHANGE_LIST: &str = "change_list.csv";

// renamer
pub const REVISION_MARKER: &str = "_rev";
pub const BACKUP_SUFFIX: &str = ".bak";

// config defaults
pub const DEFAULT_DRAWING_DIR: &str = "drawings";
pub const DEFAULT_REPO_PATH: &str = ".";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_GIT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_SMTP_TIMEOUT_SECS: u64 = 60;

// git
pub const REMOTE_NAME: &str = "origin";
pub const COMMIT_HEADER: &str = "Auto-revision update:";
pub const COMMIT_ARROW: &str = "→";

// email
pub const EMAIL_SUBJECT: &str = "Drawing Revision Update";
pub const EMAIL_INTRO: &str = "The following files have been revised:";
pub const EMAIL_ARROW: &str = "  →  ";
