use crate::constants::DEFAULT_CHANGE_LIST;
use clap::Parser;
use std::path::PathBuf;

/// drawing-revision: rename drawings from a change list, commit and push the
/// result, then email a summary
#[derive(Parser, Debug)]
#[command(name = "drawing-revision", about, long_about = None)]
pub struct Cli {
    /// csv file with original_file and revision_code columns
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CHANGE_LIST)]
    pub change_list: PathBuf,

    /// load settings from this file instead of ./.env
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
