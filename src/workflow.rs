use crate::config::Config;
use crate::error::{Aborted, Error, Result};
use crate::renamer::RenameMapping;
use crate::{changelist, git, info, notify, renamer, status, ui};
use lettre::Transport;
use std::fmt;
use std::path::Path;

/// where a run is, in the order the stages execute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Checking,
    Loading,
    Renaming,
    Committing,
    Pushing,
    Notifying,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Checking => "checking the repository",
            Self::Loading => "loading the change list",
            Self::Renaming => "renaming drawings",
            Self::Committing => "committing",
            Self::Pushing => "pushing",
            Self::Notifying => "sending the summary",
            Self::Done => "finishing",
        })
    }
}

/// load, rename, commit, push and notify, once, in that order
///
/// nothing is undone on failure: the returned [`Aborted`] carries the stage
/// that failed and the renames already made on disk
pub fn run<T>(
    config: &Config,
    change_list: &Path,
    transport: &T,
) -> std::result::Result<Vec<RenameMapping>, Aborted>
where
    T: Transport,
    Error: From<T::Error>,
{
    let mut stage = Stage::Checking;
    let mut mapping = Vec::new();

    match execute(config, change_list, transport, &mut stage, &mut mapping) {
        Ok(()) => Ok(mapping),
        Err(source) => Err(Aborted {
            stage,
            renamed: mapping,
            source,
        }),
    }
}

fn execute<T>(
    config: &Config,
    change_list: &Path,
    transport: &T,
    stage: &mut Stage,
    mapping: &mut Vec<RenameMapping>,
) -> Result<()>
where
    T: Transport,
    Error: From<T::Error>,
{
    // checked before anything on disk changes
    git::sanity_check(&config.repo_path)?;

    *stage = Stage::Loading;
    status!("loading change list {}...", change_list.display());
    let records = changelist::load(change_list)?;

    *stage = Stage::Renaming;
    let file_word = if records.len() == 1 { "file" } else { "files" };
    status!(
        "renaming {} {} in {}...",
        records.len(),
        file_word,
        config.drawing_dir.display()
    );
    renamer::rename_all(&records, &config.drawing_dir, mapping)?;
    for entry in mapping.iter() {
        info!("{} → {}", entry.original_file, entry.new_file);
    }

    *stage = Stage::Committing;
    status!("committing...");
    git::stage(&config.repo_path, &config.drawing_dir)?;
    git::commit(
        &config.repo_path,
        &git::commit_message(mapping),
        config.git_timeout,
    )?;

    *stage = Stage::Pushing;
    status!("pushing to origin...");
    ui::with_spinner(|| git::push(&config.repo_path, config.git_timeout))?;

    *stage = Stage::Notifying;
    let message = notify::compose(config, mapping)?;
    status!("emailing summary to {}...", config.mail_to);
    ui::with_spinner(|| notify::send(transport, &message))?;

    *stage = Stage::Done;
    Ok(())
}
