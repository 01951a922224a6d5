use crate::constants::{COMMIT_ARROW, COMMIT_HEADER, REMOTE_NAME};
use crate::error::{Error, Result};
use crate::renamer::RenameMapping;
use git2::{IndexAddOption, Repository, RepositoryState};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use wait_timeout::ChildExt;

/// sanity check that the working copy can take a commit and a push
pub fn sanity_check(repo_path: &Path) -> Result<()> {
    let repo = Repository::open(repo_path).map_err(|e| {
        Error::Repository(format!(
            "{} is not a git repository: {}",
            repo_path.display(),
            e.message()
        ))
    })?;

    // check we're not in the middle of a git operation
    if repo.state() != RepositoryState::Clean {
        return Err(Error::Repository(
            "repository is in the middle of an operation (merge, rebase, etc)".to_string(),
        ));
    }

    // check we're not on a detached HEAD
    if repo.head_detached().unwrap_or(false) {
        return Err(Error::Repository("repository is in detached HEAD state".to_string()));
    }

    if repo.find_remote(REMOTE_NAME).is_err() {
        return Err(Error::Repository(format!(
            "repository has no remote named {REMOTE_NAME}"
        )));
    }

    Ok(())
}

/// fixed header, then one `original→new` line per renamed file
pub fn commit_message(mapping: &[RenameMapping]) -> String {
    let mut message = String::from(COMMIT_HEADER);
    for entry in mapping {
        message.push('\n');
        message.push_str(&entry.original_file);
        message.push_str(COMMIT_ARROW);
        message.push_str(&entry.new_file);
    }
    message
}

/// stage everything under the drawing directory, like `git add <dir>`
pub fn stage(repo_path: &Path, drawing_dir: &Path) -> Result<()> {
    let repo = Repository::open(repo_path)?;
    let pathspec = workdir_pathspec(&repo, drawing_dir)?;

    let mut index = repo.index()?;
    // add_all picks up new and modified files, update_all records deletions
    index.add_all([pathspec.as_str()], IndexAddOption::DEFAULT, None)?;
    index.update_all([pathspec.as_str()], None)?;
    index.write()?;

    Ok(())
}

/// drawing directory relative to the repository root, as a pathspec
fn workdir_pathspec(repo: &Repository, drawing_dir: &Path) -> Result<String> {
    let workdir = repo
        .workdir()
        .ok_or_else(|| Error::Repository("repository is bare".to_string()))?;
    let workdir = canonical(workdir)?;
    let dir = canonical(drawing_dir)?;

    let relative = dir.strip_prefix(&workdir).map_err(|_| {
        Error::Repository(format!(
            "{} is outside the repository at {}",
            dir.display(),
            workdir.display()
        ))
    })?;

    // git pathspecs always use forward slashes
    let spec = relative
        .components()
        .map(|c| escape_glob(&c.as_os_str().to_string_lossy()))
        .collect::<Vec<_>>()
        .join("/");

    // the directory itself is literal, only the trailing `*` globs
    Ok(if spec.is_empty() {
        "*".to_string()
    } else {
        format!("{spec}/*")
    })
}

/// backslash-escape fnmatch metacharacters so a name matches only itself
fn escape_glob(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn canonical(path: &Path) -> Result<PathBuf> {
    path.canonicalize().map_err(|e| Error::io("resolve", path, e))
}

/// create a commit with the given message
///
/// uses the git binary rather than git2 to ensure commit signing (gpg/ssh)
/// and git hooks (pre-commit, commit-msg, etc.) work as expected
pub fn commit(repo_path: &Path, message: &str, timeout: Duration) -> Result<()> {
    run_git(repo_path, "commit", &["commit", "--message", message], timeout)?;
    Ok(())
}

/// push the current branch to origin
pub fn push(repo_path: &Path, timeout: Duration) -> Result<()> {
    let branch = current_branch(repo_path)?;
    run_git(repo_path, "push", &["push", REMOTE_NAME, &branch], timeout)?;
    Ok(())
}

/// short name of the checked-out branch
pub fn current_branch(repo_path: &Path) -> Result<String> {
    let repo = Repository::open(repo_path)?;
    let head = repo.head()?;
    match head.shorthand() {
        Some(name) if head.is_branch() => Ok(name.to_string()),
        _ => Err(Error::Repository("HEAD does not point at a branch".to_string())),
    }
}

/// run a git subcommand, killing it if it outlives `timeout`
fn run_git(
    repo_path: &Path,
    command: &'static str,
    args: &[&str],
    timeout: Duration,
) -> Result<String> {
    let mut child = Command::new("git")
        .args(args)
        .current_dir(repo_path)
        // fail instead of waiting on a credential prompt nobody will answer
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| Error::GitCommand {
            command,
            detail: format!("failed to run git: {e}"),
        })?;

    // drain both pipes while waiting, git blocks once a pipe buffer fills
    let stdout_reader = child.stdout.take().map(drain);
    let stderr_reader = child.stderr.take().map(drain);

    match child.wait_timeout(timeout) {
        Ok(Some(status)) => {
            let stdout_data = collect(stdout_reader, command, "stdout");
            let stderr_data = collect(stderr_reader, command, "stderr");

            let stdout_text = String::from_utf8_lossy(&stdout_data).trim().to_string();
            if status.success() {
                return Ok(stdout_text);
            }

            let stderr_text = String::from_utf8_lossy(&stderr_data).trim().to_string();
            let detail = match (stderr_text.is_empty(), stdout_text.is_empty()) {
                (false, _) => stderr_text,
                (true, false) => stdout_text,
                (true, true) => format!("exited with {status}"),
            };
            Err(Error::GitCommand { command, detail })
        }
        Ok(None) => {
            // timeout occurred, kill the process
            if let Err(e) = child.kill() {
                crate::warning!("failed to kill git {}: {}", command, e);
            }
            let _ = child.wait();
            // readers are left detached, a hook's children may still hold the pipes
            Err(Error::Timeout {
                operation: command,
                timeout,
            })
        }
        Err(e) => Err(Error::GitCommand {
            command,
            detail: format!("failed to wait for git: {e}"),
        }),
    }
}

/// read a child pipe to the end on its own thread
fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<std::io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut data = Vec::new();
        pipe.read_to_end(&mut data)?;
        Ok(data)
    })
}

fn collect(
    reader: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    command: &str,
    stream: &str,
) -> Vec<u8> {
    match reader.map(JoinHandle::join) {
        Some(Ok(Ok(data))) => data,
        Some(Ok(Err(e))) => {
            crate::warning!("failed to read git {} {}: {}", command, stream, e);
            Vec::new()
        }
        Some(Err(_)) => {
            crate::warning!("git {} {} reader panicked", command, stream);
            Vec::new()
        }
        None => Vec::new(),
    }
}
