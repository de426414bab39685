use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::tree::GitStatus;

/// Working directory of the repository containing `path`, if any
pub fn discover_workdir<P: AsRef<Path>>(path: P) -> Option<PathBuf> {
    match gix::discover(path.as_ref()) {
        Ok(repo) => repo.workdir().map(Path::to_path_buf),
        Err(e) => {
            log::debug!("git: no repository at {}: {}", path.as_ref().display(), e);
            None
        }
    }
}

/// Parse `git status --porcelain -z` output into repository-relative statuses.
///
/// Untracked (`??`) and anything staged or unstaged as added maps to
/// [`GitStatus::Added`], any `M` to [`GitStatus::Modified`]. Rename and copy
/// records are followed by their source path, which is skipped.
pub fn parse_porcelain(output: &[u8]) -> HashMap<String, GitStatus> {
    let mut statuses = HashMap::new();
    let mut records = output.split(|&b| b == 0);

    while let Some(record) = records.next() {
        if record.len() < 4 {
            continue;
        }
        let code = &record[..2];
        let path = String::from_utf8_lossy(&record[3..]);
        let path = path.trim_end_matches('/');

        let status = if code == b"??" || code.contains(&b'A') {
            GitStatus::Added
        } else if code.contains(&b'M') {
            GitStatus::Modified
        } else {
            GitStatus::None
        };
        if status.is_changed() && !path.is_empty() {
            statuses.insert(path.to_string(), status);
        }

        if code.contains(&b'R') || code.contains(&b'C') {
            records.next();
        }
    }
    statuses
}

/// Re-key repository-relative statuses onto paths relative to `root`,
/// dropping entries outside it
pub fn rebase_statuses(
    statuses: HashMap<String, GitStatus>,
    workdir: &Path,
    root: &Path,
) -> HashMap<String, GitStatus> {
    let prefix = match root.strip_prefix(workdir) {
        Ok(prefix) => prefix.to_path_buf(),
        Err(_) => return HashMap::new(),
    };
    if prefix.as_os_str().is_empty() {
        return statuses;
    }
    let prefix = format!("{}/", prefix.to_string_lossy().replace('\\', "/"));

    statuses
        .into_iter()
        .filter_map(|(path, status)| path.strip_prefix(&prefix).map(|rest| (rest.to_string(), status)))
        .filter(|(path, _)| !path.is_empty())
        .collect()
}

/// Change statuses of the working tree below `root`, keyed by root-relative
/// path. Any failure yields an empty map.
pub fn load_git_status(root: &Path) -> HashMap<String, GitStatus> {
    let workdir = match discover_workdir(root) {
        Some(workdir) => workdir,
        None => return HashMap::new(),
    };

    let output = match Command::new("git")
        .args(["status", "--porcelain", "-z"])
        .current_dir(root)
        .output()
    {
        Ok(output) if output.status.success() => output,
        Ok(output) => {
            log::warn!("git: status exited with {}", output.status);
            return HashMap::new();
        }
        Err(e) => {
            log::warn!("git: failed to run status: {}", e);
            return HashMap::new();
        }
    };

    let workdir = workdir.canonicalize().unwrap_or(workdir);
    let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    let statuses = rebase_statuses(parse_porcelain(&output.stdout), &workdir, &root);
    log::info!("git: {} changed paths under {}", statuses.len(), root.display());
    statuses
}
