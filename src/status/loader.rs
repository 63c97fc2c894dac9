//! Filesystem loading for status snapshots
//!
//! The host normally builds the snapshot itself. The CLI reads one from a
//! JSON file instead, and can fill in README and `launch.json` text from the
//! project directory when the file leaves them out.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use super::{ProjectStatus, WholeStatus};

/// README file names tried in order
const README_NAMES: &[&str] = &["README.md", "readme.md", "Readme.md"];

/// Errors produced while loading a snapshot
#[derive(Error, Debug)]
pub enum StatusError {
    #[error("failed to read status file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse status file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load a snapshot from a JSON file
pub fn load_status(path: &Path) -> Result<WholeStatus, StatusError> {
    let contents = fs::read_to_string(path).map_err(|source| StatusError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let status = WholeStatus::from_json(&contents).map_err(|source| StatusError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        "Loaded status from {} (project opened: {})",
        path.display(),
        status.project_opened.is_some()
    );
    Ok(status)
}

/// Mark `project_dir` as the open project and fill missing file contents
///
/// An already-open project keeps its recorded path and action history; only
/// README and `launch.json` text that is still `None` is read from disk.
pub fn attach_project(status: &mut WholeStatus, project_dir: &Path) {
    let project = status
        .project_opened
        .get_or_insert_with(|| ProjectStatus::scaffolded(project_dir.to_string_lossy()));

    if project.readme_content.is_none() {
        project.readme_content = read_readme(project_dir);
    }

    if project.launch_json_content.is_none() {
        let launch = project_dir.join(".vscode").join("launch.json");
        project.launch_json_content = read_optional(&launch);
    }
}

fn read_readme(project_dir: &Path) -> Option<String> {
    README_NAMES
        .iter()
        .find_map(|name| read_optional(&project_dir.join(name)))
}

/// Read a text file, replacing invalid UTF-8; only an unreadable file is `None`
fn read_optional(path: &Path) -> Option<String> {
    match fs::read(path) {
        Ok(bytes) => {
            debug!("Read {}", path.display());
            Some(String::from_utf8_lossy(&bytes).into_owned())
        }
        Err(e) => {
            debug!("Skipping {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::ActionResult;
    use tempfile::TempDir;

    #[test]
    fn test_load_status_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("status.json");
        fs::write(
            &path,
            r#"{"machine": {"m365LoggedIn": true}, "projectOpened": {"path": "/p"}}"#,
        )
        .unwrap();

        let status = load_status(&path).unwrap();
        assert!(status.machine.m365_logged_in);
        assert_eq!(status.project_opened.unwrap().path, "/p");
    }

    #[test]
    fn test_load_status_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_status(&temp_dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, StatusError::Read { .. }));
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn test_load_status_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("status.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_status(&path).unwrap_err();
        assert!(matches!(err, StatusError::Parse { .. }));
    }

    #[test]
    fn test_attach_project_reads_readme_and_launch_json() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("README.md"), "# Hello").unwrap();
        fs::create_dir_all(temp_dir.path().join(".vscode")).unwrap();
        fs::write(
            temp_dir.path().join(".vscode").join("launch.json"),
            r#"{"configurations": [{"name": "Debug in Test Tool"}]}"#,
        )
        .unwrap();

        let mut status = WholeStatus::default();
        attach_project(&mut status, temp_dir.path());

        let project = status.project_opened.unwrap();
        assert_eq!(project.readme_content.as_deref(), Some("# Hello"));
        assert!(project
            .launch_json_content
            .as_deref()
            .unwrap()
            .contains("Test Tool"));
        assert_eq!(project.action_status.debug.result, ActionResult::NoRun);
    }

    #[test]
    fn test_attach_project_keeps_existing_content() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("README.md"), "# From disk").unwrap();

        let mut project = ProjectStatus::scaffolded("/recorded");
        project.readme_content = Some("# From host".to_string());
        let mut status = WholeStatus::with_project(project);

        attach_project(&mut status, temp_dir.path());

        let project = status.project_opened.unwrap();
        assert_eq!(project.path, "/recorded");
        assert_eq!(project.readme_content.as_deref(), Some("# From host"));
        assert!(project.launch_json_content.is_none());
    }

    #[test]
    fn test_attach_project_reads_non_utf8_readme() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("README.md"),
            b"# Caf\xE9 Bot\nServes coffee.\n## Prerequisites\n",
        )
        .unwrap();

        let mut status = WholeStatus::default();
        attach_project(&mut status, temp_dir.path());

        let readme = status
            .project_opened
            .as_ref()
            .and_then(|p| p.readme_content.as_deref())
            .unwrap();
        assert!(readme.starts_with("# Caf\u{FFFD} Bot"));

        let steps = crate::steps::select_steps(crate::Catalog::builtin().unwrap(), &status);
        let titles: Vec<_> = steps.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Summary of README"]);
        assert_eq!(steps[0].description, "# Caf\u{FFFD} Bot Serves coffee. ");
    }

    #[test]
    fn test_attach_project_without_files() {
        let temp_dir = TempDir::new().unwrap();
        let mut status = WholeStatus::default();
        attach_project(&mut status, temp_dir.path());

        let project = status.project_opened.unwrap();
        assert!(project.readme_content.is_none());
        assert!(project.launch_json_content.is_none());
    }
}
