//! Descriptions computed from the project README.
//!
//! The catalog only wires these to steps whose condition already checked
//! that a project is open and has README content. They still degrade to
//! an empty README rather than panic if called without one.

use crate::status::WholeStatus;

const EXTEND_HEADING: &str = "## Extend";
const EXTEND_PREFIX: &str = "You can follow the README to extend the app, such as: ";

fn readme(status: &WholeStatus) -> &str {
    status
        .project_opened
        .as_ref()
        .and_then(|p| p.readme_content.as_deref())
        .unwrap_or_default()
}

/// Summary of README text
///
/// Starts at the first line that opens with `#` (inclusive) and stops at the
/// first line mentioning "prerequisite" in any case (exclusive). Each kept
/// line is trimmed and followed by a single space.
pub fn summarize(readme: &str) -> String {
    let mut summary = String::new();
    let mut found_heading = false;

    for line in readme.split('\n') {
        let trimmed = line.trim();
        if trimmed.starts_with('#') {
            found_heading = true;
        }
        if !found_heading {
            continue;
        }
        if line.to_lowercase().contains("prerequisite") {
            break;
        }
        summary.push_str(trimmed);
        summary.push(' ');
    }

    summary
}

/// Extension suggestions from every `## Extend...` heading
pub fn extension_hints(readme: &str) -> String {
    let mut hints = EXTEND_PREFIX.to_string();

    for line in readme.split('\n') {
        let trimmed = line.trim();
        if trimmed.starts_with(EXTEND_HEADING) {
            hints.push_str(&trimmed.replacen("##", "", 1));
            hints.push(' ');
        }
    }

    hints
}

pub(crate) fn describe_summary(status: &WholeStatus) -> String {
    summarize(readme(status))
}

pub(crate) fn describe_extension(status: &WholeStatus) -> String {
    extension_hints(readme(status))
}
