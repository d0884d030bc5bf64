//! Changelog Writer.
//!
//! Renders issue records into the committed markdown artifact at
//! `<repo>/changelog/changelog.md`, either overwriting the file or
//! prepending above the prior content.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::jira::Issue;

/// Directory inside the working repository that holds the artifact; the
/// workflow stages exactly this path.
pub const CHANGELOG_DIR: &str = "changelog";
pub const CHANGELOG_FILE: &str = "changelog.md";

/// Separator inserted between the new content and prior content in
/// prepend mode.
const HORIZONTAL_RULE: &str = "********************";

/// Renders the changelog body for one release.
///
/// Issues of type `Story` land under "Stories Completed", issues of type
/// `Bug` under "Bugs Fixed"; records of any other type are silently
/// omitted. Each rendered issue is a key/summary/description heading
/// triple at levels 3/4/5.
pub fn render(release_name: &str, issues: &[Issue]) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Release {}\n", release_name));

    out.push_str("## Stories Completed\n");
    render_section(&mut out, issues, "Story");

    out.push_str("## Bugs Fixed\n");
    render_section(&mut out, issues, "Bug");

    out
}

fn render_section(out: &mut String, issues: &[Issue], type_name: &str) {
    for issue in issues.iter().filter(|i| i.issue_type == type_name) {
        out.push_str(&format!("### {}\n", issue.key));
        out.push_str(&format!("#### {}\n", issue.summary));
        out.push_str(&format!("##### {}\n\n", issue.description));
    }
}

/// Writes the changelog file under `repo_dir`, creating the `changelog/`
/// directory when missing.
///
/// With `prepend` the new content comes first, then a horizontal rule and
/// a blank line, then the previous file's bytes; otherwise the file is
/// overwritten.
pub fn write(repo_dir: &Path, content: &str, prepend: bool) -> Result<()> {
    let changelog_dir = repo_dir.join(CHANGELOG_DIR);
    fs::create_dir_all(&changelog_dir)?;
    let changelog_path = changelog_dir.join(CHANGELOG_FILE);

    let file_content = if prepend && changelog_path.exists() {
        let prior = fs::read_to_string(&changelog_path)?;
        format!("{}{}\n\n{}", content, HORIZONTAL_RULE, prior)
    } else {
        content.to_string()
    };

    fs::write(&changelog_path, file_content)?;
    Ok(())
}

/// Renders and writes the changelog for one release in a single step.
pub fn generate(repo_dir: &Path, release_name: &str, issues: &[Issue], prepend: bool) -> Result<()> {
    write(repo_dir, &render(release_name, issues), prepend)
}
