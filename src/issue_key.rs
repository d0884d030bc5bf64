use crate::error::{ReleaseNotesError, Result};

/// Literal substring marking a "merge pull request" style commit whose
/// message embeds the source branch name.
pub const MERGE_PREAMBLE: &str = "Merged in";

/// Branch folder prefixes a team is expected to have used historically,
/// tried in declared order; the bare (no folder) form comes first.
pub const BRANCH_FOLDER_CONVENTIONS: &[&str] = &[
    "",
    "feature/",
    "features/",
    "hotfix/",
    "hotfixes/",
    "fix/",
    "fixes/",
    "bug/",
    "bugs/",
    "bugfix/",
    "bugfixes/",
    "release/",
    "releases/",
];

/// Parses a merge-commit short message into a canonical `PROJECT-number`
/// issue key.
///
/// For each convention prefix the message is split on the literal
/// `"Merged in <prefix><project_key>"`; on a match, the issue number is the
/// second `-`-delimited token of the remainder. The first matching
/// convention wins.
///
/// # Errors
/// [ReleaseNotesError::UnparseableCommitMessage] when no convention yields
/// a match.
pub fn extract_issue_key(
    short_message: &str,
    project_key: &str,
    conventions: &[&str],
) -> Result<String> {
    for prefix in conventions {
        let marker = format!("{} {}{}", MERGE_PREAMBLE, prefix, project_key);

        if let Some((_, remainder)) = short_message.split_once(&marker) {
            match remainder.split('-').nth(1) {
                Some(number) if !number.is_empty() => {
                    return Ok(format!("{}-{}", project_key, number));
                }
                _ => {}
            }
        }
    }

    Err(ReleaseNotesError::UnparseableCommitMessage(
        short_message.to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(message: &str) -> Result<String> {
        extract_issue_key(message, "PROJ", BRANCH_FOLDER_CONVENTIONS)
    }

    #[test]
    fn test_bare_branch_name() {
        assert_eq!(extract("Merged in PROJ-5-fix").unwrap(), "PROJ-5");
    }

    #[test]
    fn test_feature_folder() {
        assert_eq!(
            extract("Merged in feature/PROJ-42-add-thing").unwrap(),
            "PROJ-42"
        );
    }

    #[test]
    fn test_plural_bugfix_folder() {
        assert_eq!(extract("Merged in bugfixes/PROJ-7-x").unwrap(), "PROJ-7");
    }

    #[test]
    fn test_every_declared_convention() {
        for prefix in BRANCH_FOLDER_CONVENTIONS {
            let message = format!("Merged in {}PROJ-13-some-work (pull request #9)", prefix);
            assert_eq!(extract(&message).unwrap(), "PROJ-13", "prefix `{}`", prefix);
        }
    }

    #[test]
    fn test_preamble_embedded_mid_message() {
        // The split is on a substring, not anchored to the start.
        assert_eq!(
            extract("PR: Merged in hotfix/PROJ-3-urgent into master").unwrap(),
            "PROJ-3"
        );
    }

    #[test]
    fn test_unknown_folder_fails() {
        let err = extract("Merged in experiments/PROJ-9-spike").unwrap_err();
        assert!(matches!(
            err,
            ReleaseNotesError::UnparseableCommitMessage(_)
        ));
    }

    #[test]
    fn test_message_without_preamble_fails() {
        let err = extract("PROJ-11 routine maintenance").unwrap_err();
        assert!(matches!(
            err,
            ReleaseNotesError::UnparseableCommitMessage(_)
        ));
    }

    #[test]
    fn test_project_key_without_number_fails() {
        let err = extract("Merged in PROJ branch cleanup").unwrap_err();
        assert!(matches!(
            err,
            ReleaseNotesError::UnparseableCommitMessage(_)
        ));
    }

    #[test]
    fn test_wrong_project_key_fails() {
        let err = extract("Merged in feature/OTHER-42-add-thing").unwrap_err();
        assert!(matches!(
            err,
            ReleaseNotesError::UnparseableCommitMessage(_)
        ));
    }

    #[test]
    fn test_trailing_dash_without_number_fails() {
        let err = extract("Merged in PROJ-").unwrap_err();
        assert!(matches!(
            err,
            ReleaseNotesError::UnparseableCommitMessage(_)
        ));
    }

    #[test]
    fn test_number_token_taken_verbatim() {
        // The second `-`-delimited token is kept as-is; no numeric check is
        // applied beyond what the branch naming produces.
        assert_eq!(extract("Merged in fix/PROJ-108-y2k-redux").unwrap(), "PROJ-108");
    }
}
