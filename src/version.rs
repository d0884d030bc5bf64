use std::str::FromStr;

use crate::error::{ReleaseNotesError, Result};

/// How the next release identifier should be derived from the existing tags.
///
/// The three keyword directives increment one component of the most recent
/// tag; an explicit directive names the release outright and bypasses any
/// relation to the existing tags (no monotonicity check is performed).
#[derive(Debug, Clone, PartialEq)]
pub enum VersionDirective {
    Major,
    Minor,
    Patch,
    /// An explicit `MAJOR.MINOR.PATCH[-pre][+build]` literal, kept verbatim.
    Explicit(String),
}

impl FromStr for VersionDirective {
    type Err = ReleaseNotesError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "MAJOR" => Ok(VersionDirective::Major),
            "MINOR" => Ok(VersionDirective::Minor),
            "PATCH" => Ok(VersionDirective::Patch),
            other => {
                if semver::Version::parse(other).is_ok() {
                    Ok(VersionDirective::Explicit(other.to_string()))
                } else {
                    Err(ReleaseNotesError::InvalidVersioningStrategy(format!(
                        "must be `MAJOR`, `MINOR`, `PATCH`, or an explicit semantic version \
                         such as 1.2.3, got `{}`",
                        other
                    )))
                }
            }
        }
    }
}

/// Computes the next release identifier from the chronologically-ascending
/// tag list and a versioning directive.
///
/// An explicit semver literal is returned unchanged. The keyword directives
/// take the last (most recent) tag, split it into numeric
/// `MAJOR.MINOR.PATCH` components, and increment one of them:
/// `MAJOR -> {maj+1}.0.0`, `MINOR -> {maj}.{min+1}.0`,
/// `PATCH -> {maj}.{min}.{patch+1}`.
///
/// # Errors
/// * [ReleaseNotesError::InvalidVersioningStrategy] - directive is neither a
///   keyword nor a valid semver literal
/// * [ReleaseNotesError::NoPriorTag] - an increment was requested but no tag
///   exists yet
/// * [ReleaseNotesError::Version] - the most recent tag is not `x.y.z` numeric
pub fn resolve_next_version(tags: &[String], directive: &str) -> Result<String> {
    let directive = VersionDirective::from_str(directive)?;

    let last_tag = match &directive {
        VersionDirective::Explicit(literal) => return Ok(literal.clone()),
        _ => tags.last().ok_or(ReleaseNotesError::NoPriorTag)?,
    };

    let (major, minor, patch) = split_numeric_components(last_tag)?;

    let next = match directive {
        VersionDirective::Major => format!("{}.0.0", major + 1),
        VersionDirective::Minor => format!("{}.{}.0", major, minor + 1),
        VersionDirective::Patch => format!("{}.{}.{}", major, minor, patch + 1),
        VersionDirective::Explicit(_) => unreachable!(),
    };

    Ok(next)
}

fn split_numeric_components(tag: &str) -> Result<(u64, u64, u64)> {
    let parts: Vec<&str> = tag.split('.').collect();
    if parts.len() != 3 {
        return Err(ReleaseNotesError::version(format!(
            "most recent tag `{}` does not have MAJOR.MINOR.PATCH form",
            tag
        )));
    }

    let component = |s: &str| {
        s.parse::<u64>().map_err(|_| {
            ReleaseNotesError::version(format!(
                "most recent tag `{}` has non-numeric component `{}`",
                tag, s
            ))
        })
    };

    Ok((component(parts[0])?, component(parts[1])?, component(parts[2])?))
}
