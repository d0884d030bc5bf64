use clap::Parser;

use project_release_notes::cli::{Args, Command};

#[test]
fn test_changelog_verb_with_short_flag() {
    let args = Args::try_parse_from(["release-notes", "-c", "--incrementVersion=PATCH"]).unwrap();

    match args.command {
        Command::Changelog {
            increment_version,
            tag,
            full,
        } => {
            assert_eq!(increment_version.as_deref(), Some("PATCH"));
            assert!(tag.is_none());
            assert!(!full);
        }
        _ => panic!("expected the changelog verb"),
    }
}

#[test]
fn test_changelog_verb_with_tag_flag() {
    let args = Args::try_parse_from(["release-notes", "--changelog", "--tag", "1.2.0"]).unwrap();

    match args.command {
        Command::Changelog { tag, .. } => assert_eq!(tag.as_deref(), Some("1.2.0")),
        _ => panic!("expected the changelog verb"),
    }
}

#[test]
fn test_changelog_verb_with_full_flag() {
    let args = Args::try_parse_from(["release-notes", "-c", "--full"]).unwrap();

    match args.command {
        Command::Changelog { full, .. } => assert!(full),
        _ => panic!("expected the changelog verb"),
    }
}

#[test]
fn test_tag_verb() {
    let args = Args::try_parse_from(["release-notes", "-t", "1.2.0"]).unwrap();

    match args.command {
        Command::Tag { tag_name } => assert_eq!(tag_name.as_deref(), Some("1.2.0")),
        _ => panic!("expected the tag verb"),
    }
}

#[test]
fn test_release_notes_verb_collects_emails() {
    let args = Args::try_parse_from([
        "release-notes",
        "-r",
        "dev@example.com",
        "qa@example.com",
    ])
    .unwrap();

    match args.command {
        Command::ReleaseNotes { emails } => {
            assert_eq!(emails, vec!["dev@example.com", "qa@example.com"]);
        }
        _ => panic!("expected the release-notes verb"),
    }
}

#[test]
fn test_config_path_flag_is_global() {
    let args = Args::try_parse_from([
        "release-notes",
        "-c",
        "--full",
        "--config",
        "custom.toml",
    ])
    .unwrap();

    assert_eq!(args.config.as_deref(), Some("custom.toml"));
}

#[test]
fn test_missing_verb_is_an_error() {
    assert!(Args::try_parse_from(["release-notes"]).is_err());
}

#[test]
fn test_help_is_available() {
    let err = Args::try_parse_from(["release-notes", "--help"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}
