//! Command-line surface.
//!
//! The verbs form a closed set: help, changelog, tag, release-notes.
//! Exactly one runs per invocation; `tag` and `release-notes` are stubs
//! kept for CLI compatibility with the original tool.

pub mod changelog;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;

#[derive(Parser, Debug)]
#[command(
    name = "release-notes",
    about = "Generate changelogs from git merge history and a Jira project, \
             then commit, tag, and push the result"
)]
pub struct Args {
    #[arg(long, global = true, help = "Custom configuration file path")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the changelog and record it as a committed, tagged, and
    /// pushed artifact
    #[command(short_flag = 'c', long_flag = "changelog")]
    Changelog {
        /// MAJOR, MINOR, PATCH, or an explicit semantic version such as 1.2.3
        #[arg(long = "incrementVersion", value_name = "STRATEGY")]
        increment_version: Option<String>,

        /// Generate for an existing tag instead of cutting a new release
        #[arg(long, value_name = "TAG")]
        tag: Option<String>,

        /// Regenerate the changelog for every tag in the repository
        #[arg(long)]
        full: bool,
    },

    /// Tag the configured project and push the tag
    #[command(short_flag = 't', long_flag = "tag")]
    Tag {
        #[arg(value_name = "TAG")]
        tag_name: Option<String>,
    },

    /// Send release notes for a tag to the given recipients
    #[command(short_flag = 'r', long_flag = "release-notes")]
    ReleaseNotes {
        #[arg(value_name = "EMAIL")]
        emails: Vec<String>,
    },
}

/// Routes the parsed verb to its handler.
pub fn dispatch(args: Args) -> Result<()> {
    match args.command {
        Command::Changelog {
            increment_version,
            tag,
            full,
        } => {
            let mode = changelog::ChangelogMode::from_flags(increment_version, tag, full)?;
            let config = Config::load(args.config.as_deref())?;
            changelog::run(mode, &config)
        }
        Command::Tag { .. } | Command::ReleaseNotes { .. } => {
            println!("Not yet implemented");
            Ok(())
        }
    }
}
