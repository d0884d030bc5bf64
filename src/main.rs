use anyhow::Result;
use clap::Parser;

use project_release_notes::cli::{self, Args};
use project_release_notes::ui;

fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(e) = cli::dispatch(args) {
        ui::display_error(&e.to_string());
        std::process::exit(1);
    }

    Ok(())
}
