use console::style;

use crate::git::workflow::{PushReport, RefStatus};

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

pub fn display_warn(message: &str) {
    eprintln!("{} {}", style("WARN:").yellow().bold(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Print the per-ref outcome of a push. Refs that were updated or already
/// current read as successes; anything else is a warning, never an abort.
pub fn display_push_report(report: &PushReport) {
    for entry in &report.refs {
        match &entry.status {
            RefStatus::Ok => display_success(&format!(
                "Push Ref: [{}], Push Status: [OK]",
                entry.refname
            )),
            RefStatus::Rejected(reason) => display_warn(&format!(
                "Push Ref: [{}], Push Status: [REJECTED], Push Message: [{}]",
                entry.refname, reason
            )),
        }
    }
}
