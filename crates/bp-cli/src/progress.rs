use bp_session::ProgressReporter;
use colored::Colorize;

/// Prints object creation steps to stderr.
#[derive(Debug, Default)]
pub struct ConsoleProgress;

impl ProgressReporter for ConsoleProgress {
    fn step_started(&mut self, message: &str) {
        eprintln!("  {} {}", "…".dimmed(), message.dimmed());
    }

    fn step_completed(&mut self, message: &str) {
        eprintln!("  {} {}", "✓".green(), message);
    }

    fn step_failed(&mut self, message: &str) {
        eprintln!("  {} {}", "✗".red().bold(), message);
    }
}
