//! Terminal output utilities

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Print a success message
pub fn success(msg: &str) {
    eprintln!("{} {}", style("✓").green().bold(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red().bold(), msg);
}

/// Print a header
pub fn header(msg: &str) {
    eprintln!("\n{}", style(msg).bold().underlined());
}

/// Create a spinner on stderr, leaving stdout for snippet text and links
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(spinner_style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
