//! Colored terminal output for the demo binary.

use owo_colors::OwoColorize;

use crate::resource::{Container, Context, Image};
use crate::watch::EventRecord;

/// Maximum length for truncated display strings.
const DEFAULT_MAX_LEN: usize = 60;

/// Truncate a string to a maximum length, adding ellipsis if truncated.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}

/// Print one container row.
pub fn print_container(container: &Container) {
    let state = if container.is_running() {
        format!("{}", container.state.green())
    } else {
        format!("{}", container.state.red())
    };
    println!(
        "{:<14} {:<24} {:<10} {}",
        container.id.dimmed(),
        truncate(&container.names, 24),
        state,
        truncate(&container.image, DEFAULT_MAX_LEN)
    );
}

/// Print one image row.
pub fn print_image(image: &Image) {
    println!(
        "{:<14} {:<40} {}",
        image.id.dimmed(),
        truncate(&image.reference().unwrap_or_else(|| "<none>".to_string()), 40),
        image.size
    );
}

/// Print one context row, marking the active one.
pub fn print_context(context: &Context) {
    let marker = if context.current { "*" } else { " " };
    println!(
        "{} {:<16} {}",
        marker.yellow().bold(),
        context.name,
        context.docker_endpoint.dimmed()
    );
}

/// Print one event feed record.
pub fn print_event(record: &EventRecord) {
    let time = record
        .timestamp()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string());
    println!(
        "{} {:<10} {:<12} {}",
        time.dimmed(),
        record.kind.blue(),
        record.action().bold(),
        truncate(record.subject(), DEFAULT_MAX_LEN)
    );
}

/// Print an error to stderr.
pub fn print_error(message: &str) {
    eprintln!("{} {message}", "error:".red().bold());
}
