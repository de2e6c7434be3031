//! Unified output formatting utilities for consistent CLI presentation.
//!
//! Standardized ✓/⚠/✗ message helpers used by every command. Colors come
//! from `colored`, which disables itself when stdout is not a TTY.
//!
//! # Colors
//! - Green check for successes, yellow warning sign for skips and
//!   warnings, red cross for errors
//! - Informational lines in plain white, detail lines in bright black

use colored::*;

/// Formats and prints an error message.
///
/// ```text
/// ✗ Error: <message>
/// ```
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗ Error:".red(), message.white());
}

/// Formats and prints a warning or skip notice.
///
/// ```text
/// ⚠ <message>
/// ```
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message.white());
}

/// Formats and prints a success message.
///
/// ```text
/// ✓ <message>
/// ```
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message.white());
}

/// Formats and prints an informational message.
pub fn print_info(message: &str) {
    println!("{}", message.white());
}

/// Formats and prints a muted detail line, indented under the row it
/// belongs to.
pub fn print_detail(message: &str) {
    println!("  {}", message.bright_black());
}

/// Formats and prints a section header.
///
/// ```text
///
/// <header>:
/// ```
pub fn print_section_header(header: &str) {
    println!("\n{}:", header.white());
}
