//! Terminal output helpers for consistent styling.

/// ANSI color codes using true color (24-bit)
pub mod colors {
    pub const HEADER: &str = "\x1b[38;2;180;210;255m";
    pub const DIM: &str = "\x1b[38;2;140;140;140m";
    pub const MARK: &str = "\x1b[38;2;255;214;110m";
    pub const BOLD: &str = "\x1b[1m";
    pub const RESET: &str = "\x1b[0m";
}

/// Unicode symbols
pub mod symbols {
    pub const OK: &str = "✓";
    pub const ERR: &str = "✗";
    pub const WARN: &str = "!";
    pub const ARROW: &str = "›";
}

/// Horizontal rule
pub const HR: &str =
    "──────────────────────────────────────────────────────────────────────";

/// Print a styled header with version
pub fn print_header(name: &str, version: &str) {
    println!();
    println!("{}{} v{}{}", colors::HEADER, name, version, colors::RESET);
    println!("{}{}{}", colors::DIM, HR, colors::RESET);
}

/// Print a footer with horizontal rule
pub fn print_footer() {
    println!("{}{}{}", colors::DIM, HR, colors::RESET);
    println!();
}

/// Print an OK line with checkmark
pub fn print_ok(message: &str) {
    println!("  {} {}", console::style(symbols::OK).green(), message);
}

/// Print an error line with X
pub fn print_err(message: &str) {
    println!("  {} {}", console::style(symbols::ERR).red().bold(), message);
}

/// Print a warning line
pub fn print_warn(message: &str) {
    println!("  {} {}", console::style(symbols::WARN).yellow(), message);
}

/// Print an aligned key/value line
pub fn print_kv(key: &str, value: &str, key_width: usize) {
    println!(
        "  {}{:key_width$}{} {}",
        colors::DIM,
        key,
        colors::RESET,
        value,
        key_width = key_width
    );
}
