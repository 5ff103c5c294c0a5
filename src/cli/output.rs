//! Terminal output for the genre-server CLI.
//!
//! Every status line is rendered once as a string, in color or with a plain
//! `[TAG]` prefix, and then printed. Errors go to stderr.

use owo_colors::OwoColorize;

/// Kind of status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Level {
    Ok,
    Info,
    Warn,
    Error,
    Created,
    Skipped,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Ok => "OK",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Created => "CREATED",
            Level::Skipped => "SKIPPED",
        }
    }

    fn symbol(self) -> String {
        match self {
            Level::Ok | Level::Created => "✓".green().bold().to_string(),
            Level::Info => "•".blue().to_string(),
            Level::Warn => "⚠".yellow().bold().to_string(),
            Level::Error => "✗".red().bold().to_string(),
            Level::Skipped => "○".yellow().to_string(),
        }
    }
}

/// Width of the key column in [`Output::field`] rows.
const FIELD_WIDTH: usize = 18;

/// CLI printer, colored unless `--no-color` was given.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    /// Whether to use ANSI colors
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Colored output.
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Plain output with `[TAG]` prefixes.
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Picks the printer for the global `--no-color` flag.
    pub fn for_flag(no_color: bool) -> Self {
        if no_color {
            Self::no_color()
        } else {
            Self::new()
        }
    }

    fn render(&self, level: Level, message: &str) -> String {
        if self.colored {
            format!("  {} {}", level.symbol(), message)
        } else {
            format!("  [{}] {}", level.tag(), message)
        }
    }

    fn render_field(&self, key: &str, value: &str) -> String {
        let key = format!("{:<width$}", format!("{key}:"), width = FIELD_WIDTH);
        if self.colored {
            format!("    {} {}", key.dimmed(), value.bright_white())
        } else {
            format!("    {} {}", key, value)
        }
    }

    /// Prints one status line; errors go to stderr.
    pub fn status(&self, level: Level, message: &str) {
        let line = self.render(level, message);
        if level == Level::Error {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    /// Green check line.
    pub fn success(&self, message: &str) {
        self.status(Level::Ok, message);
    }

    /// Neutral line.
    pub fn info(&self, message: &str) {
        self.status(Level::Info, message);
    }

    /// Yellow warning line.
    pub fn warning(&self, message: &str) {
        self.status(Level::Warn, message);
    }

    /// Red error line on stderr.
    pub fn error(&self, message: &str) {
        self.status(Level::Error, message);
    }

    /// A file or directory written by `init`.
    pub fn created(&self, path: &str) {
        self.status(Level::Created, path);
    }

    /// A file `init` left alone.
    pub fn skipped(&self, path: &str, reason: &str) {
        self.status(Level::Skipped, &format!("{path} ({reason})"));
    }

    /// Result line of a blacklist prune.
    pub fn pruned(&self, removed: u64) {
        self.success(&pruned_message(removed));
    }

    /// Aligned `key: value` row, as printed by `config`.
    pub fn field(&self, key: &str, value: &str) {
        println!("{}", self.render_field(key, value));
    }

    /// Name and version header.
    pub fn banner(&self) {
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        if self.colored {
            println!(
                "\n   {} {}\n",
                "genre-server".bright_cyan().bold(),
                version.dimmed()
            );
        } else {
            println!("\n   genre-server {version}\n");
        }
    }

    /// Underlined section title.
    pub fn section(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {title} ===");
        }
    }

    /// Numbered follow-up instruction with an optional shell command.
    pub fn next_step(&self, number: usize, description: &str, command: Option<&str>) {
        self.info(&format!("{number}. {description}"));
        if let Some(cmd) = command {
            if self.colored {
                println!("     {}", format!("$ {cmd}").bright_cyan());
            } else {
                println!("     $ {cmd}");
            }
        }
    }

    /// Dimmed tip line.
    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "hint:".dimmed(), message.dimmed().italic());
        } else {
            println!("  [TIP] {message}");
        }
    }

    /// Closing line of a successful command.
    pub fn done(&self, message: &str) {
        if self.colored {
            println!("\n  {}", message.bright_green().bold());
        } else {
            println!("\n  [DONE] {message}");
        }
    }
}

fn pruned_message(removed: u64) -> String {
    match removed {
        1 => "Removed 1 expired blacklist entry".to_string(),
        n => format!("Removed {n} expired blacklist entries"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_lines_use_tags() {
        let output = Output::no_color();

        assert_eq!(output.render(Level::Ok, "ready"), "  [OK] ready");
        assert_eq!(output.render(Level::Error, "boom"), "  [ERROR] boom");
        assert_eq!(
            output.render(Level::Created, "genres.toml"),
            "  [CREATED] genres.toml"
        );
    }

    #[test]
    fn test_colored_lines_drop_tags() {
        let line = Output::new().render(Level::Warn, "careful");

        assert!(line.contains("careful"));
        assert!(!line.contains("[WARN]"));
    }

    #[test]
    fn test_fields_are_aligned() {
        let output = Output::no_color();

        let short = output.render_field("File", "genres.toml");
        let long = output.render_field("Bind address", "127.0.0.1:3000");

        assert_eq!(short.find("genres.toml"), long.find("127.0.0.1:3000"));
    }

    #[test]
    fn test_pruned_message_pluralizes() {
        assert_eq!(pruned_message(0), "Removed 0 expired blacklist entries");
        assert_eq!(pruned_message(1), "Removed 1 expired blacklist entry");
        assert_eq!(pruned_message(7), "Removed 7 expired blacklist entries");
    }

    #[test]
    fn test_for_flag() {
        assert!(!Output::for_flag(true).colored);
        assert!(Output::for_flag(false).colored);
    }
}
