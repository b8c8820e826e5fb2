use chrono::Local;
use colored::*;

/// Named console logger. Each actor owns one with its own color.
#[derive(Debug, Clone)]
pub struct Logger {
    pub name: String,
    pub info_color: Color,
    pub verbose: bool,
}

impl Logger {
    pub fn new(name: impl Into<String>, info_color: Color) -> Self {
        Self {
            name: name.into().to_uppercase(),
            info_color,
            verbose: false,
        }
    }

    /// Enables `debug` output.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn timestamp() -> String {
        Local::now().format("%H:%M:%S%.3f").to_string()
    }

    fn line(&self, level: &str) -> String {
        format!("[{}][{}][{}]", Self::timestamp(), level, self.name)
    }

    pub fn debug(&self, msg: impl AsRef<str>) {
        if !self.verbose {
            return;
        }
        println!(
            "{} {} {}",
            self.line("DEBUG").dimmed(),
            "→".dimmed(),
            msg.as_ref().dimmed()
        );
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        println!(
            "{} {} {}",
            self.line("INFO").bold().color(self.info_color),
            "→".dimmed(),
            msg.as_ref()
        );
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        println!(
            "{} {} {}",
            self.line("WARN").bold().yellow(),
            "→".dimmed(),
            msg.as_ref()
        );
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        eprintln!(
            "{} {} {}",
            self.line("ERROR").bold().bright_red(),
            "→".dimmed(),
            msg.as_ref()
        );
    }
}
