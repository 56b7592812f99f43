use chrono::Local;
use colored::*;

/// Small console logger. Each actor builds one with its own name and color,
/// so interleaved output from concurrent actors stays readable.
#[derive(Debug, Clone)]
pub struct Logger {
    pub name: String,
    pub color: Color,
}

impl Logger {
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into().to_uppercase(),
            color,
        }
    }

    fn prefix(&self, level: &str) -> String {
        format!(
            "[{}][{}][{}]",
            Local::now().format("%H:%M:%S"),
            level,
            self.name
        )
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        println!(
            "{} {}",
            self.prefix("INFO").bold().color(self.color),
            msg.as_ref()
        );
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        println!("{} {}", self.prefix("WARN").bold().yellow(), msg.as_ref());
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        eprintln!(
            "{} {}",
            self.prefix("ERROR").bold().bright_red(),
            msg.as_ref()
        );
    }
}
