//! User-facing output on stdout.
//!
//! Status lines respect `--quiet` and `--no-color`; command results written
//! with [`OutputManager::data`] are always printed so they can be piped.

use std::io;

use console::Term;
use owo_colors::{AnsiColors, OwoColorize};

use crate::cli::GlobalArgs;

#[derive(Debug, Clone, Copy)]
enum Marker {
    Success,
    Warning,
    Info,
}

impl Marker {
    fn symbol(self) -> &'static str {
        match self {
            Self::Success => "\u{2713}", // ✓
            Self::Warning => "\u{26a0}", // ⚠
            Self::Info => "\u{2139}",    // ℹ
        }
    }

    fn color(self) -> AnsiColors {
        match self {
            Self::Success => AnsiColors::Green,
            Self::Warning => AnsiColors::Yellow,
            Self::Info => AnsiColors::Blue,
        }
    }
}

pub struct OutputManager {
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    pub fn new(args: &GlobalArgs) -> Self {
        let term = Term::stdout();
        Self {
            quiet: args.quiet,
            no_color: args.no_color || !term.features().colors_supported(),
            term,
        }
    }

    /// Plain status line.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        self.status(msg.to_owned())
    }

    /// Command result meant for other programs.
    pub fn data(&self, text: &str) -> io::Result<()> {
        self.term.write_line(text)
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.marked(Marker::Success, msg)
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.marked(Marker::Warning, msg)
    }

    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.marked(Marker::Info, msg)
    }

    /// Section title, bold cyan when colored.
    pub fn header(&self, text: &str) -> io::Result<()> {
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.status(line)
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    fn marked(&self, marker: Marker, msg: &str) -> io::Result<()> {
        self.status(self.format_marked(marker, msg))
    }

    fn format_marked(&self, marker: Marker, msg: &str) -> String {
        if self.no_color {
            return format!("{} {msg}", marker.symbol());
        }
        format!(
            "{} {}",
            marker.symbol().color(marker.color()).bold(),
            msg.color(marker.color())
        )
    }

    fn status(&self, line: String) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(&line)
    }
}
