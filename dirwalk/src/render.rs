//! Output rendering for walk results.
//!
//! Text mode streams one relative path per line as entries arrive. JSON mode
//! collects the whole walk and prints a single document.

use std::io::{self, Write};
use std::ops::ControlFlow;
use std::str::FromStr;

use console::style;
use dirwalklib::{Entry, WalkError, WalkHandler, WalkReport};
use serde::Serialize;

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// One relative path per line
    #[default]
    Text,
    /// `{ "entries": [...], "errors": [...] }`
    Json,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputMode::Text),
            "json" => Ok(OutputMode::Json),
            _ => Err(format!("Unknown output mode: {}", s)),
        }
    }
}

/// Streams entries to `out` and errors to `err`.
pub struct TextRenderer<O: Write, E: Write> {
    out: O,
    err: E,
    strict: bool,
    /// Number of walk errors seen
    pub errors: usize,
    /// Set when `out` stopped accepting writes (e.g. a closed pipe)
    pub closed: Option<io::Error>,
}

impl<O: Write, E: Write> TextRenderer<O, E> {
    pub fn new(out: O, err: E, strict: bool) -> Self {
        Self {
            out,
            err,
            strict,
            errors: 0,
            closed: None,
        }
    }
}

impl<O: Write, E: Write> WalkHandler for TextRenderer<O, E> {
    fn on_entry(&mut self, entry: Entry) -> ControlFlow<()> {
        match writeln!(self.out, "{}", entry.relname_slash()) {
            Ok(()) => ControlFlow::Continue(()),
            Err(e) => {
                self.closed = Some(e);
                ControlFlow::Break(())
            }
        }
    }

    fn on_error(&mut self, error: WalkError) -> ControlFlow<()> {
        self.errors += 1;
        // Nowhere left to report a failing stderr
        let _ = writeln!(
            self.err,
            "{} {}",
            style("error:").red().bold().for_stderr(),
            error
        );

        if self.strict {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    fn on_complete(&mut self) {
        if self.closed.is_none() {
            if let Err(e) = self.out.flush() {
                self.closed = Some(e);
            }
        }
    }
}

/// Collects a walk for JSON output.
pub struct JsonRenderer {
    strict: bool,
    pub report: WalkReport,
}

impl JsonRenderer {
    pub fn new(strict: bool) -> Self {
        Self {
            strict,
            report: WalkReport::default(),
        }
    }
}

impl WalkHandler for JsonRenderer {
    fn on_entry(&mut self, entry: Entry) -> ControlFlow<()> {
        self.report.on_entry(entry)
    }

    fn on_error(&mut self, error: WalkError) -> ControlFlow<()> {
        self.report.errors.push(error);
        if self.strict {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

/// JSON document shape
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    entries: &'a [Entry],
    errors: &'a [WalkError],
}

/// Render a collected walk as pretty JSON.
pub fn render_json(report: &WalkReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        entries: &report.entries,
        errors: &report.errors,
    })
}
