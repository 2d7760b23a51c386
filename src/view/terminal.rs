//! Terminal rendering for the command line

use colored::Colorize;
use std::io::{IsTerminal, Write};

use super::{BoundingRegion, ListEntry, Marker, ResultsView, StatusTone};
use crate::models::Coordinates;

/// Prints each surface update as it happens.
///
/// A terminal cannot take lines back, so clearing the results prints a
/// separator instead.
pub struct TerminalView<W: Write + Send> {
    out: W,
    color: bool,
    markers: usize,
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            markers: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            tracing::warn!("Failed to write to terminal: {}", e);
        }
    }
}

impl TerminalView<std::io::Stdout> {
    /// Colored output only when stdout is a terminal
    pub fn stdout() -> Self {
        let out = std::io::stdout();
        let color = out.is_terminal();
        Self::new(out, color)
    }
}

impl<W: Write + Send> ResultsView for TerminalView<W> {
    fn set_status(&mut self, message: &str, tone: StatusTone) {
        let text = match (tone, self.color) {
            (StatusTone::Error, true) => message.red().bold().to_string(),
            (StatusTone::Info, true) => message.dimmed().to_string(),
            _ => message.to_string(),
        };
        self.line(&text);
    }

    fn clear_results(&mut self) {
        self.markers = 0;
        self.line("");
    }

    fn show_placeholder(&mut self, text: &str) {
        let text = if self.color {
            text.italic().to_string()
        } else {
            text.to_string()
        };
        self.line(&format!("  {text}"));
    }

    fn add_marker(&mut self, _marker: Marker) {
        self.markers += 1;
    }

    fn append_entry(&mut self, entry: ListEntry) {
        let heading = if self.color {
            entry.heading().bold().to_string()
        } else {
            entry.heading()
        };
        self.line(&heading);
        self.line(&format!("   {}", entry.address));
    }

    fn set_view(&mut self, center: Coordinates, zoom: u8) {
        self.line(&format!("Map: centered on {} at zoom {}", center.format(), zoom));
    }

    fn fit_bounds(&mut self, bounds: BoundingRegion, _padding: u32) {
        self.line(&format!(
            "Map: {} markers between ({:.4}, {:.4}) and ({:.4}, {:.4})",
            self.markers, bounds.south, bounds.west, bounds.north, bounds.east
        ));
    }
}
