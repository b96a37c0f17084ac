// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable frame output.
//!
//! [`PrettyPrinter`] writes one line per [`FrameStats`] to a
//! [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use stagecraft_core::director::FrameStats;

/// Writes human-readable frame lines to a [`Write`](std::io::Write)
/// destination.
pub struct PrettyPrinter<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrinter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrinter").finish_non_exhaustive()
    }
}

impl PrettyPrinter {
    /// A printer that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// A printer that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrinter<W> {
    /// A printer that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Prints one frame line. Write errors are swallowed.
    pub fn print(&mut self, stats: &FrameStats) {
        let mode = if stats.paused {
            " paused"
        } else if stats.transitioning {
            " transition"
        } else {
            ""
        };
        let _ = writeln!(
            self.writer,
            "[frame {}] dt={:.1}ms updated={} rendered={} culled={} events={}/{}{}",
            stats.frame,
            stats.dt.as_millis(),
            stats.actors_updated,
            stats.actors_rendered,
            stats.actors_culled,
            stats.events_swallowed,
            stats.events_dispatched,
            mode,
        );
    }

    /// Prints a run of frames in order.
    pub fn print_all(&mut self, frames: &[FrameStats]) {
        for stats in frames {
            self.print(stats);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagecraft_core::time::Duration;

    fn printed(stats: &FrameStats) -> String {
        let mut printer = PrettyPrinter::with_writer(Vec::new());
        printer.print(stats);
        String::from_utf8(printer.writer).unwrap()
    }

    #[test]
    fn one_line_per_frame() {
        let stats = FrameStats {
            frame: 42,
            dt: Duration::from_millis(16.0),
            actors_updated: 120,
            actors_rendered: 80,
            actors_culled: 5,
            events_dispatched: 4,
            events_swallowed: 1,
            transitioning: false,
            paused: false,
        };
        assert_eq!(
            printed(&stats),
            "[frame 42] dt=16.0ms updated=120 rendered=80 culled=5 events=1/4\n"
        );
    }

    #[test]
    fn mode_suffix_marks_special_frames() {
        let base = FrameStats {
            frame: 1,
            dt: Duration::from_millis(16.0),
            ..FrameStats::default()
        };
        let transitioning = FrameStats {
            transitioning: true,
            ..base
        };
        assert!(printed(&transitioning).trim_end().ends_with("transition"));

        let paused = FrameStats { paused: true, ..base };
        assert!(printed(&paused).trim_end().ends_with("paused"));
    }
}
