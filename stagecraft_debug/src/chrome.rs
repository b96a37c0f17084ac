// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] writes recorded frames as [Chrome Trace Event Format][spec]
//! JSON to the given writer, suitable for loading into `chrome://tracing`
//! or [Perfetto](https://ui.perfetto.dev/).
//!
//! Each frame becomes one complete (`"ph": "X"`) event whose timestamp is
//! the sum of the preceding frame deltas, so the trace timeline matches
//! simulated time rather than wall-clock time.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use stagecraft_core::director::FrameStats;

/// Exports recorded frames as Chrome Trace Event Format JSON.
pub fn export(frames: &[FrameStats], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut elapsed_us = 0.0;

    for stats in frames {
        let duration_us = stats.dt.as_secs() * 1_000_000.0;
        events.push(json!({
            "ph": "X",
            "name": frame_name(stats),
            "cat": "Frame",
            "ts": elapsed_us,
            "dur": duration_us,
            "pid": 0,
            "tid": 0,
            "args": {
                "frame": stats.frame,
                "actors_updated": stats.actors_updated,
                "actors_rendered": stats.actors_rendered,
                "actors_culled": stats.actors_culled,
                "events_dispatched": stats.events_dispatched,
                "events_swallowed": stats.events_swallowed,
            }
        }));
        elapsed_us += duration_us;
    }

    serde_json::to_writer(&mut *writer, &Value::Array(events))?;
    writer.flush()
}

fn frame_name(stats: &FrameStats) -> &'static str {
    if stats.paused {
        "Frame (paused)"
    } else if stats.transitioning {
        "Frame (transition)"
    } else {
        "Frame"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagecraft_core::time::Duration;

    fn frame(n: u64, dt_secs: f64) -> FrameStats {
        FrameStats {
            frame: n,
            dt: Duration::from_secs(dt_secs),
            actors_updated: 2,
            actors_rendered: 1,
            ..FrameStats::default()
        }
    }

    #[test]
    fn exports_a_complete_event_per_frame() {
        let frames = [frame(1, 0.016), frame(2, 0.016)];
        let mut out = Vec::new();
        export(&frames, &mut out).unwrap();

        let parsed: Value = serde_json::from_slice(&out).unwrap();
        let events = parsed.as_array().unwrap();
        assert_eq!(events.len(), 2);

        let first = &events[0];
        assert_eq!(first["ph"], "X");
        assert_eq!(first["ts"], 0.0);
        assert_eq!(first["dur"], 16_000.0);
        assert_eq!(first["args"]["actors_updated"], 2);

        // The second frame starts where the first ended.
        assert_eq!(events[1]["ts"], 16_000.0);
    }

    #[test]
    fn transition_frames_are_labeled() {
        let frames = [FrameStats {
            transitioning: true,
            ..frame(1, 0.016)
        }];
        let mut out = Vec::new();
        export(&frames, &mut out).unwrap();
        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[0]["name"], "Frame (transition)");
    }

    #[test]
    fn empty_run_exports_an_empty_array() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        assert_eq!(out, b"[]");
    }
}
