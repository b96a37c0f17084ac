// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame recording and run summaries.
//!
//! [`FrameRecorder`] keeps every [`FrameStats`] handed to it and reduces
//! the run to a [`RunSummary`] on demand. Feed it from the frame loop:
//!
//! ```ignore
//! let stats = director.tick(dt, &events, &mut ctx);
//! recorder.record(stats);
//! ```

use stagecraft_core::director::FrameStats;
use stagecraft_core::time::Duration;

/// Totals over a recorded run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunSummary {
    /// Number of recorded frames.
    pub frames: u64,
    /// Sum of frame deltas.
    pub total_time: Duration,
    /// Mean frame delta, zero for an empty run.
    pub mean_dt: Duration,
    /// Longest single frame delta.
    pub max_dt: Duration,
    /// Total actors visited by update traversals.
    pub actors_updated: u64,
    /// Total actors drawn.
    pub actors_rendered: u64,
    /// Total actors skipped by viewport culling.
    pub actors_culled: u64,
    /// Total events offered to stages.
    pub events_dispatched: u64,
    /// Total events swallowed by listeners.
    pub events_swallowed: u64,
    /// Frames spent inside a stage transition.
    pub transition_frames: u64,
    /// Frames spent paused.
    pub paused_frames: u64,
}

/// Accumulates [`FrameStats`], one per tick.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    frames: Vec<FrameStats>,
}

impl FrameRecorder {
    /// An empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one frame.
    pub fn record(&mut self, stats: FrameStats) {
        self.frames.push(stats);
    }

    /// The recorded frames in tick order.
    #[must_use]
    pub fn frames(&self) -> &[FrameStats] {
        &self.frames
    }

    /// Drops all recorded frames.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Reduces the run to totals.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary {
            frames: self.frames.len() as u64,
            ..RunSummary::default()
        };
        for stats in &self.frames {
            summary.total_time += stats.dt;
            if stats.dt.as_secs() > summary.max_dt.as_secs() {
                summary.max_dt = stats.dt;
            }
            summary.actors_updated += u64::from(stats.actors_updated);
            summary.actors_rendered += u64::from(stats.actors_rendered);
            summary.actors_culled += u64::from(stats.actors_culled);
            summary.events_dispatched += u64::from(stats.events_dispatched);
            summary.events_swallowed += u64::from(stats.events_swallowed);
            summary.transition_frames += u64::from(stats.transitioning);
            summary.paused_frames += u64::from(stats.paused);
        }
        if summary.frames > 0 {
            summary.mean_dt = Duration::from_secs(
                summary.total_time.as_secs() / summary.frames as f64,
            );
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(n: u64, dt_secs: f64) -> FrameStats {
        FrameStats {
            frame: n,
            dt: Duration::from_secs(dt_secs),
            actors_updated: 10,
            actors_rendered: 8,
            actors_culled: 2,
            events_dispatched: 3,
            events_swallowed: 1,
            transitioning: false,
            paused: false,
        }
    }

    #[test]
    fn empty_run_summarizes_to_zeros() {
        let recorder = FrameRecorder::new();
        assert_eq!(recorder.summary(), RunSummary::default());
    }

    #[test]
    fn summary_totals_across_frames() {
        let mut recorder = FrameRecorder::new();
        recorder.record(frame(1, 0.016));
        recorder.record(frame(2, 0.032));
        recorder.record(FrameStats {
            transitioning: true,
            ..frame(3, 0.016)
        });

        let summary = recorder.summary();
        assert_eq!(summary.frames, 3);
        assert!((summary.total_time.as_secs() - 0.064).abs() < 1e-12);
        assert!((summary.max_dt.as_secs() - 0.032).abs() < 1e-12);
        assert_eq!(summary.actors_updated, 30);
        assert_eq!(summary.actors_rendered, 24);
        assert_eq!(summary.actors_culled, 6);
        assert_eq!(summary.events_dispatched, 9);
        assert_eq!(summary.events_swallowed, 3);
        assert_eq!(summary.transition_frames, 1);
        assert_eq!(summary.paused_frames, 0);
    }

    #[test]
    fn clear_resets_the_run() {
        let mut recorder = FrameRecorder::new();
        recorder.record(frame(1, 0.016));
        recorder.clear();
        assert!(recorder.frames().is_empty());
        assert_eq!(recorder.summary().frames, 0);
    }
}
