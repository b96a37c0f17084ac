// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Duration-based property tweens.
//!
//! A [`Tween`] interpolates one actor property over a fixed duration. `By`
//! kinds apply a delta relative to the property value snapshotted when the
//! tween (re)starts, so a looping `MoveBy` keeps walking; `To` kinds
//! interpolate from the snapshot to an absolute target.

use kurbo::{Point, Vec2};

use super::CycleOutcome;
use crate::actor::{ActorId, ActorStore};
use crate::time::Duration;

/// Easing applied to tween progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant speed.
    #[default]
    Linear,
    /// Quadratic, slow start.
    QuadIn,
    /// Quadratic, slow end.
    QuadOut,
    /// Quadratic, slow start and end.
    QuadInOut,
    /// Cubic, slow start.
    CubicIn,
    /// Cubic, slow end.
    CubicOut,
    /// Cubic, slow start and end.
    CubicInOut,
}

impl Easing {
    /// Maps linear progress `t` in `[0, 1]` to eased progress.
    #[must_use]
    pub fn ease(self, t: f64) -> f64 {
        match self {
            Self::Linear => t,
            Self::QuadIn => t * t,
            Self::QuadOut => t * (2.0 - t),
            Self::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = t - 1.0;
                    1.0 - 2.0 * u * u
                }
            }
            Self::CubicIn => t * t * t,
            Self::CubicOut => {
                let u = t - 1.0;
                1.0 + u * u * u
            }
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = t - 1.0;
                    1.0 + 4.0 * u * u * u
                }
            }
        }
    }
}

/// Which property a tween animates, and how.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TweenKind {
    /// Move by an offset from the starting position.
    MoveBy(Vec2),
    /// Move to an absolute position.
    MoveTo(Point),
    /// Add a delta to the starting scale.
    ScaleBy(Vec2),
    /// Scale to absolute factors.
    ScaleTo(Vec2),
    /// Rotate by degrees from the starting rotation.
    RotateBy(f64),
    /// Rotate to an absolute rotation in degrees.
    RotateTo(f64),
    /// Add a delta to the starting opacity.
    FadeBy(f64),
    /// Fade to an absolute opacity.
    FadeTo(f64),
}

/// Starting property values, snapshotted when a tween cycle begins.
#[derive(Clone, Copy, Debug)]
struct StartState {
    position: Point,
    scale: Vec2,
    rotation: f64,
    opacity: f64,
}

/// One property interpolated over a duration.
#[derive(Clone, Debug)]
pub struct Tween {
    kind: TweenKind,
    duration: Duration,
    easing: Easing,
    t: Duration,
    start: Option<StartState>,
}

impl Tween {
    /// A tween over `duration` with linear easing.
    #[must_use]
    pub fn new(kind: TweenKind, duration: Duration) -> Self {
        Self {
            kind,
            duration,
            easing: Easing::Linear,
            t: Duration::ZERO,
            start: None,
        }
    }

    /// Replaces the easing.
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// The animated property and mode.
    #[must_use]
    pub fn kind(&self) -> TweenKind {
        self.kind
    }

    /// The cycle duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// The easing in use.
    #[must_use]
    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub(super) fn begin(&mut self, store: &ActorStore, target: ActorId) {
        self.t = Duration::ZERO;
        self.start = Some(StartState {
            position: store.position(target),
            scale: store.scale(target),
            rotation: store.rotation(target),
            opacity: store.opacity(target),
        });
    }

    pub(super) fn advance(
        &mut self,
        store: &mut ActorStore,
        target: ActorId,
        dt: Duration,
    ) -> CycleOutcome {
        let Some(start) = self.start else {
            panic!("tween advanced before begin");
        };
        self.t += dt;
        let progress = if self.duration.is_zero() {
            1.0
        } else {
            self.t.div_duration(self.duration).min(1.0)
        };
        let e = self.easing.ease(progress);
        match self.kind {
            TweenKind::MoveBy(offset) => {
                store.set_position(target, start.position + offset * e);
            }
            TweenKind::MoveTo(end) => {
                store.set_position(target, start.position.lerp(end, e));
            }
            TweenKind::ScaleBy(delta) => {
                store.set_scale(target, start.scale + delta * e);
            }
            TweenKind::ScaleTo(end) => {
                store.set_scale(target, start.scale.lerp(end, e));
            }
            TweenKind::RotateBy(degrees) => {
                store.set_rotation(target, start.rotation + degrees * e);
            }
            TweenKind::RotateTo(end) => {
                store.set_rotation(
                    target,
                    start.rotation + (end - start.rotation) * e,
                );
            }
            TweenKind::FadeBy(delta) => {
                store.set_opacity(target, start.opacity + delta * e);
            }
            TweenKind::FadeTo(end) => {
                store.set_opacity(
                    target,
                    start.opacity + (end - start.opacity) * e,
                );
            }
        }
        if progress >= 1.0 {
            CycleOutcome::Complete
        } else {
            CycleOutcome::Running
        }
    }

    /// Drops runtime state so the next cycle re-snapshots.
    pub(super) fn rewind(&mut self) {
        self.t = Duration::ZERO;
        self.start = None;
    }

    /// Same parameters, fresh runtime state.
    #[must_use]
    pub(super) fn restarted(&self) -> Self {
        Self {
            kind: self.kind,
            duration: self.duration,
            easing: self.easing,
            t: Duration::ZERO,
            start: None,
        }
    }

    /// The opposite tween, where one exists.
    ///
    /// `By` kinds negate their delta. `To` kinds have no meaningful
    /// opposite without knowing the pre-run value, so they come back as a
    /// plain restart and a warning is logged.
    #[must_use]
    pub(super) fn reversed(&self) -> Self {
        let kind = match self.kind {
            TweenKind::MoveBy(offset) => TweenKind::MoveBy(-offset),
            TweenKind::ScaleBy(delta) => TweenKind::ScaleBy(-delta),
            TweenKind::RotateBy(degrees) => TweenKind::RotateBy(-degrees),
            TweenKind::FadeBy(delta) => TweenKind::FadeBy(-delta),
            absolute @ (TweenKind::MoveTo(_)
            | TweenKind::ScaleTo(_)
            | TweenKind::RotateTo(_)
            | TweenKind::FadeTo(_)) => {
                log::warn!(
                    "reversing an absolute tween ({absolute:?}) yields a copy"
                );
                absolute
            }
        };
        Self {
            kind,
            ..self.restarted()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_endpoints_are_fixed() {
        for easing in [
            Easing::Linear,
            Easing::QuadIn,
            Easing::QuadOut,
            Easing::QuadInOut,
            Easing::CubicIn,
            Easing::CubicOut,
            Easing::CubicInOut,
        ] {
            assert!(easing.ease(0.0).abs() < 1e-12, "{easing:?} at 0");
            assert!((easing.ease(1.0) - 1.0).abs() < 1e-12, "{easing:?} at 1");
        }
    }

    #[test]
    fn easing_is_monotonic() {
        for easing in [
            Easing::QuadIn,
            Easing::QuadOut,
            Easing::QuadInOut,
            Easing::CubicIn,
            Easing::CubicOut,
            Easing::CubicInOut,
        ] {
            let mut prev = 0.0;
            for i in 1..=100 {
                let v = easing.ease(f64::from(i) / 100.0);
                assert!(v >= prev, "{easing:?} dipped at step {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn reversal_negates_relative_kinds() {
        let tween = Tween::new(
            TweenKind::MoveBy(Vec2::new(3.0, -4.0)),
            Duration::from_secs(1.0),
        );
        assert_eq!(
            tween.reversed().kind(),
            TweenKind::MoveBy(Vec2::new(-3.0, 4.0))
        );

        let rotate = Tween::new(TweenKind::RotateBy(90.0), Duration::ZERO);
        assert_eq!(rotate.reversed().kind(), TweenKind::RotateBy(-90.0));
    }

    #[test]
    fn reversal_of_absolute_kind_is_a_copy() {
        let tween = Tween::new(
            TweenKind::MoveTo(Point::new(5.0, 5.0)),
            Duration::from_secs(1.0),
        );
        assert_eq!(tween.reversed().kind(), tween.kind());
    }
}
