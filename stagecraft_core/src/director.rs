// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The director: stage lifecycle and the frame loop.
//!
//! A [`Director`] owns the current [`Stage`] and drives one frame per
//! [`tick`](Director::tick): update (or transition), event dispatch, then
//! render. Switching stages may go through a [`Transition`], during which
//! both stages render while the outgoing one animates away; regular
//! updates resume once the transition finishes.

use kurbo::Vec2;

use crate::event::Event;
use crate::render::RenderContext;
use crate::stage::Stage;
use crate::time::Duration;

/// What one [`Director::tick`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    /// Frame number, starting at 1.
    pub frame: u64,
    /// The delta this frame advanced by.
    pub dt: Duration,
    /// Actors visited by the update traversal.
    pub actors_updated: u32,
    /// Actors whose content was drawn.
    pub actors_rendered: u32,
    /// Actors skipped by viewport culling.
    pub actors_culled: u32,
    /// Events offered to the current stage.
    pub events_dispatched: u32,
    /// Events a swallowing listener handled.
    pub events_swallowed: u32,
    /// Whether a stage transition was running.
    pub transitioning: bool,
    /// Whether the director was paused.
    pub paused: bool,
}

/// How a transition animates the two stages.
#[derive(Clone, Copy, Debug, PartialEq)]
enum TransitionKind {
    /// The outgoing stage fades out, then the incoming stage fades in.
    Fade,
    /// The outgoing stage shrinks while rotating; the incoming stage grows
    /// back, unwinding the same rotation.
    Rotation {
        /// Total rotation applied across the transition, in degrees.
        degrees: f64,
    },
}

/// Snapshot of a stage root's animated properties, restored on finish.
#[derive(Clone, Copy, Debug)]
struct RootPose {
    opacity: f64,
    cascade: bool,
    scale: Vec2,
    rotation: f64,
}

impl RootPose {
    /// Captures the root and forces opacity cascading on, so fading the
    /// root actually fades the scene under it.
    fn capture(stage: &mut Stage) -> Self {
        let root = stage.root();
        let pose = Self {
            opacity: stage.store().opacity(root),
            cascade: stage.store().cascade_opacity_enabled(root),
            scale: stage.store().scale(root),
            rotation: stage.store().rotation(root),
        };
        stage.store_mut().set_cascade_opacity(root, true);
        pose
    }

    fn restore(self, stage: &mut Stage) {
        let root = stage.root();
        stage.store_mut().set_opacity(root, self.opacity);
        stage.store_mut().set_cascade_opacity(root, self.cascade);
        stage.store_mut().set_scale(root, self.scale);
        stage.store_mut().set_rotation(root, self.rotation);
    }
}

/// An animated hand-over between two stages.
///
/// The transition drives the stage roots' opacity, scale, and rotation
/// directly; when it finishes, both roots are restored to the properties
/// they had when the transition began.
#[derive(Debug)]
pub struct Transition {
    kind: TransitionKind,
    duration: Duration,
    elapsed: Duration,
    outgoing_pose: Option<RootPose>,
    incoming_pose: Option<RootPose>,
}

impl Transition {
    /// A cross-fade: the outgoing stage fades out over the first half,
    /// the incoming stage fades in over the second.
    #[must_use]
    pub fn fade(duration: Duration) -> Self {
        Self::build(TransitionKind::Fade, duration)
    }

    /// A rotating zoom: the outgoing stage spins down to nothing, the
    /// incoming stage spins back up.
    #[must_use]
    pub fn rotation(duration: Duration, degrees: f64) -> Self {
        Self::build(TransitionKind::Rotation { degrees }, duration)
    }

    fn build(kind: TransitionKind, duration: Duration) -> Self {
        Self {
            kind,
            duration,
            elapsed: Duration::ZERO,
            outgoing_pose: None,
            incoming_pose: None,
        }
    }

    /// Total duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Snapshots both roots and puts the incoming stage in its starting
    /// pose so the first rendered frame is already mid-transition.
    fn begin(&mut self, outgoing: Option<&mut Stage>, incoming: &mut Stage) {
        self.outgoing_pose = outgoing.map(RootPose::capture);
        self.incoming_pose = Some(RootPose::capture(incoming));
        self.apply(0.0, None, Some(incoming));
    }

    /// Advances the animation. Returns `true` when finished, with both
    /// roots restored.
    fn advance(
        &mut self,
        dt: Duration,
        outgoing: Option<&mut Stage>,
        incoming: &mut Stage,
    ) -> bool {
        self.elapsed += dt;
        let progress = if self.duration.is_zero() {
            1.0
        } else {
            self.elapsed.div_duration(self.duration).min(1.0)
        };
        if progress >= 1.0 {
            self.finish(outgoing, incoming);
            return true;
        }
        self.apply(progress, outgoing, Some(incoming));
        false
    }

    fn finish(&mut self, outgoing: Option<&mut Stage>, incoming: &mut Stage) {
        if let (Some(pose), Some(stage)) = (self.outgoing_pose, outgoing) {
            pose.restore(stage);
        }
        if let Some(pose) = self.incoming_pose {
            pose.restore(incoming);
        }
    }

    fn apply(
        &self,
        progress: f64,
        outgoing: Option<&mut Stage>,
        incoming: Option<&mut Stage>,
    ) {
        match self.kind {
            TransitionKind::Fade => {
                if let (Some(pose), Some(stage)) =
                    (self.outgoing_pose, outgoing)
                {
                    // Out over the first half.
                    let fade = 1.0 - (progress * 2.0).min(1.0);
                    let root = stage.root();
                    stage.store_mut().set_opacity(root, pose.opacity * fade);
                }
                if let (Some(pose), Some(stage)) =
                    (self.incoming_pose, incoming)
                {
                    // In over the second half.
                    let fade = ((progress - 0.5) * 2.0).max(0.0);
                    let root = stage.root();
                    stage.store_mut().set_opacity(root, pose.opacity * fade);
                }
            }
            TransitionKind::Rotation { degrees } => {
                if let (Some(pose), Some(stage)) =
                    (self.outgoing_pose, outgoing)
                {
                    let root = stage.root();
                    stage
                        .store_mut()
                        .set_scale(root, pose.scale * (1.0 - progress));
                    stage.store_mut().set_rotation(
                        root,
                        pose.rotation + degrees * progress,
                    );
                }
                if let (Some(pose), Some(stage)) =
                    (self.incoming_pose, incoming)
                {
                    let root = stage.root();
                    stage.store_mut().set_scale(root, pose.scale * progress);
                    stage.store_mut().set_rotation(
                        root,
                        pose.rotation + degrees * (1.0 - progress),
                    );
                }
            }
        }
    }
}

/// Owns the current stage and drives the frame loop.
#[derive(Debug, Default)]
pub struct Director {
    current: Option<Stage>,
    outgoing: Option<Stage>,
    transition: Option<Transition>,
    paused: bool,
    frame: u64,
}

impl Director {
    /// A director with no stage. Ticks are no-ops until one is entered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current stage immediately.
    ///
    /// Any running transition is cut short without restoring poses; the
    /// stages involved are dropped.
    pub fn enter_stage(&mut self, stage: Stage) {
        self.transition = None;
        self.outgoing = None;
        self.current = Some(stage);
    }

    /// Replaces the current stage through a transition.
    ///
    /// The previous stage keeps rendering (but not updating) until the
    /// transition finishes, then is dropped. With no previous stage the
    /// transition still animates the incoming one in.
    pub fn enter_stage_with_transition(
        &mut self,
        stage: Stage,
        mut transition: Transition,
    ) {
        let mut incoming = stage;
        self.outgoing = self.current.take();
        transition.begin(self.outgoing.as_mut(), &mut incoming);
        self.current = Some(incoming);
        self.transition = Some(transition);
    }

    /// The current stage, if any.
    #[must_use]
    pub fn current_stage(&self) -> Option<&Stage> {
        self.current.as_ref()
    }

    /// Mutable access to the current stage.
    pub fn current_stage_mut(&mut self) -> Option<&mut Stage> {
        self.current.as_mut()
    }

    /// Whether a transition is running.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Freezes updates, events, and rendering.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resumes after [`pause`](Self::pause).
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Whether the director is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Runs one frame: update (or transition), dispatch `events` to the
    /// current stage, render.
    ///
    /// While a transition runs it replaces the stage update, so actions
    /// and tasks hold still during the hand-over. Render errors are
    /// logged; a failed `begin_draw` skips rendering for the frame.
    pub fn tick(
        &mut self,
        dt: Duration,
        events: &[Event],
        ctx: &mut impl RenderContext,
    ) -> FrameStats {
        self.frame += 1;
        let mut stats = FrameStats {
            frame: self.frame,
            dt,
            paused: self.paused,
            ..FrameStats::default()
        };
        if self.paused {
            return stats;
        }

        if let Some(current) = &mut self.current {
            match &mut self.transition {
                Some(transition) => {
                    stats.transitioning = true;
                    if transition.advance(dt, self.outgoing.as_mut(), current)
                    {
                        self.transition = None;
                        self.outgoing = None;
                    }
                }
                None => {
                    stats.actors_updated = current.update(dt);
                }
            }
        }

        if let Some(current) = &mut self.current {
            for event in events {
                stats.events_dispatched += 1;
                if current.dispatch(event) {
                    stats.events_swallowed += 1;
                }
            }
        }

        if let Err(error) = ctx.begin_draw() {
            log::error!("begin_draw failed: {error}");
            return stats;
        }
        for stage in self.outgoing.iter_mut().chain(&mut self.current) {
            let counts = stage.render(ctx);
            stats.actors_rendered += counts.rendered;
            stats.actors_culled += counts.culled;
        }
        if let Err(error) = ctx.end_draw() {
            log::error!("end_draw failed: {error}");
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    use kurbo::{Affine, Point, Rect, Size};

    use crate::action::Action;
    use crate::actor::ActorId;
    use crate::render::{
        Brush, Frame, RenderError, TextureId,
    };

    /// Counts frames and draw calls.
    #[derive(Default)]
    struct CountingContext {
        frames: u32,
        drawn: Vec<TextureId>,
        opacities: Vec<f64>,
    }

    impl RenderContext for CountingContext {
        fn begin_draw(&mut self) -> Result<(), RenderError> {
            self.frames += 1;
            self.drawn.clear();
            self.opacities.clear();
            Ok(())
        }

        fn end_draw(&mut self) -> Result<(), RenderError> {
            Ok(())
        }

        fn set_transform(&mut self, _transform: Affine) {}

        fn set_opacity(&mut self, opacity: f64) {
            self.opacities.push(opacity);
        }

        fn set_brush(&mut self, _brush: Brush) {}
        fn push_clip_rect(&mut self, _rect: Rect) {}
        fn pop_clip_rect(&mut self) {}

        fn draw_texture(
            &mut self,
            texture: TextureId,
            _src: Rect,
            _dst: Rect,
        ) -> Result<(), RenderError> {
            self.drawn.push(texture);
            Ok(())
        }

        fn draw_text(
            &mut self,
            _text: &str,
            _origin: Point,
        ) -> Result<(), RenderError> {
            Ok(())
        }

        fn draw_rectangle(&mut self, _rect: Rect) -> Result<(), RenderError> {
            Ok(())
        }

        fn fill_rounded_rectangle(
            &mut self,
            _rect: Rect,
            _radii: kurbo::Vec2,
        ) -> Result<(), RenderError> {
            Ok(())
        }
    }

    fn stage_with_texture(texture: u32) -> (Stage, ActorId) {
        let mut stage = Stage::new();
        let id = stage.store_mut().create_actor();
        stage.store_mut().set_size(id, Size::new(10.0, 10.0));
        stage.store_mut().set_content(
            id,
            Some(Frame::full(TextureId(texture), 10.0, 10.0)),
        );
        let root = stage.root();
        stage.store_mut().add_child(root, id);
        (stage, id)
    }

    fn dt(secs: f64) -> Duration {
        Duration::from_secs(secs)
    }

    #[test]
    fn tick_updates_dispatches_and_renders() {
        let mut director = Director::new();
        let (stage, actor) = stage_with_texture(1);
        director.enter_stage(stage);
        director
            .current_stage_mut()
            .unwrap()
            .store_mut()
            .add_action(
                actor,
                Action::move_by(kurbo::Vec2::new(10.0, 0.0), dt(1.0)),
            );

        let mut ctx = CountingContext::default();
        let stats = director.tick(dt(0.5), &[Event::Custom(1)], &mut ctx);
        assert_eq!(stats.frame, 1);
        assert_eq!(stats.actors_updated, 2, "root and the textured actor");
        assert_eq!(stats.events_dispatched, 1);
        assert_eq!(stats.actors_rendered, 1);
        assert!(!stats.transitioning);
        assert_eq!(
            director
                .current_stage()
                .unwrap()
                .store()
                .position(actor),
            Point::new(5.0, 0.0)
        );
    }

    #[test]
    fn tick_without_a_stage_is_a_no_op() {
        let mut director = Director::new();
        let mut ctx = CountingContext::default();
        let stats = director.tick(dt(0.1), &[], &mut ctx);
        assert_eq!(stats.actors_updated, 0);
        assert_eq!(stats.actors_rendered, 0);
        assert_eq!(ctx.frames, 1, "the frame still begins and ends");
    }

    #[test]
    fn paused_director_skips_the_frame() {
        let mut director = Director::new();
        let (stage, _) = stage_with_texture(1);
        director.enter_stage(stage);
        director.pause();

        let mut ctx = CountingContext::default();
        let stats = director.tick(dt(0.1), &[Event::Custom(1)], &mut ctx);
        assert!(stats.paused);
        assert_eq!(stats.events_dispatched, 0);
        assert_eq!(ctx.frames, 0, "nothing rendered while paused");

        director.resume();
        let stats = director.tick(dt(0.1), &[], &mut ctx);
        assert!(!stats.paused);
        assert_eq!(stats.actors_rendered, 1);
    }

    #[test]
    fn transition_renders_both_stages_and_freezes_updates() {
        let mut director = Director::new();
        let (first, _) = stage_with_texture(1);
        director.enter_stage(first);

        let (second, incoming_actor) = stage_with_texture(2);
        director.enter_stage_with_transition(
            second,
            Transition::rotation(dt(1.0), 360.0),
        );
        director
            .current_stage_mut()
            .unwrap()
            .store_mut()
            .add_action(
                incoming_actor,
                Action::move_by(kurbo::Vec2::new(10.0, 0.0), dt(1.0)),
            );
        assert!(director.is_transitioning());

        let mut ctx = CountingContext::default();
        let stats = director.tick(dt(0.25), &[], &mut ctx);
        assert!(stats.transitioning);
        assert_eq!(stats.actors_updated, 0, "updates hold during hand-over");
        assert_eq!(ctx.drawn, [TextureId(1), TextureId(2)]);
        assert_eq!(
            director
                .current_stage()
                .unwrap()
                .store()
                .position(incoming_actor),
            Point::ZERO,
            "actions did not advance"
        );
    }

    #[test]
    fn fade_hands_over_at_the_midpoint() {
        let mut director = Director::new();
        let (first, _) = stage_with_texture(1);
        director.enter_stage(first);
        let (second, _) = stage_with_texture(2);
        director.enter_stage_with_transition(second, Transition::fade(dt(1.0)));

        // First half: only the outgoing stage is visible, half faded.
        let mut ctx = CountingContext::default();
        director.tick(dt(0.25), &[], &mut ctx);
        assert_eq!(ctx.drawn, [TextureId(1)]);
        assert_eq!(ctx.opacities, [0.5]);

        // Second half: only the incoming stage, fading in.
        director.tick(dt(0.5), &[], &mut ctx);
        assert_eq!(ctx.drawn, [TextureId(2)]);
        assert_eq!(ctx.opacities, [0.5]);
    }

    #[test]
    fn transition_finishes_and_restores_the_root() {
        let mut director = Director::new();
        let (first, _) = stage_with_texture(1);
        director.enter_stage(first);
        let (second, actor) = stage_with_texture(2);
        director
            .enter_stage_with_transition(second, Transition::fade(dt(0.5)));

        let mut ctx = CountingContext::default();
        let stats = director.tick(dt(0.5), &[], &mut ctx);
        assert!(stats.transitioning, "reported for the finishing frame");
        assert!(!director.is_transitioning());

        let current = director.current_stage().unwrap();
        let root = current.root();
        assert_eq!(current.store().opacity(root), 1.0, "pose restored");
        assert_eq!(ctx.drawn, [TextureId(2)], "outgoing stage dropped");

        // Updates resume the next frame.
        director
            .current_stage_mut()
            .unwrap()
            .store_mut()
            .add_action(
                actor,
                Action::move_by(kurbo::Vec2::new(10.0, 0.0), dt(1.0)),
            );
        let stats = director.tick(dt(0.5), &[], &mut ctx);
        assert!(stats.actors_updated > 0);
    }

    #[test]
    fn rotation_transition_scales_the_roots() {
        let mut director = Director::new();
        let (first, _) = stage_with_texture(1);
        director.enter_stage(first);
        let (second, _) = stage_with_texture(2);
        director.enter_stage_with_transition(
            second,
            Transition::rotation(dt(1.0), 360.0),
        );

        let mut ctx = CountingContext::default();
        director.tick(dt(0.5), &[], &mut ctx);

        let current = director.current_stage().unwrap();
        let root = current.root();
        let scale = current.store().scale(root);
        assert!((scale.x - 0.5).abs() < 1e-9);
        let rotation = current.store().rotation(root);
        assert!((rotation - 180.0).abs() < 1e-9);
    }

    #[test]
    fn entering_without_transition_drops_the_old_stage() {
        let mut director = Director::new();
        let (first, _) = stage_with_texture(1);
        director.enter_stage(first);
        let (second, _) = stage_with_texture(2);
        director.enter_stage(second);

        let mut ctx = CountingContext::default();
        director.tick(dt(0.1), &[], &mut ctx);
        assert_eq!(ctx.drawn, [TextureId(2)]);
    }

    #[test]
    fn transition_into_an_empty_director_animates_the_incoming_stage() {
        let mut director = Director::new();
        let (stage, _) = stage_with_texture(1);
        director
            .enter_stage_with_transition(stage, Transition::fade(dt(1.0)));

        let current = director.current_stage().unwrap();
        let root = current.root();
        assert_eq!(
            current.store().opacity(root),
            0.0,
            "starts transparent"
        );
    }
}
