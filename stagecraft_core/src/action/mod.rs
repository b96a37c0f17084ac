// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-driven actions and the per-actor animator.
//!
//! An [`Action`] animates one target actor through a small state machine:
//!
//! ```text
//!   NotStarted ──► Delayed ──► Started ──► Done ──► Removeable
//!        │                        ▲  │
//!        └────(no delay)──────────┘  └──(loop budget left)──► re-init
//! ```
//!
//! Leaf actions are [`Tween`]s, fixed delays, and one-shot callbacks.
//! Composites run children in order ([`Action::sequence`]), all at once
//! ([`Action::spawn`]), or repeatedly ([`Action::repeat`]). Composites own
//! their children outright, so [`Action::cloned`] and [`Action::reversed`]
//! are deep and total.
//!
//! Looping lives on every action: a finite loop budget of `Times(n)` runs
//! exactly n cycles, firing the loop-done callback after each cycle and the
//! done callback once at the end.
//!
//! The [`Animator`] drives all actions attached to one actor and purges
//! finished ones after each pass.

mod tween;

pub use tween::{Easing, Tween, TweenKind};

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Vec2};

use crate::actor::{ActorId, ActorStore};
use crate::time::{Duration, Repeat};

/// Lifecycle state of an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// Never updated.
    NotStarted,
    /// Waiting out its start delay.
    Delayed,
    /// Animating.
    Started,
    /// Finished; callbacks pending.
    Done,
    /// Finished and ready to be purged.
    Removeable,
}

/// Callback fired on action completion, with access to the scene.
pub type ActionCallback = Rc<dyn Fn(&mut ActorStore, ActorId)>;

/// Outcome of advancing an action by one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CycleOutcome {
    /// The current cycle is still running.
    Running,
    /// The current cycle finished this frame.
    Complete,
}

enum ActionKind {
    Tween(Tween),
    Delay { duration: Duration, t: Duration },
    Call(ActionCallback),
    Sequence { children: Vec<Action>, index: usize },
    Spawn { children: Vec<Action> },
    Loop { child: Box<Action>, budget: Repeat, done: u32 },
}

impl fmt::Debug for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tween(t) => f.debug_tuple("Tween").field(t).finish(),
            Self::Delay { duration, t } => f
                .debug_struct("Delay")
                .field("duration", duration)
                .field("t", t)
                .finish(),
            Self::Call(_) => write!(f, "Call"),
            Self::Sequence { children, index } => f
                .debug_struct("Sequence")
                .field("children", children)
                .field("index", index)
                .finish(),
            Self::Spawn { children } => {
                f.debug_struct("Spawn").field("children", children).finish()
            }
            Self::Loop { child, budget, done } => f
                .debug_struct("Loop")
                .field("child", child)
                .field("budget", budget)
                .field("done", done)
                .finish(),
        }
    }
}

/// A scheduled animation against one target actor.
pub struct Action {
    kind: ActionKind,
    status: Status,
    elapsed: Duration,
    delay: Duration,
    loops: Repeat,
    loops_done: u32,
    running: bool,
    name: Option<String>,
    detach_on_done: bool,
    on_done: Option<ActionCallback>,
    on_loop_done: Option<ActionCallback>,
}

impl Action {
    fn from_kind(kind: ActionKind) -> Self {
        Self {
            kind,
            status: Status::NotStarted,
            elapsed: Duration::ZERO,
            delay: Duration::ZERO,
            loops: Repeat::ONCE,
            loops_done: 0,
            running: true,
            name: None,
            detach_on_done: false,
            on_done: None,
            on_loop_done: None,
        }
    }

    /// Wraps a [`Tween`].
    #[must_use]
    pub fn tween(tween: Tween) -> Self {
        Self::from_kind(ActionKind::Tween(tween))
    }

    /// Moves the target by an offset over `duration`.
    #[must_use]
    pub fn move_by(offset: Vec2, duration: Duration) -> Self {
        Self::tween(Tween::new(TweenKind::MoveBy(offset), duration))
    }

    /// Moves the target to an absolute position over `duration`.
    #[must_use]
    pub fn move_to(position: Point, duration: Duration) -> Self {
        Self::tween(Tween::new(TweenKind::MoveTo(position), duration))
    }

    /// Adds a delta to the target's scale over `duration`.
    #[must_use]
    pub fn scale_by(delta: Vec2, duration: Duration) -> Self {
        Self::tween(Tween::new(TweenKind::ScaleBy(delta), duration))
    }

    /// Scales the target to absolute factors over `duration`.
    #[must_use]
    pub fn scale_to(scale: Vec2, duration: Duration) -> Self {
        Self::tween(Tween::new(TweenKind::ScaleTo(scale), duration))
    }

    /// Rotates the target by degrees over `duration`.
    #[must_use]
    pub fn rotate_by(degrees: f64, duration: Duration) -> Self {
        Self::tween(Tween::new(TweenKind::RotateBy(degrees), duration))
    }

    /// Rotates the target to an absolute rotation over `duration`.
    #[must_use]
    pub fn rotate_to(degrees: f64, duration: Duration) -> Self {
        Self::tween(Tween::new(TweenKind::RotateTo(degrees), duration))
    }

    /// Adds a delta to the target's opacity over `duration`.
    #[must_use]
    pub fn fade_by(delta: f64, duration: Duration) -> Self {
        Self::tween(Tween::new(TweenKind::FadeBy(delta), duration))
    }

    /// Fades the target to an absolute opacity over `duration`.
    #[must_use]
    pub fn fade_to(opacity: f64, duration: Duration) -> Self {
        Self::tween(Tween::new(TweenKind::FadeTo(opacity), duration))
    }

    /// Does nothing for `duration`. Useful inside sequences.
    #[must_use]
    pub fn wait(duration: Duration) -> Self {
        Self::from_kind(ActionKind::Delay {
            duration,
            t: Duration::ZERO,
        })
    }

    /// Invokes a callback once, then completes.
    #[must_use]
    pub fn call(callback: impl Fn(&mut ActorStore, ActorId) + 'static) -> Self {
        Self::from_kind(ActionKind::Call(Rc::new(callback)))
    }

    /// Runs children one after another.
    #[must_use]
    pub fn sequence(children: Vec<Self>) -> Self {
        Self::from_kind(ActionKind::Sequence { children, index: 0 })
    }

    /// Runs children simultaneously; completes when the last one does.
    #[must_use]
    pub fn spawn(children: Vec<Self>) -> Self {
        Self::from_kind(ActionKind::Spawn { children })
    }

    /// Repeats a child action under its own budget.
    #[must_use]
    pub fn repeat(child: Self, budget: Repeat) -> Self {
        Self::from_kind(ActionKind::Loop {
            child: Box::new(child),
            budget,
            done: 0,
        })
    }

    /// Delays the start by `delay`. The delay applies once, not per loop.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the loop budget. `Times(n)` runs exactly n cycles.
    #[must_use]
    pub fn with_loops(mut self, loops: Repeat) -> Self {
        self.loops = loops;
        self
    }

    /// Names the action.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Fires when the action completes for good.
    #[must_use]
    pub fn on_done(
        mut self,
        callback: impl Fn(&mut ActorStore, ActorId) + 'static,
    ) -> Self {
        self.on_done = Some(Rc::new(callback));
        self
    }

    /// Fires after every completed cycle.
    #[must_use]
    pub fn on_loop_done(
        mut self,
        callback: impl Fn(&mut ActorStore, ActorId) + 'static,
    ) -> Self {
        self.on_loop_done = Some(Rc::new(callback));
        self
    }

    /// Detaches the target from its parent when the action completes.
    #[must_use]
    pub fn detaching_target_on_done(mut self) -> Self {
        self.detach_on_done = true;
        self
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Whether the action finished (done or awaiting purge).
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self.status, Status::Done | Status::Removeable)
    }

    /// Whether updates are being applied.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Suspends the action in place.
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Resumes a paused action.
    pub fn resume(&mut self) {
        self.running = true;
    }

    /// The action's name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Time since the first update, including the start delay.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Completed cycles so far.
    #[must_use]
    pub fn loops_done(&self) -> u32 {
        self.loops_done
    }

    /// Advances the state machine by one frame against `target`.
    ///
    /// # Panics
    ///
    /// Panics if `target` is stale.
    pub fn update_step(
        &mut self,
        store: &mut ActorStore,
        target: ActorId,
        dt: Duration,
    ) {
        store.validate(target);
        if !self.running || self.status == Status::Removeable {
            return;
        }
        self.elapsed += dt;

        if self.status == Status::NotStarted {
            if self.delay.is_zero() {
                self.status = Status::Started;
                self.init(store, target);
            } else {
                self.status = Status::Delayed;
            }
        }
        if self.status == Status::Delayed && self.elapsed >= self.delay {
            self.status = Status::Started;
            self.init(store, target);
        }
        if self.status == Status::Started
            && self.advance(store, target, dt) == CycleOutcome::Complete
        {
            self.complete(store, target);
        }
        if self.status == Status::Done {
            if let Some(on_done) = &self.on_done {
                let callback = Rc::clone(on_done);
                callback(store, target);
            }
            if self.detach_on_done {
                store.remove_from_parent(target);
            }
            self.status = Status::Removeable;
        }
    }

    /// Same parameters, fresh runtime state, untouched by any prior run.
    #[must_use]
    pub fn cloned(&self) -> Self {
        Self {
            kind: self.kind.cloned(),
            status: Status::NotStarted,
            elapsed: Duration::ZERO,
            delay: self.delay,
            loops: self.loops,
            loops_done: 0,
            running: true,
            name: self.name.clone(),
            detach_on_done: self.detach_on_done,
            on_done: self.on_done.clone(),
            on_loop_done: self.on_loop_done.clone(),
        }
    }

    /// The opposite action, fresh, with the same shell parameters.
    ///
    /// Sequences reverse both the child order and each child, so a
    /// sequence followed by its reverse returns the target to where it
    /// began. Absolute tweens fall back to copies (see
    /// [`Tween`] reversal notes).
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            kind: self.kind.reversed(),
            ..self.cloned()
        }
    }

    fn init(&mut self, store: &mut ActorStore, target: ActorId) {
        match &mut self.kind {
            ActionKind::Tween(tween) => tween.begin(store, target),
            ActionKind::Delay { t, .. } => *t = Duration::ZERO,
            ActionKind::Call(_) => {}
            ActionKind::Sequence { children, index } => {
                *index = 0;
                for child in children {
                    child.rewind();
                }
            }
            ActionKind::Spawn { children } => {
                for child in children {
                    child.rewind();
                }
            }
            ActionKind::Loop { child, done, .. } => {
                *done = 0;
                child.rewind();
            }
        }
    }

    fn advance(
        &mut self,
        store: &mut ActorStore,
        target: ActorId,
        dt: Duration,
    ) -> CycleOutcome {
        match &mut self.kind {
            ActionKind::Tween(tween) => tween.advance(store, target, dt),
            ActionKind::Delay { duration, t } => {
                *t += dt;
                if *t >= *duration {
                    CycleOutcome::Complete
                } else {
                    CycleOutcome::Running
                }
            }
            ActionKind::Call(callback) => {
                let callback = Rc::clone(callback);
                callback(store, target);
                CycleOutcome::Complete
            }
            ActionKind::Sequence { children, index } => {
                if children.is_empty() {
                    return CycleOutcome::Complete;
                }
                let child = &mut children[*index];
                child.update_step(store, target, dt);
                if child.is_done() {
                    *index += 1;
                    if *index >= children.len() {
                        return CycleOutcome::Complete;
                    }
                }
                CycleOutcome::Running
            }
            ActionKind::Spawn { children } => {
                if children.is_empty() {
                    return CycleOutcome::Complete;
                }
                let mut all_done = true;
                for child in children.iter_mut() {
                    if !child.is_done() {
                        child.update_step(store, target, dt);
                    }
                    all_done &= child.is_done();
                }
                if all_done {
                    CycleOutcome::Complete
                } else {
                    CycleOutcome::Running
                }
            }
            ActionKind::Loop { child, budget, done } => {
                child.update_step(store, target, dt);
                if child.is_done() {
                    *done += 1;
                    if budget.reached(*done) {
                        return CycleOutcome::Complete;
                    }
                    child.rewind();
                }
                CycleOutcome::Running
            }
        }
    }

    fn complete(&mut self, store: &mut ActorStore, target: ActorId) {
        self.loops_done += 1;
        if let Some(on_loop_done) = &self.on_loop_done {
            let callback = Rc::clone(on_loop_done);
            callback(store, target);
        }
        if self.loops.reached(self.loops_done) {
            self.status = Status::Done;
        } else {
            self.init(store, target);
        }
    }

    /// Back to `NotStarted` with zeroed runtime state, recursively.
    fn rewind(&mut self) {
        self.status = Status::NotStarted;
        self.elapsed = Duration::ZERO;
        self.loops_done = 0;
        match &mut self.kind {
            ActionKind::Tween(tween) => tween.rewind(),
            ActionKind::Delay { t, .. } => *t = Duration::ZERO,
            ActionKind::Call(_) => {}
            ActionKind::Sequence { children, index } => {
                *index = 0;
                for child in children {
                    child.rewind();
                }
            }
            ActionKind::Spawn { children } => {
                for child in children {
                    child.rewind();
                }
            }
            ActionKind::Loop { child, done, .. } => {
                *done = 0;
                child.rewind();
            }
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("kind", &self.kind)
            .field("status", &self.status)
            .field("elapsed", &self.elapsed)
            .field("delay", &self.delay)
            .field("loops", &self.loops)
            .field("loops_done", &self.loops_done)
            .field("running", &self.running)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ActionKind {
    fn cloned(&self) -> Self {
        match self {
            Self::Tween(tween) => Self::Tween(tween.restarted()),
            Self::Delay { duration, .. } => Self::Delay {
                duration: *duration,
                t: Duration::ZERO,
            },
            Self::Call(callback) => Self::Call(Rc::clone(callback)),
            Self::Sequence { children, .. } => Self::Sequence {
                children: children.iter().map(Action::cloned).collect(),
                index: 0,
            },
            Self::Spawn { children } => Self::Spawn {
                children: children.iter().map(Action::cloned).collect(),
            },
            Self::Loop { child, budget, .. } => Self::Loop {
                child: Box::new(child.cloned()),
                budget: *budget,
                done: 0,
            },
        }
    }

    fn reversed(&self) -> Self {
        match self {
            Self::Tween(tween) => Self::Tween(tween.reversed()),
            Self::Sequence { children, .. } => Self::Sequence {
                children: children.iter().rev().map(Action::reversed).collect(),
                index: 0,
            },
            Self::Spawn { children } => Self::Spawn {
                children: children.iter().map(Action::reversed).collect(),
            },
            Self::Loop { child, budget, .. } => Self::Loop {
                child: Box::new(child.reversed()),
                budget: *budget,
                done: 0,
            },
            other @ (Self::Delay { .. } | Self::Call(_)) => other.cloned(),
        }
    }
}

/// Drives the actions attached to one actor.
#[derive(Debug, Default)]
pub struct Animator {
    actions: Vec<Action>,
}

impl Animator {
    /// An empty animator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules an action.
    pub fn add_action(&mut self, action: Action) {
        self.actions.push(action);
    }

    /// Updates every action, then purges removeable ones.
    pub fn update(
        &mut self,
        store: &mut ActorStore,
        target: ActorId,
        dt: Duration,
    ) {
        if self.actions.is_empty() {
            return;
        }
        for action in &mut self.actions {
            action.update_step(store, target, dt);
        }
        self.actions.retain(|a| a.status != Status::Removeable);
    }

    /// Suspends every action in place.
    pub fn pause_all_actions(&mut self) {
        for action in &mut self.actions {
            action.pause();
        }
    }

    /// Resumes every paused action.
    pub fn resume_all_actions(&mut self) {
        for action in &mut self.actions {
            action.resume();
        }
    }

    /// Drops every action immediately.
    pub fn stop_all_actions(&mut self) {
        self.actions.clear();
    }

    /// Drops all actions with the given name.
    pub fn stop_actions(&mut self, name: &str) {
        self.actions.retain(|a| a.name.as_deref() != Some(name));
    }

    /// The scheduled actions.
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Number of scheduled actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether no actions are scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Appends another animator's actions, preserving order.
    pub(crate) fn absorb(&mut self, other: Self) {
        self.actions.extend(other.actions);
    }
}
