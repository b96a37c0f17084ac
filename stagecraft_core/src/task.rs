// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Periodic tasks and their per-actor scheduler.
//!
//! A [`Task`] runs a callback every time its [`Ticker`] fires; when a
//! finite ticker exhausts, the task removes itself. The callback receives
//! the task itself, so a callback can stop or remove its own task safely.
//!
//! [`TaskScheduler`] drives all tasks of one actor. Removal is deferred:
//! [`Task::remove`] only marks the task, and the scheduler purges marked
//! tasks after each update pass, so removal from inside a callback never
//! invalidates the pass in progress.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::ticker::Ticker;
use crate::time::{Duration, Repeat};

/// Task callback. The first argument is the task itself.
pub type TaskCallback = Rc<dyn Fn(&mut Task, Duration)>;

/// A periodic callback driven by a [`Ticker`].
pub struct Task {
    name: Option<String>,
    ticker: Ticker,
    callback: TaskCallback,
    running: bool,
    removeable: bool,
}

impl Task {
    /// A task firing every `interval`, at most `times` times.
    #[must_use]
    pub fn new(
        interval: Duration,
        times: Repeat,
        callback: impl Fn(&mut Self, Duration) + 'static,
    ) -> Self {
        Self {
            name: None,
            ticker: Ticker::new(interval, times),
            callback: Rc::new(callback),
            running: true,
            removeable: false,
        }
    }

    /// A named task. The name is the handle for
    /// [`TaskScheduler::stop_tasks`] and friends.
    #[must_use]
    pub fn named(
        name: impl Into<String>,
        interval: Duration,
        times: Repeat,
        callback: impl Fn(&mut Self, Duration) + 'static,
    ) -> Self {
        let mut task = Self::new(interval, times, callback);
        task.name = Some(name.into());
        task
    }

    /// Resumes the task.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Suspends the task. Its ticker stops accumulating.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Marks the task for removal after the current scheduler pass.
    pub fn remove(&mut self) {
        self.removeable = true;
    }

    /// Whether the task is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the task is marked for removal.
    #[must_use]
    pub fn is_removeable(&self) -> bool {
        self.removeable
    }

    /// The task's name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The driving ticker.
    #[must_use]
    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    /// Mutable access to the driving ticker.
    pub fn ticker_mut(&mut self) -> &mut Ticker {
        &mut self.ticker
    }

    fn update(&mut self, dt: Duration) {
        if !self.running || self.removeable {
            return;
        }
        let fires = self.ticker.update(dt);
        if fires > 0 {
            let callback = Rc::clone(&self.callback);
            for _ in 0..fires {
                callback(self, dt);
                if self.removeable {
                    break;
                }
            }
        }
        if self.ticker.is_exhausted() {
            self.removeable = true;
        }
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("ticker", &self.ticker)
            .field("running", &self.running)
            .field("removeable", &self.removeable)
            .finish_non_exhaustive()
    }
}

/// Drives the tasks of one actor.
#[derive(Debug, Default)]
pub struct TaskScheduler {
    tasks: Vec<Task>,
}

impl TaskScheduler {
    /// An empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a task.
    pub fn add_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Updates every task, then purges the ones marked for removal.
    pub fn update_tasks(&mut self, dt: Duration) {
        if self.tasks.is_empty() {
            return;
        }
        for task in &mut self.tasks {
            task.update(dt);
        }
        self.tasks.retain(|t| !t.removeable);
    }

    /// Resumes all tasks with the given name.
    pub fn start_tasks(&mut self, name: &str) {
        self.for_each_named(name, Task::start);
    }

    /// Suspends all tasks with the given name.
    pub fn stop_tasks(&mut self, name: &str) {
        self.for_each_named(name, Task::stop);
    }

    /// Marks all tasks with the given name for removal.
    pub fn remove_tasks(&mut self, name: &str) {
        self.for_each_named(name, Task::remove);
    }

    /// Resumes every task.
    pub fn start_all_tasks(&mut self) {
        for task in &mut self.tasks {
            task.start();
        }
    }

    /// Suspends every task.
    pub fn stop_all_tasks(&mut self) {
        for task in &mut self.tasks {
            task.stop();
        }
    }

    /// Drops every task immediately.
    pub fn remove_all_tasks(&mut self) {
        self.tasks.clear();
    }

    /// The scheduled tasks, including ones marked for removal.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of scheduled tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no tasks are scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn for_each_named(&mut self, name: &str, f: impl Fn(&mut Task)) {
        for task in &mut self.tasks {
            if task.name.as_deref() == Some(name) {
                f(task);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[test]
    fn fires_on_interval() {
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let mut scheduler = TaskScheduler::new();
        scheduler.add_task(Task::new(
            Duration::from_secs(1.0),
            Repeat::Forever,
            move |_, _| counter.set(counter.get() + 1),
        ));

        for _ in 0..6 {
            scheduler.update_tasks(Duration::from_secs(0.4));
        }
        assert_eq!(hits.get(), 2, "2.4s at a 1s interval");
    }

    #[test]
    fn finite_task_removes_itself() {
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let mut scheduler = TaskScheduler::new();
        scheduler.add_task(Task::new(
            Duration::from_secs(1.0),
            Repeat::Times(3),
            move |_, _| counter.set(counter.get() + 1),
        ));

        for _ in 0..10 {
            scheduler.update_tasks(Duration::from_secs(1.0));
        }
        assert_eq!(hits.get(), 3);
        assert!(scheduler.is_empty(), "exhausted task was purged");
    }

    #[test]
    fn callback_can_remove_its_own_task() {
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let mut scheduler = TaskScheduler::new();
        scheduler.add_task(Task::new(
            Duration::from_secs(1.0),
            Repeat::Forever,
            move |task, _| {
                counter.set(counter.get() + 1);
                task.remove();
            },
        ));

        scheduler.update_tasks(Duration::from_secs(5.0));
        assert_eq!(hits.get(), 1, "removal stops catch-up fires");
        assert!(scheduler.is_empty());

        scheduler.update_tasks(Duration::from_secs(5.0));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn named_control() {
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let mut scheduler = TaskScheduler::new();
        scheduler.add_task(Task::named(
            "heartbeat",
            Duration::from_secs(1.0),
            Repeat::Forever,
            move |_, _| counter.set(counter.get() + 1),
        ));

        scheduler.stop_tasks("heartbeat");
        scheduler.update_tasks(Duration::from_secs(3.0));
        assert_eq!(hits.get(), 0);

        scheduler.start_tasks("heartbeat");
        scheduler.update_tasks(Duration::from_secs(1.0));
        assert_eq!(hits.get(), 1);

        scheduler.remove_tasks("heartbeat");
        scheduler.update_tasks(Duration::from_secs(1.0));
        assert_eq!(hits.get(), 1, "removed before the pass ran it");
        assert!(scheduler.is_empty());
    }

    #[test]
    fn stopped_task_keeps_no_time() {
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let mut scheduler = TaskScheduler::new();
        scheduler.add_task(Task::named(
            "t",
            Duration::from_secs(1.0),
            Repeat::Forever,
            move |_, _| counter.set(counter.get() + 1),
        ));

        scheduler.stop_tasks("t");
        scheduler.update_tasks(Duration::from_secs(0.9));
        scheduler.start_tasks("t");
        scheduler.update_tasks(Duration::from_secs(0.9));
        assert_eq!(hits.get(), 0, "stopped time was not accumulated");
    }
}
