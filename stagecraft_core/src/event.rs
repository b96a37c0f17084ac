// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Events, listeners, and per-actor dispatch.
//!
//! An [`EventDispatcher`] holds an ordered list of [`EventListener`]s and
//! walks them in registration order. A listener may filter by
//! [`EventType`], may be stopped and restarted, and may *swallow*: a
//! swallowing listener that handles an event ends that dispatch pass, and
//! the dispatcher reports the event as handled so tree propagation stops
//! too.
//!
//! Removal is deferred. Stopping or removing a listener from outside a
//! dispatch pass takes effect immediately for matching purposes; removed
//! listeners are physically dropped at the end of the next pass.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Point;

/// A mouse button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Wheel button.
    Middle,
}

/// A dispatchable input or user-defined event.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A mouse button was pressed.
    MouseDown {
        /// Pointer position in world coordinates.
        position: Point,
        /// Which button.
        button: MouseButton,
    },
    /// A mouse button was released.
    MouseUp {
        /// Pointer position in world coordinates.
        position: Point,
        /// Which button.
        button: MouseButton,
    },
    /// The pointer moved.
    MouseMoved {
        /// Pointer position in world coordinates.
        position: Point,
    },
    /// A key was pressed.
    KeyDown {
        /// Platform key code.
        key: u32,
    },
    /// A key was released.
    KeyUp {
        /// Platform key code.
        key: u32,
    },
    /// An application-defined event.
    Custom(u32),
}

impl Event {
    /// The type tag listeners filter on.
    #[must_use]
    pub fn event_type(&self) -> EventType {
        match self {
            Self::MouseDown { .. } => EventType::MouseDown,
            Self::MouseUp { .. } => EventType::MouseUp,
            Self::MouseMoved { .. } => EventType::MouseMoved,
            Self::KeyDown { .. } => EventType::KeyDown,
            Self::KeyUp { .. } => EventType::KeyUp,
            Self::Custom(_) => EventType::Custom,
        }
    }
}

/// Discriminant of [`Event`], used as a listener filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventType {
    /// [`Event::MouseDown`].
    MouseDown,
    /// [`Event::MouseUp`].
    MouseUp,
    /// [`Event::MouseMoved`].
    MouseMoved,
    /// [`Event::KeyDown`].
    KeyDown,
    /// [`Event::KeyUp`].
    KeyUp,
    /// [`Event::Custom`].
    Custom,
}

/// Listener callback. Shared so listeners stay cheaply clonable.
pub type EventCallback = Rc<dyn Fn(&Event)>;

/// A single registered event handler.
pub struct EventListener {
    name: Option<String>,
    filter: Option<EventType>,
    callback: EventCallback,
    running: bool,
    removeable: bool,
    swallow: bool,
}

impl EventListener {
    /// A listener that receives every event.
    #[must_use]
    pub fn new(callback: impl Fn(&Event) + 'static) -> Self {
        Self::build(None, None, Rc::new(callback))
    }

    /// A named listener that receives every event.
    #[must_use]
    pub fn named(
        name: impl Into<String>,
        callback: impl Fn(&Event) + 'static,
    ) -> Self {
        Self::build(Some(name.into()), None, Rc::new(callback))
    }

    /// A listener for one event type.
    #[must_use]
    pub fn for_type(
        event_type: EventType,
        callback: impl Fn(&Event) + 'static,
    ) -> Self {
        Self::build(None, Some(event_type), Rc::new(callback))
    }

    /// A named listener for one event type.
    #[must_use]
    pub fn named_for_type(
        name: impl Into<String>,
        event_type: EventType,
        callback: impl Fn(&Event) + 'static,
    ) -> Self {
        Self::build(Some(name.into()), Some(event_type), Rc::new(callback))
    }

    fn build(
        name: Option<String>,
        filter: Option<EventType>,
        callback: EventCallback,
    ) -> Self {
        Self {
            name,
            filter,
            callback,
            running: true,
            removeable: false,
            swallow: false,
        }
    }

    /// Makes a handled event end its dispatch pass. Returns `self` for
    /// construction chaining.
    #[must_use]
    pub fn swallowing(mut self) -> Self {
        self.swallow = true;
        self
    }

    /// Sets whether a handled event ends its dispatch pass.
    pub fn set_swallow(&mut self, swallow: bool) {
        self.swallow = swallow;
    }

    /// Whether this listener swallows handled events.
    #[must_use]
    pub fn swallows(&self) -> bool {
        self.swallow
    }

    /// Resumes handling.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Suspends handling without removing the listener.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Marks the listener for removal at the end of the next dispatch pass.
    pub fn remove(&mut self) {
        self.removeable = true;
    }

    /// Whether the listener currently handles events.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the listener is marked for removal.
    #[must_use]
    pub fn is_removeable(&self) -> bool {
        self.removeable
    }

    /// The listener's name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The type filter, if any. `None` matches every event.
    #[must_use]
    pub fn filter(&self) -> Option<EventType> {
        self.filter
    }

    fn matches(&self, event: &Event) -> bool {
        self.running
            && !self.removeable
            && self.filter.is_none_or(|t| t == event.event_type())
    }
}

impl fmt::Debug for EventListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListener")
            .field("name", &self.name)
            .field("filter", &self.filter)
            .field("running", &self.running)
            .field("removeable", &self.removeable)
            .field("swallow", &self.swallow)
            .finish_non_exhaustive()
    }
}

/// Ordered listener registry.
#[derive(Debug, Default)]
pub struct EventDispatcher {
    listeners: Vec<EventListener>,
}

impl EventDispatcher {
    /// An empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a listener. Listeners run in registration order.
    pub fn add_listener(&mut self, listener: EventListener) {
        self.listeners.push(listener);
    }

    /// Walks listeners in order, invoking every running match.
    ///
    /// Returns `true` if a swallowing listener handled the event, which
    /// callers treat as "stop propagating". Listeners marked for removal
    /// are dropped at the end of the pass.
    pub fn dispatch(&mut self, event: &Event) -> bool {
        let mut swallowed = false;
        for listener in &self.listeners {
            if !listener.matches(event) {
                continue;
            }
            (listener.callback)(event);
            if listener.swallow {
                swallowed = true;
                break;
            }
        }
        self.listeners.retain(|l| !l.removeable);
        swallowed
    }

    /// Resumes all listeners with the given name.
    pub fn start_listeners(&mut self, name: &str) {
        self.for_each_named(name, EventListener::start);
    }

    /// Suspends all listeners with the given name.
    pub fn stop_listeners(&mut self, name: &str) {
        self.for_each_named(name, EventListener::stop);
    }

    /// Marks all listeners with the given name for removal.
    pub fn remove_listeners(&mut self, name: &str) {
        self.for_each_named(name, EventListener::remove);
    }

    /// Resumes all listeners filtering on the given type.
    pub fn start_listeners_by_type(&mut self, event_type: EventType) {
        self.for_each_typed(event_type, EventListener::start);
    }

    /// Suspends all listeners filtering on the given type.
    pub fn stop_listeners_by_type(&mut self, event_type: EventType) {
        self.for_each_typed(event_type, EventListener::stop);
    }

    /// Marks all listeners filtering on the given type for removal.
    pub fn remove_listeners_by_type(&mut self, event_type: EventType) {
        self.for_each_typed(event_type, EventListener::remove);
    }

    /// Resumes every listener.
    pub fn start_all_listeners(&mut self) {
        for l in &mut self.listeners {
            l.start();
        }
    }

    /// Suspends every listener.
    pub fn stop_all_listeners(&mut self) {
        for l in &mut self.listeners {
            l.stop();
        }
    }

    /// Drops every listener immediately.
    pub fn remove_all_listeners(&mut self) {
        self.listeners.clear();
    }

    /// Registered listeners, including ones marked for removal.
    #[must_use]
    pub fn listeners(&self) -> &[EventListener] {
        &self.listeners
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listeners are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    fn for_each_named(&mut self, name: &str, f: impl Fn(&mut EventListener)) {
        for l in &mut self.listeners {
            if l.name.as_deref() == Some(name) {
                f(l);
            }
        }
    }

    fn for_each_typed(
        &mut self,
        event_type: EventType,
        f: impl Fn(&mut EventListener),
    ) {
        for l in &mut self.listeners {
            if l.filter == Some(event_type) {
                f(l);
            }
        }
    }
}
