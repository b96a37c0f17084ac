// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core scene graph, animation, and frame loop for a 2D engine.
//!
//! `stagecraft_core` provides the foundational data structures of a
//! retained-mode 2D scene: an actor tree with lazily cached derived state,
//! time-driven actions and tasks, per-actor event listeners, and a
//! director that drives it all one frame at a time. It is `no_std`
//! compatible (with `alloc`) and uses array-based struct-of-arrays storage
//! with generational index handles for cache-friendly traversal.
//!
//! # Architecture
//!
//! The crate is organized around a frame loop the embedder drives from its
//! platform event loop:
//!
//! ```text
//!   Embedder (dt + input events)
//!       │
//!       ▼
//!   Director::tick() ──► Stage::update() ──► tasks / actions / callbacks
//!                    ──► Stage::dispatch() ──► EventListener callbacks
//!                    ──► Stage::render() ──► RenderContext (platform)
//!                    ──► FrameStats
//! ```
//!
//! **[`actor`]** — Struct-of-arrays actor tree with generational handles.
//! Authored properties (transform, size, anchor, opacity, visibility) are
//! set by the caller; world transforms, displayed opacities, and effective
//! visibility are cached and revalidated lazily on access.
//!
//! **[`dirty`]** — Per-actor dirty bits, one channel per cached quantity.
//! Mutations mark only the mutated actor; queries scan the ancestor chain
//! and recompute the stale stretch top-down.
//!
//! **[`action`]** — Time-driven animations: property tweens with easing,
//! delays, callbacks, and sequence/spawn/loop composition, scheduled on an
//! actor's animator.
//!
//! **[`task`]** — Interval callbacks on a per-actor scheduler, built on
//! the catch-up [`ticker`].
//!
//! **[`event`]** — Events, filterable listeners, and per-actor dispatch
//! with swallowing.
//!
//! **[`stage`]** — One actor tree plus the update, dispatch, and render
//! traversals.
//!
//! **[`director`]** — Stage lifecycle, animated stage transitions, and the
//! per-frame [`tick`](director::Director::tick).
//!
//! **[`render`]**, **[`audio`]**, **[`resource`]** — The traits platform
//! layers implement: drawing, sound output, and asset loading.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod action;
pub mod actor;
pub mod audio;
pub mod director;
pub mod dirty;
pub mod event;
pub mod render;
pub mod resource;
pub mod stage;
pub mod task;
pub mod ticker;
pub mod time;
pub mod transform;
