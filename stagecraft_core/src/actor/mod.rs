// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The actor scene graph.
//!
//! Actors are nodes in a tree: each one carries a decomposed transform, a
//! size and anchor, opacity and visibility, an optional texture region to
//! draw, and three components (animator, task scheduler, event
//! dispatcher). All of it lives in a struct-of-arrays [`ActorStore`]
//! addressed by generational [`ActorId`] handles; derived state (world
//! transforms, displayed opacity, effective visibility) is cached per
//! actor and revalidated lazily on access.

mod cache;
mod id;
mod store;

pub use id::ActorId;
pub use store::{ActorStore, UpdateCallback};
