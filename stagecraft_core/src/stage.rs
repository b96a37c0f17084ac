// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A stage: one actor tree with a root, plus the traversals that drive it.
//!
//! The stage owns an [`ActorStore`] and a root actor, and implements the
//! three per-frame walks:
//!
//! - [`update`](Stage::update) advances tasks, actions, and update
//!   callbacks, parent before child.
//! - [`dispatch`](Stage::dispatch) routes an event through each actor's
//!   listeners, front-most child first, until a listener swallows it.
//! - [`render`](Stage::render) draws visible content into a
//!   [`RenderContext`], parent before child, low Z first.

use alloc::vec::Vec;

use crate::actor::{ActorId, ActorStore};
use crate::event::Event;
use crate::render::RenderContext;
use crate::time::Duration;

/// What a render traversal did, for frame diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderCounts {
    /// Actors whose content was drawn.
    pub rendered: u32,
    /// Actors skipped by viewport culling.
    pub culled: u32,
}

/// One actor tree and its root.
#[derive(Debug)]
pub struct Stage {
    store: ActorStore,
    root: ActorId,
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage {
    /// A stage with an empty root actor.
    #[must_use]
    pub fn new() -> Self {
        let mut store = ActorStore::new();
        let root = store.create_actor();
        Self { store, root }
    }

    /// The root actor. Attach the scene under it.
    #[must_use]
    pub fn root(&self) -> ActorId {
        self.root
    }

    /// The stage's actor store.
    #[must_use]
    pub fn store(&self) -> &ActorStore {
        &self.store
    }

    /// Mutable access to the stage's actor store.
    pub fn store_mut(&mut self) -> &mut ActorStore {
        &mut self.store
    }

    /// Advances time for the whole tree, parent before child.
    ///
    /// Per actor, unless its updates are paused: tasks fire, actions
    /// advance, then the update callback runs. Children update even when
    /// the parent is paused. Returns the number of actors visited.
    pub fn update(&mut self, dt: Duration) -> u32 {
        self.update_actor(self.root, dt)
    }

    fn update_actor(&mut self, id: ActorId, dt: Duration) -> u32 {
        // Apply pending Z-order changes before walking the children, so
        // this frame's update order matches this frame's draw order.
        self.store.reorder_children(id);

        if !self.store.is_update_paused(id) {
            self.store.task_scheduler_mut(id).update_tasks(dt);
            // The animator leaves its slot so action callbacks may mutate
            // the store, including scheduling more actions on this actor.
            let mut animator = self.store.take_animator(id);
            animator.update(&mut self.store, id, dt);
            self.store.restore_animator(id, animator);
            if self.store.is_valid(id) {
                if let Some(callback) = self.store.update_callback(id) {
                    callback(&mut self.store, id, dt);
                }
            }
        }

        if !self.store.is_valid(id) {
            // A callback destroyed this actor; its children went with it.
            return 1;
        }

        let mut visited = 1;
        let kids: Vec<ActorId> = self.store.children(id).collect();
        for child in kids {
            // A sibling's callback may have detached or destroyed it.
            if self.store.is_valid(child)
                && self.store.parent(child) == Some(id)
            {
                visited += self.update_actor(child, dt);
            }
        }
        visited
    }

    /// Routes an event through the tree's listeners.
    ///
    /// Each actor runs its own listeners first, then its children from
    /// front-most (highest Z, drawn last) to back-most, matching what the
    /// user sees on top. Returns `true` if a swallowing listener handled
    /// the event.
    pub fn dispatch(&mut self, event: &Event) -> bool {
        self.dispatch_actor(self.root, event)
    }

    fn dispatch_actor(&mut self, id: ActorId, event: &Event) -> bool {
        if self.store.dispatcher_mut(id).dispatch(event) {
            return true;
        }
        self.store.reorder_children(id);
        let kids: Vec<ActorId> = self.store.children(id).collect();
        for child in kids.into_iter().rev() {
            if self.store.is_valid(child)
                && self.dispatch_actor(child, event)
            {
                return true;
            }
        }
        false
    }

    /// Draws the tree into a render context, parent before child, low Z
    /// first.
    ///
    /// Hidden actors skip their whole subtree. Fully transparent actors
    /// that cascade opacity do too; a non-cascading transparent actor
    /// still draws its children. Actors outside the context's viewport
    /// are culled individually, their children are still considered. A
    /// failed draw is logged and the traversal continues.
    pub fn render(&mut self, ctx: &mut impl RenderContext) -> RenderCounts {
        let mut counts = RenderCounts::default();
        self.render_actor(self.root, ctx, &mut counts);
        counts
    }

    fn render_actor(
        &mut self,
        id: ActorId,
        ctx: &mut impl RenderContext,
        counts: &mut RenderCounts,
    ) {
        if !self.store.is_visible(id) {
            return;
        }
        let opacity = self.store.displayed_opacity(id);
        let transparent = opacity <= f64::EPSILON;
        if transparent && self.store.cascade_opacity_enabled(id) {
            return;
        }

        let frame = if transparent {
            None
        } else {
            self.store.content(id).copied()
        };
        if let Some(frame) = frame {
            if ctx.is_visible(self.store.bounding_box(id)) {
                ctx.set_transform(self.store.world_transform(id));
                ctx.set_opacity(opacity);
                let dst = self.store.bounds(id);
                if let Err(error) =
                    ctx.draw_texture(frame.texture, frame.crop, dst)
                {
                    log::error!("draw failed for {id:?}: {error}");
                } else {
                    counts.rendered += 1;
                }
            } else {
                counts.culled += 1;
            }
        }

        if self.store.shows_border(id) {
            ctx.set_transform(self.store.world_transform(id));
            ctx.set_opacity(1.0);
            if let Err(error) = ctx.draw_rectangle(self.store.bounds(id)) {
                log::error!("border draw failed for {id:?}: {error}");
            }
        }

        self.store.reorder_children(id);
        let kids: Vec<ActorId> = self.store.children(id).collect();
        for child in kids {
            self.render_actor(child, ctx, counts);
        }
    }
}
