// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays actor storage.
//!
//! All actors of a stage live in one [`ActorStore`], addressed by
//! generational [`ActorId`] handles. Properties are stored in parallel
//! columns; the tree is a parent index plus an ordered child list per
//! actor. The child list order doubles as the draw order once
//! [`reorder_children`](ActorStore::reorder_children) has applied any
//! pending Z-order changes (a stable sort, so equal Z keeps insertion
//! order).
//!
//! Handle misuse is a programming error and panics: see
//! [`validate`](ActorStore::validate).

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::mem;

use kurbo::{Affine, Point, Size, Vec2};
use rustc_hash::FxHasher;

use super::id::ActorId;
use crate::action::{Action, Animator};
use crate::dirty::DirtyFlags;
use crate::event::{EventDispatcher, EventListener};
use crate::render::Frame;
use crate::task::{Task, TaskScheduler};
use crate::time::Duration;
use crate::transform::Transform;

/// Sentinel for "no parent" in the parent column.
pub(super) const NONE: u32 = u32::MAX;

/// Callback invoked after an actor's tasks and actions each update.
pub type UpdateCallback = Rc<dyn Fn(&mut ActorStore, ActorId, Duration)>;

/// Per-actor boolean state, packed.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub(super) struct ActorFlags(u8);

impl ActorFlags {
    pub(super) const ALIVE: Self = Self(1 << 0);
    pub(super) const VISIBLE: Self = Self(1 << 1);
    pub(super) const CASCADE_OPACITY: Self = Self(1 << 2);
    pub(super) const UPDATE_PAUSED: Self = Self(1 << 3);
    pub(super) const SHOW_BORDER: Self = Self(1 << 4);
    pub(super) const Z_DIRTY: Self = Self(1 << 5);

    fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    pub(super) const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    fn set(&mut self, other: Self, value: bool) {
        if value {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }
}

impl fmt::Debug for ActorFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorFlags({:#04x})", self.0)
    }
}

/// Hashes an actor or resource name for fast lookup.
fn hash_name(name: &str) -> u64 {
    let mut hasher = FxHasher::default();
    name.hash(&mut hasher);
    hasher.finish()
}

/// Struct-of-arrays storage for every actor of a stage.
#[derive(Default)]
pub struct ActorStore {
    // Topology.
    pub(super) parent: Vec<u32>,
    pub(super) children: Vec<Vec<u32>>,
    // Authored properties.
    pub(super) transform: Vec<Transform>,
    pub(super) size: Vec<Size>,
    pub(super) anchor: Vec<Vec2>,
    pub(super) opacity: Vec<f64>,
    z_order: Vec<i32>,
    pub(super) flags: Vec<ActorFlags>,
    name: Vec<Option<String>>,
    name_hash: Vec<u64>,
    content: Vec<Option<Frame>>,
    update_callback: Vec<Option<UpdateCallback>>,
    // Per-actor components.
    animator: Vec<Animator>,
    tasks: Vec<TaskScheduler>,
    dispatcher: Vec<EventDispatcher>,
    // Caches, revalidated lazily (see the `cache` module).
    pub(super) world: Vec<Affine>,
    pub(super) world_inverse: Vec<Affine>,
    pub(super) displayed_opacity: Vec<f64>,
    pub(super) effective_visible: Vec<bool>,
    pub(super) dirty: Vec<DirtyFlags>,
    // Slot allocation.
    generation: Vec<u32>,
    free_list: Vec<u32>,
    len: usize,
}

impl ActorStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live actors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no actors are alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Creates a detached, visible actor with identity transform, zero
    /// size, top-left anchor, and full opacity.
    pub fn create_actor(&mut self) -> ActorId {
        let idx = if let Some(idx) = self.free_list.pop() {
            self.reset_slot(idx as usize);
            idx
        } else {
            let idx = u32::try_from(self.parent.len())
                .expect("actor slot capacity exceeded");
            self.push_slot();
            idx
        };
        self.len += 1;
        ActorId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys an actor, detaching it from its parent first.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the actor still has children. Use
    /// [`destroy_subtree`](Self::destroy_subtree) to take the children
    /// down too.
    pub fn destroy_actor(&mut self, id: ActorId) {
        self.validate(id);
        let idx = id.idx as usize;
        assert!(
            self.children[idx].is_empty(),
            "cannot destroy an actor that still has children"
        );
        self.remove_from_parent(id);
        // Drop owned state now; the slot may sit on the free list a while.
        self.name[idx] = None;
        self.content[idx] = None;
        self.update_callback[idx] = None;
        self.animator[idx] = Animator::new();
        self.tasks[idx] = TaskScheduler::new();
        self.dispatcher[idx] = EventDispatcher::new();
        self.flags[idx] = ActorFlags::default();
        self.generation[idx] = self.generation[idx].wrapping_add(1);
        self.free_list.push(id.idx);
        self.len -= 1;
    }

    /// Destroys an actor and all of its descendants.
    pub fn destroy_subtree(&mut self, id: ActorId) {
        self.validate(id);
        let kids: Vec<u32> = self.children[id.idx as usize].clone();
        for child in kids {
            self.destroy_subtree(self.id_at(child));
        }
        self.destroy_actor(id);
    }

    /// Whether the handle refers to a live actor.
    #[must_use]
    pub fn is_valid(&self, id: ActorId) -> bool {
        let idx = id.idx as usize;
        idx < self.parent.len()
            && self.generation[idx] == id.generation
            && self.flags[idx].contains(ActorFlags::ALIVE)
    }

    /// Panics with a diagnostic if the handle is stale.
    ///
    /// # Panics
    ///
    /// Panics if the actor was destroyed or the handle belongs to another
    /// store.
    pub fn validate(&self, id: ActorId) {
        assert!(self.is_valid(id), "stale ActorId: {id:?}");
    }

    pub(crate) fn id_at(&self, idx: u32) -> ActorId {
        ActorId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    // --- Topology ---------------------------------------------------------

    /// Appends `child` to `parent`'s child list.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, the child already has a parent,
    /// or the link would create a cycle.
    pub fn add_child(&mut self, parent: ActorId, child: ActorId) {
        self.validate(parent);
        self.validate(child);
        let p = parent.idx as usize;
        let c = child.idx as usize;
        assert!(
            self.parent[c] == NONE,
            "child already has a parent; detach it first"
        );
        assert!(parent != child, "cannot parent an actor to itself");
        // Walk up from the parent: the child must not be an ancestor.
        let mut cursor = self.parent[p];
        while cursor != NONE {
            assert!(
                cursor != child.idx,
                "adding this child would create a cycle"
            );
            cursor = self.parent[cursor as usize];
        }
        self.parent[c] = parent.idx;
        self.children[p].push(child.idx);
        // The child now inherits from a new chain.
        self.dirty[c].insert(DirtyFlags::ALL);
        self.flags[p].insert(ActorFlags::Z_DIRTY);
    }

    /// [`add_child`](Self::add_child) with an explicit Z-order.
    pub fn add_child_with_z(
        &mut self,
        parent: ActorId,
        child: ActorId,
        z_order: i32,
    ) {
        self.validate(child);
        self.z_order[child.idx as usize] = z_order;
        self.add_child(parent, child);
    }

    /// Detaches `child` from `parent`. The child survives as a root.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale or the child is not a child of
    /// `parent`.
    pub fn remove_child(&mut self, parent: ActorId, child: ActorId) {
        self.validate(parent);
        self.validate(child);
        let c = child.idx as usize;
        assert!(
            self.parent[c] == parent.idx,
            "actor is not a child of the given parent"
        );
        self.children[parent.idx as usize].retain(|&k| k != child.idx);
        self.parent[c] = NONE;
        self.dirty[c].insert(DirtyFlags::ALL);
    }

    /// Detaches an actor from its parent, if it has one.
    pub fn remove_from_parent(&mut self, id: ActorId) {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        if p != NONE {
            self.remove_child(self.id_at(p), id);
        }
    }

    /// Detaches every child of `parent`. The children survive as roots.
    pub fn remove_all_children(&mut self, parent: ActorId) {
        self.validate(parent);
        let kids = mem::take(&mut self.children[parent.idx as usize]);
        for c in kids {
            self.parent[c as usize] = NONE;
            self.dirty[c as usize].insert(DirtyFlags::ALL);
        }
    }

    /// The actor's parent, if any.
    #[must_use]
    pub fn parent(&self, id: ActorId) -> Option<ActorId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        (p != NONE).then(|| self.id_at(p))
    }

    /// The actor's children in list order (draw order after
    /// [`reorder_children`](Self::reorder_children)).
    pub fn children(
        &self,
        id: ActorId,
    ) -> impl Iterator<Item = ActorId> + '_ {
        self.validate(id);
        self.children[id.idx as usize].iter().map(|&c| self.id_at(c))
    }

    /// Number of direct children.
    #[must_use]
    pub fn child_count(&self, id: ActorId) -> usize {
        self.validate(id);
        self.children[id.idx as usize].len()
    }

    /// All live actors without a parent.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "slot count is capped at u32 by create_actor"
    )]
    pub fn roots(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.parent.iter().enumerate().filter_map(move |(i, &p)| {
            (self.flags[i].contains(ActorFlags::ALIVE) && p == NONE)
                .then(|| self.id_at(i as u32))
        })
    }

    /// The first child with the given name, if any.
    #[must_use]
    pub fn get_child(&self, parent: ActorId, name: &str) -> Option<ActorId> {
        self.validate(parent);
        let hash = hash_name(name);
        self.children[parent.idx as usize]
            .iter()
            .find(|&&c| {
                self.name_hash[c as usize] == hash
                    && self.name[c as usize].as_deref() == Some(name)
            })
            .map(|&c| self.id_at(c))
    }

    /// All children with the given name, in child-list order.
    #[must_use]
    pub fn get_children(&self, parent: ActorId, name: &str) -> Vec<ActorId> {
        self.validate(parent);
        let hash = hash_name(name);
        self.children[parent.idx as usize]
            .iter()
            .filter(|&&c| {
                self.name_hash[c as usize] == hash
                    && self.name[c as usize].as_deref() == Some(name)
            })
            .map(|&c| self.id_at(c))
            .collect()
    }

    /// Applies a pending Z-order change to the child list.
    ///
    /// Stable: children with equal Z keep their insertion order. A no-op
    /// unless a child's Z-order changed since the last call.
    pub fn reorder_children(&mut self, parent: ActorId) {
        self.validate(parent);
        let p = parent.idx as usize;
        if !self.flags[p].contains(ActorFlags::Z_DIRTY) {
            return;
        }
        let Self { children, z_order, .. } = self;
        children[p].sort_by_key(|&c| z_order[c as usize]);
        self.flags[p].remove(ActorFlags::Z_DIRTY);
    }

    // --- Authored properties ----------------------------------------------

    /// Position of the anchor point in parent coordinates.
    #[must_use]
    pub fn position(&self, id: ActorId) -> Point {
        self.validate(id);
        self.transform[id.idx as usize].position
    }

    /// Moves the anchor point to `position`.
    pub fn set_position(&mut self, id: ActorId, position: Point) {
        self.validate(id);
        let idx = id.idx as usize;
        self.transform[idx].position = position;
        self.dirty[idx].insert(DirtyFlags::TRANSFORM_ALL);
    }

    /// Moves the actor by an offset.
    pub fn move_by(&mut self, id: ActorId, offset: Vec2) {
        let position = self.position(id);
        self.set_position(id, position + offset);
    }

    /// Rotation in degrees.
    #[must_use]
    pub fn rotation(&self, id: ActorId) -> f64 {
        self.validate(id);
        self.transform[id.idx as usize].rotation
    }

    /// Sets the rotation in degrees.
    pub fn set_rotation(&mut self, id: ActorId, degrees: f64) {
        self.validate(id);
        let idx = id.idx as usize;
        self.transform[idx].rotation = degrees;
        self.dirty[idx].insert(DirtyFlags::TRANSFORM_ALL);
    }

    /// Scale factors.
    #[must_use]
    pub fn scale(&self, id: ActorId) -> Vec2 {
        self.validate(id);
        self.transform[id.idx as usize].scale
    }

    /// Sets the scale factors.
    pub fn set_scale(&mut self, id: ActorId, scale: Vec2) {
        self.validate(id);
        let idx = id.idx as usize;
        self.transform[idx].scale = scale;
        self.dirty[idx].insert(DirtyFlags::TRANSFORM_ALL);
    }

    /// Skew angles in degrees.
    #[must_use]
    pub fn skew(&self, id: ActorId) -> Vec2 {
        self.validate(id);
        self.transform[id.idx as usize].skew
    }

    /// Sets the skew angles in degrees.
    pub fn set_skew(&mut self, id: ActorId, skew: Vec2) {
        self.validate(id);
        let idx = id.idx as usize;
        self.transform[idx].skew = skew;
        self.dirty[idx].insert(DirtyFlags::TRANSFORM_ALL);
    }

    /// The whole decomposed transform.
    #[must_use]
    pub fn transform(&self, id: ActorId) -> Transform {
        self.validate(id);
        self.transform[id.idx as usize]
    }

    /// Replaces the whole decomposed transform.
    pub fn set_transform(&mut self, id: ActorId, transform: Transform) {
        self.validate(id);
        let idx = id.idx as usize;
        self.transform[idx] = transform;
        self.dirty[idx].insert(DirtyFlags::TRANSFORM_ALL);
    }

    /// Normalized anchor point.
    #[must_use]
    pub fn anchor(&self, id: ActorId) -> Vec2 {
        self.validate(id);
        self.anchor[id.idx as usize]
    }

    /// Sets the normalized anchor point, clamped to `[0, 1]` per axis.
    pub fn set_anchor(&mut self, id: ActorId, anchor: Vec2) {
        self.validate(id);
        let idx = id.idx as usize;
        self.anchor[idx] =
            Vec2::new(anchor.x.clamp(0.0, 1.0), anchor.y.clamp(0.0, 1.0));
        self.dirty[idx].insert(DirtyFlags::TRANSFORM_ALL);
    }

    /// Unscaled content size.
    #[must_use]
    pub fn size(&self, id: ActorId) -> Size {
        self.validate(id);
        self.size[id.idx as usize]
    }

    /// Sets the content size. Negative extents clamp to zero.
    pub fn set_size(&mut self, id: ActorId, size: Size) {
        self.validate(id);
        let idx = id.idx as usize;
        self.size[idx] =
            Size::new(size.width.max(0.0), size.height.max(0.0));
        // The anchor offset depends on size.
        self.dirty[idx].insert(DirtyFlags::TRANSFORM_ALL);
    }

    /// Content size with scale applied.
    #[must_use]
    pub fn scaled_size(&self, id: ActorId) -> Size {
        self.validate(id);
        let idx = id.idx as usize;
        let scale = self.transform[idx].scale;
        let size = self.size[idx];
        Size::new(size.width * scale.x, size.height * scale.y)
    }

    /// The actor's own opacity.
    #[must_use]
    pub fn opacity(&self, id: ActorId) -> f64 {
        self.validate(id);
        self.opacity[id.idx as usize]
    }

    /// Sets the actor's own opacity, clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, id: ActorId, opacity: f64) {
        self.validate(id);
        let idx = id.idx as usize;
        self.opacity[idx] = opacity.clamp(0.0, 1.0);
        self.dirty[idx].insert(DirtyFlags::OPACITY);
    }

    /// Whether children multiply in this actor's displayed opacity.
    #[must_use]
    pub fn cascade_opacity_enabled(&self, id: ActorId) -> bool {
        self.validate(id);
        self.flags[id.idx as usize].contains(ActorFlags::CASCADE_OPACITY)
    }

    /// Enables or disables opacity cascading to children.
    pub fn set_cascade_opacity(&mut self, id: ActorId, enabled: bool) {
        self.validate(id);
        let idx = id.idx as usize;
        self.flags[idx].set(ActorFlags::CASCADE_OPACITY, enabled);
        // Own displayed opacity is unchanged, but routing the mark through
        // this actor lets descendants notice on their next access.
        self.dirty[idx].insert(DirtyFlags::OPACITY);
    }

    /// The actor's own visibility flag.
    #[must_use]
    pub fn is_visible(&self, id: ActorId) -> bool {
        self.validate(id);
        self.flags[id.idx as usize].contains(ActorFlags::VISIBLE)
    }

    /// Shows or hides the actor and its subtree.
    pub fn set_visible(&mut self, id: ActorId, visible: bool) {
        self.validate(id);
        let idx = id.idx as usize;
        self.flags[idx].set(ActorFlags::VISIBLE, visible);
        self.dirty[idx].insert(DirtyFlags::VISIBILITY);
    }

    /// Z-order among siblings. Higher draws later (on top).
    #[must_use]
    pub fn z_order(&self, id: ActorId) -> i32 {
        self.validate(id);
        self.z_order[id.idx as usize]
    }

    /// Sets the Z-order. Takes effect at the parent's next
    /// [`reorder_children`](Self::reorder_children).
    pub fn set_z_order(&mut self, id: ActorId, z_order: i32) {
        self.validate(id);
        let idx = id.idx as usize;
        if self.z_order[idx] == z_order {
            return;
        }
        self.z_order[idx] = z_order;
        let p = self.parent[idx];
        if p != NONE {
            self.flags[p as usize].insert(ActorFlags::Z_DIRTY);
        }
    }

    /// The actor's name, if any.
    #[must_use]
    pub fn name(&self, id: ActorId) -> Option<&str> {
        self.validate(id);
        self.name[id.idx as usize].as_deref()
    }

    /// Names the actor for [`get_child`](Self::get_child) lookup.
    pub fn set_name(&mut self, id: ActorId, name: impl Into<String>) {
        self.validate(id);
        let idx = id.idx as usize;
        let name = name.into();
        self.name_hash[idx] = hash_name(&name);
        self.name[idx] = Some(name);
    }

    /// The texture region this actor draws, if any.
    #[must_use]
    pub fn content(&self, id: ActorId) -> Option<&Frame> {
        self.validate(id);
        self.content[id.idx as usize].as_ref()
    }

    /// Sets or clears the drawn texture region.
    pub fn set_content(&mut self, id: ActorId, content: Option<Frame>) {
        self.validate(id);
        self.content[id.idx as usize] = content;
    }

    /// Installs a per-update callback, replacing any previous one.
    pub fn set_update_callback(
        &mut self,
        id: ActorId,
        callback: impl Fn(&mut Self, ActorId, Duration) + 'static,
    ) {
        self.validate(id);
        self.update_callback[id.idx as usize] = Some(Rc::new(callback));
    }

    /// Removes the per-update callback.
    pub fn clear_update_callback(&mut self, id: ActorId) {
        self.validate(id);
        self.update_callback[id.idx as usize] = None;
    }

    /// The per-update callback, if any.
    #[must_use]
    pub fn update_callback(&self, id: ActorId) -> Option<UpdateCallback> {
        self.validate(id);
        self.update_callback[id.idx as usize].clone()
    }

    /// Stops tasks, actions, and the update callback for this actor.
    /// Children keep updating.
    pub fn pause_updates(&mut self, id: ActorId) {
        self.validate(id);
        self.flags[id.idx as usize].insert(ActorFlags::UPDATE_PAUSED);
    }

    /// Resumes per-frame updates.
    pub fn resume_updates(&mut self, id: ActorId) {
        self.validate(id);
        self.flags[id.idx as usize].remove(ActorFlags::UPDATE_PAUSED);
    }

    /// Whether per-frame updates are paused.
    #[must_use]
    pub fn is_update_paused(&self, id: ActorId) -> bool {
        self.validate(id);
        self.flags[id.idx as usize].contains(ActorFlags::UPDATE_PAUSED)
    }

    /// Draws a diagnostic border around the actor's bounds.
    pub fn set_show_border(&mut self, id: ActorId, show: bool) {
        self.validate(id);
        self.flags[id.idx as usize].set(ActorFlags::SHOW_BORDER, show);
    }

    /// Whether the diagnostic border is enabled.
    #[must_use]
    pub fn shows_border(&self, id: ActorId) -> bool {
        self.validate(id);
        self.flags[id.idx as usize].contains(ActorFlags::SHOW_BORDER)
    }

    // --- Components -------------------------------------------------------

    /// Schedules an action against this actor.
    pub fn add_action(&mut self, id: ActorId, action: Action) {
        self.validate(id);
        self.animator[id.idx as usize].add_action(action);
    }

    /// The actor's animator.
    #[must_use]
    pub fn animator(&self, id: ActorId) -> &Animator {
        self.validate(id);
        &self.animator[id.idx as usize]
    }

    /// Mutable access to the actor's animator.
    pub fn animator_mut(&mut self, id: ActorId) -> &mut Animator {
        self.validate(id);
        &mut self.animator[id.idx as usize]
    }

    /// Schedules a task on this actor.
    pub fn add_task(&mut self, id: ActorId, task: Task) {
        self.validate(id);
        self.tasks[id.idx as usize].add_task(task);
    }

    /// The actor's task scheduler.
    #[must_use]
    pub fn task_scheduler(&self, id: ActorId) -> &TaskScheduler {
        self.validate(id);
        &self.tasks[id.idx as usize]
    }

    /// Mutable access to the actor's task scheduler.
    pub fn task_scheduler_mut(&mut self, id: ActorId) -> &mut TaskScheduler {
        self.validate(id);
        &mut self.tasks[id.idx as usize]
    }

    /// Registers an event listener on this actor.
    pub fn add_listener(&mut self, id: ActorId, listener: EventListener) {
        self.validate(id);
        self.dispatcher[id.idx as usize].add_listener(listener);
    }

    /// The actor's event dispatcher.
    #[must_use]
    pub fn dispatcher(&self, id: ActorId) -> &EventDispatcher {
        self.validate(id);
        &self.dispatcher[id.idx as usize]
    }

    /// Mutable access to the actor's event dispatcher.
    pub fn dispatcher_mut(&mut self, id: ActorId) -> &mut EventDispatcher {
        self.validate(id);
        &mut self.dispatcher[id.idx as usize]
    }

    /// Moves the animator out of its slot so action callbacks may mutate
    /// the store (including scheduling new actions) while it runs.
    pub(crate) fn take_animator(&mut self, id: ActorId) -> Animator {
        self.validate(id);
        mem::take(&mut self.animator[id.idx as usize])
    }

    /// Puts a taken animator back, keeping any actions scheduled while it
    /// was out.
    pub(crate) fn restore_animator(&mut self, id: ActorId, animator: Animator) {
        if !self.is_valid(id) {
            // The actor destroyed itself during the pass; its actions die
            // with it.
            return;
        }
        let added =
            mem::replace(&mut self.animator[id.idx as usize], animator);
        self.animator[id.idx as usize].absorb(added);
    }

    // --- Slot plumbing ----------------------------------------------------

    fn push_slot(&mut self) {
        self.parent.push(NONE);
        self.children.push(Vec::new());
        self.transform.push(Transform::IDENTITY);
        self.size.push(Size::ZERO);
        self.anchor.push(Vec2::ZERO);
        self.opacity.push(1.0);
        self.z_order.push(0);
        self.flags.push(Self::fresh_flags());
        self.name.push(None);
        self.name_hash.push(0);
        self.content.push(None);
        self.update_callback.push(None);
        self.animator.push(Animator::new());
        self.tasks.push(TaskScheduler::new());
        self.dispatcher.push(EventDispatcher::new());
        self.world.push(Affine::IDENTITY);
        self.world_inverse.push(Affine::IDENTITY);
        self.displayed_opacity.push(1.0);
        self.effective_visible.push(true);
        self.dirty.push(DirtyFlags::ALL);
        self.generation.push(0);
    }

    fn reset_slot(&mut self, idx: usize) {
        self.parent[idx] = NONE;
        self.children[idx].clear();
        self.transform[idx] = Transform::IDENTITY;
        self.size[idx] = Size::ZERO;
        self.anchor[idx] = Vec2::ZERO;
        self.opacity[idx] = 1.0;
        self.z_order[idx] = 0;
        self.flags[idx] = Self::fresh_flags();
        self.name[idx] = None;
        self.name_hash[idx] = 0;
        self.content[idx] = None;
        self.update_callback[idx] = None;
        self.world[idx] = Affine::IDENTITY;
        self.world_inverse[idx] = Affine::IDENTITY;
        self.displayed_opacity[idx] = 1.0;
        self.effective_visible[idx] = true;
        self.dirty[idx] = DirtyFlags::ALL;
    }

    fn fresh_flags() -> ActorFlags {
        let mut flags = ActorFlags::ALIVE;
        flags.insert(ActorFlags::VISIBLE);
        flags
    }
}

impl fmt::Debug for ActorStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorStore")
            .field("len", &self.len)
            .field("slots", &self.parent.len())
            .field("free", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_destroy() {
        let mut store = ActorStore::new();
        assert!(store.is_empty());

        let a = store.create_actor();
        let b = store.create_actor();
        assert_eq!(store.len(), 2);
        assert!(store.is_valid(a));
        assert!(store.is_valid(b));

        store.destroy_actor(a);
        assert_eq!(store.len(), 1);
        assert!(!store.is_valid(a));
        assert!(store.is_valid(b));
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut store = ActorStore::new();
        let a = store.create_actor();
        store.destroy_actor(a);

        // The slot is reused, the old handle is not.
        let b = store.create_actor();
        assert_eq!(b.index(), a.index());
        assert_ne!(b.generation(), a.generation());
        assert!(!store.is_valid(a));
        assert!(store.is_valid(b));
    }

    #[test]
    #[should_panic(expected = "stale ActorId")]
    fn stale_handle_panics_on_validate() {
        let mut store = ActorStore::new();
        let a = store.create_actor();
        store.destroy_actor(a);
        store.validate(a);
    }

    #[test]
    fn add_child_and_query() {
        let mut store = ActorStore::new();
        let parent = store.create_actor();
        let first = store.create_actor();
        let second = store.create_actor();
        store.add_child(parent, first);
        store.add_child(parent, second);

        assert_eq!(store.parent(first), Some(parent));
        assert_eq!(store.parent(parent), None);
        let kids: Vec<_> = store.children(parent).collect();
        assert_eq!(kids, [first, second], "insertion order");
        assert_eq!(store.child_count(parent), 2);
    }

    #[test]
    #[should_panic(expected = "child already has a parent")]
    fn double_parenting_panics() {
        let mut store = ActorStore::new();
        let a = store.create_actor();
        let b = store.create_actor();
        let c = store.create_actor();
        store.add_child(a, c);
        store.add_child(b, c);
    }

    #[test]
    #[should_panic(expected = "would create a cycle")]
    fn cyclic_link_panics() {
        let mut store = ActorStore::new();
        let a = store.create_actor();
        let b = store.create_actor();
        store.add_child(a, b);
        store.add_child(b, a);
    }

    #[test]
    #[should_panic(expected = "still has children")]
    fn destroying_a_parent_with_children_panics() {
        let mut store = ActorStore::new();
        let parent = store.create_actor();
        let child = store.create_actor();
        store.add_child(parent, child);
        store.destroy_actor(parent);
    }

    #[test]
    fn destroy_subtree_takes_descendants() {
        let mut store = ActorStore::new();
        let a = store.create_actor();
        let b = store.create_actor();
        let c = store.create_actor();
        store.add_child(a, b);
        store.add_child(b, c);

        store.destroy_subtree(a);
        assert!(store.is_empty());
        assert!(!store.is_valid(b));
        assert!(!store.is_valid(c));
    }

    #[test]
    fn remove_child_detaches_but_keeps_the_actor() {
        let mut store = ActorStore::new();
        let parent = store.create_actor();
        let child = store.create_actor();
        store.add_child(parent, child);

        store.remove_child(parent, child);
        assert!(store.is_valid(child));
        assert_eq!(store.parent(child), None);
        assert_eq!(store.child_count(parent), 0);

        // Detaching a root is a no-op.
        store.remove_from_parent(child);
        assert_eq!(store.parent(child), None);
    }

    #[test]
    fn remove_all_children() {
        let mut store = ActorStore::new();
        let parent = store.create_actor();
        let a = store.create_actor();
        let b = store.create_actor();
        store.add_child(parent, a);
        store.add_child(parent, b);

        store.remove_all_children(parent);
        assert_eq!(store.child_count(parent), 0);
        assert_eq!(store.parent(a), None);
        assert_eq!(store.parent(b), None);
    }

    #[test]
    fn roots_lists_detached_actors() {
        let mut store = ActorStore::new();
        let a = store.create_actor();
        let b = store.create_actor();
        let c = store.create_actor();
        store.add_child(a, b);

        let roots: Vec<_> = store.roots().collect();
        assert_eq!(roots, [a, c]);
    }

    #[test]
    fn name_lookup() {
        let mut store = ActorStore::new();
        let parent = store.create_actor();
        let a = store.create_actor();
        let b = store.create_actor();
        let c = store.create_actor();
        store.add_child(parent, a);
        store.add_child(parent, b);
        store.add_child(parent, c);
        store.set_name(a, "enemy");
        store.set_name(c, "enemy");

        assert_eq!(store.get_child(parent, "enemy"), Some(a));
        assert_eq!(store.get_child(parent, "missing"), None);
        assert_eq!(store.get_children(parent, "enemy"), [a, c]);
    }

    #[test]
    fn z_reorder_is_stable() {
        let mut store = ActorStore::new();
        let parent = store.create_actor();
        let a = store.create_actor();
        let b = store.create_actor();
        let c = store.create_actor();
        store.add_child(parent, a);
        store.add_child(parent, b);
        store.add_child(parent, c);

        // All Z equal: order is untouched.
        store.reorder_children(parent);
        let kids: Vec<_> = store.children(parent).collect();
        assert_eq!(kids, [a, b, c]);

        // Raising one child sends it to the back of the draw order.
        store.set_z_order(a, 5);
        store.reorder_children(parent);
        let kids: Vec<_> = store.children(parent).collect();
        assert_eq!(kids, [b, c, a], "equal-Z pair keeps insertion order");
    }

    #[test]
    fn property_clamps() {
        let mut store = ActorStore::new();
        let a = store.create_actor();

        store.set_anchor(a, Vec2::new(-1.0, 2.0));
        assert_eq!(store.anchor(a), Vec2::new(0.0, 1.0));

        store.set_opacity(a, 1.5);
        assert_eq!(store.opacity(a), 1.0);
        store.set_opacity(a, -0.5);
        assert_eq!(store.opacity(a), 0.0);

        store.set_size(a, Size::new(-10.0, 20.0));
        assert_eq!(store.size(a), Size::new(0.0, 20.0));
    }

    #[test]
    fn scaled_size_multiplies_by_scale() {
        let mut store = ActorStore::new();
        let a = store.create_actor();
        store.set_size(a, Size::new(100.0, 100.0));
        store.set_scale(a, Vec2::new(2.0, 2.0));
        assert_eq!(store.scaled_size(a), Size::new(200.0, 200.0));
        assert_eq!(store.size(a), Size::new(100.0, 100.0), "size unchanged");
    }

    #[test]
    fn mutation_marks_only_the_mutated_actor() {
        let mut store = ActorStore::new();
        let parent = store.create_actor();
        let child = store.create_actor();
        let grandchild = store.create_actor();
        store.add_child(parent, child);
        store.add_child(child, grandchild);

        // Settle the transform caches first.
        let _ = store.world_transform(grandchild);
        assert!(
            !store.dirty[grandchild.index() as usize]
                .contains(DirtyFlags::TRANSFORM)
        );

        store.set_position(grandchild, Point::new(5.0, 5.0));
        assert!(store.dirty[grandchild.index() as usize]
            .contains(DirtyFlags::TRANSFORM));
        assert!(
            !store.dirty[parent.index() as usize]
                .contains(DirtyFlags::TRANSFORM),
            "ancestors stay clean"
        );
        assert!(
            !store.dirty[child.index() as usize]
                .contains(DirtyFlags::TRANSFORM),
            "ancestors stay clean"
        );
    }
}
