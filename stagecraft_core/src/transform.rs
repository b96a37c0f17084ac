// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decomposed 2D transform for actor positioning.
//!
//! [`Transform`] keeps the designer-facing components (position, rotation,
//! scale, skew) separate and composes them into a [`kurbo::Affine`] on
//! demand. The anchor point is not stored here: it lives on the actor as a
//! normalized offset into the actor's size, and is folded into the matrix by
//! [`Transform::to_matrix`].
//!
//! Angles are degrees, matching the authoring convention of the rest of the
//! API; conversion to radians happens only at matrix build time.

use kurbo::{Affine, Point, Size, Vec2};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Position, rotation, scale, and skew of an actor relative to its parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Position of the anchor point in the parent's coordinate space.
    pub position: Point,
    /// Rotation around the anchor point, in degrees.
    pub rotation: f64,
    /// Scale factors along the local axes.
    pub scale: Vec2,
    /// Skew angles along the local axes, in degrees.
    pub skew: Vec2,
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        position: Point::ZERO,
        rotation: 0.0,
        scale: Vec2::new(1.0, 1.0),
        skew: Vec2::ZERO,
    };

    /// Builds the local matrix for an actor of the given size and
    /// normalized anchor.
    ///
    /// Reading right to left: the anchor point is moved to the local origin,
    /// then scale, skew, and rotation are applied around it, and finally the
    /// result is translated to `position`.
    #[must_use]
    pub fn to_matrix(&self, anchor: Vec2, size: Size) -> Affine {
        let anchor_shift =
            Vec2::new(-anchor.x * size.width, -anchor.y * size.height);
        let mut m = Affine::scale_non_uniform(self.scale.x, self.scale.y)
            * Affine::translate(anchor_shift);
        if self.skew.x != 0.0 || self.skew.y != 0.0 {
            m = Affine::skew(
                self.skew.x.to_radians().tan(),
                self.skew.y.to_radians().tan(),
            ) * m;
        }
        if self.rotation != 0.0 {
            m = Affine::rotate(self.rotation.to_radians()) * m;
        }
        Affine::translate(self.position.to_vec2()) * m
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
