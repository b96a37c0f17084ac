// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The rendering boundary.
//!
//! The engine core computes *what* to draw (world transforms, opacities,
//! texture regions, draw order) and hands it to a [`RenderContext`] the
//! platform layer implements. Rasterization, text shaping, and GPU
//! plumbing all live behind this trait.
//!
//! A frame looks like:
//!
//! ```text
//!   ctx.begin_draw()
//!   for each visible actor, parent before child, low Z first:
//!       ctx.set_transform(world)
//!       ctx.set_opacity(displayed)
//!       ctx.draw_texture(frame.texture, frame.crop, bounds)
//!   ctx.end_draw()
//! ```
//!
//! Draw calls return `Result` so a bad texture or lost device fails the
//! one actor, not the traversal: the stage logs the error and moves on to
//! the siblings.

use alloc::string::String;

use kurbo::{Affine, Point, Rect, Vec2};
use thiserror::Error;

/// Handle to a texture owned by the platform renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// A texture region an actor draws, in texture pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    /// The backing texture.
    pub texture: TextureId,
    /// Source crop within the texture.
    pub crop: Rect,
}

impl Frame {
    /// A frame covering a full texture of the given pixel size.
    #[must_use]
    pub fn full(texture: TextureId, width: f64, height: f64) -> Self {
        Self {
            texture,
            crop: Rect::new(0.0, 0.0, width.max(0.0), height.max(0.0)),
        }
    }
}

/// Straight-alpha RGBA color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red, `0..=1`.
    pub r: f32,
    /// Green, `0..=1`.
    pub g: f32,
    /// Blue, `0..=1`.
    pub b: f32,
    /// Alpha, `0..=1`.
    pub a: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Opaque red. The default diagnostic border color.
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);

    /// An opaque color.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// The same color with a different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

/// What to paint shapes with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Brush {
    /// Fill and stroke color.
    pub color: Color,
}

impl Brush {
    /// A solid-color brush.
    #[must_use]
    pub const fn solid(color: Color) -> Self {
        Self { color }
    }
}

/// A failed draw operation. Recoverable: callers log and continue.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// The rendering device was lost; the embedder must rebuild it.
    #[error("rendering device lost")]
    DeviceLost,
    /// A draw referenced a texture the renderer does not know.
    #[error("unknown texture {0:?}")]
    UnknownTexture(TextureId),
    /// Backend-specific failure.
    #[error("draw failed: {0}")]
    Backend(String),
}

/// Counters a renderer may expose for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Primitives submitted since `begin_draw`.
    pub primitives: u32,
}

/// Platform renderer interface.
///
/// State setters (`set_transform`, `set_opacity`, `set_brush`, clips)
/// apply to subsequent draw calls until changed.
pub trait RenderContext {
    /// Starts a frame.
    fn begin_draw(&mut self) -> Result<(), RenderError>;

    /// Finishes and presents a frame.
    fn end_draw(&mut self) -> Result<(), RenderError>;

    /// Sets the transform applied to subsequent draws.
    fn set_transform(&mut self, transform: Affine);

    /// Sets the opacity multiplied into subsequent draws.
    fn set_opacity(&mut self, opacity: f64);

    /// Sets the brush for subsequent shape draws.
    fn set_brush(&mut self, brush: Brush);

    /// Pushes an axis-aligned clip in the current transform's space.
    fn push_clip_rect(&mut self, rect: Rect);

    /// Pops the innermost clip.
    fn pop_clip_rect(&mut self);

    /// Draws `src` of a texture into `dst` (current transform applies).
    fn draw_texture(
        &mut self,
        texture: TextureId,
        src: Rect,
        dst: Rect,
    ) -> Result<(), RenderError>;

    /// Draws a text run with its baseline origin at `origin`.
    fn draw_text(&mut self, text: &str, origin: Point)
    -> Result<(), RenderError>;

    /// Strokes a rectangle outline.
    fn draw_rectangle(&mut self, rect: Rect) -> Result<(), RenderError>;

    /// Fills a rounded rectangle with the current brush.
    fn fill_rounded_rectangle(
        &mut self,
        rect: Rect,
        radii: Vec2,
    ) -> Result<(), RenderError>;

    /// Whether a world-space bounding box intersects the viewport.
    ///
    /// The default never culls; renderers with viewport knowledge
    /// override it.
    fn is_visible(&self, bounds: Rect) -> bool {
        let _ = bounds;
        true
    }

    /// Frame counters. The default reports nothing.
    fn stats(&self) -> RenderStats {
        RenderStats::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_frame_covers_the_texture() {
        let frame = Frame::full(TextureId(3), 64.0, 32.0);
        assert_eq!(frame.crop, Rect::new(0.0, 0.0, 64.0, 32.0));
        // Degenerate inputs clamp instead of producing inverted rects.
        let empty = Frame::full(TextureId(3), -1.0, 32.0);
        assert_eq!(empty.crop.width(), 0.0);
    }

    #[test]
    fn color_with_alpha_keeps_channels() {
        let c = Color::RED.with_alpha(0.5);
        assert_eq!((c.r, c.g, c.b, c.a), (1.0, 0.0, 0.0, 0.5));
    }
}
