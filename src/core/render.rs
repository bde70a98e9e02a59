//=========================================================================
// Rendering Primitives
//=========================================================================
//
// The small drawing surface screens paint through.
//
// Screens never talk to a GPU backend directly. They receive a shared
// `SpriteBatch` from the screen manager and issue text and textured-quad
// draws against it. Backends (or test doubles) implement the trait.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::{Arc, Mutex};

use glam::Vec2;
use log::trace;

//=== Color ===============================================================

/// Linear RGBA color with premultiplied alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Scales every channel by `alpha`, clamped to `[0, 1]`.
    ///
    /// With premultiplied alpha this fades the color toward fully
    /// transparent.
    pub fn faded(self, alpha: f32) -> Self {
        let alpha = alpha.clamp(0.0, 1.0);
        Self {
            r: self.r * alpha,
            g: self.g * alpha,
            b: self.b * alpha,
            a: self.a * alpha,
        }
    }
}

//=== Geometry ============================================================

/// Axis-aligned rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }
}

/// Drawable area of the render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(Vec2::ZERO, self.size())
    }

    /// Top-left position that centers an item of `item_size`.
    pub fn center(&self, item_size: Vec2) -> Vec2 {
        (self.size() - item_size) / 2.0
    }
}

//=== Resource Handles ====================================================

/// Handle to a font owned by a [`crate::core::content::ContentSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontHandle(pub u32);

/// Handle to a texture owned by a [`crate::core::content::ContentSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

//=== SpriteBatch =========================================================

/// Batched 2D drawing surface shared by all screens.
///
/// Draw calls between [`SpriteBatch::begin`] and [`SpriteBatch::end`]
/// belong to one batch.
pub trait SpriteBatch: Send {
    /// Current render target dimensions.
    fn viewport(&self) -> Viewport;

    /// Size in pixels `text` would occupy when drawn with `font`.
    fn measure_string(&self, font: FontHandle, text: &str) -> Vec2;

    fn begin(&mut self) {}

    fn end(&mut self) {}

    fn draw_string(&mut self, font: FontHandle, text: &str, position: Vec2, color: Color);

    fn draw_texture(&mut self, texture: TextureHandle, destination: Rect, color: Color);
}

//=== HeadlessBatch =======================================================

/// Sprite batch that renders nothing.
///
/// Used when the engine runs without a graphics backend. Text is measured
/// with a fixed per-glyph advance and every draw is traced.
#[derive(Debug, Clone)]
pub struct HeadlessBatch {
    viewport: Viewport,
    glyph_size: Vec2,
}

impl HeadlessBatch {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            glyph_size: Vec2::new(8.0, 16.0),
        }
    }
}

impl SpriteBatch for HeadlessBatch {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn measure_string(&self, _font: FontHandle, text: &str) -> Vec2 {
        Vec2::new(
            self.glyph_size.x * text.chars().count() as f32,
            self.glyph_size.y,
        )
    }

    fn draw_string(&mut self, font: FontHandle, text: &str, position: Vec2, color: Color) {
        trace!(target: "render", "draw_string {:?} {:?} at {} ({:?})", font, text, position, color);
    }

    fn draw_texture(&mut self, texture: TextureHandle, destination: Rect, color: Color) {
        trace!(target: "render", "draw_texture {:?} into {:?} ({:?})", texture, destination, color);
    }
}

//=== RecordingBatch ======================================================

/// A single draw issued against a [`RecordingBatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    String {
        font: FontHandle,
        text: String,
        position: Vec2,
        color: Color,
    },
    Texture {
        texture: TextureHandle,
        destination: Rect,
        color: Color,
    },
}

/// Shared, inspectable list of recorded draw calls.
pub type DrawLog = Arc<Mutex<Vec<DrawCall>>>;

/// Sprite batch that records every draw instead of rendering it.
///
/// The log is shared, so a caller can keep a handle after the batch has
/// been moved into a screen manager.
#[derive(Debug, Clone)]
pub struct RecordingBatch {
    inner: HeadlessBatch,
    log: DrawLog,
}

impl RecordingBatch {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            inner: HeadlessBatch::new(viewport),
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn log(&self) -> DrawLog {
        Arc::clone(&self.log)
    }

    fn record(&self, call: DrawCall) {
        if let Ok(mut log) = self.log.lock() {
            log.push(call);
        }
    }
}

impl SpriteBatch for RecordingBatch {
    fn viewport(&self) -> Viewport {
        self.inner.viewport()
    }

    fn measure_string(&self, font: FontHandle, text: &str) -> Vec2 {
        self.inner.measure_string(font, text)
    }

    fn draw_string(&mut self, font: FontHandle, text: &str, position: Vec2, color: Color) {
        self.record(DrawCall::String { font, text: text.to_string(), position, color });
    }

    fn draw_texture(&mut self, texture: TextureHandle, destination: Rect, color: Color) {
        self.record(DrawCall::Texture { texture, destination, color });
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
