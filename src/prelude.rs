//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use screen_handoff::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine
pub use crate::engine::{Engine, EngineBuilder, EngineError};

// Screen stack
pub use crate::core::screen::{
    LoadingScreen, PlayerIndex, Screen, ScreenCore, ScreenError, ScreenId, ScreenManager,
    ScreenState,
};

// Content
pub use crate::core::content::{ContentError, ContentSource, DirectoryContent, MemoryContent};

// Drawing
pub use crate::core::render::{Color, FontHandle, Rect, SpriteBatch, TextureHandle, Viewport};

// Timing
pub use crate::core::time::GameTime;

// Math
pub use glam::Vec2;
