//=========================================================================
// Core Systems
//
// Everything that runs on the logic (non-platform) thread.
//
// Responsibilities:
// - Screen stack, base screen transitions, and the loading handoff
// - Content resolution and the 2D drawing surface screens paint through
// - Frame timing and the per-frame update/draw driver
// - Receiving frame boundaries from the platform via channel
//
// Notes:
// The platform layer only announces frame boundaries. All screen state
// changes happen inside `ScreenManager::update` and `ScreenManager::draw`
// on the core thread, one update then one draw per frame.
//
//=========================================================================

//=== Public Modules ======================================================

pub mod content;
pub mod render;
pub mod screen;
pub mod time;

//=== Internal Modules ====================================================

pub(crate) mod frame_loop;
pub(crate) mod platform_bridge;

//=== Re-exports ==========================================================

pub(crate) use frame_loop::FrameLoop;
pub use platform_bridge::PlatformError;
