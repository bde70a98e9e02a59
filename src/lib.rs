//=========================================================================
// Screen Handoff: Library Root
//
// This crate defines the public API surface of the screen stack and the
// loading screen that hands control from one set of screens to the next.
//
// Responsibilities:
// - Expose the engine facade (`Engine`, `EngineBuilder`)
// - Expose the screen stack, content and drawing seams under `core`
// - Keep the windowing layer (`platform`) hidden from end users
//
// Typical usage:
// ```no_run
// use screen_handoff::prelude::*;
//
// fn main() -> Result<(), EngineError> {
//     EngineBuilder::new()
//         .build()
//         .init(|manager| {
//             LoadingScreen::begin_transition(manager, false, None, Vec::new())?;
//             Ok(())
//         })?
//         .run()
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the screen stack, loading screen, content and drawing
// seams, and frame timing. Applications implement `Screen` against it.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains the Winit integration (window, event loop) and is
// kept private, as it is not part of the public API surface.
//
// `engine` wires the platform and core threads together.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder, EngineError};
