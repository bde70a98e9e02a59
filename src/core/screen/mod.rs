//=========================================================================
// Screen System
//=========================================================================
//
// Stack of screens with per-frame update/draw and transition timing.
//
// Architecture:
//   ScreenManager
//     └─ entries: Vec<ScreenEntry>   (bottom → top)
//          └─ Box<dyn Screen>
//               └─ ScreenCore        (transition state, owner, id)
//
// Flow (one frame):
//   update() top-down → Screen::update() → ScreenCore::update()
//   draw()   bottom-up → Screen::draw()   (Hidden screens skipped)
//
// LoadingScreen is a screen like any other: it sits in the same stack
// it watches and hands off to the next screens once the old ones have
// left the rendered output.
//
//=========================================================================

//=== Module Declarations =================================================

mod error;
mod loading;
mod screen_core;
mod screen_manager;

#[cfg(test)]
pub(crate) mod test_support;

//=== Public API ==========================================================

pub use error::ScreenError;
pub use loading::{LoadingScreen, LOADING_MESSAGE};
pub use screen_core::ScreenCore;
pub use screen_manager::{DeferredLoad, ScreenManager};

//=== Internal Dependencies ===============================================

use crate::core::content::ContentSource;
use crate::core::time::GameTime;

//=== Screen Identity =====================================================

/// Identifier assigned by the [`ScreenManager`] when a screen is added.
///
/// Ids are never reused within one manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(pub(crate) u64);

/// Player that owns a screen and its input.
///
/// The screen system never interprets it; it is carried along so a
/// handoff keeps the same owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerIndex {
    One,
    Two,
    Three,
    Four,
}

//=== ScreenState =========================================================

/// Transition lifecycle of a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenState {
    /// Fading in.
    #[default]
    TransitionOn,

    /// Fully on screen.
    Active,

    /// Fading out, either exiting or being covered.
    TransitionOff,

    /// Covered and fully faded out. Not drawn.
    Hidden,
}

//=== Screen Trait ========================================================

/// A unit of UI with its own update/draw lifecycle.
///
/// Implementors embed a [`ScreenCore`] and expose it through
/// [`Screen::core`] / [`Screen::core_mut`]. Everything else has a default.
///
/// # Minimal Implementation
///
/// ```rust
/// # use screen_handoff::prelude::*;
/// struct Title {
///     core: ScreenCore,
/// }
///
/// impl Screen for Title {
///     fn core(&self) -> &ScreenCore {
///         &self.core
///     }
///
///     fn core_mut(&mut self) -> &mut ScreenCore {
///         &mut self.core
///     }
/// }
/// ```
pub trait Screen: Send {
    fn core(&self) -> &ScreenCore;

    fn core_mut(&mut self) -> &mut ScreenCore;

    /// Short name used in log lines.
    fn name(&self) -> &str {
        "screen"
    }

    /// Called once before the first draw, when the screen joins a started
    /// manager (or when the manager starts).
    fn load_content(&mut self, _content: &mut dyn ContentSource) -> Result<(), ScreenError> {
        Ok(())
    }

    /// Called when the screen leaves the manager.
    fn unload_content(&mut self) {}

    /// Called every frame, topmost screen first.
    ///
    /// The default advances the transition state. Overrides should call
    /// [`ScreenCore::update`] before doing their own work.
    fn update(
        &mut self,
        manager: &mut ScreenManager,
        time: &GameTime,
        _other_screen_has_focus: bool,
        covered_by_other_screen: bool,
    ) -> Result<(), ScreenError> {
        self.core_mut().update(manager, time, covered_by_other_screen);
        Ok(())
    }

    /// Called every frame after all updates, bottom screen first.
    fn draw(&mut self, _manager: &mut ScreenManager, _time: &GameTime) {}

    fn state(&self) -> ScreenState {
        self.core().state()
    }

    fn transition_alpha(&self) -> f32 {
        self.core().transition_alpha()
    }
}
