//=========================================================================
// Screen Core
//=========================================================================
//
// Transition state shared by every screen.
//
// Transition position runs from 1.0 (fully off) to 0.0 (fully on).
// Each update moves it by elapsed / duration toward the target; a zero
// duration reaches the target in a single update.
//
//   exiting  → TransitionOff → removed from the manager at 1.0
//   covered  → TransitionOff → Hidden at 1.0
//   otherwise→ TransitionOn  → Active at 0.0
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::debug;

//=== Internal Dependencies ===============================================

use super::{PlayerIndex, ScreenId, ScreenManager, ScreenState};
use crate::core::time::GameTime;

//=== ScreenCore ==========================================================

/// Transition timers and ownership data embedded in every screen.
#[derive(Debug, Clone)]
pub struct ScreenCore {
    id: Option<ScreenId>,
    state: ScreenState,
    transition_on: Duration,
    transition_off: Duration,
    position: f32,
    is_exiting: bool,
    is_popup: bool,
    controlling_player: Option<PlayerIndex>,
}

impl ScreenCore {
    //--- Construction -----------------------------------------------------

    /// Creates a core that starts fully off and transitioning on, with
    /// instant transitions.
    pub fn new() -> Self {
        Self {
            id: None,
            state: ScreenState::TransitionOn,
            transition_on: Duration::ZERO,
            transition_off: Duration::ZERO,
            position: 1.0,
            is_exiting: false,
            is_popup: false,
            controlling_player: None,
        }
    }

    pub fn with_transition_on(mut self, duration: Duration) -> Self {
        self.transition_on = duration;
        self
    }

    pub fn with_transition_off(mut self, duration: Duration) -> Self {
        self.transition_off = duration;
        self
    }

    /// Marks the screen as a popup. Popups do not cover screens below them.
    pub fn with_popup(mut self, is_popup: bool) -> Self {
        self.is_popup = is_popup;
        self
    }

    //--- Accessors --------------------------------------------------------

    /// Id assigned by the manager, `None` until the screen is added.
    pub fn id(&self) -> Option<ScreenId> {
        self.id
    }

    pub fn state(&self) -> ScreenState {
        self.state
    }

    pub fn transition_on(&self) -> Duration {
        self.transition_on
    }

    pub fn transition_off(&self) -> Duration {
        self.transition_off
    }

    /// Position in `[0, 1]`, where 0 is fully on and 1 is fully off.
    pub fn transition_position(&self) -> f32 {
        self.position
    }

    /// Opacity in `[0, 1]` derived from the transition position.
    pub fn transition_alpha(&self) -> f32 {
        1.0 - self.position
    }

    pub fn is_exiting(&self) -> bool {
        self.is_exiting
    }

    pub fn is_popup(&self) -> bool {
        self.is_popup
    }

    pub fn controlling_player(&self) -> Option<PlayerIndex> {
        self.controlling_player
    }

    /// True while the screen is fully on and not leaving.
    pub fn is_active(&self) -> bool {
        self.state == ScreenState::Active && !self.is_exiting
    }

    //--- Manager Hooks ----------------------------------------------------

    pub(crate) fn attach(&mut self, id: ScreenId, player: Option<PlayerIndex>) {
        self.id = Some(id);
        self.controlling_player = player;
        self.is_exiting = false;
    }

    pub(crate) fn mark_exiting(&mut self) {
        self.is_exiting = true;
    }

    //--- Update -----------------------------------------------------------

    /// Advances the transition for one frame.
    ///
    /// An exiting screen that finishes transitioning off removes itself
    /// from `manager`.
    pub fn update(&mut self, manager: &mut ScreenManager, time: &GameTime, covered: bool) {
        if self.is_exiting {
            self.state = ScreenState::TransitionOff;

            if !self.advance(time, self.transition_off, 1.0) {
                if let Some(id) = self.id {
                    debug!(target: "screen", "Screen {:?} finished exiting", id);
                    manager.remove_screen(id);
                }
            }
        } else if covered {
            self.state = if self.advance(time, self.transition_off, 1.0) {
                ScreenState::TransitionOff
            } else {
                ScreenState::Hidden
            };
        } else {
            self.state = if self.advance(time, self.transition_on, -1.0) {
                ScreenState::TransitionOn
            } else {
                ScreenState::Active
            };
        }
    }

    /// Moves the position toward the end given by `direction`.
    ///
    /// Returns `false` once the end is reached.
    fn advance(&mut self, time: &GameTime, duration: Duration, direction: f32) -> bool {
        let delta = if duration.is_zero() {
            1.0
        } else {
            time.elapsed.as_secs_f32() / duration.as_secs_f32()
        };

        self.position += delta * direction;

        if (direction < 0.0 && self.position <= 0.0) || (direction > 0.0 && self.position >= 1.0) {
            self.position = self.position.clamp(0.0, 1.0);
            return false;
        }

        true
    }
}

impl Default for ScreenCore {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::screen::test_support::{frame, manager, PlainScreen};

    //=====================================================================
    // Transition On
    //=====================================================================

    #[test]
    fn new_core_starts_fully_off() {
        let core = ScreenCore::new();
        assert_eq!(core.state(), ScreenState::TransitionOn);
        assert_eq!(core.transition_alpha(), 0.0);
        assert!(core.id().is_none());
    }

    #[test]
    fn zero_duration_activates_in_one_update() {
        let mut manager = manager();
        let mut core = ScreenCore::new();

        core.update(&mut manager, &frame(16), false);

        assert_eq!(core.state(), ScreenState::Active);
        assert_eq!(core.transition_alpha(), 1.0);
    }

    #[test]
    fn transition_on_progresses_with_elapsed_time() {
        let mut manager = manager();
        let mut core = ScreenCore::new().with_transition_on(Duration::from_millis(500));

        core.update(&mut manager, &frame(250), false);
        assert_eq!(core.state(), ScreenState::TransitionOn);
        assert_eq!(core.transition_alpha(), 0.5);

        core.update(&mut manager, &frame(250), false);
        assert_eq!(core.state(), ScreenState::Active);
        assert_eq!(core.transition_alpha(), 1.0);
    }

    #[test]
    fn position_is_clamped_after_overshoot() {
        let mut manager = manager();
        let mut core = ScreenCore::new().with_transition_on(Duration::from_millis(100));

        core.update(&mut manager, &frame(1000), false);

        assert_eq!(core.transition_position(), 0.0);
    }

    //=====================================================================
    // Covered
    //=====================================================================

    #[test]
    fn covered_screen_becomes_hidden() {
        let mut manager = manager();
        let mut core = ScreenCore::new().with_transition_off(Duration::from_millis(500));

        core.update(&mut manager, &frame(16), false);
        assert_eq!(core.state(), ScreenState::Active);

        core.update(&mut manager, &frame(250), true);
        assert_eq!(core.state(), ScreenState::TransitionOff);

        core.update(&mut manager, &frame(250), true);
        assert_eq!(core.state(), ScreenState::Hidden);
    }

    //=====================================================================
    // Exiting
    //=====================================================================

    #[test]
    fn exiting_screen_is_removed_when_fully_off() {
        let mut manager = manager();
        let id = manager.add_screen(PlainScreen::boxed(ScreenCore::new()), None).unwrap();

        let mut core = ScreenCore::new().with_transition_off(Duration::from_millis(500));
        core.attach(id, None);
        core.update(&mut manager, &frame(16), false);
        core.mark_exiting();

        core.update(&mut manager, &frame(250), false);
        assert_eq!(core.state(), ScreenState::TransitionOff);
        assert!(manager.contains(id));

        core.update(&mut manager, &frame(250), false);
        assert!(!manager.contains(id));
    }

    #[test]
    fn attach_sets_owner_and_clears_exiting() {
        let mut core = ScreenCore::new();
        core.mark_exiting();
        core.attach(ScreenId(7), Some(PlayerIndex::Two));

        assert_eq!(core.id(), Some(ScreenId(7)));
        assert_eq!(core.controlling_player(), Some(PlayerIndex::Two));
        assert!(!core.is_exiting());
    }
}
