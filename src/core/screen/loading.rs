//=========================================================================
// Loading Screen
//=========================================================================
//
// Two-phase handoff between screen sets.
//
// Flow:
//   begin_transition()
//     ├─ exit every screen in the stack
//     └─ push LoadingScreen
//   ... old screens fade out, LoadingScreen fades in ...
//   draw():   Active && stack == [self]  →  others_cleared = true
//   update(): others_cleared
//     ├─ perform_deferred_load()
//     ├─ remove self
//     └─ stack empty → add pending screens
//
// The sole-screen check runs in draw, not update. A frame must actually
// have been drawn without the old screens before the load starts;
// checking in update would act one frame early, while the last exiting
// screen may still be on the previous frame's output.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::{PlayerIndex, Screen, ScreenCore, ScreenError, ScreenId, ScreenManager, ScreenState};
use crate::core::content::ContentSource;
use crate::core::render::{Color, FontHandle, TextureHandle};
use crate::core::time::GameTime;

//=== Constants ===========================================================

/// Text shown while a heavy load is pending.
pub const LOADING_MESSAGE: &str = "Loading...";

const FONT_ASSET: &str = "menufont";
const BACKGROUND_ASSET: &str = "loading";

const TRANSITION_ON: Duration = Duration::from_millis(500);
const HEAVY_TRANSITION_OFF: Duration = Duration::from_secs(1);

//=== LoadingScreen =======================================================

/// Screen that waits for the stack to clear, runs the deferred load,
/// then installs the next screens.
///
/// Only created through [`LoadingScreen::begin_transition`].
pub struct LoadingScreen {
    core: ScreenCore,
    is_heavy_load: bool,

    /// Latched in `draw` once this is the only screen left.
    others_cleared: bool,

    /// Set when the handoff has run. Guards against a second load.
    handed_off: bool,

    pending: Vec<Option<Box<dyn Screen>>>,
    font: Option<FontHandle>,
    background: Option<TextureHandle>,
}

impl LoadingScreen {
    //--- Construction -----------------------------------------------------

    /// Starts a handoff from the current screens to `pending`.
    ///
    /// Every screen in `manager` begins exiting and a loading screen is
    /// pushed on top, owned by `owning_player`. Returns at once; the
    /// handoff completes over the following frames.
    ///
    /// With `is_heavy_load` the loading screen paints a "Loading..."
    /// indicator. Its one-second transition-off is configured but never
    /// played: the handoff removes the screen synchronously.
    ///
    /// `None` entries in `pending` are skipped.
    ///
    /// # Errors
    ///
    /// Fails if the manager has started and the indicator font cannot be
    /// loaded. The existing screens have already been told to exit by
    /// then, so after an error the stack holds only their exit
    /// transitions and no loading screen.
    pub fn begin_transition<I>(
        manager: &mut ScreenManager,
        is_heavy_load: bool,
        owning_player: Option<PlayerIndex>,
        pending: I,
    ) -> Result<ScreenId, ScreenError>
    where
        I: IntoIterator<Item = Option<Box<dyn Screen>>>,
    {
        for id in manager.screen_ids() {
            manager.exit_screen(id);
        }

        let screen = Self::new(is_heavy_load, pending.into_iter().collect());
        let pending_count = screen.pending.len();

        let id = manager.add_screen(Box::new(screen), owning_player)?;

        info!(
            target: "screen::loading",
            "Transition begun (heavy: {}, pending screens: {})",
            is_heavy_load,
            pending_count
        );

        Ok(id)
    }

    fn new(is_heavy_load: bool, pending: Vec<Option<Box<dyn Screen>>>) -> Self {
        let core = if is_heavy_load {
            ScreenCore::new()
                .with_transition_on(TRANSITION_ON)
                .with_transition_off(HEAVY_TRANSITION_OFF)
        } else {
            ScreenCore::new().with_transition_on(TRANSITION_ON)
        };

        Self {
            core,
            is_heavy_load,
            others_cleared: false,
            handed_off: false,
            pending,
            font: None,
            background: None,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn is_heavy_load(&self) -> bool {
        self.is_heavy_load
    }

    /// Whether a drawn frame has shown this as the only screen.
    pub fn others_cleared(&self) -> bool {
        self.others_cleared
    }

    //--- Handoff ----------------------------------------------------------

    fn hand_off(&mut self, manager: &mut ScreenManager) -> Result<(), ScreenError> {
        self.handed_off = true;

        manager.perform_deferred_load()?;

        if let Some(id) = self.core.id() {
            manager.remove_screen(id);
        }

        let remaining = manager.screen_count();
        if remaining != 0 {
            warn!(
                target: "screen::loading",
                "{} screens still in stack after removal, dropping {} pending screens",
                remaining,
                self.pending.len()
            );
            self.pending.clear();
            return Ok(());
        }

        let player = self.core.controlling_player();

        for (index, screen) in self.pending.drain(..).enumerate() {
            match screen {
                Some(screen) => {
                    manager.add_screen(screen, player)?;
                }
                None => debug!(target: "screen::loading", "Skipping empty pending slot {}", index),
            }
        }

        info!(target: "screen::loading", "Handoff complete, {} screens installed", manager.screen_count());
        Ok(())
    }

    fn draw_indicator(&self, manager: &mut ScreenManager, font: FontHandle) {
        let color = Color::WHITE.faded(self.core.transition_alpha());
        let batch = manager.sprite_batch();

        let viewport = batch.viewport();
        let text_size = batch.measure_string(font, LOADING_MESSAGE);
        let text_position = viewport.center(text_size);

        batch.begin();
        match self.background {
            Some(texture) => batch.draw_texture(texture, viewport.bounds(), color),
            None => batch.draw_string(font, LOADING_MESSAGE, text_position, color),
        }
        batch.end();
    }
}

//=== Screen Implementation ===============================================

impl Screen for LoadingScreen {
    fn core(&self) -> &ScreenCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ScreenCore {
        &mut self.core
    }

    fn name(&self) -> &str {
        "loading"
    }

    fn load_content(&mut self, content: &mut dyn ContentSource) -> Result<(), ScreenError> {
        if self.font.is_none() {
            self.font = Some(content.load_font(FONT_ASSET)?);
        }

        if self.background.is_none() {
            match content.load_texture(BACKGROUND_ASSET) {
                Ok(texture) => self.background = Some(texture),
                Err(e) => warn!(target: "screen::loading", "No loading background, using text: {}", e),
            }
        }

        Ok(())
    }

    fn update(
        &mut self,
        manager: &mut ScreenManager,
        time: &GameTime,
        _other_screen_has_focus: bool,
        covered_by_other_screen: bool,
    ) -> Result<(), ScreenError> {
        self.core.update(manager, time, covered_by_other_screen);

        if self.others_cleared && !self.handed_off {
            self.hand_off(manager)?;
        }

        Ok(())
    }

    fn draw(&mut self, manager: &mut ScreenManager, _time: &GameTime) {
        if !self.others_cleared
            && self.core.state() == ScreenState::Active
            && manager.screen_count() == 1
        {
            debug!(target: "screen::loading", "Previous screens cleared");
            self.others_cleared = true;
        }

        if self.is_heavy_load {
            if let Some(font) = self.font {
                self.draw_indicator(manager, font);
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::core::content::MemoryContent;
    use crate::core::render::{DrawCall, RecordingBatch, Viewport};
    use crate::core::screen::test_support::{frame, manager, PlainScreen};

    fn started_manager(content: MemoryContent) -> (ScreenManager, crate::core::render::DrawLog) {
        let batch = RecordingBatch::new(Viewport::new(800, 600));
        let log = batch.log();
        let mut manager = ScreenManager::new(content, batch);
        manager.start().unwrap();
        (manager, log)
    }

    fn full_content() -> MemoryContent {
        MemoryContent::new().with_font(FONT_ASSET).with_texture(BACKGROUND_ASSET)
    }

    fn run_frame(manager: &mut ScreenManager, ms: u64) {
        let time = frame(ms);
        manager.update(&time).unwrap();
        manager.draw(&time);
    }

    fn loading_screen(manager: &ScreenManager) -> Option<&dyn Screen> {
        manager.screens().find(|s| s.name() == "loading")
    }

    //=====================================================================
    // Construction
    //=====================================================================

    #[test]
    fn heavy_load_sets_slow_transition_off() {
        let screen = LoadingScreen::new(true, Vec::new());
        assert_eq!(screen.core.transition_on(), TRANSITION_ON);
        assert_eq!(screen.core.transition_off(), HEAVY_TRANSITION_OFF);
    }

    #[test]
    fn light_load_has_instant_transition_off() {
        let screen = LoadingScreen::new(false, Vec::new());
        assert_eq!(screen.core.transition_on(), TRANSITION_ON);
        assert_eq!(screen.core.transition_off(), Duration::ZERO);
    }

    #[test]
    fn begin_transition_exits_existing_screens() {
        let (mut manager, _log) = started_manager(full_content());
        let instant = manager.add_screen(PlainScreen::boxed(ScreenCore::new()), None).unwrap();
        let slow = manager
            .add_screen(
                PlainScreen::boxed(ScreenCore::new().with_transition_off(Duration::from_millis(500))),
                None,
            )
            .unwrap();

        let id = LoadingScreen::begin_transition(&mut manager, true, Some(PlayerIndex::One), Vec::new())
            .unwrap();

        assert!(!manager.contains(instant));
        assert!(manager.contains(slow));
        assert!(manager.screens().any(|s| s.core().is_exiting()));
        assert_eq!(manager.screen_ids().last(), Some(&id));

        let loading = loading_screen(&manager).unwrap();
        assert_eq!(loading.core().controlling_player(), Some(PlayerIndex::One));
    }

    //=====================================================================
    // Content
    //=====================================================================

    #[test]
    fn missing_font_is_fatal() {
        let (mut manager, _log) = started_manager(MemoryContent::new().with_texture(BACKGROUND_ASSET));

        let result = LoadingScreen::begin_transition(&mut manager, true, None, Vec::new());

        assert!(matches!(result, Err(ScreenError::Content(_))));
        assert_eq!(manager.screen_count(), 0);
    }

    #[test]
    fn missing_font_leaves_old_screens_exiting() {
        let (mut manager, _log) = started_manager(MemoryContent::new());
        let instant = manager.add_screen(PlainScreen::boxed(ScreenCore::new()), None).unwrap();
        let slow = manager
            .add_screen(
                PlainScreen::boxed(ScreenCore::new().with_transition_off(Duration::from_millis(500))),
                None,
            )
            .unwrap();

        let result = LoadingScreen::begin_transition(&mut manager, true, None, Vec::new());

        assert!(matches!(result, Err(ScreenError::Content(_))));
        assert!(!manager.contains(instant));
        assert_eq!(manager.screen_ids(), vec![slow]);
        assert!(manager.screens().all(|s| s.core().is_exiting()));
        assert!(loading_screen(&manager).is_none());
    }

    #[test]
    fn missing_background_is_tolerated() {
        let (mut manager, _log) = started_manager(MemoryContent::new().with_font(FONT_ASSET));

        let result = LoadingScreen::begin_transition(&mut manager, true, None, Vec::new());

        assert!(result.is_ok());
    }

    //=====================================================================
    // Detection
    //=====================================================================

    #[test]
    fn detection_waits_for_active_state() {
        let (mut manager, _log) = started_manager(full_content());
        let id = LoadingScreen::begin_transition(&mut manager, false, None, Vec::new()).unwrap();

        // Half way on: sole screen, but not yet active.
        run_frame(&mut manager, 250);
        assert!(manager.contains(id));
        assert_eq!(manager.state_of(id), Some(ScreenState::TransitionOn));

        // Fully on: detection latches during this draw.
        run_frame(&mut manager, 250);
        assert!(manager.contains(id));

        // Next update hands off and removes.
        run_frame(&mut manager, 250);
        assert!(!manager.contains(id));
    }

    #[test]
    fn detection_waits_for_other_screens_to_leave() {
        let (mut manager, _log) = started_manager(full_content());
        manager
            .add_screen(
                PlainScreen::boxed(ScreenCore::new().with_transition_off(Duration::from_secs(2))),
                None,
            )
            .unwrap();
        run_frame(&mut manager, 16);

        let id = LoadingScreen::begin_transition(&mut manager, false, None, Vec::new()).unwrap();

        for _ in 0..4 {
            run_frame(&mut manager, 250);
            assert!(manager.contains(id), "handoff must wait for the exiting screen");
        }
    }

    //=====================================================================
    // Handoff
    //=====================================================================

    #[test]
    fn deferred_load_runs_once() {
        let (mut manager, _log) = started_manager(full_content());
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = loads.clone();
        manager.set_deferred_load(move |_content| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        LoadingScreen::begin_transition(&mut manager, false, None, Vec::new()).unwrap();

        for _ in 0..10 {
            run_frame(&mut manager, 250);
        }

        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn hand_off_twice_is_prevented() {
        let mut manager = manager();
        let mut screen = LoadingScreen::new(false, Vec::new());
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = loads.clone();
        manager.set_deferred_load(move |_content| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        screen.others_cleared = true;
        screen.update(&mut manager, &frame(16), false, false).unwrap();
        screen.update(&mut manager, &frame(16), false, false).unwrap();

        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn heavy_handoff_removes_without_fade_out() {
        let (mut manager, log) = started_manager(full_content());
        let id = LoadingScreen::begin_transition(&mut manager, true, None, Vec::new()).unwrap();

        run_frame(&mut manager, 250);
        run_frame(&mut manager, 250);
        assert_eq!(manager.state_of(id), Some(ScreenState::Active));
        let drawn = log.lock().unwrap().len();

        // Handoff frame: gone at once, no TransitionOff frames drawn.
        run_frame(&mut manager, 250);
        assert!(!manager.contains(id));

        run_frame(&mut manager, 250);
        assert_eq!(log.lock().unwrap().len(), drawn);
    }

    #[test]
    fn none_pending_entries_are_skipped() {
        let (mut manager, _log) = started_manager(full_content());
        let pending: Vec<Option<Box<dyn Screen>>> = vec![
            None,
            Some(PlainScreen::boxed(ScreenCore::new())),
            None,
        ];

        LoadingScreen::begin_transition(&mut manager, false, Some(PlayerIndex::Two), pending).unwrap();

        for _ in 0..3 {
            run_frame(&mut manager, 250);
        }

        assert_eq!(manager.screen_count(), 1);
        let installed = manager.screens().next().unwrap();
        assert_eq!(installed.name(), "plain");
        assert_eq!(installed.core().controlling_player(), Some(PlayerIndex::Two));
    }

    //=====================================================================
    // Indicator
    //=====================================================================

    #[test]
    fn light_load_never_draws_indicator() {
        let (mut manager, log) = started_manager(full_content());
        LoadingScreen::begin_transition(&mut manager, false, None, Vec::new()).unwrap();

        for _ in 0..3 {
            run_frame(&mut manager, 250);
        }

        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn heavy_load_draws_background_with_faded_white() {
        let (mut manager, log) = started_manager(full_content());
        LoadingScreen::begin_transition(&mut manager, true, None, Vec::new()).unwrap();

        run_frame(&mut manager, 250);

        let calls = log.lock().unwrap();
        assert_eq!(
            *calls,
            vec![DrawCall::Texture {
                texture: TextureHandle(0),
                destination: Viewport::new(800, 600).bounds(),
                color: Color::WHITE.faded(0.5),
            }]
        );
    }

    #[test]
    fn heavy_load_without_background_draws_centered_text() {
        let (mut manager, log) = started_manager(MemoryContent::new().with_font(FONT_ASSET));
        LoadingScreen::begin_transition(&mut manager, true, None, Vec::new()).unwrap();

        run_frame(&mut manager, 500);

        let calls = log.lock().unwrap();
        match calls.as_slice() {
            [DrawCall::String { text, position, color, .. }] => {
                assert_eq!(text, LOADING_MESSAGE);
                // 10 glyphs of 8x16 centered in 800x600.
                assert_eq!(*position, glam::Vec2::new(360.0, 292.0));
                assert_eq!(*color, Color::WHITE);
            }
            other => panic!("Expected one text draw, got {:?}", other),
        }
    }
}
