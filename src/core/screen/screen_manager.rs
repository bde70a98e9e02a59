//=========================================================================
// Screen Manager
//=========================================================================
//
// Owns the ordered screen stack and drives it once per frame.
//
// Screens receive `&mut ScreenManager` in their own update/draw, so the
// manager checks each screen out of its entry while it runs:
//
//   entries: [ A | B | (C checked out) ]
//                        └─ C.update(&mut manager)
//                             ├─ add/remove/exit other screens: immediate
//                             └─ remove C itself: entry gone now,
//                                screen dropped when C returns
//
// Removal is synchronous. Once `remove_screen` returns, the screen no
// longer counts toward `screen_count`, even if it is the screen that
// asked for its own removal.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Instant;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::{PlayerIndex, Screen, ScreenError, ScreenId, ScreenState};
use crate::core::content::ContentSource;
use crate::core::render::SpriteBatch;
use crate::core::time::GameTime;

//=== Deferred Load =======================================================

/// Slow content load run on behalf of a loading screen.
///
/// Runs to completion inside the frame that invokes it.
pub type DeferredLoad =
    Box<dyn FnMut(&mut dyn ContentSource) -> Result<(), ScreenError> + Send>;

//=== ScreenEntry =========================================================

struct ScreenEntry {
    id: ScreenId,

    /// `None` while the screen is checked out for update or draw.
    screen: Option<Box<dyn Screen>>,

    /// Exit requested while the screen was checked out.
    exit_requested: bool,
}

//=== ScreenManager =======================================================

/// Ordered stack of screens, bottom first.
///
/// The topmost screens receive focus; non-popup screens cover everything
/// beneath them.
pub struct ScreenManager {
    entries: Vec<ScreenEntry>,
    next_id: u64,
    started: bool,
    host_focused: bool,
    elapsed_reset_requested: bool,
    content: Box<dyn ContentSource>,
    sprite_batch: Box<dyn SpriteBatch>,
    deferred_load: Option<DeferredLoad>,
}

impl ScreenManager {
    //--- Construction -----------------------------------------------------

    /// Creates an empty, not-yet-started manager.
    pub fn new<C, B>(content: C, sprite_batch: B) -> Self
    where
        C: ContentSource + 'static,
        B: SpriteBatch + 'static,
    {
        Self::from_boxed(Box::new(content), Box::new(sprite_batch))
    }

    pub(crate) fn from_boxed(
        content: Box<dyn ContentSource>,
        sprite_batch: Box<dyn SpriteBatch>,
    ) -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
            started: false,
            host_focused: true,
            elapsed_reset_requested: false,
            content,
            sprite_batch,
            deferred_load: None,
        }
    }

    /// Registers the slow load run by [`ScreenManager::perform_deferred_load`].
    ///
    /// Replaces any previously registered load.
    pub fn set_deferred_load<F>(&mut self, load: F)
    where
        F: FnMut(&mut dyn ContentSource) -> Result<(), ScreenError> + Send + 'static,
    {
        if self.deferred_load.replace(Box::new(load)).is_some() {
            warn!(target: "screen", "Deferred load was already set and has been replaced");
        }
    }

    /// Loads content for every screen added so far.
    ///
    /// Screens added after this call load their content on add.
    pub fn start(&mut self) -> Result<(), ScreenError> {
        if self.started {
            return Ok(());
        }

        debug!(target: "screen", "Starting screen manager with {} screens", self.entries.len());
        self.started = true;

        for entry in &mut self.entries {
            if let Some(screen) = entry.screen.as_mut() {
                screen.load_content(self.content.as_mut())?;
            }
        }

        Ok(())
    }

    //--- Shared Resources -------------------------------------------------

    pub fn sprite_batch(&mut self) -> &mut dyn SpriteBatch {
        self.sprite_batch.as_mut()
    }

    pub fn content(&mut self) -> &mut dyn ContentSource {
        self.content.as_mut()
    }

    /// Whether the host window has focus. Without it, no screen does.
    pub fn set_host_focus(&mut self, focused: bool) {
        self.host_focused = focused;
    }

    //--- Stack Queries ----------------------------------------------------

    /// Number of screens in the stack, including exiting ones and the
    /// screen currently being updated or drawn.
    pub fn screen_count(&self) -> usize {
        self.entries.len()
    }

    /// Ids of all screens, bottom first.
    pub fn screen_ids(&self) -> Vec<ScreenId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    pub fn contains(&self, id: ScreenId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Screens currently in their entries, bottom first.
    ///
    /// A screen that is mid-update or mid-draw is not yielded.
    pub fn screens(&self) -> impl Iterator<Item = &dyn Screen> {
        self.entries.iter().filter_map(|e| e.screen.as_deref())
    }

    /// State of a screen, `None` if it is not in the stack or checked out.
    pub fn state_of(&self, id: ScreenId) -> Option<ScreenState> {
        self.entry(id)
            .and_then(|e| e.screen.as_ref())
            .map(|s| s.state())
    }

    //--- Stack Operations -------------------------------------------------

    /// Adds a screen on top of the stack.
    ///
    /// Loads its content immediately when the manager has started; a
    /// content failure leaves the stack unchanged.
    pub fn add_screen(
        &mut self,
        mut screen: Box<dyn Screen>,
        player: Option<PlayerIndex>,
    ) -> Result<ScreenId, ScreenError> {
        let id = ScreenId(self.next_id);
        self.next_id += 1;

        screen.core_mut().attach(id, player);

        if self.started {
            screen.load_content(self.content.as_mut())?;
        }

        debug!(target: "screen", "Adding screen {:?} ({}) for {:?}", id, screen.name(), player);

        self.entries.push(ScreenEntry {
            id,
            screen: Some(screen),
            exit_requested: false,
        });

        Ok(id)
    }

    /// Removes a screen from the stack immediately.
    ///
    /// Returns `false` if the screen was not in the stack.
    pub fn remove_screen(&mut self, id: ScreenId) -> bool {
        let Some(pos) = self.entries.iter().position(|e| e.id == id) else {
            debug!(target: "screen", "Screen {:?} not found in stack, skipping removal", id);
            return false;
        };

        debug!(target: "screen", "Removing screen {:?} from stack at position {}", id, pos);
        let entry = self.entries.remove(pos);

        // A checked-out screen is unloaded when it is handed back.
        if let Some(mut screen) = entry.screen {
            screen.unload_content();
        }

        true
    }

    /// Starts a screen's exit transition.
    ///
    /// Screens without a transition-off duration are removed at once;
    /// others keep updating and drawing until they have faded out.
    pub fn exit_screen(&mut self, id: ScreenId) {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            debug!(target: "screen", "Screen {:?} not found in stack, skipping exit", id);
            return;
        };

        let Some(screen) = entry.screen.as_mut() else {
            entry.exit_requested = true;
            return;
        };

        if screen.core().transition_off().is_zero() {
            self.remove_screen(id);
        } else {
            debug!(target: "screen", "Screen {:?} ({}) is exiting", id, screen.name());
            screen.core_mut().mark_exiting();
        }
    }

    //--- Deferred Load ----------------------------------------------------

    /// Runs the registered deferred load, if any.
    ///
    /// Afterwards the next frame reports zero elapsed time so screens do
    /// not animate through the time the load took.
    pub fn perform_deferred_load(&mut self) -> Result<(), ScreenError> {
        self.elapsed_reset_requested = true;

        let Some(load) = self.deferred_load.as_mut() else {
            debug!(target: "screen", "No deferred load registered");
            return Ok(());
        };

        info!(target: "screen", "Deferred load started");
        let started = Instant::now();

        load(self.content.as_mut())?;

        info!(target: "screen", "Deferred load finished in {:?}", started.elapsed());
        Ok(())
    }

    /// Returns and clears the elapsed-time reset request.
    pub fn take_elapsed_reset(&mut self) -> bool {
        std::mem::take(&mut self.elapsed_reset_requested)
    }

    //--- Frame Loop -------------------------------------------------------

    /// Updates every screen, topmost first.
    ///
    /// Screens added during this pass are first updated next frame;
    /// screens removed during it are skipped.
    pub fn update(&mut self, time: &GameTime) -> Result<(), ScreenError> {
        let mut other_screen_has_focus = !self.host_focused;
        let mut covered_by_other_screen = false;

        for id in self.screen_ids().into_iter().rev() {
            let Some(mut screen) = self.check_out(id) else {
                continue;
            };

            let result = screen.update(self, time, other_screen_has_focus, covered_by_other_screen);

            let state = screen.state();
            let is_popup = screen.core().is_popup();
            self.hand_back(id, screen);
            result?;

            if matches!(state, ScreenState::TransitionOn | ScreenState::Active) {
                other_screen_has_focus = true;

                if !is_popup {
                    covered_by_other_screen = true;
                }
            }
        }

        Ok(())
    }

    /// Draws every visible screen, bottom first.
    pub fn draw(&mut self, time: &GameTime) {
        for id in self.screen_ids() {
            let Some(mut screen) = self.check_out(id) else {
                continue;
            };

            if screen.state() != ScreenState::Hidden {
                screen.draw(self, time);
            }

            self.hand_back(id, screen);
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn entry(&self, id: ScreenId) -> Option<&ScreenEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn check_out(&mut self, id: ScreenId) -> Option<Box<dyn Screen>> {
        self.entries
            .iter_mut()
            .find(|e| e.id == id)
            .and_then(|e| e.screen.take())
    }

    fn hand_back(&mut self, id: ScreenId, mut screen: Box<dyn Screen>) {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            // Removed while checked out.
            screen.unload_content();
            return;
        };

        entry.screen = Some(screen);

        if std::mem::take(&mut entry.exit_requested) {
            self.exit_screen(id);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
