//=========================================================================
// Frame Loop
//=========================================================================
//
// Core-thread driver for the screen stack.
//
// Architecture:
//   Receiver<PlatformEvent>
//     → EventCollector::collect_frame()
//     → FrameClock::tick()
//     → ScreenManager::update()   (top-down)
//     → ScreenManager::draw()     (bottom-up)
//
// Exactly one update and one draw run per frame boundary, always in
// that order. Everything the screens do happens inside those two calls
// on this thread.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::Instant;

use crossbeam_channel::Receiver;
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::platform_bridge::{EventCollector, PlatformEvent, TickControl};
use crate::core::screen::{ScreenError, ScreenManager};
use crate::core::time::FrameClock;

//=== FrameLoop ===========================================================

/// Owns the screen manager and advances it once per frame.
pub(crate) struct FrameLoop {
    manager: ScreenManager,
    clock: FrameClock,
    frames: u64,
}

impl FrameLoop {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(manager: ScreenManager) -> Self {
        Self {
            manager,
            clock: FrameClock::new(),
            frames: 0,
        }
    }

    //--- spawn_core_thread() ---------------------------------------------
    //
    // Starts the screen manager and runs frames until the platform closes
    // the window, the channel disconnects, or a screen fails fatally.
    //
    pub(crate) fn spawn_core_thread(
        self,
        receiver: Receiver<PlatformEvent>,
    ) -> thread::JoinHandle<Result<(), ScreenError>> {
        thread::spawn(move || {
            let result = self.run(EventCollector::new(receiver));

            if let Err(e) = &result {
                error!("Core thread stopping on fatal screen error: {}", e);
            }

            result
        })
    }

    fn run(mut self, mut collector: EventCollector) -> Result<(), ScreenError> {
        self.manager.start()?;
        info!("Frame loop running with {} screens", self.manager.screen_count());

        loop {
            match collector.collect_frame() {
                TickControl::Frame(now) => {
                    if let Some(focused) = collector.take_focus_change() {
                        self.manager.set_host_focus(focused);
                    }
                    self.frame(now)?;
                }
                TickControl::Exit => {
                    info!("Core thread exiting after {} frames", self.frames);
                    return Ok(());
                }
            }
        }
    }

    //--- frame() ----------------------------------------------------------

    /// Runs one update and one draw for the frame boundary at `now`.
    pub(crate) fn frame(&mut self, now: Instant) -> Result<(), ScreenError> {
        let time = self.clock.tick(now);

        self.manager.update(&time)?;

        // A deferred load ran during update; keep its duration out of the
        // next frame's elapsed time.
        if self.manager.take_elapsed_reset() {
            self.clock.reset();
        }

        self.manager.draw(&time);
        self.frames += 1;

        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn manager(&mut self) -> &mut ScreenManager {
        &mut self.manager
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
