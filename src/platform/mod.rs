//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the core frame loop via channel.
//
// Architecture:
// ```text
//  Main Thread:                     Core Thread:
//  ┌──────────────────────────┐    ┌──────────────────────┐
//  │  Winit Event Loop        │    │  FrameLoop           │
//  │   ↓                      │    │   ├─ FrameClock      │
//  │  Focused(bool) ──────────┼──┐ │   └─ ScreenManager   │
//  │  RedrawRequested         │  │ │       ├─ update()    │
//  │   ↓ (frame boundary)     │  │ │       └─ draw()      │
//  │  Channel ────────────────┼──┴─┼──────────↑           │
//  └──────────────────────────┘    └──────────────────────┘
//                     PlatformEvent
// ```
//
// Key Design Decisions:
// - **RedrawRequested = frame boundary**: one `Frame` event per redraw,
//   stamped with the instant it was observed
// - **Core owns all screen state**: the platform never touches screens
// - **Main thread requirement**: Winit mandates main thread on macOS/iOS,
//   so this runs on the thread that called `Engine::run()`
//
//=========================================================================

//=== External Crates =====================================================

use std::time::Instant;

use crossbeam_channel::Sender;
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes},
};

//=== Internal Imports ====================================================

use crate::core::platform_bridge::{PlatformError, PlatformEvent};

//=== WindowConfig ========================================================

/// Window creation parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

//=== Platform ============================================================

/// Window owner and frame-boundary source.
///
/// Runs on the main thread and sends [`PlatformEvent`]s to the core
/// thread. Not Send: it must stay where the event loop lives.
pub(crate) struct Platform {
    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,

    config: WindowConfig,

    /// Channel to send events to core thread.
    event_sender: Sender<PlatformEvent>,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// Does not create the window yet; that happens lazily in `resumed()`.
    pub fn new(event_sender: Sender<PlatformEvent>, config: WindowConfig) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            config,
            event_sender,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until the window closes or the core thread stops.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running.
    pub fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new()
            .map_err(|e| PlatformError::EventLoopCreation(e.to_string()))?;

        event_loop
            .run_app(&mut self)
            .map_err(|e| PlatformError::EventLoopExecution(e.to_string()))
    }

    //--- Internal Helpers -------------------------------------------------

    /// Sends an event to the core thread.
    ///
    /// Returns `false` if the core thread has stopped (channel disconnected).
    fn send(&self, event: PlatformEvent) -> bool {
        if self.event_sender.send(event).is_err() {
            warn!(target: "platform", "Core thread has stopped, channel disconnected");
            return false;
        }
        true
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Creates the window if it doesn't exist yet. On mobile, this may be
    /// called multiple times (suspend/resume cycle).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }

            WindowEvent::Focused(focused) => {
                trace!(target: "platform", "Focus changed: {}", focused);
                if !self.send(PlatformEvent::FocusChanged(focused)) {
                    event_loop.exit();
                }
            }

            WindowEvent::RedrawRequested => {
                if !self.send(PlatformEvent::Frame(Instant::now())) {
                    event_loop.exit();
                    return;
                }

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    fn config() -> WindowConfig {
        WindowConfig {
            title: "test".to_string(),
            width: 320,
            height: 240,
        }
    }

    #[test]
    fn platform_creation_defers_window() {
        let (tx, _rx) = unbounded();
        let platform = Platform::new(tx, config());
        assert!(platform.window.is_none(), "Window should be created lazily");
    }

    #[test]
    fn send_forwards_events() {
        let (tx, rx) = unbounded();
        let platform = Platform::new(tx, config());

        assert!(platform.send(PlatformEvent::FocusChanged(true)));

        match rx.try_recv() {
            Ok(PlatformEvent::FocusChanged(true)) => {}
            other => panic!("Expected FocusChanged(true), got {:?}", other),
        }
    }

    #[test]
    fn send_reports_disconnected_core() {
        let (tx, rx) = unbounded();
        let platform = Platform::new(tx, config());

        drop(rx);

        assert!(!platform.send(PlatformEvent::WindowClosed));
    }

    #[test]
    fn platform_error_display_format() {
        let err = PlatformError::EventLoopCreation("no display".to_string());
        assert_eq!(err.to_string(), "Event loop creation failed: no display");
    }
}
