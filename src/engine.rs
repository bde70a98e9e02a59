//=========================================================================
// Screen Handoff Engine
//
// Main entry point: configures the host, registers the initial screens,
// and runs the platform and core threads until the window closes.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──init()──>  Engine  ──run()──>  [Runtime]
//         │                          │                                 │
//         ├─ with_window_size()      └─ owns ScreenManager             ├─ spawns core thread
//         ├─ with_content()                                            ├─ runs platform
//         └─ with_deferred_load()                                      └─ blocks until exit
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::content::{ContentSource, DirectoryContent};
use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use crate::core::render::{HeadlessBatch, SpriteBatch, Viewport};
use crate::core::screen::{DeferredLoad, ScreenError, ScreenManager};
use crate::core::FrameLoop;
use crate::platform::{Platform, WindowConfig};

//=== Defaults ============================================================

const DEFAULT_WIDTH: u32 = 800;
const DEFAULT_HEIGHT: u32 = 600;
const DEFAULT_TITLE: &str = "Screen Handoff";
const DEFAULT_CHANNEL_CAPACITY: usize = 128;
const DEFAULT_CONTENT_ROOT: &str = "content";

//=== EngineError =========================================================

/// Errors surfaced by [`Engine::init`] and [`Engine::run`].
#[derive(Debug)]
pub enum EngineError {
    /// The windowing event loop failed.
    Platform(PlatformError),

    /// A screen or the deferred load failed fatally.
    Screen(ScreenError),

    /// The core thread panicked instead of returning.
    CoreThreadPanicked,
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Platform(e) => write!(f, "Platform error: {}", e),
            Self::Screen(e) => write!(f, "Screen error: {}", e),
            Self::CoreThreadPanicked => write!(f, "Core thread panicked"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Platform(e) => Some(e),
            Self::Screen(e) => Some(e),
            Self::CoreThreadPanicked => None,
        }
    }
}

impl From<PlatformError> for EngineError {
    fn from(e: PlatformError) -> Self {
        Self::Platform(e)
    }
}

impl From<ScreenError> for EngineError {
    fn from(e: ScreenError) -> Self {
        Self::Screen(e)
    }
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Window**: 800×600, titled "Screen Handoff"
/// - **Channel capacity**: 128 events
/// - **Content**: [`DirectoryContent`] rooted at `content/`
/// - **Sprite batch**: [`HeadlessBatch`] sized to the window
/// - **Deferred load**: none
///
/// # Examples
///
/// ```no_run
/// use screen_handoff::prelude::*;
///
/// EngineBuilder::new()
///     .with_window_size(1280, 720)
///     .with_deferred_load(|content| {
///         content.load_texture("level1")?;
///         Ok(())
///     })
///     .build()
///     .init(|manager| {
///         LoadingScreen::begin_transition(manager, true, None, Vec::new())?;
///         Ok(())
///     })?
///     .run()?;
/// # Ok::<(), EngineError>(())
/// ```
pub struct EngineBuilder {
    window: WindowConfig,
    channel_capacity: usize,
    content: Box<dyn ContentSource>,
    sprite_batch: Option<Box<dyn SpriteBatch>>,
    deferred_load: Option<DeferredLoad>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            window: WindowConfig {
                title: DEFAULT_TITLE.to_string(),
                width: DEFAULT_WIDTH,
                height: DEFAULT_HEIGHT,
            },
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            content: Box::new(DirectoryContent::new(DEFAULT_CONTENT_ROOT)),
            sprite_batch: None,
            deferred_load: None,
        }
    }

    /// Sets the window's inner size in logical pixels.
    ///
    /// Also sizes the default sprite batch's viewport.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        assert!(
            width > 0 && height > 0,
            "Window size must be positive, got {}x{}",
            width,
            height
        );
        self.window.width = width;
        self.window.height = height;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.window.title = title.into();
        self
    }

    /// Sets the channel capacity for platform → core communication.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Replaces the content source screens load from.
    pub fn with_content<C: ContentSource + 'static>(mut self, content: C) -> Self {
        self.content = Box::new(content);
        self
    }

    /// Replaces the drawing surface screens paint through.
    pub fn with_sprite_batch<B: SpriteBatch + 'static>(mut self, batch: B) -> Self {
        self.sprite_batch = Some(Box::new(batch));
        self
    }

    /// Registers the slow load a loading screen triggers once the stack
    /// has cleared.
    pub fn with_deferred_load<F>(mut self, load: F) -> Self
    where
        F: FnMut(&mut dyn ContentSource) -> Result<(), ScreenError> + Send + 'static,
    {
        self.deferred_load = Some(Box::new(load));
        self
    }

    /// Builds the engine instance.
    ///
    /// Call [`Engine::init`] to register screens before [`Engine::run`].
    pub fn build(self) -> Engine {
        info!(
            "Building engine (window: {}x{}, channel: {})",
            self.window.width, self.window.height, self.channel_capacity
        );

        let sprite_batch: Box<dyn SpriteBatch> = match self.sprite_batch {
            Some(batch) => batch,
            None => Box::new(HeadlessBatch::new(Viewport::new(
                self.window.width,
                self.window.height,
            ))),
        };

        let mut manager = ScreenManager::from_boxed(self.content, sprite_batch);
        if let Some(load) = self.deferred_load {
            manager.set_deferred_load(load);
        }

        Engine {
            manager,
            window: self.window,
            channel_capacity: self.channel_capacity,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Screen handoff runtime.
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread)
///   ├─► FrameLoop (Core Thread, one update + draw per frame)
///   │     └─► ScreenManager ─► Screens, LoadingScreen
///   │
///   └─► Platform (Event Loop)
///         └─► Window, RedrawRequested = frame boundary
///
/// Communication: bounded channel (PlatformEvent)
/// ```
pub struct Engine {
    manager: ScreenManager,
    window: WindowConfig,
    channel_capacity: usize,
}

impl Engine {
    //--- Initialization ---------------------------------------------------

    /// Gives the closure the screen manager to register the first screens.
    ///
    /// Content is not loaded yet; that happens when the core thread starts.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Screen`] if the closure fails.
    pub fn init<F>(mut self, init_fn: F) -> Result<Self, EngineError>
    where
        F: FnOnce(&mut ScreenManager) -> Result<(), ScreenError>,
    {
        info!("Initializing screens");

        init_fn(&mut self.manager)?;

        info!("Engine initialization complete ({} screens)", self.manager.screen_count());
        Ok(self)
    }

    //--- Execution --------------------------------------------------------

    /// Starts the runtime and blocks until the application exits.
    ///
    /// # Lifecycle
    ///
    /// 1. Creates the bounded channel for platform → core communication
    /// 2. Spawns the core thread driving the screen stack
    /// 3. Runs the platform event loop (blocks here)
    /// 4. On window close: platform exits → channel disconnects → core thread terminates
    ///
    /// # Errors
    ///
    /// A fatal screen error on the core thread takes precedence over a
    /// platform error, since the platform exits as a consequence of it.
    pub fn run(self) -> Result<(), EngineError> {
        info!("Starting engine runtime");

        //--- 1. Create communication channel -----------------------------
        let (tx, rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) =
            bounded(self.channel_capacity);

        info!("Channel created (capacity: {})", self.channel_capacity);

        //--- 2. Spawn the core thread -------------------------------------
        let core_handle = FrameLoop::new(self.manager).spawn_core_thread(rx);
        info!("Core thread spawned");

        //--- 3. Launch the platform subsystem -----------------------------
        let platform_result = Platform::new(tx, self.window).run();

        if let Err(e) = &platform_result {
            error!("Platform error: {}", e);
        }

        info!("Platform event loop exited");

        //--- 4. Cleanup: wait for the core thread to terminate ------------
        match core_handle.join() {
            Ok(Ok(())) => info!("Core thread terminated cleanly"),
            Ok(Err(e)) => return Err(EngineError::Screen(e)),
            Err(e) => {
                error!("Core thread panicked: {:?}", e);
                return Err(EngineError::CoreThreadPanicked);
            }
        }

        platform_result?;

        info!("Engine shutdown complete");
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
