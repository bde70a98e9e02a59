//=========================================================================
// Screen Test Support
//=========================================================================
//
// Shared fixtures for screen unit tests.
//
//=========================================================================

use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{Screen, ScreenCore, ScreenError, ScreenManager};
use crate::core::content::{ContentSource, MemoryContent};
use crate::core::render::{HeadlessBatch, Viewport};
use crate::core::time::GameTime;

/// Manager with empty content and a headless 800x600 batch.
pub(crate) fn manager() -> ScreenManager {
    ScreenManager::new(MemoryContent::new(), HeadlessBatch::new(Viewport::new(800, 600)))
}

pub(crate) fn frame(ms: u64) -> GameTime {
    GameTime::from_elapsed(Duration::from_millis(ms))
}

/// Ordered record of lifecycle calls across screens.
pub(crate) type Journal = Arc<Mutex<Vec<String>>>;

pub(crate) fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub(crate) fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

/// Screen with default behavior that optionally journals its calls.
pub(crate) struct PlainScreen {
    core: ScreenCore,
    label: &'static str,
    journal: Option<Journal>,
}

impl PlainScreen {
    pub(crate) fn boxed(core: ScreenCore) -> Box<dyn Screen> {
        Box::new(Self { core, label: "plain", journal: None })
    }

    pub(crate) fn journaled(core: ScreenCore, label: &'static str, journal: &Journal) -> Box<dyn Screen> {
        Box::new(Self { core, label, journal: Some(journal.clone()) })
    }

    fn note(&self, event: &str) {
        if let Some(journal) = &self.journal {
            journal.lock().unwrap().push(format!("{}:{}", event, self.label));
        }
    }
}

impl Screen for PlainScreen {
    fn core(&self) -> &ScreenCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ScreenCore {
        &mut self.core
    }

    fn name(&self) -> &str {
        self.label
    }

    fn load_content(&mut self, _content: &mut dyn ContentSource) -> Result<(), ScreenError> {
        self.note("load");
        Ok(())
    }

    fn unload_content(&mut self) {
        self.note("unload");
    }

    fn update(
        &mut self,
        manager: &mut ScreenManager,
        time: &GameTime,
        _other_screen_has_focus: bool,
        covered_by_other_screen: bool,
    ) -> Result<(), ScreenError> {
        self.note("update");
        self.core.update(manager, time, covered_by_other_screen);
        Ok(())
    }

    fn draw(&mut self, _manager: &mut ScreenManager, _time: &GameTime) {
        self.note("draw");
    }
}
