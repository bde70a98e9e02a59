//=========================================================================
// Screen Errors
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::content::ContentError;

//=== ScreenError =========================================================

/// Failures raised while loading or running screens.
///
/// These are fatal to the frame loop: a screen that cannot load its
/// required content cannot be shown.
#[derive(Debug)]
pub enum ScreenError {
    /// A screen could not load content it requires.
    Content(ContentError),

    /// The deferred load hook failed.
    DeferredLoad(String),
}

impl std::fmt::Display for ScreenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Content(e) => write!(f, "Screen content failed to load: {}", e),
            Self::DeferredLoad(reason) => write!(f, "Deferred load failed: {}", reason),
        }
    }
}

impl std::error::Error for ScreenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Content(e) => Some(e),
            Self::DeferredLoad(_) => None,
        }
    }
}

impl From<ContentError> for ScreenError {
    fn from(e: ContentError) -> Self {
        Self::Content(e)
    }
}
