//=========================================================================
// Content Loading
//=========================================================================
//
// Resolves named assets (fonts, textures) into render handles.
//
// Screens load what they need in `Screen::load_content`. Whether a
// missing asset is fatal is up to the screen: the loading indicator
// cannot work without its font, but can live without its background.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::render::{FontHandle, TextureHandle};

//=== ContentError ========================================================

/// Asset resolution failures.
#[derive(Debug)]
pub enum ContentError {
    /// No asset with this name exists.
    NotFound { name: String, path: PathBuf },

    /// The asset exists but could not be read.
    Io { name: String, source: std::io::Error },
}

impl std::fmt::Display for ContentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { name, path } => {
                write!(f, "Content '{}' not found at {}", name, path.display())
            }
            Self::Io { name, source } => write!(f, "Content '{}' could not be read: {}", name, source),
        }
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::NotFound { .. } => None,
        }
    }
}

//=== ContentSource =======================================================

/// Source of named assets shared by all screens.
pub trait ContentSource: Send {
    fn load_font(&mut self, name: &str) -> Result<FontHandle, ContentError>;

    fn load_texture(&mut self, name: &str) -> Result<TextureHandle, ContentError>;
}

//=== DirectoryContent ====================================================

/// Content source backed by files under a root directory.
///
/// Fonts resolve to `<root>/<name>.font`, textures to `<root>/<name>.png`.
/// Each asset is read once; later loads of the same name return the
/// cached handle.
#[derive(Debug)]
pub struct DirectoryContent {
    root: PathBuf,
    fonts: HashMap<String, FontHandle>,
    textures: HashMap<String, TextureHandle>,
    blobs: Vec<Vec<u8>>,
}

impl DirectoryContent {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fonts: HashMap::new(),
            textures: HashMap::new(),
            blobs: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Raw bytes of a loaded asset, for backends that upload them.
    pub fn bytes(&self, index: u32) -> Option<&[u8]> {
        self.blobs.get(index as usize).map(Vec::as_slice)
    }

    fn read(&mut self, name: &str, extension: &str) -> Result<u32, ContentError> {
        let path = self.root.join(format!("{}.{}", name, extension));

        let bytes = std::fs::read(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ContentError::NotFound { name: name.to_string(), path: path.clone() }
            } else {
                ContentError::Io { name: name.to_string(), source }
            }
        })?;

        debug!(target: "content", "Loaded {} ({} bytes)", path.display(), bytes.len());

        self.blobs.push(bytes);
        Ok((self.blobs.len() - 1) as u32)
    }
}

impl ContentSource for DirectoryContent {
    fn load_font(&mut self, name: &str) -> Result<FontHandle, ContentError> {
        if let Some(&handle) = self.fonts.get(name) {
            return Ok(handle);
        }

        let handle = FontHandle(self.read(name, "font")?);
        self.fonts.insert(name.to_string(), handle);
        Ok(handle)
    }

    fn load_texture(&mut self, name: &str) -> Result<TextureHandle, ContentError> {
        if let Some(&handle) = self.textures.get(name) {
            return Ok(handle);
        }

        let handle = TextureHandle(self.read(name, "png")?);
        self.textures.insert(name.to_string(), handle);
        Ok(handle)
    }
}

//=== MemoryContent =======================================================

/// Content source holding a fixed set of asset names.
///
/// Useful for headless runs and tests where no asset files exist.
#[derive(Debug, Default, Clone)]
pub struct MemoryContent {
    fonts: Vec<String>,
    textures: Vec<String>,
}

impl MemoryContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font(mut self, name: impl Into<String>) -> Self {
        self.fonts.push(name.into());
        self
    }

    pub fn with_texture(mut self, name: impl Into<String>) -> Self {
        self.textures.push(name.into());
        self
    }

    fn lookup(names: &[String], name: &str) -> Result<u32, ContentError> {
        names
            .iter()
            .position(|n| n == name)
            .map(|index| index as u32)
            .ok_or_else(|| ContentError::NotFound {
                name: name.to_string(),
                path: PathBuf::from(name),
            })
    }
}

impl ContentSource for MemoryContent {
    fn load_font(&mut self, name: &str) -> Result<FontHandle, ContentError> {
        Self::lookup(&self.fonts, name).map(FontHandle)
    }

    fn load_texture(&mut self, name: &str) -> Result<TextureHandle, ContentError> {
        Self::lookup(&self.textures, name).map(TextureHandle)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
