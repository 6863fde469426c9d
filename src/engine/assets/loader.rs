// Sprite-sheet lookup
//
// The core only ever needs a sheet's pixel dimensions. Decoding and uploading
// the texture belongs to whatever renderer draws the scene.

use super::AssetError;
#[cfg(test)]
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Directory (under the asset root) holding sprite sheets
const TEXTURE_DIRECTORY: &str = "textures";

/// Extensions tried, in order, when resolving a sheet name
const TEXTURE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Pixel dimensions of a sprite sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetSize {
    pub width: u32,
    pub height: u32,
}

impl SheetSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A sheet with no pixels in either direction cannot hold frames
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Anything that can report the dimensions of a named sheet
pub trait SheetSource {
    fn sheet_size(&self, name: &str) -> Result<SheetSize, AssetError>;
}

/// Looks sheets up on disk, reading only the image header
pub struct AssetLoader {
    base_path: PathBuf,
}

impl AssetLoader {
    /// Create a new asset loader with the given base path
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Find the file backing a sheet, trying each supported extension
    pub fn resolve_path(&self, name: &str) -> Option<PathBuf> {
        let dir = self.base_path.join(TEXTURE_DIRECTORY);
        TEXTURE_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{name}.{ext}")))
            .find(|path| path.is_file())
    }
}

impl SheetSource for AssetLoader {
    fn sheet_size(&self, name: &str) -> Result<SheetSize, AssetError> {
        let Some(path) = self.resolve_path(name) else {
            let expected = self.base_path.join(TEXTURE_DIRECTORY).join(name);
            return Err(AssetError::MissingAsset(
                expected.to_string_lossy().to_string(),
            ));
        };

        let (width, height) = image::image_dimensions(&path)?;
        log::info!("Sheet '{}' is {}x{} ({})", name, width, height, path.display());

        Ok(SheetSize::new(width, height))
    }
}

/// Sheet sizes known up front, no files involved
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct StaticSheets {
    sizes: HashMap<String, SheetSize>,
}

#[cfg(test)]
impl StaticSheets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sheet
    pub fn with_sheet(mut self, name: &str, width: u32, height: u32) -> Self {
        self.insert(name, SheetSize::new(width, height));
        self
    }

    pub fn insert(&mut self, name: &str, size: SheetSize) {
        self.sizes.insert(name.to_string(), size);
    }
}

#[cfg(test)]
impl SheetSource for StaticSheets {
    fn sheet_size(&self, name: &str) -> Result<SheetSize, AssetError> {
        self.sizes
            .get(name)
            .copied()
            .ok_or_else(|| AssetError::MissingAsset(name.to_string()))
    }
}
