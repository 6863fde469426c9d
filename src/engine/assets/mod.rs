// Asset handling
//
// Sprite sheets are owned by the host engine; this module slices them into
// animation frames and reports when they are missing or inconsistent.

mod atlas;
mod loader;

#[allow(unused_imports)]
pub use atlas::{
    frame_rect, slice_frames, FrameSpec, FrameSpecError, NormalizedFrameRect, SlicedSheet,
};
#[allow(unused_imports)]
pub use loader::{AssetLoader, SheetSize, SheetSource};
#[cfg(test)]
pub use loader::StaticSheets;

/// Asset loading errors
///
/// Both kinds are fatal at load time: a level never starts with a missing or
/// mis-sliced animation.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Invalid frame spec for '{name}': {source}")]
    InvalidFrameSpec {
        name: String,
        #[source]
        source: FrameSpecError,
    },

    #[error("Missing asset: {0}")]
    MissingAsset(String),

    #[error("Failed to read sprite sheet: {0}")]
    Image(#[from] image::ImageError),
}
