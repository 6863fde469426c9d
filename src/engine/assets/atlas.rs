// Sprite-sheet frame slicing
//
// Hand-drawn sheets are split into equal-width columns, but the art inside each
// column is not centred. Every frame therefore carries its own left padding and
// width, measured in sheet pixels.


use super::loader::SheetSize;
use super::AssetError;

/// Slack allowed when checking that a frame stays inside the sheet
const EDGE_EPSILON: f32 = 1e-6;

/// Horizontal extent of one frame inside its column (pixels)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSpec {
    /// Transparent pixels between the column's left edge and the art
    pub left_padding: f32,
    /// Width of the art
    pub width: f32,
}

impl FrameSpec {
    pub const fn new(left_padding: f32, width: f32) -> Self {
        Self {
            left_padding,
            width,
        }
    }
}

/// A frame's sub-rectangle of the sheet, every component in [0, 1]
///
/// Sheets are a single row, so `y` is always 0 and `height` always 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedFrameRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl NormalizedFrameRect {
    /// Right edge of the frame
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Ways a frame table can disagree with its sheet
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FrameSpecError {
    #[error("frame count must be positive")]
    NoFrames,

    #[error("sheet width must be positive, got {0}")]
    InvalidSheetWidth(f32),

    #[error("expected {expected} frame bounds, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("frame {index} has non-positive width {width}")]
    InvalidFrameWidth { index: usize, width: f32 },

    #[error("frame {index} has invalid left padding {padding}")]
    NegativePadding { index: usize, padding: f32 },

    #[error("frame {index} spans {x}..{right}, outside the sheet")]
    OutOfBounds { index: usize, x: f32, right: f32 },
}

/// Raw geometry of frame `index`, without any validation
pub fn frame_rect(
    sheet_width: f32,
    frame_count: usize,
    index: usize,
    spec: FrameSpec,
) -> NormalizedFrameRect {
    let column_width = sheet_width / frame_count as f32;

    NormalizedFrameRect {
        x: (index as f32 * column_width + spec.left_padding) / sheet_width,
        y: 0.0,
        width: spec.width / sheet_width,
        height: 1.0,
    }
}

/// Slice a single-row sheet into normalized frame rects
///
/// Fails rather than clamps: a clamped rect would show a visibly wrong frame.
pub fn slice_frames(
    sheet_width: f32,
    frame_count: usize,
    bounds: &[FrameSpec],
) -> Result<Vec<NormalizedFrameRect>, FrameSpecError> {
    if frame_count == 0 {
        return Err(FrameSpecError::NoFrames);
    }
    if !sheet_width.is_finite() || sheet_width <= 0.0 {
        return Err(FrameSpecError::InvalidSheetWidth(sheet_width));
    }
    if bounds.len() != frame_count {
        return Err(FrameSpecError::CountMismatch {
            expected: frame_count,
            actual: bounds.len(),
        });
    }

    bounds
        .iter()
        .enumerate()
        .map(|(index, spec)| {
            if !spec.width.is_finite() || spec.width <= 0.0 {
                return Err(FrameSpecError::InvalidFrameWidth {
                    index,
                    width: spec.width,
                });
            }
            if !spec.left_padding.is_finite() || spec.left_padding < 0.0 {
                return Err(FrameSpecError::NegativePadding {
                    index,
                    padding: spec.left_padding,
                });
            }

            let rect = frame_rect(sheet_width, frame_count, index, *spec);
            if rect.x < 0.0 || rect.right() > 1.0 + EDGE_EPSILON {
                return Err(FrameSpecError::OutOfBounds {
                    index,
                    x: rect.x,
                    right: rect.right(),
                });
            }

            Ok(rect)
        })
        .collect()
}

/// One sheet sliced into frames, computed once and kept for the session
#[derive(Debug, Clone)]
pub struct SlicedSheet {
    frames: Vec<NormalizedFrameRect>,
}

impl SlicedSheet {
    /// Slice `name` using its frame table
    ///
    /// An empty table or an empty sheet is a missing asset; a table that does
    /// not fit the sheet is an invalid frame spec.
    pub fn slice(name: &str, size: SheetSize, bounds: &[FrameSpec]) -> Result<Self, AssetError> {
        if bounds.is_empty() {
            return Err(AssetError::MissingAsset(format!("{name} (no frames)")));
        }
        if size.is_empty() {
            return Err(AssetError::MissingAsset(format!("{name} (empty sheet)")));
        }

        let frames = slice_frames(size.width as f32, bounds.len(), bounds).map_err(|source| {
            AssetError::InvalidFrameSpec {
                name: name.to_string(),
                source,
            }
        })?;

        log::debug!("Sliced '{}' into {} frames", name, frames.len());

        Ok(Self { frames })
    }

    /// Get a frame by index
    pub fn frame(&self, index: usize) -> Option<&NormalizedFrameRect> {
        self.frames.get(index)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}
