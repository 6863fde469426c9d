// Knight animations: frame tables, sliced sheets and playback

use crate::engine::assets::{
    AssetError, FrameSpec, NormalizedFrameRect, SheetSource, SlicedSheet,
};

/// Seconds per idle frame
pub const IDLE_FRAME_DURATION: f32 = 0.25;
/// Seconds per walk frame
pub const WALK_FRAME_DURATION: f32 = 0.07;
/// Seconds per jump frame
pub const JUMP_FRAME_DURATION: f32 = 0.08;

/// Idle sheet: 4 columns of 120 pixels
pub const IDLE_FRAMES: &[FrameSpec] = &[
    FrameSpec::new(38.0, 44.0),
    FrameSpec::new(36.0, 46.0),
    FrameSpec::new(34.0, 48.0),
    FrameSpec::new(36.0, 46.0),
];

/// Walk sheet: 8 columns of 120 pixels
pub const WALK_FRAMES: &[FrameSpec] = &[
    FrameSpec::new(31.0, 56.0),
    FrameSpec::new(33.0, 54.0),
    FrameSpec::new(36.0, 50.0),
    FrameSpec::new(34.0, 52.0),
    FrameSpec::new(30.0, 58.0),
    FrameSpec::new(32.0, 56.0),
    FrameSpec::new(35.0, 51.0),
    FrameSpec::new(33.0, 53.0),
];

/// Jump sheet: 6 columns of 120 pixels
pub const JUMP_FRAMES: &[FrameSpec] = &[
    FrameSpec::new(36.0, 48.0),
    FrameSpec::new(34.0, 52.0),
    FrameSpec::new(30.0, 60.0),
    FrameSpec::new(28.0, 64.0),
    FrameSpec::new(32.0, 56.0),
    FrameSpec::new(35.0, 50.0),
];

/// The knight's animations, one sprite sheet each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    Idle,
    Walk,
    Jump,
}

impl AnimationKind {
    pub const ALL: [AnimationKind; 3] = [
        AnimationKind::Idle,
        AnimationKind::Walk,
        AnimationKind::Jump,
    ];

    /// Name of the sprite sheet asset
    pub fn asset_name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Walk => "Walk",
            Self::Jump => "Jump",
        }
    }

    /// Per-frame padding/width table for the sheet
    pub fn frame_table(self) -> &'static [FrameSpec] {
        match self {
            Self::Idle => IDLE_FRAMES,
            Self::Walk => WALK_FRAMES,
            Self::Jump => JUMP_FRAMES,
        }
    }

    pub fn frame_duration(self) -> f32 {
        match self {
            Self::Idle => IDLE_FRAME_DURATION,
            Self::Walk => WALK_FRAME_DURATION,
            Self::Jump => JUMP_FRAME_DURATION,
        }
    }

    /// Idle and walk cycle forever, a jump plays once
    pub fn looping(self) -> bool {
        !matches!(self, Self::Jump)
    }
}

/// Timing of one animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationClip {
    pub kind: AnimationKind,
    /// Number of frames in the animation
    pub frame_count: usize,
    /// Duration of each frame in seconds
    pub frame_duration: f32,
    /// Whether the animation loops
    pub looping: bool,
}

impl AnimationClip {
    pub fn new(kind: AnimationKind, frame_count: usize) -> Self {
        Self {
            kind,
            frame_count,
            frame_duration: kind.frame_duration(),
            looping: kind.looping(),
        }
    }

    /// Get the total duration of one animation cycle
    pub fn total_duration(&self) -> f32 {
        self.frame_count as f32 * self.frame_duration
    }
}

/// Every knight sheet, sliced once at scene load
#[derive(Debug, Clone)]
pub struct KnightAnimations {
    idle: SlicedSheet,
    walk: SlicedSheet,
    jump: SlicedSheet,
}

impl KnightAnimations {
    /// Look up and slice all three sheets; any failure aborts the load
    pub fn load(source: &dyn SheetSource) -> Result<Self, AssetError> {
        let slice = |kind: AnimationKind| -> Result<SlicedSheet, AssetError> {
            let name = kind.asset_name();
            let size = source.sheet_size(name)?;
            SlicedSheet::slice(name, size, kind.frame_table())
        };

        Ok(Self {
            idle: slice(AnimationKind::Idle)?,
            walk: slice(AnimationKind::Walk)?,
            jump: slice(AnimationKind::Jump)?,
        })
    }

    pub fn sheet(&self, kind: AnimationKind) -> &SlicedSheet {
        match kind {
            AnimationKind::Idle => &self.idle,
            AnimationKind::Walk => &self.walk,
            AnimationKind::Jump => &self.jump,
        }
    }

    pub fn clip(&self, kind: AnimationKind) -> AnimationClip {
        AnimationClip::new(kind, self.sheet(kind).frame_count())
    }

    /// Frame rect for the renderer
    pub fn frame(&self, kind: AnimationKind, index: usize) -> Option<NormalizedFrameRect> {
        self.sheet(kind).frame(index).copied()
    }
}

/// Playback cursor over the active clip
#[derive(Debug)]
pub struct AnimationPlayer {
    clip: AnimationClip,
    /// Current frame index
    current_frame: usize,
    /// Time elapsed in current frame
    frame_timer: f32,
    /// Cleared when a one-shot clip reaches its last frame
    playing: bool,
    /// Mirror the sprite horizontally
    flip_horizontal: bool,
}

impl AnimationPlayer {
    pub fn new(clip: AnimationClip) -> Self {
        Self {
            clip,
            current_frame: 0,
            frame_timer: 0.0,
            playing: true,
            flip_horizontal: false,
        }
    }

    /// Switch clips; playing the clip that is already running does nothing
    pub fn play(&mut self, clip: AnimationClip) {
        if self.clip.kind != clip.kind {
            self.play_from_start(clip);
        }
    }

    /// Play a clip from its first frame, even if it is already running
    pub fn play_from_start(&mut self, clip: AnimationClip) {
        self.clip = clip;
        self.current_frame = 0;
        self.frame_timer = 0.0;
        self.playing = true;
    }

    pub fn set_flip_horizontal(&mut self, flip: bool) {
        self.flip_horizontal = flip;
    }

    pub fn is_flipped_horizontal(&self) -> bool {
        self.flip_horizontal
    }

    /// Advance by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        if !self.playing || self.clip.frame_count == 0 {
            return;
        }

        self.frame_timer += dt;

        while self.frame_timer >= self.clip.frame_duration {
            self.frame_timer -= self.clip.frame_duration;
            self.current_frame += 1;

            if self.current_frame >= self.clip.frame_count {
                if self.clip.looping {
                    self.current_frame = 0;
                } else {
                    // Stay on last frame
                    self.current_frame = self.clip.frame_count - 1;
                    self.playing = false;
                    break;
                }
            }
        }
    }

    pub fn clip(&self) -> AnimationClip {
        self.clip
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }
}
