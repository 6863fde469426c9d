/// Game loop timing
///
/// Fixed-timestep simulation driven from the host's per-frame callback. The
/// caller passes the frame timestamp in, so the loop never reads the clock
/// itself and tests can feed it synthetic time.
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Target simulation rate (60 ticks per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667); // ~1/60 second

/// Maximum number of ticks per frame to prevent spiral of death
const MAX_TICKS_PER_FRAME: u32 = 5;

/// Frames averaged for the FPS readout
const FPS_WINDOW: usize = 60;

/// The FPS readout refreshes every this many frames
const FPS_REFRESH_FRAMES: u64 = 10;

/// Game loop timing state
pub struct GameLoop {
    /// Accumulated time not yet consumed by ticks
    accumulator: Duration,

    /// Timestamp of the previous frame (None until the first frame)
    last_frame: Option<Instant>,

    /// Whether the game is paused
    paused: bool,

    /// Most recent frame durations, oldest first
    recent_frames: VecDeque<Duration>,

    /// Frames seen
    frame_count: u64,

    /// Averaged frames per second
    fps: f32,
}

impl GameLoop {
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            last_frame: None,
            paused: false,
            recent_frames: VecDeque::with_capacity(FPS_WINDOW + 1),
            frame_count: 0,
            fps: 0.0,
        }
    }

    /// Begin a frame at `now`; returns how many fixed ticks to run
    ///
    /// The first frame only records the timestamp.
    pub fn begin_frame(&mut self, now: Instant) -> u32 {
        let Some(last) = self.last_frame.replace(now) else {
            return 0;
        };

        let frame_time = now.saturating_duration_since(last);
        self.frame_count += 1;

        self.recent_frames.push_back(frame_time);
        if self.recent_frames.len() > FPS_WINDOW {
            self.recent_frames.pop_front();
        }
        if self.frame_count % FPS_REFRESH_FRAMES == 0 {
            self.fps = average_fps(&self.recent_frames);
        }

        if self.paused {
            return 0;
        }

        self.accumulator += frame_time;

        let mut ticks = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && ticks < MAX_TICKS_PER_FRAME {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            ticks += 1;
        }

        // Drop whatever a long stall left behind instead of replaying it later
        if ticks == MAX_TICKS_PER_FRAME {
            self.accumulator = Duration::ZERO;
        }

        ticks
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Game paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent a burst of ticks
            self.accumulator = Duration::ZERO;
            log::info!("Game resumed");
        }
    }

    /// Flip between paused and running; returns the new paused state
    pub fn toggle_pause(&mut self) -> bool {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
        self.paused
    }
}

fn average_fps(frames: &VecDeque<Duration>) -> f32 {
    if frames.is_empty() {
        return 0.0;
    }
    let total: Duration = frames.iter().sum();
    let average = total.as_secs_f32() / frames.len() as f32;
    if average > 0.0 {
        average.recip()
    } else {
        0.0
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}
