// Knight tuning
//
// Jump strength and the grounded threshold changed several times while the
// feel was being iterated on. They are plain constants here so they can keep
// changing without touching the controller.

/// Who may start a jump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpPolicy {
    /// Any grounded state, standing still included
    #[allow(dead_code)]
    AnyGrounded,
    /// Only while walking left or right
    WhileMoving,
}

/// Movement and feel constants for the knight
#[derive(Debug, Clone)]
pub struct KnightStats {
    // Movement
    /// Horizontal walking speed (points/second)
    pub move_speed: f32,
    /// Per-tick velocity multiplier when no direction is held
    pub idle_damping: f32,
    /// Upward impulse applied once when a jump starts
    pub jump_impulse: f32,
    /// Who may jump
    pub jump_policy: JumpPolicy,

    // Ground detection
    /// |vertical velocity| below this counts as standing on something
    pub grounded_threshold: f32,

    // Dimensions
    /// Sprite and collider width (points)
    pub width: f32,
    /// Sprite and collider height (points)
    pub height: f32,
}

/// The knight as currently tuned
pub const BASE_STATS: KnightStats = KnightStats {
    move_speed: 200.0,
    idle_damping: 0.9,
    jump_impulse: 400.0,
    jump_policy: JumpPolicy::WhileMoving,

    grounded_threshold: 1.0,

    width: 100.0,
    height: 100.0,
};

impl Default for KnightStats {
    fn default() -> Self {
        BASE_STATS
    }
}

impl KnightStats {
    pub fn standard() -> Self {
        BASE_STATS
    }

    /// Vertical speed small enough to count as grounded
    pub fn is_grounded(&self, vertical_velocity: f32) -> bool {
        vertical_velocity.abs() < self.grounded_threshold
    }

    /// Moving down fast enough that the knight cannot be standing on anything
    pub fn is_falling(&self, vertical_velocity: f32) -> bool {
        vertical_velocity <= -self.grounded_threshold
    }

    /// Highest rise of a jump under `gravity` (points/second², magnitude)
    ///
    /// The body has unit mass, so the impulse is the take-off speed.
    pub fn jump_apex(&self, gravity: f32) -> f32 {
        if gravity <= 0.0 {
            return f32::INFINITY;
        }
        self.jump_impulse * self.jump_impulse / (2.0 * gravity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_stats() {
        let stats = KnightStats::default();
        assert_eq!(stats.move_speed, 200.0);
        assert_eq!(stats.jump_policy, JumpPolicy::WhileMoving);
        assert_eq!(stats.grounded_threshold, 1.0);
    }

    #[test]
    fn test_grounded_threshold() {
        let stats = KnightStats::standard();
        assert!(stats.is_grounded(0.0));
        assert!(stats.is_grounded(-0.99));
        assert!(!stats.is_grounded(1.0));
        assert!(!stats.is_grounded(-250.0));
    }

    #[test]
    fn test_falling_threshold() {
        let stats = KnightStats::standard();
        assert!(stats.is_falling(-1.0));
        assert!(!stats.is_falling(-0.5));
        assert!(!stats.is_falling(300.0));
    }

    #[test]
    fn test_jump_apex() {
        let stats = KnightStats::standard();
        // 9.8 m/s² at 150 points per metre
        let apex = stats.jump_apex(1470.0);
        assert_abs_diff_eq!(apex, 54.42, epsilon = 0.01);
        assert_eq!(stats.jump_apex(0.0), f32::INFINITY);
    }

    #[test]
    fn test_damping_decelerates() {
        let stats = KnightStats::standard();
        assert!(stats.idle_damping > 0.0 && stats.idle_damping < 1.0);
    }
}
