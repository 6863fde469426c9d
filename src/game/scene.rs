// The one playable level
//
// Owns the physics world, the static geometry, the knight and the input
// manager. The host calls `update` once per fixed tick and draws whatever
// `nodes` returns.

use glam::{Vec2, Vec4};

use crate::engine::assets::{AssetError, NormalizedFrameRect, SheetSource};
use crate::engine::input::InputManager;
use crate::engine::physics::{presets, PhysicsWorld, RigidBodyHandle};

use super::characters::{
    AnimationPlayer, CharacterState, KnightAnimations, KnightController, KnightStats,
};

/// Dark gray backdrop
pub const BACKGROUND_COLOR: Vec4 = Vec4::new(0.25, 0.25, 0.25, 1.0);
pub const GROUND_COLOR: Vec4 = Vec4::new(0.0, 1.0, 0.0, 1.0);
pub const PLATFORM_COLOR: Vec4 = Vec4::new(0.45, 0.32, 0.2, 1.0);
pub const OBSTACLE_COLOR: Vec4 = Vec4::new(0.5, 0.5, 0.55, 1.0);
pub const CONTROL_COLOR: Vec4 = Vec4::new(1.0, 1.0, 1.0, 0.3);
pub const CONTROL_PRESSED_COLOR: Vec4 = Vec4::new(1.0, 1.0, 1.0, 0.6);

/// Centre height of the ground strip
pub const GROUND_Y: f32 = 100.0;
pub const GROUND_HEIGHT: f32 = 50.0;
const WALL_THICKNESS: f32 = 20.0;
const PLATFORM_SIZE: Vec2 = Vec2::new(160.0, 20.0);
const OBSTACLE_WIDTH: f32 = 80.0;

/// Each step up (obstacle, platforms) rises this share of the jump apex
const STEP_RISE: f32 = 0.6;

/// Below this the knight is put back at the spawn point
const FALL_LIMIT: f32 = -200.0;

// Z-order for layering (higher = drawn on top)
const BACKGROUND_Z: f32 = -10.0;
const GEOMETRY_Z: f32 = 0.0;
const KNIGHT_Z: f32 = 10.0;
const CONTROLS_Z: f32 = 100.0;

/// Kinds of static geometry in the level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    Ground,
    Floating,
    Obstacle,
    Wall,
}

impl PlatformKind {
    pub fn node_name(self) -> &'static str {
        match self {
            Self::Ground => "ground",
            Self::Floating => "platform",
            Self::Obstacle => "obstacle",
            Self::Wall => "wall",
        }
    }

    /// Walls stay invisible
    pub fn color(self) -> Option<Vec4> {
        match self {
            Self::Ground => Some(GROUND_COLOR),
            Self::Floating => Some(PLATFORM_COLOR),
            Self::Obstacle => Some(OBSTACLE_COLOR),
            Self::Wall => None,
        }
    }
}

/// A static box with a fixed physics body
#[derive(Debug, Clone)]
pub struct Platform {
    pub kind: PlatformKind,
    pub center: Vec2,
    pub size: Vec2,
    pub body: RigidBodyHandle,
}

/// What a node draws
#[derive(Debug, Clone, PartialEq)]
pub enum NodeContent {
    /// Flat-coloured rectangle (RGBA)
    Color(Vec4),
    /// One frame of a sprite sheet
    Sprite {
        sheet: &'static str,
        frame: NormalizedFrameRect,
        flip_horizontal: bool,
    },
}

/// One drawable item, in scene points with a bottom-left origin
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: &'static str,
    /// Centre position
    pub position: Vec2,
    pub size: Vec2,
    pub z_order: f32,
    pub content: NodeContent,
}

/// The knight's scene-side handles
struct Knight {
    body: RigidBodyHandle,
    controller: KnightController,
    animation: AnimationPlayer,
    size: Vec2,
    spawn: Vec2,
}

/// Level context: everything that lives for the duration of the scene
pub struct GameScene {
    size: Vec2,
    /// Height of one step in the level layout
    step_rise: f32,
    physics: PhysicsWorld,
    platforms: Vec<Platform>,
    animations: KnightAnimations,
    knight: Knight,
    input: InputManager,
}

impl GameScene {
    /// Build the level for a surface of `size` points
    ///
    /// Fails if any knight sheet is missing or its frame table does not fit.
    pub fn load(size: Vec2, sheets: &dyn SheetSource) -> Result<Self, AssetError> {
        log::info!("Loading scene ({}x{})", size.x, size.y);

        let animations = KnightAnimations::load(sheets)?;
        let mut physics = PhysicsWorld::new();
        let stats = KnightStats::standard();

        let step_rise = stats.jump_apex(physics.gravity().y.abs()) * STEP_RISE;
        let platforms = build_platforms(&mut physics, size, step_rise);

        let knight_size = Vec2::new(stats.width, stats.height);
        let spawn = size / 2.0;
        let body = physics.add_rigid_body(presets::knight_body(spawn));
        physics.add_collider(presets::knight_collider(knight_size), body);

        let controller = KnightController::new(stats, &animations);
        let animation = AnimationPlayer::new(controller.current_clip());

        log::info!(
            "Scene ready: {} platforms, step rise {:.1}, knight at ({}, {})",
            platforms.len(),
            step_rise,
            spawn.x,
            spawn.y
        );

        Ok(Self {
            size,
            step_rise,
            physics,
            platforms,
            animations,
            knight: Knight {
                body,
                controller,
                animation,
                size: knight_size,
                spawn,
            },
            input: InputManager::new(size),
        })
    }

    /// Advance one fixed tick
    pub fn update(&mut self, dt: f32) {
        let snapshot = self.input.take_snapshot();
        let velocity = self
            .physics
            .velocity(self.knight.body)
            .unwrap_or(Vec2::ZERO);

        let output = self.knight.controller.tick(snapshot, velocity, dt);
        if let Some(mut body) = self.physics.body_mut(self.knight.body) {
            output.apply_to(&mut body);
        }

        let cue = output.animation;
        if cue.restart {
            self.knight.animation.play_from_start(cue.clip);
        } else {
            self.knight.animation.play(cue.clip);
        }
        self.knight.animation.set_flip_horizontal(cue.flip_horizontal);
        self.knight.animation.update(dt);

        if self.physics.timestep() != dt {
            self.physics.set_timestep(dt);
        }
        self.physics.step();

        if let Some(position) = self.physics.translation(self.knight.body) {
            if position.y < FALL_LIMIT {
                self.respawn();
            }
        }
    }

    /// Put the knight back at the spawn point, standing still
    pub fn respawn(&mut self) {
        log::info!("Respawning knight");
        self.physics
            .set_translation(self.knight.body, self.knight.spawn);
        self.knight.controller.reset();
        self.knight
            .animation
            .play(self.knight.controller.current_clip());
    }

    /// Everything to draw this frame
    pub fn nodes(&self) -> Vec<SceneNode> {
        let mut nodes = Vec::with_capacity(self.platforms.len() + 5);

        nodes.push(SceneNode {
            name: "background",
            position: self.size / 2.0,
            size: self.size,
            z_order: BACKGROUND_Z,
            content: NodeContent::Color(BACKGROUND_COLOR),
        });

        nodes.extend(self.platforms.iter().filter_map(|platform| {
            platform.kind.color().map(|color| SceneNode {
                name: platform.kind.node_name(),
                position: platform.center,
                size: platform.size,
                z_order: GEOMETRY_Z,
                content: NodeContent::Color(color),
            })
        }));

        if let Some(node) = self.knight_node() {
            nodes.push(node);
        }

        nodes.extend(self.input.layout().regions().iter().map(|region| {
            let color = if self.input.is_held(region.button) {
                CONTROL_PRESSED_COLOR
            } else {
                CONTROL_COLOR
            };
            SceneNode {
                name: region.button.node_name(),
                position: region.center,
                size: region.size,
                z_order: CONTROLS_Z,
                content: NodeContent::Color(color),
            }
        }));

        nodes
    }

    fn knight_node(&self) -> Option<SceneNode> {
        let position = self.physics.translation(self.knight.body)?;
        let player = &self.knight.animation;
        let kind = player.clip().kind;
        let frame = self.animations.frame(kind, player.current_frame())?;

        Some(SceneNode {
            name: "knight",
            position,
            size: self.knight.size,
            z_order: KNIGHT_Z,
            content: NodeContent::Sprite {
                sheet: kind.asset_name(),
                frame,
                flip_horizontal: player.is_flipped_horizontal(),
            },
        })
    }

    /// The surface changed size
    ///
    /// The static geometry is rebuilt for the new size and the spawn point
    /// moves to the new centre. A knight left outside the new bounds is
    /// respawned.
    pub fn resize(&mut self, size: Vec2) {
        log::info!("Scene resized to {}x{}", size.x, size.y);
        self.size = size;

        for platform in self.platforms.drain(..) {
            self.physics.remove_rigid_body(platform.body);
        }
        self.platforms = build_platforms(&mut self.physics, size, self.step_rise);
        self.knight.spawn = size / 2.0;
        self.input.resize(size);

        let outside = self
            .physics
            .translation(self.knight.body)
            .is_some_and(|position| position.x < 0.0 || position.x > size.x);
        if outside {
            self.respawn();
        }
    }

    pub fn input_mut(&mut self) -> &mut InputManager {
        &mut self.input
    }

    pub fn knight_state(&self) -> CharacterState {
        self.knight.controller.state()
    }
}

fn build_platforms(physics: &mut PhysicsWorld, size: Vec2, step_rise: f32) -> Vec<Platform> {
    level_layout(size, step_rise)
        .into_iter()
        .map(|(kind, center, extent)| {
            let body = physics.add_rigid_body(presets::platform_body(center));
            physics.add_collider(presets::platform_collider(extent), body);
            Platform {
                kind,
                center,
                size: extent,
                body,
            }
        })
        .collect()
}

/// Static geometry for a surface of `size`: (kind, centre, size)
///
/// Left of the spawn point two platforms form a staircase, each top
/// `step_rise` above the one below. Right of it a box of the same height
/// blocks the way.
fn level_layout(size: Vec2, step_rise: f32) -> Vec<(PlatformKind, Vec2, Vec2)> {
    let ground_top = GROUND_Y + GROUND_HEIGHT / 2.0;
    let lower = Vec2::new(
        size.x * 0.3,
        ground_top + step_rise - PLATFORM_SIZE.y / 2.0,
    );
    let upper = lower + Vec2::new(-PLATFORM_SIZE.x, step_rise);
    let obstacle = Vec2::new(OBSTACLE_WIDTH, step_rise);

    vec![
        (
            PlatformKind::Ground,
            Vec2::new(size.x / 2.0, GROUND_Y),
            Vec2::new(size.x, GROUND_HEIGHT),
        ),
        (PlatformKind::Floating, lower, PLATFORM_SIZE),
        (PlatformKind::Floating, upper, PLATFORM_SIZE),
        (
            PlatformKind::Obstacle,
            Vec2::new(size.x * 0.85, ground_top + obstacle.y / 2.0),
            obstacle,
        ),
        (
            PlatformKind::Wall,
            Vec2::new(-WALL_THICKNESS / 2.0, size.y / 2.0),
            Vec2::new(WALL_THICKNESS, size.y * 2.0),
        ),
        (
            PlatformKind::Wall,
            Vec2::new(size.x + WALL_THICKNESS / 2.0, size.y / 2.0),
            Vec2::new(WALL_THICKNESS, size.y * 2.0),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::StaticSheets;
    use crate::engine::game_loop::FIXED_TIMESTEP;
    use crate::engine::input::Button;
    use approx::assert_abs_diff_eq;
    use winit::keyboard::KeyCode;

    const SCREEN: Vec2 = Vec2::new(1280.0, 720.0);

    /// Centre height of the knight standing on the ground
    const STANDING_Y: f32 = GROUND_Y + GROUND_HEIGHT / 2.0 + 50.0;

    fn sheets() -> StaticSheets {
        StaticSheets::new()
            .with_sheet("Idle", 480, 120)
            .with_sheet("Walk", 960, 120)
            .with_sheet("Jump", 720, 120)
    }

    fn scene() -> GameScene {
        GameScene::load(SCREEN, &sheets()).unwrap()
    }

    fn run(scene: &mut GameScene, ticks: usize) {
        for _ in 0..ticks {
            scene.update(FIXED_TIMESTEP);
        }
    }

    /// Tap jump for a single tick
    fn tap_jump(scene: &mut GameScene) {
        scene.input_mut().key(KeyCode::Space, true, false);
        run(scene, 1);
        scene.input_mut().key(KeyCode::Space, false, false);
    }

    fn position(scene: &GameScene) -> Vec2 {
        scene.physics.translation(scene.knight.body).unwrap()
    }

    fn velocity(scene: &GameScene) -> Vec2 {
        scene.physics.velocity(scene.knight.body).unwrap()
    }

    fn node<'a>(nodes: &'a [SceneNode], name: &str) -> &'a SceneNode {
        nodes.iter().find(|node| node.name == name).unwrap()
    }

    fn platforms(scene: &GameScene, kind: PlatformKind) -> Vec<&Platform> {
        scene
            .platforms
            .iter()
            .filter(|platform| platform.kind == kind)
            .collect()
    }

    fn top(platform: &Platform) -> f32 {
        platform.center.y + platform.size.y / 2.0
    }

    #[test]
    fn test_load_requires_every_sheet() {
        let sheets = StaticSheets::new().with_sheet("Idle", 480, 120);
        let err = GameScene::load(SCREEN, &sheets).err().unwrap();
        assert!(matches!(err, AssetError::MissingAsset(_)));
    }

    #[test]
    fn test_initial_nodes() {
        let scene = scene();
        let nodes = scene.nodes();

        let background = node(&nodes, "background");
        assert_eq!(background.size, SCREEN);
        assert_eq!(background.content, NodeContent::Color(BACKGROUND_COLOR));

        let ground = node(&nodes, "ground");
        assert_eq!(ground.position, Vec2::new(640.0, 100.0));
        assert_eq!(ground.size, Vec2::new(1280.0, 50.0));

        let knight = node(&nodes, "knight");
        assert_eq!(knight.size, Vec2::new(100.0, 100.0));
        assert_abs_diff_eq!(knight.position.x, 640.0, epsilon = 1e-3);
        assert_abs_diff_eq!(knight.position.y, 360.0, epsilon = 1e-3);
        assert!(matches!(
            knight.content,
            NodeContent::Sprite { sheet: "Idle", .. }
        ));

        for button in Button::ALL {
            let control = node(&nodes, button.node_name());
            assert_eq!(control.content, NodeContent::Color(CONTROL_COLOR));
        }
        // Walls are not drawn
        assert!(nodes.iter().all(|node| node.name != "wall"));
    }

    #[test]
    fn test_held_control_is_highlighted() {
        let mut scene = scene();
        scene.input_mut().key(KeyCode::ArrowRight, true, false);

        let nodes = scene.nodes();
        assert_eq!(
            node(&nodes, Button::Right.node_name()).content,
            NodeContent::Color(CONTROL_PRESSED_COLOR)
        );
        assert_eq!(
            node(&nodes, Button::Left.node_name()).content,
            NodeContent::Color(CONTROL_COLOR)
        );

        scene.input_mut().key(KeyCode::ArrowRight, false, false);
        assert_eq!(
            node(&scene.nodes(), Button::Right.node_name()).content,
            NodeContent::Color(CONTROL_COLOR)
        );
    }

    #[test]
    fn test_steps_fit_under_jump_apex() {
        let scene = scene();
        let apex = KnightStats::standard().jump_apex(scene.physics.gravity().y.abs());
        let ground_top = GROUND_Y + GROUND_HEIGHT / 2.0;

        let obstacle = platforms(&scene, PlatformKind::Obstacle)[0];
        assert!(top(obstacle) - ground_top < apex);

        let floating = platforms(&scene, PlatformKind::Floating);
        assert_eq!(floating.len(), 2);
        assert!(top(floating[0]) - ground_top < apex);
        assert!(top(floating[1]) - top(floating[0]) < apex);
    }

    #[test]
    fn test_knight_lands_on_ground() {
        let mut scene = scene();
        run(&mut scene, 180);

        assert_abs_diff_eq!(position(&scene).y, STANDING_Y, epsilon = 2.0);
        assert_eq!(scene.knight_state(), CharacterState::Idle);
    }

    #[test]
    fn test_walk_right() {
        let mut scene = scene();
        run(&mut scene, 180);
        let start = position(&scene);

        scene.input_mut().key(KeyCode::ArrowRight, true, false);
        run(&mut scene, 30);

        assert_eq!(scene.knight_state(), CharacterState::WalkingRight);
        assert!(position(&scene).x > start.x + 50.0);
        assert_abs_diff_eq!(velocity(&scene).x, 200.0, epsilon = 1.0);

        let nodes = scene.nodes();
        assert!(matches!(
            node(&nodes, "knight").content,
            NodeContent::Sprite { sheet: "Walk", flip_horizontal: false, .. }
        ));
    }

    #[test]
    fn test_release_decelerates() {
        let mut scene = scene();
        run(&mut scene, 180);

        scene.input_mut().key(KeyCode::ArrowLeft, true, false);
        run(&mut scene, 20);
        scene.input_mut().key(KeyCode::ArrowLeft, false, false);
        run(&mut scene, 1);

        assert_eq!(scene.knight_state(), CharacterState::Idle);
        let vx = velocity(&scene).x;
        assert!(vx < 0.0 && vx > -200.0, "expected damped speed, got {vx}");

        let nodes = scene.nodes();
        assert!(matches!(
            node(&nodes, "knight").content,
            NodeContent::Sprite { sheet: "Idle", flip_horizontal: true, .. }
        ));
    }

    #[test]
    fn test_jump_while_walking() {
        let mut scene = scene();
        run(&mut scene, 180);

        scene.input_mut().key(KeyCode::ArrowRight, true, false);
        run(&mut scene, 5);
        tap_jump(&mut scene);

        assert_eq!(scene.knight_state(), CharacterState::Jumping);
        assert!(velocity(&scene).y > 0.0);

        run(&mut scene, 60);
        assert_eq!(scene.knight_state(), CharacterState::WalkingRight);
    }

    #[test]
    fn test_standing_jump_ignored() {
        let mut scene = scene();
        run(&mut scene, 180);

        tap_jump(&mut scene);

        assert_eq!(scene.knight_state(), CharacterState::Idle);
        assert!(velocity(&scene).y.abs() < 1.0);
    }

    #[test]
    fn test_obstacle_blocks_then_jump_clears_it() {
        let mut scene = scene();
        let obstacle = platforms(&scene, PlatformKind::Obstacle)[0].clone();
        let near_side = obstacle.center.x - obstacle.size.x / 2.0;
        let far_side = obstacle.center.x + obstacle.size.x / 2.0;

        scene.input_mut().key(KeyCode::ArrowRight, true, false);
        run(&mut scene, 240);

        // Pressed against the obstacle, still walking on the ground
        assert_abs_diff_eq!(position(&scene).x, near_side - 50.0, epsilon = 2.0);
        assert_abs_diff_eq!(position(&scene).y, STANDING_Y, epsilon = 2.0);
        assert_eq!(scene.knight_state(), CharacterState::WalkingRight);

        tap_jump(&mut scene);
        run(&mut scene, 120);

        // Over the top, off the far side and back on the ground
        assert!(position(&scene).x > far_side + 50.0);
        assert_abs_diff_eq!(position(&scene).y, STANDING_Y, epsilon = 2.0);
    }

    #[test]
    fn test_knight_climbs_platform_staircase() {
        let mut scene = scene();
        let floating = platforms(&scene, PlatformKind::Floating);
        let (lower, upper) = (floating[0].clone(), floating[1].clone());

        scene.input_mut().key(KeyCode::ArrowLeft, true, false);
        run(&mut scene, 120);

        // Stopped by the side of the lower platform
        let lower_side = lower.center.x + lower.size.x / 2.0;
        assert_abs_diff_eq!(position(&scene).x, lower_side + 50.0, epsilon = 2.0);

        tap_jump(&mut scene);
        run(&mut scene, 90);

        // Standing on the lower platform, pressed against the upper one
        let upper_side = upper.center.x + upper.size.x / 2.0;
        assert_abs_diff_eq!(position(&scene).y, top(&lower) + 50.0, epsilon = 2.0);
        assert_abs_diff_eq!(position(&scene).x, upper_side + 50.0, epsilon = 2.0);
        assert!(velocity(&scene).y.abs() < 1.0);

        tap_jump(&mut scene);
        run(&mut scene, 40);

        assert_abs_diff_eq!(position(&scene).y, top(&upper) + 50.0, epsilon = 2.0);
    }

    #[test]
    fn test_respawn_after_fall() {
        let mut scene = scene();
        let body = scene.knight.body;
        scene
            .physics
            .set_translation(body, Vec2::new(640.0, FALL_LIMIT - 100.0));

        run(&mut scene, 1);

        assert_abs_diff_eq!(position(&scene).y, 360.0, epsilon = 1e-3);
        assert_eq!(scene.knight_state(), CharacterState::Idle);
    }

    #[test]
    fn test_resize_rebuilds_level() {
        let mut scene = scene();
        let before = scene.input.layout().region(Button::Jump).unwrap().center;
        let old_bodies: Vec<_> = scene.platforms.iter().map(|platform| platform.body).collect();

        scene.resize(Vec2::new(1920.0, 1080.0));

        let after = scene.input.layout().region(Button::Jump).unwrap().center;
        assert!(after.x > before.x);

        let nodes = scene.nodes();
        assert_eq!(node(&nodes, "background").size, Vec2::new(1920.0, 1080.0));
        assert_eq!(node(&nodes, "ground").size, Vec2::new(1920.0, GROUND_HEIGHT));
        assert_eq!(node(&nodes, "ground").position.x, 960.0);

        let walls = platforms(&scene, PlatformKind::Wall);
        assert_eq!(walls[1].center.x, 1920.0 + WALL_THICKNESS / 2.0);
        assert_eq!(walls[1].size.y, 2160.0);

        // The old geometry is gone from the physics world
        for body in old_bodies {
            assert!(scene.physics.translation(body).is_none());
        }
        assert_eq!(scene.platforms.len(), 6);
    }

    #[test]
    fn test_resize_keeps_knight_on_new_ground() {
        let mut scene = scene();
        scene.input_mut().key(KeyCode::ArrowRight, true, false);
        run(&mut scene, 240);
        scene.input_mut().key(KeyCode::ArrowRight, false, false);

        // Shrinking past the knight puts it back at the new centre
        scene.resize(Vec2::new(800.0, 600.0));
        assert_abs_diff_eq!(position(&scene).x, 400.0, epsilon = 1e-3);
        assert_abs_diff_eq!(position(&scene).y, 300.0, epsilon = 1e-3);

        run(&mut scene, 180);
        assert_abs_diff_eq!(position(&scene).y, STANDING_Y, epsilon = 2.0);
    }
}
