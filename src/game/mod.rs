// Game layer: the knight and the level it runs around in

pub mod characters;
pub mod scene;

pub use scene::GameScene;
