// Engine modules: assets, input, physics, game loop

pub mod assets;
pub mod game_loop;
pub mod input;
pub mod physics;
