use std::time::Instant;

use anyhow::{Context, Result};
use glam::Vec2;
use log::info;
use winit::{
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, Event, WindowEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

mod engine;
mod game;

use engine::assets::AssetLoader;
use engine::game_loop::{GameLoop, FIXED_TIMESTEP};
use game::GameScene;

const WINDOW_TITLE: &str = "Knight Rogue";

/// Overrides the asset directory
const ASSETS_ENV: &str = "KNIGHT_ROGUE_ASSETS";
const DEFAULT_ASSETS: &str = "assets";

/// Frames between window title refreshes
const TITLE_REFRESH_FRAMES: u64 = 30;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    info!("Starting Knight Rogue...");

    let asset_dir = std::env::var(ASSETS_ENV).unwrap_or_else(|_| DEFAULT_ASSETS.to_string());
    let loader = AssetLoader::new(&asset_dir);
    info!("Loading assets from '{}'", asset_dir);

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(WINDOW_TITLE)
        .with_inner_size(LogicalSize::new(1280, 720))
        .with_resizable(true)
        .build(&event_loop)?;

    info!("Window created successfully");

    let mut scale_factor = window.scale_factor();
    let mut scene = GameScene::load(logical_size(window.inner_size(), scale_factor), &loader)
        .with_context(|| format!("Failed to load scene from '{}'", asset_dir))?;
    scene.input_mut().set_scale_factor(scale_factor);

    let mut game_loop = GameLoop::new();

    // Main event loop
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    info!("Close requested, shutting down...");
                    elwt.exit();
                }
                WindowEvent::Resized(physical_size) => {
                    info!("Window resized to {:?}", physical_size);
                    scene.resize(logical_size(physical_size, scale_factor));
                }
                WindowEvent::ScaleFactorChanged {
                    scale_factor: factor,
                    ..
                } => {
                    scale_factor = factor;
                    scene.input_mut().set_scale_factor(factor);
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    if event.physical_key == PhysicalKey::Code(KeyCode::KeyP) {
                        if event.state == ElementState::Pressed && !event.repeat {
                            if game_loop.toggle_pause() {
                                // Drop held buttons so nothing is stuck on resume
                                scene.input_mut().reset();
                            }
                            window.set_title(&status_title(&game_loop, &scene));
                        }
                    } else {
                        scene.input_mut().process_keyboard_event(&event);
                    }
                }
                WindowEvent::Focused(false) => {
                    // Releases never arrive for keys held while unfocused
                    scene.input_mut().reset();
                }
                WindowEvent::Touch(touch) => scene.input_mut().process_touch(&touch),
                WindowEvent::CursorMoved { position, .. } => {
                    scene.input_mut().process_cursor_moved(position);
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    scene.input_mut().process_mouse_button(state, button);
                }
                WindowEvent::RedrawRequested => {
                    let ticks = game_loop.begin_frame(Instant::now());
                    for _ in 0..ticks {
                        scene.update(FIXED_TIMESTEP);
                    }

                    if game_loop.frame_count() % TITLE_REFRESH_FRAMES == 0 {
                        window.set_title(&status_title(&game_loop, &scene));
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                // Request redraw on next frame
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}

fn logical_size(size: PhysicalSize<u32>, scale_factor: f64) -> Vec2 {
    let logical: LogicalSize<f32> = size.to_logical(scale_factor);
    Vec2::new(logical.width, logical.height)
}

/// Window title with the FPS, node count and knight state
fn status_title(game_loop: &GameLoop, scene: &GameScene) -> String {
    let paused = if game_loop.is_paused() { " [paused]" } else { "" };
    format!(
        "{} - {:.0} FPS - {} nodes - {:?}{}",
        WINDOW_TITLE,
        game_loop.fps(),
        scene.nodes().len(),
        scene.knight_state(),
        paused
    )
}
