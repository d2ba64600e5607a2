pub mod r#struct;
pub mod math;
pub mod camera;
pub mod config;
pub mod draw;
pub mod font;
pub mod input;
pub mod snake;
pub mod timer;

use std::time::Instant;

use anyhow::Context;
use log::{error, info, trace, warn};
use r#struct::State;
use winit::{
    dpi::LogicalSize,
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::EventLoop,
    keyboard::PhysicalKey,
    window::WindowBuilder,
};

use config::{WINDOW_HEIGHT, WINDOW_TITLE, WINDOW_WIDTH};
use input::KeyAction;
use snake::{Direction, GameState};
use timer::TickTimer;

/// Player commands, already decoupled from the keys that produce them.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum SnakeInputs {
    Turn(Direction),
    Pause,
    Restart,
}

/// Opens the window and plays until it is closed.
pub async fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let event_loop = EventLoop::new().context("failed to create the event loop")?;
    let window = WindowBuilder::new()
        .with_title(WINDOW_TITLE)
        .with_inner_size(LogicalSize::new(WINDOW_WIDTH as f64, WINDOW_HEIGHT as f64))
        .with_resizable(false)
        .build(&event_loop)
        .context("failed to create the game window")?;
    let mut state = State::new(&window).await?;

    let mut game = GameState::new();
    let mut timer = TickTimer::new(game.tick_interval());
    timer.sync(game.is_running(), game.tick_interval(), Instant::now());
    info!("game started, tick every {:?}", timer.interval());

    event_loop
        .run(move |event, elwt| match event {
            Event::NewEvents(_) => {
                if timer.poll(Instant::now()) {
                    let outcome = game.advance();
                    trace!("tick: {:?}", outcome);
                    timer.sync(game.is_running(), game.tick_interval(), Instant::now());
                    state.window().request_redraw();
                }
            }
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == state.window().id() => match event {
                WindowEvent::CloseRequested => {
                    timer.disarm();
                    elwt.exit();
                }
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            state: ElementState::Pressed,
                            physical_key: PhysicalKey::Code(code),
                            repeat: false,
                            ..
                        },
                    ..
                } => match input::map_key(*code) {
                    Some(KeyAction::Quit) => {
                        timer.disarm();
                        elwt.exit();
                    }
                    Some(KeyAction::Game(command)) => {
                        if game.apply(command) {
                            timer.sync(game.is_running(), game.tick_interval(), Instant::now());
                            state.window().request_redraw();
                        }
                    }
                    None => {}
                },
                WindowEvent::Resized(physical_size) => {
                    state.resize(*physical_size);
                    state.window().request_redraw();
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    let size = state.window().inner_size();
                    state.resize(size);
                    state.window().request_redraw();
                }
                WindowEvent::RedrawRequested => match state.render(&game) {
                    Ok(_) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        state.resize(state.size);
                        state.window().request_redraw();
                    }
                    // The system is out of memory, we should probably quit
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        error!("out of GPU memory, quitting");
                        timer.disarm();
                        elwt.exit();
                    }
                    // Timeout: the frame took too long to present, skip it
                    Err(e) => warn!("frame skipped: {}", e),
                },
                _ => {}
            },
            Event::AboutToWait => elwt.set_control_flow(timer.control_flow()),
            Event::LoopExiting => info!("window closed, final score {}", game.score),
            _ => {}
        })
        .context("event loop failed")?;

    Ok(())
}
