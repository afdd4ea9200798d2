//! Terminal Mahjong Solitaire runner.
//!
//! Renders through the framebuffer renderer, reads keys and mouse clicks with
//! crossterm, and optionally serves the TCP control adapter.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEventKind};

use mahjong_solitaire::adapter::Adapter;
use mahjong_solitaire::input::{handle_key_event, should_quit};
use mahjong_solitaire::logging::init_logging;
use mahjong_solitaire::term::{AdapterStatusView, FrameBuffer, GameView, TerminalRenderer};
use mahjong_solitaire::types::TICK_MS;
use mahjong_solitaire::{App, AppConfig};

fn main() -> Result<()> {
    let config = AppConfig::from_env()?;
    init_logging(config.log_level, &config.log_file)?;
    log::info!("starting seed={} ai={}", config.seed, config.ai_enabled);

    let adapter = if config.ai_enabled {
        Some(Adapter::start(config.server.clone())?)
    } else {
        None
    };

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, App::new(config.seed), adapter);

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Err(e) = &result {
        log::error!("exiting with error: {:#}", e);
    }
    result
}

fn run(term: &mut TerminalRenderer, mut app: App, mut adapter: Option<Adapter>) -> Result<()> {
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);

    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        // Render.
        let viewport = term.viewport()?;
        let status = adapter.as_ref().map(|a| AdapterStatusView {
            client_count: a.status().client_count() as u16,
            controller_id: a.status().controller_id(),
        });
        view.render_into(app.snapshot(), app.highlights(), status.as_ref(), viewport, &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        let mut changed = false;
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        changed |= app.handle_action(action);
                    }
                }
                Event::Mouse(mouse) => {
                    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                        if let Some(id) = view.hit_test(app.snapshot(), viewport, mouse.column, mouse.row) {
                            changed |= app.click(id).is_some();
                        }
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // External commands are applied between frames.
        if let Some(adapter) = adapter.as_mut() {
            if adapter.pump(app.game_mut()) {
                app.refresh();
            } else if changed {
                adapter.broadcast_observation(app.snapshot());
            }
        }

        // Tick.
        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();
            app.tick(elapsed.as_millis().min(u32::MAX as u128) as u32);
        }
    }
}
