use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::interval;
use tracing::info;

use crate::game::{Direction, GameConfig, GameState, GridEngine, Phase};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::SessionMetrics;
use crate::net::CommandServer;
use crate::render::Renderer;

/// The game process: the TCP command server feeding the grid engine, drawn
/// in the terminal. The engine loop here is the only writer of game state;
/// the server only ever touches the command queue.
pub struct GameMode {
    engine: GridEngine,
    state: GameState,
    metrics: SessionMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    commands: UnboundedReceiver<Direction>,
    show_menus: bool,
    tick: Duration,
    pending_key: Option<Direction>,
    should_quit: bool,
}

impl GameMode {
    /// Bind the command server and set up a fresh game. The server task is
    /// spawned here and lives for the rest of the process.
    pub async fn new(config: GameConfig, listen_addr: &str) -> Result<Self> {
        let (server, commands) = CommandServer::bind(listen_addr).await?;
        tokio::spawn(server.run());

        let show_menus = config.show_menus;
        let tick = Duration::from_millis(config.tick_ms);
        let mut engine = GridEngine::new(config);
        let state = engine.reset();

        Ok(Self {
            engine,
            state,
            metrics: SessionMetrics::new(),
            renderer: Renderer::new(show_menus),
            input_handler: InputHandler::new(),
            commands,
            show_menus,
            tick,
            pending_key: None,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_game_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.tick);

        // Render at 30 FPS regardless of the movement cadence.
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                _ = tick_timer.tick() => {
                    self.advance_game();
                }

                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Steer(direction) => {
                    self.pending_key = Some(direction);
                }
                KeyAction::Restart => self.restart(),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    /// One movement tick. A local key press beats the network queue; either
    /// way the engine sees at most one command, and never waits for one.
    fn advance_game(&mut self) {
        if self.state.phase == Phase::GameOver {
            // Waiting for the explicit restart trigger.
            return;
        }

        let command = self
            .pending_key
            .take()
            .or_else(|| self.commands.try_recv().ok());

        let outcome = self.engine.tick(&mut self.state, command);

        if let Some(cmd) = command {
            self.metrics.on_command(cmd, outcome.turned);
        }

        if outcome.collision.is_some() {
            let score = self.state.score();
            self.metrics.on_game_over(score);
            info!(score, collision = ?outcome.collision, "game over");

            // The bare variant restarts without waiting to be asked.
            if !self.show_menus {
                self.restart();
            }
        }
    }

    fn restart(&mut self) {
        self.state = self.engine.reset();
        // Stale commands must not steer the new round.
        while self.commands.try_recv().is_ok() {}
        self.pending_key = None;
        self.metrics.on_round_start();
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpStream;

    async fn local_game(config: GameConfig) -> (GameMode, std::net::SocketAddr) {
        // Bind by hand so the test can learn the ephemeral port.
        let (server, commands) = CommandServer::bind("127.0.0.1:0").await.unwrap();
        let addr = server.local_addr().unwrap();
        tokio::spawn(server.run());

        let show_menus = config.show_menus;
        let tick = Duration::from_millis(config.tick_ms);
        let mut engine = GridEngine::new(config);
        let state = engine.reset();

        let mode = GameMode {
            engine,
            state,
            metrics: SessionMetrics::new(),
            renderer: Renderer::new(show_menus),
            input_handler: InputHandler::new(),
            commands,
            show_menus,
            tick,
            pending_key: None,
            should_quit: false,
        };
        (mode, addr)
    }

    #[tokio::test]
    async fn test_initial_state() {
        let (mode, _addr) = local_game(GameConfig::small()).await;
        assert!(mode.state.is_running());
        assert_eq!(mode.state.score(), 1);
    }

    #[tokio::test]
    async fn test_local_key_steers_and_is_consumed() {
        let (mut mode, _addr) = local_game(GameConfig::small()).await;
        mode.pending_key = Some(Direction::Up);

        let head_before = mode.state.snake.head();
        mode.advance_game();

        assert_eq!(mode.state.snake.head(), head_before.moved_in(Direction::Up));
        assert_eq!(mode.pending_key, None);
        // Length-1 snake: the tail consumed the turn entry immediately.
        assert!(mode.state.snake.pending_turns.is_empty());
    }

    #[tokio::test]
    async fn test_network_command_steers() {
        let (mut mode, addr) = local_game(GameConfig::small()).await;

        let mut client = TcpStream::connect(addr).await.unwrap();
        client.write_all(b"down\n").await.unwrap();

        // Wait for the command to cross the server task into the queue.
        let command = tokio::time::timeout(Duration::from_secs(5), mode.commands.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(command, Direction::Down);
    }

    #[tokio::test]
    async fn test_restart_clears_round_state() {
        let (mut mode, _addr) = local_game(GameConfig::small()).await;
        mode.state.phase = Phase::GameOver;
        mode.pending_key = Some(Direction::Up);

        mode.restart();

        assert!(mode.state.is_running());
        assert_eq!(mode.state.snake.len(), 1);
        assert_eq!(mode.pending_key, None);
        assert!(mode.state.snake.pending_turns.is_empty());
    }

    #[tokio::test]
    async fn test_game_over_tick_is_a_no_op() {
        let (mut mode, _addr) = local_game(GameConfig::small()).await;
        mode.state.phase = Phase::GameOver;
        let snapshot = mode.state.clone();

        mode.advance_game();

        assert_eq!(mode.state, snapshot);
    }
}
