use anyhow::{Context, Result};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};
use tracing::info;

/// Launches the game and the pose pipeline as separate OS processes and
/// supervises them. They share nothing but the wire protocol.
pub struct RunMode {
    addr: String,
    rows: usize,
    show_menus: bool,
}

impl RunMode {
    pub fn new(addr: String, rows: usize, show_menus: bool) -> Self {
        Self {
            addr,
            rows,
            show_menus,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let exe = std::env::current_exe().context("cannot locate own executable")?;

        let mut game_args = vec![
            "--mode".to_string(),
            "game".to_string(),
            "--listen".to_string(),
            self.addr.clone(),
            "--rows".to_string(),
            self.rows.to_string(),
        ];
        if !self.show_menus {
            game_args.push("--no-menus".to_string());
        }

        let mut game = Command::new(&exe)
            .args(&game_args)
            .kill_on_drop(true)
            .spawn()
            .context("failed to launch game process")?;

        // Give the command server a moment to bind before the pose client
        // makes its one fatal-on-refusal connection attempt.
        tokio::time::sleep(Duration::from_millis(300)).await;

        let mut pose = Command::new(&exe)
            .args(["--mode", "pose", "--connect", &self.addr])
            .stdout(Stdio::null()) // the game's TUI owns the terminal
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .context("failed to launch pose process")?;

        tokio::select! {
            status = game.wait() => {
                info!(?status, "game process exited");
                shutdown(&mut pose).await;
            }
            status = pose.wait() => {
                info!(?status, "pose process exited");
                shutdown(&mut game).await;
            }
        }

        Ok(())
    }
}

async fn shutdown(child: &mut Child) {
    if child.kill().await.is_ok() {
        let _ = child.wait().await;
    }
}
