use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use pose_snake::game::GameConfig;
use pose_snake::modes::{GameMode, PoseMode, RunMode};

#[derive(Parser)]
#[command(name = "pose_snake")]
#[command(version, about = "Grid snake steered by head pose over TCP")]
struct Cli {
    /// Execution mode
    #[arg(long, default_value = "game")]
    mode: Mode,

    /// Side length of the square grid
    #[arg(long, default_value = "20")]
    rows: usize,

    /// Address the game's command server listens on
    #[arg(long, default_value = "127.0.0.1:8899")]
    listen: String,

    /// Address the pose pipeline sends directions to
    #[arg(long, default_value = "127.0.0.1:8899")]
    connect: String,

    /// Drop the header/footer chrome and restart instantly on death
    #[arg(long)]
    no_menus: bool,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Run the grid game with its TCP command server
    Game,
    /// Run the head-pose direction pipeline
    Pose,
    /// Launch both processes and supervise them
    Run,
}

#[tokio::main]
async fn main() -> Result<()> {
    // The TUI draws to stderr, so diagnostics go to stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stdout)
        .init();

    let cli = Cli::parse();

    match cli.mode {
        Mode::Game => {
            let mut config = GameConfig::new(cli.rows);
            config.show_menus = !cli.no_menus;

            let mut game = GameMode::new(config, &cli.listen).await?;
            game.run().await?;
        }
        Mode::Pose => {
            let mut pose = PoseMode::new(cli.connect);
            pose.run().await?;
        }
        Mode::Run => {
            let mut runner = RunMode::new(cli.listen, cli.rows, !cli.no_menus);
            runner.run().await?;
        }
    }

    Ok(())
}
