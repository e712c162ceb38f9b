/// VecScene Terminal Demo
///
/// Renders the axes grid, the player box, the billboard and the enemy
/// planes as ASCII art.
/// Controls:
///   - WASD / Arrow Keys: Move the player
///   - Left mouse drag: Turn the player
///   - Mouse move: Highlight the triangle under the cursor
///   - P: Toggle perspective/orthographic projection
///   - Q/ESC: Quit

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use std::time::{SystemTime, UNIX_EPOCH};
use vecscene_core::{ExerciseKind, Scene, SceneConfig};
use vecscene_terminal::{scene_summary, TerminalApp};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExerciseArg {
    Cross,
    Dot,
    Normalize,
}

impl From<ExerciseArg> for ExerciseKind {
    fn from(arg: ExerciseArg) -> Self {
        match arg {
            ExerciseArg::Cross => ExerciseKind::CrossProduct,
            ExerciseArg::Dot => ExerciseKind::DotProduct,
            ExerciseArg::Normalize => ExerciseKind::Normalization,
        }
    }
}

/// Third-person vector math playground in the terminal
#[derive(Parser, Debug)]
#[command(name = "vecscene-terminal")]
#[command(about = "Interactive 3D vector scene rendered as ASCII art", long_about = None)]
struct Args {
    /// Number of enemy planes to scatter around the player
    #[arg(short, long, default_value_t = 5)]
    enemies: usize,

    /// Seed for enemy placement (defaults to the current time)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Player movement speed in units per second
    #[arg(long, default_value_t = 5.0)]
    speed: f32,

    /// Vector exercise to draw into the scene
    #[arg(short = 'x', long, value_enum)]
    exercise: Option<ExerciseArg>,

    /// Print a summary of the scene and exit
    #[arg(long)]
    summary: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let seed = match args.seed {
        Some(seed) => seed,
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("system clock is before the Unix epoch")?
            .as_secs(),
    };
    let config = SceneConfig {
        enemy_count: args.enemies,
        player_speed: args.speed,
        seed,
        ..SceneConfig::default()
    };

    let mut scene = Scene::new(config).context("failed to build scene")?;
    let exercise = match args.exercise {
        Some(kind) => Some(
            ExerciseKind::from(kind)
                .build()
                .context("failed to build exercise")?,
        ),
        None => None,
    };

    if args.summary {
        print!("{}", scene_summary(&scene, exercise.as_ref()));
        return Ok(());
    }

    if let Some(exercise) = exercise {
        scene.add_exercise(exercise);
    }

    info!("starting terminal renderer with seed {seed}");
    let mut app = TerminalApp::new(scene).context("failed to query terminal size")?;
    app.run().context("terminal renderer failed")?;

    println!("Thank you for using VecScene!");
    Ok(())
}
