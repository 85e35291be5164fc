use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use levelgen_core::{
    EntityKind, GenerationConfig, GenerationSink, Level, LevelValidator, Pos, Severity, TileKind,
    generate_level,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a generation config JSON file; defaults apply when omitted
    #[arg(short, long)]
    config: Option<String>,
    /// Override the config seed
    #[arg(short, long)]
    seed: Option<u64>,
    /// Override the terrain algorithm (perlin, cellular, maze)
    #[arg(short, long)]
    algorithm: Option<String>,
    #[arg(long)]
    width: Option<usize>,
    #[arg(long)]
    height: Option<usize>,
    /// Print the derived metadata block as pretty JSON
    #[arg(long, default_value_t = false)]
    metadata: bool,
}

/// Forwards generation events to stderr so the rendered level stays clean
/// on stdout.
struct StderrSink;

impl GenerationSink for StderrSink {
    fn event(&mut self, severity: Severity, message: &str, context: &[(&str, String)]) {
        let tag = match severity {
            Severity::Info => "info",
            Severity::Warning => "warn",
            Severity::Error => "error",
        };
        let detail: Vec<String> =
            context.iter().map(|(key, value)| format!("{key}={value}")).collect();
        eprintln!("[{tag}] {message} ({})", detail.join(" "));
    }

    fn timing(&mut self, operation: &str, elapsed: std::time::Duration, metrics: &[(&str, f64)]) {
        let detail: Vec<String> =
            metrics.iter().map(|(key, value)| format!("{key}={value}")).collect();
        eprintln!("[time] {operation} {:.2}ms ({})", elapsed.as_secs_f64() * 1000.0, detail.join(" "));
    }
}

fn tile_glyph(tile: TileKind) -> char {
    match tile {
        TileKind::Empty => ' ',
        TileKind::Ground => '.',
        TileKind::Wall => '#',
        TileKind::Water => '~',
        TileKind::Grass => ',',
        TileKind::Stone => '^',
        TileKind::Sand => ':',
        TileKind::Lava => '!',
        TileKind::Ice => '-',
    }
}

fn entity_glyph(kind: EntityKind) -> char {
    match kind {
        EntityKind::Player => '@',
        EntityKind::Exit => '>',
        EntityKind::Enemy => 'e',
        EntityKind::Item => 'i',
        EntityKind::Npc => 'n',
        EntityKind::Treasure => '$',
        EntityKind::Obstacle => 'o',
    }
}

fn render(level: &Level) -> String {
    let width = level.grid.width();
    let height = level.grid.height();
    let mut rows: Vec<Vec<char>> = (0..height)
        .map(|y| {
            (0..width)
                .map(|x| tile_glyph(level.grid.tile_at(Pos { y: y as i32, x: x as i32 })))
                .collect()
        })
        .collect();
    for entity in &level.entities {
        rows[entity.pos.y as usize][entity.pos.x as usize] = entity_glyph(entity.kind);
    }
    rows.into_iter().map(|row| row.into_iter().collect::<String>() + "\n").collect()
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            let data = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {path}"))?;
            serde_json::from_str::<GenerationConfig>(&data)
                .with_context(|| "Failed to deserialize config JSON")?
        }
        None => GenerationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(algorithm) = args.algorithm {
        config.algorithm = algorithm;
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }

    let level = generate_level(&config, &mut StderrSink)
        .map_err(|e| anyhow::anyhow!("Generation failed: {e}"))?;

    println!("{}", level.name);
    print!("{}", render(&level));

    let validator = LevelValidator::default();
    let report = validator.validate(&level);
    if report.is_valid {
        println!("Playable: yes");
    } else {
        println!("Playable: no");
        for issue in &report.issues {
            println!("  - {issue}");
        }
    }
    println!("Quality: {:.3}", validator.evaluate_quality(&level));

    if args.metadata {
        println!(
            "{}",
            serde_json::to_string_pretty(&level.metadata)
                .with_context(|| "Failed to serialize metadata")?
        );
    }

    Ok(())
}
