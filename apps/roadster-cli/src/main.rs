use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use roadster_assets::ObjectFactory;
use roadster_bridge::{BridgeConfig, FrameDriver};
use roadster_input::InputEvent;
use roadster_kernel::World;
use roadster_render::{DebugTextRenderer, Scene};
use roadster_terrain::{HeightmapGrid, TerrainParams, TerrainSurface};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roadster-cli", about = "Headless driver for the roadster bridge")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, catalog and default configuration
    Info,
    /// Drive the reference world for a number of frames and print the last one
    Run {
        /// Number of frames to run
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// YAML bridge configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Keys held down for the whole run, e.g. `w,a`
        #[arg(long, value_delimiter = ',')]
        hold: Vec<String>,
        /// Heightmap (JSON array of rows) to load before the first frame
        #[arg(long)]
        heightmap: Option<PathBuf>,
    },
    /// Build a terrain mesh from a heightmap and print its shape
    Terrain {
        /// Heightmap (JSON array of rows)
        #[arg(long)]
        heightmap: PathBuf,
        /// Generate uvs instead of vertex colours
        #[arg(long)]
        textured: bool,
    },
}

fn read_heightmap(path: &Path) -> anyhow::Result<HeightmapGrid> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading heightmap {}", path.display()))?;
    let grid = serde_json::from_str(&text)
        .with_context(|| format!("parsing heightmap {}", path.display()))?;
    Ok(grid)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("roadster-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("catalog:");
            for (kind, prototype) in ObjectFactory::new().catalog() {
                println!(
                    "  {:<6} {} / {}",
                    kind.name(),
                    prototype.geometry,
                    prototype.material
                );
            }
            let config = BridgeConfig::default();
            println!(
                "defaults: player={}, camera_offset={}, terrain={}x{} scale {}",
                config.player_kind,
                config.camera_offset,
                config.terrain.world_width,
                config.terrain.world_depth,
                config.terrain.height_scale
            );
        }
        Commands::Run {
            frames,
            config,
            hold,
            heightmap,
        } => {
            let config = match config {
                Some(path) => BridgeConfig::load(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => BridgeConfig::default(),
            };

            let mut driver = FrameDriver::new(
                World::with_default_scene(),
                Scene::new(),
                DebugTextRenderer::new(),
                &config,
            );
            if let Some(path) = heightmap {
                let grid = read_heightmap(&path)?;
                driver.load_terrain(&grid)?;
            }

            {
                let input = driver.input();
                let mut input = input.borrow_mut();
                for key in &hold {
                    if input.handle(&InputEvent::KeyDown(key.clone())).is_none() {
                        tracing::warn!(key = %key, "key is not bound to any action");
                    }
                }
            }

            let last = match driver.run(frames) {
                Ok(last) => last,
                Err(err) => {
                    tracing::error!(frame = driver.frames() + 1, %err, "frame failed");
                    return Err(err.into());
                }
            };

            match last {
                Some(report) => {
                    println!("{}", report.output);
                    println!(
                        "frame {}: created={} updated={} skipped={} pruned={} hidden={} camera_moved={}",
                        report.frame,
                        report.stats.created,
                        report.stats.updated,
                        report.stats.skipped,
                        report.stats.pruned,
                        report.stats.hidden,
                        report.stats.camera_moved
                    );
                }
                None => println!("no frames run"),
            }
        }
        Commands::Terrain {
            heightmap,
            textured,
        } => {
            let grid = read_heightmap(&heightmap)?;
            let params = TerrainParams {
                surface: if textured {
                    TerrainSurface::Textured
                } else {
                    TerrainSurface::VertexColors
                },
                ..TerrainParams::default()
            };
            let mesh = roadster_terrain::build(&grid, &params)?;
            let (min, max) = mesh.bounds();
            println!(
                "heightmap {}x{}: vertices={}, triangles={}",
                grid.side(),
                grid.side(),
                mesh.vertex_count(),
                mesh.triangle_count()
            );
            println!("bounds: min={min} max={max}");
        }
    }

    Ok(())
}
