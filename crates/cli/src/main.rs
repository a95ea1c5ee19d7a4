//! relief CLI - Terrain-RGB tiles to adaptive 3D meshes

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use relief_colormap::{shade_mesh, ColorLut, ShadeParams};
use relief_core::read_terrain_png;
use relief_rtin::{triangulate, triangulate_batch, write_obj_file, MeshParams, NoDataFilter};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "relief")]
#[command(author, version, about = "Terrain-RGB tiles to adaptive 3D meshes", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a Terrain-RGB tile
    Info {
        /// Input PNG tile
        input: PathBuf,
    },
    /// Triangulate one tile into an OBJ mesh
    Mesh {
        /// Input PNG tile
        input: PathBuf,
        /// Output OBJ file
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        options: MeshOptions,
    },
    /// Triangulate every PNG tile in a directory
    Batch {
        /// Directory of input PNG tiles
        input: PathBuf,
        /// Output directory for OBJ meshes
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        options: MeshOptions,
    },
}

#[derive(Args)]
struct MeshOptions {
    /// Maximum vertical error of the simplified mesh
    #[arg(long, default_value_t = 0.01)]
    max_error: f32,

    /// Vertical exaggeration factor
    #[arg(long, default_value_t = 25.0)]
    exaggeration: f32,

    /// Constant added to every assembled z (sea-level reference)
    #[arg(long, default_value_t = 0.25)]
    z_offset: f32,

    /// No-data handling: exact sentinel, band, or off
    #[arg(long, value_enum, default_value_t = NodataMode::Exact)]
    nodata: NodataMode,

    /// Sentinel elevation for --nodata exact
    #[arg(long, default_value_t = 255.0)]
    sentinel: f32,

    /// Lower bound for --nodata band
    #[arg(long, default_value_t = -1.0, allow_hyphen_values = true)]
    nodata_min: f32,

    /// Upper bound for --nodata band
    #[arg(long, default_value_t = f32::INFINITY)]
    nodata_max: f32,

    /// Optional color table; adds per-vertex colors to the OBJ
    #[arg(long)]
    lut: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum NodataMode {
    Exact,
    Band,
    Off,
}

impl MeshOptions {
    fn mesh_params(&self) -> MeshParams {
        let nodata = match self.nodata {
            NodataMode::Exact => NoDataFilter::Exact(self.sentinel),
            NodataMode::Band => NoDataFilter::Band {
                min: self.nodata_min,
                max: self.nodata_max,
            },
            NodataMode::Off => NoDataFilter::Off,
        };
        MeshParams {
            max_error: self.max_error,
            vertical_exaggeration: self.exaggeration,
            z_offset: self.z_offset,
            nodata,
        }
    }

    fn load_lut(&self) -> Result<Option<ColorLut>> {
        match &self.lut {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read color table {}", path.display()))?;
                Ok(Some(ColorLut::parse(&text)))
            }
            None => Ok(None),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        // ── Info ─────────────────────────────────────────────────────
        Commands::Info { input } => {
            let grid = read_tile(&input)?;
            let (min, max) = grid.min_max();

            println!("File: {}", input.display());
            println!(
                "Grid: {} x {} ({} tile + backfilled border)",
                grid.side(),
                grid.side(),
                grid.tile_size()
            );
            println!("Elevation range: {:.1} .. {:.1}", min, max);
            let sentinel = grid.data().iter().filter(|&&z| z == 255.0).count();
            if sentinel > 0 {
                println!(
                    "No-data cells: {} ({:.1}%)",
                    sentinel,
                    100.0 * sentinel as f64 / grid.len() as f64
                );
            }
        }

        // ── Mesh ─────────────────────────────────────────────────────
        Commands::Mesh {
            input,
            output,
            options,
        } => {
            let grid = read_tile(&input)?;
            let params = options.mesh_params();
            let lut = options.load_lut()?;

            let start = Instant::now();
            let mesh = triangulate(&grid, &params).context("Triangulation failed")?;
            let colors = lut.map(|lut| {
                let shade = ShadeParams {
                    sea_level: params.z_offset,
                    ..ShadeParams::default()
                };
                shade_mesh(&mesh, &lut, &shade)
            });
            write_obj_file(&mesh, colors.as_deref(), &output)
                .context("Failed to write OBJ output")?;

            info!(
                "{} vertices, {} triangles at max error {}",
                mesh.num_vertices(),
                mesh.num_triangles(),
                params.max_error
            );
            done("Mesh", &output, start.elapsed());
        }

        // ── Batch ────────────────────────────────────────────────────
        Commands::Batch {
            input,
            output,
            options,
        } => {
            let tiles = collect_tiles(&input)?;
            if tiles.is_empty() {
                bail!("no PNG tiles found in {}", input.display());
            }
            std::fs::create_dir_all(&output)?;
            let params = options.mesh_params();
            let lut = options.load_lut()?;

            let start = Instant::now();
            let pb = progress(tiles.len() as u64, "Decoding tiles");
            let grids = tiles
                .iter()
                .map(|path| {
                    let grid = read_terrain_png(path)
                        .with_context(|| format!("Failed to decode {}", path.display()));
                    pb.inc(1);
                    grid
                })
                .collect::<Result<Vec<_>>>()?;
            pb.finish_and_clear();

            let meshes = triangulate_batch(&grids, &params).context("Triangulation failed")?;

            let pb = progress(tiles.len() as u64, "Writing meshes");
            for (path, mesh) in tiles.iter().zip(&meshes) {
                let out = output
                    .join(path.file_stem().unwrap_or_default())
                    .with_extension("obj");
                let colors = lut.as_ref().map(|lut| {
                    let shade = ShadeParams {
                        sea_level: params.z_offset,
                        ..ShadeParams::default()
                    };
                    shade_mesh(mesh, lut, &shade)
                });
                write_obj_file(mesh, colors.as_deref(), &out)
                    .with_context(|| format!("Failed to write {}", out.display()))?;
                pb.inc(1);
            }
            pb.finish_and_clear();

            println!("{} meshes saved to: {}", meshes.len(), output.display());
            println!("  Processing time: {:.2?}", start.elapsed());
        }
    }

    Ok(())
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn done(name: &str, path: &PathBuf, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

fn progress(len: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.green}] {pos}/{len}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb
}

fn read_tile(path: &Path) -> Result<relief_core::HeightGrid> {
    let grid = read_terrain_png(path)
        .with_context(|| format!("Failed to decode {}", path.display()))?;
    info!("Input: {} x {}", grid.side(), grid.side());
    Ok(grid)
}

fn collect_tiles(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut tiles: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map_or(false, |ext| ext.eq_ignore_ascii_case("png"))
        })
        .collect();
    tiles.sort();
    Ok(tiles)
}
