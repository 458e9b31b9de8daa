use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use anaglyph_core::{AnaglyphParams, LayerStack, Manifest};
use anaglyph_depth::{DepthAssigner, LayerDepthInfo};
use anaglyph_encode::PngEncoder;
use anaglyph_render::image_loader;
use anaglyph_render::AnaglyphPipeline;

#[derive(Parser)]
#[command(
    name = "anaglyph",
    version,
    about = "Anaglyph - red/cyan stereo images from layered artwork",
    long_about = "Anaglyph turns a stack of grayscale layers into a red/cyan anaglyph.\nLayers are listed top to bottom in a TOML manifest; their names decide how deep they sit."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a layer manifest to a PNG anaglyph
    Render {
        /// Path to the .toml manifest
        #[arg()]
        manifest: PathBuf,

        /// Output file path (default: <manifest name>_anaglyph.png next to the manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disparity of the nearest layers, in percent of the image width
        #[arg(long, allow_negative_numbers = true)]
        min_disparity: Option<f64>,

        /// Disparity of the farthest layers, in percent of the image width
        #[arg(long, allow_negative_numbers = true)]
        max_disparity: Option<f64>,

        /// Brightness factor of the left (red) view, 0 to 1
        #[arg(long)]
        left_factor: Option<f64>,

        /// Brightness factor of the right (cyan) view, 0 to 1
        #[arg(long)]
        right_factor: Option<f64>,

        /// Put the right view in red and the left view in cyan
        #[arg(long)]
        swap: bool,
    },

    /// Show the depth policy and disparity of every layer
    Inspect {
        /// Path to the .toml manifest
        #[arg()]
        manifest: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display version and engine info
    Info,
}

/// Parameter overrides given on the command line.
#[derive(Debug, Default, Clone, Copy)]
struct ParamOverrides {
    min_disparity: Option<f64>,
    max_disparity: Option<f64>,
    left_factor: Option<f64>,
    right_factor: Option<f64>,
    swap: bool,
}

impl ParamOverrides {
    fn apply(self, mut params: AnaglyphParams) -> AnaglyphParams {
        if let Some(v) = self.min_disparity {
            params.min_disparity = v;
        }
        if let Some(v) = self.max_disparity {
            params.max_disparity = v;
        }
        if let Some(v) = self.left_factor {
            params.left_factor = v;
        }
        if let Some(v) = self.right_factor {
            params.right_factor = v;
        }
        if self.swap {
            params.swap_left_right = true;
        }
        params
    }
}

#[derive(Serialize)]
struct InspectReport {
    manifest: PathBuf,
    width: u32,
    height: u32,
    params: AnaglyphParams,
    /// Stack indices of the layers placed by stacking order.
    normal_layers: Vec<usize>,
    depth_maps: Vec<String>,
    layers: Vec<LayerDepthInfo>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let json_stdout = matches!(cli.command, Commands::Inspect { json: true, .. });

    let subscriber = tracing_subscriber::fmt().with_env_filter(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    );

    if json_stdout {
        // Keep stdout a single JSON document.
        subscriber
            .with_ansi(false)
            .with_writer(std::io::stderr)
            .init();
    } else {
        subscriber.init();
    }

    match cli.command {
        Commands::Render {
            manifest,
            output,
            min_disparity,
            max_disparity,
            left_factor,
            right_factor,
            swap,
        } => {
            let overrides = ParamOverrides {
                min_disparity,
                max_disparity,
                left_factor,
                right_factor,
                swap,
            };
            cmd_render(manifest, output, overrides)
        }
        Commands::Inspect { manifest, json } => cmd_inspect(manifest, json),
        Commands::Info => cmd_info(),
    }
}

fn load_manifest(path: &Path) -> Result<Manifest> {
    let manifest = Manifest::load_from_file(path)
        .with_context(|| format!("failed to read manifest: {}", path.display()))?;
    if manifest.layers.is_empty() {
        anyhow::bail!("manifest {} lists no layers", path.display());
    }
    Ok(manifest)
}

fn load_layers(manifest: &Manifest, path: &Path) -> Result<LayerStack> {
    image_loader::load_stack(&manifest.resolved_layers(path))
        .with_context(|| format!("failed to load the layers of {}", path.display()))
}

fn sorted_map_names(assigner: &DepthAssigner) -> Vec<String> {
    let mut names: Vec<String> = assigner.registry().names().map(str::to_string).collect();
    names.sort();
    names
}

fn default_output(manifest: &Path) -> PathBuf {
    let stem = manifest.file_stem().unwrap_or_default().to_string_lossy();
    manifest.with_file_name(format!("{}_anaglyph.png", stem))
}

fn cmd_render(
    manifest_path: PathBuf,
    output: Option<PathBuf>,
    overrides: ParamOverrides,
) -> Result<()> {
    let start = Instant::now();

    println!("Anaglyph Render v{}", env!("CARGO_PKG_VERSION"));
    println!("   Manifest: {}", manifest_path.display());

    let manifest = load_manifest(&manifest_path)?;
    let params = overrides.apply(manifest.params);
    params
        .validate()
        .context("invalid render parameters")?;

    let load_start = Instant::now();
    let stack = load_layers(&manifest, &manifest_path)?;
    println!(
        "   ✓ Loaded {} layers ({}x{}) in {:.1}ms",
        stack.len(),
        stack.width,
        stack.height,
        load_start.elapsed().as_secs_f64() * 1000.0
    );

    let render_start = Instant::now();
    let pipeline = AnaglyphPipeline::new(params);
    let result = pipeline
        .render_with_progress(&stack, |done, total| {
            tracing::debug!("composited {}/{} layers", done, total);
        })
        .with_context(|| format!("failed to render {}", manifest_path.display()))?;
    println!(
        "   ✓ Composited {} layers, {} depth maps in {:.1}ms",
        result.composited_layers,
        result.depth_maps,
        render_start.elapsed().as_secs_f64() * 1000.0
    );

    let output = output.unwrap_or_else(|| default_output(&manifest_path));
    let frame = result.to_frame_buffer();
    PngEncoder::encode(&frame, &output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("   ✓ Wrote {}", output.display());
    println!("   Fingerprint: {}", result.fingerprint());
    println!("   Total: {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}

fn cmd_inspect(manifest_path: PathBuf, json: bool) -> Result<()> {
    let manifest = load_manifest(&manifest_path)?;
    manifest
        .params
        .validate()
        .context("invalid render parameters")?;
    let stack = load_layers(&manifest, &manifest_path)?;

    let assigner = DepthAssigner::from_params(&stack, &manifest.params)
        .with_context(|| format!("failed to resolve depths for {}", manifest_path.display()))?;
    let layers = assigner.describe()?;

    let report = InspectReport {
        manifest: manifest_path.clone(),
        width: stack.width,
        height: stack.height,
        params: manifest.params,
        normal_layers: assigner.normal_layers().to_vec(),
        depth_maps: sorted_map_names(&assigner),
        layers,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Anaglyph Layer Inspector");
    println!(
        "   Manifest: {} ({}x{})",
        report.manifest.display(),
        report.width,
        report.height
    );
    println!(
        "   Disparity: {}% .. {}% of width, factors L {} / R {}{}",
        report.params.min_disparity,
        report.params.max_disparity,
        report.params.left_factor,
        report.params.right_factor,
        if report.params.swap_left_right { ", swapped" } else { "" }
    );
    println!(
        "   Normal layers: {}, depth maps: {}",
        assigner.normal_count(),
        if report.depth_maps.is_empty() {
            "none".to_string()
        } else {
            report.depth_maps.join(", ")
        }
    );
    for info in &report.layers {
        let shift = match info.disparity {
            None => "defines a depth map".to_string(),
            Some((lo, hi)) if lo == hi => format!("{} px", lo),
            Some((lo, hi)) => format!("{} .. {} px", lo, hi),
        };
        println!("   [{:>2}] {:<32} {}", info.index, info.name, shift);
    }
    Ok(())
}

fn cmd_info() -> Result<()> {
    let defaults = AnaglyphParams::default();
    println!("Anaglyph Stereo Compositor");
    println!("   Version:   {}", env!("CARGO_PKG_VERSION"));
    println!("   Renderer:  CPU (single-threaded)");
    println!("   Output:    PNG (8-bit RGBA)");
    println!(
        "   Defaults:  disparity {}% .. {}%, factors L {} / R {}",
        defaults.min_disparity,
        defaults.max_disparity,
        defaults.left_factor,
        defaults.right_factor
    );
    println!();
    println!("   Layer names:");
    for (form, meaning) in [
        ("depth=<d>", "fixed depth"),
        ("background*", "fixed depth 0"),
        ("depthmap <name> <lo> to <hi>", "defines a depth map"),
        ("reldepthmap=<name>", "map scaled around the layer's place"),
        ("fixdepthmap=<name>", "map used as absolute depth"),
        ("anything else", "depth from stacking order"),
    ] {
        println!("     {:<30} {}", form, meaning);
    }
    Ok(())
}
