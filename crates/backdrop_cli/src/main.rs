//! Backdrop CLI
//!
//! Drives a background headless: the canvas styles record their paint
//! commands and the starfield records its sprite uploads. With `--gpu` the
//! sprites are also drawn into an offscreen GPU target.
//!
//! ```text
//! backdrop variants
//! backdrop run --variant matrix --frames 120 --resize 0x600@10 --resize 800x600@20
//! backdrop run --variant space --pointer 400,300@5 --prefs prefs.toml
//! ```

mod script;

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use backdrop::{
    load_preferred, save_preferred, BackdropConfig, BackgroundController, BackgroundVariant,
    HeadlessSurface, TomlFilePreferences,
};
use backdrop_gpu::GpuContext;
use clap::{Args, Parser, Subcommand};

use crate::script::{parse_pointer, parse_resize, ScriptedEvent};

#[derive(Parser, Debug)]
#[command(name = "backdrop")]
#[command(about = "Run procedural animated backgrounds headless")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available backgrounds
    Variants,
    /// Run a background for a number of frames
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Background id (none, matrix, synthwave, space); defaults to the stored preference
    #[arg(short, long)]
    variant: Option<BackgroundVariant>,

    /// Viewport width
    #[arg(long, default_value_t = 800.0)]
    width: f32,

    /// Viewport height
    #[arg(long, default_value_t = 600.0)]
    height: f32,

    /// Frames to run
    #[arg(short = 'n', long, default_value_t = 60)]
    frames: u64,

    /// Milliseconds between frames
    #[arg(long, default_value_t = 16.0)]
    tick_ms: f64,

    /// Resize before a frame, e.g. 1024x768@30
    #[arg(long = "resize", value_name = "WxH@FRAME", value_parser = parse_resize)]
    resizes: Vec<ScriptedEvent>,

    /// Move the pointer before a frame, e.g. 400,300@10
    #[arg(long = "pointer", value_name = "X,Y@FRAME", value_parser = parse_pointer)]
    pointers: Vec<ScriptedEvent>,

    /// Preference file holding the chosen background
    #[arg(long, value_name = "PATH")]
    prefs: Option<PathBuf>,

    /// Configuration file (backdrop.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Render the starfield on an offscreen GPU target
    #[arg(long)]
    gpu: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Variants => {
            for variant in BackgroundVariant::all() {
                let backend = if variant.uses_gpu() { "gpu" } else { "canvas" };
                println!("{:<10} {:<10} {}", variant.id(), variant.name(), backend);
            }
            Ok(())
        }
        Command::Run(args) => run(args),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => BackdropConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => BackdropConfig::default(),
    }
    .with_env_overrides();

    let mut prefs = args.prefs.as_ref().map(TomlFilePreferences::new);
    let variant = args
        .variant
        .or_else(|| prefs.as_ref().map(|store| load_preferred(store)))
        .unwrap_or_default();

    let surface = if args.gpu {
        let width = args.width.max(1.0) as u32;
        let height = args.height.max(1.0) as u32;
        let gpu = GpuContext::headless_blocking(width, height)
            .context("Failed to create headless GPU context")?;
        HeadlessSurface::with_gpu(Rc::new(gpu))
    } else {
        HeadlessSurface::new()
    };
    let canvas = surface.canvas().cloned();
    let sprites = surface.sprites().cloned();

    let mut controller = BackgroundController::new(Box::new(surface), config);
    controller.resize(args.width, args.height);
    controller
        .set_variant(variant)
        .with_context(|| format!("Failed to start background '{variant}'"))?;
    tracing::info!(variant = %variant, frames = args.frames, "running");

    let script = script::ordered(args.resizes.into_iter().chain(args.pointers).collect());
    let mut pending = script.iter().peekable();
    let mut drawn_frames = 0;
    let mut sprite_frames = 0;

    for frame in 0..args.frames {
        while let Some(scripted) = pending.next_if(|e| e.frame <= frame) {
            controller.handle_event(scripted.event);
        }

        let callbacks = controller.tick(frame as f64 * args.tick_ms);

        let mut line = format!("frame {frame:>5}  callbacks {callbacks}");
        if let Some(canvas) = &canvas {
            if canvas.frame_count() > drawn_frames {
                drawn_frames = canvas.frame_count();
                line.push_str(&format!("  commands {}", canvas.last_frame().len()));
            }
        }
        if let Some(sprites) = &sprites {
            if sprites.frames() > sprite_frames {
                sprite_frames = sprites.frames();
                line.push_str(&format!("  sprites {}", sprites.last_count()));
            }
        }
        println!("{line}");
    }

    if let Some(store) = prefs.as_mut() {
        save_preferred(store, controller.variant()).with_context(|| {
            format!("Failed to save preference to {}", store.path().display())
        })?;
    }

    println!(
        "{} frames, final background '{}'",
        args.frames,
        controller.variant()
    );
    Ok(())
}
