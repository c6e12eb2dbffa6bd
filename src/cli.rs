use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convert our custom LogLevel enum to log crate's LevelFilter
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Built-in scenes selectable from the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SceneChoice {
    Pyramids,
    Cube,
    Triangle,
    Quad,
}

impl SceneChoice {
    pub fn name(self) -> &'static str {
        match self {
            SceneChoice::Pyramids => "pyramids",
            SceneChoice::Cube => "cube",
            SceneChoice::Triangle => "triangle",
            SceneChoice::Quad => "quad",
        }
    }
}

/// Pixel coordinate given as `X,Y`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelCoord {
    pub x: u32,
    pub y: u32,
}

fn parse_pixel(s: &str) -> Result<PixelCoord, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{s}'"))?;
    let x = x.trim().parse().map_err(|e| format!("invalid X '{x}': {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("invalid Y '{y}': {e}"))?;
    Ok(PixelCoord { x, y })
}

/// Command line arguments structure using clap derive macros
#[derive(Parser, Debug)]
#[command(name = "wiretrace")]
#[command(about = "Software ray tracer for wireframe and polygon models")]
pub struct Args {
    /// TOML configuration file; built-in defaults are used when absent
    #[arg(short, long)]
    pub config: Option<String>,

    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub debug_level: LogLevel,

    /// Image width in pixels
    #[arg(long, default_value = "800", help = "Image width in pixels")]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "600", help = "Image height in pixels")]
    pub height: u32,

    /// Built-in scene to render
    #[arg(long, value_enum, default_value = "pyramids")]
    pub scene: SceneChoice,

    /// Output file path (.png for 8-bit, .exr for 32-bit float)
    #[arg(short, long, default_value = "output.png", help = "Output file path (.png for 8-bit, .exr for 32-bit float)")]
    pub output: String,

    /// Number of worker threads (defaults to one per core)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Show a progress bar while rendering
    #[arg(long)]
    pub progress: bool,

    /// Pick the primitive under pixel X,Y and log it
    #[arg(long, value_parser = parse_pixel)]
    pub pick: Option<PixelCoord>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}
