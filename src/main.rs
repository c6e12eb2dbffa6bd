use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};

mod cli;
mod logger;

use cli::Args;
use logger::init_logger;
use wiretrace::config::ConfigFile;
use wiretrace::geometry::CoordinateAxes;
use wiretrace::hit::HitKind;
use wiretrace::output::save_image;
use wiretrace::renderer::Renderer;
use wiretrace::scene::{Model, Scene};

fn load_config(path: Option<&str>) -> Result<ConfigFile> {
    match path {
        Some(path) => {
            let cfg = ConfigFile::load(path).with_context(|| format!("loading configuration from {path}"))?;
            info!("Configuration loaded from {}", path);
            Ok(cfg)
        }
        None => Ok(ConfigFile::default()),
    }
}

fn describe(kind: &HitKind) -> String {
    match kind {
        HitKind::Vertex { index, .. } => format!("vertex {index}"),
        HitKind::Edge { index, parameter, .. } => format!("edge {index} at {parameter:.3}"),
        HitKind::Line { index, parameter, .. } => format!("line {index} at {parameter:.3}"),
        HitKind::Triangle { index, front_face, .. } => {
            format!("triangle {index} ({} face)", if *front_face { "front" } else { "back" })
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logger(args.debug_level.clone().into());

    // Log application startup with version information
    info!("wiretrace - Git Version {} ({})", env!("GIT_HASH"), env!("GIT_DATE"));

    let config = load_config(args.config.as_deref())?;

    if args.print_config {
        print!("{}", config.to_toml_string().context("serializing configuration")?);
        return Ok(());
    }

    if args.width == 0 || args.height == 0 {
        bail!("image size must be non-zero, got {}x{}", args.width, args.height);
    }

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("configuring the worker pool")?;
    }

    info!("Image resolution: {}x{}, scene: {}", args.width, args.height, args.scene.name());

    let model = Model::builtin(args.scene.name()).with_context(|| format!("unknown scene {}", args.scene.name()))?;
    let axes = CoordinateAxes {
        show: config.render.show_coordinate_axes,
        ..Default::default()
    };
    let scene = Scene::from_model(&model, &axes);

    let aspect_ratio = args.width as f32 / args.height as f32;
    let camera = config.camera.to_camera(aspect_ratio).context("building the camera")?;

    let mut renderer = Renderer::new(args.width, args.height);
    renderer.set_show_progress(args.progress);
    let start = std::time::Instant::now();
    renderer.render(&scene, &camera, &config.render, &config.reflection);
    info!("Image generated in {:.2?}", start.elapsed());

    if let Some(pixel) = args.pick {
        if pixel.x >= args.width || pixel.y >= args.height {
            warn!("Pick position {},{} is outside the image", pixel.x, pixel.y);
        } else {
            match camera.screen_to_world_ray(pixel.x as f32, pixel.y as f32, args.width, args.height) {
                Some(ray) => match scene.pick(&ray, &camera, &config.render) {
                    Some(hit) => info!(
                        "Picked {} at distance {:.4} ({:.3}, {:.3}, {:.3})",
                        describe(&hit.kind),
                        hit.distance,
                        hit.point.x,
                        hit.point.y,
                        hit.point.z
                    ),
                    None => info!("Nothing under pixel {},{}", pixel.x, pixel.y),
                },
                None => warn!("Could not build a pick ray for pixel {},{}", pixel.x, pixel.y),
            }
        }
    }

    let image = renderer.into_image();
    save_image(&image, &args.output).with_context(|| format!("writing {}", args.output))?;
    Ok(())
}
