//! Raycaster entry point
//!
//! Headless driver: builds the default scene, runs a number of frames with
//! optional scripted key input, and writes the last frame as a PNG.
//!
//! Usage:
//!   raycaster --frames 120 --script wwwwaaaa --procedural-texture
//!   RUST_LOG=debug raycaster --texture textures.png --output frame.png

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::{Path, PathBuf};
    use std::time::Instant;

    use anyhow::{Context, Result, bail};
    use clap::{ArgGroup, Parser};

    use raycaster::renderer::{Renderer, TextureAtlas};
    use raycaster::sim::{Action, Grid, Player, TickInput, World, tick};
    use raycaster::{FrameTimes, Settings};

    /// Seed for the built-in atlas (`--procedural-texture`)
    const PROCEDURAL_SEED: u64 = 0x5eed;
    /// Frames between metrics log lines
    const METRICS_INTERVAL: u64 = 30;

    #[derive(Parser)]
    #[command(name = "raycaster")]
    #[command(about = "Render a 2.5D raycast scene to a PNG")]
    #[command(group(
        ArgGroup::new("atlas")
            .required(true)
            .args(["texture", "procedural_texture"])
    ))]
    struct Args {
        /// Number of frames to simulate
        #[arg(long, default_value_t = 1)]
        frames: u64,

        /// One key per frame (a/d turn, w/s move, q/e strafe, h/n fov,
        /// p perspective, m metrics); any other character idles
        #[arg(long, default_value = "")]
        script: String,

        /// Texture atlas image (two rows of 64x64 blocks)
        #[arg(long)]
        texture: Option<PathBuf>,

        /// Use the built-in generated atlas
        #[arg(long)]
        procedural_texture: bool,

        /// Settings file (JSON); defaults are used if it doesn't exist
        #[arg(long, default_value = "raycaster.json")]
        settings: PathBuf,

        /// Where to write the last frame
        #[arg(long, default_value = "frame.png")]
        output: PathBuf,
    }

    fn load_atlas(path: &Path) -> Result<TextureAtlas> {
        let image = image::open(path)
            .with_context(|| format!("failed to load texture atlas {}", path.display()))?
            .to_rgb8();
        let (width, height) = image.dimensions();
        let atlas = TextureAtlas::from_rgb8(width as usize, height as usize, image.as_raw())
            .with_context(|| format!("unusable texture atlas {}", path.display()))?;
        log::info!("Loaded texture atlas {} ({width}x{height})", path.display());
        Ok(atlas)
    }

    /// Pick the atlas from whichever source was given
    fn choose_atlas(args: &Args) -> Result<TextureAtlas> {
        match (&args.texture, args.procedural_texture) {
            (None, true) => {
                log::info!("Using procedural texture atlas");
                Ok(TextureAtlas::procedural(PROCEDURAL_SEED))
            }
            (Some(path), false) => load_atlas(path),
            (Some(_), true) => bail!("--texture and --procedural-texture are mutually exclusive"),
            (None, false) => bail!("no texture atlas: pass --texture PATH or --procedural-texture"),
        }
    }

    fn log_metrics(frame: u64, times: &FrameTimes) {
        if let (Some(last), Some(avg), Some(fps)) = (times.last(), times.average(), times.fps()) {
            log::info!("frame {frame}: {last:.2} ms (avg {avg:.2} ms, {fps:.1} fps)");
        }
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let args = Args::parse();

        if args.frames == 0 {
            bail!("--frames must be at least 1");
        }

        let settings = Settings::load(&args.settings)?;
        let atlas = choose_atlas(&args)?;

        let mut world = World::new(Grid::default(), Player::default(), settings.view);
        atlas.ensure_covers(&world.grid)?;
        let renderer = Renderer::new(atlas, settings.render);
        let mut times = FrameTimes::new(renderer.settings().side_panel_width);
        let mut script = args.script.chars();

        log::info!("Raycaster starting: {} frames", args.frames);

        let mut frame = None;
        for n in 0..args.frames {
            let start = Instant::now();
            frame = Some(renderer.render_frame(&world));

            let input = script
                .next()
                .and_then(Action::from_key)
                .map(TickInput::single)
                .unwrap_or_default();
            let hit = tick(&mut world, &input);
            log::debug!(
                "frame {n}: {:?} -> pos ({:.3}, {:.3}) angle {:.2} collision {:?}",
                input.actions,
                world.player.pos.x,
                world.player.pos.y,
                world.player.angle(),
                hit
            );

            times.push(start.elapsed().as_secs_f64() * 1000.0);
            if world.view.metrics && (n + 1) % METRICS_INTERVAL == 0 {
                log_metrics(n + 1, &times);
            }
        }
        if world.view.metrics {
            log_metrics(args.frames, &times);
        }

        let Some(frame) = frame else {
            bail!("no frame rendered");
        };
        let image = image::RgbImage::from_raw(
            frame.width() as u32,
            frame.height() as u32,
            frame.to_rgb_bytes(),
        )
        .context("frame buffer size mismatch")?;
        image
            .save(&args.output)
            .with_context(|| format!("failed to write {}", args.output.display()))?;

        log::info!(
            "Wrote {}x{} frame to {} (player at {:.2}, {:.2} facing {:.1})",
            frame.width(),
            frame.height(),
            args.output.display(),
            world.player.pos.x,
            world.player.pos.y,
            world.player.angle()
        );
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn parse(argv: &[&str]) -> Result<Args, clap::Error> {
            Args::try_parse_from(std::iter::once("raycaster").chain(argv.iter().copied()))
        }

        #[test]
        fn test_atlas_source_required() {
            assert!(parse(&[]).is_err());
            assert!(parse(&["--frames", "3"]).is_err());
        }

        #[test]
        fn test_atlas_sources_exclusive() {
            assert!(parse(&["--texture", "a.png", "--procedural-texture"]).is_err());
        }

        #[test]
        fn test_procedural_flag_selects_generated_atlas() {
            let args = parse(&["--procedural-texture"]).unwrap();
            let atlas = choose_atlas(&args).unwrap();
            assert_eq!(atlas, TextureAtlas::procedural(PROCEDURAL_SEED));
        }

        #[test]
        fn test_missing_texture_file_is_fatal() {
            let args = parse(&["--texture", "/nonexistent/raycaster-atlas.png"]).unwrap();
            assert!(choose_atlas(&args).is_err());
        }

        #[test]
        fn test_no_source_bails() {
            let mut args = parse(&["--procedural-texture"]).unwrap();
            args.procedural_texture = false;
            let err = choose_atlas(&args).unwrap_err();
            assert!(err.to_string().contains("no texture atlas"));
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end; the library is usable on its own
}
