use anyhow::bail;
use clap::{Parser, Subcommand};
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use surface_assets::{DemoTextures, DirSource, TextureLoader, TextureManifest, TextureState};
use surface_render::{DebugTextRenderer, OrbitControls, PerspectiveCamera, Renderer};
use surface_scene::{Clock, DemoScene, FrameLoop, ManualClock, Material, MaterialKind};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "surface-cli", about = "Headless tool for the material showcase")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate info and the demo scene
    Info,
    /// Load every demo texture from a directory and report the outcome
    Assets {
        /// Asset root directory
        #[arg(short, long, default_value = "static")]
        root: PathBuf,
        /// How long to wait for loads to finish
        #[arg(long, default_value = "5000")]
        timeout_ms: u64,
    },
    /// Run the frame loop on a simulated clock and print the final frame
    Simulate {
        /// Simulated duration, at most one hour
        #[arg(short, long, default_value = "10", value_parser = parse_seconds)]
        seconds: f32,
        /// Simulated frame rate
        #[arg(short, long, default_value = "60", value_parser = clap::value_parser!(u32).range(1..=1000))]
        fps: u32,
        /// Material model
        #[arg(short, long, default_value = "standard")]
        material: MaterialKind,
    },
}

const MAX_SIMULATED_SECONDS: f32 = 3600.0;

fn parse_seconds(arg: &str) -> Result<f32, String> {
    let seconds: f32 = arg.parse().map_err(|e| format!("{e}"))?;
    if !seconds.is_finite() || !(0.0..=MAX_SIMULATED_SECONDS).contains(&seconds) {
        return Err(format!("expected 0 to {MAX_SIMULATED_SECONDS} seconds, got {arg}"));
    }
    Ok(seconds)
}

/// Per-texture report lines plus the number of textures that did not load.
fn check_assets(root: &Path, timeout: Duration) -> (String, usize) {
    let manifest = TextureManifest::demo();
    let mut loader = TextureLoader::new(DirSource::new(root));
    DemoTextures::request(&mut loader, &manifest);
    let all_resolved = loader.wait_all(timeout);
    if !all_resolved {
        tracing::warn!("timed out after {}ms", timeout.as_millis());
    }

    let mut out = String::new();
    let mut failed = 0;
    for (name, path) in manifest.entries() {
        // Repeated loads return the handle already in flight.
        let handle = loader.load(path);
        let _ = match handle.state() {
            TextureState::Ready(image) => writeln!(
                out,
                "ready    {name:<28} {}x{} {path}",
                image.width, image.height
            ),
            TextureState::Failed(reason) => {
                failed += 1;
                writeln!(out, "FAILED   {name:<28} {reason}")
            }
            TextureState::Pending => {
                failed += 1;
                writeln!(out, "pending  {name:<28} {path}")
            }
        };
    }
    (out, failed)
}

/// Material for headless runs; no textures are loaded.
fn headless_material(kind: MaterialKind) -> Material {
    match kind {
        MaterialKind::Standard => Material::standard(
            surface_scene::demo::DEFAULT_METALNESS,
            surface_scene::demo::DEFAULT_ROUGHNESS,
        ),
        other => Material::new(other),
    }
}

/// Step the demo `frames` times at `fps` and render the last frame as text.
fn simulate(seconds: f32, fps: u32, kind: MaterialKind) -> String {
    let fps = fps.max(1);
    let frames = (seconds.max(0.0) * fps as f32).round() as u64;
    let step = Duration::from_secs_f64(1.0 / fps as f64);

    let clock = ManualClock::new();
    let mut frame_loop = FrameLoop::new(Clock::new(clock.clone()));
    let mut demo = DemoScene::build(headless_material(kind));
    let mut camera = PerspectiveCamera::default();
    let mut controls = OrbitControls::new();

    for _ in 0..frames {
        clock.advance(step);
        frame_loop.advance(&mut demo.scene);
        controls.update(&mut camera);
    }
    // Land exactly on the requested time so the printed angles are exact.
    clock.set(Duration::from_secs_f32(seconds.max(0.0)));
    let stamp = frame_loop.advance(&mut demo.scene);
    controls.update(&mut camera);

    let mut out = format!("frame {} at t={:.3}s\n", stamp.index, stamp.elapsed);
    out.push_str(&DebugTextRenderer::new().render(&demo.scene, &camera));
    out
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("surface-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("scene: {}", surface_scene::crate_info());
            println!("assets: {}", surface_assets::crate_info());
            println!("render: {}", surface_render::crate_info());
            println!("input: {}", surface_input::crate_info());
            println!("tools: {}", surface_tools::crate_info());
            println!();
            let demo = DemoScene::build(headless_material(MaterialKind::Standard));
            for node in demo.scene.nodes() {
                let mesh = node.geometry.build();
                println!(
                    "{:<8} {} vertices, {} triangles",
                    node.name,
                    mesh.vertex_count(),
                    mesh.triangle_count()
                );
            }
            println!("textures: {}", TextureManifest::demo().entries().len());
        }
        Commands::Assets { root, timeout_ms } => {
            let (report, failed) = check_assets(&root, Duration::from_millis(timeout_ms));
            print!("{report}");
            if failed > 0 {
                bail!("{failed} texture(s) did not load from {}", root.display());
            }
            println!("all textures loaded");
        }
        Commands::Simulate {
            seconds,
            fps,
            material,
        } => {
            print!("{}", simulate(seconds, fps, material));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulate_reports_exact_rotation() {
        let out = simulate(10.0, 30, MaterialKind::Standard);
        assert!(out.contains("frame 300 at t=10.000s"));
        assert_eq!(out.matches("rot=(1.0000, 1.0000, 0.0000)").count(), 3);
        assert!(out.contains("metalness=0.7000 roughness=0.2000"));
    }

    #[test]
    fn simulate_zero_seconds_is_first_frame() {
        let out = simulate(0.0, 60, MaterialKind::Toon);
        assert!(out.contains("frame 0 at t=0.000s"));
        assert!(out.contains("(toon)"));
    }

    #[test]
    fn seconds_must_be_finite_and_bounded() {
        assert_eq!(parse_seconds("2.5"), Ok(2.5));
        assert_eq!(parse_seconds("0"), Ok(0.0));
        assert!(parse_seconds("inf").is_err());
        assert!(parse_seconds("NaN").is_err());
        assert!(parse_seconds("-1").is_err());
        assert!(parse_seconds("1e9").is_err());
        assert!(parse_seconds("ten").is_err());
    }

    #[test]
    fn cli_rejects_unbounded_runs() {
        assert!(Cli::try_parse_from(["surface-cli", "simulate", "--seconds", "inf"]).is_err());
        assert!(Cli::try_parse_from(["surface-cli", "simulate", "--fps", "0"]).is_err());
        let cli = Cli::try_parse_from(["surface-cli", "simulate", "--seconds", "3", "--fps", "30"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Simulate { seconds, fps: 30, .. } if seconds == 3.0
        ));
    }

    #[test]
    fn missing_assets_are_all_reported() {
        let dir = tempfile::tempdir().unwrap();
        let (report, failed) = check_assets(dir.path(), Duration::from_secs(5));
        assert_eq!(failed, TextureManifest::demo().entries().len());
        assert_eq!(report.lines().count(), failed);
        assert!(report.lines().all(|l| l.starts_with("FAILED")));
    }
}
