use anyhow::{bail, Result};
use folio_core::{FolioConfig, HeroFrame, HeroScene, PointerId, ScreenPoint};
use tracing::info;

use crate::cli::{HeroCommand, HeroSimulateArgs};

/// Text mode prints one line per this many frames.
const TEXT_EVERY_FRAMES: u32 = 10;

pub fn run(cmd: &HeroCommand, config: &FolioConfig) -> Result<()> {
    match cmd {
        HeroCommand::Simulate(args) => simulate(args, config),
    }
}

/// Frame timing derived from the simulate arguments.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FramePlan {
    fps: f64,
    dt: f32,
    drag_frames: u64,
    max_frames: u64,
}

impl FramePlan {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn new(args: &HeroSimulateArgs) -> Result<Self> {
        if args.fps == 0 {
            bail!("--fps must be positive");
        }
        if !(args.max_seconds.is_finite() && args.max_seconds > 0.0) {
            bail!("--max-seconds must be positive");
        }
        let fps = f64::from(args.fps);
        Ok(Self {
            fps,
            dt: (1.0 / fps) as f32,
            drag_frames: (u64::from(args.drag_ms) * u64::from(args.fps) / 1000).max(1),
            max_frames: (f64::from(args.max_seconds) * fps).ceil() as u64,
        })
    }

    #[allow(clippy::cast_precision_loss)]
    fn time_of(&self, frame: u64) -> f64 {
        (frame + 1) as f64 / self.fps
    }

    /// Fraction of the scripted drag covered after `frame`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn drag_progress(&self, frame: u64) -> f32 {
        ((frame + 1) as f64 / self.drag_frames as f64).min(1.0) as f32
    }
}

fn simulate(args: &HeroSimulateArgs, config: &FolioConfig) -> Result<()> {
    let plan = FramePlan::new(args)?;
    let FramePlan { dt, drag_frames, max_frames, .. } = plan;
    let mut scene = HeroScene::new(config)?;
    let pointer = PointerId(1);

    info!(dx = args.dx, dy = args.dy, drag_frames, fps = args.fps, "Simulating hero drag");
    scene.pointer_down(pointer, ScreenPoint::new(0.0, 0.0), 0.0);

    let mut last = None;
    for n in 0..max_frames {
        let now = plan.time_of(n);
        if n < drag_frames {
            let t = plan.drag_progress(n);
            scene.pointer_move(pointer, ScreenPoint::new(args.dx * t, args.dy * t), now);
        } else if n == drag_frames {
            scene.pointer_up(pointer);
        }

        let frame = scene.frame(dt);
        if args.json {
            println!("{}", serde_json::to_string(&frame)?);
        } else if n % u64::from(TEXT_EVERY_FRAMES) == 0 {
            print_frame(now, &frame);
        }
        last = Some((now, frame));

        if n > drag_frames && scene.rotator().is_at_rest() {
            break;
        }
    }

    if let Some((now, frame)) = last {
        if !args.json {
            print_frame(now, &frame);
        }
        info!(
            seconds = now,
            at_rest = scene.rotator().is_at_rest(),
            active = ?frame.active,
            "Simulation finished"
        );
    }
    Ok(())
}

fn print_frame(now: f64, frame: &HeroFrame) {
    let label = frame
        .label
        .map_or_else(|| "-".to_string(), |l| format!("{} ({:?})", l.skill, l.face));
    println!(
        "t={now:6.3}s pitch={:+.3} yaw={:+.3} speed={:.3} label={label}",
        frame.rotation.x,
        frame.rotation.y,
        frame.angular_velocity.x.abs() + frame.angular_velocity.y.abs(),
    );
}
