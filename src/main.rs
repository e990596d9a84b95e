// What you SEE:
// • A dark window full of slowly drifting points; close neighbours are joined by thin lines.
// • Drag with Left Mouse: the whole constellation slides a little (parallax).
// • Release: with scatter enabled, every point heads off in a new random direction.
// • P flips parallax direction, T toggles scatter, B cycles the edge policy,
//   Up/Down add/remove points, S saves a PNG, H toggles the HUD. ESC quits.

use clap::Parser;
use constellation::config::{BoundaryPolicy, Config, PointShape};
use constellation::draw::{draw_text_5x7, Drawer};
use constellation::error::Error;
use constellation::field::AnimatedPointField;
use constellation::snapshot;
use constellation::types::{Color, FrameBuffer};
use minifb::Key;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Constellation: drifting points joined by lines, reacting to drags.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// JSON config file; CLI flags below override it.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 800)]
    width: usize,

    #[arg(long, default_value_t = 600)]
    height: usize,

    #[arg(long, default_value_t = 60)]
    fps: usize,

    /// Fixed RNG seed for a reproducible layout.
    #[arg(long)]
    seed: Option<u64>,

    /// Start with the HUD visible.
    #[arg(long, default_value_t = false)]
    hud: bool,

    /// Where S writes PNG snapshots.
    #[arg(long, value_name = "DIR", default_value = ".")]
    snapshot_dir: PathBuf,

    #[arg(long)]
    point_count: Option<usize>,

    #[arg(long)]
    point_radius: Option<i32>,

    /// circle | square (anything else draws circles)
    #[arg(long)]
    shape: Option<String>,

    #[arg(long, value_parser = parse_color)]
    background: Option<Color>,

    #[arg(long, value_parser = parse_color)]
    point_color: Option<Color>,

    #[arg(long, value_parser = parse_color)]
    line_color: Option<Color>,

    #[arg(long)]
    speed_x: Option<i32>,

    #[arg(long)]
    speed_y: Option<i32>,

    /// Connect points closer than this many pixels.
    #[arg(long)]
    distance: Option<i32>,

    #[arg(long)]
    parallax_same_direction: Option<bool>,

    #[arg(long)]
    scatter: Option<bool>,

    #[arg(long, value_enum)]
    boundary: Option<BoundaryPolicy>,
}

fn parse_color(s: &str) -> Result<Color, String> {
    Color::parse_hex(s).ok_or_else(|| format!("expected #RRGGBB, got {s:?}"))
}

impl Cli {
    /// Defaults ← config file ← flags.
    fn resolve_config(&self) -> Result<Config, Error> {
        let mut cfg = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(v) = self.point_count { cfg.point_count = v; }
        if let Some(v) = self.point_radius { cfg.point_radius = v; }
        if let Some(v) = &self.shape { cfg.point_shape = PointShape::parse_lenient(v); }
        if let Some(v) = self.background { cfg.background = v; }
        if let Some(v) = self.point_color { cfg.point_color = v; }
        if let Some(v) = self.line_color { cfg.line_color = v; }
        if let Some(v) = self.speed_x { cfg.speed_x_barrier = v; }
        if let Some(v) = self.speed_y { cfg.speed_y_barrier = v; }
        if let Some(v) = self.distance { cfg.distance_barrier = v; }
        if let Some(v) = self.parallax_same_direction { cfg.parallax_same_direction = v; }
        if let Some(v) = self.scatter { cfg.touch_to_scatter = v; }
        if let Some(v) = self.boundary { cfg.boundary = v; }
        Ok(cfg)
    }
}

fn main() -> Result<(), Error> {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,constellation=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let cli = Cli::parse();
    let cfg = cli.resolve_config()?;
    info!(?cfg, "config resolved");

    /* --- Window + canvas ---
       Visual: an empty window the size you asked for. */
    let mut drawer = Drawer::new("Constellation", cli.width, cli.height, cli.fps)?;
    let mut screen = FrameBuffer::new(cli.width, cli.height);

    let mut field = match cli.seed {
        Some(seed) => AnimatedPointField::with_seed(cfg, seed),
        None => AnimatedPointField::new(cfg),
    };
    field.layout(screen.width as i32, screen.height as i32);

    let mut show_hud = cli.hud;
    let mut frame_no: u64 = 0;
    let mut redraw = true;

    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS 0.0");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Layout again whenever the window changes size.
           Visual: points are re-sprinkled across the new area. */
        let (w, h) = drawer.size();
        if (w, h) != (screen.width, screen.height) && w > 0 && h > 0 {
            screen.resize(w, h);
            field.layout(w as i32, h as i32);
            redraw = true;
        }

        /* 2) Inputs */
        for event in drawer.pointer_events() {
            if field.pointer(event) {
                redraw = true;
            }
        }
        handle_keys(&drawer, &mut field, &mut show_hud);

        /* 3) Step + paint.
           Visual: every point moves one step; lines appear between close pairs. */
        if redraw {
            let report = field.step_frame(&mut screen);
            redraw = report.redraw;
            frame_no += 1;

            if show_hud {
                let hud = format!(
                    "{} | PTS {} | LNS {} | {}",
                    hud_fps_text,
                    report.points_drawn,
                    report.lines_drawn,
                    boundary_label(field.boundary()),
                );
                draw_text_5x7(&mut screen, 8, 8, &hud, 0x00_FF_FF_FF);
            }
        }

        if drawer.key_pressed_once(Key::S) {
            match snapshot::save_png(&screen, &cli.snapshot_dir, frame_no) {
                Ok(path) => info!(path = %path.display(), "snapshot saved"),
                Err(e) => warn!(error = %e, "snapshot failed"),
            }
        }

        /* 4) Present to the window. */
        drawer.present(&screen)?;

        /* 5) FPS counter (log + HUD once per second) */
        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let fps = frames_this_second as f32 / now.duration_since(last_fps_time).as_secs_f32();
            debug!(fps = f64::from(fps), "frame rate");
            hud_fps_text = format!("FPS {:.1}", fps);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    info!(frames = frame_no, "window closed");
    Ok(())
}

/// Runtime tuning through the field's mutators.
fn handle_keys(drawer: &Drawer, field: &mut AnimatedPointField, show_hud: &mut bool) {
    if drawer.key_pressed_once(Key::P) {
        field.set_parallax_same_direction(!field.parallax_same_direction());
        info!(same_direction = field.parallax_same_direction(), "parallax direction");
    }
    if drawer.key_pressed_once(Key::T) {
        field.set_touch_to_scatter(!field.touch_to_scatter());
        info!(enabled = field.touch_to_scatter(), "scatter on release");
    }
    if drawer.key_pressed_once(Key::B) {
        field.set_boundary(field.boundary().next());
        info!(policy = ?field.boundary(), "boundary policy");
    }
    if drawer.key_pressed_once(Key::Up) {
        field.set_point_count(field.point_count() + 5);
    }
    if drawer.key_pressed_once(Key::Down) {
        field.set_point_count(field.point_count().saturating_sub(5));
    }
    if drawer.key_pressed_once(Key::H) {
        *show_hud = !*show_hud;
    }
}

fn boundary_label(policy: BoundaryPolicy) -> &'static str {
    match policy {
        BoundaryPolicy::Legacy => "LEGACY",
        BoundaryPolicy::Wrap => "WRAP",
        BoundaryPolicy::Reflect => "REFLECT",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "constellation",
            "--point-count", "7",
            "--shape", "Triangle",
            "--line-color", "#00FF00",
            "--scatter", "true",
            "--boundary", "wrap",
        ]);
        let cfg = cli.resolve_config().unwrap();
        assert_eq!(cfg.point_count, 7);
        assert_eq!(cfg.point_shape, PointShape::Circle);
        assert_eq!(cfg.line_color, Color(0x00FF00));
        assert!(cfg.touch_to_scatter);
        assert_eq!(cfg.boundary, BoundaryPolicy::Wrap);
        assert_eq!(cfg.distance_barrier, Config::default().distance_barrier);
    }

    #[test]
    fn bad_colour_flag_is_rejected() {
        assert!(Cli::try_parse_from(["constellation", "--background", "blue"]).is_err());
    }

    #[test]
    fn flags_win_over_file() {
        let path = std::env::temp_dir().join(format!("constellation-cli-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "pointCount": 3, "distanceBarrier": 42 }"#).unwrap();
        let cli = Cli::parse_from([
            "constellation".into(),
            "--config".into(),
            path.display().to_string(),
            "--point-count".into(),
            "9".into(),
        ]);
        let cfg = cli.resolve_config().unwrap();
        assert_eq!(cfg.point_count, 9);
        assert_eq!(cfg.distance_barrier, 42);
        let _ = std::fs::remove_file(&path);
    }
}
