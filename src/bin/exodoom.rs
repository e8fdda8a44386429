//! Ray-cast view of the built-in map.
//!
//! ```bash
//! cargo run --release -- --width 800 --height 600
//! cargo run --release -- --multiboot mbinfo.bin --pattern sanity
//! cargo run --release -- --replay keys.bin --frames 200
//! ```

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use glam::IVec2;
use minifb::{Key, Window, WindowOptions};
use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use exodoom_rs::{
    boot::BootInfo,
    engine::{Headless, RenderSession, SessionConfig},
    input::{InputEvent, InputSource, ScancodeInput},
    renderer::{Display, Framebuffer, Pixel, Rgb, SurfaceInfo},
    world::{Camera, Map},
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Surface width in pixels (ignored with --multiboot)
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Surface height in pixels (ignored with --multiboot)
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Window pixel scale
    #[arg(long, value_enum, default_value_t = WindowScale::X1)]
    scale: WindowScale,

    /// Window frame-rate cap
    #[arg(long, default_value_t = 35)]
    fps: usize,

    /// Start tile, x
    #[arg(long, default_value_t = 22)]
    start_x: i32,

    /// Start tile, y
    #[arg(long, default_value_t = 12)]
    start_y: i32,

    /// Show a calibration screen instead of the map
    #[arg(long, value_enum, default_value_t = Pattern::None)]
    pattern: Pattern,

    /// Take surface geometry from a Multiboot-1 info dump
    #[arg(long, value_name = "FILE")]
    multiboot: Option<PathBuf>,

    /// Run without a window, feeding raw set-1 scan codes from FILE
    #[arg(long, value_name = "FILE")]
    replay: Option<PathBuf>,

    /// Stop after N frames (replay default: one per scan-code byte)
    #[arg(long, value_name = "N")]
    frames: Option<u64>,

    /// Log filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Pattern {
    None,
    Sanity,
    Lanes,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum WindowScale {
    #[value(name = "1")]
    X1,
    #[value(name = "2")]
    X2,
    #[value(name = "4")]
    X4,
}

impl From<WindowScale> for minifb::Scale {
    fn from(s: WindowScale) -> Self {
        match s {
            WindowScale::X1 => minifb::Scale::X1,
            WindowScale::X2 => minifb::Scale::X2,
            WindowScale::X4 => minifb::Scale::X4,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    init_tracing(&opts.log_level);

    // ─────────── surface geometry ─────
    let info = match &opts.multiboot {
        Some(path) => {
            let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            let boot = BootInfo::parse(&bytes)
                .with_context(|| format!("parsing multiboot info {}", path.display()))?;
            boot.log();
            boot.surface()
        }
        None => SurfaceInfo::packed(opts.width, opts.height),
    };

    // refuse bad geometry before sizing memory from it
    info.validate().context("framebuffer setup")?;
    let words = info.required_words();
    let mut front: Vec<Pixel> = Vec::new();
    front
        .try_reserve_exact(words)
        .with_context(|| format!("allocating a {words}-word front surface"))?;
    front.resize(words, 0);
    let mut fb = Framebuffer::new(&mut front, info).context("framebuffer setup")?;
    fb.clear(Rgb::BLACK);

    // ─────────── session ──────────────
    let map = Map::reference();
    let start = IVec2::new(opts.start_x, opts.start_y);
    if !map.is_open(start) {
        bail!("start tile ({}, {}) is not open floor", start.x, start.y);
    }
    let mut session = RenderSession::new(map, Camera::spawn(start), SessionConfig::default());

    match &opts.replay {
        Some(path) => replay(&opts, path, &mut session, &mut fb),
        None => interactive(&opts, &mut session, &mut fb),
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Draw the requested calibration screen into the front surface.
/// Returns `false` when no pattern was asked for.
fn draw_pattern(pattern: Pattern, fb: &mut Framebuffer<'_>) -> bool {
    match pattern {
        Pattern::None => return false,
        Pattern::Sanity => fb.color_sanity(),
        Pattern::Lanes => fb.byte_lane_probe(),
    }
    fb.present();
    info!(?pattern, checksum = format_args!("{:016x}", fb.checksum()), "pattern drawn");
    true
}

/*──────────────────────────── headless ────────────────────────────*/

fn replay(
    opts: &Opts,
    path: &Path,
    session: &mut RenderSession,
    fb: &mut Framebuffer<'_>,
) -> anyhow::Result<()> {
    if draw_pattern(opts.pattern, fb) {
        return Ok(());
    }

    let codes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let frames = opts.frames.unwrap_or(codes.len() as u64);
    info!(bytes = codes.len(), frames, "replaying scan codes");

    let mut host = Headless::new(ScancodeInput::new(codes));
    for _ in 0..frames {
        let report = session.run_frame(fb, &mut host)?;
        if let Some(ev) = report.event {
            debug!(frame = report.frame, ?ev, "replayed");
        }
    }

    let cam = session.camera();
    info!(
        frames = session.frame(),
        x = cam.pos().x.raw(),
        y = cam.pos().y.raw(),
        dir_x = cam.dir().x.raw(),
        dir_y = cam.dir().y.raw(),
        checksum = format_args!("{:016x}", fb.checksum()),
        "replay finished"
    );
    Ok(())
}

/*──────────────────────────── windowed ────────────────────────────*/

/// minifb window acting as both scanout and keyboard.
struct WindowHost {
    win: Window,
    width: usize,
    /// Tightly packed copy for surfaces whose pitch has padding.
    packed: Vec<Pixel>,
}

impl WindowHost {
    fn open(width: usize, height: usize, scale: WindowScale, fps: usize) -> anyhow::Result<Self> {
        let mut win = Window::new(
            "exodoom",
            width,
            height,
            WindowOptions {
                scale: scale.into(),
                ..WindowOptions::default()
            },
        )?;
        win.set_target_fps(fps);
        Ok(Self {
            win,
            width,
            packed: Vec::new(),
        })
    }

    fn is_open(&self) -> bool {
        self.win.is_open() && !self.win.is_key_down(Key::Escape)
    }
}

impl Display for WindowHost {
    type Error = minifb::Error;

    fn scanout(&mut self, front: &[Pixel], stride: usize, height: usize) -> Result<(), minifb::Error> {
        let w = self.width;
        if stride == w {
            return self.win.update_with_buffer(&front[..w * height], w, height);
        }
        self.packed.clear();
        for row in front.chunks_exact(stride).take(height) {
            self.packed.extend_from_slice(&row[..w]);
        }
        self.win.update_with_buffer(&self.packed, w, height)
    }
}

impl InputSource for WindowHost {
    /// One held key per frame, movement first.
    fn poll(&mut self) -> Option<InputEvent> {
        const BINDINGS: [(Key, InputEvent); 8] = [
            (Key::Up, InputEvent::MoveForward),
            (Key::W, InputEvent::MoveForward),
            (Key::Down, InputEvent::MoveBackward),
            (Key::S, InputEvent::MoveBackward),
            (Key::Left, InputEvent::TurnLeft),
            (Key::Right, InputEvent::TurnRight),
            (Key::A, InputEvent::StrafeLeft),
            (Key::D, InputEvent::StrafeRight),
        ];
        BINDINGS
            .iter()
            .find(|(key, _)| self.win.is_key_down(*key))
            .map(|&(_, ev)| ev)
    }
}

fn interactive(
    opts: &Opts,
    session: &mut RenderSession,
    fb: &mut Framebuffer<'_>,
) -> anyhow::Result<()> {
    let mut host = WindowHost::open(fb.width() as usize, fb.height() as usize, opts.scale, opts.fps)?;

    if draw_pattern(opts.pattern, fb) {
        while host.is_open() {
            host.scanout(fb.front(), fb.stride(), fb.height() as usize)?;
        }
        return Ok(());
    }

    // ────────────────── frame timing ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0u32;
    let mut last_print = Instant::now();

    while host.is_open() && opts.frames.is_none_or(|n| session.frame() < n) {
        let t0 = Instant::now();
        session.run_frame(fb, &mut host)?;

        acc_time += t0.elapsed();
        acc_frames += 1;
        if last_print.elapsed() >= Duration::from_secs(1) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / f64::from(acc_frames);
            debug!(avg_ms = format_args!("{avg_ms:.2}"), frames = acc_frames, "frame time");
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }

    let cam = session.camera();
    info!(frames = session.frame(), tile = ?cam.tile(), "window closed");
    Ok(())
}
