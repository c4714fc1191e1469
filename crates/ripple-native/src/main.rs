use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use ripple_core::brush::radial_brush;
use ripple_core::constants::BRUSH_TEXTURE_SIZE;
use ripple_core::{FrameOutcome, ImageSlot, PhysicalSize, RgbaImage, RippleParams, RipplePipeline};
use ripple_gpu::GpuDevice;
use winit::{event::*, event_loop::EventLoop, window::WindowBuilder};

/// Pointer-driven liquid ripple over a background image.
#[derive(Parser, Debug)]
#[command(name = "ripple", version)]
struct Args {
    /// Background image (PNG or JPEG), cover-fitted to the window.
    #[arg(long)]
    background: PathBuf,

    /// Brush sprite; a procedural radial brush is used when omitted.
    #[arg(long)]
    brush: Option<PathBuf>,

    /// Number of stamps kept in the ring pool.
    #[arg(long, default_value_t = ripple_core::constants::POOL_CAPACITY)]
    capacity: usize,

    /// UV offset of a fully displaced pixel.
    #[arg(long, default_value_t = ripple_core::constants::DISPLACEMENT_STRENGTH)]
    strength: f32,

    /// Seed for the initial stamp rotations.
    #[arg(long)]
    seed: Option<u64>,
}

fn load_rgba(path: &Path) -> anyhow::Result<RgbaImage> {
    let decoded = image::open(path)
        .map_err(|e| anyhow::anyhow!("failed to open {}: {e}", path.display()))?
        .to_rgba8();
    let (width, height) = decoded.dimensions();
    Ok(RgbaImage::new(width, height, decoded.into_raw())?)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let params = RippleParams {
        capacity: args.capacity,
        displacement_strength: args.strength,
        ..RippleParams::default()
    };
    params.validate()?;
    let seed = args.seed.unwrap_or(0x5eed_1e55);

    let background = load_rgba(&args.background)?;
    let brush = match &args.brush {
        Some(path) => load_rgba(path)?,
        None => radial_brush(BRUSH_TEXTURE_SIZE),
    };

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("ripple")
            .with_inner_size(winit::dpi::LogicalSize::new(1024.0, 768.0))
            .build(&event_loop)?,
    );

    let inner = window.inner_size();
    let mut gpu = pollster::block_on(GpuDevice::new(
        window.clone(),
        PhysicalSize {
            width: inner.width,
            height: inner.height,
        },
        params.capacity,
    ))?;
    let mut pipeline = RipplePipeline::new(params, seed)?;
    pipeline.set_image(&mut gpu, ImageSlot::Brush, &brush);
    pipeline.set_image(&mut gpu, ImageSlot::Background, &background);
    report_size(&mut pipeline, &window);

    let mut pipeline = Some(pipeline);
    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CursorMoved { position, .. } => {
                // Pointer positions are logical pixels, like the viewport.
                let scale = window.scale_factor();
                if let Some(p) = pipeline.as_mut() {
                    p.pointer_moved((position.x / scale) as f32, (position.y / scale) as f32);
                }
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(p) = pipeline.as_mut() {
                    report_size(p, &window);
                }
            }
            WindowEvent::CloseRequested => {
                if let Some(p) = pipeline.take() {
                    p.shutdown(&mut gpu);
                }
                elwt.exit();
            }
            _ => {}
        },
        Event::AboutToWait => {
            if let Some(p) = pipeline.as_mut() {
                if let FrameOutcome::Skipped(reason) = p.frame(&mut gpu) {
                    log::trace!("frame skipped: {:?}", reason);
                }
                window.request_redraw();
            }
        }
        _ => {}
    })?;
    Ok(())
}

fn report_size(pipeline: &mut RipplePipeline, window: &winit::window::Window) {
    let scale = window.scale_factor();
    let logical = window.inner_size().to_logical::<f64>(scale);
    pipeline.resize(logical.width as f32, logical.height as f32, scale as f32);
}
