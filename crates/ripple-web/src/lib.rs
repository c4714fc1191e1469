#![cfg(target_arch = "wasm32")]
use ripple_core::brush::radial_brush;
use ripple_core::constants::BRUSH_TEXTURE_SIZE;
use ripple_core::{ImageSlot, PhysicalSize, RgbaImage, RippleParams, RipplePipeline};
use ripple_gpu::GpuDevice;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod dom;
mod events;
mod frame;

const CANVAS_ID: &str = "ripple-canvas";

thread_local! {
    // Images handed over by the page; drained at the start of the next frame.
    static PENDING_IMAGES: RefCell<Vec<(ImageSlot, RgbaImage)>> = RefCell::new(Vec::new());
}

pub(crate) fn take_pending_images() -> Vec<(ImageSlot, RgbaImage)> {
    PENDING_IMAGES.with(|q| std::mem::take(&mut *q.borrow_mut()))
}

fn queue_image(slot: ImageSlot, width: u32, height: u32, pixels: Vec<u8>) -> Result<(), JsValue> {
    let image = RgbaImage::new(width, height, pixels).map_err(|e| JsValue::from_str(&e.to_string()))?;
    PENDING_IMAGES.with(|q| q.borrow_mut().push((slot, image)));
    Ok(())
}

/// Hand a decoded background image (RGBA8, row-major) to the renderer.
#[wasm_bindgen]
pub fn set_background_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<(), JsValue> {
    queue_image(ImageSlot::Background, width, height, pixels)
}

/// Replace the built-in radial brush with a decoded sprite (RGBA8, row-major).
#[wasm_bindgen]
pub fn set_brush_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<(), JsValue> {
    queue_image(ImageSlot::Brush, width, height, pixels)
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("ripple-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{CANVAS_ID}"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    let viewport = dom::sync_canvas_backing_size(&canvas);
    let size = viewport
        .map(|v| v.physical_size())
        .unwrap_or(PhysicalSize { width: 1, height: 1 });

    let params = RippleParams::default();
    let mut gpu = GpuDevice::new(
        wgpu::SurfaceTarget::Canvas(canvas.clone()),
        size,
        params.capacity,
    )
    .await?;
    let mut pipeline = RipplePipeline::new(params, rand::random())?;
    pipeline.set_image(&mut gpu, ImageSlot::Brush, &radial_brush(BRUSH_TEXTURE_SIZE));
    // Zero-sized until first layout; the pipeline waits for a real size.
    if let Some(v) = viewport {
        pipeline.resize(v.width, v.height, v.device_pixel_ratio);
    }

    let ctx = Rc::new(RefCell::new(frame::FrameContext {
        pipeline: Some(pipeline),
        gpu: Some(gpu),
        canvas: canvas.clone(),
        last_skip: None,
    }));
    events::wire_input_handlers(&canvas, ctx.clone());
    frame::start_loop(ctx);
    Ok(())
}
