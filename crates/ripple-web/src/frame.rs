use crate::dom;
use ripple_core::{FrameOutcome, RipplePipeline, SkipReason, Viewport};
use ripple_gpu::GpuDevice;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub pipeline: Option<RipplePipeline>,
    pub gpu: Option<GpuDevice<'static>>,
    pub canvas: web::HtmlCanvasElement,
    pub last_skip: Option<SkipReason>,
}

impl FrameContext {
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        if let Some(p) = &mut self.pipeline {
            p.pointer_moved(x, y);
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if let Some(p) = &mut self.pipeline {
            p.resize(viewport.width, viewport.height, viewport.device_pixel_ratio);
        }
    }

    /// Run one frame. Returns `false` once the canvas is gone and everything
    /// has been released.
    pub fn frame(&mut self) -> bool {
        if !self.canvas.is_connected() {
            self.teardown();
            return false;
        }
        let (Some(pipeline), Some(gpu)) = (&mut self.pipeline, &mut self.gpu) else {
            return false;
        };
        // No resize event fires when the canvas gets its first layout after
        // init, so poll its rect until a positive size shows up.
        if pipeline.viewport().current().is_none() {
            if let Some(v) = dom::canvas_viewport(&self.canvas).filter(|v| v.is_ready()) {
                dom::sync_canvas_backing_size(&self.canvas);
                pipeline.resize(v.width, v.height, v.device_pixel_ratio);
            }
        }
        for (slot, image) in crate::take_pending_images() {
            pipeline.set_image(gpu, slot, &image);
        }
        match pipeline.frame(gpu) {
            FrameOutcome::Rendered { .. } => self.last_skip = None,
            FrameOutcome::Skipped(reason) => {
                if self.last_skip != Some(reason) {
                    log::info!("[frame] waiting: {:?}", reason);
                }
                self.last_skip = Some(reason);
            }
        }
        true
    }

    fn teardown(&mut self) {
        if let (Some(pipeline), Some(gpu)) = (self.pipeline.take(), self.gpu.as_mut()) {
            pipeline.shutdown(gpu);
        }
        self.gpu = None;
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !frame_ctx_tick.borrow_mut().frame() {
            log::info!("[frame] canvas detached; render loop stopped");
            return;
        }
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
