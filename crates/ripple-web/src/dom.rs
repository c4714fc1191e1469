use ripple_core::Viewport;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Logical canvas size and device pixel ratio as the browser reports them.
pub fn canvas_viewport(canvas: &web::HtmlCanvasElement) -> Option<Viewport> {
    let window = web::window()?;
    let rect = canvas.get_bounding_client_rect();
    Some(Viewport::new(
        rect.width() as f32,
        rect.height() as f32,
        window.device_pixel_ratio() as f32,
    ))
}

/// Match the canvas backing store to the device-pixel size the renderer will
/// configure, so the composite resolution equals the real backbuffer.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> Option<Viewport> {
    let viewport = canvas_viewport(canvas)?;
    let px = viewport.physical_size();
    canvas.set_width(px.width.max(1));
    canvas.set_height(px.height.max(1));
    Some(viewport)
}

/// Pointer position relative to the canvas, in CSS pixels.
#[inline]
pub fn pointer_canvas_css(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> (f32, f32) {
    let rect = canvas.get_bounding_client_rect();
    let x = ev.client_x() as f32 - rect.left() as f32;
    let y = ev.client_y() as f32 - rect.top() as f32;
    (x, y)
}
