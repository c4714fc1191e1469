use crate::dom;
use crate::frame::FrameContext;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire_input_handlers(canvas: &web::HtmlCanvasElement, ctx: Rc<RefCell<FrameContext>>) {
    wire_pointermove(canvas, ctx.clone());
    wire_resize(canvas, ctx);
}

fn wire_pointermove(canvas: &web::HtmlCanvasElement, ctx: Rc<RefCell<FrameContext>>) {
    let canvas = canvas.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        // Only the primary pointer drives the effect.
        if !ev.is_primary() {
            return;
        }
        let (x, y) = dom::pointer_canvas_css(&ev, &canvas);
        if let Ok(mut c) = ctx.try_borrow_mut() {
            c.pointer_moved(x, y);
        }
    }) as Box<dyn FnMut(_)>);

    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn wire_resize(canvas: &web::HtmlCanvasElement, ctx: Rc<RefCell<FrameContext>>) {
    let canvas = canvas.clone();
    let closure = Closure::wrap(Box::new(move || {
        if let Some(viewport) = dom::sync_canvas_backing_size(&canvas) {
            if let Ok(mut c) = ctx.try_borrow_mut() {
                c.resize(viewport);
            }
        }
    }) as Box<dyn FnMut()>);

    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
