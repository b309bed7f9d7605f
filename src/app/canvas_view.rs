use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;

use crate::canvas::Repaint;
use crate::editor::EditResult;
use gtk4::cairo::ImageSurface;
use gtk4::prelude::*;

use super::layout::MainWidgets;
use super::surface::rgba_image_to_cairo_surface;
use super::{refresh_controls, AppRuntime};

/// Swatch circle diameter in pixels for a brush size of 1.0.
const SWATCH_DIAMETER_SCALE: f64 = 50.0;

/// Uploaded copy of the bitmap, keyed by canvas generation and revision.
#[derive(Default)]
struct SurfaceCache {
    key: Option<(u64, u64)>,
    surface: Option<ImageSurface>,
}

fn apply_edit_result(widgets: &MainWidgets, result: EditResult<Repaint>, gesture: &str) {
    match result {
        Ok(repaint) if repaint.is_needed() => widgets.canvas.queue_draw(),
        Ok(_) => {}
        Err(err) => tracing::warn!(%err, gesture, "pointer gesture rejected"),
    }
}

pub(super) fn configure_canvas_view(runtime: &Rc<AppRuntime>, widgets: &Rc<MainWidgets>) {
    let cache = Rc::new(RefCell::new(SurfaceCache::default()));
    let runtime_for_draw = runtime.clone();
    widgets
        .canvas
        .set_draw_func(move |_, context, width, height| {
            if width <= 0 || height <= 0 {
                return;
            }
            runtime_for_draw
                .session
                .borrow_mut()
                .layout(f64::from(width), f64::from(height));

            let session = runtime_for_draw.session.borrow();
            let Some(buffer) = session.canvas() else {
                return;
            };
            let key = (runtime_for_draw.canvas_generation.get(), buffer.revision());
            let mut cache = cache.borrow_mut();
            if cache.key != Some(key) {
                cache.surface = rgba_image_to_cairo_surface(buffer.bitmap());
                cache.key = Some(key);
            }
            let Some(surface) = cache.surface.as_ref() else {
                tracing::warn!("failed to upload canvas bitmap");
                return;
            };

            let source_width = f64::from(buffer.bitmap().width().max(1));
            let source_height = f64::from(buffer.bitmap().height().max(1));
            context.save().ok();
            context.scale(f64::from(width) / source_width, f64::from(height) / source_height);
            if context.set_source_surface(surface, 0.0, 0.0).is_ok() {
                context.paint().ok();
            }
            context.restore().ok();
        });

    let drag = gtk4::GestureDrag::new();
    drag.set_button(gtk4::gdk::BUTTON_PRIMARY);

    {
        let runtime = runtime.clone();
        let widgets = widgets.clone();
        drag.connect_drag_begin(move |_, start_x, start_y| {
            let result = {
                let mut session = runtime.session.borrow_mut();
                session.layout(
                    f64::from(widgets.canvas.width()),
                    f64::from(widgets.canvas.height()),
                );
                session.pointer_down(start_x, start_y)
            };
            apply_edit_result(&widgets, result, "press");
        });
    }

    {
        let runtime = runtime.clone();
        let widgets = widgets.clone();
        drag.connect_drag_update(move |gesture, offset_x, offset_y| {
            let Some((start_x, start_y)) = gesture.start_point() else {
                return;
            };
            let result = runtime
                .session
                .borrow_mut()
                .pointer_drag(start_x + offset_x, start_y + offset_y);
            apply_edit_result(&widgets, result, "drag");
        });
    }

    {
        let runtime = runtime.clone();
        let widgets = widgets.clone();
        drag.connect_drag_end(move |_, _, _| {
            let result = runtime.session.borrow_mut().pointer_up();
            apply_edit_result(&widgets, result, "release");
            refresh_controls(&runtime, &widgets);
        });
    }

    widgets.canvas.add_controller(drag);
}

pub(super) fn configure_swatch(runtime: &Rc<AppRuntime>, widgets: &Rc<MainWidgets>) {
    let runtime = runtime.clone();
    widgets.swatch.set_draw_func(move |_, context, width, height| {
        let brush = runtime.session.borrow().brush();
        let (r, g, b) = brush.color().rgb();
        let diameter = (f64::from(brush.size()) * SWATCH_DIAMETER_SCALE)
            .min(f64::from(width.min(height)));
        context.set_source_rgb(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
        );
        context.arc(
            f64::from(width) / 2.0,
            f64::from(height) / 2.0,
            diameter / 2.0,
            0.0,
            2.0 * PI,
        );
        context.fill().ok();
    });
}
