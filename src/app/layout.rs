use std::rc::Rc;

use crate::canvas::MIN_BRUSH_SIZE;
use crate::capture::{delay_from_slider, delay_label};
use gtk4::prelude::*;
use gtk4::{
    Align, Application, ApplicationWindow, Box as GtkBox, Button, CheckButton, DrawingArea,
    Label, Orientation, PopoverMenuBar, Scale, ToggleButton,
};

use super::{refresh_controls, AppRuntime, DEFAULT_TITLE};

const DEFAULT_WINDOW_WIDTH: i32 = 960;
const DEFAULT_WINDOW_HEIGHT: i32 = 680;
const SLIDER_STEP: f64 = 0.01;
const SWATCH_SIZE: i32 = 56;

pub(super) struct MainWidgets {
    pub(super) window: ApplicationWindow,
    pub(super) capture_button: Button,
    pub(super) delay_scale: Scale,
    pub(super) delay_label: Label,
    pub(super) hide_check: CheckButton,
    pub(super) palette: GtkBox,
    pub(super) clear_button: Button,
    pub(super) crop_toggle: ToggleButton,
    pub(super) color_scale: Scale,
    pub(super) size_scale: Scale,
    pub(super) swatch: DrawingArea,
    pub(super) canvas: DrawingArea,
    pub(super) placeholder: Label,
}

fn unit_slider(width: i32, value: f64) -> Scale {
    let scale = Scale::with_range(Orientation::Horizontal, 0.0, 1.0, SLIDER_STEP);
    scale.set_draw_value(false);
    scale.set_width_request(width);
    scale.set_value(value);
    scale
}

fn build_menu_bar() -> PopoverMenuBar {
    let file_menu = gtk4::gio::Menu::new();
    for (label, action, accel) in [
        ("Open…", "app.open", "<Control>o"),
        ("Save…", "app.save", "<Control>s"),
        ("Quick Save", "app.quick-save", "<Control><Shift>s"),
        ("Exit", "app.exit", "<Control>q"),
    ] {
        let item = gtk4::gio::MenuItem::new(Some(label), Some(action));
        item.set_attribute_value("accel", Some(&accel.to_variant()));
        file_menu.append_item(&item);
    }

    let menu_model = gtk4::gio::Menu::new();
    menu_model.append_submenu(Some("File"), &file_menu);
    PopoverMenuBar::from_model(Some(&menu_model))
}

pub(super) fn build_main_window(app: &Application, runtime: &AppRuntime) -> MainWidgets {
    let window = ApplicationWindow::new(app);
    window.set_title(Some(DEFAULT_TITLE));
    window.set_default_size(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT);

    let root = GtkBox::new(Orientation::Vertical, 8);
    root.append(&build_menu_bar());

    let controls = GtkBox::new(Orientation::Horizontal, 12);
    controls.set_margin_start(12);
    controls.set_margin_end(12);
    let capture_button = Button::with_label("Take screenshot");
    let delay_scale = unit_slider(120, 0.0);
    let max_delay = runtime.config.max_capture_delay_secs();
    let delay_label = Label::new(Some(&delay_label(delay_from_slider(0.0, max_delay))));
    let hide_check = CheckButton::with_label("Hide window before capture");
    controls.append(&capture_button);
    controls.append(&delay_scale);
    controls.append(&delay_label);
    controls.append(&hide_check);
    root.append(&controls);

    let brush = runtime.session.borrow().brush();
    let palette = GtkBox::new(Orientation::Horizontal, 12);
    palette.set_margin_start(12);
    palette.set_margin_end(12);
    let clear_button = Button::with_label("Clear canvas");
    let crop_toggle = ToggleButton::with_label("Crop");
    let color_scale = unit_slider(200, f64::from(brush.color_value()));
    let size_scale = unit_slider(200, f64::from(brush.size()));
    let swatch = DrawingArea::new();
    swatch.set_content_width(SWATCH_SIZE);
    swatch.set_content_height(SWATCH_SIZE);
    swatch.set_valign(Align::Center);
    palette.append(&clear_button);
    palette.append(&crop_toggle);
    palette.append(&color_scale);
    palette.append(&size_scale);
    palette.append(&swatch);
    root.append(&palette);

    let placeholder = Label::new(Some("Take a screenshot or open an image to start."));
    placeholder.set_vexpand(true);
    placeholder.add_css_class("dim-label");
    root.append(&placeholder);

    let canvas = DrawingArea::new();
    canvas.set_hexpand(true);
    canvas.set_vexpand(true);
    canvas.set_margin_start(12);
    canvas.set_margin_end(12);
    canvas.set_margin_bottom(12);
    root.append(&canvas);

    window.set_child(Some(&root));

    MainWidgets {
        window,
        capture_button,
        delay_scale,
        delay_label,
        hide_check,
        palette,
        clear_button,
        crop_toggle,
        color_scale,
        size_scale,
        swatch,
        canvas,
        placeholder,
    }
}

pub(super) fn connect_palette_controls(runtime: &Rc<AppRuntime>, widgets: &Rc<MainWidgets>) {
    {
        let runtime = runtime.clone();
        let widgets_for_clear = widgets.clone();
        widgets.clear_button.connect_clicked(move |_| {
            let result = runtime.session.borrow_mut().clear();
            match result {
                Ok(repaint) if repaint.is_needed() => widgets_for_clear.canvas.queue_draw(),
                Ok(_) => {}
                Err(err) => tracing::warn!(%err, "clear ignored"),
            }
        });
    }

    {
        let runtime = runtime.clone();
        let widgets_for_crop = widgets.clone();
        widgets.crop_toggle.connect_toggled(move |toggle| {
            let result = {
                let mut session = runtime.session.borrow_mut();
                if toggle.is_active() {
                    session.arm_crop()
                } else {
                    session.disarm_crop()
                }
            };
            if let Err(err) = result {
                tracing::warn!(%err, "crop toggle ignored");
            }
            refresh_controls(&runtime, &widgets_for_crop);
        });
    }

    {
        let runtime = runtime.clone();
        let widgets_for_color = widgets.clone();
        widgets.color_scale.connect_value_changed(move |scale| {
            runtime
                .session
                .borrow_mut()
                .set_brush_color_value(scale.value() as f32);
            widgets_for_color.swatch.queue_draw();
        });
    }

    {
        let runtime = runtime.clone();
        let widgets_for_size = widgets.clone();
        widgets.size_scale.connect_value_changed(move |scale| {
            if scale.value() < f64::from(MIN_BRUSH_SIZE) {
                // Re-enters this handler with the floored value.
                scale.set_value(f64::from(MIN_BRUSH_SIZE));
                return;
            }
            runtime
                .session
                .borrow_mut()
                .set_brush_size(scale.value() as f32);
            widgets_for_size.swatch.queue_draw();
        });
    }

    {
        let max_delay = runtime.config.max_capture_delay_secs();
        let delay_label_widget = widgets.delay_label.clone();
        widgets.delay_scale.connect_value_changed(move |scale| {
            delay_label_widget.set_text(&delay_label(delay_from_slider(scale.value(), max_delay)));
        });
    }
}
