use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

use crate::canvas::{Brush, CanvasBuffer, Repaint};
use crate::config::AppConfig;
use crate::editor::{EditResult, EditSession};
use crate::error::{AppError, AppResult};
use crate::storage::StorageService;
use gtk4::prelude::*;
use gtk4::Application;

mod actions;
mod canvas_view;
mod capture_flow;
mod input_bridge;
mod layout;
mod surface;
mod worker;

use self::actions::{connect_key_shortcuts, install_app_actions};
use self::canvas_view::{configure_canvas_view, configure_swatch};
use self::capture_flow::connect_capture_controls;
use self::layout::{build_main_window, connect_palette_controls, MainWidgets};

const APP_ID: &str = "io.github.slimshot.SlimShot";
const DEFAULT_TITLE: &str = "SlimShot";

/// Everything the signal handlers share. Lives on the GTK main thread only.
pub(super) struct AppRuntime {
    config: AppConfig,
    session: RefCell<EditSession>,
    storage: StorageService,
    capture_running: Cell<bool>,
    canvas_generation: Cell<u64>,
}

impl AppRuntime {
    fn new(config: AppConfig, storage: StorageService) -> Self {
        let brush = Brush::new(0.0, config.default_brush_size());
        let session = EditSession::new(brush, config.stroke_mode());
        Self {
            config,
            session: RefCell::new(session),
            storage,
            capture_running: Cell::new(false),
            canvas_generation: Cell::new(0),
        }
    }

    fn install_canvas(&self, canvas: CanvasBuffer) -> EditResult<Repaint> {
        let repaint = self.session.borrow_mut().install_canvas(canvas)?;
        self.canvas_generation
            .set(self.canvas_generation.get().wrapping_add(1));
        Ok(repaint)
    }

    fn has_canvas(&self) -> bool {
        self.session.borrow().has_canvas()
    }

    fn crop_engaged(&self) -> bool {
        self.session.borrow().mode().is_crop_armed()
    }

    /// Pointer editing is off while a capture is in flight, so no crop drag
    /// can be holding the session when the new image arrives.
    fn accepts_canvas_input(&self) -> bool {
        !self.capture_running.get()
    }
}

/// Brings widget visibility and toggle state in line with the session.
fn refresh_controls(runtime: &AppRuntime, widgets: &MainWidgets) {
    let has_canvas = runtime.has_canvas();
    widgets.palette.set_visible(has_canvas);
    widgets.canvas.set_visible(has_canvas);
    widgets.canvas.set_sensitive(runtime.accepts_canvas_input());
    widgets.placeholder.set_visible(!has_canvas);
    widgets
        .capture_button
        .set_sensitive(!runtime.capture_running.get());

    let crop_engaged = runtime.crop_engaged();
    if widgets.crop_toggle.is_active() != crop_engaged {
        widgets.crop_toggle.set_active(crop_engaged);
    }
    widgets.canvas.queue_draw();
    widgets.swatch.queue_draw();
}

fn initialize_storage_service() -> StorageService {
    StorageService::with_default_paths().unwrap_or_else(|err| {
        tracing::warn!(?err, "home directory unavailable; quick saves go to working directory");
        StorageService::with_home(PathBuf::from("."))
    })
}

fn gtk_launch_args() -> Vec<String> {
    std::env::args().take(1).collect()
}

pub struct App {
    config: AppConfig,
}

impl App {
    pub(crate) fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn start(self) -> AppResult<()> {
        let runtime = Rc::new(AppRuntime::new(self.config, initialize_storage_service()));

        tracing::info!("starting gtk runtime");
        let application = Application::new(
            Some(APP_ID),
            gtk4::gio::ApplicationFlags::NON_UNIQUE,
        );

        let activate_once = Rc::new(Cell::new(false));
        application.connect_activate(move |app| {
            if activate_once.replace(true) {
                tracing::debug!("ignoring duplicate gtk activate signal");
                return;
            }

            let widgets = Rc::new(build_main_window(app, &runtime));
            install_app_actions(app, &runtime, &widgets);
            connect_key_shortcuts(app, &runtime, &widgets);
            connect_capture_controls(&runtime, &widgets);
            connect_palette_controls(&runtime, &widgets);
            configure_canvas_view(&runtime, &widgets);
            configure_swatch(&runtime, &widgets);
            refresh_controls(&runtime, &widgets);

            tracing::info!("presenting main window");
            widgets.window.present();
        });

        let status = application.run_with_args(&gtk_launch_args());
        if status != gtk4::glib::ExitCode::SUCCESS {
            return Err(AppError::Gtk(format!("{status:?}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn runtime() -> AppRuntime {
        let dir = std::env::temp_dir().join("slimshot-app-runtime");
        AppRuntime::new(
            AppConfig::default(),
            StorageService::with_paths(dir.clone(), dir.join("SlimShot.ini")),
        )
    }

    #[test]
    fn canvas_input_is_blocked_while_capture_runs() {
        let runtime = runtime();
        assert!(runtime.accepts_canvas_input());

        runtime.capture_running.set(true);
        assert!(!runtime.accepts_canvas_input());

        runtime.capture_running.set(false);
        assert!(runtime.accepts_canvas_input());
    }

    #[test]
    fn install_canvas_bumps_generation() {
        let runtime = runtime();
        assert!(!runtime.has_canvas());

        let canvas = CanvasBuffer::new(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255])));
        let _ = runtime.install_canvas(canvas).expect("install");

        assert!(runtime.has_canvas());
        assert_eq!(runtime.canvas_generation.get(), 1);
    }
}
