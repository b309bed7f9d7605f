use std::rc::Rc;

use crate::capture::{
    delay_from_slider, finish_capture, prepare_capture, run_capture_sequence, CaptureError,
    CaptureRequest, CaptureWindow, SystemCaptureBackend,
};
use crate::notification;
use gtk4::prelude::*;
use gtk4::ApplicationWindow;

use super::layout::MainWidgets;
use super::worker::spawn_worker_action;
use super::{refresh_controls, AppRuntime, DEFAULT_TITLE};

impl CaptureWindow for ApplicationWindow {
    fn set_hidden(&self, hidden: bool) {
        self.set_visible(!hidden);
        if !hidden {
            self.present();
        }
    }
}

fn capture_request(runtime: &AppRuntime, widgets: &MainWidgets) -> CaptureRequest {
    let delay = delay_from_slider(
        widgets.delay_scale.value(),
        runtime.config.max_capture_delay_secs(),
    );
    CaptureRequest::new(delay, widgets.hide_check.is_active())
        .with_hide_grace(runtime.config.hide_grace())
}

fn start_capture(runtime: &Rc<AppRuntime>, widgets: &Rc<MainWidgets>) {
    if runtime.capture_running.replace(true) {
        tracing::debug!("capture already running; ignoring request");
        return;
    }
    let request = capture_request(runtime, widgets);
    tracing::info!(
        delay_ms = request.delay.as_millis() as u64,
        hide_self = request.hide_self,
        "starting capture"
    );
    prepare_capture(&widgets.window, &request);
    refresh_controls(runtime, widgets);

    let runtime = runtime.clone();
    let widgets = widgets.clone();
    spawn_worker_action(
        move || run_capture_sequence(&SystemCaptureBackend, &request, std::thread::sleep),
        move |result| {
            finish_capture(&widgets.window, &request);
            runtime.capture_running.set(false);

            match result.unwrap_or(Err(CaptureError::WorkerDisconnected)) {
                Ok(canvas) => match runtime.install_canvas(canvas) {
                    Ok(_) => widgets.window.set_title(Some(DEFAULT_TITLE)),
                    Err(err) => notification::capture_discarded(&err),
                },
                Err(err) => notification::capture_failed(&err),
            }
            refresh_controls(&runtime, &widgets);
        },
    );
}

pub(super) fn connect_capture_controls(runtime: &Rc<AppRuntime>, widgets: &Rc<MainWidgets>) {
    let runtime = runtime.clone();
    let widgets_for_click = widgets.clone();
    widgets.capture_button.connect_clicked(move |_| {
        start_capture(&runtime, &widgets_for_click);
    });
}
