//! Full-screen capture with an optional delay and optional self-hide.
//!
//! A capture runs in two halves: [`prepare_capture`] and [`finish_capture`]
//! touch the application window and run on the UI thread, while
//! [`run_capture_sequence`] waits and grabs the screen on a worker thread.

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use self::hyprland::parse_focused_monitor;
use crate::canvas::CanvasBuffer;
use crate::storage::temp_capture_path;
use image::RgbaImage;
use thiserror::Error;

mod hyprland;

/// Pause after hiding the window so the compositor stops drawing it.
pub const DEFAULT_HIDE_GRACE: Duration = Duration::from_millis(10);
/// Delay reached when the delay slider sits at its maximum.
pub const DEFAULT_MAX_DELAY_SECS: f32 = 5.0;
/// Largest delay scale a config file may set.
pub const MAX_CONFIGURABLE_DELAY_SECS: f32 = 3_600.0;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("command failed: {command}: {message}")]
    CommandFailed { command: String, message: String },
    #[error("command io error: {command}")]
    CommandIo {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("no focused monitor found")]
    NoFocusedMonitor,
    #[error("invalid monitor metadata: {message}")]
    InvalidMonitorMetadata { message: String },
    #[error("invalid capture artifact: {message}")]
    InvalidCaptureArtifact { message: String },
    #[error("failed to read captured image: {message}")]
    ImageReadFailed { message: String },
    #[error("capture worker exited without a result")]
    WorkerDisconnected,
}

pub trait CaptureBackend {
    fn focused_monitors_json(&self) -> Result<String, CaptureError>;
    /// Captures `monitor`, or every output when `None`, into a PNG at `output`.
    fn run_full_capture(&self, monitor: Option<&str>, output: &Path) -> Result<(), CaptureError>;
    fn load_raster(&self, output: &Path) -> Result<RgbaImage, CaptureError>;
}

#[derive(Default)]
pub struct SystemCaptureBackend;

impl CaptureBackend for SystemCaptureBackend {
    fn focused_monitors_json(&self) -> Result<String, CaptureError> {
        run_command_output("hyprctl", &["monitors", "-j"])
    }

    fn run_full_capture(&self, monitor: Option<&str>, output: &Path) -> Result<(), CaptureError> {
        match monitor {
            Some(monitor) => run_command_status("grim", &["-o", monitor], output),
            None => run_command_status("grim", &[], output),
        }
    }

    fn load_raster(&self, output: &Path) -> Result<RgbaImage, CaptureError> {
        let image = image::open(output).map_err(|err| CaptureError::ImageReadFailed {
            message: err.to_string(),
        })?;
        Ok(image.to_rgba8())
    }
}

/// Parameters of one capture invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRequest {
    pub delay: Duration,
    pub hide_self: bool,
    pub hide_grace: Duration,
}

impl Default for CaptureRequest {
    fn default() -> Self {
        Self {
            delay: Duration::ZERO,
            hide_self: false,
            hide_grace: DEFAULT_HIDE_GRACE,
        }
    }
}

impl CaptureRequest {
    pub fn new(delay: Duration, hide_self: bool) -> Self {
        Self {
            delay,
            hide_self,
            ..Self::default()
        }
    }

    pub fn with_hide_grace(mut self, hide_grace: Duration) -> Self {
        self.hide_grace = hide_grace;
        self
    }
}

/// Maps a 0..1 slider position onto a delay of at most `max_delay_secs`.
pub fn delay_from_slider(value: f64, max_delay_secs: f32) -> Duration {
    let value = if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let max = f64::from(max_delay_secs.max(0.0));
    Duration::try_from_secs_f64(value * max).unwrap_or(Duration::ZERO)
}

pub fn delay_label(delay: Duration) -> String {
    format!("Delay: {:.1}s", delay.as_secs_f64())
}

/// The window the capture may need to hide from the screenshot.
pub trait CaptureWindow {
    fn set_hidden(&self, hidden: bool);
}

/// UI-thread half run before the worker starts.
pub fn prepare_capture<W: CaptureWindow>(window: &W, request: &CaptureRequest) {
    if request.hide_self {
        tracing::debug!("hiding window before capture");
        window.set_hidden(true);
    }
}

/// UI-thread half run once the worker result has arrived.
pub fn finish_capture<W: CaptureWindow>(window: &W, request: &CaptureRequest) {
    if request.hide_self {
        window.set_hidden(false);
    }
}

/// Worker half: waits out the hide grace and the requested delay, then grabs
/// the screen. There is no cancellation once started.
pub fn run_capture_sequence<B, S>(
    backend: &B,
    request: &CaptureRequest,
    mut sleep: S,
) -> Result<CanvasBuffer, CaptureError>
where
    B: CaptureBackend,
    S: FnMut(Duration),
{
    if request.hide_self && !request.hide_grace.is_zero() {
        sleep(request.hide_grace);
    }
    if !request.delay.is_zero() {
        tracing::info!(delay_ms = request.delay.as_millis() as u64, "waiting before capture");
        sleep(request.delay);
    }
    let raster = capture_screen_with(backend)?;
    Ok(CanvasBuffer::new(raster))
}

/// Captures the focused output, falling back to the whole layout when the
/// compositor cannot report one.
pub fn capture_screen_with<B: CaptureBackend>(backend: &B) -> Result<RgbaImage, CaptureError> {
    let monitor = match backend
        .focused_monitors_json()
        .and_then(|json| parse_focused_monitor(&json))
    {
        Ok(monitor) => {
            tracing::debug!(
                monitor = %monitor.name,
                width = ?monitor.width,
                height = ?monitor.height,
                "capturing focused monitor"
            );
            Some(monitor.name)
        }
        Err(err) => {
            tracing::warn!(?err, "focused monitor unavailable; capturing all outputs");
            None
        }
    };

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|err| CaptureError::InvalidCaptureArtifact {
            message: format!("system time before unix epoch: {err}"),
        })?;
    let temp_path = temp_capture_path(&format!("capture-{}", now.as_nanos()));
    if let Some(parent) = temp_path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| CaptureError::InvalidCaptureArtifact {
            message: format!("cannot create {}: {err}", parent.display()),
        })?;
    }

    let result = backend
        .run_full_capture(monitor.as_deref(), &temp_path)
        .and_then(|()| backend.load_raster(&temp_path));
    cleanup_temp_capture_file(&temp_path);
    result
}

fn cleanup_temp_capture_file(temp_path: &Path) {
    match std::fs::remove_file(temp_path) {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => {
            tracing::warn!(
                path = %temp_path.display(),
                ?err,
                "failed to cleanup temporary capture file"
            );
        }
    }
}

fn run_command_output(command: &str, args: &[&str]) -> Result<String, CaptureError> {
    let output = Command::new(command)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|err| CaptureError::CommandIo {
            command: command.to_string(),
            source: err,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CaptureError::CommandFailed {
            command: command.to_string(),
            message: format!("exit status: {}; stderr: {stderr}", output.status),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if stdout.is_empty() {
        return Err(CaptureError::CommandFailed {
            command: command.to_string(),
            message: "command produced no stdout output".to_string(),
        });
    }

    Ok(stdout)
}

fn run_command_status(command: &str, args: &[&str], output: &Path) -> Result<(), CaptureError> {
    let status = Command::new(command)
        .args(args)
        .arg(output)
        .status()
        .map_err(|err| CaptureError::CommandIo {
            command: command.to_string(),
            source: err,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(CaptureError::CommandFailed {
            command: command.to_string(),
            message: format!("command exited with status: {status}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::cell::RefCell;
    use std::path::PathBuf;

    struct FakeCaptureBackend {
        monitor_json: Option<String>,
        dimensions: (u32, u32),
        fail_full_capture: bool,
        calls: RefCell<Vec<String>>,
        outputs: RefCell<Vec<PathBuf>>,
    }

    impl FakeCaptureBackend {
        fn new(monitor_json: Option<&str>, dimensions: (u32, u32)) -> Self {
            Self {
                monitor_json: monitor_json.map(str::to_string),
                dimensions,
                fail_full_capture: false,
                calls: RefCell::new(Vec::new()),
                outputs: RefCell::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl CaptureBackend for FakeCaptureBackend {
        fn focused_monitors_json(&self) -> Result<String, CaptureError> {
            self.calls
                .borrow_mut()
                .push("hyprctl monitors -j".to_string());
            self.monitor_json
                .clone()
                .ok_or_else(|| CaptureError::CommandFailed {
                    command: "hyprctl".to_string(),
                    message: "not running under hyprland".to_string(),
                })
        }

        fn run_full_capture(
            &self,
            monitor: Option<&str>,
            output: &Path,
        ) -> Result<(), CaptureError> {
            let call = match monitor {
                Some(monitor) => format!("grim -o {monitor}"),
                None => "grim".to_string(),
            };
            self.calls.borrow_mut().push(call);
            self.outputs.borrow_mut().push(output.to_path_buf());
            if self.fail_full_capture {
                return Err(CaptureError::CommandFailed {
                    command: "grim".to_string(),
                    message: "simulated full capture failure".to_string(),
                });
            }
            std::fs::write(output, b"capture-data").map_err(|err| CaptureError::CommandIo {
                command: "grim".to_string(),
                source: err,
            })
        }

        fn load_raster(&self, _output: &Path) -> Result<RgbaImage, CaptureError> {
            let (width, height) = self.dimensions;
            Ok(RgbaImage::from_pixel(width, height, Rgba([1, 2, 3, 255])))
        }
    }

    #[derive(Default)]
    struct FakeWindow {
        visibility: RefCell<Vec<bool>>,
    }

    impl CaptureWindow for FakeWindow {
        fn set_hidden(&self, hidden: bool) {
            self.visibility.borrow_mut().push(hidden);
        }
    }

    #[test]
    fn capture_uses_focused_monitor_and_removes_temp_file() {
        let backend = FakeCaptureBackend::new(Some(r#"[{"name":"DP-1","focused":true}]"#), (64, 32));
        let raster = capture_screen_with(&backend).expect("fake backend should capture");

        assert_eq!(raster.dimensions(), (64, 32));
        assert_eq!(backend.calls(), vec!["hyprctl monitors -j", "grim -o DP-1"]);
        let outputs = backend.outputs.borrow();
        assert_eq!(outputs.len(), 1);
        assert!(!outputs[0].exists());
    }

    #[test]
    fn capture_falls_back_to_all_outputs_without_focused_monitor() {
        let backend = FakeCaptureBackend::new(None, (10, 10));
        let _ = capture_screen_with(&backend).expect("fallback capture");
        assert_eq!(backend.calls(), vec!["hyprctl monitors -j", "grim"]);
    }

    #[test]
    fn capture_failure_propagates_and_cleans_up() {
        let mut backend =
            FakeCaptureBackend::new(Some(r#"[{"name":"DP-1","focused":true}]"#), (10, 10));
        backend.fail_full_capture = true;

        let err = capture_screen_with(&backend).expect_err("capture should fail");
        assert!(matches!(err, CaptureError::CommandFailed { .. }));
        assert!(!backend.outputs.borrow()[0].exists());
    }

    #[test]
    fn sequence_waits_for_grace_then_delay_before_capturing() {
        let backend = FakeCaptureBackend::new(None, (20, 10));
        let request = CaptureRequest::new(Duration::from_millis(2_500), true);
        let mut sleeps = Vec::new();

        let canvas = run_capture_sequence(&backend, &request, |duration| sleeps.push(duration))
            .expect("sequence should capture");

        assert_eq!(sleeps, vec![DEFAULT_HIDE_GRACE, Duration::from_millis(2_500)]);
        assert_eq!(canvas.bitmap().dimensions(), (20, 10));
        assert_eq!(canvas.reset_backup(), canvas.bitmap());
    }

    #[test]
    fn sequence_without_hide_or_delay_never_sleeps() {
        let backend = FakeCaptureBackend::new(None, (4, 4));
        let mut slept = false;
        let _ = run_capture_sequence(&backend, &CaptureRequest::default(), |_| slept = true)
            .expect("capture");
        assert!(!slept);
    }

    #[test]
    fn window_is_hidden_and_restored_only_when_requested() {
        let window = FakeWindow::default();
        let hidden = CaptureRequest::new(Duration::ZERO, true);
        prepare_capture(&window, &hidden);
        finish_capture(&window, &hidden);
        assert_eq!(*window.visibility.borrow(), vec![true, false]);

        let visible = FakeWindow::default();
        let request = CaptureRequest::default().with_hide_grace(Duration::from_millis(50));
        prepare_capture(&visible, &request);
        finish_capture(&visible, &request);
        assert!(visible.visibility.borrow().is_empty());
    }

    #[test]
    fn delay_slider_maps_onto_max_delay() {
        assert_eq!(delay_from_slider(0.0, 5.0), Duration::ZERO);
        assert_eq!(delay_from_slider(0.5, 5.0), Duration::from_millis(2_500));
        assert_eq!(delay_from_slider(7.0, 5.0), Duration::from_secs(5));
        assert_eq!(delay_from_slider(f64::NAN, 5.0), Duration::ZERO);
        assert_eq!(delay_from_slider(1.0, 1e30), Duration::ZERO);
        assert_eq!(delay_from_slider(0.5, f32::INFINITY), Duration::ZERO);
        assert_eq!(delay_label(Duration::from_millis(2_500)), "Delay: 2.5s");
        assert_eq!(delay_label(Duration::ZERO), "Delay: 0.0s");
    }
}
