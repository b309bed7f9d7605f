//! Pointer-gesture interpretation over the active canvas buffer.
//!
//! ```text
//!          arm_crop            pointer_down
//!   Idle ───────────► CropArmed ───────────► CropActive
//!    ▲ ◄───────────────┘                        │
//!    │   disarm / canvas replaced               │ pointer_up (commit or cancel)
//!    └──────────────────────────────────────────┘
//! ```
//!
//! Painting lives entirely inside `Idle`: a press paints one dot and every drag
//! sample paints another.

mod crop;
mod scale;

use thiserror::Error;

use crate::canvas::{Brush, CanvasBuffer, Repaint};
use crate::geometry::ImagePoint;
use crate::state::{EditEvent, EditMode, StateError, StateMachine};

pub use crop::CropSession;
pub use scale::DisplayScale;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("a crop gesture is in progress")]
    CropInProgress,
    #[error("no image is loaded")]
    NoCanvas,
    #[error(transparent)]
    State(#[from] StateError),
}

pub type EditResult<T> = std::result::Result<T, EditError>;

/// How consecutive drag samples are painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeMode {
    /// One dot per pointer sample; fast drags leave gaps.
    #[default]
    Dots,
    /// Fills the gap between consecutive samples.
    Interpolated,
}

#[derive(Debug, Default)]
pub struct EditSession {
    canvas: Option<CanvasBuffer>,
    machine: StateMachine,
    crop: Option<CropSession>,
    scale: DisplayScale,
    brush: Brush,
    stroke_mode: StrokeMode,
    last_paint_point: Option<ImagePoint>,
}

impl EditSession {
    pub fn new(brush: Brush, stroke_mode: StrokeMode) -> Self {
        Self {
            brush,
            stroke_mode,
            ..Self::default()
        }
    }

    pub fn canvas(&self) -> Option<&CanvasBuffer> {
        self.canvas.as_ref()
    }

    pub fn has_canvas(&self) -> bool {
        self.canvas.is_some()
    }

    pub fn mode(&self) -> EditMode {
        self.machine.state()
    }

    pub fn crop_session(&self) -> Option<&CropSession> {
        self.crop.as_ref()
    }

    pub fn brush(&self) -> Brush {
        self.brush
    }

    pub fn scale(&self) -> &DisplayScale {
        &self.scale
    }

    pub fn is_crop_in_progress(&self) -> bool {
        self.mode() == EditMode::CropActive
    }

    fn ensure_no_active_crop(&self) -> EditResult<()> {
        if self.is_crop_in_progress() {
            return Err(EditError::CropInProgress);
        }
        Ok(())
    }

    /// Replaces the active canvas with a freshly captured or loaded one.
    /// Refused while a crop drag is in progress; an armed crop is disarmed.
    pub fn install_canvas(&mut self, mut canvas: CanvasBuffer) -> EditResult<Repaint> {
        self.ensure_no_active_crop()?;
        self.machine.transition(EditEvent::CanvasReplaced)?;
        canvas.set_color(self.brush.color());
        self.scale.rebind(canvas.bounds());
        self.canvas = Some(canvas);
        self.crop = None;
        self.last_paint_point = None;
        tracing::debug!(bounds = ?self.scale, "installed new canvas");
        Ok(Repaint::Needed)
    }

    pub fn set_brush_color_value(&mut self, value: f32) {
        self.brush.set_color_value(value);
        if let Some(canvas) = self.canvas.as_mut() {
            canvas.set_color(self.brush.color());
        }
    }

    pub fn set_brush_size(&mut self, value: f32) {
        self.brush.set_size(value);
    }

    pub fn set_stroke_mode(&mut self, stroke_mode: StrokeMode) {
        self.stroke_mode = stroke_mode;
    }

    /// Records the size at which the canvas is currently displayed.
    pub fn layout(&mut self, display_width: f64, display_height: f64) {
        if let Some(canvas) = self.canvas.as_ref() {
            self.scale
                .update(canvas.bounds(), display_width, display_height);
        }
    }

    pub fn arm_crop(&mut self) -> EditResult<()> {
        self.ensure_no_active_crop()?;
        self.machine.transition(EditEvent::ArmCrop)?;
        Ok(())
    }

    pub fn disarm_crop(&mut self) -> EditResult<()> {
        self.ensure_no_active_crop()?;
        self.machine.transition(EditEvent::DisarmCrop)?;
        Ok(())
    }

    /// Restores the canvas to its reset baseline.
    pub fn clear(&mut self) -> EditResult<Repaint> {
        self.ensure_no_active_crop()?;
        let canvas = self.canvas.as_mut().ok_or(EditError::NoCanvas)?;
        Ok(canvas.reset())
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) -> EditResult<Repaint> {
        let point = self.scale.to_image(x, y);
        let Some(canvas) = self.canvas.as_mut() else {
            return Ok(Repaint::NotNeeded);
        };

        match self.machine.state() {
            EditMode::Idle => {
                self.last_paint_point = Some(point);
                Ok(canvas.paint_dot(point, self.brush.color(), self.brush.diameter()))
            }
            EditMode::CropArmed => {
                self.machine.transition(EditEvent::CropPress)?;
                canvas.begin_crop();
                self.crop = Some(CropSession::start(point));
                tracing::debug!(?point, "crop drag started");
                Ok(Repaint::NotNeeded)
            }
            EditMode::CropActive => Ok(Repaint::NotNeeded),
        }
    }

    pub fn pointer_drag(&mut self, x: f64, y: f64) -> EditResult<Repaint> {
        let point = self.scale.to_image(x, y);
        let Some(canvas) = self.canvas.as_mut() else {
            return Ok(Repaint::NotNeeded);
        };

        match self.machine.state() {
            EditMode::Idle => {
                let color = self.brush.color();
                let diameter = self.brush.diameter();
                let repaint = match (self.stroke_mode, self.last_paint_point) {
                    (StrokeMode::Interpolated, Some(previous)) => {
                        canvas.paint_segment(previous, point, color, diameter)
                    }
                    _ => canvas.paint_dot(point, color, diameter),
                };
                self.last_paint_point = Some(point);
                Ok(repaint)
            }
            EditMode::CropActive => {
                let Some(session) = self.crop.as_mut() else {
                    return Ok(Repaint::NotNeeded);
                };
                let extent = session.drag_to(point);
                Ok(canvas.preview_crop_rect(session.first_point(), extent))
            }
            EditMode::CropArmed => Ok(Repaint::NotNeeded),
        }
    }

    /// Ends the gesture. A crop commits on release and returns to `Idle`; an
    /// empty or inverted region cancels the crop and restores the raster.
    pub fn pointer_up(&mut self) -> EditResult<Repaint> {
        self.last_paint_point = None;
        if self.machine.state() != EditMode::CropActive {
            return Ok(Repaint::NotNeeded);
        }

        self.machine.transition(EditEvent::CropRelease)?;
        let session = self.crop.take();
        let Some(canvas) = self.canvas.as_mut() else {
            return Ok(Repaint::NotNeeded);
        };
        let Some(session) = session else {
            return Ok(canvas.cancel_crop());
        };

        match canvas.commit_crop(session.first_point(), session.extent()) {
            Ok(repaint) => {
                self.scale.rebind(canvas.bounds());
                tracing::info!(
                    width = canvas.bounds().width,
                    height = canvas.bounds().height,
                    "crop committed"
                );
                Ok(repaint)
            }
            Err(err) => {
                tracing::warn!(%err, "crop discarded");
                Ok(canvas.cancel_crop())
            }
        }
    }
}
