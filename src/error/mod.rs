use crate::canvas::CanvasError;
use crate::capture::CaptureError;
use crate::editor::EditError;
use crate::state::StateError;
use crate::storage::StorageError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error(transparent)]
    Canvas(#[from] CanvasError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("gtk application exited unsuccessfully: {0}")]
    Gtk(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{EditEvent, EditMode};

    fn propagate_storage() -> AppResult<()> {
        Err(StorageError::NoActiveImage)?;
        Ok(())
    }

    #[test]
    fn module_errors_convert_with_question_mark() {
        let err = propagate_storage().expect_err("storage error");
        assert!(matches!(err, AppError::Storage(StorageError::NoActiveImage)));
        assert_eq!(
            err.to_string(),
            "there is no image to save; capture or open one first"
        );
    }

    #[test]
    fn nested_state_error_keeps_its_message() {
        let state = StateError::InvalidStateTransition {
            from: EditMode::CropActive,
            event: EditEvent::ArmCrop,
        };
        let err: AppError = EditError::from(state.clone()).into();
        assert_eq!(err.to_string(), state.to_string());
    }
}
