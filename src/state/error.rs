use super::event::EditEvent;
use super::model::EditMode;
use thiserror::Error;

pub type StateResult<T> = std::result::Result<T, StateError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("invalid state transition: from {from:?} using event {event:?}")]
    InvalidStateTransition { from: EditMode, event: EditEvent },
}
