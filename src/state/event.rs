use super::EditMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditEvent {
    ArmCrop,
    DisarmCrop,
    CropPress,
    CropRelease,
    CanvasReplaced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: Option<EditMode>,
    pub event: EditEvent,
    pub to: EditMode,
}

impl StateTransition {
    pub const fn new(from: Option<EditMode>, event: EditEvent, to: EditMode) -> Self {
        Self { from, event, to }
    }
}
