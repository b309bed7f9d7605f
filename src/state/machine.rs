use super::error::{StateError, StateResult};
use super::{event::StateTransition, EditEvent, EditMode};

#[derive(Debug)]
pub struct StateMachine {
    state: EditMode,
    transition_history: Vec<StateTransition>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            state: EditMode::default(),
            transition_history: Vec::new(),
        }
    }

    pub fn state(&self) -> EditMode {
        self.state
    }

    pub fn can_transition(&self, event: EditEvent) -> bool {
        self.next_state(event).is_some()
    }

    /// A canvas replacement or re-arm during an active crop drag has no
    /// transition; callers reject those requests.
    pub fn next_state(&self, event: EditEvent) -> Option<EditMode> {
        use EditEvent::*;
        match (self.state, event) {
            (EditMode::Idle, ArmCrop) => Some(EditMode::CropArmed),
            (EditMode::CropArmed, ArmCrop) => Some(EditMode::CropArmed),
            (EditMode::Idle, DisarmCrop) => Some(EditMode::Idle),
            (EditMode::CropArmed, DisarmCrop) => Some(EditMode::Idle),
            (EditMode::CropArmed, CropPress) => Some(EditMode::CropActive),
            (EditMode::CropActive, CropRelease) => Some(EditMode::Idle),
            (EditMode::Idle, CanvasReplaced) => Some(EditMode::Idle),
            (EditMode::CropArmed, CanvasReplaced) => Some(EditMode::Idle),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: EditEvent) -> StateResult<EditMode> {
        tracing::debug!(from = ?self.state, event = ?event, "request edit mode transition");
        let next = self.next_state(event).ok_or_else(|| {
            let from = self.state;
            tracing::warn!(from = ?from, event = ?event, "invalid edit mode transition requested");
            StateError::InvalidStateTransition { from, event }
        })?;

        let record = StateTransition::new(Some(self.state), event, next);
        self.state = next;
        self.transition_history.push(record);

        Ok(self.state)
    }
}

#[cfg(test)]
impl StateMachine {
    fn history(&self) -> &[StateTransition] {
        &self.transition_history
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_transition_tracks_valid_and_invalid_events() {
        let mut machine = StateMachine::new();
        assert!(machine.can_transition(EditEvent::ArmCrop));
        assert!(!machine.can_transition(EditEvent::CropPress));
        assert!(!machine.can_transition(EditEvent::CropRelease));

        let _ = machine
            .transition(EditEvent::ArmCrop)
            .expect("idle -> crop armed should transition");

        assert!(machine.can_transition(EditEvent::CropPress));
        assert!(machine.can_transition(EditEvent::DisarmCrop));
        assert!(!machine.can_transition(EditEvent::CropRelease));
    }

    #[test]
    fn crop_gesture_records_history_with_ordered_entries() {
        let mut machine = StateMachine::new();
        let _ = machine.transition(EditEvent::ArmCrop).expect("arm");
        let _ = machine.transition(EditEvent::CropPress).expect("press");
        let _ = machine.transition(EditEvent::CropRelease).expect("release");

        assert_eq!(machine.state(), EditMode::Idle);
        assert_eq!(
            machine.history(),
            &[
                StateTransition::new(Some(EditMode::Idle), EditEvent::ArmCrop, EditMode::CropArmed),
                StateTransition::new(
                    Some(EditMode::CropArmed),
                    EditEvent::CropPress,
                    EditMode::CropActive
                ),
                StateTransition::new(
                    Some(EditMode::CropActive),
                    EditEvent::CropRelease,
                    EditMode::Idle
                ),
            ]
        );
    }

    #[test]
    fn active_crop_rejects_canvas_replacement_and_rearm() {
        let mut machine = StateMachine::new();
        let _ = machine.transition(EditEvent::ArmCrop).expect("arm");
        let _ = machine.transition(EditEvent::CropPress).expect("press");

        for event in [EditEvent::CanvasReplaced, EditEvent::ArmCrop, EditEvent::DisarmCrop] {
            let err = machine
                .transition(event)
                .expect_err("active crop should reject event");
            assert_eq!(
                err,
                StateError::InvalidStateTransition {
                    from: EditMode::CropActive,
                    event
                }
            );
        }
        assert_eq!(machine.state(), EditMode::CropActive);
        assert_eq!(machine.history().len(), 2);
    }

    #[test]
    fn canvas_replacement_disarms_crop() {
        let mut machine = StateMachine::new();
        let _ = machine.transition(EditEvent::ArmCrop).expect("arm");
        let state = machine
            .transition(EditEvent::CanvasReplaced)
            .expect("armed crop accepts replacement");
        assert_eq!(state, EditMode::Idle);
    }
}
