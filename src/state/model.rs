/// Interaction mode of the canvas editor. Painting has no persistent mode: a
/// paint gesture starts and ends within `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Idle,
    CropArmed,
    CropActive,
}

impl EditMode {
    pub const fn is_crop_armed(self) -> bool {
        matches!(self, Self::CropArmed | Self::CropActive)
    }
}
