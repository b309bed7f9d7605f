#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutKey {
    Character(char),
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShortcutModifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl ShortcutModifiers {
    pub const fn new(ctrl: bool, shift: bool) -> Self {
        Self { ctrl, shift }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputContext {
    pub crop_armed: bool,
    pub capture_running: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Open,
    Save,
    QuickSave,
    Exit,
    DisarmCrop,
}

impl ShortcutAction {
    /// Name of the `app.*` action the shortcut activates, if any.
    pub const fn action_name(self) -> Option<&'static str> {
        match self {
            Self::Open => Some("open"),
            Self::Save => Some("save"),
            Self::QuickSave => Some("quick-save"),
            Self::Exit => Some("exit"),
            Self::DisarmCrop => None,
        }
    }
}

fn resolve_file_shortcut(key: ShortcutKey, modifiers: ShortcutModifiers) -> Option<ShortcutAction> {
    match (key, modifiers.ctrl, modifiers.shift) {
        (ShortcutKey::Character('o'), true, false) => Some(ShortcutAction::Open),
        (ShortcutKey::Character('s'), true, false) => Some(ShortcutAction::Save),
        (ShortcutKey::Character('s'), true, true) => Some(ShortcutAction::QuickSave),
        (ShortcutKey::Character('q'), true, _) => Some(ShortcutAction::Exit),
        _ => None,
    }
}

pub fn resolve_shortcut(
    key: ShortcutKey,
    modifiers: ShortcutModifiers,
    context: InputContext,
) -> Option<ShortcutAction> {
    if key == ShortcutKey::Escape {
        return (context.crop_armed && !modifiers.ctrl).then_some(ShortcutAction::DisarmCrop);
    }
    let action = resolve_file_shortcut(key, modifiers)?;
    // Replacing the canvas mid-capture would race the worker result.
    if context.capture_running && action == ShortcutAction::Open {
        return None;
    }
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CTRL: ShortcutModifiers = ShortcutModifiers::new(true, false);
    const CTRL_SHIFT: ShortcutModifiers = ShortcutModifiers::new(true, true);

    #[test]
    fn resolve_shortcut_maps_file_menu_accelerators() {
        let context = InputContext::default();
        assert_eq!(
            resolve_shortcut(ShortcutKey::Character('o'), CTRL, context),
            Some(ShortcutAction::Open)
        );
        assert_eq!(
            resolve_shortcut(ShortcutKey::Character('s'), CTRL, context),
            Some(ShortcutAction::Save)
        );
        assert_eq!(
            resolve_shortcut(ShortcutKey::Character('s'), CTRL_SHIFT, context),
            Some(ShortcutAction::QuickSave)
        );
        assert_eq!(
            resolve_shortcut(ShortcutKey::Character('q'), CTRL, context),
            Some(ShortcutAction::Exit)
        );
        assert_eq!(
            resolve_shortcut(
                ShortcutKey::Character('s'),
                ShortcutModifiers::default(),
                context
            ),
            None
        );
    }

    #[test]
    fn escape_only_disarms_an_armed_crop() {
        let armed = InputContext {
            crop_armed: true,
            ..InputContext::default()
        };
        assert_eq!(
            resolve_shortcut(ShortcutKey::Escape, ShortcutModifiers::default(), armed),
            Some(ShortcutAction::DisarmCrop)
        );
        assert_eq!(
            resolve_shortcut(
                ShortcutKey::Escape,
                ShortcutModifiers::default(),
                InputContext::default()
            ),
            None
        );
    }

    #[test]
    fn open_is_suppressed_while_capture_runs() {
        let capturing = InputContext {
            capture_running: true,
            ..InputContext::default()
        };
        assert_eq!(
            resolve_shortcut(ShortcutKey::Character('o'), CTRL, capturing),
            None
        );
        assert_eq!(
            resolve_shortcut(ShortcutKey::Character('s'), CTRL, capturing),
            Some(ShortcutAction::Save)
        );
    }

    #[test]
    fn action_names_match_application_actions() {
        assert_eq!(ShortcutAction::QuickSave.action_name(), Some("quick-save"));
        assert_eq!(ShortcutAction::DisarmCrop.action_name(), None);
    }
}
