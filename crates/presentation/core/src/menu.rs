//! Modal menu entries.

/// One selectable line of a modal menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuOption {
    pub text: String,
    pub enabled: bool,
    /// Single-character shortcut that selects the option directly.
    pub hotkey: Option<char>,
}

impl MenuOption {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            enabled: true,
            hotkey: None,
        }
    }

    pub fn with_hotkey(mut self, hotkey: char) -> Self {
        self.hotkey = Some(hotkey);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Case-insensitive hotkey match.
    pub fn matches_hotkey(&self, ch: char) -> bool {
        self.hotkey.is_some_and(|hk| hk.eq_ignore_ascii_case(&ch))
    }
}

/// Cursor over a list of options that skips disabled entries.
///
/// Shared by every backend's modal `render_menu` loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuCursor {
    selected: usize,
}

/// Outcome of feeding one key press to a [`MenuCursor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuStep {
    Moved,
    Chosen(usize),
    Cancelled,
    Ignored,
}

impl MenuCursor {
    /// Cursor on the first enabled option, `None` if nothing is selectable.
    pub fn new(options: &[MenuOption]) -> Option<Self> {
        options
            .iter()
            .position(|o| o.enabled)
            .map(|selected| Self { selected })
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn up(&mut self, options: &[MenuOption]) {
        let len = options.len();
        for step in 1..=len {
            let idx = (self.selected + len - step) % len;
            if options[idx].enabled {
                self.selected = idx;
                return;
            }
        }
    }

    pub fn down(&mut self, options: &[MenuOption]) {
        let len = options.len();
        for step in 1..=len {
            let idx = (self.selected + step) % len;
            if options[idx].enabled {
                self.selected = idx;
                return;
            }
        }
    }

    /// Enabled option bound to `ch`.
    pub fn hotkey(options: &[MenuOption], ch: char) -> Option<usize> {
        options.iter().position(|o| o.enabled && o.matches_hotkey(ch))
    }

    /// Applies a resolved key press.
    pub fn step(
        &mut self,
        options: &[MenuOption],
        key: crate::KeyCode,
        action: Option<crate::InputAction>,
    ) -> MenuStep {
        use crate::{InputAction, KeyCode};

        if let Some(idx) = key.to_char().and_then(|ch| Self::hotkey(options, ch)) {
            return MenuStep::Chosen(idx);
        }
        match (key, action) {
            (_, Some(InputAction::MoveUp | InputAction::MenuUp)) => {
                self.up(options);
                MenuStep::Moved
            }
            (_, Some(InputAction::MoveDown | InputAction::MenuDown)) => {
                self.down(options);
                MenuStep::Moved
            }
            (KeyCode::Enter, _) | (_, Some(InputAction::MenuSelect)) => {
                MenuStep::Chosen(self.selected)
            }
            (KeyCode::Escape, _) | (_, Some(InputAction::Quit | InputAction::MenuBack)) => {
                MenuStep::Cancelled
            }
            _ => MenuStep::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InputAction, KeyCode};

    fn options() -> Vec<MenuOption> {
        vec![
            MenuOption::new("Resume").with_hotkey('r'),
            MenuOption::new("Save").disabled(),
            MenuOption::new("Quit").with_hotkey('x'),
        ]
    }

    #[test]
    fn cursor_skips_disabled_entries() {
        let opts = options();
        let mut cursor = MenuCursor::new(&opts).unwrap();
        assert_eq!(cursor.selected(), 0);
        cursor.down(&opts);
        assert_eq!(cursor.selected(), 2);
        cursor.down(&opts);
        assert_eq!(cursor.selected(), 0);
        cursor.up(&opts);
        assert_eq!(cursor.selected(), 2);
    }

    #[test]
    fn nothing_enabled_means_no_cursor() {
        let opts = vec![MenuOption::new("a").disabled()];
        assert!(MenuCursor::new(&opts).is_none());
        assert!(MenuCursor::new(&[]).is_none());
    }

    #[test]
    fn hotkeys_ignore_case_and_disabled_options() {
        let opts = options();
        assert_eq!(MenuCursor::hotkey(&opts, 'X'), Some(2));
        let mut with_disabled_hotkey = opts.clone();
        with_disabled_hotkey[1].hotkey = Some('s');
        assert_eq!(MenuCursor::hotkey(&with_disabled_hotkey, 's'), None);
    }

    #[test]
    fn step_maps_keys_to_outcomes() {
        let opts = options();
        let mut cursor = MenuCursor::new(&opts).unwrap();
        assert_eq!(
            cursor.step(&opts, KeyCode::Down, Some(InputAction::MoveDown)),
            MenuStep::Moved
        );
        assert_eq!(
            cursor.step(&opts, KeyCode::Enter, Some(InputAction::MenuSelect)),
            MenuStep::Chosen(2)
        );
        assert_eq!(
            cursor.step(&opts, KeyCode::Escape, Some(InputAction::Quit)),
            MenuStep::Cancelled
        );
        assert_eq!(cursor.step(&opts, KeyCode::R, None), MenuStep::Chosen(0));
        assert_eq!(cursor.step(&opts, KeyCode::F5, None), MenuStep::Ignored);
    }
}
