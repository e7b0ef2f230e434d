//! Platform-independent key vocabulary and the canonical key binding table.
//!
//! Backends translate their native key identifiers into [`KeyCode`] before
//! anything else looks at them. Game logic never sees a `KeyCode` directly: it
//! consumes [`InputAction`]s resolved through a [`KeyBindings`] copy owned by the
//! input handler.
use std::collections::HashMap;

/// Physical key identifier shared by every backend.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum KeyCode {
    /// No key (empty event).
    #[default]
    None,
    /// A native key with no counterpart in this vocabulary.
    Unknown,

    // Navigation
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    Backspace,
    Tab,
    Enter,
    Escape,
    Space,

    // Letters
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    // Digits
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,

    // Function keys
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    // Modifiers
    Shift,
    Ctrl,
    Alt,

    // Punctuation
    Plus,
    Minus,
    Equals,
    LeftBracket,
    RightBracket,
    Comma,
    Period,
    Slash,
    Semicolon,
    Apostrophe,
    Backslash,
    Grave,
}

const LETTERS: [KeyCode; 26] = [
    KeyCode::A,
    KeyCode::B,
    KeyCode::C,
    KeyCode::D,
    KeyCode::E,
    KeyCode::F,
    KeyCode::G,
    KeyCode::H,
    KeyCode::I,
    KeyCode::J,
    KeyCode::K,
    KeyCode::L,
    KeyCode::M,
    KeyCode::N,
    KeyCode::O,
    KeyCode::P,
    KeyCode::Q,
    KeyCode::R,
    KeyCode::S,
    KeyCode::T,
    KeyCode::U,
    KeyCode::V,
    KeyCode::W,
    KeyCode::X,
    KeyCode::Y,
    KeyCode::Z,
];

const DIGITS: [KeyCode; 10] = [
    KeyCode::Num0,
    KeyCode::Num1,
    KeyCode::Num2,
    KeyCode::Num3,
    KeyCode::Num4,
    KeyCode::Num5,
    KeyCode::Num6,
    KeyCode::Num7,
    KeyCode::Num8,
    KeyCode::Num9,
];

const FUNCTION_KEYS: [KeyCode; 12] = [
    KeyCode::F1,
    KeyCode::F2,
    KeyCode::F3,
    KeyCode::F4,
    KeyCode::F5,
    KeyCode::F6,
    KeyCode::F7,
    KeyCode::F8,
    KeyCode::F9,
    KeyCode::F10,
    KeyCode::F11,
    KeyCode::F12,
];

impl KeyCode {
    /// Maps a printable character to its key. Letters are case-insensitive.
    pub fn from_char(ch: char) -> Self {
        let lower = ch.to_ascii_lowercase();
        match lower {
            'a'..='z' => LETTERS[(lower as u8 - b'a') as usize],
            '0'..='9' => DIGITS[(lower as u8 - b'0') as usize],
            ' ' => KeyCode::Space,
            '+' => KeyCode::Plus,
            '-' => KeyCode::Minus,
            '=' => KeyCode::Equals,
            '[' => KeyCode::LeftBracket,
            ']' => KeyCode::RightBracket,
            ',' => KeyCode::Comma,
            '.' => KeyCode::Period,
            '/' => KeyCode::Slash,
            ';' => KeyCode::Semicolon,
            '\'' => KeyCode::Apostrophe,
            '\\' => KeyCode::Backslash,
            '`' => KeyCode::Grave,
            '\t' => KeyCode::Tab,
            '\n' | '\r' => KeyCode::Enter,
            _ => KeyCode::Unknown,
        }
    }

    /// Printable character for this key (lowercase for letters).
    pub fn to_char(self) -> Option<char> {
        if let Some(idx) = LETTERS.iter().position(|&k| k == self) {
            return Some((b'a' + idx as u8) as char);
        }
        if let Some(digit) = self.digit() {
            return Some((b'0' + digit) as char);
        }
        let ch = match self {
            KeyCode::Space => ' ',
            KeyCode::Plus => '+',
            KeyCode::Minus => '-',
            KeyCode::Equals => '=',
            KeyCode::LeftBracket => '[',
            KeyCode::RightBracket => ']',
            KeyCode::Comma => ',',
            KeyCode::Period => '.',
            KeyCode::Slash => '/',
            KeyCode::Semicolon => ';',
            KeyCode::Apostrophe => '\'',
            KeyCode::Backslash => '\\',
            KeyCode::Grave => '`',
            _ => return None,
        };
        Some(ch)
    }

    /// Digit value for `Num0..Num9`.
    pub fn digit(self) -> Option<u8> {
        DIGITS.iter().position(|&k| k == self).map(|idx| idx as u8)
    }

    pub fn is_digit(self) -> bool {
        self.digit().is_some()
    }

    /// Function key for `n` in `1..=12`.
    pub fn function(n: u8) -> Self {
        match n {
            1..=12 => FUNCTION_KEYS[(n - 1) as usize],
            _ => KeyCode::Unknown,
        }
    }
}

/// Mouse button identifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum MouseButton {
    #[default]
    None,
    Left,
    Right,
    Middle,
}

/// Semantic input intent, decoupled from the physical key that produced it.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum InputAction {
    // Viewport movement
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,

    // Simulation control
    Pause,
    Quit,
    SpeedUp,
    SlowDown,

    // Menu navigation
    MenuUp,
    MenuDown,
    MenuSelect,
    MenuBack,

    // World editor
    ScaleUp,
    ScaleDown,
    OctavesUp,
    OctavesDown,
    PersistenceUp,
    PersistenceDown,
    LacunarityUp,
    LacunarityDown,
    FrequencyUp,
    FrequencyDown,
    Regenerate,
    ToggleDetails,

    // Terrain level selection
    SelectTerrain1,
    SelectTerrain2,
    SelectTerrain3,
    SelectTerrain4,
    SelectTerrain5,
    SelectTerrain6,
    SelectTerrain7,
    SelectTerrain8,
    SelectTerrain9,

    // Zoom
    ZoomIn,
    ZoomOut,
}

const TERRAIN_ACTIONS: [InputAction; 9] = [
    InputAction::SelectTerrain1,
    InputAction::SelectTerrain2,
    InputAction::SelectTerrain3,
    InputAction::SelectTerrain4,
    InputAction::SelectTerrain5,
    InputAction::SelectTerrain6,
    InputAction::SelectTerrain7,
    InputAction::SelectTerrain8,
    InputAction::SelectTerrain9,
];

impl InputAction {
    /// Terrain level `1..=9` carried by a `SelectTerrainN` action.
    pub fn terrain_level(self) -> Option<u8> {
        TERRAIN_ACTIONS
            .iter()
            .position(|&a| a == self)
            .map(|idx| idx as u8 + 1)
    }

    /// `SelectTerrainN` action for `level` in `1..=9`.
    pub fn select_terrain(level: u8) -> Option<Self> {
        match level {
            1..=9 => Some(TERRAIN_ACTIONS[(level - 1) as usize]),
            _ => None,
        }
    }

    /// Returns true for the four viewport movement actions.
    pub fn is_movement(self) -> bool {
        matches!(
            self,
            InputAction::MoveUp
                | InputAction::MoveDown
                | InputAction::MoveLeft
                | InputAction::MoveRight
        )
    }
}

/// Canonical key → action table shared by every backend.
///
/// Multiple keys may resolve to one action; each key resolves to at most one.
pub const DEFAULT_BINDINGS: &[(KeyCode, InputAction)] = &[
    // Movement: arrows and vim keys
    (KeyCode::Up, InputAction::MoveUp),
    (KeyCode::K, InputAction::MoveUp),
    (KeyCode::Down, InputAction::MoveDown),
    (KeyCode::J, InputAction::MoveDown),
    (KeyCode::Left, InputAction::MoveLeft),
    (KeyCode::H, InputAction::MoveLeft),
    (KeyCode::Right, InputAction::MoveRight),
    (KeyCode::L, InputAction::MoveRight),
    // Simulation control
    (KeyCode::Space, InputAction::Pause),
    (KeyCode::Escape, InputAction::Quit),
    (KeyCode::Q, InputAction::Quit),
    (KeyCode::Period, InputAction::SpeedUp),
    (KeyCode::Comma, InputAction::SlowDown),
    // Menus
    (KeyCode::Enter, InputAction::MenuSelect),
    (KeyCode::Backspace, InputAction::MenuBack),
    // World editor
    (KeyCode::PageUp, InputAction::ScaleUp),
    (KeyCode::PageDown, InputAction::ScaleDown),
    (KeyCode::R, InputAction::OctavesUp),
    (KeyCode::F, InputAction::OctavesDown),
    (KeyCode::W, InputAction::PersistenceUp),
    (KeyCode::S, InputAction::PersistenceDown),
    (KeyCode::E, InputAction::LacunarityUp),
    (KeyCode::D, InputAction::LacunarityDown),
    (KeyCode::RightBracket, InputAction::FrequencyUp),
    (KeyCode::LeftBracket, InputAction::FrequencyDown),
    (KeyCode::G, InputAction::Regenerate),
    (KeyCode::Tab, InputAction::ToggleDetails),
    // Terrain levels
    (KeyCode::Num1, InputAction::SelectTerrain1),
    (KeyCode::Num2, InputAction::SelectTerrain2),
    (KeyCode::Num3, InputAction::SelectTerrain3),
    (KeyCode::Num4, InputAction::SelectTerrain4),
    (KeyCode::Num5, InputAction::SelectTerrain5),
    (KeyCode::Num6, InputAction::SelectTerrain6),
    (KeyCode::Num7, InputAction::SelectTerrain7),
    (KeyCode::Num8, InputAction::SelectTerrain8),
    (KeyCode::Num9, InputAction::SelectTerrain9),
    // Zoom
    (KeyCode::Plus, InputAction::ZoomIn),
    (KeyCode::Equals, InputAction::ZoomIn),
    (KeyCode::Minus, InputAction::ZoomOut),
];

/// Private, mutable copy of the binding table owned by one input handler.
///
/// Remaps applied here never reach [`DEFAULT_BINDINGS`] or another handler's
/// copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyBindings {
    map: HashMap<KeyCode, InputAction>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            map: DEFAULT_BINDINGS.iter().copied().collect(),
        }
    }
}

impl KeyBindings {
    /// Table with no bindings at all.
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Binds `key` to `action`, replacing any previous binding for `key`.
    ///
    /// `KeyCode::None` is never bound.
    pub fn bind(&mut self, key: KeyCode, action: InputAction) {
        if key == KeyCode::None {
            return;
        }
        if let Some(previous) = self.map.insert(key, action) {
            if previous != action {
                tracing::debug!(%key, from = %previous, to = %action, "key remapped");
            }
        }
    }

    /// Removes the binding for `key`, returning the action it had.
    pub fn unbind(&mut self, key: KeyCode) -> Option<InputAction> {
        self.map.remove(&key)
    }

    pub fn action_for(&self, key: KeyCode) -> Option<InputAction> {
        self.map.get(&key).copied()
    }

    /// All keys currently resolving to `action`.
    pub fn keys_for(&self, action: InputAction) -> impl Iterator<Item = KeyCode> + '_ {
        self.map
            .iter()
            .filter(move |(_, a)| **a == action)
            .map(|(k, _)| *k)
    }

    /// Restores the canonical table.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    #[test]
    fn default_table_is_a_function() {
        let mut seen = HashSet::new();
        for (key, _) in DEFAULT_BINDINGS {
            assert!(seen.insert(*key), "{key} bound twice");
        }
        assert_eq!(KeyBindings::default().len(), DEFAULT_BINDINGS.len());
    }

    #[test]
    fn arrows_and_vim_keys_share_movement() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.action_for(KeyCode::Up), Some(InputAction::MoveUp));
        assert_eq!(bindings.action_for(KeyCode::K), Some(InputAction::MoveUp));
        assert_eq!(bindings.action_for(KeyCode::H), Some(InputAction::MoveLeft));
        assert_eq!(bindings.action_for(KeyCode::L), Some(InputAction::MoveRight));
        assert_eq!(bindings.action_for(KeyCode::J), Some(InputAction::MoveDown));
    }

    #[test]
    fn digits_select_terrain_levels() {
        let bindings = KeyBindings::default();
        for level in 1..=9u8 {
            let key = KeyCode::from_char((b'0' + level) as char);
            assert!(key.is_digit());
            let action = bindings.action_for(key).unwrap();
            assert_eq!(action.terrain_level(), Some(level));
        }
        assert_eq!(bindings.action_for(KeyCode::Num0), None);
    }

    #[test]
    fn remap_is_local_to_the_copy() {
        let mut first = KeyBindings::default();
        let second = KeyBindings::default();

        first.bind(KeyCode::Z, InputAction::Pause);

        assert_eq!(first.action_for(KeyCode::Z), Some(InputAction::Pause));
        assert_eq!(second.action_for(KeyCode::Z), None);
        assert_eq!(first.action_for(KeyCode::Space), Some(InputAction::Pause));
    }

    #[test]
    fn remap_does_not_touch_other_keys() {
        let mut bindings = KeyBindings::default();
        let before = bindings.clone();

        bindings.bind(KeyCode::K, InputAction::ZoomIn);
        bindings.bind(KeyCode::K, InputAction::ZoomIn);

        for key in KeyCode::iter().filter(|&k| k != KeyCode::K) {
            assert_eq!(bindings.action_for(key), before.action_for(key));
        }
        assert_eq!(bindings.action_for(KeyCode::K), Some(InputAction::ZoomIn));
    }

    #[test]
    fn reset_restores_canonical_actions() {
        let mut bindings = KeyBindings::default();
        bindings.bind(KeyCode::Up, InputAction::Quit);
        bindings.unbind(KeyCode::Num3);
        bindings.reset();

        for (key, action) in DEFAULT_BINDINGS {
            assert_eq!(bindings.action_for(*key), Some(*action));
        }
    }

    #[test]
    fn none_key_is_never_bound() {
        let mut bindings = KeyBindings::empty();
        bindings.bind(KeyCode::None, InputAction::Pause);
        assert!(bindings.is_empty());
    }

    #[test]
    fn keys_for_lists_every_alias() {
        let bindings = KeyBindings::default();
        let keys: HashSet<_> = bindings.keys_for(InputAction::Quit).collect();
        assert_eq!(keys, HashSet::from([KeyCode::Escape, KeyCode::Q]));
    }

    #[test]
    fn char_round_trip_for_printables() {
        assert_eq!(KeyCode::from_char('Q'), KeyCode::Q);
        assert_eq!(KeyCode::Q.to_char(), Some('q'));
        assert_eq!(KeyCode::from_char('7').digit(), Some(7));
        assert_eq!(KeyCode::Up.to_char(), None);
        assert_eq!(KeyCode::from_char('€'), KeyCode::Unknown);
        assert_eq!(KeyCode::function(12), KeyCode::F12);
        assert_eq!(KeyCode::function(13), KeyCode::Unknown);
    }

    #[test]
    fn select_terrain_rejects_out_of_range() {
        assert_eq!(InputAction::select_terrain(0), None);
        assert_eq!(InputAction::select_terrain(10), None);
        assert_eq!(InputAction::select_terrain(4), Some(InputAction::SelectTerrain4));
        assert_eq!(InputAction::Pause.terrain_level(), None);
    }
}
