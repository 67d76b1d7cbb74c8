//! Keyboard input: platform-agnostic keys, playback controls and edge/level tracking.
//!
//! Backends feed raw key transitions into an [`InputState`]. The playback
//! controller only sees the [`ControlInput`] view, which answers two questions
//! per control: was it pressed since the last tick (edge), and is it held (level).

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::error::PlatformError;

/// Platform-agnostic key identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
    Space,
    Home,
    End,
    /// Printable character, always stored lowercase
    Char(char),
}

impl Key {
    /// Build a character key, normalizing case.
    pub fn char(c: char) -> Self {
        Key::Char(c.to_ascii_lowercase())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::ArrowLeft => f.write_str("Left"),
            Key::ArrowRight => f.write_str("Right"),
            Key::ArrowUp => f.write_str("Up"),
            Key::ArrowDown => f.write_str("Down"),
            Key::Enter => f.write_str("Enter"),
            Key::Escape => f.write_str("Escape"),
            Key::Space => f.write_str("Space"),
            Key::Home => f.write_str("Home"),
            Key::End => f.write_str("End"),
            Key::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
        }
    }
}

impl FromStr for Key {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let key = match trimmed.to_ascii_lowercase().as_str() {
            "left" | "arrowleft" => Key::ArrowLeft,
            "right" | "arrowright" => Key::ArrowRight,
            "up" | "arrowup" => Key::ArrowUp,
            "down" | "arrowdown" => Key::ArrowDown,
            "enter" | "return" => Key::Enter,
            "escape" | "esc" => Key::Escape,
            "space" => Key::Space,
            "home" => Key::Home,
            "end" => Key::End,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_whitespace() => Key::char(c),
                    _ => return Err(PlatformError::UnknownKey(trimmed.to_string())),
                }
            }
        };
        Ok(key)
    }
}

/// Playback controls the replay viewer reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    StepBackward,
    StepForward,
    PlayToggle,
    LoopToggle,
    Pause,
    SpeedUp,
    SpeedDown,
    Export,
    Quit,
}

impl Control {
    pub const ALL: [Control; 9] = [
        Control::StepBackward,
        Control::StepForward,
        Control::PlayToggle,
        Control::LoopToggle,
        Control::Pause,
        Control::SpeedUp,
        Control::SpeedDown,
        Control::Export,
        Control::Quit,
    ];

    /// Name used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Control::StepBackward => "step-backward",
            Control::StepForward => "step-forward",
            Control::PlayToggle => "play",
            Control::LoopToggle => "loop",
            Control::Pause => "pause",
            Control::SpeedUp => "speed-up",
            Control::SpeedDown => "speed-down",
            Control::Export => "export",
            Control::Quit => "quit",
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Control {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Control::ALL
            .into_iter()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| PlatformError::UnknownControl(s.to_string()))
    }
}

/// Key-to-control bindings
#[derive(Clone, Debug)]
pub struct KeyMap {
    bindings: FxHashMap<Key, Control>,
}

impl KeyMap {
    /// A map with no bindings.
    pub fn empty() -> Self {
        Self {
            bindings: FxHashMap::default(),
        }
    }

    /// Bind `key` to `control`, replacing any previous binding of that key.
    pub fn bind(&mut self, key: Key, control: Control) -> &mut Self {
        self.bindings.insert(key, control);
        self
    }

    /// Remove every key bound to `control`.
    pub fn unbind(&mut self, control: Control) -> &mut Self {
        self.bindings.retain(|_, c| *c != control);
        self
    }

    pub fn control_for(&self, key: Key) -> Option<Control> {
        self.bindings.get(&key).copied()
    }

    /// All keys bound to `control`, in no particular order.
    pub fn keys_for(&self, control: Control) -> impl Iterator<Item = Key> + '_ {
        self.bindings
            .iter()
            .filter(move |(_, c)| **c == control)
            .map(|(k, _)| *k)
    }
}

impl Default for KeyMap {
    /// Arrows step and change speed, P plays, L loops, Space pauses,
    /// Enter exports, Escape quits.
    fn default() -> Self {
        let mut map = Self::empty();
        map.bind(Key::ArrowLeft, Control::StepBackward)
            .bind(Key::ArrowRight, Control::StepForward)
            .bind(Key::char('p'), Control::PlayToggle)
            .bind(Key::char('l'), Control::LoopToggle)
            .bind(Key::Space, Control::Pause)
            .bind(Key::ArrowUp, Control::SpeedUp)
            .bind(Key::ArrowDown, Control::SpeedDown)
            .bind(Key::Enter, Control::Export)
            .bind(Key::Escape, Control::Quit);
        map
    }
}

/// Read-only view of control input for one tick.
pub trait ControlInput {
    /// The control went down since the previous tick.
    fn just_pressed(&self, control: Control) -> bool;

    /// The control is currently held down.
    fn is_held(&self, control: Control) -> bool;
}

/// Tracks held keys and key-down edges between ticks.
///
/// Auto-repeat key-downs for a key that is already held do not produce a new
/// edge, and an edge stays visible until [`InputState::end_tick`] is called.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    keymap: KeyMap,
    held: SmallVec<[Key; 8]>,
    pressed: SmallVec<[Key; 8]>,
}

impl InputState {
    pub fn new(keymap: KeyMap) -> Self {
        Self {
            keymap,
            held: SmallVec::new(),
            pressed: SmallVec::new(),
        }
    }

    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    /// Record a key going down.
    pub fn key_down(&mut self, key: Key) {
        if self.held.contains(&key) {
            return;
        }
        self.held.push(key);
        if !self.pressed.contains(&key) {
            self.pressed.push(key);
        }
    }

    /// Record a key going up.
    pub fn key_up(&mut self, key: Key) {
        self.held.retain(|k| *k != key);
    }

    /// Forget every held key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Consume this tick's edges.
    pub fn end_tick(&mut self) {
        self.pressed.clear();
    }

    pub fn is_key_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }
}

impl ControlInput for InputState {
    fn just_pressed(&self, control: Control) -> bool {
        self.pressed
            .iter()
            .any(|k| self.keymap.control_for(*k) == Some(control))
    }

    fn is_held(&self, control: Control) -> bool {
        self.held
            .iter()
            .any(|k| self.keymap.control_for(*k) == Some(control))
    }
}
