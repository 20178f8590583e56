//! Translate terminal key presses into logical [`InputEvent`]s.
//!
//! Screens never see key codes. Named keys go through a binding table;
//! any other printable character is reported as `InputEvent::Char`.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::InputEvent;

#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), InputEvent>,
}

impl Keymap {
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Enter), InputEvent::Confirm);
        bindings.insert((M::NONE, Esc), InputEvent::Cancel);
        bindings.insert((M::NONE, Up), InputEvent::Up);
        bindings.insert((M::NONE, Down), InputEvent::Down);
        bindings.insert((M::NONE, Backspace), InputEvent::Backspace);
        bindings.insert((M::NONE, Char(' ')), InputEvent::Space);
        // Some terminals report Shift+Space
        bindings.insert((M::SHIFT, Char(' ')), InputEvent::Space);
        Self { bindings }
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<InputEvent> {
        if let Some(ev) = self.bindings.get(&(key.modifiers, key.code)) {
            return Some(ev.clone());
        }
        match key.code {
            KeyCode::Char(c)
                if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                    && !c.is_control() =>
            {
                Some(InputEvent::Char(c))
            }
            _ => None,
        }
    }

    /// Ctrl+C leaves the program from any screen.
    pub fn is_force_quit(key: &KeyEvent) -> bool {
        key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}
