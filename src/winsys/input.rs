pub use crate::Result;

use crate::geometry::Pos;
use crate::window::Window;

use std::collections::HashSet;

use strum::EnumIter;

#[repr(u8)]
#[derive(Debug, PartialEq, EnumIter, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub enum Modifier {
    Ctrl = 1 << 0,
    Shift = 1 << 1,
    Alt = 1 << 2,
    AltGr = 1 << 3,
    Super = 1 << 4,
    NumLock = 1 << 5,
    ScrollLock = 1 << 6,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Button {
    Left,
    Middle,
    Right,
    ScrollUp,
    ScrollDown,
    Backward,
    Forward,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum MouseEventKind {
    Press,
    Release,
    Motion,
}

/// A pointer event as delivered to the window it happened in.
///
/// `window_rpos` is relative to `window`; `root_rpos` is absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub button: Option<Button>,
    pub modifiers: HashSet<Modifier>,
    pub window: Window,
    pub root_rpos: Pos,
    pub window_rpos: Pos,
}

impl MouseEvent {
    #[inline]
    pub fn is_scroll(&self) -> bool {
        match self.button {
            Some(Button::ScrollUp) | Some(Button::ScrollDown) => true,
            _ => false,
        }
    }
}
