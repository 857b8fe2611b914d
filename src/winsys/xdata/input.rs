use super::super::input::Result;
pub use super::super::input::*;

use std::collections::HashSet;
use std::convert::TryFrom;

use anyhow::anyhow;
use strum::IntoEnumIterator;

use x11rb::protocol::xproto::ModMask;

impl From<Modifier> for u16 {
    fn from(modifier: Modifier) -> u16 {
        u16::from(match modifier {
            Modifier::Ctrl => ModMask::CONTROL,
            Modifier::Shift => ModMask::SHIFT,
            Modifier::Alt => ModMask::M1,
            Modifier::Super => ModMask::M4,
            Modifier::AltGr => ModMask::M3,
            Modifier::NumLock => ModMask::M2,
            Modifier::ScrollLock => ModMask::M5,
        })
    }
}

impl From<Button> for u8 {
    fn from(button: Button) -> u8 {
        match button {
            Button::Left => 1,
            Button::Middle => 2,
            Button::Right => 3,
            Button::ScrollUp => 4,
            Button::ScrollDown => 5,
            Button::Backward => 8,
            Button::Forward => 9,
        }
    }
}

impl TryFrom<u8> for Button {
    type Error = anyhow::Error;

    fn try_from(val: u8) -> Result<Self> {
        match val {
            1 => Ok(Self::Left),
            2 => Ok(Self::Middle),
            3 => Ok(Self::Right),
            4 => Ok(Self::ScrollUp),
            5 => Ok(Self::ScrollDown),
            8 => Ok(Self::Backward),
            9 => Ok(Self::Forward),
            _ => Err(anyhow!("no matching button for value {}", val)),
        }
    }
}

/// Decodes the modifier part of a key/button state mask. Lock modifiers
/// are left out so they never change the meaning of a click.
pub fn modifiers_from_state(state: u16) -> HashSet<Modifier> {
    Modifier::iter()
        .filter(|&modifier| modifier != Modifier::NumLock && modifier != Modifier::ScrollLock)
        .filter(|&modifier| state & u16::from(modifier) > 0)
        .collect()
}
