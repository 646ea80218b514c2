//! HID keyboard usages, modifier tracking and key label formatting.
//!
//! Key events carry USB HID keyboard/keypad usage IDs (page 0x07). This module
//! turns them into the short uppercase names shown on the key card and builds
//! combo labels such as `CTRL+SHFT+T`.

use bitflags::bitflags;
use heapless::String;

use crate::profiling::push_str_truncated;

/// Maximum key label length in bytes.
pub const MAX_LABEL_LEN: usize = 31;

/// Bounded key label.
pub type KeyLabel = String<MAX_LABEL_LEN>;

/// Label shown for usages without a dedicated name.
pub const UNKNOWN_KEY_LABEL: &str = "KEY";

/// Label shown before any key has been pressed.
pub const DEFAULT_KEY_LABEL: &str = "-";

// =============================================================================
// HID Usage IDs
// =============================================================================

/// HID keyboard page usage IDs used by the label table.
pub mod usage {
    pub const A: u16 = 0x04;
    pub const B: u16 = 0x05;
    pub const C: u16 = 0x06;
    pub const D: u16 = 0x07;
    pub const E: u16 = 0x08;
    pub const F: u16 = 0x09;
    pub const G: u16 = 0x0A;
    pub const H: u16 = 0x0B;
    pub const I: u16 = 0x0C;
    pub const J: u16 = 0x0D;
    pub const K: u16 = 0x0E;
    pub const L: u16 = 0x0F;
    pub const M: u16 = 0x10;
    pub const N: u16 = 0x11;
    pub const O: u16 = 0x12;
    pub const P: u16 = 0x13;
    pub const Q: u16 = 0x14;
    pub const R: u16 = 0x15;
    pub const S: u16 = 0x16;
    pub const T: u16 = 0x17;
    pub const U: u16 = 0x18;
    pub const V: u16 = 0x19;
    pub const W: u16 = 0x1A;
    pub const X: u16 = 0x1B;
    pub const Y: u16 = 0x1C;
    pub const Z: u16 = 0x1D;
    pub const N1: u16 = 0x1E;
    pub const N2: u16 = 0x1F;
    pub const N3: u16 = 0x20;
    pub const N4: u16 = 0x21;
    pub const N5: u16 = 0x22;
    pub const N6: u16 = 0x23;
    pub const N7: u16 = 0x24;
    pub const N8: u16 = 0x25;
    pub const N9: u16 = 0x26;
    pub const N0: u16 = 0x27;
    pub const ENTER: u16 = 0x28;
    pub const ESCAPE: u16 = 0x29;
    pub const BACKSPACE: u16 = 0x2A;
    pub const TAB: u16 = 0x2B;
    pub const SPACE: u16 = 0x2C;
    pub const MINUS: u16 = 0x2D;
    pub const EQUAL: u16 = 0x2E;
    pub const LEFT_BRACKET: u16 = 0x2F;
    pub const RIGHT_BRACKET: u16 = 0x30;
    pub const BACKSLASH: u16 = 0x31;
    pub const NON_US_HASH: u16 = 0x32;
    pub const SEMICOLON: u16 = 0x33;
    pub const QUOTE: u16 = 0x34;
    pub const GRAVE: u16 = 0x35;
    pub const COMMA: u16 = 0x36;
    pub const DOT: u16 = 0x37;
    pub const SLASH: u16 = 0x38;
    pub const CAPS_LOCK: u16 = 0x39;
    pub const F1: u16 = 0x3A;
    pub const F2: u16 = 0x3B;
    pub const F3: u16 = 0x3C;
    pub const F4: u16 = 0x3D;
    pub const F5: u16 = 0x3E;
    pub const F6: u16 = 0x3F;
    pub const F7: u16 = 0x40;
    pub const F8: u16 = 0x41;
    pub const F9: u16 = 0x42;
    pub const F10: u16 = 0x43;
    pub const F11: u16 = 0x44;
    pub const F12: u16 = 0x45;
    pub const PRINT_SCREEN: u16 = 0x46;
    pub const SCROLL_LOCK: u16 = 0x47;
    pub const PAUSE: u16 = 0x48;
    pub const INSERT: u16 = 0x49;
    pub const HOME: u16 = 0x4A;
    pub const PAGE_UP: u16 = 0x4B;
    pub const DELETE: u16 = 0x4C;
    pub const END: u16 = 0x4D;
    pub const PAGE_DOWN: u16 = 0x4E;
    pub const RIGHT: u16 = 0x4F;
    pub const LEFT: u16 = 0x50;
    pub const DOWN: u16 = 0x51;
    pub const UP: u16 = 0x52;
    pub const NUM_LOCK: u16 = 0x53;
    pub const KP_SLASH: u16 = 0x54;
    pub const KP_ASTERISK: u16 = 0x55;
    pub const KP_MINUS: u16 = 0x56;
    pub const KP_PLUS: u16 = 0x57;
    pub const KP_ENTER: u16 = 0x58;
    pub const KP_1: u16 = 0x59;
    pub const KP_0: u16 = 0x62;
    pub const KP_DOT: u16 = 0x63;
    pub const APPLICATION: u16 = 0x65;
    pub const LEFT_CTRL: u16 = 0xE0;
    pub const LEFT_SHIFT: u16 = 0xE1;
    pub const LEFT_ALT: u16 = 0xE2;
    pub const LEFT_GUI: u16 = 0xE3;
    pub const RIGHT_CTRL: u16 = 0xE4;
    pub const RIGHT_SHIFT: u16 = 0xE5;
    pub const RIGHT_ALT: u16 = 0xE6;
    pub const RIGHT_GUI: u16 = 0xE7;
}

const LETTERS: [&str; 26] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S", "T", "U", "V", "W",
    "X", "Y", "Z",
];

const DIGITS: [&str; 10] = ["1", "2", "3", "4", "5", "6", "7", "8", "9", "0"];

const FUNCTION_KEYS: [&str; 12] = ["F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12"];

/// Short display name for a HID usage. Unknown usages map to `"KEY"`.
pub fn key_label(keycode: u16) -> &'static str {
    use usage::*;

    let index = |first: u16| usize::from(keycode - first);
    match keycode {
        A..=Z => LETTERS[index(A)],
        N1..=N0 => DIGITS[index(N1)],
        F1..=F12 => FUNCTION_KEYS[index(F1)],
        KP_1..=KP_0 => DIGITS[index(KP_1)],
        ENTER | KP_ENTER => "ENT",
        ESCAPE => "ESC",
        BACKSPACE => "BSPC",
        TAB => "TAB",
        SPACE => "SPC",
        MINUS | KP_MINUS => "-",
        EQUAL => "=",
        LEFT_BRACKET => "[",
        RIGHT_BRACKET => "]",
        BACKSLASH | NON_US_HASH => "\\",
        SEMICOLON => ";",
        QUOTE => "'",
        GRAVE => "`",
        COMMA => ",",
        DOT | KP_DOT => ".",
        SLASH | KP_SLASH => "/",
        CAPS_LOCK => "CAPS",
        PRINT_SCREEN => "PSCR",
        SCROLL_LOCK => "SCRL",
        PAUSE => "PAUSE",
        INSERT => "INS",
        HOME => "HOME",
        PAGE_UP => "PGUP",
        DELETE => "DEL",
        END => "END",
        PAGE_DOWN => "PGDN",
        RIGHT => "RGT",
        LEFT => "LFT",
        DOWN => "DN",
        UP => "UP",
        NUM_LOCK => "NUMLK",
        KP_ASTERISK => "*",
        KP_PLUS => "+",
        APPLICATION => "MENU",
        _ => match Modifier::from_usage(keycode) {
            Some(modifier) => modifier.name(),
            None => UNKNOWN_KEY_LABEL,
        },
    }
}

// =============================================================================
// Modifiers
// =============================================================================

bitflags! {
    /// Held modifier keys, laid out like the HID boot report modifier byte.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const LEFT_CTRL = 1 << 0;
        const LEFT_SHIFT = 1 << 1;
        const LEFT_ALT = 1 << 2;
        const LEFT_GUI = 1 << 3;
        const RIGHT_CTRL = 1 << 4;
        const RIGHT_SHIFT = 1 << 5;
        const RIGHT_ALT = 1 << 6;
        const RIGHT_GUI = 1 << 7;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Modifiers {
    fn format(
        &self,
        f: defmt::Formatter,
    ) {
        defmt::write!(f, "Modifiers({=u8:#04x})", self.bits());
    }
}

impl Modifiers {
    /// The single bit a modifier usage (0xE0..=0xE7) maps to.
    pub const fn from_usage(keycode: u16) -> Option<Self> {
        if keycode >= usage::LEFT_CTRL && keycode <= usage::RIGHT_GUI {
            let bit = (keycode - usage::LEFT_CTRL) as u8;
            Some(Self::from_bits_retain(1u8 << bit))
        } else {
            None
        }
    }

    /// Modifier kinds present in the set, in label order.
    pub fn kinds(self) -> impl Iterator<Item = Modifier> {
        Modifier::ALL.into_iter().filter(move |kind| self.intersects(kind.flags()))
    }
}

/// Modifier kind, left and right keys merged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Modifier {
    Ctrl,
    Shift,
    Alt,
    Gui,
}

impl Modifier {
    /// All kinds in the order they appear in combo labels.
    pub const ALL: [Self; 4] = [Self::Ctrl, Self::Shift, Self::Alt, Self::Gui];

    /// Kind of a modifier usage, `None` for regular keys.
    pub const fn from_usage(keycode: u16) -> Option<Self> {
        match keycode {
            usage::LEFT_CTRL | usage::RIGHT_CTRL => Some(Self::Ctrl),
            usage::LEFT_SHIFT | usage::RIGHT_SHIFT => Some(Self::Shift),
            usage::LEFT_ALT | usage::RIGHT_ALT => Some(Self::Alt),
            usage::LEFT_GUI | usage::RIGHT_GUI => Some(Self::Gui),
            _ => None,
        }
    }

    /// Label text.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ctrl => "CTRL",
            Self::Shift => "SHFT",
            Self::Alt => "ALT",
            Self::Gui => "CMD",
        }
    }

    /// Left and right bits of this kind.
    pub const fn flags(self) -> Modifiers {
        match self {
            Self::Ctrl => Modifiers::LEFT_CTRL.union(Modifiers::RIGHT_CTRL),
            Self::Shift => Modifiers::LEFT_SHIFT.union(Modifiers::RIGHT_SHIFT),
            Self::Alt => Modifiers::LEFT_ALT.union(Modifiers::RIGHT_ALT),
            Self::Gui => Modifiers::LEFT_GUI.union(Modifiers::RIGHT_GUI),
        }
    }
}

/// Whether a usage is one of the eight modifier keys.
#[inline]
pub const fn is_modifier(keycode: u16) -> bool { Modifier::from_usage(keycode).is_some() }

// =============================================================================
// Label Formatting
// =============================================================================

/// Copy `text` into a [`KeyLabel`], truncating at a character boundary.
pub fn label_from(text: &str) -> KeyLabel {
    let mut label = KeyLabel::new();
    push_str_truncated(&mut label, text);
    label
}

/// Held modifier names joined by `+` (`"CTRL+SHFT"`). Empty for no modifiers.
pub fn modifier_label(modifiers: Modifiers) -> KeyLabel {
    let mut label = KeyLabel::new();
    for (i, kind) in modifiers.kinds().enumerate() {
        if i > 0 {
            push_str_truncated(&mut label, "+");
        }
        push_str_truncated(&mut label, kind.name());
    }
    label
}

/// `MODS+KEY`, or just `KEY` when no modifier is held.
pub fn combo_label(
    modifiers: Modifiers,
    key: &str,
) -> KeyLabel {
    let mut label = modifier_label(modifiers);
    if !label.is_empty() {
        push_str_truncated(&mut label, "+");
    }
    push_str_truncated(&mut label, key);
    label
}
