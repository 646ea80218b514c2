//! SDL keycodes to HID usage IDs.

use embedded_graphics_simulator::sdl2::Keycode;
use stryke_common::keycodes::usage;

/// HID usage for a desktop key, `None` for keys the simulator reserves or
/// does not map.
pub fn hid_usage(keycode: Keycode) -> Option<u16> {
    let usage = match keycode {
        Keycode::A => usage::A,
        Keycode::B => usage::B,
        Keycode::C => usage::C,
        Keycode::D => usage::D,
        Keycode::E => usage::E,
        Keycode::F => usage::F,
        Keycode::G => usage::G,
        Keycode::H => usage::H,
        Keycode::I => usage::I,
        Keycode::J => usage::J,
        Keycode::K => usage::K,
        Keycode::L => usage::L,
        Keycode::M => usage::M,
        Keycode::N => usage::N,
        Keycode::O => usage::O,
        Keycode::P => usage::P,
        Keycode::Q => usage::Q,
        Keycode::R => usage::R,
        Keycode::S => usage::S,
        Keycode::T => usage::T,
        Keycode::U => usage::U,
        Keycode::V => usage::V,
        Keycode::W => usage::W,
        Keycode::X => usage::X,
        Keycode::Y => usage::Y,
        Keycode::Z => usage::Z,
        Keycode::Num1 => usage::N1,
        Keycode::Num2 => usage::N2,
        Keycode::Num3 => usage::N3,
        Keycode::Num4 => usage::N4,
        Keycode::Num5 => usage::N5,
        Keycode::Num6 => usage::N6,
        Keycode::Num7 => usage::N7,
        Keycode::Num8 => usage::N8,
        Keycode::Num9 => usage::N9,
        Keycode::Num0 => usage::N0,
        Keycode::Return => usage::ENTER,
        Keycode::Escape => usage::ESCAPE,
        Keycode::Backspace => usage::BACKSPACE,
        Keycode::Tab => usage::TAB,
        Keycode::Space => usage::SPACE,
        Keycode::Minus => usage::MINUS,
        Keycode::Equals => usage::EQUAL,
        Keycode::LeftBracket => usage::LEFT_BRACKET,
        Keycode::RightBracket => usage::RIGHT_BRACKET,
        Keycode::Backslash => usage::BACKSLASH,
        Keycode::Semicolon => usage::SEMICOLON,
        Keycode::Quote => usage::QUOTE,
        Keycode::Backquote => usage::GRAVE,
        Keycode::Comma => usage::COMMA,
        Keycode::Period => usage::DOT,
        Keycode::Slash => usage::SLASH,
        Keycode::CapsLock => usage::CAPS_LOCK,
        Keycode::F1 => usage::F1,
        Keycode::F2 => usage::F2,
        Keycode::F3 => usage::F3,
        Keycode::F4 => usage::F4,
        Keycode::F5 => usage::F5,
        Keycode::F6 => usage::F6,
        Keycode::F7 => usage::F7,
        Keycode::F8 => usage::F8,
        Keycode::Insert => usage::INSERT,
        Keycode::Home => usage::HOME,
        Keycode::PageUp => usage::PAGE_UP,
        Keycode::Delete => usage::DELETE,
        Keycode::End => usage::END,
        Keycode::PageDown => usage::PAGE_DOWN,
        Keycode::Right => usage::RIGHT,
        Keycode::Left => usage::LEFT,
        Keycode::Down => usage::DOWN,
        Keycode::Up => usage::UP,
        Keycode::LCtrl => usage::LEFT_CTRL,
        Keycode::LShift => usage::LEFT_SHIFT,
        Keycode::LAlt => usage::LEFT_ALT,
        Keycode::LGui => usage::LEFT_GUI,
        Keycode::RCtrl => usage::RIGHT_CTRL,
        Keycode::RShift => usage::RIGHT_SHIFT,
        Keycode::RAlt => usage::RIGHT_ALT,
        Keycode::RGui => usage::RIGHT_GUI,
        _ => return None,
    };
    Some(usage)
}
