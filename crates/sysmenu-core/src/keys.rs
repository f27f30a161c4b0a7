//! Virtual key codes and key-combination parsing.

pub const VK_SHIFT: u32 = 0x10;
pub const VK_CONTROL: u32 = 0x11;
pub const VK_MENU: u32 = 0x12;
pub const VK_LWIN: u32 = 0x5B;
pub const VK_DOWN: u32 = 0x28;

/// Maximum number of keys in a hotkey combination.
pub const MAX_COMBINATION: usize = 3;

/// Converts a key name string to a Windows virtual key code.
///
/// Supports modifiers (Ctrl, Shift, Alt, Win), letters, digits,
/// function keys (F1–F24) and common named keys. Matching is
/// case-insensitive.
pub fn vk_from_name(name: &str) -> Option<u32> {
    let upper = name.trim().to_ascii_uppercase();

    if upper.len() == 1 {
        let ch = upper.as_bytes()[0];
        if ch.is_ascii_uppercase() || ch.is_ascii_digit() {
            return Some(u32::from(ch));
        }
    }

    if let Some(rest) = upper.strip_prefix('F')
        && let Ok(n) = rest.parse::<u32>()
        && (1..=24).contains(&n)
    {
        return Some(0x70 + n - 1);
    }

    match upper.as_str() {
        "CTRL" | "CONTROL" => Some(VK_CONTROL),
        "SHIFT" => Some(VK_SHIFT),
        "ALT" | "MENU" => Some(VK_MENU),
        "WIN" | "LWIN" => Some(VK_LWIN),

        "ENTER" | "RETURN" => Some(0x0D),
        "TAB" => Some(0x09),
        "ESCAPE" | "ESC" => Some(0x1B),
        "SPACE" => Some(0x20),
        "BACKSPACE" => Some(0x08),
        "DELETE" | "DEL" => Some(0x2E),
        "INSERT" | "INS" => Some(0x2D),
        "HOME" => Some(0x24),
        "END" => Some(0x23),
        "PAGEUP" | "PGUP" => Some(0x21),
        "PAGEDOWN" | "PGDN" => Some(0x22),

        "LEFT" => Some(0x25),
        "UP" => Some(0x26),
        "RIGHT" => Some(0x27),
        "DOWN" => Some(VK_DOWN),

        "MINUS" => Some(0xBD),
        "PLUS" | "EQUALS" => Some(0xBB),
        "COMMA" => Some(0xBC),
        "PERIOD" | "DOT" => Some(0xBE),

        _ => None,
    }
}

/// Normalizes a virtual key so left/right variants match the generic code.
pub fn normalize_vk(vk: u32) -> u32 {
    match vk {
        0xA0 | 0xA1 => VK_SHIFT,
        0xA2 | 0xA3 => VK_CONTROL,
        0xA4 | 0xA5 => VK_MENU,
        0x5C => VK_LWIN,
        other => other,
    }
}

/// Parses a configured key combination such as `["ctrl", "alt", "t"]`.
///
/// Returns `None` when the list is empty, longer than
/// [`MAX_COMBINATION`], or contains an unknown key name.
pub fn parse_combination(names: &[String]) -> Option<Vec<u32>> {
    if names.is_empty() || names.len() > MAX_COMBINATION {
        return None;
    }
    names.iter().map(|n| vk_from_name(n)).collect()
}

/// Renders a combination for display in a menu item, e.g. `Ctrl+Alt+T`.
pub fn display_combination(names: &[String]) -> String {
    names
        .iter()
        .map(|n| {
            let mut chars = n.trim().chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("+")
}
