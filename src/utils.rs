use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use directories::ProjectDirs;
use std::path::PathBuf;

fn project_dirs() -> Option<ProjectDirs> {
    // Use "com" as qualifier for better cross-platform compatibility
    ProjectDirs::from("com", "dantags", "dantags")
}

/// Get the configuration directory path
pub fn get_config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the data directory path (log file lives here)
pub fn get_data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Parsed key binding information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedKeyBinding {
    pub key_code: KeyCode,
    pub requires_ctrl: bool,
}

/// Check if a key event has the primary modifier (Ctrl on Windows/Linux, Option/Alt on macOS)
pub fn has_primary_modifier(modifiers: KeyModifiers) -> bool {
    #[cfg(target_os = "macos")]
    {
        modifiers.contains(KeyModifiers::CONTROL) || modifiers.contains(KeyModifiers::ALT)
    }

    #[cfg(not(target_os = "macos"))]
    {
        modifiers.contains(KeyModifiers::CONTROL)
    }
}

/// Format a key binding string for display, showing the platform-appropriate modifier
/// On macOS, "Ctrl+" is replaced with "Opt+"
pub fn format_key_binding_for_display(key_binding: &str) -> String {
    #[cfg(target_os = "macos")]
    {
        key_binding.replace("Ctrl+", "Opt+")
    }

    #[cfg(not(target_os = "macos"))]
    {
        key_binding.to_string()
    }
}

/// Parse a key binding string from config into a ParsedKeyBinding
/// Supports: single keys ("q", "c"), special keys ("Enter", "Left", "F1"),
/// and the Ctrl modifier ("Ctrl+y")
pub fn parse_key_binding(key_str: &str) -> Result<ParsedKeyBinding, String> {
    let key_str = key_str.trim();

    if let Some(key_part) = key_str.strip_prefix("Ctrl+") {
        let key_code = parse_key_code(key_part)?;
        return Ok(ParsedKeyBinding {
            key_code,
            requires_ctrl: true,
        });
    }

    let key_code = parse_key_code(key_str)?;
    Ok(ParsedKeyBinding {
        key_code,
        requires_ctrl: false,
    })
}

/// Parse a key code from a string (without modifiers)
fn parse_key_code(key_str: &str) -> Result<KeyCode, String> {
    match key_str {
        "Enter" => Ok(KeyCode::Enter),
        "Esc" | "Escape" => Ok(KeyCode::Esc),
        "Backspace" => Ok(KeyCode::Backspace),
        "Tab" => Ok(KeyCode::Tab),
        "Space" | " " => Ok(KeyCode::Char(' ')),
        "Left" => Ok(KeyCode::Left),
        "Right" => Ok(KeyCode::Right),
        "Up" => Ok(KeyCode::Up),
        "Down" => Ok(KeyCode::Down),
        "Home" => Ok(KeyCode::Home),
        "End" => Ok(KeyCode::End),
        "Delete" => Ok(KeyCode::Delete),
        _ => {
            if let Some(n) = key_str.strip_prefix('F').and_then(|n| n.parse::<u8>().ok()) {
                if (1..=12).contains(&n) {
                    return Ok(KeyCode::F(n));
                }
            }
            let mut chars = key_str.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(KeyCode::Char(c)),
                _ => Err(format!("Unknown key binding: {}", key_str)),
            }
        }
    }
}

/// Check whether a key event matches a configured binding string.
/// Unparsable bindings never match
pub fn matches_key_event(key_event: KeyEvent, binding: &str) -> bool {
    let Ok(parsed) = parse_key_binding(binding) else {
        return false;
    };

    let ctrl = has_primary_modifier(key_event.modifiers);
    if parsed.requires_ctrl != ctrl {
        return false;
    }

    match (parsed.key_code, key_event.code) {
        // Letter bindings match regardless of shift state
        (KeyCode::Char(expected), KeyCode::Char(actual)) => {
            expected.eq_ignore_ascii_case(&actual)
        }
        (expected, actual) => expected == actual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_special_keys() {
        assert_eq!(parse_key_binding("q").unwrap().key_code, KeyCode::Char('q'));
        assert_eq!(parse_key_binding("Enter").unwrap().key_code, KeyCode::Enter);
        assert_eq!(parse_key_binding("Space").unwrap().key_code, KeyCode::Char(' '));
        assert_eq!(parse_key_binding("F1").unwrap().key_code, KeyCode::F(1));
        assert!(!parse_key_binding("Tab").unwrap().requires_ctrl);
    }

    #[test]
    fn parses_ctrl_modifier() {
        let parsed = parse_key_binding("Ctrl+y").unwrap();
        assert_eq!(parsed.key_code, KeyCode::Char('y'));
        assert!(parsed.requires_ctrl);
    }

    #[test]
    fn rejects_unknown_names() {
        assert!(parse_key_binding("F13").is_err());
        assert!(parse_key_binding("Banana").is_err());
        assert!(parse_key_binding("").is_err());
    }

    #[test]
    fn matches_events_with_and_without_ctrl() {
        let c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);

        assert!(matches_key_event(c, "c"));
        assert!(!matches_key_event(ctrl_c, "c"));
        assert!(matches_key_event(ctrl_c, "Ctrl+c"));
        assert!(!matches_key_event(c, "Ctrl+c"));
        assert!(matches_key_event(KeyEvent::new(KeyCode::Char('C'), KeyModifiers::SHIFT), "c"));
    }
}
