use std::{collections::HashMap, env, path::PathBuf};

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use derive_deref::{Deref, DerefMut};
use lazy_static::lazy_static;
use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize, de, de::Deserializer};
use tracing::warn;

use directories::{BaseDirs, ProjectDirs};

use crate::action::Action;

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Global,
    ContainerCreate,
}

const CONFIG: &str = include_str!("../.config/config.json5");

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub config_dir: PathBuf,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub keybindings: KeyBindings,
    #[serde(default)]
    pub styles: Styles,
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
}

impl Default for Config {
    /// The bindings and styles compiled into the binary.
    fn default() -> Self {
        match json5::from_str::<Config>(CONFIG) {
            Ok(mut cfg) => {
                cfg.config.data_dir = get_data_dir();
                cfg.config.config_dir = get_config_dir();
                cfg
            }
            Err(err) => {
                warn!("embedded config is invalid: {err}");
                Self {
                    config: AppConfig::default(),
                    keybindings: KeyBindings::default(),
                    styles: Styles::default(),
                }
            }
        }
    }
}

impl Config {
    /// Load the user configuration layered over the embedded defaults.
    ///
    /// An explicit path must exist. Without one, `~/.podtui-config.json5` is
    /// read when present. Bindings and styles missing from the user file are
    /// filled in from the defaults.
    pub fn from_path(config_path: Option<&PathBuf>) -> Result<Self, config::ConfigError> {
        let default_config: Config = json5::from_str(CONFIG)
            .map_err(|e| config::ConfigError::Message(format!("embedded config: {e}")))?;
        let data_dir = get_data_dir();
        let config_dir = get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("config_dir", config_dir.to_string_lossy().to_string())?;

        let (selected_path, required) = match config_path {
            Some(p) => (expand_tilde(p), true),
            None => (default_home_config_path(), false),
        };

        builder = builder.add_source(
            config::File::from(selected_path)
                .format(config::FileFormat::Json5)
                .required(required),
        );

        let mut cfg: Self = builder.build()?.try_deserialize()?;

        for (mode, default_bindings) in default_config.keybindings.0.iter() {
            let user_bindings = cfg.keybindings.0.entry(*mode).or_default();
            for (key, cmd) in default_bindings.iter() {
                user_bindings
                    .entry(key.clone())
                    .or_insert_with(|| cmd.clone());
            }
        }
        for (mode, default_styles) in default_config.styles.0.iter() {
            let user_styles = cfg.styles.0.entry(*mode).or_default();
            for (style_key, style) in default_styles.iter() {
                user_styles.entry(style_key.clone()).or_insert(*style);
            }
        }

        Ok(cfg)
    }

    /// Build instructions string from list of (mode, action) tuples
    pub fn actions_to_instructions(&self, actions: &[(Mode, Action)]) -> String {
        actions.iter()
            .map(|(mode, action)| {
                let friendly_name = self.action_to_friendly_name(action);
                if let Some(key) = self.key_for_action(*mode, action) {
                    format!("{key}: {friendly_name}")
                } else {
                    friendly_name.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
    }

    /// Convert an action to a friendly name
    pub fn action_to_friendly_name(&self, action: &Action) -> &'static str {
        match action {
            Action::Escape => "Cancel",
            Action::Enter => "Select",
            Action::Backspace => "Backspace",
            Action::Delete => "Delete",
            Action::Up => "Up",
            Action::Down => "Down",
            Action::Left => "Left",
            Action::Right => "Right",
            Action::Tab => "Next",
            Action::GoToFirst => "First",
            Action::GoToLast => "Last",
            Action::ToggleSpace => "Toggle",
            Action::Paste => "Paste",
            Action::ToggleInstructions => "Toggle Instructions",
            Action::Quit => "Quit",
            Action::DialogClose => "Close",
            Action::ContainerCreate(_) => "Create",
            _ => "Unknown",
        }
    }

    /// Resolve an action for a full key sequence for a given mode.
    pub fn action_for_keys(&self, mode: Mode, keys: &[KeyEvent]) -> Option<Action> {
        let map = self.keybindings.0.get(&mode)?;
        map.get(&keys.to_vec()).cloned()
    }

    /// Resolve an action for a single key event for a given mode.
    pub fn action_for_key(&self, mode: Mode, key: KeyEvent) -> Option<Action> {
        if key.kind != crossterm::event::KeyEventKind::Press {
            return None;
        }
        self.action_for_keys(mode, &[key])
    }

    /// Find the key for a given action in a specific mode
    pub fn key_for_action(&self, mode: Mode, action: &Action) -> Option<String> {
        let mode_bindings = self.keybindings.0.get(&mode)?;
        let mut keys: Vec<String> = mode_bindings
            .iter()
            .filter(|(_, bound)| *bound == action)
            .map(|(seq, _)| seq.iter().map(key_event_to_string).collect::<Vec<_>>().join(" "))
            .collect();
        // HashMap order is random; keep the instruction line stable between frames
        keys.sort();
        keys.into_iter().next()
    }

    /// Look up a named style for a mode, falling back to the default style.
    pub fn style(&self, mode: Mode, name: &str) -> Style {
        self.styles
            .0
            .get(&mode)
            .and_then(|styles| styles.get(name))
            .copied()
            .unwrap_or_default()
    }
}

fn expand_tilde(path: &PathBuf) -> PathBuf {
    if let Some(s) = path.to_str()
        && s.starts_with('~')
        && let Some(base) = BaseDirs::new()
    {
        return PathBuf::from(s.replacen('~', &base.home_dir().to_string_lossy(), 1));
    }
    path.clone()
}

fn default_home_config_path() -> PathBuf {
    if let Some(base) = BaseDirs::new() {
        return base.home_dir().join(".podtui-config.json5");
    }
    PathBuf::from(".podtui-config.json5")
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("io", "podtui", env!("CARGO_PKG_NAME"))
}

pub fn get_data_dir() -> PathBuf {
    if let Some(s) = DATA_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct KeyBindings(pub HashMap<Mode, HashMap<Vec<KeyEvent>, Action>>);

impl<'de> Deserialize<'de> for KeyBindings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed_map = HashMap::<Mode, HashMap<String, Action>>::deserialize(deserializer)?;

        let mut keybindings: HashMap<Mode, HashMap<Vec<KeyEvent>, Action>> = HashMap::new();
        for (mode, inner_map) in parsed_map {
            let mut converted = HashMap::new();
            for (key_string, action) in inner_map {
                let sequence = parse_key_sequence(&key_string).map_err(de::Error::custom)?;
                converted.insert(sequence, action);
            }
            keybindings.insert(mode, converted);
        }

        Ok(KeyBindings(keybindings))
    }
}

fn parse_key_event(raw: &str) -> Result<KeyEvent, String> {
    let raw_lower = raw.to_ascii_lowercase();
    let (remaining, modifiers) = extract_modifiers(&raw_lower);
    parse_key_code_with_modifiers(remaining, modifiers)
}

fn extract_modifiers(raw: &str) -> (&str, KeyModifiers) {
    let mut modifiers = KeyModifiers::empty();
    let mut current = raw;

    loop {
        match current {
            rest if rest.starts_with("ctrl-") => {
                modifiers.insert(KeyModifiers::CONTROL);
                current = &rest[5..];
            }
            rest if rest.starts_with("alt-") => {
                modifiers.insert(KeyModifiers::ALT);
                current = &rest[4..];
            }
            rest if rest.starts_with("shift-") => {
                modifiers.insert(KeyModifiers::SHIFT);
                current = &rest[6..];
            }
            _ => break,
        };
    }

    (current, modifiers)
}

fn parse_key_code_with_modifiers(
    raw: &str,
    mut modifiers: KeyModifiers,
) -> Result<KeyEvent, String> {
    let c = match raw {
        "esc" => KeyCode::Esc,
        "enter" => KeyCode::Enter,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "backtab" => {
            modifiers.insert(KeyModifiers::SHIFT);
            KeyCode::BackTab
        }
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        "insert" => KeyCode::Insert,
        "space" => KeyCode::Char(' '),
        "hyphen" | "minus" => KeyCode::Char('-'),
        "tab" => KeyCode::Tab,
        f if f.len() > 1 && f.starts_with('f') => match f[1..].parse::<u8>() {
            Ok(n) if (1..=12).contains(&n) => KeyCode::F(n),
            _ => return Err(format!("Unable to parse {raw}")),
        },
        c if c.chars().count() == 1 => {
            let Some(mut c) = c.chars().next() else {
                return Err(format!("Unable to parse {raw}"));
            };
            if modifiers.contains(KeyModifiers::SHIFT) {
                c = c.to_ascii_uppercase();
            }
            KeyCode::Char(c)
        }
        _ => return Err(format!("Unable to parse {raw}")),
    };
    Ok(KeyEvent::new(c, modifiers))
}

pub fn key_event_to_string(key_event: &KeyEvent) -> String {
    let char;
    let key_code = match key_event.code {
        KeyCode::Backspace => "backspace",
        KeyCode::Enter => "enter",
        KeyCode::Left => "left",
        KeyCode::Right => "right",
        KeyCode::Up => "up",
        KeyCode::Down => "down",
        KeyCode::Home => "home",
        KeyCode::End => "end",
        KeyCode::PageUp => "pageup",
        KeyCode::PageDown => "pagedown",
        KeyCode::Tab => "tab",
        KeyCode::BackTab => "backtab",
        KeyCode::Delete => "delete",
        KeyCode::Insert => "insert",
        KeyCode::F(c) => {
            char = format!("f{c}");
            &char
        }
        KeyCode::Char(' ') => "space",
        KeyCode::Char(c) => {
            char = c.to_string();
            &char
        }
        KeyCode::Esc => "esc",
        _ => "",
    };

    let mut modifiers = Vec::with_capacity(3);

    if key_event.modifiers.intersects(KeyModifiers::CONTROL) {
        modifiers.push("ctrl");
    }

    if key_event.modifiers.intersects(KeyModifiers::SHIFT) {
        modifiers.push("shift");
    }

    if key_event.modifiers.intersects(KeyModifiers::ALT) {
        modifiers.push("alt");
    }

    let mut key = modifiers.join("-");

    if !key.is_empty() {
        key.push('-');
    }
    key.push_str(key_code);

    key
}

pub fn parse_key_sequence(raw: &str) -> Result<Vec<KeyEvent>, String> {
    if raw.chars().filter(|c| *c == '>').count() != raw.chars().filter(|c| *c == '<').count() {
        return Err(format!("Unable to parse `{raw}`"));
    }
    let raw = if !raw.contains("><") {
        let raw = raw.strip_prefix('<').unwrap_or(raw);
        raw.strip_suffix('>').unwrap_or(raw)
    } else {
        raw
    };
    let sequences = raw
        .split("><")
        .map(|seq| {
            if let Some(s) = seq.strip_prefix('<') {
                s
            } else if let Some(s) = seq.strip_suffix('>') {
                s
            } else {
                seq
            }
        })
        .collect::<Vec<_>>();

    sequences.into_iter().map(parse_key_event).collect()
}

#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct Styles(pub HashMap<Mode, HashMap<String, Style>>);

impl<'de> Deserialize<'de> for Styles {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed_map = HashMap::<Mode, HashMap<String, String>>::deserialize(deserializer)?;

        let styles: HashMap<Mode, HashMap<String, Style>> = parsed_map
            .into_iter()
            .map(|(mode, inner_map)| {
                let converted_inner_map: HashMap<String, Style> = inner_map
                    .into_iter()
                    .map(|(key, style_string)| (key, parse_style(&style_string)))
                    .collect();
                (mode, converted_inner_map)
            })
            .collect();

        Ok(Styles(styles))
    }
}

/// Parse strings such as `"bold black on white"` into a style.
///
/// Everything before `on` describes the foreground, everything after it the
/// background. `bold`, `underline` and `inverse` may appear on either side.
pub fn parse_style(line: &str) -> Style {
    let lower = line.to_lowercase();
    let (foreground, background) = match lower.find(" on ").map(|i| i + 1).or_else(|| {
        lower.starts_with("on ").then_some(0)
    }) {
        Some(split) => (&lower[..split], &lower[split + 3..]),
        None => (lower.as_str(), ""),
    };
    let foreground = process_color_string(foreground);
    let background = process_color_string(background);

    let mut style = Style::default();
    if let Some(fg) = parse_color(&foreground.0) {
        style = style.fg(fg);
    }
    if let Some(bg) = parse_color(&background.0) {
        style = style.bg(bg);
    }
    style.add_modifier(foreground.1 | background.1)
}

fn process_color_string(color_str: &str) -> (String, Modifier) {
    let mut modifiers = Modifier::empty();
    let mut words = Vec::new();
    for word in color_str.split_whitespace() {
        match word {
            "bold" => modifiers |= Modifier::BOLD,
            "underline" => modifiers |= Modifier::UNDERLINED,
            "inverse" => modifiers |= Modifier::REVERSED,
            other => words.push(other.replace("grey", "gray")),
        }
    }
    (words.join(" "), modifiers)
}

fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(index) = s.strip_prefix("color") {
        return index.parse::<u8>().ok().map(Color::Indexed);
    }
    if let Some(level) = s.strip_prefix("gray")
        && !level.is_empty()
    {
        return level.parse::<u8>().ok().map(|l| Color::Indexed(232 + l.min(23)));
    }
    if let Some(rgb) = s.strip_prefix("rgb") {
        let digits: Vec<u8> = rgb
            .chars()
            .filter_map(|c| c.to_digit(6).map(|d| d as u8))
            .collect();
        if let [r, g, b] = digits[..] {
            return Some(Color::Indexed(16 + r * 36 + g * 6 + b));
        }
        return None;
    }
    let color = match s {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" => Color::Gray,
        "darkgray" | "dark gray" => Color::DarkGray,
        "white" => Color::White,
        "bright red" => Color::LightRed,
        "bright green" => Color::LightGreen,
        "bright yellow" => Color::LightYellow,
        "bright blue" => Color::LightBlue,
        "bright magenta" => Color::LightMagenta,
        "bright cyan" => Color::LightCyan,
        _ => return None,
    };
    Some(color)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_style_default() {
        let style = parse_style("");
        assert_eq!(style, Style::default());
    }

    #[test]
    fn test_parse_style_foreground() {
        let style = parse_style("red");
        assert_eq!(style.fg, Some(Color::Red));
        assert_eq!(style.bg, None);
    }

    #[test]
    fn test_parse_style_background() {
        let style = parse_style("on blue");
        assert_eq!(style.fg, None);
        assert_eq!(style.bg, Some(Color::Blue));
    }

    #[test]
    fn test_parse_style_modifiers() {
        let style = parse_style("bold black on white");
        assert_eq!(style.fg, Some(Color::Black));
        assert_eq!(style.bg, Some(Color::White));
        assert!(style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_process_color_string() {
        let (color, modifiers) = process_color_string("underline bold inverse grey");
        assert_eq!(color, "gray");
        assert!(modifiers.contains(Modifier::UNDERLINED));
        assert!(modifiers.contains(Modifier::BOLD));
        assert!(modifiers.contains(Modifier::REVERSED));
    }

    #[test]
    fn test_parse_color_indexed() {
        assert_eq!(parse_color("rgb123"), Some(Color::Indexed(16 + 36 + 2 * 6 + 3)));
        assert_eq!(parse_color("color42"), Some(Color::Indexed(42)));
        assert_eq!(parse_color("gray3"), Some(Color::Indexed(235)));
        assert_eq!(parse_color("unknown"), None);
    }

    #[test]
    fn test_simple_keys() {
        assert_eq!(
            parse_key_event("a").unwrap(),
            KeyEvent::new(KeyCode::Char('a'), KeyModifiers::empty())
        );
        assert_eq!(
            parse_key_event("enter").unwrap(),
            KeyEvent::new(KeyCode::Enter, KeyModifiers::empty())
        );
        assert_eq!(
            parse_key_event("f5").unwrap(),
            KeyEvent::new(KeyCode::F(5), KeyModifiers::empty())
        );
    }

    #[test]
    fn test_with_modifiers() {
        assert_eq!(
            parse_key_event("ctrl-v").unwrap(),
            KeyEvent::new(KeyCode::Char('v'), KeyModifiers::CONTROL)
        );
        assert_eq!(
            parse_key_event("ctrl-alt-a").unwrap(),
            KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL | KeyModifiers::ALT)
        );
    }

    #[test]
    fn test_reverse_multiple_modifiers() {
        assert_eq!(
            key_event_to_string(&KeyEvent::new(
                KeyCode::Char('a'),
                KeyModifiers::CONTROL | KeyModifiers::ALT
            )),
            "ctrl-alt-a".to_string()
        );
    }

    #[test]
    fn test_invalid_keys() {
        assert!(parse_key_event("invalid-key").is_err());
        assert!(parse_key_event("ctrl-invalid-key").is_err());
        assert!(parse_key_sequence("<ctrl-a").is_err());
    }

    #[test]
    fn test_invalid_binding_is_a_deserialize_error() {
        let result = json5::from_str::<Config>(r#"{ keybindings: { Global: { "<nonsense-key>": "Quit" } } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_embedded_defaults() {
        let cfg = Config::default();
        let tab = KeyEvent::new(KeyCode::Tab, KeyModifiers::empty());
        assert_eq!(cfg.action_for_key(Mode::Global, tab), Some(Action::Tab));

        let j = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::empty());
        assert_eq!(cfg.action_for_key(Mode::Global, j), None);
        assert_eq!(cfg.action_for_key(Mode::ContainerCreate, j), Some(Action::Down));

        assert_eq!(cfg.style(Mode::ContainerCreate, "input").bg, Some(Color::Blue));
        assert_eq!(cfg.style(Mode::ContainerCreate, "missing"), Style::default());
    }

    #[test]
    fn test_actions_to_instructions() {
        let cfg = Config::default();
        let line = cfg.actions_to_instructions(&[
            (Mode::Global, Action::Tab),
            (Mode::Global, Action::Escape),
        ]);
        assert_eq!(line, "tab: Next  esc: Cancel");
    }
}
