use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Baseline scroll velocity in position units per second at 1.0x speed
pub const BASE_SCROLL_VELOCITY: f64 = 60.0;
/// Slowest allowed speed multiplier
pub const MIN_SPEED: f64 = 0.1;
/// Fastest allowed speed multiplier
pub const MAX_SPEED: f64 = 5.0;
/// Speed used whenever a configured value is missing or not a number
pub const DEFAULT_SPEED: f64 = 1.0;
/// Largest number of blank rows inserted after each text row
pub const MAX_LINE_SPACING: u16 = 3;
/// Largest frame padding in columns
pub const MAX_FRAME_PADDING: u16 = 40;

/// Clamp a speed multiplier into the supported range.
/// Non-finite values fall back to [`DEFAULT_SPEED`].
pub fn clamp_speed(speed: f64) -> f64 {
    if speed.is_finite() {
        speed.clamp(MIN_SPEED, MAX_SPEED)
    } else {
        DEFAULT_SPEED
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Direction the content travels while auto-scrolling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    /// Content moves toward decreasing offset (text rises)
    #[default]
    #[serde(alias = "up")]
    Forward,
    /// Content moves toward increasing offset (text sinks)
    #[serde(alias = "down")]
    Reverse,
}

impl ScrollDirection {
    /// Sign applied to the per-tick distance
    pub fn sign(self) -> f64 {
        match self {
            ScrollDirection::Forward => -1.0,
            ScrollDirection::Reverse => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            ScrollDirection::Forward => ScrollDirection::Reverse,
            ScrollDirection::Reverse => ScrollDirection::Forward,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScrollDirection::Forward => "forward",
            ScrollDirection::Reverse => "reverse",
        }
    }
}

/// Auto-scroll and nudge parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Speed multiplier of the baseline velocity.
    /// Accepts a number or a numeric string; anything else becomes 1.0.
    #[serde(default = "default_speed", deserialize_with = "deserialize_speed")]
    pub speed: f64,
    #[serde(default)]
    pub direction: ScrollDirection,
    /// Increment used by the speed up/down keys
    #[serde(default = "default_speed_step")]
    pub speed_step: f64,
    /// Distance of a single nudge in position units
    #[serde(default = "default_nudge_distance")]
    pub nudge_distance: f64,
    /// Duration of the eased nudge transition
    #[serde(default = "default_nudge_duration")]
    pub nudge_duration_ms: u64,
    /// Delay before a held nudge key starts repeating
    #[serde(default = "default_hold_delay")]
    pub hold_delay_ms: u64,
    /// Interval between repeated nudges while held
    #[serde(default = "default_hold_interval")]
    pub hold_interval_ms: u64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            direction: ScrollDirection::default(),
            speed_step: default_speed_step(),
            nudge_distance: default_nudge_distance(),
            nudge_duration_ms: default_nudge_duration(),
            hold_delay_ms: default_hold_delay(),
            hold_interval_ms: default_hold_interval(),
        }
    }
}

impl ScrollConfig {
    /// Return a copy with every value forced into its valid range
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let positive_or = |value: f64, fallback: f64| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        };

        Self {
            speed: clamp_speed(self.speed),
            direction: self.direction,
            speed_step: positive_or(self.speed_step, defaults.speed_step),
            nudge_distance: positive_or(self.nudge_distance.abs(), defaults.nudge_distance),
            nudge_duration_ms: self.nudge_duration_ms,
            hold_delay_ms: self.hold_delay_ms,
            // A zero interval would repeat forever within a single pump
            hold_interval_ms: self.hold_interval_ms.max(MIN_HOLD_INTERVAL_MS),
        }
    }
}

const MIN_HOLD_INTERVAL_MS: u64 = 10;

// Accepts `speed = 1.5` as well as `speed = "1.5"`
fn deserialize_speed<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct SpeedVisitor;

    impl<'de> Visitor<'de> for SpeedVisitor {
        type Value = f64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number or a numeric string")
        }

        fn visit_f64<E>(self, value: f64) -> Result<f64, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<f64, E>
        where
            E: de::Error,
        {
            Ok(value as f64)
        }

        fn visit_u64<E>(self, value: u64) -> Result<f64, E>
        where
            E: de::Error,
        {
            Ok(value as f64)
        }

        fn visit_str<E>(self, value: &str) -> Result<f64, E>
        where
            E: de::Error,
        {
            match value.trim().parse::<f64>() {
                Ok(speed) if speed.is_finite() => Ok(speed),
                _ => {
                    tracing::warn!(value, "Invalid scroll speed, using default");
                    Ok(DEFAULT_SPEED)
                }
            }
        }

        fn visit_bool<E>(self, value: bool) -> Result<f64, E>
        where
            E: de::Error,
        {
            tracing::warn!(value, "Invalid scroll speed, using default");
            Ok(DEFAULT_SPEED)
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<f64, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            while seq.next_element::<de::IgnoredAny>()?.is_some() {}
            tracing::warn!("Invalid scroll speed (array), using default");
            Ok(DEFAULT_SPEED)
        }

        // Tables and TOML datetimes both arrive as maps
        fn visit_map<A>(self, mut map: A) -> Result<f64, A::Error>
        where
            A: de::MapAccess<'de>,
        {
            while map
                .next_entry::<de::IgnoredAny, de::IgnoredAny>()?
                .is_some()
            {}
            tracing::warn!("Invalid scroll speed (table), using default");
            Ok(DEFAULT_SPEED)
        }
    }

    deserializer.deserialize_any(SpeedVisitor)
}

/// Horizontal text alignment inside the prompter frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

impl Alignment {
    pub fn next(self) -> Self {
        match self {
            Alignment::Left => Alignment::Center,
            Alignment::Center => Alignment::Right,
            Alignment::Right => Alignment::Left,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// Text presentation settings. Changing any of these while presenting
/// alters the layout metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Position units covered by one terminal row
    #[serde(default = "default_units_per_row")]
    pub units_per_row: f64,
    /// Blank rows after each text row (0-3)
    #[serde(default = "default_line_spacing")]
    pub line_spacing: u16,
    /// Horizontal padding in columns; vertical padding is half of it in rows
    #[serde(default = "default_frame_padding")]
    pub frame_padding: u16,
    #[serde(default)]
    pub alignment: Alignment,
    /// Hex color, e.g. "#ffffff"
    #[serde(default = "default_text_color")]
    pub text_color: String,
    /// Hex color, e.g. "#000000"
    #[serde(default = "default_background_color")]
    pub background_color: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            units_per_row: default_units_per_row(),
            line_spacing: default_line_spacing(),
            frame_padding: default_frame_padding(),
            alignment: Alignment::default(),
            text_color: default_text_color(),
            background_color: default_background_color(),
        }
    }
}

impl DisplayConfig {
    pub fn sanitized(&self) -> Self {
        let units_per_row = if self.units_per_row.is_finite() && self.units_per_row >= 1.0 {
            self.units_per_row
        } else {
            default_units_per_row()
        };
        Self {
            units_per_row,
            line_spacing: self.line_spacing.min(MAX_LINE_SPACING),
            frame_padding: self.frame_padding.min(MAX_FRAME_PADDING),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Frames per second driving the scroll engine
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    /// How long flashed status messages stay visible
    #[serde(default = "default_status_duration")]
    pub status_duration_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            status_duration_ms: default_status_duration(),
        }
    }
}

impl UiConfig {
    /// Time between frames, falling back to ~60fps when unset
    pub fn frame_interval(&self) -> std::time::Duration {
        if self.frame_rate == 0 {
            std::time::Duration::from_millis(16)
        } else {
            std::time::Duration::from_micros(1_000_000 / self.frame_rate as u64)
        }
    }
}

/// Keymap configuration using Vim-style notation
/// Format: "q", "<C-c>" (Ctrl+c), "<CR>" (Enter), "<Esc>", "<Space>", "<Up>"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    /// Quit the application
    #[serde(default = "default_key_quit")]
    pub quit: String,
    /// Enter presentation / toggle play and pause
    #[serde(default = "default_key_toggle_play")]
    pub toggle_play: String,
    /// Leave presentation mode
    #[serde(default = "default_key_exit_presentation")]
    pub exit_presentation: String,
    /// Nudge the text up (hold to repeat)
    #[serde(default = "default_key_nudge_up")]
    pub nudge_up: String,
    /// Nudge the text down (hold to repeat)
    #[serde(default = "default_key_nudge_down")]
    pub nudge_down: String,
    #[serde(default = "default_key_speed_up")]
    pub speed_up: String,
    #[serde(default = "default_key_speed_down")]
    pub speed_down: String,
    /// Flip the scroll direction
    #[serde(default = "default_key_toggle_direction")]
    pub toggle_direction: String,
    /// Jump back to the entry position
    #[serde(default = "default_key_reset")]
    pub reset: String,
    #[serde(default = "default_key_padding_decrease")]
    pub padding_decrease: String,
    #[serde(default = "default_key_padding_increase")]
    pub padding_increase: String,
    #[serde(default = "default_key_spacing_decrease")]
    pub spacing_decrease: String,
    #[serde(default = "default_key_spacing_increase")]
    pub spacing_increase: String,
    #[serde(default = "default_key_cycle_alignment")]
    pub cycle_alignment: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            toggle_play: default_key_toggle_play(),
            exit_presentation: default_key_exit_presentation(),
            nudge_up: default_key_nudge_up(),
            nudge_down: default_key_nudge_down(),
            speed_up: default_key_speed_up(),
            speed_down: default_key_speed_down(),
            toggle_direction: default_key_toggle_direction(),
            reset: default_key_reset(),
            padding_decrease: default_key_padding_decrease(),
            padding_increase: default_key_padding_increase(),
            spacing_decrease: default_key_spacing_decrease(),
            spacing_increase: default_key_spacing_increase(),
            cycle_alignment: default_key_cycle_alignment(),
        }
    }
}

// Default keymap values (Vim-style notation)
fn default_key_quit() -> String { "q".to_string() }
fn default_key_toggle_play() -> String { "<Space>".to_string() }
fn default_key_exit_presentation() -> String { "<Esc>".to_string() }
fn default_key_nudge_up() -> String { "<Up>".to_string() }
fn default_key_nudge_down() -> String { "<Down>".to_string() }
fn default_key_speed_up() -> String { "+".to_string() }
fn default_key_speed_down() -> String { "-".to_string() }
fn default_key_toggle_direction() -> String { "d".to_string() }
fn default_key_reset() -> String { "r".to_string() }
fn default_key_padding_decrease() -> String { "<Left>".to_string() }
fn default_key_padding_increase() -> String { "<Right>".to_string() }
fn default_key_spacing_decrease() -> String { "[".to_string() }
fn default_key_spacing_increase() -> String { "]".to_string() }
fn default_key_cycle_alignment() -> String { "a".to_string() }

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("telecue")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_speed() -> f64 {
    DEFAULT_SPEED
}

fn default_speed_step() -> f64 {
    0.1
}

fn default_nudge_distance() -> f64 {
    120.0
}

fn default_nudge_duration() -> u64 {
    280
}

fn default_hold_delay() -> u64 {
    260
}

fn default_hold_interval() -> u64 {
    180
}

fn default_units_per_row() -> f64 {
    16.0
}

fn default_line_spacing() -> u16 {
    1
}

fn default_frame_padding() -> u16 {
    4
}

fn default_text_color() -> String {
    "#ffffff".to_string()
}

fn default_background_color() -> String {
    "#000000".to_string()
}

fn default_frame_rate() -> u32 {
    60
}

fn default_status_duration() -> u64 {
    1500
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from an explicit path, defaults if it does not exist
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file, creating parent directories
    pub fn save_to(&self, path: &std::path::Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/telecue/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("telecue")
            .join("config.toml")
    }

    /// Get the log file path
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("telecue.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}
