//! Presentation configuration structures and loaders.
//!
//! The backend selector is the only externally visible switch for choosing a
//! presentation mode; everything else here tunes input pacing and frame rate.
use std::env;
use std::time::Duration;

/// Presentation backend selector.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum BackendKind {
    /// Resolved at initialization: window when a display is detectable,
    /// terminal otherwise.
    #[default]
    #[strum(to_string = "auto")]
    Auto,
    /// Character-grid terminal backend.
    #[strum(to_string = "terminal", serialize = "ncurses", serialize = "tty")]
    Terminal,
    /// Graphical window backend with the debug overlay.
    #[strum(to_string = "window", serialize = "sdl2", serialize = "gui")]
    Window,
}

/// Presentation configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    pub backend: BackendKind,
    pub enable_mouse: bool,
    /// Upper bound a blocking input wait uses between redraws.
    pub input_delay: Duration,
    pub target_fps: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Auto,
            enable_mouse: false,
            input_delay: Duration::from_millis(100),
            target_fps: 60,
        }
    }
}

impl RenderConfig {
    pub fn new(backend: BackendKind) -> Self {
        Self {
            backend,
            ..Self::default()
        }
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SIM_BACKEND` - `auto`, `terminal`/`ncurses`, `window`/`sdl2` (default: auto)
    /// - `SIM_MOUSE` - Enable mouse input (default: false)
    /// - `SIM_INPUT_DELAY_MS` - Input poll delay in milliseconds (default: 100)
    /// - `SIM_TARGET_FPS` - Target frame rate (default: 60)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(backend) = read_env::<BackendKind>("SIM_BACKEND") {
            config.backend = backend;
        }
        if let Some(mouse) = read_env_bool("SIM_MOUSE") {
            config.enable_mouse = mouse;
        }
        if let Some(delay) = read_env::<u64>("SIM_INPUT_DELAY_MS") {
            config.input_delay = Duration::from_millis(delay);
        }
        if let Some(fps) = read_env::<u32>("SIM_TARGET_FPS") {
            config.target_fps = fps.max(1);
        }

        config
    }

    /// Time budget of one frame at the target rate.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.target_fps.max(1)
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = RenderConfig::default();
        assert_eq!(config.backend, BackendKind::Auto);
        assert!(!config.enable_mouse);
        assert_eq!(config.input_delay, Duration::from_millis(100));
        assert_eq!(config.target_fps, 60);
    }

    #[test]
    fn backend_aliases_parse() {
        assert_eq!("ncurses".parse::<BackendKind>().unwrap(), BackendKind::Terminal);
        assert_eq!("SDL2".parse::<BackendKind>().unwrap(), BackendKind::Window);
        assert_eq!("Auto".parse::<BackendKind>().unwrap(), BackendKind::Auto);
        assert!("vulkan".parse::<BackendKind>().is_err());
        assert_eq!(BackendKind::Terminal.to_string(), "terminal");
    }

    #[test]
    fn frame_interval_never_divides_by_zero() {
        let config = RenderConfig {
            target_fps: 0,
            ..RenderConfig::default()
        };
        assert_eq!(config.frame_interval(), Duration::from_secs(1));
    }
}
