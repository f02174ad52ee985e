//! Host shell capability.
//!
//! Everything the reward machine needs from its embedding environment goes
//! through [`HostShell`]. The implementation is picked once at construction;
//! [`NullHost`] stands in when no shell is available.

mod system;

pub use system::SystemHost;

use serde::{Deserialize, Serialize};

use crate::error::HostError;

/// Haptic feedback styles a host may render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HapticKind {
    Light,
    Medium,
    Heavy,
    Success,
    Error,
    Warning,
    Selection,
}

/// State of the host-provided primary action button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryAction {
    pub label: String,
    pub visible: bool,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

/// Raw theme colours as reported by the host; any may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeParams {
    pub bg_color: Option<String>,
    pub secondary_bg_color: Option<String>,
    pub text_color: Option<String>,
    pub hint_color: Option<String>,
    pub button_color: Option<String>,
    pub button_text_color: Option<String>,
    pub color_scheme: ColorScheme,
}

/// Theme with every colour filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub bg_color: String,
    pub secondary_bg_color: String,
    pub text_color: String,
    pub hint_color: String,
    pub button_color: String,
    pub button_text_color: String,
    pub color_scheme: ColorScheme,
}

impl ThemeParams {
    pub fn resolve(&self) -> Theme {
        let pick = |value: &Option<String>, fallback: &str| {
            value.clone().unwrap_or_else(|| fallback.to_string())
        };
        Theme {
            bg_color: pick(&self.bg_color, "#ffffff"),
            secondary_bg_color: pick(&self.secondary_bg_color, "#f1f1f1"),
            text_color: pick(&self.text_color, "#000000"),
            hint_color: pick(&self.hint_color, "#8e8e93"),
            button_color: pick(&self.button_color, "#2481cc"),
            button_text_color: pick(&self.button_text_color, "#ffffff"),
            color_scheme: self.color_scheme,
        }
    }
}

/// Input events originating from the host shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostInput {
    PrimaryActionClicked,
    VisibilityChanged { hidden: bool },
    ThemeChanged,
    ViewportChanged,
    /// The host's back button was pressed.
    BackRequested,
}

pub trait HostShell {
    /// Fire-and-forget: returning `Ok` means the open was dispatched.
    fn open_external_link(&mut self, url: &str) -> Result<(), HostError>;

    fn show_primary_action(&mut self, action: &PrimaryAction);

    fn haptic_feedback(&mut self, kind: HapticKind);

    fn current_user_display_name(&self) -> Option<String>;

    fn theme_params(&self) -> ThemeParams {
        ThemeParams::default()
    }

    fn viewport_height(&self) -> Option<u32> {
        None
    }

    /// Ask the user before the shell closes the app.
    fn enable_closing_confirmation(&mut self) {}

    /// Close the app.
    fn close(&mut self) {}
}

/// Host used when no shell is present. Every call is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl HostShell for NullHost {
    fn open_external_link(&mut self, url: &str) -> Result<(), HostError> {
        tracing::debug!(%url, "no host shell, link not opened");
        Ok(())
    }

    fn show_primary_action(&mut self, _action: &PrimaryAction) {}

    fn haptic_feedback(&mut self, _kind: HapticKind) {}

    fn current_user_display_name(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_fills_missing_colours() {
        let params = ThemeParams {
            bg_color: Some("#101010".into()),
            color_scheme: ColorScheme::Dark,
            ..ThemeParams::default()
        };
        let theme = params.resolve();
        assert_eq!(theme.bg_color, "#101010");
        assert_eq!(theme.secondary_bg_color, "#f1f1f1");
        assert_eq!(theme.button_color, "#2481cc");
        assert_eq!(theme.color_scheme, ColorScheme::Dark);
    }

    #[test]
    fn null_host_accepts_everything() {
        let mut host = NullHost;
        assert!(host.open_external_link("https://example.com").is_ok());
        assert!(host.current_user_display_name().is_none());
        assert!(host.viewport_height().is_none());
    }
}
