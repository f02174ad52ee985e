//! Desktop host: links open in the system browser, everything visual is
//! left to whoever drains the event queue.

use url::Url;

use super::{HapticKind, HostShell, PrimaryAction};
use crate::error::HostError;
use crate::storage::HostConfig;

#[derive(Debug, Clone)]
pub struct SystemHost {
    open_links: bool,
    display_name: Option<String>,
}

impl SystemHost {
    pub fn new(open_links: bool, display_name: Option<String>) -> Self {
        Self {
            open_links,
            display_name,
        }
    }

    pub fn from_config(config: &HostConfig) -> Self {
        let name = config.display_name.trim();
        let display_name = if name.is_empty() {
            std::env::var("USER")
                .or_else(|_| std::env::var("USERNAME"))
                .ok()
        } else {
            Some(name.to_string())
        };
        Self::new(config.open_links, display_name)
    }
}

impl HostShell for SystemHost {
    fn open_external_link(&mut self, url: &str) -> Result<(), HostError> {
        let parsed = Url::parse(url).map_err(|_| HostError::InvalidUrl(url.to_string()))?;
        if !self.open_links {
            tracing::info!(url = %parsed, "link opening disabled");
            return Ok(());
        }
        open::that(parsed.as_str()).map_err(|e| HostError::LinkOpenFailed {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    fn show_primary_action(&mut self, action: &PrimaryAction) {
        tracing::debug!(
            label = %action.label,
            visible = action.visible,
            enabled = action.enabled,
            "primary action"
        );
    }

    fn haptic_feedback(&mut self, kind: HapticKind) {
        tracing::trace!(?kind, "haptic feedback");
    }

    fn current_user_display_name(&self) -> Option<String> {
        self.display_name.clone()
    }

    fn close(&mut self) {
        tracing::debug!("close requested");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_relative_links() {
        let mut host = SystemHost::new(false, None);
        let err = host.open_external_link("not a url").unwrap_err();
        assert_eq!(err, HostError::InvalidUrl("not a url".into()));
    }

    #[test]
    fn disabled_links_succeed_without_opening() {
        let mut host = SystemHost::new(false, Some("Ada".into()));
        assert!(host.open_external_link("https://example.com/x").is_ok());
        assert_eq!(host.current_user_display_name().as_deref(), Some("Ada"));
    }

    #[test]
    fn configured_name_wins() {
        let config = HostConfig {
            open_links: false,
            display_name: "  Grace ".into(),
        };
        let host = SystemHost::from_config(&config);
        assert_eq!(host.current_user_display_name().as_deref(), Some("Grace"));
    }
}
