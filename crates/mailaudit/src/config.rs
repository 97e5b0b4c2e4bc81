//! Service configuration.

/// `User-Agent` of this library, sent on every request.
pub const LIBRARY_USER_AGENT: &str = concat!("mailaudit/", env!("CARGO_PKG_VERSION"));

/// Content type of write request bodies.
pub const ATOM_CONTENT_TYPE: &str = "application/atom+xml";

/// Service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Application identifier appended to the library user agent.
    pub user_agent: Option<String>,
}

impl Config {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Returns the full `User-Agent` header value.
    #[must_use]
    pub fn user_agent_header(&self) -> String {
        match self.user_agent.as_deref() {
            Some(agent) if !agent.is_empty() => format!("{LIBRARY_USER_AGENT} {agent}"),
            _ => LIBRARY_USER_AGENT.to_string(),
        }
    }
}

/// Builder for service configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    user_agent: Option<String>,
}

impl ConfigBuilder {
    /// Sets the application identifier appended to the user agent.
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> Config {
        Config {
            user_agent: self.user_agent,
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn test_default_user_agent() {
        let config = Config::new();
        assert_eq!(config.user_agent_header(), LIBRARY_USER_AGENT);
        assert!(LIBRARY_USER_AGENT.starts_with("mailaudit/"));
    }

    #[test]
    fn test_custom_user_agent() {
        let config = Config::builder().user_agent("foo").build();
        assert_eq!(
            config.user_agent_header(),
            format!("{LIBRARY_USER_AGENT} foo")
        );
    }

    #[test]
    fn test_empty_user_agent_ignored() {
        let config = Config::builder().user_agent("").build();
        assert_eq!(config.user_agent_header(), LIBRARY_USER_AGENT);
    }
}
