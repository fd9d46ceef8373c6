//! Environment variable overrides

use std::collections::HashMap;
use std::env;

use once_cell::sync::Lazy;

/// Setting name → environment variables, first non-empty wins
static ENV_VAR_MAP: Lazy<HashMap<&'static str, Vec<&'static str>>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("url", vec!["HASS_URL", "HOMEASSISTANT_URL"]);
    m.insert("token", vec!["HASS_TOKEN", "HOMEASSISTANT_TOKEN"]);
    m
});

/// Environment variable names consulted for a setting
pub fn env_vars_for(setting: &str) -> &'static [&'static str] {
    ENV_VAR_MAP
        .get(setting)
        .map(|v| v.as_slice())
        .unwrap_or(&[])
}

/// Values picked up from the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub url: Option<String>,
    pub token: Option<String>,
}

impl EnvOverrides {
    /// Read the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read through an arbitrary lookup (tests pass a map)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let resolve = |setting: &str| {
            env_vars_for(setting)
                .iter()
                .filter_map(|name| lookup(name))
                .find(|value| !value.is_empty())
        };

        Self {
            url: resolve("url"),
            token: resolve("token"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_vars_for() {
        assert_eq!(env_vars_for("url"), &["HASS_URL", "HOMEASSISTANT_URL"]);
        assert!(env_vars_for("unknown").is_empty());
    }

    #[test]
    fn test_first_non_empty_wins() {
        let vars: HashMap<&str, &str> = [
            ("HASS_URL", ""),
            ("HOMEASSISTANT_URL", "http://ha.local:8123"),
            ("HASS_TOKEN", "abc"),
            ("HOMEASSISTANT_TOKEN", "xyz"),
        ]
        .into_iter()
        .collect();

        let overrides = EnvOverrides::from_lookup(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(overrides.url.as_deref(), Some("http://ha.local:8123"));
        assert_eq!(overrides.token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_nothing_set() {
        assert_eq!(EnvOverrides::from_lookup(|_| None), EnvOverrides::default());
    }
}
