use log::warn;
use once_cell::sync::Lazy;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const ENV_BACKEND: &str = "ONIG_RE_BACKEND";
pub const ENV_CASE_INSENSITIVE: &str = "ONIG_RE_CASE_INSENSITIVE";
pub const ENV_RETRY_LIMIT: &str = "ONIG_RE_RETRY_LIMIT";

/// Regex engine a pattern is compiled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Backend {
    /// Oniguruma, Ruby syntax.
    #[default]
    Onig,
    /// The `regex` crate.
    Regex,
    /// PCRE2 in UTF mode.
    Pcre2,
}

impl Backend {
    pub fn name(self) -> &'static str {
        match self {
            Backend::Onig => "onig",
            Backend::Regex => "regex",
            Backend::Pcre2 => "pcre2",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown regex backend `{0}`")]
pub struct UnknownBackend(pub String);

impl FromStr for Backend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "onig" | "oniguruma" => Ok(Backend::Onig),
            "regex" | "rust" => Ok(Backend::Regex),
            "pcre2" | "pcre" => Ok(Backend::Pcre2),
            other => Err(UnknownBackend(other.to_string())),
        }
    }
}

/// Options applied when compiling and searching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub backend: Backend,
    pub case_insensitive: bool,
    /// Upper bound on backtracking work per search, applied by the
    /// Oniguruma backend. `None` keeps the engine's own default.
    pub retry_limit: Option<u32>,
}

impl EngineConfig {
    pub fn new(backend: Backend) -> Self {
        EngineConfig { backend, ..Default::default() }
    }

    pub fn case_insensitive(mut self, yes: bool) -> Self {
        self.case_insensitive = yes;
        self
    }

    pub fn retry_limit(mut self, limit: u32) -> Self {
        self.retry_limit = Some(limit);
        self
    }

    /// Read `ONIG_RE_*` variables. Malformed values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = EngineConfig::default();
        if let Some(v) = lookup(ENV_BACKEND) {
            match v.parse::<Backend>() {
                Ok(b) => cfg.backend = b,
                Err(e) => warn!("{}: {}; using {}", ENV_BACKEND, e, cfg.backend),
            }
        }
        if let Some(v) = lookup(ENV_CASE_INSENSITIVE) {
            cfg.case_insensitive = matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
        if let Some(v) = lookup(ENV_RETRY_LIMIT) {
            match v.trim().parse::<u32>() {
                Ok(n) => cfg.retry_limit = Some(n),
                Err(e) => warn!("{}: {:?} is not a limit ({})", ENV_RETRY_LIMIT, v, e),
            }
        }
        cfg
    }
}

static DEFAULT_CONFIG: Lazy<EngineConfig> = Lazy::new(EngineConfig::from_env);

/// Process-wide configuration used by `make_re` and the host surfaces.
/// Read from the environment on first use.
pub fn default_config() -> &'static EngineConfig {
    &DEFAULT_CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn backend_parse_and_display() {
        assert_eq!("onig".parse::<Backend>().unwrap(), Backend::Onig);
        assert_eq!(" PCRE2 ".parse::<Backend>().unwrap(), Backend::Pcre2);
        assert_eq!("rust".parse::<Backend>().unwrap(), Backend::Regex);
        assert!("perl".parse::<Backend>().is_err());
        assert_eq!(Backend::Regex.to_string(), "regex");
    }

    #[test]
    fn config_from_lookup() {
        let cfg = EngineConfig::from_lookup(lookup(&[
            (ENV_BACKEND, "pcre2"),
            (ENV_CASE_INSENSITIVE, "true"),
            (ENV_RETRY_LIMIT, "5000"),
        ]));
        assert_eq!(cfg, EngineConfig::new(Backend::Pcre2).case_insensitive(true).retry_limit(5000));
    }

    #[test]
    fn config_ignores_bad_values() {
        let cfg = EngineConfig::from_lookup(lookup(&[(ENV_BACKEND, "sed"), (ENV_RETRY_LIMIT, "lots")]));
        assert_eq!(cfg, EngineConfig::default());
    }
}
