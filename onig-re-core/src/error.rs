use crate::config::Backend;
use thiserror::Error;

/// Message every pattern or search failure displays to the host.
pub const CANNOT_INTERPRET: &str = "cannot interpret pattern";

/// Host text that cannot be turned into code points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscodeError {
    #[error("invalid code point U+{value:X} at index {index}")]
    InvalidCodePoint { index: usize, value: u32 },
    #[error("invalid UTF-8 at byte {offset}")]
    InvalidUtf8 { offset: usize },
}

/// A pattern the engine refused to compile.
///
/// Displays as the fixed host message; the engine diagnostic is kept
/// alongside for callers that want it.
#[derive(Debug, Clone, Error)]
#[error("{}", CANNOT_INTERPRET)]
pub struct PatternError {
    pattern: String,
    backend: Backend,
    code: Option<i32>,
    detail: String,
}

impl PatternError {
    pub(crate) fn new(pattern: &str, backend: Backend, code: Option<i32>, detail: impl Into<String>) -> Self {
        PatternError { pattern: pattern.to_string(), backend, code, detail: detail.into() }
    }

    pub(crate) fn from_transcode(backend: Backend, err: TranscodeError) -> Self {
        PatternError { pattern: String::new(), backend, code: None, detail: err.to_string() }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Numeric engine status, when the engine reports one (Oniguruma, PCRE2).
    pub fn code(&self) -> Option<i32> {
        self.code
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

/// A search that failed for a reason other than "no match".
#[derive(Debug, Clone, Error)]
#[error("{}", CANNOT_INTERPRET)]
pub struct SearchError {
    pattern: String,
    backend: Backend,
    code: Option<i32>,
    detail: String,
}

impl SearchError {
    pub(crate) fn new(pattern: &str, backend: Backend, code: Option<i32>, detail: impl Into<String>) -> Self {
        SearchError { pattern: pattern.to_string(), backend, code, detail: detail.into() }
    }

    pub(crate) fn from_transcode(pattern: &str, backend: Backend, err: TranscodeError) -> Self {
        SearchError { pattern: pattern.to_string(), backend, code: None, detail: err.to_string() }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error(transparent)]
    Search(#[from] SearchError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_display_fixed_message() {
        let p = PatternError::new("(", Backend::Onig, Some(-117), "end pattern with unmatched parenthesis");
        assert_eq!(p.to_string(), "cannot interpret pattern");
        assert_eq!(p.code(), Some(-117));
        assert_eq!(p.pattern(), "(");
        let s = SearchError::new("a", Backend::Pcre2, None, "match limit exceeded");
        assert_eq!(s.to_string(), CANNOT_INTERPRET);
        assert_eq!(s.detail(), "match limit exceeded");
    }

    #[test]
    fn crate_error_is_transparent() {
        let e: Error = SearchError::new("a", Backend::Regex, None, "x").into();
        assert_eq!(e.to_string(), CANNOT_INTERPRET);
        assert!(matches!(e, Error::Search(_)));
    }
}
