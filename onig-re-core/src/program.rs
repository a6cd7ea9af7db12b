use crate::config::Backend;

/// Byte ranges of one match, group 0 first. `None` marks a group that did
/// not take part in the match.
pub type ByteRanges = Vec<Option<(usize, usize)>>;

/// Engine status for a search that neither matched nor cleanly failed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineFailure {
    pub code: Option<i32>,
    pub detail: String,
}

impl EngineFailure {
    pub fn new(code: Option<i32>, detail: impl Into<String>) -> Self {
        EngineFailure { code, detail: detail.into() }
    }
}

/// A program compiled by one of the wrapped engines.
///
/// Offsets are UTF-8 byte offsets into `text`; mapping to code points
/// happens in the search invoker.
pub trait CompiledProgram: Send + Sync {
    fn backend(&self) -> Backend;

    /// Number of groups, counting group 0.
    fn group_count(&self) -> usize;

    fn is_match(&self, text: &str) -> Result<bool, EngineFailure>;

    /// Leftmost match over the whole of `text`.
    fn captures_ranges(&self, text: &str) -> Result<Option<ByteRanges>, EngineFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::matchers::Matcher;
    use crate::onig_backend::OnigProgram;
    use crate::pcre2_backend::Pcre2Compiled;
    use std::sync::Arc;
    use std::thread;

    fn all_backends(pattern: &str) -> Vec<Arc<dyn CompiledProgram>> {
        vec![
            Arc::new(OnigProgram::new(pattern, &EngineConfig::default()).unwrap()),
            Arc::new(Matcher::new(pattern, &EngineConfig::new(Backend::Regex)).unwrap()),
            Arc::new(Pcre2Compiled::new(pattern, &EngineConfig::new(Backend::Pcre2)).unwrap()),
        ]
    }

    #[test]
    fn backends_agree_on_byte_ranges() {
        for p in all_backends("(ab)([0-9]+)") {
            assert_eq!(p.group_count(), 3, "{}", p.backend());
            let caps = p.captures_ranges("xxab123yy").unwrap().unwrap();
            assert_eq!(caps, vec![Some((2, 7)), Some((2, 4)), Some((4, 7))], "{}", p.backend());
            assert!(!p.is_match("nothing here").unwrap());
        }
    }

    #[test]
    fn programs_are_shareable_across_threads() {
        for p in all_backends("ab[0-9]+") {
            let mut handles = vec![];
            for i in 0..4 {
                let p = p.clone();
                handles.push(thread::spawn(move || {
                    let text = format!("xxab{}yy", i);
                    p.captures_ranges(&text).unwrap().unwrap()[0]
                }));
            }
            for h in handles {
                assert_eq!(h.join().unwrap(), Some((2, 5)));
            }
        }
    }
}
