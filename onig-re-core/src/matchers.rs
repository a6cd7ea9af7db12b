use crate::config::{Backend, EngineConfig};
use crate::program::{ByteRanges, CompiledProgram, EngineFailure};
use regex::{Regex, RegexBuilder};

/// Backend over the Rust `regex` crate. Searches never fail and never
/// backtrack, so the retry limit does not apply.
pub struct Matcher {
    re: Regex,
}

impl Matcher {
    pub fn new(pattern: &str, cfg: &EngineConfig) -> Result<Self, regex::Error> {
        let re = RegexBuilder::new(pattern)
            .case_insensitive(cfg.case_insensitive)
            .build()?;
        Ok(Matcher { re })
    }

    /// Test whether `text` matches the pattern.
    pub fn is_match(&self, text: &str) -> bool {
        self.re.is_match(text)
    }

    /// Return capture ranges for the first match (start, end) per capture group.
    /// Group 0 is the whole match.
    pub fn captures_ranges(&self, text: &str) -> Option<ByteRanges> {
        self.re.captures(text).map(|caps| {
            caps.iter()
                .map(|m| m.map(|m| (m.start(), m.end())))
                .collect()
        })
    }
}

impl CompiledProgram for Matcher {
    fn backend(&self) -> Backend { Backend::Regex }
    fn group_count(&self) -> usize { self.re.captures_len() }
    fn is_match(&self, text: &str) -> Result<bool, EngineFailure> { Ok(self.is_match(text)) }
    fn captures_ranges(&self, text: &str) -> Result<Option<ByteRanges>, EngineFailure> { Ok(self.captures_ranges(text)) }
}
