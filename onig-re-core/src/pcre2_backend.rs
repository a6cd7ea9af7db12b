use crate::config::{Backend, EngineConfig};
use crate::program::{ByteRanges, CompiledProgram, EngineFailure};
use pcre2::bytes::{Regex as PcreRegex, RegexBuilder};

/// Backend over PCRE2, compiled in UTF mode so that matches always land on
/// char boundaries of the UTF-8 subject.
pub struct Pcre2Compiled {
    re: PcreRegex,
}

impl Pcre2Compiled {
    pub fn new(pattern: &str, cfg: &EngineConfig) -> Result<Self, pcre2::Error> {
        let re = RegexBuilder::new()
            .utf(true)
            .ucp(true)
            .caseless(cfg.case_insensitive)
            .build(pattern)?;
        Ok(Pcre2Compiled { re })
    }

    pub fn is_match(&self, text: &[u8]) -> Result<bool, pcre2::Error> {
        self.re.is_match(text)
    }

    pub fn captures_ranges(&self, text: &[u8]) -> Result<Option<ByteRanges>, pcre2::Error> {
        let caps = match self.re.captures(text)? {
            Some(caps) => caps,
            None => return Ok(None),
        };
        let out = (0..caps.len())
            .map(|i| caps.get(i).map(|m| (m.start(), m.end())))
            .collect();
        Ok(Some(out))
    }
}

fn failure(e: pcre2::Error) -> EngineFailure {
    EngineFailure::new(Some(e.code()), e.to_string())
}

impl CompiledProgram for Pcre2Compiled {
    fn backend(&self) -> Backend { Backend::Pcre2 }
    fn group_count(&self) -> usize { self.re.captures_len() }

    fn is_match(&self, text: &str) -> Result<bool, EngineFailure> {
        self.is_match(text.as_bytes()).map_err(failure)
    }

    fn captures_ranges(&self, text: &str) -> Result<Option<ByteRanges>, EngineFailure> {
        self.captures_ranges(text.as_bytes()).map_err(failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> EngineConfig {
        EngineConfig::new(Backend::Pcre2)
    }

    #[test]
    fn pcre2_match_simple() {
        let c = Pcre2Compiled::new("ab[0-9]+", &cfg()).unwrap();
        assert!(c.is_match(b"xxab123yy").unwrap());
        let caps = c.captures_ranges(b"xxab123yy").unwrap().unwrap();
        assert_eq!(caps[0], Some((2, 7)));
    }

    #[test]
    fn pcre2_utf_mode_dot_takes_whole_char() {
        let c = Pcre2Compiled::new("a.b", &cfg()).unwrap();
        let caps = c.captures_ranges("xa日b".as_bytes()).unwrap().unwrap();
        assert_eq!(caps, vec![Some((1, 6))]);
    }

    #[test]
    fn pcre2_compile_error_has_code() {
        let err = Pcre2Compiled::new("(", &cfg()).err().unwrap();
        assert!(err.code() > 0);
    }
}
