use crate::config::{Backend, EngineConfig};
use crate::program::{ByteRanges, CompiledProgram, EngineFailure};
use onig::{MatchParam, Regex, RegexOptions, Region, SearchOptions, Syntax};

/// Backend over Oniguruma with its default (Ruby) syntax.
pub struct OnigProgram {
    re: Regex,
    retry_limit: Option<u32>,
}

// SAFETY: a compiled `regex_t` is read-only after `onig_new`; each search
// gets its own region and match parameters.
unsafe impl Send for OnigProgram {}
unsafe impl Sync for OnigProgram {}

impl OnigProgram {
    pub fn new(pattern: &str, cfg: &EngineConfig) -> Result<Self, onig::Error> {
        let options = if cfg.case_insensitive {
            RegexOptions::REGEX_OPTION_IGNORECASE
        } else {
            RegexOptions::REGEX_OPTION_NONE
        };
        let re = Regex::with_options(pattern, options, Syntax::default())?;
        Ok(OnigProgram { re, retry_limit: cfg.retry_limit })
    }

    fn match_param(&self) -> MatchParam {
        let mut param = MatchParam::default();
        if let Some(limit) = self.retry_limit {
            param.set_retry_limit_in_match(limit);
        }
        param
    }

    /// Search the whole of `text`, filling `region` on a match.
    fn search(&self, text: &str, region: Option<&mut Region>) -> Result<Option<usize>, onig::Error> {
        self.re.search_with_param(
            text,
            0,
            text.len(),
            SearchOptions::SEARCH_OPTION_NONE,
            region,
            self.match_param(),
        )
    }
}

fn failure(e: onig::Error) -> EngineFailure {
    EngineFailure::new(Some(e.code() as i32), e.description().to_string())
}

impl CompiledProgram for OnigProgram {
    fn backend(&self) -> Backend { Backend::Onig }
    fn group_count(&self) -> usize { self.re.captures_len() + 1 }

    fn is_match(&self, text: &str) -> Result<bool, EngineFailure> {
        self.search(text, None).map(|pos| pos.is_some()).map_err(failure)
    }

    fn captures_ranges(&self, text: &str) -> Result<Option<ByteRanges>, EngineFailure> {
        let mut region = Region::new();
        match self.search(text, Some(&mut region)).map_err(failure)? {
            Some(_) => Ok(Some((0..region.len()).map(|i| region.pos(i)).collect())),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn onig_search_groups() {
        let p = OnigProgram::new("(a)(b)", &EngineConfig::default()).unwrap();
        assert_eq!(p.group_count(), 3);
        let caps = p.captures_ranges("xaby").unwrap().unwrap();
        assert_eq!(caps, vec![Some((1, 3)), Some((1, 2)), Some((2, 3))]);
    }

    #[test]
    fn onig_ruby_syntax() {
        // \h is a hex digit in Ruby syntax
        let p = OnigProgram::new(r"0x(?<hex>\h+)", &EngineConfig::default()).unwrap();
        let caps = p.captures_ranges("val=0x1fZ").unwrap().unwrap();
        assert_eq!(caps, vec![Some((4, 8)), Some((6, 8))]);
    }

    #[test]
    fn onig_unmatched_group_is_none() {
        let p = OnigProgram::new("a(x)?b", &EngineConfig::default()).unwrap();
        assert_eq!(p.captures_ranges("ab").unwrap().unwrap(), vec![Some((0, 2)), None]);
    }

    #[test]
    fn onig_mismatch_is_none() {
        let p = OnigProgram::new("z", &EngineConfig::default()).unwrap();
        assert_eq!(p.captures_ranges("abc").unwrap(), None);
        assert!(!CompiledProgram::is_match(&p, "abc").unwrap());
    }

    #[test]
    fn onig_bad_pattern() {
        let err = OnigProgram::new("(", &EngineConfig::default()).err().unwrap();
        assert!(err.code() < 0);
    }
}
