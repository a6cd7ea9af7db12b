use crate::error::SearchError;
use crate::pattern::CompiledPattern;
use crate::program::ByteRanges;
use crate::transcode::{self, CodePointMap};
use log::{debug, trace};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Half-open range of code points in a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        TextRange { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<(usize, usize)> for TextRange {
    fn from((start, end): (usize, usize)) -> Self {
        TextRange { start, end }
    }
}

/// Capture-group ranges of one search, group 0 first. Empty when the
/// pattern did not match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchResult {
    groups: Vec<Option<TextRange>>,
}

impl MatchResult {
    pub fn no_match() -> Self {
        MatchResult::default()
    }

    pub fn is_match(&self) -> bool {
        !self.groups.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of groups reported, counting group 0.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Range of the whole match.
    pub fn whole(&self) -> Option<TextRange> {
        self.get(0)
    }

    pub fn get(&self, group: usize) -> Option<TextRange> {
        self.groups.get(group).copied().flatten()
    }

    pub fn groups(&self) -> &[Option<TextRange>] {
        &self.groups
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<TextRange>> + '_ {
        self.groups.iter().copied()
    }

    pub fn into_groups(self) -> Vec<Option<TextRange>> {
        self.groups
    }

    /// Text of `group` within `subject`, which must be the searched subject.
    pub fn group_text<'s>(&self, subject: &'s str, group: usize) -> Option<&'s str> {
        let r = self.get(group)?;
        let mut it = subject.char_indices().map(|(i, _)| i).chain(std::iter::once(subject.len()));
        let start = it.nth(r.start)?;
        let end = if r.is_empty() { start } else { it.nth(r.len() - 1)? };
        subject.get(start..end)
    }
}

impl From<Vec<Option<TextRange>>> for MatchResult {
    fn from(groups: Vec<Option<TextRange>>) -> Self {
        MatchResult { groups }
    }
}

fn to_code_points(subject: &str, ranges: ByteRanges) -> MatchResult {
    let map = CodePointMap::new(subject);
    let groups = ranges
        .into_iter()
        .map(|g| g.map(|(s, e)| TextRange::new(map.code_point(s), map.code_point(e))))
        .collect();
    MatchResult { groups }
}

/// Search `subject` over its whole length.
///
/// No match is `Ok` with an empty result; only an engine failure is an
/// error.
pub fn search(pattern: &CompiledPattern, subject: &str) -> Result<MatchResult, SearchError> {
    trace!("search {:?} in {} bytes", pattern.as_str(), subject.len());
    match pattern.program().captures_ranges(subject) {
        Ok(Some(ranges)) => Ok(to_code_points(subject, ranges)),
        Ok(None) => Ok(MatchResult::no_match()),
        Err(f) => {
            debug!("search with {:?} failed: {} ({:?})", pattern.as_str(), f.detail, f.code);
            Err(SearchError::new(pattern.as_str(), pattern.backend(), f.code, f.detail))
        }
    }
}

/// Search a subject handed over as fixed-width UTF-32 units.
pub fn search_utf32(pattern: &CompiledPattern, units: &[u32]) -> Result<MatchResult, SearchError> {
    let subject = transcode::utf32_to_string(units)
        .map_err(|e| SearchError::from_transcode(pattern.as_str(), pattern.backend(), e))?;
    search(pattern, &subject)
}

/// Whether `pattern` matches anywhere in `subject`.
pub fn is_match(pattern: &CompiledPattern, subject: &str) -> Result<bool, SearchError> {
    pattern
        .program()
        .is_match(subject)
        .map_err(|f| SearchError::new(pattern.as_str(), pattern.backend(), f.code, f.detail))
}

/// Search many subjects in parallel; results keep the input order.
pub fn search_batch<S>(pattern: &CompiledPattern, subjects: &[S]) -> Vec<Result<MatchResult, SearchError>>
where
    S: AsRef<str> + Sync,
{
    subjects.par_iter().map(|s| search(pattern, s.as_ref())).collect()
}
