use crate::config::{Backend, EngineConfig};
use crate::error::PatternError;
use crate::matchers::Matcher;
use crate::onig_backend::OnigProgram;
use crate::pcre2_backend::Pcre2Compiled;
use crate::program::CompiledProgram;
use crate::transcode;
use log::{debug, trace};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

// Engines are not documented as safe to release from concurrent finalizers.
static FINALIZER_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static FINALIZED: AtomicU64 = AtomicU64::new(0);

/// Number of compiled patterns released so far in this process.
pub fn finalized_count() -> u64 {
    FINALIZED.load(Ordering::SeqCst)
}

/// A compiled regex program ready for searching.
///
/// The engine program is released exactly once, when the value is dropped.
pub struct CompiledPattern {
    program: Option<Box<dyn CompiledProgram>>,
    source: String,
}

impl CompiledPattern {
    /// Compile `pattern` with the engine and options in `cfg`.
    pub fn compile(pattern: &str, cfg: &EngineConfig) -> Result<Self, PatternError> {
        let program: Box<dyn CompiledProgram> = match cfg.backend {
            Backend::Onig => Box::new(
                OnigProgram::new(pattern, cfg)
                    .map_err(|e| PatternError::new(pattern, cfg.backend, Some(e.code() as i32), e.description()))?,
            ),
            Backend::Regex => Box::new(
                Matcher::new(pattern, cfg).map_err(|e| PatternError::new(pattern, cfg.backend, None, e.to_string()))?,
            ),
            Backend::Pcre2 => Box::new(
                Pcre2Compiled::new(pattern, cfg)
                    .map_err(|e| PatternError::new(pattern, cfg.backend, Some(e.code()), e.to_string()))?,
            ),
        };
        debug!("compiled {:?} with {} ({} groups)", pattern, cfg.backend, program.group_count());
        Ok(CompiledPattern { program: Some(program), source: pattern.to_string() })
    }

    /// Compile a pattern handed over as fixed-width UTF-32 units.
    pub fn compile_utf32(units: &[u32], cfg: &EngineConfig) -> Result<Self, PatternError> {
        let pattern = transcode::utf32_to_string(units).map_err(|e| PatternError::from_transcode(cfg.backend, e))?;
        Self::compile(&pattern, cfg)
    }

    /// Pattern text this was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn backend(&self) -> Backend {
        self.program().backend()
    }

    /// Number of capture groups, counting group 0.
    pub fn group_count(&self) -> usize {
        self.program().group_count()
    }

    pub(crate) fn program(&self) -> &dyn CompiledProgram {
        // only `Drop` takes the program out
        match &self.program {
            Some(p) => p.as_ref(),
            None => unreachable!("compiled pattern used after release"),
        }
    }
}

impl fmt::Debug for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledPattern")
            .field("source", &self.source)
            .field("backend", &self.program.as_ref().map(|p| p.backend()))
            .finish()
    }
}

impl Drop for CompiledPattern {
    fn drop(&mut self) {
        let _guard = FINALIZER_LOCK.lock();
        if let Some(program) = self.program.take() {
            drop(program);
            FINALIZED.fetch_add(1, Ordering::SeqCst);
            trace!("released compiled pattern {:?}", self.source);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_records_source_and_groups() {
        let p = CompiledPattern::compile("(a)(b)", &EngineConfig::default()).unwrap();
        assert_eq!(p.as_str(), "(a)(b)");
        assert_eq!(p.backend(), Backend::Onig);
        assert_eq!(p.group_count(), 3);
    }

    #[test]
    fn compile_failure_keeps_diagnostics() {
        for backend in [Backend::Onig, Backend::Regex, Backend::Pcre2] {
            let err = CompiledPattern::compile("(", &EngineConfig::new(backend)).unwrap_err();
            assert_eq!(err.to_string(), "cannot interpret pattern");
            assert_eq!(err.backend(), backend);
            assert_eq!(err.pattern(), "(");
            assert!(!err.detail().is_empty());
        }
    }

    #[test]
    fn compile_utf32_rejects_invalid_units() {
        let err = CompiledPattern::compile_utf32(&[0x61, 0xDFFF], &EngineConfig::default()).unwrap_err();
        assert!(err.detail().contains("U+DFFF"));
    }

    #[test]
    fn drop_counts_finalization() {
        let before = finalized_count();
        let p = CompiledPattern::compile("x", &EngineConfig::new(Backend::Regex)).unwrap();
        drop(p);
        // other tests may finalize concurrently
        assert!(finalized_count() > before);
    }
}
