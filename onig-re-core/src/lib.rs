// Regex facade for embedding hosts: compile a pattern into an owned handle,
// search subjects with it, and get capture ranges back as code-point offsets.
// Rust callers use the functions below; C++ hosts go through the cxx bridge
// and C hosts through the `onig_re_*` symbols.

pub mod config;
pub mod error;
pub mod host;
pub mod match_engine;
pub mod matchers;
pub mod onig_backend;
pub mod pattern;
pub mod pcre2_backend;
pub mod program;
pub mod transcode;

pub use config::{Backend, EngineConfig};
pub use error::{Error, PatternError, SearchError};
pub use match_engine::{MatchResult, TextRange};
pub use pattern::CompiledPattern;

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_void};

#[cxx::bridge(namespace = "onig_re")]
mod ffi {
    /// Code-point range of one group; both ends are -1 when the group
    /// did not participate in the match.
    struct GroupRange {
        start: i64,
        end: i64,
    }

    extern "Rust" {
        type CompiledPattern;

        fn init() -> bool;

        #[cxx_name = "make_re"]
        fn bridge_make_re(pattern: &str) -> Result<Box<CompiledPattern>>;
        #[cxx_name = "re_search"]
        fn bridge_re_search(re: &CompiledPattern, subject: &str) -> Result<Vec<GroupRange>>;
        #[cxx_name = "re_search_utf32"]
        fn bridge_re_search_utf32(re: &CompiledPattern, subject: &[u32]) -> Result<Vec<GroupRange>>;
    }
}

pub const LOG_ENV: &str = "ONIG_RE_LOG";

/// Install `env_logger` (filter from `ONIG_RE_LOG`, default `warn`) unless a
/// logger is already set. Safe to call more than once.
pub fn init() -> bool {
    let env = env_logger::Env::new().filter_or(LOG_ENV, "warn");
    let _ = env_logger::Builder::from_env(env).try_init();
    true
}

/// `make-re`: compile `pattern` with the process-wide configuration.
pub fn make_re(pattern: &str) -> Result<CompiledPattern, PatternError> {
    CompiledPattern::compile(pattern, config::default_config())
}

pub fn make_re_with(pattern: &str, cfg: &EngineConfig) -> Result<CompiledPattern, PatternError> {
    CompiledPattern::compile(pattern, cfg)
}

pub fn make_re_utf32(units: &[u32]) -> Result<CompiledPattern, PatternError> {
    CompiledPattern::compile_utf32(units, config::default_config())
}

/// `re-search`: capture ranges of the leftmost match in `subject`, empty
/// when nothing matches.
pub fn re_search(re: &CompiledPattern, subject: &str) -> Result<MatchResult, SearchError> {
    match_engine::search(re, subject)
}

pub fn re_search_utf32(re: &CompiledPattern, subject: &[u32]) -> Result<MatchResult, SearchError> {
    match_engine::search_utf32(re, subject)
}

fn to_group_ranges(res: MatchResult) -> Vec<ffi::GroupRange> {
    res.iter()
        .map(|g| match g {
            Some(r) => ffi::GroupRange { start: r.start as i64, end: r.end as i64 },
            None => ffi::GroupRange { start: -1, end: -1 },
        })
        .collect()
}

fn bridge_make_re(pattern: &str) -> Result<Box<CompiledPattern>, PatternError> {
    make_re(pattern).map(Box::new)
}

fn bridge_re_search(re: &CompiledPattern, subject: &str) -> Result<Vec<ffi::GroupRange>, SearchError> {
    re_search(re, subject).map(to_group_ranges)
}

fn bridge_re_search_utf32(re: &CompiledPattern, subject: &[u32]) -> Result<Vec<ffi::GroupRange>, SearchError> {
    re_search_utf32(re, subject).map(to_group_ranges)
}

// C ABI for hosts that embed the facade directly (for example a Scheme
// runtime registering `make-re`/`re-search` as primitives).

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: String) {
    let c = CString::new(msg).unwrap_or_default();
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(c));
}

fn clear_last_error() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}

fn describe(err: &Error) -> String {
    match err {
        Error::Pattern(e) => format!("{}: {} ({})", host::MAKE_RE, e, e.detail()),
        Error::Search(e) => format!("{}: {} ({})", host::MAKE_RE, e, e.detail()),
    }
}

fn c_str_arg<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        set_last_error("null string argument".to_string());
        return None;
    }
    let bytes = unsafe { CStr::from_ptr(ptr).to_bytes() };
    match transcode::utf8_from_bytes(bytes) {
        Ok(s) => Some(s),
        Err(e) => {
            set_last_error(e.to_string());
            None
        }
    }
}

fn utf32_arg<'a>(units: *const u32, len: usize) -> Option<&'a [u32]> {
    if len == 0 {
        return Some(&[]);
    }
    if units.is_null() {
        set_last_error("null string argument".to_string());
        return None;
    }
    Some(unsafe { std::slice::from_raw_parts(units, len) })
}

fn into_raw_pattern(res: Result<CompiledPattern, PatternError>) -> *mut CompiledPattern {
    match res {
        Ok(p) => {
            clear_last_error();
            Box::into_raw(Box::new(p))
        }
        Err(e) => {
            set_last_error(describe(&e.into()));
            std::ptr::null_mut()
        }
    }
}

/// Called once per group: group index, start, end (code points; -1 for a
/// group that did not participate), userdata.
pub type OnigReGroupCb = extern "C" fn(usize, i64, i64, *mut c_void);

fn deliver(res: Result<MatchResult, SearchError>, cb: Option<OnigReGroupCb>, userdata: *mut c_void) -> c_int {
    match res {
        Ok(m) => {
            clear_last_error();
            if let Some(cb) = cb {
                for (i, g) in to_group_ranges(m.clone()).into_iter().enumerate() {
                    cb(i, g.start, g.end, userdata);
                }
            }
            m.len() as c_int
        }
        Err(e) => {
            set_last_error(describe(&e.into()));
            -1
        }
    }
}

#[no_mangle]
pub extern "C" fn onig_re_init() -> bool {
    init()
}

/// Compile a NUL-terminated UTF-8 pattern. Returns null on failure; see
/// `onig_re_last_error`.
#[no_mangle]
pub extern "C" fn onig_re_make(pattern: *const c_char) -> *mut CompiledPattern {
    match c_str_arg(pattern) {
        Some(p) => into_raw_pattern(make_re(p)),
        None => std::ptr::null_mut(),
    }
}

#[no_mangle]
pub extern "C" fn onig_re_make_utf32(units: *const u32, len: usize) -> *mut CompiledPattern {
    match utf32_arg(units, len) {
        Some(u) => into_raw_pattern(make_re_utf32(u)),
        None => std::ptr::null_mut(),
    }
}

/// Search `subject` and report each group through `cb`. Returns the number
/// of groups, 0 when nothing matched, -1 on error.
#[no_mangle]
pub extern "C" fn onig_re_search(
    re: *const CompiledPattern,
    subject: *const c_char,
    cb: Option<OnigReGroupCb>,
    userdata: *mut c_void,
) -> c_int {
    if re.is_null() {
        set_last_error("null pattern".to_string());
        return -1;
    }
    let re = unsafe { &*re };
    match c_str_arg(subject) {
        Some(s) => deliver(re_search(re, s), cb, userdata),
        None => -1,
    }
}

#[no_mangle]
pub extern "C" fn onig_re_search_utf32(
    re: *const CompiledPattern,
    units: *const u32,
    len: usize,
    cb: Option<OnigReGroupCb>,
    userdata: *mut c_void,
) -> c_int {
    if re.is_null() {
        set_last_error("null pattern".to_string());
        return -1;
    }
    let re = unsafe { &*re };
    match utf32_arg(units, len) {
        Some(u) => deliver(re_search_utf32(re, u), cb, userdata),
        None => -1,
    }
}

/// Search and return the groups as a JSON array (`[]` when nothing
/// matched). The string must be released with `onig_re_string_free`.
/// Returns null on error.
#[no_mangle]
pub extern "C" fn onig_re_search_json(re: *const CompiledPattern, subject: *const c_char) -> *mut c_char {
    if re.is_null() {
        set_last_error("null pattern".to_string());
        return std::ptr::null_mut();
    }
    let re = unsafe { &*re };
    let Some(s) = c_str_arg(subject) else {
        return std::ptr::null_mut();
    };
    let res = match re_search(re, s) {
        Ok(m) => m,
        Err(e) => {
            set_last_error(describe(&e.into()));
            return std::ptr::null_mut();
        }
    };
    match serde_json::to_string(&res) {
        Ok(json) => {
            clear_last_error();
            CString::new(json).map(CString::into_raw).unwrap_or(std::ptr::null_mut())
        }
        Err(e) => {
            set_last_error(e.to_string());
            std::ptr::null_mut()
        }
    }
}

#[no_mangle]
pub extern "C" fn onig_re_string_free(s: *mut c_char) {
    if s.is_null() {
        return;
    }
    unsafe { drop(CString::from_raw(s)); }
}

/// Message of the last failed call on this thread, or null. Valid until the
/// next call into this library on the same thread.
#[no_mangle]
pub extern "C" fn onig_re_last_error() -> *const c_char {
    LAST_ERROR.with(|slot| match &*slot.borrow() {
        Some(c) => c.as_ptr(),
        None => std::ptr::null(),
    })
}

/// Finalizer entry point: release a pattern from `onig_re_make*`. The
/// pointer must not be used afterwards.
#[no_mangle]
pub extern "C" fn onig_re_free(re: *mut CompiledPattern) {
    if re.is_null() {
        return;
    }
    unsafe { drop(Box::from_raw(re)); }
}
