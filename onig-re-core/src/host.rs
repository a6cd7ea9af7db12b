//! Procedure table for embedding in a dynamically typed host.
//!
//! Procedures are looked up by name and take host [`Value`]s, the way a
//! scripting runtime dispatches its registered primitives. Compiled patterns
//! travel as foreign objects; the pattern is released when the host drops
//! its last reference.

use crate::config::{default_config, EngineConfig};
use crate::error::CANNOT_INTERPRET;
use crate::match_engine::{self, MatchResult};
use crate::pattern::CompiledPattern;
use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub const MAKE_RE: &str = "make-re";
pub const RE_SEARCH: &str = "re-search";

/// Type tag of compiled patterns as seen by the host.
pub const PATTERN_TAG: &str = "onig-re";

#[derive(Clone)]
pub enum Value {
    Unspecified,
    Bool(bool),
    Int(i64),
    Str(String),
    Pair(Box<Value>, Box<Value>),
    /// Proper list; empty is `'()`.
    List(Vec<Value>),
    Pattern(Arc<CompiledPattern>),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn pair(car: Value, cdr: Value) -> Self {
        Value::Pair(Box::new(car), Box::new(cdr))
    }

    pub fn nil() -> Self {
        Value::List(Vec::new())
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::List(items) if items.is_empty())
    }

    pub fn as_pattern(&self) -> Option<&Arc<CompiledPattern>> {
        match self {
            Value::Pattern(p) => Some(p),
            _ => None,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Value::Unspecified => "unspecified",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Str(_) => "string",
            Value::Pair(..) => "pair",
            Value::List(_) => "list",
            Value::Pattern(_) => PATTERN_TAG,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unspecified => f.write_str("#<unspecified>"),
            Value::Bool(true) => f.write_str("#t"),
            Value::Bool(false) => f.write_str("#f"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Pair(car, cdr) => write!(f, "({} . {})", car, cdr),
            Value::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
            Value::Pattern(p) => write!(f, "#<{} {:?}>", PATTERN_TAG, p.as_str()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unspecified, Value::Unspecified) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Pair(a1, d1), Value::Pair(a2, d2)) => a1 == a2 && d1 == d2,
            (Value::List(a), Value::List(b)) => a == b,
            // foreign objects compare by identity
            (Value::Pattern(a), Value::Pattern(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// `(start . end)` per group; a group that did not take part is `#f`.
impl From<MatchResult> for Value {
    fn from(res: MatchResult) -> Self {
        Value::List(
            res.iter()
                .map(|g| match g {
                    Some(r) => Value::pair(Value::Int(r.start as i64), Value::Int(r.end as i64)),
                    None => Value::Bool(false),
                })
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostErrorKind {
    /// Failure inside the procedure itself.
    Misc,
    WrongNumberOfArgs,
    /// Argument at `position` (1-based) has the wrong type.
    WrongTypeArg { position: usize },
    UnboundVariable,
}

/// Error raised back into the host, naming the procedure that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{subr}: {message}")]
pub struct HostError {
    pub subr: String,
    pub kind: HostErrorKind,
    pub message: String,
    /// Engine diagnostic, when there is one.
    pub detail: Option<String>,
}

impl HostError {
    fn new(subr: &str, kind: HostErrorKind, message: impl Into<String>) -> Self {
        HostError { subr: subr.to_string(), kind, message: message.into(), detail: None }
    }

    /// Pattern and search failures both report against `make-re`.
    fn cannot_interpret(detail: &str) -> Self {
        HostError {
            subr: MAKE_RE.to_string(),
            kind: HostErrorKind::Misc,
            message: CANNOT_INTERPRET.to_string(),
            detail: Some(detail.to_string()),
        }
    }
}

pub type Subr = fn(&Host, &[Value]) -> Result<Value, HostError>;

#[derive(Clone)]
pub struct Procedure {
    pub name: &'static str,
    pub required: usize,
    pub optional: usize,
    pub rest: bool,
    func: Subr,
}

impl Procedure {
    fn accepts(&self, n: usize) -> bool {
        n >= self.required && (self.rest || n <= self.required + self.optional)
    }
}

/// A set of named procedures plus the engine configuration they use.
pub struct Host {
    config: EngineConfig,
    procs: HashMap<&'static str, Procedure>,
}

impl Host {
    /// Host with `make-re` and `re-search` registered, using the
    /// process-wide configuration.
    pub fn new() -> Self {
        Self::with_config(default_config().clone())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let mut host = Host { config, procs: HashMap::new() };
        host.define(MAKE_RE, 1, 0, false, make_re);
        host.define(RE_SEARCH, 2, 0, false, re_search);
        host
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register `func` under `name`, replacing any earlier definition.
    pub fn define(&mut self, name: &'static str, required: usize, optional: usize, rest: bool, func: Subr) {
        self.procs.insert(name, Procedure { name, required, optional, rest, func });
    }

    pub fn lookup(&self, name: &str) -> Option<&Procedure> {
        self.procs.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.procs.keys().copied()
    }

    /// Call the procedure registered as `name`.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, HostError> {
        let proc = self
            .lookup(name)
            .ok_or_else(|| HostError::new(name, HostErrorKind::UnboundVariable, "unbound variable"))?;
        if !proc.accepts(args.len()) {
            return Err(HostError::new(
                proc.name,
                HostErrorKind::WrongNumberOfArgs,
                format!("wrong number of arguments ({})", args.len()),
            ));
        }
        (proc.func)(self, args)
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}

fn wrong_type(subr: &str, position: usize, got: &Value) -> HostError {
    HostError::new(
        subr,
        HostErrorKind::WrongTypeArg { position },
        format!("wrong type argument in position {}: {}", position, got.type_name()),
    )
}

fn make_re(host: &Host, args: &[Value]) -> Result<Value, HostError> {
    let pattern = match &args[0] {
        Value::Str(s) => s,
        other => return Err(wrong_type(MAKE_RE, 1, other)),
    };
    match CompiledPattern::compile(pattern, host.config()) {
        Ok(p) => Ok(Value::Pattern(Arc::new(p))),
        Err(e) => {
            debug!("{}: {:?}: {}", MAKE_RE, pattern, e.detail());
            Err(HostError::cannot_interpret(e.detail()))
        }
    }
}

fn re_search(_host: &Host, args: &[Value]) -> Result<Value, HostError> {
    let pattern = args[0].as_pattern().ok_or_else(|| wrong_type(RE_SEARCH, 1, &args[0]))?;
    let subject = match &args[1] {
        Value::Str(s) => s,
        other => return Err(wrong_type(RE_SEARCH, 2, other)),
    };
    match match_engine::search(pattern, subject) {
        Ok(res) => Ok(res.into()),
        Err(e) => Err(HostError::cannot_interpret(e.detail())),
    }
}
