//! Attribute values and creation parameters.

use rustc_hash::FxHashMap;

use cps_core::{SubstrateInfo, TimeSpan};

/// Per-substrate coupling data keyed by substrate name.
pub type SubstrateMap = FxHashMap<String, SubstrateInfo>;

/// One agent attribute value.
///
/// The domain is deliberately small: flags, counters, physical scalars, a
/// lattice coordinate pair, a state label, a duration expression, and the
/// per-substrate coupling map.
#[derive(Clone, PartialEq, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Pair(i32, i32),
    Str(String),
    Time(TimeSpan),
    Substrates(SubstrateMap),
}

impl AttrValue {
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Float view; integer values coerce (volumes and rates are often given
    /// as whole numbers).
    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttrValue::Float(f) => Some(*f),
            AttrValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[inline]
    pub fn as_pair(&self) -> Option<(i32, i32)> {
        match self {
            AttrValue::Pair(x, y) => Some((*x, *y)),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_time(&self) -> Option<TimeSpan> {
        match self {
            AttrValue::Time(t) => Some(*t),
            _ => None,
        }
    }

    #[inline]
    pub fn as_substrates(&self) -> Option<&SubstrateMap> {
        match self {
            AttrValue::Substrates(m) => Some(m),
            _ => None,
        }
    }

    #[inline]
    pub fn as_substrates_mut(&mut self) -> Option<&mut SubstrateMap> {
        match self {
            AttrValue::Substrates(m) => Some(m),
            _ => None,
        }
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        AttrValue::Int(v as i64)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

impl From<(i32, i32)> for AttrValue {
    fn from((x, y): (i32, i32)) -> Self {
        AttrValue::Pair(x, y)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Str(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Str(v)
    }
}

impl From<TimeSpan> for AttrValue {
    fn from(v: TimeSpan) -> Self {
        AttrValue::Time(v)
    }
}

impl From<SubstrateMap> for AttrValue {
    fn from(v: SubstrateMap) -> Self {
        AttrValue::Substrates(v)
    }
}

// ── Params ────────────────────────────────────────────────────────────────────

/// Named parameters passed alongside an agent at creation time.
///
/// The space and each registered model claim the keys they understand during
/// attribute initialization; any key left unclaimed is stored verbatim as an
/// agent attribute by the simulation.
///
/// ```
/// use cps_agent::Params;
///
/// let params = Params::new()
///     .with("position", (2, 2))
///     .with("motility", 0.015)
///     .with("volume", 500);
/// assert!(params.get("motility").is_some());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Params {
    entries: FxHashMap<String, AttrValue>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fluent insert.
    pub fn with(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.entries.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
