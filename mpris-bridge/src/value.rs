//! Property values carried in change notifications

use std::collections::BTreeMap;

/// Property name to value, as sent in a `PropertiesChanged` signal
pub type PropertyMap = BTreeMap<String, MprisValue>;

/// The subset of bus value types MPRIS properties use
#[derive(Debug, Clone, PartialEq)]
pub enum MprisValue {
    Bool(bool),
    Double(f64),
    Int64(i64),
    Str(String),
    ObjectPath(String),
    StrList(Vec<String>),
    Map(PropertyMap),
}

impl MprisValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MprisValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MprisValue::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MprisValue::Int64(n) => Some(*n),
            _ => None,
        }
    }

    /// String or object path contents
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MprisValue::Str(s) | MprisValue::ObjectPath(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str_list(&self) -> Option<&[String]> {
        match self {
            MprisValue::StrList(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&PropertyMap> {
        match self {
            MprisValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<bool> for MprisValue {
    fn from(b: bool) -> Self {
        MprisValue::Bool(b)
    }
}

impl From<f64> for MprisValue {
    fn from(d: f64) -> Self {
        MprisValue::Double(d)
    }
}

impl From<i64> for MprisValue {
    fn from(n: i64) -> Self {
        MprisValue::Int64(n)
    }
}

impl From<&str> for MprisValue {
    fn from(s: &str) -> Self {
        MprisValue::Str(s.to_string())
    }
}

impl From<String> for MprisValue {
    fn from(s: String) -> Self {
        MprisValue::Str(s)
    }
}

impl From<PropertyMap> for MprisValue {
    fn from(map: PropertyMap) -> Self {
        MprisValue::Map(map)
    }
}
