//! Truthiness of BSON values.
//!
//! The adapter contract speaks in terms of "absent (falsy)" fields and
//! "present/truthy" array elements, with the usual loose-typing rules:
//! null, `false`, numeric zero, and the empty string are falsy; arrays and
//! documents are always truthy, even when empty.

use bson::Bson;

pub(crate) fn is_truthy(value: &Bson) -> bool {
    match value {
        Bson::Null => false,
        Bson::Boolean(flag) => *flag,
        Bson::Int32(n) => *n != 0,
        Bson::Int64(n) => *n != 0,
        Bson::Double(n) => *n != 0.0 && !n.is_nan(),
        Bson::String(s) => !s.is_empty(),
        _ => true,
    }
}

pub(crate) fn is_falsy(value: &Bson) -> bool {
    !is_truthy(value)
}
