//! Dot-path resolution over JSON value trees.
//!
//! The upstream API nests objects, lists, and scalars freely; callers (the
//! ledger conversion layer in particular) address fields with dot-separated
//! paths such as `"transactionAmount.amount"` or `"currencyExchange.0.exchangeRate"`.
//! Resolution never fails loudly: a missing key, an out-of-range index, or a
//! path that lands on a container all yield `None`.

use serde::Serialize;
use serde_json::Value;

/// Resolve a dot-separated path against a JSON tree.
///
/// Path segments address object keys by name and array elements by numeric
/// index. Returns `None` when any segment cannot be resolved or the final
/// value is itself an object or array; only scalar leaves are returned.
#[must_use]
pub fn resolve<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut cur = root;
    for seg in path.split('.') {
        cur = match cur {
            Value::Object(map) => map.get(seg)?,
            Value::Array(items) => {
                let idx: usize = seg.parse().ok()?;
                items.get(idx)?
            }
            _ => return None,
        };
    }
    match cur {
        Value::Object(_) | Value::Array(_) => None,
        leaf => Some(leaf),
    }
}

/// Resolve a path against any serializable record, cloning the scalar leaf.
///
/// This is the duck-typed field lookup used by conversion collaborators:
/// the record is serialized once, then traversed with [`resolve`]. Field
/// names follow the record's external (wire) naming, since serde renames are
/// applied during serialization.
pub fn lookup_record<T: Serialize + ?Sized>(record: &T, path: &str) -> Option<Value> {
    let tree = serde_json::to_value(record).ok()?;
    resolve(&tree, path).cloned()
}
