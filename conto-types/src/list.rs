use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

/// Deserialize a field the API emits as either a single object or a list.
///
/// A single object becomes a one-element list, a list passes through, and a
/// `null` or absent value stays `None` (pair with `#[serde(default)]` for the
/// absent case).
///
/// # Errors
/// Propagates the underlying deserializer error when the value matches
/// neither shape.
pub fn one_or_many<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let parsed = Option::<OneOrMany<T>>::deserialize(deserializer)?;
    Ok(parsed.map(|v| match v {
        OneOrMany::One(item) => vec![item],
        OneOrMany::Many(items) => items,
    }))
}
