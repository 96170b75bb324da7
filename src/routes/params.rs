use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer, de};

/// Treats `?key=` the same as an absent key.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<T>().map(Some).map_err(de::Error::custom),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub category_id: Option<i32>,
    pub q: Option<String>,
    /// Only the literal `true` filters; any other value is ignored.
    pub recommended: Option<String>,
}

impl ProductQuery {
    pub fn search(&self) -> Option<&str> {
        self.q.as_deref().filter(|s| !s.is_empty())
    }

    pub fn recommended_only(&self) -> bool {
        self.recommended.as_deref() == Some("true")
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub parent_id: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderHistoryQuery {
    pub phone: Option<String>,
}
