/// Request extractors with JSON error bodies
///
/// Axum's own `Json`, `Path` and `Query` reject bad input with plain-text
/// bodies; these wrappers route the rejection through [`ApiError`] so clients
/// always receive `{"error": ...}` with status 400.
///
/// Form-driven clients send numbers as strings (`"hive_id": "3"`), so numeric
/// fields accept either representation through [`number_or_string`].

use crate::error::ApiError;
use axum::extract::{FromRequest, FromRequestParts};
use serde::{de, Deserialize, Deserializer};
use std::str::FromStr;

/// JSON body extractor
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameter extractor
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Query string extractor
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString<T> {
    Number(T),
    Text(String),
}

/// Deserializes an optional number given as a number or numeric string
///
/// `null`, a missing field and an empty string all yield `None`. Use with
/// `#[serde(default, deserialize_with = "number_or_string")]`.
pub fn number_or_string<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
{
    match Option::<NumberOrString<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(value)) => Ok(Some(value)),
        Some(NumberOrString::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(NumberOrString::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid number: {text:?}"))),
    }
}
