//! Header and payload helpers for outgoing requests

use std::fmt::Write as _;

use cc_json::{ContractResolver, JsonSettings};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;

use crate::headers::merge_headers;
use crate::response::Response;

/// Content type of JSON bodies
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
/// Content type of form bodies
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
/// Content type of hand-built dictionary bodies
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Extension methods that fill in headers and payload of a request
///
/// Every method mutates the request in place and hands it back for chaining.
pub trait RequestExt {
    /// Remove every header currently set
    fn clear_headers(&mut self) -> &mut Self;

    /// Add each header with a non-blank name and value.
    ///
    /// A name that is already present keeps its current value.
    fn add_headers<I, K, V>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>;

    /// Add a single header, ignoring blank names or values
    fn add_header(&mut self, key: &str, value: &str) -> &mut Self;

    /// Set a UTF-8 `application/json` body.
    ///
    /// `None` yields the body `{}`. The contract, when given, projects the
    /// value before it is written; the settings, when given, govern how it
    /// is written. With neither, the value is written as serde emits it.
    fn set_json_body<T>(
        &mut self,
        value: Option<&T>,
        contract: Option<&dyn ContractResolver>,
        settings: Option<&JsonSettings>,
    ) -> Response<&mut Self>
    where
        T: Serialize + ?Sized;

    /// Set an `application/x-www-form-urlencoded` body from the members of
    /// `value`, in declaration order.
    ///
    /// `None` leaves the request without a body.
    fn set_form_body<T>(&mut self, value: Option<&T>) -> Response<&mut Self>
    where
        T: Serialize + ?Sized;

    /// Set a body of `"key": "value"` lines between braces.
    ///
    /// Entries with a blank key or value are skipped. Nothing is escaped and
    /// no separators are written, so the result is not guaranteed to be valid
    /// JSON. `None` leaves the request without a body.
    fn set_dictionary_body<I, K, V>(&mut self, payload: Option<I>) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>;
}

impl RequestExt for reqwest::Request {
    fn clear_headers(&mut self) -> &mut Self {
        self.headers_mut().clear();
        self
    }

    fn add_headers<I, K, V>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        merge_headers(self.headers_mut(), headers);
        self
    }

    fn add_header(&mut self, key: &str, value: &str) -> &mut Self {
        if key.trim().is_empty() || value.trim().is_empty() {
            return self;
        }

        self.add_headers([(key, value)])
    }

    fn set_json_body<T>(
        &mut self,
        value: Option<&T>,
        contract: Option<&dyn ContractResolver>,
        settings: Option<&JsonSettings>,
    ) -> Response<&mut Self>
    where
        T: Serialize + ?Sized,
    {
        let body = match value {
            None => "{}".to_string(),
            Some(value) => match (contract, settings) {
                (None, None) => serde_json::to_string(value)?,
                (Some(contract), None) => {
                    serde_json::to_string(&contract.resolve(serde_json::to_value(value)?))?
                }
                (None, Some(settings)) => settings.to_string(value)?,
                (Some(contract), Some(settings)) => {
                    settings.render(contract.resolve(serde_json::to_value(value)?))?
                }
            },
        };

        Ok(set_body(self, JSON_CONTENT_TYPE, body))
    }

    fn set_form_body<T>(&mut self, value: Option<&T>) -> Response<&mut Self>
    where
        T: Serialize + ?Sized,
    {
        let Some(value) = value else {
            tracing::debug!("No form payload, leaving the request without a body");
            return Ok(self);
        };

        let pairs = form_pairs(serde_json::to_value(value)?)?;
        let body = serde_urlencoded::to_string(&pairs)?;

        Ok(set_body(self, FORM_CONTENT_TYPE, body))
    }

    fn set_dictionary_body<I, K, V>(&mut self, payload: Option<I>) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let Some(payload) = payload else {
            tracing::debug!("No dictionary payload, leaving the request without a body");
            return self;
        };

        let mut body = String::from("{");
        for (key, value) in payload {
            let (key, value) = (key.as_ref(), value.as_ref());
            if key.trim().is_empty() || value.trim().is_empty() {
                continue;
            }
            // Writing into a String cannot fail
            let _ = writeln!(body, "\"{key}\": \"{value}\"");
        }
        body.push_str("}\n");

        set_body(self, TEXT_CONTENT_TYPE, body)
    }
}

fn set_body<'a>(
    request: &'a mut reqwest::Request,
    content_type: &'static str,
    body: String,
) -> &'a mut reqwest::Request {
    tracing::debug!("Setting {content_type} body of {} bytes", body.len());
    request
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    *request.body_mut() = Some(body.into());
    request
}

/// Flatten an object into `(name, text)` pairs
fn form_pairs(value: Value) -> Response<Vec<(String, String)>> {
    let Value::Object(members) = value else {
        return Err(crate::HttpError::Serialization(
            "form payload must serialize to an object".to_string(),
        ));
    };

    Ok(members
        .into_iter()
        .map(|(name, member)| {
            let text = match member {
                Value::Null => String::new(),
                Value::String(text) => text,
                other => other.to_string(),
            };
            (name, text)
        })
        .collect())
}
