//! Serializer settings

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Options applied when writing or reading JSON text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonSettings {
    /// Drop null-valued object members on write and skip them on read
    pub ignore_nulls: bool,
    /// Indent written JSON
    pub pretty: bool,
}

impl JsonSettings {
    /// Settings used to read response bodies.
    ///
    /// Keeps every caller option and always ignores null members, so a
    /// `null` never overrides a field default.
    pub fn for_response(settings: Option<&JsonSettings>) -> Self {
        Self {
            ignore_nulls: true,
            ..settings.cloned().unwrap_or_default()
        }
    }

    /// Serialize `value` to JSON text
    pub fn to_string<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, serde_json::Error> {
        self.render(serde_json::to_value(value)?)
    }

    /// Render an already serialized value to JSON text
    pub fn render(&self, mut value: Value) -> Result<String, serde_json::Error> {
        if self.ignore_nulls {
            strip_nulls(&mut value);
        }

        if self.pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        }
    }

    /// Parse JSON text into `T`
    pub fn from_str<T: DeserializeOwned>(&self, text: &str) -> Result<T, serde_json::Error> {
        if !self.ignore_nulls {
            return serde_json::from_str(text);
        }

        let mut value: Value = serde_json::from_str(text)?;
        strip_nulls(&mut value);
        serde_json::from_value(value)
    }
}

/// Remove null-valued members from every object in `value`.
///
/// Array elements are left in place, only object members are dropped.
pub fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(members) => {
            members.retain(|_, member| !member.is_null());
            members.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}
