//! Decimal JSON conversion rule
//!
//! An absent decimal is written as an empty string and any blank string
//! reads back as absent. Present values are written as JSON numbers carrying
//! every digit of the decimal, while reading also accepts numeric strings in
//! invariant or `pt-BR` notation. Text that does not parse as a number reads
//! as zero.
//!
//! Exact numbers rely on serde_json's `arbitrary_precision` feature; other
//! serializers see the number as serde_json's private number struct.
//!
//! ```
//! use cc_json::Decimal;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Price {
//!     #[serde(with = "cc_json::decimal", default)]
//!     amount: Option<Decimal>,
//! }
//!
//! let price: Price = serde_json::from_str(r#"{"amount": "12,50"}"#).unwrap();
//! assert_eq!(price.amount, Some(Decimal::new(125, 1)));
//!
//! let empty = Price { amount: None };
//! assert_eq!(serde_json::to_string(&empty).unwrap(), r#"{"amount":""}"#);
//! ```

use std::any::TypeId;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::ser::Error as _;
use serde::{Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

use crate::token::{is_blank, normalize_localized, number_text, unexpected};

/// Whether this rule converts values of type `T`
pub fn can_handle<T: ?Sized + 'static>() -> bool {
    let type_id = TypeId::of::<T>();
    type_id == TypeId::of::<Decimal>() || type_id == TypeId::of::<Option<Decimal>>()
}

/// Serialize an optional decimal: `None` as `""`, anything else as an exact
/// number
pub fn serialize<S>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let Some(value) = value else {
        return serializer.serialize_str("");
    };

    // Trailing zeros dropped, so integral values are written as integers
    Number::from_str(&value.normalize().to_string())
        .map_err(S::Error::custom)?
        .serialize(serializer)
}

/// Deserialize an optional decimal from a number, a string or null
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(DecimalVisitor)
}

/// Read a single JSON token with this rule
pub fn read(token: &Value) -> Result<Option<Decimal>, serde_json::Error> {
    deserialize(token)
}

/// Write a single value with this rule
pub fn write(value: Option<Decimal>) -> Result<Value, serde_json::Error> {
    serialize(&value, serde_json::value::Serializer)
}

fn parse_text(text: &str) -> Option<Decimal> {
    if is_blank(text) {
        return None;
    }

    let normalized = normalize_localized(text);
    match Decimal::from_str(&normalized).or_else(|_| Decimal::from_scientific(&normalized)) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::debug!("Decimal text is not a number, reading as zero: {err}");
            Some(Decimal::ZERO)
        }
    }
}

fn from_number<E: de::Error>(text: &str) -> Result<Decimal, E> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| E::custom(format!("Number {text} is out of decimal range")))
}

fn from_wide<E: de::Error>(value: i128) -> Result<Decimal, E> {
    Decimal::try_from_i128_with_scale(value, 0)
        .map_err(|_| E::custom(format!("Number {value} is out of decimal range")))
}

fn from_float<E: de::Error>(value: f64) -> Result<Decimal, E> {
    // Display gives the shortest text that reads back to the same float
    Decimal::from_str(&value.to_string())
        .or_else(|_| Decimal::try_from(value))
        .map_err(|_| E::custom(format!("Number {value} is out of decimal range")))
}

struct DecimalVisitor;

impl<'de> Visitor<'de> for DecimalVisitor {
    type Value = Option<Decimal>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a decimal number or a numeric string")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(parse_text(v))
    }

    fn visit_char<E>(self, v: char) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(parse_text(v.encode_utf8(&mut [0; 4])))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Some(Decimal::from(v)))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Some(Decimal::from(v)))
    }

    fn visit_i128<E>(self, v: i128) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        from_wide(v).map(Some)
    }

    fn visit_u128<E>(self, v: u128) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        let value = i128::try_from(v)
            .map_err(|_| E::custom(format!("Number {v} is out of decimal range")))?;
        from_wide(value).map(Some)
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        from_float(v).map(Some)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_bool<E>(self, _v: bool) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Err(unexpected("Boolean"))
    }

    fn visit_bytes<E>(self, _v: &[u8]) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Err(unexpected("Bytes"))
    }

    fn visit_seq<A>(self, _seq: A) -> Result<Self::Value, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        Err(unexpected("StartArray"))
    }

    fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
    where
        A: de::MapAccess<'de>,
    {
        match number_text(map)? {
            Some(text) => from_number(&text).map(Some),
            None => Err(unexpected("StartObject")),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use super::*;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Invoice {
        #[serde(with = "crate::decimal", default)]
        total: Option<Decimal>,
    }

    fn dec(text: &str) -> Decimal {
        Decimal::from_str(text).expect("valid decimal literal")
    }

    #[test]
    fn test_can_handle_only_decimals() {
        assert!(can_handle::<Decimal>());
        assert!(can_handle::<Option<Decimal>>());
        assert!(!can_handle::<f64>());
        assert!(!can_handle::<i64>());
        assert!(!can_handle::<String>());
    }

    #[test]
    fn test_write_absent_as_empty_string() {
        assert_eq!(write(None).expect("write absent"), json!(""));
    }

    #[test]
    fn test_write_present_as_number() {
        assert_eq!(write(Some(dec("12.5"))).expect("write"), json!(12.5));
        assert_eq!(write(Some(dec("42"))).expect("write"), json!(42));
        assert_eq!(write(Some(dec("-3.00"))).expect("write"), json!(-3));
    }

    #[test]
    fn test_read_blank_strings_as_absent() {
        assert_eq!(read(&json!("")).expect("read"), None);
        assert_eq!(read(&json!("   ")).expect("read"), None);
        assert_eq!(read(&json!("\t\n")).expect("read"), None);
    }

    #[test]
    fn test_read_numeric_text() {
        assert_eq!(read(&json!("12.5")).expect("read"), Some(dec("12.5")));
        assert_eq!(read(&json!("12,5")).expect("read"), Some(dec("12.5")));
        assert_eq!(read(&json!("1.234,56")).expect("read"), Some(dec("1234.56")));
        assert_eq!(read(&json!("1e3")).expect("read"), Some(dec("1000")));
    }

    #[test]
    fn test_read_unparseable_text_as_zero() {
        assert_eq!(read(&json!("not-a-number")).expect("read"), Some(Decimal::ZERO));
    }

    #[test]
    fn test_read_native_numbers() {
        assert_eq!(read(&json!(7)).expect("read"), Some(dec("7")));
        assert_eq!(read(&json!(-7)).expect("read"), Some(dec("-7")));
        assert_eq!(read(&json!(0.1)).expect("read"), Some(dec("0.1")));
    }

    #[test]
    fn test_read_null_as_absent() {
        assert_eq!(read(&Value::Null).expect("read"), None);
    }

    #[test]
    fn test_read_rejects_other_tokens() {
        let err = read(&json!(true)).expect_err("booleans are not decimals");
        assert!(err.to_string().contains("Unexpected token type: Boolean"));

        let err = read(&json!({"value": 1})).expect_err("objects are not decimals");
        assert!(err.to_string().contains("Unexpected token type: StartObject"));

        let err = read(&json!([1])).expect_err("arrays are not decimals");
        assert!(err.to_string().contains("Unexpected token type: StartArray"));
    }

    #[test]
    fn test_write_then_read_is_identity() {
        for text in ["0", "1", "-1", "12.5", "0.1", "1234.5678", "-99.99", "9000000000"] {
            let value = Some(dec(text));
            let written = write(value).expect("write");
            assert_eq!(read(&written).expect("read"), value, "round trip of {text}");
        }

        assert_eq!(read(&write(None).expect("write")).expect("read"), None);
    }

    #[test]
    fn test_write_then_read_keeps_every_digit() {
        for text in [
            "1234567890.123456789",
            "0.1234567890123456789",
            "-0.0000000000000000000000000001",
            "79228162514264337593543950335",
            "-79228162514264337593543950335",
        ] {
            let value = Some(dec(text));
            let written = write(value).expect("write");
            assert_eq!(written.to_string(), text);
            assert_eq!(read(&written).expect("read"), value, "round trip of {text}");
        }
    }

    #[test]
    fn test_extreme_values_round_trip_through_text() {
        for total in [
            Decimal::MAX,
            Decimal::MIN,
            dec("1234567890.123456789"),
            dec("0.1234567890123456789"),
        ] {
            let invoice = Invoice { total: Some(total) };
            let text = serde_json::to_string(&invoice).expect("serialize");
            assert_eq!(text, format!(r#"{{"total":{total}}}"#));

            let back: Invoice = serde_json::from_str(&text).expect("deserialize");
            assert_eq!(back, invoice);
        }
    }

    #[test]
    fn test_read_number_beyond_decimal_range_fails() {
        let err = serde_json::from_str::<Invoice>(r#"{"total": 1e40}"#)
            .expect_err("too large for a decimal");
        assert!(err.to_string().contains("out of decimal range"));
    }

    #[test]
    fn test_field_round_trip_through_text() {
        let invoice = Invoice {
            total: Some(dec("19.90")),
        };
        let text = serde_json::to_string(&invoice).expect("serialize");
        assert_eq!(text, r#"{"total":19.9}"#);

        let back: Invoice = serde_json::from_str(&text).expect("deserialize");
        assert_eq!(back, invoice);

        let empty: Invoice = serde_json::from_str(r#"{"total": ""}"#).expect("deserialize");
        assert_eq!(empty.total, None);

        let missing: Invoice = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(missing.total, None);
    }
}
