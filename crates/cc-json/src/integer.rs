//! Integer JSON conversion rule
//!
//! Mirrors [`crate::decimal`] for `Option<N>` fields holding any primitive
//! integer that widens into `i64` (`i8` to `i64`, `u8` to `u32`). Blank
//! strings read as absent, other strings that fail to parse read as zero and
//! floats are rounded half to even.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Unexpected, Visitor};
use serde::{Deserializer, Serializer};
use serde_json::Value;

use crate::token::{is_blank, number_text, unexpected};

/// Serialize an optional integer: `None` as `""`, anything else as a number
pub fn serialize<N, S>(value: &Option<N>, serializer: S) -> Result<S::Ok, S::Error>
where
    N: Copy + Into<i64>,
    S: Serializer,
{
    match value {
        Some(value) => serializer.serialize_i64((*value).into()),
        None => serializer.serialize_str(""),
    }
}

/// Deserialize an optional integer from a number, a string or null
pub fn deserialize<'de, N, D>(deserializer: D) -> Result<Option<N>, D::Error>
where
    N: TryFrom<i64>,
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(IntegerVisitor(PhantomData))
}

/// Read a single JSON token with this rule
pub fn read<N: TryFrom<i64>>(token: &Value) -> Result<Option<N>, serde_json::Error> {
    deserialize(token)
}

/// Write a single value with this rule
pub fn write<N: Copy + Into<i64>>(value: Option<N>) -> Result<Value, serde_json::Error> {
    serialize(&value, serde_json::value::Serializer)
}

struct IntegerVisitor<N>(PhantomData<N>);

impl<N: TryFrom<i64>> IntegerVisitor<N> {
    fn narrow<E: de::Error>(&self, value: i64) -> Result<Option<N>, E> {
        N::try_from(value)
            .map(Some)
            .map_err(|_| E::invalid_value(Unexpected::Signed(value), self))
    }

    fn round<E: de::Error>(&self, value: f64) -> Result<Option<N>, E> {
        let rounded = value.round_ties_even();
        if !rounded.is_finite() || rounded < i64::MIN as f64 || rounded >= i64::MAX as f64 {
            return Err(E::invalid_value(Unexpected::Float(value), self));
        }
        self.narrow(rounded as i64)
    }
}

impl<'de, N: TryFrom<i64>> Visitor<'de> for IntegerVisitor<N> {
    type Value = Option<N>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(
            formatter,
            "an integer fitting {} or a numeric string",
            std::any::type_name::<N>()
        )
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        if is_blank(v) {
            return Ok(None);
        }

        match v.trim().parse::<i64>().ok().and_then(|n| N::try_from(n).ok()) {
            Some(value) => Ok(Some(value)),
            None => {
                tracing::debug!("Integer text is not a number in range, reading as zero");
                self.narrow(0)
            }
        }
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        self.narrow(v)
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        let value = i64::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))?;
        self.narrow(value)
    }

    fn visit_i128<E>(self, _v: i128) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Err(E::invalid_value(Unexpected::Other("128-bit integer"), &self))
    }

    fn visit_u128<E>(self, _v: u128) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Err(E::invalid_value(Unexpected::Other("128-bit integer"), &self))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        self.round(v)
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
        let Some(text) = number_text(map)? else {
            return Err(unexpected("StartObject"));
        };

        if let Ok(value) = text.parse::<i64>() {
            return self.narrow(value);
        }
        match text.parse::<f64>() {
            Ok(value) => self.round(value),
            Err(_) => Err(de::Error::invalid_value(Unexpected::Str(&text), &self)),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use super::*;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Stock {
        #[serde(with = "crate::integer", default)]
        quantity: Option<i32>,
        #[serde(with = "crate::integer", default)]
        shelf: Option<u8>,
    }

    #[test]
    fn test_write_absent_and_present() {
        assert_eq!(write::<i32>(None).expect("write"), json!(""));
        assert_eq!(write(Some(15i32)).expect("write"), json!(15));
        assert_eq!(write(Some(-4i64)).expect("write"), json!(-4));
    }

    #[test]
    fn test_read_strings() {
        assert_eq!(read::<i32>(&json!("")).expect("read"), None);
        assert_eq!(read::<i32>(&json!("  ")).expect("read"), None);
        assert_eq!(read::<i32>(&json!(" 42 ")).expect("read"), Some(42));
        assert_eq!(read::<i32>(&json!("forty")).expect("read"), Some(0));
        assert_eq!(read::<u8>(&json!("300")).expect("read"), Some(0));
    }

    #[test]
    fn test_read_numbers() {
        assert_eq!(read::<i32>(&json!(7)).expect("read"), Some(7));
        assert_eq!(read::<i32>(&json!(-7)).expect("read"), Some(-7));
        assert_eq!(read::<i32>(&json!(2.5)).expect("read"), Some(2));
        assert_eq!(read::<i32>(&json!(3.5)).expect("read"), Some(4));
        assert_eq!(read::<i32>(&Value::Null).expect("read"), None);
    }

    #[test]
    fn test_read_out_of_range_number_fails() {
        assert!(read::<u8>(&json!(256)).is_err());
        assert!(read::<u8>(&json!(-1)).is_err());
        assert!(read::<i32>(&json!(1e300)).is_err());
    }

    #[test]
    fn test_read_fractional_and_huge_numbers_from_text() {
        let stock: Stock =
            serde_json::from_str(r#"{"quantity": 2.5, "shelf": 3.5}"#).expect("deserialize");
        assert_eq!(stock.quantity, Some(2));
        assert_eq!(stock.shelf, Some(4));

        assert!(serde_json::from_str::<Stock>(r#"{"quantity": 99999999999999999999}"#).is_err());
        assert!(read::<i64>(&json!(u64::MAX)).is_err());
    }

    #[test]
    fn test_read_rejects_other_tokens() {
        let err = read::<i32>(&json!(false)).expect_err("booleans are not integers");
        assert!(err.to_string().contains("Unexpected token type: Boolean"));
    }

    #[test]
    fn test_struct_round_trip() {
        let stock = Stock {
            quantity: Some(-12),
            shelf: None,
        };
        let text = serde_json::to_string(&stock).expect("serialize");
        assert_eq!(text, r#"{"quantity":-12,"shelf":""}"#);

        let back: Stock = serde_json::from_str(&text).expect("deserialize");
        assert_eq!(back, stock);
    }
}
