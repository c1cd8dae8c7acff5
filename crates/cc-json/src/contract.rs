//! Interface contracts
//!
//! A contract decides which members of a serialized object are emitted,
//! independently of the concrete type that produced it. The
//! [`InterfaceContractResolver`] emits exactly the members declared by an
//! interface struct, so any payload carrying those members serializes with
//! the interface's shape and hides everything else.

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, DeserializeOwned, Visitor};
use serde::Deserializer;
use serde_json::{Map, Value};

use crate::error::Error;

/// Strategy choosing the members a serialized value exposes
pub trait ContractResolver: Send + Sync {
    /// Member names emitted for any object, in output order
    fn properties(&self) -> &[&'static str];

    /// Project a serialized value onto [`ContractResolver::properties`].
    ///
    /// Objects keep only the listed members, arrays are projected element by
    /// element and scalars pass through unchanged.
    fn resolve(&self, value: Value) -> Value {
        project(self.properties(), value)
    }
}

/// Resolves every object to the members of the interface struct `I`
pub struct InterfaceContractResolver<I> {
    properties: &'static [&'static str],
    _interface: PhantomData<fn() -> I>,
}

impl<I: DeserializeOwned> InterfaceContractResolver<I> {
    /// Create a resolver for the interface `I`.
    ///
    /// `I` must derive `Deserialize` as a plain struct; its serialized member
    /// names (after `rename`) become the contract.
    pub fn new() -> Result<Self, Error> {
        let properties = interface_fields::<I>()?;
        tracing::debug!(
            "Contract for {} exposes {} properties",
            type_name::<I>(),
            properties.len()
        );
        Ok(Self {
            properties,
            _interface: PhantomData,
        })
    }

    /// Properties emitted for `T`, which are always those of the interface
    pub fn properties_for<T: ?Sized>(&self) -> &'static [&'static str] {
        self.properties
    }
}

impl<I> ContractResolver for InterfaceContractResolver<I> {
    fn properties(&self) -> &[&'static str] {
        self.properties
    }
}

impl<I> Clone for InterfaceContractResolver<I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I> Copy for InterfaceContractResolver<I> {}

impl<I> fmt::Debug for InterfaceContractResolver<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterfaceContractResolver")
            .field("interface", &type_name::<I>())
            .field("properties", &self.properties)
            .finish()
    }
}

fn project(properties: &[&'static str], value: Value) -> Value {
    match value {
        Value::Object(mut members) => {
            let mut projected = Map::with_capacity(properties.len());
            for name in properties {
                if let Some(member) = members.remove(*name) {
                    projected.insert((*name).to_string(), member);
                }
            }
            Value::Object(projected)
        }
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| project(properties, item))
                .collect(),
        ),
        scalar => scalar,
    }
}

fn interface_fields<I: DeserializeOwned>() -> Result<&'static [&'static str], Error> {
    let mut fields = None;
    // The probe always fails; it only records what the derive asks for
    let _ = I::deserialize(FieldProbe {
        fields: &mut fields,
    });
    fields.ok_or(Error::NotAStruct(type_name::<I>()))
}

/// Deserializer that records the member list of a derived struct
struct FieldProbe<'a> {
    fields: &'a mut Option<&'static [&'static str]>,
}

impl<'de> Deserializer<'de> for FieldProbe<'_> {
    type Error = de::value::Error;

    fn deserialize_any<V>(self, _visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        Err(de::Error::custom("interface is not a struct"))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        *self.fields = Some(fields);
        Err(de::Error::custom("interface fields recorded"))
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map enum identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use super::*;

    /// Public face of a customer
    #[allow(dead_code)]
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct CustomerView {
        full_name: String,
        email: String,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Customer {
        id: u64,
        email: String,
        password_hash: String,
        full_name: String,
    }

    fn customer() -> Customer {
        Customer {
            id: 7,
            email: "ana@example.com".to_string(),
            password_hash: "secret".to_string(),
            full_name: "Ana Souza".to_string(),
        }
    }

    #[test]
    fn test_properties_follow_interface_declaration() {
        let resolver = InterfaceContractResolver::<CustomerView>::new().expect("struct interface");
        assert_eq!(resolver.properties(), &["fullName", "email"]);
        assert_eq!(resolver.properties_for::<Customer>(), &["fullName", "email"]);
        assert_eq!(resolver.properties_for::<str>(), &["fullName", "email"]);
    }

    #[test]
    fn test_resolve_hides_concrete_members() {
        let resolver = InterfaceContractResolver::<CustomerView>::new().expect("struct interface");
        let value = serde_json::to_value(customer()).expect("serialize");

        let projected = resolver.resolve(value);
        assert_eq!(
            projected,
            json!({"fullName": "Ana Souza", "email": "ana@example.com"})
        );
        let keys: Vec<&String> = projected
            .as_object()
            .expect("object")
            .keys()
            .collect();
        assert_eq!(keys, ["fullName", "email"]);
    }

    #[test]
    fn test_resolve_projects_arrays_and_skips_missing_members() {
        let resolver = InterfaceContractResolver::<CustomerView>::new().expect("struct interface");
        let value = json!([{"email": "a@b.c", "id": 1}, 5]);

        assert_eq!(resolver.resolve(value), json!([{"email": "a@b.c"}, 5]));
    }

    #[test]
    fn test_non_struct_interface_is_rejected() {
        let err = InterfaceContractResolver::<String>::new().expect_err("strings have no members");
        assert!(matches!(err, Error::NotAStruct(_)));
    }

    #[test]
    fn test_resolver_is_shareable() {
        fn assert_send_sync<T: Send + Sync + Copy>() {}
        assert_send_sync::<InterfaceContractResolver<CustomerView>>();
    }
}
