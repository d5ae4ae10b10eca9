//! Serde bridge between typed form data and [`FormValues`].
//!
//! Decoding hands every field all of its submitted values. Sequence fields
//! (`Vec<T>`, tuples) take them all, every other field takes the first one.
//! Encoding is the inverse: scalars become one value, sequences become
//! repeated keys and `None` leaves the key out.

use crate::{FormError, FormResult, FormValues};
use serde::de::value::{Error as DeError, MapAccessDeserializer, SeqDeserializer, StringDeserializer};
use serde::de::{DeserializeOwned, DeserializeSeed, Error as _, IntoDeserializer, MapAccess, Visitor};
use serde::{Deserializer, Serialize};
use serde_json::Value;

/// Deserializes `T` from submitted values.
pub(crate) fn from_values<T: DeserializeOwned>(values: &FormValues) -> FormResult<T> {
    let access = ValuesAccess {
        entries: values.clone().into_iter(),
        pending: None,
    };
    T::deserialize(MapAccessDeserializer::new(access)).map_err(|e| decode_error(&e))
}

/// Serializes `data` into request values.
pub(crate) fn to_values<T: Serialize>(data: &T) -> FormResult<FormValues> {
    let Value::Object(map) =
        serde_json::to_value(data).map_err(|e| FormError::encode(e.to_string()))?
    else {
        return Err(FormError::encode("form data must serialize as a struct or map"));
    };

    let mut values = FormValues::new();
    for (name, value) in map {
        match value {
            Value::Array(items) => {
                let mut flattened = Vec::with_capacity(items.len());
                for item in items {
                    flattened.extend(scalar(&name, item)?);
                }
                if !flattened.is_empty() {
                    values.set_all(name, flattened);
                }
            }
            other => {
                if let Some(value) = scalar(&name, other)? {
                    values.set(name, value);
                }
            }
        }
    }
    Ok(values)
}

fn scalar(name: &str, value: Value) -> FormResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) | Value::Object(_) => Err(FormError::encode(format!(
            "field `{name}` holds a nested value"
        ))),
    }
}

// Messages read "missing field `x`" or "invalid value for field `x`: ...";
// keep the field when it is named.
fn decode_error(err: &DeError) -> FormError {
    let message = err.to_string();
    let field = message
        .split('`')
        .nth(1)
        .filter(|_| message.contains("field"))
        .map(str::to_string);
    match field {
        Some(field) => FormError::decode_field(field, message),
        None => FormError::decode(message),
    }
}

struct ValuesAccess<I> {
    entries: I,
    pending: Option<(String, Vec<String>)>,
}

impl<'de, I> MapAccess<'de> for ValuesAccess<I>
where
    I: Iterator<Item = (String, Vec<String>)>,
{
    type Error = DeError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, DeError> {
        let Some((name, values)) = self.entries.next() else {
            return Ok(None);
        };
        let key: StringDeserializer<DeError> = name.clone().into_deserializer();
        let key = seed.deserialize(key)?;
        self.pending = Some((name, values));
        Ok(Some(key))
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, DeError> {
        let (name, values) = self
            .pending
            .take()
            .ok_or_else(|| DeError::custom("value requested before its key"))?;
        seed.deserialize(Field(values))
            .map_err(|e| DeError::custom(format!("invalid value for field `{name}`: {e}")))
    }
}

/// All values submitted under one name.
struct Field(Vec<String>);

impl Field {
    fn first(self) -> Scalar {
        Scalar(self.0.into_iter().next().unwrap_or_default())
    }
}

macro_rules! first_value {
    ($($method:ident)*) => {$(
        fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
            self.first().$method(visitor)
        }
    )*};
}

impl<'de> Deserializer<'de> for Field {
    type Error = DeError;

    first_value! {
        deserialize_any deserialize_bool
        deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64
        deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64
        deserialize_f32 deserialize_f64 deserialize_char
        deserialize_str deserialize_string deserialize_bytes deserialize_byte_buf
        deserialize_unit deserialize_map deserialize_identifier
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        if self.0.is_empty() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        SeqDeserializer::new(self.0.into_iter().map(Scalar)).deserialize_any(visitor)
    }

    fn deserialize_tuple<V: Visitor<'de>>(
        self,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, DeError> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, DeError> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DeError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DeError> {
        self.first().deserialize_unit_struct(name, visitor)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DeError> {
        self.first().deserialize_struct(name, fields, visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DeError> {
        self.first().deserialize_enum(name, variants, visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_unit()
    }
}

/// A single submitted value, parsed on demand.
struct Scalar(String);

impl<'de> IntoDeserializer<'de, DeError> for Scalar {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

macro_rules! parse_value {
    ($($method:ident => $visit:ident)*) => {$(
        fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
            match self.0.parse() {
                Ok(value) => visitor.$visit(value),
                Err(e) => Err(DeError::custom(e)),
            }
        }
    )*};
}

impl<'de> Deserializer<'de> for Scalar {
    type Error = DeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_string(self.0)
    }

    // Checkboxes submit "on" when no value attribute is set.
    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        match self.0.as_str() {
            "on" => visitor.visit_bool(true),
            other => visitor.visit_bool(other.parse().map_err(DeError::custom)?),
        }
    }

    parse_value! {
        deserialize_i8 => visit_i8
        deserialize_i16 => visit_i16
        deserialize_i32 => visit_i32
        deserialize_i64 => visit_i64
        deserialize_u8 => visit_u8
        deserialize_u16 => visit_u16
        deserialize_u32 => visit_u32
        deserialize_u64 => visit_u64
        deserialize_f32 => visit_f32
        deserialize_f64 => visit_f64
        deserialize_char => visit_char
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_some(self)
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DeError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DeError> {
        let value: StringDeserializer<DeError> = self.0.into_deserializer();
        value.deserialize_enum(name, variants, visitor)
    }

    serde::forward_to_deserialize_any! {
        str string bytes byte_buf unit_struct seq tuple tuple_struct map struct
        identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Preferences {
        name: String,
        topics: Vec<String>,
        ratings: Vec<u8>,
        age: Option<u32>,
        newsletter: bool,
        plan: Plan,
    }

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    enum Plan {
        #[default]
        Free,
        Pro,
    }

    #[test]
    fn test_single_value_fields_take_first() {
        let values = FormValues::from_urlencoded("name=Ann&name=Bob&age=30&age=40").unwrap();

        let prefs: Preferences = from_values(&values).unwrap();

        assert_eq!(prefs.name, "Ann");
        assert_eq!(prefs.age, Some(30));
    }

    #[test]
    fn test_sequence_fields_take_all() {
        let values =
            FormValues::from_urlencoded("topics=rust&topics=http&ratings=4&ratings=5").unwrap();

        let prefs: Preferences = from_values(&values).unwrap();

        assert_eq!(prefs.topics, ["rust", "http"]);
        assert_eq!(prefs.ratings, [4, 5]);
    }

    #[test]
    fn test_checkbox_and_enum_values() {
        let values = FormValues::from_urlencoded("newsletter=on&plan=pro").unwrap();

        let prefs: Preferences = from_values(&values).unwrap();

        assert!(prefs.newsletter);
        assert_eq!(prefs.plan, Plan::Pro);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let values = FormValues::from_urlencoded("name=Ann&csrf=abc&csrf=def").unwrap();
        let prefs: Preferences = from_values(&values).unwrap();
        assert_eq!(prefs.name, "Ann");
    }

    #[test]
    fn test_invalid_value_names_field() {
        let values = FormValues::from_urlencoded("ratings=4&ratings=high").unwrap();

        let err = from_values::<Preferences>(&values).unwrap_err();

        assert!(matches!(
            err,
            FormError::Decode { field: Some(ref field), .. } if field == "ratings"
        ));
    }

    #[test]
    fn test_encode_sequences_as_repeated_keys() {
        let prefs = Preferences {
            name: "Ann".into(),
            topics: vec!["rust".into(), "http".into()],
            ..Preferences::default()
        };

        let values = to_values(&prefs).unwrap();

        assert_eq!(values.get_all("topics"), ["rust", "http"]);
        assert!(!values.contains_key("ratings"));
        assert!(!values.contains_key("age"));
        assert_eq!(values.get("newsletter"), Some("false"));
        assert_eq!(values.get("plan"), Some("free"));
        assert_eq!(values.keys().next(), Some("name"));
    }

    #[test]
    fn test_encode_rejects_nested_values() {
        #[derive(Serialize)]
        struct Nested {
            address: Preferences,
        }

        let err = to_values(&Nested {
            address: Preferences::default(),
        })
        .unwrap_err();
        assert!(matches!(err, FormError::Encode { .. }));
    }
}
