//! Form data objects.
//!
//! Every value travelling through the pipeline implements [`FormData`]. Two
//! kinds exist in practice:
//!
//! - [`DefaultFormData`], the loosely-typed string map used when no custom
//!   provider is configured, and
//! - any type implementing [`FormSchema`], which declares its fields with
//!   [`FieldSpec`]s and gets a `FormData` implementation through serde.
//!
//! # Declaring a typed form
//!
//! ```
//! use formwright_core::{FieldSpec, FormData, FormSchema, FormValues};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize)]
//! #[serde(default)]
//! struct Newsletter {
//!     #[serde(rename = "email")]
//!     address: String,
//!     topics: String,
//! }
//!
//! impl FormSchema for Newsletter {
//!     fn fields() -> &'static [FieldSpec] {
//!         const FIELDS: &[FieldSpec] = &[
//!             FieldSpec::new("email").rules("required,email").conform("email"),
//!             FieldSpec::new("topics"),
//!         ];
//!         FIELDS
//!     }
//! }
//!
//! let mut data = Newsletter::default();
//! let values = FormValues::from_urlencoded("email=a%40b.com&topics=rust").unwrap();
//! data.decode_from(&values).unwrap();
//!
//! assert_eq!(data.address, "a@b.com");
//! assert_eq!(data.encode().unwrap().get("topics"), Some("rust"));
//! ```

use crate::{codec, FormResult, FormValues};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Declaration of a single form field.
///
/// `rules` is a comma-separated rule expression (`required,min=2`), `conform`
/// a list of normalisation directives (`trim lower`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Form field name as submitted in the request.
    pub name: &'static str,
    /// Validation rule expression.
    pub rules: &'static str,
    /// Conform directives applied before decoding.
    pub conform: &'static str,
}

impl FieldSpec {
    /// Declares a field without rules or directives.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            rules: "",
            conform: "",
        }
    }

    /// Sets the validation rule expression.
    #[must_use]
    pub const fn rules(mut self, rules: &'static str) -> Self {
        self.rules = rules;
        self
    }

    /// Sets the conform directives.
    #[must_use]
    pub const fn conform(mut self, conform: &'static str) -> Self {
        self.conform = conform;
        self
    }
}

/// A data object the form pipeline can provide, decode, validate and encode.
///
/// The trait is object safe; handlers hold data as `Box<dyn FormData>` and
/// callers recover the concrete type through [`Form::data_as`](crate::Form::data_as).
pub trait FormData: Any + Send + Sync + fmt::Debug {
    /// Populates `self` from request values.
    ///
    /// Fields absent from `values` keep their current value.
    fn decode_from(&mut self, values: &FormValues) -> FormResult<()>;

    /// Serialises `self` back into request values.
    fn encode(&self) -> FormResult<FormValues>;

    /// Declared fields of this data type.
    fn field_specs(&self) -> &'static [FieldSpec] {
        &[]
    }

    /// Returns `true` only for [`DefaultFormData`].
    fn is_default_data(&self) -> bool {
        false
    }

    /// Upcasts to `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Upcasts to mutable `Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Converts the box into `Box<dyn Any>` for owned downcasting.
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;

    /// Clones the data behind a fresh box.
    fn clone_boxed(&self) -> Box<dyn FormData>;
}

impl Clone for Box<dyn FormData> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

/// Typed form declaration.
///
/// Implementing `FormSchema` for a serde type makes it a [`FormData`]:
/// decoding overlays the submitted values on the current encoded state and
/// deserialises the result. Sequence fields such as `Vec<String>` receive
/// every submitted value and encode as repeated keys; any other field takes
/// the first value submitted under its name. Types should use
/// `#[serde(default)]` so partially submitted forms decode.
pub trait FormSchema:
    Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static
{
    /// Declared fields with their rules and conform directives.
    fn fields() -> &'static [FieldSpec] {
        &[]
    }
}

impl<T: FormSchema> FormData for T {
    fn decode_from(&mut self, values: &FormValues) -> FormResult<()> {
        let mut merged = self.encode()?;
        merged.overlay(values);
        *self = codec::from_values(&merged)?;
        Ok(())
    }

    fn encode(&self) -> FormResult<FormValues> {
        codec::to_values(self)
    }

    fn field_specs(&self) -> &'static [FieldSpec] {
        T::fields()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }

    fn clone_boxed(&self) -> Box<dyn FormData> {
        Box::new(self.clone())
    }
}

/// Loosely-typed form data: field name to first submitted value.
///
/// This is what the pipeline hands out when no custom provider is
/// configured. The default validator never validates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultFormData(IndexMap<String, String>);

impl DefaultFormData {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Consumes the wrapper and returns the map.
    #[must_use]
    pub fn into_inner(self) -> IndexMap<String, String> {
        self.0
    }
}

impl Deref for DefaultFormData {
    type Target = IndexMap<String, String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DefaultFormData {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DefaultFormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl FormData for DefaultFormData {
    fn decode_from(&mut self, values: &FormValues) -> FormResult<()> {
        for (name, submitted) in values.iter() {
            let value = submitted.first().cloned().unwrap_or_default();
            self.0.insert(name.to_string(), value);
        }
        Ok(())
    }

    fn encode(&self) -> FormResult<FormValues> {
        Ok(self.0.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect())
    }

    fn is_default_data(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }

    fn clone_boxed(&self) -> Box<dyn FormData> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Signup {
        firstname: String,
        email: String,
        age: Option<u32>,
    }

    impl FormSchema for Signup {
        fn fields() -> &'static [FieldSpec] {
            const FIELDS: &[FieldSpec] = &[
                FieldSpec::new("firstname").rules("required"),
                FieldSpec::new("email").rules("required,email"),
                FieldSpec::new("age").rules("omitempty,gte=18"),
            ];
            FIELDS
        }
    }

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(default)]
    struct Interests {
        name: String,
        topics: Vec<String>,
    }

    impl FormSchema for Interests {}

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Strict {
        count: u32,
    }

    impl FormSchema for Strict {}

    #[test]
    fn test_field_spec_builder() {
        const SPEC: FieldSpec = FieldSpec::new("zip").rules("required,len=5").conform("num");
        assert_eq!(SPEC.name, "zip");
        assert_eq!(SPEC.rules, "required,len=5");
        assert_eq!(SPEC.conform, "num");
    }

    #[test]
    fn test_schema_decode() {
        let mut data = Signup::default();
        let values = FormValues::from_urlencoded("firstname=Ann&email=a%40b.com&age=30").unwrap();

        data.decode_from(&values).unwrap();

        assert_eq!(data.firstname, "Ann");
        assert_eq!(data.email, "a@b.com");
        assert_eq!(data.age, Some(30));
        assert_eq!(data.field_specs().len(), 3);
        assert!(!data.is_default_data());
    }

    #[test]
    fn test_schema_decode_keeps_unsubmitted_fields() {
        let mut data = Signup {
            firstname: "Preset".into(),
            ..Signup::default()
        };
        let values = FormValues::from_urlencoded("email=x%40y.org").unwrap();

        data.decode_from(&values).unwrap();

        assert_eq!(data.firstname, "Preset");
        assert_eq!(data.email, "x@y.org");
    }

    #[test]
    fn test_schema_decode_type_mismatch() {
        let mut data = Signup::default();
        let values = FormValues::from_urlencoded("age=old").unwrap();

        let err = data.decode_from(&values).unwrap_err();
        assert_eq!(err.category(), crate::FormErrorCategory::Decode);
    }

    #[test]
    fn test_schema_decode_rejects_out_of_range() {
        let mut data = Strict { count: 0 };
        let values = FormValues::from_urlencoded("count=-1").unwrap();
        assert!(data.decode_from(&values).is_err());
    }

    #[test]
    fn test_schema_encode_skips_none() {
        let data = Signup {
            firstname: "Ann".into(),
            email: "a@b.com".into(),
            age: None,
        };

        let values = data.encode().unwrap();
        assert_eq!(values.get("firstname"), Some("Ann"));
        assert!(!values.contains_key("age"));
    }

    #[test]
    fn test_schema_decode_repeated_key_takes_first() {
        let mut data = Signup::default();
        let values = FormValues::from_urlencoded("firstname=Ann&firstname=Bob&email=a%40b.com").unwrap();

        data.decode_from(&values).unwrap();

        assert_eq!(data.firstname, "Ann");
        assert_eq!(data.email, "a@b.com");
    }

    #[test]
    fn test_schema_multi_value_field_round_trip() {
        let mut data = Interests::default();
        let submitted =
            FormValues::from_urlencoded("name=Ann&topics=rust&topics=http&topics=forms").unwrap();

        data.decode_from(&submitted).unwrap();
        assert_eq!(data.topics, ["rust", "http", "forms"]);

        let encoded = data.encode().unwrap();
        assert_eq!(encoded.get_all("topics"), ["rust", "http", "forms"]);
        assert!(encoded.equivalent(&submitted));
    }

    #[test]
    fn test_default_data_decode_takes_first_value() {
        let mut data = DefaultFormData::new();
        let values = FormValues::from_urlencoded("a=1&a=2&b=3").unwrap();

        data.decode_from(&values).unwrap();

        assert_eq!(data.get("a"), Some("1"));
        assert_eq!(data.get("b"), Some("3"));
        assert!(data.is_default_data());
    }

    #[test]
    fn test_downcast() {
        let boxed: Box<dyn FormData> = Box::new(Signup::default());
        assert!(boxed.as_any().downcast_ref::<Signup>().is_some());
        assert!(boxed.as_any().downcast_ref::<DefaultFormData>().is_none());

        let owned = boxed.into_any().downcast::<Signup>().unwrap();
        assert_eq!(*owned, Signup::default());
    }

    #[test]
    fn test_boxed_clone() {
        let boxed: Box<dyn FormData> =
            Box::new([("company", "Acme")].into_iter().collect::<DefaultFormData>());
        let cloned = boxed.clone();
        assert_eq!(
            cloned.as_any().downcast_ref::<DefaultFormData>().unwrap().get("company"),
            Some("Acme")
        );
    }

    proptest! {
        #[test]
        fn prop_decode_then_encode_round_trips(
            firstname in "[a-zA-Z ]{0,12}",
            email in "[a-z]{1,8}@[a-z]{1,8}\\.com",
            age in proptest::option::of(0u32..130),
        ) {
            let mut submitted = FormValues::new();
            submitted.set("firstname", firstname);
            submitted.set("email", email);
            if let Some(age) = age {
                submitted.set("age", age.to_string());
            }

            let mut data = Signup::default();
            data.decode_from(&submitted).unwrap();
            let encoded = data.encode().unwrap();

            prop_assert!(encoded.equivalent(&submitted));
        }
    }
}
