//! Pre-tokenized request values.
//!
//! [`FormValues`] is the key/value view of a submitted form: every field name
//! maps to the ordered list of values submitted under it.

use crate::{FormError, FormResult};
use indexmap::IndexMap;

/// Ordered mapping of field name to submitted values.
///
/// # Example
///
/// ```
/// use formwright_core::FormValues;
///
/// let values = FormValues::from_urlencoded("name=alice&tag=a&tag=b").unwrap();
///
/// assert_eq!(values.get("name"), Some("alice"));
/// assert_eq!(values.get_all("tag"), ["a", "b"]);
/// assert_eq!(values.to_urlencoded().unwrap(), "name=alice&tag=a&tag=b");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    inner: IndexMap<String, Vec<String>>,
}

impl FormValues {
    /// Creates an empty value set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an `application/x-www-form-urlencoded` string.
    ///
    /// Repeated keys keep every value in submission order.
    pub fn from_urlencoded(input: &str) -> FormResult<Self> {
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_str(input).map_err(|e| FormError::decode(e.to_string()))?;
        Ok(pairs.into_iter().collect())
    }

    /// Serialises the values as an `application/x-www-form-urlencoded` string.
    pub fn to_urlencoded(&self) -> FormResult<String> {
        serde_urlencoded::to_string(self.pairs()).map_err(|e| FormError::encode(e.to_string()))
    }

    /// Returns the first value submitted for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns every value submitted for `name`.
    #[must_use]
    pub fn get_all(&self, name: &str) -> &[String] {
        self.inner.get(name).map_or(&[], Vec::as_slice)
    }

    /// Replaces all values for `name` with a single value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(name.into(), vec![value.into()]);
    }

    /// Replaces all values for `name`.
    pub fn set_all(&mut self, name: impl Into<String>, values: Vec<String>) {
        self.inner.insert(name.into(), values);
    }

    /// Appends a value for `name`, keeping existing ones.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.entry(name.into()).or_default().push(value.into());
    }

    /// Removes `name` and returns its values.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.inner.shift_remove(name)
    }

    /// Applies `f` to every value of `name` in place.
    pub fn map_values<F>(&mut self, name: &str, f: F)
    where
        F: Fn(&str) -> String,
    {
        if let Some(values) = self.inner.get_mut(name) {
            for value in values.iter_mut() {
                *value = f(value);
            }
        }
    }

    /// Returns `true` if a value was submitted for `name`.
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Returns the number of distinct field names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if no field was submitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over field names in submission order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    /// Iterates over `(name, values)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Flattens the values into `(name, value)` pairs.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.inner
            .iter()
            .flat_map(|(k, values)| values.iter().map(move |v| (k.as_str(), v.as_str())))
            .collect()
    }

    /// Overwrites every field present in `other`, keeping the rest.
    pub fn overlay(&mut self, other: &Self) {
        for (name, values) in &other.inner {
            self.inner.insert(name.clone(), values.clone());
        }
    }

    /// Compares two value sets ignoring key and value ordering.
    #[must_use]
    pub fn equivalent(&self, other: &Self) -> bool {
        if self.inner.len() != other.inner.len() {
            return false;
        }
        self.inner.iter().all(|(name, values)| {
            other.inner.get(name).is_some_and(|other_values| {
                let mut left = values.clone();
                let mut right = other_values.clone();
                left.sort();
                right.sort();
                left == right
            })
        })
    }
}

impl<K, V> FromIterator<(K, V)> for FormValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (k, v) in iter {
            values.append(k, v);
        }
        values
    }
}

impl IntoIterator for FormValues {
    type Item = (String, Vec<String>);
    type IntoIter = indexmap::map::IntoIter<String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_urlencoded() {
        let values = FormValues::from_urlencoded("email=a%40b.com&name=hello+world").unwrap();

        assert_eq!(values.get("email"), Some("a@b.com"));
        assert_eq!(values.get("name"), Some("hello world"));
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_repeated_keys_keep_order() {
        let values = FormValues::from_urlencoded("color=red&size=m&color=blue").unwrap();

        assert_eq!(values.get_all("color"), ["red", "blue"]);
        assert_eq!(values.keys().collect::<Vec<_>>(), vec!["color", "size"]);
    }

    #[test]
    fn test_missing_key() {
        let values = FormValues::new();
        assert_eq!(values.get("nothing"), None);
        assert!(values.get_all("nothing").is_empty());
        assert!(values.is_empty());
    }

    #[test]
    fn test_empty_value_is_present() {
        let values = FormValues::from_urlencoded("firstname=&email=a%40b.com").unwrap();
        assert!(values.contains_key("firstname"));
        assert_eq!(values.get("firstname"), Some(""));
    }

    #[test]
    fn test_set_and_append() {
        let mut values = FormValues::new();
        values.append("tag", "a");
        values.append("tag", "b");
        values.set("name", "bob");
        values.set("tag", "c");

        assert_eq!(values.get_all("tag"), ["c"]);
        assert_eq!(values.get("name"), Some("bob"));
    }

    #[test]
    fn test_overlay_replaces_submitted_fields_only() {
        let mut base: FormValues = [("company", "Acme"), ("city", "Berlin")].into_iter().collect();
        let submitted: FormValues = [("city", "Munich")].into_iter().collect();

        base.overlay(&submitted);

        assert_eq!(base.get("company"), Some("Acme"));
        assert_eq!(base.get("city"), Some("Munich"));
    }

    #[test]
    fn test_map_values() {
        let mut values: FormValues = [("name", "  bob ")].into_iter().collect();
        values.map_values("name", |v| v.trim().to_string());
        assert_eq!(values.get("name"), Some("bob"));
    }

    #[test]
    fn test_equivalent_ignores_order() {
        let a = FormValues::from_urlencoded("x=1&y=2&y=3").unwrap();
        let b = FormValues::from_urlencoded("y=3&x=1&y=2").unwrap();
        let c = FormValues::from_urlencoded("x=1&y=2").unwrap();

        assert!(a.equivalent(&b));
        assert!(!a.equivalent(&c));
        assert_ne!(a, b);
    }

    #[test]
    fn test_to_urlencoded_escapes() {
        let values: FormValues = [("q", "a&b=c d")].into_iter().collect();
        assert_eq!(values.to_urlencoded().unwrap(), "q=a%26b%3Dc+d");
    }

    #[test]
    fn test_remove() {
        let mut values: FormValues = [("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(values.remove("a"), Some(vec!["1".to_string()]));
        assert_eq!(values.keys().collect::<Vec<_>>(), vec!["b"]);
    }
}
