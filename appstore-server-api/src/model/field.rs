//! Conversions between typed model fields and untyped JSON values.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

/// A type that can be stored in a declared model field.
///
/// `from_field` is total: a value that does not fit the declared type yields
/// the type's empty value, so a key present in the source always replaces
/// whatever the field held before.
pub trait FieldValue: Sized {
    /// Builds the field value from the raw JSON found under the field's name.
    fn from_field(value: &Value) -> Self;

    /// Returns the field value as raw JSON (`Null` for an absent value).
    fn to_field(&self) -> Value;

    /// Runs before every populate, whether or not the key is present.
    ///
    /// Collections of nested models clear themselves here so they are always
    /// rebuilt from the incoming rows.
    fn reset(&mut self) {}
}

/// An element of a list-valued field.
pub trait ListItem: Sized {
    /// True for nested models, whose lists are rebuilt on every populate.
    const NESTED: bool;

    /// Builds one element from a row, `None` if the row does not fit.
    fn from_item(value: &Value) -> Option<Self>;

    /// Returns the element as raw JSON.
    fn to_item(&self) -> Value;
}

impl<T> FieldValue for Option<T>
where
    T: Serialize + DeserializeOwned,
{
    fn from_field(value: &Value) -> Self {
        T::deserialize(value).ok()
    }

    fn to_field(&self) -> Value {
        self.as_ref()
            .and_then(|inner| serde_json::to_value(inner).ok())
            .unwrap_or(Value::Null)
    }
}

impl<T: ListItem> FieldValue for Vec<T> {
    fn from_field(value: &Value) -> Self {
        match value {
            Value::Array(rows) => rows.iter().filter_map(T::from_item).collect(),
            _ => Self::new(),
        }
    }

    fn to_field(&self) -> Value {
        Value::Array(self.iter().map(T::to_item).collect())
    }

    fn reset(&mut self) {
        if T::NESTED {
            self.clear();
        }
    }
}

/// Opaque values are stored exactly as received.
impl FieldValue for Value {
    fn from_field(value: &Value) -> Self {
        value.clone()
    }

    fn to_field(&self) -> Value {
        self.clone()
    }
}

impl ListItem for String {
    const NESTED: bool = false;

    fn from_item(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }

    fn to_item(&self) -> Value {
        Value::String(self.clone())
    }
}

impl ListItem for i64 {
    const NESTED: bool = false;

    fn from_item(value: &Value) -> Option<Self> {
        value.as_i64()
    }

    fn to_item(&self) -> Value {
        Value::from(*self)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_option_from_matching_value() {
        let value: Option<String> = FieldValue::from_field(&json!("abc"));
        assert_eq!(value.as_deref(), Some("abc"));
    }

    #[test]
    fn test_option_from_null_is_none() {
        let value: Option<i64> = FieldValue::from_field(&Value::Null);
        assert_eq!(value, None);
    }

    #[test]
    fn test_option_from_mismatched_type_is_none() {
        let value: Option<bool> = FieldValue::from_field(&json!("yes"));
        assert_eq!(value, None);
    }

    #[test]
    fn test_option_to_field() {
        assert_eq!(Some(1.5_f64).to_field(), json!(1.5));
        assert_eq!(None::<String>.to_field(), Value::Null);
    }

    #[test]
    fn test_string_list_skips_non_strings() {
        let value: Vec<String> = FieldValue::from_field(&json!(["a", 1, "b", null]));
        assert_eq!(value, vec!["a".to_owned(), "b".to_owned()]);
    }

    #[test]
    fn test_list_from_non_array_is_empty() {
        let value: Vec<String> = FieldValue::from_field(&json!({"a": 1}));
        assert!(value.is_empty());
    }

    #[test]
    fn test_scalar_list_survives_reset() {
        let mut value = vec!["kept".to_owned()];
        value.reset();
        assert_eq!(value, vec!["kept".to_owned()]);
    }

    #[test]
    fn test_opaque_value_is_cloned() {
        let raw = json!({"one": "value1", "two": "value2"});
        let value: Value = FieldValue::from_field(&raw);
        assert_eq!(value, raw);
        assert_eq!(value.to_field(), raw);
    }
}
