//! Generic model engine shared by every App Store DTO.
//!
//! A model is a struct with a fixed, ordered set of named fields. Instead of
//! runtime reflection, each model carries an explicit field table generated by
//! the [`model!`](crate::model!) macro: wire name, accessor, and assignment for
//! every field. The [`Model`] trait builds the three behaviors on top of that
//! table:
//!
//! - **populate** from an untyped JSON map, touching only declared fields
//! - **`to_json`** with every field, nulls included, in declaration order
//! - **`to_query_string`** with nulls skipped and lists flattened to repeated keys
//!
//! # Examples
//!
//! ```
//! use appstore_server_api::{model, model::Model};
//! use serde_json::json;
//!
//! model! {
//!     /// A tiny model for illustration.
//!     pub struct Example {
//!         /// A string field.
//!         name: Option<String> => "name",
//!         /// A list field.
//!         tags: Vec<String> => "tags",
//!     }
//! }
//!
//! let example = Example::from_json(r#"{"name":"a","tags":["x","y"],"unknown":1}"#);
//! assert_eq!(example.name.as_deref(), Some("a"));
//! assert_eq!(example.to_json(), r#"{"name":"a","tags":["x","y"]}"#);
//! assert_eq!(example.to_query_string(), "name=a&tags=x&tags=y");
//! ```

mod field;
pub mod query;

pub use field::{FieldValue, ListItem};
use serde_json::{Map, Value};

use crate::error::{ClientError, Result};

#[doc(hidden)]
pub mod __private {
    pub use serde;
    pub use serde_json;
}

/// Common behavior of every wire-format object.
///
/// The trait is object safe so the dispatcher can take `&dyn Model` for query
/// parameters and request bodies. `Send + Sync` keeps the client's futures
/// `Send` while they hold such references. Constructors require
/// `Default + Sized`.
pub trait Model: Send + Sync {
    /// Returns every declared field with its current value, in declaration order.
    ///
    /// Absent values are reported as `Value::Null`.
    fn fields(&self) -> Vec<(&'static str, Value)>;

    /// Overwrites declared fields with the values found in `data`.
    ///
    /// A key present in `data` always replaces the field, `null` included.
    /// Fields without a key keep their value; keys that match no declared field
    /// are ignored. Lists of nested models are cleared and rebuilt row by row.
    fn populate(&mut self, data: &Map<String, Value>) -> &mut Self
    where
        Self: Sized;

    /// Returns the declared fields as a JSON object.
    fn to_map(&self) -> Map<String, Value> {
        self.fields()
            .into_iter()
            .map(|(name, value)| (name.to_owned(), value))
            .collect()
    }

    /// Serializes every declared field, nulls included, to a JSON object string.
    fn to_json(&self) -> String {
        Value::Object(self.to_map()).to_string()
    }

    /// Flattens the declared fields into a query string.
    ///
    /// See [`query::to_query_string`] for the exact encoding.
    fn to_query_string(&self) -> String {
        query::to_query_string(&self.fields())
    }

    /// Builds a model from an untyped map.
    fn from_map(data: &Map<String, Value>) -> Self
    where
        Self: Default + Sized,
    {
        let mut model = Self::default();
        model.populate(data);
        model
    }

    /// Builds a model from any JSON value; non-objects yield the default model.
    fn from_value(value: &Value) -> Self
    where
        Self: Default + Sized,
    {
        match value {
            Value::Object(data) => Self::from_map(data),
            _ => Self::default(),
        }
    }

    /// Builds a model from another model's declared fields.
    ///
    /// Fields are matched by wire name, so this converts between shapes that
    /// share a subset of fields.
    fn from_model(source: &dyn Model) -> Self
    where
        Self: Default + Sized,
    {
        Self::from_map(&source.to_map())
    }

    /// Builds a model from a JSON string.
    ///
    /// Lenient: input that is empty, not valid JSON, or not an object leaves
    /// every field at its default.
    fn from_json(source: &str) -> Self
    where
        Self: Default + Sized,
    {
        serde_json::from_str::<Value>(source)
            .map(|value| Self::from_value(&value))
            .unwrap_or_default()
    }

    /// Builds a model from a JSON string, rejecting malformed input.
    ///
    /// An empty or whitespace-only source still yields the default model.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ParseError`] if `source` is non-empty and not
    /// valid JSON.
    fn try_from_json(source: &str) -> Result<Self>
    where
        Self: Default + Sized,
    {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value =
            serde_json::from_str(source).map_err(|e| ClientError::ParseError(e.to_string()))?;
        Ok(Self::from_value(&value))
    }
}

/// Declares a model struct together with its field table.
///
/// Each field is written as `rust_name: Type => "wireName"`. Field types must
/// implement [`FieldValue`]: `Option<T>` for serde-compatible scalars and
/// nested models, `Vec<T>` for lists, `serde_json::Value` for opaque data.
///
/// The generated struct derives `Debug`, `Clone`, `Default` and `PartialEq`,
/// implements [`Model`], `serde::Serialize`/`Deserialize` through the field
/// table, and [`ListItem`] so it can be nested in lists of other models.
///
/// An optional trailing `after_populate = method;` names an inherent
/// `fn(&mut self)` that runs at the end of every populate.
#[macro_export]
macro_rules! model {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $ty:ty => $wire:literal
            ),* $(,)?
        }
        $(after_populate = $hook:ident;)?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field: $ty,
            )*
        }

        impl $crate::model::Model for $name {
            fn fields(
                &self,
            ) -> ::std::vec::Vec<(&'static str, $crate::model::__private::serde_json::Value)> {
                ::std::vec![
                    $( ($wire, $crate::model::FieldValue::to_field(&self.$field)), )*
                ]
            }

            #[allow(unused_variables)]
            fn populate(
                &mut self,
                data: &$crate::model::__private::serde_json::Map<
                    ::std::string::String,
                    $crate::model::__private::serde_json::Value,
                >,
            ) -> &mut Self
            where
                Self: Sized,
            {
                $(
                    $crate::model::FieldValue::reset(&mut self.$field);
                    if let ::std::option::Option::Some(value) = data.get($wire) {
                        self.$field = $crate::model::FieldValue::from_field(value);
                    }
                )*
                $( self.$hook(); )?
                self
            }
        }

        impl $crate::model::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::model::__private::serde::Serializer,
            {
                $crate::model::__private::serde::Serialize::serialize(
                    &$crate::model::Model::to_map(self),
                    serializer,
                )
            }
        }

        impl<'de> $crate::model::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::model::__private::serde::Deserializer<'de>,
            {
                let data = <$crate::model::__private::serde_json::Map<
                    ::std::string::String,
                    $crate::model::__private::serde_json::Value,
                > as $crate::model::__private::serde::Deserialize>::deserialize(deserializer)?;
                ::std::result::Result::Ok(<Self as $crate::model::Model>::from_map(&data))
            }
        }

        impl $crate::model::ListItem for $name {
            const NESTED: bool = true;

            fn from_item(
                value: &$crate::model::__private::serde_json::Value,
            ) -> ::std::option::Option<Self> {
                value
                    .as_object()
                    .map(<Self as $crate::model::Model>::from_map)
            }

            fn to_item(&self) -> $crate::model::__private::serde_json::Value {
                $crate::model::__private::serde_json::Value::Object(
                    $crate::model::Model::to_map(self),
                )
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    crate::model! {
        struct Defaults {
            prop1: Option<String> => "prop1",
            prop2: Option<String> => "prop2",
            prop3: Option<String> => "prop3",
        }
    }

    fn defaults() -> Defaults {
        Defaults {
            prop1: Some("value1".to_owned()),
            prop2: Some("value2".to_owned()),
            prop3: Some("value2".to_owned()),
        }
    }

    crate::model! {
        struct QueryShape {
            string_param: Option<String> => "stringParam",
            num_array: Vec<String> => "numArray",
            assoc_array: Value => "assocArray",
            nullable_param: Option<String> => "nullableParam",
            float_param: Option<f64> => "floatParam",
            true_param: Option<bool> => "trueParam",
            false_param: Option<bool> => "falseParam",
        }
    }

    crate::model! {
        struct Row {
            id: Option<String> => "id",
        }
    }

    crate::model! {
        struct Parent {
            rows: Vec<Row> => "rows",
            child: Option<Row> => "child",
            label: Option<String> => "label",
        }
    }

    #[test]
    fn test_populate_overwrites_only_present_keys() {
        let mut model = defaults();
        let data = json!({"prop2": "newValue", "prop3": null});
        model.populate(data.as_object().unwrap());

        assert_eq!(model.prop1.as_deref(), Some("value1"));
        assert_eq!(model.prop2.as_deref(), Some("newValue"));
        assert_eq!(model.prop3, None);
    }

    #[test]
    fn test_populate_ignores_unknown_keys() {
        let mut model = defaults();
        let data = json!({"prop4": "x"});
        model.populate(data.as_object().unwrap());
        assert_eq!(model, defaults());
    }

    #[test]
    fn test_to_json_includes_nulls_in_declaration_order() {
        let model = Defaults { prop1: None, ..defaults() };
        assert_eq!(model.to_json(), r#"{"prop1":null,"prop2":"value2","prop3":"value2"}"#);
    }

    #[test]
    fn test_to_query_string_shape() {
        let model = QueryShape {
            string_param: Some("value".to_owned()),
            num_array: vec!["first".to_owned(), "second".to_owned()],
            assoc_array: json!({"one": "value1", "two": "value2"}),
            nullable_param: None,
            float_param: Some(1.5),
            true_param: Some(true),
            false_param: Some(false),
        };

        assert_eq!(
            model.to_query_string(),
            "stringParam=value&numArray=first&numArray=second&assocArray=value1&assocArray=value2\
             &floatParam=1.5&trueParam=true&falseParam=false"
        );
    }

    #[test]
    fn test_from_json_invalid_keeps_defaults() {
        assert_eq!(Parent::from_json("{not json"), Parent::default());
        assert_eq!(Parent::from_json(""), Parent::default());
        assert_eq!(Parent::from_json("[1,2,3]"), Parent::default());
    }

    #[test]
    fn test_try_from_json_rejects_invalid() {
        let result = Parent::try_from_json("{not json");
        assert!(matches!(result, Err(ClientError::ParseError(_))));
        assert_eq!(Parent::try_from_json("  ").unwrap(), Parent::default());
    }

    #[test]
    fn test_nested_rows_are_rebuilt() {
        let mut parent = Parent::from_json(r#"{"rows":[{"id":"1"},{"id":"2"}],"label":"x"}"#);
        assert_eq!(parent.rows.len(), 2);
        assert_eq!(parent.rows[1].id.as_deref(), Some("2"));

        // Nested lists are rebuilt even when the key is absent.
        parent.populate(json!({"label": "y"}).as_object().unwrap());
        assert!(parent.rows.is_empty());
        assert_eq!(parent.label.as_deref(), Some("y"));
    }

    #[test]
    fn test_nested_rows_skip_non_objects() {
        let parent = Parent::from_json(r#"{"rows":[{"id":"1"},"junk",7]}"#);
        assert_eq!(parent.rows.len(), 1);
    }

    #[test]
    fn test_nested_object() {
        let parent = Parent::from_json(r#"{"child":{"id":"c","extra":true}}"#);
        assert_eq!(parent.child.unwrap().id.as_deref(), Some("c"));

        let parent = Parent::from_json(r#"{"child":"not an object"}"#);
        assert!(parent.child.is_none());
    }

    #[test]
    fn test_from_model_matches_by_wire_name() {
        let source = Parent {
            label: Some("l".to_owned()),
            ..Parent::default()
        };
        let copy = Parent::from_model(&source);
        assert_eq!(copy, source);
    }

    #[test]
    fn test_serde_roundtrip_through_field_table() {
        let parent = Parent::from_json(r#"{"rows":[{"id":"1"}],"child":null,"label":"x"}"#);
        let json = serde_json::to_string(&parent).unwrap();
        assert_eq!(json, r#"{"rows":[{"id":"1"}],"child":null,"label":"x"}"#);
        let back: Parent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, parent);
    }

    proptest! {
        #[test]
        fn prop_populate_touches_only_present_keys(
            initial in proptest::option::of("[a-z]{0,8}"),
            update in proptest::collection::btree_map(
                prop_oneof![Just("prop2"), Just("prop3"), Just("other")],
                proptest::option::of("[a-z]{0,8}"),
                0..3,
            ),
        ) {
            let mut model = Defaults { prop1: initial.clone(), ..defaults() };
            let data: Map<String, Value> = update
                .iter()
                .map(|(key, value)| ((*key).to_owned(), value.clone().map_or(Value::Null, Value::String)))
                .collect();

            model.populate(&data);

            prop_assert_eq!(&model.prop1, &initial);
            for (field, current, default) in [
                ("prop2", &model.prop2, defaults().prop2),
                ("prop3", &model.prop3, defaults().prop3),
            ] {
                match update.get(field) {
                    Some(value) => prop_assert_eq!(current, value),
                    None => prop_assert_eq!(current, &default),
                }
            }
        }
    }
}
