//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Value types used to describe items stored in a collection.
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::result::Result;

use crate::error::NoSQLError;
use crate::error::NoSQLErrorCode::UnsupportedType;

/// Name of the field holding an item's unique key.
pub const KEY_FIELD: &str = "key";

/// Name of the field used to wrap non-map items.
pub const VALUE_FIELD: &str = "value";

/// Name of the reserved field holding an item's expiration time, as a unix timestamp.
pub const EXPIRES_FIELD: &str = "__expires";

/// Struct representing a single item (record) in a collection.
///
/// This struct is a map of `String` field names to JSON values. It is the primary
/// struct for specifying and receiving item data:
/// ```
/// use deta_base_rust_sdk::types::MapValue;
/// let user = MapValue::new()
///     .str("name", "Ann")
///     .i64("age", 34)
///     .column("tags", vec!["admin", "ops"]);
/// assert_eq!(user.get_string("name"), Some("Ann".to_string()));
/// ```
#[derive(Default, Debug, Clone, PartialEq)]
pub struct MapValue {
    pub(crate) m: Map<String, Value>,
}

impl MapValue {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn from_json_map(json: Map<String, Value>) -> Self {
        MapValue { m: json }
    }

    /// Create a `MapValue` from a JSON value. The value must be an object.
    pub fn from_json_object(json: Value) -> Result<Self, NoSQLError> {
        if let Value::Object(o) = json {
            return Ok(Self::from_json_map(o));
        }
        Err(NoSQLError::new(
            UnsupportedType,
            &format!("json value is not an object: {}", json),
        ))
    }

    /// Create a `MapValue` from any struct that serializes to a JSON object.
    pub fn from_struct<T: Serialize + ?Sized>(value: &T) -> Result<Self, NoSQLError> {
        match serde_json::to_value(value) {
            Ok(v) => Self::from_json_object(v),
            Err(e) => Err(NoSQLError::new(
                UnsupportedType,
                &format!("could not convert struct to MapValue: {}", e),
            )),
        }
    }

    /// Populate a native struct from the fields of this `MapValue`.
    pub fn to_struct<T: DeserializeOwned>(&self) -> Result<T, NoSQLError> {
        match serde_json::from_value(Value::Object(self.m.clone())) {
            Ok(t) => Ok(t),
            Err(e) => Err(NoSQLError::new(
                UnsupportedType,
                &format!("could not convert MapValue to native struct: {}", e),
            )),
        }
    }

    pub fn into_json(self) -> Value {
        Value::Object(self.m)
    }

    pub fn as_json_map(&self) -> &Map<String, Value> {
        &self.m
    }

    pub fn len(&self) -> usize {
        self.m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.m.is_empty()
    }

    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.m.iter()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.m.contains_key(key)
    }

    /// Get the item key, if this map has a string `key` field.
    pub fn key(&self) -> Option<&str> {
        self.m.get(KEY_FIELD)?.as_str()
    }

    pub fn put(&mut self, key: &str, val: impl Into<Value>) {
        self.m.insert(key.to_string(), val.into());
    }

    pub fn column(mut self, key: &str, val: impl Into<Value>) -> MapValue {
        self.put(key, val);
        self
    }

    pub fn put_i64(&mut self, key: &str, val: i64) {
        self.put(key, val);
    }
    pub fn i64(mut self, key: &str, val: i64) -> MapValue {
        self.put_i64(key, val);
        self
    }
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.m.get(key)?.as_i64()
    }

    pub fn put_float64(&mut self, key: &str, val: f64) {
        self.put(key, val);
    }
    pub fn f64(mut self, key: &str, val: f64) -> MapValue {
        self.put_float64(key, val);
        self
    }
    pub fn get_float64(&self, key: &str) -> Option<f64> {
        self.m.get(key)?.as_f64()
    }

    pub fn put_str(&mut self, key: &str, val: &str) {
        self.put(key, val);
    }
    pub fn str(mut self, key: &str, val: &str) -> MapValue {
        self.put_str(key, val);
        self
    }
    pub fn get_string(&self, key: &str) -> Option<String> {
        Some(self.m.get(key)?.as_str()?.to_string())
    }

    pub fn put_bool(&mut self, key: &str, val: bool) {
        self.put(key, val);
    }
    pub fn bool(mut self, key: &str, val: bool) -> MapValue {
        self.put_bool(key, val);
        self
    }
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.m.get(key)?.as_bool()
    }

    pub fn put_array(&mut self, key: &str, val: Vec<Value>) {
        self.put(key, val);
    }
    pub fn get_array(&self, key: &str) -> Option<&Vec<Value>> {
        self.m.get(key)?.as_array()
    }

    pub fn put_map(&mut self, key: &str, val: MapValue) {
        self.m.insert(key.to_string(), Value::Object(val.m));
    }
    pub fn get_map(&self, key: &str) -> Option<MapValue> {
        Some(MapValue::from_json_map(self.m.get(key)?.as_object()?.clone()))
    }

    pub fn get_field_value(&self, key: &str) -> Option<&Value> {
        self.m.get(key)
    }
    pub fn take_field_value(&mut self, key: &str) -> Option<Value> {
        self.m.remove(key)
    }
}

impl std::fmt::Display for MapValue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", Value::Object(self.m.clone()))
    }
}

impl From<MapValue> for Value {
    fn from(mv: MapValue) -> Value {
        mv.into_json()
    }
}

impl From<Map<String, Value>> for MapValue {
    fn from(m: Map<String, Value>) -> MapValue {
        MapValue { m }
    }
}

/// An item value to be stored in a collection.
///
/// Maps are stored as-is. Any other accepted value is wrapped into a map with a
/// single `value` field before it is sent:
/// ```
/// use deta_base_rust_sdk::types::Item;
/// let payload = Item::from("hello").into_payload(Some("greeting")).unwrap();
/// assert_eq!(payload.get_string("value"), Some("hello".to_string()));
/// assert_eq!(payload.key(), Some("greeting"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Object(MapValue),
    /// A string, number or boolean.
    Scalar(Value),
    List(Vec<Value>),
}

impl Item {
    /// Create an item from any value that can be serialized to JSON.
    ///
    /// Returns an [`UnsupportedType`](crate::NoSQLErrorCode::UnsupportedType) error if
    /// the value serializes to `null` or cannot be serialized.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Item, NoSQLError> {
        match serde_json::to_value(value) {
            Ok(v) => Item::try_from(v),
            Err(e) => Err(NoSQLError::new(
                UnsupportedType,
                &format!("item cannot be converted to json: {}", e),
            )),
        }
    }

    /// Resolve this item into the map that is sent to the service.
    ///
    /// If `key` is given, it is set as the `key` field of the payload, replacing any
    /// key already present in an object item.
    pub fn into_payload(self, key: Option<&str>) -> Result<MapValue, NoSQLError> {
        let mut payload = match self {
            Item::Object(mv) => mv,
            Item::Scalar(v) => {
                if v.is_null() || v.is_object() || v.is_array() {
                    return Err(NoSQLError::new(
                        UnsupportedType,
                        &format!("not a scalar item value: {}", v),
                    ));
                }
                MapValue::new().column(VALUE_FIELD, v)
            }
            Item::List(l) => MapValue::new().column(VALUE_FIELD, l),
        };
        if let Some(k) = key {
            payload.put_str(KEY_FIELD, k);
        }
        Ok(payload)
    }
}

impl TryFrom<Value> for Item {
    type Error = NoSQLError;

    fn try_from(v: Value) -> Result<Item, NoSQLError> {
        match v {
            Value::Object(o) => Ok(Item::Object(MapValue::from_json_map(o))),
            Value::Array(a) => Ok(Item::List(a)),
            Value::Null => Err(NoSQLError::new(
                UnsupportedType,
                "null is not a supported item value",
            )),
            scalar => Ok(Item::Scalar(scalar)),
        }
    }
}

impl From<MapValue> for Item {
    fn from(mv: MapValue) -> Item {
        Item::Object(mv)
    }
}

impl From<Vec<Value>> for Item {
    fn from(l: Vec<Value>) -> Item {
        Item::List(l)
    }
}

macro_rules! scalar_item {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Item {
                fn from(v: $t) -> Item {
                    Item::Scalar(Value::from(v))
                }
            }
        )*
    };
}

scalar_item!(&str, String, i32, i64, u32, u64, f64, bool);
