//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::types::{Item, MapValue};
use crate::NoSQLErrorCode;
use serde_derive::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::error::Error;
use std::result::Result;

#[test]
fn test_basic_mapvalue() -> Result<(), Box<dyn Error>> {
    let mut m = MapValue::new();
    m.put_bool("boolval", true);
    m.put_i64("i64val", 123456789);
    m.put_float64("floatval", 2345.5);
    m.put_str("strval", "This is a string value");
    m.put_array(
        "arrval",
        vec![json!("array element 1"), json!("array element 2"), json!(12121212)],
    );
    m.put_map("mapval", MapValue::new().i64("inner", 7));
    assert_eq!(m.len(), 6);
    assert_eq!(m.get_bool("boolval").ok_or("boolval doesn't exist")?, true);
    assert_eq!(
        m.get_i64("i64val").ok_or("i64val doesn't exist")?,
        123456789
    );
    assert!(m.get_float64("floatval").ok_or("floatval doesn't exist")? > 2345.0);
    assert_eq!(
        m.get_string("strval").ok_or("strval doesn't exist")?,
        "This is a string value"
    );
    let arr = m.get_array("arrval").ok_or("arrval doesn't exist")?;
    assert_eq!(arr.len(), 3);
    assert_eq!(arr[2].as_i64(), Some(12121212));
    let inner = m.get_map("mapval").ok_or("mapval doesn't exist")?;
    assert_eq!(inner.get_i64("inner"), Some(7));

    // wrong types read as absent
    assert_eq!(m.get_i64("strval"), None);
    assert_eq!(m.get_string("nonexistent"), None);

    assert_eq!(m.take_field_value("boolval"), Some(Value::Bool(true)));
    assert!(!m.contains("boolval"));
    Ok(())
}

#[test]
fn test_mapvalue_key() {
    let m = MapValue::new().str("key", "u1").str("name", "Ann");
    assert_eq!(m.key(), Some("u1"));
    let m = MapValue::new().i64("key", 5);
    assert_eq!(m.key(), None);
}

#[test]
fn test_mapvalue_display() {
    let m = MapValue::new().str("name", "Ann");
    assert_eq!(m.to_string(), r#"{"name":"Ann"}"#);
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct Person {
    key: String,
    name: String,
    age: i64,
    #[serde(default)]
    tags: Vec<String>,
}

#[test]
fn test_struct_conversion() -> Result<(), Box<dyn Error>> {
    let p = Person {
        key: "p1".to_string(),
        name: "Jane".to_string(),
        age: 30,
        tags: vec!["a".to_string()],
    };
    let m = MapValue::from_struct(&p)?;
    assert_eq!(m.key(), Some("p1"));
    assert_eq!(m.get_i64("age"), Some(30));
    let back: Person = m.to_struct()?;
    assert_eq!(back, p);

    // missing optional fields take their defaults
    let m = MapValue::new().str("key", "p2").str("name", "Joe").i64("age", 4);
    let p2: Person = m.to_struct()?;
    assert!(p2.tags.is_empty());

    // missing required fields fail
    let e = MapValue::new().str("key", "p3").to_struct::<Person>().unwrap_err();
    assert_eq!(e.code, NoSQLErrorCode::UnsupportedType);

    // non-object values cannot become maps
    let e = MapValue::from_struct(&vec![1, 2]).unwrap_err();
    assert_eq!(e.code, NoSQLErrorCode::UnsupportedType);
    Ok(())
}

#[test]
fn test_object_item_payload() -> Result<(), Box<dyn Error>> {
    let item = Item::from(MapValue::new().str("key", "old").str("name", "Ann"));
    // explicit key replaces the one in the map
    let p = item.clone().into_payload(Some("new"))?;
    assert_eq!(p.into_json(), json!({"key": "new", "name": "Ann"}));
    // no explicit key keeps the map as given
    let p = item.into_payload(None)?;
    assert_eq!(p.into_json(), json!({"key": "old", "name": "Ann"}));
    Ok(())
}

#[test]
fn test_scalar_and_list_items_are_wrapped() -> Result<(), Box<dyn Error>> {
    assert_eq!(
        Item::from("hello").into_payload(None)?.into_json(),
        json!({"value": "hello"})
    );
    assert_eq!(
        Item::from(42i64).into_payload(Some("n"))?.into_json(),
        json!({"value": 42, "key": "n"})
    );
    assert_eq!(
        Item::from(true).into_payload(None)?.into_json(),
        json!({"value": true})
    );
    assert_eq!(
        Item::from(vec![json!(1), json!("two")])
            .into_payload(None)?
            .into_json(),
        json!({"value": [1, "two"]})
    );
    Ok(())
}

#[test]
fn test_item_from_serialize() -> Result<(), Box<dyn Error>> {
    assert!(matches!(Item::from_serialize(&json!({"a": 1}))?, Item::Object(_)));
    assert!(matches!(Item::from_serialize(&vec![1, 2, 3])?, Item::List(_)));
    assert!(matches!(Item::from_serialize("text")?, Item::Scalar(_)));

    let e = Item::from_serialize(&Value::Null).unwrap_err();
    assert_eq!(e.code, NoSQLErrorCode::UnsupportedType);
    let none: Option<i32> = None;
    let e = Item::from_serialize(&none).unwrap_err();
    assert_eq!(e.code, NoSQLErrorCode::UnsupportedType);

    // a scalar variant built by hand must still hold a scalar
    let e = Item::Scalar(Value::Null).into_payload(None).unwrap_err();
    assert_eq!(e.code, NoSQLErrorCode::UnsupportedType);
    Ok(())
}
