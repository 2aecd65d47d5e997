use serde_bof::{bof, decode, encode, Kind, Value};

#[test]
fn test_bof_macro_empty() {
    let value = bof!(null);
    assert_eq!(value, Value::Empty);
    assert!(value.is_empty());
}

#[test]
fn test_bof_macro_booleans() {
    assert_eq!(bof!(true), Value::Bool(true));
    assert_eq!(bof!(false), Value::Bool(false));
}

#[test]
fn test_bof_macro_numbers() {
    assert_eq!(bof!(42), Value::from(42));
    assert_eq!(bof!(3.5), Value::Real(3.5));
    assert_eq!(bof!(-123), Value::from(-123));
    assert_eq!(bof!(u128::MAX), Value::from(u128::MAX));
}

#[test]
fn test_bof_macro_strings() {
    assert_eq!(bof!("hello world"), Value::Utf8("hello world".to_string()));
    assert_eq!(bof!(""), Value::Utf8(String::new()));
}

#[test]
fn test_bof_macro_lists() {
    assert_eq!(bof!([]), Value::List(vec![]));
    assert_eq!(
        bof!([1, "hello", true, null]),
        Value::List(vec![
            Value::from(1),
            Value::from("hello"),
            Value::Bool(true),
            Value::Empty,
        ])
    );
}

#[test]
fn test_bof_macro_maps() {
    assert_eq!(bof!({}), Value::Map(vec![]));

    let map = bof!({
        "name": "Alice",
        "age": 30
    });
    let merged = map.to_merged_map().unwrap();
    assert_eq!(merged.len(), 2);
    assert_eq!(merged.get("name"), Some(&Value::from("Alice")));
    assert_eq!(merged.get("age"), Some(&Value::from(30)));
}

#[test]
fn test_bof_macro_nested() {
    let nested = bof!({
        "user": {
            "id": 123,
            "name": "Bob",
            "active": true
        },
        "tags": ["admin", "developer"],
        "count": 42
    });

    let merged = nested.to_merged_map().unwrap();
    assert_eq!(merged.len(), 3);

    let user = merged.get("user").unwrap().to_merged_map().unwrap();
    assert_eq!(user.get("id"), Some(&Value::from(123)));
    assert_eq!(user.get("name"), Some(&Value::from("Bob")));
    assert_eq!(user.get("active"), Some(&Value::Bool(true)));

    let tags = merged.get("tags").and_then(Value::as_list).unwrap();
    assert_eq!(tags, &[Value::from("admin"), Value::from("developer")]);

    assert_eq!(decode(&encode(&nested).unwrap()).unwrap(), nested);
}

#[test]
fn test_bof_macro_expressions() {
    let tags = vec!["a", "b"];
    assert_eq!(
        bof!(tags),
        Value::List(vec![Value::from("a"), Value::from("b")])
    );
    assert_eq!(bof!(Some(1.5)), Value::Real(1.5));
    assert_eq!(bof!(None::<i32>), Value::Empty);
}

#[test]
fn test_value_methods() {
    let empty = bof!(null);
    assert!(empty.is_empty());
    assert!(!empty.is_bool());
    assert!(!empty.is_integer());
    assert!(!empty.is_string());
    assert!(!empty.is_list());
    assert!(!empty.is_map());
    assert_eq!(empty.kind(), Kind::Empty);

    let flag = bof!(true);
    assert_eq!(flag.as_bool(), Some(true));

    let text = bof!("hello");
    assert_eq!(text.as_str(), Some("hello"));

    let list = bof!([1, 2, 3]);
    assert!(list.is_list());
    assert_eq!(list.as_list().unwrap().len(), 3);
    assert_eq!(list.as_list().unwrap()[2].as_i64(), Some(3));

    let map = bof!({"key": "value"});
    assert!(map.is_map());
    assert_eq!(map.as_entries().unwrap().len(), 1);
}
