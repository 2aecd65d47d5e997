//! The [`bof!`](crate::bof) macro for building [`Value`](crate::Value) trees inline.

/// Builds a [`Value`](crate::Value) from JSON-like syntax.
///
/// `null` is `Empty`, arrays are `List`, objects are `Map` with their keys in
/// source order. Anything else goes through [`to_value`](crate::to_value).
///
/// ```rust
/// use serde_bof::{bof, Value};
///
/// let value = bof!({"id": 7, "tags": ["a", null]});
/// assert_eq!(
///     value,
///     Value::Map(vec![
///         (Value::from("id"), Value::from(7)),
///         (Value::from("tags"), Value::List(vec![Value::from("a"), Value::Empty])),
///     ])
/// );
/// ```
#[macro_export]
macro_rules! bof {
    (null) => {
        $crate::Value::Empty
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::List(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::List(vec![$($crate::bof!($elem)),*])
    };

    ({}) => {
        $crate::Value::Map(vec![])
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {
        $crate::Value::Map(vec![
            $(
                ($crate::Value::from($key), $crate::bof!($value)),
            )*
        ])
    };

    // Any other expression
    ($s:expr) => {
        $crate::to_value(&$s).unwrap_or_default()
    };
}
