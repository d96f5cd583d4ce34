/// Builds a [`Value`](crate::Value) tree with JSON-like syntax.
///
/// Objects become tables and keep their key order. There is no `null`.
///
/// ```rust
/// use tomlette::{toml, Value};
///
/// let server = toml!({
///     "host": "localhost",
///     "ports": [8000, 8001],
///     "tls": { "enabled": false }
/// });
/// assert_eq!(server.get("host"), Some(&Value::from("localhost")));
/// ```
#[macro_export]
macro_rules! toml {
    (true) => {
        $crate::Value::Boolean(true)
    };

    (false) => {
        $crate::Value::Boolean(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::toml!($elem)),*])
    };

    ({}) => {
        $crate::Value::Table($crate::Table::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut table = $crate::Table::new();
        $(
            table.insert($key.to_string(), $crate::toml!($value));
        )*
        $crate::Value::Table(table)
    }};

    ($e:expr) => {
        $crate::Value::from($e)
    };
}
