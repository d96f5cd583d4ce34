use serde::Serialize;
use tomlette::{
    from_reader, from_str, to_string, to_string_with_options, to_value, toml, DatePolicy, Error,
    Table, Value, WriterOptions,
};

#[derive(Serialize)]
struct Owner {
    name: String,
    admin: bool,
}

#[derive(Serialize)]
struct Product {
    sku: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize)]
struct Inventory {
    title: String,
    owner: Owner,
    products: Vec<Product>,
}

const EXAMPLE: &str = r#"
# This is a TOML document.

title = "TOML Example"

[owner]
name = "Tom Preston-Werner"
dob = 1979-05-27T07:32:00-08:00 # First class dates

[database]
server = "192.168.1.1"
ports = [ 8001, 8001, 8002 ]
connection_max = 5000
enabled = true

[servers]

  # Indentation (tabs and/or spaces) is allowed but not required
  [servers.alpha]
  ip = "10.0.0.1"
  dc = "eqdc10"

  [servers.beta]
  ip = "10.0.0.2"
  dc = "eqdc10"

[clients]
data = [ ["gamma", "delta"], [1, 2] ]

# Line breaks are OK when inside arrays
hosts = [
  "alpha",
  "omega"
]
"#;

fn table(value: &Value) -> &Table {
    value.as_table().expect("expected a table")
}

fn at<'a>(table: &'a Table, key: &str) -> &'a Value {
    table.get(key).unwrap_or_else(|| panic!("missing key {key}"))
}

#[test]
fn test_example_document() {
    let doc = from_str(EXAMPLE).unwrap();
    let keys: Vec<_> = doc.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["title", "owner", "database", "servers", "clients"]);

    let owner = table(at(&doc, "owner"));
    let dob = at(owner, "dob").as_datetime().unwrap();
    assert_eq!(dob.to_rfc3339(), "1979-05-27T07:32:00-08:00");

    let database = table(at(&doc, "database"));
    assert_eq!(
        at(database, "ports"),
        &Value::Array(vec![Value::from(8001), Value::from(8001), Value::from(8002)])
    );
    assert_eq!(at(database, "enabled"), &Value::Boolean(true));

    let servers = table(at(&doc, "servers"));
    assert_eq!(servers.len(), 2);
    assert_eq!(at(servers, "beta").get("ip"), Some(&Value::from("10.0.0.2")));

    let clients = table(at(&doc, "clients"));
    let data = at(clients, "data").as_array().unwrap();
    assert_eq!(data[1], Value::Array(vec![Value::from(1), Value::from(2)]));
    assert_eq!(at(clients, "hosts").as_array().map(Vec::len), Some(2));
}

#[test]
fn test_strings() {
    let doc = from_str(concat!(
        "basic = \"I'm a string. \\\"You can quote me\\\". Tab\\t\\u00E9\"\n",
        "literal = 'C:\\Users\\nodejs\\templates'\n",
        "multi = \"\"\"\nRoses are red\nViolets are blue\"\"\"\n",
        "folded = \"\"\"\\\n    The quick brown \\\n    fox.\"\"\"\n",
        "raw = '''\nfirst line\n  \\n is not an escape\n'''\n",
    ))
    .unwrap();

    assert_eq!(
        at(&doc, "basic").as_str(),
        Some("I'm a string. \"You can quote me\". Tab\t\u{e9}")
    );
    assert_eq!(at(&doc, "literal").as_str(), Some("C:\\Users\\nodejs\\templates"));
    assert_eq!(at(&doc, "multi").as_str(), Some("Roses are red\nViolets are blue"));
    assert_eq!(at(&doc, "folded").as_str(), Some("The quick brown fox."));
    assert_eq!(at(&doc, "raw").as_str(), Some("first line\n  \\n is not an escape\n"));
}

#[test]
fn test_numbers_and_booleans() {
    let doc = from_str(
        "a = +99\nb = -17\nc = 1_000\nd = 0xff\ne = 0o17\nf = 0b11\n\
         g = 3.1415\nh = -0.01\ni = 5e+22\nj = inf\nk = -inf\nl = false\n",
    )
    .unwrap();

    let ints: Vec<_> = ["a", "b", "c", "d", "e", "f"]
        .iter()
        .map(|k| at(&doc, k).as_integer())
        .collect();
    assert_eq!(
        ints,
        vec![Some(99), Some(-17), Some(1000), Some(255), Some(15), Some(3)]
    );
    assert_eq!(at(&doc, "g").as_float(), Some(3.1415));
    assert_eq!(at(&doc, "i").as_float(), Some(5e22));
    assert_eq!(at(&doc, "k").as_float(), Some(f64::NEG_INFINITY));
    assert_eq!(at(&doc, "l").as_bool(), Some(false));
}

#[test]
fn test_table_arrays_nest() {
    let doc = from_str(
        r#"
[[fruit]]
  name = "apple"

  [fruit.physical]
    color = "red"

  [[fruit.variety]]
    name = "red delicious"

  [[fruit.variety]]
    name = "granny smith"

[[fruit]]
  name = "banana"

  [[fruit.variety]]
    name = "plantain"
"#,
    )
    .unwrap();

    let fruit = at(&doc, "fruit").as_array().unwrap();
    assert_eq!(fruit.len(), 2);
    assert!(at(&doc, "fruit").is_table_array());
    assert_eq!(
        fruit[0].get("physical").and_then(|p| p.get("color")),
        Some(&Value::from("red"))
    );
    assert_eq!(fruit[0].get("variety").and_then(Value::as_array).map(Vec::len), Some(2));
    assert_eq!(fruit[1].get("variety").and_then(Value::as_array).map(Vec::len), Some(1));
}

#[test]
fn test_inline_and_dotted_tables() {
    let inline = from_str("point = { x = 1, y = 2 }\nname = { first = \"Tom\", last = \"P\" }").unwrap();
    let block = from_str("[point]\nx = 1\ny = 2\n[name]\nfirst = \"Tom\"\nlast = \"P\"").unwrap();
    assert_eq!(inline, block);

    let dotted = from_str("point.x = 1\npoint.y = 2\nname.first = \"Tom\"\nname.last = \"P\"").unwrap();
    assert_eq!(dotted, block);
}

#[test]
fn test_quoted_keys_and_headers() {
    let doc = from_str("\"key with spaces\" = 1\n'quoted \"value\"' = 2\n[a.\"b.c\"]\nd = 3").unwrap();
    assert_eq!(at(&doc, "key with spaces"), &Value::from(1));
    assert_eq!(at(&doc, "quoted \"value\""), &Value::from(2));
    assert_eq!(at(&doc, "a").get("b.c").and_then(|t| t.get("d")), Some(&Value::from(3)));
}

#[test]
fn test_from_reader() {
    let doc = from_reader(EXAMPLE.as_bytes()).unwrap();
    assert_eq!(doc, from_str(EXAMPLE).unwrap());
}

#[test]
fn test_serialize_struct_layout() {
    let inventory = Inventory {
        title: "Stock".to_string(),
        owner: Owner {
            name: "Tom".to_string(),
            admin: true,
        },
        products: vec![
            Product {
                sku: "A-1".to_string(),
                price: 9.5,
                quantity: 3,
            },
            Product {
                sku: "B-2".to_string(),
                price: 14.0,
                quantity: 0,
            },
        ],
    };

    let expected = "\
title = \"Stock\"

[owner]
name = \"Tom\"
admin = true

[[products]]
sku = \"A-1\"
price = 9.5
quantity = 3

[[products]]
sku = \"B-2\"
price = 14.0
quantity = 0
";
    assert_eq!(to_string(&inventory).unwrap(), expected);
}

#[test]
fn test_serialize_quotes_keys_that_need_it() {
    let doc = toml!({ "a-b": 1, "weird key": 2, "": 3 });
    assert_eq!(to_string(&doc).unwrap(), "a-b = 1\n\"weird key\" = 2\n\"\" = 3\n");
}

#[test]
fn test_serialize_empty_tables_keep_headers() {
    let doc = toml!({ "a": {}, "b": { "c": {} } });
    let text = to_string(&doc).unwrap();
    assert_eq!(text, "[a]\n\n[b.c]\n");
    assert_eq!(Value::Table(from_str(&text).unwrap()), doc);
}

#[test]
fn test_serialize_tables_inside_arrays_inline() {
    let doc = toml!({ "grid": [[{ "x": 1 }, { "x": 2 }], [{ "x": 3 }]] });
    let text = to_string(&doc).unwrap();
    assert_eq!(text, "grid = [[{ x = 1 }, { x = 2 }], [{ x = 3 }]]\n");
    assert_eq!(Value::Table(from_str(&text).unwrap()), doc);
}

#[test]
fn test_serialize_refuses_heterogeneous_arrays() {
    let doc = toml!({ "server": { "mixed": [1, "two"] } });
    match to_string(&doc) {
        Err(Error::HeterogeneousArray { path, first, found }) => {
            assert_eq!(path, "server.mixed");
            assert_eq!((first, found), ("integer", "string"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_serialize_with_options() {
    let doc = toml!({ "a": { "list": [1, 2], "b": { "flag": true } } });
    let options = WriterOptions::new()
        .with_indent_values_by(2)
        .with_indent_tables_by(1)
        .with_pad_array_delimiters_by(1);
    assert_eq!(
        to_string_with_options(&doc, options).unwrap(),
        "[a]\n  list = [ 1, 2 ]\n\n [a.b]\n   flag = true\n"
    );
}

#[test]
fn test_serialize_dates_through_policy() {
    let doc = from_str("when = 1979-05-27T00:32:00.250-07:00").unwrap();

    assert_eq!(to_string(&doc).unwrap(), "when = 1979-05-27T07:32:00.250Z\n");

    let policy = DatePolicy::new()
        .with_time_zone(chrono::FixedOffset::east_opt(3600).unwrap())
        .with_fractional_seconds(false);
    let options = WriterOptions::new().with_date_policy(policy);
    assert_eq!(
        to_string_with_options(&doc, options).unwrap(),
        "when = 1979-05-27T08:32:00+01:00\n"
    );
}

#[test]
fn test_to_value_skips_none_fields() {
    #[derive(Serialize)]
    struct Partial {
        present: i32,
        missing: Option<i32>,
    }

    let value = to_value(&Partial {
        present: 1,
        missing: None,
    })
    .unwrap();
    assert_eq!(value, toml!({ "present": 1 }));
    assert_eq!(to_string(&value).unwrap(), "present = 1\n");
}

#[test]
fn test_value_serializes_to_json() {
    let doc = from_str("name = \"x\"\nwhen = 1979-05-27T07:32:00Z\n[t]\nlist = [1, 2]").unwrap();
    let json = serde_json::to_string(&doc).unwrap();
    assert_eq!(
        json,
        r#"{"name":"x","when":"1979-05-27T07:32:00+00:00","t":{"list":[1,2]}}"#
    );
}
