use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::Serialize;
use tomlette::{from_str, to_string, Table, Value};

#[derive(Serialize, Clone)]
struct Server {
    name: String,
    ip: String,
    ports: Vec<u16>,
    enabled: bool,
    weight: f64,
}

#[derive(Serialize, Clone)]
struct Cluster {
    title: String,
    servers: Vec<Server>,
}

fn cluster(size: usize) -> Cluster {
    Cluster {
        title: "bench".to_string(),
        servers: (0..size)
            .map(|i| Server {
                name: format!("node-{i}"),
                ip: format!("10.0.{}.{}", i / 256, i % 256),
                ports: vec![8000, 8001, 8002],
                enabled: i % 2 == 0,
                weight: i as f64 / 10.0,
            })
            .collect(),
    }
}

const CONFIG: &str = r#"
title = "TOML Example"

[owner]
name = "Tom Preston-Werner"
dob = 1979-05-27T07:32:00-08:00

[database]
server = "192.168.1.1"
ports = [ 8001, 8001, 8002 ]
connection_max = 5000
enabled = true

[servers.alpha]
ip = "10.0.0.1"
dc = "eqdc10"

[servers.beta]
ip = "10.0.0.2"
dc = "eqdc10"

[clients]
data = [ ["gamma", "delta"], [1, 2] ]
hosts = [
  "alpha",
  "omega",
]
point = { x = 1, y = 2 }
"#;

fn benchmark_parse_config(c: &mut Criterion) {
    c.bench_function("parse_config", |b| b.iter(|| from_str(black_box(CONFIG))));
}

fn benchmark_write_config(c: &mut Criterion) {
    let table = from_str(CONFIG).unwrap();
    c.bench_function("write_config", |b| b.iter(|| to_string(black_box(&table))));
}

fn benchmark_table_arrays(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_arrays");

    for size in [10, 100, 1000].iter() {
        let data = cluster(*size);
        let text = to_string(&data).unwrap();

        group.bench_with_input(BenchmarkId::new("write", size), &data, |b, data| {
            b.iter(|| to_string(black_box(data)))
        });
        group.bench_with_input(BenchmarkId::new("parse", size), &text, |b, text| {
            b.iter(|| from_str(black_box(text)))
        });
    }
    group.finish();
}

fn benchmark_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("strings");

    let escaped = format!("s = \"{}\"\n", "tab\\t quote\\\" \\u00e9 ".repeat(50));
    let multiline = format!("s = \"\"\"\n{}\"\"\"\n", "a line of text\n".repeat(50));
    group.bench_function("parse_escaped", |b| b.iter(|| from_str(black_box(&escaped))));
    group.bench_function("parse_multiline", |b| b.iter(|| from_str(black_box(&multiline))));

    let mut table = Table::new();
    table.insert("s".to_string(), Value::from("line one\nline \"two\"\n".repeat(50)));
    group.bench_function("write_multiline", |b| b.iter(|| to_string(black_box(&table))));
    group.finish();
}

fn benchmark_diagnostics(c: &mut Criterion) {
    let broken: String = (0..200).map(|i| format!("key{} = ?\n[t]\n", i % 5)).collect();
    c.bench_function("collect_diagnostics", |b| b.iter(|| from_str(black_box(&broken))));
}

criterion_group!(
    benches,
    benchmark_parse_config,
    benchmark_write_config,
    benchmark_table_arrays,
    benchmark_strings,
    benchmark_diagnostics
);
criterion_main!(benches);
