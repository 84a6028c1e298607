use std::time::Duration;

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use httptape::entry::{Request, Response};
use httptape::storage::{load_entries, RecordingWriter, YamlCodec};
use httptape::Entry;
use tempfile::TempDir;

fn sample_entry(i: usize) -> Entry {
    let mut entry = Entry {
        request: Request {
            method: "POST".to_string(),
            url: format!("http://example.com/api/orders/{i}"),
            body: format!("{{\"order\": {i}, \"items\": [1, 2, 3]}}"),
            ..Request::default()
        },
        response: Response {
            status_code: 201,
            body: "{\"status\": \"created\"}\n".to_string(),
            ..Response::default()
        },
    };
    entry
        .request
        .headers
        .insert("Content-Type".to_string(), "application/json".to_string());
    entry
        .response
        .headers
        .insert("Content-Type".to_string(), "application/json".to_string());
    entry
}

fn bench_write_performance(c: &mut Criterion) {
    c.bench_function("write_100_entries", |b| {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("write.yml");

        b.iter(|| {
            let mut writer = RecordingWriter::new(path.clone());
            for i in 0..100 {
                writer
                    .append(
                        black_box(&sample_entry(i)),
                        Utc::now(),
                        Duration::from_millis(12),
                        &YamlCodec,
                    )
                    .unwrap();
            }
        });
    });
}

fn bench_load_performance(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("load.yml");

    // Setup: write 500 entries
    let mut writer = RecordingWriter::new(path.clone());
    for i in 0..500 {
        writer
            .append(&sample_entry(i), Utc::now(), Duration::from_millis(12), &YamlCodec)
            .unwrap();
    }

    c.bench_function("load_500_entries", |b| {
        b.iter(|| {
            let entries = load_entries(black_box(&path), &YamlCodec).unwrap();
            assert_eq!(entries.len(), 500);
        });
    });
}

criterion_group!(benches, bench_write_performance, bench_load_performance);
criterion_main!(benches);
