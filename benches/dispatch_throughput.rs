/// Dispatch Throughput Benchmarks
///
/// Measures records per second through the engine with the built-in rule
/// set: deep timeline trees, resource lifecycles, and full JSON replay.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hintlet::config::HintletConfig;
use hintlet::engine::HintletEngine;
use hintlet::hint::Hint;
use hintlet::record::Record;
use hintlet::record_type::RecordType;
use hintlet::replay::replay;
use hintlet::rules::register_builtin_rules;
use std::io::Cursor;
use std::time::Duration;

fn engine() -> HintletEngine<Vec<Hint>> {
    let mut engine = HintletEngine::new(Vec::<Hint>::new());
    register_builtin_rules(&mut engine, &HintletConfig::default());
    engine
}

/// Timer callback that lays out `layouts` times
fn timer_with_layouts(layouts: usize) -> Record {
    let children = (0..layouts)
        .map(|i| Record::new(RecordType::Layout, i as f64 * 5.0).with_duration(4.0))
        .collect();
    Record::new(RecordType::TimerFired, 0.0)
        .with_duration(layouts as f64 * 5.0 + 10.0)
        .with_children(children)
}

/// JSON-lines trace with `resources` complete resource lifecycles
fn resource_trace(resources: usize) -> String {
    let mut lines = Vec::with_capacity(resources * 3);
    for id in 0..resources {
        lines.push(format!(
            r#"{{"type": 2147483645, "time": {t}, "data": {{"identifier": {id}, "url": "http://cdn.example.com/asset{id}.js", "didRequestChange": true}}}}"#,
            t = id
        ));
        lines.push(format!(
            r#"{{"type": 2147483645, "time": {t}, "data": {{"identifier": {id}, "responseHeaders": {{"Content-Type": "text/javascript", "Date": "Thu, 14 Jul 2011 21:07:34 GMT", "Cache-Control": "max-age=3600"}}, "statusCode": 200, "contentLength": 20000, "didResponseChange": true, "didLengthChange": true}}}}"#,
            t = id
        ));
        lines.push(format!(
            r#"{{"type": 14, "time": {t}, "data": {{"identifier": {id}}}}}"#,
            t = id as f64 + 0.5
        ));
    }
    lines.join("\n")
}

/// Benchmark: timeline records with nested layouts
fn bench_timeline_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("timeline_dispatch");
    group.measurement_time(Duration::from_secs(5));

    for layouts in [0usize, 10, 100] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::from_parameter(layouts),
            &layouts,
            |b, &layouts| {
                let mut engine = engine();
                let record = timer_with_layouts(layouts);
                b.iter(|| {
                    let mut record = record.clone();
                    black_box(engine.dispatch(&mut record));
                });
            },
        );
    }

    group.finish();
}

/// Benchmark: JSON replay of resource lifecycles
fn bench_resource_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("resource_replay");
    group.measurement_time(Duration::from_secs(5));

    for resources in [10usize, 100, 1000] {
        let trace = resource_trace(resources);
        group.throughput(Throughput::Elements((resources * 3) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(resources),
            &trace,
            |b, trace| {
                b.iter(|| {
                    let mut engine = engine();
                    black_box(replay(Cursor::new(trace.as_bytes()), &mut engine).unwrap());
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_timeline_dispatch, bench_resource_replay);
criterion_main!(benches);
