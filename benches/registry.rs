use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use garden_client::models::{GardenSystem, Reading};
use garden_client::protocol::{apply_event, ProtocolMessage, ServerEvent, UPDATE_MESSAGE};
use garden_client::registry::SystemRegistry;
use std::hint::black_box;

fn system_id(index: usize) -> String {
    format!("{:012x}", index)
}

fn populated_registry(size: usize) -> SystemRegistry {
    let mut registry = SystemRegistry::new();
    registry.initialize((0..size).map(|i| GardenSystem::new(system_id(i))).collect());
    registry
}

fn bench_apply_update_replace(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_update_replace");

    for size in [10, 100, 500] {
        let mut registry = populated_registry(size);
        let mut update = GardenSystem::new(system_id(size - 1));
        update.last_reading = Some(Reading::new(update.id.clone(), 21.5, 40.0));

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| registry.apply_update(black_box(update.clone())));
        });
    }

    group.finish();
}

fn bench_apply_update_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_update_append");

    for size in [10, 100, 500] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_batched(
                || populated_registry(size),
                |mut registry| registry.apply_update(GardenSystem::new("ffffffffff00")),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_parse_and_apply(c: &mut Criterion) {
    let mut registry = populated_registry(100);
    let text = ProtocolMessage::new(UPDATE_MESSAGE, GardenSystem::new(system_id(50)))
        .to_json()
        .unwrap();

    c.bench_function("parse_and_apply_update", |b| {
        b.iter(|| {
            let event = ServerEvent::parse(black_box(&text)).unwrap();
            apply_event(&mut registry, event)
        });
    });
}

criterion_group!(
    benches,
    bench_apply_update_replace,
    bench_apply_update_append,
    bench_parse_and_apply
);
criterion_main!(benches);
