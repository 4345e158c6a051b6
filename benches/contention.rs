//! Throughput benchmarks for the task queue and the resource pool.

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use mendpool::{PoolConfig, Repairable, ResourcePool, TaskQueue};

const OPS: u64 = 1_000;

struct Buf(#[allow(dead_code)] Vec<u8>);

impl Repairable for Buf {
    fn repair(&mut self) -> bool {
        true
    }
}

fn queue_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("task_queue");
    group.throughput(Throughput::Elements(OPS));
    group.bench_function("push_pop", |b| {
        let queue = TaskQueue::new();
        b.iter(|| {
            for i in 0..OPS {
                queue.push(i);
            }
            for _ in 0..OPS {
                black_box(queue.try_pop());
            }
        });
    });
    group.finish();
}

fn pool_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("resource_pool");
    group.throughput(Throughput::Elements(OPS));
    group.bench_function("acquire_release", |b| {
        let pool = ResourcePool::with_config(PoolConfig::new().with_auto_repair(false));
        for _ in 0..16 {
            pool.add(Buf(vec![0u8; 1024]));
        }
        b.iter(|| {
            for _ in 0..OPS {
                black_box(pool.acquire(None));
            }
        });
    });
    group.finish();
}

criterion_group!(benches, queue_throughput, pool_throughput);
criterion_main!(benches);
