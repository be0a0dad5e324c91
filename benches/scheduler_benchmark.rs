/*!
 * Scheduler Benchmarks
 *
 * Round-robin throughput with and without resource contention
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use procsim_kernel::{Instruction, LoadedModel, Scheduler, SchedulerConfig};

fn contended_model(processes: usize, rounds: usize) -> LoadedModel {
    let mut builder = LoadedModel::builder()
        .with_resources("R", 2)
        .with_resource("S")
        .with_mailbox("M");
    for i in 0..processes {
        let mut stream = Vec::with_capacity(rounds * 5);
        for _ in 0..rounds {
            stream.push(Instruction::request("R"));
            stream.push(Instruction::request("S"));
            stream.push(Instruction::send("M", format!("from-{}", i)));
            stream.push(Instruction::release("S"));
            stream.push(Instruction::release("R"));
        }
        builder = builder.with_process(format!("P{}", i), stream);
    }
    builder.build().unwrap_or_default()
}

fn mailbox_model(processes: usize, rounds: usize) -> LoadedModel {
    let mut builder = LoadedModel::builder().with_mailbox("M");
    for i in 0..processes {
        let stream = (0..rounds).flat_map(|_| {
            [
                Instruction::send("M", "ping"),
                Instruction::receive("M"),
            ]
        });
        builder = builder.with_process(format!("P{}", i), stream);
    }
    builder.build().unwrap_or_default()
}

fn bench_round_robin(c: &mut Criterion) {
    let mut group = c.benchmark_group("round_robin");

    for processes in [4usize, 32, 128] {
        let model = contended_model(processes, 20);
        group.throughput(Throughput::Elements(model.instruction_count() as u64));

        for quantum in [1u32, 4] {
            group.bench_with_input(
                BenchmarkId::new(format!("contended_q{}", quantum), processes),
                &model,
                |b, model| {
                    b.iter(|| {
                        let mut scheduler =
                            Scheduler::new(model, SchedulerConfig::round_robin(quantum));
                        black_box(scheduler.run())
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_mailboxes(c: &mut Criterion) {
    let mut group = c.benchmark_group("mailboxes");

    for processes in [4usize, 64] {
        let model = mailbox_model(processes, 50);
        group.throughput(Throughput::Elements(model.instruction_count() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(processes), &model, |b, model| {
            b.iter(|| {
                let mut scheduler = Scheduler::new(model, SchedulerConfig::round_robin(2));
                scheduler.run();
                black_box(scheduler.into_events().len())
            });
        });
    }

    group.finish();
}

fn bench_fcfs(c: &mut Criterion) {
    let model = mailbox_model(64, 50);
    c.bench_function("fcfs_uncontended", |b| {
        b.iter(|| {
            let mut scheduler = Scheduler::new(black_box(&model), SchedulerConfig::fcfs());
            black_box(scheduler.run())
        });
    });
}

criterion_group!(benches, bench_round_robin, bench_mailboxes, bench_fcfs);
criterion_main!(benches);
