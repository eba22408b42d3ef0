use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use templar::{
  Command, CommandArgs, CommandPrefix, CommandRegistry, ContextKey, ContextPatch, ContextStore, Stage, StagesQueue,
  StepSlot, TemplarError,
};
use tokio::runtime::Runtime; // To run async code within Criterion

type BenchError = TemplarError;

const COUNTER: ContextKey<u64> = ContextKey::new("counter");
const LABEL: ContextKey<String> = ContextKey::new("label");

// --- Helper: step that bumps a counter and moves on ---
fn counting_step(iterations: u64) -> StepSlot<BenchError> {
  StepSlot::new(move |stage: Stage| async move {
    let manager = stage.manager();
    let mut counter = manager.get_storage(COUNTER, 0);
    for _ in 0..iterations {
      counter = counter.wrapping_add(1);
    }
    manager.set_storages(ContextPatch::new().set(COUNTER, counter));
    Ok::<_, BenchError>(stage.next_code())
  })
}

// --- Helper: step that retries itself `retries` times before moving on ---
fn retrying_step(retries: u64) -> StepSlot<BenchError> {
  StepSlot::new(move |stage: Stage| async move {
    let manager = stage.manager();
    let seen = manager.get_storage(COUNTER, 0);
    manager.set_storages(ContextPatch::new().set(COUNTER, seen + 1));
    let next = if seen < retries { stage.current_code() } else { stage.next_code() };
    Ok::<_, BenchError>(next)
  })
}

// --- Benchmark Functions ---

fn bench_linear_queue(c: &mut Criterion) {
  let mut group = c.benchmark_group("LinearQueue");
  let rt = Runtime::new().unwrap();

  for num_steps in [1usize, 5, 10].iter() {
    for step_iterations in [1u64, 100].iter() {
      let slots: Vec<StepSlot<BenchError>> = (0..*num_steps).map(|_| counting_step(*step_iterations)).collect();

      group.throughput(Throughput::Elements(*num_steps as u64));
      group.bench_with_input(
        BenchmarkId::new(format!("{}steps_{}iter", num_steps, step_iterations), num_steps),
        num_steps,
        |b, _| {
          b.to_async(&rt).iter_batched(
            || StagesQueue::new(slots.clone()),
            |queue| async move { queue.exec().await.unwrap() },
            criterion::BatchSize::SmallInput,
          );
        },
      );
    }
  }
  group.finish();
}

fn bench_skipped_slots(c: &mut Criterion) {
  let mut group = c.benchmark_group("QueueConstruction");

  for num_slots in [4usize, 16, 64].iter() {
    let slots: Vec<StepSlot<BenchError>> = (0..*num_slots)
      .map(|i| StepSlot::unless(i % 2 == 1, counting_step(1)))
      .collect();

    group.bench_with_input(BenchmarkId::from_parameter(num_slots), num_slots, |b, _| {
      b.iter(|| {
        let queue = StagesQueue::new(slots.clone());
        criterion::black_box(queue.stage_codes());
      })
    });
  }
  group.finish();
}

fn bench_retry_loop(c: &mut Criterion) {
  let mut group = c.benchmark_group("RetryLoop");
  let rt = Runtime::new().unwrap();

  for retries in [1u64, 10, 100].iter() {
    let slots = vec![retrying_step(*retries), counting_step(1)];

    group.throughput(Throughput::Elements(*retries + 2));
    group.bench_with_input(BenchmarkId::from_parameter(retries), retries, |b, _| {
      b.to_async(&rt).iter_batched(
        || StagesQueue::new(slots.clone()),
        |queue| async move { queue.exec().await.unwrap() },
        criterion::BatchSize::SmallInput,
      );
    });
  }
  group.finish();
}

fn bench_context_store_access(c: &mut Criterion) {
  let mut group = c.benchmark_group("ContextStoreAccess");
  let store = ContextStore::new();
  store.set_many(ContextPatch::new().set(COUNTER, 0).set(LABEL, "test".to_string()));

  group.bench_function("get", |b| {
    b.iter(|| {
      criterion::black_box(store.get(COUNTER, 0));
    })
  });

  group.bench_function("get_many", |b| {
    b.iter(|| {
      let snapshot = store.get_many([COUNTER.name(), LABEL.name()]);
      criterion::black_box(snapshot.len());
    })
  });

  group.bench_function("set_many", |b| {
    let mut value = 0u64;
    b.iter(|| {
      value += 1;
      store.set_many(ContextPatch::new().set(COUNTER, value));
    })
  });
  group.finish();
}

fn bench_registry_dispatch(c: &mut Criterion) {
  let mut group = c.benchmark_group("RegistryDispatch");
  let rt = Runtime::new().unwrap();

  let registry = Arc::new(CommandRegistry::new());
  let prefix = CommandPrefix::default();
  for action in ["apply", "create", "delete"] {
    let mut command = Command::new(&prefix, action);
    command.set_on_execute(|_args| async {
      let queue = StagesQueue::new([counting_step(1)]);
      queue.exec().await.map(|_| ())
    });
    registry.register(command);
  }
  let name = prefix.qualify("create");

  group.throughput(Throughput::Elements(1)); // 1 registry lookup + run
  group.bench_function("execute", |b| {
    b.to_async(&rt).iter(|| {
      let registry = Arc::clone(&registry);
      let name = name.clone();
      async move { registry.execute(&name, CommandArgs::none()).await.unwrap() }
    });
  });
  group.finish();
}

criterion_group!(
  benches,
  bench_linear_queue,
  bench_skipped_slots,
  bench_retry_loop,
  bench_context_store_access,
  bench_registry_dispatch
);
criterion_main!(benches);
