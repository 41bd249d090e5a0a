use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use capstan::prelude::*;

#[test]
fn test_add_task_yields_seven() {
    let rt = Runtime::new(Config::default()).unwrap();

    let sum = rt.spawn(|| 3 + 4);

    assert_eq!(sum.result().unwrap(), 7);
    assert_eq!(sum.result().unwrap(), 7);
}

#[test]
fn test_every_scheduled_task_executes_exactly_once() {
    let config = Config::builder().num_threads(4).build().unwrap();
    let pool = WorkerPool::new(&config).unwrap();

    let hits = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..200usize)
        .map(|i| {
            let hits = hits.clone();
            pool.spawn(move || {
                hits.fetch_add(1, Ordering::SeqCst);
                i
            })
        })
        .collect();

    for (i, handle) in handles.iter().enumerate() {
        assert_eq!(handle.result().unwrap(), i);
    }
    assert_eq!(hits.load(Ordering::SeqCst), 200);
}

#[test]
fn test_fifo_dispatch_order() {
    let config = Config::builder().num_threads(1).build().unwrap();
    let pool = WorkerPool::new(&config).unwrap();

    let (gate_tx, gate_rx) = mpsc::channel::<()>();
    let order = Arc::new(Mutex::new(Vec::new()));

    // hold the only worker so the next three stack up in the queue
    let gate = pool.spawn(move || {
        gate_rx.recv().unwrap();
    });

    let mut tagged = Vec::new();
    for tag in 0..3usize {
        let order = order.clone();
        tagged.push(pool.spawn(move || {
            order.lock().push(tag);
            tag
        }));
    }

    gate_tx.send(()).unwrap();
    gate.wait();

    for (tag, handle) in tagged.iter().enumerate() {
        assert_eq!(handle.result().unwrap(), tag);
    }
    assert_eq!(*order.lock(), vec![0, 1, 2]);
}

#[test]
fn test_result_idempotent_across_threads_and_calls() {
    let rt = Runtime::new(Config::default()).unwrap();
    let task = rt.spawn(|| 3 + 4);

    let mut readers = Vec::new();
    for _ in 0..4 {
        let task = task.clone();
        readers.push(thread::spawn(move || task.result().unwrap()));
    }
    for reader in readers {
        assert_eq!(reader.join().unwrap(), 7);
    }

    assert_eq!(task.result().unwrap(), 7);
    assert_eq!(task.result().unwrap(), 7);
}

#[test]
fn test_panic_surfaces_to_every_reader() {
    let rt = Runtime::new(Config::default()).unwrap();

    let task = rt.spawn(|| -> i32 { panic!("split failure") });
    let other = task.clone();

    match task.result() {
        Err(Error::TaskPanicked(msg)) => assert_eq!(msg, "split failure"),
        unexpected => panic!("wanted TaskPanicked, got {:?}", unexpected),
    }
    match other.result() {
        Err(Error::TaskPanicked(msg)) => assert_eq!(msg, "split failure"),
        unexpected => panic!("wanted TaskPanicked, got {:?}", unexpected),
    }
}

fn ratio(a: i32, b: i32) -> i32 {
    a / b
}

#[test]
fn test_divide_by_zero_panic_is_captured() {
    let rt = Runtime::new(Config::default()).unwrap();

    let task = rt.spawn(|| ratio(1, 0));

    match task.result() {
        Err(Error::TaskPanicked(msg)) => assert!(msg.contains("divide by zero")),
        unexpected => panic!("wanted TaskPanicked, got {:?}", unexpected),
    }
    // a second read re-raises the same failure instead of a default value
    assert!(matches!(task.result(), Err(Error::TaskPanicked(_))));
}

#[test]
fn test_dropped_handles_do_not_cancel() {
    let rt = Runtime::new(Config::default()).unwrap();
    let (done_tx, done_rx) = mpsc::channel();

    let handle = rt.spawn(move || {
        done_tx.send(77).unwrap();
    });
    drop(handle);

    // the pool's reference keeps the task alive; the side effect still lands
    assert_eq!(done_rx.recv_timeout(Duration::from_secs(5)).unwrap(), 77);
}

#[test]
fn test_shutdown_never_drains_the_queue() {
    let config = Config::builder().num_threads(1).build().unwrap();
    let mut pool = WorkerPool::new(&config).unwrap();

    let (started_tx, started_rx) = mpsc::channel();
    let busy = pool.spawn(move || {
        started_tx.send(()).unwrap();
        thread::sleep(Duration::from_millis(150));
        42
    });
    // make sure the only worker has dequeued the busy task
    started_rx.recv().unwrap();

    let ran = Arc::new(AtomicUsize::new(0));
    let mut starved = Vec::new();
    for _ in 0..8 {
        let ran = ran.clone();
        starved.push(pool.spawn(move || {
            ran.fetch_add(1, Ordering::SeqCst);
        }));
    }

    // closes the queue well inside the busy task's window, then joins
    pool.shutdown();

    assert_eq!(busy.result().unwrap(), 42);
    assert_eq!(ran.load(Ordering::SeqCst), 0);
    for handle in &starved {
        assert!(!handle.is_finished());
    }
    assert_eq!(pool.queued_items(), 8);
}

#[test]
fn test_spawn_after_shutdown_is_dropped() {
    let config = Config::builder().num_threads(2).build().unwrap();
    let mut pool = WorkerPool::new(&config).unwrap();
    pool.shutdown();

    let ran = Arc::new(AtomicUsize::new(0));
    let ran_in_task = ran.clone();
    let orphan = pool.spawn(move || {
        ran_in_task.fetch_add(1, Ordering::SeqCst);
    });

    thread::sleep(Duration::from_millis(50));
    assert_eq!(ran.load(Ordering::SeqCst), 0);
    assert!(!orphan.is_finished());
    assert_eq!(pool.queued_items(), 0);
}

#[test]
fn test_body_dropping_last_runtime_reference_detaches_its_worker() {
    let config = Config::builder().num_threads(2).build().unwrap();
    let rt = Arc::new(Runtime::new(config).unwrap());

    let (released_tx, released_rx) = mpsc::channel::<()>();
    let (done_tx, done_rx) = mpsc::channel();

    let inner = rt.clone();
    let task = rt.spawn(move || {
        // wait until the spawning thread has let go of its reference
        released_rx.recv().unwrap();
        // the body now holds the last one; the pool tears down right here
        drop(inner);
        done_tx.send(()).unwrap();
    });

    drop(rt);
    released_tx.send(()).unwrap();

    // tearing down from inside a worker must not self-join
    done_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("worker hung tearing down its own pool");
    task.wait();
}

struct Ping {
    reply: Mutex<Option<mpsc::Sender<&'static str>>>,
}

impl WorkItem for Ping {
    fn execute(self: Arc<Self>) {
        if let Some(tx) = self.reply.lock().take() {
            let _ = tx.send("pong");
        }
    }
}

#[test]
fn test_raw_work_item_schedule() {
    let config = Config::builder().num_threads(2).build().unwrap();
    let pool = WorkerPool::new(&config).unwrap();

    let (tx, rx) = mpsc::channel();
    pool.schedule(Arc::new(Ping {
        reply: Mutex::new(Some(tx)),
    }));

    assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), "pong");
}

fn fib_chain(rt: Arc<Runtime>, n: u64) -> TaskHandle<(u64, u64)> {
    let inner = rt.clone();
    rt.spawn(move || {
        if n == 1 {
            (1, 1)
        } else {
            let (low, high) = fib_chain(inner, n - 1).result().unwrap();
            (high, low + high)
        }
    })
}

#[test]
fn test_fibonacci_chain_blocks_through_workers() {
    // a depth-n chain occupies n workers at once, so the default eight
    // workers cover exactly n <= 8
    let rt = Arc::new(Runtime::new(Config::default()).unwrap());

    let expected = [1u64, 1, 2, 3, 5, 8, 13, 21];
    for (i, want) in expected.iter().enumerate() {
        let n = (i + 1) as u64;
        let got = fib_chain(rt.clone(), n).result().unwrap().0;
        assert_eq!(got, *want, "fib({})", n);
    }
}

#[test]
fn test_worker_count_matches_config() {
    let config = Config::builder().num_threads(3).build().unwrap();
    let pool = WorkerPool::new(&config).unwrap();
    assert_eq!(pool.worker_count(), 3);

    let rt = Runtime::new(Config::default()).unwrap();
    assert_eq!(rt.worker_count(), capstan::DEFAULT_WORKER_THREADS);
}

#[cfg(feature = "telemetry")]
#[test]
fn test_metrics_count_the_wave() {
    let config = Config::builder().num_threads(4).build().unwrap();
    let pool = WorkerPool::new(&config).unwrap();

    let handles: Vec<_> = (0..50i64).map(|i| pool.spawn(move || i)).collect();
    for handle in &handles {
        handle.wait();
    }

    // workers record the execution just after the result is published
    thread::sleep(Duration::from_millis(100));

    let snapshot = pool.metrics().snapshot();
    assert_eq!(snapshot.tasks_scheduled, 50);
    assert_eq!(snapshot.tasks_executed, 50);
    assert_eq!(snapshot.tasks_panicked, 0);
    assert_eq!(snapshot.in_flight(), 0);
}
