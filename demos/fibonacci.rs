//! Classic demo workload: an add task, then Fibonacci computed by tasks
//! that spawn and block on their children from inside worker bodies.
//!
//! Run with `cargo run --example fibonacci`; set `RUST_LOG=debug` to watch
//! the pool's lifecycle events.

use std::sync::Arc;

use capstan::{Config, Runtime, TaskHandle};

fn async_add(rt: &Runtime, a: i32, b: i32) -> TaskHandle<i32> {
    rt.spawn(move || a + b)
}

/// Each task joins its first child before spawning the second, so at most
/// one undispatched descendant exists at a time and the blocked chain stays
/// no deeper than `n - 1` workers. Eight workers cover `n <= 8`.
fn async_fib(rt: Arc<Runtime>, n: u64) -> TaskHandle<u64> {
    let inner = rt.clone();
    rt.spawn(move || {
        if n <= 2 {
            1
        } else {
            let a = async_fib(inner.clone(), n - 1).result().unwrap();
            let b = async_fib(inner, n - 2).result().unwrap();
            a + b
        }
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let rt = Arc::new(Runtime::new(Config::default()).expect("runtime construction failed"));

    let sum = async_add(&rt, 3, 4);
    println!("3 + 4 = {}", sum.result().expect("add task failed"));

    for n in 1..=8 {
        let fib = async_fib(rt.clone(), n);
        println!("fib({}) = {}", n, fib.result().expect("fib task failed"));
    }
}
