use std::{
    sync::{Arc, Barrier},
    thread,
};

/// Runs `f` on `threads` threads released at the same instant.
///
/// Each thread receives its index. Results are returned in index order.
/// A panic on any thread is propagated to the caller.
pub fn run_concurrently<T, F>(threads: usize, f: F) -> Vec<T>
where
    T: Send + 'static,
    F: Fn(usize) -> T + Send + Sync + 'static,
{
    let barrier = Arc::new(Barrier::new(threads));
    let f = Arc::new(f);

    let handles: Vec<_> = (0..threads)
        .map(|i| {
            let barrier = barrier.clone();
            let f = f.clone();

            thread::spawn(move || {
                barrier.wait();
                f(i)
            })
        })
        .collect();

    handles
        .into_iter()
        .map(|handle| match handle.join() {
            Ok(value) => value,
            Err(panic) => std::panic::resume_unwind(panic),
        })
        .collect()
}
