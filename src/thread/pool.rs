use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::error::{Error, Result};

type Job = Box<dyn FnOnce() + Send + 'static>;

struct Queue {
    jobs: VecDeque<Job>,
    stopping: bool,
}

struct Shared {
    queue: Mutex<Queue>,
    available: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Queue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Fixed-size worker pool with a FIFO queue.
///
/// Dropping the pool (or calling [`shutdown`](Self::shutdown)) lets the
/// workers drain every queued task before they exit.
pub struct ThreadPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

/// Receives the result of one submitted task.
pub struct TaskHandle<R> {
    rx: mpsc::Receiver<R>,
}

impl<R> TaskHandle<R> {
    /// Blocks until the task has run. Fails if the task panicked.
    pub fn join(self) -> Result<R> {
        self.rx.recv().map_err(|_| Error::TaskFailed)
    }
}

impl ThreadPool {
    /// Spawns `size` workers.
    ///
    /// # Panics
    /// Panics if `size == 0`.
    pub fn new(size: usize) -> ThreadPool {
        assert!(size > 0, "thread pool needs at least one worker");

        let shared = Arc::new(Shared {
            queue: Mutex::new(Queue {
                jobs: VecDeque::new(),
                stopping: false,
            }),
            available: Condvar::new(),
        });

        let workers = (0..size)
            .map(|id| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || worker_loop(id, &shared))
            })
            .collect();
        debug!(workers = size, "thread pool started");

        ThreadPool { shared, workers }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Queues `task` behind everything submitted before it.
    pub fn execute<F, R>(&self, task: F) -> TaskHandle<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let job: Job = Box::new(move || {
            // The caller may have dropped its handle; that is not an error.
            let _ = tx.send(task());
        });

        self.shared.lock().jobs.push_back(job);
        self.shared.available.notify_one();
        TaskHandle { rx }
    }

    /// Drains the queue, then joins every worker.
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        self.shared.lock().stopping = true;
        self.shared.available.notify_all();
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                warn!("thread pool worker exited abnormally");
            }
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

fn worker_loop(id: usize, shared: &Shared) {
    loop {
        let job = {
            let mut queue = shared.lock();
            loop {
                if let Some(job) = queue.jobs.pop_front() {
                    break job;
                }
                if queue.stopping {
                    debug!(worker = id, "worker stopping");
                    return;
                }
                queue = shared.available.wait(queue).unwrap_or_else(PoisonError::into_inner);
            }
        };

        // A panicking task drops its result sender; its handle reports
        // TaskFailed and the worker keeps serving.
        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
            warn!(worker = id, "task panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn shutdown_drains_pending_tasks() {
        let counter = Arc::new(AtomicUsize::new(0));
        let pool = ThreadPool::new(2);
        for _ in 0..32 {
            let counter = Arc::clone(&counter);
            pool.execute(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        pool.shutdown();
        assert_eq!(counter.load(Ordering::SeqCst), 32);
    }

    #[test]
    fn single_worker_runs_in_fifo_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let pool = ThreadPool::new(1);
        let handles: Vec<_> = (0..10)
            .map(|i| {
                let order = Arc::clone(&order);
                pool.execute(move || {
                    order.lock().unwrap().push(i);
                    i * i
                })
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, (0..10).map(|i| i * i).collect::<Vec<_>>());
        assert_eq!(*order.lock().unwrap(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn panicking_task_reports_failure() {
        let pool = ThreadPool::new(1);
        let bad = pool.execute(|| -> usize { panic!("boom") });
        let good = pool.execute(|| 7usize);
        assert!(matches!(bad.join(), Err(Error::TaskFailed)));
        assert_eq!(good.join().unwrap(), 7);
    }
}
