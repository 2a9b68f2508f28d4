//! Worker pool for one-time initialization tasks.
//!
//! Independent bring-up work (e.g. constructing the physics engines) is
//! submitted as an explicit task list and joined with [`JobPool::wait`]
//! before the first frame; no job may still be running once steady-state
//! frame processing starts.

use crossbeam_channel::{Sender, unbounded};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;

type Job = Box<dyn FnOnce() + Send + 'static>;

pub struct JobPool {
    tx: Option<Sender<Job>>,
    outstanding: Arc<(Mutex<usize>, Condvar)>,
    workers: Vec<JoinHandle<()>>,
}

impl JobPool {
    pub fn new(threads: usize) -> Self {
        let (tx, rx) = unbounded::<Job>();
        let outstanding = Arc::new((Mutex::new(0usize), Condvar::new()));

        let workers = (0..threads.max(1))
            .map(|index| {
                let rx = rx.clone();
                let outstanding = outstanding.clone();
                std::thread::Builder::new()
                    .name(format!("candela-jobs-{index}"))
                    .spawn(move || {
                        for job in rx.iter() {
                            job();
                            let (count, signal) = &*outstanding;
                            let mut count = count.lock().unwrap_or_else(|e| e.into_inner());
                            *count -= 1;
                            signal.notify_all();
                        }
                    })
                    .expect("failed to spawn job worker")
            })
            .collect();

        Self {
            tx: Some(tx),
            outstanding,
            workers,
        }
    }

    pub fn execute(&self, job: impl FnOnce() + Send + 'static) {
        let (count, _) = &*self.outstanding;
        *count.lock().unwrap_or_else(|e| e.into_inner()) += 1;

        self.tx
            .as_ref()
            .expect("pool is alive until dropped")
            .send(Box::new(job))
            .expect("job workers outlive the pool handle");
    }

    /// Blocks until every submitted job has finished.
    pub fn wait(&self) {
        let (count, signal) = &*self.outstanding;
        let mut count = count.lock().unwrap_or_else(|e| e.into_inner());
        while *count > 0 {
            count = signal.wait(count).unwrap_or_else(|e| e.into_inner());
        }
    }
}

impl Drop for JobPool {
    fn drop(&mut self) {
        self.tx.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn wait_is_a_barrier_over_all_jobs() {
        let pool = JobPool::new(2);
        let counter = Arc::new(AtomicU32::new(0));

        for _ in 0..8 {
            let counter = counter.clone();
            pool.execute(move || {
                std::thread::sleep(std::time::Duration::from_millis(5));
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        pool.wait();
        assert_eq!(counter.load(Ordering::SeqCst), 8);
    }

    #[test]
    fn wait_on_an_idle_pool_returns_immediately() {
        let pool = JobPool::new(1);
        pool.wait();
    }
}
