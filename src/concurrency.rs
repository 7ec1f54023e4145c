use anyhow::{Context, anyhow};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use tracing::{debug, warn};

type Job = Box<dyn FnOnce() + Send + 'static>;

struct Worker {
    id: usize,
    thread: thread::JoinHandle<()>,
}

impl Worker {
    fn new(id: usize, receiver: Arc<Mutex<Receiver<Job>>>) -> anyhow::Result<Worker> {
        let thread = thread::Builder::new()
            .name(format!("worker-{}", id))
            .spawn(move || {
                loop {
                    let message = match receiver.lock() {
                        Ok(rx) => rx.recv(),
                        Err(_) => break,
                    };
                    match message {
                        Ok(job) => job(),
                        Err(_) => break,
                    }
                }
                debug!(worker = id, "worker stopped");
            })
            .with_context(|| format!("Can't spawn worker {}", id))?;

        Ok(Worker { id, thread })
    }
}

/// Fixed number of threads running submitted jobs in arrival order.
pub struct ThreadPool {
    workers: Vec<Worker>,
    sender: Option<Sender<Job>>,
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        drop(self.sender.take());

        for worker in self.workers.drain(..) {
            if worker.thread.join().is_err() {
                warn!(worker = worker.id, "worker panicked");
            }
        }
    }
}

impl ThreadPool {
    pub fn new(size: usize) -> anyhow::Result<Self> {
        if size == 0 {
            return Err(anyhow!("Thread pool needs at least one worker"));
        }

        let (sender, receiver) = mpsc::channel();
        let receiver = Arc::new(Mutex::new(receiver));

        let mut workers = Vec::with_capacity(size);

        for id in 0..size {
            workers.push(Worker::new(id, Arc::clone(&receiver))?);
        }

        Ok(ThreadPool {
            workers,
            sender: Some(sender),
        })
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    pub fn execute<F>(&self, f: F) -> anyhow::Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let job = Box::new(f) as Job;
        self.sender
            .as_ref()
            .ok_or(anyhow!("Thread pool is shut down"))?
            .send(job)
            .map_err(|_| anyhow!("All workers are gone"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn zero_workers_rejected() {
        assert!(ThreadPool::new(0).is_err());
    }

    #[test]
    fn runs_every_job_before_drop_returns() {
        let counter = Arc::new(AtomicUsize::new(0));
        let pool = ThreadPool::new(3).unwrap();
        assert_eq!(pool.size(), 3);

        for _ in 0..20 {
            let counter = Arc::clone(&counter);
            pool.execute(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }
        drop(pool);

        assert_eq!(counter.load(Ordering::SeqCst), 20);
    }

    #[test]
    fn survives_panicking_job() {
        let counter = Arc::new(AtomicUsize::new(0));
        let pool = ThreadPool::new(2).unwrap();

        pool.execute(|| panic!("job failed")).unwrap();
        for _ in 0..5 {
            let counter = Arc::clone(&counter);
            pool.execute(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }
        drop(pool);

        assert_eq!(counter.load(Ordering::SeqCst), 5);
    }
}
