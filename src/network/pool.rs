//! Worker Pool
//!
//! Fixed set of threads pulling jobs from a crossbeam channel.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};

use crate::error::{JsonDbError, Result};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Bounded pool of worker threads
///
/// Submission never blocks: jobs queue on an unbounded channel and the
/// next idle worker picks them up. A job that panics is logged and the
/// worker moves on to the next job.
pub struct WorkerPool {
    /// Job queue; `None` once the pool is shutting down
    sender: Option<Sender<Job>>,

    /// Worker thread handles
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `size` named worker threads
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(JsonDbError::Config(
                "worker pool needs at least one thread".to_string(),
            ));
        }

        let (sender, receiver) = channel::unbounded::<Job>();

        let mut workers = Vec::with_capacity(size);
        for id in 0..size {
            let receiver = receiver.clone();
            let handle = thread::Builder::new()
                .name(format!("jsondb-worker-{}", id))
                .spawn(move || worker_loop(id, receiver))?;
            workers.push(handle);
        }

        tracing::debug!("Started worker pool with {} threads", size);

        Ok(Self {
            sender: Some(sender),
            workers,
        })
    }

    /// Queue a job for execution
    pub fn execute<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| JsonDbError::Network("worker pool is shut down".to_string()))?;

        sender
            .send(Box::new(job))
            .map_err(|_| JsonDbError::Network("all workers have exited".to_string()))
    }

    /// Number of worker threads
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Stop accepting jobs, finish the queued ones and join every worker
    pub fn join(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Closing the channel ends each worker's receive loop once the
        // queue is drained
        drop(self.sender.take());

        for handle in self.workers.drain(..) {
            let name = handle.thread().name().unwrap_or("worker").to_string();
            if handle.join().is_err() {
                tracing::error!("{} terminated abnormally", name);
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(id: usize, receiver: Receiver<Job>) {
    for job in receiver.iter() {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
            tracing::error!("Worker {} job panicked: {}", id, panic_message(payload.as_ref()));
        }
    }

    tracing::trace!("Worker {} exiting", id);
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic payload"
    }
}
