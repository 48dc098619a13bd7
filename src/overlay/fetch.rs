//! Worker pool for suggestion fetches.
//!
//! Fetches run off the input thread; completions are posted over a channel
//! the owning thread drains each tick. Jobs are fire-and-forget: nothing
//! cancels an in-flight fetch, and no timeout is imposed on a slow source.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::model::SuggestionItem;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A completed fetch, posted back to the input thread.
#[derive(Debug)]
pub struct FetchOutcome {
    /// Stamp of the request that produced these items.
    pub generation: u64,
    pub items: Vec<SuggestionItem>,
}

/// Fixed pool of worker threads running suggestion fetches.
pub struct FetchPool {
    tx: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl FetchPool {
    pub fn new(workers: usize) -> Self {
        let (tx, rx) = mpsc::channel::<Job>();
        let rx = Arc::new(Mutex::new(rx));
        let workers = (0..workers.max(1))
            .map(|_| {
                let rx = Arc::clone(&rx);
                thread::spawn(move || {
                    loop {
                        let job = {
                            let Ok(guard) = rx.lock() else { break };
                            guard.recv()
                        };
                        match job {
                            Ok(job) => job(),
                            Err(_) => break,
                        }
                    }
                })
            })
            .collect();
        FetchPool {
            tx: Some(tx),
            workers,
        }
    }

    /// Queue a job. Silently dropped if the pool is shutting down.
    pub fn execute(&self, job: impl FnOnce() + Send + 'static) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(Box::new(job));
        }
    }
}

impl Drop for FetchPool {
    fn drop(&mut self) {
        self.tx.take();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

/// Channel pair carrying fetch completions back to the input thread.
pub fn outcome_channel() -> (Sender<FetchOutcome>, Receiver<FetchOutcome>) {
    mpsc::channel()
}
