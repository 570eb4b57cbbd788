use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;

use thiserror::Error;
use tracing::{debug, error};

pub trait Split: Sized {
    /// Break `self` into at most `n` contiguous, ordered parts.
    fn split_to_vec(self, n: usize) -> Vec<Self>;
}

pub trait Join: Sized {
    /// Reassemble parts produced by [`Split::split_to_vec`], in order.
    fn join_vec(parts: Vec<Self>) -> Self;
}

impl<T> Split for Vec<T> {
    fn split_to_vec(mut self, n: usize) -> Vec<Self> {
        let n = n.max(1);
        let size = self.len() / n;
        let size_xtra = self.len() % n;

        let mut parts: Vec<Vec<T>> = Vec::with_capacity(n);
        for i in (0..n).rev() {
            let len = if i < size_xtra { size + 1 } else { size };
            let tail = self.split_off(self.len() - len);
            parts.push(tail);
        }
        parts.reverse();
        parts
    }
}

impl<T> Join for Vec<T> {
    fn join_vec(parts: Vec<Self>) -> Self {
        let total = parts.iter().map(Vec::len).sum();
        let mut v = Vec::with_capacity(total);
        for p in parts {
            v.extend(p);
        }
        v
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JoinError {
    #[error("worker pool has no workers")]
    NoWorkers,
    #[error("worker panicked or exited before returning its part")]
    WorkerLost,
    #[error("part {0} returned twice or out of range")]
    BadPart(usize),
}

#[derive(Debug)]
pub struct SplitPart<T> {
    pub n: usize,
    pub part: T,
}

impl<T> SplitPart<T> {
    pub fn new(part: T, n: usize) -> Self {
        Self { part, n }
    }
}

impl<T> SplitPart<T>
where
    T: Join,
{
    /// Put parts back into index order and join them, whatever order the
    /// workers finished in.
    pub fn join(splits: Vec<Self>) -> Result<T, JoinError> {
        let n = splits.len();
        if n == 0 {
            return Err(JoinError::NoWorkers);
        }
        let mut slots: Vec<Option<T>> = (0..n).map(|_| None).collect();
        for s in splits {
            match slots.get_mut(s.n) {
                Some(slot) if slot.is_none() => *slot = Some(s.part),
                _ => return Err(JoinError::BadPart(s.n)),
            }
        }
        // n distinct indices below n: every slot is filled
        let parts: Vec<T> = slots.into_iter().flatten().collect();
        Ok(T::join_vec(parts))
    }
}

pub trait Call<T, U> {
    fn call(&self, input: T) -> Result<U, JoinError>;
}

struct Worker<T> {
    tx: mpsc::Sender<SplitPart<T>>,
}

impl<T> Worker<T>
where
    T: Send + 'static,
{
    /// A job that panics is answered with `None` so the pool never waits on
    /// a reply that will not come. The worker keeps serving afterwards.
    fn new<F, U>(mut f: F, result_tx: mpsc::Sender<SplitPart<Option<U>>>) -> Self
    where
        F: FnMut(T) -> U + Send + 'static,
        U: Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<SplitPart<T>>();
        thread::spawn(move || {
            while let Ok(job) = rx.recv() {
                let n = job.n;
                let out = panic::catch_unwind(AssertUnwindSafe(|| f(job.part))).ok();
                if out.is_none() {
                    error!(part = n, "worker panicked");
                }
                if result_tx.send(SplitPart::new(out, n)).is_err() {
                    return;
                }
            }
        });
        Self { tx }
    }
}

/// A fixed set of threads, each owning one copy of a job function. A call
/// splits its input across all workers and joins the outputs back in input
/// order, so results never depend on scheduling.
pub struct WorkerPool<T, U> {
    workers: Vec<Worker<T>>,
    rx: mpsc::Receiver<SplitPart<Option<U>>>,
}

impl<T, U> WorkerPool<T, U>
where
    T: Split + Send + 'static,
    U: Join + Send + 'static,
{
    pub fn with<M, F>(n: usize, mut make: M) -> Self
    where
        M: FnMut() -> F,
        F: FnMut(T) -> U + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let workers = (0..n).map(|_| Worker::new(make(), tx.clone())).collect();
        debug!(workers = n, "started worker pool");
        Self { workers, rx }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }
}

impl<T, U> Call<T, U> for WorkerPool<T, U>
where
    T: Split + Send + 'static,
    U: Join + Send + 'static,
{
    fn call(&self, input: T) -> Result<U, JoinError> {
        if self.workers.is_empty() {
            return Err(JoinError::NoWorkers);
        }
        let parts = input.split_to_vec(self.workers.len());
        let sent = parts.len();
        for (n, (worker, part)) in self.workers.iter().zip(parts).enumerate() {
            worker
                .tx
                .send(SplitPart::new(part, n))
                .map_err(|_| JoinError::WorkerLost)?;
        }
        // drain every reply before failing so the next call starts clean
        let mut done = Vec::with_capacity(sent);
        let mut lost = false;
        for _ in 0..sent {
            let reply = self.rx.recv().map_err(|_| JoinError::WorkerLost)?;
            match reply.part {
                Some(part) => done.push(SplitPart::new(part, reply.n)),
                None => lost = true,
            }
        }
        if lost {
            return Err(JoinError::WorkerLost);
        }
        SplitPart::join(done)
    }
}
