//! Best-effort mirroring of local shape changes into a [`ShapeStore`].
//!
//! Jobs are handed off without waiting. A failed job is logged and dropped;
//! the editor's collection stays the source of truth.

use crate::drawing::Shape;
use crate::error::StoreResult;
use crate::store::ShapeStore;

#[derive(Debug, Clone, PartialEq)]
pub enum ReplicationJob {
    Create(Shape),
    /// Push the shape's current wire form over the stored record.
    Update(Shape),
    Delete { id: String },
}

impl ReplicationJob {
    pub fn id(&self) -> &str {
        match self {
            ReplicationJob::Create(shape) | ReplicationJob::Update(shape) => &shape.id,
            ReplicationJob::Delete { id } => id,
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            ReplicationJob::Create(_) => "create",
            ReplicationJob::Update(_) => "update",
            ReplicationJob::Delete { .. } => "delete",
        }
    }
}

/// Somewhere to send replication jobs. Must never block the caller.
pub trait Replicate {
    fn submit(&self, job: ReplicationJob);
}

/// Discards every job. Used when the editor runs without a backend.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoReplication;

impl Replicate for NoReplication {
    fn submit(&self, job: ReplicationJob) {
        log::debug!("not replicating {} of {}", job.verb(), job.id());
    }
}

/// Run one job against the store.
pub async fn apply<S: ShapeStore + ?Sized>(store: &S, job: ReplicationJob) -> StoreResult<()> {
    match job {
        ReplicationJob::Create(shape) => store.create_shape(shape).await.map(drop),
        ReplicationJob::Update(shape) => {
            let fields = serde_json::to_value(&shape)?;
            store.update_shape(&shape.id, fields).await.map(drop)
        }
        ReplicationJob::Delete { id } => store.delete_shape(&id).await,
    }
}

/// Run a job and log the outcome. Failures stop here.
pub async fn apply_logged<S: ShapeStore + ?Sized>(store: &S, job: ReplicationJob) {
    let verb = job.verb();
    let id = job.id().to_string();
    match apply(store, job).await {
        Ok(()) => log::debug!("replicated {} of {}", verb, id),
        Err(err) => log::warn!("failed to replicate {} of {}: {}", verb, id, err),
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use worker::Replicator;

#[cfg(not(target_arch = "wasm32"))]
mod worker {
    use std::sync::Arc;
    use std::sync::mpsc::{self, Sender};
    use std::thread::{self, JoinHandle};

    use super::{Replicate, ReplicationJob, apply_logged};
    use crate::store::ShapeStore;

    /// Feeds jobs to a dedicated thread that drives the store one job at a
    /// time. Dropping the replicator drains the queue and joins the thread.
    pub struct Replicator {
        sender: Option<Sender<ReplicationJob>>,
        worker: Option<JoinHandle<()>>,
    }

    impl Replicator {
        pub fn spawn<S>(store: Arc<S>) -> std::io::Result<Self>
        where
            S: ShapeStore + Send + Sync + 'static,
        {
            let (sender, receiver) = mpsc::channel::<ReplicationJob>();
            let worker = thread::Builder::new()
                .name("shape-replication".into())
                .spawn(move || {
                    for job in receiver {
                        pollster::block_on(apply_logged(store.as_ref(), job));
                    }
                    log::debug!("replication worker stopped");
                })?;

            Ok(Self {
                sender: Some(sender),
                worker: Some(worker),
            })
        }
    }

    impl Replicate for Replicator {
        fn submit(&self, job: ReplicationJob) {
            let Some(sender) = &self.sender else {
                return;
            };
            if let Err(mpsc::SendError(job)) = sender.send(job) {
                log::warn!("replication worker is gone, dropping {} of {}", job.verb(), job.id());
            }
        }
    }

    impl Drop for Replicator {
        fn drop(&mut self) {
            self.sender.take();
            if let Some(worker) = self.worker.take() {
                if worker.join().is_err() {
                    log::warn!("replication worker panicked");
                }
            }
        }
    }
}
