//! Dispatcher - spawns triggered executions and collects their outcomes

use crate::core::{
    error::BirbError,
    state::{DispatchOutcome, DispatchStatus},
};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use uuid::Uuid;

/// An execution that has been spawned but not yet collected
struct InFlight {
    dispatch_id: Uuid,
    context: String,
    name: String,
    started_at: DateTime<Utc>,
    handle: JoinHandle<DispatchStatus>,
}

/// Finished executions kept for `settle` when nobody collects them
pub const RETAINED_OUTCOMES: usize = 256;

/// Tracks fire-and-forget executions for one context
///
/// Outcomes are retained until the next [`Dispatcher::settle`]. Running
/// executions are always tracked; at most [`RETAINED_OUTCOMES`] finished ones
/// are kept, oldest dropped first.
#[derive(Default)]
pub struct Dispatcher {
    in_flight: Mutex<Vec<InFlight>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn queue(&self) -> MutexGuard<'_, Vec<InFlight>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Spawn an execution on `runtime` without awaiting it
    pub fn spawn<F>(&self, runtime: &Handle, context: &str, name: &str, execution: F) -> Uuid
    where
        F: Future<Output = Result<(), BirbError>> + Send + 'static,
    {
        let dispatch_id = Uuid::new_v4();
        let label = format!("{}::{}", context, name);

        let handle = runtime.spawn(async move {
            info!("Dispatch {} started: {}", dispatch_id, label);
            match execution.await {
                Ok(()) => {
                    info!("Dispatch {} completed: {}", dispatch_id, label);
                    DispatchStatus::Completed
                }
                Err(e) => {
                    error!("Unhandled failure in dispatch {} ({}): {}", dispatch_id, label, e);
                    DispatchStatus::Failed {
                        error: e.to_string(),
                    }
                }
            }
        });

        let mut queue = self.queue();
        prune_finished(&mut queue);
        queue.push(InFlight {
            dispatch_id,
            context: context.to_string(),
            name: name.to_string(),
            started_at: Utc::now(),
            handle,
        });

        dispatch_id
    }

    /// Number of executions not yet collected by `settle`
    pub fn pending(&self) -> usize {
        self.queue().len()
    }

    /// Wait for every spawned execution, including ones spawned while waiting
    pub async fn settle(&self) -> Vec<DispatchOutcome> {
        let mut outcomes = Vec::new();

        loop {
            let batch = std::mem::take(&mut *self.queue());
            if batch.is_empty() {
                break;
            }

            for flight in batch {
                let status = match flight.handle.await {
                    Ok(status) => status,
                    Err(join_error) => {
                        let message = if join_error.is_panic() {
                            panic_message(join_error.into_panic())
                        } else {
                            join_error.to_string()
                        };
                        error!(
                            "Dispatch {} ({}::{}) panicked: {}",
                            flight.dispatch_id, flight.context, flight.name, message
                        );
                        DispatchStatus::Panicked { message }
                    }
                };

                outcomes.push(DispatchOutcome {
                    dispatch_id: flight.dispatch_id,
                    context: flight.context,
                    name: flight.name,
                    started_at: flight.started_at,
                    finished_at: Utc::now(),
                    status,
                });
            }
        }

        outcomes
    }
}

/// Drop the oldest finished records beyond [`RETAINED_OUTCOMES`]
fn prune_finished(queue: &mut Vec<InFlight>) {
    let finished = queue.iter().filter(|f| f.handle.is_finished()).count();
    let mut excess = finished.saturating_sub(RETAINED_OUTCOMES);
    if excess == 0 {
        return;
    }

    debug!("Dropping {} uncollected dispatch outcome(s)", excess);
    queue.retain(|flight| {
        if excess > 0 && flight.handle.is_finished() {
            excess -= 1;
            false
        } else {
            true
        }
    });
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
