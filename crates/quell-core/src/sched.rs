use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;

use crate::error::{QuellError, Result};

/// Run one independent unit of work per frame index on the global rayon
/// pool and block until every unit has completed or faulted.
///
/// Outputs come back ordered by index, so the result is identical whatever
/// the pool size. A faulting unit never blocks or corrupts the others: all
/// units get the chance to finish, then faults are aggregated into a single
/// `WorkerFault` carrying the count and the first faulting index.
pub fn run_frame_batch<T, F>(range: Range<usize>, unit: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(usize) -> T + Sync,
{
    let outcomes: Vec<(usize, std::thread::Result<T>)> = range
        .into_par_iter()
        .map(|index| {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| unit(index)));
            (index, outcome)
        })
        .collect();

    let mut results = Vec::with_capacity(outcomes.len());
    let mut failed = 0usize;
    let mut first_fault: Option<(usize, String)> = None;

    for (index, outcome) in outcomes {
        match outcome {
            Ok(value) => results.push(value),
            Err(payload) => {
                failed += 1;
                if first_fault.is_none() {
                    first_fault = Some((index, fault_reason(payload)));
                }
            }
        }
    }

    match first_fault {
        None => Ok(results),
        Some((unit, reason)) => Err(QuellError::WorkerFault {
            failed,
            unit,
            reason,
        }),
    }
}

fn fault_reason(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unit panicked".to_string()
    }
}
