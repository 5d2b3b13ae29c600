//! Real-time input execution.
//!
//! [`InputScheduler`] plays parsed sequences on virtual controllers. Each
//! sequence runs on its own worker from tokio's blocking pool, so sequences
//! aimed at different controllers proceed independently.
//!
//! Per group the worker presses every member, flushes the touched
//! controllers, then polls until each member's duration has elapsed and
//! releases plain presses as they expire. Holds and releases are left alone
//! until the final sweep, which releases every member of every group whether
//! the sequence finished or was halted.
//!
//! ## Design notes
//!
//! - Polling sleeps 1 ms while every pending input has more than
//!   [`SPIN_THRESHOLD`] left and spins otherwise, trading CPU for release
//!   accuracy only near a deadline.
//! - Halting is cooperative: workers see the flag on their next poll tick.
//!   [`InputScheduler::wait_all_stopped`] returns once the in-flight count is
//!   zero, and only then is every input guaranteed released.
//! - Two sequences may drive the same controller at once. Nothing arbitrates
//!   between them; the last write before an `update` wins.

use crate::controller::{ControllerManager, VirtualController};
use crate::error::ExecuteError;
use crate::{GameConsole, ParsedInput, ParsedInputSequence};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Remaining time below which the poll loop stops sleeping.
pub const SPIN_THRESHOLD: Duration = Duration::from_millis(20);

const POLL_SLEEP: Duration = Duration::from_millis(1);

/// Shared halt flag and in-flight counter for all running sequences.
#[derive(Debug, Default)]
pub struct InputScheduler {
    halted: AtomicBool,
    running: AtomicUsize,
}

struct RunningGuard(Arc<InputScheduler>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.running.fetch_sub(1, Ordering::SeqCst);
    }
}

impl InputScheduler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Sequences currently executing.
    pub fn running(&self) -> usize {
        self.running.load(Ordering::SeqCst)
    }

    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::SeqCst)
    }

    /// Starts `seq` on the blocking pool. Must be called inside a tokio runtime.
    pub fn execute(
        self: &Arc<Self>,
        seq: ParsedInputSequence,
        console: Arc<GameConsole>,
        controllers: ControllerManager,
    ) -> Result<JoinHandle<()>, ExecuteError> {
        if self.is_halted() {
            return Err(ExecuteError::InputsHalted);
        }

        self.running.fetch_add(1, Ordering::SeqCst);
        let guard = RunningGuard(Arc::clone(self));
        Ok(tokio::task::spawn_blocking(move || {
            let guard = guard;
            guard.0.run_blocking(&seq, &console, &controllers);
        }))
    }

    /// Plays `seq` on the calling thread.
    pub fn run_blocking(&self, seq: &ParsedInputSequence, console: &GameConsole, controllers: &ControllerManager) {
        let mut used = BTreeSet::new();

        'groups: for group in &seq.groups {
            let mut dirty = BTreeSet::new();
            for input in group {
                if console.is_blank(&input.name) {
                    continue;
                }
                let Some(controller) = controller_for(controllers, input) else {
                    continue;
                };
                if input.is_release() {
                    release_input(input, console, controller.as_ref());
                } else {
                    press_input(input, console, controller.as_ref());
                }
                dirty.insert(input.controller_port);
                used.insert(input.controller_port);
            }
            flush(controllers, &dirty);

            let start = Instant::now();
            let mut pending: Vec<&ParsedInput> = group.iter().collect();
            while !pending.is_empty() {
                if self.is_halted() {
                    log::debug!("executor: halted mid-sequence");
                    break 'groups;
                }

                let elapsed = start.elapsed();
                let mut dirty = BTreeSet::new();
                pending.retain(|input| {
                    if elapsed < duration_of(input) {
                        return true;
                    }
                    if !input.is_hold() && !input.is_release() && !console.is_blank(&input.name) {
                        if let Some(controller) = controller_for(controllers, input) {
                            release_input(input, console, controller.as_ref());
                            dirty.insert(input.controller_port);
                            used.insert(input.controller_port);
                        }
                    }
                    false
                });
                flush(controllers, &dirty);

                let nearest = pending.iter().map(|input| duration_of(input).saturating_sub(elapsed)).min();
                match nearest {
                    Some(left) if left > SPIN_THRESHOLD => std::thread::sleep(POLL_SLEEP),
                    Some(_) => std::hint::spin_loop(),
                    None => {}
                }
            }
        }

        for input in seq.inputs() {
            if console.is_blank(&input.name) {
                continue;
            }
            if let Some(controller) = controller_for(controllers, input) {
                release_input(input, console, controller.as_ref());
                used.insert(input.controller_port);
            }
        }
        flush(controllers, &used);
    }

    /// Sets the halt flag. Running sequences stop at their next poll tick.
    pub fn halt(&self) {
        if !self.halted.swap(true, Ordering::SeqCst) {
            log::info!("executor: halting {} running sequence(s)", self.running());
        }
    }

    /// Waits until no sequence is executing.
    pub async fn wait_all_stopped(&self) {
        while self.running() != 0 {
            tokio::time::sleep(POLL_SLEEP).await;
        }
    }

    /// Clears the halt flag.
    ///
    /// # Panics
    ///
    /// If inputs are not halted: resuming twice means two callers raced over
    /// the flag.
    pub fn resume(&self) {
        let was_halted = self.halted.swap(false, Ordering::SeqCst);
        assert!(was_halted, "resume called while inputs were not halted");
        log::info!("executor: resumed");
    }

    /// Halts, waits for every sequence to finish its release sweep, and resumes.
    pub async fn stop_all(&self) {
        self.halt();
        self.wait_all_stopped().await;
        self.resume();
    }
}

fn duration_of(input: &ParsedInput) -> Duration {
    Duration::from_millis(u64::from(input.duration))
}

fn controller_for<'c>(
    controllers: &'c ControllerManager,
    input: &ParsedInput,
) -> Option<&'c Arc<dyn VirtualController>> {
    let controller = controllers.get(input.controller_port);
    if controller.is_none() {
        log::warn!("executor: no controller on port {}, skipping {:?}", input.controller_port + 1, input.name);
    }
    controller
}

fn flush(controllers: &ControllerManager, ports: &BTreeSet<usize>) {
    for port in ports {
        let Some(controller) = controllers.get(*port) else {
            continue;
        };
        if let Err(err) = controller.update() {
            log::warn!("executor: {err}");
        }
    }
}

/// Presses one input. An input that is both axis and button releases the
/// half it is not using, so switching `l99%` to `l` never leaves both set.
pub fn press_input(input: &ParsedInput, console: &GameConsole, controller: &dyn VirtualController) {
    if console.is_blank(&input.name) {
        return;
    }
    if let Some(axis) = console.get_axis(&input.name, input.percent) {
        controller.press_axis(axis.code, axis.min, axis.max, input.percent);
        if let Some(button) = console.get_button(&input.name) {
            controller.release_button(button);
        }
    } else if let Some(button) = console.get_button(&input.name) {
        controller.press_button(button);
        if let Some(axis) = console.axis_value(&input.name) {
            controller.release_axis(axis.code);
        }
    }
    controller.set_input_pressed(&input.name);
}

pub fn release_input(input: &ParsedInput, console: &GameConsole, controller: &dyn VirtualController) {
    if console.is_blank(&input.name) {
        return;
    }
    if let Some(axis) = console.get_axis(&input.name, input.percent) {
        controller.release_axis(axis.code);
        if let Some(button) = console.get_button(&input.name) {
            controller.release_button(button);
        }
    } else if let Some(button) = console.get_button(&input.name) {
        controller.release_button(button);
        if let Some(axis) = console.axis_value(&input.name) {
            controller.release_axis(axis.code);
        }
    }
    controller.set_input_released(&input.name);
}
