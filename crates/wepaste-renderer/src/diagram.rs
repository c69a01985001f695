//! Debounced scheduling for the diagram renderer.
//!
//! Every mermaid fence rendered re-arms the scheduler; only the most recent
//! arming fires after the quiet period, so a document full of diagrams
//! triggers one diagram pass, not one per fence. The pass itself is
//! fire-and-forget and never awaited by rendering.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Entry point of the external diagram renderer.
pub trait DiagramRunner: Send {
    /// Run the diagram pass over the current document.
    fn run(&self);
}

impl<F: Fn() + Send> DiagramRunner for F {
    fn run(&self) {
        self();
    }
}

/// Pending diagram pass.
struct Pending {
    deadline: Instant,
    generation: u64,
}

/// Latest-wins debounce around a [`DiagramRunner`].
pub struct DiagramScheduler {
    pending: Mutex<Option<Pending>>,
    delay: Duration,
    generation: Mutex<u64>,
}

impl DiagramScheduler {
    /// Create a scheduler with the given quiet period.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            pending: Mutex::new(None),
            delay,
            generation: Mutex::new(0),
        }
    }

    /// Arm (or re-arm) the scheduler. Cancels any earlier pending pass.
    pub fn schedule(&self) {
        let mut generation = self.generation.lock().unwrap();
        *generation += 1;
        let mut pending = self.pending.lock().unwrap();
        *pending = Some(Pending {
            deadline: Instant::now() + self.delay,
            generation: *generation,
        });
    }

    /// Whether a pass is armed.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.pending.lock().unwrap().is_some()
    }

    /// Fire the runner if the quiet period has elapsed.
    ///
    /// Returns `true` when the runner fired. A pass re-armed after its
    /// deadline was read stays pending for the next poll.
    pub fn run_if_due(&self, runner: &dyn DiagramRunner) -> bool {
        let due = {
            let pending = self.pending.lock().unwrap();
            match pending.as_ref() {
                Some(p) if p.deadline <= Instant::now() => Some(p.generation),
                _ => None,
            }
        };
        let Some(generation) = due else {
            return false;
        };

        runner.run();

        // Clear only if no newer arming happened while the runner ran.
        let mut pending = self.pending.lock().unwrap();
        if pending.as_ref().is_some_and(|p| p.generation == generation) {
            *pending = None;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use super::*;

    #[test]
    fn test_not_due_before_deadline() {
        let scheduler = DiagramScheduler::new(Duration::from_millis(50));
        let runs = AtomicUsize::new(0);
        scheduler.schedule();

        let fired = scheduler.run_if_due(&|| {
            runs.fetch_add(1, Ordering::SeqCst);
        });
        assert!(!fired);
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert!(scheduler.is_armed());
    }

    #[test]
    fn test_fires_once_after_deadline() {
        let scheduler = DiagramScheduler::new(Duration::from_millis(5));
        let runs = AtomicUsize::new(0);
        scheduler.schedule();
        thread::sleep(Duration::from_millis(10));

        let counter = || {
            runs.fetch_add(1, Ordering::SeqCst);
        };
        assert!(scheduler.run_if_due(&counter));
        assert!(!scheduler.run_if_due(&counter));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_rearming_coalesces() {
        let scheduler = DiagramScheduler::new(Duration::from_millis(5));
        let runs = AtomicUsize::new(0);

        // Many fences rendered in a burst arm the scheduler repeatedly.
        for _ in 0..10 {
            scheduler.schedule();
        }
        thread::sleep(Duration::from_millis(10));

        let counter = || {
            runs.fetch_add(1, Ordering::SeqCst);
        };
        while scheduler.run_if_due(&counter) {}
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }
}
