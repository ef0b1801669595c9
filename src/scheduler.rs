/// Discrete-event timer service keyed by simulated milliseconds
///
/// Timers never run code themselves. They carry an event value which the
/// owner receives from [`Scheduler::advance`] and dispatches between frames.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer<E> {
    id: TimerId,
    due_ms: u64,
    /// Repeat interval for looping timers
    interval_ms: Option<u64>,
    event: E,
}

#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    now_ms: u64,
    next_id: u64,
    timers: Vec<Timer<E>>,
}

impl<E: Clone> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 0,
            timers: Vec::new(),
        }
    }

    /// Current simulated time
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedules `event` once, `delay_ms` from now
    pub fn after(&mut self, delay_ms: u64, event: E) -> TimerId {
        self.insert(delay_ms, None, event)
    }

    /// Schedules `event` every `interval_ms`, first firing one interval from now
    pub fn every(&mut self, interval_ms: u64, event: E) -> TimerId {
        let interval_ms = interval_ms.max(1);
        self.insert(interval_ms, Some(interval_ms), event)
    }

    fn insert(&mut self, delay_ms: u64, interval_ms: Option<u64>, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due_ms: self.now_ms + delay_ms,
            interval_ms,
            event,
        });
        id
    }

    /// Removes a pending timer. Returns false if it already expired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    pub fn pending_count(&self) -> usize {
        self.timers.len()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    /// Moves the clock forward and returns every event that came due, in due
    /// order. Timers due at the same instant keep their registration order.
    /// A looping timer fires once per elapsed interval.
    pub fn advance(&mut self, dt_ms: u64) -> Vec<E> {
        let target = self.now_ms + dt_ms;
        let mut fired = Vec::new();

        loop {
            let next = self
                .timers
                .iter()
                .enumerate()
                .filter(|(_, t)| t.due_ms <= target)
                .min_by_key(|(_, t)| (t.due_ms, t.id))
                .map(|(idx, _)| idx);

            let Some(idx) = next else {
                break;
            };

            let timer = &mut self.timers[idx];
            fired.push(timer.event.clone());
            match timer.interval_ms {
                Some(interval) => timer.due_ms += interval,
                None => {
                    self.timers.swap_remove(idx);
                }
            }
        }

        self.now_ms = target;
        fired
    }
}
