//! Virtual-clock timers
//!
//! Timers hold plain data rather than closures. The clock only moves when the
//! owner advances it, so a whole game can be fast-forwarded in tests while the
//! browser host simply feeds it frame deltas.

/// Scheduling seam used by the playback scheduler
pub trait Scheduler<A> {
    /// Fire `action` once `delay_ms` has elapsed from now
    fn schedule_after(&mut self, delay_ms: u32, action: A);
    /// Drop every pending timer, returning the dropped actions in due order
    fn cancel_all(&mut self) -> Vec<A>;
}

#[derive(Debug, Clone)]
struct Timer<A> {
    due_ms: u64,
    /// Insertion order, breaks ties between equal due times
    seq: u64,
    action: A,
}

/// Single-threaded timer queue over a millisecond virtual clock
#[derive(Debug, Clone)]
pub struct TimerQueue<A> {
    now_ms: u64,
    next_seq: u64,
    /// Sorted by (due_ms, seq)
    pending: Vec<Timer<A>>,
}

impl<A> Default for TimerQueue<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> TimerQueue<A> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_seq: 0,
            pending: Vec::new(),
        }
    }

    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Take the earliest timer due at or before `until_ms`.
    ///
    /// The clock jumps to that timer's due time, so anything scheduled while
    /// handling it is relative to when it fired.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<A> {
        if self.pending.first()?.due_ms > until_ms {
            return None;
        }
        let timer = self.pending.remove(0);
        self.now_ms = self.now_ms.max(timer.due_ms);
        Some(timer.action)
    }

    /// Settle the clock at `target_ms` (never moves backwards)
    pub fn advance_to(&mut self, target_ms: u64) {
        self.now_ms = self.now_ms.max(target_ms);
    }
}

impl<A> Scheduler<A> for TimerQueue<A> {
    fn schedule_after(&mut self, delay_ms: u32, action: A) {
        let due_ms = self.now_ms.saturating_add(u64::from(delay_ms));
        let seq = self.next_seq;
        self.next_seq += 1;
        let at = self
            .pending
            .partition_point(|t| (t.due_ms, t.seq) <= (due_ms, seq));
        self.pending.insert(
            at,
            Timer {
                due_ms,
                seq,
                action,
            },
        );
    }

    fn cancel_all(&mut self) -> Vec<A> {
        self.pending.drain(..).map(|t| t.action).collect()
    }
}
