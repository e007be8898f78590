//! Deferred command queue.
//!
//! Timed behavior (the marquee debounce) runs without a real event loop:
//! callers schedule a command with a due time and drive `due(now_ms)` from
//! their tick. Each entry is stamped with the queue's current epoch and
//! gesture sequence; a reset bumps the epoch and a new gesture bumps the
//! sequence, so stale entries fall out silently instead of firing into a
//! state that no longer expects them.

#[derive(Debug)]
struct Entry<T> {
    due_ms: f64,
    epoch: u64,
    gesture: u64,
    command: T,
}

#[derive(Debug)]
pub struct DeferredQueue<T> {
    entries: Vec<Entry<T>>,
    epoch: u64,
    gesture: u64,
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            epoch: 0,
            gesture: 0,
        }
    }
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `command` to fire at `due_ms`, bound to the current epoch
    /// and gesture.
    pub fn schedule(&mut self, due_ms: f64, command: T) {
        self.entries.push(Entry {
            due_ms,
            epoch: self.epoch,
            gesture: self.gesture,
            command,
        });
    }

    /// Invalidate everything scheduled so far. Used on engine reset and
    /// teardown.
    pub fn bump_epoch(&mut self) {
        self.epoch += 1;
        self.entries.clear();
    }

    /// Mark the start of a new gesture. Commands scheduled by earlier
    /// gestures are superseded and will never fire.
    pub fn next_gesture(&mut self) {
        self.gesture += 1;
    }

    /// Drain commands that are due at `now_ms` and still valid. Stale
    /// entries (older epoch or gesture) are dropped in the same pass.
    pub fn due(&mut self, now_ms: f64) -> Vec<T> {
        let epoch = self.epoch;
        let gesture = self.gesture;
        let mut fired = Vec::new();
        let mut keep = Vec::new();
        for entry in self.entries.drain(..) {
            if entry.epoch != epoch || entry.gesture != gesture {
                continue;
            }
            if entry.due_ms <= now_ms {
                fired.push(entry.command);
            } else {
                keep.push(entry);
            }
        }
        self.entries = keep;
        fired
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fires_only_when_due() {
        let mut q = DeferredQueue::new();
        q.schedule(100.0, "a");
        q.schedule(200.0, "b");
        assert_eq!(q.due(50.0), Vec::<&str>::new());
        assert_eq!(q.due(150.0), vec!["a"]);
        assert_eq!(q.due(250.0), vec!["b"]);
        assert!(q.is_empty());
    }

    #[test]
    fn superseding_gesture_drops_pending_commands() {
        let mut q = DeferredQueue::new();
        q.schedule(100.0, "stale");
        q.next_gesture();
        q.schedule(100.0, "fresh");
        assert_eq!(q.due(150.0), vec!["fresh"]);
        assert!(q.is_empty());
    }

    #[test]
    fn epoch_bump_invalidates_everything() {
        let mut q = DeferredQueue::new();
        q.schedule(100.0, "old");
        q.bump_epoch();
        assert_eq!(q.due(1000.0), Vec::<&str>::new());
    }
}
