//! Debounce gate for volatile inputs.
//!
//! One [`Debouncer`] per logical field. Each call to [`Debouncer::schedule`]
//! replaces whatever was pending for that field, so only the last value of a
//! burst is delivered. Pending work is dropped, not flushed, when the gate is
//! cancelled or dropped: an edit still inside its quiet period when the
//! surface goes away is lost.

use std::sync::Mutex;
use std::time::Duration;

use log::debug;
use tokio::task::JoinHandle;

/// Cancellable delayed delivery of the latest value for a single field.
///
/// Must be used from within a Tokio runtime.
pub struct Debouncer<T> {
    name: &'static str,
    pending: Mutex<Option<JoinHandle<()>>>,
    _value: std::marker::PhantomData<fn(T)>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a gate. `name` only shows up in logs.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            pending: Mutex::new(None),
            _value: std::marker::PhantomData,
        }
    }

    /// Deliver `value` to `callback` once `delay` passes without another call
    /// to `schedule`. Any previously scheduled delivery is cancelled first.
    pub fn schedule<F>(&self, value: T, delay: Duration, callback: F)
    where
        F: FnOnce(T) + Send + 'static,
    {
        let name = self.name;
        let mut pending = self.lock_pending();
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!("Debounce gate '{}' delivering after {:?}", name, delay);
            callback(value);
        }));
    }

    /// Drop the pending delivery, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.lock_pending().take() {
            previous.abort();
            debug!("Debounce gate '{}' cancelled", self.name);
        }
    }

    /// Whether a delivery is scheduled and has not run yet.
    pub fn is_pending(&self) -> bool {
        self.lock_pending()
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        // The slot only ever holds a join handle, so poisoning is harmless.
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        let slot = match self.pending.get_mut() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn() -> Box<dyn FnOnce(String) + Send>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        let make = move || {
            let sink = sink.clone();
            Box::new(move |value: String| sink.lock().unwrap().push(value))
                as Box<dyn FnOnce(String) + Send>
        };
        (calls, make)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_delivers_only_last_value() {
        let gate = Debouncer::new("search");
        let (calls, callback) = recorder();

        gate.schedule("a".to_string(), Duration::from_millis(400), callback());
        tokio::time::sleep(Duration::from_millis(100)).await;
        gate.schedule("ab".to_string(), Duration::from_millis(400), callback());

        tokio::time::sleep(Duration::from_millis(1_000)).await;

        assert_eq!(*calls.lock().unwrap(), vec!["ab".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_delivered_before_quiet_period() {
        let gate = Debouncer::new("min_price");
        let (calls, callback) = recorder();

        gate.schedule("1500".to_string(), Duration::from_millis(500), callback());
        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(calls.lock().unwrap().is_empty());
        assert!(gate.is_pending());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(*calls.lock().unwrap(), vec!["1500".to_string()]);
        assert!(!gate.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separated_edits_are_both_delivered() {
        let gate = Debouncer::new("search");
        let (calls, callback) = recorder();

        gate.schedule("phone".to_string(), Duration::from_millis(400), callback());
        tokio::time::sleep(Duration::from_millis(450)).await;
        gate.schedule("phones".to_string(), Duration::from_millis(400), callback());
        tokio::time::sleep(Duration::from_millis(450)).await;

        assert_eq!(
            *calls.lock().unwrap(),
            vec!["phone".to_string(), "phones".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_value() {
        let gate = Debouncer::new("search");
        let (calls, callback) = recorder();

        gate.schedule("ipad".to_string(), Duration::from_millis(400), callback());
        gate.cancel();
        tokio::time::sleep(Duration::from_millis(1_000)).await;

        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_drops_pending_value() {
        let (calls, callback) = recorder();
        {
            let gate = Debouncer::new("max_price");
            gate.schedule("90000".to_string(), Duration::from_millis(500), callback());
        }
        tokio::time::sleep(Duration::from_millis(1_000)).await;

        assert!(calls.lock().unwrap().is_empty());
    }
}
