use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Collapses bursts of calls into one trailing call.
///
/// Every [`Debouncer::call`] cancels the call still waiting and schedules a
/// new one `delay` later, so only the last call of a burst reaches the
/// callback, with its own arguments. Work the callback has already started
/// is never cancelled. Calls must happen inside a tokio runtime.
pub struct Debouncer<A> {
    delay: Duration,
    callback: Arc<dyn Fn(A) + Send + Sync>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<A: Send + 'static> Debouncer<A> {
    pub fn new<F>(delay: Duration, callback: F) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            delay,
            callback: Arc::new(callback),
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn call(&self, args: A) {
        let callback = Arc::clone(&self.callback);
        let delay = self.delay;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback(args);
        });

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.replace(timer) {
            previous.abort();
        }
    }

    /// Drops the scheduled call, if any.
    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(timer) = pending.take() {
            timer.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        let pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.as_ref().is_some_and(|timer| !timer.is_finished())
    }
}

impl<A> Drop for Debouncer<A> {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(timer) = pending.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(String) + Send + Sync + 'static) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        (calls, move |arg: String| sink.lock().unwrap().push(arg))
    }

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_into_last_call() {
        let (calls, callback) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(300), callback);

        for query in ["c", "ca", "cat"] {
            debouncer.call(query.to_string());
            sleep(Duration::from_millis(100)).await;
        }
        assert!(calls.lock().unwrap().is_empty());
        assert!(debouncer.is_pending());

        sleep(Duration::from_millis(250)).await;
        assert_eq!(*calls.lock().unwrap(), vec!["cat".to_string()]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn calls_separated_by_quiet_period_all_fire() {
        let (calls, callback) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(50), callback);

        debouncer.call("first".to_string());
        sleep(Duration::from_millis(80)).await;
        debouncer.call("second".to_string());
        sleep(Duration::from_millis(80)).await;

        assert_eq!(*calls.lock().unwrap(), vec!["first".to_string(), "second".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_and_drop_discard_pending_call() {
        let (calls, callback) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(50), callback);

        debouncer.call("cancelled".to_string());
        debouncer.cancel();
        sleep(Duration::from_millis(100)).await;
        assert!(calls.lock().unwrap().is_empty());

        debouncer.call("dropped".to_string());
        drop(debouncer);
        sleep(Duration::from_millis(100)).await;
        assert!(calls.lock().unwrap().is_empty());
    }
}
