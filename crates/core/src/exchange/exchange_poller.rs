//! Fixed-interval exchange rate refresh.
//!
//! One immediate fetch on start, then one per interval until stopped. Ticks
//! are serialized: the next tick is not awaited until the previous fetch has
//! been applied. A failed tick clears the rate to "unavailable" instead of
//! keeping a stale value.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, warn};
use rust_decimal::Decimal;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use super::exchange_model::PollState;
use super::exchange_traits::ExchangeRateApiTrait;

/// Handle to a running exchange rate poll. Stops on drop.
///
/// `PollState::active` is the only stop flag. It is read and written under
/// the channel lock, so once [`ExchangeRatePoller::stop`] returns no fetch can
/// change the published rate.
pub struct ExchangeRatePoller {
    state: Arc<watch::Sender<PollState>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ExchangeRatePoller {
    /// Start polling `api` every `period`. Must be called within a Tokio
    /// runtime.
    pub fn start(api: Arc<dyn ExchangeRateApiTrait>, period: Duration) -> Self {
        let (state, _) = watch::channel(PollState {
            rate: None,
            active: true,
        });
        let state = Arc::new(state);

        let task = tokio::spawn(poll_loop(api, period, state.clone()));
        debug!("Exchange rate poller started ({:?} interval)", period);

        Self {
            state,
            task: Mutex::new(Some(task)),
        }
    }

    pub fn current(&self) -> PollState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state.subscribe()
    }

    pub fn is_active(&self) -> bool {
        self.state.borrow().active
    }

    /// Stop polling. No further tick fires and a fetch still in flight is
    /// not applied. Idempotent.
    pub fn stop(&self) {
        let stopped_now = self.state.send_if_modified(|state| {
            if !state.active {
                return false;
            }
            state.active = false;
            true
        });
        if !stopped_now {
            return;
        }
        let task = self
            .task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(task) = task {
            task.abort();
        }
        debug!("Exchange rate poller stopped");
    }
}

impl Drop for ExchangeRatePoller {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Publish the outcome of one tick. Returns `false`, leaving the state
/// untouched, when the poller has been stopped.
fn publish(state: &watch::Sender<PollState>, rate: Option<Decimal>) -> bool {
    let mut live = true;
    state.send_if_modified(|current| {
        if !current.active {
            live = false;
            return false;
        }
        if current.rate == rate {
            return false;
        }
        current.rate = rate;
        true
    });
    live
}

async fn poll_loop(
    api: Arc<dyn ExchangeRateApiTrait>,
    period: Duration,
    state: Arc<watch::Sender<PollState>>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if !state.borrow().active {
            break;
        }

        let rate = match api.get_exchange_rate().await {
            Ok(rate) if rate.rate > Decimal::ZERO => Some(rate.rate),
            Ok(rate) => {
                warn!("Ignoring non-positive exchange rate {}", rate.rate);
                None
            }
            Err(e) => {
                warn!("Exchange rate refresh failed: {}", e);
                None
            }
        };

        if !publish(&state, rate) {
            debug!("Discarding exchange rate fetched after stop");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedRateApi;
    use rust_decimal_macros::dec;

    const MINUTE: Duration = Duration::from_secs(60);

    #[tokio::test(start_paused = true)]
    async fn test_fetches_immediately_on_start() {
        let api = Arc::new(ScriptedRateApi::new(vec![Ok(dec!(90.5))]));
        let poller = ExchangeRatePoller::start(api.clone(), MINUTE);

        let mut rx = poller.subscribe();
        let state = *rx.wait_for(|s| s.rate.is_some()).await.unwrap();

        assert_eq!(state.rate, Some(dec!(90.5)));
        assert!(state.active);
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_tick_clears_rate() {
        let api = Arc::new(ScriptedRateApi::new(vec![
            Ok(dec!(90)),
            Err("boom"),
            Ok(dec!(91.25)),
        ]));
        let poller = ExchangeRatePoller::start(api.clone(), MINUTE);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(poller.current().rate, Some(dec!(90)));

        tokio::time::sleep(MINUTE).await;
        assert_eq!(poller.current().rate, None);
        assert_eq!(poller.current().usable_rate(), None);

        tokio::time::sleep(MINUTE).await;
        assert_eq!(poller.current().rate, Some(dec!(91.25)));
        assert_eq!(api.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_positive_rate_is_unavailable() {
        let api = Arc::new(ScriptedRateApi::new(vec![Ok(dec!(0))]));
        let poller = ExchangeRatePoller::start(api, MINUTE);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(poller.current().rate, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_prevents_further_ticks() {
        let api = Arc::new(ScriptedRateApi::new(vec![Ok(dec!(90)), Ok(dec!(95))]));
        let poller = ExchangeRatePoller::start(api.clone(), MINUTE);

        tokio::time::sleep(Duration::from_secs(1)).await;
        poller.stop();
        tokio::time::sleep(MINUTE * 5).await;

        assert_eq!(api.calls(), 1);
        assert!(!poller.is_active());
        assert!(!poller.current().active);
        assert_eq!(poller.current().rate, Some(dec!(90)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_result_not_applied_after_stop() {
        let api = Arc::new(
            ScriptedRateApi::new(vec![Ok(dec!(90))]).with_delay(Duration::from_secs(10)),
        );
        let poller = ExchangeRatePoller::start(api.clone(), MINUTE);
        let rx = poller.subscribe();

        tokio::time::sleep(Duration::from_secs(1)).await;
        poller.stop();
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(api.calls(), 1);
        assert_eq!(rx.borrow().rate, None);
    }

    #[test]
    fn test_publish_after_stop_leaves_state_untouched() {
        let (state, rx) = watch::channel(PollState {
            rate: Some(dec!(90)),
            active: true,
        });

        assert!(publish(&state, Some(dec!(91))));
        assert_eq!(rx.borrow().rate, Some(dec!(91)));

        state.send_modify(|s| s.active = false);
        assert!(!publish(&state, Some(dec!(95))));
        assert!(!publish(&state, None));
        assert_eq!(
            *rx.borrow(),
            PollState {
                rate: Some(dec!(91)),
                active: false,
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_fetch_does_not_overlap_next_tick() {
        let api = Arc::new(
            ScriptedRateApi::new(vec![Ok(dec!(90)), Ok(dec!(91)), Ok(dec!(92))])
                .with_delay(Duration::from_secs(90)),
        );
        let poller = ExchangeRatePoller::start(api.clone(), MINUTE);

        tokio::time::sleep(Duration::from_secs(100)).await;
        assert_eq!(api.max_in_flight(), 1);
        assert_eq!(poller.current().rate, Some(dec!(90)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_polling() {
        let api = Arc::new(ScriptedRateApi::new(vec![Ok(dec!(90)), Ok(dec!(95))]));
        {
            let _poller = ExchangeRatePoller::start(api.clone(), MINUTE);
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
        tokio::time::sleep(MINUTE * 3).await;
        assert_eq!(api.calls(), 1);
    }
}
