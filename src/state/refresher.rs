use crate::state::messages::NetworkRequest;
use log::debug;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

pub const LIVE_GAMES_PERIOD: Duration = Duration::from_secs(60);
pub const GAME_DETAIL_PERIOD: Duration = Duration::from_secs(15);

/// Re-issues one request on a fixed period until stopped or dropped.
///
/// The first tick is skipped since whoever starts a poller loads the data
/// right away. A cycle waits for the worker to answer before the next tick
/// is taken, so cycles never overlap.
pub struct Poller {
    name: &'static str,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    pub fn start<F>(
        name: &'static str,
        period: Duration,
        network_requests: mpsc::Sender<NetworkRequest>,
        make_request: F,
    ) -> Self
    where
        F: Fn() -> NetworkRequest + Send + 'static,
    {
        debug!("starting {name} poller every {period:?}");
        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let (done_tx, done_rx) = oneshot::channel();
                let poll = NetworkRequest::Poll {
                    request: Box::new(make_request()),
                    done: done_tx,
                };
                if network_requests.send(poll).await.is_err() {
                    break;
                }
                if done_rx.await.is_err() {
                    break;
                }
            }
        });
        Self { name, handle: Some(handle) }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!("stopping {} poller", self.name);
            handle.abort();
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, timeout};

    const PERIOD: Duration = Duration::from_millis(20);

    fn start(requests: mpsc::Sender<NetworkRequest>) -> Poller {
        Poller::start("test", PERIOD, requests, || NetworkRequest::LoadLiveGames)
    }

    #[tokio::test]
    async fn first_cycle_waits_one_period() {
        let (tx, mut rx) = mpsc::channel(8);
        let _poller = start(tx);

        sleep(PERIOD / 2).await;
        assert!(rx.try_recv().is_err(), "polled before the first period elapsed");

        let request = timeout(Duration::from_secs(1), rx.recv()).await.unwrap().unwrap();
        match request {
            NetworkRequest::Poll { request, done } => {
                assert!(matches!(*request, NetworkRequest::LoadLiveGames));
                let _ = done.send(());
            }
            other => panic!("expected a poll, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn cycles_do_not_overlap() {
        let (tx, mut rx) = mpsc::channel(8);
        let _poller = start(tx);

        for _ in 0..3 {
            let Some(NetworkRequest::Poll { done, .. }) = rx.recv().await else {
                panic!("expected a poll");
            };
            // Several periods pass while this cycle is still being served.
            sleep(PERIOD * 4).await;
            assert!(rx.try_recv().is_err(), "next cycle started before completion");
            done.send(()).unwrap();
        }
    }

    #[tokio::test]
    async fn stop_and_drop_end_the_task() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut poller = start(tx.clone());
        assert!(poller.is_running());
        poller.stop();
        assert!(!poller.is_running());

        let dropped = start(tx);
        drop(dropped);

        // Both tasks are gone, so both senders are released.
        let closed = timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
        assert!(closed.is_none());
    }
}
