//! Live leaderboard delivery.
//!
//! A [`LiveChannel`] runs one ticker per hackathon with at least one
//! subscriber. Every tick recomputes the leaderboard once and fans the
//! resulting [`Snapshot`] out to all callbacks registered for that
//! hackathon. The first subscriber starts the ticker and the last
//! unsubscribe stops it.
//!
//! The channel owns its subscriptions: [`LiveChannel::disconnect`] stops every
//! ticker and every subscription handed out since the last connect.

use std::collections::{BTreeMap, HashMap};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::config::LeaderboardConfig;
use crate::error::{LeaderboardError, Result};
use crate::leaderboard::LeaderboardService;
use crate::model::{LeaderboardEntry, Snapshot};
use crate::ranking::RankingEngine;
use crate::store::Directory;

const MIN_PERIOD: Duration = Duration::from_millis(1);

type Callback = Arc<dyn Fn(&Snapshot) + Send + Sync>;

#[derive(Clone)]
struct Subscriber {
    callback: Callback,
    active: Arc<AtomicBool>,
}

struct Topic {
    subscribers: BTreeMap<u64, Subscriber>,
    ticker: CancellationToken,
}

#[derive(Default)]
struct Registry {
    connection: Option<CancellationToken>,
    topics: HashMap<u32, Topic>,
    next_id: u64,
}

impl Registry {
    /// Stop every ticker and deactivate every subscriber.
    fn teardown(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.cancel();
        }
        for (_, topic) in self.topics.drain() {
            topic.ticker.cancel();
            for subscriber in topic.subscribers.values() {
                subscriber.active.store(false, Ordering::SeqCst);
            }
        }
    }
}

#[derive(Default)]
struct Shared {
    registry: Mutex<Registry>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Subscribers the ticker owning `cancel` may deliver to.
    ///
    /// A cancelled ticker gets nothing, even when a newer topic for the same
    /// hackathon has been registered since.
    fn subscribers(&self, hackathon_id: u32, cancel: &CancellationToken) -> Vec<Subscriber> {
        let registry = self.lock();
        if cancel.is_cancelled() {
            return Vec::new();
        }
        registry
            .topics
            .get(&hackathon_id)
            .filter(|topic| !topic.ticker.is_cancelled())
            .map(|topic| topic.subscribers.values().cloned().collect())
            .unwrap_or_default()
    }

    fn remove(&self, hackathon_id: u32, id: u64) {
        let mut registry = self.lock();
        let Some(topic) = registry.topics.get_mut(&hackathon_id) else {
            return;
        };
        topic.subscribers.remove(&id);
        if topic.subscribers.is_empty() {
            topic.ticker.cancel();
            registry.topics.remove(&hackathon_id);
            info!(hackathon_id, "last subscriber left, stopping ticker");
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        self.registry
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .teardown();
    }
}

/// Lifecycle state of a [`Subscription`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SubscriptionState {
    Active,
    Stopped,
}

/// Handle to one live subscription.
///
/// Dropping the handle unsubscribes it.
#[must_use = "dropping a Subscription unsubscribes it immediately"]
pub struct Subscription {
    id: u64,
    hackathon_id: u32,
    active: Arc<AtomicBool>,
    shared: Weak<Shared>,
}

impl Subscription {
    pub fn hackathon_id(&self) -> u32 {
        self.hackathon_id
    }

    pub fn state(&self) -> SubscriptionState {
        if self.active.load(Ordering::SeqCst) {
            SubscriptionState::Active
        } else {
            SubscriptionState::Stopped
        }
    }

    /// Stop delivery to this subscription.
    ///
    /// Calling it again, or after the channel disconnected, does nothing.
    /// A callback already running when this is called runs to completion.
    pub fn unsubscribe(&self) {
        if !self.active.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Some(shared) = self.shared.upgrade() {
            shared.remove(self.hackathon_id, self.id);
        }
        debug!(
            hackathon_id = self.hackathon_id,
            subscription = self.id,
            "unsubscribed from leaderboard updates"
        );
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("hackathon_id", &self.hackathon_id)
            .field("state", &self.state())
            .finish()
    }
}

/// Periodic leaderboard push to any number of subscribers.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> hackathon_leaderboard::Result<()> {
/// use std::sync::Arc;
/// use hackathon_leaderboard::{LeaderboardConfig, LiveChannel, MemoryStore};
///
/// let channel = LiveChannel::new(Arc::new(MemoryStore::seeded()), &LeaderboardConfig::default());
/// channel.connect();
///
/// let initial = channel.snapshot(1).await?;
/// let subscription = channel.subscribe(1, |snapshot| {
///     println!("{} entries", snapshot.entries.len());
/// })?;
///
/// // ... later
/// subscription.unsubscribe();
/// channel.disconnect();
/// # Ok(())
/// # }
/// ```
pub struct LiveChannel<D> {
    service: LeaderboardService<D>,
    interval: Duration,
    shared: Arc<Shared>,
}

impl<D> Clone for LiveChannel<D> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            interval: self.interval,
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<D: Directory> LiveChannel<D> {
    pub fn new(directory: Arc<D>, config: &LeaderboardConfig) -> Self {
        Self::with_service(
            LeaderboardService::new(directory, RankingEngine::new(config.ranking)),
            config.tick_interval(),
        )
    }

    pub fn with_service(service: LeaderboardService<D>, interval: Duration) -> Self {
        Self {
            service,
            interval,
            shared: Arc::new(Shared::default()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// One-shot read, faults propagate. See [`LeaderboardService::snapshot`].
    pub async fn snapshot(&self, hackathon_id: u32) -> Result<Vec<LeaderboardEntry>> {
        self.service.snapshot(hackathon_id).await
    }

    /// Open the channel. Connecting an open channel does nothing.
    pub fn connect(&self) {
        let mut registry = self.shared.lock();
        if registry.connection.is_none() {
            registry.connection = Some(CancellationToken::new());
            info!("live channel connected");
        }
    }

    /// Close the channel, stopping every ticker and subscription.
    ///
    /// Existing [`Subscription`] handles report [`SubscriptionState::Stopped`]
    /// afterwards and stay stopped after a reconnect.
    pub fn disconnect(&self) {
        let mut registry = self.shared.lock();
        if registry.connection.is_none() {
            return;
        }
        let topics = registry.topics.len();
        registry.teardown();
        info!(topics, "live channel disconnected");
    }

    pub fn is_connected(&self) -> bool {
        self.shared.lock().connection.is_some()
    }

    /// Hackathons that currently have a running ticker, in ascending order.
    pub fn active_topics(&self) -> Vec<u32> {
        let mut topics: Vec<u32> = self.shared.lock().topics.keys().copied().collect();
        topics.sort_unstable();
        topics
    }

    pub fn subscriber_count(&self, hackathon_id: u32) -> usize {
        self.shared
            .lock()
            .topics
            .get(&hackathon_id)
            .map_or(0, |topic| topic.subscribers.len())
    }

    /// Receive a fresh snapshot of `hackathon_id` on every tick.
    ///
    /// The first delivery happens one full interval after the hackathon's
    /// ticker starts. Failed ticks are logged and skipped; the callback only
    /// ever sees successful snapshots.
    ///
    /// # Panics
    ///
    /// Starting a ticker spawns a task, so this must be called from within a
    /// Tokio runtime.
    #[instrument(skip(self, callback))]
    pub fn subscribe<F>(&self, hackathon_id: u32, callback: F) -> Result<Subscription>
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        let mut registry = self.shared.lock();
        let connection = registry
            .connection
            .clone()
            .ok_or(LeaderboardError::Disconnected)?;

        registry.next_id += 1;
        let id = registry.next_id;
        let active = Arc::new(AtomicBool::new(true));

        let topic = registry.topics.entry(hackathon_id).or_insert_with(|| {
            let ticker = connection.child_token();
            tokio::spawn(run_ticker(
                self.service.clone(),
                Arc::downgrade(&self.shared),
                hackathon_id,
                ticker.clone(),
                self.interval,
            ));
            info!(hackathon_id, "started leaderboard ticker");
            Topic {
                subscribers: BTreeMap::new(),
                ticker,
            }
        });
        topic.subscribers.insert(
            id,
            Subscriber {
                callback: Arc::new(callback),
                active: Arc::clone(&active),
            },
        );
        debug!(
            subscription = id,
            subscribers = topic.subscribers.len(),
            "subscribed to leaderboard updates"
        );

        Ok(Subscription {
            id,
            hackathon_id,
            active,
            shared: Arc::downgrade(&self.shared),
        })
    }
}

async fn run_ticker<D: Directory>(
    service: LeaderboardService<D>,
    shared: Weak<Shared>,
    hackathon_id: u32,
    cancel: CancellationToken,
    period: Duration,
) {
    let period = period.max(MIN_PERIOD);
    let mut ticks = interval_at(Instant::now() + period, period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticks.tick() => {}
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = service.snapshot(hackathon_id) => result,
        };

        let entries = match result {
            Ok(entries) => entries,
            Err(err) => {
                warn!(hackathon_id, error = %err, "leaderboard tick failed, retrying next tick");
                continue;
            }
        };

        let Some(live) = shared.upgrade() else {
            break;
        };
        let snapshot = Snapshot {
            hackathon_id,
            entries,
            computed_at: Utc::now(),
        };
        deliver(&live.subscribers(hackathon_id, &cancel), &snapshot);
    }

    debug!(hackathon_id, "leaderboard ticker stopped");
}

fn deliver(subscribers: &[Subscriber], snapshot: &Snapshot) {
    for subscriber in subscribers {
        if !subscriber.active.load(Ordering::SeqCst) {
            continue;
        }
        let callback = &subscriber.callback;
        if catch_unwind(AssertUnwindSafe(|| callback(snapshot))).is_err() {
            error!(
                hackathon_id = snapshot.hackathon_id,
                "leaderboard subscriber panicked"
            );
        }
    }
}
