//! Demonstration counter published on the `count` channel.
//!
//! Ticks on a fixed period, independent of any mutation. It exists to show
//! that the bus is a general broadcast primitive.

use crate::bus::{Payload, TopicBus, COUNT_CHANNEL};
use crossbeam_channel::{bounded, select, tick, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info};

/// Handle to a running counter thread. Dropping it stops the thread.
pub struct Ticker {
    shutdown: Option<Sender<()>>,
    handle: Option<JoinHandle<u64>>,
}

impl Ticker {
    /// Start publishing 1, 2, 3, ... on [`COUNT_CHANNEL`] every `interval`.
    pub fn start(bus: TopicBus, interval: Duration) -> Self {
        let (shutdown, shutdown_rx) = bounded(0);
        let handle = thread::spawn(move || run(bus, interval, shutdown_rx));

        info!(?interval, "count ticker started");

        Self {
            shutdown: Some(shutdown),
            handle: Some(handle),
        }
    }

    /// Stop the thread and return the last value published.
    pub fn stop(mut self) -> u64 {
        self.shutdown_and_join()
    }

    fn shutdown_and_join(&mut self) -> u64 {
        // Disconnecting the shutdown channel wakes the select below.
        self.shutdown.take();
        let count = self
            .handle
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or(0);
        info!(count, "count ticker stopped");
        count
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.shutdown_and_join();
        }
    }
}

fn run(bus: TopicBus, interval: Duration, shutdown: Receiver<()>) -> u64 {
    let ticks = tick(interval);
    let mut count = 0u64;

    loop {
        select! {
            recv(ticks) -> _ => {
                count += 1;
                let delivered = bus.publish(COUNT_CHANNEL, Payload::Count(count));
                debug!(count, delivered, "tick");
            }
            recv(shutdown) -> _ => break,
        }
    }

    count
}
