//! Periodic game clock.
//!
//! One tick every [`TICK_PERIOD_MS`]. Each tick bumps the monotonic tick
//! counter and wakes the steering task, which in turn wakes physics.

use core::sync::atomic::{
    AtomicU32,
    Ordering,
};

use embassy_time::{
    Duration,
    Ticker,
};

use crate::config::TICK_PERIOD_MS;
use crate::sync::Wake;

pub struct GameClock {
    ticks: AtomicU32,
    tick: Wake,
}

impl GameClock {
    pub const fn new() -> Self {
        Self {
            ticks: AtomicU32::new(0),
            tick: Wake::new(),
        }
    }

    /// Advance game time by one tick and wake the tick waiter.
    pub fn tick(&self) -> u32 {
        let now = self.ticks.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        self.tick.signal(());
        now
    }

    /// Ticks since boot.
    pub fn ticks(&self) -> u32 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Wait for the next tick.
    pub async fn wait_tick(&self) {
        self.tick.wait().await;
    }

    /// Drive the clock forever.
    pub async fn run(&self) -> ! {
        let mut ticker = Ticker::every(Duration::from_millis(TICK_PERIOD_MS));
        loop {
            ticker.next().await;
            self.tick();
        }
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}
