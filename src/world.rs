//! The shared world: two mutexes over the two state groups.
//!
//! Lock order is always player state, then platform state. Holding both is
//! only possible through [`World::lock_both`], whose guard gives them back in
//! reverse order.

use embassy_sync::mutex::MutexGuard;

use crate::state::{
    PlatformState,
    PlayerState,
};
use crate::sync::{
    Mutex,
    RawMutex,
};

pub struct World {
    player: Mutex<PlayerState>,
    platform: Mutex<PlatformState>,
}

/// Both world locks, taken in order.
///
/// Fields drop in declaration order, so the platform lock is released before
/// the player lock.
pub struct WorldGuard<'a> {
    pub platform: MutexGuard<'a, RawMutex, PlatformState>,
    pub player: MutexGuard<'a, RawMutex, PlayerState>,
}

impl World {
    pub const fn new() -> Self {
        Self {
            player: Mutex::new(PlayerState::new()),
            platform: Mutex::new(PlatformState::new()),
        }
    }

    pub async fn lock_both(&self) -> WorldGuard<'_> {
        let player = self.player.lock().await;
        let platform = self.platform.lock().await;
        WorldGuard { platform, player }
    }

    pub async fn lock_player(&self) -> MutexGuard<'_, RawMutex, PlayerState> {
        self.player.lock().await
    }

    pub async fn lock_platform(&self) -> MutexGuard<'_, RawMutex, PlatformState> {
        self.platform.lock().await
    }

    /// Start a new round: layout regenerated, statistics, game state and
    /// platform back to their initial values.
    pub async fn reset(&self) {
        let mut world = self.lock_both().await;
        world.player.reset();
        world.platform.reset();
        info!("world reset");
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
