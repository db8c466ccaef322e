//! Shared world state, split into the two lock groups.
//!
//! [`PlayerState`] sits behind the player-state mutex and [`PlatformState`]
//! behind the platform-state mutex (see [`crate::world::World`]). Both are
//! plain data: every field is reset in place by the round reset, nothing is
//! ever allocated or freed.

use crate::config::{
    CASTLE_COLUMNS,
    CASTLE_ROWS,
    DESTRUCTION_MAX,
    HITS_TO_DESTROY,
    PLATFORM_HEIGHT,
    PLATFORM_START_X,
    PLATFORM_START_Y,
    PLATFORM_WIDTH,
    SHIELD_CAPACITY,
    SHIELD_SCALE,
    WALL_COLUMNS,
    WALL_ROWS,
};
use crate::geometry::{
    Layout,
    Rect,
};

/// Level of a physical button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonState {
    Released,
    Pressed,
}

impl ButtonState {
    pub const fn is_pressed(self) -> bool {
        matches!(self, Self::Pressed)
    }
}

/// The two physical buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Hold to charge, release to fire. Also starts a new round from the menu.
    Railgun,
    /// Hold to raise the shield.
    Shield,
}

/// Discretised steering input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    HardLeft,
    GradualLeft,
    #[default]
    None,
    GradualRight,
    HardRight,
}

impl Direction {
    /// Platform acceleration per physics step.
    pub const fn acceleration(self) -> i16 {
        match self {
            Self::HardLeft => -2,
            Self::GradualLeft => -1,
            Self::None => 0,
            Self::GradualRight => 1,
            Self::HardRight => 2,
        }
    }
}

/// Round status. Crashed, exploded and ended are latched until the reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GameStatus {
    #[default]
    Active,
    Evacuating,
    PlatformCrashed,
    SatchelExploded,
    Ended,
}

impl GameStatus {
    /// Whether physics and input still advance the round.
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Active | Self::Evacuating)
    }
}

/// How a round finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    Crashed,
    Hit,
    Evacuated,
}

impl Outcome {
    pub const fn message(self) -> &'static str {
        match self {
            Self::Crashed => "YOU CRASHED",
            Self::Hit => "YOU GOT HIT",
            Self::Evacuated => "EVACUATION\nSUCCESS",
        }
    }
}

/// Signed velocity. Positive `x` points towards the castle (screen left),
/// positive `y` points up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Velocity {
    pub x: i16,
    pub y: i16,
}

impl Velocity {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Railgun {
    pub charge: u8,
    /// Set by the input task on release, consumed by the next physics step.
    pub fire: bool,
    pub charging: bool,
    pub projectile_active: bool,
    /// Launch parameters have been applied to the active projectile.
    pub launched: bool,
    /// Charge captured when the current shot was fired.
    pub shot_power: u8,
    pub velocity: Velocity,
}

impl Railgun {
    pub const fn new() -> Self {
        Self {
            charge: 0,
            fire: false,
            charging: false,
            projectile_active: false,
            launched: false,
            shot_power: 0,
            velocity: Velocity::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shield {
    /// The player is holding the shield button.
    pub active: bool,
    /// The shield actually protects this step (enough energy was left).
    pub protection: bool,
    /// Remaining energy in tenths of a unit.
    pub energy: u16,
}

impl Shield {
    pub const fn new() -> Self {
        Self {
            active: false,
            protection: false,
            energy: SHIELD_CAPACITY,
        }
    }

    /// Remaining energy in whole units.
    pub const fn remaining(&self) -> u16 {
        self.energy / SHIELD_SCALE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Satchel {
    pub active: bool,
    /// Spawned and falling; cleared to request a respawn.
    pub armed: bool,
    pub velocity: Velocity,
}

impl Satchel {
    pub const fn new() -> Self {
        Self {
            active: true,
            armed: false,
            velocity: Velocity::ZERO,
        }
    }
}

/// Per-round player statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerStatistics {
    pub railgun: Railgun,
    pub shield: Shield,
    pub satchel: Satchel,
    pub hit_wall: [[u8; WALL_COLUMNS]; WALL_ROWS],
    pub hit_castle: [[u8; CASTLE_COLUMNS]; CASTLE_ROWS],
}

impl PlayerStatistics {
    pub const fn new() -> Self {
        Self {
            railgun: Railgun::new(),
            shield: Shield::new(),
            satchel: Satchel::new(),
            hit_wall: [[0; WALL_COLUMNS]; WALL_ROWS],
            hit_castle: [[0; CASTLE_COLUMNS]; CASTLE_ROWS],
        }
    }

    pub const fn wall_destroyed(&self, row: usize, index: usize) -> bool {
        self.hit_wall[row][index] >= HITS_TO_DESTROY
    }

    pub const fn castle_destroyed(&self, row: usize, column: usize) -> bool {
        self.hit_castle[row][column] >= HITS_TO_DESTROY
    }
}

impl Default for PlayerStatistics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    pub destruction: u8,
    pub status: GameStatus,
}

impl GameState {
    pub const fn new() -> Self {
        Self {
            destruction: 0,
            status: GameStatus::Active,
        }
    }

    pub fn add_destruction(&mut self, amount: u8) {
        self.destruction = self.destruction.saturating_add(amount).min(DESTRUCTION_MAX);
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything guarded by the player-state mutex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerState {
    pub stats: PlayerStatistics,
    pub game: GameState,
    pub projectile: Rect,
    pub satchel: Rect,
    pub layout: Layout,
}

impl PlayerState {
    pub const fn new() -> Self {
        Self {
            stats: PlayerStatistics::new(),
            game: GameState::new(),
            projectile: Rect::parked(),
            satchel: Rect::parked(),
            layout: Layout::new(),
        }
    }

    /// Start-of-round values, layout regenerated.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything guarded by the platform-state mutex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformState {
    pub direction: Direction,
    pub velocity: i16,
    /// Game clock ticks seen by the last physics step.
    pub elapsed: u32,
    pub body: Rect,
}

impl PlatformState {
    pub const fn new() -> Self {
        Self {
            direction: Direction::None,
            velocity: 0,
            elapsed: 0,
            body: Rect::new(
                PLATFORM_START_X,
                PLATFORM_START_Y,
                PLATFORM_START_X + PLATFORM_WIDTH,
                PLATFORM_START_Y + PLATFORM_HEIGHT,
            ),
        }
    }

    /// Back to the start position at rest. The clock keeps running.
    pub fn reset(&mut self) {
        *self = Self {
            elapsed: self.elapsed,
            ..Self::new()
        };
    }
}

impl Default for PlatformState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destruction_saturates() {
        let mut game = GameState::new();
        game.destruction = DESTRUCTION_MAX - 1;
        game.add_destruction(2);
        assert_eq!(game.destruction, DESTRUCTION_MAX);
    }

    #[test]
    fn reset_restores_initial_values() {
        let mut player = PlayerState::new();
        player.stats.railgun.charge = 35;
        player.stats.shield.energy = 40;
        player.stats.hit_wall[1][4] = 1;
        player.stats.hit_castle[3][3] = 1;
        player.game.destruction = 9;
        player.game.status = GameStatus::SatchelExploded;
        player.reset();

        assert_eq!(player.stats.railgun.charge, 0);
        assert_eq!(player.stats.shield.remaining(), 300);
        assert!(player.stats.hit_wall.iter().flatten().all(|&h| h == 0));
        assert!(player.stats.hit_castle.iter().flatten().all(|&h| h == 0));
        assert_eq!(player.game, GameState::new());
        assert_eq!(player.game.status, GameStatus::Active);

        let mut platform = PlatformState::new();
        platform.velocity = -12;
        platform.direction = Direction::HardLeft;
        platform.body.translate(-30, 0);
        platform.elapsed = 77;
        platform.reset();
        assert_eq!(platform.velocity, 0);
        assert_eq!(platform.direction, Direction::None);
        assert_eq!(platform.body, Rect::new(45, 125, 65, 130));
        assert_eq!(platform.elapsed, 77);
    }
}
