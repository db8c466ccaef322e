//! Compile-time game configuration.
//!
//! Everything here is fixed at build time: there is no heap and no runtime
//! settings store. World coordinates are in display pixels of the 128×128
//! play field, y grows downwards.

// ── Input ───────────────────────────────────────────────────────────────────

/// Capacity of each button's event queue.
pub const BUTTON_QUEUE_CAPACITY: usize = 10;

/// Settling time after a button edge before the level is sampled.
pub const BUTTON_SETTLE_MS: u64 = 5;

// ── Timing ──────────────────────────────────────────────────────────────────

/// Period of the game clock that drives steering (and through it, physics).
pub const TICK_PERIOD_MS: u64 = 100;

/// Game clock ticks per second of play.
pub const TICKS_PER_SECOND: u32 = (1000 / TICK_PERIOD_MS) as u32;

/// Render task period.
pub const RENDER_PERIOD_MS: u64 = 200;

/// How often the menu polls the button queues for a start press.
pub const MENU_POLL_MS: u64 = 50;

/// Render frames between the first evacuating frame and the end of the round.
pub const EVACUATION_FRAMES: u8 = 10;

// ── Platform ────────────────────────────────────────────────────────────────

/// Impact speed above which hitting a wall destroys the platform.
pub const MAX_SAFE_SPEED: i16 = 25;

// ── Railgun ─────────────────────────────────────────────────────────────────

pub const RAILGUN_CHARGE_RATE: u8 = 5;
pub const RAILGUN_MAX_CHARGE: u8 = 50;

// ── Shield ──────────────────────────────────────────────────────────────────

/// Shield energy is kept in tenths of a unit so the regeneration rate is exact.
pub const SHIELD_SCALE: u16 = 10;

/// Cost basis for the shield: drains a fifth of it per tick, regains a twentieth.
pub const DISCHARGE_COST: u16 = 50 * SHIELD_SCALE;

pub const SHIELD_CAPACITY: u16 = 300 * SHIELD_SCALE;
pub const SHIELD_DRAIN: u16 = DISCHARGE_COST / 5;
pub const SHIELD_REGEN: u16 = DISCHARGE_COST / 20;

// ── Destruction ─────────────────────────────────────────────────────────────

pub const HITS_TO_DESTROY: u8 = 1;
pub const DESTRUCTION_MAX: u8 = 118;
pub const EVACUATION_THRESHOLD: u8 = 5;
pub const WALL_TILE_VALUE: u8 = 1;
pub const CASTLE_TILE_VALUE: u8 = 2;

// ── Indicator pacing (physics invocations) ──────────────────────────────────

/// Evacuation indicator: on for this many invocations, then off for as many.
pub const EVAC_BLINK_HALF_PERIOD: u8 = 5;

// ── Satchel ─────────────────────────────────────────────────────────────────

/// Largest horizontal launch speed of a satchel charge, either direction.
pub const SATCHEL_MAX_SPEED: i16 = 8;

/// Vertical offset of the satchel spawn point below its castle cell.
pub const SATCHEL_DROP: i16 = 26;

// ── World layout ────────────────────────────────────────────────────────────

pub const WORLD_SIZE: u32 = 128;

/// Anything below this line (or right of it, for the satchel) has left play.
pub const WORLD_FLOOR: i16 = 130;

pub const WALL_ROWS: usize = 3;
pub const WALL_COLUMNS: usize = 16;
pub const WALL_ROW_LENGTHS: [usize; WALL_ROWS] = [16, 12, 8];

pub const CASTLE_ROWS: usize = 5;
pub const CASTLE_COLUMNS: usize = 7;

/// Castle rows that carry tiles; the last grid row is never laid out.
pub const CASTLE_BUILT_ROWS: usize = 4;

/// The one castle row without windows.
pub const CASTLE_SOLID_ROW: usize = 3;

/// Tile pitch shared by walls and castle.
pub const TILE_STRIDE: i16 = 7;
pub const TILE_SIZE: i16 = 5;
pub const LAYOUT_LEFT: i16 = 5;
pub const WALL_TOP: i16 = 28;

pub const PLATFORM_START_X: i16 = 45;
pub const PLATFORM_START_Y: i16 = 125;
pub const PLATFORM_WIDTH: i16 = 20;
pub const PLATFORM_HEIGHT: i16 = 5;

/// Wall row 0 tiles the platform can run into on its left.
pub const PLATFORM_GUARD_TILES: core::ops::Range<usize> = 13..16;

/// Where an inactive projectile waits, outside the play field.
pub const PARKING_SPOT: i16 = 150;

// ── Screen ──────────────────────────────────────────────────────────────────

/// Bottom of the shield and charge gauges.
pub const GAUGE_BASE: i16 = 130;
pub const GAUGE_WIDTH: i16 = 5;
pub const SHIELD_GAUGE_X: i16 = 95;
pub const CHARGE_GAUGE_X: i16 = 105;
/// Shield units per pixel of gauge height, so a full shield is 30 px tall.
pub const SHIELD_GAUGE_SCALE: u16 = 10;

/// Text is laid out on fixed lines of this height.
pub const LINE_HEIGHT: i32 = 10;
pub const LINE_OFFSET: i32 = 5;

/// Left edge of the round status and outcome messages.
pub const MESSAGE_X: i32 = 25;
pub const STATUS_LINE: i32 = 4;
