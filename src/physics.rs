//! Physics and game-state simulation.
//!
//! [`step`] is the whole simulation as a pure function over the two state
//! groups. [`PhysicsTask`] only adds the waiting, the locking and the
//! publishing of indicator levels around it.
//!
//! Velocities follow the player's point of view: positive `x` moves towards
//! the castle (screen left), positive `y` moves up. Positions are updated with
//! `x -= vx` and `y -= vy`.

use embassy_time::Instant;

use crate::clock::GameClock;
use crate::config::{
    CASTLE_COLUMNS,
    CASTLE_ROWS,
    CASTLE_TILE_VALUE,
    EVAC_BLINK_HALF_PERIOD,
    EVACUATION_THRESHOLD,
    HITS_TO_DESTROY,
    MAX_SAFE_SPEED,
    PLATFORM_GUARD_TILES,
    RAILGUN_CHARGE_RATE,
    RAILGUN_MAX_CHARGE,
    SATCHEL_MAX_SPEED,
    SHIELD_CAPACITY,
    SHIELD_DRAIN,
    SHIELD_REGEN,
    WALL_ROW_LENGTHS,
    WALL_ROWS,
    WALL_TILE_VALUE,
    WORLD_FLOOR,
};
use crate::feedback::{
    self,
    FeedbackEvent,
    Indicated,
};
use crate::geometry::Rect;
use crate::state::{
    GameState,
    GameStatus,
    PlatformState,
    PlayerState,
    Shield,
    Velocity,
};
use crate::sync::{
    EventFlags,
    Flag,
    FlagSet,
    Pend,
};
use crate::world::World;

/// Reasons to run a physics step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhysicsEvent {
    ButtonAction,
    PlatformAction,
}

impl Flag for PhysicsEvent {
    fn bit(self) -> u8 {
        self as u8
    }
}

// ── Random numbers ──────────────────────────────────────────────────────────

/// xorshift32.
#[derive(Debug, Clone)]
pub struct Rng(u32);

impl Rng {
    pub const fn new(seed: u32) -> Self {
        // xorshift is stuck at zero
        Self(if seed == 0 { 0x9E37_79B9 } else { seed })
    }

    pub fn next(&mut self) -> u32 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 17;
        self.0 ^= self.0 << 5;
        self.0
    }

    /// Stir outside entropy into the state.
    pub fn mix(&mut self, entropy: u32) {
        *self = Self::new(self.0 ^ entropy.rotate_left(16));
        self.next();
    }

    /// Value in `low..=high`.
    pub fn range(&mut self, low: i16, high: i16) -> i16 {
        let span = (high - low) as u32 + 1;
        low + (self.next() % span) as i16
    }
}

// ── Indicator pacing ────────────────────────────────────────────────────────

/// Blink counters, counted in physics invocations.
#[derive(Debug, Clone, Default)]
pub struct Pacing {
    evacuation: u8,
    railgun: u8,
}

impl Pacing {
    pub const fn new() -> Self {
        Self {
            evacuation: 0,
            railgun: 0,
        }
    }

    fn evacuation(&mut self, evacuating: bool) -> bool {
        if !evacuating {
            self.evacuation = 0;
            return false;
        }
        let on = self.evacuation < EVAC_BLINK_HALF_PERIOD;
        self.evacuation += 1;
        if self.evacuation >= 2 * EVAC_BLINK_HALF_PERIOD {
            self.evacuation = 0;
        }
        on
    }

    fn railgun(&mut self, charge: u8) -> bool {
        if charge == 0 {
            self.railgun = 0;
            return false;
        }
        if self.railgun < RAILGUN_MAX_CHARGE / charge {
            self.railgun += 1;
            true
        } else {
            self.railgun = 0;
            false
        }
    }
}

// ── The step ────────────────────────────────────────────────────────────────

/// A destructible tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tile {
    Wall { row: usize, index: usize },
    Castle { row: usize, column: usize },
}

/// Advance the world by one physics invocation.
///
/// Finished rounds (crashed, exploded, ended) are frozen: nothing moves and
/// both indicators go dark.
pub fn step(
    player: &mut PlayerState,
    platform: &mut PlatformState,
    pacing: &mut Pacing,
    rng: &mut Rng,
    elapsed: u32,
) -> Indicated {
    if !player.game.status.is_live() {
        return Indicated::OFF;
    }
    platform.elapsed = elapsed;

    if player.game.destruction >= EVACUATION_THRESHOLD && player.game.status == GameStatus::Active {
        player.game.status = GameStatus::Evacuating;
        info!("evacuation started at destruction {}", player.game.destruction);
    }
    let indicated = Indicated {
        evacuation: pacing.evacuation(player.game.status == GameStatus::Evacuating),
        railgun: pacing.railgun(player.stats.railgun.charge),
    };

    move_platform(platform);
    advance_railgun(player, &platform.body);
    if player.stats.railgun.projectile_active {
        if let Some(tile) = find_strike(player) {
            register_hit(player, tile);
        }
    }
    drain_shield(&mut player.stats.shield);
    move_satchel(player, rng);
    bounce_platform(player, platform);
    satchel_contacts(player, &platform.body);

    indicated
}

fn move_platform(platform: &mut PlatformState) {
    platform.velocity += platform.direction.acceleration();
    platform.body.translate(platform.velocity, 0);
}

fn advance_railgun(player: &mut PlayerState, platform: &Rect) {
    let railgun = &mut player.stats.railgun;

    if railgun.charging && railgun.charge < RAILGUN_MAX_CHARGE {
        railgun.charge = (railgun.charge + RAILGUN_CHARGE_RATE).min(RAILGUN_MAX_CHARGE);
    }

    if railgun.fire {
        railgun.fire = false;
        railgun.shot_power = railgun.charge;
        railgun.charge = 0;
        railgun.projectile_active = true;
        railgun.launched = false;
        debug!("railgun fired with power {}", railgun.shot_power);
    }

    if !railgun.projectile_active {
        player.projectile = Rect::parked();
        return;
    }

    if !railgun.launched {
        let power = i16::from(railgun.shot_power);
        railgun.velocity = Velocity::new(power / 4, power / 2);
        railgun.launched = true;
        player.projectile = Rect::new(
            platform.x_min + 14,
            platform.y_min - 9,
            platform.x_max - 4,
            platform.y_max - 11,
        );
        return;
    }

    railgun.velocity.y -= 1;
    player.projectile.translate(-railgun.velocity.x, -railgun.velocity.y);

    // Fell out of the play field without touching anything.
    if player.projectile.y_min > WORLD_FLOOR || player.projectile.x_max < 0 {
        railgun.projectile_active = false;
        railgun.launched = false;
        player.projectile = Rect::parked();
    }
}

/// First standing tile the projectile touches.
///
/// Walls are scanned from the innermost row out, each from the bottom tile
/// up; the castle after them, row by row.
fn find_strike(player: &PlayerState) -> Option<Tile> {
    let shot = &player.projectile;
    let stats = &player.stats;
    let layout = &player.layout;

    for row in (0..WALL_ROWS).rev() {
        for index in (0..WALL_ROW_LENGTHS[row]).rev() {
            if stats.wall_destroyed(row, index) {
                continue;
            }
            if layout.wall(row, index).is_some_and(|tile| shot.strikes(&tile)) {
                return Some(Tile::Wall { row, index });
            }
        }
    }

    for row in 0..CASTLE_ROWS {
        for column in 0..CASTLE_COLUMNS {
            if stats.castle_destroyed(row, column) {
                continue;
            }
            if layout.castle_cell(row, column).is_some_and(|tile| shot.strikes(&tile)) {
                return Some(Tile::Castle { row, column });
            }
        }
    }

    None
}

fn register_hit(player: &mut PlayerState, tile: Tile) {
    let (hits, value) = match tile {
        Tile::Wall { row, index } => (&mut player.stats.hit_wall[row][index], WALL_TILE_VALUE),
        Tile::Castle { row, column } => {
            (&mut player.stats.hit_castle[row][column], CASTLE_TILE_VALUE)
        }
    };
    *hits = hits.saturating_add(1);
    let destroyed = *hits == HITS_TO_DESTROY;

    let railgun = &mut player.stats.railgun;
    railgun.projectile_active = false;
    railgun.launched = false;
    player.projectile = Rect::parked();

    if destroyed {
        player.game.add_destruction(value);
        debug!("{} destroyed, destruction {}", tile, player.game.destruction);
    }
}

fn drain_shield(shield: &mut Shield) {
    if shield.active {
        shield.protection = shield.energy >= SHIELD_DRAIN;
        if shield.protection {
            shield.energy -= SHIELD_DRAIN;
        }
    } else {
        shield.energy = (shield.energy + SHIELD_REGEN).min(SHIELD_CAPACITY);
        shield.protection = false;
    }
}

fn move_satchel(player: &mut PlayerState, rng: &mut Rng) {
    let satchel = &mut player.stats.satchel;
    satchel.active = true;

    if satchel.armed {
        satchel.velocity.y -= 1;
        player.satchel.translate(-satchel.velocity.x, -satchel.velocity.y);
    } else {
        satchel.velocity = Velocity::new(rng.range(-SATCHEL_MAX_SPEED, SATCHEL_MAX_SPEED), 0);
        satchel.armed = true;
        player.satchel = player.layout.satchel_drop();
    }
}

/// Right of the platform there is the canyon wall. On its left, the lowest
/// standing tiles of the outer wall row, or the edge of the world once those
/// are gone.
fn bounce_platform(player: &mut PlayerState, platform: &mut PlatformState) {
    let canyon = player.layout.canyon;
    if platform.body.x_max >= canyon.x_min && platform.velocity > 0 {
        let overshoot = platform.body.x_max - (canyon.x_min - 1);
        platform.body.translate(-overshoot, 0);
        impact(&mut player.game, &mut platform.velocity);
        return;
    }

    let left_limit = PLATFORM_GUARD_TILES
        .filter(|&index| !player.stats.wall_destroyed(0, index))
        .find_map(|index| player.layout.wall(0, index))
        .map_or(0, |tile| tile.x_max + 1);
    if platform.body.x_min < left_limit && platform.velocity < 0 {
        platform.body.translate(left_limit - platform.body.x_min, 0);
        impact(&mut player.game, &mut platform.velocity);
    }
}

fn impact(game: &mut GameState, velocity: &mut i16) {
    if velocity.abs() > MAX_SAFE_SPEED {
        game.status = GameStatus::PlatformCrashed;
        info!("platform crashed at speed {}", *velocity);
    } else {
        *velocity = -*velocity;
    }
}

fn satchel_contacts(player: &mut PlayerState, platform: &Rect) {
    let charge = player.satchel;
    let satchel = &mut player.stats.satchel;

    if charge.y_max > WORLD_FLOOR || charge.x_min > WORLD_FLOOR {
        satchel.armed = false;
        return;
    }

    let canyon = player.layout.canyon;
    if charge.x_max >= canyon.x_min && satchel.velocity.x < 0 {
        satchel.velocity.x = -satchel.velocity.x;
    } else if satchel.velocity.x > 0 && touches_inner_wall(player, &charge) {
        let satchel = &mut player.stats.satchel;
        satchel.velocity.x = -satchel.velocity.x;
    }

    if !player.game.status.is_live() {
        return;
    }

    if player.stats.shield.protection {
        let zone = Rect::new(
            platform.x_min + 15,
            platform.y_min - 35,
            platform.x_max + 15,
            platform.y_max,
        );
        if charge.spans_overlap(&zone) && charge.y_max >= zone.y_min {
            player.stats.satchel.armed = false;
            debug!("satchel deflected");
        }
    } else if charge.spans_overlap(platform) && charge.y_max >= platform.y_min {
        player.game.status = GameStatus::SatchelExploded;
        info!("platform hit by satchel");
    }
}

/// Whether the satchel has reached a standing tile of the two inner wall rows.
fn touches_inner_wall(player: &PlayerState, charge: &Rect) -> bool {
    (1..WALL_ROWS).rev().any(|row| {
        (0..WALL_ROW_LENGTHS[row]).any(|index| {
            !player.stats.wall_destroyed(row, index)
                && player.layout.wall(row, index).is_some_and(|tile| {
                    charge.x_min <= tile.x_max
                        && charge.y_max >= tile.y_min
                        && charge.y_min <= tile.y_max
                })
        })
    })
}

// ── Task ────────────────────────────────────────────────────────────────────

pub struct PhysicsTask<'a> {
    world: &'a World,
    clock: &'a GameClock,
    events: &'a EventFlags<PhysicsEvent>,
    feedback: &'a EventFlags<FeedbackEvent>,
    pacing: Pacing,
    rng: Rng,
}

impl<'a> PhysicsTask<'a> {
    pub const fn new(
        world: &'a World,
        clock: &'a GameClock,
        events: &'a EventFlags<PhysicsEvent>,
        feedback: &'a EventFlags<FeedbackEvent>,
        seed: u32,
    ) -> Self {
        Self {
            world,
            clock,
            events,
            feedback,
            pacing: Pacing::new(),
            rng: Rng::new(seed),
        }
    }

    pub async fn run(mut self) -> ! {
        info!("physics task started");
        let wake = FlagSet::of(&[PhysicsEvent::ButtonAction, PhysicsEvent::PlatformAction]);
        loop {
            let events = self.events.pend(wake, Pend::Any).await;
            if events.contains(PhysicsEvent::ButtonAction) {
                // Player timing differs between power-ups, the boot seed does not.
                self.rng.mix(Instant::now().as_ticks() as u32);
            }
            self.advance().await;
        }
    }

    /// One locked step, then publish the indicator levels.
    pub async fn advance(&mut self) -> Indicated {
        let indicated = {
            let mut world = self.world.lock_both().await;
            step(
                &mut world.player,
                &mut world.platform,
                &mut self.pacing,
                &mut self.rng,
                self.clock.ticks(),
            )
        };
        feedback::publish(self.feedback, indicated);
        indicated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Direction;

    struct Bench {
        player: PlayerState,
        platform: PlatformState,
        pacing: Pacing,
        rng: Rng,
        elapsed: u32,
    }

    impl Bench {
        fn new() -> Self {
            Self {
                player: PlayerState::new(),
                platform: PlatformState::new(),
                pacing: Pacing::new(),
                rng: Rng::new(7),
                elapsed: 0,
            }
        }

        fn step(&mut self) -> Indicated {
            self.elapsed += 1;
            step(
                &mut self.player,
                &mut self.platform,
                &mut self.pacing,
                &mut self.rng,
                self.elapsed,
            )
        }
    }

    #[test]
    fn rng_range_is_inclusive() {
        let mut rng = Rng::new(0);
        let mut seen = [false; 17];
        for _ in 0..2000 {
            let v = rng.range(-8, 8);
            assert!((-8..=8).contains(&v));
            seen[(v + 8) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn mixing_entropy_changes_the_sequence() {
        let mut a = Rng::new(1234);
        let mut b = Rng::new(1234);
        a.mix(17);
        b.mix(18);
        assert_ne!(a.next(), b.next());

        // A mix that would zero the state falls back to a live seed.
        let mut c = Rng::new(5);
        c.mix(5_u32.rotate_right(16));
        assert_ne!(c.next(), 0);
    }

    #[test]
    fn charge_clamps_at_max() {
        let mut bench = Bench::new();
        bench.player.stats.railgun.charging = true;
        bench.player.stats.railgun.charge = 48;
        bench.step();
        assert_eq!(bench.player.stats.railgun.charge, 50);
        bench.step();
        assert_eq!(bench.player.stats.railgun.charge, 50);
    }

    #[test]
    fn shield_budget() {
        let mut bench = Bench::new();
        bench.player.stats.shield.active = true;
        for _ in 0..5 {
            bench.step();
            assert!(bench.player.stats.shield.protection);
        }
        assert_eq!(bench.player.stats.shield.remaining(), 250);

        bench.player.stats.shield.active = false;
        for _ in 0..4 {
            bench.step();
        }
        assert_eq!(bench.player.stats.shield.remaining(), 260);
        assert!(!bench.player.stats.shield.protection);

        let mut shield = Shield::new();
        drain_shield(&mut shield);
        assert_eq!(shield.energy, SHIELD_CAPACITY);
    }

    #[test]
    fn empty_shield_does_not_protect() {
        let mut shield = Shield::new();
        shield.active = true;
        shield.energy = SHIELD_DRAIN - 1;
        drain_shield(&mut shield);
        assert!(!shield.protection);
        assert_eq!(shield.energy, SHIELD_DRAIN - 1);
    }

    #[test]
    fn fire_launches_from_platform_and_flies() {
        let mut bench = Bench::new();
        bench.player.stats.railgun.charge = 40;
        bench.player.stats.railgun.fire = true;
        bench.step();

        let railgun = bench.player.stats.railgun;
        assert!(railgun.projectile_active);
        assert!(railgun.launched);
        assert!(!railgun.fire);
        assert_eq!(railgun.charge, 0);
        assert_eq!(railgun.shot_power, 40);
        assert_eq!(railgun.velocity, Velocity::new(10, 20));
        assert_eq!(bench.player.projectile, Rect::new(59, 116, 61, 119));

        bench.step();
        assert_eq!(bench.player.stats.railgun.velocity, Velocity::new(10, 19));
        assert_eq!(bench.player.projectile, Rect::new(49, 97, 51, 100));
    }

    #[test]
    fn idle_projectile_is_parked() {
        let mut bench = Bench::new();
        bench.player.projectile = Rect::new(1, 2, 3, 4);
        bench.step();
        assert_eq!(bench.player.projectile, Rect::parked());
    }

    #[test]
    fn projectile_falling_out_of_field_is_parked() {
        let mut bench = Bench::new();
        bench.player.stats.railgun.fire = true;
        bench.step();
        assert_eq!(bench.player.stats.railgun.velocity, Velocity::ZERO);

        // Straight down from y 116: 117, 119, 122, 126, then past the floor.
        for _ in 0..4 {
            bench.step();
            assert!(bench.player.stats.railgun.projectile_active);
        }
        assert_eq!(bench.player.projectile.y_min, 126);

        bench.step();
        let railgun = bench.player.stats.railgun;
        assert!(!railgun.projectile_active);
        assert!(!railgun.launched);
        assert_eq!(bench.player.projectile, Rect::parked());
        assert_eq!(bench.player.game.destruction, 0);
    }

    #[test]
    fn projectile_leaving_left_edge_is_parked() {
        let mut bench = Bench::new();
        let railgun = &mut bench.player.stats.railgun;
        railgun.projectile_active = true;
        railgun.launched = true;
        railgun.velocity = Velocity::new(10, 0);
        bench.player.projectile = Rect::new(2, 60, 4, 63);
        bench.step();

        assert!(!bench.player.stats.railgun.projectile_active);
        assert_eq!(bench.player.projectile, Rect::parked());
        assert!(bench.player.stats.hit_wall.iter().flatten().all(|&h| h == 0));
    }

    #[test]
    fn first_wall_match_wins() {
        let mut player = PlayerState::new();
        // Straddles the top of wall (2, 7) and the bottom of wall (2, 6).
        player.projectile = Rect::new(20, 75, 22, 78);
        player.stats.railgun.projectile_active = true;

        let tile = find_strike(&player).unwrap();
        assert_eq!(tile, Tile::Wall { row: 2, index: 7 });
        register_hit(&mut player, tile);

        assert_eq!(player.stats.hit_wall[2][7], 1);
        assert_eq!(player.stats.hit_wall[2][6], 0);
        assert_eq!(player.game.destruction, 1);
        assert!(!player.stats.railgun.projectile_active);
    }

    #[test]
    fn first_castle_match_wins() {
        let mut player = PlayerState::new();
        // Straddles the bottom edge of every tile in castle row 0.
        player.projectile = Rect::new(0, 4, 2, 6);
        player.stats.railgun.projectile_active = true;

        let tile = find_strike(&player).unwrap();
        assert_eq!(tile, Tile::Castle { row: 0, column: 0 });
        register_hit(&mut player, tile);
        assert_eq!(player.game.destruction, 2);
        assert_eq!(player.stats.hit_castle.iter().flatten().filter(|&&h| h > 0).count(), 1);
    }

    #[test]
    fn destroyed_tiles_are_skipped() {
        let mut player = PlayerState::new();
        player.projectile = Rect::new(20, 75, 22, 78);
        player.stats.hit_wall[2][7] = 1;
        assert_eq!(find_strike(&player), Some(Tile::Wall { row: 2, index: 6 }));
    }

    #[test]
    fn evacuation_blinks_five_on_five_off() {
        let mut bench = Bench::new();
        bench.player.game.destruction = 5;
        let pattern: heapless::Vec<bool, 10> = (0..10).map(|_| bench.step().evacuation).collect();
        assert_eq!(bench.player.game.status, GameStatus::Evacuating);
        assert_eq!(
            pattern.as_slice(),
            &[true, true, true, true, true, false, false, false, false, false]
        );
    }

    #[test]
    fn latched_crash_is_not_overwritten() {
        let mut bench = Bench::new();
        bench.player.game.destruction = 9;
        bench.player.game.status = GameStatus::PlatformCrashed;
        bench.platform.direction = Direction::HardLeft;
        let before = (bench.player, bench.platform);

        assert_eq!(bench.step(), Indicated::OFF);
        assert_eq!((bench.player, bench.platform), before);
    }

    #[test]
    fn railgun_blinks_with_charge() {
        let mut pacing = Pacing::new();
        let pattern: heapless::Vec<bool, 6> = (0..6).map(|_| pacing.railgun(25)).collect();
        assert_eq!(pattern.as_slice(), &[true, true, false, true, true, false]);
        assert!(!pacing.railgun(0));
    }

    #[test]
    fn fast_platform_crashes_into_canyon() {
        let mut bench = Bench::new();
        bench.platform.body = Rect::new(95, 125, 115, 130);
        bench.platform.velocity = 26;
        bench.step();
        assert_eq!(bench.player.game.status, GameStatus::PlatformCrashed);
    }

    #[test]
    fn slow_platform_bounces_off_canyon() {
        let mut bench = Bench::new();
        bench.platform.body = Rect::new(95, 125, 115, 130);
        bench.platform.velocity = 10;
        bench.step();
        assert_eq!(bench.player.game.status, GameStatus::Active);
        assert_eq!(bench.platform.velocity, -10);
        assert_eq!(bench.platform.body.x_max, 119);
    }

    #[test]
    fn platform_bounces_off_standing_wall() {
        let mut bench = Bench::new();
        bench.platform.body = Rect::new(15, 125, 35, 130);
        bench.platform.velocity = -10;
        bench.step();
        assert_eq!(bench.platform.velocity, 10);
        assert_eq!(bench.platform.body.x_min, 11);

        bench.platform.body = Rect::new(15, 125, 35, 130);
        bench.platform.velocity = -30;
        bench.step();
        assert_eq!(bench.player.game.status, GameStatus::PlatformCrashed);
    }

    #[test]
    fn world_edge_once_wall_is_gone() {
        let mut bench = Bench::new();
        for index in PLATFORM_GUARD_TILES {
            bench.player.stats.hit_wall[0][index] = 1;
        }
        bench.platform.body = Rect::new(8, 125, 28, 130);
        bench.platform.velocity = -10;
        bench.step();
        assert_eq!(bench.platform.velocity, 10);
        assert_eq!(bench.platform.body.x_min, 0);
    }

    #[test]
    fn satchel_spawns_then_falls() {
        let mut bench = Bench::new();
        bench.step();
        let satchel = bench.player.stats.satchel;
        assert!(satchel.armed);
        assert!((-SATCHEL_MAX_SPEED..=SATCHEL_MAX_SPEED).contains(&satchel.velocity.x));
        assert_eq!(satchel.velocity.y, 0);
        assert_eq!(bench.player.satchel, bench.player.layout.satchel_drop());

        bench.step();
        assert_eq!(bench.player.stats.satchel.velocity.y, -1);
        assert_eq!(bench.player.satchel.y_min, bench.player.layout.satchel_drop().y_min + 1);
    }

    #[test]
    fn satchel_leaving_field_respawns() {
        let mut bench = Bench::new();
        bench.player.stats.satchel.armed = true;
        bench.player.satchel = Rect::new(80, 126, 85, 131);
        bench.step();
        assert!(!bench.player.stats.satchel.armed);
        assert_eq!(bench.player.game.status, GameStatus::Active);
    }

    #[test]
    fn unprotected_platform_is_hit() {
        let mut bench = Bench::new();
        bench.player.stats.satchel.armed = true;
        bench.player.satchel = Rect::new(50, 120, 55, 125);
        bench.step();
        assert_eq!(bench.player.game.status, GameStatus::SatchelExploded);
    }

    #[test]
    fn shield_deflects_satchel() {
        let mut bench = Bench::new();
        bench.player.stats.shield.active = true;
        bench.player.stats.satchel.armed = true;
        bench.player.satchel = Rect::new(62, 100, 67, 105);
        bench.step();
        assert!(bench.player.stats.shield.protection);
        assert!(!bench.player.stats.satchel.armed);
        assert_eq!(bench.player.game.status, GameStatus::Active);
    }

    #[test]
    fn satchel_reflects_off_inner_wall() {
        let mut bench = Bench::new();
        bench.player.stats.satchel.armed = true;
        bench.player.stats.satchel.velocity = Velocity::new(6, 0);
        bench.player.satchel = Rect::new(26, 40, 31, 45);
        bench.step();
        assert_eq!(bench.player.stats.satchel.velocity.x, -6);
    }

    #[test]
    fn satchel_reflects_off_canyon() {
        let mut bench = Bench::new();
        bench.player.stats.satchel.armed = true;
        bench.player.stats.satchel.velocity = Velocity::new(-4, 0);
        bench.player.satchel = Rect::new(115, 40, 120, 45);
        bench.step();
        assert_eq!(bench.player.satchel.x_max, 124);
        assert_eq!(bench.player.stats.satchel.velocity.x, 4);
        assert!(bench.player.stats.satchel.armed);

        // Moving away again, no second reflection.
        bench.step();
        assert_eq!(bench.player.stats.satchel.velocity.x, 4);
    }
}
