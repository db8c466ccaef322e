//! Periodic redraw and round-over detection.
//!
//! The render task copies what it needs out of the world into a [`Scene`]
//! while holding both world locks, releases them, and only then takes the
//! screen. No task ever waits for the screen while holding world state.

use core::fmt::Write as _;

use embassy_sync::signal::Signal;
use embassy_time::{
    Duration,
    Ticker,
};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    PrimitiveStyle,
    Rectangle,
};
use embedded_graphics::text::{
    Baseline,
    Text,
};
use heapless::{
    String,
    Vec,
};

use crate::config::{
    CASTLE_COLUMNS,
    CASTLE_ROWS,
    CHARGE_GAUGE_X,
    EVACUATION_FRAMES,
    GAUGE_BASE,
    GAUGE_WIDTH,
    LINE_HEIGHT,
    LINE_OFFSET,
    MESSAGE_X,
    RAILGUN_MAX_CHARGE,
    RENDER_PERIOD_MS,
    SHIELD_GAUGE_SCALE,
    SHIELD_GAUGE_X,
    STATUS_LINE,
    WALL_COLUMNS,
    WALL_ROWS,
};
use crate::geometry::Rect;
use crate::state::{
    GameStatus,
    Outcome,
    PlatformState,
    PlayerState,
};
use crate::sync::{
    Mutex,
    RawMutex,
};
use crate::world::World;

/// Fired once per finished round, carrying how it ended.
pub type RoundOver = Signal<RawMutex, Outcome>;

const TILE_CAPACITY: usize = WALL_ROWS * WALL_COLUMNS + CASTLE_ROWS * CASTLE_COLUMNS;

/// A draw target that buffers and needs an explicit flush.
pub trait Screen: DrawTarget {
    fn flush(&mut self) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette<C> {
    pub foreground: C,
    pub background: C,
}

impl<C: PixelColor> Palette<C> {
    pub const fn new(foreground: C, background: C) -> Self {
        Self { foreground, background }
    }

    fn fill(&self) -> PrimitiveStyle<C> {
        PrimitiveStyle::with_fill(self.foreground)
    }

    fn outline(&self) -> PrimitiveStyle<C> {
        PrimitiveStyle::with_stroke(self.foreground, 1)
    }
}

/// Top-left corner of a text line.
pub(crate) const fn on_line(x: i32, line: i32) -> Point {
    Point::new(x, line * LINE_HEIGHT + LINE_OFFSET)
}

pub(crate) fn draw_text<D>(
    target: &mut D,
    palette: &Palette<D::Color>,
    text: &str,
    at: Point,
) -> Result<(), D::Error>
where
    D: DrawTarget,
{
    let style = MonoTextStyle::new(&FONT_6X10, palette.foreground);
    Text::with_baseline(text, at, style, Baseline::Top).draw(target)?;
    Ok(())
}

fn draw_rect<D>(
    target: &mut D,
    rect: &Rect,
    style: PrimitiveStyle<D::Color>,
) -> Result<(), D::Error>
where
    D: DrawTarget,
{
    Rectangle::with_corners(
        Point::new(rect.x_min.into(), rect.y_min.into()),
        Point::new(rect.x_max.into(), rect.y_max.into()),
    )
    .into_styled(style)
    .draw(target)
}

/// Everything one frame shows, copied out of the world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    pub tiles: Vec<Rect, TILE_CAPACITY>,
    pub canyon: Rect,
    pub platform: Rect,
    pub projectile: Rect,
    pub satchel: Rect,
    pub shield_gauge: Rect,
    pub charge_gauge: Rect,
    /// Fully charged, or a shot is waiting to leave the barrel.
    pub charge_full: bool,
    pub protected: bool,
    pub status: GameStatus,
    pub destruction: u8,
}

impl Scene {
    pub fn capture(player: &PlayerState, platform: &PlatformState) -> Self {
        let stats = &player.stats;
        let layout = &player.layout;

        let walls = (0..WALL_ROWS)
            .flat_map(|row| (0..WALL_COLUMNS).map(move |index| (row, index)))
            .filter(|&(row, index)| !stats.wall_destroyed(row, index))
            .filter_map(|(row, index)| layout.wall(row, index));
        let castle = (0..CASTLE_ROWS)
            .flat_map(|row| (0..CASTLE_COLUMNS).map(move |column| (row, column)))
            .filter(|&(row, column)| !stats.castle_destroyed(row, column))
            .filter_map(|(row, column)| layout.castle_cell(row, column));
        let tiles = walls.chain(castle).collect();

        let shield = (stats.shield.remaining() / SHIELD_GAUGE_SCALE) as i16;
        let charge = i16::from(stats.railgun.charge);

        Self {
            tiles,
            canyon: layout.canyon,
            platform: platform.body,
            projectile: player.projectile,
            satchel: player.satchel,
            shield_gauge: Rect::new(
                SHIELD_GAUGE_X,
                GAUGE_BASE - shield,
                SHIELD_GAUGE_X + GAUGE_WIDTH,
                GAUGE_BASE,
            ),
            charge_gauge: Rect::new(
                CHARGE_GAUGE_X,
                GAUGE_BASE - charge,
                CHARGE_GAUGE_X + GAUGE_WIDTH,
                GAUGE_BASE,
            ),
            charge_full: stats.railgun.fire || stats.railgun.charge == RAILGUN_MAX_CHARGE,
            protected: stats.shield.protection,
            status: player.game.status,
            destruction: player.game.destruction,
        }
    }

    /// Draw the whole play field, with the evacuation countdown if one runs.
    pub fn draw<D>(
        &self,
        target: &mut D,
        palette: &Palette<D::Color>,
        countdown: Option<u8>,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget,
    {
        target.clear(palette.background)?;

        draw_rect(target, &self.canyon, palette.fill())?;
        for tile in &self.tiles {
            draw_rect(target, tile, palette.fill())?;
        }

        draw_rect(target, &self.platform, palette.fill())?;
        let gun = Point::new(
            self.platform.center_x().into(),
            i32::from(self.platform.y_min) - LINE_HEIGHT,
        );
        draw_text(target, palette, "\\", gun)?;
        draw_rect(target, &self.projectile, palette.fill())?;

        draw_rect(target, &self.shield_gauge, palette.outline())?;
        let charge_style = if self.charge_full { palette.fill() } else { palette.outline() };
        draw_rect(target, &self.charge_gauge, charge_style)?;

        if self.protected {
            let bubble = gun - Point::new(20, LINE_HEIGHT);
            draw_text(target, palette, "(    )", bubble)?;
        }

        draw_rect(target, &self.satchel, palette.fill())?;

        if let Some(remaining) = countdown {
            let mut text: String<24> = String::new();
            if write!(text, "EVACUATION\nSTARTED:{}", remaining).is_ok() {
                draw_text(target, palette, &text, on_line(MESSAGE_X, STATUS_LINE))?;
            }
        }

        Ok(())
    }
}

/// What one rendered frame means for the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// Evacuation frames left, while evacuating.
    pub countdown: Option<u8>,
    /// Set on exactly one frame per finished round.
    pub round_over: Option<Outcome>,
}

/// Tracks the status seen on successive frames and decides when the round
/// is over.
#[derive(Debug, Clone, Default)]
pub struct RoundWatch {
    countdown: Option<u8>,
    reported: bool,
}

impl RoundWatch {
    pub const fn new() -> Self {
        Self {
            countdown: None,
            reported: false,
        }
    }

    pub fn observe(&mut self, status: GameStatus) -> Frame {
        match status {
            GameStatus::Active => {
                *self = Self::new();
                Frame::default()
            }
            GameStatus::Evacuating => {
                let remaining = self.countdown.map_or(EVACUATION_FRAMES, |n| n.saturating_sub(1));
                self.countdown = Some(remaining);
                Frame {
                    countdown: Some(remaining),
                    round_over: if remaining == 0 { self.report(Outcome::Evacuated) } else { None },
                }
            }
            GameStatus::PlatformCrashed => Frame {
                countdown: None,
                round_over: self.report(Outcome::Crashed),
            },
            GameStatus::SatchelExploded => Frame {
                countdown: None,
                round_over: self.report(Outcome::Hit),
            },
            GameStatus::Ended => Frame::default(),
        }
    }

    fn report(&mut self, outcome: Outcome) -> Option<Outcome> {
        if self.reported {
            return None;
        }
        self.reported = true;
        Some(outcome)
    }
}

pub struct RenderTask<'a, D: Screen> {
    world: &'a World,
    screen: &'a Mutex<D>,
    round_over: &'a RoundOver,
    palette: Palette<D::Color>,
    origin: Point,
    watch: RoundWatch,
}

impl<'a, D: Screen> RenderTask<'a, D> {
    /// `origin` is where the play field's top-left corner lands on the screen.
    pub const fn new(
        world: &'a World,
        screen: &'a Mutex<D>,
        round_over: &'a RoundOver,
        palette: Palette<D::Color>,
        origin: Point,
    ) -> Self {
        Self {
            world,
            screen,
            round_over,
            palette,
            origin,
            watch: RoundWatch::new(),
        }
    }

    pub async fn run(mut self) -> ! {
        info!("render task started");
        let mut ticker = Ticker::every(Duration::from_millis(RENDER_PERIOD_MS));
        loop {
            ticker.next().await;
            if self.frame().await.is_err() {
                error!("render: drawing failed");
            }
        }
    }

    /// Snapshot, draw, and report the end of the round.
    pub async fn frame(&mut self) -> Result<Frame, D::Error> {
        let scene = {
            let world = self.world.lock_both().await;
            Scene::capture(&world.player, &world.platform)
        };
        let frame = self.watch.observe(scene.status);

        // The menu owns the screen between rounds.
        if scene.status != GameStatus::Ended {
            let mut screen = self.screen.lock().await;
            scene.draw(&mut screen.translated(self.origin), &self.palette, frame.countdown)?;
            screen.flush()?;
        }

        if let Some(outcome) = frame.round_over {
            info!("round over: {}", outcome);
            self.round_over.signal(outcome);
        }
        Ok(frame)
    }
}
