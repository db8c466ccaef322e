//! Visual feedback: two binary indicators driven by physics.
//!
//! Physics publishes the wanted level of each indicator after every step as
//! an on/off flag pair. The pair is posted exclusively, so when the feedback
//! task finally runs it only ever sees the latest level of each indicator.

use crate::sync::{
    EventFlags,
    Flag,
    FlagSet,
    Pend,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FeedbackEvent {
    EvacOn,
    EvacOff,
    RailgunOn,
    RailgunOff,
}

impl Flag for FeedbackEvent {
    fn bit(self) -> u8 {
        self as u8
    }
}

impl FeedbackEvent {
    pub fn all() -> FlagSet<Self> {
        FlagSet::of(&[Self::EvacOn, Self::EvacOff, Self::RailgunOn, Self::RailgunOff])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Indicator {
    /// Blinks while the castle is being evacuated.
    Evacuation,
    /// Blinks faster the more the railgun is charged.
    Railgun,
}

/// Indicator levels wanted after a physics step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Indicated {
    pub evacuation: bool,
    pub railgun: bool,
}

impl Indicated {
    pub const OFF: Self = Self {
        evacuation: false,
        railgun: false,
    };
}

/// Two binary outputs.
#[allow(async_fn_in_trait)]
pub trait Indicators {
    async fn set(&mut self, indicator: Indicator, on: bool);
}

/// Post the levels of both indicators.
pub fn publish(flags: &EventFlags<FeedbackEvent>, indicated: Indicated) {
    use FeedbackEvent::*;

    if indicated.evacuation {
        flags.post_exclusive(EvacOn, EvacOff);
    } else {
        flags.post_exclusive(EvacOff, EvacOn);
    }
    if indicated.railgun {
        flags.post_exclusive(RailgunOn, RailgunOff);
    } else {
        flags.post_exclusive(RailgunOff, RailgunOn);
    }
}

/// Apply every indicator change present in `events`.
pub async fn relay<I: Indicators>(events: FlagSet<FeedbackEvent>, indicators: &mut I) {
    if events.contains(FeedbackEvent::EvacOn) {
        indicators.set(Indicator::Evacuation, true).await;
    } else if events.contains(FeedbackEvent::EvacOff) {
        indicators.set(Indicator::Evacuation, false).await;
    }

    if events.contains(FeedbackEvent::RailgunOn) {
        indicators.set(Indicator::Railgun, true).await;
    } else if events.contains(FeedbackEvent::RailgunOff) {
        indicators.set(Indicator::Railgun, false).await;
    }
}

pub struct FeedbackTask<'a, I> {
    flags: &'a EventFlags<FeedbackEvent>,
    indicators: I,
}

impl<'a, I: Indicators> FeedbackTask<'a, I> {
    pub const fn new(flags: &'a EventFlags<FeedbackEvent>, indicators: I) -> Self {
        Self { flags, indicators }
    }

    pub async fn run(mut self) -> ! {
        info!("feedback task started");
        loop {
            let events = self.flags.pend(FeedbackEvent::all(), Pend::Any).await;
            relay(events, &mut self.indicators).await;
        }
    }
}
