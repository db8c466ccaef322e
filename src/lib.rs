//! # canyon-siege
//!
//! Game-state core of a small railgun-versus-castle arcade game.
//!
//! A platform at the bottom of a canyon steers left and right, charges a
//! railgun and fires over the canyon walls at a castle, while the castle
//! drops satchel charges that only the platform's shield can deflect. Knock
//! out enough of the walls and castle and the castle evacuates; crash the
//! platform or get hit and the round is lost.
//!
//! The core is a fixed set of cooperating async tasks sharing one [`World`]:
//! - **Clock**: periodic tick, wakes steering ([`clock`])
//! - **Input**: button levels to railgun and shield intents ([`input`])
//! - **Steering**: touch zones to a platform direction ([`steering`])
//! - **Physics**: the simulation step ([`physics`])
//! - **Feedback**: two blinking indicators ([`feedback`])
//! - **Render**: periodic redraw, detects the end of a round ([`render`])
//! - **Menu**: outcome screen and restart ([`menu`])
//!
//! Hardware is reached only through small traits ([`Screen`], [`TouchStrip`],
//! [`Indicators`]) and `embedded-hal-async` pins, so everything except the
//! board support in [`badge`] runs and is tested on the host.
//!
//! ## Wiring
//!
//! ```rust,ignore
//! static WORLD: World = World::new();
//! static INBOX: ButtonInbox = ButtonInbox::new();
//! static CLOCK: GameClock = GameClock::new();
//! static PHYSICS: EventFlags<PhysicsEvent> = EventFlags::new();
//! static FEEDBACK: EventFlags<FeedbackEvent> = EventFlags::new();
//!
//! InputTask::new(&WORLD, &INBOX, &PHYSICS).run().await;
//! ```

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

#[cfg(feature = "badge")]
pub mod badge;
pub mod clock;
pub mod config;
pub mod feedback;
pub mod geometry;
pub mod input;
pub mod menu;
pub mod physics;
pub mod queue;
pub mod render;
pub mod state;
pub mod steering;
pub mod sync;
pub mod world;

pub use clock::GameClock;
pub use feedback::{
    FeedbackEvent,
    FeedbackTask,
    Indicator,
    Indicators,
};
pub use input::InputTask;
pub use menu::MenuTask;
pub use physics::{
    PhysicsEvent,
    PhysicsTask,
};
pub use queue::{
    ButtonInbox,
    QueueFull,
    watch_button,
};
pub use render::{
    Palette,
    RenderTask,
    RoundOver,
    Screen,
};
pub use state::{
    Button,
    ButtonState,
    Direction,
    GameStatus,
    Outcome,
};
pub use steering::{
    SteeringTask,
    TouchStrip,
};
pub use sync::EventFlags;
pub use world::World;
