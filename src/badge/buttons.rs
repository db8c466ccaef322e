//! Game buttons: A and B fire edges into the inbox, the D-pad steers.

use esp_hal::gpio::{
    Input,
    InputConfig,
    Pull,
};

use super::ButtonResources;
use crate::steering::TouchStrip;

/// The D-pad, read as a four-zone strip.
///
/// Left and right are the outer zones, up and down the inner ones: up leans
/// left, down leans right.
pub struct DPad {
    pub up: Input<'static>,
    pub down: Input<'static>,
    pub left: Input<'static>,
    pub right: Input<'static>,
}

impl TouchStrip for DPad {
    fn sample(&mut self) -> [bool; 4] {
        [
            self.left.is_low(),
            self.up.is_low(),
            self.down.is_low(),
            self.right.is_low(),
        ]
    }
}

/// Badge buttons used by the game. All active low.
pub struct Buttons {
    /// Railgun: hold to charge, release to fire. Starts a round from the menu.
    pub a: Input<'static>,
    /// Shield: hold to raise.
    pub b: Input<'static>,
    pub dpad: DPad,
}

impl From<ButtonResources<'static>> for Buttons {
    fn from(res: ButtonResources<'static>) -> Self {
        let pull_up = InputConfig::default().with_pull(Pull::Up);
        Self {
            a: Input::new(res.a, pull_up),
            b: Input::new(res.b, pull_up),
            dpad: DPad {
                up: Input::new(res.up, pull_up),
                down: Input::new(res.down, pull_up),
                left: Input::new(res.left, pull_up),
                right: Input::new(res.right, pull_up),
            },
        }
    }
}
