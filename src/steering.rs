//! Platform steering from the four-zone touch strip.

use crate::clock::GameClock;
use crate::physics::PhysicsEvent;
use crate::state::Direction;
use crate::sync::EventFlags;
use crate::world::World;

/// Four-zone directional input, ordered outer-left, inner-left, inner-right,
/// outer-right.
pub trait TouchStrip {
    fn sample(&mut self) -> [bool; 4];
}

/// Collapse the zone levels into one direction.
///
/// Any left zone together with any right zone cancels out. Both zones of a
/// side steer gradually.
pub const fn disambiguate(zones: [bool; 4]) -> Direction {
    let [outer_left, inner_left, inner_right, outer_right] = zones;
    let right = inner_right || outer_right;

    if (outer_left || inner_left) && right {
        Direction::None
    } else if outer_left && inner_left {
        Direction::GradualLeft
    } else if inner_right && outer_right {
        Direction::GradualRight
    } else if outer_left {
        Direction::HardLeft
    } else if inner_left {
        Direction::GradualLeft
    } else if inner_right {
        Direction::GradualRight
    } else if outer_right {
        Direction::HardRight
    } else {
        Direction::None
    }
}

pub struct SteeringTask<'a, T> {
    world: &'a World,
    clock: &'a GameClock,
    physics: &'a EventFlags<PhysicsEvent>,
    strip: T,
}

impl<'a, T: TouchStrip> SteeringTask<'a, T> {
    pub const fn new(
        world: &'a World,
        clock: &'a GameClock,
        physics: &'a EventFlags<PhysicsEvent>,
        strip: T,
    ) -> Self {
        Self {
            world,
            clock,
            physics,
            strip,
        }
    }

    pub async fn run(mut self) -> ! {
        info!("steering task started");
        loop {
            self.clock.wait_tick().await;
            self.steer().await;
        }
    }

    /// Sample the strip once and publish the direction.
    pub async fn steer(&mut self) -> Direction {
        let direction = disambiguate(self.strip.sample());
        self.world.lock_platform().await.direction = direction;
        self.physics.post(PhysicsEvent::PlatformAction);
        direction
    }
}
