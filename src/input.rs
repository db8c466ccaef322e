//! Input interpretation: button levels to player intents.

use crate::physics::PhysicsEvent;
use crate::queue::ButtonInbox;
use crate::state::{
    Button,
    ButtonState,
    Railgun,
    Shield,
};
use crate::sync::EventFlags;
use crate::world::World;

/// Edge detector for the railgun button.
///
/// Press starts a fresh charge, release fires it. A missing sample means the
/// level did not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RailgunTrigger {
    previous: ButtonState,
}

impl RailgunTrigger {
    pub const fn new() -> Self {
        Self {
            previous: ButtonState::Released,
        }
    }

    pub fn apply(&mut self, sample: Option<ButtonState>, railgun: &mut Railgun) {
        let current = sample.unwrap_or(self.previous);
        match (self.previous, current) {
            (ButtonState::Released, ButtonState::Pressed) => {
                railgun.charge = 0;
                railgun.fire = false;
                railgun.charging = true;
            }
            (ButtonState::Pressed, ButtonState::Released) => {
                railgun.fire = true;
                railgun.charging = false;
            }
            // A fire still waiting for physics stays pending.
            (_, level) => railgun.charging = level.is_pressed(),
        }
        self.previous = current;
    }
}

impl Default for RailgunTrigger {
    fn default() -> Self {
        Self::new()
    }
}

/// Shield is level-sampled: held means raised.
pub fn apply_shield(sample: Option<ButtonState>, shield: &mut Shield) {
    if let Some(level) = sample {
        shield.active = level.is_pressed();
    }
}

pub struct InputTask<'a> {
    world: &'a World,
    inbox: &'a ButtonInbox,
    physics: &'a EventFlags<PhysicsEvent>,
    trigger: RailgunTrigger,
}

impl<'a> InputTask<'a> {
    pub const fn new(
        world: &'a World,
        inbox: &'a ButtonInbox,
        physics: &'a EventFlags<PhysicsEvent>,
    ) -> Self {
        Self {
            world,
            inbox,
            physics,
            trigger: RailgunTrigger::new(),
        }
    }

    pub async fn run(mut self) -> ! {
        info!("input task started");
        loop {
            self.inbox.wait().await;
            // One pair per physics wake, so a press-release-press burst is
            // not collapsed into a single level.
            while self.service().await && self.backlog() {
                embassy_futures::yield_now().await;
            }
        }
    }

    /// Consume one event from each queue and hand the result to physics.
    ///
    /// Returns `false` without touching the queues when the round is over:
    /// those events belong to the menu.
    pub async fn service(&mut self) -> bool {
        let mut player = self.world.lock_player().await;
        if !player.game.status.is_live() {
            self.trigger = RailgunTrigger::new();
            return false;
        }

        let (railgun, shield) = self.inbox.pop_pair();
        if railgun.is_none() && shield.is_none() {
            return false;
        }
        self.trigger.apply(railgun, &mut player.stats.railgun);
        apply_shield(shield, &mut player.stats.shield);
        drop(player);

        self.physics.post(PhysicsEvent::ButtonAction);
        true
    }

    fn backlog(&self) -> bool {
        self.inbox.pending(Button::Railgun) > 0 || self.inbox.pending(Button::Shield) > 0
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;

    use super::*;
    use crate::state::GameStatus;
    use crate::sync::Pend;

    #[test]
    fn railgun_edges() {
        let mut trigger = RailgunTrigger::new();
        let mut railgun = Railgun::new();
        railgun.charge = 20;

        trigger.apply(Some(ButtonState::Released), &mut railgun);
        assert!(!railgun.fire);
        assert!(!railgun.charging);

        trigger.apply(Some(ButtonState::Pressed), &mut railgun);
        assert_eq!(railgun.charge, 0);
        assert!(railgun.charging);
        assert!(!railgun.fire);

        railgun.charge = 15;
        trigger.apply(Some(ButtonState::Pressed), &mut railgun);
        assert!(railgun.charging);
        assert!(!railgun.fire);
        assert_eq!(railgun.charge, 15);

        trigger.apply(Some(ButtonState::Released), &mut railgun);
        assert!(railgun.fire);
        assert!(!railgun.charging);
    }

    #[test]
    fn missing_sample_keeps_level() {
        let mut trigger = RailgunTrigger::new();
        let mut railgun = Railgun::new();
        trigger.apply(Some(ButtonState::Pressed), &mut railgun);
        trigger.apply(None, &mut railgun);
        assert!(railgun.charging);
        assert!(!railgun.fire);

        let mut shield = Shield::new();
        apply_shield(Some(ButtonState::Pressed), &mut shield);
        apply_shield(None, &mut shield);
        assert!(shield.active);
        apply_shield(Some(ButtonState::Released), &mut shield);
        assert!(!shield.active);
    }

    #[test]
    fn service_posts_button_action() {
        let world = World::new();
        let inbox = ButtonInbox::new();
        let flags = EventFlags::new();
        let mut input = InputTask::new(&world, &inbox, &flags);

        inbox.record(Button::Shield, ButtonState::Pressed).unwrap();
        assert!(block_on(input.service()));
        assert!(block_on(world.lock_player()).stats.shield.active);
        assert!(flags.try_pend(PhysicsEvent::ButtonAction.into(), Pend::Any).is_some());

        assert!(!block_on(input.service()));
    }

    #[test]
    fn queued_burst_is_serviced_one_edge_at_a_time() {
        let world = World::new();
        let inbox = ButtonInbox::new();
        let flags = EventFlags::new();
        let mut input = InputTask::new(&world, &inbox, &flags);
        let wake = PhysicsEvent::ButtonAction.into();

        for state in [ButtonState::Pressed, ButtonState::Released, ButtonState::Pressed] {
            inbox.record(Button::Railgun, state).unwrap();
        }

        assert!(block_on(input.service()));
        assert!(block_on(world.lock_player()).stats.railgun.charging);
        assert!(flags.try_pend(wake, Pend::Any).is_some());
        assert!(input.backlog());

        assert!(block_on(input.service()));
        let railgun = block_on(world.lock_player()).stats.railgun;
        assert!(railgun.fire);
        assert!(!railgun.charging);
        assert!(flags.try_pend(wake, Pend::Any).is_some());
        assert!(input.backlog());

        assert!(block_on(input.service()));
        let railgun = block_on(world.lock_player()).stats.railgun;
        assert!(railgun.charging);
        assert_eq!(railgun.charge, 0);
        assert!(flags.try_pend(wake, Pend::Any).is_some());
        assert!(!input.backlog());

        assert!(!block_on(input.service()));
    }

    #[test]
    fn finished_round_leaves_queues_for_menu() {
        let world = World::new();
        let inbox = ButtonInbox::new();
        let flags = EventFlags::new();
        let mut input = InputTask::new(&world, &inbox, &flags);

        block_on(world.lock_player()).game.status = GameStatus::Ended;
        inbox.record(Button::Railgun, ButtonState::Pressed).unwrap();

        assert!(!block_on(input.service()));
        assert_eq!(inbox.pending(Button::Railgun), 1);
        assert!(flags.peek().is_empty());
    }
}
