//! Game-over screen and the menu that starts the next round.

use embassy_time::{
    Duration,
    Ticker,
};
use embedded_graphics::prelude::*;

use crate::config::{
    MENU_POLL_MS,
    MESSAGE_X,
    STATUS_LINE,
};
use crate::queue::ButtonInbox;
use crate::render::{
    self,
    Palette,
    RoundOver,
    Screen,
};
use crate::state::{
    Button,
    GameStatus,
    Outcome,
};
use crate::sync::Mutex;
use crate::world::World;

/// Outcome message plus the menu entries.
pub fn draw_menu<D>(
    target: &mut D,
    palette: &Palette<D::Color>,
    outcome: Outcome,
) -> Result<(), D::Error>
where
    D: DrawTarget,
{
    target.clear(palette.background)?;
    render::draw_text(target, palette, outcome.message(), render::on_line(MESSAGE_X, STATUS_LINE))?;
    render::draw_text(target, palette, "GAME MENU", render::on_line(0, 1))?;
    render::draw_text(target, palette, "START GAME:(A)", render::on_line(0, 2))?;
    Ok(())
}

/// Drain the button queues looking for a railgun press.
///
/// Shield events carry no menu action and are dropped.
pub fn start_pressed(inbox: &ButtonInbox) -> bool {
    while inbox.pop(Button::Shield).is_some() {}
    while let Some(state) = inbox.pop(Button::Railgun) {
        if state.is_pressed() {
            return true;
        }
    }
    false
}

pub struct MenuTask<'a, D: Screen> {
    world: &'a World,
    inbox: &'a ButtonInbox,
    screen: &'a Mutex<D>,
    round_over: &'a RoundOver,
    palette: Palette<D::Color>,
    origin: Point,
}

impl<'a, D: Screen> MenuTask<'a, D> {
    pub const fn new(
        world: &'a World,
        inbox: &'a ButtonInbox,
        screen: &'a Mutex<D>,
        round_over: &'a RoundOver,
        palette: Palette<D::Color>,
        origin: Point,
    ) -> Self {
        Self {
            world,
            inbox,
            screen,
            round_over,
            palette,
            origin,
        }
    }

    pub async fn run(self) -> ! {
        info!("menu task started");
        loop {
            let outcome = self.round_over.wait().await;
            if self.show(outcome).await.is_err() {
                error!("menu: drawing failed");
            }
            self.wait_for_start().await;
            self.world.reset().await;
            info!("new round started");
        }
    }

    /// End the round and put the outcome and menu on screen.
    pub async fn show(&self, outcome: Outcome) -> Result<(), D::Error> {
        self.world.lock_player().await.game.status = GameStatus::Ended;
        self.inbox.clear();

        let mut screen = self.screen.lock().await;
        draw_menu(&mut screen.translated(self.origin), &self.palette, outcome)?;
        screen.flush()
    }

    /// Poll the queues until the start button is pressed.
    pub async fn wait_for_start(&self) {
        let mut ticker = Ticker::every(Duration::from_millis(MENU_POLL_MS));
        while !start_pressed(self.inbox) {
            ticker.next().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;
    use embedded_graphics::pixelcolor::BinaryColor;

    use super::*;
    use crate::render::tests::{
        Canvas,
        PALETTE,
    };
    use crate::state::ButtonState;

    #[test]
    fn only_railgun_press_starts() {
        let inbox = ButtonInbox::new();
        assert!(!start_pressed(&inbox));

        inbox.record(Button::Shield, ButtonState::Pressed).unwrap();
        inbox.record(Button::Railgun, ButtonState::Released).unwrap();
        assert!(!start_pressed(&inbox));
        assert_eq!(inbox.pending(Button::Shield), 0);

        inbox.record(Button::Railgun, ButtonState::Released).unwrap();
        inbox.record(Button::Railgun, ButtonState::Pressed).unwrap();
        inbox.record(Button::Railgun, ButtonState::Released).unwrap();
        assert!(start_pressed(&inbox));
        assert_eq!(inbox.pending(Button::Railgun), 1);
    }

    #[test]
    fn menu_is_drawn() {
        let mut canvas = Canvas::new();
        draw_menu(&mut canvas, &PALETTE, Outcome::Crashed).unwrap();
        let lit = canvas.pixels.iter().flatten().filter(|&&p| p == BinaryColor::On).count();
        assert!(lit > 0);
    }

    #[test]
    fn show_ends_round_and_drops_stale_events() {
        let world = World::new();
        let inbox = ButtonInbox::new();
        let screen = Mutex::new(Canvas::new());
        let round_over = RoundOver::new();
        let menu = MenuTask::new(&world, &inbox, &screen, &round_over, PALETTE, Point::zero());

        inbox.record(Button::Railgun, ButtonState::Pressed).unwrap();
        block_on(menu.show(Outcome::Hit)).unwrap();

        assert_eq!(block_on(world.lock_player()).game.status, GameStatus::Ended);
        assert_eq!(inbox.pending(Button::Railgun), 0);
        assert_eq!(block_on(screen.lock()).flushes, 1);
    }
}
