//! Canyon Siege firmware for the Disobey 2026 badge.
//!
//! Controls:
//! - D-pad: steer the platform (left/right hard, up/down gradual)
//! - A: hold to charge the railgun, release to fire; starts a new round
//! - B: hold to raise the shield
//!
//! Left LED bar blinks during the evacuation, right bar with railgun charge.

#![no_std]
#![no_main]

use canyon_siege::badge::{
    self,
    Backlight,
    Buttons,
    DPad,
    Display,
    Leds,
    PALETTE,
    PLAY_FIELD_ORIGIN,
};
use canyon_siege::sync::Mutex;
use canyon_siege::{
    Button,
    ButtonInbox,
    EventFlags,
    FeedbackEvent,
    FeedbackTask,
    GameClock,
    InputTask,
    MenuTask,
    PhysicsEvent,
    PhysicsTask,
    RenderTask,
    RoundOver,
    SteeringTask,
    World,
    mk_static,
    split_resources,
    watch_button,
};
use defmt::info;
use embassy_executor::Spawner;
use embassy_time::{
    Duration,
    Instant,
    Timer,
};
use esp_backtrace as _;
use esp_hal::gpio::Input;
use esp_hal::timer::timg::TimerGroup;
use esp_println as _;

esp_bootloader_esp_idf::esp_app_desc!();

type SharedDisplay = Mutex<Display<'static>>;

static WORLD: World = World::new();
static INBOX: ButtonInbox = ButtonInbox::new();
static CLOCK: GameClock = GameClock::new();
static PHYSICS: EventFlags<PhysicsEvent> = EventFlags::new();
static FEEDBACK: EventFlags<FeedbackEvent> = EventFlags::new();
static ROUND_OVER: RoundOver = RoundOver::new();

// ── Tasks ───────────────────────────────────────────────────────────────────

#[embassy_executor::task]
async fn clock_task() {
    CLOCK.run().await
}

#[embassy_executor::task(pool_size = 2)]
async fn button_task(pin: Input<'static>, button: Button) {
    watch_button(pin, button, &INBOX).await
}

#[embassy_executor::task]
async fn input_task() {
    InputTask::new(&WORLD, &INBOX, &PHYSICS).run().await
}

#[embassy_executor::task]
async fn steering_task(dpad: DPad) {
    SteeringTask::new(&WORLD, &CLOCK, &PHYSICS, dpad).run().await
}

#[embassy_executor::task]
async fn physics_task(seed: u32) {
    PhysicsTask::new(&WORLD, &CLOCK, &PHYSICS, &FEEDBACK, seed)
        .run()
        .await
}

#[embassy_executor::task]
async fn feedback_task(leds: Leds<'static>) {
    FeedbackTask::new(&FEEDBACK, leds).run().await
}

#[embassy_executor::task]
async fn render_task(display: &'static SharedDisplay) {
    RenderTask::new(&WORLD, display, &ROUND_OVER, PALETTE, PLAY_FIELD_ORIGIN)
        .run()
        .await
}

#[embassy_executor::task]
async fn menu_task(display: &'static SharedDisplay) {
    MenuTask::new(&WORLD, &INBOX, display, &ROUND_OVER, PALETTE, PLAY_FIELD_ORIGIN)
        .run()
        .await
}

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    let peripherals = badge::init();
    let resources = split_resources!(peripherals);

    esp_alloc::heap_allocator!(size: 64 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let display: &'static SharedDisplay =
        mk_static!(SharedDisplay, Mutex::new(resources.display.into()));
    let backlight = mk_static!(Backlight, resources.backlight.into());
    backlight.on();
    let leds: Leds<'static> = resources.leds.into();
    let buttons: Buttons = resources.buttons.into();

    info!("Canyon Siege starting");

    spawner.must_spawn(clock_task());
    spawner.must_spawn(button_task(buttons.a, Button::Railgun));
    spawner.must_spawn(button_task(buttons.b, Button::Shield));
    spawner.must_spawn(input_task());
    spawner.must_spawn(steering_task(buttons.dpad));
    spawner.must_spawn(physics_task(Instant::now().as_ticks() as u32));
    spawner.must_spawn(feedback_task(leds));
    spawner.must_spawn(render_task(display));
    spawner.must_spawn(menu_task(display));

    loop {
        Timer::after(Duration::from_secs(600)).await;
    }
}
