//! WS2812 LED bars as the game's two indicators.
//!
//! The badge has 10 RGB LEDs on one RMT channel, five per bar. The left bar
//! shows evacuation, the right bar the railgun charge blink.

extern crate alloc;

use embassy_time::{
    Duration,
    Timer,
};
use esp_hal::{
    Blocking,
    gpio::Level,
    rmt::{
        PulseCode,
        Tx,
    },
};
use palette::Srgb;

use crate::feedback::{
    Indicator,
    Indicators,
};

/// Total LEDs. Index 0 is bottom right, 4 top right, 5 top left, 9 bottom left.
pub const LED_COUNT: usize = 10;

/// LEDs per bar.
pub const BAR_COUNT: usize = 5;

const OFF: Srgb<u8> = Srgb::new(0, 0, 0);
const EVACUATION_COLOR: Srgb<u8> = Srgb::new(24, 6, 0);
const RAILGUN_COLOR: Srgb<u8> = Srgb::new(0, 8, 24);

pub struct Leds<'a> {
    channel: Option<esp_hal::rmt::Channel<'a, Blocking, Tx>>,
    framebuffer: [Srgb<u8>; LED_COUNT],
}

impl<'a> Leds<'a> {
    pub const fn new(channel: esp_hal::rmt::Channel<'a, Blocking, Tx>) -> Self {
        Self {
            channel: Some(channel),
            framebuffer: [OFF; LED_COUNT],
        }
    }

    /// Flush the framebuffer to the physical LEDs.
    pub async fn update(&mut self) {
        let Some(channel) = self.channel.take() else {
            error!("RMT channel lost during previous transmission");
            return;
        };

        let pulses = self
            .framebuffer
            .iter()
            .flat_map(|color| {
                // WS2812 expects GRB byte order
                [
                    Self::byte_to_pulses(color.green),
                    Self::byte_to_pulses(color.red),
                    Self::byte_to_pulses(color.blue),
                ]
                .into_iter()
                .flatten()
            })
            .chain(core::iter::once(PulseCode::end_marker()))
            .collect::<alloc::vec::Vec<_>>();

        let transaction = match channel.transmit(&pulses) {
            Ok(t) => t,
            Err(e) => {
                error!("RMT transmit failed: {}", e);
                return;
            }
        };

        self.channel = Some(match transaction.wait() {
            Ok(ch) => ch,
            Err((err, ch)) => {
                error!("RMT transaction failed: {}", err);
                ch
            }
        });

        // WS2812 reset time
        Timer::after(Duration::from_micros(50)).await;
    }

    /// Right bar, bottom to top. Hardware indices 0..5 already run that way.
    pub fn set_right_bar(&mut self, colors: &[Srgb<u8>; BAR_COUNT]) {
        self.framebuffer[..BAR_COUNT].copy_from_slice(colors);
    }

    /// Left bar, bottom to top. Hardware indices 5..10 run top to bottom.
    pub fn set_left_bar(&mut self, colors: &[Srgb<u8>; BAR_COUNT]) {
        for i in 0..BAR_COUNT {
            self.framebuffer[BAR_COUNT + i] = colors[BAR_COUNT - 1 - i];
        }
    }

    /// WS2812 bit timing at 40 MHz RMT clock.
    const fn bit_to_pulse(bit: bool) -> PulseCode {
        if bit {
            // '1': 0.8 µs high, 0.45 µs low
            PulseCode::new(Level::High, 32, Level::Low, 18)
        } else {
            // '0': 0.4 µs high, 0.85 µs low
            PulseCode::new(Level::High, 16, Level::Low, 34)
        }
    }

    fn byte_to_pulses(byte: u8) -> [PulseCode; 8] {
        let mut pulses = [PulseCode::default(); 8];
        for (i, pulse) in pulses.iter_mut().enumerate() {
            *pulse = Self::bit_to_pulse((byte >> (7 - i)) & 1 != 0);
        }
        pulses
    }
}

impl Indicators for Leds<'_> {
    async fn set(&mut self, indicator: Indicator, on: bool) {
        let before = self.framebuffer;
        match (indicator, on) {
            (Indicator::Evacuation, true) => self.set_left_bar(&[EVACUATION_COLOR; BAR_COUNT]),
            (Indicator::Evacuation, false) => self.set_left_bar(&[OFF; BAR_COUNT]),
            (Indicator::Railgun, true) => self.set_right_bar(&[RAILGUN_COLOR; BAR_COUNT]),
            (Indicator::Railgun, false) => self.set_right_bar(&[OFF; BAR_COUNT]),
        }
        if self.framebuffer != before {
            self.update().await;
        }
    }
}
