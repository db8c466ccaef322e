//! ST7789 display, 320×170 over SPI with DMA, as the game [`Screen`].

use embedded_graphics::pixelcolor::{
    Rgb565,
    RgbColor,
};
use embedded_graphics::prelude::Point;
use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::{
    Async,
    dma::{
        DmaRxBuf,
        DmaTxBuf,
    },
    dma_buffers,
    gpio::{
        Level,
        Output,
        OutputConfig,
    },
    spi::master::Spi,
    time::Rate,
};

use super::DisplayResources;
use crate::config::WORLD_SIZE;
use crate::render::{
    Palette,
    Screen,
};

type SpiInterface<'a> = mipidsi::interface::SpiInterface<
    'a,
    ExclusiveDevice<esp_hal::spi::master::SpiDmaBus<'a, Async>, Output<'a>, esp_hal::delay::Delay>,
    Output<'a>,
>;

pub type Display<'a> = mipidsi::Display<SpiInterface<'a>, mipidsi::models::ST7789, Output<'a>>;

const WIDTH: i32 = 320;
const HEIGHT: i32 = 170;

/// The 128×128 play field, centred on the panel.
pub const PLAY_FIELD_ORIGIN: Point = Point::new(
    (WIDTH - WORLD_SIZE as i32) / 2,
    (HEIGHT - WORLD_SIZE as i32) / 2,
);

/// Black on white, like a memory LCD.
pub const PALETTE: Palette<Rgb565> = Palette::new(Rgb565::BLACK, Rgb565::WHITE);

const SPI_BUFFER: usize = 32000;

impl<'a> From<DisplayResources<'a>> for Display<'a> {
    fn from(res: DisplayResources<'a>) -> Self {
        let (rx_buffer, rx_descriptors, tx_buffer, tx_descriptors) = dma_buffers!(SPI_BUFFER);
        let dma_rx_buf = DmaRxBuf::new(rx_descriptors, rx_buffer).unwrap();
        let dma_tx_buf = DmaTxBuf::new(tx_descriptors, tx_buffer).unwrap();

        let mut delay = esp_hal::delay::Delay::new();

        let dc = Output::new(res.dc, Level::Low, OutputConfig::default());
        let mut rst = Output::new(res.rst, Level::Low, OutputConfig::default());
        rst.set_high();

        let spi = Spi::new(
            res.spi,
            esp_hal::spi::master::Config::default().with_frequency(Rate::from_mhz(80)),
        )
        .unwrap()
        .with_sck(res.sck)
        .with_mosi(res.mosi)
        .with_miso(res.miso)
        .with_dma(res.dma)
        .with_buffers(dma_rx_buf, dma_tx_buf)
        .into_async();

        let cs = Output::new(res.cs, Level::High, OutputConfig::default());
        let spi_device = ExclusiveDevice::new(spi, cs, delay).unwrap();

        let buffer = crate::mk_static!([u8; SPI_BUFFER], [0_u8; SPI_BUFFER]);
        let di = mipidsi::interface::SpiInterface::new(spi_device, dc, buffer);

        mipidsi::Builder::new(mipidsi::models::ST7789, di)
            .reset_pin(rst)
            .display_size(HEIGHT as u16, WIDTH as u16)
            .invert_colors(mipidsi::options::ColorInversion::Inverted)
            .orientation(
                mipidsi::options::Orientation::new().rotate(mipidsi::options::Rotation::Deg90),
            )
            .display_offset(35, 0)
            .init(&mut delay)
            .unwrap()
    }
}

/// mipidsi writes straight to the panel, so there is nothing to flush.
impl Screen for Display<'_> {
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
