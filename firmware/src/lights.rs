//! The physical WS2812B chain.
//!
//! The image side of the lights lives in `slider-core`; this module only
//! turns a committed [`LedImage`] into the DMA write, applying the global
//! brightness on the way out.

use embassy_rp::peripherals::PIO0;
use embassy_rp::pio_programs::ws2812::PioWs2812;
use smart_leds::RGB8;

use slider_core::{LedImage, STRIP_LEN};

/// Owns the PIO state machine driving the chain.
pub struct LedStrip<'d> {
    driver: PioWs2812<'d, PIO0, 0, STRIP_LEN>,
}

impl<'d> LedStrip<'d> {
    #[must_use]
    pub fn new(driver: PioWs2812<'d, PIO0, 0, STRIP_LEN>) -> Self {
        Self { driver }
    }

    /// Push the image to the chain.
    pub async fn commit(&mut self, image: &LedImage) {
        let scale = u16::from(image.brightness()) + 1;
        let mut frame = [RGB8::default(); STRIP_LEN];
        for (out, px) in frame.iter_mut().zip(image.pixels()) {
            out.r = ((u16::from(px.r) * scale) >> 8) as u8;
            out.g = ((u16::from(px.g) * scale) >> 8) as u8;
            out.b = ((u16::from(px.b) * scale) >> 8) as u8;
        }
        self.driver.write(&frame).await;
    }
}
