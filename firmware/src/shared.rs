//! Cross-core shared state.
//!
//! The input loop on core 1 is the only writer of the touch state and the
//! dirty flag; the output loop on core 0 is the only reader. The touched
//! bitmap fits one word, so a whole scan of touch states publishes
//! atomically. Pressure values are per-sensor atomics; a reader may see
//! values from two different scans, which the report format tolerates.

use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, Ordering};

use slider_core::{TouchSnapshot, SENSOR_COUNT};

/// The latest touch scan, published by core 1.
pub struct SharedTouch {
    touched: AtomicU32,
    pressures: [AtomicU16; SENSOR_COUNT],
}

impl SharedTouch {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            touched: AtomicU32::new(0),
            pressures: [const { AtomicU16::new(0) }; SENSOR_COUNT],
        }
    }

    /// Publish one scan's touched states.
    pub fn publish_states(&self, states: &[bool; SENSOR_COUNT]) {
        let mut bits = 0u32;
        for (sensor, &on) in states.iter().enumerate() {
            if on {
                bits |= 1 << sensor;
            }
        }
        self.touched.store(bits, Ordering::Relaxed);
    }

    /// Publish one scan's pressure readouts.
    pub fn publish_readouts(&self, readouts: &[u16; SENSOR_COUNT]) {
        for (slot, &value) in self.pressures.iter().zip(readouts) {
            slot.store(value, Ordering::Relaxed);
        }
    }

    /// Read the current state as one snapshot.
    #[must_use]
    pub fn snapshot(&self) -> TouchSnapshot {
        let bits = self.touched.load(Ordering::Relaxed);
        let mut snapshot = TouchSnapshot::empty();
        for sensor in 0..SENSOR_COUNT {
            snapshot.touched[sensor] = bits & (1 << sensor) != 0;
            snapshot.pressures[sensor] = self.pressures[sensor].load(Ordering::Relaxed);
        }
        snapshot
    }
}

/// The touch state both cores share.
pub static TOUCH: SharedTouch = SharedTouch::new();

/// Raised by the scan loop when a key transition wants a lighting
/// refresh; consumed by the output loop. Only meaningful in keyboard
/// mode.
pub static LIGHTS_DIRTY: AtomicBool = AtomicBool::new(false);
