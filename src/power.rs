use rppal::gpio::{Gpio, OutputPin};

use crate::error::Result;

/// Digital line that switches the ESC supply.
pub trait PowerSwitch {
    fn set_on(&mut self);
    fn set_off(&mut self);
    fn is_on(&self) -> bool;
}

/// Relay coil driven through a transistor on a GPIO output. The relay
/// shorts the ESC power button contacts while the pin is high.
pub struct RelaySwitch {
    pin: OutputPin,
}

impl RelaySwitch {
    /// Claims the pin and drives it low so the ESC starts unpowered.
    pub fn new(gpio: &Gpio, pin: u8) -> Result<Self> {
        let pin = gpio.get(pin)?.into_output_low();
        Ok(RelaySwitch { pin })
    }
}

impl PowerSwitch for RelaySwitch {
    fn set_on(&mut self) {
        self.pin.set_high();
    }

    fn set_off(&mut self) {
        self.pin.set_low();
    }

    fn is_on(&self) -> bool {
        self.pin.is_set_high()
    }
}
