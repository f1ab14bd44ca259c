use log::debug;
use rppal::gpio::{Gpio, OutputPin};
use rppal::pwm::{Channel, Polarity, Pwm};
use std::time::Duration;

use crate::config::EscConfig;
use crate::error::{EscError, Result};

/// A pin that can emit servo-style pulses.
pub trait ServoOutput {
    fn set_pulse_width(&mut self, pulse_width: Duration) -> Result<()>;

    /// Stop pulsing and leave the line low.
    fn detach(&mut self) -> Result<()>;
}

impl<T: ServoOutput + ?Sized> ServoOutput for Box<T> {
    fn set_pulse_width(&mut self, pulse_width: Duration) -> Result<()> {
        (**self).set_pulse_width(pulse_width)
    }

    fn detach(&mut self) -> Result<()> {
        (**self).detach()
    }
}

fn frame_period(frequency: f64) -> Duration {
    Duration::from_secs_f64(1.0 / frequency)
}

/// Software PWM on a plain GPIO output.
pub struct SoftwarePwm {
    pin: OutputPin,
    period: Duration,
}

impl SoftwarePwm {
    pub fn new(gpio: &Gpio, pin: u8, frequency: f64) -> Result<Self> {
        let pin = gpio.get(pin)?.into_output_low();
        Ok(SoftwarePwm {
            pin,
            period: frame_period(frequency),
        })
    }
}

impl ServoOutput for SoftwarePwm {
    fn set_pulse_width(&mut self, pulse_width: Duration) -> Result<()> {
        debug!("GPIO {} pulse {}us", self.pin.pin(), pulse_width.as_micros());
        self.pin.set_pwm(self.period, pulse_width)?;
        Ok(())
    }

    fn detach(&mut self) -> Result<()> {
        self.pin.clear_pwm()?;
        self.pin.set_low();
        Ok(())
    }
}

/// Hardware PWM through the PWM peripheral.
pub struct HardwarePwm {
    pwm: Pwm,
}

impl HardwarePwm {
    pub fn new(pin: u8, frequency: f64) -> Result<Self> {
        let channel = hardware_channel(pin)?;
        let pwm = Pwm::with_period(
            channel,
            frame_period(frequency),
            Duration::ZERO,
            Polarity::Normal,
            true,
        )?;
        Ok(HardwarePwm { pwm })
    }
}

impl ServoOutput for HardwarePwm {
    fn set_pulse_width(&mut self, pulse_width: Duration) -> Result<()> {
        debug!("hardware PWM pulse {}us", pulse_width.as_micros());
        self.pwm.set_pulse_width(pulse_width)?;
        Ok(())
    }

    fn detach(&mut self) -> Result<()> {
        self.pwm.set_pulse_width(Duration::ZERO)?;
        Ok(())
    }
}

pub fn hardware_channel(pin: u8) -> Result<Channel> {
    match pin {
        12 | 18 => Ok(Channel::Pwm0),
        13 | 19 => Ok(Channel::Pwm1),
        _ => Err(EscError::NoHardwarePwm { pin }),
    }
}

/// Drives a PWM output as a servo whose angle maps linearly onto the
/// pulse width range.
pub struct AngularServo<S> {
    output: S,
    min_angle: f64,
    max_angle: f64,
    min_pulse: Duration,
    max_pulse: Duration,
    angle: Option<f64>,
}

impl<S: ServoOutput> AngularServo<S> {
    pub fn new(
        output: S,
        min_angle: f64,
        max_angle: f64,
        min_pulse: Duration,
        max_pulse: Duration,
    ) -> Self {
        AngularServo {
            output,
            min_angle,
            max_angle,
            min_pulse,
            max_pulse,
            angle: None,
        }
    }

    pub fn from_config(output: S, config: &EscConfig) -> Self {
        Self::new(
            output,
            config.throttle.full_rev,
            config.throttle.full_fwd,
            Duration::from_micros(config.min_pulse_us),
            Duration::from_micros(config.max_pulse_us),
        )
    }

    pub fn pulse_width_for(&self, angle: f64) -> Result<Duration> {
        if !(self.min_angle..=self.max_angle).contains(&angle) {
            return Err(EscError::ThrottleOutOfRange {
                value: angle,
                min: self.min_angle,
                max: self.max_angle,
            });
        }
        let ratio = (angle - self.min_angle) / (self.max_angle - self.min_angle);
        let span = (self.max_pulse - self.min_pulse).as_secs_f64();
        Ok(self.min_pulse + Duration::from_secs_f64(ratio * span))
    }

    pub fn set_angle(&mut self, angle: f64) -> Result<()> {
        let pulse_width = self.pulse_width_for(angle)?;
        self.output.set_pulse_width(pulse_width)?;
        self.angle = Some(angle);
        Ok(())
    }

    /// Last commanded angle, `None` when detached.
    pub fn angle(&self) -> Option<f64> {
        self.angle
    }

    pub fn detach(&mut self) -> Result<()> {
        self.output.detach()?;
        self.angle = None;
        Ok(())
    }
}
