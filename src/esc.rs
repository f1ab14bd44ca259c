use log::{info, warn};
use rppal::gpio::Gpio;
use std::time::Duration;

use crate::config::{EscConfig, PwmBackend, ThrottleLimits};
use crate::delay::{Delay, InterruptibleDelay};
use crate::error::Result;
use crate::power::{PowerSwitch, RelaySwitch};
use crate::servo::{AngularServo, HardwarePwm, ServoOutput, SoftwarePwm};
use crate::throttle::fix_throttle;

// Calibration: hold full throttle while the ESC latches the top end point,
// then neutral.
const CAL_FULL_HOLD: Duration = Duration::from_secs(2);
const CAL_BEEP_WAIT: Duration = Duration::from_secs(1);
const CAL_NEUTRAL_HOLD: Duration = Duration::from_secs(2);
const CAL_TONE_WAIT: Duration = Duration::from_secs(1);

const START_TONE_WAIT: Duration = Duration::from_secs(2);

/// ESC wired to the Pi with the real pins.
pub type PiEsc = EscController<RelaySwitch, Box<dyn ServoOutput>, InterruptibleDelay>;

/// Single ESC behind a power relay and a servo-style PWM signal.
pub struct EscController<P, S, D> {
    power: P,
    servo: AngularServo<S>,
    delay: D,
    limits: ThrottleLimits,
}

impl PiEsc {
    /// Claims both pins. The power pin comes up low, the signal idle.
    pub fn open(config: &EscConfig, delay: InterruptibleDelay) -> Result<Self> {
        config.validate()?;
        let gpio = Gpio::new()?;

        let power = RelaySwitch::new(&gpio, config.power_pin)?;
        info!("GPIO {} initialized as ESC power", config.power_pin);

        let (pin, frequency) = (config.pwm_pin, config.pwm_frequency);
        let output: Box<dyn ServoOutput> = match config.pwm_backend {
            PwmBackend::Software => Box::new(SoftwarePwm::new(&gpio, pin, frequency)?),
            PwmBackend::Hardware => Box::new(HardwarePwm::new(pin, frequency)?),
        };
        info!(
            "GPIO {} initialized as ESC signal ({:?} PWM, {}Hz)",
            config.pwm_pin, config.pwm_backend, config.pwm_frequency
        );

        let servo = AngularServo::from_config(output, config);
        let mut esc = EscController::new(power, servo, delay, config.throttle);
        esc.idle()?;
        Ok(esc)
    }
}

impl<P, S, D> EscController<P, S, D>
where
    P: PowerSwitch,
    S: ServoOutput,
    D: Delay,
{
    pub fn new(power: P, servo: AngularServo<S>, delay: D, limits: ThrottleLimits) -> Self {
        EscController { power, servo, delay, limits }
    }

    pub fn power_on(&mut self) {
        info!("powering on ESC");
        self.power.set_on();
        info!("ESC on");
    }

    pub fn power_off(&mut self) {
        info!("powering off ESC");
        self.power.set_off();
        info!("ESC off");
    }

    pub fn is_powered(&self) -> bool {
        self.power.is_on()
    }

    /// Commands `throttle` after dead-zone correction and clamping.
    /// Returns the angle actually sent.
    pub fn set_throttle(&mut self, throttle: f64) -> Result<f64> {
        let adjusted = fix_throttle(throttle, &self.limits);
        self.servo.set_angle(adjusted)?;
        info!("Throttle: {:.1} / \u{00B1}{}", adjusted, self.limits.full_fwd);
        Ok(adjusted)
    }

    /// Sends `throttle` as is. Values outside the servo range are refused.
    pub fn set_throttle_raw(&mut self, throttle: f64) -> Result<()> {
        self.servo.set_angle(throttle)?;
        info!("Throttle: {} / \u{00B1}{}", throttle, self.limits.full_fwd);
        Ok(())
    }

    /// Puts a neutral pulse on the signal line without logging a throttle
    /// change, so the ESC sees a valid idle signal from the start.
    pub fn idle(&mut self) -> Result<()> {
        self.servo.set_angle(self.limits.neutral)
    }

    /// Last angle sent to the ESC.
    pub fn throttle(&self) -> Option<f64> {
        self.servo.angle()
    }

    pub fn limits(&self) -> &ThrottleLimits {
        &self.limits
    }

    pub fn sleep(&mut self, duration: Duration) -> Result<()> {
        self.delay.sleep(duration)
    }

    /// Teaches the ESC its end points: full forward at power up, then
    /// neutral. Nothing confirms success; listen for the beeps.
    pub fn calibrate(&mut self) -> Result<()> {
        info!("calibrating:");
        info!("setting max throttle");
        self.set_throttle(self.limits.full_fwd)?;
        self.power_on();
        self.sleep(CAL_FULL_HOLD)?;
        info!("should hear two beeps");
        self.sleep(CAL_BEEP_WAIT)?;

        info!("setting neutral throttle");
        self.set_throttle(self.limits.neutral)?;
        info!("should hear long beep");
        self.sleep(CAL_NEUTRAL_HOLD)?;
        info!("ESC should be calibrated");

        info!("normal startup noises:");
        info!("first beeps: 3 for 3 cell battery, 4 for 4 cell");
        self.sleep(CAL_TONE_WAIT)?;
        info!("second beeps: 1 for brake on, 2 for brake off");
        self.sleep(CAL_TONE_WAIT)?;
        info!("ESC startup done");
        Ok(())
    }

    /// Normal arming: neutral signal, power up, wait out the startup tones.
    pub fn start(&mut self) -> Result<()> {
        info!("ESC starting up");
        self.set_throttle(self.limits.neutral)?;
        self.power_on();
        info!("listen to the ESC beeps now");
        self.sleep(START_TONE_WAIT)?;
        info!("first beeps: 3 for 3 cell battery, 4 for 4 cell");
        self.sleep(START_TONE_WAIT)?;
        info!("second beeps: 1 for brake on, 2 for brake off");
        self.sleep(START_TONE_WAIT)?;
        info!("ESC startup done");
        Ok(())
    }

    /// Neutral throttle, then power off. Power is cut even if the
    /// throttle command fails.
    pub fn shutdown(&mut self) -> Result<()> {
        let neutral = self.set_throttle(self.limits.neutral).map(|_| ());
        if let Err(e) = &neutral {
            warn!("could not set neutral throttle: {}", e);
        }
        self.power_off();
        neutral
    }
}
