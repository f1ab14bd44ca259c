use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{EscError, Result};

/// BCM pin driving the relay transistor that closes the ESC power button.
pub const ESC_POWER_PIN: u8 = 23;
/// BCM pin carrying the ESC signal.
pub const ESC_PWM_PIN: u8 = 13;

pub const FULL_REV_THROTTLE: f64 = -90.0;
pub const NEUTRAL_THROTTLE: f64 = 0.0;
pub const FULL_FWD_THROTTLE: f64 = 90.0;

// Smallest throttles that actually spin the motor.
pub const MIN_FWD_THROTTLE: f64 = 10.1;
pub const MIN_REV_THROTTLE: f64 = -8.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PwmBackend {
    /// Software PWM on any GPIO pin.
    Software,
    /// BCM2835 PWM peripheral, only on 12/18 (PWM0) and 13/19 (PWM1).
    Hardware,
}

/// Fixed throttle constants. Not read from config files.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrottleLimits {
    pub full_rev: f64,
    pub neutral: f64,
    pub full_fwd: f64,
    pub min_fwd: f64,
    pub min_rev: f64,
}

impl Default for ThrottleLimits {
    fn default() -> Self {
        ThrottleLimits {
            full_rev: FULL_REV_THROTTLE,
            neutral: NEUTRAL_THROTTLE,
            full_fwd: FULL_FWD_THROTTLE,
            min_fwd: MIN_FWD_THROTTLE,
            min_rev: MIN_REV_THROTTLE,
        }
    }
}

impl ThrottleLimits {
    /// Offset added to any forward request to jump the dead zone.
    pub fn fwd_offset(&self) -> f64 {
        self.min_fwd - 1.0
    }

    /// Offset added to any reverse request to jump the dead zone.
    pub fn rev_offset(&self) -> f64 {
        self.min_rev + 1.0
    }

    pub fn validate(&self) -> Result<()> {
        let values = [self.full_rev, self.neutral, self.full_fwd, self.min_fwd, self.min_rev];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(EscError::InvalidConfig("throttle limits must be finite".into()));
        }
        if !(self.full_rev < self.neutral && self.neutral < self.full_fwd) {
            return Err(EscError::InvalidConfig(format!(
                "throttle limits must satisfy full_rev < neutral < full_fwd, got {} / {} / {}",
                self.full_rev, self.neutral, self.full_fwd
            )));
        }
        if self.min_fwd < self.neutral + 1.0 || self.min_fwd > self.full_fwd {
            return Err(EscError::InvalidConfig(format!(
                "min_fwd {} must lie in [{}, {}]",
                self.min_fwd,
                self.neutral + 1.0,
                self.full_fwd
            )));
        }
        if self.min_rev > self.neutral - 1.0 || self.min_rev < self.full_rev {
            return Err(EscError::InvalidConfig(format!(
                "min_rev {} must lie in [{}, {}]",
                self.min_rev,
                self.full_rev,
                self.neutral - 1.0
            )));
        }
        Ok(())
    }
}

/// Wiring and PWM settings. A JSON file may override these; unknown keys
/// are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EscConfig {
    pub power_pin: u8,
    pub pwm_pin: u8,
    pub pwm_backend: PwmBackend,
    pub pwm_frequency: f64,
    pub min_pulse_us: u64,
    pub max_pulse_us: u64,
    #[serde(skip)]
    pub throttle: ThrottleLimits,
}

impl Default for EscConfig {
    fn default() -> Self {
        EscConfig {
            power_pin: ESC_POWER_PIN,
            pwm_pin: ESC_PWM_PIN,
            pwm_backend: PwmBackend::Software,
            pwm_frequency: 50.0,
            min_pulse_us: 1000,
            max_pulse_us: 2000,
            throttle: ThrottleLimits::default(),
        }
    }
}

impl EscConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: EscConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.power_pin == self.pwm_pin {
            return Err(EscError::InvalidConfig(format!(
                "power and PWM pins are both GPIO {}",
                self.power_pin
            )));
        }
        if !(self.pwm_frequency.is_finite() && self.pwm_frequency > 0.0) {
            return Err(EscError::InvalidConfig(format!(
                "bad PWM frequency {}",
                self.pwm_frequency
            )));
        }
        if self.min_pulse_us >= self.max_pulse_us {
            return Err(EscError::InvalidConfig(format!(
                "min pulse {}us must be below max pulse {}us",
                self.min_pulse_us, self.max_pulse_us
            )));
        }
        if self.max_pulse_us as f64 >= 1_000_000.0 / self.pwm_frequency {
            return Err(EscError::InvalidConfig(format!(
                "max pulse {}us does not fit in a {}Hz frame",
                self.max_pulse_us, self.pwm_frequency
            )));
        }
        self.throttle.validate()
    }
}
