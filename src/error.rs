use thiserror::Error;

/// Errors raised while driving the ESC.
#[derive(Error, Debug)]
pub enum EscError {
    #[error("GPIO error: {0}")]
    Gpio(#[from] rppal::gpio::Error),

    #[error("PWM error: {0}")]
    Pwm(#[from] rppal::pwm::Error),

    /// The pin has no hardware PWM channel behind it.
    #[error("GPIO {pin} is not a hardware PWM pin (use 12/18 or 13/19)")]
    NoHardwarePwm { pin: u8 },

    #[error("throttle {value} outside [{min}, {max}]")]
    ThrottleOutOfRange { value: f64, min: f64, max: f64 },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("cannot read config: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("cannot parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// A blocking wait was cut short by SIGINT/SIGTERM.
    #[error("interrupted")]
    Interrupted,
}

pub type Result<T> = std::result::Result<T, EscError>;
