//! Recording fakes for the hardware seams.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::delay::Delay;
use crate::error::{EscError, Result};
use crate::power::PowerSwitch;
use crate::servo::ServoOutput;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    PowerOn,
    PowerOff,
    /// Pulse width in microseconds.
    Pulse(f64),
    Detach,
    Sleep(Duration),
}

#[derive(Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<Event>>>);

impl EventLog {
    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn pulses(&self) -> Vec<f64> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Pulse(us) => Some(us),
                _ => None,
            })
            .collect()
    }

    pub fn total_sleep(&self) -> Duration {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Sleep(d) => Some(d),
                _ => None,
            })
            .sum()
    }
}

pub struct RecordingSwitch {
    log: EventLog,
    on: bool,
}

impl RecordingSwitch {
    pub fn new(log: &EventLog) -> Self {
        RecordingSwitch { log: log.clone(), on: false }
    }
}

impl PowerSwitch for RecordingSwitch {
    fn set_on(&mut self) {
        self.on = true;
        self.log.push(Event::PowerOn);
    }

    fn set_off(&mut self) {
        self.on = false;
        self.log.push(Event::PowerOff);
    }

    fn is_on(&self) -> bool {
        self.on
    }
}

pub struct RecordingServo {
    log: EventLog,
    /// Fail every pulse after this many have been sent.
    fail_after: Option<usize>,
    sent: usize,
}

impl RecordingServo {
    pub fn new(log: &EventLog) -> Self {
        RecordingServo { log: log.clone(), fail_after: None, sent: 0 }
    }

    pub fn failing_after(log: &EventLog, pulses: usize) -> Self {
        RecordingServo { log: log.clone(), fail_after: Some(pulses), sent: 0 }
    }
}

impl ServoOutput for RecordingServo {
    fn set_pulse_width(&mut self, pulse_width: Duration) -> Result<()> {
        if self.fail_after.is_some_and(|n| self.sent >= n) {
            return Err(EscError::InvalidConfig("servo offline".into()));
        }
        self.sent += 1;
        self.log.push(Event::Pulse(pulse_width.as_secs_f64() * 1e6));
        Ok(())
    }

    fn detach(&mut self) -> Result<()> {
        self.log.push(Event::Detach);
        Ok(())
    }
}

/// Records sleeps without waiting; returns `Interrupted` once the budget
/// of allowed sleeps is spent.
pub struct FakeDelay {
    log: EventLog,
    interrupt_after: Option<usize>,
    slept: usize,
}

impl FakeDelay {
    pub fn new(log: &EventLog) -> Self {
        FakeDelay { log: log.clone(), interrupt_after: None, slept: 0 }
    }

    pub fn interrupting_after(log: &EventLog, sleeps: usize) -> Self {
        FakeDelay { log: log.clone(), interrupt_after: Some(sleeps), slept: 0 }
    }
}

impl Delay for FakeDelay {
    fn sleep(&mut self, duration: Duration) -> Result<()> {
        if self.interrupt_after.is_some_and(|n| self.slept >= n) {
            return Err(EscError::Interrupted);
        }
        self.slept += 1;
        self.log.push(Event::Sleep(duration));
        Ok(())
    }
}
