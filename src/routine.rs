use log::{error, info};
use std::time::Duration;

use crate::delay::Delay;
use crate::error::{EscError, Result};
use crate::esc::EscController;
use crate::power::PowerSwitch;
use crate::servo::ServoOutput;

/// Bench test: creep forward, back to neutral, creep in reverse.
pub const TEST_VECTOR: [f64; 8] = [1.0, 2.0, 3.0, 0.0, -1.0, -2.0, -3.0, 0.0];
pub const TEST_STEP: Duration = Duration::from_secs(2);

/// Calibrates, steps through [`TEST_VECTOR`], then powers off.
pub fn run_test_routine<P, S, D>(esc: &mut EscController<P, S, D>) -> Result<()>
where
    P: PowerSwitch,
    S: ServoOutput,
    D: Delay,
{
    esc.calibrate()?;
    for &throttle in TEST_VECTOR.iter() {
        esc.set_throttle(throttle)?;
        esc.sleep(TEST_STEP)?;
    }
    esc.power_off();
    Ok(())
}

/// Runs `body`, then always returns the ESC to neutral and cuts power.
///
/// An interrupt ends the body cleanly. Any other error is returned after
/// cleanup; a cleanup failure is only reported if the body succeeded.
pub fn run_with_cleanup<P, S, D, F>(esc: &mut EscController<P, S, D>, body: F) -> Result<()>
where
    P: PowerSwitch,
    S: ServoOutput,
    D: Delay,
    F: FnOnce(&mut EscController<P, S, D>) -> Result<()>,
{
    let outcome = match body(esc) {
        Err(EscError::Interrupted) => {
            info!("Keyboard interrupt");
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            Err(e)
        }
        ok => ok,
    };

    info!("clean up");
    let cleanup = esc.shutdown();
    outcome.and(cleanup)
}
