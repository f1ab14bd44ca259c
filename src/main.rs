use anyhow::{Context, Result};
use log::info;
use std::env;

use esc_relay::EscConfig;
use esc_relay::delay::{InterruptibleDelay, install_interrupt_handler};
use esc_relay::esc::PiEsc;
use esc_relay::routine::{run_test_routine, run_with_cleanup};

const CONFIG_ENV: &str = "ESC_CONFIG";

fn load_config() -> Result<EscConfig> {
    match env::var_os(CONFIG_ENV) {
        Some(path) => {
            info!("Loading config from {}", path.to_string_lossy());
            EscConfig::load(&path).with_context(|| format!("loading {}", path.to_string_lossy()))
        }
        None => Ok(EscConfig::default()),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    let interrupted = install_interrupt_handler().context("installing interrupt handler")?;

    // Pins are released when `esc` drops.
    let delay = InterruptibleDelay::new(interrupted);
    let mut esc = PiEsc::open(&config, delay).context("opening ESC pins")?;
    run_with_cleanup(&mut esc, run_test_routine)?;
    Ok(())
}
