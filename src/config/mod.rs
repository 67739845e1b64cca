#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

pub mod constants;
pub(crate) mod defaults;
pub mod models;
pub mod utils;

pub use models::*;
pub use utils::*;

use eyre::Result;

pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn user_agent() -> String {
    format!("{}/{}", APP_NAME, VERSION)
}

#[cfg(not(test))]
static CONFIG: std::sync::OnceLock<Configuration> = std::sync::OnceLock::new();

// Each test thread sees its own configuration.
#[cfg(test)]
thread_local! {
    static CONFIG: std::cell::Cell<&'static Configuration> =
        std::cell::Cell::new(Box::leak(Box::default()));
}

/// The configuration the session runs with. Falls back to the defaults when
/// [`init`] was never called.
#[cfg(not(test))]
pub fn instance() -> &'static Configuration {
    CONFIG.get_or_init(Configuration::default)
}

#[cfg(test)]
pub fn instance() -> &'static Configuration {
    CONFIG.with(|config| config.get())
}

/// Install the process wide configuration. Only the first call wins.
#[cfg(not(test))]
pub fn init(config: Configuration) -> Result<()> {
    config.validate()?;
    CONFIG
        .set(config)
        .map_err(|_| eyre::eyre!("configuration is already initialized"))
}

#[cfg(test)]
pub fn init(config: Configuration) -> Result<()> {
    config.validate()?;
    CONFIG.with(|current| current.set(Box::leak(Box::new(config))));
    Ok(())
}

/// Print to stderr when `general.verbose` is on. Always logged at debug.
#[macro_export]
macro_rules! verbose {
    ($($arg:tt)*) => {{
        let message = format!($($arg)*);
        ::log::debug!("{}", message);
        if $crate::config::instance().general.verbose {
            eprintln!("{}", message);
        }
    }};
}

pub use verbose;
