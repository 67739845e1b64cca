#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use clap::Parser;
use eyre::{Context, Result};

use crate::config::{APP_NAME, Configuration, VERSION, load_configuration, lookup_config_path};

const GIT_SHA: Option<&str> = option_env!("GIT_SHA");

#[derive(Debug, Parser)]
#[command(
    name = "storyteller",
    about = "Tell, rewrite and narrate stories for kids in the terminal",
    long_about = r#"Tell, rewrite and narrate stories for kids in the terminal

Without --config the first existing file of these is loaded:
    * $XDG_CONFIG_HOME/storyteller/config.toml
    * $HOME/.config/storyteller/config.toml
    * $HOME/.storyteller.toml
"#,
    disable_version_flag = true
)]
pub struct Command {
    /// Configuration file path
    #[arg(short, long, value_name = "PATH")]
    config: Option<String>,

    /// Print progress messages to stderr before the screen opens
    #[arg(long)]
    verbose: bool,

    /// Show the version
    #[arg(short, long)]
    version: bool,
}

impl Command {
    pub fn new() -> Command {
        Self::parse()
    }

    /// Load the configuration this invocation points at, with command line
    /// overrides applied on top.
    pub fn load_config(&self) -> Result<Configuration> {
        let mut config = match self.config.clone().or_else(lookup_config_path) {
            Some(path) => {
                load_configuration(&path).wrap_err(format!("loading configuration {}", path))?
            }
            None => Configuration::default(),
        };

        if self.verbose {
            config.general.verbose = true;
        }
        Ok(config)
    }

    pub fn version(&self) -> bool {
        self.version
    }

    pub fn version_line(&self) -> String {
        format!("{} {} ({})", APP_NAME, VERSION, GIT_SHA.unwrap_or("dev"))
    }
}
