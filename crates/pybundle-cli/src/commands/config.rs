use crate::config_manager::Config;
use crate::logger;
use crate::GlobalOpts;
use clap::Subcommand;
use colored::*;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show the current configuration
    Show,
    /// Set a configuration value
    Set { key: String, value: String },
    /// Print the path of the configuration file
    Path,
}

pub fn handle_config(action: ConfigAction, opts: &GlobalOpts) -> Result<(), String> {
    match action {
        ConfigAction::Show => {
            let config = Config::load().map_err(|e| format!("Failed to load config: {}", e))?;
            println!("{}", "Configuration:".bold().green());
            if config.is_empty() {
                if opts.verbosity_level() > 0 {
                    println!("  {}", "(empty)".yellow());
                }
            } else {
                for (key, value) in config.values_iter() {
                    println!("  {}: {}", key.cyan(), value);
                }
            }
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load().map_err(|e| format!("Failed to load config: {}", e))?;
            if !config.set(&key, value.clone()) {
                return Err(format!(
                    "Unknown config key: {}. Supported keys: {}",
                    key,
                    Config::keys().join(", ")
                ));
            }
            config
                .save()
                .map_err(|e| format!("Failed to save config: {}", e))?;
            logger::success(&format!("Set {} = {}", key, value));
            Ok(())
        }
        ConfigAction::Path => {
            let config_path = Config::path();
            logger::debug(&format!("Reading config from: {}", config_path.display()));
            println!("{}", config_path.display());
            Ok(())
        }
    }
}
