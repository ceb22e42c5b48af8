#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::env;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::fs;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

/// Config is process wide, tests that load it must not interleave.
#[cfg(test)]
pub static LOAD_LOCK: Lazy<tokio::sync::Mutex<()>> =
    Lazy::new(|| return tokio::sync::Mutex::new(()));

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ApiURL,
    BackendHealthCheckTimeout,
    ConfigFile,
    File,
    RequestTimeout,
    TopK,
}

impl ConfigKey {
    fn is_numeric(&self) -> bool {
        return matches!(
            self,
            ConfigKey::BackendHealthCheckTimeout | ConfigKey::RequestTimeout | ConfigKey::TopK
        );
    }

    /// Keys that only make sense for a single run, never written to the
    /// config file.
    fn is_runtime_only(&self) -> bool {
        return matches!(self, ConfigKey::ConfigFile | ConfigKey::File);
    }
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn default(key: ConfigKey) -> String {
        let config_path = dirs::config_dir()
            .unwrap_or_else(env::temp_dir)
            .join("askmydocs")
            .join("config.toml");

        let res = match key {
            ConfigKey::ApiURL => "http://localhost:8000".to_string(),
            ConfigKey::BackendHealthCheckTimeout => "1000".to_string(),
            ConfigKey::RequestTimeout => "120000".to_string(),
            ConfigKey::TopK => "3".to_string(),

            // Special
            ConfigKey::ConfigFile => config_path.to_string_lossy().to_string(),
            ConfigKey::File => "".to_string(),
        };

        return res;
    }

    fn validate() -> Result<()> {
        for key in ConfigKey::iter().filter(|key| return key.is_numeric()) {
            let val = Config::get(key);
            if val.parse::<u64>().is_err() {
                bail!("Invalid value for '{key}': {val}. Expected a whole number.");
            }
        }

        if Config::get(ConfigKey::TopK) == "0" {
            bail!("Invalid value for 'top-k': 0. At least one section has to be retrieved.");
        }

        return Ok(());
    }

    /// Loads defaults, then the config file, then CLI flags and environment
    /// variables, each layer overriding the previous one.
    pub async fn load(cmd: Command, clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key))
        }

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(arg_config_file)) =
                matches.try_get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }

        let config_path = path::PathBuf::from(&config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for key in ConfigKey::iter().filter(|key| return !key.is_runtime_only()) {
                let val = match doc.get(&key.to_string()) {
                    Some(val) => val,
                    None => continue,
                };

                if let Some(val_int) = val.as_integer() {
                    Config::set(key, &val_int.to_string());
                } else if let Some(val_str) = val.as_str() {
                    if val_str.is_empty() {
                        continue;
                    }
                    if key.is_numeric() {
                        bail!("{config_file} has an invalid value for key '{key}': \"{val_str}\". Expected a whole number.");
                    }
                    Config::set(key, val_str);
                } else {
                    bail!("{config_file} has an invalid value for key '{key}'");
                }
            }

            for (key, _) in doc.iter() {
                if !cmd
                    .get_arguments()
                    .any(|arg| return arg.get_long() == Some(key))
                {
                    tracing::warn!(key = key, "Unknown key in config file");
                }
            }
        }

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    Config::set(key, val)
                }
            }
        }

        Config::validate()?;

        tracing::debug!(
            api_url = Config::get(ConfigKey::ApiURL),
            backend_health_check_timeout = Config::get(ConfigKey::BackendHealthCheckTimeout),
            request_timeout = Config::get(ConfigKey::RequestTimeout),
            top_k = Config::get(ConfigKey::TopK),
            file = Config::get(ConfigKey::File),
            "config"
        );

        return Ok(());
    }

    pub fn serialize_default(cmd: Command) -> String {
        let toml_str = ConfigKey::iter()
            .filter(|key| return !key.is_runtime_only())
            .map(|key| {
                let description = cmd
                    .get_arguments()
                    .find(|arg| return arg.get_long() == Some(key.to_string().as_str()))
                    .and_then(|arg| return arg.get_help())
                    .map(|help| {
                        return help
                            .to_string()
                            .split("[default:")
                            .next()
                            .unwrap_or_default()
                            .trim()
                            .to_string();
                    })
                    .unwrap_or_default();

                let mut val = Config::default(key);
                if key.is_numeric() {
                    val = format!("{key} = {val}");
                } else {
                    val = format!("{key} = \"{val}\"");
                }

                return format!("# {description}\n{val}");
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }
}
