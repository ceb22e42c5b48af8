#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::env;
use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::services::actions::help_text;

/// What `main` should run once the command line has been handled.
#[derive(Debug, PartialEq, Eq)]
pub enum Launch {
    Chat,
    Ask { questions: Vec<String> },
}

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

pub fn log_dir() -> path::PathBuf {
    if let Ok(dir) = env::var("ASKMYDOCS_LOG_DIR") {
        return path::PathBuf::from(dir);
    }

    return dirs::cache_dir()
        .unwrap_or_else(env::temp_dir)
        .join("askmydocs");
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!("Config file already exists at {config_file_path_str}");
    }

    if let Some(parent) = config_file_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

fn subcommand_ask() -> Command {
    return Command::new("ask")
        .about("Uploads --file and asks each question in order without starting the terminal UI. Exits non-zero if the upload fails.")
        .arg(
            Arg::new("question")
                .help("Questions to ask about the uploaded document.")
                .action(ArgAction::Append)
                .num_args(1..)
                .required(true),
        );
}

fn subcommand_chat() -> Command {
    return Command::new("chat").about("Start a new session in the terminal UI. This is the default.");
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for AskMyDocs")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running AskMyDocs with environment variable RUST_LOG=askmydocs")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );
}

fn arg_numeric(key: ConfigKey, env_name: &'static str, help: &str) -> Arg {
    return Arg::new(key.to_string())
        .long(key.to_string())
        .env(env_name)
        .num_args(1)
        .help(format!("{help} [default: {}]", Config::default(key)))
        .global(true);
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") || line.starts_with("HOTKEYS:") {
                return Paint::new(format!("CHAT {line}"))
                    .underline()
                    .bold()
                    .to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}\nCommit: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    );

    return Command::new("askmydocs")
        .about(about)
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(subcommand_ask())
        .subcommand(subcommand_chat())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .arg(
            Arg::new(ConfigKey::ApiURL.to_string())
                .long(ConfigKey::ApiURL.to_string())
                .env("ASKMYDOCS_API_URL")
                .num_args(1)
                .help(format!(
                    "AskMyDocs API base URL. [default: {}]",
                    Config::default(ConfigKey::ApiURL)
                ))
                .global(true),
        )
        .arg(arg_numeric(
            ConfigKey::BackendHealthCheckTimeout,
            "ASKMYDOCS_BACKEND_HEALTH_CHECK_TIMEOUT",
            "Time to wait in milliseconds before timing out when doing a healthcheck for the backend.",
        ))
        .arg(arg_numeric(
            ConfigKey::RequestTimeout,
            "ASKMYDOCS_REQUEST_TIMEOUT",
            "Time to wait in milliseconds for an upload or question before giving up. Set to 0 to wait forever.",
        ))
        .arg(arg_numeric(
            ConfigKey::TopK,
            "ASKMYDOCS_TOP_K",
            "Number of document sections the backend retrieves to answer a question.",
        ))
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("ASKMYDOCS_CONFIG_FILE")
                .num_args(1)
                .help(format!(
                    "Path to configuration file [default: {}]",
                    Config::default(ConfigKey::ConfigFile)
                ))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::File.to_string())
                .short('f')
                .long(ConfigKey::File.to_string())
                .num_args(1)
                .help("PDF to upload as soon as the session starts.")
                .global(true),
        );
}

/// Turns parsed arguments into a launch, loading config on the way. Returns
/// `None` for subcommands that finish on their own.
pub async fn launch(matches: &ArgMatches) -> Result<Option<Launch>> {
    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    println!("{}", log_dir().join("debug.log").to_string_lossy());
                }
                Some(("enum-config", _)) => {
                    println!("{}", ConfigKey::VARIANTS.join("\n"));
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(None);
        }
        Some(("ask", ask_matches)) => {
            Config::load(build(), vec![matches, ask_matches]).await?;
            if Config::get(ConfigKey::File).trim().is_empty() {
                bail!("ask needs a document to work with, pass one with --file PATH");
            }

            let questions = ask_matches
                .get_many::<String>("question")
                .map(|values| return values.cloned().collect::<Vec<String>>())
                .unwrap_or_default();

            return Ok(Some(Launch::Ask { questions }));
        }
        Some(("chat", chat_matches)) => {
            Config::load(build(), vec![matches, chat_matches]).await?;
            return Ok(Some(Launch::Chat));
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }

            return Ok(None);
        }
        Some(("config", subcmd_matches)) => {
            match subcmd_matches.subcommand() {
                Some(("create", _)) => {
                    create_config_file().await?;
                }
                Some(("default", _)) => {
                    println!("{}", Config::serialize_default(build()));
                }
                Some(("path", _)) => {
                    println!("{}", Config::default(ConfigKey::ConfigFile));
                }
                _ => {
                    subcommand_config().print_long_help()?;
                }
            }

            return Ok(None);
        }
        _ => {
            Config::load(build(), vec![matches]).await?;
            return Ok(Some(Launch::Chat));
        }
    }
}

pub async fn parse() -> Result<Option<Launch>> {
    let matches = build().get_matches();
    return launch(&matches).await;
}
