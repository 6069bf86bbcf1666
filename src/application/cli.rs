use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgGroup;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Session;
use crate::domain::services::actions::help_text;
use crate::domain::services::auth::AuthService;
use crate::domain::services::credentials::DiskCredentialStore;
use crate::infrastructure::api::ApiClient;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(config_file_path.clone()).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

async fn signed_in_client() -> Result<(ApiClient, Session)> {
    let auth = AuthService::new(DiskCredentialStore::default());
    let Some(session) = auth.restore().await else {
        bail!("You are not logged in. Run paperchat to log in first.");
    };

    let client = ApiClient::default().with_token(&session.token);
    return Ok((client, session));
}

async fn print_chats_list() -> Result<()> {
    let (client, _) = signed_in_client().await?;
    let summaries = client.list_chats().await?;

    if summaries.is_empty() {
        println!("There are no conversations yet. You should start your first one!");
        return Ok(());
    }

    for summary in summaries {
        println!("- (ID: {}) {}", summary.id, summary.title);
    }

    return Ok(());
}

async fn delete_chats(chat_id: Option<&String>, all: bool) -> Result<()> {
    let (client, _) = signed_in_client().await?;

    if let Some(chat_id) = chat_id {
        client.delete_chat(chat_id).await?;
        println!("Deleted conversation {chat_id}");
        return Ok(());
    }

    if all {
        for summary in client.list_chats().await? {
            client.delete_chat(&summary.id).await?;
        }
        println!("Deleted all conversations");
    }

    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
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

fn subcommand_chats_delete() -> Command {
    return Command::new("delete")
        .about("Delete one or all conversations.")
        .arg(
            clap::Arg::new("chat-id")
                .short('i')
                .long("id")
                .help("Conversation ID")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("all")
                .long("all")
                .help("Delete all conversations.")
                .num_args(0),
        )
        .group(
            ArgGroup::new("delete-args")
                .args(["chat-id", "all"])
                .required(true),
        );
}

fn subcommand_chats() -> Command {
    return Command::new("chats")
        .about("Manage conversations without opening the chat screen.")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("list").about("List all conversations with their ids and titles."),
        )
        .subcommand(subcommand_chats_delete());
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
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("paperchat")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(subcommand_chats())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .arg(
            Arg::new(ConfigKey::ServerUrl.to_string())
                .short('s')
                .long(ConfigKey::ServerUrl.to_string())
                .env("PAPERCHAT_SERVER_URL")
                .num_args(1)
                .help(format!(
                    "Base URL of the chatbot service. [default: {}]",
                    Config::default(ConfigKey::ServerUrl)
                ))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::SessionFile.to_string())
                .long(ConfigKey::SessionFile.to_string())
                .env("PAPERCHAT_SESSION_FILE")
                .num_args(1)
                .help(format!(
                    "Path to the file the login session is persisted in. [default: {}]",
                    Config::default(ConfigKey::SessionFile)
                ))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("PAPERCHAT_CONFIG_FILE")
                .num_args(1)
                .help(format!(
                    "Path to configuration file [default: {}]",
                    Config::default(ConfigKey::ConfigFile)
                ))
                .global(true),
        );
}

/// Handles one-shot subcommands. Returns true when the chat screen should
/// start afterwards.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("chats", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("list", list_matches)) => {
                Config::load(vec![&matches, list_matches]).await?;
                print_chats_list().await?;
                return Ok(false);
            }
            Some(("delete", delete_matches)) => {
                Config::load(vec![&matches, delete_matches]).await?;
                delete_chats(
                    delete_matches.get_one::<String>("chat-id"),
                    delete_matches.get_one::<bool>("all").is_some(),
                )
                .await?;
                return Ok(false);
            }
            _ => {
                subcommand_chats().print_long_help()?;
                return Ok(false);
            }
        },
        _ => {
            Config::load(vec![&matches]).await?;
        }
    }

    return Ok(true);
}
