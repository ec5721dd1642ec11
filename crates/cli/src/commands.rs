//! CLI commands

use anyhow::{Result, anyhow, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};
use wallet_core::ClientSettings;
use wallet_frontend_common::client::create_native_client;
use wallet_frontend_common::{
    AuthHandle, AuthService, get_user_friendly_error, with_auth_error_handling,
};
use wallet_http::client::ClientError;

use crate::config;

#[derive(Subcommand)]
pub enum Commands {
    /// Ask the server whether the session is still alive
    Status,

    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "WALLET_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// End the session
    Logout,

    /// GET any API path and print the JSON body
    Get {
        /// Path relative to the base URL, e.g. /users
        path: String,
    },

    /// Show a wallet and its cards
    Wallet {
        id: String,
    },

    /// Show an account balance
    Balance {
        account: String,
    },

    /// Show the ledger entries of an account
    Statement {
        account: String,
    },

    /// Run several commands in one process, sharing the session cookies
    Shell,

    /// Manage the settings file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a settings file with default values
    Init {
        /// Output file path (defaults to <state-dir>/settings.json)
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective settings
    Show,
}

/// One line typed into the shell
#[derive(Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Commands,
}

impl Commands {
    pub async fn execute(self, settings: &ClientSettings, config_path: Option<&Path>) -> Result<()> {
        match self {
            Self::Config { command } => command.execute(settings, config_path),
            Self::Shell => Session::open(settings)?.shell().await,
            command => Session::open(settings)?.run(command).await,
        }
    }
}

impl ConfigCommands {
    pub fn execute(self, settings: &ClientSettings, config_path: Option<&Path>) -> Result<()> {
        match self {
            Self::Init { output, force } => {
                let path = output
                    .or_else(|| config_path.map(Path::to_path_buf))
                    .unwrap_or_else(|| settings.state_dir().join(config::SETTINGS_FILE));

                if path.exists() && !force {
                    bail!(
                        "{} already exists, pass --force to overwrite",
                        path.display()
                    );
                }

                config::generate_default_config(&path)?;
                println!("Generated settings at: {}", path.display());
                Ok(())
            }
            Self::Show => print_json(settings),
        }
    }
}

/// A client and its auth state for the lifetime of the process
struct Session {
    auth: AuthHandle,
}

impl Session {
    fn open(settings: &ClientSettings) -> Result<Self> {
        let client = create_native_client(settings)?;
        debug!(base_url = client.base_url(), "Client ready");
        Ok(Self {
            auth: AuthHandle::new(AuthService::new(client)),
        })
    }

    async fn run(&self, command: Commands) -> Result<()> {
        let client = self.auth.service().client();

        match command {
            Commands::Status => {
                let (_guard, verification) = self.auth.mount();
                verification.await;
                if self.auth.is_logged_in() {
                    println!("Logged in");
                } else {
                    println!("Logged out");
                }
                Ok(())
            }
            Commands::Login { email, password } => {
                self.auth
                    .login(&email, &password)
                    .await
                    .map_err(|e| anyhow!(get_user_friendly_error(&e)))?;
                println!("Logged in as {email}");
                Ok(())
            }
            Commands::Logout => {
                self.auth.logout().await;
                println!("Logged out");
                Ok(())
            }
            Commands::Get { path } => {
                let response = self.guarded(client.get(&path)).await?;
                print_json(&response.body)
            }
            Commands::Wallet { id } => print_json(&self.guarded(client.get_wallet(&id)).await?),
            Commands::Balance { account } => {
                print_json(&self.guarded(client.balance(&account)).await?)
            }
            Commands::Statement { account } => {
                print_json(&self.guarded(client.statement(&account)).await?)
            }
            Commands::Shell => bail!("Already in a shell"),
            Commands::Config { .. } => bail!("Config commands are not available in the shell"),
        }
    }

    /// Run a protected call, turning session loss into a hint to log in
    async fn guarded<T, F>(&self, call: F) -> Result<T>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        with_auth_error_handling(&self.auth, call)
            .await
            .map_err(|e| {
                if e.is_auth_failure() {
                    anyhow!("Not logged in ({e}). Run `login` first.")
                } else {
                    e.into()
                }
            })
    }

    async fn shell(&self) -> Result<()> {
        info!("Interactive shell started");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        loop {
            stdout.write_all(b"wallet> ").await?;
            stdout.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let words: Vec<&str> = line.split_whitespace().collect();
            match words.as_slice() {
                [] => continue,
                ["exit" | "quit"] => break,
                _ => {}
            }

            match ShellLine::try_parse_from(words) {
                Ok(parsed) => {
                    if let Err(e) = self.run(parsed.command).await {
                        eprintln!("Error: {e:#}");
                    }
                }
                Err(e) => {
                    // Also covers --help output
                    e.print()?;
                }
            }
        }

        info!("Interactive shell closed");
        Ok(())
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
