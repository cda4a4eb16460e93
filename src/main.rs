use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt};

use roster::cli::{Cli, Commands, ConfigAction};
use roster::commands::{
    cmd_browse, cmd_config_get, cmd_config_set, cmd_config_show, cmd_delete, cmd_edit, cmd_list,
    cmd_login, cmd_logout, cmd_search,
};

fn init_tracing() {
    let filter = EnvFilter::try_from_env("ROSTER_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    if let Err(e) = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
    {
        eprintln!("tracing init failed: {e}");
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Login { email, password } => cmd_login(&email, &password).await,
        Commands::Logout => cmd_logout(),
        Commands::List { page, json } => cmd_list(page, json).await,
        Commands::Search { term, json } => cmd_search(&term, json).await,
        Commands::Edit { id, fields, json } => cmd_edit(id, fields.into(), json).await,
        Commands::Delete { id, json } => cmd_delete(id, json).await,
        Commands::Browse => cmd_browse().await,
        Commands::Config { action } => match action {
            ConfigAction::Show { json } => cmd_config_show(json),
            ConfigAction::Get { key } => cmd_config_get(&key),
            ConfigAction::Set { key, value } => cmd_config_set(&key, &value),
        },
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
