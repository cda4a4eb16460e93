use owo_colors::{OwoColorize, Stream};

use crate::auth::{self, HttpAuthClient, LocalStorage};
use crate::config::Config;
use crate::error::Result;

/// Log in and store the session token
pub async fn cmd_login(email: &str, password: &str) -> Result<()> {
    let config = Config::load()?;
    let client = HttpAuthClient::from_config(&config)?;
    let storage = LocalStorage::open_default()?;

    auth::login(&client, &storage, email, password).await?;
    println!(
        "{} as {}",
        "Logged in".if_supports_color(Stream::Stdout, |t| t.green()),
        email
    );
    Ok(())
}

/// Forget the stored session token
pub fn cmd_logout() -> Result<()> {
    let storage = LocalStorage::open_default()?;
    auth::logout(&storage)?;
    println!("Logged out");
    Ok(())
}
