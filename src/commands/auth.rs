//! Environment management commands.

use anyhow::Result;
use colored::Colorize;
use dialoguer::Input;

use crate::api::CredentialSet;
use crate::config::{Config, Environment};

pub fn setup_command(config: &mut Config, name: &str, url: &str) -> Result<()> {
    let username: String = Input::new().with_prompt("Username").interact_text()?;
    let password = rpassword::prompt_password("Password: ")?;
    let client_id: String = Input::new().with_prompt("Client id").interact_text()?;
    let client_secret = rpassword::prompt_password("Client secret: ")?;

    config.add_environment(
        name.to_string(),
        Environment {
            url: url.to_string(),
            credentials: CredentialSet {
                username,
                password,
                client_id,
                client_secret,
            },
        },
    );
    config.save()?;
    println!("{} environment '{}' saved", "✓".green(), name);
    Ok(())
}

pub fn status_command(config: &Config) -> Result<()> {
    if config.environments.is_empty() {
        println!("No environments configured. Run 'spo-cli auth setup <name> <url>'.");
        return Ok(());
    }
    for (name, environment) in &config.environments {
        let marker = if config.current_environment.as_deref() == Some(name) {
            "*".green().to_string()
        } else {
            " ".to_string()
        };
        println!("{} {} {}", marker, name.bold(), environment.url.dimmed());
    }
    Ok(())
}

pub fn remove_command(config: &mut Config, name: &str) -> Result<()> {
    config.remove_environment(name)?;
    config.save()?;
    println!("{} environment '{}' removed", "✓".green(), name);
    Ok(())
}

pub fn select_command(config: &mut Config, name: &str) -> Result<()> {
    config.select_environment(name)?;
    config.save()?;
    println!("{} current environment is now '{}'", "✓".green(), name);
    Ok(())
}
