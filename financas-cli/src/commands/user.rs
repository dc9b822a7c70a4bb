//! User and login commands

use std::env;

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Password as PasswordPrompt;

use financas_core::{AuthenticationService, Password, User};

use super::{get_context, get_logger, parse_id, report};
use crate::output;

#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a new user
    Register {
        /// Display name
        #[arg(long)]
        name: String,
        /// Login email (must be unique)
        #[arg(long)]
        email: String,
        /// Password (falls back to FINANCAS_PASSWORD, then a prompt)
        #[arg(long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a user by id
    Show {
        /// User ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Get password from the flag, FINANCAS_PASSWORD, or an interactive prompt
fn get_password_or_prompt(password_flag: Option<String>, confirm: bool) -> Result<String> {
    if let Some(p) = password_flag {
        return Ok(p);
    }

    if let Ok(p) = env::var("FINANCAS_PASSWORD") {
        return Ok(p);
    }

    if atty::isnt(atty::Stream::Stdin) {
        bail!("No password provided. Use --password or set FINANCAS_PASSWORD.");
    }

    let mut prompt = PasswordPrompt::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    Ok(prompt.interact()?)
}

fn print_user(user: &User) {
    println!(
        "  {}: {}",
        "ID".bold(),
        user.id.map(|id| id.to_string()).unwrap_or_default()
    );
    println!("  {}: {}", "Name".bold(), user.name);
    println!("  {}: {}", "Email".bold(), user.email);
}

pub fn run(command: UserCommands) -> Result<()> {
    let logger = get_logger();

    match command {
        UserCommands::Register { name, email, password, json } => {
            let secret = get_password_or_prompt(password, !json)?;
            let ctx = get_context()?;

            let result = ctx
                .credential_service
                .register_user(User::new(name, email, Password::plain(secret)));

            report(json, &logger, "user register", "user", result, |user| {
                output::success("User registered");
                print_user(user);
            })
        }
        UserCommands::Show { id, json } => {
            let id = parse_id(&id, "user")?;
            let ctx = get_context()?;

            let result = ctx.credential_service.get_user_by_id(id).and_then(|user| {
                user.ok_or_else(|| financas_core::Error::business_rule(super::USER_ID_NOT_FOUND))
            });

            report(json, &logger, "user show", "user", result, print_user)
        }
    }
}

/// Check credentials and print the matched user
pub fn run_login(email: String, password: Option<String>, json: bool) -> Result<()> {
    let logger = get_logger();
    let secret = get_password_or_prompt(password, false)?;
    let ctx = get_context()?;

    let result = ctx.credential_service.authenticate(&email, &secret);

    report(json, &logger, "login", "user", result, |user| {
        output::success(&format!("Welcome, {}", user.name));
        print_user(user);
    })
}
