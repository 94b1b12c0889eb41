//! User management CLI commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use cabinet_auth::{JwtEncoder, PasswordHasher, PasswordValidator};
use cabinet_core::config::AppConfig;
use cabinet_core::error::AppError;
use cabinet_entity::user::User;
use cabinet_service::{AdminUserService, AuthService};

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List all users
    List,
    /// Register a user
    Create {
        /// Username
        username: String,
        /// Email
        #[arg(long)]
        email: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Delete a user with their folders, files and blobs
    Delete {
        /// Username
        username: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// User ID
    id: String,
    /// Username
    username: String,
    /// Email
    email: String,
    /// Created at
    created_at: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.to_string(),
            username: u.username.clone(),
            email: u.email.clone(),
            created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let stores = super::connect(config).await?;
    let admin = AdminUserService::new(
        Arc::clone(&stores.users),
        Arc::clone(&stores.catalog),
        Arc::clone(&stores.blobs),
        stores.deadlines,
    );

    match &args.command {
        UserCommand::List => {
            let users = admin.list_users().await?;
            let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
            output::print_list(&rows, format);
        }
        UserCommand::Create {
            username,
            email,
            password,
        } => {
            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
            };
            let auth = AuthService::new(
                Arc::clone(&stores.users),
                Arc::new(PasswordHasher::new()),
                Arc::new(PasswordValidator::new(&config.auth)),
                Arc::new(JwtEncoder::new(&config.auth)),
            );
            let user = auth.register(username, email, &password).await?;
            output::print_success(&format!("User '{}' created", user.username));
            output::print_kv("id", &user.id.to_string());
        }
        UserCommand::Delete { username, yes } => {
            let prompt = format!("Delete '{username}' together with all their folders and files?");
            if !super::confirm(&prompt, *yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            let deleted = admin.delete_user(username).await?;
            match format {
                OutputFormat::Json => output::print_json(&deleted),
                OutputFormat::Table => {
                    output::print_success(&format!("User '{username}' deleted"));
                    output::print_kv("blobs removed", &deleted.blobs_removed.to_string());
                    output::print_kv("rows removed", &deleted.rows_removed.to_string());
                }
            }
        }
    }

    stores.db.close().await;
    Ok(())
}
