//! CLI administration tool for linkboard.
//!
//! Provides commands for managing users and API tokens, viewing
//! statistics, and performing database checks without requiring HTTP API
//! access. User management lives here because identity is owned by an
//! external provider in production; this tool stands in for its tooling.
//!
//! # Usage
//!
//! ```bash
//! # Register a user
//! cargo run --bin admin -- user create --email ada@example.com --name Ada
//!
//! # Promote a user to administrator
//! cargo run --bin admin -- user promote ada@example.com
//!
//! # Create an API token bound to a user
//! cargo run --bin admin -- token create --email ada@example.com
//!
//! # List / revoke tokens
//! cargo run --bin admin -- token list
//! cargo run --bin admin -- token revoke "Ada laptop"
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `TOKEN_SIGNING_SECRET` (required for token commands): HMAC key, must
//!   match the server's

use linkboard::application::services::AuthService;
use linkboard::domain::entities::{LinkStatus, NewUser, Role};
use linkboard::domain::repositories::{
    CategoryRepository, LinkRepository, TokenRepository, UserRepository,
};
use linkboard::infrastructure::persistence::{
    PgCategoryRepository, PgLinkRepository, PgTokenRepository, PgUserRepository,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing linkboard.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// User management subcommands.
#[derive(Subcommand)]
enum UserAction {
    /// Register a new user
    Create {
        /// Email address (unique)
        #[arg(short, long)]
        email: Option<String>,

        /// Display name
        #[arg(short, long)]
        name: Option<String>,

        /// Create as administrator
        #[arg(long)]
        admin: bool,
    },

    /// List all users
    List,

    /// Promote a user to administrator
    Promote {
        /// Email of the user to promote
        email: String,
    },
}

/// Token management subcommands.
#[derive(Subcommand)]
enum TokenAction {
    /// Create a new API token bound to a user
    Create {
        /// Email of the owning user
        #[arg(short, long)]
        email: Option<String>,

        /// Token name (e.g., "Ada laptop")
        #[arg(short, long)]
        name: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all tokens
    List,

    /// Revoke a token by name
    Revoke {
        /// Token name to revoke
        name: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Token { action } => handle_token_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches user management commands.
async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgUserRepository::new(Arc::new(pool.clone())));

    match action {
        UserAction::Create { email, name, admin } => create_user(repo, email, name, admin).await?,
        UserAction::List => list_users(repo).await?,
        UserAction::Promote { email } => promote_user(repo, email).await?,
    }

    Ok(())
}

/// Registers a new user with interactive prompts for missing fields.
async fn create_user(
    repo: Arc<PgUserRepository>,
    email: Option<String>,
    name: Option<String>,
    admin: bool,
) -> Result<()> {
    println!("{}", "👤 Register User".bright_blue().bold());
    println!();

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };

    let name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Display name").interact_text()?,
    };

    let role = if admin { Role::Admin } else { Role::User };

    let user = repo
        .insert(NewUser { name, email, role })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

    println!();
    println!("{}", "✅ User created!".green().bold());
    println!("  ID:    {}", user.id.to_string().bright_black());
    println!("  Email: {}", user.email.cyan());
    println!("  Role:  {}", user.role.to_string().bright_yellow());
    println!();

    Ok(())
}

/// Lists all users, newest first.
async fn list_users(repo: Arc<PgUserRepository>) -> Result<()> {
    println!("{}", "📋 Users".bright_blue().bold());
    println!();

    let users = repo
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        return Ok(());
    }

    println!(
        "  {:<4} {:<30} {:<25} {:<8}",
        "ID".bright_white().bold(),
        "Email".bright_white().bold(),
        "Name".bright_white().bold(),
        "Role".bright_white().bold()
    );
    println!("  {}", "─".repeat(70).bright_black());

    for user in &users {
        let role = match user.role {
            Role::Admin => "admin".bright_yellow(),
            Role::User => "user".green(),
        };

        println!(
            "  {:<4} {:<30} {:<25} {}",
            user.id.to_string().bright_black(),
            user.email.cyan(),
            user.name,
            role
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Promotes a user to administrator, with confirmation.
async fn promote_user(repo: Arc<PgUserRepository>, email: String) -> Result<()> {
    println!("{}", "⬆️  Promote User".bright_blue().bold());
    println!();

    let user = repo
        .find_by_email(&email)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("User not found")?;

    if user.role.is_admin() {
        println!("{}", "⚠️  This user is already an administrator".yellow());
        return Ok(());
    }

    println!("  User:  {}", user.email.cyan());
    println!("  Name:  {}", user.name);
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Promote to administrator?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    repo.set_role(user.id, Role::Admin)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to promote user: {}", e))?;

    println!();
    println!("{}", "✅ User promoted!".green().bold());
    println!();

    Ok(())
}

/// Dispatches token management commands.
async fn handle_token_action(action: TokenAction, pool: &PgPool) -> Result<()> {
    let tokens = Arc::new(PgTokenRepository::new(Arc::new(pool.clone())));
    let users = Arc::new(PgUserRepository::new(Arc::new(pool.clone())));

    match action {
        TokenAction::Create { email, name, yes } => {
            create_token(tokens, users, email, name, yes).await?;
        }
        TokenAction::List => {
            list_tokens(tokens).await?;
        }
        TokenAction::Revoke { name } => {
            revoke_token(tokens, name).await?;
        }
    }

    Ok(())
}

/// Creates a new API token with interactive prompts.
///
/// # Flow
///
/// 1. Resolve the owning user by email
/// 2. Prompt for token name (or use provided)
/// 3. Generate a random token value
/// 4. Confirm creation (unless `--yes` flag)
/// 5. Hash token with HMAC-SHA256 (keyed by `TOKEN_SIGNING_SECRET`)
/// 6. Store the hash; display the raw token once
///
/// # Security
///
/// - Only the keyed hash is stored in the database
/// - Raw token is displayed once and cannot be retrieved later
/// - Tokens are 48 characters (alphanumeric) for high entropy
async fn create_token(
    tokens: Arc<PgTokenRepository>,
    users: Arc<PgUserRepository>,
    email: Option<String>,
    name: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔑 Create API Token".bright_blue().bold());
    println!();

    let signing_secret =
        std::env::var("TOKEN_SIGNING_SECRET").context("TOKEN_SIGNING_SECRET must be set")?;

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Owner email").interact_text()?,
    };

    let user = users
        .find_by_email(&email)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("User not found")?;

    let token_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Token name")
            .with_initial_text(format!("{} API", user.name))
            .interact_text()?,
    };

    let token_value = generate_token();

    println!();
    println!("{}", "Token details:".bright_white().bold());
    println!("  Owner: {}", user.email.cyan());
    println!("  Name:  {}", token_name.cyan());
    println!("  Token: {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  IMPORTANT: Save this token now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this token?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let token_hash = AuthService::hash_token(&signing_secret, &token_value);

    tokens
        .insert(user.id, &token_name, &token_hash)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create token: {}", e))?;

    println!();
    println!("{}", "✅ Token created successfully!".green().bold());
    println!();
    println!("{}", "Add this to your requests:".bright_white());
    println!(
        "  {}: Bearer {}",
        "Authorization".bright_cyan(),
        token_value.bright_yellow()
    );
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" -X POST http://localhost:3000/api/links",
        token_value.bright_yellow()
    );
    println!();

    Ok(())
}

/// Lists all API tokens with status indicators.
async fn list_tokens(repo: Arc<PgTokenRepository>) -> Result<()> {
    println!("{}", "📋 API Tokens".bright_blue().bold());
    println!();

    let tokens = repo
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {}", e))?;

    if tokens.is_empty() {
        println!("{}", "  No tokens found".yellow());
        println!();
        println!(
            "  Create one with: {} admin token create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<3} {:<30} {:<20} {:<10}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for token in &tokens {
        let status = if token.revoked {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };

        println!(
            "  {:<3} {:<30} {:<20} {}",
            token.id.to_string().bright_black(),
            token.name.cyan(),
            token
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            status
        );
    }

    println!();
    println!(
        "  Total: {}",
        tokens.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Revokes a token by name with confirmation prompt.
async fn revoke_token(repo: Arc<PgTokenRepository>, name: String) -> Result<()> {
    println!("{}", "🔒 Revoke API Token".bright_blue().bold());
    println!();

    println!("  Token: {}", name.cyan());
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Revoke this token?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    let revoked = repo
        .revoke(&name)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {}", e))?;

    if !revoked {
        println!("{}", "⚠️  No token with that name".yellow());
        return Ok(());
    }

    println!();
    println!("{}", "✅ Token revoked successfully!".green().bold());
    println!();

    Ok(())
}

/// Displays system statistics.
///
/// Shows link counts per moderation status plus category and user totals.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let pool = Arc::new(pool.clone());
    let links = PgLinkRepository::new(pool.clone());
    let categories = PgCategoryRepository::new(pool.clone());
    let users = PgUserRepository::new(pool);

    let total = links.count_by_status(None).await?;
    let pending = links.count_by_status(Some(LinkStatus::Pending)).await?;
    let approved = links.count_by_status(Some(LinkStatus::Approved)).await?;
    let rejected = links.count_by_status(Some(LinkStatus::Rejected)).await?;
    let category_count = categories.count().await?;
    let user_count = users.count().await?;

    println!("  Links:      {}", total.to_string().bright_green().bold());
    println!("    pending:  {}", pending.to_string().yellow());
    println!("    approved: {}", approved.to_string().green());
    println!("    rejected: {}", rejected.to_string().red());
    println!(
        "  Categories: {}",
        category_count.to_string().bright_green().bold()
    );
    println!(
        "  Users:      {}",
        user_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}

/// Generates a cryptographically random token.
///
/// # Format
///
/// - Length: 48 characters
/// - Character set: A-Z, a-z, 0-9
/// - Entropy: ~286 bits
fn generate_token() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const TOKEN_LEN: usize = 48;

    let mut rng = rand::rng();

    (0..TOKEN_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
