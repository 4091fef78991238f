mod config;
mod employees;
mod http;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use platform_db::{DbPool, EmployeeStore, connect};
use platform_obs::{ObsConfig, init_tracing};
use products_hr::{EmployeeFields, EmployeeService, HrError};
use tracing::info;

use crate::{
    config::AppConfig,
    http::{AppState, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "employees-server", version, about = "Employee records service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server.
    Serve(ServeCommand),
    /// Run database migrations.
    #[command(subcommand)]
    Migrate(MigrateCommand),
    /// Insert demo employees, skipping emails that already exist.
    Seed,
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Apply pending migrations.
    Up,
    /// Rollback the most recent migration.
    Down,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
    #[arg(long, help = "Allow starting even when migrations are pending")]
    allow_dirty: bool,
}

impl From<&ServeCommand> for ServeConfig {
    fn from(value: &ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(ObsConfig::from_env())?;
    let cli = Cli::parse();
    let config = AppConfig::load();
    let pool = connect(&config.database)
        .await
        .context("database connection failed")?;
    match cli.command {
        Command::Serve(cmd) => run_server(cmd, config, pool).await,
        Command::Migrate(MigrateCommand::Up) => {
            Migrator::up(&pool, None).await?;
            info!("database migrations applied");
            Ok(())
        }
        Command::Migrate(MigrateCommand::Down) => {
            Migrator::down(&pool, Some(1)).await?;
            info!("most recent migration rolled back");
            Ok(())
        }
        Command::Seed => run_seed(pool).await,
    }
}

async fn run_server(cmd: ServeCommand, config: AppConfig, pool: DbPool) -> Result<()> {
    ensure_migrations(&pool, cmd.allow_dirty).await?;
    let state = AppState::new(pool, config);
    http::serve((&cmd).into(), state).await
}

async fn ensure_migrations(pool: &DbPool, allow_dirty: bool) -> Result<()> {
    let pending = Migrator::get_pending_migrations(pool).await?;
    if !pending.is_empty() && !allow_dirty {
        anyhow::bail!(
            "pending migrations detected; run `cargo run -p server -- migrate up` or pass --allow-dirty"
        );
    }
    Ok(())
}

async fn run_seed(pool: DbPool) -> Result<()> {
    let service = EmployeeService::new(EmployeeStore::new(pool));
    let demo = [
        ("Moses", "Hunsu", "moses@yahoo.com"),
        ("Favour", "Attah", "favour@gmail.com"),
    ];
    let mut created = 0;
    for (first_name, last_name, email) in demo {
        let fields = EmployeeFields {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        };
        match service.save_employee(fields).await {
            Ok(_) => created += 1,
            Err(HrError::EmailTaken(email)) => info!(%email, "seed employee already present"),
            Err(err) => return Err(err).context("seed data failed"),
        }
    }
    info!(created, "seed complete");
    Ok(())
}
