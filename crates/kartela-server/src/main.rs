use clap::{Parser, Subcommand};
use kartela_core::openapi::ApiDoc;
use kartela_core::{App, Config, logging};
use utoipa::OpenApi;

#[derive(Parser)]
#[command(name = "kartela")]
#[command(about = "Kartela Takip Sistemi: swatch archive and room access server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbCommands,
    },
    /// OpenAPI documentation operations
    Docs {
        #[command(subcommand)]
        action: DocsCommands,
    },
}

#[derive(Subcommand)]
enum DbCommands {
    /// Run pending migrations
    Migrate,
    /// Roll back applied migrations
    Rollback {
        /// Number of migrations to roll back
        #[arg(long, default_value_t = 1)]
        steps: u32,
    },
}

#[derive(Subcommand)]
enum DocsCommands {
    /// Export the OpenAPI document as JSON
    Export {
        /// Output file path
        #[arg(long, default_value = "openapi.json")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_from_env();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let app = App::new().await?;
            app.run().await?;
        }
        Commands::Db { action } => {
            let app = App::connect(Config::from_env()?).await?;
            match action {
                DbCommands::Migrate => app.migrate().await?,
                DbCommands::Rollback { steps } => app.rollback(steps).await?,
            }
        }
        Commands::Docs { action } => match action {
            DocsCommands::Export { output } => {
                let json = ApiDoc::openapi().to_pretty_json()?;
                std::fs::write(&output, json)?;
                tracing::info!(output = %output, "OpenAPI document written");
            }
        },
    }

    Ok(())
}
