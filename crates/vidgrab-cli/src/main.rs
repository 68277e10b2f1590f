//! CLI entry point - the composition root.
//!
//! Loads `.env`, initialises logging, bootstraps the context and dispatches
//! to a handler.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use vidgrab_cli::{Cli, CliConfig, Commands, bootstrap, handlers};

fn init_tracing(verbose: bool) {
    let default = if verbose { "info,vidgrab=debug" } else { "warn,vidgrab=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads its env fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let ctx = bootstrap(CliConfig::from_args(&cli.tools)?);

    match command {
        Commands::Web(options) => {
            handlers::web::execute(&ctx, &options).await?;
        }
        Commands::Get { url, options } => {
            handlers::get::execute(&ctx, &url, &options).await?;
        }
        Commands::Batch {
            file,
            urls,
            options,
        } => {
            handlers::batch::execute(&ctx, file.as_deref(), &urls, &options).await?;
        }
        Commands::CheckDeps => {
            handlers::check_deps::execute(&ctx).await?;
        }
        Commands::Paths => {
            handlers::paths::execute(&ctx)?;
        }
    }

    Ok(())
}
