//! CLI entry point.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use voxclone_cli::bootstrap::build_manager;
use voxclone_cli::handlers::{batch, clone, pages};
use voxclone_cli::{Cli, CliError, Commands};

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Clone {
            reference,
            text,
            output,
        } => {
            let mut manager = build_manager(cli)?;
            clone::execute(&mut manager, reference, text, output.as_deref())
                .with_context(|| format!("cloning voice from {}", reference.display()))?;
        }
        Commands::Batch {
            reference,
            output_dir,
            texts_file,
            texts,
        } => {
            let texts = match texts_file {
                Some(path) => batch::read_texts_file(path)?,
                None => texts.clone(),
            };
            let mut manager = build_manager(cli)?;
            batch::execute(&mut manager, reference, &texts, output_dir).with_context(|| {
                format!("batch cloning into {}", output_dir.display())
            })?;
        }
        Commands::Pages { file } => pages::execute(file)?,
    }
    Ok(())
}

/// Exit code of the `CliError` behind `err`, looking through any context.
fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<CliError>().map_or(1, CliError::exit_code)
}

fn main() {
    // Load environment variables before clap reads VOXCLONE_*
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        tracing::debug!(error = ?e, "Command failed");
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code(&e));
    }
}
