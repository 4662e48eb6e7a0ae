use clap::Parser;

use recron::cli::{self, Cli, Commands};
use recron::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The --env flag takes precedence over the environment variable so
    // that the config loader picks the right file set.
    if let Some(env) = &cli.env {
        let env: recron::config::Environment = env.clone().into();
        unsafe {
            std::env::set_var(recron::config::Environment::ENV_VAR, env.as_str());
        }
    }

    let settings = cli::load_and_merge_config(&cli)?;
    cli::init_logger_from_settings(&settings)?;

    cli::execute_command(&cli, settings.clone()).await?;

    // Serve without --dry-run (and the bare invocation) fall through to
    // the long-running server; every other command has already finished.
    if matches!(cli.command, None | Some(Commands::Serve { dry_run: false, .. })) {
        Server::new(settings).run().await?;
    }

    Ok(())
}
