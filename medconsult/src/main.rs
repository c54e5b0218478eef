use clap::Parser;
use medconsult::{Config, ConsultationClient, cli, config::Args, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI args
    let args = Args::parse();

    // Load configuration
    let config = Config::load(&args)?;

    // If --validate flag is set, exit successfully after config validation
    if args.validate {
        println!("Configuration is valid.");
        return Ok(());
    }

    telemetry::init_telemetry(config.log_format)?;

    tracing::debug!("{:?}", args);

    let Some(command) = args.command else {
        anyhow::bail!("No command given, run with --help to list commands");
    };

    let client = ConsultationClient::from_config(&config)?;
    tracing::debug!(api_base_url = %client.base_url(), "Client ready");

    let output = cli::run(&client, command).await?;
    println!("{output}");

    Ok(())
}
