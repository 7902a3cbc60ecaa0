use color_eyre::Result;
use green_plate::cli::{parse_args, run_cli_command, CliCommand, USAGE};
use green_plate::config::AppConfig;
use green_plate::context::AppContext;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    color_eyre::install()?;

    let command = parse_args(std::env::args());
    if let CliCommand::Invalid(reason) = &command {
        eprintln!("{}\n\n{}", reason, USAGE);
        std::process::exit(2);
    }

    // Logs go to stderr so command output stays pipeable.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("green_plate=info")),
        )
        .init();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(command))
}

async fn run(command: CliCommand) -> Result<()> {
    let mut stdout = std::io::stdout();
    if !command.needs_context() {
        return print_without_context(command, &mut stdout);
    }

    let config = AppConfig::from_env();
    let ctx = AppContext::open(&config)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("{} [{}]", e.user_message(), e.error_code()))?;
    let result = run_cli_command(command, &ctx, &mut stdout).await;
    ctx.shutdown().await;
    result
}

fn print_without_context(command: CliCommand, out: &mut impl std::io::Write) -> Result<()> {
    match command {
        CliCommand::Version => writeln!(out, "{}", green_plate::cli::version_line())?,
        _ => writeln!(out, "{}", USAGE)?,
    }
    Ok(())
}
