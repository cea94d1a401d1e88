//! Command handlers

use log::{debug, error, info, warn};

use crate::cf::CfSession;
use crate::cli::{Cli, Command, OutputFormat, ServiceArgs};
use crate::error::Result;
use crate::output::output_record;
use crate::ui::with_spinner;

/// Build the session for `cli` and run its command
pub async fn run_command(cli: &Cli) -> Result<()> {
    let mut session = CfSession::from_env(&cli.cf_bin);
    if let Command::Cfservice(args) = &cli.command {
        session = session.with_retry_policy(args.retry_policy());
    }
    debug!(
        "Using cf binary '{}' with CF home {}",
        cli.cf_bin,
        session.cf_home().display()
    );
    execute(&cli.command, &session, cli.quiet).await
}

/// Run `command` against an existing session
pub async fn execute(command: &Command, session: &CfSession, quiet: bool) -> Result<()> {
    match command {
        Command::Hello { message } => {
            run_hello(message);
            Ok(())
        }
        Command::Cfversion => run_cfversion(session).await,
        Command::Cfoauth => run_cfoauth(session).await,
        Command::Cftarget(args) => run_cftarget(session, args.output, quiet).await,
        Command::Cfspace(args) => run_cfspace(session, args.output, quiet).await,
        Command::Cfservice(args) => run_cfservice(session, args, quiet).await,
    }
}

pub fn run_hello(message: &str) {
    info!(meta1 = "meta1"; "Saying hello: {}", message);
    warn!("This is a warning for: {}", message);
    error!("This is an error for: {}", message);
    println!("Hello {}", message);
}

pub async fn run_cfversion(session: &CfSession) -> Result<()> {
    match session.check_cli_version().await? {
        Some(version) => println!("cf CLI version {}", version),
        None => println!("cf CLI version unknown"),
    }
    Ok(())
}

pub async fn run_cfoauth(session: &CfSession) -> Result<()> {
    let token = session.oauth_token().await?;
    println!("{}", token);
    Ok(())
}

pub async fn run_cftarget(session: &CfSession, format: OutputFormat, quiet: bool) -> Result<()> {
    let target = with_spinner("Resolving cf target...", quiet, session.resolve_target()).await?;
    output_record(&target, format)
}

pub async fn run_cfspace(session: &CfSession, format: OutputFormat, quiet: bool) -> Result<()> {
    let space = with_spinner(
        "Resolving org and space...",
        quiet,
        session.resolve_space_info(),
    )
    .await?;
    output_record(&space, format)
}

pub async fn run_cfservice(session: &CfSession, args: &ServiceArgs, quiet: bool) -> Result<()> {
    let options = args.provision_options();
    let message = format!(
        "Provisioning {} '{}' ({})...",
        args.offering, args.name, args.plan
    );
    let credentials = with_spinner(
        &message,
        quiet,
        session.get_or_provision_service(&args.offering, &args.plan, &args.name, &options),
    )
    .await?;
    output_record(&credentials, args.output)
}
