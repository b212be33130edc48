use authflow::{
    AnonymousPanel, AuthClient, AuthFailure, Command as PanelCommand, HttpAuthClient, Rejection, SessionObserver,
};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

mod transport;

use transport::ReqwestTransport;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    #[error("auth service call failed: {0}")]
    Auth(#[from] AuthFailure),
    #[error("command refused: {0}")]
    Rejected(#[from] Rejection),
    #[error("{command} failed: {message}")]
    CommandFailed { command: &'static str, message: String },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "neon-auth-cli", about = "Drive the Neon Auth anonymous sign-in and linking flow")]
struct Cli {
    /// Auth API base, e.g. `http://127.0.0.1:3000/api/auth` or the hosted
    /// service URL.
    #[arg(long, env = "NEON_AUTH_BASE_URL", default_value = "http://127.0.0.1:3000/api/auth")]
    base_url: String,

    /// `Origin` header to send. Defaults to the origin of `--base-url`.
    #[arg(long, env = "NEON_AUTH_ORIGIN")]
    origin: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the current session.
    Session,
    /// List the active sessions of the current user.
    Sessions,
    /// Start an anonymous session and print the result.
    Anonymous,
    /// Anonymous sign-in, then optional linking, then optional sign-out.
    Flow {
        #[arg(long, requires = "password")]
        email: Option<String>,
        #[arg(long, requires = "email", env = "NEON_AUTH_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        #[arg(long)]
        sign_out: bool,
    },
}

type CliClient = HttpAuthClient<ReqwestTransport>;

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = HttpAuthClient::new(ReqwestTransport::new(&cli.base_url, cli.origin.as_deref())?);

    match cli.command {
        Command::Session => run_session(&client).await,
        Command::Sessions => run_sessions(&client).await,
        Command::Anonymous => run_anonymous(&client).await,
        Command::Flow { email, password, sign_out } => run_flow(&client, email, password, sign_out).await,
    }
}

async fn run_session(client: &CliClient) -> Result<(), CliError> {
    let session = client.get_session().await?;
    print_json(&serde_json::to_value(&session)?)
}

async fn run_sessions(client: &CliClient) -> Result<(), CliError> {
    let sessions = client.list_sessions().await?;
    print_json(&serde_json::to_value(&sessions)?)
}

async fn run_anonymous(client: &CliClient) -> Result<(), CliError> {
    let observer = SessionObserver::new();
    observer.refresh(client).await;

    let mut panel = AnonymousPanel::default();
    step(&mut panel, PanelCommand::SignInAnonymous, &observer, client).await
}

async fn run_flow(
    client: &CliClient,
    email: Option<String>,
    password: Option<String>,
    sign_out: bool,
) -> Result<(), CliError> {
    let mut observer = SessionObserver::new();
    observer.on_change(|snapshot| {
        eprintln!("session: {}", snapshot.phase().describe());
    });
    observer.refresh(client).await;

    let mut panel = AnonymousPanel::default();
    step(&mut panel, PanelCommand::SignInAnonymous, &observer, client).await?;

    if let (Some(email), Some(password)) = (email, password) {
        panel.link.email = email;
        panel.link.password = password;
        step(&mut panel, PanelCommand::LinkAccount, &observer, client).await?;
    }

    if sign_out {
        step(&mut panel, PanelCommand::SignOut, &observer, client).await?;
    }

    let snapshot = observer.snapshot();
    if let Some(message) = snapshot.last_refresh_error {
        eprintln!("warning: last session refresh failed: {message}");
    }
    print_json(&serde_json::to_value(&snapshot.session)?)
}

/// Run one panel command, print its Operation Result, and fail on an error.
async fn step(
    panel: &mut AnonymousPanel,
    command: PanelCommand,
    observer: &SessionObserver,
    client: &CliClient,
) -> Result<(), CliError> {
    eprintln!("> {}", command.label());
    panel.dispatch(command, observer, client).await?;

    if let Some(result) = &panel.last_result {
        println!("{}", result.to_pretty_json());
    }
    match panel.error.take() {
        Some(message) => Err(CliError::CommandFailed { command: command.label(), message }),
        None => Ok(()),
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
