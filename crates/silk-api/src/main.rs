//! # Silk Store
//!
//! Storefront server and account provisioning.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET_KEY=sk_test_...
//! export DATABASE_URL=sqlite://silk-store.db?mode=rwc
//!
//! # Run the server
//! silk-store
//!
//! # Provision a login
//! silk-store create-user --email owner@example.com --password 'correct horse'
//! ```

use clap::{Parser, Subcommand};
use silk_api::{routes, session::create_session_layer, AppConfig, AppState};
use silk_db::AuthService;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "silk-store")]
#[command(author, version, about = "Silk Store storefront")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Create a login for the storefront
    CreateUser {
        /// Login email address
        #[arg(short, long)]
        email: String,

        /// Plaintext password, hashed before storage
        #[arg(short, long, env = "SILK_USER_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve().await,
        Commands::CreateUser { email, password } => create_user(&email, &password).await,
    }
}

/// `LOG_FORMAT=json` switches to structured output.
fn init_tracing() {
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    tracing_subscriber::registry()
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(fmt::layer))
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();
}

async fn serve() -> anyhow::Result<()> {
    print_banner();

    let config = AppConfig::from_env()?;
    let addr = config.socket_addr()?;
    let is_prod = config.is_production();

    let state = AppState::from_config(config).await?;
    let sessions = create_session_layer(&state.pool, &state.config).await?;

    info!("Environment: {}", state.config.environment);
    info!("Store currency: {}", state.currency());
    info!("Payment provider: {}", state.gateway.provider_name());

    let app = routes::create_router(state, sessions);

    info!("Silk Store starting on http://{}", addr);

    if !is_prod {
        info!("Health: http://{}/health", addr);
        info!("Login: http://{}/login", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn create_user(email: &str, password: &str) -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    let pool = silk_db::connect(&config.database_url).await?;

    let user = AuthService::new(&pool).register(email, password).await?;
    info!("Created user {}", user.email);

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  Silk Store
  ━━━━━━━━━━━━━━━━━━━━━━━
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
