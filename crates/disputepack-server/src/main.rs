use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

use disputepack_db::Db;
use disputepack_server::auth::StubIdentity;
use disputepack_server::{app_state, serve};
use disputepack_store::LocalStore;
use disputepack_stripe::StripeGateway;

#[derive(Parser)]
#[command(name = "disputepack-server")]
struct Cli {
    /// Address to bind.
    #[arg(long, env = "DISPUTEPACK_BIND", default_value = "0.0.0.0")]
    bind: String,

    /// Port to listen on.
    #[arg(long, env = "DISPUTEPACK_PORT", default_value_t = 4000)]
    port: u16,

    /// Stripe secret key. Without it the process still serves, but
    /// dispute and packet endpoints answer 503.
    #[arg(long, env = "STRIPE_SECRET_KEY", hide_env_values = true)]
    stripe_secret_key: Option<String>,

    /// Override the Stripe API base URL (recorded server, test proxy).
    #[arg(long, env = "STRIPE_BASE_URL", default_value = "https://api.stripe.com")]
    stripe_base_url: String,

    /// Directory for the database and stored files. Defaults to the
    /// XDG data dir.
    #[arg(long, env = "DISPUTEPACK_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let data_dir = cli.data_dir.unwrap_or_else(disputepack_db::data_dir);
    let db = Db::open(&data_dir.join("disputepack.db"))?;
    let store = Arc::new(LocalStore::new(data_dir.join("objects")));

    let gateway = StripeGateway::with_base_url(cli.stripe_secret_key, &cli.stripe_base_url);
    if !gateway.is_configured() {
        warn!("STRIPE_SECRET_KEY is not set; dispute and packet endpoints will return 503");
    }

    let state = app_state(
        db,
        store,
        Arc::new(gateway),
        Arc::new(StubIdentity::default()),
    );

    let addr = SocketAddr::new(cli.bind.parse()?, cli.port);
    let listener = TcpListener::bind(addr).await?;
    info!("disputepack-server listening on http://{addr}");
    info!("data directory: {}", data_dir.display());

    serve(listener, state).await
}
