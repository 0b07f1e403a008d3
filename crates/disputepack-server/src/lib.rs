pub mod auth;
pub mod error;
pub mod routes;

use anyhow::Result;
use tokio::net::TcpListener;

pub use routes::{app_state, build_router, AppState};

pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let app = routes::build_router(state);
    axum::serve(listener, app).await?;
    Ok(())
}
