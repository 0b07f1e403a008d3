mod format;
mod generator;
mod model;
mod render;

pub use generator::PacketGenerator;
pub use model::{build_model, PacketModel};
pub use render::render_packet;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PacketError {
    #[error(transparent)]
    Gateway(#[from] disputepack_stripe::GatewayError),

    #[error("database error: {0}")]
    Db(#[from] disputepack_db::DbError),

    #[error("store error: {0}")]
    Store(#[from] disputepack_store::StoreError),

    #[error("render error: {0}")]
    Render(String),
}
