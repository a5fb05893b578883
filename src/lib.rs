//! searchdata demos
//!
//! Re-exports the workspace crates under one roof for the programs in `demos/`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use searchdata_client as client;
pub use searchdata_core as core;
pub use searchdata_parser as parser;
pub use searchdata_repository as repository;

/// Install a `tracing` subscriber honoring `RUST_LOG`
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "searchdata_client=info,searchdata_repository=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
