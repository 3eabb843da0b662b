use std::sync::Arc;

use log::info;
use tokio::{net::TcpListener, signal};

use salreg_linear::RegressionEngine;
use salreg_server::{server, Config, Result};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = Config::from_env()?;

    let dataset = match &config.dataset {
        Some(path) => {
            info!("loading dataset from {}", path.display());
            salreg_datasets::load_csv(path)?
        }
        None => salreg_datasets::salary()?,
    };
    info!("dataset loaded: {} samples", dataset.len());

    let engine = RegressionEngine::new(dataset, &config.split)?;
    let params = engine.params();
    let metrics = engine.metrics();
    info!(
        "model fitted: intercept={:.2} coefficient={:.2} r2={:.4} rmse={:.2}",
        params.intercept, params.coefficient, metrics.r2, metrics.rmse
    );

    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("listening at {addr}");

    tokio::select! {
        ret = server::run(listener, Arc::new(engine)) => ret?,
        _ = signal::ctrl_c() => info!("received ctrl-c, shutting down"),
    }

    Ok(())
}
