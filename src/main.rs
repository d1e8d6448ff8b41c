use std::sync::Arc;

use evm_verify_runner::config::{Config, RunMode};
use evm_verify_runner::routes::{build_router, AppState};
use evm_verify_runner::rpc::RpcEndpoint;
use evm_verify_runner::types::VerifyResponse;
use evm_verify_runner::verifier::{CallMode, Verifier};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "evm_verify_runner=info".into()),
        )
        .init();

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::error!("{}", e);
        std::process::exit(2);
    });

    tracing::info!(
        "Artifacts: {} (prefix '{}'), verify layout: {}",
        config.artifacts_dir.display(),
        config.artifact_prefix,
        config.layout
    );

    let store = config.artifact_store();
    let endpoint = RpcEndpoint::new(config.rpc.clone()).unwrap_or_else(|e| {
        tracing::error!("Failed to create verifier endpoint: {}", e);
        std::process::exit(2);
    });
    let verifier = Verifier::new(store, config.layout.clone(), endpoint);

    match config.run_mode {
        RunMode::Once(mode) => run_once(&verifier, mode).await,
        RunMode::Serve => serve(verifier, config.port).await,
    }
}

/// Single verification attempt; the exit code reflects the outcome.
async fn run_once(verifier: &Verifier<RpcEndpoint>, mode: CallMode) {
    tracing::info!("Running one {:?} attempt", mode);

    match verifier.verify_artifacts(mode).await {
        Ok(report) => {
            let accepted = report.outcome.accepted();
            let response = VerifyResponse::from(report);
            match serde_json::to_string_pretty(&response) {
                Ok(json) => println!("{}", json),
                Err(e) => tracing::error!("Failed to serialize report: {}", e),
            }
            if accepted == Some(false) {
                std::process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!("Verification attempt failed: {}", e);
            std::process::exit(1);
        }
    }
}

async fn serve(verifier: Verifier<RpcEndpoint>, port: u16) {
    let state = Arc::new(AppState { verifier });
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("Verifier runner listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            panic!("Failed to bind to {}: {}", addr, e);
        });

    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| {
            panic!("Server error: {}", e);
        });
}
