// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use ayush_diagnostic_node::{
    api::{start_server, AppState},
    clinical::ClinicalDatabase,
    experts::{ExpertRegistry, RegistryConfig},
    routing::DiagnosticRouter,
    setup,
};
use std::{env, path::PathBuf, sync::Arc, time::Duration};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🚀 Starting CCRAS Diagnostic Node...\n");

    // Parse environment variables for configuration
    let api_port = env::var("API_PORT")
        .unwrap_or_else(|_| "8000".to_string())
        .parse::<u16>()
        .unwrap_or(8000);
    let static_dir = PathBuf::from(env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string()));
    let weights_dir =
        PathBuf::from(env::var("WEIGHTS_DIR").unwrap_or_else(|_| "weights".to_string()));
    let simulation_delay_ms = env::var("SIMULATION_DELAY_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(800);

    // Prepare runtime directories and bundled assets
    setup::initialize(&static_dir, &weights_dir)?;

    // Load the clinical reference table shared by all experts
    let clinical = Arc::new(ClinicalDatabase::bundled());
    println!(
        "✅ Clinical reference table loaded ({} conditions)",
        clinical.entries().len()
    );

    // Load the four expert classifiers
    println!("🧠 Initializing expert classifiers...");
    let registry_config = RegistryConfig {
        weights_dir: weights_dir.clone(),
        simulation_delay: Duration::from_millis(simulation_delay_ms),
    };
    let registry = Arc::new(ExpertRegistry::load(registry_config, clinical).await);
    println!(
        "✅ {}/4 classifiers running with real weights, remainder simulated",
        registry.loaded_count()
    );

    let router = Arc::new(DiagnosticRouter::new(registry));
    let state = AppState {
        router,
        static_dir: static_dir.clone(),
    };

    // Print node information
    let separator = "=".repeat(60);
    println!("\n{}", separator);
    println!("🎉 CCRAS Diagnostic Node is running!");
    println!("{}", separator);
    println!("API Port:       {}", api_port);
    println!("Weights:        {}", weights_dir.display());
    println!("Static assets:  {}", static_dir.display());
    println!("\nAPI Endpoints:");
    println!("  Health:       http://localhost:{}/health", api_port);
    println!("  Models:       http://localhost:{}/models", api_port);
    println!(
        "  Chest X-ray:  POST http://localhost:{}/predict-xray/chest",
        api_port
    );
    println!(
        "  Knee X-ray:   POST http://localhost:{}/predict-xray/knee",
        api_port
    );
    println!("  MRI:          POST http://localhost:{}/predict-mri", api_port);
    println!("  CT:           POST http://localhost:{}/predict-ct", api_port);
    println!("\nPress Ctrl+C to shutdown...");
    println!("{}\n", separator);

    start_server(state, api_port).await
}
