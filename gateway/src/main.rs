// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use clap::Parser;
use dataload_gateway::application::Application;
use dataload_gateway::configuration::GatewayOptions;
use dataload_gateway::service_locator::ServiceLocator;
use dataload_gateway::upstream::TlsPolicy;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("[gateway] init");

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        // this needs to be set to remove duplicated information in the log.
        .with_current_span(false)
        // ANSI color codes are noise in aggregated platform logs.
        .with_ansi(false)
        // the platform log router adds the ingestion time.
        .without_time()
        // remove the name of the function from every log entry
        .with_target(false)
        .init();

    // get configuration options from arguments and environment variables
    let options = GatewayOptions::parse();

    tracing::info!("[gateway] {:?}", &options);

    if options.tls_policy() == TlsPolicy::AcceptAll {
        tracing::warn!("[gateway] upstream certificates and hostnames are not verified");
    }

    let credentials = ServiceLocator::new(options.service_name.as_str())
        .resolve(&options)
        .inspect_err(|e| tracing::error!("[gateway] {}", e))?;

    let application = Application::build(options, credentials).await?;

    application.run_until_stopped().await?;

    Ok(())
}
