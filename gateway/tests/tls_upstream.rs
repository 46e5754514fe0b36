// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! TLS policy tests against an upstream serving a self-signed certificate.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use axum_test::TestServer;
use dataload_gateway::application::create_router;
use dataload_gateway::configuration::GatewayOptions;
use dataload_gateway::models::UpstreamCredentials;
use hyper_util::rt::TokioIo;
use hyper_util::service::TowerToHyperService;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;
use tokio_rustls::rustls;
use tokio_rustls::rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};

/// Serves `GET /dc/v1/activities/{a}/activityRuns/{r}` over HTTPS with a
/// freshly generated self-signed certificate.
async fn start_self_signed_upstream() -> SocketAddr {
    let rcgen::CertifiedKey { cert, key_pair } =
        rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der()));

    let config = rustls::ServerConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .unwrap()
    .with_no_client_auth()
    .with_single_cert(vec![cert.der().clone()], key)
    .unwrap();
    let acceptor = TlsAcceptor::from(Arc::new(config));

    let upstream = Router::new().route(
        "/dc/v1/activities/{activity_id}/activityRuns/{run_id}",
        get(|| async { Json(json!({"id": "r1", "executionState": "FINISHED_SUCCEEDED"})) }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                continue;
            };
            let acceptor = acceptor.clone();
            let service = TowerToHyperService::new(upstream.clone());
            tokio::spawn(async move {
                // a rejected handshake is the expected outcome under strict TLS
                let Ok(tls) = acceptor.accept(stream).await else {
                    return;
                };
                let _ = hyper::server::conn::http1::Builder::new()
                    .serve_connection(TokioIo::new(tls), service)
                    .await;
            });
        }
    });

    addr
}

fn create_test_server(options: GatewayOptions, addr: SocketAddr) -> TestServer {
    let credentials = UpstreamCredentials {
        url: format!("https://{addr}/dc/v1"),
        user: "user".to_string(),
        password: "pass".to_string(),
    };
    TestServer::new(create_router(options, credentials)).unwrap()
}

#[tokio::test]
async fn test_accept_all_trusts_self_signed_upstream() {
    let addr = start_self_signed_upstream().await;
    let server = create_test_server(GatewayOptions::default(), addr);

    let response = server.get("/activities/a1/activityRuns/r1").await;

    response.assert_status(StatusCode::ACCEPTED);
    response.assert_json(&json!({"id": "r1", "executionState": "FINISHED_SUCCEEDED"}));
}

#[tokio::test]
async fn test_strict_tls_rejects_self_signed_upstream() {
    let addr = start_self_signed_upstream().await;
    let options = GatewayOptions {
        strict_tls: true,
        ..GatewayOptions::default()
    };
    let server = create_test_server(options, addr);

    let response = server.get("/activities/a1/activityRuns/r1").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["msgId"], "500");
    assert_eq!(body["msgSeverity"], "error");
    assert!(!body["msgText"].as_str().unwrap().is_empty());
}
