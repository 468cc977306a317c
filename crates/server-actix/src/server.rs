// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::io::ErrorKind;
use std::net::SocketAddr;

use actix_web::{App, HttpServer, web};
use common::env_const::{get_graphql_http_path, get_server_port};
use common::router::CompositeRouter;
use gql_env::Environment;
use thiserror::Error;
use tracing_actix_web::TracingLogger;

use crate::configure_router;

const GQL_SERVER_HOST: &str = "GQL_SERVER_HOST";

#[derive(Error)]
pub enum ServerError {
    #[error("Port {0} is already in use. Check if there is another process running at that port.")]
    PortInUse(u16),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    EnvError(#[from] gql_env::EnvError),
}

// Delegate to `Display`, so that a host returning this from `main` prints the message
impl std::fmt::Debug for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

/// Serve `router` over HTTP until the server is stopped.
///
/// Binds to `GQL_SERVER_HOST` (default `localhost`) on `GQL_SERVER_PORT`.
pub async fn run(router: CompositeRouter, env: &dyn Environment) -> Result<(), ServerError> {
    let server_port = get_server_port(env)?;
    let server_host = env.get_or_else(GQL_SERVER_HOST, "localhost");

    let router = web::Data::new(router);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .configure(configure_router(router.clone()))
    })
    .bind((server_host, server_port));

    match server {
        Ok(server) => {
            tracing::info!(
                "GraphQL endpoint hosted at http://{}{}",
                pretty_addr(&server.addrs()),
                get_graphql_http_path(env)
            );
            Ok(server.run().await?)
        }
        Err(e) => Err(if e.kind() == ErrorKind::AddrInUse {
            ServerError::PortInUse(server_port)
        } else {
            ServerError::Io(e)
        }),
    }
}

fn pretty_addr(addrs: &[SocketAddr]) -> String {
    let loopback_addr = addrs.iter().find(|addr| addr.ip().is_loopback());

    match loopback_addr {
        Some(addr) => format!("localhost:{}", addr.port()),
        None => match addrs {
            [addr] => format!("{addr}"),
            _ => format!("{addrs:?}"),
        },
    }
}
