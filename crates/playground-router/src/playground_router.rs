// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_trait::async_trait;
use common::env_const::{get_graphql_http_path, get_playground_http_path, is_playground_enabled};
use common::http::{Headers, RequestHead, RequestPayload, ResponseBody, ResponsePayload};
use common::router::Router;
use gql_env::{EnvError, Environment};
use http::StatusCode;
use tracing::instrument;

use crate::playground::{self, INDEX_FILE, PlaygroundConfig};

pub struct PlaygroundRouterConfig {
    enabled: bool,
    playground: PlaygroundConfig,
}

impl PlaygroundRouterConfig {
    pub fn new(env: &dyn Environment) -> Result<Self, EnvError> {
        Ok(Self {
            enabled: is_playground_enabled(env)?,
            playground: PlaygroundConfig {
                playground_http_path: get_playground_http_path(env),
                graphql_http_path: get_graphql_http_path(env),
            },
        })
    }

    /// The asset a GET on `request_path` asks for, if the path is under the playground path
    fn asset_path(&self, request_path: &str) -> Option<String> {
        let playground_path = self.playground.playground_http_path.trim_end_matches('/');

        match request_path.strip_prefix(playground_path)? {
            "" | "/" => Some(INDEX_FILE.to_string()),
            rest => rest.strip_prefix('/').map(|asset| asset.to_string()),
        }
    }
}

/// Serves the GraphiQL page and its assets, when the playground is enabled.
pub struct PlaygroundRouter {
    config: PlaygroundRouterConfig,
}

impl PlaygroundRouter {
    pub fn new(config: PlaygroundRouterConfig) -> Self {
        Self { config }
    }

    fn suitable_asset(&self, request_head: &(dyn RequestHead + Send + Sync)) -> Option<String> {
        if !self.config.enabled || request_head.get_method() != http::Method::GET {
            return None;
        }

        self.config.asset_path(&request_head.get_path())
    }
}

#[async_trait]
impl Router for PlaygroundRouter {
    #[instrument(
        name = "PlaygroundRouter::route",
        skip_all
    )]
    async fn route(&self, request: &mut (dyn RequestPayload + Send)) -> Option<ResponsePayload> {
        let asset_path = self.suitable_asset(request.get_head())?;

        let content_type = mime_guess::from_path(&asset_path).first_or_octet_stream();

        // The index page embeds the configuration, so it must not be cached
        let cache_control = if asset_path == INDEX_FILE {
            "no-cache".to_string()
        } else {
            format!("public, max-age={}", 60 * 60 * 24)
        };

        match playground::get_asset_bytes(&asset_path, &self.config.playground) {
            Some(asset) => Some(ResponsePayload {
                body: ResponseBody::Bytes(asset),
                headers: Headers::from_vec(vec![
                    (http::header::CACHE_CONTROL.to_string(), cache_control),
                    (
                        http::header::CONTENT_TYPE.to_string(),
                        content_type.to_string(),
                    ),
                ]),
                status_code: StatusCode::OK,
            }),
            None => Some(ResponsePayload {
                body: ResponseBody::None,
                headers: Headers::new(),
                status_code: StatusCode::NOT_FOUND,
            }),
        }
    }
}
