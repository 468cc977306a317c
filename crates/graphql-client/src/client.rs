// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use common::graphql_response::GraphQLResponse;
use thiserror::Error;
use tracing::instrument;

use crate::{GraphQLRequest, RequestBuildError, ResponseDecodeError, decode};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Build(#[from] RequestBuildError),

    #[error("Failed to send the request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Decode(#[from] ResponseDecodeError),
}

/// Sends [`GraphQLRequest`]s over HTTP.
#[derive(Default, Clone)]
pub struct GraphQLClient {
    client: reqwest::Client,
}

impl GraphQLClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    #[instrument(name = "GraphQLClient::execute", skip_all)]
    pub async fn execute(&self, request: &GraphQLRequest) -> Result<GraphQLResponse, ClientError> {
        let request = reqwest::Request::try_from(request.build()?)?;

        let response = self.client.execute(request).await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        let mut response = http::Response::new(body);
        *response.status_mut() = status;
        *response.headers_mut() = headers;

        Ok(decode(&response)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Answer a single connection with `response_body`, returning the raw request received
    async fn serve_once(response_body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/graphql", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let read = stream.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..read]);
                if read == 0 || is_complete(&request) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/graphql+json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{response_body}",
                response_body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();

            String::from_utf8(request).unwrap()
        });

        (url, handle)
    }

    fn is_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some((head, body)) = text.split_once("\r\n\r\n") else {
            return false;
        };

        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        body.len() >= content_length
    }

    #[tokio::test]
    async fn execute_posts_and_decodes() {
        let (url, server) = serve_once(r#"{"data": {"hello": "world"}}"#).await;

        let response = GraphQLClient::default()
            .execute(&GraphQLRequest::new(url, "{ hello }"))
            .await
            .unwrap();

        assert_eq!(response.data, Some(json!({"hello": "world"})));
        assert_eq!(response.errors, None);

        let request = server.await.unwrap();
        let (head, body) = request.split_once("\r\n\r\n").unwrap();

        assert!(head.starts_with("POST /graphql HTTP/1.1"));
        assert!(
            head.to_lowercase()
                .contains("accept: application/graphql+json, application/json")
        );
        assert_eq!(
            serde_json::from_str::<Value>(body).unwrap(),
            json!({"query": "{ hello }"})
        );
    }

    #[tokio::test]
    async fn execute_reports_undecodable_responses() {
        let (url, server) = serve_once(r#"{"message": "not graphql"}"#).await;

        let result = GraphQLClient::default()
            .execute(&GraphQLRequest::new(url, "{ hello }"))
            .await;

        assert!(matches!(
            result,
            Err(ClientError::Decode(ResponseDecodeError::NotAnEnvelope(_)))
        ));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn execute_reports_build_errors() {
        let result = GraphQLClient::default()
            .execute(&GraphQLRequest::new("not a url", "{ hello }"))
            .await;

        assert!(matches!(
            result,
            Err(ClientError::Build(RequestBuildError::InvalidUrl { .. }))
        ));
    }
}
