// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use bytes::Bytes;
use common::media_type::{GRAPHQL_JSON, JSON};
use http::Method;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum RequestBuildError {
    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("GraphQL requests must use GET or POST, not {0}")]
    UnsupportedMethod(Method),

    #[error("Failed to serialize the request: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Http(#[from] http::Error),
}

/// A GraphQL operation to send to a server.
#[derive(Debug, Clone)]
pub struct GraphQLRequest {
    url: String,
    query: String,
    variables: Option<Map<String, Value>>,
    operation_name: Option<String>,
    method: Method,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestBody<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    operation_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<&'a Map<String, Value>>,
}

impl GraphQLRequest {
    /// A POST request for `query`. Use [`GraphQLRequest::with_method`] to send it as a GET.
    pub fn new(url: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: query.into(),
            variables: None,
            operation_name: None,
            method: Method::POST,
        }
    }

    pub fn with_variables(mut self, variables: Map<String, Value>) -> Self {
        self.variables = Some(variables);
        self
    }

    pub fn with_operation_name(mut self, operation_name: impl Into<String>) -> Self {
        self.operation_name = Some(operation_name.into());
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Build the HTTP request.
    ///
    /// GET requests carry the parameters in the URL (`variables` as JSON text);
    /// POST requests carry them in an `application/json` body.
    pub fn build(&self) -> Result<http::Request<Bytes>, RequestBuildError> {
        let mut url = Url::parse(&self.url).map_err(|source| RequestBuildError::InvalidUrl {
            url: self.url.clone(),
            source,
        })?;

        let builder = http::Request::builder().header(
            http::header::ACCEPT,
            format!("{GRAPHQL_JSON}, {JSON}"),
        );

        match self.method {
            Method::GET => {
                {
                    let mut pairs = url.query_pairs_mut();
                    pairs.append_pair("query", &self.query);
                    if let Some(operation_name) = &self.operation_name {
                        pairs.append_pair("operationName", operation_name);
                    }
                    if let Some(variables) = &self.variables {
                        pairs.append_pair("variables", &serde_json::to_string(variables)?);
                    }
                }

                Ok(builder
                    .method(Method::GET)
                    .uri(url.as_str())
                    .body(Bytes::new())?)
            }
            Method::POST => {
                let body = serde_json::to_vec(&RequestBody {
                    query: &self.query,
                    operation_name: self.operation_name.as_deref(),
                    variables: self.variables.as_ref(),
                })?;

                Ok(builder
                    .method(Method::POST)
                    .uri(url.as_str())
                    .header(http::header::CONTENT_TYPE, JSON)
                    .body(Bytes::from(body))?)
            }
            ref method => Err(RequestBuildError::UnsupportedMethod(method.clone())),
        }
    }
}
