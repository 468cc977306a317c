// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use bytes::Bytes;
use common::graphql_response::GraphQLResponse;
use http::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResponseDecodeError {
    #[error("Response body (status {status}) is not valid JSON: {source}")]
    InvalidJson {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },

    #[error("Response body (status {0}) is not a GraphQL response: expected an object with `data` or `errors`")]
    NotAnEnvelope(StatusCode),
}

/// Decode a GraphQL-over-HTTP response, whatever its status code.
///
/// Non-2xx responses still carry a GraphQL body (for example, a 400 with
/// `errors`), so the status is only reported when the body can't be decoded.
pub fn decode(response: &http::Response<Bytes>) -> Result<GraphQLResponse, ResponseDecodeError> {
    let status = response.status();

    let value: Value = serde_json::from_slice(response.body())
        .map_err(|source| ResponseDecodeError::InvalidJson { status, source })?;

    let is_envelope = value
        .as_object()
        .is_some_and(|object| object.contains_key("data") || object.contains_key("errors"));
    if !is_envelope {
        return Err(ResponseDecodeError::NotAnEnvelope(status));
    }

    serde_json::from_value(value).map_err(|e| {
        tracing::debug!("Malformed GraphQL response: {e}");
        ResponseDecodeError::NotAnEnvelope(status)
    })
}
