// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use common::media_type::MediaType;
use http::Method;
use serde_json::{Map, Value};

use crate::{http_error::HttpError, request::IncomingRequest};

const QUERY: &str = "query";
const OPERATION_NAME: &str = "operationName";
const VARIABLES: &str = "variables";

/// The parameters of a GraphQL request, once extracted and validated.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphQLParameters {
    pub query: String,
    pub operation_name: Option<String>,
    pub variables: Option<Map<String, Value>>,
}

/// Parameters before validation, as found in one source (URL or body).
///
/// JSON `null` counts as absent, so that a body can defer to the URL.
#[derive(Debug, Default)]
struct RawParameters {
    query: Option<Value>,
    operation_name: Option<Value>,
    variables: Option<Value>,
}

impl RawParameters {
    fn from_query_string(query_string: Option<&str>) -> Self {
        let mut raw = RawParameters::default();

        let Some(query_string) = query_string else {
            return raw;
        };

        for (key, value) in url::form_urlencoded::parse(query_string.as_bytes()) {
            let slot = match key.as_ref() {
                QUERY => &mut raw.query,
                OPERATION_NAME => &mut raw.operation_name,
                VARIABLES => &mut raw.variables,
                _ => continue,
            };
            // The first occurrence of a repeated parameter wins
            if slot.is_none() {
                *slot = Some(Value::String(value.into_owned()));
            }
        }

        raw
    }

    fn from_body(mut body: Map<String, Value>) -> Self {
        let mut take = |key: &str| body.remove(key).filter(|value| !value.is_null());

        RawParameters {
            query: take(QUERY),
            operation_name: take(OPERATION_NAME),
            variables: take(VARIABLES),
        }
    }

    /// Layer `self` over `lower`: a value present in `self` wins.
    fn over(self, lower: RawParameters) -> RawParameters {
        RawParameters {
            query: self.query.or(lower.query),
            operation_name: self.operation_name.or(lower.operation_name),
            variables: self.variables.or(lower.variables),
        }
    }

    fn validate(self) -> Result<GraphQLParameters, HttpError> {
        let query = match self.query {
            Some(Value::String(query)) if !query.trim().is_empty() => query,
            None | Some(Value::String(_)) => return Err(HttpError::MissingParameter(QUERY)),
            Some(_) => return Err(HttpError::NonStringParameter(QUERY)),
        };

        let operation_name = match self.operation_name {
            None => None,
            Some(Value::String(name)) if name.is_empty() => None,
            Some(Value::String(name)) => Some(name),
            Some(_) => return Err(HttpError::NonStringParameter(OPERATION_NAME)),
        };

        let variables = match self.variables {
            None => None,
            Some(Value::Object(variables)) => Some(variables),
            // URL parameters are always strings; bodies may also carry encoded variables
            Some(Value::String(encoded)) => match serde_json::from_str::<Value>(&encoded) {
                Ok(Value::Object(variables)) => Some(variables),
                Ok(Value::Null) => None,
                _ => return Err(HttpError::MalformedVariables),
            },
            Some(_) => return Err(HttpError::MalformedVariables),
        };

        Ok(GraphQLParameters {
            query,
            operation_name,
            variables,
        })
    }
}

/// Determine the media type of a POST body from its `Content-Type` header.
pub fn body_media_type(request: &IncomingRequest) -> Result<MediaType, HttpError> {
    let content_type = request
        .content_type
        .as_deref()
        .ok_or(HttpError::MissingContentType)?;

    MediaType::from_header_value(content_type)
        .ok_or_else(|| HttpError::UnsupportedContentType(content_type.to_string()))
}

/// Extract the GraphQL parameters from a GET or POST request.
///
/// For POST requests, the `Content-Type` is checked before the body is read,
/// and URL parameters fill in anything the body leaves out.
pub fn extract(request: &IncomingRequest) -> Result<GraphQLParameters, HttpError> {
    let url_parameters = RawParameters::from_query_string(request.query_string.as_deref());

    let raw = match request.method {
        Method::GET => url_parameters,
        Method::POST => {
            // Both supported media types decode the same way
            body_media_type(request)?;
            decode_body(&request.body)?.over(url_parameters)
        }
        ref method => return Err(HttpError::UnsupportedMethod(method.clone())),
    };

    raw.validate()
}

fn decode_body(body: &[u8]) -> Result<RawParameters, HttpError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RawParameters::default());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(body)) => Ok(RawParameters::from_body(body)),
        Ok(_) => Err(HttpError::NonObjectBody),
        Err(_) => Err(HttpError::MalformedJsonBody),
    }
}
