// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use common::{
    graphql_response::GraphQLResponse,
    http::{Headers, ResponseBody, ResponsePayload},
    media_type::MediaType,
};
use http::StatusCode;
use tracing::error;

use crate::{
    execution::{ExecutionError, ExecutionOutcome},
    http_error::HttpError,
};

const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal server error";
const ALLOWED_METHODS: &str = "GET, POST";

/// Everything that determines the HTTP response to a GraphQL request.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDecision {
    pub status_code: StatusCode,
    pub body: GraphQLResponse,
    pub media_type: MediaType,
    /// Headers beyond `Content-Type`
    pub headers: Headers,
}

/// The state the pipeline ended up in.
pub enum ResolverInput {
    Rejected(HttpError),
    Executed(ExecutionOutcome),
    Failed(ExecutionError),
}

/// Map the pipeline's outcome to a status code and body.
///
/// | Input                         | application/graphql+json | application/json |
/// |-------------------------------|--------------------------|------------------|
/// | HTTP-layer error              | its status               | its status       |
/// | executed (with or w/o errors) | 200                      | 200              |
/// | request errors (no execution) | 400                      | 200              |
/// | executor fault                | 500                      | 500              |
pub fn resolve(input: ResolverInput, media_type: MediaType) -> ResponseDecision {
    let mut headers = Headers::new();

    let (status_code, body) = match input {
        ResolverInput::Rejected(error) => {
            if error.advertises_allowed_methods() {
                headers.insert(http::header::ALLOW.to_string(), ALLOWED_METHODS.to_string());
            }
            (
                error.status_code(),
                GraphQLResponse::from_message(error.to_string()),
            )
        }
        ResolverInput::Executed(ExecutionOutcome::Executed(result)) => {
            (StatusCode::OK, GraphQLResponse::from(result))
        }
        ResolverInput::Executed(ExecutionOutcome::RequestErrors { errors, extensions }) => {
            let status_code = match media_type {
                MediaType::GraphQLJson => StatusCode::BAD_REQUEST,
                MediaType::Json => StatusCode::OK,
            };
            (
                status_code,
                GraphQLResponse {
                    data: None,
                    errors: Some(errors),
                    extensions,
                },
            )
        }
        ResolverInput::Failed(error) => {
            error!(%error, "GraphQL execution failed");
            internal_error()
        }
    };

    ResponseDecision {
        status_code,
        body,
        media_type,
        headers,
    }
}

fn internal_error() -> (StatusCode, GraphQLResponse) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        GraphQLResponse::from_message(INTERNAL_SERVER_ERROR_MESSAGE),
    )
}

impl ResponseDecision {
    pub fn into_response_payload(self) -> ResponsePayload {
        let (status_code, body) = match serde_json::to_vec(&self.body) {
            Ok(body) => (self.status_code, body),
            Err(e) => {
                error!("Failed to serialize the response body: {e}");
                let (status_code, body) = internal_error();
                // A body made of a single message always serializes
                (status_code, serde_json::to_vec(&body).unwrap_or_default())
            }
        };

        let mut headers = self.headers;
        headers.set(
            http::header::CONTENT_TYPE.to_string(),
            self.media_type.as_str().to_string(),
        );

        ResponsePayload {
            body: ResponseBody::Bytes(body),
            headers,
            status_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use common::graphql_response::GraphQLError;
    use serde_json::{Value, json};

    use super::*;
    use crate::execution::ExecutionResult;

    const MEDIA_TYPES: [MediaType; 2] = [MediaType::GraphQLJson, MediaType::Json];

    fn body_json(decision: &ResponseDecision) -> Value {
        serde_json::to_value(&decision.body).unwrap()
    }

    #[test]
    fn http_errors_keep_their_status() {
        for media_type in MEDIA_TYPES {
            for error in [
                HttpError::MissingParameter("query"),
                HttpError::MutationViaGet,
                HttpError::NotAcceptable,
                HttpError::MissingContentType,
            ] {
                let message = error.to_string();
                let status_code = error.status_code();
                let decision = resolve(ResolverInput::Rejected(error), media_type);

                assert_eq!(decision.status_code, status_code);
                assert_eq!(decision.media_type, media_type);
                assert_eq!(
                    body_json(&decision),
                    json!({"errors": [{"message": message}]})
                );
            }
        }
    }

    #[test]
    fn allow_header_on_method_errors() {
        let decision = resolve(
            ResolverInput::Rejected(HttpError::MutationViaGet),
            MediaType::Json,
        );
        assert_eq!(decision.headers.get("allow").as_deref(), Some("GET, POST"));

        let decision = resolve(
            ResolverInput::Rejected(HttpError::MissingContentType),
            MediaType::Json,
        );
        assert_eq!(decision.headers.get("allow"), None);
    }

    #[test]
    fn successful_execution() {
        for media_type in MEDIA_TYPES {
            let decision = resolve(
                ResolverInput::Executed(ExecutionOutcome::Executed(ExecutionResult::from_data(
                    json!({"hello": "world"}),
                ))),
                media_type,
            );

            assert_eq!(decision.status_code, StatusCode::OK);
            assert_eq!(body_json(&decision), json!({"data": {"hello": "world"}}));
        }
    }

    #[test]
    fn field_errors() {
        for media_type in MEDIA_TYPES {
            let decision = resolve(
                ResolverInput::Executed(ExecutionOutcome::Executed(ExecutionResult {
                    data: Some(json!({"a": 1, "b": null})),
                    errors: Some(vec![
                        GraphQLError::new("b failed").with_path(vec!["b".into()]),
                    ]),
                    extensions: Some(json!({"cost": 2})),
                })),
                media_type,
            );

            assert_eq!(decision.status_code, StatusCode::OK);
            assert_eq!(
                body_json(&decision),
                json!({
                    "data": {"a": 1, "b": null},
                    "errors": [{"message": "b failed", "path": ["b"]}],
                    "extensions": {"cost": 2}
                })
            );
        }
    }

    #[test]
    fn null_data_is_kept() {
        let decision = resolve(
            ResolverInput::Executed(ExecutionOutcome::Executed(ExecutionResult {
                data: Some(Value::Null),
                errors: Some(vec![GraphQLError::new("non-null field failed")]),
                extensions: None,
            })),
            MediaType::GraphQLJson,
        );

        assert_eq!(decision.status_code, StatusCode::OK);
        assert_eq!(
            body_json(&decision),
            json!({"data": null, "errors": [{"message": "non-null field failed"}]})
        );
    }

    #[test]
    fn request_errors_depend_on_media_type() {
        let outcome = || {
            ExecutionOutcome::request_errors(vec![
                GraphQLError::new("Cannot query field \"nope\" on type \"Query\".")
                    .with_location(1, 3),
            ])
        };
        let expected_body = json!({
            "errors": [{
                "message": "Cannot query field \"nope\" on type \"Query\".",
                "locations": [{"line": 1, "column": 3}]
            }]
        });

        let decision = resolve(ResolverInput::Executed(outcome()), MediaType::GraphQLJson);
        assert_eq!(decision.status_code, StatusCode::BAD_REQUEST);
        assert_eq!(body_json(&decision), expected_body);

        let decision = resolve(ResolverInput::Executed(outcome()), MediaType::Json);
        assert_eq!(decision.status_code, StatusCode::OK);
        assert_eq!(body_json(&decision), expected_body);
    }

    #[test]
    fn executor_faults_are_hidden() {
        for media_type in MEDIA_TYPES {
            let decision = resolve(
                ResolverInput::Failed(ExecutionError::Delegate(
                    "connection to secret-db:5432 refused".into(),
                )),
                media_type,
            );

            assert_eq!(decision.status_code, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(
                body_json(&decision),
                json!({"errors": [{"message": "Internal server error"}]})
            );
        }
    }

    #[test]
    fn response_payload() {
        let mut decision = resolve(
            ResolverInput::Rejected(HttpError::MutationViaGet),
            MediaType::GraphQLJson,
        );
        decision
            .headers
            .insert("content-type".to_string(), "text/plain".to_string());

        let payload = decision.into_response_payload();

        assert_eq!(payload.status_code, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            payload.headers.get_all("content-type"),
            vec!["application/graphql+json"]
        );
        assert_eq!(payload.headers.get("allow").as_deref(), Some("GET, POST"));

        let ResponseBody::Bytes(bytes) = payload.body else {
            panic!("Expected a body");
        };
        assert_eq!(
            serde_json::from_slice::<Value>(&bytes).unwrap(),
            json!({"errors": [{"message": "Can only perform a mutation operation from a POST request."}]})
        );
    }
}
