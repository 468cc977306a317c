// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use common::graphql_response::{GraphQLError, GraphQLResponse};
use common::http::HttpRequestPayload;
use common::router::Router;
use gql_env::MapEnvironment;
use graphql_client::{GraphQLRequest, decode};
use graphql_router::{GraphQLRouter, GraphQLRouterConfig, test_support::FixtureExecutor};
use http::{Method, StatusCode};
use serde_json::json;

const URL: &str = "http://localhost:9876/graphql";

async fn round_trip(request: GraphQLRequest) -> (StatusCode, GraphQLResponse) {
    let router = GraphQLRouter::new(
        Arc::new(FixtureExecutor),
        GraphQLRouterConfig::new(&MapEnvironment::new()),
    );

    let mut payload = HttpRequestPayload::new(request.build().unwrap());
    let response = router
        .route(&mut payload)
        .await
        .unwrap()
        .into_http_response()
        .unwrap();

    (response.status(), decode(&response).unwrap())
}

#[tokio::test]
async fn query_over_get_and_post() {
    for method in [Method::GET, Method::POST] {
        let (status, response) = round_trip(
            GraphQLRequest::new(URL, "query Greet($name: String) { hello echo }")
                .with_operation_name("Greet")
                .with_variables(json!({"name": "Ada"}).as_object().unwrap().clone())
                .with_method(method.clone()),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "{method}");
        assert_eq!(
            response,
            GraphQLResponse {
                data: Some(json!({"hello": "world", "echo": {"name": "Ada"}})),
                errors: None,
                extensions: None,
            }
        );
    }
}

#[tokio::test]
async fn field_errors_survive() {
    let (status, response) = round_trip(GraphQLRequest::new(URL, "{ hello failing }")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        response.data,
        Some(json!({"hello": "world", "failing": null}))
    );
    assert_eq!(
        response.errors,
        Some(vec![
            GraphQLError::new("Field failed").with_path(vec!["failing".into()])
        ])
    );
}

#[tokio::test]
async fn request_errors_use_graphql_json() {
    let (status, response) = round_trip(GraphQLRequest::new(URL, "{ nope }")).await;

    // The client prefers application/graphql+json
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response.data, None);
    assert_eq!(
        response.errors,
        Some(vec![
            GraphQLError::new("Cannot query field \"nope\" on type \"Query\".").with_location(1, 3)
        ])
    );
}

#[tokio::test]
async fn mutation_over_get_is_refused() {
    let (status, response) = round_trip(
        GraphQLRequest::new(URL, "mutation { createGreeting }").with_method(Method::GET),
    )
    .await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        response,
        GraphQLResponse::from_message(
            "Can only perform a mutation operation from a POST request."
        )
    );
}
