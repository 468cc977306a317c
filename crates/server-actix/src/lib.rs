// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod request;
mod server;

use actix_web::{
    HttpRequest, HttpResponse,
    web::{self, ServiceConfig},
};
use common::http::{ResponseBody, ResponsePayload};
use common::router::{CompositeRouter, Router};
use http::StatusCode;

use request::{ActixRequestHead, ActixRequestPayload};

pub use server::{ServerError, run};

macro_rules! error_msg {
    ($msg:literal) => {
        concat!("{\"errors\": [{\"message\":\"", $msg, "\"}]}").as_bytes()
    };
}

pub fn configure_router(router: web::Data<CompositeRouter>) -> impl FnOnce(&mut ServiceConfig) {
    move |app| {
        app.app_data(router).default_service(web::to(resolve));
    }
}

async fn resolve(
    http_request: HttpRequest,
    body: web::Bytes,
    router: web::Data<CompositeRouter>,
) -> HttpResponse {
    let head = match ActixRequestHead::from_request(&http_request) {
        Ok(head) => head,
        Err(err) => {
            tracing::warn!("Unsupported method {}: {}", http_request.method(), err);
            return HttpResponse::build(actix_web::http::StatusCode::BAD_REQUEST)
                .content_type("application/json")
                .body(error_msg!("Unsupported HTTP method"));
        }
    };

    let mut request = ActixRequestPayload::new(head, body);

    match router.route(&mut request).await {
        Some(response) => to_actix_response(response),
        None => HttpResponse::build(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR)
            .content_type("application/json")
            .body(error_msg!("Error resolving request")),
    }
}

fn to_actix_response(response: ResponsePayload) -> HttpResponse {
    let ResponsePayload {
        body,
        headers,
        status_code,
    } = response;

    let actix_status_code = match to_actix_status_code(status_code) {
        Ok(status_code) => status_code,
        Err(err) => {
            tracing::error!("Invalid status code: {}", err);
            return HttpResponse::build(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR)
                .content_type("application/json")
                .body(error_msg!("Invalid status code"));
        }
    };

    let mut builder = HttpResponse::build(actix_status_code);

    for header in headers.into_iter() {
        builder.append_header(header);
    }

    match body {
        ResponseBody::Bytes(bytes) => builder.body(bytes),
        ResponseBody::None => builder.finish(),
    }
}

fn to_actix_status_code(status_code: StatusCode) -> Result<actix_web::http::StatusCode, String> {
    actix_web::http::StatusCode::from_u16(status_code.as_u16())
        .map_err(|_| format!("{status_code} is not a valid status code"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test};
    use common::env_const::GQL_ENABLE_PLAYGROUND;
    use gql_env::MapEnvironment;
    use graphql_router::{GraphQLRouter, GraphQLRouterConfig, test_support::FixtureExecutor};
    use playground_router::{PlaygroundRouter, PlaygroundRouterConfig};
    use serde_json::{Value, json};

    use super::*;

    fn router() -> web::Data<CompositeRouter> {
        let env = MapEnvironment::from([(GQL_ENABLE_PLAYGROUND, "true")]);

        web::Data::new(CompositeRouter::new(vec![
            Box::new(GraphQLRouter::new(
                Arc::new(FixtureExecutor),
                GraphQLRouterConfig::new(&env),
            )),
            Box::new(PlaygroundRouter::new(
                PlaygroundRouterConfig::new(&env).unwrap(),
            )),
        ]))
    }

    #[actix_web::test]
    async fn graphql_get() {
        let app = test::init_service(App::new().configure(configure_router(router()))).await;

        let req = test::TestRequest::get()
            .uri("/graphql?query=%7B%20hello%20%7D")
            .insert_header(("Accept", "application/graphql+json"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "application/graphql+json"
        );

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"data": {"hello": "world"}}));
    }

    #[actix_web::test]
    async fn graphql_post() {
        let app = test::init_service(App::new().configure(configure_router(router()))).await;

        let req = test::TestRequest::post()
            .uri("/graphql")
            .insert_header(("Content-Type", "application/json"))
            .set_payload(r#"{"query": "mutation { createGreeting }"}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"data": {"createGreeting": "created"}}));
    }

    #[actix_web::test]
    async fn mutation_via_get() {
        let app = test::init_service(App::new().configure(configure_router(router()))).await;

        let req = test::TestRequest::get()
            .uri("/graphql?query=mutation%20%7B%20createGreeting%20%7D")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers().get("allow").unwrap(), "GET, POST");
    }

    #[actix_web::test]
    async fn playground_and_unknown_paths() {
        let app = test::init_service(App::new().configure(configure_router(router()))).await;

        let req = test::TestRequest::get().uri("/playground").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

        let req = test::TestRequest::get().uri("/elsewhere").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }
}
