// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use common::env_const::get_graphql_http_path;
use common::http::{RequestHead, RequestPayload, ResponsePayload};
use common::media_type::MediaType;
use common::router::Router;
use futures::FutureExt;
use gql_env::Environment;
use serde_json::Value;
use tracing::{error, instrument};

use crate::execution::{ExecutionArgs, ExecutionError, ExecutionOutcome, GraphQLExecutor};
use crate::parameters::GraphQLParameters;
use crate::request::{IncomingRequest, RequestContext};
use crate::response_resolver::{ResolverInput, ResponseDecision, resolve};
use crate::validator::{ValidatedRequest, validate};

/// A hook to adjust the response after it has been decided (for example, to add headers).
///
/// Applied exactly once per request, after the status code and body are known.
pub type ResponseOverwrite =
    Arc<dyn Fn(ResponseDecision, &RequestContext<'_>) -> ResponseDecision + Send + Sync>;

pub struct GraphQLRouterConfig {
    http_path: String,
    root_value: Option<Value>,
    response_overwrite: Option<ResponseOverwrite>,
}

impl GraphQLRouterConfig {
    pub fn new(env: &dyn Environment) -> Self {
        Self {
            http_path: get_graphql_http_path(env),
            root_value: None,
            response_overwrite: None,
        }
    }

    pub fn with_root_value(mut self, root_value: Value) -> Self {
        self.root_value = Some(root_value);
        self
    }

    pub fn with_response_overwrite(mut self, response_overwrite: ResponseOverwrite) -> Self {
        self.response_overwrite = Some(response_overwrite);
        self
    }

    pub fn http_path(&self) -> &str {
        &self.http_path
    }
}

/// Serves GraphQL over HTTP on the configured path, delegating execution to a [`GraphQLExecutor`].
pub struct GraphQLRouter {
    executor: Arc<dyn GraphQLExecutor>,
    config: GraphQLRouterConfig,
}

impl GraphQLRouter {
    pub fn new(executor: Arc<dyn GraphQLExecutor>, config: GraphQLRouterConfig) -> Self {
        Self { executor, config }
    }

    fn suitable(&self, request_head: &(dyn RequestHead + Send + Sync)) -> bool {
        request_head.get_path() == self.config.http_path
    }

    /// Decide the response for a request, running the executor if the request passes validation.
    ///
    /// Never fails: executor errors and panics become a 500 decision.
    pub async fn resolve(
        &self,
        request: &IncomingRequest,
        context: &RequestContext<'_>,
    ) -> ResponseDecision {
        match validate(request) {
            Err(rejection) => resolve(ResolverInput::Rejected(rejection.error), rejection.media_type),
            Ok(ValidatedRequest {
                parameters,
                media_type,
            }) => {
                let input = match self.execute(&parameters, media_type, context).await {
                    Ok(outcome) => ResolverInput::Executed(outcome),
                    Err(e) => ResolverInput::Failed(e),
                };
                resolve(input, media_type)
            }
        }
    }

    #[instrument(
        name = "GraphQLRouter::execute",
        skip_all,
        fields(operation_name = parameters.operation_name.as_deref())
    )]
    async fn execute(
        &self,
        parameters: &GraphQLParameters,
        media_type: MediaType,
        context: &RequestContext<'_>,
    ) -> Result<ExecutionOutcome, ExecutionError> {
        let args = ExecutionArgs {
            parameters,
            root_value: self.config.root_value.as_ref(),
            context,
            media_type,
        };

        AssertUnwindSafe(self.executor.execute(args))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                let message = panic_message(panic.as_ref());
                error!(%message, "Executor panicked");
                Err(ExecutionError::Panic(message))
            })
    }

    /// Apply the response-overwrite hook, if any. A panicking hook yields a 500.
    fn overwrite(
        &self,
        decision: ResponseDecision,
        context: &RequestContext<'_>,
    ) -> ResponseDecision {
        let Some(overwrite) = &self.config.response_overwrite else {
            return decision;
        };

        let media_type = decision.media_type;

        std::panic::catch_unwind(AssertUnwindSafe(|| overwrite(decision, context))).unwrap_or_else(
            |panic| {
                let message = panic_message(panic.as_ref());
                error!(%message, "Response overwrite panicked");
                resolve(ResolverInput::Failed(ExecutionError::Panic(message)), media_type)
            },
        )
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|message| message.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string())
}

#[async_trait]
impl Router for GraphQLRouter {
    #[instrument(
        name = "GraphQLRouter::route",
        skip_all
    )]
    async fn route(&self, request: &mut (dyn RequestPayload + Send)) -> Option<ResponsePayload> {
        if !self.suitable(request.get_head()) {
            return None;
        }

        let body = request.take_body();
        let head = request.get_head();

        let incoming = IncomingRequest::from_head(head, body);
        let context = RequestContext::new(head);

        let decision = self.resolve(&incoming, &context).await;

        let decision = self.overwrite(decision, &context);

        Some(decision.into_response_payload())
    }
}
