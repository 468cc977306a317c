// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_trait::async_trait;
use common::{
    graphql_response::{GraphQLError, GraphQLResponse},
    media_type::MediaType,
};
use serde_json::Value;
use thiserror::Error;

use crate::{parameters::GraphQLParameters, request::RequestContext};

/// The GraphQL engine that actually runs operations.
///
/// Implementations own the schema (and any custom field or type resolution).
/// They report ordinary failures through [`ExecutionOutcome`] and reserve
/// `Err` for faults such as a misconfigured schema.
#[async_trait]
pub trait GraphQLExecutor: Send + Sync {
    async fn execute(&self, args: ExecutionArgs<'_>) -> Result<ExecutionOutcome, ExecutionError>;
}

pub struct ExecutionArgs<'a> {
    pub parameters: &'a GraphQLParameters,
    pub root_value: Option<&'a Value>,
    pub context: &'a RequestContext<'a>,
    /// The media type the response will be sent as
    pub media_type: MediaType,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionResult {
    /// `Some(Value::Null)` when execution started but produced a null root
    pub data: Option<Value>,
    pub errors: Option<Vec<GraphQLError>>,
    pub extensions: Option<Value>,
}

impl ExecutionResult {
    pub fn from_data(data: Value) -> Self {
        Self {
            data: Some(data),
            errors: None,
            extensions: None,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|errors| !errors.is_empty())
    }
}

impl From<ExecutionResult> for GraphQLResponse {
    fn from(result: ExecutionResult) -> Self {
        GraphQLResponse {
            data: result.data,
            errors: result.errors.filter(|errors| !errors.is_empty()),
            extensions: result.extensions,
        }
    }
}

/// What the executor did with a request.
///
/// The split tells apart errors that prevented execution from starting from
/// errors raised by individual fields, since they map to different status codes.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// Execution reached the root fields. Any errors are field errors.
    Executed(ExecutionResult),
    /// The document was rejected before execution (syntax or validation errors).
    RequestErrors {
        errors: Vec<GraphQLError>,
        extensions: Option<Value>,
    },
}

impl ExecutionOutcome {
    pub fn request_errors(errors: Vec<GraphQLError>) -> Self {
        ExecutionOutcome::RequestErrors {
            errors,
            extensions: None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("{0}")]
    Delegate(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("Executor panicked: {0}")]
    Panic(String),
}
