// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Serves GraphQL over HTTP without depending on any specific web framework.
//!
//! A request flows through [`validator::validate`] (method, `Accept`,
//! `Content-Type`, parameters), then a [`GraphQLExecutor`], and finally
//! [`response_resolver::resolve`], which picks the status code.

pub mod execution;
mod graphql_router;
pub mod http_error;
pub mod negotiation;
pub mod parameters;
pub mod request;
pub mod response_resolver;
pub mod validator;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use execution::{
    ExecutionArgs, ExecutionError, ExecutionOutcome, ExecutionResult, GraphQLExecutor,
};
pub use graphql_router::{GraphQLRouter, GraphQLRouterConfig, ResponseOverwrite};
pub use http_error::HttpError;
pub use parameters::GraphQLParameters;
pub use request::{IncomingRequest, RequestContext};
pub use response_resolver::ResponseDecision;
