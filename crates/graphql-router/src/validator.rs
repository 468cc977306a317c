// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_parser::types::{DocumentOperations, OperationType};
use common::media_type::MediaType;
use http::Method;
use tracing::debug;

use crate::{
    http_error::HttpError,
    negotiation::negotiate,
    parameters::{GraphQLParameters, extract},
    request::IncomingRequest,
};

#[derive(Debug, PartialEq)]
pub struct ValidatedRequest {
    pub parameters: GraphQLParameters,
    pub media_type: MediaType,
}

/// A request refused at the HTTP layer, along with the media type to answer in.
#[derive(Debug, PartialEq)]
pub struct Rejection {
    pub error: HttpError,
    pub media_type: MediaType,
}

/// Run the HTTP-layer checks, in order:
///
/// 1. the method is GET or POST
/// 2. the `Accept` header allows a supported media type (406)
/// 3. a POST body has a supported `Content-Type` (415)
/// 4. the parameters are present and well-formed (400)
/// 5. a GET request does not select a mutation (405)
pub fn validate(request: &IncomingRequest) -> Result<ValidatedRequest, Rejection> {
    let reject = |error: HttpError, media_type: MediaType| {
        debug!(%error, "Rejecting request");
        Rejection { error, media_type }
    };

    if request.method != Method::GET && request.method != Method::POST {
        return Err(reject(
            HttpError::UnsupportedMethod(request.method.clone()),
            negotiate(request.accept.as_deref()).unwrap_or(MediaType::Json),
        ));
    }

    let media_type =
        negotiate(request.accept.as_deref()).map_err(|error| reject(error, MediaType::Json))?;

    let parameters = extract(request).map_err(|error| reject(error, media_type))?;

    if request.method == Method::GET && selects_mutation(&parameters) {
        return Err(reject(HttpError::MutationViaGet, media_type));
    }

    Ok(ValidatedRequest {
        parameters,
        media_type,
    })
}

/// Whether the operation to run is a mutation.
///
/// A document that doesn't parse, or where the operation to run can't be
/// determined, is left to the executor to report.
fn selects_mutation(parameters: &GraphQLParameters) -> bool {
    let Ok(document) = async_graphql_parser::parse_query(&parameters.query) else {
        return false;
    };

    let operation_type = match (&document.operations, parameters.operation_name.as_deref()) {
        (DocumentOperations::Single(operation), _) => Some(operation.node.ty),
        (DocumentOperations::Multiple(operations), Some(name)) => operations
            .iter()
            .find(|(operation_name, _)| operation_name.as_str() == name)
            .map(|(_, operation)| operation.node.ty),
        (DocumentOperations::Multiple(operations), None) if operations.len() == 1 => {
            operations.values().next().map(|operation| operation.node.ty)
        }
        (DocumentOperations::Multiple(_), None) => None,
    };

    operation_type == Some(OperationType::Mutation)
}
