// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use http::{Method, StatusCode};
use thiserror::Error;

/// A client-caused failure detected before execution.
///
/// Each variant maps to exactly one of 400, 405, 406, or 415. The message is
/// what the client sees in `errors[0].message`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HttpError {
    #[error("Unsupported HTTP method {0}. Use GET or POST.")]
    UnsupportedMethod(Method),

    #[error("Can only perform a mutation operation from a POST request.")]
    MutationViaGet,

    #[error(
        "The Accept header does not allow a supported media type. Supported types are application/graphql+json and application/json."
    )]
    NotAcceptable,

    #[error("Missing Content-Type header. Use application/json or application/graphql+json.")]
    MissingContentType,

    #[error(
        "Unsupported Content-Type header \"{0}\". Use application/json or application/graphql+json."
    )]
    UnsupportedContentType(String),

    #[error("The parameter is required. \"{0}\"")]
    MissingParameter(&'static str),

    #[error("The parameter must be a string. \"{0}\"")]
    NonStringParameter(&'static str),

    #[error("Malformed variables. \"variables\" must be a JSON object.")]
    MalformedVariables,

    #[error("Malformed JSON body.")]
    MalformedJsonBody,

    #[error("The request body must be a JSON object.")]
    NonObjectBody,
}

impl HttpError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            HttpError::UnsupportedMethod(_)
            | HttpError::MissingParameter(_)
            | HttpError::NonStringParameter(_)
            | HttpError::MalformedVariables
            | HttpError::MalformedJsonBody
            | HttpError::NonObjectBody => StatusCode::BAD_REQUEST,
            HttpError::MutationViaGet => StatusCode::METHOD_NOT_ALLOWED,
            HttpError::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
            HttpError::MissingContentType | HttpError::UnsupportedContentType(_) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
        }
    }

    /// Whether the response should advertise the methods this endpoint accepts
    pub(crate) fn advertises_allowed_methods(&self) -> bool {
        matches!(
            self,
            HttpError::UnsupportedMethod(_) | HttpError::MutationViaGet
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        assert_eq!(
            HttpError::MissingParameter("query").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            HttpError::UnsupportedMethod(Method::PUT).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            HttpError::MutationViaGet.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            HttpError::NotAcceptable.status_code(),
            StatusCode::NOT_ACCEPTABLE
        );
        assert_eq!(
            HttpError::MissingContentType.status_code(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            HttpError::UnsupportedContentType("text/plain".into()).status_code(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
    }

    #[test]
    fn messages() {
        assert_eq!(
            HttpError::MissingParameter("query").to_string(),
            "The parameter is required. \"query\""
        );
        assert!(HttpError::MissingContentType
            .to_string()
            .contains("Content-Type"));
        assert_ne!(
            HttpError::MissingContentType.to_string(),
            HttpError::UnsupportedContentType(String::new()).to_string()
        );
    }
}
