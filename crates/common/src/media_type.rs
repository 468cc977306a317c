// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::Display;

pub const GRAPHQL_JSON: &str = "application/graphql+json";
pub const JSON: &str = "application/json";

/// The media types a GraphQL-over-HTTP endpoint accepts in request bodies and
/// produces in responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    GraphQLJson,
    Json,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::GraphQLJson => GRAPHQL_JSON,
            MediaType::Json => JSON,
        }
    }

    /// Recognize a media type from a header value such as `application/json; charset=utf-8`.
    ///
    /// Parameters are ignored and the comparison is case-insensitive.
    pub fn from_header_value(value: &str) -> Option<Self> {
        match essence(value).as_str() {
            GRAPHQL_JSON => Some(MediaType::GraphQLJson),
            JSON => Some(MediaType::Json),
            _ => None,
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `type/subtype` part of a media type, lowercased and without parameters
pub fn essence(value: &str) -> String {
    value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
