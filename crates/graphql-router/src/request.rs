// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use bytes::Bytes;
use common::http::RequestHead;
use http::Method;

/// The parts of an HTTP request the GraphQL-over-HTTP pipeline looks at.
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    pub method: Method,
    pub content_type: Option<String>,
    pub accept: Option<String>,
    pub query_string: Option<String>,
    pub body: Bytes,
}

impl IncomingRequest {
    pub fn from_head(head: &(dyn RequestHead + Send + Sync), body: Bytes) -> Self {
        let accept = head.get_headers(http::header::ACCEPT.as_str());

        Self {
            method: head.get_method(),
            content_type: head.get_header(http::header::CONTENT_TYPE.as_str()),
            // Multiple Accept headers are equivalent to a single comma-separated one
            accept: (!accept.is_empty()).then(|| accept.join(",")),
            query_string: head.get_query_string(),
            body,
        }
    }
}

/// Request information made available to the executor and to the response overwrite hook.
pub struct RequestContext<'a> {
    head: &'a (dyn RequestHead + Send + Sync),
}

impl<'a> RequestContext<'a> {
    pub fn new(head: &'a (dyn RequestHead + Send + Sync)) -> Self {
        Self { head }
    }

    pub fn method(&self) -> Method {
        self.head.get_method()
    }

    pub fn path(&self) -> String {
        self.head.get_path()
    }

    pub fn header(&self, key: &str) -> Option<String> {
        self.head.get_header(key)
    }

    pub fn header_values(&self, key: &str) -> Vec<String> {
        self.head.get_headers(key)
    }
}
