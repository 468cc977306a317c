// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use actix_web::{HttpRequest, http::header::HeaderMap};
use bytes::Bytes;
use common::http::{RequestHead, RequestPayload};

pub struct ActixRequestHead {
    // we cannot refer to HttpRequest directly, as it holds an Rc (and therefore does
    // not impl Send or Sync)
    headers: HeaderMap,
    method: http::Method,
    path: String,
    query: Option<String>,
}

impl ActixRequestHead {
    pub fn from_request(req: &HttpRequest) -> Result<ActixRequestHead, http::method::InvalidMethod> {
        Ok(ActixRequestHead {
            headers: req.headers().clone(),
            method: to_http_method(req.method())?,
            path: req.path().to_string(),
            query: req.uri().query().map(|query| query.to_string()),
        })
    }
}

impl RequestHead for ActixRequestHead {
    fn get_headers(&self, key: &str) -> Vec<String> {
        self.headers
            .get_all(key.to_lowercase())
            .filter_map(|h| h.to_str().ok())
            .map(|h| h.to_string())
            .collect()
    }

    fn get_method(&self) -> http::Method {
        self.method.clone()
    }

    fn get_path(&self) -> String {
        self.path.clone()
    }

    fn get_query_string(&self) -> Option<String> {
        self.query.clone()
    }
}

pub struct ActixRequestPayload {
    head: ActixRequestHead,
    body: Bytes,
}

impl ActixRequestPayload {
    pub fn new(head: ActixRequestHead, body: Bytes) -> Self {
        Self { head, body }
    }
}

impl RequestPayload for ActixRequestPayload {
    fn get_head(&self) -> &(dyn RequestHead + Send + Sync) {
        &self.head
    }

    fn take_body(&mut self) -> Bytes {
        std::mem::take(&mut self.body)
    }
}

// Actix uses http-0.2. However, the rest of the system uses
// http-1.x, so we need to convert between the two.
fn to_http_method(
    method: &actix_web::http::Method,
) -> Result<http::Method, http::method::InvalidMethod> {
    http::Method::from_bytes(method.as_str().as_bytes())
}
