// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use bytes::Bytes;
use http::StatusCode;

pub trait RequestPayload {
    fn get_head(&self) -> &(dyn RequestHead + Send + Sync);

    /// Take the raw body out of the request. Subsequent calls return an empty body.
    fn take_body(&mut self) -> Bytes;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    inner: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self { inner: vec![] }
    }

    pub fn from_vec(vec: Vec<(String, String)>) -> Self {
        Self {
            inner: vec
                .into_iter()
                .map(|(key, value)| (key.to_lowercase(), value))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let key = key.to_lowercase();
        self.inner
            .iter()
            .find(|(k, _)| k == &key)
            .map(|(_, v)| v.clone())
    }

    pub fn get_all(&self, key: &str) -> Vec<String> {
        let key = key.to_lowercase();
        self.inner
            .iter()
            .filter(|(k, _)| k == &key)
            .map(|(_, v)| v.clone())
            .collect()
    }

    pub fn insert(&mut self, key: String, value: String) {
        self.inner.push((key.to_lowercase(), value));
    }

    /// Replace every value of `key` with the given value
    pub fn set(&mut self, key: String, value: String) {
        self.remove(&key);
        self.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) {
        let key = key.to_lowercase();
        self.inner.retain(|(k, _)| k != &key);
    }
}

impl IntoIterator for Headers {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

#[derive(Debug)]
pub struct ResponsePayload {
    pub body: ResponseBody,
    pub headers: Headers,
    pub status_code: StatusCode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    Bytes(Vec<u8>),
    None,
}

impl ResponsePayload {
    pub fn into_http_response(self) -> Result<http::Response<Bytes>, http::Error> {
        let mut builder = http::Response::builder().status(self.status_code);
        for (key, value) in self.headers {
            builder = builder.header(key, value);
        }

        let body = match self.body {
            ResponseBody::Bytes(bytes) => Bytes::from(bytes),
            ResponseBody::None => Bytes::new(),
        };

        builder.body(body)
    }
}

/// Represents a HTTP request from which information can be extracted
pub trait RequestHead {
    // return all header values that have the following key
    fn get_headers(&self, key: &str) -> Vec<String>;

    // return the first header
    fn get_header(&self, key: &str) -> Option<String> {
        self.get_headers(&key.to_lowercase()).first().cloned()
    }

    fn get_path(&self) -> String;

    /// The raw (still percent-encoded) query component of the URL, without the leading `?`
    fn get_query_string(&self) -> Option<String>;

    fn get_method(&self) -> http::Method;
}

/// A request payload backed by an [`http::Request`].
///
/// Useful for hosts that already speak the `http` crate types and for tests.
pub struct HttpRequestPayload {
    head: HttpRequestHead,
    body: Bytes,
}

struct HttpRequestHead {
    method: http::Method,
    path: String,
    query: Option<String>,
    headers: http::HeaderMap,
}

impl HttpRequestPayload {
    pub fn new(request: http::Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();

        Self {
            head: HttpRequestHead {
                method: parts.method,
                path: parts.uri.path().to_string(),
                query: parts.uri.query().map(|query| query.to_string()),
                headers: parts.headers,
            },
            body,
        }
    }
}

impl RequestPayload for HttpRequestPayload {
    fn get_head(&self) -> &(dyn RequestHead + Send + Sync) {
        &self.head
    }

    fn take_body(&mut self) -> Bytes {
        std::mem::take(&mut self.body)
    }
}

impl RequestHead for HttpRequestHead {
    fn get_headers(&self, key: &str) -> Vec<String> {
        self.headers
            .get_all(key.to_lowercase())
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(|value| value.to_string())
            .collect()
    }

    fn get_path(&self) -> String {
        self.path.clone()
    }

    fn get_query_string(&self) -> Option<String> {
        self.query.clone()
    }

    fn get_method(&self) -> http::Method {
        self.method.clone()
    }
}
