// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::http::{Headers, RequestPayload, ResponseBody, ResponsePayload};
use async_trait::async_trait;
use http::StatusCode;

/// A component that may answer a request.
///
/// Returns `None` when the request is not meant for this router (for example, a
/// different path), letting a [`CompositeRouter`] try the next one.
#[async_trait]
pub trait Router: Sync {
    async fn route(&self, request: &mut (dyn RequestPayload + Send)) -> Option<ResponsePayload>;
}

pub struct CompositeRouter {
    routers: Vec<Box<dyn Router + Send>>,
}

impl CompositeRouter {
    pub fn new(routers: Vec<Box<dyn Router + Send>>) -> Self {
        Self { routers }
    }
}

#[async_trait]
impl Router for CompositeRouter {
    async fn route(&self, request: &mut (dyn RequestPayload + Send)) -> Option<ResponsePayload> {
        for router in self.routers.iter() {
            if let Some(response) = router.route(request).await {
                return Some(response);
            }
        }

        Some(ResponsePayload {
            body: ResponseBody::None,
            headers: Headers::new(),
            status_code: StatusCode::NOT_FOUND,
        })
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::http::HttpRequestPayload;

    struct PathRouter {
        path: &'static str,
        status_code: StatusCode,
    }

    #[async_trait]
    impl Router for PathRouter {
        async fn route(
            &self,
            request: &mut (dyn RequestPayload + Send),
        ) -> Option<ResponsePayload> {
            (request.get_head().get_path() == self.path).then(|| ResponsePayload {
                body: ResponseBody::None,
                headers: Headers::new(),
                status_code: self.status_code,
            })
        }
    }

    async fn route_path(router: &CompositeRouter, path: &str) -> StatusCode {
        let request = http::Request::builder()
            .uri(path)
            .body(Bytes::new())
            .unwrap();
        let mut request = HttpRequestPayload::new(request);

        router.route(&mut request).await.unwrap().status_code
    }

    #[tokio::test]
    async fn first_matching_router_wins() {
        let router = CompositeRouter::new(vec![
            Box::new(PathRouter {
                path: "/a",
                status_code: StatusCode::OK,
            }),
            Box::new(PathRouter {
                path: "/a",
                status_code: StatusCode::ACCEPTED,
            }),
            Box::new(PathRouter {
                path: "/b",
                status_code: StatusCode::CREATED,
            }),
        ]);

        assert_eq!(route_path(&router, "/a").await, StatusCode::OK);
        assert_eq!(route_path(&router, "/b").await, StatusCode::CREATED);
        assert_eq!(route_path(&router, "/c").await, StatusCode::NOT_FOUND);
    }
}
