// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Client side of GraphQL over HTTP: build requests and decode responses.

#[cfg(feature = "transport")]
mod client;
mod request_builder;
mod response_decoder;

#[cfg(feature = "transport")]
pub use client::{ClientError, GraphQLClient};
pub use request_builder::{GraphQLRequest, RequestBuildError};
pub use response_decoder::{ResponseDecodeError, decode};
