// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use gql_env::{EnvError, Environment};

pub const GQL_GRAPHQL_HTTP_PATH: &str = "GQL_GRAPHQL_HTTP_PATH";
pub const GQL_PLAYGROUND_HTTP_PATH: &str = "GQL_PLAYGROUND_HTTP_PATH";
pub const GQL_ENABLE_PLAYGROUND: &str = "GQL_ENABLE_PLAYGROUND";
pub const GQL_SERVER_PORT: &str = "GQL_SERVER_PORT";

const DEFAULT_SERVER_PORT: u16 = 9876;

pub fn get_graphql_http_path(env: &dyn Environment) -> String {
    env.get_or_else(GQL_GRAPHQL_HTTP_PATH, "/graphql")
}

pub fn get_playground_http_path(env: &dyn Environment) -> String {
    env.get_or_else(GQL_PLAYGROUND_HTTP_PATH, "/playground")
}

pub fn is_playground_enabled(env: &dyn Environment) -> Result<bool, EnvError> {
    env.enabled(GQL_ENABLE_PLAYGROUND, false)
}

pub fn get_server_port(env: &dyn Environment) -> Result<u16, EnvError> {
    Ok(env.get_u16(GQL_SERVER_PORT)?.unwrap_or(DEFAULT_SERVER_PORT))
}
