// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::Path;

use include_dir::{Dir, include_dir};
use serde::Serialize;
use tracing::error;

static PLAYGROUND_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets");

pub const INDEX_FILE: &str = "index.html";

/// Settings handed to the page script through `window.playgroundConfig`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaygroundConfig {
    pub playground_http_path: String,
    pub graphql_http_path: String,
}

pub fn get_asset_bytes<P: AsRef<Path>>(file_name: P, config: &PlaygroundConfig) -> Option<Vec<u8>> {
    let file = PLAYGROUND_DIR.get_file(file_name.as_ref())?;

    if file_name.as_ref() != Path::new(INDEX_FILE) {
        return Some(file.contents().to_owned());
    }

    let Some(index) = file.contents_utf8() else {
        error!("The playground index page is not valid UTF-8");
        return None;
    };

    let config_json = match serde_json::to_string(config) {
        Ok(config_json) => config_json,
        Err(e) => {
            error!("Failed to serialize the playground config: {e}");
            return None;
        }
    };

    let index = index
        .replace(
            "window.playgroundConfig = {}",
            &format!("window.playgroundConfig = {config_json}"),
        )
        .replace(
            "%%PLAYGROUND_HTTP_PATH%%",
            config.playground_http_path.trim_end_matches('/'),
        );

    Some(index.into_bytes())
}
