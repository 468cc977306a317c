// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Content negotiation over the `Accept` header.
//!
//! Each candidate media type gets the quality of the most specific range that
//! matches it (`application/json` beats `application/*` beats `*/*`). Among
//! acceptable candidates, the higher quality wins, then the range declared
//! first. When a single wildcard range is what makes both acceptable, JSON
//! is preferred.

use common::media_type::{self, GRAPHQL_JSON, JSON, MediaType};

use crate::http_error::HttpError;

/// Qualities are kept in thousandths, the finest precision an `Accept` header may express
const MAX_QUALITY: u16 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Specificity {
    AnyType,
    AnySubtype,
    Exact,
}

#[derive(Debug, Clone, Copy)]
struct MediaRange {
    matches: Option<MediaType>,
    specificity: Specificity,
    quality: u16,
    order: usize,
}

impl MediaRange {
    fn matches(&self, media_type: MediaType) -> bool {
        match self.specificity {
            Specificity::Exact => self.matches == Some(media_type),
            Specificity::AnySubtype | Specificity::AnyType => true,
        }
    }
}

/// Pick the response media type for the given `Accept` header.
///
/// A missing (or blank) header accepts anything, which yields JSON.
pub fn negotiate(accept: Option<&str>) -> Result<MediaType, HttpError> {
    let accept = accept
        .map(str::trim)
        .filter(|accept| !accept.is_empty())
        .unwrap_or("*/*");

    let ranges = parse_accept(accept);

    // JSON comes first so that it wins a tie on the same range
    [MediaType::Json, MediaType::GraphQLJson]
        .into_iter()
        .filter_map(|media_type| {
            governing_range(&ranges, media_type)
                .filter(|range| range.quality > 0)
                .map(|range| (media_type, range))
        })
        .min_by_key(|(_, range)| (MAX_QUALITY - range.quality, range.order))
        .map(|(media_type, _)| media_type)
        .ok_or(HttpError::NotAcceptable)
}

/// The most specific range matching `media_type` (the first one declared among equals)
fn governing_range(ranges: &[MediaRange], media_type: MediaType) -> Option<MediaRange> {
    ranges
        .iter()
        .filter(|range| range.matches(media_type))
        .min_by_key(|range| (std::cmp::Reverse(range.specificity), range.order))
        .copied()
}

fn parse_accept(accept: &str) -> Vec<MediaRange> {
    accept
        .split(',')
        .enumerate()
        .filter_map(|(order, entry)| parse_media_range(entry, order))
        .collect()
}

fn parse_media_range(entry: &str, order: usize) -> Option<MediaRange> {
    let mut parts = entry.split(';');
    let essence = media_type::essence(parts.next()?);

    let (matches, specificity) = match essence.as_str() {
        "*/*" => (None, Specificity::AnyType),
        "application/*" => (None, Specificity::AnySubtype),
        GRAPHQL_JSON => (Some(MediaType::GraphQLJson), Specificity::Exact),
        JSON => (Some(MediaType::Json), Specificity::Exact),
        _ => return None,
    };

    let mut quality = MAX_QUALITY;
    for parameter in parts {
        if let Some((name, value)) = parameter.split_once('=') {
            if name.trim().eq_ignore_ascii_case("q") {
                // A range with an unreadable weight is ignored altogether
                quality = parse_quality(value.trim())?;
            }
        }
    }

    Some(MediaRange {
        matches,
        specificity,
        quality,
        order,
    })
}

fn parse_quality(value: &str) -> Option<u16> {
    let quality = value.parse::<f32>().ok()?;

    (0.0..=1.0)
        .contains(&quality)
        .then(|| (quality * MAX_QUALITY as f32).round() as u16)
}
