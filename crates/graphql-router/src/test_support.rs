// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! A tiny executor over a fixed schema, for exercising the HTTP layer.
//!
//! Query fields:
//! - `hello`: `"world"`
//! - `echo`: the request variables
//! - `rootGreeting`: the `greeting` key of the root value
//! - `failing`: null, with a field error
//! - `misconfigured`: fails the whole execution
//! - `panicking`: panics
//!
//! Mutation fields:
//! - `createGreeting`: `"created"`

use async_graphql_parser::{
    Positioned,
    types::{DocumentOperations, OperationDefinition, OperationType, Selection},
};
use async_trait::async_trait;
use common::graphql_response::GraphQLError;
use serde_json::{Map, Value};

use crate::execution::{
    ExecutionArgs, ExecutionError, ExecutionOutcome, ExecutionResult, GraphQLExecutor,
};

const QUERY_FIELDS: &[&str] = &[
    "hello",
    "echo",
    "rootGreeting",
    "failing",
    "misconfigured",
    "panicking",
];
const MUTATION_FIELDS: &[&str] = &["createGreeting"];

pub struct FixtureExecutor;

#[async_trait]
impl GraphQLExecutor for FixtureExecutor {
    async fn execute(&self, args: ExecutionArgs<'_>) -> Result<ExecutionOutcome, ExecutionError> {
        let parameters = args.parameters;

        let document = match async_graphql_parser::parse_query(&parameters.query) {
            Ok(document) => document,
            Err(error) => {
                let graphql_error = error.positions().fold(
                    GraphQLError::new(error.to_string()),
                    |graphql_error, pos| graphql_error.with_location(pos.line, pos.column),
                );
                return Ok(ExecutionOutcome::request_errors(vec![graphql_error]));
            }
        };

        let operation = match select_operation(
            &document.operations,
            parameters.operation_name.as_deref(),
        ) {
            Ok(operation) => operation,
            Err(message) => {
                return Ok(ExecutionOutcome::request_errors(vec![GraphQLError::new(
                    message,
                )]));
            }
        };

        let (type_name, known_fields) = match operation.node.ty {
            OperationType::Query => ("Query", QUERY_FIELDS),
            OperationType::Mutation => ("Mutation", MUTATION_FIELDS),
            OperationType::Subscription => {
                return Ok(ExecutionOutcome::request_errors(vec![GraphQLError::new(
                    "Subscriptions are not supported",
                )]));
            }
        };

        let fields: Vec<_> = operation
            .node
            .selection_set
            .node
            .items
            .iter()
            .filter_map(|selection| match &selection.node {
                Selection::Field(field) => Some(field),
                _ => None,
            })
            .collect();

        let unknown_fields: Vec<_> = fields
            .iter()
            .filter(|field| !known_fields.contains(&field.node.name.node.as_str()))
            .map(|field| {
                GraphQLError::new(format!(
                    "Cannot query field \"{}\" on type \"{type_name}\".",
                    field.node.name.node
                ))
                .with_location(field.pos.line, field.pos.column)
            })
            .collect();
        if !unknown_fields.is_empty() {
            return Ok(ExecutionOutcome::request_errors(unknown_fields));
        }

        let mut data = Map::new();
        let mut errors = vec![];

        for field in fields {
            let response_key = field.node.response_key().node.to_string();

            let value = match field.node.name.node.as_str() {
                "hello" => Value::from("world"),
                "echo" => Value::Object(parameters.variables.clone().unwrap_or_default()),
                "rootGreeting" => args
                    .root_value
                    .and_then(|root| root.get("greeting"))
                    .cloned()
                    .unwrap_or(Value::Null),
                "failing" => {
                    errors.push(
                        GraphQLError::new("Field failed")
                            .with_path(vec![response_key.as_str().into()]),
                    );
                    Value::Null
                }
                "misconfigured" => {
                    return Err(ExecutionError::Delegate(
                        "No resolver registered for field misconfigured".into(),
                    ));
                }
                "panicking" => panic!("Resolver panicked"),
                "createGreeting" => Value::from("created"),
                _ => Value::Null,
            };

            data.insert(response_key, value);
        }

        Ok(ExecutionOutcome::Executed(ExecutionResult {
            data: Some(Value::Object(data)),
            errors: Some(errors),
            extensions: None,
        }))
    }
}

fn select_operation<'a>(
    operations: &'a DocumentOperations,
    operation_name: Option<&str>,
) -> Result<&'a Positioned<OperationDefinition>, String> {
    match (operations, operation_name) {
        (DocumentOperations::Single(operation), _) => Ok(operation),
        (DocumentOperations::Multiple(operations), Some(name)) => operations
            .iter()
            .find(|(operation_name, _)| operation_name.as_str() == name)
            .map(|(_, operation)| operation)
            .ok_or_else(|| format!("Unknown operation named \"{name}\".")),
        (DocumentOperations::Multiple(operations), None) if operations.len() == 1 => operations
            .values()
            .next()
            .ok_or_else(|| "No operation provided".to_string()),
        (DocumentOperations::Multiple(_), None) => {
            Err("Must provide operation name if query contains multiple operations.".to_string())
        }
    }
}
