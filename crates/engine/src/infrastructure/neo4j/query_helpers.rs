//! Generic query helpers to reduce Neo4j repository boilerplate.

use neo4rs::{Query, Row};

use crate::infrastructure::neo4j::Neo4jGraph;
use crate::infrastructure::ports::RepoError;

/// Status code Neo4j reports when a uniqueness constraint rejects a write.
const CONSTRAINT_VIOLATION_CODE: &str = "Neo.ClientError.Schema.ConstraintValidationFailed";

/// Map a driver error, keeping constraint rejections distinguishable.
pub fn repo_error(operation: &'static str, e: neo4rs::Error) -> RepoError {
    match &e {
        neo4rs::Error::Neo4j(inner) if is_constraint_violation_code(inner.code()) => {
            RepoError::ConstraintViolation(inner.message().to_string())
        }
        _ => RepoError::database(operation, e),
    }
}

fn is_constraint_violation_code(code: &str) -> bool {
    code == CONSTRAINT_VIOLATION_CODE
}

/// Execute a query and collect results using a converter function.
pub async fn collect_rows<T, F>(
    graph: &Neo4jGraph,
    query: Query,
    operation: &'static str,
    converter: F,
) -> Result<Vec<T>, RepoError>
where
    F: Fn(Row) -> Result<T, RepoError>,
{
    let mut result = graph
        .execute(query)
        .await
        .map_err(|e| repo_error(operation, e))?;

    let mut items = Vec::new();
    while let Some(row) = result
        .next()
        .await
        .map_err(|e| repo_error(operation, e))?
    {
        items.push(converter(row)?);
    }
    Ok(items)
}

/// Execute a query and return first result using a converter function.
pub async fn get_first_row<T, F>(
    graph: &Neo4jGraph,
    query: Query,
    operation: &'static str,
    converter: F,
) -> Result<Option<T>, RepoError>
where
    F: Fn(Row) -> Result<T, RepoError>,
{
    let mut result = graph
        .execute(query)
        .await
        .map_err(|e| repo_error(operation, e))?;

    if let Some(row) = result
        .next()
        .await
        .map_err(|e| repo_error(operation, e))?
    {
        Ok(Some(converter(row)?))
    } else {
        Ok(None)
    }
}
