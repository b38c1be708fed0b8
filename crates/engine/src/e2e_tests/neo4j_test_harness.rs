//! Neo4j test harness for integration testing.
//!
//! Provides testcontainer-based Neo4j instance management and a small seeding
//! API that builds the ontology shape the catalogue queries expect.

use std::time::Duration;

use neo4rs::{query, Graph};
use testcontainers::{core::WaitFor, runners::AsyncRunner, ContainerAsync, GenericImage};
use tokio::time::sleep;

use crate::infrastructure::neo4j::Neo4jGraph;

/// Password used for Neo4j test containers.
pub const TEST_NEO4J_PASSWORD: &str = "testpassword";

/// Label of the ontology class every catalogued course descends from.
pub const COURSE_ROOT_LABEL: &str = "Môn học";

type HarnessError = Box<dyn std::error::Error + Send + Sync>;

/// Neo4j test harness managing container lifecycle.
pub struct Neo4jTestHarness {
    _container: ContainerAsync<GenericImage>,
    graph: Graph,
}

impl Neo4jTestHarness {
    /// Start a new Neo4j container and establish a connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the container fails to start or connection cannot be established.
    pub async fn start() -> Result<Self, HarnessError> {
        let container: ContainerAsync<GenericImage> =
            neo4j_image(TEST_NEO4J_PASSWORD).start().await;
        let bolt_port = container.get_host_port_ipv4(7687).await;
        let uri = format!("bolt://127.0.0.1:{bolt_port}");

        let graph = connect_with_retry(&uri, "neo4j", TEST_NEO4J_PASSWORD).await?;

        Ok(Self {
            _container: container,
            graph,
        })
    }

    /// Get reference to the raw driver connection.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Wrapped connection, as injected into repositories.
    pub fn neo4j_graph(&self) -> Neo4jGraph {
        Neo4jGraph::new(self.graph.clone())
    }

    /// Clean all data from the database.
    pub async fn clean(&self) -> Result<(), HarnessError> {
        clean_db(&self.graph).await
    }

    /// Create the root class plus one subclass, returning the subclass id.
    pub async fn seed_course_class(&self, label: &str) -> Result<String, HarnessError> {
        let mut rows = self
            .graph
            .execute(
                query(
                    "MERGE (root:Resource {rdfs__label: $root})
                     CREATE (cls:Resource:owl__Class {rdfs__label: $label})
                     CREATE (cls)-[:rdfs__subClassOf]->(root)
                     RETURN elementId(cls) AS id",
                )
                .param("root", COURSE_ROOT_LABEL)
                .param("label", label),
            )
            .await?;
        let row = rows.next().await?.ok_or("class seed returned no row")?;
        Ok(row.get::<String>("id")?)
    }

    /// Create a catalogued course that is an instance of `class_id`.
    pub async fn seed_course(
        &self,
        class_id: &str,
        code: &str,
        label: &str,
        semester: i64,
    ) -> Result<String, HarnessError> {
        let mut rows = self
            .graph
            .execute(
                query(
                    "MATCH (cls) WHERE elementId(cls) = $class_id
                     CREATE (c:Resource:owl__NamedIndividual {
                         ns0__maMonHoc: $code,
                         rdfs__label: $label,
                         ns0__hocKy: $semester,
                         ns0__laMonTuChon: false
                     })-[:rdf__type]->(cls)
                     RETURN elementId(c) AS id",
                )
                .param("class_id", class_id)
                .param("code", code)
                .param("label", label)
                .param("semester", semester),
            )
            .await?;
        let row = rows.next().await?.ok_or("course seed returned no row")?;
        Ok(row.get::<String>("id")?)
    }
}

/// Create a Neo4j container image with the given password.
///
/// Configuration for reliability:
/// - Pinned version for consistency across runs
/// - Memory limits to prevent JVM crashes
/// - No stdout wait (avoids race conditions with log streaming)
/// - Connection readiness is verified by connect_with_retry with exponential backoff
pub fn neo4j_image(password: &str) -> GenericImage {
    GenericImage::new("neo4j", "5.26.0-community")
        .with_env_var("NEO4J_AUTH", format!("neo4j/{password}"))
        .with_env_var(
            "NEO4J_dbms_connector_bolt_advertised__address",
            "localhost:7687",
        )
        .with_env_var("NEO4J_server_memory_heap_initial__size", "256m")
        .with_env_var("NEO4J_server_memory_heap_max__size", "512m")
        .with_env_var("NEO4J_server_memory_pagecache_size", "128m")
        .with_exposed_port(7687)
        .with_wait_for(WaitFor::seconds(5))
}

/// Connect to Neo4j with retry logic using exponential backoff.
///
/// Backoff runs 500ms → 1s → 2s → 4s → 5s (capped), up to 30 attempts, and
/// each candidate connection is verified with a query before it is returned.
pub async fn connect_with_retry(uri: &str, user: &str, pass: &str) -> Result<Graph, HarnessError> {
    let max_attempts = 30;
    let max_delay = Duration::from_secs(5);

    let mut delay = Duration::from_millis(500);
    let mut last_err: Option<String> = None;

    for attempt in 1..=max_attempts {
        match Graph::new(uri, user, pass).await {
            Ok(graph) => match graph.run(query("RETURN 1")).await {
                Ok(()) => {
                    tracing::info!(attempt, uri, "Neo4j connection established and verified");
                    return Ok(graph);
                }
                Err(e) => last_err = Some(format!("Connection test query failed: {e}")),
            },
            Err(e) => last_err = Some(e.to_string()),
        }

        tracing::debug!(
            attempt,
            delay_ms = delay.as_millis(),
            error = last_err.as_deref().unwrap_or("unknown"),
            "Retrying Neo4j connection"
        );

        sleep(delay).await;
        delay = std::cmp::min(delay.saturating_mul(2), max_delay);
    }

    Err(format!(
        "Failed to connect to Neo4j at {uri} after {max_attempts} attempts: {:?}",
        last_err
    )
    .into())
}

/// Clean all data from a Neo4j database.
pub async fn clean_db(graph: &Graph) -> Result<(), HarnessError> {
    graph
        .run(query("MATCH (n) DETACH DELETE n"))
        .await
        .map_err(|e| format!("Failed to clean database: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires docker (testcontainers)"]
    async fn harness_starts_and_connects() {
        let harness = Neo4jTestHarness::start()
            .await
            .expect("Failed to start Neo4j harness");

        let mut result = harness
            .graph()
            .execute(query("RETURN 1 as n"))
            .await
            .expect("Query failed");

        let row = result.next().await.expect("No result").expect("Row error");
        let n: i64 = row.get("n").expect("Column not found");
        assert_eq!(n, 1);
    }

    #[tokio::test]
    #[ignore = "requires docker (testcontainers)"]
    async fn seeded_course_hangs_under_root_class() {
        let harness = Neo4jTestHarness::start()
            .await
            .expect("Failed to start Neo4j harness");

        let class_id = harness.seed_course_class("Cơ sở ngành").await.expect("class");
        harness
            .seed_course(&class_id, "CS101", "Intro", 1)
            .await
            .expect("course");

        let mut result = harness
            .graph()
            .execute(
                query(
                    "MATCH (c)-[:rdf__type]->()-[:rdfs__subClassOf*]->(root {rdfs__label: $root})
                     RETURN count(c) AS count",
                )
                .param("root", COURSE_ROOT_LABEL),
            )
            .await
            .expect("Count query failed");
        let row = result.next().await.expect("No result").expect("Row error");
        let count: i64 = row.get("count").expect("Column not found");
        assert_eq!(count, 1);

        harness.clean().await.expect("Clean failed");
    }
}
