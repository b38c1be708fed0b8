//! Neo4j schema initialization - constraints and indexes.

use neo4rs::query;

use crate::infrastructure::neo4j::Neo4jGraph;

/// Lookup indexes on imported curriculum nodes.
const INDEXES: [&str; 2] = [
    "CREATE INDEX resource_label IF NOT EXISTS
     FOR (r:Resource) ON (r.rdfs__label)",
    "CREATE INDEX resource_course_code IF NOT EXISTS
     FOR (r:Resource) ON (r.ns0__maMonHoc)",
];

/// A uniqueness constraint backing a conditional MERGE, with the plain index
/// it replaces.
struct UniqueKey {
    constraint: &'static str,
    create: &'static str,
    legacy_index: &'static str,
    fallback_index: &'static str,
}

const UNIQUE_KEYS: [UniqueKey; 2] = [
    UniqueKey {
        constraint: "user_username_unique",
        create: "CREATE CONSTRAINT user_username_unique IF NOT EXISTS
                 FOR (u:User) REQUIRE u.username IS UNIQUE",
        legacy_index: "DROP INDEX user_username IF EXISTS",
        fallback_index: "CREATE INDEX user_username IF NOT EXISTS
                         FOR (u:User) ON (u.username)",
    },
    UniqueKey {
        constraint: "user_course_pair_unique",
        create: "CREATE CONSTRAINT user_course_pair_unique IF NOT EXISTS
                 FOR (uc:UserCourse) REQUIRE (uc.user_id, uc.course_id) IS UNIQUE",
        legacy_index: "DROP INDEX user_course_pair IF EXISTS",
        fallback_index: "CREATE INDEX user_course_pair IF NOT EXISTS
                         FOR (uc:UserCourse) ON (uc.user_id, uc.course_id)",
    },
];

/// Initialize Neo4j schema with required constraints and indexes.
///
/// This should be called once on startup. Everything is created with
/// IF NOT EXISTS to be idempotent. Node MERGE is only atomic when a
/// uniqueness constraint backs it, so users and progress records get one.
/// Stores that already hold duplicates cannot take the constraint; that is
/// logged and the plain lookup index is kept instead.
pub async fn ensure_schema(graph: &Neo4jGraph) -> Result<(), neo4rs::Error> {
    for statement in INDEXES {
        graph.run(query(statement)).await?;
    }

    let mut enforced = 0;
    for key in &UNIQUE_KEYS {
        // the constraint brings its own index; an older plain one on the same keys blocks it
        graph.run(query(key.legacy_index)).await?;
        match graph.run(query(key.create)).await {
            Ok(()) => enforced += 1,
            Err(e) => {
                tracing::warn!(
                    constraint = key.constraint,
                    error = %e,
                    "Uniqueness constraint not created, existing data has duplicates"
                );
                graph.run(query(key.fallback_index)).await?;
            }
        }
    }

    tracing::info!(
        constraints = enforced,
        "Neo4j schema initialized (constraints and indexes ensured)"
    );
    Ok(())
}
