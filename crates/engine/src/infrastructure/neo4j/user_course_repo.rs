//! Neo4j user-course (progress record) repository.
//!
//! Progress records are standalone `UserCourse` nodes holding `user_id` and
//! `course_id` as properties. At most one record exists per pair: creation
//! merges on the pair and the `user_course_pair_unique` constraint rejects a
//! concurrent duplicate.

use std::sync::Arc;

use async_trait::async_trait;
use curricula_domain::{NewUserCourse, ProgressStatus, UserCourse, UserCourseId};
use neo4rs::query;
use uuid::Uuid;

use super::helpers::{row_to_user_course, RowExt};
use super::query_helpers::{collect_rows, get_first_row};
use super::Neo4jGraph;
use crate::infrastructure::ports::{ClockPort, RepoError, UserCourseRepo};

const USER_COURSE_COLUMNS: &str = "elementId(uc) AS user_course_id, \
     uc.user_id AS user_id, \
     uc.course_id AS course_id, \
     uc.status AS status, \
     uc.updated_at AS updated_at";

pub struct Neo4jUserCourseRepo {
    graph: Neo4jGraph,
    clock: Arc<dyn ClockPort>,
}

impl Neo4jUserCourseRepo {
    pub fn new(graph: Neo4jGraph, clock: Arc<dyn ClockPort>) -> Self {
        Self { graph, clock }
    }

    fn now_rfc3339(&self) -> String {
        self.clock.now().to_rfc3339()
    }
}

#[async_trait]
impl UserCourseRepo for Neo4jUserCourseRepo {
    async fn get(&self, id: &UserCourseId) -> Result<Option<UserCourse>, RepoError> {
        let q = query(&format!(
            "MATCH (uc:UserCourse) WHERE elementId(uc) = $id
             RETURN {USER_COURSE_COLUMNS}"
        ))
        .param("id", id.as_str());

        get_first_row(&self.graph, q, "get_user_course", row_to_user_course).await
    }

    async fn list(&self) -> Result<Vec<UserCourse>, RepoError> {
        let q = query(&format!(
            "MATCH (uc:UserCourse)
             RETURN {USER_COURSE_COLUMNS}
             ORDER BY user_id, course_id"
        ));

        collect_rows(&self.graph, q, "list_user_courses", row_to_user_course).await
    }

    async fn create(&self, record: &NewUserCourse) -> Result<Option<UserCourse>, RepoError> {
        let q = query(&format!(
            "MERGE (uc:UserCourse {{user_id: $user_id, course_id: $course_id}})
             ON CREATE SET uc.status = $status,
                           uc.updated_at = $now,
                           uc.merge_token = $token
             WITH uc, coalesce(uc.merge_token = $token, false) AS created
             REMOVE uc.merge_token
             RETURN {USER_COURSE_COLUMNS}, created"
        ))
        .param("user_id", record.user_id.as_str())
        .param("course_id", record.course_id.as_str())
        .param(
            "status",
            record.status.as_ref().map(|s| s.as_str().to_string()),
        )
        .param("now", self.now_rfc3339())
        .param("token", Uuid::new_v4().to_string());

        let created = get_first_row(&self.graph, q, "create_user_course", |row| {
            let created = row.get_bool_or("created", false);
            created.then(|| row_to_user_course(row)).transpose()
        })
        .await;
        // a concurrent create of the same key loses to the uniqueness constraint
        let created = match created {
            Err(e) if e.is_constraint_violation() => None,
            result => result?.flatten(),
        };

        if let Some(record) = &created {
            tracing::debug!(
                user_course_id = %record.id,
                user_id = %record.user_id,
                course_id = %record.course_id,
                "Created user course"
            );
        }
        Ok(created)
    }

    async fn update_status(
        &self,
        id: &UserCourseId,
        status: &ProgressStatus,
    ) -> Result<Option<UserCourse>, RepoError> {
        let q = query(&format!(
            "MATCH (uc:UserCourse) WHERE elementId(uc) = $id
             SET uc.status = $status,
                 uc.updated_at = $now
             RETURN {USER_COURSE_COLUMNS}"
        ))
        .param("id", id.as_str())
        .param("status", status.as_str())
        .param("now", self.now_rfc3339());

        get_first_row(&self.graph, q, "update_user_course", row_to_user_course).await
    }

    async fn delete(&self, id: &UserCourseId) -> Result<bool, RepoError> {
        let q = query(
            "MATCH (uc:UserCourse) WHERE elementId(uc) = $id
             WITH uc, elementId(uc) AS user_course_id
             DETACH DELETE uc
             RETURN user_course_id",
        )
        .param("id", id.as_str());

        let deleted = get_first_row(&self.graph, q, "delete_user_course", |_| Ok(()))
            .await?
            .is_some();

        if deleted {
            tracing::debug!(user_course_id = %id, "Deleted user course");
        }
        Ok(deleted)
    }
}
