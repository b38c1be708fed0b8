//! Neo4j user repository.

use async_trait::async_trait;
use curricula_domain::{NewUser, User, UserId, UserPatch, Username};
use neo4rs::query;
use uuid::Uuid;

use super::helpers::{row_to_user, RowExt};
use super::query_helpers::get_first_row;
use super::Neo4jGraph;
use crate::infrastructure::ports::{RepoError, UserRepo};

const USER_COLUMNS: &str = "elementId(u) AS user_id, \
     u.username AS username, \
     u.role AS role, \
     u.password AS password";

pub struct Neo4jUserRepo {
    graph: Neo4jGraph,
}

impl Neo4jUserRepo {
    pub fn new(graph: Neo4jGraph) -> Self {
        Self { graph }
    }
}

#[async_trait]
impl UserRepo for Neo4jUserRepo {
    async fn get(&self, id: &UserId) -> Result<Option<User>, RepoError> {
        let q = query(&format!(
            "MATCH (u:User) WHERE elementId(u) = $id
             RETURN {USER_COLUMNS}"
        ))
        .param("id", id.as_str());

        get_first_row(&self.graph, q, "get_user", row_to_user).await
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, RepoError> {
        let q = query(&format!(
            "MATCH (u:User {{username: $username}})
             RETURN {USER_COLUMNS}
             LIMIT 1"
        ))
        .param("username", username.as_str());

        get_first_row(&self.graph, q, "find_user_by_username", row_to_user).await
    }

    async fn create(&self, user: &NewUser) -> Result<Option<User>, RepoError> {
        let q = query(&format!(
            "MERGE (u:User {{username: $username}})
             ON CREATE SET u.password = $password,
                           u.role = $role,
                           u.merge_token = $token
             WITH u, coalesce(u.merge_token = $token, false) AS created
             REMOVE u.merge_token
             RETURN {USER_COLUMNS}, created"
        ))
        .param("username", user.username.as_str())
        .param("password", user.password_hash.as_str())
        .param("role", user.role.as_str())
        .param("token", Uuid::new_v4().to_string());

        let created = get_first_row(&self.graph, q, "create_user", |row| {
            let created = row.get_bool_or("created", false);
            created.then(|| row_to_user(row)).transpose()
        })
        .await;
        // a concurrent create of the same key loses to the uniqueness constraint
        let created = match created {
            Err(e) if e.is_constraint_violation() => None,
            result => result?.flatten(),
        };

        if let Some(user) = &created {
            tracing::debug!(user_id = %user.id, username = %user.username, "Created user");
        }
        Ok(created)
    }

    async fn update(&self, id: &UserId, patch: &UserPatch) -> Result<Option<User>, RepoError> {
        let q = query(&format!(
            "MATCH (u:User) WHERE elementId(u) = $id
             SET u.username = coalesce($username, u.username),
                 u.role = coalesce($role, u.role)
             RETURN {USER_COLUMNS}"
        ))
        .param("id", id.as_str())
        .param(
            "username",
            patch.username.as_ref().map(|u| u.as_str().to_string()),
        )
        .param("role", patch.role.map(|r| r.as_str().to_string()));

        get_first_row(&self.graph, q, "update_user", row_to_user).await
    }

    async fn delete(&self, id: &UserId) -> Result<bool, RepoError> {
        let q = query(
            "MATCH (u:User) WHERE elementId(u) = $id
             WITH u, elementId(u) AS user_id
             DETACH DELETE u
             RETURN user_id",
        )
        .param("id", id.as_str());

        let deleted = get_first_row(&self.graph, q, "delete_user", |_| Ok(()))
            .await?
            .is_some();

        if deleted {
            tracing::debug!(user_id = %id, "Deleted user");
        }
        Ok(deleted)
    }
}
