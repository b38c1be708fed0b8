//! HTTP routes.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use curricula_domain::{CourseId, DomainError, RelationId, User, UserCourseId, UserId};
use curricula_shared::{
    AddRelationsRequest, CourseDetailsData, CourseListQuery, CourseListResponse, CourseResponse,
    CreateCourseRequest, CreateUserCourseRequest, CredentialsRequest, EligibleCourseData,
    MessageResponse, OntologyResponse, RelationResponse, RelationTypesResponse, SearchHit,
    SearchRequest, UpdateCourseRequest, UpdateRelationRequest, UpdateUserCourseRequest,
    UpdateUserRequest, UserCourseData, UserCourseResponse, UserResponse, UserUpdatedResponse,
};

use super::error::ApiError;
use super::mappers;
use crate::app::App;
use crate::use_cases::courses::{CatalogRequest, CourseInput};
use crate::use_cases::relations::parse_draft;
use crate::use_cases::users::Credentials;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        // Courses
        .route("/courses", get(list_courses).post(create_course))
        .route(
            "/courses/{id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/courses/{id}/relations", post(add_relations))
        .route("/courses/{id}/eligible-relations", get(eligible_relations))
        .route("/courses/relations/{id}", put(update_relation))
        // Structure
        .route("/structure/relations/{id}", delete(delete_relation))
        .route("/structure/relation-types", get(relation_types))
        .route("/structure/ontology-classes", get(ontology_classes))
        // Users
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/add-user", post(add_user))
        .route("/update-user/{id}", put(update_user))
        .route("/delete-user/{id}", delete(delete_user))
        // Progress
        .route("/user-courses", get(list_user_courses).post(create_user_course))
        .route(
            "/user-courses/{id}",
            get(get_user_course)
                .put(update_user_course)
                .delete(delete_user_course),
        )
        // Search
        .route("/search", post(search))
}

async fn health() -> &'static str {
    "OK"
}

fn parse_id<T>(raw: &str) -> Result<T, ApiError>
where
    T: FromStr<Err = DomainError>,
{
    raw.parse::<T>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}

// =============================================================================
// Courses
// =============================================================================

async fn create_course(
    State(app): State<Arc<App>>,
    Json(body): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    let input = CourseInput {
        code: body.code,
        label: body.label,
        semester: body.semester,
        is_elective: body.is_elective,
        credits: body.credits,
    };
    let course = app.use_cases.courses.create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(CourseResponse {
            message: "Course added successfully!".to_string(),
            course: mappers::course_data(&course),
        }),
    ))
}

async fn list_courses(
    State(app): State<Arc<App>>,
    Query(query): Query<CourseListQuery>,
) -> Result<Json<CourseListResponse>, ApiError> {
    let request = CatalogRequest {
        page: query.page,
        limit: query.limit,
        relation: query.relation,
        user_id: query.user_id,
    };
    let page = app.use_cases.courses.list(request).await?;
    Ok(Json(CourseListResponse {
        total_courses: page.total_courses,
        total_pages: page.total_pages,
        courses: page.courses.iter().map(mappers::catalog_entry_data).collect(),
    }))
}

async fn get_course(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<Json<CourseDetailsData>, ApiError> {
    let id: CourseId = parse_id(&id)?;
    let details = app.use_cases.courses.get(&id).await?;
    Ok(Json(mappers::course_details_data(&details)))
}

async fn update_course(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateCourseRequest>,
) -> Result<Json<CourseResponse>, ApiError> {
    let id: CourseId = parse_id(&id)?;
    let input = CourseInput {
        code: None,
        label: body.label,
        semester: body.semester,
        is_elective: body.is_elective,
        credits: body.credits,
    };
    let course = app.use_cases.courses.update(&id, input).await?;
    Ok(Json(CourseResponse {
        message: "Course updated successfully!".to_string(),
        course: mappers::course_data(&course),
    }))
}

async fn delete_course(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id: CourseId = parse_id(&id)?;
    app.use_cases.courses.delete(&id).await?;
    Ok(Json(MessageResponse::new(format!(
        "Course with id {id} deleted successfully, along with all its relationships."
    ))))
}

async fn add_relations(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
    Json(body): Json<AddRelationsRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let id: CourseId = parse_id(&id)?;
    let drafts = body
        .relations
        .iter()
        .filter(|r| r.relation_type.is_some() && r.target_id.is_some())
        .map(|r| parse_draft(r.relation_type.as_deref(), r.target_id.as_deref()))
        .collect::<Result<Vec<_>, _>>()?;

    app.use_cases.relations.add_relations(&id, &drafts).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Relations added successfully!")),
    ))
}

async fn update_relation(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateRelationRequest>,
) -> Result<Json<RelationResponse>, ApiError> {
    let id: RelationId = parse_id(&id)?;
    let draft = parse_draft(body.relation_type.as_deref(), body.target_id.as_deref())?;
    let relation = app
        .use_cases
        .relations
        .retarget(&id, draft.kind, &draft.target)
        .await?;
    Ok(Json(RelationResponse {
        message: "Relation updated successfully!".to_string(),
        relation: mappers::relation_data(&relation),
    }))
}

/// Candidates keyed by the stored relationship type, e.g. `ns0__tienQuyet`.
async fn eligible_relations(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<Json<BTreeMap<&'static str, Vec<EligibleCourseData>>>, ApiError> {
    let id: CourseId = parse_id(&id)?;
    let groups = app.use_cases.courses.eligible_relations(&id).await?;
    Ok(Json(
        groups
            .iter()
            .map(|group| {
                (
                    group.kind.graph_label(),
                    group
                        .courses
                        .iter()
                        .map(mappers::eligible_course_data)
                        .collect::<Vec<_>>(),
                )
            })
            .collect(),
    ))
}

// =============================================================================
// Structure
// =============================================================================

async fn delete_relation(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id: RelationId = parse_id(&id)?;
    app.use_cases.structure.delete_relation(&id).await?;
    Ok(Json(MessageResponse::new(format!(
        "Relation with id {id} deleted successfully!"
    ))))
}

async fn relation_types(
    State(app): State<Arc<App>>,
) -> Result<Json<RelationTypesResponse>, ApiError> {
    let relation_types = app.use_cases.structure.relation_types().await?;
    Ok(Json(RelationTypesResponse { relation_types }))
}

async fn ontology_classes(State(app): State<Arc<App>>) -> Result<Json<OntologyResponse>, ApiError> {
    let groups = app.use_cases.structure.ontology().await?;
    Ok(Json(OntologyResponse {
        ontology_structure: groups.iter().map(mappers::ontology_group_data).collect(),
    }))
}

// =============================================================================
// Users
// =============================================================================

fn credentials(body: CredentialsRequest) -> Credentials {
    Credentials {
        username: body.username,
        password: body.password,
        role: body.role,
    }
}

fn user_response(message: &str, user: &User) -> UserResponse {
    UserResponse {
        message: message.to_string(),
        user_id: user.id.to_string(),
        username: user.username.to_string(),
        role: user.role.to_string(),
    }
}

async fn register(
    State(app): State<Arc<App>>,
    Json(body): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = app.use_cases.users.register(credentials(body)).await?;
    Ok((
        StatusCode::CREATED,
        Json(user_response("User registered successfully", &user)),
    ))
}

async fn add_user(
    State(app): State<Arc<App>>,
    Json(body): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = app.use_cases.users.register(credentials(body)).await?;
    Ok((
        StatusCode::CREATED,
        Json(user_response("User added successfully", &user)),
    ))
}

async fn login(
    State(app): State<Arc<App>>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = app.use_cases.users.login(credentials(body)).await?;
    Ok(Json(user_response("Login successful", &user)))
}

async fn update_user(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserUpdatedResponse>, ApiError> {
    let id: UserId = parse_id(&id)?;
    let user = app
        .use_cases
        .users
        .update(&id, body.username, body.role)
        .await?;
    Ok(Json(UserUpdatedResponse {
        message: "User updated successfully".to_string(),
        user_id: user.id.to_string(),
    }))
}

async fn delete_user(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id: UserId = parse_id(&id)?;
    app.use_cases.users.delete(&id).await?;
    Ok(Json(MessageResponse::new(format!(
        "User with id {id} deleted successfully"
    ))))
}

// =============================================================================
// Progress
// =============================================================================

async fn create_user_course(
    State(app): State<Arc<App>>,
    Json(body): Json<CreateUserCourseRequest>,
) -> Result<(StatusCode, Json<UserCourseResponse>), ApiError> {
    let record = app
        .use_cases
        .user_courses
        .create(body.user_id, body.course_id, body.status)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(UserCourseResponse {
            message: "UserCourse added successfully!".to_string(),
            user_course: mappers::user_course_data(&record),
        }),
    ))
}

async fn list_user_courses(
    State(app): State<Arc<App>>,
) -> Result<Json<Vec<UserCourseData>>, ApiError> {
    let records = app.use_cases.user_courses.list().await?;
    Ok(Json(records.iter().map(mappers::user_course_data).collect()))
}

async fn get_user_course(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<Json<UserCourseData>, ApiError> {
    let id: UserCourseId = parse_id(&id)?;
    let record = app.use_cases.user_courses.get(&id).await?;
    Ok(Json(mappers::user_course_data(&record)))
}

async fn update_user_course(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateUserCourseRequest>,
) -> Result<Json<UserCourseResponse>, ApiError> {
    let id: UserCourseId = parse_id(&id)?;
    let record = app
        .use_cases
        .user_courses
        .update_status(&id, body.status)
        .await?;
    Ok(Json(UserCourseResponse {
        message: "UserCourse updated successfully!".to_string(),
        user_course: mappers::user_course_data(&record),
    }))
}

async fn delete_user_course(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id: UserCourseId = parse_id(&id)?;
    app.use_cases.user_courses.delete(&id).await?;
    Ok(Json(MessageResponse::new(format!(
        "UserCourse with id {id} deleted successfully."
    ))))
}

// =============================================================================
// Search
// =============================================================================

async fn search(
    State(app): State<Arc<App>>,
    Json(body): Json<SearchRequest>,
) -> Result<Json<Vec<SearchHit>>, ApiError> {
    let matches = app.use_cases.search.search(&body.query).await?;
    Ok(Json(matches.into_iter().map(mappers::search_hit).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use curricula_domain::{Course, CoursePlacement, CourseSummary, RelationKind, Semester};
    use tower::ServiceExt;

    use crate::app::Repositories;
    use crate::infrastructure::ports::{
        MockCourseRepo, MockCurriculumGraph, MockEmbeddingPort, MockPasswordHasherPort,
        MockRelationRepo, MockStructureRepo, MockUserCourseRepo, MockUserRepo,
    };

    struct Mocks {
        curriculum: MockCurriculumGraph,
        course: MockCourseRepo,
        relation: MockRelationRepo,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                curriculum: MockCurriculumGraph::new(),
                course: MockCourseRepo::new(),
                relation: MockRelationRepo::new(),
            }
        }

        fn into_router(self) -> Router {
            let repositories = Repositories {
                curriculum: Arc::new(self.curriculum),
                course: Arc::new(self.course),
                relation: Arc::new(self.relation),
                structure: Arc::new(MockStructureRepo::new()),
                user: Arc::new(MockUserRepo::new()),
                user_course: Arc::new(MockUserCourseRepo::new()),
            };
            let app = App::new(
                repositories,
                Arc::new(MockEmbeddingPort::new()),
                Arc::new(MockPasswordHasherPort::new()),
                10,
            );
            routes().with_state(Arc::new(app))
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_responds_ok() {
        let response = Mocks::new()
            .into_router()
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_course_is_404_with_error_body() {
        let mut mocks = Mocks::new();
        mocks.course.expect_get_details().returning(|_| Ok(None));

        let response = mocks
            .into_router()
            .oneshot(Request::get("/courses/4:c:404").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("4:c:404"));
    }

    #[tokio::test]
    async fn same_semester_prerequisite_is_400_with_violation() {
        let mut mocks = Mocks::new();
        mocks.curriculum.expect_course_placement().returning(|id| {
            Ok(Some(CoursePlacement::new(
                id.clone(),
                id.as_str(),
                Some(Semester::new(1).unwrap()),
            )))
        });
        mocks.relation.expect_create().never();

        let request = Request::post("/courses/a/relations")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({
                    "relations": [{ "relation_type": "ns0__tienQuyet", "target_id": "b" }]
                })
                .to_string(),
            ))
            .unwrap();
        let response = mocks.into_router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["violations"][0]["kind"], "semester-order");
    }

    #[tokio::test]
    async fn eligible_relations_are_keyed_by_graph_label() {
        let mut mocks = Mocks::new();
        mocks.course.expect_get().returning(|id| {
            Ok(Some(Course {
                id: id.clone(),
                code: Some("CS301".to_string()),
                label: Some("Compilers".to_string()),
                semester: Some(Semester::new(3).unwrap()),
                is_elective: false,
                credits: Some(3),
            }))
        });
        mocks
            .course
            .expect_eligible_targets()
            .returning(|_, kind| {
                Ok(if kind == RelationKind::Prerequisite {
                    vec![CourseSummary {
                        course_id: CourseId::new("4:c:1").unwrap(),
                        code: Some("CS101".to_string()),
                        label: Some("Intro".to_string()),
                    }]
                } else {
                    Vec::new()
                })
            });

        let response = mocks
            .into_router()
            .oneshot(
                Request::get("/courses/4:c:3/eligible-relations")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["ns0__hocTruoc", "ns0__songHanh", "ns0__tienQuyet"]);
        assert_eq!(body["ns0__tienQuyet"][0]["course_id"], "4:c:1");
        assert!(body["ns0__songHanh"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn retarget_without_target_is_400() {
        let request = Request::put("/courses/relations/5:r:1")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"relation_type":"parallel"}"#))
            .unwrap();
        let response = Mocks::new().into_router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
