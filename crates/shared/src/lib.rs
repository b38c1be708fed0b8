//! Curricula Protocol - Wire-format types for the HTTP API
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde and serde_json
//! 2. **No business logic** - Pure data types and serialization
//! 3. **No domain IDs** - store ids travel as plain strings
//!
//! Request bodies accept the ontology property names used by earlier clients
//! (`ns0__hocKy`, `rdfs__label`, ...) as aliases of the snake_case fields.

pub mod requests;
pub mod responses;

pub use requests::{
    AddRelationsRequest, CourseListQuery, CreateCourseRequest, CreateUserCourseRequest,
    CredentialsRequest, RelationInput, SearchRequest, UpdateCourseRequest, UpdateRelationRequest,
    UpdateUserCourseRequest, UpdateUserRequest,
};
pub use responses::{
    CatalogEntryData, CourseData, CourseDetailsData, CourseListResponse, CourseResponse,
    EligibleCourseData, ErrorResponse, MessageResponse, OntologyAncestorData, OntologyChildData,
    OntologyGroupData, OntologyResponse, RelationData, RelationResponse, RelationTypesResponse,
    SearchHit, UserCourseData, UserCourseResponse, UserResponse, UserUpdatedResponse,
    ViolationData,
};
