//! Paginated course catalogue.

use curricula_domain::{CatalogEntry, RelationKind, UserId};

use super::{CourseError, CourseUseCases};
use crate::infrastructure::ports::CatalogQuery;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Catalogue request as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogRequest {
    /// 1-based page number, defaults to 1.
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Comma-separated relation kinds; every kind must be present.
    pub relation: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPage {
    pub total_courses: u64,
    pub total_pages: u64,
    pub courses: Vec<CatalogEntry>,
}

impl CourseUseCases {
    pub async fn list(&self, request: CatalogRequest) -> Result<CatalogPage, CourseError> {
        let page = request.page.unwrap_or(1);
        let limit = request.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if page == 0 || limit == 0 {
            return Err(CourseError::InvalidInput(
                "page and limit must be at least 1".to_string(),
            ));
        }

        let skip = i64::try_from(u64::from(page - 1) * u64::from(limit)).map_err(|_| {
            CourseError::InvalidInput(format!("page {page} is out of range"))
        })?;

        let required_kinds = parse_relation_filter(request.relation.as_deref())?;
        let user_id = request
            .user_id
            .filter(|raw| !raw.trim().is_empty())
            .map(UserId::new)
            .transpose()?;

        let total_courses = self.courses.count_catalog(&required_kinds).await?;

        let query = CatalogQuery {
            skip,
            limit: i64::from(limit),
            required_kinds,
            user_id,
        };
        let courses = self.courses.list_catalog(&query).await?;

        Ok(CatalogPage {
            total_courses,
            total_pages: total_courses.div_ceil(u64::from(limit)),
            courses,
        })
    }
}

/// Parse `prerequisite,parallel` (API names or graph labels) into kinds.
fn parse_relation_filter(raw: Option<&str>) -> Result<Vec<RelationKind>, CourseError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    let mut kinds = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let kind = part.parse::<RelationKind>()?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    Ok(kinds)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::infrastructure::ports::{MockCourseRepo, MockCurriculumGraph};
    use crate::use_cases::curriculum::CurriculumValidator;

    fn use_cases(courses: MockCourseRepo) -> CourseUseCases {
        CourseUseCases::new(
            Arc::new(courses),
            Arc::new(CurriculumValidator::new(Arc::new(MockCurriculumGraph::new()))),
        )
    }

    #[test]
    fn relation_filter_accepts_api_names_and_graph_labels() {
        let kinds = parse_relation_filter(Some("prerequisite, ns0__songHanh,,prerequisite")).unwrap();
        assert_eq!(kinds, vec![RelationKind::Prerequisite, RelationKind::Parallel]);
        assert!(parse_relation_filter(None).unwrap().is_empty());
        assert!(parse_relation_filter(Some("owl__sameAs")).is_err());
    }

    #[tokio::test]
    async fn defaults_to_first_page_of_ten() {
        let mut courses = MockCourseRepo::new();
        courses.expect_count_catalog().returning(|_| Ok(25));
        courses
            .expect_list_catalog()
            .withf(|q| q.skip == 0 && q.limit == 10 && q.required_kinds.is_empty() && q.user_id.is_none())
            .returning(|_| Ok(Vec::new()));

        let page = use_cases(courses)
            .list(CatalogRequest::default())
            .await
            .unwrap();

        assert_eq!(page.total_courses, 25);
        assert_eq!(page.total_pages, 3);
    }

    #[tokio::test]
    async fn later_pages_skip_earlier_rows() {
        let mut courses = MockCourseRepo::new();
        courses.expect_count_catalog().returning(|_| Ok(40));
        courses
            .expect_list_catalog()
            .withf(|q| {
                q.skip == 10
                    && q.limit == 5
                    && q.required_kinds == vec![RelationKind::PriorTo]
                    && q.user_id.as_ref().map(|u| u.as_str()) == Some("4:u:1")
            })
            .returning(|_| Ok(Vec::new()));

        let request = CatalogRequest {
            page: Some(3),
            limit: Some(5),
            relation: Some("priorTo".to_string()),
            user_id: Some("4:u:1".to_string()),
        };
        let page = use_cases(courses).list(request).await.unwrap();

        assert_eq!(page.total_pages, 8);
    }

    #[tokio::test]
    async fn zero_limit_is_rejected() {
        let request = CatalogRequest {
            limit: Some(0),
            ..Default::default()
        };
        let err = use_cases(MockCourseRepo::new())
            .list(request)
            .await
            .unwrap_err();

        assert!(matches!(err, CourseError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn page_past_the_store_integer_range_is_rejected() {
        let mut courses = MockCourseRepo::new();
        courses.expect_count_catalog().never();
        courses.expect_list_catalog().never();

        let request = CatalogRequest {
            page: Some(u32::MAX),
            limit: Some(u32::MAX),
            ..Default::default()
        };
        let err = use_cases(courses).list(request).await.unwrap_err();

        assert!(matches!(err, CourseError::InvalidInput(msg) if msg.contains("out of range")));
    }

    #[tokio::test]
    async fn largest_representable_page_still_reaches_the_store() {
        let mut courses = MockCourseRepo::new();
        courses.expect_count_catalog().returning(|_| Ok(0));
        courses
            .expect_list_catalog()
            .withf(|q| q.skip == i64::from(u32::MAX - 1) * 2 && q.limit == 2)
            .returning(|_| Ok(Vec::new()));

        let request = CatalogRequest {
            page: Some(u32::MAX),
            limit: Some(2),
            ..Default::default()
        };
        let page = use_cases(courses).list(request).await.unwrap();

        assert!(page.courses.is_empty());
    }
}
