//! Course CRUD operations.

use curricula_domain::{
    Course, CourseDetails, CourseId, CoursePatch, CourseSummary, NewCourse, RelationKind,
    Semester,
};

use super::{CourseError, CourseUseCases};

/// Raw course fields as received from a client. Every field is optional so
/// the same shape serves create and partial update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseInput {
    pub code: Option<String>,
    pub label: Option<String>,
    pub semester: Option<i64>,
    pub is_elective: Option<bool>,
    pub credits: Option<i64>,
}

/// Candidate targets for one semester-bound relation kind.
#[derive(Debug, Clone, PartialEq)]
pub struct EligibleTargets {
    pub kind: RelationKind,
    pub courses: Vec<CourseSummary>,
}

impl CourseUseCases {
    pub async fn create(&self, input: CourseInput) -> Result<Course, CourseError> {
        let code = input
            .code
            .ok_or_else(|| CourseError::InvalidInput("Course code is required.".to_string()))?;

        let mut course = NewCourse::new(code)?.with_elective(input.is_elective.unwrap_or(false));
        if let Some(label) = input.label {
            course = course.with_label(label);
        }
        if let Some(semester) = input.semester {
            course = course.with_semester(Semester::new(semester)?);
        }
        if let Some(credits) = input.credits {
            course = course.with_credits(credits)?;
        }

        if self.courses.find_by_code(&course.code).await?.is_some() {
            return Err(CourseError::DuplicateCode(course.code));
        }

        let created = self.courses.create(&course).await?;
        tracing::info!(course_id = %created.id, code = %course.code, "Course created");
        Ok(created)
    }

    pub async fn get(&self, id: &CourseId) -> Result<CourseDetails, CourseError> {
        self.courses
            .get_details(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Partial update. A new semester is checked against the course's
    /// outgoing prerequisite, priorTo and parallel edges first.
    pub async fn update(&self, id: &CourseId, input: CourseInput) -> Result<Course, CourseError> {
        let current = self.courses.get(id).await?.ok_or_else(|| not_found(id))?;

        let semester = input.semester.map(Semester::new).transpose()?;
        if let Some(credits) = input.credits {
            if credits < 0 {
                return Err(CourseError::InvalidInput(
                    "Credits cannot be negative".to_string(),
                ));
            }
        }

        let violations = self.validator.validate_semester_change(id, semester).await?;
        if !violations.is_empty() {
            return Err(CourseError::Violations(violations));
        }

        let patch = CoursePatch {
            semester,
            is_elective: input.is_elective,
            credits: input.credits,
            label: input.label,
        };
        if patch.is_empty() {
            return Ok(current);
        }

        let updated = self
            .courses
            .update(id, &patch)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(course_id = %id, "Course updated");
        Ok(updated)
    }

    /// Delete the course together with every edge touching it.
    pub async fn delete(&self, id: &CourseId) -> Result<(), CourseError> {
        if !self.courses.delete(id).await? {
            return Err(not_found(id));
        }
        tracing::info!(course_id = %id, "Course deleted");
        Ok(())
    }

    /// Courses that could be linked to `id` under each semester-bound kind
    /// without breaking the semester rules.
    pub async fn eligible_relations(
        &self,
        id: &CourseId,
    ) -> Result<Vec<EligibleTargets>, CourseError> {
        if self.courses.get(id).await?.is_none() {
            return Err(not_found(id));
        }

        let mut result = Vec::new();
        for kind in RelationKind::CONSTRAINED {
            let courses = self.courses.eligible_targets(id, kind).await?;
            result.push(EligibleTargets { kind, courses });
        }
        Ok(result)
    }
}

fn not_found(id: &CourseId) -> CourseError {
    CourseError::NotFound {
        entity_type: "Course",
        id: id.to_string(),
    }
}
