//! Domain → wire type conversions.

use curricula_domain::{
    CatalogEntry, ClassGroup, Course, CourseDetails, CourseSummary, Relation, RelationSummary,
    UserCourse,
};
use curricula_shared::{
    CatalogEntryData, CourseData, CourseDetailsData, EligibleCourseData, OntologyAncestorData,
    OntologyChildData, OntologyGroupData, RelationData, SearchHit, UserCourseData,
};

use crate::use_cases::search::CourseMatch;

pub fn course_data(course: &Course) -> CourseData {
    CourseData {
        course_id: course.id.to_string(),
        code: course.code.clone(),
        label: course.label.clone(),
        semester: course.semester.map(|s| s.value()),
        is_elective: course.is_elective,
        credits: course.credits,
    }
}

fn relation_summary_data(relation: &RelationSummary) -> RelationData {
    RelationData {
        relation_id: relation.relation_id.to_string(),
        relation_type: relation.relation_type.clone(),
        target_id: relation.target_id.to_string(),
        label: Some(relation.target_label.clone()),
    }
}

pub fn relation_data(relation: &Relation) -> RelationData {
    RelationData {
        relation_id: relation.id.to_string(),
        relation_type: relation.relation_type.clone(),
        target_id: relation.target.to_string(),
        label: None,
    }
}

pub fn course_details_data(details: &CourseDetails) -> CourseDetailsData {
    CourseDetailsData {
        course: course_data(&details.course),
        relations: details.relations.iter().map(relation_summary_data).collect(),
    }
}

pub fn catalog_entry_data(entry: &CatalogEntry) -> CatalogEntryData {
    CatalogEntryData {
        details: course_details_data(&entry.details),
        course_status: entry.course_status.clone(),
    }
}

pub fn eligible_course_data(course: &CourseSummary) -> EligibleCourseData {
    EligibleCourseData {
        course_id: course.course_id.to_string(),
        code: course.code.clone(),
        label: course.label.clone(),
    }
}

pub fn ontology_group_data(group: &ClassGroup) -> OntologyGroupData {
    OntologyGroupData {
        ancestor: OntologyAncestorData {
            ancestor_id: group.ancestor.id.to_string(),
            ancestor_label: group.ancestor.label.clone(),
        },
        children: group
            .children
            .iter()
            .map(|child| OntologyChildData {
                child_id: child.id.to_string(),
                child_label: child.label.clone(),
            })
            .collect(),
    }
}

pub fn user_course_data(record: &UserCourse) -> UserCourseData {
    UserCourseData {
        user_course_id: record.id.to_string(),
        user_id: record.user_id.to_string(),
        course_id: record.course_id.to_string(),
        status: record.status.as_ref().map(|s| s.as_str().to_string()),
        updated_at: record.updated_at.map(|t| t.to_rfc3339()),
    }
}

pub fn search_hit(hit: CourseMatch) -> SearchHit {
    SearchHit {
        course_id: hit.course_id.into_inner(),
        code: hit.code,
        label: Some(hit.label),
        similarity: hit.similarity,
    }
}
