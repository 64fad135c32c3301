//! Builds the grade summary message from course and enrollment records

use crate::canvas::GradeSource;
use crate::error::Result;
use crate::models::{format_enrollment, Course};
use tracing::{debug, info, warn};

/// Rule printed under each course name
pub const SEPARATOR: &str = "------------------------------------------------";
pub const NO_COURSES: &str = "No courses found";
pub const NO_COURSE_DETAILS: &str = "No course details found";

/// Assembled message plus what went into it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    pub message: String,
    pub courses_matched: usize,
    pub courses_skipped: usize,
}

/// Walk the courses of `term_id` and join every section into one message
///
/// A course is only fetched in detail when its `enrollment_term_id` equals
/// `term_id`. A matching course without an id has no enrollments to fetch and
/// reports no details. Once a course has enrollments, a missing course `name`
/// or an enrollment missing `user` or `grades` aborts the assembly.
pub async fn assemble_message(source: &dyn GradeSource, term_id: i64) -> Result<Assembly> {
    let courses = source.courses().await;
    let mut lines = Vec::new();
    let mut courses_matched = 0;
    let mut courses_skipped = 0;

    if courses.is_empty() {
        lines.push(NO_COURSES.to_string());
    }

    for raw in &courses {
        if Course::term_id(raw) != Some(term_id) {
            courses_skipped += 1;
            continue;
        }

        courses_matched += 1;

        let id = Course::id(raw);
        let enrollments = match &id {
            Some(id) => source.enrollments(id).await,
            None => {
                warn!("Course in term {} has no id, skipping enrollment fetch", term_id);
                Vec::new()
            }
        };
        if enrollments.is_empty() {
            debug!("No enrollments returned for course {:?}", id);
            lines.push(NO_COURSE_DETAILS.to_string());
            continue;
        }

        // Format the whole section first so a bad record leaves no partial header
        let name = Course::name(raw)?;
        let section = enrollments.iter().map(format_enrollment).collect::<Result<Vec<_>>>()?;

        lines.push(format!("\nCourse Name: {}\n{}", name, SEPARATOR));
        lines.extend(section);
    }

    info!(
        "Assembled grade summary: {} course(s) in term {}, {} skipped",
        courses_matched, term_id, courses_skipped
    );

    Ok(Assembly { message: lines.join("\n"), courses_matched, courses_skipped })
}
