use crate::models::{Course, SubmissionRow};
use crate::scores::ScoreIndex;

pub const AVAILABLE_GROUP: &str = "available";
pub const PUBLISHED_ASSIGNMENT: &str = "published";

/// Walk course -> assignment group -> assignment -> submission and emit one
/// row per submission under a published assignment in an available group.
/// Row order is traversal order; nothing is sorted or deduplicated.
///
/// Submissions are not filtered by their own state; every submission under a
/// qualifying assignment counts, graded or not.
pub fn flatten(courses: &[Course], scores: &ScoreIndex) -> Vec<SubmissionRow> {
    let mut rows = Vec::new();

    for course in courses {
        for group in &course.assignment_groups.nodes {
            if group.state != AVAILABLE_GROUP {
                continue;
            }
            for assignment in &group.assignments.nodes {
                if assignment.state != PUBLISHED_ASSIGNMENT {
                    continue;
                }
                for submission in &assignment.submissions.nodes {
                    // Students without an active enrollment resolve to null
                    // overall fields, never an error.
                    let overall = scores.get(&submission.user.id);

                    rows.push(SubmissionRow {
                        course_code: course.course_code.clone(),
                        course_name: course.name.clone(),
                        student_name: submission.user.name.clone(),
                        student_email: submission.user.email.clone(),
                        assignment_group: group.name.clone(),
                        assignment_name: assignment.name.clone(),
                        late: submission.late,
                        missing: submission.missing,
                        excused: submission.excused,
                        points_possible: assignment.points_possible,
                        score: submission.score,
                        overall_score: overall.and_then(|grades| grades.current_score),
                        overall_grade: overall.and_then(|grades| grades.current_grade.clone()),
                    });
                }
            }
        }
    }

    rows
}
