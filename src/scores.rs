use std::collections::HashMap;

use crate::models::{Course, GradeSnapshot};

pub const STUDENT_ENROLLMENT: &str = "StudentEnrollment";
pub const ACTIVE_ENROLLMENT: &str = "active";

pub type ScoreIndex = HashMap<String, GradeSnapshot>;

/// Build the per-student overall score lookup from enrollment data.
///
/// When a student holds more than one active student enrollment the snapshot
/// listed last in the payload wins; the upstream API does not guarantee
/// enrollment order, so which one that is stays undefined.
pub fn build_score_index(courses: &[Course]) -> ScoreIndex {
    let mut index = ScoreIndex::new();

    for course in courses {
        for user in &course.users.nodes {
            for enrollment in &user.enrollments {
                if enrollment.kind == STUDENT_ENROLLMENT && enrollment.state == ACTIVE_ENROLLMENT {
                    index.insert(user.id.clone(), enrollment.grades.clone().unwrap_or_default());
                }
            }
        }
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Connection, Course, CourseUser, Enrollment, GradeSnapshot};

    fn course_with_users(users: Vec<CourseUser>) -> Course {
        Course {
            course_code: "CS101".to_string(),
            name: "Intro to Computer Science".to_string(),
            state: "available".to_string(),
            users: Connection { nodes: users },
            assignment_groups: Connection { nodes: vec![] },
        }
    }

    fn user(id: &str, enrollments: Vec<Enrollment>) -> CourseUser {
        CourseUser {
            id: id.to_string(),
            enrollments,
        }
    }

    fn enrollment(kind: &str, state: &str, score: f64, grade: &str) -> Enrollment {
        Enrollment {
            kind: kind.to_string(),
            state: state.to_string(),
            grades: Some(GradeSnapshot {
                current_score: Some(score),
                current_grade: Some(grade.to_string()),
            }),
        }
    }

    #[test]
    fn includes_only_active_student_enrollments() {
        let course = course_with_users(vec![
            user("1", vec![enrollment(STUDENT_ENROLLMENT, ACTIVE_ENROLLMENT, 95.0, "A")]),
            user("2", vec![enrollment("TeacherEnrollment", ACTIVE_ENROLLMENT, 80.0, "B")]),
            user("3", vec![enrollment(STUDENT_ENROLLMENT, "completed", 70.0, "C")]),
        ]);

        let index = build_score_index(&[course]);
        assert_eq!(index.len(), 1);
        assert_eq!(index["1"].current_score, Some(95.0));
        assert_eq!(index["1"].current_grade.as_deref(), Some("A"));
    }

    #[test]
    fn last_qualifying_enrollment_wins() {
        let course = course_with_users(vec![user(
            "1",
            vec![
                enrollment(STUDENT_ENROLLMENT, ACTIVE_ENROLLMENT, 60.0, "D"),
                enrollment(STUDENT_ENROLLMENT, "invited", 99.0, "A+"),
                enrollment(STUDENT_ENROLLMENT, ACTIVE_ENROLLMENT, 88.0, "B+"),
            ],
        )]);

        let index = build_score_index(&[course]);
        assert_eq!(index.len(), 1);
        assert_eq!(index["1"].current_score, Some(88.0));
        assert_eq!(index["1"].current_grade.as_deref(), Some("B+"));
    }

    #[test]
    fn same_input_builds_the_same_index() {
        let courses = vec![course_with_users(vec![
            user("1", vec![enrollment(STUDENT_ENROLLMENT, ACTIVE_ENROLLMENT, 95.0, "A")]),
            user("2", vec![enrollment(STUDENT_ENROLLMENT, ACTIVE_ENROLLMENT, 72.5, "C")]),
        ])];

        let first = build_score_index(&courses);
        let second = build_score_index(&courses);
        assert_eq!(first, second);
    }

    #[test]
    fn missing_grade_snapshot_becomes_an_empty_snapshot() {
        let course = course_with_users(vec![user(
            "1",
            vec![Enrollment {
                kind: STUDENT_ENROLLMENT.to_string(),
                state: ACTIVE_ENROLLMENT.to_string(),
                grades: None,
            }],
        )]);

        let index = build_score_index(&[course]);
        assert_eq!(index["1"].current_score, None);
        assert_eq!(index["1"].current_grade, None);
    }
}
