use serde::Deserialize;

/// One page of a GraphQL connection; the upstream API wraps every list in a
/// `nodes` object.
#[derive(Debug, Clone, Deserialize)]
pub struct Connection<T> {
    pub nodes: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub course_code: String,
    pub name: String,
    pub state: String,
    #[serde(rename = "usersConnection")]
    pub users: Connection<CourseUser>,
    #[serde(rename = "assignmentGroupsConnection")]
    pub assignment_groups: Connection<AssignmentGroup>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CourseUser {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub enrollments: Vec<Enrollment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Enrollment {
    #[serde(rename = "type")]
    pub kind: String,
    pub state: String,
    pub grades: Option<GradeSnapshot>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeSnapshot {
    pub current_score: Option<f64>,
    pub current_grade: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignmentGroup {
    pub name: String,
    pub state: String,
    #[serde(rename = "assignmentsConnection")]
    pub assignments: Connection<Assignment>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub name: String,
    pub points_possible: Option<f64>,
    pub state: String,
    #[serde(rename = "submissionsConnection")]
    pub submissions: Connection<Submission>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Submission {
    pub score: Option<f64>,
    pub state: String,
    #[serde(default)]
    pub late: bool,
    #[serde(default)]
    pub missing: bool,
    #[serde(default)]
    pub excused: bool,
    pub user: SubmissionUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: Option<String>,
}

/// One denormalized row per submission, ready for projection.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRow {
    pub course_code: String,
    pub course_name: String,
    pub student_name: String,
    pub student_email: Option<String>,
    pub assignment_group: String,
    pub assignment_name: String,
    pub late: bool,
    pub missing: bool,
    pub excused: bool,
    pub points_possible: Option<f64>,
    pub score: Option<f64>,
    pub overall_score: Option<f64>,
    pub overall_grade: Option<String>,
}
