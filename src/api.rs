use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::ReportError;
use crate::models::Course;

/// Subdomain used by free-tier accounts.
pub const DEFAULT_SUBDOMAIN: &str = "k12";

pub const COURSE_QUERY: &str = r#"query CourseReport {
  allCourses {
    courseCode
    name
    state
    usersConnection(filter: {enrollmentStates: active}) {
      nodes {
        _id
        enrollments {
          type
          state
          grades {
            currentScore
            currentGrade
          }
        }
      }
    }
    assignmentGroupsConnection {
      nodes {
        name
        state
        assignmentsConnection {
          nodes {
            name
            pointsPossible
            state
            submissionsConnection(filter: {enrollmentTypes: StudentEnrollment}) {
              nodes {
                score
                state
                late
                missing
                excused
                user {
                  _id
                  name
                  email
                }
              }
            }
          }
        }
      }
    }
  }
}"#;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub subdomain: String,
}

impl ApiConfig {
    pub fn new(subdomain: impl Into<String>) -> ApiConfig {
        ApiConfig {
            subdomain: subdomain.into(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> ApiConfig {
        ApiConfig::new(DEFAULT_SUBDOMAIN)
    }
}

pub fn graphql_url(config: &ApiConfig) -> String {
    format!("https://{}.instructure.com/api/graphql", config.subdomain)
}

#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub url: String,
    pub body: serde_json::Value,
}

pub fn query_request(config: &ApiConfig) -> QueryRequest {
    QueryRequest {
        url: graphql_url(config),
        body: serde_json::json!({ "query": COURSE_QUERY }),
    }
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

/// Executes one course query against the upstream API. Implementations own
/// the bearer credential; the pipeline never sees it.
pub trait Transport {
    fn execute(&self, request: &QueryRequest) -> Result<ApiResponse, ReportError>;
}

/// Replays a response saved to disk, so the pipeline can run offline against
/// a payload fetched with any HTTP client.
#[derive(Debug, Clone)]
pub struct FileTransport {
    path: PathBuf,
}

impl FileTransport {
    pub fn new(path: impl Into<PathBuf>) -> FileTransport {
        FileTransport { path: path.into() }
    }
}

impl Transport for FileTransport {
    fn execute(&self, _request: &QueryRequest) -> Result<ApiResponse, ReportError> {
        let body = fs::read_to_string(&self.path)?;
        Ok(ApiResponse { status: 200, body })
    }
}

#[derive(Deserialize)]
struct Envelope {
    data: Option<CourseData>,
    #[serde(default)]
    errors: Vec<QueryError>,
}

#[derive(Deserialize)]
struct CourseData {
    #[serde(rename = "allCourses")]
    all_courses: Vec<Course>,
}

#[derive(Deserialize)]
struct QueryError {
    message: String,
}

/// Execute the course query and parse the response into course records.
///
/// A non-success status is a hard failure so the caller can tell an empty
/// gradebook apart from a fetch that never produced one.
pub fn fetch_courses(
    transport: &dyn Transport,
    config: &ApiConfig,
) -> Result<Vec<Course>, ReportError> {
    let request = query_request(config);
    let response = transport.execute(&request)?;

    match response.status {
        200 => parse_courses(&response.body),
        401 | 403 => Err(ReportError::AuthRejected {
            status: response.status,
        }),
        status => Err(ReportError::FetchFailed { status }),
    }
}

pub fn parse_courses(body: &str) -> Result<Vec<Course>, ReportError> {
    let envelope: Envelope = serde_json::from_str(body)?;

    match envelope.data {
        Some(data) => Ok(data.all_courses),
        None => {
            let reason = if envelope.errors.is_empty() {
                "response carried no course data".to_string()
            } else {
                envelope
                    .errors
                    .iter()
                    .map(|error| error.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ")
            };
            Err(ReportError::QueryRejected(reason))
        }
    }
}
