use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::ReportError;
use crate::models::SubmissionRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldType {
    Text,
    Boolean,
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Aggregation {
    Avg,
}

/// A single reportable cell value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl Value {
    fn text(value: &str) -> Value {
        Value::Text(value.to_string())
    }

    fn opt_text(value: Option<&str>) -> Value {
        value.map(Value::text).unwrap_or(Value::Null)
    }

    fn number(value: Option<f64>) -> Value {
        value.map(Value::Number).unwrap_or(Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(value) => f.write_str(value),
            Value::Number(value) => write!(f, "{value}"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Null => Ok(()),
        }
    }
}

/// Metadata for one reportable column together with its accessor into a
/// flattened submission row.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub field_type: FieldType,
    pub aggregation: Option<Aggregation>,
    extract: fn(&SubmissionRow) -> Value,
}

impl FieldDescriptor {
    fn dimension(
        id: &'static str,
        name: &'static str,
        field_type: FieldType,
        extract: fn(&SubmissionRow) -> Value,
    ) -> FieldDescriptor {
        FieldDescriptor {
            id,
            name,
            field_type,
            aggregation: None,
            extract,
        }
    }

    fn metric(
        id: &'static str,
        name: &'static str,
        extract: fn(&SubmissionRow) -> Value,
    ) -> FieldDescriptor {
        FieldDescriptor {
            id,
            name,
            field_type: FieldType::Number,
            aggregation: Some(Aggregation::Avg),
            extract,
        }
    }

    pub fn value(&self, row: &SubmissionRow) -> Value {
        (self.extract)(row)
    }
}

impl Serialize for FieldDescriptor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("FieldDescriptor", 4)?;
        state.serialize_field("id", self.id)?;
        state.serialize_field("name", self.name)?;
        state.serialize_field("type", &self.field_type)?;
        state.serialize_field("aggregation", &self.aggregation)?;
        state.end()
    }
}

/// Every reportable field in declaration order. Declaration order is the
/// default column order when the caller does not request a subset.
pub fn catalog() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::dimension("courseCode", "Course Code", FieldType::Text, |row| {
            Value::text(&row.course_code)
        }),
        FieldDescriptor::dimension("courseName", "Course Name", FieldType::Text, |row| {
            Value::text(&row.course_name)
        }),
        FieldDescriptor::dimension("studentName", "Student Name", FieldType::Text, |row| {
            Value::text(&row.student_name)
        }),
        FieldDescriptor::dimension("studentEmail", "Student Email", FieldType::Text, |row| {
            Value::opt_text(row.student_email.as_deref())
        }),
        FieldDescriptor::dimension("assignmentGroup", "Assignment Group", FieldType::Text, |row| {
            Value::text(&row.assignment_group)
        }),
        FieldDescriptor::dimension("assignmentName", "Assignment Name", FieldType::Text, |row| {
            Value::text(&row.assignment_name)
        }),
        FieldDescriptor::dimension("assignmentIsLate", "Assignment is Late", FieldType::Boolean, |row| {
            Value::Bool(row.late)
        }),
        FieldDescriptor::dimension(
            "assignmentIsMissing",
            "Assignment is Missing",
            FieldType::Boolean,
            |row| Value::Bool(row.missing),
        ),
        FieldDescriptor::dimension(
            "assignmentIsExcused",
            "Assignment is Excused",
            FieldType::Boolean,
            |row| Value::Bool(row.excused),
        ),
        FieldDescriptor::metric("assignmentPointsPossible", "Assignment Points Possible", |row| {
            Value::number(row.points_possible)
        }),
        FieldDescriptor::metric("studentAssignmentScore", "Student Assignment Score", |row| {
            Value::number(row.score)
        }),
        FieldDescriptor::metric("studentOverallScore", "Student Overall Score", |row| {
            Value::number(row.overall_score)
        }),
        FieldDescriptor::dimension(
            "studentOverallGrade",
            "Student Overall Grade",
            FieldType::Text,
            |row| Value::opt_text(row.overall_grade.as_deref()),
        ),
    ]
}

/// Resolve a requested id list against the catalog, keeping the caller's
/// order.
pub fn select(ids: &[&str]) -> Result<Vec<FieldDescriptor>, ReportError> {
    let all = catalog();

    ids.iter()
        .map(|id| {
            all.iter()
                .find(|field| field.id == *id)
                .copied()
                .ok_or_else(|| ReportError::UnknownField {
                    id: (*id).to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_declares_thirteen_fields_in_order() {
        let ids: Vec<&str> = catalog().iter().map(|field| field.id).collect();
        assert_eq!(
            ids,
            vec![
                "courseCode",
                "courseName",
                "studentName",
                "studentEmail",
                "assignmentGroup",
                "assignmentName",
                "assignmentIsLate",
                "assignmentIsMissing",
                "assignmentIsExcused",
                "assignmentPointsPossible",
                "studentAssignmentScore",
                "studentOverallScore",
                "studentOverallGrade",
            ]
        );
    }

    #[test]
    fn metrics_are_numbers_aggregated_by_avg() {
        for field in catalog() {
            match field.aggregation {
                Some(Aggregation::Avg) => assert_eq!(field.field_type, FieldType::Number),
                None => assert!(matches!(
                    field.field_type,
                    FieldType::Text | FieldType::Boolean
                )),
            }
        }
        let metric_count = catalog()
            .iter()
            .filter(|field| field.aggregation.is_some())
            .count();
        assert_eq!(metric_count, 3);
    }

    #[test]
    fn select_reorders_to_the_requested_order() {
        let fields = select(&["studentOverallGrade", "courseCode", "assignmentIsLate"]).unwrap();
        let ids: Vec<&str> = fields.iter().map(|field| field.id).collect();
        assert_eq!(ids, vec!["studentOverallGrade", "courseCode", "assignmentIsLate"]);
    }

    #[test]
    fn select_rejects_unknown_ids() {
        let err = select(&["courseCode", "gpa"]).unwrap_err();
        match err {
            ReportError::UnknownField { id } => assert_eq!(id, "gpa"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn schema_serializes_id_name_type_and_aggregation() {
        let fields = select(&["courseCode", "studentOverallScore"]).unwrap();
        let schema = serde_json::to_value(&fields).unwrap();
        assert_eq!(schema[0]["id"], "courseCode");
        assert_eq!(schema[0]["name"], "Course Code");
        assert_eq!(schema[0]["type"], "TEXT");
        assert_eq!(schema[0]["aggregation"], serde_json::Value::Null);
        assert_eq!(schema[1]["type"], "NUMBER");
        assert_eq!(schema[1]["aggregation"], "AVG");
    }

    #[test]
    fn values_render_for_csv_and_json() {
        assert_eq!(Value::Text("CS101".to_string()).to_string(), "CS101");
        assert_eq!(Value::Number(10.0).to_string(), "10");
        assert_eq!(Value::Number(9.5).to_string(), "9.5");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::Null.to_string(), "");

        assert_eq!(
            serde_json::to_value(Value::Number(95.0)).unwrap(),
            serde_json::json!(95.0)
        );
        assert_eq!(
            serde_json::to_value(Value::Null).unwrap(),
            serde_json::Value::Null
        );
    }
}
