use std::collections::BTreeMap;
use std::fmt::Write;
use std::io;

use chrono::Utc;

use crate::api::{self, ApiConfig, Transport};
use crate::error::ReportError;
use crate::fields::{self, FieldDescriptor, Value};
use crate::flatten::{self, AVAILABLE_GROUP, PUBLISHED_ASSIGNMENT};
use crate::models::Course;
use crate::project;
use crate::scores;

/// The two artifacts a reporting tool consumes: an ordered schema and rows
/// aligned to it.
#[derive(Debug)]
pub struct GradebookReport {
    pub fields: Vec<FieldDescriptor>,
    pub rows: Vec<Vec<Value>>,
}

pub fn build_report(courses: &[Course], fields: Vec<FieldDescriptor>) -> GradebookReport {
    // Overall scores live in a sibling subtree with no guaranteed emission
    // order, so the index is fully built before the first row is emitted.
    let score_index = scores::build_score_index(courses);
    let flat = flatten::flatten(courses, &score_index);
    let rows = project::project(&flat, &fields);

    GradebookReport { fields, rows }
}

/// Fetch, flatten, and project in one pass. `requested` narrows and orders
/// the columns; `None` means the full catalog in declaration order.
pub fn run_report(
    transport: &dyn Transport,
    config: &ApiConfig,
    requested: Option<&[&str]>,
) -> Result<GradebookReport, ReportError> {
    let fields = match requested {
        Some(ids) => fields::select(ids)?,
        None => fields::catalog(),
    };
    let courses = api::fetch_courses(transport, config)?;
    Ok(build_report(&courses, fields))
}

pub fn write_csv<W: io::Write>(report: &GradebookReport, out: W) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    writer.write_record(report.fields.iter().map(|field| field.id))?;
    for row in &report.rows {
        writer.write_record(row.iter().map(|value| value.to_string()))?;
    }
    writer.flush()?;

    Ok(())
}

pub fn to_json(report: &GradebookReport) -> serde_json::Value {
    serde_json::json!({
        "schema": report.fields,
        "rows": report.rows,
    })
}

/// Markdown digest of a course payload: per-course coverage plus the data
/// quality flags a report consumer should know about before trusting the
/// numbers.
pub fn build_summary(courses: &[Course]) -> String {
    let score_index = scores::build_score_index(courses);

    let mut output = String::new();
    let _ = writeln!(output, "# Gradebook Export Summary");
    let _ = writeln!(
        output,
        "Generated {} from {} courses",
        Utc::now().date_naive(),
        courses.len()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Courses");

    if courses.is_empty() {
        let _ = writeln!(output, "No courses in this payload.");
    }

    let mut total_rows = 0usize;
    let mut unmatched = 0usize;
    let mut late = 0usize;
    let mut missing = 0usize;
    let mut excused = 0usize;
    let mut submission_states: BTreeMap<String, usize> = BTreeMap::new();

    for course in courses {
        let mut assignments = 0usize;
        let mut submissions = 0usize;
        let mut scored = 0usize;
        let mut score_total = 0.0f64;

        for group in &course.assignment_groups.nodes {
            if group.state != AVAILABLE_GROUP {
                continue;
            }
            for assignment in &group.assignments.nodes {
                if assignment.state != PUBLISHED_ASSIGNMENT {
                    continue;
                }
                assignments += 1;
                for submission in &assignment.submissions.nodes {
                    submissions += 1;
                    *submission_states.entry(submission.state.clone()).or_insert(0) += 1;
                    if submission.late {
                        late += 1;
                    }
                    if submission.missing {
                        missing += 1;
                    }
                    if submission.excused {
                        excused += 1;
                    }
                    if !score_index.contains_key(&submission.user.id) {
                        unmatched += 1;
                    }
                    if let Some(score) = submission.score {
                        scored += 1;
                        score_total += score;
                    }
                }
            }
        }

        total_rows += submissions;

        if scored == 0 {
            let _ = writeln!(
                output,
                "- {} {} ({}): {} submissions across {} published assignments",
                course.course_code, course.name, course.state, submissions, assignments
            );
        } else {
            let _ = writeln!(
                output,
                "- {} {} ({}): {} submissions across {} published assignments (avg score {:.1})",
                course.course_code,
                course.name,
                course.state,
                submissions,
                assignments,
                score_total / scored as f64
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Data Quality");
    let _ = writeln!(output, "- {total_rows} report rows in total");
    let _ = writeln!(
        output,
        "- {unmatched} submissions from students without an active enrollment"
    );
    let _ = writeln!(output, "- {late} late, {missing} missing, {excused} excused");

    if !submission_states.is_empty() {
        let states = submission_states
            .iter()
            .map(|(state, count)| format!("{state} {count}"))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(output, "- submission states: {states}");
    }

    output
}
