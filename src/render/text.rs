//! Plain-text rendering for terminal output.

use crate::models::Course;

use super::{count_line, prerequisites_label, quantity};

const IN_SCHEDULE: char = '●';
const NOT_IN_SCHEDULE: char = '○';

/// One line per course, marked by schedule membership, followed by the count line.
///
/// Example output:
/// ```text
/// ● CS 101     Intro to Programming (CS, 3 cr) [Fall, Spring]
/// ○ MATH 201   Linear Algebra (MATH, 4 cr) [Spring] requires MATH 101
/// Showing 2 courses
/// ```
pub fn render_catalog<F>(courses: &[&Course], in_schedule: F) -> String
where
    F: Fn(&str) -> bool,
{
    let mut output = String::new();
    if courses.is_empty() {
        output.push_str("No courses found.\n");
    }
    for course in courses {
        let mark = if in_schedule(&course.id) {
            IN_SCHEDULE
        } else {
            NOT_IN_SCHEDULE
        };
        output.push(mark);
        output.push(' ');
        output.push_str(&course_line(course));
        if let Some(prereqs) = prerequisites_label(&course.prerequisites) {
            output.push_str(" requires ");
            output.push_str(&prereqs);
        }
        output.push('\n');
    }
    output.push_str(&count_line(courses.len()));
    output.push('\n');
    output
}

/// Schedule entries in insertion order with a totals line.
pub fn render_schedule(courses: &[Course], total_credits: u64) -> String {
    if courses.is_empty() {
        return "Your schedule is empty.\n".to_string();
    }

    let mut output = String::new();
    for (i, course) in courses.iter().enumerate() {
        output.push_str(&format!("{:>2}. {}\n", i + 1, course_line(course)));
    }
    output.push_str(&format!(
        "Total: {}, {}\n",
        quantity(total_credits, "credit", "credits"),
        quantity(courses.len() as u64, "course", "courses")
    ));
    output
}

fn course_line(course: &Course) -> String {
    let mut line = format!(
        "{:<10} {} ({}, {} cr)",
        course.course_code, course.title, course.department, course.credits
    );
    if !course.terms.is_empty() {
        line.push_str(&format!(" [{}]", course.terms.join(", ")));
    }
    line
}
