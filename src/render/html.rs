//! HTML fragments for the browser surface.
//!
//! Each `*_region` function returns one element with a stable `id`; the page
//! script swaps regions by id when a form submission returns them.

use crate::catalog::CatalogState;
use crate::filter::{Filter, FilterState, ALL};
use crate::models::Course;
use crate::schedule::ScheduleStore;
use crate::storage::KeyValueStore;

use super::{count_line, prerequisites_label, quantity, PanelState};

pub const CATALOG_REGION_ID: &str = "catalog";
pub const SCHEDULE_REGION_ID: &str = "schedule";

pub const LOAD_ERROR_MESSAGE: &str = "Error loading courses. Please refresh the page.";

const STYLESHEET: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f5f6f8; color: #222; }
header { display: flex; justify-content: space-between; align-items: center; padding: 1rem 2rem; background: #1f3a5f; color: #fff; }
.toolbar { display: flex; gap: 1rem; align-items: center; padding: 1rem 2rem; }
.course-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(320px, 1fr)); gap: 1rem; padding: 0 2rem 2rem; }
.course-card { background: #fff; border-radius: 8px; padding: 1rem; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
.course-card.in-schedule { outline: 2px solid #2e7d32; }
.term-badge { display: inline-block; padding: 0 .5rem; margin-right: .25rem; border-radius: 4px; background: #e3ecf7; }
.no-prereq { color: #888; font-style: italic; }
.no-results, .loading { padding: 2rem; text-align: center; }
.schedule-panel { position: fixed; top: 0; right: 0; width: 360px; height: 100%; background: #fff; box-shadow: -2px 0 6px rgba(0,0,0,.15); overflow-y: auto; padding: 1rem; }
.schedule-panel.hidden { display: none; }
.schedule-count { background: #e53935; color: #fff; border-radius: 999px; padding: 0 .5rem; }
"#;

const SCRIPT: &str = r#"
document.addEventListener('submit', async (event) => {
    const form = event.target;
    if (form.dataset.confirm && !window.confirm(form.dataset.confirm)) {
        event.preventDefault();
        return;
    }
    event.preventDefault();
    const response = await fetch(form.action, { method: 'POST', body: new URLSearchParams(new FormData(form)) });
    if (!response.ok) { return; }
    const template = document.createElement('template');
    template.innerHTML = await response.text();
    for (const region of template.content.children) {
        const current = document.getElementById(region.id);
        if (current) { current.replaceWith(region.cloneNode(true)); }
    }
});
document.addEventListener('change', (event) => {
    if (event.target.id === 'departmentFilter') { event.target.form.requestSubmit(); }
});
"#;

/// Escapes text for use in element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Percent-encodes a course id for use as a single URL path segment.
pub fn path_segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

pub fn department_selector(departments: &[String], selection: &Filter) -> String {
    let mut html = String::from(
        r#"<form class="department-form" method="post" action="/filter"><label for="departmentFilter">Department:</label> <select id="departmentFilter" name="department">"#,
    );
    html.push_str(&option(ALL, "All Departments", *selection == Filter::All));
    for dept in departments {
        let selected = matches!(selection, Filter::Department(d) if d == dept);
        html.push_str(&option(dept, dept, selected));
    }
    html.push_str("</select></form>");
    html
}

fn option(value: &str, label: &str, selected: bool) -> String {
    format!(
        r#"<option value="{}"{}>{}</option>"#,
        escape(value),
        if selected { " selected" } else { "" },
        escape(label)
    )
}

pub fn course_card(course: &Course, in_schedule: bool) -> String {
    let terms: String = course
        .terms
        .iter()
        .map(|term| format!(r#"<span class="term-badge">{}</span>"#, escape(term)))
        .collect();

    let prerequisites = match prerequisites_label(&course.prerequisites) {
        Some(list) => escape(&list),
        None => r#"<span class="no-prereq">None</span>"#.to_string(),
    };

    let (card_class, button_label) = if in_schedule {
        ("course-card in-schedule", "Remove from Schedule")
    } else {
        ("course-card", "Add to Schedule")
    };

    format!(
        r#"<div class="{card_class}" data-course-id="{id}">
<div class="course-header"><div class="course-code">{code}</div><h2 class="course-title">{title}</h2></div>
<div class="course-meta"><span class="department-tag">{department}</span> <span class="meta-item"><strong>Credits:</strong> {credits}</span> <span class="meta-item"><strong>Level:</strong> {level}</span></div>
<p class="course-description">{description}</p>
<div class="course-details">
<div class="detail-row"><span class="detail-label">Terms Offered:</span><div class="terms">{terms}</div></div>
<div class="detail-row"><span class="detail-label">Prerequisites:</span><span class="prerequisites">{prerequisites}</span></div>
</div>
<form method="post" action="/schedule/toggle/{segment}"><button type="submit" class="schedule-toggle{active}" aria-pressed="{in_schedule}">{button_label}</button></form>
</div>"#,
        id = escape(&course.id),
        code = escape(&course.course_code),
        title = escape(&course.title),
        department = escape(&course.department),
        credits = course.credits,
        level = escape(&course.level),
        description = escape(&course.description),
        segment = path_segment(&course.id),
        active = if in_schedule { " active" } else { "" },
    )
}

/// The card grid, or the no-results placeholder when `visible` is empty.
pub fn catalog_grid<S: KeyValueStore>(visible: &[&Course], schedule: &ScheduleStore<S>) -> String {
    if visible.is_empty() {
        return r#"<div id="courseList" class="course-grid"><div class="no-results"><h2>No Courses Found</h2><p>Try selecting a different department.</p></div></div>"#.to_string();
    }

    let cards: Vec<String> = visible
        .iter()
        .map(|course| course_card(course, schedule.contains(&course.id)))
        .collect();
    format!(
        r#"<div id="courseList" class="course-grid">{}</div>"#,
        cards.join("\n")
    )
}

/// Department selector, count line and grid. Loading and failure states
/// replace the whole area.
pub fn catalog_region<S: KeyValueStore>(
    catalog: &CatalogState,
    filter: &FilterState,
    schedule: &ScheduleStore<S>,
) -> String {
    let body = match catalog {
        CatalogState::Loading => {
            r#"<div id="courseList" class="course-grid"><div class="loading">Loading courses...</div></div>"#
                .to_string()
        }
        CatalogState::Failed(_) => format!(
            r#"<div id="courseList" class="course-grid"><div class="loading">{}</div></div>"#,
            LOAD_ERROR_MESSAGE
        ),
        CatalogState::Loaded(catalog) => {
            let visible = filter.visible_courses(catalog);
            format!(
                r#"<div class="toolbar">{}<p id="courseCount" class="course-count">{}</p></div>{}"#,
                department_selector(catalog.departments(), filter.selection()),
                count_line(visible.len()),
                catalog_grid(&visible, schedule)
            )
        }
    };

    format!(r#"<section id="{CATALOG_REGION_ID}">{body}</section>"#)
}

/// Panel toggle with count badge, and the panel itself.
pub fn schedule_region<S: KeyValueStore>(schedule: &ScheduleStore<S>, panel: PanelState) -> String {
    let count = schedule.count();
    let mut html = format!(
        r#"<div id="{SCHEDULE_REGION_ID}"><form method="post" action="/panel/toggle"><button type="submit" class="schedule-button">My Schedule <span class="schedule-count">{count}</span></button></form>"#
    );

    html.push_str(&format!(
        r#"<aside class="schedule-panel {}"><div class="schedule-header"><h2>My Schedule</h2><form method="post" action="/panel/close"><button type="submit" class="close-panel" aria-label="Close">&times;</button></form></div>"#,
        if panel.is_shown() { "open" } else { "hidden" }
    ));

    html.push_str(&format!(
        r#"<div class="schedule-summary"><span class="total-credits">{}</span> <span class="total-courses">{}</span></div>"#,
        quantity(schedule.total_credits(), "credit", "credits"),
        quantity(count as u64, "course", "courses")
    ));

    if schedule.is_empty() {
        html.push_str(r#"<div class="schedule-empty"><p>Your schedule is empty.</p><p>Add courses from the catalog to get started.</p></div>"#);
    } else {
        html.push_str(r#"<ul class="schedule-list">"#);
        for course in schedule.courses() {
            html.push_str(&format!(
                r#"<li class="schedule-item" data-course-id="{id}"><div class="schedule-item-info"><span class="course-code">{code}</span> <span class="course-title">{title}</span> <span class="meta-item">{credits}</span></div><form method="post" action="/schedule/remove/{segment}"><button type="submit" class="remove-course">Remove</button></form></li>"#,
                id = escape(&course.id),
                code = escape(&course.course_code),
                title = escape(&course.title),
                credits = quantity(u64::from(course.credits), "credit", "credits"),
                segment = path_segment(&course.id),
            ));
        }
        html.push_str("</ul>");
    }

    html.push_str(&format!(
        r#"<form method="post" action="/schedule/clear" data-confirm="Clear all courses from your schedule?"><input type="hidden" name="confirm" value="true"><button type="submit" class="clear-schedule"{}>Clear Schedule</button></form>"#,
        if schedule.is_empty() { " disabled" } else { "" }
    ));
    html.push_str("</aside></div>");
    html
}

/// The complete document.
pub fn page<S: KeyValueStore>(
    catalog: &CatalogState,
    filter: &FilterState,
    schedule: &ScheduleStore<S>,
    panel: PanelState,
) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Course Catalog</title>
<style>{STYLESHEET}</style>
</head>
<body>
<header><h1>Course Catalog</h1>{schedule}</header>
<main>{catalog}</main>
<script>{SCRIPT}</script>
</body>
</html>
"#,
        schedule = schedule_region(schedule, panel),
        catalog = catalog_region(catalog, filter, schedule),
    )
}
