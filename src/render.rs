//! Plain-text tables for the CLI.
//!
//! Rows are numbered from 1, and those numbers are what the CLI accepts as
//! positions.

use crate::models::{Configuration, Resource, ResourceDraft, StoryPointMappingRow};

const RESOURCE_HEADERS: [&str; 11] = [
    "#",
    "Name",
    "Role",
    "Location",
    "Hrs/day",
    "Workdays",
    "Leaves",
    "Avail days",
    "Avail hrs",
    "Man-days",
    "Points",
];

/// Render `rows` under `headers` with every column padded to its widest cell.
///
/// Example output:
/// ```text
/// #  Location  Days
/// -  --------  ----
/// 1  Pune      10
/// ```
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut output = String::new();
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    push_row(&mut output, &header_cells, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut output, &rule, &widths);
    for row in rows {
        push_row(&mut output, row, &widths);
    }
    output
}

fn push_row(output: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ");
    output.push_str(line.trim_end());
    output.push('\n');
}

pub fn render_configs(configs: &[Configuration]) -> String {
    if configs.is_empty() {
        return "No configurations.\n".to_string();
    }
    let rows: Vec<Vec<String>> = configs
        .iter()
        .enumerate()
        .map(|(i, c)| {
            vec![
                (i + 1).to_string(),
                c.work_location.clone(),
                c.available_days_per_sprint.to_string(),
                c.default_working_hours_per_day.to_string(),
                c.public_holidays.to_string(),
            ]
        })
        .collect();
    render_table(&["#", "Location", "Days", "Hrs/day", "Holidays"], &rows)
}

pub fn render_mapping(mapping: &[StoryPointMappingRow]) -> String {
    if mapping.is_empty() {
        return "Story point mapping is empty.\n".to_string();
    }
    let rows: Vec<Vec<String>> = mapping
        .iter()
        .enumerate()
        .map(|(i, r)| vec![(i + 1).to_string(), r.days.to_string(), r.points.to_string()])
        .collect();
    render_table(&["#", "Days", "Points"], &rows)
}

pub fn render_resources(resources: &[Resource]) -> String {
    if resources.is_empty() {
        return "No resources.\n".to_string();
    }
    let rows: Vec<Vec<String>> = resources
        .iter()
        .enumerate()
        .map(|(i, r)| draft_cells((i + 1).to_string(), &r.fields))
        .collect();

    let mut output = render_table(&RESOURCE_HEADERS, &rows);
    let total_points = resources
        .iter()
        .fold(0i64, |acc, r| acc.saturating_add(r.fields.story_points));
    let total_man_days = resources
        .iter()
        .fold(0i64, |acc, r| acc.saturating_add(r.fields.total_available_capacity));
    output.push_str(&format!(
        "\nTotal: {} man-days, {} story points\n",
        total_man_days, total_points
    ));
    output
}

/// A single draft, as shown before it is saved.
pub fn render_draft(draft: &ResourceDraft) -> String {
    render_table(&RESOURCE_HEADERS, &[draft_cells("-".to_string(), draft)])
}

fn draft_cells(label: String, d: &ResourceDraft) -> Vec<String> {
    vec![
        label,
        d.resource_name.clone(),
        d.role.clone(),
        d.location.clone(),
        d.max_capacity_per_day.to_string(),
        d.workdays_per_sprint.to_string(),
        d.leaves.to_string(),
        d.available_days.to_string(),
        d.total_available_hours.to_string(),
        d.total_available_capacity.to_string(),
        d.story_points.to_string(),
    ]
}
