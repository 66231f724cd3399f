//! Terminal output: the current screen and the command result tables.

use std::collections::BTreeSet;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use portal_model::{
    AssessmentRecord, DegreeLevel, Pattern, Question, Resource, ResourceId, ResourceType,
    Submission, semester_options,
};
use portal_nav::{Catalog, Section, View, trail_text};
use portal_session::{Backend, Session, WriteReport};

/// Title of the synthetic row shown in place of an empty list.
pub const PLACEHOLDER_TITLE: &str = "sample";

/// Print the breadcrumbs and body of the session's current view.
pub fn print_screen<B: Backend>(session: &mut Session<B>, show_placeholder: bool) {
    let visible: Vec<Resource> = session.visible().into_iter().cloned().collect();
    let view = session.nav().view;
    println!("{}", trail_text(&session.breadcrumbs()));
    println!("== {} ==", view.title());

    match view {
        View::List => {
            let saved = session.saved_ids();
            let table = resource_table(&visible, session.catalog(), &saved, show_placeholder);
            println!("{table}");
            let years = session.available_years();
            if !years.is_empty() {
                let years: Vec<String> = years.iter().map(u16::to_string).collect();
                println!("Years: {}", years.join(", "));
            }
        }
        View::Profile => {
            let saved = session.saved_ids();
            println!(
                "{}",
                resource_table(&visible, session.catalog(), &saved, false)
            );
        }
        _ => print_options(session, view),
    }
}

/// Choices offered on a drill-down step.
fn print_options<B: Backend>(session: &Session<B>, view: View) {
    let options: Vec<(String, String)> = match view {
        View::Subjects => session
            .catalog()
            .subjects()
            .iter()
            .map(|subject| (subject.id.to_string(), subject.name.clone()))
            .chain([("all".to_string(), "All Subjects".to_string())])
            .collect(),
        View::Patterns => Pattern::ALL
            .iter()
            .map(|p| (p.as_str().to_string(), p.label().to_string()))
            .collect(),
        View::Degrees => DegreeLevel::ALL
            .iter()
            .map(|d| (d.as_str().to_string(), d.label().to_string()))
            .collect(),
        View::Colleges => session
            .catalog()
            .colleges()
            .iter()
            .map(|college| (college.id.to_string(), college.name.clone()))
            .chain([("all".to_string(), "All Colleges".to_string())])
            .collect(),
        View::Semesters => {
            let selection = &session.nav().selection;
            match (selection.pattern, selection.degree) {
                (Some(pattern), Some(degree)) => semester_options(pattern, degree)
                    .map(|n| (n.to_string(), format!("Semester {n}")))
                    .collect(),
                _ => Vec::new(),
            }
        }
        View::ResourceTypes => ResourceType::ALL
            .iter()
            .map(|kind| (kind.as_str().to_string(), kind.label().to_string()))
            .collect(),
        _ => Vec::new(),
    };
    if options.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Choice"), header_cell("Label")]);
    apply_table_style(&mut table);
    for (token, label) in options {
        table.add_row(vec![Cell::new(token).fg(Color::Green), Cell::new(label)]);
    }
    println!("{table}");
}

/// Resource listing. An empty list gets one dimmed "sample" row when
/// `placeholder` is set.
pub fn resource_table(
    resources: &[Resource],
    catalog: &Catalog,
    saved: &BTreeSet<ResourceId>,
    placeholder: bool,
) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Title"),
        header_cell("Type"),
        header_cell("Year"),
        header_cell("Sem"),
        header_cell("College"),
        header_cell("Size"),
        header_cell("Downloads"),
        header_cell("Saved"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 7, CellAlignment::Right);
    align_column(&mut table, 8, CellAlignment::Center);

    for resource in resources {
        let college = catalog
            .college(&resource.college_id)
            .map_or_else(|| resource.college_id.to_string(), |c| c.name.clone());
        let saved_cell = if saved.contains(&resource.id) {
            Cell::new("*").fg(Color::Yellow).add_attribute(Attribute::Bold)
        } else {
            dim_cell("-")
        };
        table.add_row(vec![
            dim_cell(&resource.id),
            Cell::new(&resource.title),
            Cell::new(resource.resource_type.label()),
            Cell::new(resource.year),
            Cell::new(resource.semester),
            Cell::new(college),
            Cell::new(&resource.size),
            Cell::new(resource.download_count),
            saved_cell,
        ]);
    }

    if resources.is_empty() && placeholder {
        let mut row = vec![dim_cell("-"), dim_cell(PLACEHOLDER_TITLE)];
        row.extend((0..7).map(|_| dim_cell("-")));
        table.add_row(row);
    }
    table
}

pub fn print_sections() {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Section"),
        header_cell("Opens"),
        header_cell("Login"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    for section in Section::ALL {
        let login = if section.requires_login() {
            Cell::new("yes").fg(Color::Yellow)
        } else {
            dim_cell("no")
        };
        table.add_row(vec![
            Cell::new(section.as_str()).fg(Color::Green),
            Cell::new(section.target().title()),
            login,
        ]);
    }
    println!("{table}");
}

pub fn print_submissions(submissions: &[Submission]) {
    if submissions.is_empty() {
        println!("No submissions waiting for review.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Title"),
        header_cell("Type"),
        header_cell("Subject"),
        header_cell("Sem"),
        header_cell("By"),
        header_cell("Submitted"),
    ]);
    apply_table_style(&mut table);
    for submission in submissions {
        table.add_row(vec![
            dim_cell(&submission.id),
            Cell::new(&submission.title),
            Cell::new(submission.resource_type.label()),
            Cell::new(&submission.subject_id),
            Cell::new(submission.semester),
            Cell::new(&submission.user_id),
            Cell::new(submission.submitted_at.format("%Y-%m-%d %H:%M")),
        ]);
    }
    println!("{table}");
}

pub fn print_history(records: &[AssessmentRecord]) {
    if records.is_empty() {
        println!("No assessments taken yet.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Taken"),
        header_cell("Subject"),
        header_cell("Sem"),
        header_cell("Topic"),
        header_cell("Score"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    for record in records {
        table.add_row(vec![
            Cell::new(record.taken_at.format("%Y-%m-%d %H:%M")),
            Cell::new(&record.subject_id),
            Cell::new(record.semester),
            Cell::new(&record.topic),
            score_cell(record.score, record.total),
        ]);
    }
    println!("{table}");
}

pub fn print_questions(questions: &[Question]) {
    for question in questions {
        let marks = if question.marks == 1 { "mark" } else { "marks" };
        println!("{}. {} ({} {marks})", question.number, question.text, question.marks);
    }
}

/// Report failed store writes. Local changes stay either way.
pub fn print_write_report(report: &WriteReport) {
    for failure in &report.failures {
        eprintln!("warning: not saved ({failure})");
    }
}

fn score_cell(score: u32, total: u32) -> Cell {
    let text = format!("{score}/{total}");
    if total == 0 {
        return dim_cell(text);
    }
    let color = match score * 100 / total {
        80.. => Color::Green,
        50..=79 => Color::Yellow,
        _ => Color::Red,
    };
    Cell::new(text).fg(color).add_attribute(Attribute::Bold)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
