use colored::{ColoredString, Colorize};
use moderation::display::{
    format_date_entry, format_location, format_timestamp, sort_key_label, sort_label,
    status_label, status_option_label,
};
use moderation::{QueryCriteria, RequestStatus, StatusCounts, StatusFilter, ViewRecord};

fn status_badge(status: RequestStatus) -> ColoredString {
    let label = status_label(status);
    match status {
        RequestStatus::Pending => label.yellow().bold(),
        RequestStatus::Approved => label.green().bold(),
        RequestStatus::Rejected => label.red().bold(),
    }
}

pub fn print_criteria(criteria: &QueryCriteria) {
    let mut parts = vec![format!("status: {}", criteria.status_filter.label())];
    if !criteria.search_term.trim().is_empty() {
        parts.push(format!("search: \"{}\"", criteria.search_term.trim()));
    }
    if let Some(start) = criteria.created_range.start {
        parts.push(format!("from: {start}"));
    }
    if let Some(end) = criteria.created_range.end {
        parts.push(format!("to: {end}"));
    }
    parts.push(format!(
        "sort: {} ({})",
        sort_key_label(criteria.sort_key),
        sort_label(criteria.sort_key, criteria.sort_direction)
    ));
    println!("{}", parts.join("  |  ").dimmed());
}

pub fn print_records(records: &[ViewRecord]) {
    if records.is_empty() {
        println!("{}", "No conference requests found.".bright_yellow());
        return;
    }

    for record in records {
        print_record(record);
        println!();
    }
}

pub fn print_record(record: &ViewRecord) {
    let code = record
        .short_code
        .as_deref()
        .map(|c| format!(" ({c})"))
        .unwrap_or_default();
    println!(
        "{} {}{}  [{}]",
        "▸".bright_cyan(),
        record.title.bold(),
        code,
        status_badge(record.status)
    );
    println!("  request:   {}", record.request_id);
    println!("  requester: {}", record.requester_id);
    println!("  created:   {}", format_timestamp(record.created_at));
    println!("  updated:   {}", format_timestamp(record.updated_at));

    if let Some(message) = record.reviewer_message.as_deref().filter(|m| !m.is_empty()) {
        println!("  comment:   {message}");
    }

    if let Some(error) = &record.details_error {
        println!("  {} {}", "details unavailable:".red(), error);
        return;
    }

    if let Some(revision) = record.primary_revision() {
        if !revision.dates.is_empty() {
            println!("  important dates:");
            for entry in &revision.dates {
                println!("    - {}", format_date_entry(entry));
            }
        }
        if let Some(location) = revision.locations.first() {
            println!("  location:  {}", format_location(location));
        }
        if !revision.topics.is_empty() {
            println!("  topics:    {}", revision.topics.join(", "));
        }
        if let Some(link) = &revision.link {
            println!("  link:      {}", link.underline());
        }
    }

    let actions: Vec<&str> = record
        .available_actions()
        .into_iter()
        .map(status_label)
        .collect();
    println!("  actions:   {}", actions.join(", ").dimmed());
}

pub fn print_counts(counts: &StatusCounts) {
    for filter in StatusFilter::variants() {
        println!("  {}", status_option_label(*filter, counts));
    }
}
