use jobsearch_core::{
    AppViewModel, JobRowView, ListingView, ResultsView, RisingView, SalaryView,
};

const SUGGESTIONS_SHOWN: usize = 8;

/// Text lines for one full redraw of the jobs screen.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!("Location: {}", view.location));
    lines.push(filter_line(view));
    for correction in &view.corrections {
        lines.push(format!("  note: {correction}"));
    }
    if !view.suggestions.is_empty() {
        let shown: Vec<&str> = view
            .suggestions
            .iter()
            .take(SUGGESTIONS_SHOWN)
            .map(String::as_str)
            .collect();
        lines.push(format!("Suggestions: {}", shown.join(", ")));
    }
    if !view.city_options.is_empty() {
        lines.push(format!("Cities available: {}", view.city_options.len()));
    }

    lines.push(String::new());
    lines.extend(listing_lines(&view.listing));

    lines.push(String::new());
    lines.extend(rising_lines(&view.rising));
    if let Some(line) = salary_line(&view.salary, &view.skill) {
        lines.push(line);
    }
    lines
}

fn filter_line(view: &AppViewModel) -> String {
    let text = if view.text_input.is_empty() {
        "-".to_string()
    } else {
        format!("\"{}\"", view.text_input)
    };
    let skill = if view.skill.is_empty() {
        "-"
    } else {
        view.skill.as_str()
    };
    let city = view.city.as_deref().unwrap_or("All cities");
    format!(
        "Search: {text} | Skill: {skill} | City: {city} | Posted: last {} days | Sort: {}",
        view.days,
        view.sort.label()
    )
}

fn listing_lines(listing: &ListingView) -> Vec<String> {
    match listing {
        ListingView::Idle => Vec::new(),
        ListingView::Loading => vec!["Loading jobs...".to_string()],
        ListingView::Error(message) => vec![format!("Error loading jobs: {message}")],
        ListingView::Empty => vec!["No jobs match these filters.".to_string()],
        ListingView::Results(results) => results_lines(results),
    }
}

fn results_lines(results: &ResultsView) -> Vec<String> {
    let mut lines = Vec::with_capacity(results.rows.len() + 2);
    let summary = match results.range {
        Some((first, last)) => format!(
            "Showing {}-{} of {}",
            format_with_commas(first),
            format_with_commas(last),
            format_with_commas(results.total)
        ),
        None => format!("{} jobs", format_with_commas(results.total)),
    };
    lines.push(format!(
        "{summary} (page {} of {})",
        results.page, results.total_pages
    ));
    if results.page_clamped {
        lines.push("  requested page is past the end of the results".to_string());
    }
    lines.extend(results.rows.iter().map(format_job_row));

    let mut nav = Vec::new();
    if results.can_prev {
        nav.push("prev");
    }
    if results.can_next {
        nav.push("next");
    }
    if !nav.is_empty() {
        lines.push(format!("[{}]", nav.join(" | ")));
    }
    lines
}

fn format_job_row(job: &JobRowView) -> String {
    let mode = job
        .mode
        .map(|mode| format!(" [{}]", mode.label()))
        .unwrap_or_default();
    format!(
        "  {date}  {title} @ {company}  {place}{mode}",
        date = job.date.format("%Y-%m-%d"),
        title = job.title,
        company = job.company,
        place = job.place,
    )
}

fn rising_lines(rising: &RisingView) -> Vec<String> {
    match rising {
        RisingView::Idle => Vec::new(),
        RisingView::Loading => vec!["Rising skills: loading...".to_string()],
        RisingView::Rows(rows) if rows.is_empty() => {
            vec!["Rising skills: no data".to_string()]
        }
        RisingView::Rows(rows) => {
            let mut lines = vec!["Rising skills:".to_string()];
            lines.extend(
                rows.iter()
                    .map(|row| format!("  {:<20} {:>6}  {}", row.skill, row.current, row.delta)),
            );
            lines
        }
    }
}

fn salary_line(salary: &SalaryView, skill: &str) -> Option<String> {
    match salary {
        SalaryView::Hidden => None,
        SalaryView::Loading => Some(format!("Salary for {skill}: loading...")),
        SalaryView::Figures {
            p25,
            median,
            p75,
            samples,
        } => Some(format!(
            "Salary for {skill}: p25 {p25} | median {median} | p75 {p75} (n={})",
            format_with_commas(*samples)
        )),
    }
}

fn format_with_commas(value: u64) -> String {
    let mut out = String::new();
    for (i, ch) in value.to_string().chars().rev().enumerate() {
        if i != 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use jobsearch_core::{RisingRowView, SortMode, WorkMode};
    use pretty_assertions::assert_eq;

    fn row(id: &str) -> JobRowView {
        JobRowView {
            id: id.to_string(),
            title: "Rust Engineer".to_string(),
            company: "Ferris Inc".to_string(),
            place: "Austin, TX".to_string(),
            mode: Some(WorkMode::Hybrid),
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            url: None,
        }
    }

    #[test]
    fn results_show_range_rows_and_navigation() {
        let view = AppViewModel {
            location: "/jobs?skill=rust&page=2".to_string(),
            skill: "rust".to_string(),
            days: 90,
            sort: SortMode::Newest,
            listing: ListingView::Results(ResultsView {
                rows: vec![row("1")],
                total: 1_234,
                page: 2,
                total_pages: 62,
                page_clamped: false,
                range: Some((21, 40)),
                can_prev: true,
                can_next: true,
            }),
            ..AppViewModel::default()
        };

        let lines = render(&view);
        assert_eq!(lines[0], "Location: /jobs?skill=rust&page=2");
        assert_eq!(
            lines[1],
            "Search: - | Skill: rust | City: All cities | Posted: last 90 days | Sort: Newest"
        );
        assert!(lines.contains(&"Showing 21-40 of 1,234 (page 2 of 62)".to_string()));
        assert!(lines.contains(&"  2024-03-09  Rust Engineer @ Ferris Inc  Austin, TX [Hybrid]".to_string()));
        assert!(lines.contains(&"[prev | next]".to_string()));
    }

    #[test]
    fn error_and_empty_states_have_no_rows() {
        let view = AppViewModel {
            listing: ListingView::Error("HTTP 500: Internal Server Error".to_string()),
            ..AppViewModel::default()
        };
        assert!(render(&view).contains(&"Error loading jobs: HTTP 500: Internal Server Error".to_string()));

        let view = AppViewModel {
            listing: ListingView::Empty,
            ..AppViewModel::default()
        };
        assert!(render(&view).contains(&"No jobs match these filters.".to_string()));
    }

    #[test]
    fn cards_render_rising_rows_and_salary() {
        let view = AppViewModel {
            skill: "python".to_string(),
            rising: RisingView::Rows(vec![RisingRowView {
                skill: "rust".to_string(),
                current: 42,
                delta: "150%".to_string(),
            }]),
            salary: SalaryView::Figures {
                p25: "$90k".to_string(),
                median: "$120k".to_string(),
                p75: "$150k".to_string(),
                samples: 1_500,
            },
            ..AppViewModel::default()
        };
        let lines = render(&view);
        assert!(lines.contains(&"Rising skills:".to_string()));
        assert!(lines.iter().any(|line| line.starts_with("  rust") && line.ends_with("150%")));
        assert_eq!(
            lines.last().map(String::as_str),
            Some("Salary for python: p25 $90k | median $120k | p75 $150k (n=1,500)")
        );
    }

    #[test]
    fn commas_group_thousands() {
        assert_eq!(format_with_commas(0), "0");
        assert_eq!(format_with_commas(999), "999");
        assert_eq!(format_with_commas(1_000_000), "1,000,000");
    }
}
