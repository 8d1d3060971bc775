use chrono::NaiveDate;

use crate::filter::SortMode;
use crate::listing::{arrange_rows, display_place, showing_range, total_pages, work_mode, WorkMode};
use crate::query::{CityCount, JobRecord, QueryResult, RisingSkill, SalaryPercentiles};
use crate::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub location: String,
    pub text_input: String,
    pub skill: String,
    pub city: Option<String>,
    pub days: u32,
    pub sort: SortMode,
    pub listing: ListingView,
    pub suggestions: Vec<String>,
    pub city_options: Vec<CityOption>,
    pub rising: RisingView,
    pub salary: SalaryView,
    /// Location parameters that were replaced by defaults on mount.
    pub corrections: Vec<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListingView {
    #[default]
    Idle,
    Loading,
    /// Page-level error; no rows are shown.
    Error(String),
    /// The query matched nothing.
    Empty,
    Results(ResultsView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView {
    pub rows: Vec<JobRowView>,
    pub total: u64,
    /// Requested page clamped to `total_pages`.
    pub page: u32,
    pub total_pages: u32,
    /// The requested page lies past the end of the result set.
    pub page_clamped: bool,
    pub range: Option<(u64, u64)>,
    pub can_prev: bool,
    pub can_next: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub id: String,
    pub title: String,
    pub company: String,
    pub place: String,
    pub mode: Option<WorkMode>,
    pub date: NaiveDate,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RisingView {
    #[default]
    Idle,
    Loading,
    Rows(Vec<RisingRowView>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RisingRowView {
    pub skill: String,
    pub current: u64,
    pub delta: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SalaryView {
    /// No skill selected.
    #[default]
    Hidden,
    Loading,
    Figures {
        p25: String,
        median: String,
        p75: String,
        samples: u64,
    },
}

impl AppViewModel {
    pub(crate) fn from_state(state: &AppState) -> Self {
        let filter = state.filter();
        Self {
            location: state.location(),
            text_input: state.text_input().to_string(),
            skill: filter.skill().to_string(),
            city: filter.city().map(ToOwned::to_owned),
            days: filter.days().get(),
            sort: filter.sort(),
            listing: listing_view(state),
            suggestions: state.suggestions().success().cloned().unwrap_or_default(),
            city_options: state
                .cities()
                .success()
                .map(|rows| rows.iter().map(city_option).collect())
                .unwrap_or_default(),
            rising: rising_view(state.rising_skills(), state.tuning().rising_rows),
            salary: salary_view(state.salary()),
            corrections: state.corrections().iter().map(ToString::to_string).collect(),
            dirty: state.is_dirty(),
        }
    }
}

fn listing_view(state: &AppState) -> ListingView {
    let page = match state.listing() {
        QueryResult::Idle => return ListingView::Idle,
        QueryResult::Loading => return ListingView::Loading,
        QueryResult::Failure(err) => return ListingView::Error(err.to_string()),
        QueryResult::Success(page) => page,
    };
    if page.total == 0 {
        return ListingView::Empty;
    }

    let filter = state.filter();
    let pages = total_pages(page.total, page.page_size);
    let shown = filter.page().min(pages);
    let rows = arrange_rows(&page.items, filter.sort(), filter.city().is_some())
        .into_iter()
        .map(job_row)
        .collect();

    ListingView::Results(ResultsView {
        rows,
        total: page.total,
        page: shown,
        total_pages: pages,
        page_clamped: filter.page() > pages,
        range: showing_range(page.page, page.page_size, page.total),
        can_prev: shown > 1,
        can_next: shown < pages,
    })
}

fn job_row(job: &JobRecord) -> JobRowView {
    JobRowView {
        id: job.id.clone(),
        title: job.title.clone(),
        company: job.company.clone(),
        place: display_place(
            job.city.as_deref(),
            job.region.as_deref(),
            job.country.as_deref(),
            job.remote_flag,
        ),
        mode: work_mode(job.city.as_deref(), job.remote_flag),
        date: job.posted_at.unwrap_or(job.created_at).date_naive(),
        url: job.url.clone(),
    }
}

fn city_option(row: &CityCount) -> CityOption {
    let label = if row.count > 0 {
        format!("{} ({})", row.city, row.count)
    } else {
        row.city.clone()
    };
    CityOption {
        value: row.city.clone(),
        label,
    }
}

fn rising_view(result: &QueryResult<Vec<RisingSkill>>, limit: usize) -> RisingView {
    match result {
        QueryResult::Idle => RisingView::Idle,
        QueryResult::Loading => RisingView::Loading,
        // Failures are absorbed upstream; treat a stray one as no data.
        QueryResult::Failure(_) => RisingView::Rows(Vec::new()),
        QueryResult::Success(rows) => RisingView::Rows(
            rows.iter()
                .take(limit)
                .map(|row| RisingRowView {
                    skill: row.skill.clone(),
                    current: row.current,
                    delta: format_delta(row.delta),
                })
                .collect(),
        ),
    }
}

fn salary_view(result: &QueryResult<SalaryPercentiles>) -> SalaryView {
    match result {
        QueryResult::Idle => SalaryView::Hidden,
        QueryResult::Loading => SalaryView::Loading,
        QueryResult::Failure(_) => salary_figures(&SalaryPercentiles::default()),
        QueryResult::Success(salary) => salary_figures(salary),
    }
}

fn salary_figures(salary: &SalaryPercentiles) -> SalaryView {
    SalaryView::Figures {
        p25: format_thousands(salary.p25),
        median: format_thousands(salary.median),
        p75: format_thousands(salary.p75),
        samples: salary.n,
    }
}

/// `0.42` renders as `42%`; missing or non-finite as an em dash.
pub fn format_delta(delta: Option<f64>) -> String {
    match delta.filter(|value| value.is_finite()) {
        Some(value) => format!("{}%", (value * 100.0).round() as i64),
        None => "\u{2014}".to_string(),
    }
}

/// `123456.0` renders as `$123k`; missing as an em dash.
pub fn format_thousands(amount: Option<f64>) -> String {
    match amount.filter(|value| value.is_finite()) {
        Some(value) => format!("${:.0}k", value / 1000.0),
        None => "\u{2014}".to_string(),
    }
}
