use std::fmt;

/// Rows requested per listing page.
pub const PAGE_SIZE: u32 = 20;

/// Posting-age windows offered by the "posted within" control.
pub const DAY_WINDOWS: [u32; 7] = [7, 14, 30, 60, 90, 180, 365];

/// A posting-age window in days, restricted to [`DAY_WINDOWS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DaysWindow(u32);

impl DaysWindow {
    pub const DEFAULT: DaysWindow = DaysWindow(90);

    pub fn new(days: u32) -> Option<Self> {
        DAY_WINDOWS.contains(&days).then_some(Self(days))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for DaysWindow {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for DaysWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortMode {
    /// API delivery order.
    #[default]
    Newest,
    TitleAsc,
    CompanyAsc,
}

impl SortMode {
    pub const ALL: [SortMode; 3] = [SortMode::Newest, SortMode::TitleAsc, SortMode::CompanyAsc];

    pub fn as_param(self) -> &'static str {
        match self {
            SortMode::Newest => "newest",
            SortMode::TitleAsc => "title",
            SortMode::CompanyAsc => "company",
        }
    }

    pub fn from_param(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.as_param() == raw)
    }

    pub fn label(self) -> &'static str {
        match self {
            SortMode::Newest => "Newest",
            SortMode::TitleAsc => "Title (A-Z)",
            SortMode::CompanyAsc => "Company (A-Z)",
        }
    }
}

/// Snapshot of every filter dimension of the jobs screen.
///
/// Values are immutable; each `with_*` transition consumes the snapshot and
/// returns a new one. Every transition except [`FilterState::with_page`]
/// resets the page to 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterState {
    text: String,
    skill: String,
    city: Option<String>,
    days: DaysWindow,
    page: u32,
    sort: SortMode,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            text: String::new(),
            skill: String::new(),
            city: None,
            days: DaysWindow::DEFAULT,
            page: 1,
            sort: SortMode::Newest,
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn skill(&self) -> &str {
        &self.skill
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn days(&self) -> DaysWindow {
        self.days
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        PAGE_SIZE
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            page: 1,
            ..self
        }
    }

    pub fn with_skill(self, skill: impl Into<String>) -> Self {
        Self {
            skill: skill.into(),
            page: 1,
            ..self
        }
    }

    /// Blank or whitespace-only names mean "all cities".
    pub fn with_city(self, city: Option<String>) -> Self {
        Self {
            city: city.filter(|name| !name.trim().is_empty()),
            page: 1,
            ..self
        }
    }

    pub fn with_days(self, days: DaysWindow) -> Self {
        Self {
            days,
            page: 1,
            ..self
        }
    }

    pub fn with_sort(self, sort: SortMode) -> Self {
        Self {
            sort,
            page: 1,
            ..self
        }
    }

    /// Pages below 1 are raised to 1.
    pub fn with_page(self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}
