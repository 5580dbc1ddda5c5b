//! Role-specific dashboard datasets and client-side filtering.

pub mod admin;
pub mod faculty;
pub mod finance;
pub mod student;

use serde::Serialize;

use crate::{
    models::UserRecord,
    routing::{guard, Access, Route},
    simulate_latency, Portal,
};

pub use admin::AdminDashboard;
pub use faculty::FacultyDashboard;
pub use finance::FinanceDashboard;
pub use student::{ParentDashboard, StudentDashboard};

/// Shown when a parent's linked student cannot be resolved.
pub const MISSING_CHILD_MESSAGE: &str = "Could not find student data for this parent";

/// Entity whose rows can be narrowed by a free-text query.
pub trait Searchable {
    /// Fields consulted by the query, in display order.
    fn search_fields(&self) -> Vec<&str>;
}

/// Entity that renders as a table row.
pub trait Tabular {
    /// Column headings.
    const COLUMNS: &'static [&'static str];

    /// Identifier used when a row triggers an action.
    fn key(&self) -> String;

    /// Cell text, one per column.
    fn cells(&self) -> Vec<String>;
}

/// Case-insensitive substring match of `query` against any searchable field.
///
/// The query is used as typed, surrounding whitespace included. An empty
/// query matches everything.
pub fn matches_query<T: Searchable + ?Sized>(item: &T, query: &str) -> bool {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    item.search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Items matching `query`, in their original order.
pub fn filter_matching<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| matches_query(*item, query))
        .collect()
}

/// One rendered row of a [`Panel`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelRow {
    /// Row identifier (assignment id, transaction id, teacher name, ...).
    pub key: String,
    /// Cell text.
    pub cells: Vec<String>,
    haystack: Option<Vec<String>>,
}

impl Searchable for PanelRow {
    fn search_fields(&self) -> Vec<&str> {
        self.haystack
            .iter()
            .flatten()
            .map(String::as_str)
            .collect()
    }
}

/// What a row in a panel lets the user do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PanelKind {
    /// Read-only table.
    Info,
    /// Student assignments: download and submit.
    Assignments,
    /// Fee transactions: download receipt.
    Transactions,
    /// Courses with a teacher to contact.
    Teachers,
}

/// Presentation-neutral table projected from a dataset.
#[derive(Debug, Clone, Serialize)]
pub struct Panel {
    /// Tab label.
    pub title: String,
    /// What rows of this panel can do.
    pub kind: PanelKind,
    /// Column headings.
    pub columns: Vec<String>,
    /// All rows, unfiltered.
    pub rows: Vec<PanelRow>,
    /// Whether [`Panel::rows_matching`] narrows rows.
    pub searchable: bool,
}

impl Panel {
    /// Read-only panel over `items`.
    pub fn from_items<T: Tabular>(title: &str, items: &[T]) -> Self {
        Self::build(title, PanelKind::Info, items, |_| None)
    }

    /// Panel whose rows filter on `T`'s searchable fields.
    pub fn searchable<T: Tabular + Searchable>(title: &str, items: &[T]) -> Self {
        let mut panel = Self::build(title, PanelKind::Info, items, |item| {
            Some(item.search_fields().into_iter().map(str::to_string).collect())
        });
        panel.searchable = true;
        panel
    }

    /// Set what rows of this panel can do.
    pub fn with_kind(mut self, kind: PanelKind) -> Self {
        self.kind = kind;
        self
    }

    fn build<T: Tabular>(
        title: &str,
        kind: PanelKind,
        items: &[T],
        haystack: impl Fn(&T) -> Option<Vec<String>>,
    ) -> Self {
        Self {
            title: title.to_string(),
            kind,
            columns: T::COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: items
                .iter()
                .map(|item| PanelRow {
                    key: item.key(),
                    cells: item.cells(),
                    haystack: haystack(item),
                })
                .collect(),
            searchable: false,
        }
    }

    /// Rows matching `query`; every row when the panel is not searchable.
    pub fn rows_matching(&self, query: &str) -> Vec<&PanelRow> {
        if !self.searchable {
            return self.rows.iter().collect();
        }
        filter_matching(&self.rows, query)
    }
}

/// Label/value pair shown in a dashboard header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stat {
    /// What the figure is.
    pub label: &'static str,
    /// Display value.
    pub value: String,
}

impl Stat {
    pub(crate) fn new(label: &'static str, value: impl ToString) -> Self {
        Self {
            label,
            value: value.to_string(),
        }
    }
}

/// Dataset behind a dashboard route.
#[derive(Debug, Clone, Serialize)]
pub enum DashboardData {
    /// Admin overview.
    Admin(AdminDashboard),
    /// Teaching load for a faculty member.
    Faculty(FacultyDashboard),
    /// Fees, payments and scholarships.
    Finance(FinanceDashboard),
    /// A student's own record.
    Student(StudentDashboard),
    /// A parent's view of their linked student.
    Parent(ParentDashboard),
    /// Registrar and generic landing pages: profile only.
    Overview(Vec<Stat>),
}

impl DashboardData {
    /// Header figures.
    pub fn stats(&self) -> Vec<Stat> {
        match self {
            DashboardData::Admin(data) => data.stats.clone(),
            DashboardData::Faculty(data) => data.stats(),
            DashboardData::Finance(data) => data.stats.clone(),
            DashboardData::Student(data) => data.stats(),
            DashboardData::Parent(data) => data.stats(),
            DashboardData::Overview(stats) => stats.clone(),
        }
    }

    /// Tables rendered as tabs.
    pub fn panels(&self) -> Vec<Panel> {
        match self {
            DashboardData::Admin(data) => data.panels(),
            DashboardData::Faculty(data) => data.panels(),
            DashboardData::Finance(data) => data.panels(),
            DashboardData::Student(data) => data.panels(),
            DashboardData::Parent(data) => data.panels(),
            DashboardData::Overview(_) => Vec::new(),
        }
    }
}

/// Why a dashboard could not be shown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DashboardError {
    /// No session, or the session's role may not see the route.
    #[error("redirect to {0}")]
    Redirect(Route),
    /// The dataset could not be assembled.
    #[error("{0}")]
    Unavailable(String),
}

/// A guarded, loaded dashboard.
#[derive(Debug, Clone)]
pub struct Dashboard {
    /// Route that was loaded.
    pub route: Route,
    /// Session user the dashboard was loaded for.
    pub user: UserRecord,
    /// Role-specific dataset.
    pub data: DashboardData,
}

/// Guard `route` against the current session, then load its dataset.
pub async fn load_dashboard(route: Route, portal: &Portal) -> Result<Dashboard, DashboardError> {
    let user = match guard(route, portal.auth.current_user().await) {
        Access::Granted(Some(user)) => user,
        Access::Granted(None) => return Err(DashboardError::Redirect(Route::Login)),
        Access::Redirect(target) => return Err(DashboardError::Redirect(target)),
    };

    simulate_latency(portal.config.latency.dashboard()).await;

    let data = match route {
        Route::AdminDashboard => DashboardData::Admin(AdminDashboard::mock()),
        Route::FacultyDashboard => DashboardData::Faculty(FacultyDashboard::mock(&user)),
        Route::FinanceDashboard => DashboardData::Finance(FinanceDashboard::mock()),
        Route::StudentDashboard => DashboardData::Student(StudentDashboard::mock(&user)),
        Route::ParentDashboard => {
            let child = portal
                .auth
                .student_by_parent_id(&user.id)
                .await
                .ok_or_else(|| DashboardError::Unavailable(MISSING_CHILD_MESSAGE.to_string()))?;
            DashboardData::Parent(ParentDashboard::mock(&user, &child))
        }
        Route::RegistrarDashboard | Route::GenericDashboard | Route::Login => {
            DashboardData::Overview(vec![
                Stat::new("Name", user.full_name()),
                Stat::new("ID", &user.id),
                Stat::new("Email", &user.email),
                Stat::new("Role", user.role.label()),
            ])
        }
    };

    Ok(Dashboard { route, user, data })
}
