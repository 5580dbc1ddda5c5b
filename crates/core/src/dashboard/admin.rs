//! Administrator overview: user management, departments, approvals and alerts.

use serde::Serialize;

use super::{Panel, Searchable, Stat, Tabular};

/// Account listed in the user management table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManagedUser {
    /// Account id such as `USR1001`.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Contact email.
    pub email: &'static str,
    /// Role label as shown to admins.
    pub role: &'static str,
    /// `Active`, `Inactive` or `Pending`.
    pub status: &'static str,
    /// Date of the last login, or `Never`.
    pub last_login: &'static str,
}

impl Searchable for ManagedUser {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name, self.id, self.email, self.role]
    }
}

impl Tabular for ManagedUser {
    const COLUMNS: &'static [&'static str] =
        &["ID", "Name", "Email", "Role", "Status", "Last Login"];

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn cells(&self) -> Vec<String> {
        [self.id, self.name, self.email, self.role, self.status, self.last_login]
            .map(str::to_string)
            .to_vec()
    }
}

/// Academic department and its headcounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Department {
    /// Department id.
    pub id: &'static str,
    /// Department name.
    pub name: &'static str,
    /// Head of department.
    pub head: &'static str,
    /// Faculty members.
    pub faculty: u32,
    /// Enrolled students.
    pub students: u32,
    /// Courses offered.
    pub courses: u32,
}

impl Tabular for Department {
    const COLUMNS: &'static [&'static str] =
        &["ID", "Department", "Head", "Faculty", "Students", "Courses"];

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.to_string(),
            self.head.to_string(),
            self.faculty.to_string(),
            self.students.to_string(),
            self.courses.to_string(),
        ]
    }
}

/// Request waiting on an administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingApproval {
    /// Request id.
    pub id: &'static str,
    /// Who filed the request.
    pub name: &'static str,
    /// Request category (account, course, budget, event).
    pub kind: &'static str,
    /// Short description.
    pub details: &'static str,
    /// Date filed.
    pub request_date: &'static str,
}

impl Tabular for PendingApproval {
    const COLUMNS: &'static [&'static str] = &["ID", "Name", "Type", "Details", "Requested"];

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn cells(&self) -> Vec<String> {
        [self.id, self.name, self.kind, self.details, self.request_date]
            .map(str::to_string)
            .to_vec()
    }
}

/// Operational alert raised by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemAlert {
    /// Alert id.
    pub id: &'static str,
    /// `High`, `Medium` or `Low`.
    pub severity: &'static str,
    /// Alert text.
    pub message: &'static str,
    /// When the alert was raised.
    pub timestamp: &'static str,
}

impl Tabular for SystemAlert {
    const COLUMNS: &'static [&'static str] = &["ID", "Severity", "Message", "Time"];

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn cells(&self) -> Vec<String> {
        [self.id, self.severity, self.message, self.timestamp]
            .map(str::to_string)
            .to_vec()
    }
}

/// Everything the administrator dashboard shows.
#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    /// Headline counters.
    pub stats: Vec<Stat>,
    /// Managed accounts; searchable.
    pub users: Vec<ManagedUser>,
    /// Department roster.
    pub departments: Vec<Department>,
    /// Requests awaiting review.
    pub approvals: Vec<PendingApproval>,
    /// Open system alerts.
    pub alerts: Vec<SystemAlert>,
}

impl AdminDashboard {
    /// Fixed demo dataset.
    pub fn mock() -> Self {
        Self {
            stats: vec![
                Stat::new("Students", 1250),
                Stat::new("Faculty", 85),
                Stat::new("Courses", 120),
                Stat::new("Active users", 950),
                Stat::new("Pending approvals", 15),
                Stat::new("System alerts", 3),
            ],
            users: vec![
                ManagedUser {
                    id: "USR1001",
                    name: "Alex Johnson",
                    email: "alex.j@example.com",
                    role: "Student",
                    status: "Active",
                    last_login: "2023-10-08",
                },
                ManagedUser {
                    id: "USR1002",
                    name: "Emma Davis",
                    email: "emma.d@example.com",
                    role: "Student",
                    status: "Active",
                    last_login: "2023-10-07",
                },
                ManagedUser {
                    id: "USR1003",
                    name: "Dr. Sarah Williams",
                    email: "sarah.w@example.com",
                    role: "Faculty",
                    status: "Active",
                    last_login: "2023-10-08",
                },
                ManagedUser {
                    id: "USR1004",
                    name: "Michael Brown",
                    email: "michael.b@example.com",
                    role: "Student",
                    status: "Inactive",
                    last_login: "2023-09-25",
                },
                ManagedUser {
                    id: "USR1005",
                    name: "Robert Wilson",
                    email: "robert.w@example.com",
                    role: "Registrar",
                    status: "Active",
                    last_login: "2023-10-08",
                },
                ManagedUser {
                    id: "USR1006",
                    name: "Jennifer Taylor",
                    email: "jennifer.t@example.com",
                    role: "Finance",
                    status: "Active",
                    last_login: "2023-10-07",
                },
                ManagedUser {
                    id: "USR1007",
                    name: "David Martinez",
                    email: "david.m@example.com",
                    role: "Parent",
                    status: "Pending",
                    last_login: "Never",
                },
            ],
            departments: vec![
                Department {
                    id: "DEP1001",
                    name: "Computer Science",
                    head: "Dr. Sarah Williams",
                    faculty: 12,
                    students: 320,
                    courses: 25,
                },
                Department {
                    id: "DEP1002",
                    name: "Business Administration",
                    head: "Dr. Robert Johnson",
                    faculty: 15,
                    students: 280,
                    courses: 22,
                },
                Department {
                    id: "DEP1003",
                    name: "Electrical Engineering",
                    head: "Dr. Michael Clark",
                    faculty: 10,
                    students: 210,
                    courses: 18,
                },
                Department {
                    id: "DEP1004",
                    name: "Mathematics",
                    head: "Dr. Emily White",
                    faculty: 8,
                    students: 150,
                    courses: 15,
                },
                Department {
                    id: "DEP1005",
                    name: "Physics",
                    head: "Dr. James Brown",
                    faculty: 7,
                    students: 120,
                    courses: 12,
                },
            ],
            approvals: vec![
                PendingApproval {
                    id: "PA1001",
                    name: "David Martinez",
                    kind: "Account",
                    details: "Parent",
                    request_date: "2023-10-07",
                },
                PendingApproval {
                    id: "PA1002",
                    name: "Lisa Thompson",
                    kind: "Account",
                    details: "Faculty",
                    request_date: "2023-10-06",
                },
                PendingApproval {
                    id: "PA1003",
                    name: "CS Department",
                    kind: "Course",
                    details: "Advanced AI",
                    request_date: "2023-10-05",
                },
                PendingApproval {
                    id: "PA1004",
                    name: "Finance Office",
                    kind: "Budget",
                    details: "Lab Equipment",
                    request_date: "2023-10-04",
                },
                PendingApproval {
                    id: "PA1005",
                    name: "Student Council",
                    kind: "Event",
                    details: "Tech Symposium",
                    request_date: "2023-10-03",
                },
            ],
            alerts: vec![
                SystemAlert {
                    id: "AL1001",
                    severity: "High",
                    message: "Server load exceeding 85% capacity",
                    timestamp: "2023-10-08 13:45:20",
                },
                SystemAlert {
                    id: "AL1002",
                    severity: "Medium",
                    message: "15 user accounts pending approval",
                    timestamp: "2023-10-08 09:30:15",
                },
                SystemAlert {
                    id: "AL1003",
                    severity: "Low",
                    message: "System update available",
                    timestamp: "2023-10-07 22:10:05",
                },
            ],
        }
    }

    /// Users matching the admin search box (name, id, email, role).
    pub fn users_matching(&self, query: &str) -> Vec<&ManagedUser> {
        super::filter_matching(&self.users, query)
    }

    /// Tables in tab order.
    pub fn panels(&self) -> Vec<Panel> {
        vec![
            Panel::searchable("Users", &self.users),
            Panel::from_items("Departments", &self.departments),
            Panel::from_items("Approvals", &self.approvals),
            Panel::from_items("Alerts", &self.alerts),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_search_covers_role_and_email() {
        let admin = AdminDashboard::mock();
        let registrars = admin.users_matching("registrar");
        assert_eq!(registrars.len(), 1);
        assert_eq!(registrars[0].id, "USR1005");

        assert_eq!(admin.users_matching("EMMA.D@").len(), 1);
        assert_eq!(admin.users_matching("usr100").len(), 7);
        // status is not a searchable field
        assert!(admin.users_matching("pending").is_empty());
    }
}
