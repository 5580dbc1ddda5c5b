//! Faculty dashboard: taught courses, enrolled students, assignments and exams.

use serde::Serialize;

use crate::models::UserRecord;

use super::{Panel, Searchable, Stat, Tabular};

/// Course taught this semester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaughtCourse {
    /// Course code.
    pub id: &'static str,
    /// Course title.
    pub name: &'static str,
    /// Meeting days and times.
    pub schedule: &'static str,
    /// Lecture room.
    pub room: &'static str,
    /// Enrolment count.
    pub students: u32,
    /// Average attendance, percent.
    pub attendance: u8,
}

impl Tabular for TaughtCourse {
    const COLUMNS: &'static [&'static str] =
        &["Code", "Course", "Schedule", "Room", "Students", "Attendance"];

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.to_string(),
            self.schedule.to_string(),
            self.room.to_string(),
            self.students.to_string(),
            format!("{}%", self.attendance),
        ]
    }
}

/// Student enrolled in one of the faculty member's courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrolledStudent {
    /// Student id.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Contact email.
    pub email: &'static str,
    /// Course code.
    pub course: &'static str,
    /// Attendance, percent.
    pub attendance: u8,
    /// Current letter grade.
    pub grade: &'static str,
}

impl Searchable for EnrolledStudent {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name, self.id, self.email, self.course]
    }
}

impl Tabular for EnrolledStudent {
    const COLUMNS: &'static [&'static str] =
        &["ID", "Name", "Email", "Course", "Attendance", "Grade"];

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.to_string(),
            self.email.to_string(),
            self.course.to_string(),
            format!("{}%", self.attendance),
            self.grade.to_string(),
        ]
    }
}

/// Assignment set by the faculty member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetAssignment {
    /// Assignment id.
    pub id: &'static str,
    /// Course code.
    pub course: &'static str,
    /// Assignment title.
    pub title: &'static str,
    /// Due date.
    pub due_date: &'static str,
    /// `Active` or `Completed`.
    pub status: &'static str,
    /// Submissions received so far.
    pub submissions: u32,
    /// Students expected to submit.
    pub total_students: u32,
}

impl Tabular for SetAssignment {
    const COLUMNS: &'static [&'static str] =
        &["ID", "Course", "Title", "Due", "Status", "Submissions"];

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.course.to_string(),
            self.title.to_string(),
            self.due_date.to_string(),
            self.status.to_string(),
            format!("{}/{}", self.submissions, self.total_students),
        ]
    }
}

/// Exam the faculty member runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledExam {
    /// Exam id.
    pub id: &'static str,
    /// Course code.
    pub course: &'static str,
    /// Exam title.
    pub title: &'static str,
    /// Exam date.
    pub date: &'static str,
    /// Time window.
    pub time: &'static str,
    /// Exam room.
    pub location: &'static str,
    /// Scheduling state.
    pub status: &'static str,
}

impl Tabular for ScheduledExam {
    const COLUMNS: &'static [&'static str] =
        &["ID", "Course", "Exam", "Date", "Time", "Location", "Status"];

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn cells(&self) -> Vec<String> {
        [
            self.id,
            self.course,
            self.title,
            self.date,
            self.time,
            self.location,
            self.status,
        ]
        .map(str::to_string)
        .to_vec()
    }
}

/// Everything the faculty dashboard shows.
#[derive(Debug, Clone, Serialize)]
pub struct FacultyDashboard {
    /// Display name with title, e.g. `Dr. Sarah Williams`.
    pub name: String,
    /// Home department.
    pub department: &'static str,
    /// Academic rank.
    pub position: &'static str,
    /// Courses taught.
    pub courses: Vec<TaughtCourse>,
    /// Enrolled students; searchable.
    pub students: Vec<EnrolledStudent>,
    /// Assignments set.
    pub assignments: Vec<SetAssignment>,
    /// Exams scheduled.
    pub exams: Vec<ScheduledExam>,
}

impl FacultyDashboard {
    /// Demo dataset for `user`.
    pub fn mock(user: &UserRecord) -> Self {
        Self {
            name: format!("Dr. {}", user.full_name()),
            department: "Computer Science",
            position: "Associate Professor",
            courses: vec![
                TaughtCourse {
                    id: "CS301",
                    name: "Data Structures",
                    schedule: "Mon, Wed, Fri 10:00 AM - 11:30 AM",
                    room: "CS Building, Room 105",
                    students: 45,
                    attendance: 92,
                },
                TaughtCourse {
                    id: "CS302",
                    name: "Algorithms",
                    schedule: "Tue, Thu 1:00 PM - 3:00 PM",
                    room: "CS Building, Room 201",
                    students: 38,
                    attendance: 88,
                },
                TaughtCourse {
                    id: "CS401",
                    name: "Advanced Programming",
                    schedule: "Mon, Wed 3:30 PM - 5:00 PM",
                    room: "CS Building, Room 110",
                    students: 30,
                    attendance: 95,
                },
            ],
            students: vec![
                EnrolledStudent {
                    id: "ST1001",
                    name: "Alex Johnson",
                    email: "alex.j@example.com",
                    course: "CS301",
                    attendance: 95,
                    grade: "A",
                },
                EnrolledStudent {
                    id: "ST1002",
                    name: "Emma Davis",
                    email: "emma.d@example.com",
                    course: "CS301",
                    attendance: 88,
                    grade: "B+",
                },
                EnrolledStudent {
                    id: "ST1003",
                    name: "Michael Brown",
                    email: "michael.b@example.com",
                    course: "CS301",
                    attendance: 92,
                    grade: "A-",
                },
                EnrolledStudent {
                    id: "ST1004",
                    name: "Sophia Wilson",
                    email: "sophia.w@example.com",
                    course: "CS302",
                    attendance: 90,
                    grade: "B",
                },
                EnrolledStudent {
                    id: "ST1005",
                    name: "James Taylor",
                    email: "james.t@example.com",
                    course: "CS302",
                    attendance: 85,
                    grade: "B-",
                },
                EnrolledStudent {
                    id: "ST1006",
                    name: "Olivia Martinez",
                    email: "olivia.m@example.com",
                    course: "CS401",
                    attendance: 98,
                    grade: "A+",
                },
                EnrolledStudent {
                    id: "ST1007",
                    name: "William Anderson",
                    email: "william.a@example.com",
                    course: "CS401",
                    attendance: 93,
                    grade: "A",
                },
            ],
            assignments: vec![
                SetAssignment {
                    id: "A1001",
                    course: "CS301",
                    title: "Binary Tree Implementation",
                    due_date: "2023-10-15",
                    status: "Active",
                    submissions: 35,
                    total_students: 45,
                },
                SetAssignment {
                    id: "A1002",
                    course: "CS302",
                    title: "Sorting Algorithm Analysis",
                    due_date: "2023-10-20",
                    status: "Active",
                    submissions: 20,
                    total_students: 38,
                },
                SetAssignment {
                    id: "A1003",
                    course: "CS301",
                    title: "Linked List Problems",
                    due_date: "2023-10-05",
                    status: "Completed",
                    submissions: 42,
                    total_students: 45,
                },
                SetAssignment {
                    id: "A1004",
                    course: "CS401",
                    title: "Advanced OOP Project",
                    due_date: "2023-10-25",
                    status: "Active",
                    submissions: 15,
                    total_students: 30,
                },
            ],
            exams: vec![
                ScheduledExam {
                    id: "E2001",
                    course: "CS301",
                    title: "Midterm Exam",
                    date: "2023-10-18",
                    time: "10:00 AM - 12:00 PM",
                    location: "Hall A",
                    status: "Scheduled",
                },
                ScheduledExam {
                    id: "E2002",
                    course: "CS302",
                    title: "Quiz 2",
                    date: "2023-10-12",
                    time: "2:00 PM - 3:00 PM",
                    location: "Room 201",
                    status: "Scheduled",
                },
                ScheduledExam {
                    id: "E2003",
                    course: "CS401",
                    title: "Practical Test",
                    date: "2023-10-20",
                    time: "3:30 PM - 5:30 PM",
                    location: "Lab 3",
                    status: "Scheduled",
                },
            ],
        }
    }

    /// Students matching the faculty search box (name, id, email, course).
    pub fn students_matching(&self, query: &str) -> Vec<&EnrolledStudent> {
        super::filter_matching(&self.students, query)
    }

    /// Headline figures.
    pub fn stats(&self) -> Vec<Stat> {
        let enrolled: u32 = self.courses.iter().map(|course| course.students).sum();
        let active = self
            .assignments
            .iter()
            .filter(|assignment| assignment.status == "Active")
            .count();
        vec![
            Stat::new("Name", &self.name),
            Stat::new("Department", self.department),
            Stat::new("Position", self.position),
            Stat::new("Courses", self.courses.len()),
            Stat::new("Enrolled", enrolled),
            Stat::new("Active assignments", active),
        ]
    }

    /// Tables in tab order.
    pub fn panels(&self) -> Vec<Panel> {
        vec![
            Panel::from_items("Courses", &self.courses),
            Panel::searchable("Students", &self.students),
            Panel::from_items("Assignments", &self.assignments),
            Panel::from_items("Exams", &self.exams),
        ]
    }
}
