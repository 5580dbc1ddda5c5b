//! Student records, shared by the student's own dashboard and the parent view.

use serde::Serialize;

use crate::models::UserRecord;

use super::{finance::dollars, Panel, PanelKind, Stat, Tabular};

/// Identity and standing of the student.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentProfile {
    /// Student id from the directory.
    pub id: String,
    /// Full name from the directory.
    pub name: String,
    /// Email from the directory.
    pub email: String,
    /// Degree program.
    pub program: &'static str,
    /// Current semester.
    pub semester: &'static str,
    /// Year of study.
    pub year: &'static str,
    /// Cumulative grade point average.
    pub gpa: f32,
    /// Overall attendance, percent.
    pub attendance: u8,
}

/// Course the student takes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrolledCourse {
    /// Course code.
    pub id: &'static str,
    /// Course title.
    pub name: &'static str,
    /// Teaching faculty member.
    pub instructor: &'static str,
    /// Current letter grade.
    pub grade: &'static str,
    /// Credit hours.
    pub credits: u8,
    /// Attendance, percent.
    pub attendance: u8,
}

impl Tabular for EnrolledCourse {
    const COLUMNS: &'static [&'static str] =
        &["Code", "Course", "Instructor", "Grade", "Credits", "Attendance"];

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.to_string(),
            self.instructor.to_string(),
            self.grade.to_string(),
            self.credits.to_string(),
            format!("{}%", self.attendance),
        ]
    }
}

/// Assignment due in one of the student's courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    /// Assignment id.
    pub id: &'static str,
    /// Course code.
    pub course: &'static str,
    /// Assignment title.
    pub title: &'static str,
    /// Due date.
    pub due_date: &'static str,
    /// Submission state.
    pub status: &'static str,
    /// Score awarded, or `-` until graded.
    pub grade: &'static str,
}

impl Tabular for Assignment {
    const COLUMNS: &'static [&'static str] = &["ID", "Course", "Title", "Due", "Status", "Grade"];

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn cells(&self) -> Vec<String> {
        [self.id, self.course, self.title, self.due_date, self.status, self.grade]
            .map(str::to_string)
            .to_vec()
    }
}

/// Upcoming exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exam {
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
}

impl Tabular for Exam {
    const COLUMNS: &'static [&'static str] = &["ID", "Course", "Exam", "Date", "Time", "Location"];

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn cells(&self) -> Vec<String> {
        [self.id, self.course, self.title, self.date, self.time, self.location]
            .map(str::to_string)
            .to_vec()
    }
}

/// Entry on the student's fee account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    /// Transaction id.
    pub id: &'static str,
    /// Posting date.
    pub date: &'static str,
    /// What the entry is for.
    pub description: &'static str,
    /// Whole dollars.
    pub amount: u32,
    /// `Credit` or `Debit`.
    pub kind: &'static str,
}

impl Tabular for Transaction {
    const COLUMNS: &'static [&'static str] = &["ID", "Date", "Description", "Amount", "Type"];

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.date.to_string(),
            self.description.to_string(),
            dollars(self.amount),
            self.kind.to_string(),
        ]
    }
}

/// Fee account summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Financials {
    /// Fees owed this semester, whole dollars.
    pub tuition_fee: u32,
    /// Paid so far.
    pub paid_amount: u32,
    /// Outstanding balance.
    pub due_amount: u32,
    /// Date the balance is due.
    pub due_date: &'static str,
    /// Account history, oldest first.
    pub transactions: Vec<Transaction>,
}

/// Message posted to the student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Notification id.
    pub id: &'static str,
    /// Posting date.
    pub date: &'static str,
    /// Headline.
    pub title: &'static str,
    /// Body text.
    pub message: &'static str,
}

impl Tabular for Notification {
    const COLUMNS: &'static [&'static str] = &["Date", "Title", "Message"];

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn cells(&self) -> Vec<String> {
        [self.date, self.title, self.message]
            .map(str::to_string)
            .to_vec()
    }
}

/// Recorded absence, shown to parents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Absence {
    /// Day missed.
    pub date: &'static str,
    /// Course code.
    pub course: &'static str,
    /// Reason given.
    pub reason: &'static str,
}

impl Tabular for Absence {
    const COLUMNS: &'static [&'static str] = &["Date", "Course", "Reason"];

    fn key(&self) -> String {
        format!("{}:{}", self.date, self.course)
    }

    fn cells(&self) -> Vec<String> {
        [self.date, self.course, self.reason]
            .map(str::to_string)
            .to_vec()
    }
}

/// Everything the student dashboard shows.
#[derive(Debug, Clone, Serialize)]
pub struct StudentDashboard {
    /// Identity and standing.
    pub profile: StudentProfile,
    /// Courses taken.
    pub courses: Vec<EnrolledCourse>,
    /// Open and graded assignments.
    pub assignments: Vec<Assignment>,
    /// Upcoming exams.
    pub exams: Vec<Exam>,
    /// Fee account.
    pub financials: Financials,
    /// Recent notices.
    pub notifications: Vec<Notification>,
}

impl StudentDashboard {
    /// Academic record for `student`; identity fields come from the record.
    pub fn mock(student: &UserRecord) -> Self {
        Self {
            profile: StudentProfile {
                id: student.id.clone(),
                name: student.full_name(),
                email: student.email.clone(),
                program: "Bachelor of Computer Science",
                semester: "Fall 2023",
                year: "3rd Year",
                gpa: 3.75,
                attendance: 92,
            },
            courses: vec![
                EnrolledCourse {
                    id: "CS301",
                    name: "Data Structures",
                    instructor: "Dr. Smith",
                    grade: "A",
                    credits: 4,
                    attendance: 95,
                },
                EnrolledCourse {
                    id: "CS302",
                    name: "Algorithms",
                    instructor: "Dr. Johnson",
                    grade: "A-",
                    credits: 4,
                    attendance: 90,
                },
                EnrolledCourse {
                    id: "CS303",
                    name: "Database Systems",
                    instructor: "Prof. Williams",
                    grade: "B+",
                    credits: 3,
                    attendance: 88,
                },
                EnrolledCourse {
                    id: "CS304",
                    name: "Web Development",
                    instructor: "Prof. Davis",
                    grade: "A",
                    credits: 3,
                    attendance: 96,
                },
                EnrolledCourse {
                    id: "MATH301",
                    name: "Discrete Mathematics",
                    instructor: "Dr. Brown",
                    grade: "B",
                    credits: 3,
                    attendance: 85,
                },
            ],
            assignments: vec![
                Assignment {
                    id: "A1001",
                    course: "CS301",
                    title: "Binary Tree Implementation",
                    due_date: "2023-10-15",
                    status: "Submitted",
                    grade: "95/100",
                },
                Assignment {
                    id: "A1002",
                    course: "CS302",
                    title: "Sorting Algorithm Analysis",
                    due_date: "2023-10-20",
                    status: "Pending",
                    grade: "-",
                },
                Assignment {
                    id: "A1003",
                    course: "CS303",
                    title: "Database Design Project",
                    due_date: "2023-10-25",
                    status: "Submitted",
                    grade: "88/100",
                },
                Assignment {
                    id: "A1004",
                    course: "CS304",
                    title: "React Application",
                    due_date: "2023-10-30",
                    status: "In Progress",
                    grade: "-",
                },
                Assignment {
                    id: "A1005",
                    course: "MATH301",
                    title: "Graph Theory Problems",
                    due_date: "2023-11-05",
                    status: "Not Started",
                    grade: "-",
                },
            ],
            exams: vec![
                Exam {
                    id: "E2001",
                    course: "CS301",
                    title: "Midterm Exam",
                    date: "2023-10-10",
                    time: "10:00 AM - 12:00 PM",
                    location: "Hall A",
                },
                Exam {
                    id: "E2002",
                    course: "CS302",
                    title: "Quiz 2",
                    date: "2023-10-18",
                    time: "2:00 PM - 3:00 PM",
                    location: "Room 105",
                },
                Exam {
                    id: "E2003",
                    course: "CS303",
                    title: "Practical Test",
                    date: "2023-10-22",
                    time: "9:00 AM - 11:00 AM",
                    location: "Lab 3",
                },
                Exam {
                    id: "E2004",
                    course: "MATH301",
                    title: "Final Exam",
                    date: "2023-11-20",
                    time: "1:00 PM - 4:00 PM",
                    location: "Hall B",
                },
            ],
            financials: Financials {
                tuition_fee: 12000,
                paid_amount: 8000,
                due_amount: 4000,
                due_date: "2023-10-30",
                transactions: vec![
                    Transaction {
                        id: "T3001",
                        date: "2023-08-15",
                        description: "Tuition Fee Payment",
                        amount: 5000,
                        kind: "Credit",
                    },
                    Transaction {
                        id: "T3002",
                        date: "2023-09-10",
                        description: "Library Fine",
                        amount: 50,
                        kind: "Debit",
                    },
                    Transaction {
                        id: "T3003",
                        date: "2023-09-20",
                        description: "Tuition Fee Payment",
                        amount: 3000,
                        kind: "Credit",
                    },
                    Transaction {
                        id: "T3004",
                        date: "2023-10-05",
                        description: "Lab Fee",
                        amount: 200,
                        kind: "Debit",
                    },
                ],
            },
            notifications: vec![
                Notification {
                    id: "N4001",
                    date: "2023-10-08",
                    title: "Assignment Deadline Extended",
                    message: "The deadline for CS302 Sorting Algorithm Analysis has been extended to October 25.",
                },
                Notification {
                    id: "N4002",
                    date: "2023-10-07",
                    title: "New Course Material Available",
                    message: "New lecture notes for Database Systems are now available on the course portal.",
                },
                Notification {
                    id: "N4003",
                    date: "2023-10-05",
                    title: "Tuition Fee Reminder",
                    message: "Please clear your remaining tuition fee balance by October 30.",
                },
                Notification {
                    id: "N4004",
                    date: "2023-10-03",
                    title: "Campus Event",
                    message: "Tech Symposium will be held on October 15 at the Main Auditorium.",
                },
            ],
        }
    }

    /// Credits across enrolled courses.
    pub fn total_credits(&self) -> u32 {
        self.courses.iter().map(|course| u32::from(course.credits)).sum()
    }

    /// Share of tuition already paid, in whole percent.
    pub fn paid_percent(&self) -> u32 {
        let fin = &self.financials;
        if fin.tuition_fee == 0 {
            return 100;
        }
        fin.paid_amount * 100 / fin.tuition_fee
    }

    /// Headline figures, ending with the fee balance.
    pub fn stats(&self) -> Vec<Stat> {
        let profile = &self.profile;
        vec![
            Stat::new("Name", &profile.name),
            Stat::new("ID", &profile.id),
            Stat::new("Program", profile.program),
            Stat::new("Year", format!("{} ({})", profile.year, profile.semester)),
            Stat::new("GPA", format!("{:.2}", profile.gpa)),
            Stat::new("Attendance", format!("{}%", profile.attendance)),
            Stat::new("Credits", self.total_credits()),
            Stat::new(
                "Fees due",
                format!(
                    "{} by {} ({}% paid)",
                    dollars(self.financials.due_amount),
                    self.financials.due_date,
                    self.paid_percent()
                ),
            ),
        ]
    }

    /// Tables in tab order.
    pub fn panels(&self) -> Vec<Panel> {
        vec![
            Panel::from_items("Courses", &self.courses),
            Panel::from_items("Assignments", &self.assignments).with_kind(PanelKind::Assignments),
            Panel::from_items("Exams", &self.exams),
            Panel::from_items("Fees", &self.financials.transactions)
                .with_kind(PanelKind::Transactions),
            Panel::from_items("Notifications", &self.notifications),
        ]
    }
}

/// Parent view over the linked student's records.
#[derive(Debug, Clone, Serialize)]
pub struct ParentDashboard {
    /// Logged-in parent's full name.
    pub parent_name: String,
    /// The linked student's dashboard.
    pub child: StudentDashboard,
    /// Recorded absences.
    pub absences: Vec<Absence>,
}

impl ParentDashboard {
    /// Demo dataset for `parent` viewing `child`.
    pub fn mock(parent: &UserRecord, child: &UserRecord) -> Self {
        Self {
            parent_name: parent.full_name(),
            child: StudentDashboard::mock(child),
            absences: vec![
                Absence {
                    date: "2023-09-05",
                    course: "CS302",
                    reason: "Sick",
                },
                Absence {
                    date: "2023-09-15",
                    course: "MATH301",
                    reason: "Family Emergency",
                },
                Absence {
                    date: "2023-10-02",
                    course: "CS303",
                    reason: "Not Provided",
                },
            ],
        }
    }

    /// Parent name, then the child's figures, then absences.
    pub fn stats(&self) -> Vec<Stat> {
        let mut stats = vec![Stat::new("Parent", &self.parent_name)];
        stats.extend(self.child.stats());
        stats.push(Stat::new("Absences", self.absences.len()));
        stats
    }

    /// The child's tables plus attendance, courses keyed by instructor.
    pub fn panels(&self) -> Vec<Panel> {
        // rows in the course tab are keyed by instructor so they can be contacted
        let mut courses =
            Panel::from_items("Courses", &self.child.courses).with_kind(PanelKind::Teachers);
        for (row, course) in courses.rows.iter_mut().zip(&self.child.courses) {
            row.key = course.instructor.to_string();
        }

        vec![
            courses,
            Panel::from_items("Assignments", &self.child.assignments),
            Panel::from_items("Exams", &self.child.exams),
            Panel::from_items("Attendance", &self.absences),
            Panel::from_items("Fees", &self.child.financials.transactions),
            Panel::from_items("Notifications", &self.child.notifications),
        ]
    }
}
