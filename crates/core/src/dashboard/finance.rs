//! Finance office dashboard: fee schedules, payments and scholarships.

use serde::Serialize;

use super::{Panel, Searchable, Stat, Tabular};

/// Per-semester fees for one program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeeSchedule {
    /// Schedule id.
    pub id: &'static str,
    /// Degree program.
    pub program: &'static str,
    /// Semester label.
    pub semester: &'static str,
    /// Tuition, whole dollars.
    pub tuition_fee: u32,
    /// Lab fee, whole dollars.
    pub lab_fee: u32,
    /// Library fee, whole dollars.
    pub library_fee: u32,
}

impl FeeSchedule {
    /// Sum of all fee components.
    pub fn total_fee(&self) -> u32 {
        self.tuition_fee + self.lab_fee + self.library_fee
    }
}

impl Tabular for FeeSchedule {
    const COLUMNS: &'static [&'static str] =
        &["ID", "Program", "Semester", "Tuition", "Lab", "Library", "Total"];

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.program.to_string(),
            self.semester.to_string(),
            dollars(self.tuition_fee),
            dollars(self.lab_fee),
            dollars(self.library_fee),
            dollars(self.total_fee()),
        ]
    }
}

/// Payment received from a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payment {
    /// Payment id.
    pub id: &'static str,
    /// Paying student.
    pub student_id: &'static str,
    /// Paying student's name.
    pub student_name: &'static str,
    /// Whole dollars.
    pub amount: u32,
    /// Payment date.
    pub date: &'static str,
    /// Payment method.
    pub method: &'static str,
    /// Settlement state.
    pub status: &'static str,
}

impl Searchable for Payment {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.student_name, self.student_id, self.id, self.method]
    }
}

impl Tabular for Payment {
    const COLUMNS: &'static [&'static str] =
        &["ID", "Student ID", "Student", "Amount", "Date", "Method", "Status"];

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.student_id.to_string(),
            self.student_name.to_string(),
            dollars(self.amount),
            self.date.to_string(),
            self.method.to_string(),
            self.status.to_string(),
        ]
    }
}

/// Scholarship program and its awards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scholarship {
    /// Scholarship id.
    pub id: &'static str,
    /// Program name.
    pub name: &'static str,
    /// Number of recipients.
    pub recipients: u32,
    /// Total awarded, whole dollars.
    pub total_amount: u32,
    /// Eligibility summary.
    pub criteria: &'static str,
    /// Whether the program is accepting awards.
    pub status: &'static str,
}

impl Tabular for Scholarship {
    const COLUMNS: &'static [&'static str] =
        &["ID", "Scholarship", "Recipients", "Amount", "Criteria", "Status"];

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.to_string(),
            self.recipients.to_string(),
            dollars(self.total_amount),
            self.criteria.to_string(),
            self.status.to_string(),
        ]
    }
}

/// Everything the finance dashboard shows.
#[derive(Debug, Clone, Serialize)]
pub struct FinanceDashboard {
    /// Headline figures.
    pub stats: Vec<Stat>,
    /// Fees per program.
    pub fee_structure: Vec<FeeSchedule>,
    /// Recent payments; searchable.
    pub payments: Vec<Payment>,
    /// Scholarship programs.
    pub scholarships: Vec<Scholarship>,
}

impl FinanceDashboard {
    /// Fixed demo dataset.
    pub fn mock() -> Self {
        Self {
            stats: vec![
                Stat::new("Total revenue", dollars(1_250_000)),
                Stat::new("Pending payments", dollars(85_000)),
                Stat::new("Scholarships", dollars(120_000)),
                Stat::new("Expenses", dollars(950_000)),
                Stat::new("Pending invoices", 15),
                Stat::new("Recent transactions", 45),
            ],
            fee_structure: vec![
                FeeSchedule {
                    id: "FS1001",
                    program: "Bachelor of Computer Science",
                    semester: "Fall 2023",
                    tuition_fee: 12000,
                    lab_fee: 1500,
                    library_fee: 500,
                },
                FeeSchedule {
                    id: "FS1002",
                    program: "Bachelor of Business Administration",
                    semester: "Fall 2023",
                    tuition_fee: 10000,
                    lab_fee: 800,
                    library_fee: 500,
                },
                FeeSchedule {
                    id: "FS1003",
                    program: "Bachelor of Electrical Engineering",
                    semester: "Fall 2023",
                    tuition_fee: 13000,
                    lab_fee: 2000,
                    library_fee: 500,
                },
                FeeSchedule {
                    id: "FS1004",
                    program: "Master of Computer Science",
                    semester: "Fall 2023",
                    tuition_fee: 15000,
                    lab_fee: 1800,
                    library_fee: 700,
                },
                FeeSchedule {
                    id: "FS1005",
                    program: "Master of Business Administration",
                    semester: "Fall 2023",
                    tuition_fee: 16000,
                    lab_fee: 1000,
                    library_fee: 700,
                },
            ],
            payments: vec![
                Payment {
                    id: "PMT1001",
                    student_id: "ST1001",
                    student_name: "Alex Johnson",
                    amount: 7000,
                    date: "2023-09-15",
                    method: "Credit Card",
                    status: "Completed",
                },
                Payment {
                    id: "PMT1002",
                    student_id: "ST1002",
                    student_name: "Emma Davis",
                    amount: 5000,
                    date: "2023-09-18",
                    method: "Bank Transfer",
                    status: "Completed",
                },
                Payment {
                    id: "PMT1003",
                    student_id: "ST1003",
                    student_name: "Michael Brown",
                    amount: 7500,
                    date: "2023-09-20",
                    method: "Online Payment",
                    status: "Completed",
                },
                Payment {
                    id: "PMT1004",
                    student_id: "ST1004",
                    student_name: "Sophia Wilson",
                    amount: 6000,
                    date: "2023-09-25",
                    method: "Credit Card",
                    status: "Pending",
                },
                Payment {
                    id: "PMT1005",
                    student_id: "ST1005",
                    student_name: "James Taylor",
                    amount: 8000,
                    date: "2023-09-28",
                    method: "Bank Transfer",
                    status: "Pending",
                },
            ],
            scholarships: vec![
                Scholarship {
                    id: "SCH1001",
                    name: "Merit Scholarship",
                    recipients: 15,
                    total_amount: 75000,
                    criteria: "GPA above 3.8",
                    status: "Active",
                },
                Scholarship {
                    id: "SCH1002",
                    name: "Sports Excellence",
                    recipients: 8,
                    total_amount: 32000,
                    criteria: "Outstanding sports achievement",
                    status: "Active",
                },
                Scholarship {
                    id: "SCH1003",
                    name: "Financial Need",
                    recipients: 25,
                    total_amount: 100000,
                    criteria: "Demonstrated financial need",
                    status: "Active",
                },
                Scholarship {
                    id: "SCH1004",
                    name: "Research Grant",
                    recipients: 5,
                    total_amount: 25000,
                    criteria: "Research proposal approval",
                    status: "Active",
                },
                Scholarship {
                    id: "SCH1005",
                    name: "International Student",
                    recipients: 10,
                    total_amount: 50000,
                    criteria: "International students with high academic standing",
                    status: "Active",
                },
            ],
        }
    }

    /// Payments matching the finance search box (student name, student id, payment id, method).
    pub fn payments_matching(&self, query: &str) -> Vec<&Payment> {
        super::filter_matching(&self.payments, query)
    }

    /// Tables in tab order.
    pub fn panels(&self) -> Vec<Panel> {
        vec![
            Panel::searchable("Payments", &self.payments),
            Panel::from_items("Fee Structure", &self.fee_structure),
            Panel::from_items("Scholarships", &self.scholarships),
        ]
    }
}

/// Whole-dollar amount with thousands separators, e.g. `$1,250,000`.
pub fn dollars(amount: u32) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_dollars() {
        assert_eq!(dollars(0), "$0");
        assert_eq!(dollars(500), "$500");
        assert_eq!(dollars(14000), "$14,000");
        assert_eq!(dollars(1_250_000), "$1,250,000");
    }

    #[test]
    fn fee_totals_add_up() {
        let finance = FinanceDashboard::mock();
        let totals: Vec<u32> = finance.fee_structure.iter().map(FeeSchedule::total_fee).collect();
        assert_eq!(totals, vec![14000, 11300, 15500, 17500, 17700]);
    }

    #[test]
    fn payments_filter_by_method() {
        let finance = FinanceDashboard::mock();
        let transfers: Vec<_> = finance
            .payments_matching("bank transfer")
            .iter()
            .map(|payment| payment.id)
            .collect();
        assert_eq!(transfers, vec!["PMT1002", "PMT1005"]);
        assert_eq!(finance.payments_matching("pmt").len(), 5);
        assert!(finance.payments_matching("completed").is_empty());
    }
}
