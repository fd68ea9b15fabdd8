//! Institution records: students, teachers, claims, users.
//!
//! Each record type is one named sheet with a fixed, implicit column order.
//! There is no foreign-key enforcement; relationships (claim → student) are
//! matched by string equality on name fields at read time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sheets::Row;

/// A student row from the "Students" sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub class: String,
    pub guardian_phone: String,
    pub balance: f64,
}

impl Student {
    pub const SHEET: &'static str = "Students";
    /// Columns: id, name, class, guardian_phone, balance.
    pub const COLUMNS: usize = 5;

    pub fn from_row(cells: &[String]) -> Option<Self> {
        let row = Row::new(cells);
        Some(Self {
            id: row.text(0)?.to_string(),
            name: row.text(1)?.to_string(),
            class: row.text_or_empty(2),
            guardian_phone: row.text_or_empty(3),
            balance: row.number(4).unwrap_or(0.0),
        })
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.class.clone(),
            self.guardian_phone.clone(),
            format!("{:.2}", self.balance),
        ]
    }
}

/// A teacher row from the "Teachers" sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub phone: String,
}

impl Teacher {
    pub const SHEET: &'static str = "Teachers";
    /// Columns: id, name, subject, phone.
    pub const COLUMNS: usize = 4;

    pub fn from_row(cells: &[String]) -> Option<Self> {
        let row = Row::new(cells);
        Some(Self {
            id: row.text(0)?.to_string(),
            name: row.text(1)?.to_string(),
            subject: row.text_or_empty(2),
            phone: row.text_or_empty(3),
        })
    }
}

/// A welfare claim row from the "Claims" sheet (church application).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    pub id: String,
    pub claimant_name: String,
    pub category: String,
    pub amount: f64,
    pub submitted_at: Option<DateTime<Utc>>,
    /// Name of the student this claim concerns, if any. Matched against
    /// `Student::name` by string equality at read time.
    pub student_name: String,
}

impl Claim {
    pub const SHEET: &'static str = "Claims";
    /// Columns: id, claimant_name, category, amount, submitted_at, student_name.
    pub const COLUMNS: usize = 6;

    pub fn from_row(cells: &[String]) -> Option<Self> {
        let row = Row::new(cells);
        Some(Self {
            id: row.text(0)?.to_string(),
            claimant_name: row.text(1)?.to_string(),
            category: row.text_or_empty(2),
            amount: row.number(3).unwrap_or(0.0),
            submitted_at: row.timestamp(4),
            student_name: row.text_or_empty(5),
        })
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.claimant_name.clone(),
            self.category.clone(),
            format!("{:.2}", self.amount),
            self.submitted_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
            self.student_name.clone(),
        ]
    }
}

/// A claim joined with its matching student, when one exists.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimWithStudent {
    #[serde(flatten)]
    pub claim: Claim,
    pub student: Option<Student>,
}

/// A phone-keyed user row from the "MobileUsers" sheet (OTP login).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobileUser {
    pub phone: String,
    pub name: String,
    pub role: String,
}

impl MobileUser {
    pub const SHEET: &'static str = "MobileUsers";
    /// Columns: phone, name, role.
    pub const COLUMNS: usize = 3;

    pub fn from_row(cells: &[String]) -> Option<Self> {
        let row = Row::new(cells);
        Some(Self {
            phone: row.text(0)?.to_string(),
            name: row.text_or_empty(1),
            role: row.text(2).unwrap_or("member").to_string(),
        })
    }
}

/// An administrator row from the "AdminUsers" sheet (password login).
#[derive(Debug, Clone, Deserialize)]
pub struct AdminUser {
    pub username: String,
    pub password: String,
    pub role: String,
}

impl AdminUser {
    pub const SHEET: &'static str = "AdminUsers";
    /// Columns: username, password, role.
    pub const COLUMNS: usize = 3;

    pub fn from_row(cells: &[String]) -> Option<Self> {
        let row = Row::new(cells);
        Some(Self {
            username: row.text(0)?.to_string(),
            password: row.text(1)?.to_string(),
            role: row.text(2).unwrap_or("admin").to_string(),
        })
    }
}
