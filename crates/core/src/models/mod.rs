//! Shared domain models.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Portal roles a directory record can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Enrolled student.
    Student,
    /// Teaching staff.
    Faculty,
    /// System administrator.
    Admin,
    /// Finance office staff.
    Finance,
    /// Parent or guardian of a student.
    Parent,
    /// Registrar's office staff.
    Registrar,
}

impl Role {
    /// Every role, in the order the login screen offers them.
    pub const ALL: [Role; 6] = [
        Role::Student,
        Role::Faculty,
        Role::Admin,
        Role::Finance,
        Role::Parent,
        Role::Registrar,
    ];

    /// Lowercase wire name (`student`, `faculty`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Faculty => "faculty",
            Role::Admin => "admin",
            Role::Finance => "finance",
            Role::Parent => "parent",
            Role::Registrar => "registrar",
        }
    }

    /// Prefix used when generating record identifiers for this role.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Role::Student => "ST",
            Role::Faculty => "FAC",
            Role::Admin => "ADM",
            Role::Finance => "FIN",
            Role::Parent => "PAR",
            Role::Registrar => "REG",
        }
    }

    /// Capitalised label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Faculty => "Faculty",
            Role::Admin => "Admin",
            Role::Finance => "Finance",
            Role::Parent => "Parent",
            Role::Registrar => "Registrar",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("{s:?} is not a valid role"))
    }
}

/// A directory entry: identity, credential and role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Stable identifier such as `ST12345`.
    pub id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login key; unique across the directory.
    pub email: String,
    /// Salted one-way hash of the password.
    pub password_hash: String,
    /// Role the record logs in as.
    pub role: Role,
    /// Set on students: the id of their parent record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Set on parents: the id of their child's record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_id: Option<String>,
}

impl UserRecord {
    /// First and last name joined for display.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Credentials submitted from the login form.
#[derive(Debug, Clone, Default)]
pub struct LoginRequest {
    /// Email typed on the form.
    pub email: String,
    /// Plaintext password; never stored.
    pub password: String,
    /// Role selected on the form; compared verbatim with the record's role.
    pub role: String,
}

impl LoginRequest {
    /// Request for `email`/`password` claiming `role`.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            role: role.into(),
        }
    }
}

/// Fields submitted from the registration form.
#[derive(Debug, Clone, Default)]
pub struct RegisterRequest {
    /// Given name; must not be blank.
    pub first_name: String,
    /// Family name; must not be blank.
    pub last_name: String,
    /// Login email, unique across the directory.
    pub email: String,
    /// Plaintext password; only its hash is kept.
    pub password: String,
    /// Must equal `password`.
    pub confirm_password: String,
    /// Lowercase role name; must parse as a [`Role`].
    pub role: String,
    /// Student to link when registering a parent.
    pub child_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_round_trip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert!("Student".parse::<Role>().is_err());
        assert!("dean".parse::<Role>().is_err());
    }

    #[test]
    fn record_serializes_with_camel_case_fields() {
        let record = UserRecord {
            id: "PAR12345".to_string(),
            first_name: "Robert".to_string(),
            last_name: "Johnson".to_string(),
            email: "robert.johnson@example.com".to_string(),
            password_hash: "sha256$00$11".to_string(),
            role: Role::Parent,
            parent_id: None,
            child_id: Some("ST12345".to_string()),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["firstName"], "Robert");
        assert_eq!(json["role"], "parent");
        assert_eq!(json["childId"], "ST12345");
        assert!(json.get("parentId").is_none());

        let back: UserRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
