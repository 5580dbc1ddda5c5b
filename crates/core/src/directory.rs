//! In-memory user directory.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;

use crate::{
    credentials::CredentialHasher,
    models::{Role, UserRecord},
};

struct Seed {
    id: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    email: &'static str,
    password: &'static str,
    role: Role,
    parent_id: Option<&'static str>,
    child_id: Option<&'static str>,
}

static SEEDS: Lazy<Vec<Seed>> = Lazy::new(|| {
    vec![
        Seed {
            id: "ST12345",
            first_name: "Alex",
            last_name: "Johnson",
            email: "alex.johnson@example.com",
            password: "password123",
            role: Role::Student,
            parent_id: Some("PAR12345"),
            child_id: None,
        },
        Seed {
            id: "FAC12345",
            first_name: "Sarah",
            last_name: "Williams",
            email: "sarah.williams@example.com",
            password: "password123",
            role: Role::Faculty,
            parent_id: None,
            child_id: None,
        },
        Seed {
            id: "ADM12345",
            first_name: "John",
            last_name: "Anderson",
            email: "john.anderson@example.com",
            password: "password123",
            role: Role::Admin,
            parent_id: None,
            child_id: None,
        },
        Seed {
            id: "FIN12345",
            first_name: "Jennifer",
            last_name: "Taylor",
            email: "jennifer.taylor@example.com",
            password: "password123",
            role: Role::Finance,
            parent_id: None,
            child_id: None,
        },
        Seed {
            id: "PAR12345",
            first_name: "Robert",
            last_name: "Johnson",
            email: "robert.johnson@example.com",
            password: "password123",
            role: Role::Parent,
            parent_id: None,
            child_id: Some("ST12345"),
        },
    ]
});

/// Sample login for a role, as advertised on the login screen.
pub fn sample_credentials(role: Role) -> Option<(&'static str, &'static str)> {
    SEEDS
        .iter()
        .find(|seed| seed.role == role)
        .map(|seed| (seed.email, seed.password))
}

/// Error raised by [`UserDirectory::link_guardian`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    /// No record carries the given id.
    #[error("no user with id {0}")]
    UnknownId(String),
    /// The record exists but has the wrong role for its side of the link.
    #[error("{id} is a {actual}, expected a {expected}")]
    WrongRole {
        /// Offending record id.
        id: String,
        /// Role the link requires.
        expected: Role,
        /// Role the record has.
        actual: Role,
    },
}

/// Thread-safe directory of user records, cheap to clone.
#[derive(Clone)]
pub struct UserDirectory {
    inner: Arc<RwLock<Inner>>,
}

struct Inner {
    users: Vec<UserRecord>,
    next_serial: u64,
}

impl UserDirectory {
    /// Build a directory holding exactly `users`.
    pub fn new(users: Vec<UserRecord>) -> Self {
        let next_serial = users
            .iter()
            .filter_map(|user| id_serial(&user.id))
            .max()
            .map(|max| max.saturating_add(1))
            .unwrap_or(1);
        Self {
            inner: Arc::new(RwLock::new(Inner { users, next_serial })),
        }
    }

    /// Build the directory from the fixed seed records, hashing their passwords.
    pub fn seeded(hasher: &dyn CredentialHasher) -> Self {
        let users = SEEDS
            .iter()
            .map(|seed| UserRecord {
                id: seed.id.to_string(),
                first_name: seed.first_name.to_string(),
                last_name: seed.last_name.to_string(),
                email: seed.email.to_string(),
                password_hash: hasher.hash(seed.password),
                role: seed.role,
                parent_id: seed.parent_id.map(str::to_string),
                child_id: seed.child_id.map(str::to_string),
            })
            .collect();
        Self::new(users)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.inner.read().users.len()
    }

    /// Whether the directory holds no records.
    pub fn is_empty(&self) -> bool {
        self.inner.read().users.is_empty()
    }

    /// Snapshot of every record.
    pub fn users(&self) -> Vec<UserRecord> {
        self.inner.read().users.clone()
    }

    /// First record whose email equals `email` exactly.
    pub fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        self.inner
            .read()
            .users
            .iter()
            .find(|user| user.email == email)
            .cloned()
    }

    /// Record with the given id.
    pub fn find_by_id(&self, id: &str) -> Option<UserRecord> {
        self.inner
            .read()
            .users
            .iter()
            .find(|user| user.id == id)
            .cloned()
    }

    /// Whether any record uses `email`.
    pub fn contains_email(&self, email: &str) -> bool {
        self.inner.read().users.iter().any(|user| user.email == email)
    }

    /// Append a new record with a freshly allocated id and return it.
    ///
    /// Returns `None` when the email is already taken. The check and the
    /// insert happen under one write lock.
    pub fn insert(
        &self,
        first_name: String,
        last_name: String,
        email: String,
        password_hash: String,
        role: Role,
    ) -> Option<UserRecord> {
        let mut inner = self.inner.write();
        let idx = inner.push_new(first_name, last_name, email, password_hash, role)?;
        Some(inner.users[idx].clone())
    }

    /// Append a parent record already linked to `student_id`.
    ///
    /// Either the parent is added and linked or the directory is left
    /// untouched. `Ok(None)` means the email is already taken.
    pub fn insert_guardian(
        &self,
        first_name: String,
        last_name: String,
        email: String,
        password_hash: String,
        student_id: &str,
    ) -> Result<Option<UserRecord>, LinkError> {
        let mut inner = self.inner.write();
        let student_idx = position_with_role(&inner.users, student_id, Role::Student)?;
        let Some(parent_idx) =
            inner.push_new(first_name, last_name, email, password_hash, Role::Parent)
        else {
            return Ok(None);
        };
        link_indices(&mut inner.users, parent_idx, student_idx);
        Ok(Some(inner.users[parent_idx].clone()))
    }

    /// Link a parent and a student in both directions, or not at all.
    ///
    /// A student has one parent and a parent one child, so links replaced
    /// on either side are cleared from their other end.
    pub fn link_guardian(&self, parent_id: &str, student_id: &str) -> Result<(), LinkError> {
        let mut inner = self.inner.write();
        let parent_idx = position_with_role(&inner.users, parent_id, Role::Parent)?;
        let student_idx = position_with_role(&inner.users, student_id, Role::Student)?;
        link_indices(&mut inner.users, parent_idx, student_idx);
        Ok(())
    }

    /// Parent → child two-hop lookup. Dangling references resolve to `None`.
    pub fn child_of(&self, parent_id: &str) -> Option<UserRecord> {
        let inner = self.inner.read();
        let child_id = inner
            .users
            .iter()
            .find(|user| user.id == parent_id)?
            .child_id
            .as_deref()?;
        inner.users.iter().find(|user| user.id == child_id).cloned()
    }
}

impl Inner {
    /// Push a fresh record and return its index, or `None` if `email` is taken.
    fn push_new(
        &mut self,
        first_name: String,
        last_name: String,
        email: String,
        password_hash: String,
        role: Role,
    ) -> Option<usize> {
        if self.users.iter().any(|user| user.email == email) {
            return None;
        }

        let id = loop {
            let candidate = format!("{}{}", role.id_prefix(), self.next_serial);
            self.next_serial = self.next_serial.wrapping_add(1);
            if !self.users.iter().any(|user| user.id == candidate) {
                break candidate;
            }
        };

        self.users.push(UserRecord {
            id,
            first_name,
            last_name,
            email,
            password_hash,
            role,
            parent_id: None,
            child_id: None,
        });
        Some(self.users.len() - 1)
    }
}

fn link_indices(users: &mut [UserRecord], parent_idx: usize, student_idx: usize) {
    let parent_id = users[parent_idx].id.clone();
    let student_id = users[student_idx].id.clone();
    let previous_child = users[parent_idx].child_id.replace(student_id.clone());
    let previous_parent = users[student_idx].parent_id.replace(parent_id.clone());

    for user in users.iter_mut() {
        if user.id != student_id
            && previous_child.as_deref() == Some(user.id.as_str())
            && user.parent_id.as_deref() == Some(parent_id.as_str())
        {
            user.parent_id = None;
        }
        if user.id != parent_id
            && previous_parent.as_deref() == Some(user.id.as_str())
            && user.child_id.as_deref() == Some(student_id.as_str())
        {
            user.child_id = None;
        }
    }
}

fn position_with_role(users: &[UserRecord], id: &str, expected: Role) -> Result<usize, LinkError> {
    let idx = users
        .iter()
        .position(|user| user.id == id)
        .ok_or_else(|| LinkError::UnknownId(id.to_string()))?;
    let actual = users[idx].role;
    if actual != expected {
        return Err(LinkError::WrongRole {
            id: id.to_string(),
            expected,
            actual,
        });
    }
    Ok(idx)
}

/// Numeric suffix of an id such as `FAC12345`.
fn id_serial(id: &str) -> Option<u64> {
    static ID_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^[A-Z]+(\d+)$").expect("invalid id regex"));

    ID_RE
        .captures(id)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::SaltedSha256;

    #[test]
    fn seeds_are_consistent() {
        let directory = UserDirectory::seeded(&SaltedSha256);
        assert_eq!(directory.len(), 5);

        let parent = directory.find_by_id("PAR12345").expect("parent seeded");
        let child = directory.child_of(&parent.id).expect("child resolves");
        assert_eq!(child.id, "ST12345");
        assert_eq!(child.parent_id.as_deref(), Some("PAR12345"));
    }

    #[test]
    fn insert_allocates_unique_increasing_ids() {
        let directory = UserDirectory::seeded(&SaltedSha256);
        let first = directory
            .insert(
                "Emma".into(),
                "Davis".into(),
                "emma.davis@example.com".into(),
                "hash".into(),
                Role::Student,
            )
            .expect("novel email");
        let second = directory
            .insert(
                "Lisa".into(),
                "Thompson".into(),
                "lisa.thompson@example.com".into(),
                "hash".into(),
                Role::Faculty,
            )
            .expect("novel email");

        assert_eq!(first.id, "ST12346");
        assert_eq!(second.id, "FAC12347");
        assert_eq!(directory.len(), 7);
    }

    #[test]
    fn insert_rejects_taken_email() {
        let directory = UserDirectory::seeded(&SaltedSha256);
        let taken = directory.insert(
            "Alex".into(),
            "Again".into(),
            "alex.johnson@example.com".into(),
            "hash".into(),
            Role::Student,
        );
        assert!(taken.is_none());
        assert_eq!(directory.len(), 5);
    }

    #[test]
    fn link_guardian_sets_both_sides() {
        let directory = UserDirectory::seeded(&SaltedSha256);
        let student = directory
            .insert(
                "Mia".into(),
                "Johnson".into(),
                "mia.johnson@example.com".into(),
                "hash".into(),
                Role::Student,
            )
            .unwrap();

        directory.link_guardian("PAR12345", &student.id).unwrap();
        let parent = directory.find_by_id("PAR12345").unwrap();
        assert_eq!(parent.child_id.as_deref(), Some(student.id.as_str()));
        let student = directory.find_by_id(&student.id).unwrap();
        assert_eq!(student.parent_id.as_deref(), Some("PAR12345"));
    }

    #[test]
    fn relinking_a_parent_clears_the_old_child() {
        let directory = UserDirectory::seeded(&SaltedSha256);
        let mia = directory
            .insert(
                "Mia".into(),
                "Johnson".into(),
                "mia.johnson@example.com".into(),
                "hash".into(),
                Role::Student,
            )
            .unwrap();

        directory.link_guardian("PAR12345", &mia.id).unwrap();
        let alex = directory.find_by_id("ST12345").unwrap();
        assert_eq!(alex.parent_id, None);
        assert_eq!(directory.child_of("PAR12345").unwrap().id, mia.id);
    }

    #[test]
    fn relinking_a_student_clears_the_old_parent() {
        let directory = UserDirectory::seeded(&SaltedSha256);
        let linda = directory
            .insert(
                "Linda".into(),
                "Johnson".into(),
                "linda.johnson@example.com".into(),
                "hash".into(),
                Role::Parent,
            )
            .unwrap();

        directory.link_guardian(&linda.id, "ST12345").unwrap();
        assert_eq!(directory.find_by_id("PAR12345").unwrap().child_id, None);
        let alex = directory.find_by_id("ST12345").unwrap();
        assert_eq!(alex.parent_id.as_deref(), Some(linda.id.as_str()));

        // relinking the same pair is a no-op
        directory.link_guardian(&linda.id, "ST12345").unwrap();
        assert_eq!(directory.child_of(&linda.id).unwrap().id, "ST12345");
    }

    #[test]
    fn insert_guardian_links_or_leaves_directory_untouched() {
        let directory = UserDirectory::seeded(&SaltedSha256);
        let err = directory
            .insert_guardian(
                "Linda".into(),
                "Johnson".into(),
                "linda.johnson@example.com".into(),
                "hash".into(),
                "FAC12345",
            )
            .unwrap_err();
        assert!(matches!(err, LinkError::WrongRole { .. }));
        assert_eq!(directory.len(), 5);

        let taken = directory
            .insert_guardian(
                "Robert".into(),
                "Again".into(),
                "robert.johnson@example.com".into(),
                "hash".into(),
                "ST12345",
            )
            .unwrap();
        assert!(taken.is_none());
        assert_eq!(directory.child_of("PAR12345").unwrap().id, "ST12345");

        let linda = directory
            .insert_guardian(
                "Linda".into(),
                "Johnson".into(),
                "linda.johnson@example.com".into(),
                "hash".into(),
                "ST12345",
            )
            .unwrap()
            .unwrap();
        assert_eq!(linda.role, Role::Parent);
        assert!(linda.id.starts_with("PAR"));
        assert_eq!(linda.child_id.as_deref(), Some("ST12345"));
        let alex = directory.find_by_id("ST12345").unwrap();
        assert_eq!(alex.parent_id.as_deref(), Some(linda.id.as_str()));
        assert_eq!(directory.find_by_id("PAR12345").unwrap().child_id, None);
    }

    #[test]
    fn max_serial_does_not_overflow() {
        let mut users = UserDirectory::seeded(&SaltedSha256).users();
        users[0].id = format!("ST{}", u64::MAX);
        let directory = UserDirectory::new(users);

        let first = directory
            .insert(
                "Emma".into(),
                "Davis".into(),
                "emma.davis@example.com".into(),
                "hash".into(),
                Role::Student,
            )
            .unwrap();
        assert_eq!(first.id, "ST0");
        let second = directory
            .insert(
                "Lisa".into(),
                "Thompson".into(),
                "lisa.thompson@example.com".into(),
                "hash".into(),
                Role::Faculty,
            )
            .unwrap();
        assert_eq!(second.id, "FAC1");
    }

    #[test]
    fn link_guardian_rejects_wrong_roles() {
        let directory = UserDirectory::seeded(&SaltedSha256);
        let err = directory.link_guardian("FAC12345", "ST12345").unwrap_err();
        assert_eq!(
            err,
            LinkError::WrongRole {
                id: "FAC12345".into(),
                expected: Role::Parent,
                actual: Role::Faculty,
            }
        );
        assert!(matches!(
            directory.link_guardian("PAR12345", "ST99999"),
            Err(LinkError::UnknownId(_))
        ));
        let parent = directory.find_by_id("PAR12345").unwrap();
        assert_eq!(parent.child_id.as_deref(), Some("ST12345"));
    }

    #[test]
    fn child_of_tolerates_dangling_links() {
        let mut users = UserDirectory::seeded(&SaltedSha256).users();
        for user in users.iter_mut() {
            if user.id == "PAR12345" {
                user.child_id = Some("ST00000".to_string());
            }
        }
        let directory = UserDirectory::new(users);
        assert!(directory.child_of("PAR12345").is_none());
        assert!(directory.child_of("FAC12345").is_none());
        assert!(directory.child_of("nobody").is_none());
    }

    #[test]
    fn sample_credentials_cover_seeded_roles() {
        assert_eq!(
            sample_credentials(Role::Parent),
            Some(("robert.johnson@example.com", "password123"))
        );
        assert_eq!(sample_credentials(Role::Registrar), None);
    }

    #[test]
    fn id_serial_parses_suffix() {
        assert_eq!(id_serial("ST12345"), Some(12345));
        assert_eq!(id_serial("USR7"), Some(7));
        assert_eq!(id_serial("custom-id"), None);
    }
}
