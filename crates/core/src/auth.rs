//! Credential checks, session establishment and identity lookups.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    config::LatencyConfig,
    credentials::{CredentialHasher, SaltedSha256},
    directory::UserDirectory,
    models::{LoginRequest, RegisterRequest, Role, UserRecord},
    session::SessionManager,
    simulate_latency,
};

/// Message shown after a successful registration.
pub const REGISTRATION_MESSAGE: &str = "Registration successful. Please login.";

/// Recoverable failures reported to the caller as displayable messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Email, password and role do not match one directory record.
    #[error("Invalid email, password, or role. Please try again.")]
    InvalidCredentials,
    /// Registration with an email that already exists.
    #[error("Email already in use. Please use a different email.")]
    EmailInUse,
    /// A required registration field was blank.
    #[error("{0} is required.")]
    MissingField(&'static str),
    /// Password and confirmation differ.
    #[error("Passwords do not match.")]
    PasswordMismatch,
    /// Registration named a role outside the supported set.
    #[error("Unknown role {0:?}.")]
    UnknownRole(String),
    /// A parent registration named an id that is not a student.
    #[error("No student with ID {0}.")]
    UnknownStudent(String),
    /// A student id was given for a role other than parent.
    #[error("Only parents can be linked to a student.")]
    ChildNotAllowed,
}

/// Authentication front door shared by every view. Cheap to clone.
#[derive(Clone)]
pub struct AuthService {
    directory: UserDirectory,
    session: SessionManager,
    hasher: Arc<dyn CredentialHasher>,
    latency: LatencyConfig,
}

impl AuthService {
    /// Service over an existing directory and session.
    pub fn new(
        directory: UserDirectory,
        session: SessionManager,
        hasher: Arc<dyn CredentialHasher>,
        latency: LatencyConfig,
    ) -> Self {
        Self {
            directory,
            session,
            hasher,
            latency,
        }
    }

    /// Service over the seeded directory using salted SHA-256 credentials.
    pub fn seeded(session: SessionManager, latency: LatencyConfig) -> Self {
        let hasher = Arc::new(SaltedSha256);
        let directory = UserDirectory::seeded(hasher.as_ref());
        Self::new(directory, session, hasher, latency)
    }

    /// Directory backing this service.
    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    /// Session this service writes to.
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Verify `request` and, on success, make the matched user the current session.
    pub async fn login(&self, request: &LoginRequest) -> Result<UserRecord, AuthError> {
        simulate_latency(self.latency.auth()).await;

        let user = self
            .directory
            .find_by_email(&request.email)
            .filter(|user| self.hasher.verify(&request.password, &user.password_hash))
            .filter(|user| user.role.as_str() == request.role);

        match user {
            Some(user) => {
                info!(user_id = %user.id, role = %user.role, "Login succeeded");
                self.session.establish(user.clone());
                Ok(user)
            }
            None => {
                warn!(email = %request.email, role = %request.role, "Login rejected");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Add a new directory record. The caller logs in separately afterwards.
    ///
    /// A parent may name a student id, which is linked in the same step.
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), AuthError> {
        simulate_latency(self.latency.auth()).await;

        let required = [
            ("First name", &request.first_name),
            ("Last name", &request.last_name),
            ("Email", &request.email),
            ("Password", &request.password),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(AuthError::MissingField(*field));
        }
        if self.directory.contains_email(&request.email) {
            return Err(AuthError::EmailInUse);
        }
        if request.password != request.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        let role: Role = request
            .role
            .parse()
            .map_err(|_| AuthError::UnknownRole(request.role.clone()))?;

        let child_id = request
            .child_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty());
        let first_name = request.first_name.trim().to_string();
        let last_name = request.last_name.trim().to_string();
        let password_hash = self.hasher.hash(&request.password);

        let record = match (role, child_id) {
            (Role::Parent, Some(student_id)) => self
                .directory
                .insert_guardian(
                    first_name,
                    last_name,
                    request.email.clone(),
                    password_hash,
                    student_id,
                )
                .map_err(|_| AuthError::UnknownStudent(student_id.to_string()))?,
            (_, Some(_)) => return Err(AuthError::ChildNotAllowed),
            (_, None) => self.directory.insert(
                first_name,
                last_name,
                request.email.clone(),
                password_hash,
                role,
            ),
        }
        .ok_or(AuthError::EmailInUse)?;

        info!(user_id = %record.id, role = %record.role, "User registered");
        Ok(())
    }

    /// End the current session. Safe to call with no session.
    pub async fn logout(&self) {
        simulate_latency(self.latency.logout()).await;
        if let Some(user) = self.session.current() {
            info!(user_id = %user.id, "Logged out");
        }
        self.session.clear();
    }

    /// Currently logged-in user, rehydrating from the durable mirror if needed.
    pub async fn current_user(&self) -> Option<UserRecord> {
        self.session.current()
    }

    /// The student record linked from the parent with `parent_id`.
    pub async fn student_by_parent_id(&self, parent_id: &str) -> Option<UserRecord> {
        self.directory.child_of(parent_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{FileMirror, MemoryMirror};
    use anyhow::Result;
    use tempfile::tempdir;

    const PASSWORD: &str = "password123";

    fn service() -> AuthService {
        let session = SessionManager::new(Arc::new(MemoryMirror::new()));
        AuthService::seeded(session, LatencyConfig::none())
    }

    fn register_request(email: &str, role: &str) -> RegisterRequest {
        RegisterRequest {
            first_name: "Emma".to_string(),
            last_name: "Davis".to_string(),
            email: email.to_string(),
            password: "hunter22".to_string(),
            confirm_password: "hunter22".to_string(),
            role: role.to_string(),
            child_id: None,
        }
    }

    #[tokio::test]
    async fn every_seed_logs_in_with_its_own_role() {
        let auth = service();
        for seed in auth.directory().users() {
            let request = LoginRequest::new(&seed.email, PASSWORD, seed.role.as_str());
            let user = auth.login(&request).await.expect("seed login");
            assert_eq!(user.id, seed.id);
        }
    }

    #[tokio::test]
    async fn every_seed_fails_with_any_other_role() {
        let auth = service();
        for seed in auth.directory().users() {
            for role in Role::ALL.iter().filter(|role| **role != seed.role) {
                let request = LoginRequest::new(&seed.email, PASSWORD, role.as_str());
                assert_eq!(
                    auth.login(&request).await,
                    Err(AuthError::InvalidCredentials)
                );
            }
            let request = LoginRequest::new(&seed.email, PASSWORD, "dean");
            assert!(auth.login(&request).await.is_err());
        }
        assert!(auth.current_user().await.is_none());
    }

    #[tokio::test]
    async fn unknown_email_or_wrong_password_fails() {
        let auth = service();
        for role in Role::ALL {
            let request = LoginRequest::new("nobody@example.com", PASSWORD, role.as_str());
            assert_eq!(
                auth.login(&request).await,
                Err(AuthError::InvalidCredentials)
            );
        }
        let request = LoginRequest::new("alex.johnson@example.com", "Password123", "student");
        assert!(auth.login(&request).await.is_err());
    }

    #[tokio::test]
    async fn student_login_scenario() {
        let auth = service();
        let ok = LoginRequest::new("alex.johnson@example.com", PASSWORD, "student");
        assert_eq!(auth.login(&ok).await.unwrap().id, "ST12345");

        auth.logout().await;
        let wrong_role = LoginRequest::new("alex.johnson@example.com", PASSWORD, "admin");
        let err = auth.login(&wrong_role).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid email, password, or role. Please try again."
        );
    }

    #[tokio::test]
    async fn session_follows_login_and_logout() {
        let auth = service();
        let request = LoginRequest::new("sarah.williams@example.com", PASSWORD, "faculty");
        auth.login(&request).await.unwrap();

        for _ in 0..3 {
            assert_eq!(auth.current_user().await.unwrap().id, "FAC12345");
        }

        auth.logout().await;
        assert!(auth.current_user().await.is_none());
        auth.logout().await;
        assert!(auth.current_user().await.is_none());
    }

    #[tokio::test]
    async fn failed_login_keeps_previous_session() {
        let auth = service();
        let good = LoginRequest::new("john.anderson@example.com", PASSWORD, "admin");
        auth.login(&good).await.unwrap();

        let bad = LoginRequest::new("john.anderson@example.com", "nope", "admin");
        assert!(auth.login(&bad).await.is_err());
        assert_eq!(auth.current_user().await.unwrap().id, "ADM12345");
    }

    #[tokio::test]
    async fn session_survives_restart_until_logout() -> Result<()> {
        let dir = tempdir()?;
        let mirror = || Arc::new(FileMirror::new(dir.path(), "currentUser"));

        let first = AuthService::seeded(SessionManager::new(mirror()), LatencyConfig::none());
        let request = LoginRequest::new("robert.johnson@example.com", PASSWORD, "parent");
        first.login(&request).await.unwrap();

        let mirrored = std::fs::read_to_string(dir.path().join("currentUser.json"))?;
        assert!(!mirrored.contains(PASSWORD));

        let second = AuthService::seeded(SessionManager::new(mirror()), LatencyConfig::none());
        assert_eq!(second.current_user().await.unwrap().id, "PAR12345");

        second.logout().await;
        let third = AuthService::seeded(SessionManager::new(mirror()), LatencyConfig::none());
        assert!(third.current_user().await.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn register_then_login() {
        let auth = service();
        auth.register(&register_request("emma.davis@example.com", "student"))
            .await
            .unwrap();

        let request = LoginRequest::new("emma.davis@example.com", "hunter22", "student");
        let user = auth.login(&request).await.unwrap();
        assert_eq!(user.full_name(), "Emma Davis");
        assert!(user.id.starts_with("ST"));
        assert_ne!(user.id, "ST12345");

        let wrong_role = LoginRequest::new("emma.davis@example.com", "hunter22", "faculty");
        assert!(auth.login(&wrong_role).await.is_err());
    }

    #[tokio::test]
    async fn register_does_not_log_in() {
        let auth = service();
        auth.register(&register_request("new.user@example.com", "finance"))
            .await
            .unwrap();
        assert!(auth.current_user().await.is_none());
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let auth = service();
        let err = auth
            .register(&register_request("alex.johnson@example.com", "student"))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::EmailInUse);
        assert_eq!(
            err.to_string(),
            "Email already in use. Please use a different email."
        );
        assert_eq!(auth.directory().len(), 5);
    }

    #[tokio::test]
    async fn register_validates_input() {
        let auth = service();

        let mut blank = register_request("blank@example.com", "student");
        blank.last_name = "  ".to_string();
        assert_eq!(
            auth.register(&blank).await,
            Err(AuthError::MissingField("Last name"))
        );

        let mut mismatch = register_request("mismatch@example.com", "student");
        mismatch.confirm_password = "hunter23".to_string();
        assert_eq!(
            auth.register(&mismatch).await,
            Err(AuthError::PasswordMismatch)
        );

        assert_eq!(
            auth.register(&register_request("dean@example.com", "dean")).await,
            Err(AuthError::UnknownRole("dean".to_string()))
        );
        assert_eq!(auth.directory().len(), 5);
    }

    #[tokio::test]
    async fn parent_registration_links_student() {
        let auth = service();
        let mut request = register_request("linda.johnson@example.com", "parent");
        request.child_id = Some(" ST12345 ".to_string());
        auth.register(&request).await.unwrap();

        let linda = auth
            .directory()
            .find_by_email("linda.johnson@example.com")
            .unwrap();
        let child = auth.student_by_parent_id(&linda.id).await.unwrap();
        assert_eq!(child.id, "ST12345");
        assert_eq!(child.parent_id.as_deref(), Some(linda.id.as_str()));
        assert!(auth.student_by_parent_id("PAR12345").await.is_none());
    }

    #[tokio::test]
    async fn register_rejects_bad_student_links() {
        let auth = service();

        let mut not_a_student = register_request("linda.johnson@example.com", "parent");
        not_a_student.child_id = Some("FAC12345".to_string());
        assert_eq!(
            auth.register(&not_a_student).await,
            Err(AuthError::UnknownStudent("FAC12345".to_string()))
        );

        let mut not_a_parent = register_request("emma.davis@example.com", "student");
        not_a_parent.child_id = Some("ST12345".to_string());
        assert_eq!(
            auth.register(&not_a_parent).await,
            Err(AuthError::ChildNotAllowed)
        );

        let mut blank = register_request("blank.link@example.com", "student");
        blank.child_id = Some("   ".to_string());
        auth.register(&blank).await.unwrap();

        assert_eq!(auth.directory().len(), 6);
        assert_eq!(
            auth.student_by_parent_id("PAR12345").await.unwrap().id,
            "ST12345"
        );
    }

    #[tokio::test]
    async fn parent_resolves_child() {
        let auth = service();
        let child = auth.student_by_parent_id("PAR12345").await.unwrap();
        assert_eq!(child.id, "ST12345");
        assert!(auth.student_by_parent_id("PAR99999").await.is_none());
        assert!(auth.student_by_parent_id("ST12345").await.is_none());
    }
}
