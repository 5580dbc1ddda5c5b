//! Role-based routing and the access guard shared by every dashboard.

use std::fmt;

use crate::models::{Role, UserRecord};

/// Views a client can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Public sign-in view.
    Login,
    /// Admin-only dashboard.
    AdminDashboard,
    /// Registrar-only dashboard.
    RegistrarDashboard,
    /// Faculty-only dashboard.
    FacultyDashboard,
    /// Finance-only dashboard.
    FinanceDashboard,
    /// Student-only dashboard.
    StudentDashboard,
    /// Parent-only dashboard.
    ParentDashboard,
    /// Landing page for roles without a dedicated dashboard.
    GenericDashboard,
}

impl Route {
    /// Where a user with `role` lands after logging in.
    ///
    /// Takes the raw role string so that unrecognised roles fall back to the
    /// generic dashboard instead of failing.
    pub fn for_role(role: &str) -> Route {
        match role.parse::<Role>() {
            Ok(Role::Admin) => Route::AdminDashboard,
            Ok(Role::Registrar) => Route::RegistrarDashboard,
            Ok(Role::Faculty) => Route::FacultyDashboard,
            Ok(Role::Finance) => Route::FinanceDashboard,
            Ok(Role::Student) => Route::StudentDashboard,
            Ok(Role::Parent) => Route::ParentDashboard,
            Err(_) => Route::GenericDashboard,
        }
    }

    /// Roles allowed to view this route. `None` means the route is public;
    /// an empty slice means any logged-in user.
    pub fn allowed_roles(&self) -> Option<&'static [Role]> {
        match self {
            Route::Login => None,
            Route::AdminDashboard => Some(&[Role::Admin]),
            Route::RegistrarDashboard => Some(&[Role::Registrar]),
            Route::FacultyDashboard => Some(&[Role::Faculty]),
            Route::FinanceDashboard => Some(&[Role::Finance]),
            Route::StudentDashboard => Some(&[Role::Student]),
            Route::ParentDashboard => Some(&[Role::Parent]),
            Route::GenericDashboard => Some(&[]),
        }
    }

    /// URL-style path of the route.
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::AdminDashboard => "/admin/dashboard",
            Route::RegistrarDashboard => "/registrar/dashboard",
            Route::FacultyDashboard => "/faculty/dashboard",
            Route::FinanceDashboard => "/finance/dashboard",
            Route::StudentDashboard => "/student/dashboard",
            Route::ParentDashboard => "/parent/dashboard",
            Route::GenericDashboard => "/dashboard",
        }
    }

    /// Heading shown on the view.
    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::AdminDashboard => "Admin Dashboard",
            Route::RegistrarDashboard => "Registrar Dashboard",
            Route::FacultyDashboard => "Faculty Dashboard",
            Route::FinanceDashboard => "Finance Dashboard",
            Route::StudentDashboard => "Student Dashboard",
            Route::ParentDashboard => "Parent Dashboard",
            Route::GenericDashboard => "Dashboard",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of checking a session against a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Render the route for this user (`None` on public routes with no session).
    Granted(Option<UserRecord>),
    /// Send the client elsewhere.
    Redirect(Route),
}

/// Decide whether the session `user` may view `route`.
pub fn guard(route: Route, user: Option<UserRecord>) -> Access {
    let Some(allowed) = route.allowed_roles() else {
        return Access::Granted(user);
    };
    match user {
        Some(user) if allowed.is_empty() || allowed.contains(&user.role) => {
            Access::Granted(Some(user))
        }
        _ => Access::Redirect(Route::Login),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> UserRecord {
        UserRecord {
            id: format!("{}1", role.id_prefix()),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: format!("{role}@example.com"),
            password_hash: String::new(),
            role,
            parent_id: None,
            child_id: None,
        }
    }

    #[test]
    fn roles_map_to_their_dashboards() {
        assert_eq!(Route::for_role("admin"), Route::AdminDashboard);
        assert_eq!(Route::for_role("registrar"), Route::RegistrarDashboard);
        assert_eq!(Route::for_role("faculty"), Route::FacultyDashboard);
        assert_eq!(Route::for_role("finance"), Route::FinanceDashboard);
        assert_eq!(Route::for_role("student"), Route::StudentDashboard);
        assert_eq!(Route::for_role("parent"), Route::ParentDashboard);
        assert_eq!(Route::for_role("librarian"), Route::GenericDashboard);
        assert_eq!(Route::for_role("Admin"), Route::GenericDashboard);
    }

    #[test]
    fn landing_route_admits_its_role() {
        for role in Role::ALL {
            let route = Route::for_role(role.as_str());
            assert_eq!(
                guard(route, Some(user(role))),
                Access::Granted(Some(user(role)))
            );
        }
    }

    #[test]
    fn protected_routes_reject_other_roles_and_anonymous() {
        let protected = [
            Route::AdminDashboard,
            Route::RegistrarDashboard,
            Route::FacultyDashboard,
            Route::FinanceDashboard,
            Route::StudentDashboard,
            Route::ParentDashboard,
        ];
        for route in protected {
            assert_eq!(guard(route, None), Access::Redirect(Route::Login));
            for role in Role::ALL {
                let allowed = route.allowed_roles().unwrap().contains(&role);
                let access = guard(route, Some(user(role)));
                assert_eq!(
                    matches!(access, Access::Granted(_)),
                    allowed,
                    "{route} for {role}"
                );
            }
        }
    }

    #[test]
    fn generic_dashboard_needs_any_session() {
        assert_eq!(
            guard(Route::GenericDashboard, None),
            Access::Redirect(Route::Login)
        );
        assert!(matches!(
            guard(Route::GenericDashboard, Some(user(Role::Finance))),
            Access::Granted(Some(_))
        ));
    }

    #[test]
    fn login_is_public() {
        assert_eq!(guard(Route::Login, None), Access::Granted(None));
        assert!(matches!(
            guard(Route::Login, Some(user(Role::Student))),
            Access::Granted(Some(_))
        ));
    }
}
