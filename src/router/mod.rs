//! Client-side Router
//!
//! Static route table plus the navigation guard that gates protected
//! routes on the current [`Session`].
//!
//! ```text
//! navigate(path) → resolve → guard(route, session) → Allow | Redirect(path)
//! ```
//!
//! The router never changes the session; login and logout are store
//! actions.

pub mod guard;
pub mod routes;

pub use guard::{guard, Navigation};
pub use routes::{Route, View, HOME_PATH, LOGIN_PATH, REGISTER_PATH, ROUTES};

use crate::session::Session;

/// Route lookup over an immutable table
#[derive(Debug, Clone)]
pub struct Router {
    routes: &'static [Route],
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Router over the application's route table
    pub fn new() -> Self {
        Self { routes: ROUTES }
    }

    pub fn routes(&self) -> &'static [Route] {
        self.routes
    }

    /// Find the route for `path`. A trailing slash is ignored.
    pub fn resolve(&self, path: &str) -> Option<&'static Route> {
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { HOME_PATH } else { trimmed };
        self.routes.iter().find(|r| r.path == normalized)
    }

    /// Find a route by its name
    pub fn by_name(&self, name: &str) -> Option<&'static Route> {
        self.routes.iter().find(|r| r.name == name)
    }

    /// Resolve `path` and run the guard against `session`
    pub fn navigate(&self, path: &str, session: &Session) -> Navigation {
        let target = self.resolve(path);
        let decision = guard(target, session);

        tracing::debug!(
            path = %path,
            route = target.map(|r| r.name).unwrap_or("<unknown>"),
            authenticated = session.is_authenticated(),
            ?decision,
            "navigation guard"
        );

        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        let router = Router::new();
        assert_eq!(router.resolve("/jury").unwrap().view, View::Jury);
        assert_eq!(router.resolve("/jury/").unwrap().view, View::Jury);
        assert_eq!(router.resolve("/").unwrap().view, View::Home);
        assert_eq!(router.resolve("").unwrap().view, View::Home);
        assert!(router.resolve("/nowhere").is_none());
    }

    #[test]
    fn test_by_name() {
        let router = Router::new();
        assert_eq!(router.by_name("userAccount").unwrap().path, "/account");
        assert!(router.by_name("missing").is_none());
    }

    #[test]
    fn test_navigate() {
        let router = Router::new();
        let anon = Session::Anonymous;
        let authed = Session::from_token("abc");

        assert_eq!(router.navigate("/account", &anon), Navigation::Redirect(LOGIN_PATH));
        assert_eq!(router.navigate("/account", &authed), Navigation::Allow);
        assert_eq!(router.navigate("/register", &authed), Navigation::Redirect(HOME_PATH));
        assert_eq!(router.navigate("/main", &anon), Navigation::Allow);
    }

    #[test]
    fn test_route_surface_complete() {
        let router = Router::new();
        for path in [
            "/",
            "/account",
            "/login",
            "/register",
            "/find-team",
            "/team-account",
            "/admin",
            "/jury",
            "/jury-team-list",
        ] {
            assert!(router.resolve(path).is_some(), "missing {}", path);
        }
    }
}
