//! Navigation guard

use crate::router::routes::{Route, HOME_PATH, LOGIN_PATH, REGISTER_PATH};
use crate::session::Session;
use serde::Serialize;

/// Outcome of a navigation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "to", rename_all = "snake_case")]
pub enum Navigation {
    Allow,
    Redirect(&'static str),
}

/// Decide whether navigation to `target` may proceed.
///
/// Unknown targets (`None`) are allowed; resolving them is the view
/// layer's problem.
pub fn guard(target: Option<&Route>, session: &Session) -> Navigation {
    let Some(route) = target else {
        return Navigation::Allow;
    };

    if route.requires_auth && !session.is_authenticated() {
        return Navigation::Redirect(LOGIN_PATH);
    }

    if (route.path == LOGIN_PATH || route.path == REGISTER_PATH) && session.is_authenticated() {
        return Navigation::Redirect(HOME_PATH);
    }

    Navigation::Allow
}
