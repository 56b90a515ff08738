//! Route table

use serde::Serialize;
use std::fmt;

/// Views a route can render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Home,
    Account,
    Login,
    Register,
    FindTeam,
    TeamAccount,
    Admin,
    Jury,
    JuryTeamList,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            View::Home => "HomeView",
            View::Account => "AccountMember",
            View::Login => "LoginView",
            View::Register => "RegisterView",
            View::FindTeam => "FindTeamView",
            View::TeamAccount => "TeamAccountView",
            View::Admin => "AdminView",
            View::Jury => "JuryView",
            View::JuryTeamList => "JuryTeamListView",
        };
        f.write_str(name)
    }
}

/// A named path bound to a view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub path: &'static str,
    pub name: &'static str,
    pub view: View,
    pub requires_auth: bool,
}

impl Route {
    const fn public(path: &'static str, name: &'static str, view: View) -> Self {
        Self {
            path,
            name,
            view,
            requires_auth: false,
        }
    }

    const fn protected(path: &'static str, name: &'static str, view: View) -> Self {
        Self {
            path,
            name,
            view,
            requires_auth: true,
        }
    }
}

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";

/// Every route the application knows about
pub static ROUTES: &[Route] = &[
    Route::public(HOME_PATH, "home", View::Home),
    Route::protected("/account", "userAccount", View::Account),
    Route::public(LOGIN_PATH, "login", View::Login),
    Route::public(REGISTER_PATH, "register", View::Register),
    Route::protected("/find-team", "findTeam", View::FindTeam),
    Route::protected("/team-account", "teamAccount", View::TeamAccount),
    Route::protected("/admin", "admin", View::Admin),
    Route::protected("/jury", "jury", View::Jury),
    Route::protected("/jury-team-list", "juryTeamList", View::JuryTeamList),
];
