//! Route gating decisions
//!
//! Pure functions over [`AuthState`]; the dashboard turns them into
//! placeholder/render/redirect.

use super::state::AuthState;

pub const LOGIN_ROUTE: &str = "/login";
pub const REGISTER_ROUTE: &str = "/register";
pub const DASHBOARD_ROUTE: &str = "/dashboard";
pub const MONITORING_ROUTE: &str = "/dashboard/monitoring";
pub const HISTORICAL_ROUTE: &str = "/dashboard/historical";

/// Placeholder text shown while the session is being checked
pub const VERIFYING_MESSAGE: &str = "Verificando autenticación...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Still loading: show the verifying placeholder
    Pending,
    Allow,
    RedirectToLogin,
}

/// Decision for a protected route
pub fn protect(state: &AuthState) -> GateDecision {
    if state.is_loading() {
        GateDecision::Pending
    } else if state.is_authenticated() {
        GateDecision::Allow
    } else {
        GateDecision::RedirectToLogin
    }
}

/// Where the landing route `/` sends the user, once loading completes
pub fn landing_redirect(state: &AuthState) -> Option<&'static str> {
    if state.is_loading() {
        None
    } else if state.is_authenticated() {
        Some(DASHBOARD_ROUTE)
    } else {
        Some(LOGIN_ROUTE)
    }
}

/// `/login` and `/register` bounce an authenticated session to the dashboard
pub fn guest_redirect(state: &AuthState) -> Option<&'static str> {
    if !state.is_loading() && state.is_authenticated() {
        Some(DASHBOARD_ROUTE)
    } else {
        None
    }
}
