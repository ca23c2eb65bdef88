//! Protected route wrapper

use leptos::*;
use leptos_router::*;

use energy_monitor::auth::gate::{protect, LOGIN_ROUTE, VERIFYING_MESSAGE};
use energy_monitor::auth::GateDecision;

use super::Loading;
use crate::state::use_auth;

/// Renders `children` only for an authenticated session
#[component]
pub fn Protected(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();

    move || match protect(&auth.state.get()) {
        GateDecision::Pending => view! { <Loading message=VERIFYING_MESSAGE /> }.into_view(),
        GateDecision::Allow => children().into_view(),
        GateDecision::RedirectToLogin => view! { <Redirect path=LOGIN_ROUTE /> }.into_view(),
    }
}
