//! Landing route: sends the visitor to the dashboard or the login page

use leptos::*;
use leptos_router::*;

use energy_monitor::auth::gate::{landing_redirect, VERIFYING_MESSAGE};

use crate::components::Loading;
use crate::state::use_auth;

#[component]
pub fn Home() -> impl IntoView {
    let auth = use_auth();

    move || match auth.state.with(landing_redirect) {
        Some(path) => view! { <Redirect path=path /> }.into_view(),
        None => view! { <Loading message=VERIFYING_MESSAGE /> }.into_view(),
    }
}
