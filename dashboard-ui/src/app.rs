//! App Root Component
//!
//! Routing and the auth provider.

use leptos::*;
use leptos_router::*;

use energy_monitor::auth::gate::{DASHBOARD_ROUTE, LOGIN_ROUTE, MONITORING_ROUTE, REGISTER_ROUTE};

use crate::components::{DashboardLayout, Protected};
use crate::pages::{Historical, Home, Login, Monitoring, Register};
use crate::state::auth::provide_auth;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    // Resolves the stored session once, before any route renders
    provide_auth();

    view! {
        <Router>
            <Routes>
                <Route path="/" view=Home />
                <Route path=LOGIN_ROUTE view=Login />
                <Route path=REGISTER_ROUTE view=Register />
                <Route
                    path=DASHBOARD_ROUTE
                    view=|| view! { <Protected><DashboardLayout /></Protected> }
                >
                    <Route path="" view=|| view! { <Redirect path=MONITORING_ROUTE /> } />
                    <Route path="monitoring" view=Monitoring />
                    <Route path="historical" view=Historical />
                </Route>
                <Route path="/*any" view=NotFound />
            </Routes>
        </Router>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-screen text-center">
            <h1 class="text-3xl font-bold mb-2">"Página no encontrada"</h1>
            <p class="text-gray-500 mb-6">"La página que buscas no existe."</p>
            <A
                href=DASHBOARD_ROUTE
                class="px-6 py-3 bg-blue-600 hover:bg-blue-700 text-white rounded-lg font-medium transition-colors"
            >
                "Ir al dashboard"
            </A>
        </div>
    }
}
