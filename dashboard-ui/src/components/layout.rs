//! Dashboard Layout
//!
//! Sidebar navigation and the header with the signed-in user.

use leptos::*;
use leptos_router::*;

use energy_monitor::auth::gate::{HISTORICAL_ROUTE, LOGIN_ROUTE, MONITORING_ROUTE};

use crate::state::use_auth;

/// Sidebar + header around the nested dashboard routes
#[component]
pub fn DashboardLayout() -> impl IntoView {
    view! {
        <div class="min-h-screen flex bg-gray-100">
            <Sidebar />
            <div class="flex-1 flex flex-col">
                <Header />
                <main class="flex-1 p-6">
                    <Outlet />
                </main>
            </div>
        </div>
    }
}

#[component]
fn Sidebar() -> impl IntoView {
    view! {
        <aside class="w-64 bg-gray-900 text-white flex flex-col">
            <div class="h-16 flex items-center px-6 text-xl font-bold border-b border-gray-800">
                "⚡ Energy Monitor"
            </div>
            <nav class="flex-1 p-4 space-y-1">
                <SidebarLink href=MONITORING_ROUTE label="Monitoreo" />
                <SidebarLink href=HISTORICAL_ROUTE label="Histórico" />
            </nav>
        </aside>
    }
}

#[component]
fn SidebarLink(href: &'static str, label: &'static str) -> impl IntoView {
    view! {
        <A
            href=href
            class="block px-4 py-2 rounded-lg text-gray-300 hover:text-white hover:bg-gray-800 transition-colors"
            active_class="bg-gray-800 text-white"
        >
            {label}
        </A>
    }
}

#[component]
fn Header() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    let name = move || {
        auth.state
            .with(|s| s.user().map(|u| u.full_name()))
            .unwrap_or_default()
    };
    let initials = move || {
        auth.state
            .with(|s| s.user().map(|u| u.initials()))
            .unwrap_or_default()
    };

    let on_logout = move |_| {
        let navigate = navigate.clone();
        spawn_local(async move {
            auth.logout().await;
            navigate(LOGIN_ROUTE, Default::default());
        });
    };

    view! {
        <header class="h-16 bg-white shadow flex items-center justify-end px-6 space-x-4">
            <span class="text-gray-700">{name}</span>
            <div class="w-9 h-9 rounded-full bg-blue-600 text-white flex items-center justify-center font-semibold">
                {initials}
            </div>
            <button
                class="px-3 py-1 text-sm text-gray-600 hover:text-red-600"
                on:click=on_logout
            >
                "Cerrar sesión"
            </button>
        </header>
    }
}
