//! Loading Component
//!
//! Spinners and empty-state placeholders.

use leptos::*;

/// Centered spinner with an optional message
#[component]
pub fn Loading(
    #[prop(optional)]
    message: Option<&'static str>,
) -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center py-12 space-y-3">
            <div class="loading-spinner w-8 h-8" />
            {message.map(|m| view! { <p class="text-gray-500 text-sm">{m}</p> })}
        </div>
    }
}

/// Grey text shown instead of an empty table or chart
#[component]
pub fn Placeholder(text: &'static str) -> impl IntoView {
    view! {
        <div class="flex items-center justify-center h-40 text-gray-400 text-sm">{text}</div>
    }
}
