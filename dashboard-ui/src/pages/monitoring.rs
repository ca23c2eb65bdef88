//! Monitoring Page
//!
//! Real-time view of one centro: voltage/current series, device status,
//! energy per device and consumption by type. Re-fetches on selection
//! change and every two minutes while mounted.

use chrono::{FixedOffset, Offset, Utc};
use leptos::*;

use energy_monitor::api::MonitoringWindow;
use energy_monitor::views::monitoring::{MonitoringView, NO_CENTERS};
use energy_monitor::views::{DeviceRow, DeviceStatus, MONITORING_POLL_INTERVAL};

use crate::api;
use crate::components::{BarChartView, LineChartView, Loading, PieChartView, Placeholder};
use crate::state::PollTimer;

/// Offset used for "HH:MM" device timestamps
fn display_offset() -> FixedOffset {
    FixedOffset::east_opt(MonitoringWindow::default().timezone_offset_minutes * 60)
        .unwrap_or_else(|| Utc.fix())
}

#[component]
pub fn Monitoring() -> impl IntoView {
    let state = create_rw_signal(MonitoringView::new());
    let selected = create_memo(move |_| state.with(|v| v.selected_centro));

    // Centros are loaded once; the first one is selected
    spawn_local(async move {
        let centros = api::get_centros().await;
        state.try_update(|v| v.set_centros(centros));
    });

    let refresh = move || {
        let Some(centro_id) = selected.get_untracked() else {
            return;
        };
        state.update(|v| v.begin_fetch());
        spawn_local(async move {
            let data = api::get_centro_monitoring(centro_id).await;
            state.try_update(|v| v.apply(data, Utc::now(), display_offset()));
        });
    };

    // A new selection fetches at once and restarts the two-minute timer
    let poll = store_value(PollTimer::default());
    create_effect(move |_| {
        if selected.get().is_none() {
            return;
        }
        refresh();
        poll.update_value(|timer| {
            timer.restart(MONITORING_POLL_INTERVAL.as_millis() as u32, refresh)
        });
    });
    on_cleanup(move || {
        poll.try_update_value(|timer| timer.stop());
    });

    let on_select = move |ev: ev::Event| {
        if let Ok(id) = event_target_value(&ev).parse::<i64>() {
            state.update(|v| {
                v.select(id);
            });
        }
    };

    let realtime = Signal::derive(move || state.with(|v| v.realtime.clone()));
    let energy = Signal::derive(move || state.with(|v| v.energy_by_device.clone()));
    let consumption = Signal::derive(move || state.with(|v| v.consumption_by_type.clone()));

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-bold">"Monitoreo en tiempo real"</h1>
                {move || {
                    let centros = state.with(|v| v.centros.clone());
                    if centros.is_empty() {
                        view! { <span class="text-sm text-gray-500">{NO_CENTERS}</span> }.into_view()
                    } else {
                        view! {
                            <select
                                class="rounded-lg border border-gray-300 px-3 py-2 bg-white"
                                on:change=on_select
                            >
                                {centros.into_iter().map(|c| {
                                    let is_selected = selected.get_untracked() == Some(c.id);
                                    view! {
                                        <option value=c.id.to_string() selected=is_selected>{c.name}</option>
                                    }
                                }).collect_view()}
                            </select>
                        }.into_view()
                    }
                }}
            </div>

            {move || match state.with(|v| v.error.clone()) {
                Some(error) => view! {
                    <div class="bg-red-50 border border-red-200 text-red-700 rounded-lg p-4">{error}</div>
                }.into_view(),
                None => view! {
                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                        <StatCard
                            title="Consumo actual"
                            value=Signal::derive(move || format!("{:.1} kWh", state.with(|v| v.current_consumption)))
                        />
                        <StatCard
                            title="Eficiencia"
                            value=Signal::derive(move || format!("{}%", state.with(|v| v.efficiency)))
                        />
                    </div>

                    <section class="bg-white rounded-xl shadow p-6">
                        <h2 class="text-lg font-semibold mb-4">"Voltaje y corriente"</h2>
                        {move || state.with(|v| v.loading && v.devices.is_empty()).then(|| view! { <Loading /> })}
                        <LineChartView points=realtime />
                    </section>

                    <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                        <section class="bg-white rounded-xl shadow p-6">
                            <h2 class="text-lg font-semibold mb-4">"Energía por dispositivo"</h2>
                            {move || match state.with(|v| v.energy_placeholder()) {
                                Some(text) => view! { <Placeholder text=text /> }.into_view(),
                                None => view! { <BarChartView data=energy /> }.into_view(),
                            }}
                        </section>
                        <section class="bg-white rounded-xl shadow p-6">
                            <h2 class="text-lg font-semibold mb-4">"Consumo por tipo"</h2>
                            {move || match state.with(|v| v.consumption_placeholder()) {
                                Some(text) => view! { <Placeholder text=text /> }.into_view(),
                                None => view! { <PieChartView data=consumption /> }.into_view(),
                            }}
                        </section>
                    </div>

                    <section class="bg-white rounded-xl shadow p-6">
                        <h2 class="text-lg font-semibold mb-4">"Estado de dispositivos"</h2>
                        {move || match state.with(|v| v.device_placeholder()) {
                            Some(text) => view! { <Placeholder text=text /> }.into_view(),
                            None => view! {
                                <DeviceTable rows=state.with(|v| v.devices.clone()) />
                            }.into_view(),
                        }}
                    </section>
                }.into_view(),
            }}
        </div>
    }
}

#[component]
fn StatCard(title: &'static str, value: Signal<String>) -> impl IntoView {
    view! {
        <div class="bg-white rounded-xl shadow p-6">
            <p class="text-sm text-gray-500">{title}</p>
            <p class="text-3xl font-bold mt-2">{value}</p>
        </div>
    }
}

#[component]
fn DeviceTable(rows: Vec<DeviceRow>) -> impl IntoView {
    view! {
        <table class="w-full text-sm">
            <thead>
                <tr class="text-left text-gray-500 border-b">
                    <th class="py-2">"Dispositivo"</th>
                    <th class="py-2">"Estado"</th>
                    <th class="py-2">"Consumo"</th>
                    <th class="py-2">"Última actualización"</th>
                </tr>
            </thead>
            <tbody>
                {rows.into_iter().map(|row| {
                    let badge = match row.status {
                        DeviceStatus::Online => "bg-green-100 text-green-700",
                        DeviceStatus::Offline => "bg-red-100 text-red-700",
                    };
                    view! {
                        <tr class="border-b last:border-0">
                            <td class="py-2">{row.name}</td>
                            <td class="py-2">
                                <span class=format!("px-2 py-1 rounded-full text-xs {}", badge)>
                                    {row.status.to_string()}
                                </span>
                            </td>
                            <td class="py-2">{format!("{:.1} kWh", row.consumption)}</td>
                            <td class="py-2 text-gray-500">{row.last_update}</td>
                        </tr>
                    }
                }).collect_view()}
            </tbody>
        </table>
    }
}
