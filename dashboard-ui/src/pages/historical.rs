//! Historical Page
//!
//! Daily voltage/current averages and the per-sensor detail table for a
//! date range, optionally narrowed to a centro, área or sensor.

use chrono::Local;
use leptos::*;
use wasm_bindgen::JsCast;

use energy_monitor::views::historical::date_bounds;
use energy_monitor::views::{FilterField, HistoricalRow, HistoricalView};

use crate::api::{self, log_error};
use crate::components::{HistoricalChartView, Loading, Placeholder};

const EXPORT_FILE: &str = "historico.json";

/// Offer `contents` as a file download
fn download(contents: &str, filename: &str) -> Result<(), String> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("no document")?;
    let blob = web_sys::Blob::new_with_str_sequence(&js_sys::Array::of1(&contents.into()))
        .map_err(|_| "blob creation failed")?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)
        .map_err(|_| "object URL creation failed")?;

    let anchor = document
        .create_element("a")
        .map_err(|_| "anchor creation failed")?;
    let _ = anchor.set_attribute("href", &url);
    let _ = anchor.set_attribute("download", filename);
    if let Some(anchor) = anchor.dyn_ref::<web_sys::HtmlElement>() {
        anchor.click();
    }
    let _ = web_sys::Url::revoke_object_url(&url);
    Ok(())
}

#[component]
pub fn Historical() -> impl IntoView {
    let today = Local::now().date_naive();
    let (max_start, max_end) = date_bounds(today);
    let state = create_rw_signal(HistoricalView::new(today));

    // Filter options load concurrently and land together
    let centros = create_local_resource(|| (), |_| api::get_centros());
    let areas = create_local_resource(|| (), |_| api::get_areas());
    let sensors = create_local_resource(|| (), |_| api::get_sensors());
    create_effect(move |_| {
        if let (Some(c), Some(a), Some(s)) = (centros.get(), areas.get(), sensors.get()) {
            state.update(|v| v.set_filter_options(c, a, s));
        }
    });

    // Runs once on mount and again after every filter change
    let fetch = move || {
        let Some(query) = state
            .try_update(|v| v.stale.then(|| v.begin_fetch()))
            .flatten()
        else {
            return;
        };
        spawn_local(async move {
            let data = api::get_historical(&query).await;
            state.try_update(|v| v.apply(data));
        });
    };
    fetch();

    let on_filter = move |field: FilterField, value: String| {
        if state.try_update(|v| v.set_filter(field, value)).unwrap_or(false) {
            fetch();
        }
    };

    let export_rows = move |_| {
        let rows = state.with(|v| v.rows());
        let result = serde_json::to_string_pretty(&rows)
            .map_err(|e| e.to_string())
            .and_then(|json| download(&json, EXPORT_FILE));
        if let Err(e) = result {
            log_error("Export failed", e);
        }
    };

    let filter_value = move |field: FilterField| state.with(|v| v.filters.get(field).to_string());
    let points = Signal::derive(move || state.with(|v| v.chart_points(today)));

    view! {
        <div class="space-y-6">
            <h1 class="text-2xl font-bold">"Histórico"</h1>

            <section class="bg-white rounded-xl shadow p-6 grid grid-cols-1 md:grid-cols-5 gap-4">
                <label class="flex flex-col text-sm">
                    "Fecha inicio"
                    <input
                        type="date"
                        class="mt-1 rounded-lg border border-gray-300 px-3 py-2"
                        max=max_start
                        prop:value=move || filter_value(FilterField::StartDate)
                        on:change=move |ev| on_filter(FilterField::StartDate, event_target_value(&ev))
                    />
                </label>
                <label class="flex flex-col text-sm">
                    "Fecha fin"
                    <input
                        type="date"
                        class="mt-1 rounded-lg border border-gray-300 px-3 py-2"
                        min=move || filter_value(FilterField::StartDate)
                        max=max_end
                        prop:value=move || filter_value(FilterField::EndDate)
                        on:change=move |ev| on_filter(FilterField::EndDate, event_target_value(&ev))
                    />
                </label>
                <FilterSelect
                    label="Centro"
                    field=FilterField::CentroId
                    value=Signal::derive(move || filter_value(FilterField::CentroId))
                    options=Signal::derive(move || state.with(|v| {
                        v.centros.iter().map(|c| (c.id, c.name.clone())).collect()
                    }))
                    on_change=on_filter
                />
                <FilterSelect
                    label="Área"
                    field=FilterField::AreaId
                    value=Signal::derive(move || filter_value(FilterField::AreaId))
                    options=Signal::derive(move || state.with(|v| {
                        v.areas.iter().map(|a| (a.id, a.name.clone())).collect()
                    }))
                    on_change=on_filter
                />
                <FilterSelect
                    label="Sensor"
                    field=FilterField::SensorId
                    value=Signal::derive(move || filter_value(FilterField::SensorId))
                    options=Signal::derive(move || state.with(|v| {
                        v.sensors.iter().map(|s| (s.id, s.label().to_string())).collect()
                    }))
                    on_change=on_filter
                />
            </section>

            {move || state.with(|v| v.error.clone()).map(|error| view! {
                <div class="bg-red-50 border border-red-200 text-red-700 rounded-lg p-4">{error}</div>
            })}

            <section class="bg-white rounded-xl shadow p-6">
                <h2 class="text-lg font-semibold mb-4">"Promedios diarios"</h2>
                <HistoricalChartView points=points today=today />
            </section>

            <section class="bg-white rounded-xl shadow p-6 overflow-x-auto">
                <div class="flex items-center justify-between mb-4">
                    <h2 class="text-lg font-semibold">"Detalle"</h2>
                    <button
                        class="px-3 py-1 text-sm rounded-lg border border-gray-300 hover:bg-gray-50 disabled:opacity-50"
                        disabled=move || state.with(|v| v.records.is_empty())
                        on:click=export_rows
                    >
                        "Exportar JSON"
                    </button>
                </div>
                {move || {
                    if state.with(|v| v.loading) {
                        return view! { <Loading /> }.into_view();
                    }
                    match state.with(|v| v.table_placeholder()) {
                        Some(text) => view! { <Placeholder text=text /> }.into_view(),
                        None => view! { <HistoryTable rows=state.with(|v| v.rows()) /> }.into_view(),
                    }
                }}
            </section>
        </div>
    }
}

/// Drop-down with an "all" entry mapped to the empty string
#[component]
fn FilterSelect<F>(
    label: &'static str,
    field: FilterField,
    value: Signal<String>,
    options: Signal<Vec<(i64, String)>>,
    on_change: F,
) -> impl IntoView
where
    F: Fn(FilterField, String) + Copy + 'static,
{
    view! {
        <label class="flex flex-col text-sm">
            {label}
            <select
                class="mt-1 rounded-lg border border-gray-300 px-3 py-2 bg-white"
                prop:value=value
                on:change=move |ev| on_change(field, event_target_value(&ev))
            >
                <option value="">"Todos"</option>
                {move || options.get().into_iter().map(|(id, name)| {
                    view! { <option value=id.to_string()>{name}</option> }
                }).collect_view()}
            </select>
        </label>
    }
}

#[component]
fn HistoryTable(rows: Vec<HistoricalRow>) -> impl IntoView {
    view! {
        <table class="w-full text-sm">
            <thead>
                <tr class="text-left text-gray-500 border-b">
                    {HistoricalRow::HEADERS.iter().map(|h| view! { <th class="py-2 pr-4">{*h}</th> }).collect_view()}
                </tr>
            </thead>
            <tbody>
                {rows.iter().map(|row| view! {
                    <tr class="border-b last:border-0">
                        {row.cells().iter().map(|cell| view! {
                            <td class="py-2 pr-4">{cell.to_string()}</td>
                        }).collect_view()}
                    </tr>
                }).collect_view()}
            </tbody>
        </table>
    }
}
