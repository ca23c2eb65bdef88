//! Chart Components
//!
//! SVG markup comes from the shared chart widgets; these components inject
//! it and track the pointer for tooltips. Charts are redrawn whenever their
//! input signal changes.

use chrono::NaiveDate;
use leptos::*;

use energy_monitor::charts::{
    BarChart, Datum, HistoricalChart, HistoricalPoint, Hover, LineChart, LinePoint, PieChart,
    CHART_MARGIN,
};

/// Tooltip box for the hovered datum
#[component]
fn Tooltip(hover: Signal<Option<Hover>>) -> impl IntoView {
    move || {
        hover.get().map(|h| {
            view! {
                <div class="absolute top-2 right-2 bg-white/90 border border-gray-200 rounded px-3 py-2 text-xs shadow pointer-events-none">
                    {h.lines.into_iter().map(|line| view! { <div>{line}</div> }).collect_view()}
                </div>
            }
        })
    }
}

/// Pointer x in plot coordinates for a chart drawn at its natural width
fn plot_x(ev: &ev::MouseEvent) -> f64 {
    f64::from(ev.offset_x()) - CHART_MARGIN.left
}

/// Real-time voltage/current chart
#[component]
pub fn LineChartView(#[prop(into)] points: Signal<Vec<LinePoint>>) -> impl IntoView {
    let hover = create_rw_signal(None::<Hover>);
    let chart = Signal::derive(move || {
        points.with(|p| LineChart::new(p, LineChart::DEFAULT_WIDTH, LineChart::DEFAULT_HEIGHT))
    });

    view! {
        <div class="relative overflow-x-auto">
            <div
                style=format!("width: {}px", LineChart::DEFAULT_WIDTH)
                inner_html=move || chart.with(LineChart::render)
                on:mousemove=move |ev| hover.set(chart.with(|c| c.hover(plot_x(&ev))))
                on:mouseleave=move |_| hover.set(None)
            />
            <Tooltip hover=hover.into() />
        </div>
    }
}

/// Daily voltage/consumption chart
#[component]
pub fn HistoricalChartView(
    #[prop(into)] points: Signal<Vec<HistoricalPoint>>,
    today: NaiveDate,
) -> impl IntoView {
    let hover = create_rw_signal(None::<Hover>);
    let chart = Signal::derive(move || {
        points.with(|p| {
            HistoricalChart::new(
                p,
                HistoricalChart::DEFAULT_WIDTH,
                HistoricalChart::DEFAULT_HEIGHT,
                today,
            )
        })
    });

    view! {
        <div class="relative overflow-x-auto">
            <div
                style=format!("width: {}px", HistoricalChart::DEFAULT_WIDTH)
                inner_html=move || chart.with(HistoricalChart::render)
                on:mousemove=move |ev| hover.set(chart.with(|c| c.hover(plot_x(&ev))))
                on:mouseleave=move |_| hover.set(None)
            />
            <Tooltip hover=hover.into() />
        </div>
    }
}

/// Energy per device
#[component]
pub fn BarChartView(#[prop(into)] data: Signal<Vec<Datum>>) -> impl IntoView {
    let hover = create_rw_signal(None::<Hover>);
    let chart = Signal::derive(move || {
        data.with(|d| BarChart::new(d, BarChart::DEFAULT_WIDTH, BarChart::DEFAULT_HEIGHT))
    });

    view! {
        <div class="relative">
            <div inner_html=move || chart.with(BarChart::render) />
            <div class="flex flex-wrap gap-2 mt-2 text-xs text-gray-500">
                {move || {
                    data.get()
                        .into_iter()
                        .enumerate()
                        .map(|(i, d)| view! {
                            <span
                                class="cursor-default"
                                on:mouseenter=move |_| hover.set(chart.with(|c| c.hover(i)))
                                on:mouseleave=move |_| hover.set(None)
                            >
                                {d.name}
                            </span>
                        })
                        .collect_view()
                }}
            </div>
            <Tooltip hover=hover.into() />
        </div>
    }
}

/// Consumption by type
#[component]
pub fn PieChartView(#[prop(into)] data: Signal<Vec<Datum>>) -> impl IntoView {
    let hover = create_rw_signal(None::<Hover>);
    let chart = Signal::derive(move || {
        data.with(|d| PieChart::new(d, PieChart::DEFAULT_SIZE, PieChart::DEFAULT_SIZE))
    });

    view! {
        <div class="relative flex flex-col items-center">
            <div inner_html=move || chart.with(PieChart::render) />
            <div class="flex flex-wrap justify-center gap-3 mt-2 text-xs">
                {move || {
                    data.get()
                        .into_iter()
                        .enumerate()
                        .map(|(i, d)| view! {
                            <span
                                class="flex items-center space-x-1 cursor-default"
                                on:mouseenter=move |_| hover.set(chart.with(|c| c.hover(i)))
                                on:mouseleave=move |_| hover.set(None)
                            >
                                <span
                                    class="inline-block w-3 h-3 rounded-full"
                                    style=format!("background-color: {}", PieChart::color(i))
                                />
                                <span>{d.name}</span>
                            </span>
                        })
                        .collect_view()
                }}
            </div>
            <Tooltip hover=hover.into() />
        </div>
    }
}
