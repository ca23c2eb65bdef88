//! Energy Monitor CLI
//!
//! Command-line client for the energy API:
//! - Log in / register / log out (session kept on disk)
//! - List centros, áreas and sensores
//! - Watch a centro's real-time readings
//! - Query daily history and export it

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use energy_monitor::charts::{HistoricalChart, LineChart};
use energy_monitor::config::{generate_default_config, Config};
use energy_monitor::views::{historical, spawn_monitoring, FilterField, HistoricalRow};
use energy_monitor::{
    ApiClient, AuthContext, AuthService, AuthState, FileSessionStore, HistoricalView,
    LoginRequest, MonitoringView, RegisterForm,
};

#[derive(Parser)]
#[command(name = "energy-monitor")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Voltage, current and consumption monitoring from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Energy API URL (overrides config and ENERGY_MONITOR_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: search the usual locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json, csv)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session
    Login {
        email: String,
        #[arg(short, long)]
        password: String,
    },

    /// Create an account and store the session
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        email: String,
        #[arg(short, long)]
        password: String,
        /// Defaults to the password
        #[arg(long)]
        confirm_password: Option<String>,
    },

    /// Log out and delete the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// List centros
    Centros,

    /// List áreas
    Areas {
        /// Only áreas of this centro
        #[arg(long)]
        centro: Option<i64>,
    },

    /// List sensores
    Sensores {
        /// Only sensores of this centro
        #[arg(long, conflicts_with = "area")]
        centro: Option<i64>,
        /// Only sensores of this área
        #[arg(long)]
        area: Option<i64>,
    },

    /// Real-time readings for a centro
    Monitor {
        /// Centro id (default: the first centro)
        #[arg(long)]
        centro: Option<i64>,
        /// Keep polling until interrupted
        #[arg(short, long)]
        watch: bool,
        /// Write the voltage/current chart as SVG
        #[arg(long)]
        svg: Option<PathBuf>,
    },

    /// Daily history (default: the last seven days)
    Historical {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        centro: Option<i64>,
        #[arg(long)]
        area: Option<i64>,
        #[arg(long)]
        sensor: Option<i64>,
        /// Write the daily chart as SVG
        #[arg(long)]
        svg: Option<PathBuf>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_logging(&config);

    let session = Arc::new(FileSessionStore::new(config.session_path()));
    let client = ApiClient::new(config.client_config(), session)
        .context("Failed to build the API client")?;
    let auth = AuthContext::new(AuthService::new(client.clone()));
    let tz = config.display_offset();

    match cli.command {
        Commands::Login { email, password } => {
            auth.login(&LoginRequest { email, password })
                .await
                .context("Login failed")?;
            print_signed_in(&auth.state());
        }

        Commands::Register {
            first_name,
            last_name,
            email,
            password,
            confirm_password,
        } => {
            let form = RegisterForm {
                first_name,
                last_name,
                email,
                confirm_password: confirm_password.unwrap_or_else(|| password.clone()),
                password,
            };
            let request = match form.validate() {
                Ok(request) => request,
                Err(errors) => {
                    for error in &errors {
                        eprintln!("{}: {}", error.field(), error);
                    }
                    bail!("Invalid registration form");
                }
            };
            auth.register(&request)
                .await
                .context("Registration failed")?;
            print_signed_in(&auth.state());
        }

        Commands::Logout => {
            auth.logout().await;
            println!("Logged out");
        }

        Commands::Whoami => {
            auth.mount().await;
            match auth.state().user() {
                Some(user) => match cli.format.as_str() {
                    "json" => println!("{}", serde_json::to_string_pretty(user)?),
                    _ => println!("{} <{}>", user.full_name(), user.email),
                },
                None => bail!("Not logged in. Run `energy-monitor login <email> -p <password>`"),
            }
        }

        Commands::Centros => {
            let centros = require(client.get_centros().await, "centros")?;
            let rows: Vec<Vec<String>> = centros
                .iter()
                .map(|c| vec![c.id.to_string(), c.name.clone(), c.address.clone()])
                .collect();
            emit(&cli.format, &centros, &["ID", "Nombre", "Dirección"], &rows)?;
        }

        Commands::Areas { centro } => {
            let areas = match centro {
                Some(id) => client.get_areas_by_centro(id).await,
                None => client.get_areas().await,
            };
            let areas = require(areas, "áreas")?;
            let rows: Vec<Vec<String>> = areas
                .iter()
                .map(|a| vec![a.id.to_string(), a.name.clone(), a.centro_id.to_string()])
                .collect();
            emit(&cli.format, &areas, &["ID", "Nombre", "Centro"], &rows)?;
        }

        Commands::Sensores { centro, area } => {
            let sensors = match (centro, area) {
                (Some(id), _) => client.get_sensors_by_centro(id).await,
                (None, Some(id)) => client.get_sensors_by_area(id).await,
                (None, None) => client.get_sensors().await,
            };
            let sensors = require(sensors, "sensores")?;
            let rows: Vec<Vec<String>> = sensors
                .iter()
                .map(|s| {
                    vec![
                        s.id.to_string(),
                        s.label().to_string(),
                        s.kind.clone(),
                        s.status.clone(),
                        s.area_id.to_string(),
                    ]
                })
                .collect();
            emit(
                &cli.format,
                &sensors,
                &["ID", "Sensor", "Tipo", "Estado", "Área"],
                &rows,
            )?;
        }

        Commands::Monitor { centro, watch, svg } => {
            let mut view = MonitoringView::new();
            view.load_centros(&client).await;
            if let Some(error) = &view.error {
                bail!("{}", error);
            }
            if let Some(id) = centro {
                view.select(id);
            }
            if view.selected_centro.is_none() {
                bail!("{}", energy_monitor::views::monitoring::NO_CENTERS);
            }

            if watch {
                let (poller, mut rx) =
                    spawn_monitoring(client.clone(), view, tz, config.poll_interval());
                loop {
                    tokio::select! {
                        changed = rx.changed() => {
                            if changed.is_err() {
                                break;
                            }
                            let view = rx.borrow_and_update().clone();
                            print_monitoring(&view);
                            write_line_chart(&view, svg.as_ref())?;
                        }
                        _ = tokio::signal::ctrl_c() => break,
                    }
                }
                poller.stop();
            } else {
                view.refresh(&client, tz).await;
                if let Some(error) = &view.error {
                    bail!("{}", error);
                }
                print_monitoring(&view);
                write_line_chart(&view, svg.as_ref())?;
            }
        }

        Commands::Historical {
            start,
            end,
            centro,
            area,
            sensor,
            svg,
        } => {
            let today = Utc::now().with_timezone(&tz).date_naive();
            let mut view = HistoricalView::new(today);
            let filters = [
                (FilterField::StartDate, start),
                (FilterField::EndDate, end),
                (FilterField::CentroId, centro.map(|id| id.to_string())),
                (FilterField::AreaId, area.map(|id| id.to_string())),
                (FilterField::SensorId, sensor.map(|id| id.to_string())),
            ];
            for (field, value) in filters {
                if let Some(value) = value {
                    view.set_filter(field, value);
                }
            }

            view.fetch(&client).await;
            if let Some(error) = &view.error {
                bail!("{}", error);
            }

            let rows = view.rows();
            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&rows)?),
                "csv" => historical::write_csv(&rows, std::io::stdout().lock())?,
                _ => match view.table_placeholder() {
                    Some(placeholder) => println!("{}", placeholder),
                    None => {
                        let cells: Vec<Vec<String>> = rows
                            .iter()
                            .map(|r| r.cells().iter().map(|c| c.to_string()).collect())
                            .collect();
                        print_table(&HistoricalRow::HEADERS, &cells);
                    }
                },
            }

            if let Some(path) = svg {
                let chart = HistoricalChart::new(
                    &view.chart_points(today),
                    HistoricalChart::DEFAULT_WIDTH,
                    HistoricalChart::DEFAULT_HEIGHT,
                    today,
                );
                std::fs::write(&path, chart.render())?;
                eprintln!("Chart written to {:?}", path);
            }
        }

        Commands::Config { output } => {
            let template = generate_default_config();
            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &template)?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", template),
            }
        }
    }

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("energy_monitor={}", config.logging.level).into());

    // Logs go to stderr so table/json/csv output can be piped
    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn require<T>(value: Option<T>, what: &str) -> anyhow::Result<T> {
    value.with_context(|| format!("Failed to load {} (are you logged in?)", what))
}

fn print_signed_in(state: &AuthState) {
    match state.user() {
        Some(user) => println!("Logged in as {} <{}>", user.full_name(), user.email),
        None => println!("Logged in"),
    }
}

/// Print records as a table, pretty JSON or CSV
fn emit<T: Serialize>(
    format: &str,
    records: &[T],
    headers: &[&str],
    rows: &[Vec<String>],
) -> anyhow::Result<()> {
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(records)?),
        "csv" => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout().lock());
            wtr.write_record(headers)?;
            for row in rows {
                wtr.write_record(row)?;
            }
            wtr.flush()?;
        }
        _ => {
            if rows.is_empty() {
                println!("No data");
            } else {
                print_table(headers, rows);
            }
        }
    }
    Ok(())
}

fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    println!("{}", line(headers.to_vec()));
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1)));
    for row in rows {
        println!("{}", line(row.iter().map(String::as_str).collect()));
    }
}

fn print_monitoring(view: &MonitoringView) {
    let name = view
        .selected_centro
        .and_then(|id| view.centros.iter().find(|c| c.id == id))
        .map(|c| c.name.as_str())
        .unwrap_or("-");

    println!();
    println!("Centro: {}  ({})", name, Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));
    if let Some(error) = &view.error {
        println!("  {}", error);
    }
    println!("Consumo actual: {:.1} kWh", view.current_consumption);
    println!("Eficiencia: {:.1}%", view.efficiency);

    if let Some(last) = view.realtime.last() {
        println!(
            "Última lectura: {}  {:.2}V  {:.2}kW",
            last.time, last.voltage, last.current
        );
    }

    println!();
    match view.device_placeholder() {
        Some(placeholder) => println!("{}", placeholder),
        None => {
            let rows: Vec<Vec<String>> = view
                .devices
                .iter()
                .map(|d| {
                    vec![
                        d.name.clone(),
                        d.status.to_string(),
                        format!("{:.1} kWh", d.consumption),
                        d.last_update.clone(),
                    ]
                })
                .collect();
            print_table(&["Dispositivo", "Estado", "Consumo", "Actualizado"], &rows);
        }
    }

    println!();
    println!("Energía por dispositivo:");
    match view.energy_placeholder() {
        Some(placeholder) => println!("  {}", placeholder),
        None => {
            for d in &view.energy_by_device {
                println!("  {:<24} {:.2}", d.name, d.value);
            }
        }
    }

    println!("Consumo por tipo:");
    match view.consumption_placeholder() {
        Some(placeholder) => println!("  {}", placeholder),
        None => {
            for d in &view.consumption_by_type {
                println!("  {:<24} {:.2}", d.name, d.value);
            }
        }
    }
}

fn write_line_chart(view: &MonitoringView, path: Option<&PathBuf>) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let chart = LineChart::new(
        &view.realtime,
        LineChart::DEFAULT_WIDTH,
        LineChart::DEFAULT_HEIGHT,
    );
    std::fs::write(path, chart.render())
        .with_context(|| format!("Failed to write {:?}", path))?;
    tracing::debug!("Chart written to {:?}", path);
    Ok(())
}
