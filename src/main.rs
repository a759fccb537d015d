use chrono::{DateTime, Duration, NaiveDate, Utc};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use dispatchboard::config::{CalendarViewConfig, EngineConfig, ZoomLevel};
use dispatchboard::engine::{DispatchEngine, DragPayload, Slot};
use dispatchboard::gesture::{GrabZone, PointerPos, PreviewChannel, ResizeGesture};
use dispatchboard::grid::{block_geometry, fits_window, is_working_day, GridDimensions};
use dispatchboard::seed;
use dispatchboard::store::job::Job;

#[derive(Parser, Debug)]
#[command(name = "dispatchboard")]
#[command(version)]
#[command(about = "Field-service dispatch scheduling console (seeded demo data)")]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, short = 'o', global = true, default_value = "table")]
    output: OutputFormat,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Render the dispatch board for a date window
    Board {
        /// First day of the window (YYYY-MM-DD)
        #[arg(long, default_value = "2024-06-10")]
        date: NaiveDate,

        /// Number of consecutive days
        #[arg(long, default_value = "3")]
        days: usize,

        /// Zoom level
        #[arg(long, default_value = "md")]
        zoom: ZoomArg,

        /// Include weekend columns
        #[arg(long)]
        weekends: bool,
    },

    /// Job operations
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },

    /// Technician directory
    Tech {
        #[command(subcommand)]
        command: TechCommands,
    },
}

#[derive(clap::Subcommand, Debug)]
enum JobCommands {
    /// List unassigned jobs grouped by service order
    List {
        /// Case-insensitive filter over order id/title and job title
        #[arg(long)]
        search: Option<String>,
    },
    /// Drop a job onto a (technician, date, hour) grid cell
    Drop {
        job_id: String,
        technician_id: String,
        /// Target day (YYYY-MM-DD)
        date: NaiveDate,
        /// Target hour (0-23)
        hour: u32,
    },
    /// Assign a job directly to a technician and time range
    Assign {
        job_id: String,
        technician_id: String,
        /// Start (RFC 3339, e.g. 2024-06-10T09:00:00Z)
        start: DateTime<Utc>,
        /// Duration in minutes
        #[arg(long, default_value = "180")]
        minutes: i64,
    },
    /// Lock a committed assignment
    Lock { job_id: String },
    /// Set a new scheduled end for a job
    Resize {
        job_id: String,
        /// New end (RFC 3339)
        end: DateTime<Utc>,
    },
    /// Simulate an edge-drag resize gesture by a pixel delta
    ResizeDrag {
        job_id: String,
        /// Horizontal pointer travel in pixels (negative shrinks)
        #[arg(allow_negative_numbers = true)]
        delta_px: f32,
        /// Zoom level used for pixel-to-minute conversion
        #[arg(long, default_value = "md")]
        zoom: ZoomArg,
    },
    /// Return a job to the unassigned pool
    Unassign { job_id: String },
}

#[derive(clap::Subcommand, Debug)]
enum TechCommands {
    /// List all technicians
    List,
    /// Show one technician with overrides and leave
    Show { technician_id: String },
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ZoomArg {
    Xs,
    Sm,
    Md,
    Lg,
    Xl,
    Xxl,
}

impl From<ZoomArg> for ZoomLevel {
    fn from(z: ZoomArg) -> Self {
        match z {
            ZoomArg::Xs => ZoomLevel::Xs,
            ZoomArg::Sm => ZoomLevel::Sm,
            ZoomArg::Md => ZoomLevel::Md,
            ZoomArg::Lg => ZoomLevel::Lg,
            ZoomArg::Xl => ZoomLevel::Xl,
            ZoomArg::Xxl => ZoomLevel::Xxl,
        }
    }
}

// =============================================================================
// JSON Output Types
// =============================================================================

#[derive(Serialize)]
struct JobRow {
    job_id: String,
    title: String,
    status: String,
    priority: String,
    technician_id: Option<String>,
    scheduled_start: Option<DateTime<Utc>>,
    scheduled_end: Option<DateTime<Utc>>,
    locked: bool,
}

impl JobRow {
    fn from_job(job: &Job) -> Self {
        Self {
            job_id: job.id.clone(),
            title: job.title.clone(),
            status: job.status.to_string(),
            priority: job.priority.to_string(),
            technician_id: job.technician_id.clone(),
            scheduled_start: job.scheduled_start,
            scheduled_end: job.scheduled_end,
            locked: job.locked,
        }
    }
}

#[derive(Serialize)]
struct GroupOutput {
    order_id: String,
    order_title: String,
    priority: String,
    jobs: Vec<JobRow>,
}

#[derive(Serialize)]
struct TechRow {
    technician_id: String,
    name: String,
    status: String,
    skills: Vec<String>,
}

// =============================================================================
// Command Handlers
// =============================================================================

fn seeded_engine() -> DispatchEngine {
    DispatchEngine::with_dataset(
        EngineConfig::default(),
        seed::jobs(),
        seed::technicians(),
        seed::service_orders(),
    )
}

fn print_job(job: &Job, output: &OutputFormat) {
    match output {
        OutputFormat::Json => {
            let row = JobRow::from_job(job);
            println!(
                "{}",
                serde_json::to_string_pretty(&row).expect("serializable row")
            );
        }
        OutputFormat::Table => {
            println!("Job:        {}", job.id);
            println!("Title:      {}", job.title);
            println!("Status:     {}", job.status);
            println!("Priority:   {}", job.priority);
            if let Some(tech) = &job.technician_id {
                println!("Technician: {}", tech);
            }
            if let (Some(start), Some(end)) = (job.scheduled_start, job.scheduled_end) {
                println!(
                    "Scheduled:  {} - {}",
                    start.format("%Y-%m-%d %H:%M"),
                    end.format("%H:%M")
                );
            }
            println!("Locked:     {}", job.locked);
        }
    }
}

async fn handle_board(
    engine: &DispatchEngine,
    date: NaiveDate,
    days: usize,
    zoom: ZoomLevel,
    weekends: bool,
) {
    let view = CalendarViewConfig::default()
        .with_zoom(zoom)
        .with_day_window(days)
        .with_weekends(weekends);
    let dims = GridDimensions::for_zoom(view.zoom);

    println!(
        "Dispatch board - {} day(s) from {}  (hour column {}px)",
        view.day_window, date, dims.hour_column_width
    );

    for tech in engine.technicians().await {
        println!();
        println!("{} [{}]  {}", tech.full_name(), tech.id, tech.status);
        for offset in 0..view.day_window as i64 {
            let day = date + Duration::days(offset);
            if !is_working_day(&tech, day, view.include_weekends) {
                println!("  {}  (not working)", day);
                continue;
            }
            let jobs = engine.assigned_jobs(&tech.id, day).await;
            if jobs.is_empty() {
                println!("  {}  -", day);
                continue;
            }
            println!("  {}", day);
            for job in jobs {
                let (start, end) = match (job.scheduled_start, job.scheduled_end) {
                    (Some(s), Some(e)) => (s, e),
                    _ => continue,
                };
                let geo = block_geometry(
                    start,
                    (end - start).num_minutes(),
                    view.day_start_hour,
                    dims.hour_column_width,
                );
                let marker = if job.locked { " [locked]" } else { "" };
                let window = if fits_window(start, end, view.day_start_hour, view.day_end_hour) {
                    ""
                } else {
                    " [out of window]"
                };
                println!(
                    "    {:<8} {}-{}  x={:>6.1}px w={:>6.1}px  {}{}{}",
                    job.id,
                    start.format("%H:%M"),
                    end.format("%H:%M"),
                    geo.left_px,
                    geo.width_px,
                    job.title,
                    marker,
                    window
                );
            }
        }
    }
}

async fn handle_job_list(engine: &DispatchEngine, search: Option<String>, output: &OutputFormat) {
    let groups = engine.unassigned_by_service_order(search.as_deref()).await;
    match output {
        OutputFormat::Json => {
            let out: Vec<GroupOutput> = groups
                .iter()
                .map(|g| GroupOutput {
                    order_id: g.order.id.clone(),
                    order_title: g.order.title.clone(),
                    priority: g.order.priority.to_string(),
                    jobs: g.jobs.iter().map(JobRow::from_job).collect(),
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&out).expect("serializable groups")
            );
        }
        OutputFormat::Table => {
            if groups.is_empty() {
                println!("No unassigned jobs.");
                return;
            }
            for group in &groups {
                println!(
                    "{} [{}]  {}",
                    group.order.title, group.order.priority, group.order.id
                );
                for job in &group.jobs {
                    println!(
                        "  {:<8} {:<10} {:>4}min  {}",
                        job.id, job.priority.to_string(), job.estimated_duration_min, job.title
                    );
                }
                println!();
            }
        }
    }
}

async fn handle_job_drop(
    engine: &DispatchEngine,
    job_id: &str,
    technician_id: &str,
    date: NaiveDate,
    hour: u32,
    output: &OutputFormat,
) {
    let Some(job) = engine.job(job_id).await else {
        eprintln!("Error: job not found: {}", job_id);
        std::process::exit(1);
    };
    let payload = DragPayload::for_job(&job);
    let slot = Slot::new(technician_id, date, hour);
    let view = CalendarViewConfig::default();

    let notice = engine.drop_job(&payload, &slot, &view).await;
    println!("{}", notice.message);
    if let Some(job) = engine.job(job_id).await {
        print_job(&job, output);
    }
}

async fn handle_resize_drag(
    engine: &DispatchEngine,
    job_id: &str,
    delta_px: f32,
    zoom: ZoomLevel,
    output: &OutputFormat,
) {
    let Some(job) = engine.job(job_id).await else {
        eprintln!("Error: job not found: {}", job_id);
        std::process::exit(1);
    };
    let dims = GridDimensions::for_zoom(zoom);
    let mut preview = PreviewChannel::new();

    let origin = PointerPos { x: 0.0, y: 0.0 };
    let Some(mut gesture) = ResizeGesture::begin(
        &job,
        GrabZone::Edge,
        origin,
        dims.hour_column_width,
        engine.config(),
    ) else {
        println!("{} ignores resize (locked or unscheduled)", job_id);
        return;
    };

    gesture.pointer_moved(PointerPos {
        x: delta_px,
        y: 0.0,
    });
    gesture.tick(&mut preview);
    if let Some(p) = preview.get(job_id) {
        println!("Preview end: {}", p.candidate_end.format("%H:%M"));
    }

    let end = gesture.finish(&mut preview);
    match engine.commit_resize_gesture(&end).await {
        Some(notice) => println!("{}", notice.message),
        None => println!("No valid resize candidate; nothing committed."),
    }
    if let Some(job) = engine.job(job_id).await {
        print_job(&job, output);
    }
}

async fn handle_tech_list(engine: &DispatchEngine, output: &OutputFormat) {
    let techs = engine.technicians().await;
    match output {
        OutputFormat::Json => {
            let rows: Vec<TechRow> = techs
                .iter()
                .map(|t| TechRow {
                    technician_id: t.id.clone(),
                    name: t.full_name(),
                    status: t.status.to_string(),
                    skills: t.skills.clone(),
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&rows).expect("serializable rows")
            );
        }
        OutputFormat::Table => {
            println!("{:<8} {:<20} {:<14} SKILLS", "ID", "NAME", "STATUS");
            println!("{}", "-".repeat(60));
            for tech in &techs {
                println!(
                    "{:<8} {:<20} {:<14} {}",
                    tech.id,
                    tech.full_name(),
                    tech.status.to_string(),
                    tech.skills.join(", ")
                );
            }
        }
    }
}

async fn handle_tech_show(engine: &DispatchEngine, technician_id: &str) {
    let Some(tech) = engine.technician(technician_id).await else {
        eprintln!("Error: technician not found: {}", technician_id);
        std::process::exit(1);
    };
    println!("Technician: {} [{}]", tech.full_name(), tech.id);
    println!("Status:     {}", tech.status);
    println!("Contact:    {}", tech.contact);
    println!("Skills:     {}", tech.skills.join(", "));
    println!(
        "Hours:      {} - {}",
        tech.working_hours.start.format("%H:%M"),
        tech.working_hours.end.format("%H:%M")
    );
    if let Some(note) = &tech.meta.schedule_note {
        println!("Note:       {}", note);
    }
    if !tech.meta.day_overrides.is_empty() {
        println!("Overrides:");
        for (weekday, day) in &tech.meta.day_overrides {
            if day.full_day_off {
                println!("  {:<4} day off", format!("{}", weekday));
            } else {
                println!(
                    "  {:<4} {} - {}",
                    format!("{}", weekday),
                    day.start.format("%H:%M"),
                    day.end.format("%H:%M")
                );
            }
        }
    }
    if !tech.meta.leaves.is_empty() {
        println!("Leave:");
        for leave in &tech.meta.leaves {
            println!("  {} to {}  {}", leave.start, leave.end, leave.reason);
        }
    }
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let engine = seeded_engine();

    match args.command {
        Commands::Board {
            date,
            days,
            zoom,
            weekends,
        } => {
            handle_board(&engine, date, days, zoom.into(), weekends).await;
        }
        Commands::Job { command } => match command {
            JobCommands::List { search } => {
                handle_job_list(&engine, search, &args.output).await;
            }
            JobCommands::Drop {
                job_id,
                technician_id,
                date,
                hour,
            } => {
                handle_job_drop(&engine, &job_id, &technician_id, date, hour, &args.output).await;
            }
            JobCommands::Assign {
                job_id,
                technician_id,
                start,
                minutes,
            } => {
                let end = start + Duration::minutes(minutes);
                match engine.assign_job(&job_id, &technician_id, start, end).await {
                    Ok(()) => {
                        if let Some(job) = engine.job(&job_id).await {
                            print_job(&job, &args.output);
                        }
                    }
                    Err(err) => {
                        eprintln!("Error: {}", err);
                        std::process::exit(1);
                    }
                }
            }
            JobCommands::Lock { job_id } => match engine.lock_job(&job_id).await {
                Ok(true) => println!("Locked {}", job_id),
                Ok(false) => println!("{} was already locked", job_id),
                Err(err) => {
                    eprintln!("Error: {}", err);
                    std::process::exit(1);
                }
            },
            JobCommands::Resize { job_id, end } => match engine.resize_job(&job_id, end).await {
                Ok(outcome) => {
                    use dispatchboard::store::ResizeOutcome;
                    match outcome {
                        ResizeOutcome::Resized => println!("Resized {}", job_id),
                        ResizeOutcome::IgnoredLocked => {
                            println!("{} is locked; resize ignored", job_id)
                        }
                    }
                }
                Err(err) => {
                    eprintln!("Error: {}", err);
                    std::process::exit(1);
                }
            },
            JobCommands::ResizeDrag {
                job_id,
                delta_px,
                zoom,
            } => {
                handle_resize_drag(&engine, &job_id, delta_px, zoom.into(), &args.output).await;
            }
            JobCommands::Unassign { job_id } => match engine.unassign_job(&job_id).await {
                Ok(()) => println!("Unassigned {}", job_id),
                Err(err) => {
                    eprintln!("Error: {}", err);
                    std::process::exit(1);
                }
            },
        },
        Commands::Tech { command } => match command {
            TechCommands::List => handle_tech_list(&engine, &args.output).await,
            TechCommands::Show { technician_id } => {
                handle_tech_show(&engine, &technician_id).await;
            }
        },
    }
}
