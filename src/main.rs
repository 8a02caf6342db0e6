use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sprint_capacity::capacity::{CapacityEngine, LeavePolicy};
use sprint_capacity::db::Database;
use sprint_capacity::models::{ConfigurationInput, FieldChange};
use sprint_capacity::planner::Planner;
use sprint_capacity::render;
use sprint_capacity::session::Session;
use sprint_capacity::settings::Settings;
use sprint_capacity::PlannerError;

#[derive(Parser)]
#[command(name = "spcap")]
#[command(about = "Plan sprint resource capacity and story points")]
struct Cli {
    /// Database file (overrides settings and SPRINT_CAPACITY_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage work-location configurations
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Manage the man-days to story points table
    #[command(subcommand)]
    Mapping(MappingCommand),
    /// Manage the resource roster
    #[command(subcommand)]
    Resource(ResourceCommand),
    /// Show the derived capacity for a configuration without saving anything
    Preview {
        /// Configuration position (from `config list`)
        #[arg(short, long)]
        config: usize,
        /// Hours per day, defaults to the configuration's working hours
        #[arg(long)]
        capacity: Option<u32>,
        /// Leave days
        #[arg(long, allow_negative_numbers = true)]
        leaves: Option<i64>,
    },
    /// Show or change settings
    Settings {
        /// `additional` or `includes_public_holidays`
        #[arg(long, value_parser = parse_leave_policy)]
        leave_policy: Option<LeavePolicy>,
        /// Default tracing filter
        #[arg(long)]
        log_filter: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    List,
    Add {
        #[arg(short, long)]
        location: String,
        #[arg(long, default_value = "10")]
        days: u32,
        #[arg(long, default_value = "8")]
        hours: u32,
        #[arg(long, default_value = "0")]
        holidays: u32,
    },
    /// Replace fields of a configuration; omitted fields keep their value
    Edit {
        position: usize,
        #[arg(short, long)]
        location: Option<String>,
        #[arg(long)]
        days: Option<u32>,
        #[arg(long)]
        hours: Option<u32>,
        #[arg(long)]
        holidays: Option<u32>,
    },
    Remove {
        position: usize,
    },
}

#[derive(Subcommand)]
enum MappingCommand {
    List,
    /// Append a row; without values the row is 0 days, 0 points
    Add {
        #[arg(long, requires = "points", allow_negative_numbers = true)]
        days: Option<i64>,
        #[arg(long, requires = "days", allow_negative_numbers = true)]
        points: Option<i64>,
    },
    Set {
        position: usize,
        #[arg(long, allow_negative_numbers = true)]
        days: i64,
        #[arg(long, allow_negative_numbers = true)]
        points: i64,
    },
    Remove {
        position: usize,
    },
    /// Restore the default table
    Reset,
}

#[derive(Subcommand)]
enum ResourceCommand {
    List,
    Add {
        /// Configuration position (from `config list`)
        #[arg(short, long, default_value = "1")]
        config: usize,
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        role: String,
        /// Hours per day, defaults to the configuration's working hours
        #[arg(long)]
        capacity: Option<u32>,
        #[arg(long, allow_negative_numbers = true)]
        leaves: Option<i64>,
    },
    Edit {
        position: usize,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        role: Option<String>,
        #[arg(long)]
        capacity: Option<u32>,
        #[arg(long, allow_negative_numbers = true)]
        leaves: Option<i64>,
    },
    Remove {
        position: usize,
    },
}

fn parse_leave_policy(s: &str) -> Result<LeavePolicy, String> {
    LeavePolicy::from_str(s)
        .ok_or_else(|| format!("unknown leave policy '{}' (expected additional or includes_public_holidays)", s))
}

/// Initialize tracing on stderr so stdout only carries tables.
fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Convert a 1-based position from the command line into an index.
fn index(position: usize) -> anyhow::Result<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| anyhow::anyhow!("Positions start at 1"))
}

fn open_planner(db_path: Option<PathBuf>, settings: &Settings) -> anyhow::Result<Planner> {
    let path = match db_path.or_else(|| settings.database_path.clone()) {
        Some(path) => path,
        None => Database::default_path()?,
    };
    let db = Database::open(path)?;
    db.migrate().context("Failed to migrate database")?;
    Ok(Planner::load(db, CapacityEngine::new(settings.leave_policy))?)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let stored = Settings::load_file();
    let settings = stored.clone().with_env();
    init_tracing(&settings.log_filter);

    match cli.command {
        Commands::Settings {
            leave_policy,
            log_filter,
        } => run_settings(stored, leave_policy, log_filter),
        Commands::Config(cmd) => {
            let mut planner = open_planner(cli.db, &settings)?;
            run_config(&mut planner, cmd)
        }
        Commands::Mapping(cmd) => {
            let mut planner = open_planner(cli.db, &settings)?;
            run_mapping(&mut planner, cmd)
        }
        Commands::Resource(cmd) => {
            let mut planner = open_planner(cli.db, &settings)?;
            run_resource(&mut planner, cmd)
        }
        Commands::Preview {
            config,
            capacity,
            leaves,
        } => {
            let planner = open_planner(cli.db, &settings)?;
            let mut session = Session::new(&planner);
            let config_id = planner.configs().get_at(index(config)?)?.id;
            session.select_config(&planner, config_id)?;
            apply_capacity_inputs(&mut session, &planner, capacity, leaves)?;
            print!("{}", render::render_draft(session.draft()));
            Ok(())
        }
    }
}

fn run_settings(
    mut settings: Settings,
    leave_policy: Option<LeavePolicy>,
    log_filter: Option<String>,
) -> anyhow::Result<()> {
    let changed = leave_policy.is_some() || log_filter.is_some();
    if let Some(policy) = leave_policy {
        settings.leave_policy = policy;
    }
    if let Some(filter) = log_filter {
        settings.log_filter = filter;
    }
    if changed {
        settings.save()?;
        tracing::info!("Settings saved");
    }
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

fn run_config(planner: &mut Planner, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::List => {}
        ConfigCommand::Add {
            location,
            days,
            hours,
            holidays,
        } => {
            planner.add_config(ConfigurationInput {
                work_location: location,
                available_days_per_sprint: days,
                default_working_hours_per_day: hours,
                public_holidays: holidays,
            })?;
        }
        ConfigCommand::Edit {
            position,
            location,
            days,
            hours,
            holidays,
        } => {
            let existing = planner.configs().get_at(index(position)?)?;
            let id = existing.id;
            let mut input = ConfigurationInput::from(existing);
            if let Some(location) = location {
                input.work_location = location;
            }
            if let Some(days) = days {
                input.available_days_per_sprint = days;
            }
            if let Some(hours) = hours {
                input.default_working_hours_per_day = hours;
            }
            if let Some(holidays) = holidays {
                input.public_holidays = holidays;
            }
            planner.update_config(id, input)?;
        }
        ConfigCommand::Remove { position } => {
            let id = planner.configs().get_at(index(position)?)?.id;
            planner.remove_config(id)?;
        }
    }
    print!("{}", render::render_configs(planner.configs().list()));
    Ok(())
}

fn run_mapping(planner: &mut Planner, cmd: MappingCommand) -> anyhow::Result<()> {
    match cmd {
        MappingCommand::List => {}
        MappingCommand::Add { days, points } => match (days, points) {
            (Some(days), Some(points)) => {
                planner.add_mapping_row(days, points)?;
            }
            _ => {
                planner.add_empty_mapping_row()?;
            }
        },
        MappingCommand::Set {
            position,
            days,
            points,
        } => {
            let id = planner.mapping().get_at(index(position)?)?.id;
            planner.update_mapping_row(id, days, points)?;
        }
        MappingCommand::Remove { position } => {
            let id = planner.mapping().get_at(index(position)?)?.id;
            planner.remove_mapping_row(id)?;
        }
        MappingCommand::Reset => planner.reset_mapping()?,
    }
    print!("{}", render::render_mapping(planner.mapping().list()));
    Ok(())
}

fn run_resource(planner: &mut Planner, cmd: ResourceCommand) -> anyhow::Result<()> {
    let mut session = Session::new(planner);

    match cmd {
        ResourceCommand::List => {}
        ResourceCommand::Add {
            config,
            name,
            role,
            capacity,
            leaves,
        } => {
            if !session.can_create() {
                return Err(PlannerError::NoConfiguration.into());
            }
            let config_id = planner.configs().get_at(index(config)?)?.id;
            session.select_config(planner, config_id)?;
            session.change(planner, FieldChange::ResourceName(name))?;
            session.change(planner, FieldChange::Role(role))?;
            apply_capacity_inputs(&mut session, planner, capacity, leaves)?;
            session.submit(planner)?;
        }
        ResourceCommand::Edit {
            position,
            name,
            role,
            capacity,
            leaves,
        } => {
            let id = planner.resources().get_at(index(position)?)?.id;
            session.begin_edit(planner, id)?;
            if let Some(name) = name {
                session.change(planner, FieldChange::ResourceName(name))?;
            }
            if let Some(role) = role {
                session.change(planner, FieldChange::Role(role))?;
            }
            apply_capacity_inputs(&mut session, planner, capacity, leaves)?;
            session.submit(planner)?;
        }
        ResourceCommand::Remove { position } => {
            let id = planner.resources().get_at(index(position)?)?.id;
            session.remove_resource(planner, id)?;
        }
    }
    print!("{}", render::render_resources(planner.resources().list()));
    Ok(())
}

fn apply_capacity_inputs(
    session: &mut Session,
    planner: &Planner,
    capacity: Option<u32>,
    leaves: Option<i64>,
) -> anyhow::Result<()> {
    if let Some(hours) = capacity {
        session.change(planner, FieldChange::MaxCapacityPerDay(hours))?;
    }
    if let Some(leaves) = leaves {
        session.change(planner, FieldChange::Leaves(leaves))?;
    }
    Ok(())
}
