use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use colored::{ColoredString, Colorize};
use eyre::Result;
use std::path::{Path, PathBuf};
use std::process;
use tasklist::storage::validate_key;
use tasklist::{
    DEFAULT_KEY, DraftField, DraftTarget, FileStorage, Priority, SqliteStorage, StatusFilter, Storage, Task,
    TaskDraft, TaskId, TaskStore, ValidationError,
};
use tracing::Level;

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "Create, edit, complete, restore and delete tasks")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Directory holding the task storage (default: local data directory)
    #[arg(short, long)]
    store_path: Option<PathBuf>,

    /// Storage backend
    #[arg(short, long, value_enum, default_value_t = Backend::File)]
    backend: Backend,

    /// Storage key holding the task list
    #[arg(short, long, default_value = DEFAULT_KEY)]
    key: String,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    /// One JSON file per key
    File,
    /// SQLite database
    Sqlite,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Yaml,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new pending task
    Add {
        title: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Due date, e.g. 2024-01-01 (not validated)
        #[arg(long, default_value = "")]
        due: String,

        /// Alta, Media or Baja
        #[arg(short, long, default_value_t = Priority::Medium)]
        priority: Priority,
    },

    /// List tasks
    List {
        #[arg(long, default_value_t = StatusFilter::All)]
        status: StatusFilter,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show one task
    Show { id: TaskId },

    /// Change fields of a task
    Edit {
        id: TaskId,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long)]
        due: Option<String>,

        #[arg(short, long)]
        priority: Option<Priority>,
    },

    /// Mark a task completed
    Complete { id: TaskId },

    /// Move a completed task back to pending
    Restore { id: TaskId },

    /// Remove a task
    Delete { id: TaskId },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        match e.downcast_ref::<ValidationError>() {
            Some(validation) => eprintln!("{}", validation.to_string().red()),
            None => eprintln!("Error: {:#}", e),
        }
        process::exit(exit_code(&e));
    }
}

/// 1 for a rejected draft, 2 for anything else
fn exit_code(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<ValidationError>().is_some() {
        1
    } else {
        2
    }
}

fn run(cli: Cli) -> Result<()> {
    validate_key(&cli.key)?;

    let store_path = cli.store_path.unwrap_or_else(default_store_path);
    let storage = open_storage(cli.backend, &store_path)?;
    let mut store = TaskStore::load_with_key(storage, cli.key);

    match cli.command {
        Commands::Add {
            title,
            description,
            due,
            priority,
        } => {
            let draft = TaskDraft::new(title)
                .with_description(description)
                .with_due_date(due)
                .with_priority(priority);
            let id = store.create(draft)?;
            println!("Created task {}", id);
        }
        Commands::List { status, format } => {
            let tasks: Vec<&Task> = store.filtered(status).collect();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tasks)?),
                OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&tasks)?),
                OutputFormat::Table => print_board(&store, status),
            }
        }
        Commands::Show { id } => match store.get(id) {
            Some(task) => print_task(task, today()),
            None => not_found(id),
        },
        Commands::Edit {
            id,
            title,
            description,
            due,
            priority,
        } => {
            if !store.begin_edit(id) {
                not_found(id);
                return Ok(());
            }

            let priority = priority.map(|p| p.as_str().to_string());
            let changes = [
                (DraftField::Title, title),
                (DraftField::Description, description),
                (DraftField::DueDate, due),
                (DraftField::Priority, priority),
            ];
            for (field, value) in changes {
                if let Some(value) = value {
                    store.update_draft_field(DraftTarget::Edit, field, &value)?;
                }
            }

            match store.commit_edit()? {
                Some(id) => println!("Updated task {}", id),
                None => not_found(id),
            }
        }
        Commands::Complete { id } => {
            if store.complete(id)? {
                println!("Completed task {}", id);
            } else {
                not_found(id);
            }
        }
        Commands::Restore { id } => {
            if store.restore(id)? {
                println!("Restored task {}", id);
            } else {
                not_found(id);
            }
        }
        Commands::Delete { id } => {
            if store.delete(id)? {
                println!("Deleted task {}", id);
            } else {
                not_found(id);
            }
        }
    }

    Ok(())
}

fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("tasklist"))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn open_storage(backend: Backend, path: &Path) -> Result<Box<dyn Storage>> {
    let storage: Box<dyn Storage> = match backend {
        Backend::File => Box::new(FileStorage::open(path)?),
        Backend::Sqlite => Box::new(SqliteStorage::open(path)?),
    };
    Ok(storage)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn not_found(id: TaskId) {
    println!("No task with id {}", id);
}

fn print_board<S: Storage>(store: &TaskStore<S>, status: StatusFilter) {
    let today = today();
    let view = store.view();

    if status != StatusFilter::Completed {
        println!("{}", "Pending".bold().blue());
        print_section(&view.pending, today);
    }
    if status == StatusFilter::All {
        println!();
    }
    if status != StatusFilter::Pending {
        println!("{}", "Completed".bold().blue());
        print_section(&view.completed, today);
    }
}

fn print_section(tasks: &[&Task], today: NaiveDate) {
    if tasks.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for task in tasks {
        print_task(task, today);
    }
}

fn print_task(task: &Task, today: NaiveDate) {
    let title = if task.is_completed {
        task.title.green().strikethrough()
    } else {
        task.title.bold()
    };
    println!("  {} {} [{}]", task.id.to_string().dimmed(), title, priority_label(task.priority));

    if !task.description.is_empty() {
        println!("      {}", task.description);
    }
    if !task.due_date.is_empty() {
        let due = format!("due {}", task.due_date);
        if task.is_overdue(today) {
            println!("      {}", format!("{} (overdue)", due).red());
        } else {
            println!("      {}", due);
        }
    }
}

fn priority_label(priority: Priority) -> ColoredString {
    match priority {
        Priority::High => priority.as_str().red(),
        Priority::Medium => priority.as_str().yellow(),
        Priority::Low => priority.as_str().green(),
    }
}
