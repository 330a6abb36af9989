use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use taskflow_core::{ProjectStatus, SortDirection, TaskCategory, TaskPriority, TaskStatus};
use taskflow_local::{ItemFilter, ItemPriority};

#[derive(Parser)]
#[command(name = "taskflow")]
#[command(about = "TaskFlow - tasks, projects and local checklists", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Record backend base URL
    #[arg(long, env = "TASKFLOW_BACKEND_URL", global = true)]
    pub backend_url: Option<String>,

    /// Canvas id sent with every backend request
    #[arg(long, env = "TASKFLOW_CANVAS_ID", global = true)]
    pub canvas_id: Option<String>,

    /// Use an in-process backend instead of the HTTP one
    #[arg(long, global = true)]
    pub memory: bool,

    /// Local checklist file
    #[arg(long, env = "TASKFLOW_LOCAL_STORE_PATH", global = true)]
    pub local_store: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage backend tasks
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Manage backend projects
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Show statistics and recent activity
    Dashboard {
        /// Number of recent tasks and projects to show
        #[arg(long, default_value = "5")]
        recent: u64,
    },

    /// Manage local checklists
    Lists {
        #[command(subcommand)]
        action: ListsAction,
    },

    /// Start API server
    Serve {
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Zero-based page number
    #[arg(long, default_value = "0")]
    pub page: u64,

    /// Page size
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u64).range(1..))]
    pub limit: u64,

    /// Field to order by
    #[arg(long)]
    pub sort: Option<String>,

    /// asc or desc
    #[arg(long, default_value = "asc")]
    pub direction: SortDirection,

    /// Substring search on the title/name
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// List tasks
    List {
        #[command(flatten)]
        list: ListArgs,

        #[arg(long)]
        status: Option<TaskStatus>,

        #[arg(long)]
        priority: Option<TaskPriority>,

        #[arg(long)]
        category: Option<TaskCategory>,
    },

    /// Show one task
    Get { id: String },

    /// Create a task
    Create {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, default_value = "To Do")]
        status: TaskStatus,

        #[arg(long, default_value = "Medium")]
        priority: TaskPriority,

        #[arg(long, default_value = "Work")]
        category: TaskCategory,

        /// YYYY-MM-DD
        #[arg(long)]
        due: Option<NaiveDate>,

        #[arg(long)]
        assigned_to: Option<String>,
    },

    /// Update fields of a task
    Update {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        status: Option<TaskStatus>,

        #[arg(long)]
        priority: Option<TaskPriority>,

        #[arg(long)]
        category: Option<TaskCategory>,

        #[arg(long)]
        due: Option<NaiveDate>,

        #[arg(long)]
        assigned_to: Option<String>,
    },

    /// Delete a task
    Delete { id: String },

    /// Count tasks per status and priority
    Stats,
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// List projects
    List {
        #[command(flatten)]
        list: ListArgs,

        #[arg(long)]
        status: Option<ProjectStatus>,
    },

    /// Show one project
    Get { id: String },

    /// Create a project
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, default_value = "Not Started")]
        status: ProjectStatus,

        #[arg(long)]
        start: Option<NaiveDate>,

        #[arg(long)]
        end: Option<NaiveDate>,

        /// Team member, repeatable
        #[arg(long = "member")]
        members: Vec<String>,
    },

    /// Update fields of a project
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        status: Option<ProjectStatus>,

        #[arg(long)]
        start: Option<NaiveDate>,

        #[arg(long)]
        end: Option<NaiveDate>,
    },

    /// Delete a project
    Delete { id: String },

    /// Count projects per status
    Stats,
}

#[derive(Subcommand)]
pub enum ListsAction {
    /// Show all lists
    Show,

    /// Create a list and make it active
    Add { name: String },

    /// Delete a list and its items
    Remove { list_id: String },

    /// Make a list active
    Use { list_id: String },

    /// Show items of a list (the active list by default)
    Items {
        #[arg(long)]
        list: Option<String>,

        #[arg(long, default_value = "all")]
        filter: ItemFilter,
    },

    /// Add an item
    AddItem {
        title: String,

        #[arg(long)]
        list: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, default_value = "medium")]
        priority: ItemPriority,

        #[arg(long)]
        due: Option<NaiveDate>,
    },

    /// Flip an item between completed and active
    Toggle {
        item_id: String,

        #[arg(long)]
        list: Option<String>,
    },

    /// Edit an item
    Edit {
        item_id: String,

        #[arg(long)]
        list: Option<String>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        priority: Option<ItemPriority>,

        #[arg(long)]
        due: Option<NaiveDate>,

        /// Remove the due date
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,
    },

    /// Delete an item
    DeleteItem {
        item_id: String,

        #[arg(long)]
        list: Option<String>,
    },
}
