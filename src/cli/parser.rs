use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rollcall
/// Face-recognition attendance ledger backed by SQLite
#[derive(Parser)]
#[command(
    name = "rollcall",
    version = env!("CARGO_PKG_VERSION"),
    about = "Attendance ledger: register students, resolve recognized faces and mark daily attendance using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields to the configuration file")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage registered students
    Student {
        #[command(subcommand)]
        action: StudentAction,
    },

    /// Resolve a recognized label and mark attendance
    Mark {
        /// Label reported by the face classifier (student name)
        #[arg(required_unless_present = "label_id")]
        label: Option<String>,

        /// Numeric label id reported by the classifier, mapped through the label file
        #[arg(long = "label-id", conflicts_with = "label")]
        label_id: Option<i32>,

        /// Label map to use with --label-id (default from config)
        #[arg(long = "labels", value_name = "FILE", requires = "label_id")]
        labels: Option<String>,

        /// Classifier distance (lower = more confident)
        #[arg(long = "confidence", short = 'c', default_value_t = 0.0)]
        confidence: f64,

        /// Attendance date (YYYY-MM-DD, default: today)
        #[arg(long = "date")]
        date: Option<String>,

        /// Time in (HH:MM[:SS], default: now)
        #[arg(long = "time")]
        time: Option<String>,

        /// present | absent | late (default from config)
        #[arg(long = "status")]
        status: Option<String>,

        /// Overwrite an existing record for the same day
        #[arg(long = "force", short = 'f')]
        force: bool,
    },

    /// Show the attendance history of a student
    History {
        /// Student name or `#id`
        student: String,

        #[arg(long = "limit", short = 'n', help = "Show only the N most recent records")]
        limit: Option<usize>,
    },

    /// Show present/absent/late totals for a student
    Summary {
        /// Student name or `#id`
        student: String,
    },

    /// Show the register of a day: every student with its attendance, if any
    Daily {
        /// Date (YYYY-MM-DD, default: today)
        #[arg(long = "date")]
        date: Option<String>,
    },

    /// Export attendance records
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        /// Export only this student (name or `#id`)
        #[arg(long)]
        student: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}

#[derive(Subcommand)]
pub enum StudentAction {
    /// Register a new student
    Add {
        name: String,

        #[arg(long)]
        email: Option<String>,

        /// External student id (must be unique)
        #[arg(long = "sid")]
        student_id: Option<String>,
    },

    /// List registered students
    List,

    /// Edit a registered student
    Update {
        /// Student name or `#id`
        student: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long = "sid")]
        student_id: Option<String>,

        /// active | inactive
        #[arg(long)]
        status: Option<String>,
    },

    /// Delete a student and all of its attendance records
    Del {
        /// Student name or `#id`
        student: String,

        #[arg(long = "yes", short = 'y', help = "Skip the confirmation prompt")]
        yes: bool,
    },

    /// Register the owners of face samples found in a directory (Name_N.jpg)
    Import {
        #[arg(value_name = "DIR")]
        dir: String,
    },
}
