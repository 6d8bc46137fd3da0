use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "dryai", version, about = "Manage dry.ai workspaces with natural language")]
pub struct Cli {
    /// Server base URL
    #[arg(long, global = true, env = "DRY_AI_SERVER")]
    pub server: Option<String>,

    /// Bearer token, skipping the stored one
    #[arg(long, global = true, env = "DRY_AI_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Log every completed call
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in, log out, or show the stored token
    #[command(subcommand)]
    Auth(AuthCommand),

    /// Create and look up spaces
    #[command(subcommand)]
    Space(SpaceCommand),

    /// Work with the items inside a space
    #[command(subcommand)]
    Item(ItemCommand),

    /// Minimal issue tracker kept in its own space
    #[command(subcommand)]
    Tracker(TrackerCommand),
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Verify an email address and store the returned token
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Remove the stored token
    Logout,
    /// Show whether a token is available
    Status,
}

#[derive(Debug, Subcommand)]
pub enum SpaceCommand {
    /// Create a space from a description
    Create {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Find a space with a natural-language query
    Find {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Show a space by ID
    Show { id: String },
}

/// A space ID plus a natural-language query
#[derive(Debug, Args)]
pub struct SpaceQuery {
    /// ID of the space to work in
    #[arg(long)]
    pub space: String,

    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,
}

impl SpaceQuery {
    pub fn text(&self) -> String {
        join_words(&self.query)
    }
}

#[derive(Debug, Subcommand)]
pub enum ItemCommand {
    /// Add a generic item
    Add(SpaceQuery),
    /// Add a type definition
    Type(SpaceQuery),
    /// Add a folder
    Folder(SpaceQuery),
    /// Search the space
    Search(SpaceQuery),
    /// Update every matching item
    UpdateAll(SpaceQuery),
    /// Delete every matching item
    DeleteMatching(SpaceQuery),
    /// Update one item by ID
    Update {
        id: String,
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Delete one item by ID
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
pub enum TrackerCommand {
    /// Create the tracker space and its Issue type
    Setup,
    /// Open a new issue
    Create {
        title: String,
        description: Vec<String>,
        #[arg(long, default_value = "medium")]
        priority: String,
    },
    /// List issues, optionally filtered by a query
    List { query: Vec<String> },
    /// Close every issue with this title
    Close { title: String },
    /// Change the priority of every issue with this title
    Priority { title: String, level: String },
}

pub fn join_words(words: &[String]) -> String {
    words.join(" ").trim().to_string()
}
