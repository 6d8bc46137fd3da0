//! Issue tracker workflow.
//!
//! `setup` creates a space with an Issue type and remembers its ID; the
//! other commands reopen that space and talk to it in plain language.

use std::path::Path;

use anyhow::{anyhow, bail, Result};
use drydotai::{Item, Session, Space};
use tracing::info;

use crate::cli::{join_words, TrackerCommand};
use crate::state::TrackerState;

const SPACE_NAME: &str = "Issue Tracker";

const ISSUE_TYPE_QUERY: &str = "Create an Issue type with fields:
- title (text)
- description (text)
- status (options: open, in_progress, closed)
- priority (options: low, medium, high, critical)
- assignee (text)";

const DEFAULT_LIST_QUERY: &str = "find all issues";

pub async fn run(session: &Session, state_path: &Path, command: TrackerCommand) -> Result<()> {
    match command {
        TrackerCommand::Setup => setup(session, state_path).await,
        TrackerCommand::Create {
            title,
            description,
            priority,
        } => {
            let space = open(session, state_path).await?;
            let query = new_issue_query(&title, &join_words(&description), &priority);
            space
                .add_item(&query)
                .await?
                .ok_or_else(|| anyhow!("The server did not return the new issue"))?;
            println!("Created issue: {}", title);
            Ok(())
        }
        TrackerCommand::List { query } => {
            let space = open(session, state_path).await?;
            let query = Some(join_words(&query))
                .filter(|q| !q.is_empty())
                .unwrap_or_else(|| DEFAULT_LIST_QUERY.to_string());
            let issues = space.search(&query).await?;
            println!("Found {} issue(s):", issues.len());
            for issue in &issues {
                println!("{}", issue_line(issue));
            }
            Ok(())
        }
        TrackerCommand::Close { title } => {
            let space = open(session, state_path).await?;
            update_matching(&space, &title, "Set status to closed").await
        }
        TrackerCommand::Priority { title, level } => {
            let space = open(session, state_path).await?;
            update_matching(&space, &title, &format!("Set priority to {}", level)).await
        }
    }
}

async fn setup(session: &Session, state_path: &Path) -> Result<()> {
    let space = session
        .create_space(SPACE_NAME)
        .await?
        .ok_or_else(|| anyhow!("The server did not return a space"))?;
    let space_id = space
        .id()
        .ok_or_else(|| anyhow!("The new space has no ID"))?
        .to_string();

    // Save state only once the Issue type exists
    space.add_type(ISSUE_TYPE_QUERY).await?;

    TrackerState::new(space_id, space.name().map(str::to_string)).save(state_path)?;
    info!(path = %state_path.display(), "Tracker state saved");

    println!("Setup complete! Workspace: {}", space.name().unwrap_or(SPACE_NAME));
    if let Some(url) = space.url() {
        println!("View at: {}", url);
    }
    Ok(())
}

async fn open(session: &Session, state_path: &Path) -> Result<Space> {
    let Some(state) = TrackerState::load(state_path)? else {
        bail!("No workspace configured. Run `dryai tracker setup` first.");
    };
    session
        .get_space_by_id(&state.space_id)
        .await?
        .ok_or_else(|| anyhow!("Could not connect to workspace. Run setup again."))
}

async fn update_matching(space: &Space, title: &str, instruction: &str) -> Result<()> {
    let issues = space.search(&find_issue_query(title)).await?;
    if issues.is_empty() {
        println!("No issue found with title: {}", title);
        return Ok(());
    }

    for issue in &issues {
        issue.update(space.client(), instruction).await?;
        println!("Updated issue: {} ({})", display_name(issue), instruction);
    }
    Ok(())
}

fn new_issue_query(title: &str, description: &str, priority: &str) -> String {
    format!(
        "Create a new issue:\nTitle: {}\nDescription: {}\nPriority: {}\nStatus: open",
        title, description, priority
    )
}

fn find_issue_query(title: &str) -> String {
    format!("find issue with title: {}", title)
}

fn display_name(issue: &Item) -> &str {
    issue.name().unwrap_or("(untitled)")
}

/// `  - [status] name (Priority: p)`
fn issue_line(issue: &Item) -> String {
    let field = |name: &str| issue.field_str(name).unwrap_or("unknown").to_string();
    format!(
        "  - [{}] {} (Priority: {})",
        field("status"),
        display_name(issue),
        field("priority")
    )
}
