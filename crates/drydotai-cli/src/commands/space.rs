use anyhow::{anyhow, Result};
use drydotai::{Session, Space};

use crate::cli::{join_words, SpaceCommand};

pub async fn run(session: &Session, command: SpaceCommand) -> Result<()> {
    let space = match command {
        SpaceCommand::Create { query } => session
            .create_space(&join_words(&query))
            .await?
            .ok_or_else(|| anyhow!("The server did not return a space"))?,
        SpaceCommand::Find { query } => {
            let query = join_words(&query);
            session
                .get_space(&query)
                .await?
                .ok_or_else(|| anyhow!("No space matches: {}", query))?
        }
        SpaceCommand::Show { id } => open(session, &id).await?,
    };

    print_summary(&space);
    Ok(())
}

/// Space by ID, or an error naming the missing ID
pub async fn open(session: &Session, id: &str) -> Result<Space> {
    session
        .get_space_by_id(id)
        .await?
        .ok_or_else(|| anyhow!("Space not found: {}", id))
}

fn print_summary(space: &Space) {
    println!("{}", space);
    if let Some(url) = space.url() {
        println!("View at: {}", url);
    }
}
