use anyhow::{anyhow, Result};
use drydotai::{Item, Session};

use super::space::open;
use crate::cli::{join_words, ItemCommand};

pub async fn run(session: &Session, command: ItemCommand) -> Result<()> {
    match command {
        ItemCommand::Add(q) => {
            let space = open(session, &q.space).await?;
            print_created(space.add_item(&q.text()).await?)
        }
        ItemCommand::Type(q) => {
            let space = open(session, &q.space).await?;
            print_created(space.add_type(&q.text()).await?)
        }
        ItemCommand::Folder(q) => {
            let space = open(session, &q.space).await?;
            print_created(space.add_folder(&q.text()).await?)
        }
        ItemCommand::Search(q) => {
            let space = open(session, &q.space).await?;
            let items = space.search(&q.text()).await?;
            println!("Found {} item(s)", items.len());
            print_items(&items);
            Ok(())
        }
        ItemCommand::UpdateAll(q) => {
            let space = open(session, &q.space).await?;
            let items = space.update_items(&q.text()).await?;
            println!("Updated {} item(s)", items.len());
            print_items(&items);
            Ok(())
        }
        ItemCommand::DeleteMatching(q) => {
            let space = open(session, &q.space).await?;
            space.delete_items(&q.text()).await?;
            println!("Deleted items matching: {}", q.text());
            Ok(())
        }
        ItemCommand::Update { id, query } => {
            let client = session.client().await?;
            let item = client
                .update_item(&id, &join_words(&query))
                .await?
                .ok_or_else(|| anyhow!("The server did not return the updated item"))?;
            println!("{}", item);
            Ok(())
        }
        ItemCommand::Delete { id } => {
            session.client().await?.delete_item(&id).await?;
            println!("Deleted item {}", id);
            Ok(())
        }
    }
}

fn print_created(item: Option<Item>) -> Result<()> {
    let item = item.ok_or_else(|| anyhow!("The server did not return the new item"))?;
    println!("{}", item);
    Ok(())
}

fn print_items(items: &[Item]) {
    for item in items {
        println!("{}", item);
    }
}
