use anyhow::{bail, Result};
use drydotai::{Authenticator, ConsolePrompt, DryClient, EmailProvider, Session};

use crate::cli::AuthCommand;

/// Characters of the token shown by `auth status`
const TOKEN_PREVIEW_LEN: usize = 6;

pub async fn run(session: &Session, command: AuthCommand) -> Result<()> {
    match command {
        AuthCommand::Login { email } => login(session, email).await,
        AuthCommand::Logout => {
            let removed = session.store().clear();
            println!(
                "Token cleared ({} line(s) removed from {})",
                removed,
                session.store().path().display()
            );
            Ok(())
        }
        AuthCommand::Status => {
            status(session);
            Ok(())
        }
    }
}

async fn login(session: &Session, email: Option<String>) -> Result<()> {
    let email = match email.filter(|e| !e.trim().is_empty()) {
        Some(email) => email,
        None => match ConsolePrompt.email() {
            Some(email) => email,
            None => bail!("Email is required for authentication"),
        },
    };

    // Login never sends a stale token along
    let mut config = session.config().clone();
    config.token = None;
    let client = DryClient::new(config)?;

    let mut authenticator = Authenticator::new(client, session.store().clone());
    authenticator.authenticate(&email, &ConsolePrompt).await?;

    println!("Logged in as {}", email);
    println!("Token stored in {}", session.store().path().display());
    Ok(())
}

fn status(session: &Session) {
    let explicit = session.config().token.as_deref().filter(|t| !t.is_empty());
    match explicit.map(str::to_string).or_else(|| session.store().get()) {
        Some(token) => println!("Authenticated (token {})", mask_token(&token)),
        None => println!("Not authenticated. Run `dryai auth login`."),
    }
}

/// Show only the start of a token
fn mask_token(token: &str) -> String {
    if token.chars().count() <= TOKEN_PREVIEW_LEN {
        "*".repeat(token.chars().count())
    } else {
        let preview: String = token.chars().take(TOKEN_PREVIEW_LEN).collect();
        format!("{}...", preview)
    }
}
