//! User commands.

use super::{confirm, App};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use quill_api::{ListQuery, User, UserUpdate};

fn print_user(user: &User) {
    output::print_row("ID", &user.id);
    output::print_row("Name", &user.name);
    output::print_row("Email", &user.email);
    if let Some(bio) = &user.bio {
        output::print_row("Bio", bio);
    }
    output::print_row("Joined", &output::format_date(user.created_at));
}

/// List users.
pub async fn list(app: &App, query: ListQuery, format: &OutputFormat) -> Result<()> {
    match app.api.list_users(&query).await {
        Ok(users) => match format {
            OutputFormat::Text => {
                if users.is_empty() {
                    println!("No users found.");
                } else {
                    for user in &users {
                        println!("{}  {}  {}", user.id, user.name, user.email);
                    }
                }
            }
            OutputFormat::Json => output::print_json(&users),
        },
        Err(e) => output::print_error(&e.to_string(), format),
    }
    Ok(())
}

/// Show one user.
pub async fn show(app: &App, id: &str, format: &OutputFormat) -> Result<()> {
    match app.api.get_user(id).await {
        Ok(user) => match format {
            OutputFormat::Text => print_user(&user),
            OutputFormat::Json => output::print_json(&user),
        },
        Err(e) => output::print_error(&e.to_string(), format),
    }
    Ok(())
}

/// Show a user's stats.
pub async fn stats(app: &App, id: &str, format: &OutputFormat) -> Result<()> {
    match app.api.user_stats(id).await {
        Ok(stats) => match format {
            OutputFormat::Text => {
                output::print_row("Posts", &stats.posts.to_string());
                output::print_row("Drafts", &stats.drafts.to_string());
                output::print_row("Views", &stats.views.to_string());
            }
            OutputFormat::Json => output::print_json(&stats),
        },
        Err(e) => output::print_error(&e.to_string(), format),
    }
    Ok(())
}

/// Update a user profile.
pub async fn update(
    app: &App,
    id: &str,
    name: Option<String>,
    email: Option<String>,
    bio: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    if name.is_none() && email.is_none() && bio.is_none() {
        output::print_error("Nothing to update", format);
        return Ok(());
    }

    let body = UserUpdate { name, email, bio };
    match app.api.update_user(id, &body).await {
        Ok(user) => match format {
            OutputFormat::Text => {
                output::print_success(&format!("User updated: {}", user.id), format)
            }
            OutputFormat::Json => output::print_json(&user),
        },
        Err(e) => output::print_error(&e.to_string(), format),
    }
    Ok(())
}

/// Delete a user account.
pub async fn delete(app: &App, id: &str, yes: bool, format: &OutputFormat) -> Result<()> {
    if !yes && !confirm(&format!("Delete user {}?", id)) {
        println!("Aborted.");
        return Ok(());
    }

    match app.api.delete_user(id).await {
        Ok(_) => output::print_success("User deleted", format),
        Err(e) => output::print_error(&e.to_string(), format),
    }
    Ok(())
}
