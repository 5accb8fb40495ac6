//! Post commands.

use super::{confirm, App};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use quill_api::{ListQuery, NewPost, Post, PostUpdate};

fn print_post(post: &Post) {
    output::print_heading(&post.title);
    output::print_row("ID", &post.id);
    output::print_row("Author", &post.author);
    output::print_row("Created", &output::format_date(post.created_at));
    output::print_row("Updated", &output::format_date(post.updated_at));
    if let Some(excerpt) = &post.excerpt {
        output::print_row("Excerpt", excerpt);
    }
    println!("\n{}", post.content);
}

/// List posts, optionally filtered.
pub async fn list(app: &App, query: ListQuery, format: &OutputFormat) -> Result<()> {
    match app.api.list_posts(&query).await {
        Ok(posts) => match format {
            OutputFormat::Text => {
                if posts.is_empty() {
                    println!("No posts found.");
                } else {
                    for post in &posts {
                        println!(
                            "{}  {}  {}  {}",
                            post.id,
                            output::format_date(post.created_at),
                            post.author,
                            post.title
                        );
                    }
                }
            }
            OutputFormat::Json => output::print_json(&posts),
        },
        Err(e) => output::print_error(&e.to_string(), format),
    }
    Ok(())
}

/// Show one post.
pub async fn show(app: &App, id: &str, format: &OutputFormat) -> Result<()> {
    match app.api.get_post(id).await {
        Ok(post) => match format {
            OutputFormat::Text => print_post(&post),
            OutputFormat::Json => output::print_json(&post),
        },
        Err(e) => output::print_error(&e.to_string(), format),
    }
    Ok(())
}

/// Create a post.
pub async fn create(
    app: &App,
    title: String,
    content: String,
    excerpt: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let body = NewPost {
        title,
        content,
        excerpt,
    };
    match app.api.create_post(&body).await {
        Ok(post) => match format {
            OutputFormat::Text => {
                output::print_success(&format!("Post created: {}", post.id), format)
            }
            OutputFormat::Json => output::print_json(&post),
        },
        Err(e) => output::print_error(&e.to_string(), format),
    }
    Ok(())
}

/// Update a post.
pub async fn update(
    app: &App,
    id: &str,
    title: Option<String>,
    content: Option<String>,
    excerpt: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    if title.is_none() && content.is_none() && excerpt.is_none() {
        output::print_error("Nothing to update", format);
        return Ok(());
    }

    let body = PostUpdate {
        title,
        content,
        excerpt,
    };
    match app.api.update_post(id, &body).await {
        Ok(post) => match format {
            OutputFormat::Text => {
                output::print_success(&format!("Post updated: {}", post.id), format)
            }
            OutputFormat::Json => output::print_json(&post),
        },
        Err(e) => output::print_error(&e.to_string(), format),
    }
    Ok(())
}

/// Delete a post.
pub async fn delete(app: &App, id: &str, yes: bool, format: &OutputFormat) -> Result<()> {
    if !yes && !confirm(&format!("Delete post {}?", id)) {
        println!("Aborted.");
        return Ok(());
    }

    match app.api.delete_post(id).await {
        Ok(_) => output::print_success("Post deleted", format),
        Err(e) => output::print_error(&e.to_string(), format),
    }
    Ok(())
}

/// Print a shareable link for a post.
pub async fn share(app: &App, id: &str, format: &OutputFormat) -> Result<()> {
    let link = format!("{}/posts/{}", app.config.web_url.trim_end_matches('/'), id);
    match format {
        OutputFormat::Text => println!("{}", link),
        OutputFormat::Json => output::print_json(&serde_json::json!({ "url": link })),
    }
    Ok(())
}
