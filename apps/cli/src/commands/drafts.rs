//! Draft commands.

use super::{confirm, App};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use quill_api::{Draft, DraftUpdate, ListQuery, NewDraft};

fn print_draft(draft: &Draft) {
    output::print_heading(&draft.title);
    output::print_row("ID", &draft.id);
    output::print_row("Created", &output::format_date(draft.created_at));
    output::print_row("Updated", &output::format_date(draft.updated_at));
    if let Some(excerpt) = &draft.excerpt {
        output::print_row("Excerpt", excerpt);
    }
    println!("\n{}", draft.content);
}

/// List drafts.
pub async fn list(app: &App, query: ListQuery, format: &OutputFormat) -> Result<()> {
    match app.api.list_drafts(&query).await {
        Ok(drafts) => match format {
            OutputFormat::Text => {
                if drafts.is_empty() {
                    println!("No drafts found.");
                } else {
                    for draft in &drafts {
                        println!(
                            "{}  {}  {}",
                            draft.id,
                            output::format_date(draft.updated_at),
                            draft.title
                        );
                    }
                }
            }
            OutputFormat::Json => output::print_json(&drafts),
        },
        Err(e) => output::print_error(&e.to_string(), format),
    }
    Ok(())
}

/// Show one draft.
pub async fn show(app: &App, id: &str, format: &OutputFormat) -> Result<()> {
    match app.api.get_draft(id).await {
        Ok(draft) => match format {
            OutputFormat::Text => print_draft(&draft),
            OutputFormat::Json => output::print_json(&draft),
        },
        Err(e) => output::print_error(&e.to_string(), format),
    }
    Ok(())
}

/// Create a draft.
pub async fn create(
    app: &App,
    title: String,
    content: String,
    excerpt: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let body = NewDraft {
        title,
        content,
        excerpt,
    };
    match app.api.create_draft(&body).await {
        Ok(draft) => match format {
            OutputFormat::Text => {
                output::print_success(&format!("Draft created: {}", draft.id), format)
            }
            OutputFormat::Json => output::print_json(&draft),
        },
        Err(e) => output::print_error(&e.to_string(), format),
    }
    Ok(())
}

/// Update a draft.
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

    let body = DraftUpdate {
        title,
        content,
        excerpt,
    };
    match app.api.update_draft(id, &body).await {
        Ok(draft) => match format {
            OutputFormat::Text => {
                output::print_success(&format!("Draft updated: {}", draft.id), format)
            }
            OutputFormat::Json => output::print_json(&draft),
        },
        Err(e) => output::print_error(&e.to_string(), format),
    }
    Ok(())
}

/// Delete a draft.
pub async fn delete(app: &App, id: &str, yes: bool, format: &OutputFormat) -> Result<()> {
    if !yes && !confirm(&format!("Delete draft {}?", id)) {
        println!("Aborted.");
        return Ok(());
    }

    match app.api.delete_draft(id).await {
        Ok(_) => output::print_success("Draft deleted", format),
        Err(e) => output::print_error(&e.to_string(), format),
    }
    Ok(())
}

/// Publish a draft as a post.
pub async fn publish(app: &App, id: &str, format: &OutputFormat) -> Result<()> {
    match app.api.publish_draft(id).await {
        Ok(post) => match format {
            OutputFormat::Text => {
                output::print_success(&format!("Draft published as post {}", post.id), format)
            }
            OutputFormat::Json => output::print_json(&post),
        },
        Err(e) => output::print_error(&e.to_string(), format),
    }
    Ok(())
}
