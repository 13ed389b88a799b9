//! Command handlers and terminal rendering.
//!
//! Every command re-reads storage, so each invocation renders the current
//! state without any cached view.

use crate::cli::{EditArgs, IdArgs, ListArgs, NewArgs};
use anyhow::{bail, Result};
use chrono::{DateTime, Local, Utc};
use notekeep_core::{
    Clock, Note, NoteEdit, NoteListProjection, NoteRepository, NoteService, OwnedNoteSection,
    LIST_PREVIEW_LINES,
};
use std::io::Write;

pub fn run_new<R: NoteRepository, C: Clock>(
    service: &NoteService<R, C>,
    args: NewArgs,
    out: &mut impl Write,
) -> Result<()> {
    let mut note = service.create_note()?;
    let edit = NoteEdit {
        title: args.title,
        content: args.content,
    };
    if !edit.is_empty() {
        note = service.edit_note(note.id, edit)?;
    }
    writeln!(out, "Created {}  {}", note.short_id(), note.display_title())?;
    Ok(())
}

pub fn run_list<R: NoteRepository, C: Clock>(
    service: &NoteService<R, C>,
    projection: &NoteListProjection,
    args: &ListArgs,
    out: &mut impl Write,
) -> Result<()> {
    let sections = service.sections(&args.search, projection)?;
    if args.json {
        serde_json::to_writer_pretty(&mut *out, &sections)?;
        writeln!(out)?;
        return Ok(());
    }
    render_sections(out, &sections, &args.search)?;
    Ok(())
}

pub fn run_show<R: NoteRepository, C: Clock>(
    service: &NoteService<R, C>,
    args: &IdArgs,
    out: &mut impl Write,
) -> Result<()> {
    let id = service.resolve_id(&args.id)?;
    match service.get_note(id)? {
        Some(note) => render_note(out, &note)?,
        None => bail!("note {} disappeared while reading", args.id),
    }
    Ok(())
}

pub fn run_edit<R: NoteRepository, C: Clock>(
    service: &NoteService<R, C>,
    args: EditArgs,
    out: &mut impl Write,
) -> Result<()> {
    let edit = NoteEdit {
        title: args.title,
        content: args.content,
    };
    if edit.is_empty() {
        bail!("nothing to edit; pass --title and/or --content");
    }
    let id = service.resolve_id(&args.id)?;
    let before = service.get_note(id)?;
    let after = service.edit_note(id, edit)?;
    if before.as_ref() == Some(&after) {
        writeln!(out, "No changes to {}", after.short_id())?;
    } else {
        writeln!(out, "Saved {}  {}", after.short_id(), after.display_title())?;
    }
    Ok(())
}

pub fn run_delete<R: NoteRepository, C: Clock>(
    service: &NoteService<R, C>,
    args: &IdArgs,
    out: &mut impl Write,
) -> Result<()> {
    let id = service.resolve_id(&args.id)?;
    let short = id.simple().to_string()[..8].to_string();
    if service.delete_note(id)? {
        writeln!(out, "Deleted {short}")?;
    } else {
        writeln!(out, "Nothing to delete for {short}")?;
    }
    Ok(())
}

/// Writes labeled sections; each row carries short id, title and preview.
pub fn render_sections(
    out: &mut impl Write,
    sections: &[OwnedNoteSection],
    query: &str,
) -> std::io::Result<()> {
    if sections.is_empty() {
        if query.is_empty() {
            writeln!(out, "No notes yet.")?;
        } else {
            writeln!(out, "No notes match \"{query}\".")?;
        }
        return Ok(());
    }

    for (index, section) in sections.iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        writeln!(out, "{}", section.label)?;
        for note in &section.notes {
            writeln!(out, "  {}  {}", note.short_id(), note.display_title())?;
            if let Some(preview) = note.preview(LIST_PREVIEW_LINES) {
                for line in preview.lines() {
                    writeln!(out, "            {line}")?;
                }
            }
        }
    }
    Ok(())
}

/// Writes the detail view of one note.
pub fn render_note(out: &mut impl Write, note: &Note) -> std::io::Result<()> {
    writeln!(out, "{}", note.display_title())?;
    writeln!(out, "id:       {}", note.id)?;
    writeln!(out, "created:  {}", format_timestamp(&note.creation_date))?;
    writeln!(out, "modified: {}", format_timestamp(&note.modification_date))?;
    if !note.content.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", note.content)?;
    }
    Ok(())
}

fn format_timestamp(value: &DateTime<Utc>) -> String {
    value
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}
