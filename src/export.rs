//! Markdown export of the canvas
//!
//! Three projections, each a pure function of its inputs:
//! - full: concept, attached document, non-empty blocks, AI summary
//! - items only: non-empty blocks
//! - selections only: picked suggestions grouped by block
//!
//! `read_sections` parses an export back into headings and bullets.

use crate::canvas::CanvasSnapshot;
use crate::ingest::UploadedDocument;
use crate::selection::SelectionSet;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

pub const FULL_EXPORT_FILE_NAME: &str = "uzleti_modell.md";
pub const ITEMS_EXPORT_FILE_NAME: &str = "uzleti_modell_elemek.md";
pub const SELECTIONS_EXPORT_FILE_NAME: &str = "kivalasztott_otletek.md";
pub const EXPORT_MIME_TYPE: &str = "text/markdown";
pub const EXPORT_CHARSET: &str = "utf-8";

pub const CONCEPT_HEADING: &str = "Üzleti Koncepció";
pub const CONCEPT_PLACEHOLDER: &str = "Nincs megadva.";
pub const SUMMARY_HEADING: &str = "MI-generált Összefoglaló";

/// Which view of the canvas to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Projection {
    Full,
    ItemsOnly,
    SelectionsOnly,
}

impl Projection {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Full => FULL_EXPORT_FILE_NAME,
            Self::ItemsOnly => ITEMS_EXPORT_FILE_NAME,
            Self::SelectionsOnly => SELECTIONS_EXPORT_FILE_NAME,
        }
    }

    fn header(&self) -> &'static str {
        match self {
            Self::Full => "# Üzleti Modell Vászon\n\n",
            Self::ItemsOnly => "# Üzleti Modell Vászon - Elemek\n\n",
            Self::SelectionsOnly => "# MI-generált ötletek\n\n",
        }
    }
}

/// A rendered export, ready to hand to a download mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub projection: Projection,
    pub file_name: &'static str,
    pub mime_type: &'static str,
    pub charset: &'static str,
    pub content: String,
}

impl ExportArtifact {
    pub fn new(projection: Projection, content: String) -> Self {
        Self {
            projection,
            file_name: projection.file_name(),
            mime_type: EXPORT_MIME_TYPE,
            charset: EXPORT_CHARSET,
            content,
        }
    }

    /// Write the artifact under its fixed file name.
    pub fn write_to_dir(&self, dir: &Path) -> std::io::Result<PathBuf> {
        let path = dir.join(self.file_name);
        std::fs::write(&path, self.content.as_bytes())?;
        Ok(path)
    }
}

/// Inputs of the full projection.
#[derive(Debug, Clone, Copy)]
pub struct FullExport<'a> {
    pub concept: &'a str,
    pub document: Option<&'a UploadedDocument>,
    pub canvas: &'a CanvasSnapshot,
    pub summary: Option<&'a str>,
}

pub fn render_full(input: &FullExport<'_>) -> String {
    let mut out = String::from(Projection::Full.header());
    let _ = write!(out, "## {}\n\n", CONCEPT_HEADING);
    let concept = if input.concept.trim().is_empty() {
        CONCEPT_PLACEHOLDER
    } else {
        input.concept
    };
    let _ = write!(out, "{}\n\n", concept);

    if let Some(doc) = input.document {
        let _ = write!(out, "### Csatolt dokumentum: {}\n\n", doc.name);
        let _ = write!(out, "```\n{}\n```\n\n", doc.content);
    }

    write_blocks(&mut out, input.canvas);

    if let Some(summary) = input.summary.filter(|s| !s.is_empty()) {
        let _ = write!(out, "## {}\n\n{}\n", SUMMARY_HEADING, summary);
    }
    out
}

pub fn render_items(canvas: &CanvasSnapshot) -> String {
    let mut out = String::from(Projection::ItemsOnly.header());
    write_blocks(&mut out, canvas);
    out
}

pub fn render_selections(selections: &SelectionSet) -> String {
    let mut out = String::from(Projection::SelectionsOnly.header());
    for (title, suggestions) in selections.group_by_block() {
        write_section(&mut out, &title, suggestions.iter().map(String::as_str));
    }
    out
}

fn write_blocks(out: &mut String, canvas: &CanvasSnapshot) {
    for block in canvas.non_empty_blocks() {
        write_section(out, &block.title, block.items.iter().map(|i| i.text.as_str()));
    }
}

fn write_section<'a>(out: &mut String, title: &str, bullets: impl Iterator<Item = &'a str>) {
    let _ = write!(out, "## {}\n\n", title);
    for bullet in bullets {
        let _ = writeln!(out, "- {}", bullet);
    }
    out.push('\n');
}

/// A level-2 section read back from an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSection {
    pub title: String,
    pub bullets: Vec<String>,
}

/// Parse `## Title` sections and their top-level bullets.
///
/// Titles and bullet text are taken verbatim from the source, so inline
/// markup survives. Content inside fenced code blocks is ignored.
pub fn read_sections(markdown: &str) -> Vec<ExportSection> {
    let mut sections: Vec<ExportSection> = Vec::new();
    let mut list_depth = 0usize;

    for (event, range) in Parser::new(markdown).into_offset_iter() {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H2,
                ..
            }) => sections.push(ExportSection {
                title: heading_text(&markdown[range]),
                bullets: Vec::new(),
            }),
            Event::Start(Tag::List(_)) => list_depth += 1,
            Event::End(TagEnd::List(_)) => list_depth = list_depth.saturating_sub(1),
            Event::Start(Tag::Item) if list_depth == 1 => {
                if let Some(section) = sections.last_mut() {
                    section.bullets.push(bullet_text(&markdown[range]));
                }
            }
            // An item made of dashes and spaces ("- --") parses as a rule.
            Event::Rule if list_depth == 0 && markdown[range.clone()].starts_with("- ") => {
                if let Some(section) = sections.last_mut() {
                    section.bullets.push(bullet_text(&markdown[range]));
                }
            }
            _ => {}
        }
    }
    sections
}

/// Strip the ATX marker from a level-2 heading's source slice.
fn heading_text(source: &str) -> String {
    let trimmed = source.trim();
    trimmed
        .strip_prefix("##")
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

/// Strip the list marker from an item's source slice.
fn bullet_text(source: &str) -> String {
    let trimmed = source.trim_end_matches(['\n', '\r']);
    trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
        .unwrap_or(trimmed)
        .to_string()
}
