//! JSON layout: one pretty printed document for the whole listing.
//!
//! ```json
//! { "entries": [ { "name": "Cargo.toml", "type": "file", "size": 1024, ... } ], "errors": [],
//!   "total": 1024, "statistic": { "files": 1, "dirs": 0, "links": 0 } }
//! ```

use crate::core::formatter::{format_attributes, format_rfc3339};
use crate::core::{Entry, EntryKind, GitStatus, RepoHead, Section, Statistics, Summary};
use crate::layout::{Layout, Listing, RenderContext};

use serde::{Deserialize, Serialize};

use std::io::{self, Write};

/// One entry as written to JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub size: u64,
    pub inode: u64,
    pub mode: u32,
    pub permissions: String,
    pub owner: Option<String>,
    pub group: Option<String>,
    pub uid: u32,
    pub gid: u32,
    pub modified: Option<String>,
    pub accessed: Option<String>,
    pub changed: Option<String>,
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub link_target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub link_broken: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mime: Option<String>,
    pub git: GitStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub repo: Option<RepoHead>,
    pub depth: usize,
}

impl From<&Entry> for JsonEntry {
    fn from(entry: &Entry) -> Self {
        JsonEntry {
            name: entry.name().to_string(),
            path: entry.path().to_string_lossy().into_owned(),
            kind: entry.kind(),
            size: entry.size(),
            inode: entry.inode(),
            mode: entry.mode(),
            permissions: format_attributes(entry),
            owner: entry.owner().map(str::to_string),
            group: entry.group().map(str::to_string),
            uid: entry.uid(),
            gid: entry.gid(),
            modified: format_rfc3339(entry.modified()),
            accessed: format_rfc3339(entry.accessed()),
            changed: format_rfc3339(entry.changed()),
            created: format_rfc3339(entry.created()),
            link_target: entry
                .link()
                .map(|l| l.target().to_string_lossy().into_owned()),
            link_broken: entry.link().map(|l| l.is_broken()),
            mime: entry.mime().map(str::to_string),
            git: entry.git(),
            repo: entry.repo().cloned(),
            depth: entry.depth(),
        }
    }
}

/// The whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonListing {
    pub entries: Vec<JsonEntry>,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub statistic: Option<Statistics>,
    /// Milliseconds the pass took.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub underwent: Option<u64>,
}

impl JsonListing {
    pub fn from_listing(listing: &Listing) -> Self {
        JsonListing {
            entries: listing
                .sections
                .iter()
                .flat_map(Section::entries)
                .map(JsonEntry::from)
                .collect(),
            errors: listing.errors.clone(),
            total: listing.summary.total_size,
            statistic: listing.summary.statistic,
            underwent: listing
                .summary
                .elapsed
                .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLayout;

impl Layout for JsonLayout {
    fn render(&self, listing: &Listing, _ctx: &RenderContext, out: &mut dyn Write) -> io::Result<()> {
        let doc = JsonListing::from_listing(listing);
        serde_json::to_writer_pretty(&mut *out, &doc).map_err(io::Error::other)?;
        writeln!(out)
    }

    /// The summary is part of the document.
    fn render_summary(&self, _: &Summary, _: &RenderContext, _: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;

    #[test]
    fn output_parses_back() -> Result<(), Box<dyn std::error::Error>> {
        let theme = Theme::default();
        let ctx = RenderContext::new(&theme, 80);
        let listing = Listing {
            sections: vec![Section::new(
                None,
                vec![
                    Entry::new("a.txt", EntryKind::File, 12),
                    Entry::new("sub", EntryKind::Directory, 0).with_git(GitStatus::Modified),
                ],
            )],
            errors: vec!["cannot access 'x'".into()],
            summary: Summary {
                total_size: Some(12),
                ..Summary::default()
            },
        };
        let mut out = Vec::new();
        JsonLayout.render(&listing, &ctx, &mut out)?;

        let parsed: JsonListing = serde_json::from_slice(&out)?;
        assert_eq!(parsed, JsonListing::from_listing(&listing));
        assert_eq!(parsed.entries[1].kind, EntryKind::Directory);
        assert_eq!(parsed.entries[1].git, GitStatus::Modified);
        assert_eq!(parsed.errors.len(), 1);

        let raw: serde_json::Value = serde_json::from_slice(&out)?;
        assert_eq!(raw["entries"][0]["type"], "file");
        assert_eq!(raw["total"], 12);
        assert!(raw.get("statistic").is_none());
        Ok(())
    }
}
