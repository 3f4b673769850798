//! Project tickets
//!
//! Tickets are Markdown files with a small front matter block, filed by
//! status. Moving a ticket moves its file.
//!
//! ```text
//! .modepack/tickets/
//! ├── pending/003-add-dark-mode.md
//! ├── in-progress/002-fix-login-redirect.md
//! └── done/001-set-up-ci.md
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::component::frontmatter::split_front_matter;
use crate::error::{ModepackError, Result};
use crate::fuzzy::{Candidate, FuzzyMatcher, Scope};
use crate::store::Filesystem;

const MAX_SLUG_LEN: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TicketStatus {
    Pending,
    InProgress,
    Done,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 3] = [
        TicketStatus::Pending,
        TicketStatus::InProgress,
        TicketStatus::Done,
    ];

    pub fn dir_name(self) -> &'static str {
        match self {
            TicketStatus::Pending => "pending",
            TicketStatus::InProgress => "in-progress",
            TicketStatus::Done => "done",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for TicketStatus {
    type Err = ModepackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "pending" | "todo" => Ok(TicketStatus::Pending),
            "in-progress" | "inprogress" | "doing" => Ok(TicketStatus::InProgress),
            "done" => Ok(TicketStatus::Done),
            other => Err(ModepackError::validation(
                "ticket status",
                format!("unknown status '{other}' (expected pending, in-progress or done)"),
            )),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TicketFront {
    title: String,
    status: TicketStatus,
    created: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    /// `<sequence>-<slug>`, also the file stem
    pub id: String,
    pub title: String,
    pub status: TicketStatus,
    pub created: DateTime<Utc>,
    pub body: String,
}

impl Ticket {
    /// Sequence number from the id prefix
    pub fn sequence(&self) -> Option<u32> {
        sequence_of(&self.id)
    }

    fn render(&self) -> Result<String> {
        let front = serde_yaml::to_string(&TicketFront {
            title: self.title.clone(),
            status: self.status,
            created: self.created,
        })?;
        Ok(format!("---\n{front}---\n\n{}\n", self.body.trim_end()))
    }
}

fn sequence_of(id: &str) -> Option<u32> {
    id.split('-').next().and_then(|n| n.parse().ok())
}

/// Lowercase, dash-separated slug of a title
pub fn slugify(title: &str) -> String {
    let mut slug = String::new();
    for c in title.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let mut slug: String = slug.chars().take(MAX_SLUG_LEN).collect();
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        "ticket".to_string()
    } else {
        slug
    }
}

/// Tickets under `.modepack/tickets/`
#[derive(Debug, Clone)]
pub struct TicketStore {
    dir: PathBuf,
    fs: Arc<dyn Filesystem>,
}

impl TicketStore {
    pub fn new(dir: impl Into<PathBuf>, fs: Arc<dyn Filesystem>) -> Self {
        Self {
            dir: dir.into(),
            fs,
        }
    }

    fn path_for(&self, status: TicketStatus, id: &str) -> PathBuf {
        self.dir.join(status.dir_name()).join(format!("{id}.md"))
    }

    fn parse(&self, id: &str, path: &Path) -> Result<Ticket> {
        let content = self.fs.read_to_string(path)?;
        let invalid = |reason: String| ModepackError::InvalidFrontMatter {
            path: path.display().to_string(),
            reason,
        };
        let (front, body) =
            split_front_matter(&content).ok_or_else(|| invalid("missing front matter block".to_string()))?;
        let front: TicketFront =
            serde_yaml::from_str(&front).map_err(|e| invalid(e.to_string()))?;
        Ok(Ticket {
            id: id.to_string(),
            title: front.title,
            status: front.status,
            created: front.created,
            body: body.trim().to_string(),
        })
    }

    /// Every readable ticket, optionally of one status, ordered by id.
    ///
    /// The directory a ticket sits in is its status.
    pub fn list(&self, status: Option<TicketStatus>) -> Vec<Ticket> {
        let mut tickets = Vec::new();
        for dir_status in TicketStatus::ALL {
            if status.is_some_and(|s| s != dir_status) {
                continue;
            }
            let dir = self.dir.join(dir_status.dir_name());
            let entries = match self.fs.list_dir(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("Cannot list {}: {}", dir.display(), e);
                    continue;
                }
            };
            for path in entries
                .iter()
                .filter(|p| p.extension().is_some_and(|ext| ext == "md"))
            {
                let Some(id) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
                    continue;
                };
                match self.parse(&id, path) {
                    Ok(mut ticket) => {
                        ticket.status = dir_status;
                        tickets.push(ticket);
                    }
                    Err(e) => tracing::warn!("Skipping ticket {}: {}", path.display(), e),
                }
            }
        }
        tickets.sort_by(|a, b| a.sequence().cmp(&b.sequence()).then_with(|| a.id.cmp(&b.id)));
        tickets
    }

    fn next_sequence(&self) -> u32 {
        self.list(None)
            .iter()
            .filter_map(Ticket::sequence)
            .max()
            .unwrap_or(0)
            + 1
    }

    pub fn create(&self, title: &str, body: &str) -> Result<Ticket> {
        if title.trim().is_empty() {
            return Err(ModepackError::validation("ticket", "title must not be empty"));
        }
        let ticket = Ticket {
            id: format!("{:03}-{}", self.next_sequence(), slugify(title)),
            title: title.trim().to_string(),
            status: TicketStatus::Pending,
            created: Utc::now(),
            body: body.to_string(),
        };
        self.fs
            .write(&self.path_for(ticket.status, &ticket.id), ticket.render()?.as_bytes())?;
        tracing::debug!("Created ticket {}", ticket.id);
        Ok(ticket)
    }

    /// Find a ticket by id, sequence number or fuzzy name
    pub fn find(&self, query: &str) -> Result<Ticket> {
        let tickets = self.list(None);
        let not_found = || ModepackError::TicketNotFound {
            id: query.to_string(),
        };

        if let Some(ticket) = tickets.iter().find(|t| t.id == query) {
            return Ok(ticket.clone());
        }
        if let Ok(sequence) = query.parse::<u32>() {
            return tickets
                .into_iter()
                .find(|t| t.sequence() == Some(sequence))
                .ok_or_else(not_found);
        }

        let matcher = FuzzyMatcher::new(
            tickets
                .iter()
                .map(|t| Candidate::new(t.id.clone(), Scope::Project))
                .collect(),
        );
        let chosen = matcher.resolve(query).into_match(query, |_| not_found())?;
        tickets
            .into_iter()
            .find(|t| t.id == chosen.name)
            .ok_or_else(not_found)
    }

    pub fn move_to(&self, query: &str, status: TicketStatus) -> Result<Ticket> {
        let mut ticket = self.find(query)?;
        if ticket.status == status {
            return Ok(ticket);
        }
        let from = self.path_for(ticket.status, &ticket.id);
        ticket.status = status;
        let to = self.path_for(status, &ticket.id);
        self.fs.write(&to, ticket.render()?.as_bytes())?;
        self.fs.remove_file(&from)?;
        tracing::debug!("Moved ticket {} to {}", ticket.id, status);
        Ok(ticket)
    }

    pub fn delete(&self, query: &str) -> Result<Ticket> {
        let ticket = self.find(query)?;
        self.fs.remove_file(&self.path_for(ticket.status, &ticket.id))?;
        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::OsFilesystem;
    use crate::test_fixtures::create_temp_dir;

    fn store(dir: &Path) -> TicketStore {
        TicketStore::new(dir, Arc::new(OsFilesystem))
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Fix login redirect!"), "fix-login-redirect");
        assert_eq!(slugify("  --Hello,   World--  "), "hello-world");
        assert_eq!(slugify("!!!"), "ticket");
    }

    #[test]
    fn test_create_assigns_sequence() {
        let temp = create_temp_dir();
        let store = store(temp.path());
        let first = store.create("Set up CI", "").unwrap();
        let second = store.create("Fix login redirect", "Steps to reproduce").unwrap();

        assert_eq!(first.id, "001-set-up-ci");
        assert_eq!(second.id, "002-fix-login-redirect");
        assert!(temp.path().join("pending/002-fix-login-redirect.md").is_file());
    }

    #[test]
    fn test_list_and_filter() {
        let temp = create_temp_dir();
        let store = store(temp.path());
        store.create("One", "").unwrap();
        store.create("Two", "").unwrap();
        store.move_to("002-two", TicketStatus::Done).unwrap();

        assert_eq!(store.list(None).len(), 2);
        let done = store.list(Some(TicketStatus::Done));
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].title, "Two");
        assert!(!temp.path().join("pending/002-two.md").exists());
    }

    #[test]
    fn test_find_by_sequence_and_fuzzy() {
        let temp = create_temp_dir();
        let store = store(temp.path());
        store.create("Add dark mode", "").unwrap();
        store.create("Fix login redirect", "").unwrap();

        assert_eq!(store.find("2").unwrap().title, "Fix login redirect");
        assert_eq!(store.find("login").unwrap().id, "002-fix-login-redirect");
        assert!(matches!(
            store.find("zzz").unwrap_err(),
            ModepackError::TicketNotFound { .. }
        ));
    }

    #[test]
    fn test_move_keeps_body() {
        let temp = create_temp_dir();
        let store = store(temp.path());
        store.create("Write docs", "Cover the install flow").unwrap();
        let moved = store.move_to("docs", TicketStatus::InProgress).unwrap();

        assert_eq!(moved.status, TicketStatus::InProgress);
        let reread = store.find(&moved.id).unwrap();
        assert_eq!(reread.body, "Cover the install flow");
        assert_eq!(reread.status, TicketStatus::InProgress);
    }

    #[test]
    fn test_delete() {
        let temp = create_temp_dir();
        let store = store(temp.path());
        store.create("Temporary", "").unwrap();
        store.delete("1").unwrap();
        assert!(store.list(None).is_empty());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(
            "in_progress".parse::<TicketStatus>().unwrap(),
            TicketStatus::InProgress
        );
        assert!("blocked".parse::<TicketStatus>().is_err());
    }
}
