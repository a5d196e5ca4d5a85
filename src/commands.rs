//! Command table mapping command ids to toggle handlers.
//!
//! The table is built once from the built-in markers, the quick-mark
//! command and the well-formed custom tags in [`Settings`]. Dispatching a
//! command is the error boundary: failures become a [`Notice`] and the
//! buffer is left as it was.

use std::fmt;

use crate::config::{Settings, group_tags_by_category};
use crate::editor::EditorAccess;
use crate::markers::MarkerType;
use crate::toggle::{EditResult, MarkerPair, ToggleError, toggle_in_editor};

/// Id of the command that uses the configured default marker.
pub const QUICK_MARK_ID: &str = "quick-mark";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A transient, user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        write!(f, "[{label}] {}", self.message)
    }
}

/// Handler invoked for a command with the editor and the command's markers.
pub type Handler = fn(&mut dyn EditorAccess, &MarkerPair) -> Result<EditResult, ToggleError>;

/// A registered command.
#[derive(Debug, Clone)]
pub struct Command {
    pub id: String,
    pub name: String,
    pub marker: MarkerPair,
    handler: Handler,
}

/// Result of dispatching a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied(EditResult),
    Failed(Notice),
    Unknown,
}

#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    commands: Vec<Command>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the full table: quick mark, built-in markers, then custom tags.
    ///
    /// Malformed custom tags are skipped with a warning.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut table = Self::new();

        table.register(
            QUICK_MARK_ID,
            "Quick mark with default style",
            settings.default_marker.marker_pair(),
        );

        for marker in MarkerType::ALL {
            table.register(
                format!("mark-{}", marker.key()),
                format!("{} text", marker.display_name()),
                marker.marker_pair(),
            );
        }

        for (category, tags) in group_tags_by_category(&settings.custom_tags) {
            for (index, (_, spec)) in tags.into_iter().enumerate() {
                let Some(marker) = spec.marker_pair() else {
                    tracing::warn!(tag = %spec.tag, %category, "skipping invalid custom tag");
                    continue;
                };
                table.register(
                    format!("mark-custom-{}-{index}", slugify(category)),
                    format!("{category}: {marker}"),
                    marker,
                );
            }
        }

        tracing::debug!(count = table.len(), "built command table");
        table
    }

    /// Register a toggle command. Returns false if `id` is already taken.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        marker: MarkerPair,
    ) -> bool {
        let id = id.into();
        if self.get(&id).is_some() {
            tracing::warn!(%id, "duplicate command id, skipping");
            return false;
        }
        self.commands.push(Command {
            id,
            name: name.into(),
            marker,
            handler: toggle_in_editor,
        });
        true
    }

    pub fn get(&self, id: &str) -> Option<&Command> {
        self.commands.iter().find(|command| command.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Run the command `id` against `editor`.
    ///
    /// Errors are logged and turned into an error notice; the editor is not
    /// modified in that case.
    pub fn dispatch(&self, id: &str, editor: &mut dyn EditorAccess) -> CommandOutcome {
        let Some(command) = self.get(id) else {
            tracing::warn!(%id, "unknown command");
            return CommandOutcome::Unknown;
        };
        match (command.handler)(editor, &command.marker) {
            Ok(result) => CommandOutcome::Applied(result),
            Err(err) => {
                tracing::error!(
                    id = %command.id,
                    marker = %command.marker,
                    error = %err,
                    "toggle failed"
                );
                CommandOutcome::Failed(Notice::error(format!("{}: {err}", command.name)))
            }
        }
    }
}

/// Lowercase `name`, collapsing every run of non-alphanumerics into `-`.
fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CustomTagSpec;
    use crate::editor::{Cursor, EditorBuffer};

    fn settings_with_tags(tags: Vec<CustomTagSpec>) -> Settings {
        Settings {
            custom_tags: tags,
            ..Settings::default()
        }
    }

    #[test]
    fn test_builtin_commands_registered_in_order() {
        let table = CommandTable::from_settings(&Settings::default());
        let ids: Vec<&str> = table.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "quick-mark",
                "mark-highlight",
                "mark-bold",
                "mark-italic",
                "mark-strikethrough",
                "mark-code",
            ]
        );
        assert_eq!(table.get("mark-code").unwrap().name, "Inline Code text");
    }

    #[test]
    fn test_quick_mark_follows_default_marker() {
        let settings = Settings {
            default_marker: MarkerType::Strikethrough,
            ..Settings::default()
        };
        let table = CommandTable::from_settings(&settings);
        assert_eq!(
            table.get(QUICK_MARK_ID).unwrap().marker,
            MarkerPair::new("~~", "~~")
        );
    }

    #[test]
    fn test_custom_tags_registered_per_category() {
        let settings = settings_with_tags(vec![
            CustomTagSpec::new("<<|>>", "My Tags"),
            CustomTagSpec::new("%%|%%", ""),
            CustomTagSpec::new("[[|]]", "My Tags"),
        ]);
        let table = CommandTable::from_settings(&settings);

        let first = table.get("mark-custom-my-tags-0").unwrap();
        assert_eq!(first.name, "My Tags: <<...>>");
        assert_eq!(first.marker, MarkerPair::new("<<", ">>"));

        let second = table.get("mark-custom-my-tags-1").unwrap();
        assert_eq!(second.name, "My Tags: [[...]]");

        let uncategorized = table.get("mark-custom-uncategorized-0").unwrap();
        assert_eq!(uncategorized.name, "Uncategorized: %%...%%");
    }

    #[test]
    fn test_malformed_custom_tag_is_skipped() {
        let settings = settings_with_tags(vec![
            CustomTagSpec::new("nodelimiter", "Bad"),
            CustomTagSpec::new("<<|>>", "Bad"),
        ]);
        let table = CommandTable::from_settings(&settings);
        assert_eq!(table.len(), 7);
        assert!(table.get("mark-custom-bad-0").is_none());
        assert_eq!(
            table.get("mark-custom-bad-1").unwrap().marker,
            MarkerPair::new("<<", ">>")
        );
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let mut table = CommandTable::new();
        assert!(table.register("x", "X", MarkerPair::new("=", "=")));
        assert!(!table.register("x", "Other", MarkerPair::new("*", "*")));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("x").unwrap().name, "X");
    }

    #[test]
    fn test_dispatch_applies_toggle() {
        let table = CommandTable::from_settings(&Settings::default());
        let mut buf = EditorBuffer::from_text("hello");
        buf.move_to(0, 1);

        let outcome = table.dispatch("mark-bold", &mut buf);
        assert!(matches!(outcome, CommandOutcome::Applied(_)));
        assert_eq!(buf.text(), "**hello**");
        assert_eq!(buf.cursor(), Cursor::at(0, 3));
    }

    #[test]
    fn test_dispatch_failure_reports_notice_and_keeps_buffer() {
        let mut table = CommandTable::new();
        table.register("broken", "Broken", MarkerPair::new("", "x"));
        let mut buf = EditorBuffer::from_text("hello");

        let CommandOutcome::Failed(notice) = table.dispatch("broken", &mut buf) else {
            panic!("expected a failure notice");
        };
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.message.starts_with("Broken:"));
        assert_eq!(buf.text(), "hello");
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_dispatch_unknown_command() {
        let table = CommandTable::new();
        let mut buf = EditorBuffer::from_text("hello");
        assert_eq!(table.dispatch("nope", &mut buf), CommandOutcome::Unknown);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("My Tags"), "my-tags");
        assert_eq!(slugify("  a / b  "), "a-b");
        assert_eq!(slugify("Uncategorized"), "uncategorized");
    }

    #[test]
    fn test_notice_display() {
        assert_eq!(Notice::warning("careful").to_string(), "[warning] careful");
    }
}
