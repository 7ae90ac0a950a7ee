//! Command Generator
//!
//! Merges per-module command suggestions into the five fixed buckets
//! (`dev, build, test, lint, install`). Contributions are concatenated in
//! catalog order and duplicates are preserved; repetition can be
//! meaningful, and dropping it is a rendering decision this engine does
//! not make.

use crate::modules::SharedModule;
use crate::types::{CommandSet, ProjectSnapshot};

const EMPTY_COMMANDS: &str = "No command suggestions for the detected stack.";

pub struct CommandGenerator;

impl CommandGenerator {
    /// Collect command suggestions from every accepted module that exposes
    /// the command capability, in catalog order.
    pub fn collect(modules: &[SharedModule], snapshot: &ProjectSnapshot) -> CommandSet {
        let mut merged = CommandSet::default();
        for module in modules {
            if let Some(source) = module.command_source() {
                merged.extend(source.commands(snapshot));
            }
        }
        merged
    }

    /// Render the Commands section body
    pub fn render(commands: &CommandSet) -> String {
        if commands.is_empty() {
            return EMPTY_COMMANDS.to_string();
        }

        let mut blocks: Vec<String> = Vec::new();
        for (name, bucket) in commands.buckets() {
            if bucket.is_empty() {
                continue;
            }
            let mut lines = vec![format!("**{}**", name)];
            for command in bucket {
                lines.push(format!("- `{}`", command));
            }
            blocks.push(lines.join("\n"));
        }
        blocks.join("\n\n")
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::modules::builtin;
    use crate::types::Ecosystem;

    fn shared(id: &str) -> SharedModule {
        Arc::new(builtin::find(id).unwrap())
    }

    #[test]
    fn test_collect_preserves_catalog_order_and_duplicates() {
        // Next.js and React both suggest "{pm} run dev"; both survive.
        let modules = vec![shared("nextjs"), shared("react")];
        let snapshot = ProjectSnapshot::builder()
            .dependency(Ecosystem::Npm, "next", "^14.0.0")
            .build();

        let commands = CommandGenerator::collect(&modules, &snapshot);
        assert_eq!(commands.dev, vec!["npm run dev", "npm run dev"]);
    }

    #[test]
    fn test_languages_contribute_nothing() {
        let modules = vec![shared("typescript"), shared("python")];
        let snapshot = ProjectSnapshot::builder().build();

        let commands = CommandGenerator::collect(&modules, &snapshot);
        assert!(commands.is_empty());
    }

    #[test]
    fn test_render_groups_by_bucket() {
        let modules = vec![shared("nextjs")];
        let snapshot = ProjectSnapshot::builder().file("pnpm-lock.yaml").build();

        let rendered = CommandGenerator::render(&CommandGenerator::collect(&modules, &snapshot));
        assert!(rendered.contains("**dev**"));
        assert!(rendered.contains("- `pnpm run dev`"));
        assert!(rendered.contains("**install**"));
    }

    #[test]
    fn test_render_empty_set() {
        let rendered = CommandGenerator::render(&CommandSet::default());
        assert!(rendered.contains("No command suggestions"));
    }
}
