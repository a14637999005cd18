use colored::*;
use similar::{ChangeTag, TextDiff};
use std::io::IsTerminal;

const CONTEXT_LINES: usize = 3;

pub struct DiffFormatter;

impl DiffFormatter {
    /// Decide colouring from the configured mode ("auto", "always", "never")
    pub fn should_use_color(mode: &str) -> bool {
        match mode {
            "always" => true,
            "never" => false,
            _ => {
                // https://no-color.org/
                if std::env::var_os("NO_COLOR").is_some() {
                    return false;
                }
                std::io::stdout().is_terminal()
            }
        }
    }

    /// Unified diff between the original script and its replaced text
    pub fn format_script_diff(name: &str, original: &str, replaced: &str, use_color: bool) -> String {
        let diff = TextDiff::from_lines(original, replaced);
        let mut output = String::new();

        let header = format!("--- {}\n+++ {} (replaced)\n", name, name);
        if use_color {
            output.push_str(&header.bold().to_string());
        } else {
            output.push_str(&header);
        }

        for group in diff.grouped_ops(CONTEXT_LINES) {
            let (Some(first), Some(last)) = (group.first(), group.last()) else {
                continue;
            };
            let old = first.old_range().start..last.old_range().end;
            let new = first.new_range().start..last.new_range().end;
            let hunk = format!(
                "@@ -{},{} +{},{} @@\n",
                old.start + 1,
                old.len(),
                new.start + 1,
                new.len()
            );
            if use_color {
                output.push_str(&hunk.cyan().to_string());
            } else {
                output.push_str(&hunk);
            }

            for op in &group {
                for change in diff.iter_changes(op) {
                    let (sign, line) = match change.tag() {
                        ChangeTag::Equal => (" ", change.value()),
                        ChangeTag::Delete => ("-", change.value()),
                        ChangeTag::Insert => ("+", change.value()),
                    };
                    let mut line = format!("{}{}", sign, line);
                    if change.missing_newline() {
                        line.push('\n');
                    }

                    if use_color {
                        let colored_line = match change.tag() {
                            ChangeTag::Equal => line.dimmed().to_string(),
                            ChangeTag::Delete => line.red().to_string(),
                            ChangeTag::Insert => line.green().bold().to_string(),
                        };
                        output.push_str(&colored_line);
                    } else {
                        output.push_str(&line);
                    }
                }
            }
        }

        let (removed, added) = count_changes(&diff);
        output.push_str(&format!("\nTotal: {} removed, {} added\n", removed, added));

        output
    }
}

fn count_changes<'a>(diff: &TextDiff<'a, 'a, 'a, str>) -> (usize, usize) {
    diff.iter_all_changes()
        .fold((0, 0), |(removed, added), change| match change.tag() {
            ChangeTag::Delete => (removed + 1, added),
            ChangeTag::Insert => (removed, added + 1),
            ChangeTag::Equal => (removed, added),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_diff() {
        let original = "echo a\necho replaced line\necho c\n";
        let replaced = "echo a\necho test\necho c\n";
        let output = DiffFormatter::format_script_diff("run.sh", original, replaced, false);

        assert!(output.starts_with("--- run.sh\n+++ run.sh (replaced)\n"));
        assert!(output.contains("@@ -1,3 +1,3 @@\n"));
        assert!(output.contains("-echo replaced line\n"));
        assert!(output.contains("+echo test\n"));
        assert!(output.contains(" echo a\n"));
        assert!(output.contains("Total: 1 removed, 1 added"));
    }

    #[test]
    fn test_multiple_hunks() {
        let original: String = (1..=20).map(|i| format!("line {}\n", i)).collect();
        let replaced = original
            .replace("line 2\n", "line two\n")
            .replace("line 18\n", "line eighteen\n");
        let output = DiffFormatter::format_script_diff("run.sh", &original, &replaced, false);

        assert_eq!(output.matches("@@ -").count(), 2);
        assert!(output.contains("@@ -1,5 +1,5 @@\n"));
        assert!(output.contains("@@ -15,6 +15,6 @@\n"));
        assert!(output.contains("-line 2\n+line two\n"));
        assert!(output.contains("-line 18\n+line eighteen\n"));
        assert!(!output.contains(" line 10\n"));
        assert!(output.contains("Total: 2 removed, 2 added"));
    }

    #[test]
    fn test_missing_trailing_newline() {
        let output = DiffFormatter::format_script_diff("s", "a", "b", false);
        assert!(output.contains("-a\n+b\n"));
    }

    #[test]
    fn test_identical_text() {
        let output = DiffFormatter::format_script_diff("s", "same\n", "same\n", false);
        assert!(!output.contains("@@"));
        assert!(output.contains("Total: 0 removed, 0 added"));
    }

    #[test]
    fn test_color_modes() {
        assert!(DiffFormatter::should_use_color("always"));
        assert!(!DiffFormatter::should_use_color("never"));
    }
}
