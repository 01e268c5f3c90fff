use super::flatten::PrintPage;
use std::fmt::Write;

const RULE: &str = "----------------------------------------";

/// Renders pages as a plain-text print sheet, one block per page.
///
/// Empty sections are omitted; list fields print as bullets.
pub fn render_text(pages: &[PrintPage<'_>]) -> String {
    let mut out = String::new();
    for page in pages {
        let content = &page.entry.content;
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "Page {} | {}", page.page_number, page.group_name);
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "{}", content.title);

        write_block(&mut out, "Intuition", &content.intuition);
        write_list(&mut out, "Approach", &content.approach);
        write_block(&mut out, "Dry run", &content.dry_run);
        if !content.time_complexity.is_empty() || !content.space_complexity.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "Complexity: time {} / space {}",
                or_dash(&content.time_complexity),
                or_dash(&content.space_complexity)
            );
        }
        write_list(&mut out, "Quick revision", &content.quick_revision);
        write_block(&mut out, "Code", &content.code);
        if !content.tags.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Tags: {}", content.tags.join(", "));
        }
        let _ = writeln!(out);
    }
    out
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

fn write_block(out: &mut String, heading: &str, body: &str) {
    if body.trim().is_empty() {
        return;
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{heading}:");
    for line in body.lines() {
        let _ = writeln!(out, "  {line}");
    }
}

fn write_list(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{heading}:");
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entry::{Entry, EntryContent};

    #[test]
    fn renders_header_and_filled_sections_only() {
        let mut content = EntryContent::titled("Two Sum");
        content.approach = vec!["hash map".to_string(), "single pass".to_string()];
        content.time_complexity = "O(n)".to_string();
        content.tags = vec!["array".to_string()];
        let entry = Entry {
            row_id: 1,
            id: "e1".to_string(),
            parent_id: None,
            print_order: 0,
            content,
        };
        let pages = [PrintPage {
            page_number: 1,
            group_id: None,
            group_name: "Unorganized",
            entry: &entry,
        }];

        let text = render_text(&pages);
        assert!(text.contains("Page 1 | Unorganized"));
        assert!(text.contains("Two Sum"));
        assert!(text.contains("  - single pass"));
        assert!(text.contains("Complexity: time O(n) / space -"));
        assert!(text.contains("Tags: array"));
        assert!(!text.contains("Intuition:"));
        assert!(!text.contains("Code:"));
    }

    #[test]
    fn no_pages_render_empty() {
        assert_eq!(render_text(&[]), "");
    }
}
