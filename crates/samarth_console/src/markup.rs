//! Assistant markup flattening.
//!
//! Answers arrive as markdown. The console reduces them to plain terminal
//! text: emphasis and inline-code markers are stripped while paragraph
//! breaks and list structure survive. User messages never pass through here.

use markdown::{mdast, to_mdast, ParseOptions};

/// Flattens markdown into plain text lines.
///
/// Top-level blocks are separated by one blank line. Input that fails to
/// parse is returned verbatim.
#[must_use]
pub fn flatten_markdown(text: &str) -> Vec<String> {
    let normalized = text.replace('\t', "   ");
    let root = match to_mdast(&normalized, &ParseOptions::gfm()) {
        Ok(node) => node,
        Err(_) => mdast::Node::Text(mdast::Text {
            value: normalized.clone(),
            position: None,
        }),
    };

    let nodes = match root {
        mdast::Node::Root(root) => root.children,
        other => vec![other],
    };

    let mut lines = Vec::new();
    for node in &nodes {
        let rendered = render_block(node, 0);
        if rendered.is_empty() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.extend(rendered);
    }

    lines
}

fn render_block(node: &mdast::Node, depth: usize) -> Vec<String> {
    match node {
        mdast::Node::Heading(heading) => vec![inline_text(&heading.children)],
        mdast::Node::Paragraph(paragraph) => inline_text(&paragraph.children)
            .split('\n')
            .map(str::to_string)
            .collect(),
        mdast::Node::List(list) => render_list(list, depth),
        mdast::Node::Code(code) => code
            .value
            .split('\n')
            .map(|line| format!("  {line}"))
            .collect(),
        mdast::Node::Blockquote(quote) => quote
            .children
            .iter()
            .flat_map(|child| render_block(child, depth))
            .map(|line| format!("> {line}"))
            .collect(),
        mdast::Node::ThematicBreak(_) => vec!["---".to_string()],
        mdast::Node::Html(html) => html.value.split('\n').map(str::to_string).collect(),
        mdast::Node::Text(text) => text.value.split('\n').map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

fn render_list(list: &mdast::List, depth: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let indent = "  ".repeat(depth);
    let start_number = list.start.unwrap_or(1);

    for (i, node) in list.children.iter().enumerate() {
        let mdast::Node::ListItem(item) = node else {
            continue;
        };
        let bullet = if list.ordered {
            format!("{}. ", start_number + i as u32)
        } else {
            "- ".to_string()
        };

        let mut first = true;
        for child in &item.children {
            match child {
                mdast::Node::List(nested) => lines.extend(render_list(nested, depth + 1)),
                other => {
                    for line in render_block(other, depth) {
                        if first {
                            lines.push(format!("{indent}{bullet}{line}"));
                            first = false;
                        } else {
                            lines.push(format!("{indent}  {line}"));
                        }
                    }
                }
            }
        }

        if first {
            lines.push(format!("{indent}{}", bullet.trim_end()));
        }
    }

    lines
}

fn inline_text(nodes: &[mdast::Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            mdast::Node::Text(text) => out.push_str(&text.value),
            mdast::Node::InlineCode(code) => out.push_str(&code.value),
            mdast::Node::Strong(strong) => out.push_str(&inline_text(&strong.children)),
            mdast::Node::Emphasis(emphasis) => out.push_str(&inline_text(&emphasis.children)),
            mdast::Node::Delete(delete) => out.push_str(&inline_text(&delete.children)),
            mdast::Node::Link(link) => out.push_str(&inline_text(&link.children)),
            mdast::Node::Image(image) => out.push_str(&image.alt),
            mdast::Node::Break(_) => out.push('\n'),
            mdast::Node::Html(html) => out.push_str(&html.value),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::flatten_markdown;

    #[test]
    fn emphasis_and_inline_code_markers_are_stripped() {
        let lines = flatten_markdown("**Rainfall** has `declined` by *5%*.");
        assert_eq!(lines, vec!["Rainfall has declined by 5%.".to_string()]);
    }

    #[test]
    fn headings_and_bullets_keep_their_structure() {
        let lines = flatten_markdown("## Outlook\n\n- Rice on schedule\n- Wheat stocks comfortable");
        assert_eq!(
            lines,
            vec![
                "Outlook".to_string(),
                String::new(),
                "- Rice on schedule".to_string(),
                "- Wheat stocks comfortable".to_string(),
            ]
        );
    }

    #[test]
    fn ordered_and_nested_lists_are_numbered_and_indented() {
        let lines = flatten_markdown("1. first\n2. second");
        assert_eq!(lines, vec!["1. first".to_string(), "2. second".to_string()]);

        let nested = flatten_markdown("- outer\n  - inner");
        assert_eq!(nested, vec!["- outer".to_string(), "  - inner".to_string()]);
    }

    #[test]
    fn paragraphs_are_separated_by_one_blank_line() {
        let lines = flatten_markdown("first paragraph\n\nsecond paragraph");
        assert_eq!(
            lines,
            vec![
                "first paragraph".to_string(),
                String::new(),
                "second paragraph".to_string(),
            ]
        );
    }

    #[test]
    fn code_blocks_are_indented_verbatim() {
        let lines = flatten_markdown("```\nyield = 3.2\n```");
        assert_eq!(lines, vec!["  yield = 3.2".to_string()]);
    }

    #[test]
    fn plain_text_passes_through() {
        let lines = flatten_markdown("no markup here");
        assert_eq!(lines, vec!["no markup here".to_string()]);
    }

    #[test]
    fn links_flatten_to_their_text() {
        let lines = flatten_markdown("see [the IMD atlas](https://imd.example) for maps");
        assert_eq!(lines, vec!["see the IMD atlas for maps".to_string()]);
    }

    #[test]
    fn empty_input_yields_no_lines() {
        assert_eq!(flatten_markdown(""), Vec::<String>::new());
    }
}
