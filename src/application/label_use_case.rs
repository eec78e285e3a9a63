// ============================================================
// Layer 2 — LabelUseCase
// ============================================================
// Prints a label-file template for a set of saved blocks: every
// candidate node, keyed by its positional identifier, with the
// role preset to Other and a trailing `//` comment describing the
// node so a person can spot the title, kicker and image:
//
//   "block_1.html": [
//     {"xpath": "/div[1]/div[1]/h2[1]", "role": "Other"}, // h2.titulo "Operator expands..."
//     ...
//   ]
//
// With the comments stripped the template is a valid label file.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::data::html::{tag_name, visible_text, HtmlBlock};
use crate::data::xpath;
use crate::domain::role::Role;

const SNIPPET_CHARS: usize = 50;

#[derive(Debug, Clone, Default)]
pub struct LabelConfig {
    pub blocks: Vec<PathBuf>,
}

pub struct LabelUseCase {
    config: LabelConfig,
}

impl LabelUseCase {
    pub fn new(config: LabelConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<String> {
        let mut sections = Vec::with_capacity(self.config.blocks.len());

        for path in &self.config.blocks {
            let markup = fs::read_to_string(path)
                .with_context(|| format!("Cannot read block '{}'", path.display()))?;
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("block.html");
            sections.push(template_for(name, &markup)?);
        }

        Ok(format!("{{\n{}\n}}\n", sections.join(",\n")))
    }
}

/// Template section for one document.
fn template_for(name: &str, markup: &str) -> Result<String> {
    let block = HtmlBlock::parse(markup);
    let nodes = block.candidates();

    let mut lines = vec![format!("  {}: [", serde_json::to_string(name)?)];
    for (i, node) in nodes.iter().enumerate() {
        let entry = serde_json::json!({ "xpath": xpath::identify(&block, *node), "role": Role::Other });
        let comma = if i + 1 < nodes.len() { "," } else { "" };
        lines.push(format!("    {entry}{comma} // {}", describe(*node)));
    }
    lines.push("  ]".to_string());

    tracing::debug!("{}: {} candidate nodes", name, nodes.len());
    Ok(lines.join("\n"))
}

/// `tag.class1.class2 "text snippet"`
fn describe(node: scraper::ElementRef<'_>) -> String {
    let mut label = tag_name(node).to_string();
    for class in node.value().attr("class").unwrap_or("").split_whitespace() {
        label.push('.');
        label.push_str(class);
    }

    let text = visible_text(node);
    if text.is_empty() {
        return label;
    }
    let mut snippet: String = text.chars().take(SNIPPET_CHARS).collect();
    if text.chars().count() > SNIPPET_CHARS {
        snippet.push_str("...");
    }
    format!("{label} \"{snippet}\"")
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::tests::news_block;
    use crate::data::loader::{strip_line_comments, LabelMap};

    #[test]
    fn test_template_is_a_valid_label_file() {
        let dir = tempfile::tempdir().unwrap();
        let a   = dir.path().join("block_1.html");
        let b   = dir.path().join("block_2.html");
        fs::write(&a, news_block(1)).unwrap();
        fs::write(&b, r#"<div><p>Say "hi" // not a comment</p></div>"#).unwrap();

        let text = LabelUseCase::new(LabelConfig { blocks: vec![a, b] }).execute().unwrap();
        assert!(text.contains("// h2.titulo.fuente_roboto_slab \"Operator number 1"));

        let labels: LabelMap = serde_json::from_str(&strip_line_comments(&text)).unwrap();
        assert_eq!(labels["block_1.html"].len(), 9);
        assert_eq!(labels["block_2.html"].len(), 2);
        assert!(labels.values().flatten().all(|e| e.role == Role::Other));
        assert_eq!(labels["block_1.html"][3].xpath, "/div[1]/div[1]/h2[1]");
    }

    #[test]
    fn test_long_text_is_truncated() {
        let block = HtmlBlock::parse(&format!("<p class=\"x\">{}</p>", "word ".repeat(30)));
        let d = describe(block.elements()[0]);
        assert!(d.starts_with("p.x \""));
        assert!(d.ends_with("...\""));
    }
}
