// ============================================================
// Layer 4 — Positional Identifier
// ============================================================
// Deterministic path from a node up to (not including) the
// synthetic root, written root-first:
//
//   /div[1]/h2[1]/a[1]
//
// Each segment is `tag[rank]`, where rank is the 1-based position
// of the node among its parent's element children with the same
// tag, in document order.
//
// Identifiers only bind label-file entries to nodes at training
// time. A node whose identifier is not in the label file is
// labelled Other; markup drift between labelling and training
// silently degrades labels that way.

use scraper::ElementRef;

use crate::data::html::{tag_name, HtmlBlock};

/// Positional identifier of `node` inside `block`.
pub fn identify(block: &HtmlBlock, node: ElementRef<'_>) -> String {
    let mut segments = Vec::new();
    let mut current  = node;

    while !block.is_root(current) {
        let Some(parent) = current.parent().and_then(ElementRef::wrap) else {
            break;
        };
        let name = tag_name(current);
        let rank = parent
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|sib| tag_name(*sib) == name)
            .position(|sib| sib.id() == current.id())
            .map_or(1, |p| p + 1);

        segments.push(format!("{name}[{rank}]"));
        current = parent;
    }

    if segments.is_empty() {
        return format!("/{}[1]", tag_name(node));
    }
    segments.reverse();
    format!("/{}", segments.join("/"))
}

/// Walk `path` down from the root of `block`. Returns None when any
/// segment is malformed or points at a sibling that does not exist.
pub fn locate<'a>(block: &'a HtmlBlock, path: &str) -> Option<ElementRef<'a>> {
    let mut current = block.root();

    for segment in path.trim_start_matches('/').split('/') {
        let (name, rank) = parse_segment(segment)?;
        current = current
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|c| tag_name(*c) == name)
            .nth(rank.checked_sub(1)?)?;
    }

    (!block.is_root(current)).then_some(current)
}

/// "h2[3]" → ("h2", 3)
fn parse_segment(segment: &str) -> Option<(&str, usize)> {
    let (name, rest) = segment.split_once('[')?;
    let rank = rest.strip_suffix(']')?.parse().ok()?;
    (!name.is_empty()).then_some((name, rank))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: &str = r#"<div class="item">
        <div class="volanta">Kicker</div>
        <div class="titulo"><h2><a href="/x">Title</a></h2></div>
        <div class="imagen"><a href="/x"><img src="/y.jpg"></a></div>
    </div>"#;

    #[test]
    fn test_identifiers_use_same_tag_rank() {
        let block = HtmlBlock::parse(BLOCK);
        let ids: Vec<String> = block.elements().iter().map(|e| identify(&block, *e)).collect();
        assert_eq!(
            ids,
            vec![
                "/div[1]",
                "/div[1]/div[1]",
                "/div[1]/div[2]",
                "/div[1]/div[2]/h2[1]",
                "/div[1]/div[2]/h2[1]/a[1]",
                "/div[1]/div[3]",
                "/div[1]/div[3]/a[1]",
                "/div[1]/div[3]/a[1]/img[1]",
            ]
        );
    }

    #[test]
    fn test_round_trip_recovers_node() {
        let block = HtmlBlock::parse(BLOCK);
        for el in block.elements() {
            let path  = identify(&block, el);
            let found = locate(&block, &path).expect("path resolves");
            assert_eq!(found.id(), el.id(), "path {path}");
        }
    }

    #[test]
    fn test_identifier_is_deterministic() {
        let block = HtmlBlock::parse(BLOCK);
        let img   = *block.elements().last().unwrap();
        assert_eq!(identify(&block, img), identify(&block, img));
        assert!(identify(&block, img).ends_with("img[1]"));
    }

    #[test]
    fn test_locate_rejects_drifted_paths() {
        let block = HtmlBlock::parse(BLOCK);
        assert!(locate(&block, "/div[1]/div[4]").is_none());
        assert!(locate(&block, "/div[1]/span[1]").is_none());
        assert!(locate(&block, "/div[1]/div[0]").is_none());
        assert!(locate(&block, "/div[1]/div").is_none());
    }
}
