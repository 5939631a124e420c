//! Hierarchical table of contents.
//!
//! Nests a flat heading list into a forest by heading level. The roots are
//! the shallowest headings encountered, which need not be level 1, and
//! skipped levels nest one step below the nearest shallower heading:
//!
//! ```rust
//! use folio_content::markdown::parse_document_toc;
//!
//! let toc = parse_document_toc("# Intro\n### Deep\n## Next", 6);
//!
//! assert_eq!(toc.len(), 1);
//! assert_eq!(toc[0].children.len(), 2);
//! assert_eq!(toc[0].children[0].id, "deep");
//! ```

use serde::{Deserialize, Serialize};

use super::headings::{HeadingNode, extract_headings};

/// A heading together with the headings nested under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocNode {
    /// Anchor id.
    pub id: String,
    /// Display text.
    pub text: String,
    /// Heading level, 1..=6.
    pub level: u8,
    /// Nested headings in source order.
    #[serde(default)]
    pub children: Vec<TocNode>,
}

impl TocNode {
    /// Number of nodes in this subtree, including `self`.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(TocNode::len).sum::<usize>()
    }

    /// Always `false`; a node counts itself.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl From<HeadingNode> for TocNode {
    fn from(heading: HeadingNode) -> Self {
        Self {
            id: heading.id,
            text: heading.text,
            level: heading.level,
            children: Vec::new(),
        }
    }
}

/// Nest a flat heading list into a forest.
///
/// Stack-based: for each heading, completed nodes whose level is greater
/// than or equal to the new heading's level are popped and attached to
/// their parent (or to the roots); the new heading is then pushed. A child
/// therefore always has a strictly greater level than its parent.
pub fn build_tree(headings: &[HeadingNode]) -> Vec<TocNode> {
    let mut roots = Vec::new();
    let mut stack: Vec<TocNode> = Vec::new();

    for heading in headings {
        while stack.last().is_some_and(|top| top.level >= heading.level) {
            close_top(&mut stack, &mut roots);
        }
        stack.push(TocNode::from(heading.clone()));
    }

    while !stack.is_empty() {
        close_top(&mut stack, &mut roots);
    }

    roots
}

/// Pop the top of the stack and attach it to its parent or the roots.
fn close_top(stack: &mut Vec<TocNode>, roots: &mut Vec<TocNode>) {
    if let Some(done) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(done),
            None => roots.push(done),
        }
    }
}

/// Flatten a forest back into a pre-order list.
///
/// The returned nodes carry no children. Order, ids, and absolute levels
/// are preserved; levels that were skipped in the source are not
/// reconstructed.
pub fn flatten(tree: &[TocNode]) -> Vec<TocNode> {
    let mut out = Vec::new();
    flatten_into(tree, &mut out);
    out
}

fn flatten_into(nodes: &[TocNode], out: &mut Vec<TocNode>) {
    for node in nodes {
        out.push(TocNode {
            children: Vec::new(),
            ..node.clone()
        });
        flatten_into(&node.children, out);
    }
}

/// Extract headings from a body and nest them: the entry point consumers
/// use to render navigation.
pub fn parse_document_toc(body: &str, max_depth: u8) -> Vec<TocNode> {
    build_tree(&extract_headings(body, max_depth))
}
