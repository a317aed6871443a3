use std::path::{Path, PathBuf};
use tree_sitter::{Node, Tree};

/// A Go source file parsed by tree-sitter, together with the text it came from.
#[derive(Clone, Debug)]
pub struct GoAst {
    pub tree: Tree,
    pub source: String,
    pub path: PathBuf,
}

impl GoAst {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Source text covered by `node`.
    ///
    /// Node ranges always fall on the UTF-8 boundaries of the parsed
    /// string, so the lookup only fails for nodes from another tree.
    pub fn text<'a>(&'a self, node: Node<'_>) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or_default()
    }

    /// Named top-level declarations of the file, in source order
    pub fn top_level_nodes(&self) -> Vec<Node<'_>> {
        let root = self.root();
        let mut cursor = root.walk();
        root.named_children(&mut cursor).collect()
    }
}

/// Locate the first syntax error in a tree as a 1-based (line, column) pair.
pub fn first_error_position(node: Node<'_>) -> Option<(usize, usize)> {
    if node.is_error() || node.is_missing() {
        let pos = node.start_position();
        return Some((pos.row + 1, pos.column + 1));
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error_position)
}
