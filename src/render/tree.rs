//! Box-drawing tree visualization of the included file set.

use std::collections::BTreeMap;

#[derive(Default)]
struct TreeNode {
    children: BTreeMap<String, TreeNode>,
    is_file: bool,
}

/// Renders repo-relative paths as a box-drawing tree rooted at `.`.
///
/// Paths deeper than `depth_limit` collapse into their ancestor directory.
#[must_use]
pub fn render_tree(paths: &[String], depth_limit: Option<usize>) -> String {
    let mut root = TreeNode::default();
    for path in paths {
        let mut node = &mut root;
        let components: Vec<&str> = path.split('/').filter(|c| !c.is_empty()).collect();
        for (i, component) in components.iter().enumerate() {
            let child = node.children.entry((*component).to_string()).or_default();
            if i + 1 == components.len() {
                child.is_file = true;
            }
            node = child;
        }
    }

    let mut out = String::from(".\n");
    write_children(&root, "", depth_limit, 1, &mut out);
    out
}

fn write_children(
    node: &TreeNode,
    prefix: &str,
    depth_limit: Option<usize>,
    depth: usize,
    out: &mut String,
) {
    if depth_limit.is_some_and(|limit| depth > limit) {
        return;
    }
    let count = node.children.len();
    for (i, (name, child)) in node.children.iter().enumerate() {
        let last = i + 1 == count;
        let connector = if last { "└── " } else { "├── " };
        out.push_str(prefix);
        out.push_str(connector);
        out.push_str(name);
        out.push('\n');

        if !child.children.is_empty() {
            let extension = if last { "    " } else { "│   " };
            let child_prefix = format!("{prefix}{extension}");
            write_children(child, &child_prefix, depth_limit, depth + 1, out);
        }
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
