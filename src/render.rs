use crate::view::TreeNode;

/// Render the tree as an indented outline, one node per line.
///
/// ```text
/// Circuit
/// ├── Local
/// │   ├── x
/// │   └── wire!(1, 2)
/// └── Verify
/// ```
pub fn render_text(tree: &TreeNode) -> String {
    let mut out = String::new();
    out.push_str(&tree.name);
    out.push('\n');
    render_children(&mut out, &tree.children, "");
    out
}

/// One `<path>\t<name>` line per node, in pre-order.
pub fn render_paths(tree: &TreeNode) -> String {
    tree.walk()
        .into_iter()
        .map(|(path, node)| format!("{path}\t{}\n", node.name))
        .collect()
}

fn render_children(out: &mut String, children: &[TreeNode], prefix: &str) {
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();

        out.push_str(prefix);
        out.push_str(if last { "└── " } else { "├── " });
        out.push_str(&child.name);
        out.push('\n');

        if !child.is_leaf() {
            let prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
            render_children(out, &child.children, &prefix);
        }
    }
}
