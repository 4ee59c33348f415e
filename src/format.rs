use std::fmt::{self, Display, Write};

use crate::engine::RawSetTrie;

/// Layout of the text rendering of a trie.
///
/// Every node is printed on its own line, preceded by `level * tab_size`
/// copies of `pad`. The root line shows `root_label`; terminal nodes are
/// followed by `terminal_marker` in a [`SetTrie`](crate::SetTrie) and by
/// `: {value:?}` in the map types.
///
/// # Examples
///
/// ```
/// use settrie::{SetTrie, TreeFormat};
///
/// let trie: SetTrie<i32> = SetTrie::from([vec![1, 2], vec![1]]);
///
/// assert_eq!(trie.tree_string(&TreeFormat::default()), "None\n  1#\n    2#\n");
///
/// let format = TreeFormat::default()
///     .with_pad('.')
///     .with_tab_size(1)
///     .with_root_label("*");
/// assert_eq!(trie.tree_string(&format), "*\n.1#\n..2#\n");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeFormat {
    pad: char,
    tab_size: usize,
    root_label: String,
    terminal_marker: String,
}

impl Default for TreeFormat {
    fn default() -> Self {
        TreeFormat {
            pad: ' ',
            tab_size: 2,
            root_label: String::from("None"),
            terminal_marker: String::from("#"),
        }
    }
}

impl TreeFormat {
    /// Sets the indentation character.
    pub fn with_pad(mut self, pad: char) -> Self {
        self.pad = pad;
        self
    }

    /// Sets how many pad characters one level of depth adds.
    pub fn with_tab_size(mut self, tab_size: usize) -> Self {
        self.tab_size = tab_size;
        self
    }

    /// Sets the text printed for the root node.
    pub fn with_root_label(mut self, root_label: impl Into<String>) -> Self {
        self.root_label = root_label.into();
        self
    }

    /// Sets the suffix of terminal nodes in a [`SetTrie`](crate::SetTrie).
    pub fn with_terminal_marker(mut self, marker: impl Into<String>) -> Self {
        self.terminal_marker = marker.into();
        self
    }

    pub fn pad(&self) -> char {
        self.pad
    }

    pub fn tab_size(&self) -> usize {
        self.tab_size
    }

    pub fn root_label(&self) -> &str {
        &self.root_label
    }

    pub fn terminal_marker(&self) -> &str {
        &self.terminal_marker
    }
}

/// Writes `trie` in pre-order, one node per line. `suffix` renders the
/// payload of terminal nodes.
pub(crate) fn write_tree<K, T, W, F>(
    trie: &RawSetTrie<K, T>,
    out: &mut W,
    format: &TreeFormat,
    mut suffix: F,
) -> fmt::Result
where
    K: Display,
    W: Write,
    F: FnMut(&mut W, &T) -> fmt::Result,
{
    let mut stack = vec![(trie.root, 0usize)];

    while let Some((idx, level)) = stack.pop() {
        let node = trie.pool.get_node(idx);

        for _ in 0..level * format.tab_size {
            out.write_char(format.pad)?;
        }
        match &node.key {
            Some(key) => write!(out, "{}", key)?,
            None => out.write_str(&format.root_label)?,
        }
        if let Some(value) = trie.node_value(node) {
            suffix(out, value)?;
        }
        out.write_char('\n')?;

        for &child in node.children.iter().rev() {
            stack.push((child, level + 1));
        }
    }

    Ok(())
}
