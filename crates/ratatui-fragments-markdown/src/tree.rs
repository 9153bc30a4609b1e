//! Document tree arena.
//!
//! Nodes live in a single `Vec` and refer to each other by [`NodeId`]. Parent links are plain
//! indices, so upward queries (ancestor search, sibling position) never hold ownership.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListFlags {
    pub ordered: bool,
    pub definition: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowRole {
    Header,
    Body,
    Footer,
}

/// Alignment a table cell declares in the source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceAlignment {
    Left,
    Center,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    BlockQuote,
    List(ListFlags),
    ListItem(ListFlags),
    Paragraph,
    Heading(u8),
    Strong,
    Link {
        destination: String,
    },
    Image {
        destination: String,
    },
    Text(String),
    Table,
    TableRow(RowRole),
    TableCell {
        is_header: bool,
        alignment: Option<SourceAlignment>,
    },
    /// A node kind the renderer does not handle. Its children are still walked.
    Other(&'static str),
}

#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Enter,
    Exit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkStatus {
    Continue,
    /// Only meaningful on [`Phase::Enter`]: the node's children are not visited, its exit
    /// event still is.
    SkipChildren,
}

#[derive(Clone, Debug)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub const ROOT: NodeId = NodeId(0);

    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Appends a new last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this document.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes[parent.0].children.push(id);
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        id
    }

    /// Number of nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether anything was appended under the root.
    pub fn has_content(&self) -> bool {
        !self.nodes[Self::ROOT.0].children.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub(crate) fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.0].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].children.last().copied()
    }

    /// Zero-based index of `id` among its parent's children (0 for the root).
    pub fn position_in_parent(&self, id: NodeId) -> usize {
        self.parent(id)
            .and_then(|p| self.children(p).iter().position(|c| *c == id))
            .unwrap_or(0)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|c| *c == id)?;
        siblings.get(pos + 1).copied()
    }

    /// Iterates from `id`'s parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |n| self.parent(*n))
    }

    /// Depth-first walk emitting one enter and one exit event per node, in document order.
    ///
    /// The traversal keeps an explicit stack, so deeply nested documents do not grow the call
    /// stack.
    pub fn walk<F>(&self, mut visit: F)
    where
        F: FnMut(&Document, NodeId, Phase) -> WalkStatus,
    {
        enum Step {
            Enter(NodeId),
            Exit(NodeId),
        }

        let mut stack = vec![Step::Enter(Self::ROOT)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Enter(id) => {
                    let status = visit(self, id, Phase::Enter);
                    stack.push(Step::Exit(id));
                    if status == WalkStatus::Continue {
                        for child in self.children(id).iter().rev() {
                            stack.push(Step::Enter(*child));
                        }
                    }
                }
                Step::Exit(id) => {
                    visit(self, id, Phase::Exit);
                }
            }
        }
    }
}
