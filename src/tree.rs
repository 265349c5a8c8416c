//! The expand/collapse state machine for the remote directory tree.
//!
//! This module is pure: it never performs I/O. Operations that need a
//! network call return a [`TreeCommand`] for the app layer to dispatch;
//! completions come back through the `handle_*` methods. Each listing
//! fetch is identified by a session-unique ticket, so a response whose
//! tree was collapsed before it arrived simply fails to find a live
//! owner and is dropped.

use chrono::{DateTime, Utc};

use crate::remote::protocol::{Listing, WireEntry};

/// One filesystem object, normalized from the wire.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Repo-relative path, unique within its parent listing.
    pub path: String,
    pub is_dir: bool,
    /// Size in bytes; files only.
    pub size: Option<u64>,
    /// Modification time; files only.
    pub mtime: Option<DateTime<Utc>>,
}

impl Entry {
    fn from_wire(wire: &WireEntry, is_dir: bool) -> Self {
        Self {
            path: wire.path.clone(),
            is_dir,
            size: if is_dir { None } else { wire.size },
            mtime: if is_dir {
                None
            } else {
                wire.mtime.as_ref().and_then(|t| t.normalize())
            },
        }
    }

    /// Display name: the last path segment.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or("")
    }
}

/// A single tree entry. Directories own their expansion state and, while
/// expanded, the child tree that lists their contents.
#[derive(Debug)]
pub struct Node {
    pub entry: Entry,
    /// Always false for files.
    pub expanded: bool,
    /// Present iff `expanded` is true. Dropping it is the only form of
    /// cancellation: the tree's ticket stops resolving.
    pub child_tree: Option<Box<Tree>>,
    /// Last open failure for this file node, shown inline until the next
    /// successful open.
    pub open_error: Option<String>,
}

impl Node {
    fn new(entry: Entry) -> Self {
        Self {
            entry,
            expanded: false,
            child_tree: None,
            open_error: None,
        }
    }
}

/// An ordered collection of nodes materialized from one listing response,
/// scoped to one directory path.
#[derive(Debug)]
pub struct Tree {
    /// The directory path this tree lists. Equals the owning node's path.
    pub scope_path: String,
    /// Identity of this tree's one listing fetch.
    pub ticket: u64,
    /// Directories first, then files, each group in backend order.
    pub children: Vec<Node>,
    /// False while the listing request is in flight (or after it failed).
    pub loaded: bool,
    /// Set when the listing request failed; the tree stays unloaded.
    pub error: Option<String>,
}

impl Tree {
    fn new(scope_path: String, ticket: u64) -> Self {
        Self {
            scope_path,
            ticket,
            children: Vec::new(),
            loaded: false,
            error: None,
        }
    }

    /// Materialize child nodes from a listing: folders first, then files,
    /// preserving the backend's order within each group.
    fn populate(&mut self, listing: &Listing) {
        self.children.clear();
        for wire in &listing.folders {
            self.children.push(Node::new(Entry::from_wire(wire, true)));
        }
        for wire in &listing.entries {
            self.children.push(Node::new(Entry::from_wire(wire, false)));
        }
        self.loaded = true;
        self.error = None;
    }

    /// Find the live tree whose fetch carries `ticket`. Collapsed trees
    /// have been dropped, so their tickets no longer resolve.
    fn find_by_ticket_mut(&mut self, ticket: u64) -> Option<&mut Tree> {
        if self.ticket == ticket {
            return Some(self);
        }
        for child in self.children.iter_mut() {
            if let Some(tree) = child.child_tree.as_deref_mut() {
                if let Some(found) = tree.find_by_ticket_mut(ticket) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Find a node by path anywhere in the live tree.
    fn find_node_mut(&mut self, path: &str) -> Option<&mut Node> {
        for child in self.children.iter_mut() {
            if child.entry.path == path {
                return Some(child);
            }
            if let Some(tree) = child.child_tree.as_deref_mut() {
                if let Some(found) = tree.find_node_mut(path) {
                    return Some(found);
                }
            }
        }
        None
    }
}

/// A network request the app layer must dispatch on behalf of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeCommand {
    /// Fetch the listing for `path`; the response must carry `ticket` back.
    List { path: String, ticket: u64 },
    /// Ask the server to open a file.
    Open { path: String },
}

/// Whether a network completion found a live owner or arrived after its
/// subtree was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Applied,
    Stale,
}

/// What kind of row a flattened item represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    Directory { expanded: bool },
    File,
    /// Placeholder under an expanded directory whose listing is in flight.
    Pending,
    /// Placeholder carrying a listing failure message.
    Failed,
}

/// A flattened representation of one visible row, for rendering.
#[derive(Debug, Clone)]
pub struct FlatItem {
    pub label: String,
    pub path: String,
    pub kind: RowKind,
    pub depth: usize,
    pub is_last_sibling: bool,
    pub size: Option<u64>,
    pub mtime: Option<DateTime<Utc>>,
    pub open_error: Option<String>,
}

/// The page root: owns the root tree for the lifetime of the session,
/// hands out tickets, and keeps the render projection and selection.
pub struct TreeState {
    pub root: Tree,
    pub flat_items: Vec<FlatItem>,
    pub selected_index: usize,
    pub scroll_offset: usize,
    next_ticket: u64,
}

impl TreeState {
    /// Bootstrap: construct the root tree (unloaded) and return the
    /// listing command that populates it.
    pub fn new(root_path: impl Into<String>) -> (Self, TreeCommand) {
        let scope = root_path.into();
        let mut state = Self {
            root: Tree::new(scope.clone(), 1),
            flat_items: Vec::new(),
            selected_index: 0,
            scroll_offset: 0,
            next_ticket: 2,
        };
        state.flatten();
        (
            state,
            TreeCommand::List {
                path: scope,
                ticket: 1,
            },
        )
    }

    /// The single user-facing operation on the selected row.
    ///
    /// Files request an open; collapsed directories expand and request
    /// their listing; expanded directories collapse, discarding the child
    /// tree along with any fetch still in flight for it.
    pub fn activate_selected(&mut self) -> Option<TreeCommand> {
        let item = self.flat_items.get(self.selected_index)?;
        let kind = item.kind.clone();
        let path = item.path.clone();
        match kind {
            RowKind::File => Some(TreeCommand::Open { path }),
            RowKind::Directory { .. } => {
                let node = self.root.find_node_mut(&path)?;
                if node.expanded {
                    node.child_tree = None;
                    node.expanded = false;
                    self.flatten();
                    None
                } else {
                    let ticket = self.next_ticket;
                    self.next_ticket += 1;
                    node.expanded = true;
                    node.child_tree = Some(Box::new(Tree::new(path.clone(), ticket)));
                    self.flatten();
                    Some(TreeCommand::List { path, ticket })
                }
            }
            RowKind::Pending | RowKind::Failed => None,
        }
    }

    /// Apply a listing response. If no live tree holds the ticket the
    /// owning subtree was collapsed while the request was in flight; the
    /// response is dropped without touching any state.
    pub fn handle_listing(&mut self, ticket: u64, listing: &Listing) -> Delivery {
        match self.root.find_by_ticket_mut(ticket) {
            Some(tree) => {
                tree.populate(listing);
                self.flatten();
                Delivery::Applied
            }
            None => {
                tracing::debug!(ticket, "dropping stale listing response");
                Delivery::Stale
            }
        }
    }

    /// Record a listing failure on the tree that requested it. The tree
    /// stays unloaded with empty children; re-expanding is the retry.
    pub fn handle_listing_error(&mut self, ticket: u64, reason: String) -> Delivery {
        match self.root.find_by_ticket_mut(ticket) {
            Some(tree) => {
                tree.error = Some(reason);
                tree.loaded = false;
                tree.children.clear();
                self.flatten();
                Delivery::Applied
            }
            None => {
                tracing::debug!(ticket, "dropping stale listing failure");
                Delivery::Stale
            }
        }
    }

    /// Record the outcome of an open request on the file node that issued
    /// it. Never changes tree structure.
    pub fn handle_open_result(&mut self, path: &str, error: Option<String>) -> Delivery {
        match self.root.find_node_mut(path) {
            Some(node) if !node.entry.is_dir => {
                node.open_error = error;
                self.flatten();
                Delivery::Applied
            }
            _ => Delivery::Stale,
        }
    }

    /// Collapse the selected directory, or jump to its parent row.
    pub fn collapse_selected(&mut self) {
        let Some(item) = self.flat_items.get(self.selected_index) else {
            return;
        };
        if matches!(item.kind, RowKind::Directory { expanded: true }) {
            let path = item.path.clone();
            if let Some(node) = self.root.find_node_mut(&path) {
                node.child_tree = None;
                node.expanded = false;
                self.flatten();
            }
            return;
        }

        // Placeholder rows carry the scope path, which already names the
        // directory they sit under.
        if matches!(item.kind, RowKind::Pending | RowKind::Failed) {
            if let Some(i) = self.find_index_by_path(&item.path) {
                self.selected_index = i;
            }
            return;
        }

        // Jump to the parent directory's row, if it is on screen.
        if let Some((parent, _)) = item.path.rsplit_once('/') {
            let parent = parent.to_string();
            if let Some(i) = self.find_index_by_path(&parent) {
                self.selected_index = i;
            }
        }
    }

    /// Rebuild the flat row list from the live tree.
    pub fn flatten(&mut self) {
        self.flat_items.clear();
        Self::flatten_tree(&self.root, 0, &mut self.flat_items);
        if !self.flat_items.is_empty() && self.selected_index >= self.flat_items.len() {
            self.selected_index = self.flat_items.len() - 1;
        }
    }

    fn flatten_tree(tree: &Tree, depth: usize, items: &mut Vec<FlatItem>) {
        if let Some(reason) = &tree.error {
            items.push(FlatItem {
                label: reason.clone(),
                path: tree.scope_path.clone(),
                kind: RowKind::Failed,
                depth,
                is_last_sibling: true,
                size: None,
                mtime: None,
                open_error: None,
            });
            return;
        }
        if !tree.loaded {
            items.push(FlatItem {
                label: "loading…".to_string(),
                path: tree.scope_path.clone(),
                kind: RowKind::Pending,
                depth,
                is_last_sibling: true,
                size: None,
                mtime: None,
                open_error: None,
            });
            return;
        }

        let count = tree.children.len();
        for (i, node) in tree.children.iter().enumerate() {
            let kind = if node.entry.is_dir {
                RowKind::Directory {
                    expanded: node.expanded,
                }
            } else {
                RowKind::File
            };
            let label = if node.entry.is_dir {
                format!("{}/", node.entry.name())
            } else {
                node.entry.name().to_string()
            };
            items.push(FlatItem {
                label,
                path: node.entry.path.clone(),
                kind,
                depth,
                is_last_sibling: i + 1 == count,
                size: node.entry.size,
                mtime: node.entry.mtime,
                open_error: node.open_error.clone(),
            });
            if let Some(child) = &node.child_tree {
                Self::flatten_tree(child, depth + 1, items);
            }
        }
    }

    /// Find the flat row index of a path.
    pub fn find_index_by_path(&self, path: &str) -> Option<usize> {
        self.flat_items.iter().position(|item| item.path == path)
    }

    /// Update the scroll offset to keep the selected row visible.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected_index - visible_height + 1;
        }
    }

    /// Move selection down by one row.
    pub fn select_next(&mut self) {
        let len = self.flat_items.len();
        if len > 0 && self.selected_index < len - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up by one row.
    pub fn select_previous(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Jump to the first row.
    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    /// Jump to the last row.
    pub fn select_last(&mut self) {
        if !self.flat_items.is_empty() {
            self.selected_index = self.flat_items.len() - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_size;
    use crate::remote::protocol::WireTimestamp;

    fn folder(path: &str) -> WireEntry {
        WireEntry {
            path: path.to_string(),
            size: None,
            mtime: None,
        }
    }

    fn file(path: &str, size: u64, mtime_ms: i64) -> WireEntry {
        WireEntry {
            path: path.to_string(),
            size: Some(size),
            mtime: Some(WireTimestamp::Millis(mtime_ms)),
        }
    }

    fn listing(folders: Vec<WireEntry>, entries: Vec<WireEntry>) -> Listing {
        Listing { folders, entries }
    }

    /// Build a state with a loaded root: one directory "docs" and one file
    /// "readme.txt".
    fn loaded_root() -> TreeState {
        let (mut state, cmd) = TreeState::new("");
        let ticket = match cmd {
            TreeCommand::List { ticket, .. } => ticket,
            other => panic!("expected a List command, got {:?}", other),
        };
        let applied = state.handle_listing(
            ticket,
            &listing(
                vec![folder("docs")],
                vec![file("readme.txt", 1536, 1_700_000_000_000)],
            ),
        );
        assert_eq!(applied, Delivery::Applied);
        state
    }

    fn select(state: &mut TreeState, path: &str) {
        state.selected_index = state
            .find_index_by_path(path)
            .unwrap_or_else(|| panic!("no row for {}", path));
    }

    #[test]
    fn bootstrap_issues_root_listing() {
        let (state, cmd) = TreeState::new("");
        assert_eq!(
            cmd,
            TreeCommand::List {
                path: "".into(),
                ticket: 1
            }
        );
        assert!(!state.root.loaded);
        // The unloaded root shows a single pending row.
        assert_eq!(state.flat_items.len(), 1);
        assert_eq!(state.flat_items[0].kind, RowKind::Pending);
    }

    #[test]
    fn root_scenario_materializes_dir_then_file() {
        let state = loaded_root();
        assert_eq!(state.flat_items.len(), 2);
        assert_eq!(state.flat_items[0].path, "docs");
        assert_eq!(
            state.flat_items[0].kind,
            RowKind::Directory { expanded: false }
        );
        assert_eq!(state.flat_items[1].path, "readme.txt");
        assert_eq!(state.flat_items[1].kind, RowKind::File);
        assert_eq!(format_size(state.flat_items[1].size.unwrap()), "1.50 KiB");
    }

    #[test]
    fn expand_requests_exactly_the_node_path() {
        // P2: the child tree's listing request carries the node's path.
        let mut state = loaded_root();
        select(&mut state, "docs");
        let cmd = state.activate_selected().expect("expand issues a command");
        match cmd {
            TreeCommand::List { path, .. } => assert_eq!(path, "docs"),
            other => panic!("expected List, got {:?}", other),
        }
        let docs = state.root.find_node_mut("docs").unwrap();
        assert!(docs.expanded);
        assert_eq!(docs.child_tree.as_ref().unwrap().scope_path, "docs");
    }

    #[test]
    fn toggle_symmetry_after_resolved_fetch() {
        // P1: activate twice (second after the fetch resolved) returns the
        // node to collapsed with no child tree.
        let mut state = loaded_root();
        select(&mut state, "docs");
        let cmd = state.activate_selected().unwrap();
        let ticket = match cmd {
            TreeCommand::List { ticket, .. } => ticket,
            _ => unreachable!(),
        };
        state.handle_listing(ticket, &listing(vec![], vec![file("docs/a.txt", 1, 0)]));

        select(&mut state, "docs");
        assert_eq!(state.activate_selected(), None);
        let docs = state.root.find_node_mut("docs").unwrap();
        assert!(!docs.expanded);
        assert!(docs.child_tree.is_none());
        assert!(state.find_index_by_path("docs/a.txt").is_none());
    }

    #[test]
    fn toggle_symmetry_after_failed_fetch() {
        // P1 holds regardless of fetch outcome.
        let mut state = loaded_root();
        select(&mut state, "docs");
        let cmd = state.activate_selected().unwrap();
        let ticket = match cmd {
            TreeCommand::List { ticket, .. } => ticket,
            _ => unreachable!(),
        };
        assert_eq!(
            state.handle_listing_error(ticket, "503 Service Unavailable".into()),
            Delivery::Applied
        );
        // The failure is a visible row under the node, not a silent drop.
        let failed = state
            .flat_items
            .iter()
            .find(|i| i.kind == RowKind::Failed)
            .expect("failed row rendered");
        assert!(failed.label.contains("503"));

        select(&mut state, "docs");
        assert_eq!(state.activate_selected(), None);
        let docs = state.root.find_node_mut("docs").unwrap();
        assert!(!docs.expanded);
        assert!(docs.child_tree.is_none());
    }

    #[test]
    fn group_ordering_dirs_before_files() {
        // P3: folders [d1,d2] + entries [f1,f2] flatten to [d1,d2,f1,f2].
        let mut state = loaded_root();
        select(&mut state, "docs");
        let ticket = match state.activate_selected().unwrap() {
            TreeCommand::List { ticket, .. } => ticket,
            _ => unreachable!(),
        };
        state.handle_listing(
            ticket,
            &listing(
                vec![folder("docs/d1"), folder("docs/d2")],
                vec![file("docs/f1", 1, 0), file("docs/f2", 2, 0)],
            ),
        );
        let children: Vec<&str> = state
            .root
            .find_node_mut("docs")
            .unwrap()
            .child_tree
            .as_ref()
            .unwrap()
            .children
            .iter()
            .map(|n| n.entry.path.as_str())
            .collect();
        assert_eq!(children, vec!["docs/d1", "docs/d2", "docs/f1", "docs/f2"]);
    }

    #[test]
    fn stale_response_after_collapse_is_dropped() {
        // P4: expand (fetch in flight), collapse, then resolve the original
        // fetch. The node stays collapsed and nothing is materialized.
        let mut state = loaded_root();
        select(&mut state, "docs");
        let ticket = match state.activate_selected().unwrap() {
            TreeCommand::List { ticket, .. } => ticket,
            _ => unreachable!(),
        };

        // Collapse before the response arrives.
        select(&mut state, "docs");
        assert_eq!(state.activate_selected(), None);

        let fate = state.handle_listing(ticket, &listing(vec![], vec![file("docs/late.txt", 9, 0)]));
        assert_eq!(fate, Delivery::Stale);
        let docs = state.root.find_node_mut("docs").unwrap();
        assert!(!docs.expanded);
        assert!(docs.child_tree.is_none());
        assert!(state.find_index_by_path("docs/late.txt").is_none());
    }

    #[test]
    fn stale_failure_after_collapse_is_dropped() {
        let mut state = loaded_root();
        select(&mut state, "docs");
        let ticket = match state.activate_selected().unwrap() {
            TreeCommand::List { ticket, .. } => ticket,
            _ => unreachable!(),
        };
        select(&mut state, "docs");
        state.activate_selected();

        assert_eq!(
            state.handle_listing_error(ticket, "timed out".into()),
            Delivery::Stale
        );
        assert!(!state.flat_items.iter().any(|i| i.kind == RowKind::Failed));
    }

    #[test]
    fn re_expand_fetches_fresh_and_latest_response_wins() {
        // P5: each expansion is a fresh fetch; after collapse/re-expand the
        // child set reflects only the latest response.
        let mut state = loaded_root();

        select(&mut state, "docs");
        let first = match state.activate_selected().unwrap() {
            TreeCommand::List { ticket, .. } => ticket,
            _ => unreachable!(),
        };
        // Collapse and re-expand before the first response arrives.
        select(&mut state, "docs");
        state.activate_selected();
        select(&mut state, "docs");
        let second = match state.activate_selected().unwrap() {
            TreeCommand::List { ticket, .. } => ticket,
            _ => unreachable!(),
        };
        assert_ne!(first, second);

        // The late first response is stale; the second one applies.
        assert_eq!(
            state.handle_listing(first, &listing(vec![], vec![file("docs/old.txt", 1, 0)])),
            Delivery::Stale
        );
        assert_eq!(
            state.handle_listing(second, &listing(vec![], vec![file("docs/new.txt", 2, 0)])),
            Delivery::Applied
        );
        assert!(state.find_index_by_path("docs/new.txt").is_some());
        assert!(state.find_index_by_path("docs/old.txt").is_none());
    }

    #[test]
    fn activate_file_issues_open_and_leaves_state_alone() {
        let mut state = loaded_root();
        select(&mut state, "readme.txt");
        let before = state.flat_items.len();
        let cmd = state.activate_selected().unwrap();
        assert_eq!(
            cmd,
            TreeCommand::Open {
                path: "readme.txt".into()
            }
        );
        assert_eq!(state.flat_items.len(), before);
    }

    #[test]
    fn open_failure_is_scoped_to_the_file_node() {
        let mut state = loaded_root();
        assert_eq!(
            state.handle_open_result("readme.txt", Some("403 Forbidden".into())),
            Delivery::Applied
        );
        // Root children unchanged, failure recorded on the node.
        assert_eq!(state.root.children.len(), 2);
        let row = &state.flat_items[state.find_index_by_path("readme.txt").unwrap()];
        assert_eq!(row.open_error.as_deref(), Some("403 Forbidden"));
    }

    #[test]
    fn open_success_clears_previous_failure() {
        let mut state = loaded_root();
        state.handle_open_result("readme.txt", Some("403 Forbidden".into()));
        state.handle_open_result("readme.txt", None);
        let row = &state.flat_items[state.find_index_by_path("readme.txt").unwrap()];
        assert!(row.open_error.is_none());
    }

    #[test]
    fn open_result_for_unknown_path_is_stale() {
        let mut state = loaded_root();
        assert_eq!(
            state.handle_open_result("gone.txt", Some("404".into())),
            Delivery::Stale
        );
    }

    #[test]
    fn pending_row_shown_while_child_fetch_in_flight() {
        let mut state = loaded_root();
        select(&mut state, "docs");
        state.activate_selected();
        let docs_idx = state.find_index_by_path("docs").unwrap();
        let pending = &state.flat_items[docs_idx + 1];
        assert_eq!(pending.kind, RowKind::Pending);
        assert_eq!(pending.depth, 1);
    }

    #[test]
    fn nested_expansion_scopes_and_depths() {
        let mut state = loaded_root();
        select(&mut state, "docs");
        let t1 = match state.activate_selected().unwrap() {
            TreeCommand::List { ticket, .. } => ticket,
            _ => unreachable!(),
        };
        state.handle_listing(t1, &listing(vec![folder("docs/inner")], vec![]));

        select(&mut state, "docs/inner");
        let cmd = state.activate_selected().unwrap();
        match &cmd {
            TreeCommand::List { path, .. } => assert_eq!(path, "docs/inner"),
            _ => unreachable!(),
        }
        let t2 = match cmd {
            TreeCommand::List { ticket, .. } => ticket,
            _ => unreachable!(),
        };
        state.handle_listing(t2, &listing(vec![], vec![file("docs/inner/deep.txt", 3, 0)]));

        let deep_idx = state.find_index_by_path("docs/inner/deep.txt").unwrap();
        assert_eq!(state.flat_items[deep_idx].depth, 2);

        // Collapsing the outer directory destroys the whole subtree.
        select(&mut state, "docs");
        state.activate_selected();
        assert!(state.find_index_by_path("docs/inner").is_none());
        assert!(state.find_index_by_path("docs/inner/deep.txt").is_none());
    }

    #[test]
    fn failed_tree_retries_on_re_expand() {
        let mut state = loaded_root();
        select(&mut state, "docs");
        let t1 = match state.activate_selected().unwrap() {
            TreeCommand::List { ticket, .. } => ticket,
            _ => unreachable!(),
        };
        state.handle_listing_error(t1, "network unreachable".into());

        // Collapse, then re-expand: a fresh fetch, no leftover error row.
        select(&mut state, "docs");
        state.activate_selected();
        select(&mut state, "docs");
        let t2 = match state.activate_selected().unwrap() {
            TreeCommand::List { ticket, .. } => ticket,
            _ => unreachable!(),
        };
        assert_ne!(t1, t2);
        assert!(!state.flat_items.iter().any(|i| i.kind == RowKind::Failed));
        state.handle_listing(t2, &listing(vec![], vec![file("docs/ok.txt", 1, 0)]));
        assert!(state.find_index_by_path("docs/ok.txt").is_some());
    }

    #[test]
    fn dir_labels_carry_trailing_slash() {
        let state = loaded_root();
        assert_eq!(state.flat_items[0].label, "docs/");
        assert_eq!(state.flat_items[1].label, "readme.txt");
    }

    #[test]
    fn name_is_last_path_segment() {
        let entry = Entry {
            path: "docs/guides/setup.md".into(),
            is_dir: false,
            size: None,
            mtime: None,
        };
        assert_eq!(entry.name(), "setup.md");
    }

    #[test]
    fn collapse_selected_on_file_jumps_to_parent() {
        let mut state = loaded_root();
        select(&mut state, "docs");
        let t = match state.activate_selected().unwrap() {
            TreeCommand::List { ticket, .. } => ticket,
            _ => unreachable!(),
        };
        state.handle_listing(t, &listing(vec![], vec![file("docs/a.txt", 1, 0)]));

        select(&mut state, "docs/a.txt");
        state.collapse_selected();
        assert_eq!(
            state.selected_index,
            state.find_index_by_path("docs").unwrap()
        );
    }

    #[test]
    fn collapse_selected_on_pending_row_selects_its_directory() {
        let mut state = loaded_root();
        select(&mut state, "docs");
        state.activate_selected();

        let docs_idx = state.find_index_by_path("docs").unwrap();
        state.selected_index = docs_idx + 1;
        assert_eq!(state.flat_items[state.selected_index].kind, RowKind::Pending);

        state.collapse_selected();
        assert_eq!(state.selected_index, docs_idx);
    }

    #[test]
    fn collapse_selected_on_failed_row_selects_its_directory() {
        let mut state = loaded_root();
        select(&mut state, "docs");
        let t = match state.activate_selected().unwrap() {
            TreeCommand::List { ticket, .. } => ticket,
            _ => unreachable!(),
        };
        state.handle_listing_error(t, "500 Internal Server Error".into());

        let docs_idx = state.find_index_by_path("docs").unwrap();
        state.selected_index = docs_idx + 1;
        assert_eq!(state.flat_items[state.selected_index].kind, RowKind::Failed);

        state.collapse_selected();
        assert_eq!(state.selected_index, docs_idx);
    }

    #[test]
    fn collapse_selected_on_expanded_dir_collapses() {
        let mut state = loaded_root();
        select(&mut state, "docs");
        state.activate_selected();
        select(&mut state, "docs");
        state.collapse_selected();
        let docs = state.root.find_node_mut("docs").unwrap();
        assert!(!docs.expanded);
        assert!(docs.child_tree.is_none());
    }

    #[test]
    fn selection_clamped_when_rows_shrink() {
        let mut state = loaded_root();
        select(&mut state, "docs");
        let t = match state.activate_selected().unwrap() {
            TreeCommand::List { ticket, .. } => ticket,
            _ => unreachable!(),
        };
        state.handle_listing(
            t,
            &listing(vec![], vec![file("docs/a.txt", 1, 0), file("docs/b.txt", 2, 0)]),
        );
        state.select_last();

        select(&mut state, "docs");
        state.activate_selected();
        assert!(state.selected_index < state.flat_items.len());
    }

    #[test]
    fn update_scroll_keeps_selection_visible() {
        let mut state = loaded_root();
        select(&mut state, "docs");
        let t = match state.activate_selected().unwrap() {
            TreeCommand::List { ticket, .. } => ticket,
            _ => unreachable!(),
        };
        let files = (0..20)
            .map(|i| file(&format!("docs/f{}.txt", i), 1, 0))
            .collect();
        state.handle_listing(t, &listing(vec![], files));

        state.select_last();
        state.update_scroll(5);
        assert!(state.selected_index >= state.scroll_offset);
        assert!(state.selected_index < state.scroll_offset + 5);

        state.select_first();
        state.update_scroll(5);
        assert_eq!(state.scroll_offset, 0);
    }
}
