//! Hierarchical routing of `verb + path` requests.
//!
//! A [`DispatchTree`] is assembled once from [`NodeBuilder`]s and is
//! immutable afterwards, so one instance can be shared by every connection
//! thread behind an `Arc`. Lookup walks `/`-separated segments from the root;
//! a node without children claims the rest of the path as its remainder.

mod meta;

use std::fmt;

use tracing::{debug, warn};

use crate::document::XmlNode;
use crate::errors::{CallError, HandlerError, TreeError, WireError};
use crate::request::Request;
use crate::verb::Verb;

pub use self::meta::META_ELEMENT;

pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Upper bound on the children of a single node.
pub const MAX_CHILDREN: usize = 16;

/// Name of the root node.
pub const ROOT_NAME: &str = "/";

const SEPARATOR: char = '/';

/// What a handler sees besides the request: the tree it was reached through
/// and the daemon state it operates on.
pub struct DispatchContext<'a, S> {
    /// Tree that routed the request.
    pub tree: &'a DispatchTree<S>,
    /// Shared state supplied by the caller of [`DispatchTree::dispatch`].
    pub state: &'a S,
}

/// Route handler. The `&str` argument is the path remainder below the node,
/// empty when the path ended exactly at the node.
pub type HandlerFn<S> = fn(&DispatchContext<'_, S>, &str, &mut Request) -> Result<(), HandlerError>;

/// One optional handler per verb.
pub struct MethodTable<S> {
    get: Option<HandlerFn<S>>,
    put: Option<HandlerFn<S>>,
    post: Option<HandlerFn<S>>,
    delete: Option<HandlerFn<S>>,
}

impl<S> Default for MethodTable<S> {
    fn default() -> Self {
        Self {
            get: None,
            put: None,
            post: None,
            delete: None,
        }
    }
}

impl<S> MethodTable<S> {
    /// Handler registered for `verb`.
    #[must_use]
    pub fn handler(&self, verb: Verb) -> Option<HandlerFn<S>> {
        match verb {
            Verb::Get => self.get,
            Verb::Put => self.put,
            Verb::Post => self.post,
            Verb::Delete => self.delete,
        }
    }

    fn slot(&mut self, verb: Verb) -> &mut Option<HandlerFn<S>> {
        match verb {
            Verb::Get => &mut self.get,
            Verb::Put => &mut self.put,
            Verb::Post => &mut self.post,
            Verb::Delete => &mut self.delete,
        }
    }
}

/// A routed path element.
pub struct Node<S> {
    name: String,
    children: Vec<Node<S>>,
    methods: MethodTable<S>,
}

impl<S> Node<S> {
    /// Path component naming this node.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Child nodes in registration order.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Handlers registered on this node.
    #[must_use]
    pub fn methods(&self) -> &MethodTable<S> {
        &self.methods
    }

    fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|child| child.name == name)
    }
}

impl<S> fmt::Debug for Node<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

/// Mutable description of a node, turned into a [`Node`] by
/// [`DispatchTree::build`].
pub struct NodeBuilder<S> {
    name: String,
    children: Vec<NodeBuilder<S>>,
    methods: MethodTable<S>,
}

impl<S> NodeBuilder<S> {
    /// A node called `name` with no handlers or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            methods: MethodTable::default(),
        }
    }

    /// Registers `handler` for `verb`, replacing any earlier registration.
    #[must_use]
    pub fn on(mut self, verb: Verb, handler: HandlerFn<S>) -> Self {
        *self.methods.slot(verb) = Some(handler);
        self
    }

    /// Registers the GET handler.
    #[must_use]
    pub fn get(self, handler: HandlerFn<S>) -> Self {
        self.on(Verb::Get, handler)
    }

    /// Registers the PUT handler.
    #[must_use]
    pub fn put(self, handler: HandlerFn<S>) -> Self {
        self.on(Verb::Put, handler)
    }

    /// Registers the POST handler.
    #[must_use]
    pub fn post(self, handler: HandlerFn<S>) -> Self {
        self.on(Verb::Post, handler)
    }

    /// Registers the DELETE handler.
    #[must_use]
    pub fn delete(self, handler: HandlerFn<S>) -> Self {
        self.on(Verb::Delete, handler)
    }

    /// Appends a child node.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    fn build(self) -> Result<Node<S>, TreeError> {
        if self.children.len() > MAX_CHILDREN {
            return Err(TreeError::TooManyChildren {
                parent: self.name,
                max: MAX_CHILDREN,
            });
        }
        let mut children: Vec<Node<S>> = Vec::with_capacity(self.children.len());
        for builder in self.children {
            if builder.name.is_empty() || builder.name.contains(SEPARATOR) {
                return Err(TreeError::InvalidName {
                    parent: self.name,
                    name: builder.name,
                });
            }
            if children.iter().any(|existing| existing.name == builder.name) {
                return Err(TreeError::DuplicateChild {
                    parent: self.name,
                    name: builder.name,
                });
            }
            children.push(builder.build()?);
        }
        Ok(Node {
            name: self.name,
            children,
            methods: self.methods,
        })
    }
}

/// Immutable routing tree.
pub struct DispatchTree<S> {
    root: Node<S>,
}

impl<S> fmt::Debug for DispatchTree<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTree")
            .field("root", &self.root)
            .finish()
    }
}

impl<S> DispatchTree<S> {
    /// Freezes `root` and its descendants.
    ///
    /// # Errors
    ///
    /// Rejects duplicate or malformed child names and nodes with more than
    /// [`MAX_CHILDREN`] children.
    pub fn build(root: NodeBuilder<S>) -> Result<Self, TreeError> {
        Ok(Self { root: root.build()? })
    }

    /// The unnamed root node.
    #[must_use]
    pub const fn root(&self) -> &Node<S> {
        &self.root
    }

    /// Resolves `path` to a node and the unconsumed remainder.
    ///
    /// Leading and repeated separators are skipped. Returns `None` when a
    /// segment names no child of a node that has children.
    #[must_use]
    pub fn lookup<'p>(&self, path: &'p str) -> Option<(&Node<S>, &'p str)> {
        let mut node = &self.root;
        let mut rest = path;
        loop {
            rest = rest.trim_start_matches(SEPARATOR);
            if rest.is_empty() || node.children.is_empty() {
                return Some((node, rest));
            }
            let (segment, tail) = rest.split_once(SEPARATOR).unwrap_or((rest, ""));
            node = node.child(segment)?;
            rest = tail;
        }
    }

    /// Routes `request` to its handler and runs it.
    ///
    /// # Errors
    ///
    /// [`CallError::UnknownPath`] when lookup fails,
    /// [`CallError::MethodNotSupported`] when the node has no handler for the
    /// verb, or the handler's own error.
    pub fn dispatch(&self, state: &S, request: &mut Request) -> Result<(), CallError> {
        let verb = request.verb.ok_or(WireError::MissingVerb)?;
        debug!(
            target: DISPATCH_TARGET,
            verb = %verb,
            path = %request.path,
            options = ?request.options(),
            "processing request"
        );
        let path = request.path.clone();
        let Some((node, remainder)) = self.lookup(&path) else {
            return Err(CallError::UnknownPath { path });
        };
        let handler = node
            .methods
            .handler(verb)
            .ok_or(CallError::MethodNotSupported { verb })?;
        let context = DispatchContext { tree: self, state };
        handler(&context, remainder, request).map_err(|error| {
            warn!(
                target: DISPATCH_TARGET,
                verb = %verb,
                path = %path,
                error = %error,
                "handler failed"
            );
            CallError::Handler(error)
        })
    }

    /// Discovery document listing every node and the verbs it implements.
    #[must_use]
    pub fn describe(&self) -> XmlNode {
        meta::describe(&self.root)
    }
}
