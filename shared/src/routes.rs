//! Route table and path resolution.
//!
//! The table is an ordered list of [`RouteEntry`] values fixed at start-up.
//! Resolution walks it top to bottom and the first structural match wins.
//! Entries may nest: a child pattern is relative to its parent, and a match
//! records the whole chain of entries from the outermost one inwards.

use std::collections::BTreeMap;

use thiserror::Error;

/// Where unauthenticated navigations to protected routes are sent.
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("top-level route pattern must start with '/': {0:?}")]
    NotAbsolute(String),

    #[error("nested route pattern must be relative: {0:?}")]
    NotRelative(String),

    #[error("route pattern {0:?} has a parameter without a name")]
    UnnamedParam(String),

    #[error("route name must not be empty (pattern {0:?})")]
    EmptyName(String),
}

/// One row of the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub pattern: String,
    pub name: String,
    pub requires_auth: bool,
    pub children: Vec<RouteEntry>,
}

impl RouteEntry {
    /// A route anyone can visit.
    pub fn public(pattern: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            name: name.into(),
            requires_auth: false,
            children: Vec::new(),
        }
    }

    /// A route that needs a valid session.
    pub fn protected(pattern: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            requires_auth: true,
            ..Self::public(pattern, name)
        }
    }

    pub fn with_children(mut self, children: Vec<RouteEntry>) -> Self {
        self.children = children;
        self
    }

    fn validate(&self, nested: bool) -> Result<(), RouteError> {
        if self.name.is_empty() {
            return Err(RouteError::EmptyName(self.pattern.clone()));
        }
        match (nested, self.pattern.starts_with('/')) {
            (false, false) => return Err(RouteError::NotAbsolute(self.pattern.clone())),
            (true, true) => return Err(RouteError::NotRelative(self.pattern.clone())),
            _ => {}
        }
        if segments(&self.pattern).any(|segment| segment == ":") {
            return Err(RouteError::UnnamedParam(self.pattern.clone()));
        }
        self.children.iter().try_for_each(|child| child.validate(true))
    }

    fn match_segments<'t>(&'t self, path: &[&str]) -> Option<Resolved<'t>> {
        let pattern: Vec<&str> = segments(&self.pattern).collect();
        if pattern.len() > path.len() {
            return None;
        }

        let mut params = Vec::new();
        for (expected, actual) in pattern.iter().zip(path) {
            match expected.strip_prefix(':') {
                Some(key) => params.push((key, decode_param(actual))),
                None if expected == actual => {}
                None => return None,
            }
        }

        let rest = &path[pattern.len()..];
        if rest.is_empty() {
            return Some(Resolved {
                chain: vec![self],
                params,
            });
        }

        let mut inner = self
            .children
            .iter()
            .find_map(|child| child.match_segments(rest))?;
        inner.chain.insert(0, self);
        params.append(&mut inner.params);
        inner.params = params;
        Some(inner)
    }
}

struct Resolved<'t> {
    chain: Vec<&'t RouteEntry>,
    params: Vec<(&'t str, String)>,
}

/// Result of resolving a path against a [`RouteTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'t> {
    /// Normalized path: no query, no fragment, no trailing slash.
    pub path: String,
    /// Matched entries, outermost first.
    pub chain: Vec<&'t RouteEntry>,
    pub params: BTreeMap<String, String>,
}

impl RouteMatch<'_> {
    /// True if any entry along the matched chain demands a session.
    pub fn requires_auth(&self) -> bool {
        self.chain.iter().any(|entry| entry.requires_auth)
    }

    /// Name of the innermost matched entry.
    pub fn name(&self) -> &str {
        self.chain.last().map_or("", |entry| entry.name.as_str())
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Build a table from entries, rejecting malformed patterns.
    pub fn new(entries: Vec<RouteEntry>) -> Result<Self, RouteError> {
        entries.iter().try_for_each(|entry| entry.validate(false))?;
        Ok(Self { entries })
    }

    /// The application's route table.
    pub fn canonical() -> Self {
        Self {
            entries: vec![
                RouteEntry::public("/", "Home"),
                RouteEntry::public("/apps", "Apps"),
                RouteEntry::public("/apps/:id", "AppDetail"),
                RouteEntry::protected("/upload", "Upload"),
                RouteEntry::public("/leaderboard", "Leaderboard"),
                RouteEntry::public(LOGIN_PATH, "Login"),
                RouteEntry::public("/register", "Register"),
                RouteEntry::public("/verify-email", "VerifyEmail"),
                RouteEntry::protected("/admin", "Admin"),
                RouteEntry::protected("/profile", "Profile"),
                RouteEntry::public("/posts", "Posts"),
                RouteEntry::public("/posts/:id", "PostDetail"),
                RouteEntry::public("/users", "Users"),
                RouteEntry::public("/users/:userId/posts", "UserPosts"),
                RouteEntry::public("/users/:userId/todos", "UserTodos"),
                RouteEntry::public("/users/:userId/albums", "UserAlbums"),
            ],
        }
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Resolve a navigation target. Unregistered paths yield `None`.
    pub fn resolve(&self, target: &str) -> Option<RouteMatch<'_>> {
        let path = strip_suffixes(target);
        let parts: Vec<&str> = segments(path).collect();

        let resolved = self
            .entries
            .iter()
            .find_map(|entry| entry.match_segments(&parts))?;

        Some(RouteMatch {
            path: format!("/{}", parts.join("/")),
            chain: resolved.chain,
            params: resolved
                .params
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        })
    }

    /// Whether navigating to `target` needs a session. Unmatched paths do not.
    pub fn requires_auth(&self, target: &str) -> bool {
        self.resolve(target)
            .map_or(false, |matched| matched.requires_auth())
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::canonical()
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

fn strip_suffixes(target: &str) -> &str {
    let end = target.find(&['?', '#'][..]).unwrap_or(target.len());
    &target[..end]
}

fn decode_param(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}
