use std::collections::HashMap;

use url::Url;

/// Interactive-target handle for one link destination.
///
/// Handles are stable for the lifetime of the registry that issued them: every link to the
/// same destination in a document resolves to the same id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(pub usize);

/// Destination string to [`LinkId`] map, populated lazily while a document is rendered.
#[derive(Clone, Debug, Default)]
pub struct LinkRegistry {
    by_dest: HashMap<String, LinkId>,
    dests: Vec<String>,
}

impl LinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle for `dest`, creating it on first use.
    pub fn get_or_insert(&mut self, dest: &str) -> LinkId {
        if let Some(id) = self.by_dest.get(dest) {
            return *id;
        }
        let id = LinkId(self.dests.len());
        self.dests.push(dest.to_string());
        self.by_dest.insert(dest.to_string(), id);
        id
    }

    pub fn get(&self, dest: &str) -> Option<LinkId> {
        self.by_dest.get(dest).copied()
    }

    pub fn destination(&self, id: LinkId) -> Option<&str> {
        self.dests.get(id.0).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.dests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dests.is_empty()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (LinkId, &str)> + '_ {
        self.dests
            .iter()
            .enumerate()
            .map(|(i, d)| (LinkId(i), d.as_str()))
    }

    pub fn clear(&mut self) {
        self.by_dest.clear();
        self.dests.clear();
    }
}

/// Resolves a relative `dest` against `base_url`.
///
/// Absolute URLs, fragment-only links and unparsable inputs are returned unchanged.
pub fn resolve_destination(base_url: Option<&Url>, dest: &str) -> String {
    let Some(base) = base_url else {
        return dest.to_string();
    };
    if dest.starts_with('#') || Url::parse(dest).is_ok() {
        return dest.to_string();
    }
    match base.join(dest) {
        Ok(u) => u.to_string(),
        Err(err) => {
            log::debug!("cannot resolve link {dest:?} against {base}: {err}");
            dest.to_string()
        }
    }
}
