//! Client-side routes and the navigation capability

use std::{fmt, sync::Mutex};

use crate::models::{Kind, RecordId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    List(Kind),
    New(Kind),
    Edit(Kind, RecordId),
}

impl Route {
    /// Parse `/`, `/{kind}`, `/{kind}/new` or `/{kind}/edit/{id}`
    pub fn parse(path: &str) -> Option<Route> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Some(Route::Home),
            [kind] => Kind::from_segment(kind).map(Route::List),
            [kind, "new"] => Kind::from_segment(kind).map(Route::New),
            [kind, "edit", id] => {
                let kind = Kind::from_segment(kind)?;
                id.parse().ok().map(|id| Route::Edit(kind, id))
            }
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::List(kind) => format!("/{}", kind.segment()),
            Route::New(kind) => format!("/{}/new", kind.segment()),
            Route::Edit(kind, id) => format!("/{}/edit/{}", kind.segment(), id),
        }
    }

    pub fn kind(&self) -> Option<Kind> {
        match self {
            Route::Home => None,
            Route::List(kind) | Route::New(kind) | Route::Edit(kind, _) => Some(*kind),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Opaque "navigate to path X" capability
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &Route);
}

/// Navigator that only records where it was sent
#[derive(Debug, Default)]
pub struct History {
    visited: Mutex<Vec<Route>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Route> {
        self.visited().last().copied()
    }

    pub fn visited(&self) -> Vec<Route> {
        self.visited
            .lock()
            .map(|v| v.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl Navigator for History {
    fn navigate(&self, route: &Route) {
        tracing::debug!("Navigating to {}", route);
        let mut visited = self
            .visited
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        visited.push(*route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_routes() {
        assert_eq!(Route::parse("/"), Some(Route::Home));
        assert_eq!(Route::parse("/books"), Some(Route::List(Kind::Book)));
        assert_eq!(Route::parse("/magazines/new"), Some(Route::New(Kind::Magazine)));
        assert_eq!(Route::parse("/dvds/edit/12"), Some(Route::Edit(Kind::Dvd, 12)));
        assert_eq!(Route::parse("/dvds/edit/twelve"), None);
        assert_eq!(Route::parse("/comics"), None);
    }

    #[test]
    fn test_path_round_trip() {
        for kind in Kind::all() {
            for route in [Route::List(kind), Route::New(kind), Route::Edit(kind, 7)] {
                assert_eq!(Route::parse(&route.path()), Some(route));
            }
        }
    }

    #[test]
    fn test_history_records_navigation() {
        let history = History::new();
        assert_eq!(history.current(), None);
        history.navigate(&Route::List(Kind::Book));
        history.navigate(&Route::Edit(Kind::Book, 3));
        assert_eq!(history.current(), Some(Route::Edit(Kind::Book, 3)));
        assert_eq!(history.visited().len(), 2);
    }
}
