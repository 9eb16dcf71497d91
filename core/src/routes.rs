//! Static route table for the study tracker front end.
//!
//! The table only declares which view sits at which path. Navigation,
//! history and rendering belong to whatever router engine consumes it.

/// Views the front end can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Home,
}

/// History mode the router engine should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    /// Browser history API (clean paths, no `#`).
    Web,
}

/// One path-to-view mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub name: &'static str,
    pub view: View,
}

const ROUTES: &[Route] = &[Route {
    path: "/",
    name: "home",
    view: View::Home,
}];

/// Immutable route table handed to the router engine at start-up.
#[derive(Debug, Clone, Copy)]
pub struct RouteTable {
    routes: &'static [Route],
    history: HistoryMode,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            routes: ROUTES,
            history: HistoryMode::Web,
        }
    }
}

impl RouteTable {
    pub fn routes(&self) -> &'static [Route] {
        self.routes
    }

    pub fn history(&self) -> HistoryMode {
        self.history
    }

    /// Exact-match lookup by path.
    pub fn by_path(&self, path: &str) -> Option<&'static Route> {
        self.routes.iter().find(|r| r.path == path)
    }

    pub fn by_name(&self, name: &str) -> Option<&'static Route> {
        self.routes.iter().find(|r| r.name == name)
    }
}
