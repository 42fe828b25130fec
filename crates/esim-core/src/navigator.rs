//! # Navigator
//!
//! Abstracts "where is the user" and "send the user somewhere" so the HTTP
//! layer can redirect to login on 401 and checkout can move to the success
//! page or a provider URL.

use crate::route::{Navigation, Route};
use std::sync::{Arc, Mutex, MutexGuard};

pub trait Navigator: Send + Sync {
    /// The page the user is currently on
    fn current_route(&self) -> Route;

    /// Move to a page of this site or to an external URL
    fn navigate(&self, to: Navigation);
}

pub type SharedNavigator = Arc<dyn Navigator>;

#[derive(Debug, Default)]
struct NavState {
    current: Route,
    history: Vec<Navigation>,
}

/// In-process navigator that records every transition.
///
/// External navigations are recorded but leave the current route unchanged,
/// since the user has left the site.
#[derive(Debug, Default)]
pub struct MemoryNavigator {
    state: Mutex<NavState>,
}

impl MemoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(route: Route) -> Self {
        Self {
            state: Mutex::new(NavState {
                current: route,
                history: Vec::new(),
            }),
        }
    }

    /// Every navigation requested so far, oldest first
    pub fn history(&self) -> Vec<Navigation> {
        self.lock().history.clone()
    }

    pub fn last(&self) -> Option<Navigation> {
        self.lock().history.last().cloned()
    }

    /// Set the current page without recording a navigation
    pub fn set_current(&self, route: Route) {
        self.lock().current = route;
    }

    fn lock(&self) -> MutexGuard<'_, NavState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Navigator for MemoryNavigator {
    fn current_route(&self) -> Route {
        self.lock().current.clone()
    }

    fn navigate(&self, to: Navigation) {
        let mut state = self.lock();
        if let Navigation::Route(route) = &to {
            state.current = route.clone();
        }
        state.history.push(to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_navigation_updates_current() {
        let nav = MemoryNavigator::starting_at(Route::AdminDashboard);
        nav.navigate(Route::AdminLogin.into());

        assert_eq!(nav.current_route(), Route::AdminLogin);
        assert_eq!(nav.history(), vec![Navigation::Route(Route::AdminLogin)]);
    }

    #[test]
    fn test_external_navigation_is_recorded_only() {
        let nav = MemoryNavigator::starting_at(Route::Payment { plan: None });
        nav.navigate(Navigation::External("https://pay.uab.com.mm/p/1".to_string()));

        assert_eq!(nav.current_route(), Route::Payment { plan: None });
        assert_eq!(
            nav.last(),
            Some(Navigation::External("https://pay.uab.com.mm/p/1".to_string()))
        );
    }
}
