// src/router.rs

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use parking_lot::Mutex;
use serde::Serialize;

use crate::{
    error::AppError,
    pages::{self, View},
    state::AppState,
};

/// A page of the app plus its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    ExamList,
    Import,
    Take(String),
    Score(String),
    Review(String),
    Marked(String),
}

impl Route {
    /// Parses a hash-style token such as `#/exam/42` or `/score/42`.
    ///
    /// Anything unrecognized, including an empty token, resolves to the exam list.
    /// Segments after the id are ignored.
    pub fn parse(token: &str) -> Route {
        let clean = token.trim().trim_start_matches('#');
        let segments: Vec<&str> = clean.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["import"] => Route::Import,
            ["exam", id, ..] => Route::Take(id.to_string()),
            ["score", id, ..] => Route::Score(id.to_string()),
            ["review", id, ..] => Route::Review(id.to_string()),
            ["marked", id, ..] => Route::Marked(id.to_string()),
            _ => Route::ExamList,
        }
    }

    pub fn exam_id(&self) -> Option<&str> {
        match self {
            Route::ExamList | Route::Import => None,
            Route::Take(id) | Route::Score(id) | Route::Review(id) | Route::Marked(id) => {
                Some(id.as_str())
            }
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::ExamList => write!(f, "/exams"),
            Route::Import => write!(f, "/import"),
            Route::Take(id) => write!(f, "/exam/{id}"),
            Route::Score(id) => write!(f, "/score/{id}"),
            Route::Review(id) => write!(f, "/review/{id}"),
            Route::Marked(id) => write!(f, "/marked/{id}"),
        }
    }
}

/// What is currently shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Screen {
    pub route: String,
    pub view: View,
}

/// Proof that a dispatch started; only the newest one may commit.
#[derive(Debug)]
pub struct DispatchTicket {
    id: u64,
    route: Route,
}

impl DispatchTicket {
    pub fn route(&self) -> &Route {
        &self.route
    }
}

/// Holds the current route and the committed screen of the single local user.
///
/// Controllers suspend on catalog reads, so two dispatches can overlap. Each
/// dispatch takes a ticket from a monotonically increasing counter and its
/// view is committed only if no newer dispatch has started since.
#[derive(Debug)]
pub struct Navigator {
    current: Mutex<Route>,
    generation: AtomicU64,
    screen: Mutex<Option<Screen>>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            current: Mutex::new(Route::ExamList),
            generation: AtomicU64::new(0),
            screen: Mutex::new(None),
        }
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Route {
        self.current.lock().clone()
    }

    pub fn screen(&self) -> Option<Screen> {
        self.screen.lock().clone()
    }

    pub fn begin(&self, route: Route) -> DispatchTicket {
        let id = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        DispatchTicket { id, route }
    }

    /// Commits `view` unless a newer dispatch has begun. Returns the committed
    /// screen, or `None` when the ticket was stale and the view was dropped.
    pub fn commit(&self, ticket: DispatchTicket, view: View) -> Option<Screen> {
        let mut screen = self.screen.lock();
        if self.generation.load(Ordering::SeqCst) != ticket.id {
            tracing::debug!("Dropping stale render of {}", ticket.route);
            return None;
        }
        let committed = Screen {
            route: ticket.route.to_string(),
            view,
        };
        *screen = Some(committed.clone());
        Some(committed)
    }

    /// Goes to `token`. Navigating to the route already shown renders it again.
    ///
    /// The ticket is taken under the `current` lock so ticket order always
    /// matches the order in which `current` was written.
    pub async fn navigate(&self, state: &AppState, token: &str) -> Result<Option<Screen>, AppError> {
        let route = Route::parse(token);
        let ticket = {
            let mut current = self.current.lock();
            if *current == route {
                tracing::debug!("Refreshing {}", route);
            } else {
                tracing::debug!("Navigating {} -> {}", *current, route);
                *current = route.clone();
            }
            self.begin(route)
        };
        self.dispatch(state, ticket).await
    }

    pub async fn refresh(&self, state: &AppState) -> Result<Option<Screen>, AppError> {
        let ticket = {
            let current = self.current.lock();
            self.begin(current.clone())
        };
        self.dispatch(state, ticket).await
    }

    async fn dispatch(
        &self,
        state: &AppState,
        ticket: DispatchTicket,
    ) -> Result<Option<Screen>, AppError> {
        let view = pages::render(state, ticket.route()).await?;
        Ok(self.commit(ticket, view))
    }
}
