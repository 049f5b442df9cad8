//! [`Loader`] of [`course::View`] pages.
//!
//! Every request is started with a `begin_*()` method returning a [`Ticket`],
//! and is finished with [`Loader::complete()`]. Starting a request supersedes
//! all the in-flight ones: their [`Ticket`]s become stale and their results
//! are discarded.

use std::{collections::HashSet, fmt, num::NonZeroU32};

use common::pagination::Arguments;
use serde::Serialize;
use tracing as log;

use crate::{
    domain::course,
    query::{self, Query},
    read::course::{filter, list, Facets, FilterState},
};

/// State of a [`Loader`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum State {
    /// Nothing requested yet.
    #[default]
    Idle,

    /// First page is being loaded.
    Loading,

    /// Pages are loaded.
    Ready,

    /// Next page is being loaded.
    LoadingMore,

    /// The last request failed, with the provided message.
    ///
    /// Previously loaded pages are kept.
    Error(String),
}

/// Kind of a [`Ticket`] request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Kind {
    /// First page, replacing everything loaded.
    Initial,

    /// Next page, appended to the loaded ones.
    More,
}

/// Handle of a single in-flight [`Loader`] request.
#[derive(Clone, Debug)]
pub struct Ticket {
    /// Generation of the [`Loader`] this [`Ticket`] was issued in.
    generation: u64,

    /// [`Kind`] of the request.
    kind: Kind,

    /// Page to request.
    selector: list::Selector,
}

impl Ticket {
    /// Returns [`list::Selector`] of the page to request.
    #[must_use]
    pub fn selector(&self) -> &list::Selector {
        &self.selector
    }

    /// Returns 1-based number of the page to request.
    #[must_use]
    pub fn page(&self) -> NonZeroU32 {
        self.selector.arguments.page
    }
}

/// Outcome of [`Loader::complete()`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Completion {
    /// Result was applied to the [`Loader`].
    Applied,

    /// [`Ticket`] was superseded, so the result was discarded.
    Stale,
}

/// Accumulator of [`course::View`] pages.
#[derive(Clone, Debug)]
pub struct Loader {
    /// Number of items per page.
    per_page: NonZeroU32,

    /// [`FilterState`] the pages are loaded for.
    filter: FilterState,

    /// Loaded items, unique by ID, in the order received.
    items: Vec<course::View>,

    /// [`Arguments`] of the last loaded page, if any.
    loaded: Option<Arguments>,

    /// Indicator whether there are pages after the [`Loader::loaded`] one.
    has_more: bool,

    /// Current [`State`].
    state: State,

    /// [`Kind`] of the last issued request.
    last: Kind,

    /// Counter of started requests.
    generation: u64,
}

impl Loader {
    /// Creates a new [`State::Idle`] [`Loader`] requesting pages of the
    /// provided size.
    #[must_use]
    pub fn new(per_page: NonZeroU32) -> Self {
        Self {
            per_page,
            filter: FilterState::default(),
            items: vec![],
            loaded: None,
            has_more: false,
            state: State::Idle,
            last: Kind::Initial,
            generation: 0,
        }
    }

    /// Returns the current [`State`] of this [`Loader`].
    #[must_use]
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Returns the loaded items, unfiltered.
    #[must_use]
    pub fn items(&self) -> &[course::View] {
        &self.items
    }

    /// Returns the [`FilterState`] the pages are loaded for.
    #[must_use]
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Indicates whether there are more pages to load.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Starts loading the first page for the provided [`FilterState`].
    ///
    /// Everything loaded before is replaced once the page arrives, and is kept
    /// if loading it fails.
    pub fn begin_fetch(&mut self, filter: FilterState) -> Ticket {
        self.filter = filter;
        self.state = State::Loading;
        self.issue(Kind::Initial)
    }

    /// Starts loading the next page.
    ///
    /// Returns [`None`] unless this [`Loader`] is [`State::Ready`] and has
    /// more pages.
    pub fn begin_load_more(&mut self) -> Option<Ticket> {
        if self.state != State::Ready || !self.has_more {
            return None;
        }
        self.state = State::LoadingMore;
        Some(self.issue(Kind::More))
    }

    /// Re-requests the page whose loading failed.
    ///
    /// Returns [`None`] unless this [`Loader`] is in [`State::Error`].
    pub fn begin_retry(&mut self) -> Option<Ticket> {
        if !matches!(self.state, State::Error(_)) {
            return None;
        }
        self.state = match self.last {
            Kind::Initial => State::Loading,
            Kind::More => State::LoadingMore,
        };
        Some(self.issue(self.last))
    }

    /// Applies the `result` of the request identified by the provided
    /// [`Ticket`].
    ///
    /// Results of superseded [`Ticket`]s are discarded without touching this
    /// [`Loader`].
    pub fn complete<E: fmt::Display>(
        &mut self,
        ticket: Ticket,
        result: Result<list::Page, E>,
    ) -> Completion {
        if ticket.generation != self.generation {
            log::debug!(
                page = ticket.page().get(),
                "discarding result of a stale request"
            );
            return Completion::Stale;
        }

        match result {
            Ok(page) => {
                let has_more = page.has_more();
                if ticket.kind == Kind::Initial {
                    self.items.clear();
                }
                let mut seen = self
                    .items
                    .iter()
                    .map(|v| v.id.clone())
                    .collect::<HashSet<_>>();
                self.items.extend(
                    page.items.into_iter().filter(|v| seen.insert(v.id.clone())),
                );
                self.loaded = Some(ticket.selector.arguments);
                self.has_more = has_more;
                self.state = State::Ready;
            }
            Err(e) => {
                log::warn!(page = ticket.page().get(), "failed to load courses: {e}");
                self.state = State::Error(e.to_string());
            }
        }
        Completion::Applied
    }

    /// Loads the first page for the provided [`FilterState`] with the
    /// provided [`Query`] executor.
    pub async fn fetch<S>(&mut self, svc: &S, filter: FilterState) -> Completion
    where
        S: Query<query::courses::List, Ok = list::Page, Err: fmt::Display>,
    {
        let ticket = self.begin_fetch(filter);
        self.run(svc, ticket).await
    }

    /// Loads the next page with the provided [`Query`] executor, if there is
    /// one.
    pub async fn load_more<S>(&mut self, svc: &S) -> Option<Completion>
    where
        S: Query<query::courses::List, Ok = list::Page, Err: fmt::Display>,
    {
        let ticket = self.begin_load_more()?;
        Some(self.run(svc, ticket).await)
    }

    /// Re-requests the failed page with the provided [`Query`] executor, if
    /// the last request failed.
    pub async fn retry<S>(&mut self, svc: &S) -> Option<Completion>
    where
        S: Query<query::courses::List, Ok = list::Page, Err: fmt::Display>,
    {
        let ticket = self.begin_retry()?;
        Some(self.run(svc, ticket).await)
    }

    /// Returns the [`View`] of this [`Loader`] for presentation.
    ///
    /// Filtering applies to the loaded pages only.
    #[must_use]
    pub fn view(&self) -> View {
        View {
            items: filter::apply(&self.items, &self.filter),
            has_more: self.has_more,
            loading: self.state == State::Loading,
            loading_more: self.state == State::LoadingMore,
            error: match &self.state {
                State::Error(e) => Some(e.clone()),
                State::Idle
                | State::Loading
                | State::Ready
                | State::LoadingMore => None,
            },
            facets: Facets::of(&self.items),
        }
    }

    /// Executes the request of the provided [`Ticket`] and completes it.
    async fn run<S>(&mut self, svc: &S, ticket: Ticket) -> Completion
    where
        S: Query<query::courses::List, Ok = list::Page, Err: fmt::Display>,
    {
        let result = svc
            .execute(query::courses::List(ticket.selector().clone()))
            .await;
        self.complete(ticket, result)
    }

    /// Issues a new [`Ticket`] of the provided [`Kind`], superseding all the
    /// previous ones.
    fn issue(&mut self, kind: Kind) -> Ticket {
        let first = Arguments::first(self.per_page);
        let arguments = match kind {
            Kind::Initial => first,
            Kind::More => self.loaded.map_or(first, Arguments::next),
        };

        self.generation += 1;
        self.last = kind;
        Ticket {
            generation: self.generation,
            kind,
            selector: list::Selector {
                arguments,
                filter: self.filter.clone(),
            },
        }
    }
}

/// Presentation of a [`Loader`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    /// Loaded items matching the [`FilterState`], in its sort order.
    pub items: Vec<course::View>,

    /// Indicator whether more pages can be loaded.
    pub has_more: bool,

    /// Indicator whether the first page is being loaded.
    pub loading: bool,

    /// Indicator whether the next page is being loaded.
    pub loading_more: bool,

    /// Message of the last failure, if any.
    pub error: Option<String>,

    /// [`Facets`] of the loaded items.
    pub facets: Facets,
}

#[cfg(test)]
mod spec {
    use std::num::NonZeroU32;

    use common::{pagination::Meta, DateTime};
    use serde_json::json;

    use super::{Completion, Loader, State};
    use crate::{
        domain::course::{self, Course, RawCourseRecord, Rules},
        fake::FakeBackend,
        infra::backend::{self, Envelope},
        read::course::{list, FilterState},
    };

    fn loader() -> Loader {
        Loader::new(NonZeroU32::new(2).unwrap())
    }

    fn page(ids: &[u32], current_page: u32, last_page: u32) -> list::Page {
        list::Page {
            items: ids
                .iter()
                .map(|id| {
                    course::View::derive(
                        Course::from(
                            RawCourseRecord::from_value(json!({
                                "id": id,
                                "subscribers_count": 100 - id,
                            }))
                            .unwrap(),
                        ),
                        &Rules::default(),
                        DateTime::from_unix_timestamp(0).unwrap(),
                    )
                })
                .collect(),
            meta: Some(Meta {
                current_page,
                last_page,
                ..Meta::default()
            }),
        }
    }

    fn ok(page: list::Page) -> Result<list::Page, &'static str> {
        Ok(page)
    }

    fn ids(loader: &Loader) -> Vec<String> {
        loader.items().iter().map(|v| v.id.to_string()).collect()
    }

    #[test]
    fn fetches_and_loads_more() {
        let mut loader = loader();
        assert_eq!(*loader.state(), State::Idle);
        assert!(loader.begin_load_more().is_none());

        let t = loader.begin_fetch(FilterState::default());
        assert_eq!(t.page().get(), 1);
        assert_eq!(t.selector().arguments.per_page.get(), 2);
        assert!(loader.view().loading);

        assert_eq!(loader.complete(t, ok(page(&[1, 2], 1, 2))), Completion::Applied);
        assert_eq!(*loader.state(), State::Ready);
        assert!(loader.has_more());

        let t = loader.begin_load_more().unwrap();
        assert_eq!(t.page().get(), 2);
        assert!(loader.view().loading_more);
        assert!(loader.begin_load_more().is_none());

        assert_eq!(loader.complete(t, ok(page(&[3, 4], 2, 2))), Completion::Applied);
        assert_eq!(ids(&loader), ["1", "2", "3", "4"]);
        assert!(!loader.has_more());
        assert!(loader.begin_load_more().is_none());
    }

    #[test]
    fn appended_duplicates_are_dropped() {
        let mut loader = loader();
        let t = loader.begin_fetch(FilterState::default());
        let _ = loader.complete(t, ok(page(&[1, 2], 1, 3)));

        let t = loader.begin_load_more().unwrap();
        let _ = loader.complete(t, ok(page(&[2, 3], 2, 3)));

        assert_eq!(ids(&loader), ["1", "2", "3"]);
    }

    #[test]
    fn stale_results_are_discarded() {
        let mut loader = loader();
        let old = loader.begin_fetch(FilterState::default());
        let new = loader.begin_fetch(FilterState {
            sort: "newest".into(),
            ..FilterState::default()
        });

        assert_eq!(loader.complete(old, ok(page(&[9], 1, 5))), Completion::Stale);
        assert!(loader.items().is_empty());
        assert_eq!(*loader.state(), State::Loading);

        assert_eq!(loader.complete(new, ok(page(&[1], 1, 1))), Completion::Applied);
        assert_eq!(ids(&loader), ["1"]);
        assert_eq!(loader.filter().sort, "newest");
    }

    #[test]
    fn load_more_superseded_by_fetch() {
        let mut loader = loader();
        let t = loader.begin_fetch(FilterState::default());
        let _ = loader.complete(t, ok(page(&[1, 2], 1, 2)));

        let more = loader.begin_load_more().unwrap();
        let fetch = loader.begin_fetch(FilterState::default());

        assert_eq!(loader.complete(more, ok(page(&[3], 2, 2))), Completion::Stale);
        assert_eq!(ids(&loader), ["1", "2"]);

        let _ = loader.complete(fetch, ok(page(&[5], 1, 1)));
        assert_eq!(ids(&loader), ["5"]);
    }

    #[test]
    fn stale_failure_is_discarded() {
        let mut loader = loader();
        let old = loader.begin_fetch(FilterState::default());
        let _new = loader.begin_fetch(FilterState::default());

        assert_eq!(loader.complete(old, Err("boom")), Completion::Stale);
        assert_eq!(*loader.state(), State::Loading);
    }

    #[test]
    fn failure_keeps_loaded_pages() {
        let mut loader = loader();
        let t = loader.begin_fetch(FilterState::default());
        let _ = loader.complete(t, ok(page(&[1, 2], 1, 3)));

        let t = loader.begin_load_more().unwrap();
        let _ = loader.complete::<&str>(t, Err("timed out"));

        assert_eq!(*loader.state(), State::Error("timed out".into()));
        assert_eq!(ids(&loader), ["1", "2"]);
        assert!(loader.has_more());
        assert!(loader.begin_load_more().is_none());

        let view = loader.view();
        assert_eq!(view.error.as_deref(), Some("timed out"));
        assert_eq!(view.items.len(), 2);
    }

    #[test]
    fn failed_refetch_keeps_loaded_pages() {
        let mut loader = loader();
        let t = loader.begin_fetch(FilterState::default());
        let _ = loader.complete(t, ok(page(&[1, 2], 1, 2)));

        let t = loader.begin_fetch(FilterState::default());
        assert!(loader.view().loading);
        assert_eq!(ids(&loader), ["1", "2"]);

        let _ = loader.complete::<&str>(t, Err("down"));

        assert_eq!(*loader.state(), State::Error("down".into()));
        assert_eq!(ids(&loader), ["1", "2"]);
        assert!(loader.has_more());
        assert_eq!(loader.view().items.len(), 2);

        let t = loader.begin_retry().unwrap();
        assert_eq!(t.page().get(), 1);
        assert!(loader.view().loading);

        let _ = loader.complete(t, ok(page(&[7], 1, 1)));
        assert_eq!(ids(&loader), ["7"]);
        assert!(!loader.has_more());
        assert_eq!(*loader.state(), State::Ready);
    }

    #[test]
    fn retry_requests_failed_page() {
        let mut loader = loader();
        assert!(loader.begin_retry().is_none());

        let t = loader.begin_fetch(FilterState::default());
        let _ = loader.complete::<&str>(t, Err("down"));

        let t = loader.begin_retry().unwrap();
        assert_eq!(t.page().get(), 1);
        assert!(loader.view().loading);
        let _ = loader.complete(t, ok(page(&[1, 2], 1, 3)));
        assert!(loader.begin_retry().is_none());

        let t = loader.begin_load_more().unwrap();
        let _ = loader.complete::<&str>(t, Err("down"));

        let t = loader.begin_retry().unwrap();
        assert_eq!(t.page().get(), 2);
        assert!(loader.view().loading_more);
        let _ = loader.complete(t, ok(page(&[3, 4], 2, 3)));

        assert_eq!(ids(&loader), ["1", "2", "3", "4"]);
        assert_eq!(*loader.state(), State::Ready);
        assert_eq!(loader.begin_load_more().unwrap().page().get(), 3);
    }

    #[test]
    fn missing_meta_ends_pagination() {
        let mut loader = loader();
        let t = loader.begin_fetch(FilterState::default());
        let mut p = page(&[1], 1, 9);
        p.meta = None;

        let _ = loader.complete(t, ok(p));

        assert!(!loader.has_more());
    }

    #[test]
    fn view_filters_loaded_pages_only() {
        let mut loader = loader();
        let t = loader.begin_fetch(FilterState {
            search: "no such course".into(),
            ..FilterState::default()
        });
        let _ = loader.complete(t, ok(page(&[1, 2], 1, 4)));

        let view = loader.view();

        assert!(view.items.is_empty());
        assert!(view.has_more);
        assert_eq!(view.error, None);
        assert_eq!(view.facets.levels[0], "All");
    }

    #[tokio::test]
    async fn drives_service_queries() {
        let record = |id: u32| json!({"id": id, "title": format!("Course {id}")});
        let backend = FakeBackend::default()
            .with_page(
                1,
                Ok(Envelope::success(
                    vec![record(1), record(2)],
                    Some(Meta {
                        current_page: 1,
                        last_page: 2,
                        ..Meta::default()
                    }),
                )),
            )
            .with_page(2, Err(backend::Error::Transport("timed out".into())))
            .with_page(
                2,
                Ok(Envelope::success(
                    vec![record(3), json!({"id": 4, "active": false})],
                    Some(Meta {
                        current_page: 2,
                        last_page: 2,
                        ..Meta::default()
                    }),
                )),
            );
        let svc = FakeBackend::service(backend.clone());
        let mut loader = svc.loader();

        assert_eq!(
            loader.fetch(&svc, FilterState::default()).await,
            Completion::Applied,
        );
        assert_eq!(loader.load_more(&svc).await, Some(Completion::Applied));
        assert!(loader.view().error.unwrap().contains("timed out"));

        assert_eq!(loader.retry(&svc).await, Some(Completion::Applied));
        assert_eq!(ids(&loader), ["1", "2", "3"]);
        assert!(!loader.has_more());
        assert_eq!(loader.load_more(&svc).await, None);

        let pages = backend.requests().iter().map(|r| r.page).collect::<Vec<_>>();
        assert_eq!(pages, [1, 2, 2]);
        assert_eq!(backend.requests()[0].per_page, 12);
    }

    #[test]
    fn view_sorts_loaded_pages() {
        let mut loader = loader();
        let t = loader.begin_fetch(FilterState::default());
        let _ = loader.complete(t, ok(page(&[3, 1], 1, 2)));
        let t = loader.begin_load_more().unwrap();
        let _ = loader.complete(t, ok(page(&[2], 2, 2)));

        let items = loader.view().items;
        let ids = items.iter().map(|v| v.id.to_string()).collect::<Vec<_>>();

        assert_eq!(ids, ["1", "2", "3"]);
    }
}
