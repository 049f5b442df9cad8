//! In-memory fakes for tests.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use common::operations::Select;
use tracerr::Traced;

use crate::{
    infra::backend::{self, Backend, Envelope, Request},
    Config, Service,
};

/// In-memory [`Backend`] serving predefined pages.
///
/// Missing pages are answered with `404` status.
#[derive(Clone, Debug, Default)]
pub(crate) struct FakeBackend {
    /// Responses per page number, served in order; the last one repeats.
    pages: Arc<Mutex<HashMap<u32, VecDeque<Result<Envelope, backend::Error>>>>>,

    /// Received [`Request`]s.
    requests: Arc<Mutex<Vec<Request>>>,
}

impl FakeBackend {
    /// Queues the provided response of the `page`.
    pub(crate) fn with_page(
        self,
        page: u32,
        response: Result<Envelope, backend::Error>,
    ) -> Self {
        self.pages
            .lock()
            .unwrap()
            .entry(page)
            .or_default()
            .push_back(response);
        self
    }

    /// Returns the [`Request`]s received so far.
    pub(crate) fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    /// Creates a [`Service`] on top of the provided [`FakeBackend`].
    pub(crate) fn service(backend: Self) -> Service<Self> {
        Service::new(Config::default(), backend)
    }
}

impl Backend<Select<Request>> for FakeBackend {
    type Ok = Envelope;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Select(request): Select<Request>,
    ) -> Result<Self::Ok, Self::Err> {
        let page = request.page;
        self.requests.lock().unwrap().push(request);

        let mut pages = self.pages.lock().unwrap();
        let Some(queue) = pages.get_mut(&page) else {
            return Err(tracerr::new!(backend::Error::Status(404)));
        };
        let response = if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap()
        };
        response.map_err(|e| tracerr::new!(e))
    }
}
