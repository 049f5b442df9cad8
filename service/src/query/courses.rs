//! [`Query`] collection related to the multiple [`Course`]s.

use common::operations::Select;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{course, Course},
    infra::{backend, Backend},
    read::course::list,
    Service,
};

use super::Query;

/// Queries a page of [`course::View`]s.
///
/// Inactive [`Course`]s are dropped, so a page may hold fewer items than
/// requested.
#[derive(Clone, Debug)]
pub struct List(pub list::Selector);

impl<B> Query<List> for Service<B>
where
    B: Backend<
        Select<backend::Request>,
        Ok = backend::Envelope,
        Err = Traced<backend::Error>,
    >,
{
    type Ok = list::Page;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        List(selector): List,
    ) -> Result<Self::Ok, Self::Err> {
        let request = backend::Request::new(&selector);
        let page = self
            .backend()
            .execute(Select(request))
            .await
            .map_err(tracerr::wrap!())?
            .into_page()
            .map_err(|e| tracerr::new!(e))?;

        let config = self.config();
        let now = self.now();
        let received = page.items.len();
        let items = page
            .items
            .into_iter()
            .map(|raw| Course::normalize(raw, &config.currency))
            .filter(|c| c.active)
            .map(|c| course::View::derive(c, &config.rules, now))
            .collect::<Vec<_>>();
        if items.len() < received {
            log::debug!(
                "dropped {} inactive courses of page {}",
                received - items.len(),
                selector.arguments.page
            );
        }

        Ok(list::Page {
            items,
            meta: page.meta,
        })
    }
}

#[cfg(test)]
mod spec {
    use std::num::NonZeroU32;

    use common::{pagination::Arguments, DateTime};
    use serde_json::json;

    use super::List;
    use crate::{
        fake::FakeBackend,
        infra::backend::{self, Envelope},
        read::course::{list::Selector, FilterState},
        Query as _,
    };

    fn selector(page: u32) -> Selector {
        Selector {
            arguments: Arguments {
                page: NonZeroU32::new(page).unwrap(),
                per_page: NonZeroU32::new(10).unwrap(),
            },
            filter: FilterState::default(),
        }
    }

    #[tokio::test]
    async fn normalizes_and_drops_inactive() {
        let backend = FakeBackend::default().with_page(
            1,
            Ok(Envelope::success(
                vec![
                    json!({"id": 1, "title": "Basic Math", "price": "10"}),
                    json!({"id": 2, "active": false}),
                    json!("garbage"),
                    json!({"id": 3, "currency": null}),
                ],
                None,
            )),
        );
        let svc = FakeBackend::service(backend.clone());

        let page = svc.execute(List(selector(1))).await.unwrap();

        let ids = page.items.iter().map(|v| v.id.to_string()).collect::<Vec<_>>();
        assert_eq!(ids, ["1", "3"]);
        assert_eq!(page.items[1].price.currency.to_string(), "EGP");
        assert!(!page.has_more());
        assert_eq!(backend.requests()[0].page, 1);
    }

    #[tokio::test]
    async fn derives_at_service_clock() {
        let backend = FakeBackend::default().with_page(
            1,
            Ok(Envelope::success(
                vec![
                    json!({"id": 1, "created_at": "2024-04-28 09:00:00"}),
                    json!({"id": 2, "created_at": "2024-04-20"}),
                ],
                None,
            )),
        );
        let svc = FakeBackend::service(backend).with_clock(|| {
            DateTime::parse_lenient("2024-05-01T10:00:00Z").unwrap()
        });

        let page = svc.execute(List(selector(1))).await.unwrap();

        assert!(page.items[0].is_new);
        assert!(!page.items[1].is_new);
    }

    #[tokio::test]
    async fn rejected_envelope_is_error() {
        let backend = FakeBackend::default().with_page(
            1,
            Ok(Envelope {
                result: Some("Error".into()),
                message: Some("maintenance".into()),
                ..Envelope::default()
            }),
        );
        let svc = FakeBackend::service(backend);

        let err = svc.execute(List(selector(1))).await.unwrap_err();

        assert!(matches!(
            err.into_inner(),
            backend::Error::Rejected { message, .. } if message == "maintenance",
        ));
    }

    #[tokio::test]
    async fn missing_page_is_status_error() {
        let svc = FakeBackend::service(FakeBackend::default());

        let err = svc.execute(List(selector(3))).await.unwrap_err();

        assert!(matches!(err.into_inner(), backend::Error::Status(404)));
    }
}
