//! In-memory document source for tests.

use super::{ConnectionTarget, Connector, DocumentCursor, DocumentSource, QuerySpec, decode_raw};
use crate::Result;
use core::cell::RefCell;
use core::time::Duration;
use mongodb::bson::{Document, RawDocument};
use ohno::{IntoAppError, app_err, bail};
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub enum FakeItem {
    Document(Document),

    /// Raw bytes handed to the BSON decoder as-is.
    Raw(Vec<u8>),

    /// The cursor fails when advancing onto this item.
    Failure(&'static str),
}

/// What the fake saw, shared between the connector and everything it creates.
#[derive(Debug, Default)]
pub struct FakeLog {
    pub connects: usize,
    pub queries: Vec<QuerySpec>,
    pub closed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FakeConnector {
    pub items: Vec<FakeItem>,
    pub refuse_connection: bool,
    pub reject_query: bool,
    pub log: Rc<RefCell<FakeLog>>,
}

impl FakeConnector {
    pub fn with_items(items: impl IntoIterator<Item = FakeItem>) -> Self {
        Self {
            items: items.into_iter().collect(),
            ..Self::default()
        }
    }

    /// BSON bytes whose first element has an invalid type marker.
    pub fn malformed_bytes() -> Vec<u8> {
        let mut bytes = mongodb::bson::to_vec(&mongodb::bson::doc! { "broken": 1 }).expect("serializable");
        bytes[4] = 0x20;
        bytes
    }
}

impl Connector for FakeConnector {
    type Source = FakeSource;

    async fn connect(&self, _target: &ConnectionTarget, _timeout: Duration) -> Result<FakeSource> {
        self.log.borrow_mut().connects += 1;
        if self.refuse_connection {
            bail!("connection refused");
        }

        Ok(FakeSource {
            items: self.items.clone(),
            reject_query: self.reject_query,
            log: Rc::clone(&self.log),
        })
    }
}

#[derive(Debug)]
pub struct FakeSource {
    items: Vec<FakeItem>,
    reject_query: bool,
    log: Rc<RefCell<FakeLog>>,
}

impl DocumentSource for FakeSource {
    type Cursor = FakeCursor;

    async fn find(&self, query: &QuerySpec) -> Result<FakeCursor> {
        self.log.borrow_mut().queries.push(query.clone());
        if self.reject_query {
            bail!("unknown operator: $bogus");
        }

        Ok(FakeCursor {
            pending: self.items.iter().cloned().collect(),
            current: None,
        })
    }

    async fn close(self) {
        self.log.borrow_mut().closed = true;
    }
}

#[derive(Debug)]
pub struct FakeCursor {
    pending: VecDeque<FakeItem>,
    current: Option<FakeItem>,
}

impl DocumentCursor for FakeCursor {
    async fn advance(&mut self) -> Result<bool> {
        match self.pending.pop_front() {
            None => {
                self.current = None;
                Ok(false)
            }
            Some(FakeItem::Failure(message)) => Err(app_err!("{message}")),
            Some(item) => {
                self.current = Some(item);
                Ok(true)
            }
        }
    }

    fn decode_current(&self) -> Result<Document> {
        match &self.current {
            Some(FakeItem::Document(document)) => Ok(document.clone()),
            Some(FakeItem::Raw(bytes)) => decode_raw(RawDocument::from_bytes(bytes).into_app_err("malformed BSON document")?),
            Some(FakeItem::Failure(_)) | None => bail!("cursor is not positioned on an item"),
        }
    }
}
