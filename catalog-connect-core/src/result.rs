//! Lazy result envelopes returned by connections.
//!
//! A connector produces its items incrementally, often while reading files or calling
//! remote APIs. [`ItemStream`] wraps that production as a pull-based, single-pass
//! [`Stream`]. Consumers must not iterate twice: once the stream is exhausted or
//! closed, further polls yield `None`. The producer may attach a release hook that runs
//! exactly once, when the stream ends, is closed, or is dropped.

use crate::action::ItemAction;
use crate::metrics::ConnectorMetrics;
use crate::reference::ItemInventory;
use crate::ConnectorResult;
use futures::stream::{self, BoxStream, FusedStream, Stream, StreamExt, TryStreamExt};
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tracing::debug;

type ReleaseHook = Box<dyn FnOnce() + Send>;

/// Single-pass stream of connector output.
pub struct ItemStream<T> {
    inner: Option<BoxStream<'static, ConnectorResult<T>>>,
    release: Option<ReleaseHook>,
    yielded: u64,
}

impl<T: Send + 'static> ItemStream<T> {
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = ConnectorResult<T>> + Send + 'static,
    {
        Self {
            inner: Some(stream.boxed()),
            release: None,
            yielded: 0,
        }
    }

    /// Wrap a blocking iterator; each element is produced on demand.
    pub fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = ConnectorResult<T>>,
        I::IntoIter: Send + 'static,
    {
        Self::new(stream::iter(iter))
    }

    pub fn empty() -> Self {
        Self::new(stream::empty())
    }

    /// Run `hook` once when the stream is exhausted, closed or dropped.
    pub fn with_release(mut self, hook: impl FnOnce() + Send + 'static) -> Self {
        self.release = Some(Box::new(hook));
        self
    }

    /// Observe every element, successful or not, without consuming it.
    pub fn inspect(mut self, f: impl Fn(&ConnectorResult<T>) + Send + 'static) -> Self {
        let inner = self.inner.take();
        let release = self.release.take();
        Self {
            inner: inner.map(|s| StreamExt::inspect(s, move |item| f(item)).boxed()),
            release,
            yielded: self.yielded,
        }
    }

    /// Observe every successfully produced element without consuming it.
    pub fn inspect_ok(self, f: impl Fn(&T) + Send + 'static) -> Self {
        self.inspect(move |item| {
            if let Ok(item) = item {
                f(item);
            }
        })
    }

    /// Drain the stream, stopping at the first error.
    pub async fn try_collect_all(self) -> ConnectorResult<Vec<T>> {
        self.try_collect().await
    }
}

impl<T> ItemStream<T> {
    /// Stop consuming and release the producer's resources.
    pub fn close(&mut self) {
        if self.inner.take().is_some() {
            debug!(yielded = self.yielded, "Closing item stream before exhaustion");
        }
        self.run_release();
    }

    /// Number of elements yielded so far
    pub fn yielded(&self) -> u64 {
        self.yielded
    }

    fn run_release(&mut self) {
        if let Some(hook) = self.release.take() {
            debug!(yielded = self.yielded, "Releasing item stream resources");
            hook();
        }
    }
}

impl<T> Stream for ItemStream<T> {
    type Item = ConnectorResult<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let Some(inner) = this.inner.as_mut() else {
            return Poll::Ready(None);
        };

        match inner.as_mut().poll_next(cx) {
            Poll::Ready(Some(item)) => {
                this.yielded += 1;
                Poll::Ready(Some(item))
            }
            Poll::Ready(None) => {
                this.inner = None;
                this.run_release();
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> FusedStream for ItemStream<T> {
    fn is_terminated(&self) -> bool {
        self.inner.is_none()
    }
}

impl<T> Drop for ItemStream<T> {
    fn drop(&mut self) {
        self.run_release();
    }
}

impl<T> fmt::Debug for ItemStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemStream")
            .field("finished", &self.inner.is_none())
            .field("yielded", &self.yielded)
            .finish()
    }
}

/// Output of a synchronization: the actions to apply, in production order.
#[derive(Debug)]
pub struct SynchronizeResult {
    items: ItemStream<ItemAction>,
}

impl SynchronizeResult {
    pub fn new(items: ItemStream<ItemAction>) -> Self {
        Self { items }
    }

    pub fn from_iter<I>(actions: I) -> Self
    where
        I: IntoIterator<Item = ItemAction>,
        I::IntoIter: Send + 'static,
    {
        Self::new(ItemStream::from_iter(actions.into_iter().map(Ok)))
    }

    pub fn with_release(self, hook: impl FnOnce() + Send + 'static) -> Self {
        Self {
            items: self.items.with_release(hook),
        }
    }

    /// Count every produced action, and every error the stream yields, in `metrics`.
    pub fn with_metrics(self, metrics: Arc<ConnectorMetrics>) -> Self {
        Self {
            items: self.items.inspect(move |item| match item {
                Ok(action) => metrics.record_action(action),
                Err(_) => metrics.record_stream_error(),
            }),
        }
    }

    pub fn items(&mut self) -> &mut ItemStream<ItemAction> {
        &mut self.items
    }

    pub fn into_stream(self) -> ItemStream<ItemAction> {
        self.items
    }
}

/// Output of an inventory: every item the connection can extract.
#[derive(Debug)]
pub struct InventoryResult {
    items: ItemStream<ItemInventory>,
}

impl InventoryResult {
    pub fn new(items: ItemStream<ItemInventory>) -> Self {
        Self { items }
    }

    pub fn from_iter<I>(inventory: I) -> Self
    where
        I: IntoIterator<Item = ItemInventory>,
        I::IntoIter: Send + 'static,
    {
        Self::new(ItemStream::from_iter(inventory.into_iter().map(Ok)))
    }

    pub fn with_release(self, hook: impl FnOnce() + Send + 'static) -> Self {
        Self {
            items: self.items.with_release(hook),
        }
    }

    pub fn items(&mut self) -> &mut ItemStream<ItemInventory> {
        &mut self.items
    }

    pub fn into_stream(self) -> ItemStream<ItemInventory> {
        self.items
    }
}
