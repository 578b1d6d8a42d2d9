//! The page-side seams: inputs read at trigger time, the container the report
//! fragment lands in, the trigger control, and where errors are shown.

use std::sync::Arc;

use futures::Stream;
use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};

use crate::error::ReportError;

/// A form input. Read synchronously whenever the trigger fires.
pub trait InputField: Send + Sync {
    fn value(&self) -> String;
}

/// Where the report fragment goes. Every call replaces the previous contents.
pub trait DisplayContainer: Send + Sync {
    fn set_html(&self, html: String);
}

/// Where failed requests are reported. The display container is never
/// touched on failure.
pub trait ErrorDisplay: Send + Sync {
    fn show_error(&self, err: &ReportError);
}

impl<T: InputField + ?Sized> InputField for Arc<T> {
    fn value(&self) -> String {
        (**self).value()
    }
}

impl<T: DisplayContainer + ?Sized> DisplayContainer for Arc<T> {
    fn set_html(&self, html: String) {
        (**self).set_html(html)
    }
}

impl<T: ErrorDisplay + ?Sized> ErrorDisplay for Arc<T> {
    fn show_error(&self, err: &ReportError) {
        (**self).show_error(err)
    }
}

/// Default error display, just logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogErrors;

impl ErrorDisplay for LogErrors {
    fn show_error(&self, err: &ReportError) {
        error!("Guild report request failed: {}", err);
    }
}

/// Text box. Clones share the same value, so keep one to type into and hand
/// another to the form.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: Arc<RwLock<String>>,
}

impl TextInput {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Arc::new(RwLock::new(value.into())),
        }
    }

    pub fn set(&self, value: impl Into<String>) {
        *self.value.write() = value.into();
    }
}

impl InputField for TextInput {
    fn value(&self) -> String {
        self.value.read().clone()
    }
}

#[derive(Debug, Default)]
struct ContainerInner {
    html: String,
    updates: usize,
}

/// In-memory display container. Clones share contents.
#[derive(Debug, Clone, Default)]
pub struct HtmlContainer {
    inner: Arc<Mutex<ContainerInner>>,
}

impl HtmlContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn html(&self) -> String {
        self.inner.lock().html.clone()
    }

    /// How many times the contents were replaced.
    pub fn updates(&self) -> usize {
        self.inner.lock().updates
    }
}

impl DisplayContainer for HtmlContainer {
    fn set_html(&self, html: String) {
        let mut inner = self.inner.lock();
        inner.html = html;
        inner.updates += 1;
    }
}

/// The submit button.
///
/// Each `click()` is broadcast to every bound handler. `close()` (or dropping
/// the control) ends the bound handlers' trigger streams.
#[derive(Debug)]
pub struct TriggerControl {
    clicks: Mutex<Option<broadcast::Sender<()>>>,
}

impl TriggerControl {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(128);
        Self {
            clicks: Mutex::new(Some(tx)),
        }
    }

    /// Returns how many handlers saw the click.
    pub fn click(&self) -> usize {
        match self.clicks.lock().as_ref() {
            Some(tx) => tx.send(()).unwrap_or(0),
            None => {
                debug!("Click on closed trigger ignored");
                0
            }
        }
    }

    pub fn close(&self) {
        self.clicks.lock().take();
    }

    pub fn is_closed(&self) -> bool {
        self.clicks.lock().is_none()
    }

    /// Stream of activations. Ends once the control is closed.
    ///
    /// Clicks that arrive faster than they are consumed are dropped with a
    /// warning once the buffer is full.
    pub fn clicks(&self) -> impl Stream<Item = ()> {
        let rx = match self.clicks.lock().as_ref() {
            Some(tx) => tx.subscribe(),
            None => {
                // already closed, hand out a receiver that ends immediately.
                let (tx, rx) = broadcast::channel(1);
                drop(tx);
                rx
            }
        };

        BroadcastStream::new(rx).filter_map(|click| match click {
            Ok(()) => Some(()),
            Err(tokio_stream::wrappers::errors::BroadcastStreamRecvError::Lagged(n)) => {
                warn!("[TriggerControl::clicks] Too many clicks at once! Had to drop {} clicks", n);
                None
            }
        })
    }
}

impl Default for TriggerControl {
    fn default() -> Self {
        Self::new()
    }
}
