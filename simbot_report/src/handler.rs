//! Wires the form, the trigger and the display container together.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use futures::{stream::FuturesUnordered, StreamExt};
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::{
    config::ResponseOrdering,
    request::ReportRequest,
    source::ReportSource,
    ui::{DisplayContainer, ErrorDisplay, InputField, LogErrors, TriggerControl},
};

/// The five inputs of the guild report form.
pub struct ReportForm {
    region: Box<dyn InputField>,
    weeks: Box<dyn InputField>,
    difficulty: Box<dyn InputField>,
    /// The `guildname` input, sent as `guild`.
    guild: Box<dyn InputField>,
    realm: Box<dyn InputField>,
}

impl ReportForm {
    pub fn new(
        region: impl InputField + 'static,
        weeks: impl InputField + 'static,
        difficulty: impl InputField + 'static,
        guild: impl InputField + 'static,
        realm: impl InputField + 'static,
    ) -> Self {
        Self {
            region: Box::new(region),
            weeks: Box::new(weeks),
            difficulty: Box::new(difficulty),
            guild: Box::new(guild),
            realm: Box::new(realm),
        }
    }

    /// Read all five inputs right now.
    pub fn snapshot(&self) -> ReportRequest {
        ReportRequest {
            region: self.region.value(),
            weeks: self.weeks.value(),
            difficulty: self.difficulty.value(),
            guild: self.guild.value(),
            realm: self.realm.value(),
        }
    }
}

impl std::fmt::Debug for ReportForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ReportForm").field(&self.snapshot()).finish()
    }
}

/// On every trigger, sends the form to the report source and puts whatever
/// comes back into the display container.
///
/// Triggers never wait for each other. With [`ResponseOrdering::LastArrival`]
/// a slow response to an old trigger can overwrite a newer one.
pub struct FormSubmitHandler {
    form: ReportForm,
    container: Box<dyn DisplayContainer>,
    errors: Box<dyn ErrorDisplay>,
    source: Arc<dyn ReportSource>,
    ordering: ResponseOrdering,

    /// Generation of the most recent trigger.
    triggered: AtomicU64,
    /// Generation whose response is currently on display, 0 for none.
    shown: Mutex<u64>,
}

impl FormSubmitHandler {
    pub fn new(
        form: ReportForm,
        container: impl DisplayContainer + 'static,
        source: impl ReportSource,
    ) -> Self {
        Self {
            form,
            container: Box::new(container),
            errors: Box::new(LogErrors),
            source: Arc::new(source),
            ordering: ResponseOrdering::default(),
            triggered: AtomicU64::new(0),
            shown: Mutex::new(0),
        }
    }

    pub fn with_ordering(mut self, ordering: ResponseOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn with_error_display(mut self, errors: impl ErrorDisplay + 'static) -> Self {
        self.errors = Box::new(errors);
        self
    }

    /// How many times this handler has been triggered.
    pub fn triggers(&self) -> u64 {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Snapshot the form and fire off the request.
    ///
    /// Returns immediately. The handle resolves once the response has been
    /// applied, dropped as stale, or reported as an error. Must be called
    /// from within a tokio runtime.
    pub fn on_trigger(self: &Arc<Self>) -> JoinHandle<()> {
        let request = self.form.snapshot();
        let generation = self.triggered.fetch_add(1, Ordering::SeqCst) + 1;

        for advisory in request.advisories() {
            warn!("[trigger #{}] {}", generation, advisory);
        }
        debug!("[trigger #{}] Requesting guild report {:?}", generation, request);

        let this = self.clone();
        tokio::spawn(async move { this.complete(generation, request).await })
    }

    async fn complete(&self, generation: u64, request: ReportRequest) {
        match self.source.fetch(&request).await {
            Ok(html) => {
                self.apply(generation, html);
            }
            Err(err) => {
                debug!("[trigger #{}] Failed: {:?}", generation, err);
                self.errors.show_error(&err);
            }
        }
    }

    /// Returns whether the fragment made it into the container.
    fn apply(&self, generation: u64, html: String) -> bool {
        let mut shown = self.shown.lock();
        if self.ordering == ResponseOrdering::LatestTrigger && generation < *shown {
            debug!(
                "[trigger #{}] Dropping stale report, #{} is already displayed",
                generation, *shown
            );
            return false;
        }

        info!("[trigger #{}] Displaying guild report ({} bytes)", generation, html.len());
        self.container.set_html(html);
        *shown = generation;
        true
    }

    /// Call [`on_trigger`](Self::on_trigger) for every click of `trigger`.
    ///
    /// The returned task ends once the trigger is closed and all requests it
    /// started have finished.
    pub fn bind(self: &Arc<Self>, trigger: &TriggerControl) -> JoinHandle<()> {
        let clicks = trigger.clicks();
        let this = self.clone();

        tokio::spawn(async move {
            tokio::pin!(clicks);
            let mut in_flight = FuturesUnordered::new();

            loop {
                tokio::select! {
                    click = clicks.next() => match click {
                        Some(()) => in_flight.push(this.on_trigger()),
                        None => break,
                    },
                    Some(done) = in_flight.next(), if !in_flight.is_empty() => {
                        if let Err(err) = done {
                            error!("Report task died: {:?}", err);
                        }
                    }
                }
            }

            trace!("Trigger closed, waiting for {} pending reports", in_flight.len());
            while let Some(done) = in_flight.next().await {
                if let Err(err) = done {
                    error!("Report task died: {:?}", err);
                }
            }
        })
    }
}

impl std::fmt::Debug for FormSubmitHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormSubmitHandler")
            .field("form", &self.form)
            .field("ordering", &self.ordering)
            .field("triggered", &self.triggers())
            .field("shown", &*self.shown.lock())
            .finish()
    }
}
