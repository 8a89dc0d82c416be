//! Async driver for [`ImageWatermark`]
//!
//! The host owns the component and performs the fetches its tickets ask
//! for. Loads run as tokio tasks; their results come back over a channel and
//! are applied on the caller's task, so the component and its surface are
//! only ever touched from one place.

use std::sync::Arc;

use tokio::sync::mpsc;
use watermark_image::{ImageData, ImageLoader};

use crate::component::{ImageWatermark, LoadTicket};
use crate::props::ImageWatermarkProps;
use crate::surface::Surface;

struct Completion {
    ticket: LoadTicket,
    result: watermark_image::Result<Arc<ImageData>>,
}

/// Runs the loads of one [`ImageWatermark`]
pub struct WatermarkHost<S: Surface> {
    component: ImageWatermark<S>,
    loader: ImageLoader,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl<S: Surface> WatermarkHost<S> {
    pub fn new(component: ImageWatermark<S>) -> Self {
        Self::with_loader(component, ImageLoader::new())
    }

    /// Share `loader` (and its decoded-image cache) with other hosts
    pub fn with_loader(component: ImageWatermark<S>, loader: ImageLoader) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            component,
            loader,
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn component(&self) -> &ImageWatermark<S> {
        &self.component
    }

    pub fn into_component(self) -> ImageWatermark<S> {
        self.component
    }

    /// Loads started but not yet applied
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Mount the component and start its first load.
    ///
    /// Must be called inside a tokio runtime.
    pub fn mount(&mut self) {
        let ticket = self.component.mount();
        self.spawn_load(ticket);
    }

    /// Update the props, starting a load if they call for one
    pub fn set_props(&mut self, props: ImageWatermarkProps) {
        if let Some(ticket) = self.component.set_props(props) {
            self.spawn_load(ticket);
        }
    }

    pub fn unmount(&mut self) {
        self.component.unmount();
    }

    /// Wait for the next load to finish and apply it.
    ///
    /// Returns `None` when nothing is in flight, otherwise whether the
    /// completion was current (stale ones are dropped).
    pub async fn next_completion(&mut self) -> Option<bool> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.rx.recv().await?;
        Some(self.apply(completion))
    }

    /// Apply every completion that has already arrived, without waiting.
    /// Returns how many were applied to the component.
    pub fn drain_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.rx.try_recv() {
            if self.apply(completion) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait until every started load has finished
    pub async fn settle(&mut self) {
        while self.next_completion().await.is_some() {}
    }

    fn apply(&mut self, completion: Completion) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.component
            .complete_load(&completion.ticket, completion.result)
    }

    fn spawn_load(&mut self, ticket: LoadTicket) {
        let loader = self.loader.clone();
        let tx = self.tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = loader.load(ticket.src()).await;
            // The host may be gone; the result is moot then
            let _ = tx.send(Completion { ticket, result });
        });
    }
}
