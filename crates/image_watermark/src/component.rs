//! The image watermark component
//!
//! [`ImageWatermark`] owns a [`Surface`] and drives it through the load
//! lifecycle. It does no I/O itself: `mount` and `set_props` hand out
//! [`LoadTicket`]s naming the image to fetch, and whoever performs the fetch
//! reports back through [`ImageWatermark::complete_load`]. Completions for
//! superseded tickets are dropped.

use std::sync::Arc;

use watermark_core::{Generation, LoadLifecycle, LoadState};
use watermark_image::{ImageData, ImageError};

use crate::compositor::composite;
use crate::error::WatermarkError;
use crate::fallback::Placeholder;
use crate::props::{ImageWatermarkProps, Style};
use crate::surface::Surface;

/// Callback fired after each successful load
pub type LoadCallback = Box<dyn FnMut() + Send>;
/// Callback fired after each failed load
pub type ErrorCallback = Box<dyn FnMut(&WatermarkError) + Send>;

/// A request to fetch an image for the component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: Generation,
    src: String,
}

impl LoadTicket {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The source to fetch
    pub fn src(&self) -> &str {
        &self.src
    }
}

/// What the component currently presents
#[derive(Debug)]
pub enum View<'a, S> {
    /// Waiting for the first image; nothing to show yet
    Loading,
    /// The composited surface
    Surface {
        surface: &'a S,
        /// `aria-label` of the surface
        label: Option<&'a str>,
        style: Style,
    },
    /// The load failed
    Fallback(Placeholder),
}

/// Image with a text watermark composited over it
pub struct ImageWatermark<S: Surface> {
    props: ImageWatermarkProps,
    surface: S,
    lifecycle: LoadLifecycle,
    image: Option<Arc<ImageData>>,
    error: Option<WatermarkError>,
    render_count: u64,
    on_load: Option<LoadCallback>,
    on_error: Option<ErrorCallback>,
}

impl<S: Surface> ImageWatermark<S> {
    pub fn new(props: ImageWatermarkProps, surface: S) -> Self {
        Self {
            props,
            surface,
            lifecycle: LoadLifecycle::new(),
            image: None,
            error: None,
            render_count: 0,
            on_load: None,
            on_error: None,
        }
    }

    /// Fire `callback` after every successful load
    pub fn on_load(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_load = Some(Box::new(callback));
        self
    }

    /// Fire `callback` after every failed load
    pub fn on_error(mut self, callback: impl FnMut(&WatermarkError) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    pub fn props(&self) -> &ImageWatermarkProps {
        &self.props
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn state(&self) -> LoadState {
        self.lifecycle.state()
    }

    /// The error from the most recent failed load
    pub fn error(&self) -> Option<&WatermarkError> {
        self.error.as_ref()
    }

    /// The decoded image currently on the surface
    pub fn image(&self) -> Option<&Arc<ImageData>> {
        self.image.as_ref()
    }

    /// Number of times the surface has been composited
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    /// Start the first load
    pub fn mount(&mut self) -> LoadTicket {
        self.begin_load()
    }

    /// Replace the props.
    ///
    /// A new `src`, `width`, or `height` starts a new load and returns its
    /// ticket. A watermark-only change redraws once from the retained image,
    /// or is picked up by the pending load if one is in flight.
    pub fn set_props(&mut self, props: ImageWatermarkProps) -> Option<LoadTicket> {
        if props == self.props {
            return None;
        }

        let reload = self.props.needs_reload(&props);
        let restyle = self.props.watermark != props.watermark;
        self.props = props;

        if self.state() == LoadState::Idle {
            // Not mounted: the props wait for mount()
            return None;
        }
        if reload {
            return Some(self.begin_load());
        }
        if restyle && self.state() == LoadState::Loaded {
            self.render();
        }
        None
    }

    /// Apply the outcome of a load.
    ///
    /// Returns false when the ticket was superseded or the component was
    /// unmounted, in which case nothing changes.
    pub fn complete_load(
        &mut self,
        ticket: &LoadTicket,
        result: Result<Arc<ImageData>, ImageError>,
    ) -> bool {
        if ticket.src != self.props.src || !self.lifecycle.is_current(ticket.generation) {
            tracing::debug!(
                src = ticket.src,
                generation = ticket.generation,
                "dropping stale image load"
            );
            return false;
        }

        match result {
            Ok(image) => {
                self.lifecycle.succeed(ticket.generation);
                let (width, height) = self
                    .props
                    .explicit_size()
                    .unwrap_or((image.width(), image.height()));
                self.surface.resize(width, height);
                self.image = Some(image);
                self.render();
                if let Some(on_load) = self.on_load.as_mut() {
                    on_load();
                }
            }
            Err(source) => {
                self.lifecycle.fail(ticket.generation);
                self.image = None;
                let error = WatermarkError::ImageLoad {
                    src: ticket.src.clone(),
                    source,
                };
                tracing::warn!("{error}: {:?}", std::error::Error::source(&error));
                if let Some(on_error) = self.on_error.as_mut() {
                    on_error(&error);
                }
                self.error = Some(error);
            }
        }
        true
    }

    /// Tear down. Pending loads become stale and the retained image is
    /// released.
    pub fn unmount(&mut self) {
        self.lifecycle.unmount();
        self.image = None;
    }

    /// What to present right now.
    ///
    /// While a reload is in flight the previous composite stays on show
    /// until the new image lands.
    pub fn view(&self) -> View<'_, S> {
        match self.state() {
            LoadState::Loading if self.image.is_some() => self.surface_view(),
            LoadState::Idle | LoadState::Loading => View::Loading,
            LoadState::Loaded => self.surface_view(),
            LoadState::Errored => View::Fallback(Placeholder::for_props(&self.props)),
        }
    }

    fn surface_view(&self) -> View<'_, S> {
        View::Surface {
            surface: &self.surface,
            label: self.props.accessibility_label(),
            style: self.props.surface_style(),
        }
    }

    fn begin_load(&mut self) -> LoadTicket {
        let generation = self.lifecycle.begin();
        self.error = None;
        tracing::debug!(src = self.props.src, generation, "loading image");
        LoadTicket {
            generation,
            src: self.props.src.clone(),
        }
    }

    fn render(&mut self) {
        let Some(image) = self.image.as_ref() else {
            return;
        };
        let style = self.props.watermark.resolve();
        composite(&mut self.surface, image, &style);
        self.render_count += 1;
        tracing::debug!(
            render = self.render_count,
            width = self.surface.width(),
            height = self.surface.height(),
            "composited watermark"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WatermarkConfig;
    use image::{Rgba, RgbaImage};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use watermark_paint::{PaintCommand, PaintContext};

    fn image(width: u32, height: u32) -> Arc<ImageData> {
        Arc::new(ImageData::from_rgba(RgbaImage::from_pixel(
            width,
            height,
            Rgba([1, 2, 3, 255]),
        )))
    }

    fn props(src: &str) -> ImageWatermarkProps {
        ImageWatermarkProps::new(src, WatermarkConfig::new("© 2024"))
    }

    fn missing(src: &str) -> ImageError {
        ImageError::Io {
            path: src.into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        }
    }

    fn texts(ctx: &PaintContext) -> Vec<String> {
        ctx.text_draws().map(|d| d.text.clone()).collect()
    }

    #[test]
    fn test_explicit_size_wins_over_natural_size() {
        let mut c = ImageWatermark::new(props("a.png").size(400, 300), PaintContext::default());
        let ticket = c.mount();
        assert!(c.complete_load(&ticket, Ok(image(1024, 768))));

        assert_eq!(c.state(), LoadState::Loaded);
        assert_eq!((c.surface().width(), c.surface().height()), (400, 300));
    }

    #[test]
    fn test_natural_size_without_explicit_size() {
        let mut c = ImageWatermark::new(props("a.png"), PaintContext::default());
        let ticket = c.mount();
        c.complete_load(&ticket, Ok(image(640, 480)));
        assert_eq!((c.surface().width(), c.surface().height()), (640, 480));
    }

    #[test]
    fn test_text_change_rerenders_once_without_on_load() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = loads.clone();
        let mut c = ImageWatermark::new(props("a.png"), PaintContext::default())
            .on_load(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        let ticket = c.mount();
        c.complete_load(&ticket, Ok(image(10, 10)));
        assert_eq!(c.render_count(), 1);

        let mut next = c.props().clone();
        next.watermark.text = "updated".to_string();
        assert!(c.set_props(next).is_none());

        assert_eq!(c.render_count(), 2);
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(texts(c.surface()), vec!["© 2024", "updated"]);
    }

    #[test]
    fn test_identical_props_do_nothing() {
        let mut c = ImageWatermark::new(props("a.png"), PaintContext::default());
        let ticket = c.mount();
        c.complete_load(&ticket, Ok(image(10, 10)));

        assert!(c.set_props(c.props().clone()).is_none());
        assert_eq!(c.render_count(), 1);
    }

    #[test]
    fn test_non_watermark_change_does_not_redraw() {
        let mut c = ImageWatermark::new(props("a.png"), PaintContext::default());
        let ticket = c.mount();
        c.complete_load(&ticket, Ok(image(10, 10)));

        assert!(c.set_props(c.props().clone().alt("described")).is_none());
        assert_eq!(c.render_count(), 1);
        match c.view() {
            View::Surface { label, .. } => assert_eq!(label, Some("described")),
            other => panic!("expected surface, got {other:?}"),
        }
    }

    #[test]
    fn test_config_change_while_loading_renders_once_on_completion() {
        let mut c = ImageWatermark::new(props("a.png"), PaintContext::default());
        let ticket = c.mount();

        let mut next = c.props().clone();
        next.watermark.text = "late".to_string();
        assert!(c.set_props(next).is_none());
        assert_eq!(c.render_count(), 0);

        c.complete_load(&ticket, Ok(image(10, 10)));
        assert_eq!(c.render_count(), 1);
        assert_eq!(texts(c.surface()), vec!["late"]);
    }

    #[test]
    fn test_failed_load_reports_once_and_shows_fallback() {
        let errors = Arc::new(Mutex::new(Vec::new()));
        let sink = errors.clone();
        let mut c = ImageWatermark::new(props("/nope.png").size(200, 100), PaintContext::default())
            .on_error(move |e| sink.lock().unwrap().push(e.to_string()));

        let ticket = c.mount();
        c.complete_load(&ticket, Err(missing("/nope.png")));

        assert_eq!(
            *errors.lock().unwrap(),
            vec!["Failed to load image: /nope.png".to_string()]
        );
        assert_eq!(c.state(), LoadState::Errored);
        assert_eq!(c.render_count(), 0);
        assert!(c.surface().commands().is_empty());
        match c.view() {
            View::Fallback(placeholder) => {
                assert_eq!((placeholder.width, placeholder.height), (200, 100));
            }
            other => panic!("expected fallback, got {other:?}"),
        }
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let mut c = ImageWatermark::new(props("old.png"), PaintContext::default());
        let old = c.mount();
        let new = c.set_props(props("new.png")).expect("src change reloads");
        assert_ne!(old.generation(), new.generation());
        assert_eq!(new.src(), "new.png");

        assert!(!c.complete_load(&old, Ok(image(5, 5))));
        assert_eq!(c.state(), LoadState::Loading);

        assert!(c.complete_load(&new, Ok(image(7, 7))));
        assert_eq!(c.surface().width(), 7);
        assert_eq!(c.render_count(), 1);
    }

    #[test]
    fn test_stale_failure_does_not_error() {
        let mut c = ImageWatermark::new(props("old.png"), PaintContext::default());
        let old = c.mount();
        let _new = c.set_props(props("new.png"));
        assert!(!c.complete_load(&old, Err(missing("old.png"))));
        assert!(c.error().is_none());
    }

    #[test]
    fn test_size_change_reloads() {
        let mut c = ImageWatermark::new(props("a.png"), PaintContext::default());
        let ticket = c.mount();
        c.complete_load(&ticket, Ok(image(10, 10)));

        let ticket = c
            .set_props(c.props().clone().size(20, 20))
            .expect("size change reloads");
        assert_eq!(c.state(), LoadState::Loading);
        c.complete_load(&ticket, Ok(image(10, 10)));
        assert_eq!(c.surface().width(), 20);
    }

    #[test]
    fn test_previous_composite_shown_during_reload() {
        let mut c = ImageWatermark::new(props("a.png"), PaintContext::default());
        assert!(matches!(c.view(), View::Loading));
        let ticket = c.mount();
        assert!(matches!(c.view(), View::Loading));
        c.complete_load(&ticket, Ok(image(10, 10)));

        let ticket = c.set_props(props("b.png")).expect("src change reloads");
        assert_eq!(c.state(), LoadState::Loading);
        match c.view() {
            View::Surface { surface, .. } => assert_eq!(surface.width(), 10),
            other => panic!("expected previous surface, got {other:?}"),
        }

        c.complete_load(&ticket, Err(missing("b.png")));
        assert!(c.image().is_none());
        let _retry = c.set_props(props("c.png")).expect("src change reloads");
        assert!(matches!(c.view(), View::Loading));
    }

    #[test]
    fn test_reload_after_error_clears_it() {
        let mut c = ImageWatermark::new(props("bad.png"), PaintContext::default());
        let ticket = c.mount();
        c.complete_load(&ticket, Err(missing("bad.png")));
        assert!(c.error().is_some());

        let ticket = c.set_props(props("good.png")).unwrap();
        assert!(c.error().is_none());
        c.complete_load(&ticket, Ok(image(3, 3)));
        assert!(matches!(c.view(), View::Surface { .. }));
    }

    #[test]
    fn test_unmount_drops_pending_loads() {
        let mut c = ImageWatermark::new(props("a.png"), PaintContext::default());
        let ticket = c.mount();
        c.unmount();
        assert!(!c.complete_load(&ticket, Ok(image(3, 3))));
        assert_eq!(c.state(), LoadState::Idle);
        assert!(matches!(c.view(), View::Loading));
    }

    #[test]
    fn test_surface_view_carries_style() {
        let mut c = ImageWatermark::new(props("a.png").size(40, 30), PaintContext::default());
        let ticket = c.mount();
        c.complete_load(&ticket, Ok(image(3, 3)));

        match c.view() {
            View::Surface { style, label, .. } => {
                assert_eq!(style.css_value("width").as_deref(), Some("40px"));
                assert_eq!(style.css_value("max-width").as_deref(), Some("100%"));
                assert_eq!(label, None);
            }
            other => panic!("expected surface, got {other:?}"),
        }
        assert!(matches!(
            c.surface().commands()[0],
            PaintCommand::Resize { width: 40, height: 30 }
        ));
    }
}
