//! Live preview rendering.
//!
//! [`PreviewRenderer`] owns the engine lifecycle and the currently mounted
//! preview markup. The styled engine is obtained once through an
//! [`EngineLoader`]; until it is ready, and forever if loading fails, the
//! preview falls back to the [`PlainEngine`].

use crate::compositor::dom;
use crate::design::DesignConfig;
use crate::engine::{DefaultEngineLoader, EngineLoader, PlainEngine, QrEngine};
use crate::error::{Error, Result};
use crate::layout::compute_frame_layout;
use crate::mapper::build_engine_config;
use crate::style::{CanonicalStyle, normalize};

/// Where the styled engine is in its lifecycle.
pub enum EngineState {
    /// No load attempt has been made yet.
    Loading,
    Ready(Box<dyn QrEngine>),
    /// The load attempt failed. Terminal.
    Unavailable { reason: String },
}

impl EngineState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

impl std::fmt::Debug for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => f.write_str("Loading"),
            Self::Ready(engine) => f.debug_tuple("Ready").field(&engine.name()).finish(),
            Self::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}

/// The markup currently shown in the preview.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewElement {
    pub html: String,
    /// Name of the engine that produced the symbol.
    pub engine: &'static str,
    pub framed: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct MountKey {
    value: String,
    style: CanonicalStyle,
    size: u32,
}

pub struct PreviewRenderer {
    loader: Box<dyn EngineLoader>,
    state: EngineState,
    fallback: PlainEngine,
    mounted: Option<(MountKey, PreviewElement)>,
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self::new(Box::new(DefaultEngineLoader))
    }
}

impl PreviewRenderer {
    /// Creates a renderer in the `Loading` state. Nothing is loaded until
    /// [`load_engine`](Self::load_engine) or the first mount.
    pub fn new(loader: Box<dyn EngineLoader>) -> Self {
        Self {
            loader,
            state: EngineState::Loading,
            fallback: PlainEngine::new(),
            mounted: None,
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Attempts to load the styled engine. Only the first call does work.
    pub fn load_engine(&mut self) -> &EngineState {
        if matches!(self.state, EngineState::Loading) {
            self.state = match self.loader.load() {
                Ok(engine) => {
                    log::debug!("preview engine ready: {}", engine.name());
                    EngineState::Ready(engine)
                }
                Err(reason) => {
                    log::warn!("styled QR engine unavailable, using plain rendering: {reason}");
                    EngineState::Unavailable { reason }
                }
            };
        }
        &self.state
    }

    /// The currently mounted preview, if any.
    pub fn element(&self) -> Option<&PreviewElement> {
        self.mounted.as_ref().map(|(_, element)| element)
    }

    /// Removes the mounted preview.
    pub fn clear(&mut self) {
        if self.mounted.take().is_some() {
            log::debug!("preview cleared");
        }
    }

    /// Renders `value` with `design` at `size` pixels and mounts it.
    ///
    /// Remounting the same value, style and size is a no-op. Any change
    /// tears the previous preview down first.
    pub fn mount(&mut self, value: &str, design: &DesignConfig, size: u32) -> Result<&PreviewElement> {
        self.load_engine();

        if value.trim().is_empty() {
            self.clear();
            return Err(Error::EmptyValue);
        }

        let key = MountKey {
            value: value.to_string(),
            style: normalize(design),
            size,
        };
        let element = match self.mounted.take() {
            Some((previous, element)) if previous == key => element,
            previous => {
                if previous.is_some() {
                    log::debug!("preview torn down for remount");
                }
                let element = self.render(&key)?;
                log::debug!(
                    "mounted {} preview at {size}px via {}",
                    if element.framed { "framed" } else { "bare" },
                    element.engine
                );
                element
            }
        };
        Ok(&self.mounted.insert((key, element)).1)
    }

    fn engine(&self) -> &dyn QrEngine {
        match &self.state {
            EngineState::Ready(engine) => engine.as_ref(),
            EngineState::Loading | EngineState::Unavailable { .. } => &self.fallback,
        }
    }

    fn render(&self, key: &MountKey) -> Result<PreviewElement> {
        let engine = self.engine();
        let style = &key.style;

        let (html, framed) = match &style.frame {
            Some(frame) => {
                let layout = compute_frame_layout(frame.kind, key.size);
                let side = layout.qr_rect.width.round().max(1.0) as u32;
                let config = build_engine_config(style, side);
                let symbol = engine.render_svg(&key.value, &config)?;
                (dom::wrap(&symbol, &layout, frame, style.background.as_ref()), true)
            }
            None => {
                let config = build_engine_config(style, key.size);
                let symbol = engine.render_svg(&key.value, &config)?;
                (dom::bare(&symbol, key.size), false)
            }
        };

        Ok(PreviewElement {
            html,
            engine: engine.name(),
            framed,
        })
    }
}
