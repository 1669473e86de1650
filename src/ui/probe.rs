//! Off-screen measurement probe
//!
//! Lays popup content out where nobody can see it so its natural size is
//! known before the real popup opens. A new render pass is only scheduled on
//! first mount or when the content's identity key changes; the host calls
//! [`OffscreenProbe::complete_layout_pass`] once layout has settled, which is
//! when the dimensions-ready notification fires.

use crate::{
    traits::LayoutBackend,
    ui::popup::{MeasuredSize, PopupContent},
};
use std::fmt;

/// `Idle → Rendering → Measured`, back to `Rendering` only on a new key
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeState {
    Idle,
    Rendering { key: String },
    Measured { key: String, size: MeasuredSize },
}

/// Fired once per completed render pass
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionsReady {
    pub key: String,
    /// Render pass that produced the measurement, see [`OffscreenProbe::pass`]
    pub pass: u64,
    /// `None` when the backend rendered nothing
    pub size: Option<MeasuredSize>,
}

type DimensionsObserver = Box<dyn FnMut(&DimensionsReady)>;

pub struct OffscreenProbe<B: LayoutBackend> {
    backend: B,
    state: ProbeState,
    content: Option<PopupContent>,
    pass: u64,
    on_dimensions: Option<DimensionsObserver>,
}

impl<B: LayoutBackend> OffscreenProbe<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: ProbeState::Idle,
            content: None,
            pass: 0,
            on_dimensions: None,
        }
    }

    /// Observer invoked with every dimensions-ready notification
    pub fn on_dimensions(mut self, observer: impl FnMut(&DimensionsReady) + 'static) -> Self {
        self.on_dimensions = Some(Box::new(observer));
        self
    }

    pub fn state(&self) -> &ProbeState {
        &self.state
    }

    /// Key of the content currently rendering or measured
    pub fn key(&self) -> Option<&str> {
        match &self.state {
            ProbeState::Idle => None,
            ProbeState::Rendering { key } | ProbeState::Measured { key, .. } => Some(key),
        }
    }

    /// True while a render pass is scheduled but not yet complete
    pub fn is_pending(&self) -> bool {
        matches!(self.state, ProbeState::Rendering { .. })
    }

    /// Number of the most recently scheduled render pass; 0 before the first
    pub fn pass(&self) -> u64 {
        self.pass
    }

    pub fn measured_size(&self) -> Option<MeasuredSize> {
        match &self.state {
            ProbeState::Measured { size, .. } => Some(*size),
            _ => None,
        }
    }

    /// Starts a fresh render pass regardless of the previous key
    pub fn mount(&mut self, content: PopupContent, key: impl Into<String>) {
        let key = key.into();
        log::debug!("probe mount: {}", key);
        self.schedule(content, key);
    }

    /// Re-renders only if `key` differs from the current one. Returns whether a pass was scheduled.
    pub fn update(&mut self, content: PopupContent, key: impl Into<String>) -> bool {
        let key = key.into();
        if self.key() == Some(key.as_str()) {
            log::debug!("probe update skipped, key {} unchanged", key);
            return false;
        }

        log::debug!("probe update: {:?} -> {}", self.key(), key);
        self.schedule(content, key);
        true
    }

    fn schedule(&mut self, content: PopupContent, key: String) {
        self.pass += 1;
        self.content = Some(content);
        self.state = ProbeState::Rendering { key };
    }

    /// Mounts when idle, otherwise updates
    pub fn measure(&mut self, content: PopupContent, key: impl Into<String>) -> bool {
        if self.state == ProbeState::Idle {
            self.mount(content, key);
            true
        } else {
            self.update(content, key)
        }
    }

    /// Drops the measured content; the next `measure` mounts again
    pub fn unmount(&mut self) {
        if self.state != ProbeState::Idle {
            log::debug!("probe unmount: {:?}", self.key());
        }
        self.content = None;
        self.state = ProbeState::Idle;
    }

    /// Runs the scheduled layout pass, if any, and fires the notification.
    pub fn complete_layout_pass(&mut self) -> Option<DimensionsReady> {
        let key = match &self.state {
            ProbeState::Rendering { key } => key.clone(),
            _ => return None,
        };

        let size = self
            .content
            .as_ref()
            .and_then(|content| self.backend.layout_offscreen(content))
            .map(|size| size.sanitized());

        self.state = ProbeState::Measured {
            key: key.clone(),
            size: size.unwrap_or_default(),
        };

        let ready = DimensionsReady {
            key,
            pass: self.pass,
            size,
        };
        if let Some(observer) = self.on_dimensions.as_mut() {
            observer(&ready);
        }
        Some(ready)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

}

impl<B: LayoutBackend> fmt::Debug for OffscreenProbe<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OffscreenProbe")
            .field("state", &self.state)
            .field("content", &self.content)
            .field("pass", &self.pass)
            .finish()
    }
}
