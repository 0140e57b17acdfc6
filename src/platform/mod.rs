//! Platform adapters
//!
//! An adapter owns one [`Dispatcher`] and feeds it translated window events. Which adapter
//! can service which kind of window is a static table, checked when an adapter is
//! attached:
//!
//! ```text
//! WindowKind ──► ADAPTER_REGISTRY ──► AdapterKind ──► PlatformAdapter::with_dispatcher
//! ```

pub mod egui_adapter;
pub mod headless;

pub use egui_adapter::EguiAdapter;
pub use headless::HeadlessAdapter;

use crate::dispatch::Dispatcher;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Kind of host window an application hands to the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowKind {
    /// No real window, events are synthesized
    Headless,
    Egui,
    /// A window that has not been created yet
    Uninitialized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterKind {
    Headless,
    Egui,
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Window kinds each adapter can service, in lookup order
pub static ADAPTER_REGISTRY: &[(AdapterKind, &[WindowKind])] = &[
    (AdapterKind::Headless, &[WindowKind::Headless]),
    (AdapterKind::Egui, &[WindowKind::Egui, WindowKind::Headless]),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    #[error("{adapter} adapter cannot attach to a {window} window, supported: {supported:?}")]
    UnsupportedWindow {
        adapter: AdapterKind,
        window: WindowKind,
        supported: Vec<WindowKind>,
    },

    #[error("No adapter supports {0} windows")]
    NoAdapter(WindowKind),
}

pub fn supported_windows(adapter: AdapterKind) -> &'static [WindowKind] {
    ADAPTER_REGISTRY
        .iter()
        .find(|(kind, _)| *kind == adapter)
        .map(|(_, windows)| *windows)
        .unwrap_or(&[])
}

/// First registered adapter able to service `window`
pub fn adapter_for(window: WindowKind) -> Result<AdapterKind, AdapterError> {
    ADAPTER_REGISTRY
        .iter()
        .find(|(_, windows)| windows.contains(&window))
        .map(|(kind, _)| *kind)
        .ok_or(AdapterError::NoAdapter(window))
}

pub fn check_attach(adapter: AdapterKind, window: WindowKind) -> Result<(), AdapterError> {
    let supported = supported_windows(adapter);
    if supported.contains(&window) {
        Ok(())
    } else {
        Err(AdapterError::UnsupportedWindow {
            adapter,
            window,
            supported: supported.to_vec(),
        })
    }
}

/// Window-system binding that owns and drives a [`Dispatcher`]
pub trait PlatformAdapter: Sized {
    const KIND: AdapterKind;

    fn with_dispatcher(dispatcher: Dispatcher) -> Self;

    fn dispatcher(&self) -> &Dispatcher;

    fn dispatcher_mut(&mut self) -> &mut Dispatcher;

    /// Multi-click interval reported by the host, if it has one
    fn host_double_click_interval() -> Option<Duration> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_lookup() {
        assert_eq!(adapter_for(WindowKind::Egui), Ok(AdapterKind::Egui));
        assert_eq!(adapter_for(WindowKind::Headless), Ok(AdapterKind::Headless));
        assert_eq!(
            adapter_for(WindowKind::Uninitialized),
            Err(AdapterError::NoAdapter(WindowKind::Uninitialized))
        );
    }

    #[test]
    fn unsupported_window_names_the_supported_set() {
        assert_eq!(
            check_attach(AdapterKind::Headless, WindowKind::Egui),
            Err(AdapterError::UnsupportedWindow {
                adapter: AdapterKind::Headless,
                window: WindowKind::Egui,
                supported: vec![WindowKind::Headless],
            })
        );
        assert!(check_attach(AdapterKind::Egui, WindowKind::Headless).is_ok());
    }
}
