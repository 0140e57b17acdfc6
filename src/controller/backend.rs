use super::component::ControllerEvent;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Failed to initialize controller backend: {0}")]
    InitializationError(String),

    #[error("Controller device lost: {0}")]
    DeviceLost(String),
}

/// Source of controller notifications for the poller
///
/// `poll` is called once per heartbeat on the poller thread and must not block. It
/// returns everything that happened since the previous call, attach and detach
/// notifications included. An error means the active device disappeared and is treated
/// as a detach.
pub trait ControllerBackend: Send {
    fn poll(&mut self) -> Result<Vec<ControllerEvent>, BackendError>;
}
