//! Scoped connections that always release the bulb.
//!
//! Two styles are offered:
//!
//! - [`ControllerGuard`]: RAII guard that disconnects when dropped.
//! - [`with_controller`] / [`run_scoped`]: run an async closure and close
//!   the connection afterwards, whether the closure succeeded or not.

use std::ops::{Deref, DerefMut};

use tokio::runtime::Handle;
use tracing::warn;

use crate::controller::BulbController;
use crate::device::{ConnectionConfig, Device};
use crate::error::Result;
use crate::traits::BulbTransport;

/// A guard that disconnects the controller's transport when dropped.
///
/// # Example
///
/// ```no_run
/// use beewi_core::{BulbController, ControllerGuard};
///
/// async fn blink() -> Result<(), Box<dyn std::error::Error>> {
///     let bulb = BulbController::connect("AA:BB:CC:DD:EE:FF").await?;
///     let mut guard = ControllerGuard::new(bulb);
///
///     guard.turn_off().await?;
///     guard.turn_on().await?;
///
///     // Disconnected when `guard` goes out of scope
///     Ok(())
/// }
/// ```
pub struct ControllerGuard<T: BulbTransport + 'static = Device> {
    controller: Option<BulbController<T>>,
}

impl<T: BulbTransport + 'static> ControllerGuard<T> {
    /// Create a new guard.
    pub fn new(controller: BulbController<T>) -> Self {
        Self {
            controller: Some(controller),
        }
    }

    /// Take ownership of the controller, preventing automatic disconnect.
    pub fn into_inner(mut self) -> BulbController<T> {
        self.controller.take().expect("controller already taken")
    }

    /// Disconnect now and wait for it to finish.
    pub async fn close(self) -> Result<()> {
        self.into_inner().close().await
    }

    /// Get a reference to the controller.
    pub fn controller(&self) -> &BulbController<T> {
        self.controller.as_ref().expect("controller already taken")
    }

    /// Get a mutable reference to the controller.
    pub fn controller_mut(&mut self) -> &mut BulbController<T> {
        self.controller.as_mut().expect("controller already taken")
    }
}

impl<T: BulbTransport + 'static> Deref for ControllerGuard<T> {
    type Target = BulbController<T>;

    fn deref(&self) -> &Self::Target {
        self.controller()
    }
}

impl<T: BulbTransport + 'static> DerefMut for ControllerGuard<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.controller_mut()
    }
}

impl<T: BulbTransport + 'static> Drop for ControllerGuard<T> {
    fn drop(&mut self) {
        if let Some(controller) = self.controller.take() {
            if let Ok(handle) = Handle::try_current() {
                handle.spawn(async move {
                    if let Err(e) = controller.close().await {
                        warn!("Failed to disconnect bulb in guard drop: {}", e);
                    }
                });
            } else {
                warn!("No tokio runtime available for bulb disconnect in guard drop");
            }
        }
    }
}

/// Connect to a bulb, run `f`, then close the connection.
///
/// The connection is closed on every exit path. If `f` fails, its error is
/// returned even when closing also fails.
///
/// # Example
///
/// ```no_run
/// use beewi_core::{ConnectionConfig, with_controller};
///
/// # async fn example() -> beewi_core::Result<()> {
/// let state = with_controller("AA:BB:CC:DD:EE:FF", ConnectionConfig::default(), async |bulb| {
///     bulb.turn_on().await?;
///     bulb.set_brightness(9).await
/// })
/// .await?;
/// println!("{}", state);
/// # Ok(())
/// # }
/// ```
pub async fn with_controller<R, F>(identifier: &str, config: ConnectionConfig, f: F) -> Result<R>
where
    F: AsyncFnOnce(&mut BulbController<Device>) -> Result<R>,
{
    let controller = BulbController::connect_with_config(identifier, config).await?;
    run_scoped(controller, f).await
}

/// Run `f` against an open controller, then close it.
pub async fn run_scoped<T, R, F>(mut controller: BulbController<T>, f: F) -> Result<R>
where
    T: BulbTransport,
    F: AsyncFnOnce(&mut BulbController<T>) -> Result<R>,
{
    let result = f(&mut controller).await;
    let closed = controller.close().await;

    match (result, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(close_err)) => Err(close_err),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_err)) => {
            warn!("Failed to disconnect bulb after error: {}", close_err);
            Err(e)
        }
    }
}
