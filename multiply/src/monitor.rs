//! Background polling of removable devices.
//!
//! A [`DeviceProbe`] reports the devices currently present, the [`DeviceMonitor`] diffs consecutive
//! reports and forwards the changes to a [`DeviceRegistry`].

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Result, anyhow};
use itertools::Itertools;
use log::{debug, info, warn};

use crate::notify::Notifier;

/// Source of truth about the devices currently connected.
pub trait DeviceProbe: Send + Sync + 'static {
    type Id: Clone + Debug + Eq + Hash + Ord + Send + 'static;
    type Info: Clone + Debug + PartialEq + Send + 'static;

    /// All devices currently present, keyed by id
    fn check(&self) -> Result<HashMap<Self::Id, Self::Info>>;

    /// Ejects the device, returns whether it was successful
    fn eject(&self, id: &Self::Id) -> Result<bool>;
}

/// Receives devices as they appear and disappear.
pub trait DeviceRegistry<Id, Info>: Send + 'static {
    fn add_device(&mut self, id: Id, info: Info);
    fn remove_device(&mut self, id: &Id);
}

/// Forwards the difference between two device reports to `registry`.
///
/// New devices are added, vanished ones removed and changed ones removed and added again.
/// Devices present in both reports with equal info produce no calls.
pub fn diff_devices<Id, Info>(
    previous: &HashMap<Id, Info>,
    current: &HashMap<Id, Info>,
    registry: &mut impl DeviceRegistry<Id, Info>,
) where
    Id: Clone + Debug + Eq + Hash + Ord,
    Info: Clone + PartialEq,
{
    for id in current.keys().sorted() {
        let info = &current[id];
        match previous.get(id) {
            None => {
                debug!("[MON] device {id:?} appeared");
                registry.add_device(id.clone(), info.clone());
            }
            Some(old) if old != info => {
                debug!("[MON] device {id:?} changed");
                registry.remove_device(id);
                registry.add_device(id.clone(), info.clone());
            }
            Some(_) => {}
        }
    }
    for id in previous.keys().filter(|id| !current.contains_key(*id)).sorted() {
        debug!("[MON] device {id:?} vanished");
        registry.remove_device(id);
    }
}

/// Polls a [`DeviceProbe`] on a dedicated thread until stopped.
pub struct DeviceMonitor<P: DeviceProbe, R: DeviceRegistry<P::Id, P::Info>> {
    probe: Arc<P>,
    registry: Arc<Mutex<R>>,
    notifier: Arc<dyn Notifier>,
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<HashMap<P::Id, P::Info>>>,
}

impl<P, R> DeviceMonitor<P, R>
where
    P: DeviceProbe,
    R: DeviceRegistry<P::Id, P::Info>,
{
    pub fn start(
        probe: Arc<P>,
        registry: Arc<Mutex<R>>,
        notifier: Arc<dyn Notifier>,
        interval: Duration,
    ) -> Result<Self> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = {
            let probe = probe.clone();
            let registry = registry.clone();
            thread::Builder::new()
                .name("device-monitor".to_string())
                .spawn(move || {
                    let mut state = HashMap::new();
                    loop {
                        match probe.check() {
                            Ok(current) => {
                                match registry.lock() {
                                    Ok(mut reg) => diff_devices(&state, &current, &mut *reg),
                                    Err(_) => warn!("[MON] registry lock poisoned, changes dropped"),
                                }
                                state = current;
                            }
                            Err(e) => warn!("[MON] device check failed: {e}"),
                        }
                        match stop_rx.recv_timeout(interval) {
                            Err(RecvTimeoutError::Timeout) => continue,
                            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                        }
                    }
                    state
                })?
        };
        info!("[MON] device monitor started, polling every {interval:?}");

        Ok(DeviceMonitor {
            probe,
            registry,
            notifier,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Stops polling and waits for the last iteration to complete.
    /// Every device still tracked is then removed from the registry.
    pub fn stop(&mut self) -> Result<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        if let Some(tx) = self.stop_tx.take() {
            //the thread may already be gone, in which case there is nobody to signal
            let _ = tx.send(());
        }
        let last_state = handle
            .join()
            .map_err(|_| anyhow!("device monitor thread panicked"))?;

        let mut registry = self
            .registry
            .lock()
            .map_err(|_| anyhow!("device registry lock poisoned"))?;
        diff_devices(&last_state, &HashMap::new(), &mut *registry);
        info!("[MON] device monitor stopped");
        Ok(())
    }

    /// Ejects a device, the outcome is reported through the notifier.
    pub fn eject(&self, id: &P::Id) -> bool {
        match self.probe.eject(id) {
            Ok(true) => {
                info!("[MON] ejected {id:?}");
                self.notifier
                    .message(&format!("Ejected {id:?}, the device can be removed safely"));
                true
            }
            Ok(false) => {
                warn!("[MON] failed to eject {id:?}");
                self.notifier.message(&format!(
                    "Failed to eject {id:?}, another program may be using the device"
                ));
                false
            }
            Err(e) => {
                warn!("[MON] failed to eject {id:?}: {e}");
                self.notifier.message(&format!("Failed to eject {id:?}: {e}"));
                false
            }
        }
    }
}

impl<P, R> Drop for DeviceMonitor<P, R>
where
    P: DeviceProbe,
    R: DeviceRegistry<P::Id, P::Info>,
{
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!("[MON] {e}");
        }
    }
}
