//! Per-session shared state.
//!
//! Every field is touched only from the executor thread, but the flags are
//! also awaited by sleeping loops, so each one pairs its value with a
//! [`Watch`] that wakes those loops at their next checkpoint.

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::watch::{Receiver, Watch};
use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};

/// Loops that wait on the run flag: the tick loop and the camera poller.
pub const RUN_FLAG_WATCHERS: usize = 2;

/// Loops that wait on the camera flag: the camera poller.
pub const CAMERA_FLAG_WATCHERS: usize = 1;

/// A boolean session flag that sleeping loops can await.
pub struct SessionFlag<const N: usize> {
    value: AtomicBool,
    changes: Watch<CriticalSectionRawMutex, bool, N>,
}

impl<const N: usize> SessionFlag<N> {
    pub fn new(initial: bool) -> Self {
        let flag = Self {
            value: AtomicBool::new(initial),
            changes: Watch::new(),
        };
        flag.changes.sender().send(initial);
        flag
    }

    pub fn get(&self) -> bool {
        self.value.load(Ordering::SeqCst)
    }

    /// Store `value` and return the previous one. Watchers only wake on a change.
    pub fn set(&self, value: bool) -> bool {
        let previous = self.value.swap(value, Ordering::SeqCst);
        if previous != value {
            self.changes.sender().send(value);
        }
        previous
    }

    /// A handle for awaiting the flag, or `None` once all `N` are in use.
    pub fn watcher(&self) -> Option<FlagWatcher<'_, N>> {
        self.changes.receiver().map(|rx| FlagWatcher { rx })
    }
}

pub struct FlagWatcher<'a, const N: usize> {
    rx: Receiver<'a, CriticalSectionRawMutex, bool, N>,
}

impl<const N: usize> FlagWatcher<'_, N> {
    /// Resolve as soon as the flag holds `wanted`, immediately if it already does.
    pub async fn until(&mut self, wanted: bool) {
        self.rx.get_and(move |value| *value == wanted).await;
    }
}

/// Start/stop handle for the camera poller, keyed off the camera-active flag.
pub struct CameraSwitch<'a> {
    flag: &'a SessionFlag<CAMERA_FLAG_WATCHERS>,
}

impl CameraSwitch<'_> {
    /// Move to `Running`. Returns false if already running.
    pub fn start(&self) -> bool {
        !self.flag.set(true)
    }

    /// Move to `Stopped`. An in-flight fetch still completes and renders.
    /// Returns false if already stopped.
    pub fn stop(&self) -> bool {
        self.flag.set(false)
    }

    pub fn is_active(&self) -> bool {
        self.flag.get()
    }
}

/// State owned by one operator session.
pub struct SessionState {
    run: SessionFlag<RUN_FLAG_WATCHERS>,
    camera_active: SessionFlag<CAMERA_FLAG_WATCHERS>,
    active_input_label: Mutex<CriticalSectionRawMutex, RefCell<String>>,
    move_speed: i32,
}

impl SessionState {
    pub fn new(move_speed: i32) -> Self {
        Self {
            run: SessionFlag::new(true),
            camera_active: SessionFlag::new(false),
            active_input_label: Mutex::new(RefCell::new(String::new())),
            move_speed,
        }
    }

    pub fn is_running(&self) -> bool {
        self.run.get()
    }

    /// Clear the run flag. Returns false if termination was already requested.
    pub fn request_termination(&self) -> bool {
        self.run.set(false)
    }

    pub fn run_flag(&self) -> &SessionFlag<RUN_FLAG_WATCHERS> {
        &self.run
    }

    pub fn camera_flag(&self) -> &SessionFlag<CAMERA_FLAG_WATCHERS> {
        &self.camera_active
    }

    pub fn camera(&self) -> CameraSwitch<'_> {
        CameraSwitch { flag: &self.camera_active }
    }

    pub fn move_speed(&self) -> i32 {
        self.move_speed
    }

    pub fn active_input_label(&self) -> String {
        self.active_input_label.lock(|label| label.borrow().clone())
    }

    pub fn set_active_input_label(&self, code: &str) {
        self.active_input_label.lock(|label| {
            let mut label = label.borrow_mut();
            label.clear();
            label.push_str(code);
        });
    }

    pub fn clear_active_input_label(&self) {
        self.active_input_label.lock(|label| label.borrow_mut().clear());
    }
}
