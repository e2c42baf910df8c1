//! Camera refresh loop and the one-shot auxiliary camera reload.
//!
//! States: `Stopped` and `Running`, keyed off the camera-active flag.
//! - Entering `Running` issues a fetch immediately.
//! - Each completed fetch, successful or not, is followed by a fixed interval
//!   before the next one, as long as the flag is still set.
//! - Clearing the flag never interrupts a fetch in flight: that fetch still
//!   renders, then the loop stops. Clearing it during the interval wakes the
//!   loop and no further fetch happens.
//! - Setting the flag again before the loop noticed the stop simply keeps the
//!   existing loop running; there is never more than one.

use embassy_futures::select::{Either, select};
use embassy_time::{Duration, Timer};

use crate::UIRefreshQueueSender;
use crate::control::Transport;
use crate::ui::{UIRefreshState, publish};

use super::SessionContext;
use super::state::SessionState;

pub struct CameraPoller<'a, T: Transport> {
    transport: &'a T,
    state: &'a SessionState,
    url: String,
    interval: Duration,
    ui_refresh_tx: UIRefreshQueueSender,
}

impl<'a, T: Transport> CameraPoller<'a, T> {
    pub fn new(transport: &'a T, state: &'a SessionState, url: String, interval: Duration, ui_refresh_tx: UIRefreshQueueSender) -> Self {
        Self {
            transport,
            state,
            url,
            interval,
            ui_refresh_tx,
        }
    }

    /// Run until the session ends, following the camera-active flag.
    pub async fn run(&self) {
        let (Some(mut active), Some(mut running)) = (self.state.camera_flag().watcher(), self.state.run_flag().watcher()) else {
            log::error!("Camera poller could not watch the session flags");
            return;
        };

        loop {
            // Stopped. Termination wins over a camera left on.
            if let Either::First(()) = select(running.until(false), active.until(true)).await {
                break;
            }
            log::info!("Camera polling started: {}", self.url);
            publish(&self.ui_refresh_tx, UIRefreshState::CameraStateChanged(true));

            // Running
            while self.should_poll() {
                self.fetch_once().await;
                if !self.should_poll() {
                    break;
                }
                if let Either::Second(_) = select(Timer::after(self.interval), select(active.until(false), running.until(false))).await {
                    break;
                }
            }

            log::info!("Camera polling stopped");
            publish(&self.ui_refresh_tx, UIRefreshState::CameraStateChanged(false));
        }
    }

    fn should_poll(&self) -> bool {
        self.state.camera().is_active() && self.state.is_running()
    }

    async fn fetch_once(&self) {
        match self.transport.fetch(&self.url).await {
            Ok(bytes) => publish(&self.ui_refresh_tx, UIRefreshState::CameraFrame(bytes)),
            Err(e) => log::warn!("Camera fetch failed: {}", e),
        }
    }
}

/// Wait for the auxiliary camera to settle, then fetch its snapshot once.
/// `url` must already carry the cache-defeating timestamp.
pub async fn reload_secondary_camera<T: Transport>(transport: &T, url: &str, settle_delay: Duration, ui_refresh_tx: UIRefreshQueueSender) {
    Timer::after(settle_delay).await;
    match transport.fetch(url).await {
        Ok(bytes) => publish(&ui_refresh_tx, UIRefreshState::SecondaryCameraFrame(bytes)),
        Err(e) => log::warn!("Secondary camera reload failed: {}", e),
    }
}

#[embassy_executor::task]
pub async fn camera_task(context: &'static SessionContext) {
    CameraPoller::new(
        &context.transport,
        &context.state,
        context.config.camera_url(),
        context.config.camera_interval(),
        context.ui_refresh_tx,
    )
    .run()
    .await;
    log::debug!("Camera task finished");
}

#[embassy_executor::task(pool_size = 4)]
pub async fn secondary_reload_task(context: &'static SessionContext) {
    // Timestamp taken at trigger time, like a reload request issued right away.
    let url = context.config.secondary_camera_url_at(chrono::Utc::now().timestamp_millis());
    reload_secondary_camera(&context.transport, &url, context.config.settle_delay(), context.ui_refresh_tx).await;
}
