//! Fixed-rate republish of the active input label.
//!
//! Runs for the whole session. Once the run flag is cleared the loop ends at
//! its next checkpoint and never renders again; there is no restart.

use embassy_futures::select::{Either, select};
use embassy_time::{Duration, Timer};

use crate::UIRefreshQueueSender;
use crate::ui::{UIRefreshState, publish};

use super::SessionContext;
use super::state::SessionState;

pub async fn run_tick_loop(state: &SessionState, period: Duration, ui_refresh_tx: UIRefreshQueueSender) {
    let Some(mut running) = state.run_flag().watcher() else {
        log::error!("Tick loop could not watch the run flag");
        return;
    };

    while state.is_running() {
        publish(&ui_refresh_tx, UIRefreshState::InputLabel(state.active_input_label()));

        if let Either::Second(()) = select(Timer::after(period), running.until(false)).await {
            break;
        }
    }

    log::info!("Session ended");
    publish(&ui_refresh_tx, UIRefreshState::SessionEnded);
}

#[embassy_executor::task]
pub async fn tick_task(context: &'static SessionContext) {
    run_tick_loop(&context.state, context.config.tick_period(), context.ui_refresh_tx).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UIRefreshQueue;
    use embassy_futures::block_on;
    use embassy_futures::join::join;

    #[test]
    fn test_renders_label_each_period_until_terminated() {
        let state = SessionState::new(30);
        let ui: &'static UIRefreshQueue = Box::leak(Box::new(UIRefreshQueue::new()));
        state.set_active_input_label("ArrowUp");

        block_on(join(run_tick_loop(&state, Duration::from_millis(10), ui.sender()), async {
            Timer::after(Duration::from_millis(45)).await;
            state.request_termination();
        }));

        let mut labels = Vec::new();
        let mut ended = false;
        while let Ok(update) = ui.try_receive() {
            match update {
                UIRefreshState::InputLabel(label) => {
                    assert!(!ended, "label rendered after the session ended");
                    labels.push(label);
                }
                UIRefreshState::SessionEnded => ended = true,
                _ => panic!("Unexpected update from the tick loop"),
            }
        }
        assert!(ended);
        assert!(labels.len() >= 3 && labels.len() <= 6, "{} ticks", labels.len());
        assert!(labels.iter().all(|l| l == "ArrowUp"));
    }

    #[test]
    fn test_label_changes_show_up_on_next_tick() {
        let state = SessionState::new(30);
        let ui: &'static UIRefreshQueue = Box::leak(Box::new(UIRefreshQueue::new()));

        block_on(join(run_tick_loop(&state, Duration::from_millis(10), ui.sender()), async {
            Timer::after(Duration::from_millis(15)).await;
            state.set_active_input_label("Digit3");
            Timer::after(Duration::from_millis(20)).await;
            state.request_termination();
        }));

        let mut labels = Vec::new();
        while let Ok(UIRefreshState::InputLabel(label)) = ui.try_receive() {
            labels.push(label);
        }
        assert_eq!(labels.first().map(String::as_str), Some(""));
        assert_eq!(labels.last().map(String::as_str), Some("Digit3"));
    }

    #[test]
    fn test_terminated_session_renders_nothing() {
        let state = SessionState::new(30);
        let ui: &'static UIRefreshQueue = Box::leak(Box::new(UIRefreshQueue::new()));
        state.request_termination();

        block_on(run_tick_loop(&state, Duration::from_millis(10), ui.sender()));

        assert!(matches!(ui.try_receive(), Ok(UIRefreshState::SessionEnded)));
        assert!(ui.try_receive().is_err());
    }
}
