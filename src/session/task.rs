//! Executor entry point: spawns the session loops and routes UI input.

use embassy_executor::Spawner;

use crate::InputQueueReceiver;
use crate::control::CommandKind;

use super::SessionContext;
use super::camera_poller::{camera_task, secondary_reload_task};
use super::dispatcher::{dispatch_task, motor_stop_task};
use super::input_router::{Effect, InputRouter};
use super::state::SessionState;
use super::tick_loop::tick_task;

/// Spawn the long-lived loops and the input routing task.
pub fn start_session(spawner: Spawner, context: &'static SessionContext, input_rx: InputQueueReceiver) {
    log::info!("Session started against {}", context.config.endpoint);

    if let Err(e) = spawner.spawn(tick_task(context)) {
        log::error!("Failed to spawn tick loop: {:?}", e);
    }
    if let Err(e) = spawner.spawn(camera_task(context)) {
        log::error!("Failed to spawn camera poller: {:?}", e);
    }
    if let Err(e) = spawner.spawn(input_task(spawner, context, input_rx)) {
        log::error!("Failed to spawn input router: {:?}", e);
    }
}

/// Feed queued input through the router until the session is terminated.
/// Events queued behind the terminating one are never read.
pub async fn route_inputs(router: &InputRouter<'_>, state: &SessionState, input_rx: InputQueueReceiver, mut apply: impl FnMut(Effect)) {
    while state.is_running() {
        let event = input_rx.receive().await;
        for effect in router.handle(event) {
            apply(effect);
        }
    }
}

#[embassy_executor::task]
async fn input_task(spawner: Spawner, context: &'static SessionContext, input_rx: InputQueueReceiver) {
    let router = InputRouter::new(&context.state, &context.config.keymap);
    route_inputs(&router, &context.state, input_rx, |effect| apply(spawner, context, effect)).await;
    log::info!("Input routing stopped");
}

fn apply(spawner: Spawner, context: &'static SessionContext, effect: Effect) {
    match effect {
        Effect::Dispatch(command) if command.kind() == CommandKind::MotorStop => {
            if spawner.spawn(motor_stop_task(context)).is_err() {
                log::warn!("Motor stop pool exhausted, stop dropped");
            }
        }
        Effect::Dispatch(command) => {
            if spawner.spawn(dispatch_task(context, command)).is_err() {
                log::debug!("Dispatch pool exhausted, command dropped");
            }
        }
        Effect::ReloadSecondaryCamera => {
            if spawner.spawn(secondary_reload_task(context)).is_err() {
                log::debug!("Secondary camera reload already pending, request dropped");
            }
        }
    }
}
