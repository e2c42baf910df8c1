//! Fire-and-forget command dispatch.
//!
//! Every command gets its own request and its own task. Nothing is queued or
//! retried, and responses from overlapping dispatches may land in any order;
//! they only ever refresh the status display.

use crate::UIRefreshQueueSender;
use crate::control::{Command, Telemetry, Transport};
use crate::ui::{UIRefreshState, publish};

use super::SessionContext;

/// Upper bound on dispatches in flight at once. Further commands are dropped.
pub const DISPATCH_POOL_SIZE: usize = 16;

/// Slots reserved for `MotorStop`. Other commands never occupy them.
pub const MOTOR_STOP_POOL_SIZE: usize = 8;

pub struct CommandDispatcher<'a, T: Transport> {
    transport: &'a T,
    ui_refresh_tx: UIRefreshQueueSender,
}

impl<'a, T: Transport> CommandDispatcher<'a, T> {
    pub fn new(transport: &'a T, ui_refresh_tx: UIRefreshQueueSender) -> Self {
        Self { transport, ui_refresh_tx }
    }

    /// Send one command and render the telemetry that comes back, if any.
    ///
    /// An empty body yields `None` and leaves the display untouched. Transport
    /// and decode failures are logged and otherwise ignored.
    pub async fn send(&self, command: &Command) -> Option<Telemetry> {
        let body = match self.transport.post_command(&command.to_payload()).await {
            Ok(body) => body,
            Err(e) => {
                log::warn!("Command {} not delivered: {}", command, e);
                return None;
            }
        };

        if body.trim().is_empty() {
            return None;
        }

        match Telemetry::from_json(&body) {
            Ok(telemetry) => {
                publish(&self.ui_refresh_tx, UIRefreshState::Telemetry(telemetry.clone()));
                Some(telemetry)
            }
            Err(e) => {
                log::warn!("Response to {} not rendered: {}", command, e);
                None
            }
        }
    }
}

#[embassy_executor::task(pool_size = DISPATCH_POOL_SIZE)]
pub async fn dispatch_task(context: &'static SessionContext, command: Command) {
    CommandDispatcher::new(&context.transport, context.ui_refresh_tx).send(&command).await;
}

#[embassy_executor::task(pool_size = MOTOR_STOP_POOL_SIZE)]
pub async fn motor_stop_task(context: &'static SessionContext) {
    CommandDispatcher::new(&context.transport, context.ui_refresh_tx).send(&Command::motor_stop()).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UIRefreshQueue;
    use crate::control::client::testing::MockTransport;
    use crate::control::telemetry::tests::FULL_PAYLOAD;
    use crate::control::CommandKind;
    use crate::control::client::TransportError;
    use crate::control::command::CommandValue;
    use embassy_futures::block_on;

    fn queue() -> &'static UIRefreshQueue {
        Box::leak(Box::new(UIRefreshQueue::new()))
    }

    #[test]
    fn test_posts_the_encoded_command() {
        let transport = MockTransport::new();
        let ui = queue();
        let dispatcher = CommandDispatcher::new(&transport, ui.sender());

        block_on(dispatcher.send(&Command::drive(30)));

        let posted = transport.posted.borrow();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].command, CommandKind::Move);
        assert_eq!(posted[0].value, CommandValue::Number(30));
    }

    #[test]
    fn test_empty_body_renders_nothing() {
        let transport = MockTransport::new().reply(Ok(String::new()));
        let ui = queue();
        let dispatcher = CommandDispatcher::new(&transport, ui.sender());

        assert_eq!(block_on(dispatcher.send(&Command::motor_stop())), None);
        assert!(ui.try_receive().is_err());
    }

    #[test]
    fn test_telemetry_is_returned_and_rendered() {
        let transport = MockTransport::new().reply(Ok(FULL_PAYLOAD.to_string()));
        let ui = queue();
        let dispatcher = CommandDispatcher::new(&transport, ui.sender());

        let telemetry = block_on(dispatcher.send(&Command::turn(-30))).unwrap();
        assert_eq!(telemetry.battery_voltage, Some(3.94));
        match ui.try_receive() {
            Ok(UIRefreshState::Telemetry(rendered)) => assert_eq!(rendered, telemetry),
            _ => panic!("Expected a telemetry update"),
        }
    }

    #[test]
    fn test_failures_are_swallowed() {
        let transport = MockTransport::new()
            .reply(Err(TransportError::Network("connection refused".to_string())))
            .reply(Err(TransportError::Status(400)))
            .reply(Ok("not json".to_string()));
        let ui = queue();
        let dispatcher = CommandDispatcher::new(&transport, ui.sender());

        for _ in 0..3 {
            assert_eq!(block_on(dispatcher.send(&Command::face("happy"))), None);
        }
        assert!(ui.try_receive().is_err());
        assert_eq!(transport.posted.borrow().len(), 3);
    }
}
