//! Runtime driver
//!
//! One task owns the presentation and selects over fired timers, terminal
//! commands and a shutdown signal. Every state mutation happens here.

use crate::presentation::Presentation;
use crate::render::Renderer;
use crate::terminal::TerminalCommand;
use crate::timer::{Fired, TimerService, TokioTimers};
use std::future::Future;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Why the driver loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `quit` command
    Quit,
    /// Command channel closed (end of input)
    InputClosed,
    /// Shutdown signal
    Shutdown,
}

/// Drive `presentation` until quit, end of input or `shutdown`
///
/// Starts the presentation if it has not been started yet.
pub async fn run<R, S>(
    presentation: &mut Presentation<TokioTimers, R>,
    fired_rx: &mut mpsc::UnboundedReceiver<Fired>,
    commands: &mut mpsc::Receiver<TerminalCommand>,
    shutdown: S,
) -> StopReason
where
    R: Renderer,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    presentation.start();

    let reason = loop {
        tokio::select! {
            Some(fired) = fired_rx.recv() => {
                if presentation.player_mut().timers_mut().accept(&fired) {
                    presentation.on_timer(fired);
                }
            }
            command = commands.recv() => match command {
                Some(TerminalCommand::Quit) => break StopReason::Quit,
                Some(command) => {
                    let now = presentation.player().timers().now_ms();
                    for event in command.to_input_events(now) {
                        if presentation.handle_input(event).is_none() {
                            debug!("{:?} produced no intent", event);
                        }
                    }
                }
                None => break StopReason::InputClosed,
            },
            _ = &mut shutdown => break StopReason::Shutdown,
        }
    };

    info!(
        "Presentation stopped ({:?}) on slide {} [{}]",
        reason,
        presentation.player().state().current_index(),
        presentation.player().state().phase()
    );
    reason
}
