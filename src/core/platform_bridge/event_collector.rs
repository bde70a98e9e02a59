//=========================================================================
// Event Collector
//=========================================================================
//
// Core-side reader for platform events.
//
// Architecture:
//   Receiver<PlatformEvent> → collect_frame() → TickControl
//
// Blocks until a frame boundary arrives, then drains whatever else is
// queued (bounded). Several queued frames coalesce into the latest one,
// so a core thread that falls behind skips frames instead of lagging.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::ops::ControlFlow;
use std::time::Instant;

use crossbeam_channel::{Receiver, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::PlatformEvent;

//=== TickControl =========================================================

/// Update loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Frame(Instant),
    Exit,
}

//=== EventCollector ======================================================

/// Collects platform events into one frame signal at a time.
pub(crate) struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    focus_change: Option<bool>,
}

impl EventCollector {
    pub(crate) fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            receiver,
            focus_change: None,
        }
    }

    /// Waits for the next frame boundary (bounded drain to prevent starvation).
    pub(crate) fn collect_frame(&mut self) -> TickControl {
        const MAX_EVENTS_PER_FRAME: usize = 100;

        loop {
            let mut frame = None;

            match self.receiver.recv() {
                Ok(event) => {
                    if self.handle_event(event, &mut frame).is_break() {
                        return TickControl::Exit;
                    }
                }
                Err(_) => return TickControl::Exit,
            }

            let mut drained = 0;
            while drained < MAX_EVENTS_PER_FRAME {
                match self.receiver.try_recv() {
                    Ok(event) => {
                        if self.handle_event(event, &mut frame).is_break() {
                            return TickControl::Exit;
                        }
                        drained += 1;
                    }
                    Err(TryRecvError::Disconnected) => return TickControl::Exit,
                    Err(TryRecvError::Empty) => break,
                }
            }

            if drained >= MAX_EVENTS_PER_FRAME {
                warn!("Event queue backlog: drained {} events this frame", drained);
            }

            if let Some(now) = frame {
                return TickControl::Frame(now);
            }
        }
    }

    /// Latest focus change since the last call, if any.
    pub(crate) fn take_focus_change(&mut self) -> Option<bool> {
        self.focus_change.take()
    }

    fn handle_event(&mut self, event: PlatformEvent, frame: &mut Option<Instant>) -> ControlFlow<()> {
        match event {
            PlatformEvent::Frame(now) => {
                *frame = Some(now);
                ControlFlow::Continue(())
            }
            PlatformEvent::FocusChanged(focused) => {
                self.focus_change = Some(focused);
                ControlFlow::Continue(())
            }
            PlatformEvent::WindowClosed => ControlFlow::Break(()),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::time::Duration;

    #[test]
    fn collect_returns_frame_instant() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);
        let now = Instant::now();

        tx.send(PlatformEvent::Frame(now)).unwrap();

        assert_eq!(collector.collect_frame(), TickControl::Frame(now));
    }

    #[test]
    fn collect_coalesces_queued_frames() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);
        let start = Instant::now();

        tx.send(PlatformEvent::Frame(start)).unwrap();
        tx.send(PlatformEvent::Frame(start + Duration::from_millis(16))).unwrap();
        tx.send(PlatformEvent::Frame(start + Duration::from_millis(33))).unwrap();

        assert_eq!(
            collector.collect_frame(),
            TickControl::Frame(start + Duration::from_millis(33))
        );
    }

    #[test]
    fn collect_records_focus_changes() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);
        let now = Instant::now();

        tx.send(PlatformEvent::FocusChanged(false)).unwrap();
        tx.send(PlatformEvent::Frame(now)).unwrap();

        assert_eq!(collector.collect_frame(), TickControl::Frame(now));
        assert_eq!(collector.take_focus_change(), Some(false));
        assert_eq!(collector.take_focus_change(), None);
    }

    #[test]
    fn collect_returns_exit_on_window_closed() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(PlatformEvent::Frame(Instant::now())).unwrap();
        tx.send(PlatformEvent::WindowClosed).unwrap();

        assert_eq!(collector.collect_frame(), TickControl::Exit);
    }

    #[test]
    fn collect_returns_exit_on_disconnect() {
        let (tx, rx) = unbounded::<PlatformEvent>();
        let mut collector = EventCollector::new(rx);

        drop(tx);

        assert_eq!(collector.collect_frame(), TickControl::Exit);
    }
}
