/*
 *  scheduler.rs
 *
 *  bitx-strip - mixer state at a glance
 *  (c) 2020-26 Stuart Hunter
 *
 *  Render thread: owns the state, applies commands, redraws
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use log::{debug, error, info, warn};
use tokio::sync::mpsc::{self, error::TryRecvError, Receiver, Sender};

use crate::display::manager::PerformanceMetrics;
use crate::display::{DrawableDisplay, StripRenderer};
use crate::protocol::Command;
use crate::state::StripState;

/// Producer side of the render queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct RenderHandle {
    tx: Sender<Command>,
}

impl RenderHandle {
    /// Queue a command for the render loop; false once the loop is gone.
    pub async fn post(&self, cmd: Command) -> bool {
        self.tx.send(cmd).await.is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Bounded FIFO between producers and the render loop.
pub fn channel(depth: usize) -> (RenderHandle, Receiver<Command>) {
    let (tx, rx) = mpsc::channel(depth.max(1));
    (RenderHandle { tx }, rx)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub applied: u64,
    pub rejected: u64,
    pub redraws: u64,
    pub render_errors: u64,
}

/// Single consumer of the command queue.
///
/// Only this loop touches `StripState` and the renderer, so the network
/// side never sees a half-applied update. Commands apply in arrival order.
pub struct RenderScheduler<D: DrawableDisplay> {
    state: StripState,
    renderer: StripRenderer<D>,
    rx: Receiver<Command>,
    coalesce: bool,
    stats: SchedulerStats,
}

impl<D: DrawableDisplay> RenderScheduler<D> {
    pub fn new(renderer: StripRenderer<D>, rx: Receiver<Command>, coalesce: bool) -> Self {
        Self {
            state: StripState::new(),
            renderer,
            rx,
            coalesce,
            stats: SchedulerStats::default(),
        }
    }

    /// Draw the startup frame, then apply and redraw until every
    /// producer has dropped its handle. Hands itself back for inspection.
    ///
    /// Drawing and flushing are synchronous; drive this on the main task
    /// (`block_on`), not through `tokio::spawn`.
    pub async fn run(mut self) -> Self {
        info!("render loop started (coalesce: {})", self.coalesce);
        self.redraw();

        while let Some(cmd) = self.rx.recv().await {
            let mut dirty = self.apply(cmd);
            if self.coalesce {
                loop {
                    match self.rx.try_recv() {
                        Ok(next) => dirty |= self.apply(next),
                        Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
                    }
                }
            }
            if dirty {
                self.redraw();
            }
        }

        info!(
            "render loop stopped: {} applied, {} rejected, {} redraws",
            self.stats.applied, self.stats.rejected, self.stats.redraws
        );
        self
    }

    /// Apply one command; true when the state changed.
    fn apply(&mut self, cmd: Command) -> bool {
        debug!("apply {}", cmd);
        match self.state.apply(cmd) {
            Ok(()) => {
                self.stats.applied += 1;
                true
            }
            Err(e) => {
                warn!("dropped command: {}", e);
                self.stats.rejected += 1;
                false
            }
        }
    }

    fn redraw(&mut self) {
        match self.renderer.render(&self.state) {
            Ok(()) => self.stats.redraws += 1,
            Err(e) => {
                error!("render failed: {}", e);
                self.stats.render_errors += 1;
            }
        }
    }

    pub fn state(&self) -> &StripState {
        &self.state
    }

    pub fn stats(&self) -> &SchedulerStats {
        &self.stats
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        self.renderer.metrics()
    }

    pub fn display(&self) -> &D {
        self.renderer.driver()
    }

    pub fn display_mut(&mut self) -> &mut D {
        self.renderer.driver_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::drivers::mock::MockDriver;
    use crate::display::StripLayout;

    fn scheduler(coalesce: bool, depth: usize) -> (RenderHandle, RenderScheduler<MockDriver>) {
        let layout = StripLayout::default();
        let driver = MockDriver::new_with_size(layout.width, layout.height).unwrap();
        let renderer = StripRenderer::new(driver, layout).unwrap();
        let (handle, rx) = channel(depth);
        (handle, RenderScheduler::new(renderer, rx, coalesce))
    }

    #[tokio::test]
    async fn test_initial_frame_only() {
        let (handle, sched) = scheduler(true, 4);
        drop(handle);
        let done = sched.run().await;
        assert_eq!(done.stats().redraws, 1);
        assert_eq!(done.state(), &StripState::new());
    }

    #[tokio::test]
    async fn test_applies_in_order() {
        let (handle, sched) = scheduler(false, 16);
        assert!(handle.post(Command::SetTrackVu { index: 3, raw: 64 }).await);
        assert!(handle.post(Command::SetTrackVu { index: 3, raw: 100 }).await);
        assert!(handle.post(Command::SetPage("Drums".into())).await);
        drop(handle);

        let done = sched.run().await;
        assert!((done.state().levels()[3].level - 100.0 / 127.0).abs() < 1e-9);
        assert_eq!(done.state().meta().page_title, "Drums");
        // startup frame plus one per command
        assert_eq!(done.stats().redraws, 4);
        assert_eq!(done.stats().applied, 3);
        assert_eq!(done.metrics().frame_count, 4);
    }

    #[tokio::test]
    async fn test_coalesces_queued_burst() {
        let (handle, sched) = scheduler(true, 16);
        for raw in 0..10 {
            assert!(handle.post(Command::SetMasterVu { raw }).await);
        }
        drop(handle);

        let done = sched.run().await;
        assert_eq!(done.stats().applied, 10);
        // startup frame plus one for the whole burst
        assert_eq!(done.stats().redraws, 2);
        assert!((done.state().master().level - 9.0 / 127.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_bad_index_skips_redraw() {
        let (handle, sched) = scheduler(false, 4);
        assert!(handle.post(Command::SetKnobValue { index: 8, value: 0.5 }).await);
        drop(handle);

        let done = sched.run().await;
        assert_eq!(done.stats().rejected, 1);
        assert_eq!(done.stats().redraws, 1);
        assert_eq!(done.state(), &StripState::new());
    }

    #[tokio::test]
    async fn test_render_errors_do_not_stop_loop() {
        let (handle, sched) = scheduler(false, 4);
        sched.display().state().lock().unwrap().simulate_flush_failure = true;
        assert!(handle.post(Command::SetClip("Verse".into())).await);
        drop(handle);

        let done = sched.run().await;
        assert_eq!(done.stats().render_errors, 2);
        assert_eq!(done.state().meta().clip_text, "Verse");
    }

    #[tokio::test]
    async fn test_post_after_loop_gone() {
        let (handle, sched) = scheduler(true, 4);
        drop(sched);
        assert!(handle.is_closed());
        assert!(!handle.post(Command::SetMasterVu { raw: 1 }).await);
    }
}
