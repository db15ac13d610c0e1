//! Producer/consumer frame pipeline
//!
//! The producer (a background thread) steps the simulation, rasterizes into
//! an offscreen canvas and publishes the pixels; the consumer (the control
//! thread's event loop) blits the latest published frame on every
//! frame-ready notification and stops on quit.
//!
//! The shared buffer is a double-buffer swap: two fixed-size slots, allocated
//! once and never resized, with an atomically published front index. The
//! producer is the sole writer, the consumer the sole reader, so the worst
//! case is presenting a frame one publish behind - never a torn one.
//! Notifications may outnumber presents when the queue coalesces; a present
//! never happens without a notification. Waits are unbounded; the only
//! cancellation paths are the quit event and the producer stop flag.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::PresentError;
use crate::renderer::{PixmapCanvas, SceneRenderer};
use crate::sim::Simulation;

/// Double-buffered shared pixel storage.
pub struct FrameBuffer {
    len: usize,
    slots: [Mutex<Box<[u32]>>; 2],
    front: AtomicUsize,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            len,
            slots: [
                Mutex::new(vec![0; len].into_boxed_slice()),
                Mutex::new(vec![0; len].into_boxed_slice()),
            ],
            front: AtomicUsize::new(0),
        }
    }

    /// Pixels per frame.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Full overwrite of the back slot, then flip it to front.
    pub fn publish(&self, pixels: &[u32]) {
        let back = 1 - self.front.load(Ordering::Acquire);
        {
            let mut slot = self.slots[back].lock().unwrap_or_else(|e| e.into_inner());
            slot.copy_from_slice(pixels);
        }
        self.front.store(back, Ordering::Release);
    }

    /// Read the most recently published frame.
    pub fn with_front<R>(&self, f: impl FnOnce(&[u32]) -> R) -> R {
        let front = self.front.load(Ordering::Acquire);
        let slot = self.slots[front].lock().unwrap_or_else(|e| e.into_inner());
        f(&slot)
    }
}

/// Producer-side notification channel. Returns false once the consumer is
/// gone, which ends the pipeline.
pub trait FrameSink {
    fn frame_ready(&self) -> bool;
}

/// Run the frame pipeline until the stop flag is set or the sink closes.
///
/// One iteration = step, render, publish, notify, sleep. The loop never
/// terminates on its own and is the sole writer of the shared buffer.
pub fn run_pipeline(
    mut sim: Simulation,
    renderer: SceneRenderer,
    mut canvas: PixmapCanvas,
    frames: Arc<FrameBuffer>,
    sink: impl FrameSink,
    stop: Arc<AtomicBool>,
    interval: Duration,
) {
    let mut scratch = vec![0u32; frames.len()];
    log::info!("frame pipeline running, interval {interval:?}");
    while !stop.load(Ordering::Relaxed) {
        sim.step();
        renderer.render(&mut canvas, &sim);
        canvas.copy_pixels(&mut scratch);
        frames.publish(&scratch);
        if !sink.frame_ready() {
            log::debug!("event queue closed, stopping pipeline");
            break;
        }
        std::thread::sleep(interval);
    }
    log::info!("frame pipeline stopped after {} ticks", sim.ticks());
}

/// Everything the presentation loop reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayEvent {
    /// The producer published a new frame.
    FrameReady,
    /// Terminate the run.
    Quit,
    /// Anything else; ignored.
    Other,
}

/// Blocking external event source (consumer side).
pub trait EventQueue {
    fn wait_next(&mut self) -> DisplayEvent;
}

/// Visible display surface collaborator.
pub trait DisplaySurface {
    fn present(&mut self, pixels: &[u32]) -> Result<(), PresentError>;
}

/// Presentation loop: sole reader of the shared buffer.
pub struct Presenter<D: DisplaySurface> {
    display: D,
    frames: Arc<FrameBuffer>,
    presented: u64,
}

impl<D: DisplaySurface> Presenter<D> {
    pub fn new(display: D, frames: Arc<FrameBuffer>) -> Self {
        Self {
            display,
            frames,
            presented: 0,
        }
    }

    /// Frames presented so far.
    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// React to one event; returns false when the loop should stop.
    pub fn handle(&mut self, event: DisplayEvent) -> bool {
        match event {
            DisplayEvent::Quit => {
                log::info!("quit after {} presented frames", self.presented);
                false
            }
            DisplayEvent::FrameReady => {
                let display = &mut self.display;
                match self.frames.with_front(|pixels| display.present(pixels)) {
                    Ok(()) => {
                        self.presented += 1;
                        true
                    }
                    Err(err) => {
                        log::error!("{err}");
                        false
                    }
                }
            }
            DisplayEvent::Other => true,
        }
    }

    /// Block on the event queue until quit or a failed present.
    pub fn run(&mut self, events: &mut impl EventQueue) {
        while self.handle(events.wait_next()) {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Mode};
    use std::sync::mpsc;

    struct ChannelQueue(mpsc::Receiver<DisplayEvent>);

    impl EventQueue for ChannelQueue {
        fn wait_next(&mut self) -> DisplayEvent {
            self.0.recv().unwrap_or(DisplayEvent::Quit)
        }
    }

    struct ChannelSink(mpsc::Sender<()>);

    impl FrameSink for ChannelSink {
        fn frame_ready(&self) -> bool {
            self.0.send(()).is_ok()
        }
    }

    #[derive(Default)]
    struct CountingDisplay {
        presents: u64,
        fail: bool,
    }

    impl DisplaySurface for &mut CountingDisplay {
        fn present(&mut self, pixels: &[u32]) -> Result<(), PresentError> {
            assert!(!pixels.is_empty());
            if self.fail {
                return Err(PresentError("display gone".into()));
            }
            self.presents += 1;
            Ok(())
        }
    }

    #[test]
    fn test_framebuffer_swap() {
        let frames = FrameBuffer::new(4, 4);
        frames.publish(&[1; 16]);
        frames.with_front(|px| assert!(px.iter().all(|&p| p == 1)));
        frames.publish(&[2; 16]);
        frames.with_front(|px| assert!(px.iter().all(|&p| p == 2)));
        assert_eq!(frames.len(), 16);
    }

    #[test]
    fn test_presenter_liveness_bounds() {
        let frames = Arc::new(FrameBuffer::new(4, 4));
        frames.publish(&[7; 16]);

        let (tx, rx) = mpsc::channel();
        let produced = 5;
        for _ in 0..produced {
            tx.send(DisplayEvent::FrameReady).unwrap();
        }
        tx.send(DisplayEvent::Quit).unwrap();

        let mut display = CountingDisplay::default();
        let mut presenter = Presenter::new(&mut display, frames);
        presenter.run(&mut ChannelQueue(rx));

        // At least one present, never more than were produced.
        assert!(display.presents >= 1);
        assert!(display.presents <= produced);
    }

    #[test]
    fn test_presenter_ignores_unknown_events() {
        let frames = Arc::new(FrameBuffer::new(4, 4));
        let mut display = CountingDisplay::default();
        let mut presenter = Presenter::new(&mut display, frames);

        assert!(presenter.handle(DisplayEvent::Other));
        assert!(!presenter.handle(DisplayEvent::Quit));
        assert_eq!(display.presents, 0);
    }

    #[test]
    fn test_failed_present_stops_loop() {
        let frames = Arc::new(FrameBuffer::new(4, 4));
        let mut display = CountingDisplay {
            fail: true,
            ..Default::default()
        };
        let mut presenter = Presenter::new(&mut display, frames);
        assert!(!presenter.handle(DisplayEvent::FrameReady));
    }

    #[test]
    fn test_pipeline_produces_and_stops() {
        let config = Config {
            entity_count: 5,
            canvas_size: 16,
            ..Config::for_mode(Mode::Swarm)
        };
        let sim = Simulation::setup(&config).unwrap();
        let canvas = PixmapCanvas::new(16, 16).unwrap();
        let frames = Arc::new(FrameBuffer::new(16, 16));
        let stop = Arc::new(AtomicBool::new(false));

        let (tx, rx) = mpsc::channel();
        let worker = {
            let frames = Arc::clone(&frames);
            let stop = Arc::clone(&stop);
            std::thread::spawn(move || {
                run_pipeline(
                    sim,
                    SceneRenderer::default(),
                    canvas,
                    frames,
                    ChannelSink(tx),
                    stop,
                    Duration::from_millis(1),
                )
            })
        };

        // Wait for a couple of produced frames, then cancel.
        rx.recv().unwrap();
        rx.recv().unwrap();
        stop.store(true, Ordering::Relaxed);
        drop(rx);
        worker.join().unwrap();

        // The published frame is a rendered scene, not the zeroed initial slot.
        frames.with_front(|px| assert!(px.iter().any(|&p| p != 0)));
    }
}
