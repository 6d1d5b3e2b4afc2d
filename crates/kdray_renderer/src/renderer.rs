//! Row-parallel renderer.
//!
//! Row indices go into a shared queue. A fixed pool of workers takes rows
//! from it, shades each row independently and sends the finished row to a
//! single consumer thread, which is the only writer to the pixel sink.
//! Rows arrive in any order; the image does not depend on it.

use crossbeam::channel::{self, Receiver};

use crate::error::{RenderError, RenderResult};
use crate::pixel::{PixelSink, SinkGuard};
use crate::timer::RenderTimer;
use crate::tracer::{new_tracer, RayTracer};
use crate::{Camera, RenderConfig, Scene, TracerKind};
use kdray_math::Color3;

/// Progress report, emitted once before rendering and then once per
/// finished row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderProgress {
    pub rows_completed: u32,
    pub total_rows: u32,
}

impl RenderProgress {
    pub fn percent_complete(&self) -> f64 {
        self.rows_completed as f64 / self.total_rows as f64 * 100.0
    }
}

/// A finished row on its way to the consumer.
struct RowResult {
    y: u32,
    colors: Vec<Color3>,
}

/// Render `scene` into `sink`, blocking until every row is written.
///
/// With `config.threads` of 0 or 1 the calling thread does all the work.
/// Otherwise rows are shaded by `config.threads` workers and written by one
/// consumer thread, which also drives `on_progress`.
pub fn render<S, F>(
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
    kind: TracerKind,
    sink: &mut S,
    mut on_progress: F,
) -> RenderResult<()>
where
    S: PixelSink + Send + ?Sized,
    F: FnMut(RenderProgress) + Send,
{
    let (width, height) = (config.width, config.height);
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidDimensions { width, height });
    }
    if (sink.width(), sink.height()) != (width, height) {
        return Err(RenderError::SinkMismatch {
            expected: (width, height),
            actual: (sink.width(), sink.height()),
        });
    }

    log::info!(
        "Rendering {}x{} with the {:?} tracer on {} thread(s)",
        width,
        height,
        kind,
        config.threads.max(1)
    );
    let _timer = RenderTimer::new(format!("Render {}x{}", width, height));

    let tracer = new_tracer(kind, scene, camera, config);
    on_progress(RenderProgress {
        rows_completed: 0,
        total_rows: height,
    });

    if config.threads <= 1 {
        render_single_threaded(tracer.as_ref(), sink, on_progress);
        return Ok(());
    }

    render_multi_threaded(tracer.as_ref(), config.threads, sink, on_progress)
}

fn render_row(tracer: &dyn RayTracer, y: u32) -> Vec<Color3> {
    let (width, _) = tracer.resolution();
    (0..width).map(|x| tracer.pixel_color(x, y)).collect()
}

fn render_single_threaded<S, F>(tracer: &dyn RayTracer, sink: &mut S, mut on_progress: F)
where
    S: PixelSink + ?Sized,
    F: FnMut(RenderProgress),
{
    let (_, height) = tracer.resolution();
    for y in 0..height {
        let colors = render_row(tracer, y);
        SinkGuard::new(&mut *sink).set_row(y, &colors);
        on_progress(RenderProgress {
            rows_completed: y + 1,
            total_rows: height,
        });
    }
}

fn render_multi_threaded<S, F>(
    tracer: &dyn RayTracer,
    threads: usize,
    sink: &mut S,
    on_progress: F,
) -> RenderResult<()>
where
    S: PixelSink + Send + ?Sized,
    F: FnMut(RenderProgress) + Send,
{
    let (_, height) = tracer.resolution();

    let (row_tx, row_rx) = channel::unbounded::<u32>();
    for y in 0..height {
        // `row_rx` is alive, so the queue is never disconnected here
        let _ = row_tx.send(y);
    }
    drop(row_tx);

    let (result_tx, result_rx) = channel::unbounded::<RowResult>();

    std::thread::scope(|scope| {
        let workers: Vec<_> = (0..threads)
            .map(|_| {
                let rows = row_rx.clone();
                let results = result_tx.clone();
                scope.spawn(move || {
                    for y in rows.iter() {
                        let colors = render_row(tracer, y);
                        if results.send(RowResult { y, colors }).is_err() {
                            break;
                        }
                    }
                })
            })
            .collect();
        // Workers hold the only senders, so the consumer stops once they finish
        drop(result_tx);

        let consumer = scope.spawn(move || drain_rows(result_rx, sink, height, on_progress));

        let mut failed = false;
        for worker in workers {
            failed |= worker.join().is_err();
        }
        let drained = consumer.join();

        match drained {
            Ok(rows) if !failed && rows == height => Ok(()),
            Ok(rows) => {
                log::error!("Render finished with {} of {} rows", rows, height);
                Err(RenderError::WorkerPanicked)
            }
            Err(_) => Err(RenderError::WorkerPanicked),
        }
    })
}

/// Write finished rows into the sink as they arrive. Returns the number of
/// distinct rows written.
fn drain_rows<S, F>(
    results: Receiver<RowResult>,
    sink: &mut S,
    height: u32,
    mut on_progress: F,
) -> u32
where
    S: PixelSink + ?Sized,
    F: FnMut(RenderProgress),
{
    let mut received = vec![false; height as usize];
    let mut completed = 0;

    for RowResult { y, colors } in results.iter() {
        if received[y as usize] {
            log::warn!("Row {} was rendered more than once; keeping the first", y);
            continue;
        }
        received[y as usize] = true;

        SinkGuard::new(&mut *sink).set_row(y, &colors);

        completed += 1;
        let progress = RenderProgress {
            rows_completed: completed,
            total_rows: height,
        };
        log::debug!("Row {} done ({:.1}%)", y, progress.percent_complete());
        on_progress(progress);
    }

    completed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracer::test_scenes;
    use crate::ImageBuffer;
    use std::sync::Mutex;

    fn small_config(threads: usize) -> RenderConfig {
        RenderConfig::default()
            .with_resolution(48, 32)
            .with_threads(threads)
    }

    fn render_basic(threads: usize, kind: TracerKind) -> ImageBuffer {
        let scene = test_scenes::basic();
        let camera = test_scenes::basic_camera();
        let config = small_config(threads);
        let mut image = ImageBuffer::new(config.width, config.height);
        render(&camera, &scene, &config, kind, &mut image, |_| {}).unwrap();
        image
    }

    #[test]
    fn test_single_and_multi_threaded_match() {
        for kind in [TracerKind::Direct, TracerKind::Recursive] {
            let single = render_basic(1, kind);
            let multi = render_basic(8, kind);
            assert_eq!(single, multi, "{:?} tracer differs across thread counts", kind);
        }
    }

    #[test]
    fn test_render_is_idempotent() {
        let first = render_basic(4, TracerKind::Direct);
        let second = render_basic(4, TracerKind::Direct);
        assert_eq!(first, second);
    }

    #[test]
    fn test_image_matches_pixel_color() {
        let scene = test_scenes::basic();
        let camera = test_scenes::basic_camera();
        let config = small_config(3);
        let mut image = ImageBuffer::new(config.width, config.height);
        render(&camera, &scene, &config, TracerKind::Direct, &mut image, |_| {}).unwrap();

        let tracer = new_tracer(TracerKind::Direct, &scene, &camera, &config);
        for (x, y) in [(0, 0), (24, 16), (47, 31)] {
            assert_eq!(image.get(x, y), tracer.pixel_color(x, y).clamp());
        }
    }

    #[test]
    fn test_progress_reports_every_row() {
        for threads in [1, 6] {
            let scene = test_scenes::basic();
            let camera = test_scenes::basic_camera();
            let config = small_config(threads);
            let mut image = ImageBuffer::new(config.width, config.height);

            let events = Mutex::new(Vec::new());
            render(&camera, &scene, &config, TracerKind::Direct, &mut image, |p| {
                events.lock().unwrap().push(p)
            })
            .unwrap();

            let events = events.into_inner().unwrap();
            assert_eq!(events.len(), config.height as usize + 1);
            assert_eq!(events[0].percent_complete(), 0.0);
            for (i, event) in events.iter().enumerate() {
                assert_eq!(event.rows_completed, i as u32);
            }
            assert_eq!(events.last().map(RenderProgress::percent_complete), Some(100.0));
        }
    }

    #[test]
    fn test_sink_mismatch() {
        let scene = test_scenes::basic();
        let camera = test_scenes::basic_camera();
        let config = small_config(2);
        let mut image = ImageBuffer::new(10, 10);

        let err = render(&camera, &scene, &config, TracerKind::Direct, &mut image, |_| {});
        assert_eq!(
            err,
            Err(RenderError::SinkMismatch {
                expected: (48, 32),
                actual: (10, 10),
            })
        );
    }

    #[test]
    fn test_zero_dimensions() {
        let scene = test_scenes::basic();
        let camera = test_scenes::basic_camera();
        let config = small_config(2).with_resolution(0, 10);
        let mut image = ImageBuffer::new(0, 10);

        let err = render(&camera, &scene, &config, TracerKind::Direct, &mut image, |_| {});
        assert_eq!(
            err,
            Err(RenderError::InvalidDimensions {
                width: 0,
                height: 10
            })
        );
    }

    #[test]
    fn test_more_threads_than_rows() {
        let scene = test_scenes::spheres_only();
        let camera = test_scenes::basic_camera();
        let config = RenderConfig::default()
            .with_resolution(8, 2)
            .with_threads(16);
        let mut image = ImageBuffer::new(8, 2);
        assert!(render(&camera, &scene, &config, TracerKind::Recursive, &mut image, |_| {}).is_ok());
    }
}
