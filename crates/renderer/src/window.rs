use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use theme::{ColorPicker, ThemeStore};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, Event, MouseButton, Touch, TouchPhase, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::gpu::{FrameInputs, GpuState, RevealEnvelope};
use crate::params::GrainParams;
use crate::types::{backing_size, RendererConfig};

/// Opens the window and runs the event loop until it closes.
///
/// Everything lives on this one thread: gestures mutate the picker and
/// the store from event callbacks, the GPU is touched only from redraws,
/// and dropping `WindowState` on exit releases every resource once.
pub(crate) fn run_event_loop(config: RendererConfig, store: ThemeStore) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to initialize event loop")?;
    let window_size = PhysicalSize::new(config.surface_size.0, config.surface_size.1);
    let window = WindowBuilder::new()
        .with_title("colorfield")
        .with_inner_size(window_size)
        .build(&event_loop)
        .context("failed to create window")?;
    let window = Arc::new(window);

    let mut state = WindowState::new(window.clone(), &config, store)?;
    state.window().request_redraw();

    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(state.pacer.control_flow());

            match event {
                Event::WindowEvent { window_id, event } if window_id == state.window().id() => {
                    match event {
                        WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                            elwt.exit();
                        }
                        WindowEvent::CursorMoved { position, .. } => {
                            state.pointer_moved(position);
                        }
                        WindowEvent::CursorLeft { .. } => {
                            state.pointer_ended();
                        }
                        WindowEvent::MouseInput {
                            state: button_state,
                            button,
                            ..
                        } => {
                            if button == MouseButton::Left {
                                state.mouse_button(button_state);
                            }
                        }
                        WindowEvent::Touch(touch) => {
                            state.touch(touch);
                        }
                        WindowEvent::Resized(new_size) => {
                            state.apply_size(new_size);
                        }
                        WindowEvent::ScaleFactorChanged { .. } => {
                            let size = state.window().inner_size();
                            state.apply_size(size);
                        }
                        WindowEvent::RedrawRequested => match state.render_frame() {
                            Ok(()) => {}
                            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                state.gpu.reconfigure();
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                tracing::error!("surface out of memory; exiting");
                                elwt.exit();
                            }
                            Err(other) => {
                                tracing::warn!("surface error: {other:?}; retrying next frame");
                            }
                        },
                        _ => {}
                    }
                }
                Event::AboutToWait => {
                    if state.pacer.should_redraw(Instant::now()) {
                        state.window().request_redraw();
                    }
                }
                _ => {}
            }
        })
        .map_err(|err| anyhow!("event loop error: {err}"))
}

/// Aggregates the window, GPU resources, gesture state, and the theme
/// store for the lifetime of the event loop.
struct WindowState {
    window: Arc<Window>,
    gpu: GpuState,
    store: ThemeStore,
    picker: ColorPicker,
    pointer: PointerState,
    reveal: RevealEnvelope,
    clock: FrameClock,
    pacer: FramePacer,
    /// Window-physical → backing-surface pixel factor (capped DPR).
    backing_ratio: f64,
    max_pixel_ratio: f64,
}

impl WindowState {
    fn new(window: Arc<Window>, config: &RendererConfig, store: ThemeStore) -> Result<Self> {
        let physical = window.inner_size();
        let scale = window.scale_factor();
        let (backing, capped) = backing_size(physical, scale, config.max_pixel_ratio);

        let grain = GrainParams::sample(&mut rand::thread_rng());
        tracing::debug!(
            scale = grain.scale,
            intensity = grain.intensity,
            seed = grain.seed,
            "drew session grain parameters"
        );

        let gpu = GpuState::new(
            window.as_ref(),
            backing,
            capped,
            config.background,
            config.antialiasing,
            grain,
            config.marble_grid,
        )?;

        let logical = physical.to_logical::<f64>(scale);
        let now = Instant::now();
        Ok(Self {
            window,
            gpu,
            store,
            picker: ColorPicker::new(logical.width, logical.height),
            pointer: PointerState::default(),
            reveal: RevealEnvelope::new(config.reveal, now),
            clock: FrameClock::new(now),
            pacer: FramePacer::new(config.target_fps, now),
            backing_ratio: capped / scale,
            max_pixel_ratio: config.max_pixel_ratio,
        })
    }

    fn window(&self) -> &Window {
        self.window.as_ref()
    }

    /// Reacts to resizes and scale changes: new backing dimensions for
    /// the GPU, new viewport for the picker. The render loop keeps going.
    fn apply_size(&mut self, physical: PhysicalSize<u32>) {
        let scale = self.window.scale_factor();
        let (backing, capped) = backing_size(physical, scale, self.max_pixel_ratio);
        self.backing_ratio = capped / scale;
        self.gpu.resize(backing, capped);
        let logical = physical.to_logical::<f64>(scale);
        self.picker.set_viewport(logical.width, logical.height);
    }

    fn pointer_moved(&mut self, position: PhysicalPosition<f64>) {
        self.pointer.position = Some(position);
        if !self.pointer.pressed {
            return;
        }
        let logical = position.to_logical::<f64>(self.window.scale_factor());
        if !self.picker.is_dragging() {
            // Button went down before the first move reached us.
            self.picker.begin_drag(logical.x, logical.y, self.store.color());
        } else if let Some(next) = self.picker.update_drag(logical.x, logical.y) {
            self.store.update(next);
        }
    }

    fn mouse_button(&mut self, button_state: ElementState) {
        match button_state {
            ElementState::Pressed => {
                self.pointer.pressed = true;
                if let Some(position) = self.pointer.position {
                    let logical = position.to_logical::<f64>(self.window.scale_factor());
                    self.picker.begin_drag(logical.x, logical.y, self.store.color());
                }
            }
            ElementState::Released => {
                self.pointer.pressed = false;
                self.picker.end_drag();
            }
        }
    }

    /// Single-touch color picking; additional fingers are ignored until
    /// the tracked one lifts.
    fn touch(&mut self, touch: Touch) {
        match touch.phase {
            TouchPhase::Started => {
                if self.pointer.touch_id.is_some() {
                    return;
                }
                self.pointer.touch_id = Some(touch.id);
                self.pointer.position = Some(touch.location);
                let logical = touch.location.to_logical::<f64>(self.window.scale_factor());
                self.picker.begin_drag(logical.x, logical.y, self.store.color());
            }
            TouchPhase::Moved => {
                if self.pointer.touch_id != Some(touch.id) {
                    return;
                }
                self.pointer.position = Some(touch.location);
                let logical = touch.location.to_logical::<f64>(self.window.scale_factor());
                if let Some(next) = self.picker.update_drag(logical.x, logical.y) {
                    self.store.update(next);
                }
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                if self.pointer.touch_id != Some(touch.id) {
                    return;
                }
                self.pointer.touch_id = None;
                self.pointer_ended();
            }
        }
    }

    fn pointer_ended(&mut self) {
        self.pointer.pressed = false;
        self.picker.end_drag();
    }

    /// Pointer position in backing-surface pixels while a drag is live.
    fn drag_position(&self) -> Option<(f32, f32)> {
        if !self.picker.is_dragging() {
            return None;
        }
        let position = self.pointer.position?;
        Some((
            (position.x * self.backing_ratio) as f32,
            (position.y * self.backing_ratio) as f32,
        ))
    }

    fn render_frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let now = Instant::now();
        let inputs = FrameInputs {
            time: self.clock.seconds(now),
            base_rgb: self.store.theme().background.to_rgb(),
            reveal: self.reveal.level(now),
            drag: self.drag_position(),
        };
        self.gpu.render_frame(inputs)
    }
}

/// Last observed pointer, shared between the mouse and touch paths.
#[derive(Default)]
struct PointerState {
    position: Option<PhysicalPosition<f64>>,
    pressed: bool,
    touch_id: Option<u64>,
}

/// Monotonic clock anchored at renderer start-up; drives the time uniform.
struct FrameClock {
    origin: Instant,
}

impl FrameClock {
    fn new(origin: Instant) -> Self {
        Self { origin }
    }

    fn seconds(&self, now: Instant) -> f32 {
        now.saturating_duration_since(self.origin).as_secs_f32()
    }
}

/// Decides when the next redraw is due.
///
/// Uncapped, every `AboutToWait` requests a redraw and presentation
/// paces us to the display. With a cap, redraws are gated on a rolling
/// deadline and the loop sleeps via `WaitUntil` in between.
struct FramePacer {
    interval: Option<Duration>,
    next_deadline: Instant,
}

impl FramePacer {
    fn new(target_fps: Option<f32>, now: Instant) -> Self {
        let interval = target_fps
            .filter(|fps| *fps > 0.0)
            .map(|fps| Duration::from_secs_f32(1.0 / fps));
        Self {
            interval,
            next_deadline: now,
        }
    }

    fn should_redraw(&mut self, now: Instant) -> bool {
        match self.interval {
            None => true,
            Some(interval) => {
                if now >= self.next_deadline {
                    self.next_deadline = now + interval;
                    true
                } else {
                    false
                }
            }
        }
    }

    fn control_flow(&self) -> ControlFlow {
        match self.interval {
            None => ControlFlow::Wait,
            Some(_) => ControlFlow::WaitUntil(self.next_deadline),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncapped_pacer_always_redraws() {
        let now = Instant::now();
        let mut pacer = FramePacer::new(None, now);
        assert!(pacer.should_redraw(now));
        assert!(pacer.should_redraw(now));
        assert!(matches!(pacer.control_flow(), ControlFlow::Wait));
    }

    #[test]
    fn capped_pacer_spaces_redraws_by_the_interval() {
        let now = Instant::now();
        let mut pacer = FramePacer::new(Some(10.0), now);
        assert!(pacer.should_redraw(now));
        assert!(!pacer.should_redraw(now + Duration::from_millis(50)));
        assert!(pacer.should_redraw(now + Duration::from_millis(101)));
        assert!(matches!(pacer.control_flow(), ControlFlow::WaitUntil(_)));
    }

    #[test]
    fn non_positive_fps_means_uncapped() {
        let now = Instant::now();
        let mut pacer = FramePacer::new(Some(0.0), now);
        assert!(pacer.should_redraw(now));
        assert!(pacer.should_redraw(now));
    }

    #[test]
    fn clock_measures_from_origin() {
        let origin = Instant::now();
        let clock = FrameClock::new(origin);
        let sample = clock.seconds(origin + Duration::from_millis(1500));
        assert!((sample - 1.5).abs() < 1e-3);
        // Never negative, even for a now before the origin.
        assert_eq!(clock.seconds(origin), 0.0);
    }
}
