//! Desktop event loop implementation using winit

use std::time::Instant;

use crate::input;
use crate::window::DesktopWindow;
use trailcast_platform::{
    ControlFlow, Event, EventLoop, PlatformError, Window, WindowConfig, WindowEvent,
};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, StartCause, WindowEvent as WinitWindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow as WinitControlFlow, EventLoop as WinitEventLoop};
use winit::window::WindowId;

/// Desktop event loop wrapping winit's event loop
pub struct DesktopEventLoop {
    event_loop: WinitEventLoop<()>,
    window_config: WindowConfig,
}

impl DesktopEventLoop {
    /// Create a new desktop event loop
    pub fn new(config: WindowConfig) -> Result<Self, PlatformError> {
        // NOTE(macos): Regular activation policy so a non-bundled binary gets a
        // normal, focusable app window.
        let event_loop = {
            let mut builder = WinitEventLoop::builder();

            #[cfg(target_os = "macos")]
            {
                use winit::platform::macos::{ActivationPolicy, EventLoopBuilderExtMacOS};
                builder.with_activation_policy(ActivationPolicy::Regular);
            }

            builder
                .build()
                .map_err(|e| PlatformError::EventLoop(e.to_string()))?
        };

        Ok(Self {
            event_loop,
            window_config: config,
        })
    }
}

impl EventLoop for DesktopEventLoop {
    type Window = DesktopWindow;

    fn run<F>(self, handler: F) -> Result<(), PlatformError>
    where
        F: FnMut(Event, &mut Self::Window) -> ControlFlow + 'static,
    {
        let mut app = DesktopApp::new(self.window_config, handler);
        self.event_loop
            .run_app(&mut app)
            .map_err(|e| PlatformError::EventLoop(e.to_string()))?;
        match app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Internal winit application handler
struct DesktopApp<F>
where
    F: FnMut(Event, &mut DesktopWindow) -> ControlFlow,
{
    window_config: WindowConfig,
    window: Option<DesktopWindow>,
    handler: F,
    /// Deadline of the next frame requested by the handler
    next_frame: Option<Instant>,
    /// Window creation failure, reported from `run`
    error: Option<PlatformError>,
    should_exit: bool,
}

impl<F> DesktopApp<F>
where
    F: FnMut(Event, &mut DesktopWindow) -> ControlFlow,
{
    fn new(window_config: WindowConfig, handler: F) -> Self {
        Self {
            window_config,
            window: None,
            handler,
            next_frame: None,
            error: None,
            should_exit: false,
        }
    }

    fn handle_event(&mut self, event_loop: &ActiveEventLoop, event: Event) {
        let Some(window) = self.window.as_mut() else {
            return;
        };
        match (self.handler)(event, window) {
            ControlFlow::Continue => {}
            ControlFlow::WaitUntil(deadline) => {
                self.next_frame = Some(deadline);
                event_loop.set_control_flow(WinitControlFlow::WaitUntil(deadline));
            }
            ControlFlow::Exit => {
                self.should_exit = true;
                event_loop.exit();
            }
        }
    }
}

impl<F> ApplicationHandler for DesktopApp<F>
where
    F: FnMut(Event, &mut DesktopWindow) -> ControlFlow,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        match DesktopWindow::new(event_loop, &self.window_config) {
            Ok(window) => {
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                tracing::error!("Failed to create window: {}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        // Frame deadline reached
        if matches!(cause, StartCause::ResumeTimeReached { .. }) {
            self.next_frame = None;
            if let Some(ref window) = self.window {
                window.request_redraw();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WinitWindowEvent,
    ) {
        match event {
            WinitWindowEvent::CloseRequested => {
                self.handle_event(event_loop, Event::Window(WindowEvent::CloseRequested));
                self.should_exit = true;
                event_loop.exit();
            }

            WinitWindowEvent::Resized(size) => {
                if let Some(ref mut window) = self.window {
                    window.resize_surface(size.width, size.height);
                }
                self.handle_event(
                    event_loop,
                    Event::Window(WindowEvent::Resized {
                        width: size.width,
                        height: size.height,
                    }),
                );
            }

            WinitWindowEvent::Moved(pos) => {
                self.handle_event(event_loop, Event::Window(WindowEvent::Moved { x: pos.x, y: pos.y }));
            }

            WinitWindowEvent::Focused(focused) => {
                if let Some(ref mut window) = self.window {
                    window.set_focused(focused);
                }
                self.handle_event(event_loop, Event::Window(WindowEvent::Focused(focused)));
            }

            WinitWindowEvent::RedrawRequested => {
                self.handle_event(event_loop, Event::Frame);
            }

            WinitWindowEvent::KeyboardInput { event, .. } => {
                if let Some(key) = input::convert_key(&event.logical_key) {
                    let pressed = event.state == ElementState::Pressed;
                    self.handle_event(event_loop, Event::Key { key, pressed });
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_exit {
            event_loop.exit();
            return;
        }
        // Keep the frame deadline after unrelated events reset the wait.
        if let Some(deadline) = self.next_frame {
            event_loop.set_control_flow(WinitControlFlow::WaitUntil(deadline));
        }
    }
}
