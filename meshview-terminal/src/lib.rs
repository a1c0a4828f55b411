/// Terminal front-end: input polling, frame loop and ASCII render dispatch
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use log::{debug, info};
use meshview_core::config::{Controls, RenderSettings};
use meshview_core::{ModelRegistry, MouseLook, ViewerAction};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod logging;
pub mod renderer;

pub use renderer::AsciiRenderer;

/// Key bindings for the navigation actions
pub fn action_for_key(code: KeyCode) -> Option<ViewerAction> {
    match code {
        KeyCode::Char('w') | KeyCode::Up => Some(ViewerAction::ZoomIn),
        KeyCode::Char('s') | KeyCode::Down => Some(ViewerAction::ZoomOut),
        KeyCode::Char('a') | KeyCode::Left => Some(ViewerAction::StrafeLeft),
        KeyCode::Char('d') | KeyCode::Right => Some(ViewerAction::StrafeRight),
        KeyCode::Char('q') | KeyCode::Esc => Some(ViewerAction::Quit),
        _ => None,
    }
}

/// Main application struct for viewing a model registry in the terminal
pub struct TerminalApp {
    registry: ModelRegistry,
    controls: Controls,
    mouse_look: MouseLook,
    renderer: AsciiRenderer,
    target_frame_time: Duration,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(registry: ModelRegistry, controls: Controls, render: &RenderSettings) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let fps = render.target_fps.max(1);

        Ok(Self {
            registry,
            mouse_look: MouseLook::new(controls.mouse_sensitivity),
            controls,
            renderer: AsciiRenderer::new(width as usize, height as usize, render.light()),
            target_frame_time: Duration::from_millis(1000 / fps as u64),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        info!(
            "entering render loop with {} models",
            self.registry.count()
        );

        while self.running {
            let frame_start = Instant::now();

            // Drain every pending event before drawing
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event);
            }

            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.target_frame_time {
                std::thread::sleep(self.target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        info!("render loop finished");
        Ok(())
    }

    /// Apply one terminal event to the scene.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                if let Some(action) = action_for_key(code) {
                    debug!("key action {:?}", action);
                    self.running = self.controls.apply(action, &mut self.registry);
                }
            }
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Moved | MouseEventKind::Drag(_),
                column,
                row,
                ..
            }) => {
                self.mouse_look.cursor_moved(
                    column as f64,
                    row as f64,
                    &self.controls,
                    &mut self.registry,
                );
            }
            Event::FocusLost => self.mouse_look.reset(),
            Event::Resize(width, height) => {
                self.renderer.resize(width as usize, height as usize);
                self.mouse_look.reset();
            }
            _ => {}
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.clear();
        for view in self.registry.render_views() {
            self.renderer.render_view(&view);
        }

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "meshview | FPS: {:.1} | models: {} | W/S=Zoom A/D=Strafe Mouse=Look Q=Quit",
                self.fps,
                self.registry.count()
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert_eq!(action_for_key(KeyCode::Char('w')), Some(ViewerAction::ZoomIn));
        assert_eq!(action_for_key(KeyCode::Down), Some(ViewerAction::ZoomOut));
        assert_eq!(action_for_key(KeyCode::Char('a')), Some(ViewerAction::StrafeLeft));
        assert_eq!(action_for_key(KeyCode::Right), Some(ViewerAction::StrafeRight));
        assert_eq!(action_for_key(KeyCode::Esc), Some(ViewerAction::Quit));
        assert_eq!(action_for_key(KeyCode::Char('x')), None);
    }
}
