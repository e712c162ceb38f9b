/// Terminal frontend: interactive loop around the core scene
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use log::{debug, info};
use std::collections::HashMap;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use vecscene_core::projection::screen_to_ndc;
use vecscene_core::{Exercise, Key, PickHit, Scene};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Without key release events a held key counts as released once it has
/// not repeated for this long.
const RELEASE_TIMEOUT: Duration = Duration::from_millis(600);

/// Map a terminal key to a controller key
pub fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(c) => Key::from_name(c.encode_utf8(&mut [0; 4])),
        KeyCode::Up => Some(Key::W),
        KeyCode::Down => Some(Key::S),
        KeyCode::Left => Some(Key::A),
        KeyCode::Right => Some(Key::D),
        _ => None,
    }
}

/// Camera aspect for a grid of terminal cells, which are about twice as
/// tall as they are wide.
fn cell_aspect(width: u16, height: u16) -> (u32, u32) {
    (width as u32, height as u32 * 2)
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: Scene,
    renderer: AsciiRenderer,
    running: bool,
    /// `None` when the terminal reports key releases
    pressed_at: Option<HashMap<Key, Instant>>,
    last_pick: Option<PickHit>,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(mut scene: Scene) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let (aspect_w, aspect_h) = cell_aspect(width, height);
        scene.resize(aspect_w, aspect_h);

        Ok(Self {
            scene,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            running: true,
            pressed_at: Some(HashMap::new()),
            last_pick: None,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;

        let result = self.enter_screen().and_then(|()| self.main_loop());

        // Cleanup
        let restored = restore_terminal(self.pressed_at.is_none());
        result.and(restored)
    }

    fn enter_screen(&mut self) -> io::Result<()> {
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture
        )?;

        let enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if enhanced {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.pressed_at = None;
        }
        info!("terminal loop started (key release events: {enhanced})");
        Ok(())
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target
        let mut previous = Instant::now();

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event);
            }

            // Update
            let dt = (frame_start - previous).as_secs_f32();
            previous = frame_start;
            self.release_stale_keys(frame_start);
            self.scene.update(dt);

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) => self.handle_key(code, kind),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                self.renderer = AsciiRenderer::new(width as usize, height as usize);
                let (aspect_w, aspect_h) = cell_aspect(width, height);
                self.scene.resize(aspect_w, aspect_h);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode, kind: KeyEventKind) {
        if matches!(code, KeyCode::Char('q') | KeyCode::Esc) && kind != KeyEventKind::Release {
            self.running = false;
            return;
        }
        if matches!(code, KeyCode::Char('p') | KeyCode::Char('P')) {
            if kind == KeyEventKind::Press {
                self.scene.camera.toggle_projection();
                info!("projection: {:?}", self.scene.camera.mode);
            }
            return;
        }

        let Some(key) = map_key(code) else {
            return;
        };
        match kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.scene.controller.key_down(key);
                if let Some(pressed_at) = &mut self.pressed_at {
                    pressed_at.insert(key, Instant::now());
                }
            }
            KeyEventKind::Release => self.scene.controller.key_up(key),
        }
    }

    fn release_stale_keys(&mut self, now: Instant) {
        let Some(pressed_at) = &mut self.pressed_at else {
            return;
        };
        let controller = &mut self.scene.controller;
        pressed_at.retain(|&key, &mut at| {
            let stale = now.duration_since(at) > RELEASE_TIMEOUT;
            if stale {
                controller.key_up(key);
            }
            !stale
        });
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (x, y) = (mouse.column as f32, mouse.row as f32);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.scene.controller.mouse_down(x, y),
            MouseEventKind::Up(MouseButton::Left) => self.scene.controller.mouse_up(),
            MouseEventKind::Drag(MouseButton::Left) => self.scene.controller.mouse_move(x, y),
            MouseEventKind::Moved => {
                self.scene.controller.mouse_move(x, y);
                self.pick(x, y);
            }
            _ => {}
        }
    }

    fn pick(&mut self, column: f32, row: f32) {
        let (ndc_x, ndc_y) = screen_to_ndc(
            column + 0.5,
            row + 0.5,
            self.renderer.width() as u32,
            self.renderer.height() as u32,
        );
        match self.scene.pick(ndc_x, ndc_y) {
            Ok(hit) => self.last_pick = hit,
            Err(err) => debug!("pick failed: {err}"),
        }
    }

    fn render(&mut self) -> io::Result<()> {
        // Clear renderer
        self.renderer.clear();

        // Render scene
        self.renderer.render_scene(&self.scene);

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let position = self.scene.player().transform.position;
        let picked = self
            .last_pick
            .as_ref()
            .map(|hit| format!("{} #{}", hit.name, hit.triangle))
            .unwrap_or_else(|| "-".to_string());
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "VecScene | FPS: {:.1} | player ({:.1}, {:.1}) | pick: {} | WASD=Move Drag=Turn P=Projection Q=Quit",
                self.fps, position.x, position.z, picked
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Undo everything `TerminalApp::run` changed. Every step runs even if an
/// earlier one fails.
fn restore_terminal(enhanced: bool) -> io::Result<()> {
    let mut steps = Vec::new();
    if enhanced {
        steps.push(execute!(stdout(), PopKeyboardEnhancementFlags));
    }
    steps.push(terminal::disable_raw_mode());
    steps.push(execute!(
        stdout(),
        DisableMouseCapture,
        terminal::LeaveAlternateScreen,
        cursor::Show
    ));
    first_error(steps)
}

/// The first error among results that have all been produced already
fn first_error(results: impl IntoIterator<Item = io::Result<()>>) -> io::Result<()> {
    results.into_iter().fold(Ok(()), |first, next| first.and(next))
}

/// Plain-text description of the scene, for headless runs
pub fn scene_summary(scene: &Scene, exercise: Option<&Exercise>) -> String {
    let mut out = format!(
        "Scene with {} objects, {} lines, {} arrows, {} labels\n",
        scene.objects.len(),
        scene.lines.len(),
        scene.arrows.len(),
        scene.labels.len()
    );
    for object in &scene.objects {
        let p = object.transform.position;
        out.push_str(&format!(
            " - {} ({:?}) at ({:.2}, {:.2}, {:.2}), yaw {:.2}\n",
            object.name, object.kind, p.x, p.y, p.z, object.transform.orientation.yaw
        ));
    }
    if let Some(exercise) = exercise {
        for label in &exercise.labels {
            out.push_str(&format!(" * {}\n", label.text));
        }
        for (name, value) in &exercise.values {
            out.push_str(&format!(" = {name} = {value:.4}\n"));
        }
    }
    out
}
