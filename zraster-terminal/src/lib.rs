//! Terminal frontend for the zraster software rasterizer

use anyhow::{bail, Context};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{stdout, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use zraster_core::shapes::DEFAULT_PRECISION;
use zraster_core::{
    Camera, Matrix4, ProjectionMode, Renderer, RendererConfig, Rgb, RotationState, SceneObject,
    Shape,
};

pub mod surface;

pub use surface::TerminalSurface;

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f32 = 0.5;
/// Degrees per key press.
const ROTATE_STEP: f32 = 5.0;

/// Command-line options for the terminal app
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub stl: Option<PathBuf>,
    /// Built-in solid shown when no STL is given.
    pub shape: Shape,
    /// Sphere subdivision level.
    pub precision: u32,
    pub renderer_config: Option<PathBuf>,
    pub wireframe: bool,
    pub solid: bool,
    pub axes: bool,
    pub orthographic: bool,
    pub fps: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            stl: None,
            shape: Shape::default(),
            precision: DEFAULT_PRECISION,
            renderer_config: None,
            wireframe: false,
            solid: true,
            axes: false,
            orthographic: false,
            fps: 30,
        }
    }
}

impl AppConfig {
    /// Parse arguments (without the program name).
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Self> {
        let mut cfg = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--stl" => cfg.stl = Some(args.next().context("--stl needs a path")?.into()),
                "--shape" => {
                    let value = args.next().context("--shape needs a name")?;
                    cfg.shape = value.parse()?;
                }
                "--precision" => {
                    let value = args.next().context("--precision needs a value")?;
                    cfg.precision = value
                        .parse()
                        .with_context(|| format!("invalid --precision value {value:?}"))?;
                }
                "--config" => {
                    cfg.renderer_config =
                        Some(args.next().context("--config needs a path")?.into())
                }
                "--fps" => {
                    let value = args.next().context("--fps needs a value")?;
                    cfg.fps = value
                        .parse()
                        .with_context(|| format!("invalid --fps value {value:?}"))?;
                    if cfg.fps == 0 {
                        bail!("--fps must be positive");
                    }
                }
                "--wireframe" => cfg.wireframe = true,
                "--no-solid" => cfg.solid = false,
                "--axes" => cfg.axes = true,
                "--ortho" => cfg.orthographic = true,
                other => bail!("unknown argument {other:?}"),
            }
        }
        Ok(cfg)
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    object: SceneObject,
    rotation: RotationState,
    camera: Camera,
    renderer: Renderer<TerminalSurface>,
    config: AppConfig,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(object: SceneObject, config: AppConfig) -> anyhow::Result<Self> {
        let (width, height) = terminal::size().context("query terminal size")?;
        let (width, height) = (width as usize, height as usize);

        let mut renderer_config = match &config.renderer_config {
            Some(path) => RendererConfig::from_file(path)
                .with_context(|| format!("load renderer config {}", path.display()))?,
            None => RendererConfig {
                background: Rgb::BLACK,
                wireframe: Rgb::WHITE,
                ..RendererConfig::default()
            },
        };
        renderer_config.width = width;
        renderer_config.height = height;
        renderer_config.point_size = 1;

        let renderer = Renderer::new(TerminalSurface::new(width, height), &renderer_config)?;
        let mut camera = Camera::new(renderer.viewport_aspect() * CELL_ASPECT);
        if config.orthographic {
            camera.mode = ProjectionMode::Orthographic;
        }

        Ok(Self {
            object,
            rotation: RotationState::new(20.0, 20.0, 0.0),
            camera,
            renderer,
            config,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> anyhow::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / self.config.fps as u64);

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?)?;
            }

            self.update();
            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> anyhow::Result<()> {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code),
            Event::Resize(width, height) => self.resize(width as usize, height as usize)?,
            _ => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('w') | KeyCode::Up => self.rotation.rotate(ROTATE_STEP, 0.0, 0.0),
            KeyCode::Char('s') | KeyCode::Down => self.rotation.rotate(-ROTATE_STEP, 0.0, 0.0),
            KeyCode::Char('a') | KeyCode::Left => self.rotation.rotate(0.0, -ROTATE_STEP, 0.0),
            KeyCode::Char('d') | KeyCode::Right => self.rotation.rotate(0.0, ROTATE_STEP, 0.0),
            KeyCode::Char('e') => self.rotation.rotate(0.0, 0.0, ROTATE_STEP),
            KeyCode::Char('r') => self.rotation.rotate(0.0, 0.0, -ROTATE_STEP),
            KeyCode::Char('f') => self.config.wireframe = !self.config.wireframe,
            KeyCode::Char('g') => self.config.solid = !self.config.solid,
            KeyCode::Char('x') => self.config.axes = !self.config.axes,
            KeyCode::Char('p') => {
                self.camera.mode = match self.camera.mode {
                    ProjectionMode::Perspective => ProjectionMode::Orthographic,
                    ProjectionMode::Orthographic => ProjectionMode::Perspective,
                };
            }
            _ => {}
        }
    }

    fn resize(&mut self, width: usize, height: usize) -> anyhow::Result<()> {
        if width == 0 || height == 0 {
            debug!(width, height, "ignoring empty resize");
            return Ok(());
        }
        self.renderer.set_viewport(width, height)?;
        self.renderer.surface_mut().resize(width, height);
        self.camera.aspect = self.renderer.viewport_aspect() * CELL_ASPECT;
        info!(width, height, "terminal resized");
        Ok(())
    }

    fn update(&mut self) {
        // Continuous slow rotation for demo effect
        self.rotation.rotate(0.5, 0.8, 0.0);
    }

    fn render(&mut self) -> anyhow::Result<()> {
        let model = self.rotation.apply(&Matrix4::identity());
        let mvp = self.camera.view_projection()? * model;

        self.renderer.begin_frame();
        if self.config.axes {
            self.renderer.draw_axes(&mvp);
        }
        let stats = self.renderer.render_object(
            &self.object,
            &mvp,
            self.config.wireframe,
            self.config.solid,
        )?;

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.surface().draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "zraster | FPS: {:.1} | px: {} | WASD/Arrows=Rotate E/R=Roll F=Wire G=Solid X=Axes P=Proj Q=Quit",
                self.fps, stats.pixels
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
