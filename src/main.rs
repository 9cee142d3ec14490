//! Shardwave - audio-reactive recursive partition installation
//!
//! Music splits the canvas into ever finer noise-cut shards; a heavy bass
//! hit shatters the finished composition and it starts over.

mod cli;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use cli::Args;
use shardwave::audio::{AudioClip, AudioEngine, FeatureExtractor};
use shardwave::installation::FrameLoop;
use shardwave::params::{AudioReactiveMapping, FFTConfig, RenderConfig};
use shardwave::recording::record;
use shardwave::rendering::{Rasterizer, RenderSystem};
use shardwave::sketch::{
    apply_preset, capture_preset, load_presets, save_presets, PartitionSketch, PresetFile, Sketch,
};

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,
    raster: Rasterizer,

    // Audio and sketch
    audio: AudioEngine,
    frame_loop: FrameLoop<PartitionSketch>,

    // Startup source
    file: Option<PathBuf>,
    live: bool,

    render_config: RenderConfig,

    /// Fatal error raised inside the event loop
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(
        audio: AudioEngine,
        frame_loop: FrameLoop<PartitionSketch>,
        render_config: RenderConfig,
        args: &Args,
    ) -> Self {
        Self {
            window: None,
            render_system: None,
            raster: Rasterizer::new(render_config.canvas_width, render_config.canvas_height),
            audio,
            frame_loop,
            file: args.file.clone(),
            live: args.live,
            render_config,
            failure: None,
        }
    }

    fn start_audio(&mut self) {
        if let Some(path) = self.file.clone() {
            if let Err(e) = self.audio.play_file(&path) {
                warn!("Could not play {}: {}", path.display(), e);
            }
        } else if self.live {
            if let Err(e) = self.audio.toggle_live_input() {
                warn!("Could not start live input: {}", e);
            }
        }
    }

    /// Render a single frame
    fn render_frame(&mut self) {
        let analysis = self.audio.analyse();
        self.frame_loop.step(analysis.as_ref());
        self.frame_loop.draw(&mut self.raster);

        let Some(render_system) = self.render_system.as_mut() else {
            return;
        };
        if let Err(e) = render_system.present(self.raster.pixels()) {
            error!("Render error: {:?}", e);
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode) {
        match key {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::KeyL => match self.audio.toggle_live_input() {
                Ok(on) => info!("Live input {}", if on { "enabled" } else { "disabled" }),
                Err(e) => warn!("Live input unavailable: {}", e),
            },
            KeyCode::KeyS => self.audio.stop_file(),
            KeyCode::KeyR => self.frame_loop.setup(
                self.render_config.canvas_width as f64,
                self.render_config.canvas_height as f64,
            ),
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title(format!("Shardwave - {}", self.frame_loop.sketch().name()))
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.failure = Some(anyhow::Error::new(e).context("Failed to create window"));
                event_loop.exit();
                return;
            }
        };

        let render_system = match pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            self.render_config.canvas_width,
            self.render_config.canvas_height,
        )) {
            Ok(render_system) => render_system,
            Err(e) => {
                self.failure = Some(anyhow::Error::new(e).context("Failed to initialise renderer"));
                event_loop.exit();
                return;
            }
        };

        self.frame_loop.setup(
            self.render_config.canvas_width as f64,
            self.render_config.canvas_height as f64,
        );
        self.start_audio();

        info!("Shardwave is running (ESC quit, L live input, S stop file, R reset)");

        self.window = Some(window);
        self.render_system = Some(render_system);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(key),
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, key),
            WindowEvent::Resized(size) => {
                if let Some(render_system) = self.render_system.as_mut() {
                    render_system.resize_surface(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.render_frame(),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.audio.stop();
    }
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn save_preset_file<S: Sketch>(path: &Path, sketch: &S) -> Result<()> {
    // Keep other sketches' entries already in the file
    let mut presets = if path.exists() {
        load_presets(path).with_context(|| format!("Failed to read {}", path.display()))?
    } else {
        PresetFile::new()
    };
    capture_preset(sketch, &mut presets);
    save_presets(path, &presets).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Saved preset to {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let fft_config = FFTConfig::default();
    let render_config = args.render_config();

    let mut sketch = PartitionSketch::new(args.partition_config(), AudioReactiveMapping::default());
    if let Some(path) = &args.preset {
        let presets =
            load_presets(path).with_context(|| format!("Failed to load preset {}", path.display()))?;
        apply_preset(&mut sketch, &presets);
    }

    let extractor = FeatureExtractor::new(fft_config.clone(), args.gain_config());
    let mut frame_loop = FrameLoop::new(extractor, sketch);

    if let Some(recording) = args.recording_config() {
        let path = args
            .file
            .as_ref()
            .context("Recording mode needs --file")?;
        let clip = AudioClip::load(path).with_context(|| format!("Failed to load {}", path.display()))?;

        let summary = record(
            &mut frame_loop,
            &clip,
            &fft_config,
            &recording,
            (render_config.canvas_width, render_config.canvas_height),
        )
        .context("Recording failed")?;
        info!("Wrote {} frames", summary.frames);

        let sketch = frame_loop.finish();
        if let Some(path) = &args.save_preset {
            save_preset_file(path, &sketch)?;
        }
        return Ok(());
    }

    let audio = AudioEngine::new(fft_config).context("Failed to create audio engine")?;
    let mut app = App::new(audio, frame_loop, render_config, &args);

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.run_app(&mut app).context("Event loop failed")?;

    if let Some(failure) = app.failure.take() {
        return Err(failure);
    }

    app.audio.stop();
    let sketch = app.frame_loop.finish();
    if let Some(path) = &args.save_preset {
        save_preset_file(path, &sketch)?;
    }

    info!("Goodbye");
    Ok(())
}
