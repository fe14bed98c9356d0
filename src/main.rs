use glutin::{
    config::{ConfigTemplateBuilder, GlConfig},
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::{GetGlDisplay, GlDisplay},
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{debug, error, info, warn};
use raw_window_handle::HasRawWindowHandle;
use simple_logger::SimpleLogger;
use std::{
    env,
    ffi::CString,
    num::NonZeroU32,
    panic::{self, AssertUnwindSafe},
    path::PathBuf,
    process, ptr,
};
use winit::{
    dpi::{LogicalSize, PhysicalSize},
    event::{Event, WindowEvent},
    event_loop::{EventLoop, EventLoopBuilder},
    window::{Window, WindowBuilder},
};

use glquad::{
    config::core::DEFAULT_CONFIG_FILE,
    display,
    input::{self, InputAction},
    render::ProgramOrigin,
    AppConfig, AppError, RenderPipeline,
};

const NO_MATCHING_CONFIG: &str = "no GL config matches the requested template";

// Fields drop in declaration order: GL objects, then surface and context, then the window.
struct App {
    pipeline: Option<RenderPipeline>,
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    window: Window,
}

impl App {
    fn new(config: &AppConfig) -> Result<(Self, EventLoop<()>), AppError> {
        let event_loop = EventLoopBuilder::new()
            .build()
            .map_err(|e| AppError::EventLoop(e.to_string()))?;

        let window_builder = WindowBuilder::new()
            .with_title(config.window.title.as_str())
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height));

        let template = ConfigTemplateBuilder::new().with_alpha_size(8);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        // The picker has no error channel, so an empty config list unwinds out of it.
        let built = panic::catch_unwind(AssertUnwindSafe(|| {
            display_builder.build(&event_loop, template, |configs| {
                match display::pick_config(configs, |c| c.num_samples()) {
                    Some(config) => config,
                    None => panic!("{}", NO_MATCHING_CONFIG),
                }
            })
        }))
        .map_err(|_| AppError::Display(NO_MATCHING_CONFIG.to_string()))?;
        let (window, gl_config) = built.map_err(|e| AppError::Display(e.to_string()))?;

        let window = window.ok_or_else(|| AppError::Display("no window was created".into()))?;
        let raw_window_handle = window.raw_window_handle();

        let [major, minor] = config.render.gl_version;
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_window_handle));

        let gl_display = gl_config.display();

        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .map_err(|e| AppError::Context(e.to_string()))?;

        let attrs = window.build_surface_attributes(<_>::default());
        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs) }
            .map_err(|e| AppError::Surface(e.to_string()))?;

        let gl_context = not_current
            .make_current(&gl_surface)
            .map_err(|e| AppError::Context(e.to_string()))?;

        let interval = if config.window.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = gl_surface.set_swap_interval(&gl_context, interval) {
            warn!("Failed to set swap interval: {}", e);
        }

        // Load OpenGL functions
        gl::load_with(|symbol| match CString::new(symbol) {
            Ok(symbol) => gl_display.get_proc_address(symbol.as_c_str()) as *const _,
            Err(_) => ptr::null(),
        });

        let size = window.inner_size();
        let pipeline = RenderPipeline::new(&config.render, &config.shader_path);
        pipeline.resize(size.width, size.height);
        info!(
            "OpenGL {}.{} context ready, {}x{} window",
            major, minor, size.width, size.height
        );
        match pipeline.origin() {
            Some(ProgramOrigin::File) => info!("Drawing with {}", config.shader_path.display()),
            Some(ProgramOrigin::Embedded) => info!("Drawing with the built-in shaders"),
            None => warn!("No shader program available, frames will only be cleared"),
        }

        Ok((
            Self {
                pipeline: Some(pipeline),
                gl_surface,
                gl_context,
                window,
            },
            event_loop,
        ))
    }

    fn resize(&self, size: PhysicalSize<u32>) {
        let (Some(width), Some(height)) =
            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return;
        };

        self.gl_surface.resize(&self.gl_context, width, height);
        if let Some(pipeline) = &self.pipeline {
            pipeline.resize(size.width, size.height);
        }
    }

    fn redraw(&self) {
        if let Some(pipeline) = &self.pipeline {
            pipeline.render();
        }

        if let Err(e) = self.gl_surface.swap_buffers(&self.gl_context) {
            error!("Failed to swap buffers: {}", e);
        }
    }

    fn shutdown(&mut self) {
        if let Some(pipeline) = self.pipeline.take() {
            debug!("Releasing GL resources");
            drop(pipeline);
        }
    }
}

fn load_config() -> AppConfig {
    let path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let (config, load_error) = match AppConfig::load(&path) {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    if let Err(e) = SimpleLogger::new().with_level(config.log_filter()).init() {
        eprintln!("Failed to initialize logger: {}", e);
    }
    if let Some(e) = load_error {
        warn!("{:#}; using default configuration", e);
    }

    config
}

fn run(mut app: App, event_loop: EventLoop<()>) -> Result<(), AppError> {
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::Resized(size) => app.resize(size),
                WindowEvent::KeyboardInput { event, .. } => {
                    match input::handle_key(&event.logical_key, event.state, event.repeat) {
                        Some(InputAction::Close) => elwt.exit(),
                        Some(InputAction::Announce) => info!("Key Space Press."),
                        None => {}
                    }
                }
                WindowEvent::RedrawRequested => app.redraw(),
                _ => (),
            },
            Event::AboutToWait => app.window.request_redraw(),
            Event::LoopExiting => app.shutdown(),
            _ => (),
        })
        .map_err(|e| AppError::EventLoop(e.to_string()))
}

fn main() {
    let config = load_config();
    info!("Initializing application...");

    let (app, event_loop) = match App::new(&config) {
        Ok(parts) => parts,
        Err(e) => {
            error!("{}", e);
            process::exit(-1);
        }
    };

    if let Err(e) = run(app, event_loop) {
        error!("{}", e);
        process::exit(-1);
    }

    info!("OpenGL Window Closed.");
}
