//! Entry point for gltut.
//! Loads a model and texture the way the GL samples do, then drives the
//! first-person camera through a scripted walk and reports the results.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use asset::{MeshData, TextureData, index_mesh, obj, text};
use corelib::{CameraState, ControlSettings, FrameTimer, Mat4};
use platform::{
    InputState,
    winit::{
        dpi::{PhysicalPosition, PhysicalSize},
        event::ElementState,
        keyboard::KeyCode,
    },
};

const WINDOW_SIZE: (u32, u32) = (1024, 768);

struct Options {
    obj: Option<PathBuf>,
    texture: Option<PathBuf>,
    text: Option<String>,
    frames: u32,
    settings: ControlSettings,
    fov: f32,
}

fn parse_f32_arg(name: &str, val: &str, fallback: f32) -> f32 {
    match val.parse::<f32>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            log::warn!("Invalid value '{}' for --{}, using {}.", val, name, fallback);
            fallback
        }
    }
}

fn parse_args() -> Options {
    // Accept: --obj=PATH --texture=PATH --text=STR --frames=N
    //         --speed=F --mouse-speed=F --fov=DEG
    let mut opts = Options {
        obj: None,
        texture: None,
        text: None,
        frames: 120,
        settings: ControlSettings::default(),
        fov: CameraState::default().fov_degrees,
    };

    for arg in std::env::args().skip(1) {
        if let Some(v) = arg.strip_prefix("--obj=") {
            opts.obj = Some(PathBuf::from(v));
        } else if let Some(v) = arg.strip_prefix("--texture=") {
            opts.texture = Some(PathBuf::from(v));
        } else if let Some(v) = arg.strip_prefix("--text=") {
            opts.text = Some(v.to_string());
        } else if let Some(v) = arg.strip_prefix("--frames=") {
            match v.parse::<u32>() {
                Ok(n) => opts.frames = n,
                Err(_) => log::warn!("Invalid frame count '{}', using {}.", v, opts.frames),
            }
        } else if let Some(v) = arg.strip_prefix("--speed=") {
            opts.settings.speed = parse_f32_arg("speed", v, opts.settings.speed);
        } else if let Some(v) = arg.strip_prefix("--mouse-speed=") {
            opts.settings.mouse_speed = parse_f32_arg("mouse-speed", v, opts.settings.mouse_speed);
        } else if let Some(v) = arg.strip_prefix("--fov=") {
            opts.fov = parse_f32_arg("fov", v, opts.fov);
        } else {
            log::warn!("Ignoring unknown argument '{}'.", arg);
        }
    }
    opts
}

fn load_model(path: &Path) -> Result<MeshData> {
    let flat = obj::load_obj_from_path(path)
        .with_context(|| format!("Failed to load model {}", path.display()))?;
    let mesh = index_mesh(&flat)
        .with_context(|| format!("Failed to index model {}", path.display()))?;
    log::info!(
        "Indexed {} triangle vertices into {} vertices ({} vertex bytes, {} index bytes)",
        flat.len(),
        mesh.vertices.len(),
        mesh.vertex_bytes().len(),
        mesh.index_bytes().len()
    );
    Ok(mesh)
}

fn load_texture(path: &Path) -> Result<TextureData> {
    let texture = asset::load_texture_from_path(path)
        .with_context(|| format!("Failed to load texture {}", path.display()))?;
    match texture.mip_count() {
        Some(mips) => log::info!("Texture has {} mip levels", mips),
        None => log::info!("Texture is uncompressed"),
    }
    Ok(texture)
}

/// Walk forward while looking slightly right, as if the user held Up and nudged the mouse.
fn simulate_camera(opts: &Options) -> CameraState {
    let (w, h) = WINDOW_SIZE;
    let mut input = InputState::new(PhysicalSize::new(w, h));
    let mut camera = CameraState {
        fov_degrees: opts.fov,
        ..CameraState::default()
    };
    let mut timer = FrameTimer::new();
    let model = Mat4::IDENTITY;

    input.handle_key(KeyCode::ArrowUp, ElementState::Pressed);
    for frame in 0..opts.frames {
        let time = f64::from(frame) / 60.0;
        if frame % 30 == 0 {
            input.handle_cursor(PhysicalPosition::new(f64::from(w / 2) + 4.0, f64::from(h / 2)));
        }

        let (next, output) = camera.update(&opts.settings, &input.frame_input(time));
        camera = next;
        input.apply_output(&output);

        let mvp = output.mvp(model);
        if let Some(ms) = timer.tick(time) {
            log::info!("{:.3} ms/frame, mvp[3] = {:?}", ms, mvp.col(3));
        }
        if input.exit_requested() {
            break;
        }
    }

    camera
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = parse_args();
    log::info!(
        "Starting gltut. frames={}, speed={}, mouse_speed={}, fov={}",
        opts.frames,
        opts.settings.speed,
        opts.settings.mouse_speed,
        opts.fov
    );

    if let Some(path) = &opts.obj {
        load_model(path)?;
    }
    if let Some(path) = &opts.texture {
        load_texture(path)?;
    }
    if let Some(s) = &opts.text {
        let overlay = text::layout_text(s, 10, 500, 60);
        log::info!("Text overlay '{}': {} vertices", s, overlay.vertex_count());
    }

    let camera = simulate_camera(&opts);
    log::info!(
        "Camera after {} frames: position={:?}, direction={:?}, fov={:.1}",
        opts.frames,
        camera.position,
        camera.direction(),
        camera.fov_degrees
    );

    log::info!("Done. Bye!");
    Ok(())
}
