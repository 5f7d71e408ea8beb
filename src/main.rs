//! Ball Fusion headless driver
//!
//! Runs the simulation without a renderer: seeds a world, plays a scripted
//! pointer session against it and logs what happens. Usage:
//!
//! ```text
//! RUST_LOG=debug ball-fusion [config.json] [frames]
//! ```

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Ball Fusion (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config = native::load_config(args.next().as_deref());
    let frames = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(native::DEFAULT_FRAMES);

    native::run(&config, frames);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The core is driven by the host page on the web; nothing to run here
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use ball_fusion::consts::FRAME_MS;
    use ball_fusion::sim::{AbilityDispatcher, Bounds, Pointer, World};
    use ball_fusion::{AbilitySettings, WorldConfig};
    use glam::Vec2;

    pub const DEFAULT_FRAMES: u64 = 600;
    const SEED: u64 = 0x5eed;
    const WIDTH: f32 = 1280.0;
    const HEIGHT: f32 = 720.0;

    /// Load a JSON config, falling back to defaults on any problem
    pub fn load_config(path: Option<&str>) -> WorldConfig {
        let Some(path) = path else {
            log::info!("Using default config");
            return WorldConfig::default();
        };

        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not read {}: {}; using defaults", path, e);
                return WorldConfig::default();
            }
        };

        // Parse leniently: out-of-range values are clamped rather than fatal
        match serde_json::from_str::<WorldConfig>(&json) {
            Ok(config) => {
                if let Err(e) = config.validate() {
                    log::warn!("{}", e);
                }
                log::info!("Loaded config from {}", path);
                config.sanitized()
            }
            Err(e) => {
                log::warn!("{}; using defaults", ball_fusion::ConfigError::from(e));
                WorldConfig::default()
            }
        }
    }

    /// Scripted pointer input for a given frame: which ability is held where
    fn script(frame: u64, center: Vec2) -> Option<(&'static str, Vec2)> {
        match frame {
            60..=119 => Some(("pull", center)),
            180..=200 => Some(("push", center)),
            240 => Some(("split", center)),
            300 => Some(("generate", center + Vec2::new(200.0, 0.0))),
            360..=380 => Some(("color", center)),
            420 => Some(("delete", center + Vec2::new(-200.0, 0.0))),
            _ => None,
        }
    }

    pub fn run(config: &WorldConfig, frames: u64) {
        let mut world = World::new(Bounds::new(WIDTH, HEIGHT), SEED);
        world.populate(&config.spawn);

        let mut dispatcher = AbilityDispatcher::new();
        let mut pointer = Pointer::default();
        let mut held: Option<&'static str> = None;
        let center = world.bounds.center();

        for frame in 0..frames {
            match script(frame, center) {
                Some((name, pos)) => {
                    pointer.pos = pos;
                    pointer.held = true;
                    if held != Some(name) {
                        dispatcher.cancel_all();
                        let settings = AbilitySettings::named(name);
                        dispatcher.pointer_down(&mut world, config, &settings, &pointer);
                        held = Some(name);
                    }
                }
                None => {
                    pointer.held = false;
                    held = None;
                }
            }

            dispatcher.advance(&mut world, config, FRAME_MS, &pointer);
            let report = world.step(config);

            if report.collisions.fused > 0 {
                log::debug!("frame {}: {} fusions", frame, report.collisions.fused);
            }
            if frame % 60 == 0 {
                let stats = world.stats();
                log::info!(
                    "frame {:4}: {:3} bodies, mass {:9.1}, momentum ({:8.1}, {:8.1}), energy {:9.1}",
                    frame,
                    stats.bodies,
                    stats.total_mass,
                    stats.total_momentum.x,
                    stats.total_momentum.y,
                    stats.kinetic_energy
                );
            }
        }

        let drawn = world.render_bodies();
        log::info!("Finished after {} frames with {} bodies", frames, drawn.len());
        for body in drawn.iter().take(5) {
            log::info!(
                "  ({:7.1}, {:7.1}) r={:5.1} rgb({}, {}, {})",
                body.x,
                body.y,
                body.radius,
                body.r,
                body.g,
                body.b
            );
        }
    }
}
