use anyhow::Result;

use lumen_demos::scenes::{gravity_from_env, seed_from_env, NBodyScene};
use lumen_demos::{run, shaders};
use lumen_engine::logging::{init_logging, LoggingConfig};
use lumen_sim::NBodyConfig;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = NBodyConfig {
        seed: seed_from_env()?,
        gravity: gravity_from_env()?,
        ..NBodyConfig::default()
    };
    log::info!("gravity {:?}, seed {:?}", config.gravity, config.seed);

    let scene = NBodyScene::new(&config);
    for (i, body) in scene.bodies().bodies().iter().enumerate() {
        log::debug!("body {i}: position {:?}, mass {}", body.position, body.mass);
    }

    run("lumen · nbody", &shaders::nbody_names(), scene)
}
