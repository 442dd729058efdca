use anyhow::Result;

use lumen_demos::scenes::{CanvasConfig, TimeScene};
use lumen_demos::{run, shaders};
use lumen_engine::logging::{init_logging, LoggingConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let scene = TimeScene::new(&CanvasConfig::default());
    run("lumen · canvas", &shaders::canvas_names(), scene)
}
