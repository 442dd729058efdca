use anyhow::{bail, Context, Result};

use lumen_engine::frame::Scene;
use lumen_engine::program::{UniformDecl, UniformKind};
use lumen_engine::render::{UniformError, UniformSet};
use lumen_engine::time::FrameTime;
use lumen_sim::{Bodies, GravityMode, NBodyConfig, BODY_COUNT};

pub const POSITIONS_UNIFORM: &str = "u_positions";

/// Three point masses whose positions feed the glow shader.
#[derive(Debug, Clone)]
pub struct NBodyScene {
    bodies: Bodies<BODY_COUNT>,
}

impl NBodyScene {
    pub fn new(config: &NBodyConfig) -> Self {
        Self {
            bodies: Bodies::random(config),
        }
    }

    pub fn bodies(&self) -> &Bodies<BODY_COUNT> {
        &self.bodies
    }
}

impl Scene for NBodyScene {
    fn uniforms(&self) -> Vec<UniformDecl> {
        vec![UniformDecl::new(
            POSITIONS_UNIFORM,
            UniformKind::VecArray(BODY_COUNT as u32),
        )]
    }

    fn advance(&mut self, _time: &FrameTime) {
        self.bodies.step();
    }

    fn write_uniforms(&self, uniforms: &mut UniformSet) -> Result<(), UniformError> {
        uniforms.set_vec3_array(POSITIONS_UNIFORM, &self.bodies.positions())
    }
}

/// Reads `LUMEN_GRAVITY` (`inert` or `pairwise`); unset means inert.
pub fn gravity_from_env() -> Result<GravityMode> {
    match std::env::var("LUMEN_GRAVITY") {
        Ok(v) => parse_gravity(&v),
        Err(_) => Ok(GravityMode::default()),
    }
}

/// Reads `LUMEN_SEED`; unset means a fresh random layout every run.
pub fn seed_from_env() -> Result<Option<u64>> {
    match std::env::var("LUMEN_SEED") {
        Ok(v) => v
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("LUMEN_SEED must be an unsigned integer, got `{v}`")),
        Err(_) => Ok(None),
    }
}

fn parse_gravity(value: &str) -> Result<GravityMode> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "inert" | "off" => Ok(GravityMode::Inert),
        "pairwise" | "on" => Ok(GravityMode::Pairwise),
        other => bail!("LUMEN_GRAVITY must be `inert` or `pairwise`, got `{other}`"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_engine::frame::{prepare_program, FrameLoop};
    use lumen_engine::program::{BootstrapError, ShaderProvider};
    use lumen_engine::render::UniformValue;
    use lumen_engine::time::{FrameClock, ManualClock};
    use winit::dpi::PhysicalSize;

    use crate::shaders;

    fn frame_loop(gravity: GravityMode) -> FrameLoop<NBodyScene, ManualClock> {
        let sources = shaders::embedded()
            .load_stages(&shaders::nbody_names())
            .unwrap();
        let scene = NBodyScene::new(&NBodyConfig {
            seed: Some(42),
            gravity,
            ..NBodyConfig::default()
        });
        let mut notices: Vec<BootstrapError> = Vec::new();
        let (_, uniforms) = prepare_program(&sources, &scene, &mut notices).unwrap();

        FrameLoop::new(
            scene,
            uniforms,
            FrameClock::with_clock(ManualClock::new()),
            PhysicalSize::new(800, 600),
        )
        .unwrap()
    }

    fn pushed_positions(fl: &FrameLoop<NBodyScene, ManualClock>) -> Vec<[f32; 3]> {
        match fl.uniforms().get(POSITIONS_UNIFORM) {
            Some(UniformValue::VecArray(v)) => v.iter().map(|&[x, y, z, _]| [x, y, z]).collect(),
            other => panic!("unexpected positions uniform: {other:?}"),
        }
    }

    #[test]
    fn initial_positions_are_pushed() {
        let fl = frame_loop(GravityMode::Inert);
        assert_eq!(pushed_positions(&fl), fl.scene().bodies().positions().to_vec());
        assert_eq!(pushed_positions(&fl).len(), BODY_COUNT);
    }

    #[test]
    fn inert_positions_stay_fixed_across_ticks() {
        let mut fl = frame_loop(GravityMode::Inert);
        let start = pushed_positions(&fl);

        for _ in 0..500 {
            fl.tick().unwrap();
        }

        assert_eq!(pushed_positions(&fl), start);
    }

    #[test]
    fn pairwise_positions_drift() {
        let mut fl = frame_loop(GravityMode::Pairwise);
        let start = pushed_positions(&fl);

        for _ in 0..10 {
            fl.tick().unwrap();
        }

        assert_ne!(pushed_positions(&fl), start);
        assert_eq!(pushed_positions(&fl), fl.scene().bodies().positions().to_vec());
    }

    #[test]
    fn gravity_values_parse() {
        assert_eq!(parse_gravity("pairwise").unwrap(), GravityMode::Pairwise);
        assert_eq!(parse_gravity(" Inert ").unwrap(), GravityMode::Inert);
        assert_eq!(parse_gravity("").unwrap(), GravityMode::Inert);
        assert!(parse_gravity("newtonian").is_err());
    }
}
