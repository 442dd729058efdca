//! Shader sources for the demos.
//!
//! The sources are compiled into the binaries. Passing a directory as the
//! first command-line argument loads same-named files from it instead,
//! which is handy while editing a shader.

use anyhow::Result;

use lumen_engine::program::{
    EmbeddedShaders, ShaderDir, ShaderNames, ShaderProvider, StageSources,
};

pub const QUAD_VERTEX: &str = "vshader.wgsl";
pub const CANVAS_FRAGMENT: &str = "fshader.wgsl";
pub const NBODY_FRAGMENT: &str = "nbody.wgsl";

pub fn canvas_names() -> ShaderNames {
    ShaderNames {
        vertex: QUAD_VERTEX.to_string(),
        fragment: CANVAS_FRAGMENT.to_string(),
    }
}

pub fn nbody_names() -> ShaderNames {
    ShaderNames {
        vertex: QUAD_VERTEX.to_string(),
        fragment: NBODY_FRAGMENT.to_string(),
    }
}

pub fn embedded() -> EmbeddedShaders {
    EmbeddedShaders::new()
        .with(QUAD_VERTEX, include_str!("../shaders/vshader.wgsl"))
        .with(CANVAS_FRAGMENT, include_str!("../shaders/fshader.wgsl"))
        .with(NBODY_FRAGMENT, include_str!("../shaders/nbody.wgsl"))
}

pub fn load(names: &ShaderNames) -> Result<StageSources> {
    match std::env::args_os().nth(1) {
        Some(dir) => {
            let dir = ShaderDir::new(dir);
            log::info!("loading shaders from {}", dir.root().display());
            dir.load_stages(names)
        }
        None => embedded().load_stages(names),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_engine::frame::prepare_program;
    use lumen_engine::program::{BootstrapError, Program};

    use crate::scenes::{CanvasConfig, NBodyScene, TimeScene};
    use lumen_sim::NBodyConfig;

    fn link(names: &ShaderNames) -> Program {
        let sources = embedded().load_stages(names).unwrap();
        let mut notices: Vec<BootstrapError> = Vec::new();
        let program = Program::build(&sources, &mut notices).unwrap();
        assert!(notices.is_empty(), "{notices:?}");
        program
    }

    #[test]
    fn canvas_shaders_link() {
        let program = link(&canvas_names());
        assert!(program.uniform_location("u_window").is_some());
        assert!(program.uniform_location("u_t").is_some());
    }

    #[test]
    fn nbody_shaders_link() {
        let program = link(&nbody_names());
        assert!(program.uniform_location("u_positions").is_some());
    }

    #[test]
    fn canvas_scene_binds_against_its_shaders() {
        let sources = embedded().load_stages(&canvas_names()).unwrap();
        let scene = TimeScene::new(&CanvasConfig::default());
        let mut notices: Vec<BootstrapError> = Vec::new();
        let (_, uniforms) = prepare_program(&sources, &scene, &mut notices).unwrap();
        assert_eq!(uniforms.len(), 2);
    }

    #[test]
    fn nbody_scene_binds_against_its_shaders() {
        let sources = embedded().load_stages(&nbody_names()).unwrap();
        let scene = NBodyScene::new(&NBodyConfig::default());
        let mut notices: Vec<BootstrapError> = Vec::new();
        prepare_program(&sources, &scene, &mut notices).unwrap();
    }

    #[test]
    fn scenes_do_not_bind_against_each_others_shaders() {
        let sources = embedded().load_stages(&canvas_names()).unwrap();
        let scene = NBodyScene::new(&NBodyConfig::default());
        let mut notices: Vec<BootstrapError> = Vec::new();
        let err = prepare_program(&sources, &scene, &mut notices).unwrap_err();
        assert_eq!(err, BootstrapError::UniformNotFound("u_positions".to_string()));
    }
}
