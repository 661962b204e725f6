#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod export;
pub mod geom;
pub mod rod;

use std::fmt;

use wasm_bindgen::prelude::*;

pub use config::RodConfig;
pub use error::{RodMeshError, RodMeshResult};
pub use export::{write_block_mesh_dict, write_block_mesh_dict_file};
pub use rod::{BlockMeshModel, Eccentricity, MeshSummary, RodLayout, generate};

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    // A second initialization keeps the logger that is already installed.
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {}

/// Parses and resolves a JSON rod description.
///
/// A `seed` replaces the configured seed of random eccentricity and is ignored
/// otherwise.
///
/// # Errors
/// Returns JSON and configuration errors.
pub fn layout_from_json(json: &str, seed: Option<u64>) -> RodMeshResult<RodLayout> {
    let mut layout = RodConfig::from_json_str(json)?.resolve()?;
    if let (Some(seed), Eccentricity::Random { seed: configured }) = (seed, &mut layout.eccentricity) {
        *configured = Some(seed);
    }
    Ok(layout)
}

/// Runs the whole pipeline from a JSON rod description to a block mesh.
///
/// # Errors
/// Returns the first JSON, configuration or topology error.
pub fn mesh_from_json(json: &str, seed: Option<u64>) -> RodMeshResult<BlockMeshModel> {
    generate(&layout_from_json(json, seed)?)
}

/// One-shot conversion of a JSON rod description into `blockMeshDict` text.
#[wasm_bindgen]
pub fn generate_block_mesh_dict(json: &str) -> Result<String, JsValue> {
    let model = mesh_from_json(json, None).map_err(to_js_error)?;
    Ok(write_block_mesh_dict(&model))
}

/// Stateful entry point for browser consumers.
#[wasm_bindgen]
#[derive(Debug, Default)]
pub struct Mesher {
    layout: Option<RodLayout>,
    model: Option<BlockMeshModel>,
    seed: Option<u64>,
}

#[wasm_bindgen]
impl Mesher {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Mesher {
        Mesher::default()
    }

    /// Loads and validates a rod description, dropping any previous mesh.
    #[wasm_bindgen]
    pub fn load_config(&mut self, json: &str) -> Result<(), JsValue> {
        let layout = layout_from_json(json, self.seed).map_err(to_js_error)?;
        self.layout = Some(layout);
        self.model = None;
        Ok(())
    }

    /// Fixes the seed of random eccentricity for the next generation.
    #[wasm_bindgen]
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = Some(seed);
        if let Some(Eccentricity::Random { seed: configured }) =
            self.layout.as_mut().map(|layout| &mut layout.eccentricity)
        {
            *configured = Some(seed);
        }
        self.model = None;
    }

    /// Generates the mesh and returns the dictionary text.
    #[wasm_bindgen]
    pub fn generate(&mut self) -> Result<String, JsValue> {
        let model = self.ensure_model()?;
        Ok(write_block_mesh_dict(model))
    }

    /// Counts of the last generated mesh as a plain object.
    #[wasm_bindgen]
    pub fn get_summary(&mut self) -> Result<JsValue, JsValue> {
        let summary = MeshSummary::of(self.ensure_model()?);
        serde_wasm_bindgen::to_value(&summary).map_err(to_js_error)
    }

    /// Boundary patch names in emission order.
    #[wasm_bindgen]
    pub fn get_patch_names(&mut self) -> Result<JsValue, JsValue> {
        let names = self.ensure_model()?.patches.names();
        serde_wasm_bindgen::to_value(&names).map_err(to_js_error)
    }
}

impl Mesher {
    fn ensure_model(&mut self) -> Result<&BlockMeshModel, JsValue> {
        let layout = self
            .layout
            .as_ref()
            .ok_or_else(|| js_error("no rod description loaded"))?;
        if self.model.is_none() {
            self.model = Some(generate(layout).map_err(to_js_error)?);
        }
        self.model
            .as_ref()
            .ok_or_else(|| js_error("mesh generation produced no model"))
    }
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

#[cfg(target_arch = "wasm32")]
fn js_error(message: &str) -> JsValue {
    wasm_bindgen::JsError::new(message).into()
}

#[cfg(not(target_arch = "wasm32"))]
fn js_error(_message: &str) -> JsValue {
    JsValue::NULL
}
