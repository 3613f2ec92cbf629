//! Shared fixtures for the integration tests.

use wire_shared::scene::{Scene, SceneDescriptor};

/// Symmetric test frustum: eye at (0, 0, 1) looking down the -z axis,
/// square window [-1, 1], near 1, far 100.
pub fn axis_view_json() -> &'static str {
    r#"{
        "prp": [0, 0, 1],
        "srp": [0, 0, 0],
        "vup": [0, 1, 0],
        "clip": [-1, 1, 1, 100]
    }"#
}

/// Builds a scene with the symmetric test frustum around the given models
/// (JSON fragments).
pub fn scene_with_models(models_json: &str) -> anyhow::Result<Scene> {
    let json = format!(
        r#"{{ "view": {view}, "models": [{models}] }}"#,
        view = axis_view_json(),
        models = models_json
    );
    let desc = SceneDescriptor::from_json_str(&json)?;
    Ok(Scene::from_descriptor(&desc)?)
}
