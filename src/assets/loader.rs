use std::cell::RefCell;
use std::io::BufReader;

use cgmath::{Vector3, Zero};
use log::{info, warn};

use super::source::AssetSource;
use crate::gfx::geometry::{generate_cube, GeometryData};
use crate::gfx::scene::{Light, ObjectId, Scene, SceneObject, Transform};

pub const PLACEHOLDER_NAME: &str = "placeholder";

const PLACEHOLDER_COLOR: [f32; 3] = [0.0, 0.533, 1.0];

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("failed to parse OBJ data: {0}")]
    Parse(#[from] tobj::LoadError),
    #[error("model contains no triangles")]
    EmptyModel,
}

/// Result of [`load_primary_asset`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadedAsset {
    pub id: ObjectId,
    pub is_placeholder: bool,
}

/// Parses Wavefront OBJ bytes into a single triangle mesh. Materials
/// referenced by the file are ignored.
pub fn parse_obj(bytes: &[u8]) -> Result<(String, GeometryData), AssetError> {
    let mut reader = BufReader::new(bytes);
    let (models, _materials) = tobj::load_obj_buf(
        &mut reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |_| Err(tobj::LoadError::OpenFileFailed),
    )?;

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();
    let mut all_have_normals = true;

    for model in &models {
        let mesh = &model.mesh;
        let base = (positions.len() / 3) as u32;
        positions.extend_from_slice(&mesh.positions);
        all_have_normals &= mesh.normals.len() == mesh.positions.len();
        normals.extend_from_slice(&mesh.normals);
        indices.extend(mesh.indices.iter().map(|i| i + base));
    }

    if !all_have_normals {
        normals.clear();
    }

    let geometry = GeometryData::from_flat(&positions, &normals, indices);
    if geometry.is_empty() {
        return Err(AssetError::EmptyModel);
    }

    let name = models
        .first()
        .map(|m| m.name.clone())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "model".to_string());
    Ok((name, geometry))
}

async fn fetch_and_parse(
    source: &dyn AssetSource,
    url: &str,
) -> Result<(String, GeometryData), AssetError> {
    let bytes = source.fetch(url).await.map_err(|err| AssetError::Fetch {
        url: url.to_string(),
        reason: format!("{err:#}"),
    })?;
    parse_obj(&bytes)
}

/// Loads the model at `url` into `scene`
///
/// On success the model is placed at `position` with unit scale and an
/// ambient plus a directional light are attached. On any failure a flat
/// unit cube is inserted at the origin instead. Exactly one object is
/// inserted either way.
///
/// The scene is only borrowed after the fetch resolved.
pub async fn load_primary_asset(
    source: &dyn AssetSource,
    url: &str,
    scene: &RefCell<Scene>,
    position: Vector3<f32>,
) -> LoadedAsset {
    match fetch_and_parse(source, url).await {
        Ok((name, geometry)) => {
            info!(
                "Loaded {url}: {} vertices, {} triangles",
                geometry.vertex_count(),
                geometry.triangle_count()
            );
            let mut object = SceneObject::new(name, geometry);
            object.transform = Transform::at(position);

            let mut scene = scene.borrow_mut();
            scene.add_light(Light::ambient([1.0, 1.0, 1.0], 0.5));
            scene.add_light(Light::directional(
                Vector3::new(-1.0, -1.0, -1.0),
                [1.0, 1.0, 1.0],
                1.0,
            ));
            LoadedAsset {
                id: scene.add_object(object),
                is_placeholder: false,
            }
        }
        Err(err) => {
            warn!("Error loading model {url}: {err}; showing placeholder");
            let mut object = SceneObject::new(PLACEHOLDER_NAME, generate_cube());
            object.transform = Transform::at(Vector3::zero());
            object.color = PLACEHOLDER_COLOR;
            object.is_placeholder = true;

            LoadedAsset {
                id: scene.borrow_mut().add_object(object),
                is_placeholder: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::{FutureExt, LocalBoxFuture};
    use std::collections::HashMap;

    const TRIANGLE_OBJ: &str = "o tri\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    struct MemorySource(HashMap<String, Vec<u8>>);

    impl AssetSource for MemorySource {
        fn fetch(&self, url: &str) -> LocalBoxFuture<'static, anyhow::Result<Vec<u8>>> {
            let result = self
                .0
                .get(url)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("404 for {url}"));
            async move { result }.boxed_local()
        }
    }

    fn source() -> MemorySource {
        let mut files = HashMap::new();
        files.insert("tri.obj".to_string(), TRIANGLE_OBJ.as_bytes().to_vec());
        files.insert("broken.obj".to_string(), b"f 1 2 3\n".to_vec());
        MemorySource(files)
    }

    #[test]
    fn test_parse_obj_computes_missing_normals() {
        let (name, geometry) = parse_obj(TRIANGLE_OBJ.as_bytes()).unwrap();
        assert_eq!(name, "tri");
        assert_eq!(geometry.triangle_count(), 1);
        assert_eq!(geometry.normals, vec![[0.0, 0.0, 1.0]; 3]);
    }

    #[test]
    fn test_resolvable_url_loads_model_with_lights() {
        let scene = RefCell::new(Scene::new());
        let position = Vector3::new(0.0, 0.0, 1.0);
        let loaded = pollster::block_on(load_primary_asset(&source(), "tri.obj", &scene, position));

        let scene = scene.borrow();
        assert!(!loaded.is_placeholder);
        assert_eq!(scene.object_count(), 1);
        assert_eq!(scene.lights().len(), 2);
        let object = scene.object(loaded.id).unwrap();
        assert!(!object.is_placeholder);
        assert_eq!(object.transform.position, position);
    }

    #[test]
    fn test_unresolvable_url_falls_back_to_placeholder() {
        let scene = RefCell::new(Scene::new());
        let loaded = pollster::block_on(load_primary_asset(
            &source(),
            "missing.obj",
            &scene,
            Vector3::new(0.0, 0.0, 1.0),
        ));

        let scene = scene.borrow();
        assert!(loaded.is_placeholder);
        assert_eq!(scene.object_count(), 1);
        let object = scene.object(loaded.id).unwrap();
        assert!(object.is_placeholder);
        assert_eq!(object.name, PLACEHOLDER_NAME);
        assert_eq!(object.transform.position, Vector3::zero());
        assert_eq!(object.geometry, generate_cube());
    }

    #[test]
    fn test_unparseable_model_falls_back_to_placeholder() {
        let scene = RefCell::new(Scene::new());
        let loaded = pollster::block_on(load_primary_asset(
            &source(),
            "broken.obj",
            &scene,
            Vector3::zero(),
        ));
        assert!(loaded.is_placeholder);
        assert_eq!(scene.borrow().object_count(), 1);
    }
}
