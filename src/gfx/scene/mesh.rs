//! Mesh assets
//!
//! Meshes are read from Wavefront OBJ files with `tobj`, flattened into a single
//! position/normal vertex buffer and uploaded once. Every sub-model in a file is
//! merged, so a mesh always draws with one indexed call.

use std::path::{Path, PathBuf};

use wgpu::util::DeviceExt;

use crate::error::{Result, ShowcaseError};

use super::vertex::Vertex3D;

/// A selectable mesh: its display title, file name and resting orientation
#[derive(Debug, Clone, PartialEq)]
pub struct MeshAsset {
    pub title: String,
    pub file: PathBuf,
    /// Extra rotation about +Y in degrees, added on top of the common -90
    pub yaw_offset: f32,
}

impl MeshAsset {
    pub fn new(title: &str, file: &str, yaw_offset: f32) -> Self {
        Self {
            title: title.to_string(),
            file: PathBuf::from(file),
            yaw_offset,
        }
    }
}

/// The built-in mesh list, in display order
pub fn default_mesh_assets() -> Vec<MeshAsset> {
    vec![
        MeshAsset::new("Sphere", "sphere.obj", 0.0),
        MeshAsset::new("Teapot", "teapot.obj", 45.0),
        MeshAsset::new("Suzanne", "suzanne.obj", 0.0),
        MeshAsset::new("Deer", "deer.obj", 0.0),
    ]
}

/// CPU-side mesh ready for upload
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex3D>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Loads and merges every model of an OBJ file
    ///
    /// Normals are taken from the file when present for every vertex, otherwise
    /// they are generated by averaging the adjacent face normals.
    pub fn from_obj(path: &Path) -> Result<Self> {
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )
        .map_err(|source| ShowcaseError::MeshLoad {
            path: path.to_path_buf(),
            source,
        })?;

        let mut data = MeshData::default();

        for model in &models {
            let mesh = &model.mesh;
            let vertex_count = mesh.positions.len() / 3;
            if let Some(&index) = mesh.indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(ShowcaseError::InvalidIndex {
                    path: path.to_path_buf(),
                    index,
                    vertex_count,
                });
            }

            let normals = if !mesh.normals.is_empty() && mesh.normals.len() == mesh.positions.len()
            {
                mesh.normals.clone()
            } else {
                log::debug!(
                    "Generating normals for '{}' in {}",
                    model.name,
                    path.display()
                );
                calculate_normals(&mesh.positions, &mesh.indices)
            };

            let base = data.vertices.len() as u32;
            data.vertices.extend(
                mesh.positions
                    .chunks_exact(3)
                    .zip(normals.chunks_exact(3))
                    .map(|(p, n)| Vertex3D {
                        position: [p[0], p[1], p[2]],
                        normal: [n[0], n[1], n[2]],
                    }),
            );
            data.indices.extend(mesh.indices.iter().map(|i| i + base));
        }

        if data.indices.is_empty() {
            return Err(ShowcaseError::EmptyMesh {
                path: path.to_path_buf(),
            });
        }

        log::debug!(
            "Loaded {}: {} vertices, {} triangles",
            path.display(),
            data.vertices.len(),
            data.triangle_count()
        );
        Ok(data)
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Smooth per-vertex normals from averaged face normals
pub fn calculate_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    let vertex_count = positions.len() / 3;
    let mut normals = vec![0.0; vertex_count * 3];

    let vertex = |i: usize| [positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]];

    for triangle in indices.chunks_exact(3) {
        let [i0, i1, i2] = [
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        ];
        let (v0, v1, v2) = (vertex(i0), vertex(i1), vertex(i2));

        let edge1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
        let edge2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];

        // Unnormalised cross product, so larger faces weigh more
        let face_normal = [
            edge1[1] * edge2[2] - edge1[2] * edge2[1],
            edge1[2] * edge2[0] - edge1[0] * edge2[2],
            edge1[0] * edge2[1] - edge1[1] * edge2[0],
        ];

        for vertex_idx in [i0, i1, i2] {
            normals[vertex_idx * 3] += face_normal[0];
            normals[vertex_idx * 3 + 1] += face_normal[1];
            normals[vertex_idx * 3 + 2] += face_normal[2];
        }
    }

    for normal in normals.chunks_exact_mut(3) {
        let length = (normal[0].powi(2) + normal[1].powi(2) + normal[2].powi(2)).sqrt();
        if length > 0.0 {
            normal.iter_mut().for_each(|c| *c /= length);
        } else {
            normal.copy_from_slice(&[0.0, 1.0, 0.0]);
        }
    }

    normals
}

/// Mesh resident on the GPU
pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, data: &MeshData, label: &str) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
        }
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}

pub trait DrawMesh<'a> {
    fn bind_mesh(&mut self, mesh: &'a GpuMesh);
    fn draw_bound_mesh(&mut self, mesh: &'a GpuMesh);
}

impl<'a, 'b> DrawMesh<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    /// Binds vertex and index buffers, done once per frame
    fn bind_mesh(&mut self, mesh: &'b GpuMesh) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    }

    /// Issues the indexed draw for a mesh bound with [`DrawMesh::bind_mesh`]
    fn draw_bound_mesh(&mut self, mesh: &'b GpuMesh) {
        self.draw_indexed(0..mesh.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_obj(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pbr-basic-mesh-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_default_assets() {
        let assets = default_mesh_assets();
        let titles: Vec<&str> = assets.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["Sphere", "Teapot", "Suzanne", "Deer"]);
        assert_eq!(assets[1].yaw_offset, 45.0);
        assert!(assets.iter().filter(|a| a.yaw_offset != 0.0).count() == 1);
    }

    #[test]
    fn test_load_generates_normals() {
        let path = write_obj(
            "two_faces.obj",
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 0 0 1\nf 1 2 3\nf 1 3 4\n",
        );
        let mesh = MeshData::from_obj(&path).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.triangle_count(), 2);

        let on_x = mesh
            .vertices
            .iter()
            .find(|v| v.position == [1.0, 0.0, 0.0])
            .unwrap();
        assert_eq!(on_x.normal, [0.0, 0.0, 1.0]);

        let on_z = mesh
            .vertices
            .iter()
            .find(|v| v.position == [0.0, 0.0, 1.0])
            .unwrap();
        assert_eq!(on_z.normal, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_load_keeps_file_normals() {
        let path = write_obj(
            "with_normals.obj",
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 -1\nf 1//1 2//1 3//1\n",
        );
        let mesh = MeshData::from_obj(&path).unwrap();
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 0.0, -1.0]));
    }

    #[test]
    fn test_merges_models() {
        let path = write_obj(
            "two_objects.obj",
            "o a\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\no b\nv 0 0 1\nv 1 0 1\nv 0 1 1\nf 4 5 6\n",
        );
        let mesh = MeshData::from_obj(&path).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
        assert_eq!(mesh.vertices.len(), 6);
    }

    #[test]
    fn test_missing_file() {
        let err = MeshData::from_obj(Path::new("/definitely/not/here.obj")).unwrap_err();
        assert!(matches!(err, ShowcaseError::MeshLoad { .. }));
    }

    #[test]
    fn test_empty_mesh() {
        let path = write_obj("points.obj", "v 0 0 0\nv 1 0 0\n");
        let err = MeshData::from_obj(&path).unwrap_err();
        assert!(matches!(err, ShowcaseError::EmptyMesh { .. }));
    }

    #[test]
    fn test_normals_for_isolated_vertex() {
        let normals = calculate_normals(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0], &[]);
        assert_eq!(normals, vec![0.0, 1.0, 0.0, 0.0, 1.0, 0.0]);
    }
}
