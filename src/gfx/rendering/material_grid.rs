//! Material grid draw list
//!
//! The showcase draws the selected mesh once per cell of a square grid. Metallic
//! rises along X and roughness along Z, so one frame shows the whole parameter space
//! of the selected material colour.
//!
//! The per-cell push-constant payloads are computed once into a
//! [`MaterialGridDrawList`] and replayed every frame; the scene rebuilds the list only
//! when the material or mesh selection changes.

use crate::{
    config::GridConfig,
    gfx::{
        resources::material::{GridPushConstants, MaterialPushConstants},
        scene::mesh::{DrawMesh, GpuMesh},
    },
};

/// Lower bound for metallic, fully dielectric cells look flat
pub const MIN_METALLIC: f32 = 0.1;
/// Lower bound for roughness, a perfect mirror degenerates the GGX lobe
pub const MIN_ROUGHNESS: f32 = 0.05;

/// Position and surface parameters of cell `(x, y)`
pub fn grid_cell(
    grid: &GridConfig,
    material: &MaterialPushConstants,
    x: u32,
    y: u32,
) -> GridPushConstants {
    let half = grid.field as f32 / 2.0;
    // A single-cell grid keeps its one cell at the lower bounds
    let last = grid.field.saturating_sub(1).max(1) as f32;

    let position = [
        (x as f32 - half) * grid.spacing,
        0.0,
        (y as f32 - half) * grid.spacing,
    ];
    let metallic = (x as f32 / last).clamp(MIN_METALLIC, 1.0);
    let roughness = (y as f32 / last).clamp(MIN_ROUGHNESS, 1.0);

    GridPushConstants {
        position,
        material: material.with_surface(roughness, metallic),
    }
}

/// Recorded draw sequence for one material/mesh selection
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialGridDrawList {
    cells: Vec<GridPushConstants>,
    material_index: usize,
    mesh_index: usize,
}

impl MaterialGridDrawList {
    /// Rows (`y`) in the outer loop, columns (`x`) in the inner loop
    pub fn build(
        grid: &GridConfig,
        material: &MaterialPushConstants,
        material_index: usize,
        mesh_index: usize,
    ) -> Self {
        let cells = (0..grid.field)
            .flat_map(|y| (0..grid.field).map(move |x| (x, y)))
            .map(|(x, y)| grid_cell(grid, material, x, y))
            .collect();

        Self {
            cells,
            material_index,
            mesh_index,
        }
    }

    pub fn cells(&self) -> &[GridPushConstants] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn material_index(&self) -> usize {
        self.material_index
    }

    pub fn mesh_index(&self) -> usize {
        self.mesh_index
    }

    /// Replays the list: position push, material push, draw, per cell
    ///
    /// The PBR pipeline and scene bind group must already be set on `render_pass`.
    pub fn record<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>, mesh: &'a GpuMesh) {
        render_pass.bind_mesh(mesh);

        for cell in &self.cells {
            render_pass.set_push_constants(
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                GridPushConstants::POSITION_OFFSET,
                cell.position_bytes(),
            );
            render_pass.set_push_constants(
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                GridPushConstants::MATERIAL_OFFSET,
                cell.material_bytes(),
            );
            render_pass.draw_bound_mesh(mesh);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::resources::material::default_presets;

    fn gold() -> MaterialPushConstants {
        default_presets()[2].props
    }

    #[test]
    fn test_grid_has_one_cell_per_field() {
        let list = MaterialGridDrawList::build(&GridConfig::default(), &gold(), 2, 0);
        assert_eq!(list.len(), 49);
        assert_eq!(list.material_index(), 2);
        assert_eq!(list.mesh_index(), 0);
    }

    #[test]
    fn test_row_major_order() {
        let grid = GridConfig::default();
        let list = MaterialGridDrawList::build(&grid, &gold(), 0, 0);
        let cells = list.cells();

        // First row keeps z fixed while x advances
        assert_eq!(cells[0].position, [-8.75, 0.0, -8.75]);
        assert_eq!(cells[1].position, [-6.25, 0.0, -8.75]);
        assert_eq!(cells[6].position, [6.25, 0.0, -8.75]);
        // Second row
        assert_eq!(cells[7].position, [-8.75, 0.0, -6.25]);
        assert_eq!(cells[48].position, [6.25, 0.0, 6.25]);
    }

    #[test]
    fn test_surface_parameters_are_clamped() {
        let grid = GridConfig::default();
        let material = gold();

        let corner = grid_cell(&grid, &material, 0, 0);
        assert_eq!(corner.material.metallic, MIN_METALLIC);
        assert_eq!(corner.material.roughness, MIN_ROUGHNESS);

        let far = grid_cell(&grid, &material, 6, 6);
        assert_eq!(far.material.metallic, 1.0);
        assert_eq!(far.material.roughness, 1.0);

        let mid = grid_cell(&grid, &material, 3, 2);
        assert!((mid.material.metallic - 0.5).abs() < 1e-6);
        assert!((mid.material.roughness - 2.0 / 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_cells_carry_preset_color() {
        let list = MaterialGridDrawList::build(&GridConfig::default(), &gold(), 2, 1);
        assert!(list
            .cells()
            .iter()
            .all(|cell| cell.material.color() == [1.0, 0.71, 0.29]));
    }

    #[test]
    fn test_degenerate_grids() {
        let single = GridConfig {
            field: 1,
            spacing: 2.5,
        };
        let list = MaterialGridDrawList::build(&single, &gold(), 0, 0);
        assert_eq!(list.len(), 1);
        let cell = list.cells()[0];
        assert_eq!(cell.position, [-1.25, 0.0, -1.25]);
        assert_eq!(cell.material.metallic, MIN_METALLIC);
        assert_eq!(cell.material.roughness, MIN_ROUGHNESS);

        let empty = GridConfig {
            field: 0,
            spacing: 2.5,
        };
        assert!(MaterialGridDrawList::build(&empty, &gold(), 0, 0).is_empty());
    }

    #[test]
    fn test_custom_grid() {
        let grid = GridConfig {
            field: 2,
            spacing: 1.0,
        };
        let list = MaterialGridDrawList::build(&grid, &gold(), 0, 0);
        let positions: Vec<[f32; 3]> = list.cells().iter().map(|c| c.position).collect();
        assert_eq!(
            positions,
            vec![
                [-1.0, 0.0, -1.0],
                [0.0, 0.0, -1.0],
                [-1.0, 0.0, 0.0],
                [0.0, 0.0, 0.0]
            ]
        );
    }
}
