//! Material presets for the PBR grid
//!
//! A preset names a metal and carries its base colour plus default roughness and
//! metallic values. Presets are immutable; the grid overrides roughness and metallic
//! per cell and only the colour survives into the draw.
//!
//! Colours follow measured specular reflectance of common metals.

/// Per-draw material data pushed to the fragment stage
///
/// MUST match `MaterialParams` in `pbr.wgsl`: five tightly packed `f32`s starting at
/// byte 12 of the push-constant block.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialPushConstants {
    pub roughness: f32,
    pub metallic: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl MaterialPushConstants {
    pub fn color(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Same colour, different surface parameters
    pub fn with_surface(self, roughness: f32, metallic: f32) -> Self {
        Self {
            roughness,
            metallic,
            ..self
        }
    }
}

/// Full push-constant block for one grid cell
///
/// Layout (32 bytes): `position` at offset 0, material parameters at offset 12.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GridPushConstants {
    pub position: [f32; 3],
    pub material: MaterialPushConstants,
}

impl GridPushConstants {
    pub const SIZE: u32 = std::mem::size_of::<Self>() as u32;
    pub const POSITION_OFFSET: u32 = 0;
    pub const MATERIAL_OFFSET: u32 = std::mem::size_of::<[f32; 3]>() as u32;

    /// Bytes of the position write
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.position)
    }

    /// Bytes of the material write
    pub fn material_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.material)
    }
}

/// Named material preset
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialPreset {
    pub name: String,
    pub props: MaterialPushConstants,
}

impl MaterialPreset {
    pub fn new(name: &str, color: [f32; 3], roughness: f32, metallic: f32) -> Self {
        Self {
            name: name.to_string(),
            props: MaterialPushConstants {
                roughness,
                metallic,
                r: color[0],
                g: color[1],
                b: color[2],
            },
        }
    }
}

/// The built-in preset table, in display order
pub fn default_presets() -> Vec<MaterialPreset> {
    vec![
        MaterialPreset::new("Iron", [0.56, 0.57, 0.58], 0.1, 1.0),
        MaterialPreset::new("Copper", [0.95, 0.64, 0.54], 0.1, 1.0),
        MaterialPreset::new("Gold", [1.0, 0.71, 0.29], 0.1, 1.0),
        MaterialPreset::new("Aluminium", [0.91, 0.92, 0.92], 0.1, 1.0),
        MaterialPreset::new("Silver", [0.95, 0.93, 0.88], 0.1, 1.0),
        MaterialPreset::new("Chromium", [0.55, 0.55, 0.55], 0.1, 1.0),
    ]
}

/// Ordered preset list with a selected entry
#[derive(Debug, Clone)]
pub struct MaterialLibrary {
    presets: Vec<MaterialPreset>,
    titles: Vec<String>,
    selected: usize,
}

impl MaterialLibrary {
    /// Library over `presets`, selecting the first one
    ///
    /// # Panics
    /// Panics if `presets` is empty
    pub fn new(presets: Vec<MaterialPreset>) -> Self {
        assert!(!presets.is_empty(), "Material library needs at least one preset");
        let titles = presets.iter().map(|p| p.name.clone()).collect();
        Self {
            presets,
            titles,
            selected: 0,
        }
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> &MaterialPreset {
        &self.presets[self.selected]
    }

    /// Selects a preset by index, returns whether the selection changed
    pub fn select(&mut self, index: usize) -> crate::Result<bool> {
        if index >= self.presets.len() {
            return Err(crate::ShowcaseError::SelectionOutOfRange {
                kind: "material",
                index,
                len: self.presets.len(),
            });
        }
        let changed = self.selected != index;
        self.selected = index;
        Ok(changed)
    }
}

impl Default for MaterialLibrary {
    fn default() -> Self {
        Self::new(default_presets())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_table() {
        let presets = default_presets();
        let names: Vec<&str> = presets.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            ["Iron", "Copper", "Gold", "Aluminium", "Silver", "Chromium"]
        );

        let gold = &presets[2];
        assert_eq!(gold.props.color(), [1.0, 0.71, 0.29]);
        for preset in &presets {
            assert_eq!(preset.props.roughness, 0.1);
            assert_eq!(preset.props.metallic, 1.0);
        }
    }

    #[test]
    fn test_push_constant_layout() {
        assert_eq!(std::mem::size_of::<MaterialPushConstants>(), 20);
        assert_eq!(GridPushConstants::SIZE, 32);
        assert_eq!(GridPushConstants::MATERIAL_OFFSET, 12);
        assert_eq!(std::mem::offset_of!(GridPushConstants, material), 12);

        let pc = GridPushConstants {
            position: [1.0, 2.0, 3.0],
            material: default_presets()[0].props,
        };
        assert_eq!(pc.position_bytes().len(), 12);
        assert_eq!(pc.material_bytes().len(), 20);
    }

    #[test]
    fn test_with_surface_keeps_color() {
        let copper = default_presets()[1].props;
        let cell = copper.with_surface(0.5, 0.25);
        assert_eq!(cell.color(), copper.color());
        assert_eq!(cell.roughness, 0.5);
        assert_eq!(cell.metallic, 0.25);
    }

    #[test]
    fn test_library_selection() {
        let mut library = MaterialLibrary::default();
        assert_eq!(library.selected().name, "Iron");
        assert_eq!(library.titles().len(), library.len());

        assert!(library.select(3).unwrap());
        assert_eq!(library.selected().name, "Aluminium");
        assert!(!library.select(3).unwrap());

        assert!(library.select(6).is_err());
        assert_eq!(library.selected_index(), 3);
    }
}
