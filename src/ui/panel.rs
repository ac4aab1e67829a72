// src/ui/panel.rs
//! Settings overlay
//!
//! A small window in the top-left corner with frame statistics and a "Setup" header
//! holding the material and mesh selectors.

/// Indices shown by the two selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub material: usize,
    pub mesh: usize,
}

/// Selector changes made during one UI frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettingsChange {
    pub material: Option<usize>,
    pub mesh: Option<usize>,
}

impl SettingsChange {
    /// Compares the selection before and after the UI ran
    pub fn between(before: Selection, after: Selection) -> Self {
        Self {
            material: (before.material != after.material).then_some(after.material),
            mesh: (before.mesh != after.mesh).then_some(after.mesh),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.material.is_none() && self.mesh.is_none()
    }
}

/// Read-only numbers shown above the selectors
#[derive(Debug, Clone, Default)]
pub struct OverlayStats {
    pub fps: f32,
    pub adapter: String,
    pub paused: bool,
}

impl OverlayStats {
    fn frame_line(&self) -> String {
        if self.fps > 0.0 {
            format!("{:.0} fps ({:.2} ms)", self.fps, 1000.0 / self.fps)
        } else {
            "-- fps".to_string()
        }
    }

    fn animation_line(&self) -> &'static str {
        if self.paused {
            "Lights: paused (P)"
        } else {
            "Lights: orbiting (P)"
        }
    }
}

/// Draws the settings window and reports which selector changed
///
/// # Arguments
/// * `ui` - ImGui UI context
/// * `material_titles` - Entries of the "Selected Material" combo
/// * `mesh_titles` - Entries of the "Selected Mesh" combo
/// * `selection` - Current indices, updated in place by the combos
/// * `stats` - Frame statistics for the header
pub fn settings_panel(
    ui: &imgui::Ui,
    material_titles: &[String],
    mesh_titles: &[String],
    selection: &mut Selection,
    stats: &OverlayStats,
) -> SettingsChange {
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return SettingsChange::default();
    }

    let before = *selection;

    ui.window("Physically Based Rendering")
        .position([10.0, 10.0], imgui::Condition::FirstUseEver)
        .always_auto_resize(true)
        .resizable(false)
        .collapsible(true)
        .build(|| {
            ui.text(&stats.adapter);
            ui.text(stats.frame_line());
            ui.text(stats.animation_line());
            ui.separator();

            if ui.collapsing_header("Setup", imgui::TreeNodeFlags::DEFAULT_OPEN) {
                ui.combo_simple_string("Selected Material", &mut selection.material, material_titles);
                ui.combo_simple_string("Selected Mesh", &mut selection.mesh, mesh_titles);
            }
        });

    SettingsChange::between(before, *selection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_change() {
        let selection = Selection { material: 1, mesh: 2 };
        let change = SettingsChange::between(selection, selection);
        assert!(change.is_empty());
    }

    #[test]
    fn test_material_change_only() {
        let change = SettingsChange::between(
            Selection { material: 0, mesh: 0 },
            Selection { material: 3, mesh: 0 },
        );
        assert_eq!(change.material, Some(3));
        assert_eq!(change.mesh, None);
        assert!(!change.is_empty());
    }

    #[test]
    fn test_both_change() {
        let change = SettingsChange::between(
            Selection { material: 0, mesh: 0 },
            Selection { material: 5, mesh: 1 },
        );
        assert_eq!(change, SettingsChange { material: Some(5), mesh: Some(1) });
    }

    #[test]
    fn test_stats_lines() {
        let stats = OverlayStats {
            fps: 50.0,
            adapter: "Test GPU".to_string(),
            paused: true,
        };
        assert_eq!(stats.frame_line(), "50 fps (20.00 ms)");
        assert_eq!(stats.animation_line(), "Lights: paused (P)");
        assert_eq!(OverlayStats::default().frame_line(), "-- fps");
    }
}
