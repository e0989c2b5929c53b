use surface_scene::Material;

/// A numeric slider: range plus step grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderBinding {
    pub label: String,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl SliderBinding {
    pub fn new(label: impl Into<String>, min: f32, max: f32, step: f32) -> Self {
        Self {
            label: label.into(),
            min: min.min(max),
            max: max.max(min),
            step: step.max(0.0),
        }
    }

    /// Clamp into range, then snap to the nearest step counted from `min`.
    pub fn apply(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.min;
        }
        let clamped = value.clamp(self.min, self.max);
        if self.step <= 0.0 {
            return clamped;
        }
        // f64 keeps a 0.0001 grid exact enough for four decimals.
        let (min, step) = (self.min as f64, self.step as f64);
        let steps = ((clamped as f64 - min) / step).round();
        ((min + steps * step) as f32).clamp(self.min, self.max)
    }

    /// Decimal places needed to show one step.
    pub fn decimals(&self) -> usize {
        if self.step <= 0.0 {
            return 3;
        }
        (-(self.step as f64).log10() - 1e-6).ceil().max(0.0) as usize
    }
}

/// Material scalars the panel can bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialField {
    Metalness,
    Roughness,
}

impl MaterialField {
    pub fn name(self) -> &'static str {
        match self {
            MaterialField::Metalness => "metalness",
            MaterialField::Roughness => "roughness",
        }
    }
}

/// The set of live bindings from panel widgets to material fields.
#[derive(Debug, Clone)]
pub struct DebugPanel {
    bindings: Vec<(MaterialField, SliderBinding)>,
    pub visible: bool,
}

impl Default for DebugPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugPanel {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
            visible: true,
        }
    }

    /// Metalness and roughness, each on [0, 1] in steps of 0.0001.
    pub fn material_panel() -> Self {
        let mut panel = Self::new();
        panel.add(MaterialField::Metalness, 0.0, 1.0, 0.0001);
        panel.add(MaterialField::Roughness, 0.0, 1.0, 0.0001);
        panel
    }

    /// Bind a field to a slider with the given range and step.
    pub fn add(&mut self, field: MaterialField, min: f32, max: f32, step: f32) {
        let binding = SliderBinding::new(field.name(), min, max, step);
        match self.bindings.iter_mut().find(|(f, _)| *f == field) {
            Some(slot) => slot.1 = binding,
            None => self.bindings.push((field, binding)),
        }
    }

    pub fn bindings(&self) -> impl Iterator<Item = (MaterialField, &SliderBinding)> {
        self.bindings.iter().map(|(f, b)| (*f, b))
    }

    pub fn binding(&self, field: MaterialField) -> Option<&SliderBinding> {
        self.bindings.iter().find(|(f, _)| *f == field).map(|(_, b)| b)
    }

    pub fn get(&self, material: &Material, field: MaterialField) -> f32 {
        match field {
            MaterialField::Metalness => material.metalness(),
            MaterialField::Roughness => material.roughness(),
        }
    }

    /// Write a widget value into the material through the field's binding.
    /// Unbound fields only get the material's own clamping. Returns the stored value.
    pub fn set(&self, material: &mut Material, field: MaterialField, value: f32) -> f32 {
        let value = match self.binding(field) {
            Some(b) => b.apply(value),
            None => value,
        };
        match field {
            MaterialField::Metalness => material.set_metalness(value),
            MaterialField::Roughness => material.set_roughness(value),
        }
        let stored = self.get(material, field);
        tracing::trace!("{} = {stored}", field.name());
        stored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surface_scene::DemoScene;

    #[test]
    fn out_of_range_is_clamped() {
        let b = SliderBinding::new("metalness", 0.0, 1.0, 0.0001);
        assert_eq!(b.apply(1.5), 1.0);
        assert_eq!(b.apply(-3.0), 0.0);
        assert_eq!(b.apply(f32::NAN), 0.0);
    }

    #[test]
    fn values_snap_to_step() {
        let b = SliderBinding::new("roughness", 0.0, 1.0, 0.0001);
        assert!((b.apply(0.12345) - 0.1235).abs() < 1e-7);
        assert!((b.apply(0.70004) - 0.7).abs() < 1e-7);
        assert_eq!(b.apply(1.0), 1.0);
    }

    #[test]
    fn coarse_step_from_min() {
        let b = SliderBinding::new("x", 0.5, 2.0, 0.25);
        assert_eq!(b.apply(0.8), 0.75);
        assert_eq!(b.apply(1.9), 2.0);
    }

    #[test]
    fn decimals_follow_step() {
        assert_eq!(SliderBinding::new("x", 0.0, 1.0, 0.0001).decimals(), 4);
        assert_eq!(SliderBinding::new("x", 0.0, 10.0, 1.0).decimals(), 0);
    }

    #[test]
    fn panel_binds_metalness_and_roughness() {
        let panel = DebugPanel::material_panel();
        let fields: Vec<_> = panel.bindings().map(|(f, _)| f).collect();
        assert_eq!(fields, [MaterialField::Metalness, MaterialField::Roughness]);
        assert!(panel.visible);
    }

    #[test]
    fn panel_write_reaches_every_mesh() {
        let panel = DebugPanel::material_panel();
        let mut demo = DemoScene::build(Material::standard(0.7, 0.2));

        let stored = panel.set(demo.material_mut(), MaterialField::Metalness, 1.5);
        assert_eq!(stored, 1.0);
        panel.set(demo.material_mut(), MaterialField::Roughness, 0.33333);

        for id in demo.mesh_ids() {
            let m = demo.scene.node_material(id).unwrap();
            assert_eq!(m.metalness(), 1.0);
            assert!((m.roughness() - 0.3333).abs() < 1e-7);
        }
    }

    #[test]
    fn rebinding_replaces_range() {
        let mut panel = DebugPanel::material_panel();
        panel.add(MaterialField::Roughness, 0.0, 0.5, 0.1);
        assert_eq!(panel.bindings().count(), 2);
        let mut m = Material::default();
        assert_eq!(panel.set(&mut m, MaterialField::Roughness, 0.9), 0.5);
    }
}
