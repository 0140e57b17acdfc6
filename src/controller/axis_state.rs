use super::component::ComponentId;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Last polled value per controller component
///
/// Written by the poller thread, readable from anywhere through cheap clones.
/// A released analog axis keeps its entry with a value of zero.
#[derive(Debug, Clone, Default)]
pub struct ControllerAxisState {
    values: Arc<RwLock<HashMap<ComponentId, f32>>>,
}

impl ControllerAxisState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, component: ComponentId, value: f32) {
        self.values.write().insert(component, value);
    }

    /// Marks a component as released
    pub fn zero(&self, component: ComponentId) {
        self.values.write().insert(component, 0.0);
    }

    pub fn get(&self, component: ComponentId) -> Option<f32> {
        self.values.read().get(&component).copied()
    }

    /// Analog components deflected beyond `deadzone`
    pub fn held(&self, deadzone: f32) -> Vec<(ComponentId, f32)> {
        let mut held: Vec<(ComponentId, f32)> = self
            .values
            .read()
            .iter()
            .filter(|(component, value)| component.is_analog() && value.abs() > deadzone)
            .map(|(component, value)| (*component, *value))
            .collect();
        held.sort_by_key(|(component, _)| *component);
        held
    }

    pub fn snapshot(&self) -> HashMap<ComponentId, f32> {
        self.values.read().clone()
    }

    pub fn clear(&self) {
        self.values.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::component::Axis;

    #[test]
    fn held_ignores_digital_and_small_values() {
        let state = ControllerAxisState::new();
        state.set(ComponentId::Axis(Axis::X), 0.8);
        state.set(ComponentId::Axis(Axis::Y), 0.01);
        state.set(ComponentId::Button(0), 1.0);
        state.set(ComponentId::Axis(Axis::Pov), 0.5);

        assert_eq!(state.held(0.02), vec![(ComponentId::Axis(Axis::X), 0.8)]);

        state.zero(ComponentId::Axis(Axis::X));
        assert!(state.held(0.02).is_empty());
        assert_eq!(state.get(ComponentId::Axis(Axis::X)), Some(0.0));
    }
}
