use crate::game::types::UnitId;

/// A side of the match: a display name and the ordered roster of its live units.
#[derive(Debug, Clone)]
pub struct Player {
    name: String,
    units: Vec<UnitId>,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            units: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn units(&self) -> &[UnitId] {
        &self.units
    }

    pub fn add_unit(&mut self, id: UnitId) {
        self.units.push(id);
    }

    pub fn remove_unit(&mut self, id: UnitId) {
        self.units.retain(|&u| u != id);
    }

    /// An empty roster means this side has lost.
    pub fn has_units(&self) -> bool {
        !self.units.is_empty()
    }
}
