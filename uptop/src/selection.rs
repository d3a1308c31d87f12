//! The single "currently selected target" slot.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection(Option<i64>);

impl Selection {
    pub fn get(&self) -> Option<i64> {
        self.0
    }

    pub fn set(&mut self, id: i64) {
        self.0 = Some(id);
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.0 == Some(id)
    }
}
