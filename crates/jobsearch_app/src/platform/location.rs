/// Address bar of the headless screen.
///
/// Filter changes overwrite the current entry instead of pushing a new one,
/// so the history never grows while the screen is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationBar {
    current: String,
    writes: usize,
}

impl LocationBar {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            current: initial.into(),
            writes: 0,
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    /// Returns `false` when `location` is already current.
    pub fn replace(&mut self, location: String) -> bool {
        if location == self.current {
            return false;
        }
        self.current = location;
        self.writes += 1;
        true
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}
