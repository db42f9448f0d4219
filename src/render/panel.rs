/// Visibility of the schedule panel. Never persisted; every session starts hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Hidden,
    Shown,
}

impl PanelState {
    pub fn open(&mut self) {
        *self = Self::Shown;
    }

    pub fn close(&mut self) {
        *self = Self::Hidden;
    }

    pub fn toggle(&mut self) {
        *self = match self {
            Self::Hidden => Self::Shown,
            Self::Shown => Self::Hidden,
        };
    }

    pub fn is_shown(&self) -> bool {
        matches!(self, Self::Shown)
    }
}
