use song_schema::ControlElement;

/// Activation or release of one control element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputEvent {
    /// Host wall-clock time when the event occurred
    pub timestamp: f64,
    pub element: ControlElement,
    pub pressed: bool,
}

impl InputEvent {
    pub fn activated(timestamp: f64, element: impl Into<ControlElement>) -> Self {
        Self {
            timestamp,
            element: element.into(),
            pressed: true,
        }
    }

    pub fn deactivated(timestamp: f64, element: impl Into<ControlElement>) -> Self {
        Self {
            timestamp,
            element: element.into(),
            pressed: false,
        }
    }
}
