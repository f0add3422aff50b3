//! Event types for OpticBench

#[derive(Debug, Clone, PartialEq)]
pub enum OpticBenchEvent {
    SimulationStarted,
    SimulationStopped,
    RayEmitted {
        length: f64,
    },
    CameraHit {
        pixel_x: f64,
        pixel_y: f64,
    },
    ComponentFailed {
        index: usize,
        error: String,
    },
    ComponentToggled {
        index: usize,
        is_on: bool,
    },
    LaserAnglesChanged {
        angle_x: f64,
        angle_y: f64,
    },
    LaserPowerChanged {
        old_power: f64,
        new_power: f64,
    },
}

impl OpticBenchEvent {
    pub fn component_index(&self) -> Option<usize> {
        match self {
            Self::ComponentFailed { index, .. } | Self::ComponentToggled { index, .. } => {
                Some(*index)
            }
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::ComponentFailed { .. })
    }

    pub fn is_control_event(&self) -> bool {
        matches!(
            self,
            Self::SimulationStarted
                | Self::SimulationStopped
                | Self::ComponentToggled { .. }
                | Self::LaserAnglesChanged { .. }
                | Self::LaserPowerChanged { .. }
        )
    }
}
