use crate::errors::GateError;

/// Permission status enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PermissionStatus {
    /// Permission granted
    Granted,
    /// Permission denied
    Denied,
    /// Permission not determined (the platform will prompt on first use)
    NotDetermined,
    /// Permission restricted (parental controls, etc)
    Restricted,
}

impl PermissionStatus {
    /// Whether a session may start. An undetermined permission is prompted for by the platform.
    pub fn allows_access(self) -> bool {
        matches!(self, PermissionStatus::Granted | PermissionStatus::NotDetermined)
    }
}

impl std::fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionStatus::Granted => write!(f, "granted"),
            PermissionStatus::Denied => write!(f, "denied"),
            PermissionStatus::NotDetermined => write!(f, "not_determined"),
            PermissionStatus::Restricted => write!(f, "restricted"),
        }
    }
}

/// Platform permission prompts for the two sensors a session needs.
pub trait PermissionGate {
    fn request_camera_access(&self) -> PermissionStatus;
    fn request_motion_access(&self) -> PermissionStatus;
}

/// Fixed answers, for hosts that negotiate permissions up front and for tests.
#[derive(Debug, Clone, Copy)]
pub struct StaticPermissions {
    pub camera: PermissionStatus,
    pub motion: PermissionStatus,
}

impl StaticPermissions {
    pub fn granted() -> Self {
        Self {
            camera: PermissionStatus::Granted,
            motion: PermissionStatus::Granted,
        }
    }
}

impl PermissionGate for StaticPermissions {
    fn request_camera_access(&self) -> PermissionStatus {
        self.camera
    }

    fn request_motion_access(&self) -> PermissionStatus {
        self.motion
    }
}

/// Ask for motion then camera access; either refusal stops the flow.
pub fn ensure_access(gate: &dyn PermissionGate) -> Result<(), GateError> {
    let motion = gate.request_motion_access();
    if !motion.allows_access() {
        log::warn!("Motion sensor permission {}", motion);
        return Err(GateError::PermissionDenied(format!(
            "motion sensor access {}",
            motion
        )));
    }

    let camera = gate.request_camera_access();
    if !camera.allows_access() {
        log::warn!("Camera permission {}", camera);
        return Err(GateError::PermissionDenied(format!(
            "camera access {}",
            camera
        )));
    }

    Ok(())
}
