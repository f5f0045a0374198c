//! Device kinds and their priority ranking.

/// Priority rank of a device kind. Higher is served first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Priority(u8);

impl Priority {
    /// Rank given to kinds with no configured priority.
    pub const LOWEST: Priority = Priority(0);

    #[inline]
    pub fn new(rank: u8) -> Self {
        Priority(rank)
    }

    #[inline]
    pub fn rank(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// The kind of device that raised an interrupt.
///
/// The three reference kinds carry a built-in rank. `Custom` kinds extend
/// the set; they have no built-in rank and fall back to
/// [`Priority::LOWEST`] unless one is registered with the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "lowercase"))]
pub enum DeviceKind {
    Keyboard,
    Printer,
    Disk,
    Custom(u16),
}

impl DeviceKind {
    /// The reference kinds in polling order.
    pub const REFERENCE: [DeviceKind; 3] =
        [DeviceKind::Keyboard, DeviceKind::Printer, DeviceKind::Disk];

    /// Built-in rank: keyboard 3, printer 2, disk 1, custom none.
    pub fn reference_priority(self) -> Option<Priority> {
        match self {
            DeviceKind::Keyboard => Some(Priority(3)),
            DeviceKind::Printer => Some(Priority(2)),
            DeviceKind::Disk => Some(Priority(1)),
            DeviceKind::Custom(_) => None,
        }
    }

    /// Built-in rank, or [`Priority::LOWEST`] for custom kinds.
    pub fn priority(self) -> Priority {
        self.reference_priority().unwrap_or(Priority::LOWEST)
    }

    /// Lower-case name used in logs.
    pub fn name(self) -> String {
        match self {
            DeviceKind::Keyboard => "keyboard".to_string(),
            DeviceKind::Printer => "printer".to_string(),
            DeviceKind::Disk => "disk".to_string(),
            DeviceKind::Custom(n) => format!("custom-{}", n),
        }
    }

    /// Human-readable priority label.
    pub fn priority_label(self) -> &'static str {
        match self {
            DeviceKind::Keyboard => "High",
            DeviceKind::Printer => "Medium",
            DeviceKind::Disk => "Low",
            DeviceKind::Custom(_) => "Unknown",
        }
    }
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}
