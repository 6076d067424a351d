//! Target architectures and the SDK platform each one links against.

/// A target architecture slice of the merged framework binary.
///
/// The set is fixed: two simulator slices (`x86_64`, `i386`) and three device
/// slices (`armv7`, `armv7s`, `arm64`). Every architecture maps to exactly one
/// [`Platform`].
///
/// # Example
///
/// ```
/// use fatpod_schema::{Arch, Platform};
///
/// let arch: Arch = "armv7s".parse().unwrap();
/// assert_eq!(arch.platform(), Platform::Device);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    /// 64-bit Intel simulator slice.
    X86_64,
    /// 32-bit Intel simulator slice.
    I386,
    /// 32-bit `armv7` device slice.
    Armv7,
    /// 32-bit `armv7s` device slice.
    Armv7s,
    /// 64-bit ARM device slice.
    Arm64,
}

/// SDK family an architecture links against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// `iPhoneSimulator.sdk`
    Simulator,
    /// `iPhoneOS.sdk`
    Device,
}

impl Arch {
    /// Every supported architecture, in the order slices are linked.
    pub const ALL: [Arch; 5] = [
        Arch::X86_64,
        Arch::I386,
        Arch::Armv7,
        Arch::Armv7s,
        Arch::Arm64,
    ];

    /// Architectures that link against the simulator SDK.
    const SIMULATOR: [Arch; 2] = [Arch::X86_64, Arch::I386];

    /// Name as understood by `libtool -arch_only` and reported by `lipo -archs`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::I386 => "i386",
            Self::Armv7 => "armv7",
            Self::Armv7s => "armv7s",
            Self::Arm64 => "arm64",
        }
    }

    /// Platform class, decided purely by membership in the simulator set.
    pub fn platform(&self) -> Platform {
        if Self::SIMULATOR.contains(self) {
            Platform::Simulator
        } else {
            Platform::Device
        }
    }

    /// Shorthand for `self.platform() == Platform::Simulator`.
    pub fn is_simulator(&self) -> bool {
        self.platform() == Platform::Simulator
    }
}

impl Platform {
    /// Human-readable platform label used in progress output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Simulator => "Simulator",
            Self::Device => "iOS",
        }
    }

    /// Directory name of the platform inside `<Developer>/Platforms`.
    pub fn platform_dir(&self) -> &'static str {
        match self {
            Self::Simulator => "iPhoneSimulator.platform",
            Self::Device => "iPhoneOS.platform",
        }
    }

    /// SDK bundle name inside `<platform>/Developer/SDKs`.
    pub fn sdk_name(&self) -> &'static str {
        match self {
            Self::Simulator => "iPhoneSimulator.sdk",
            Self::Device => "iPhoneOS.sdk",
        }
    }

    /// `libtool` flag that sets the minimum deployment target for this platform.
    pub fn version_min_flag(&self) -> &'static str {
        match self {
            Self::Simulator => "-ios_simulator_version_min",
            Self::Device => "-ios_version_min",
        }
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Arch {
    type Err = crate::SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "x86_64" | "x86-64" => Ok(Self::X86_64),
            "i386" => Ok(Self::I386),
            "armv7" => Ok(Self::Armv7),
            "armv7s" => Ok(Self::Armv7s),
            "arm64" | "aarch64" => Ok(Self::Arm64),
            _ => Err(crate::SchemaError::UnknownArch(s.to_string())),
        }
    }
}
