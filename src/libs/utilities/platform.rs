// Our custom logging macros for nicely formatted output.
use crate::log_debug;
use crate::libs::errors::FatalError;
// The 'colored' crate helps us make our console output readable.
use colored::Colorize;

/// Raw CPU architecture names, as reported for the running binary, mapped to the
/// token used in release asset filenames. Anything not listed is unsupported.
const ARCH_MAP: &[(&str, &str)] = &[
    ("x86_64", "amd64"),
    ("amd64", "amd64"),
    ("aarch64", "arm64"),
    ("arm64", "arm64"),
];

/// The normalized platform tokens used to pick a release asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// Lowercased OS name, e.g. `linux`.
    pub os: String,
    /// Normalized architecture token, e.g. `amd64` or `arm64`.
    pub arch: String,
}

/// Turns the raw OS name and CPU architecture into asset-name tokens.
///
/// Resolution is lazy: only the GitHub release strategy calls [`PlatformResolver::resolve`],
/// so an unsupported architecture only matters when such a tool actually needs installing.
#[derive(Debug, Clone)]
pub struct PlatformResolver {
    raw_os: String,
    raw_arch: String,
}

impl PlatformResolver {
    /// Uses the OS and architecture of the running binary (`std::env::consts`).
    pub fn from_host() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Uses explicit raw values, e.g. `("Linux", "x86_64")`.
    pub fn new(raw_os: &str, raw_arch: &str) -> Self {
        PlatformResolver {
            raw_os: raw_os.to_string(),
            raw_arch: raw_arch.to_string(),
        }
    }

    /// Returns the normalized platform, or `UnsupportedArchitecture` when the raw
    /// architecture has no mapping.
    pub fn resolve(&self) -> Result<Platform, FatalError> {
        let os = self.raw_os.trim().to_lowercase();
        let arch = normalize_arch(&self.raw_arch)
            .ok_or_else(|| FatalError::UnsupportedArchitecture(self.raw_arch.clone()))?;
        log_debug!(
            "[Platform] Resolved {}/{} -> {}/{}",
            self.raw_os,
            self.raw_arch,
            os.cyan(),
            arch.magenta()
        );
        Ok(Platform {
            os,
            arch: arch.to_string(),
        })
    }
}

/// Looks up a raw architecture name in the architecture map, case-insensitively.
pub fn normalize_arch(raw: &str) -> Option<&'static str> {
    let raw = raw.trim().to_lowercase();
    ARCH_MAP
        .iter()
        .find(|(from, _)| *from == raw)
        .map(|(_, to)| *to)
}

/// Fails unless the host OS is Linux; other systems are not provisioned.
pub fn ensure_linux(os: &str) -> Result<(), FatalError> {
    if os.eq_ignore_ascii_case("linux") {
        Ok(())
    } else {
        Err(FatalError::UnsupportedOs(os.to_string()))
    }
}
