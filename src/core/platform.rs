//! Supported target platforms.
//!
//! Each platform carries a fixed attribute table: executable and shared
//! library suffixes, the linker flags that produce a shared library, and
//! the cross compiler to look for when building for it from another host.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::BuildError;

/// A target platform (os, libc, architecture).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Platform {
    WindowsAmd64,
    DarwinX86_64,
    LinuxGnuX86_64,
    LinuxGnuAarch64,
    LinuxGnuArmv7l,
    LinuxMuslX86_64,
    LinuxMuslAarch64,
    LinuxMuslArmv7l,
}

impl Platform {
    /// Every supported platform.
    pub const ALL: [Platform; 8] = [
        Platform::WindowsAmd64,
        Platform::DarwinX86_64,
        Platform::LinuxGnuX86_64,
        Platform::LinuxGnuAarch64,
        Platform::LinuxGnuArmv7l,
        Platform::LinuxMuslX86_64,
        Platform::LinuxMuslAarch64,
        Platform::LinuxMuslArmv7l,
    ];

    /// Get the platform name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::WindowsAmd64 => "windows_amd64",
            Platform::DarwinX86_64 => "darwin_x86_64",
            Platform::LinuxGnuX86_64 => "linux_gnu_x86_64",
            Platform::LinuxGnuAarch64 => "linux_gnu_aarch64",
            Platform::LinuxGnuArmv7l => "linux_gnu_armv7l",
            Platform::LinuxMuslX86_64 => "linux_musl_x86_64",
            Platform::LinuxMuslAarch64 => "linux_musl_aarch64",
            Platform::LinuxMuslArmv7l => "linux_musl_armv7l",
        }
    }

    /// Detect the platform this process is running on.
    pub fn local() -> Result<Platform, BuildError> {
        let libc = if cfg!(target_env = "musl") {
            "musl"
        } else {
            "gnu"
        };
        Platform::from_host(std::env::consts::OS, libc, std::env::consts::ARCH)
    }

    /// Map an (os, libc, arch) triple to a platform.
    ///
    /// `libc` is ignored for non-Linux hosts.
    pub fn from_host(os: &str, libc: &str, arch: &str) -> Result<Platform, BuildError> {
        let platform = match (os, libc, arch) {
            ("windows", _, "x86_64") => Platform::WindowsAmd64,
            ("macos", _, "x86_64") => Platform::DarwinX86_64,
            ("linux", "gnu", "x86_64") => Platform::LinuxGnuX86_64,
            ("linux", "gnu", "aarch64") => Platform::LinuxGnuAarch64,
            ("linux", "gnu", "arm") => Platform::LinuxGnuArmv7l,
            ("linux", "musl", "x86_64") => Platform::LinuxMuslX86_64,
            ("linux", "musl", "aarch64") => Platform::LinuxMuslAarch64,
            ("linux", "musl", "arm") => Platform::LinuxMuslArmv7l,
            _ => {
                return Err(BuildError::UnsupportedPlatform {
                    name: format!("{}-{}-{}", os, libc, arch),
                })
            }
        };
        Ok(platform)
    }

    /// Whether this is the Windows-like target (mingw toolchain, DLL output).
    pub fn is_windows(&self) -> bool {
        matches!(self, Platform::WindowsAmd64)
    }

    /// Suffix appended to executable names.
    pub fn exe_suffix(&self) -> &'static str {
        match self {
            Platform::WindowsAmd64 => ".exe",
            _ => "",
        }
    }

    /// Suffix appended to shared library names.
    pub fn lib_suffix(&self) -> &'static str {
        match self {
            Platform::WindowsAmd64 => ".dll",
            Platform::DarwinX86_64 => ".dylib",
            _ => ".so",
        }
    }

    /// Linker flags that turn a link into a shared library.
    pub fn shared_link_flags(&self) -> &'static [&'static str] {
        match self {
            Platform::WindowsAmd64 => &["-mdll", "-Wl,--export-all"],
            _ => &["-shared"],
        }
    }

    /// Cross compiler probed when this platform is not the local one.
    pub fn cross_compiler(&self) -> Option<&'static str> {
        match self {
            Platform::WindowsAmd64 => Some("x86_64-w64-mingw32-gcc"),
            Platform::LinuxGnuAarch64 => Some("aarch64-linux-gnu-gcc"),
            Platform::LinuxGnuArmv7l => Some("arm-linux-gnueabihf-gcc"),
            Platform::LinuxMuslX86_64 => Some("musl-gcc"),
            _ => None,
        }
    }

    /// Compile flags injected when cross compiling for this platform.
    pub fn cross_cflags(&self) -> &'static [&'static str] {
        match self {
            Platform::LinuxGnuArmv7l => &["-march=armv7"],
            _ => &[],
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == lower)
            .ok_or_else(|| BuildError::UnsupportedPlatform {
                name: s.to_string(),
            })
    }
}

impl TryFrom<String> for Platform {
    type Error = BuildError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "LINUX_GNU_X86_64".parse::<Platform>().unwrap(),
            Platform::LinuxGnuX86_64
        );
        assert_eq!(
            "windows_amd64".parse::<Platform>().unwrap(),
            Platform::WindowsAmd64
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "solaris_sparc".parse::<Platform>().unwrap_err();
        assert!(matches!(err, BuildError::UnsupportedPlatform { .. }));
        assert!(err.to_string().contains("solaris_sparc"));
    }

    #[test]
    fn test_display_round_trips_every_platform() {
        for platform in Platform::ALL {
            assert_eq!(platform.to_string().parse::<Platform>().unwrap(), platform);
        }
    }

    #[test]
    fn test_from_host() {
        assert_eq!(
            Platform::from_host("linux", "musl", "aarch64").unwrap(),
            Platform::LinuxMuslAarch64
        );
        assert_eq!(
            Platform::from_host("macos", "gnu", "x86_64").unwrap(),
            Platform::DarwinX86_64
        );
        assert!(Platform::from_host("macos", "gnu", "aarch64").is_err());
        assert!(Platform::from_host("freebsd", "gnu", "x86_64").is_err());
    }

    #[test]
    fn test_suffixes() {
        assert_eq!(Platform::WindowsAmd64.exe_suffix(), ".exe");
        assert_eq!(Platform::WindowsAmd64.lib_suffix(), ".dll");
        assert_eq!(Platform::DarwinX86_64.exe_suffix(), "");
        assert_eq!(Platform::DarwinX86_64.lib_suffix(), ".dylib");
        assert_eq!(Platform::LinuxMuslArmv7l.lib_suffix(), ".so");
    }

    #[test]
    fn test_shared_link_flags() {
        assert_eq!(
            Platform::WindowsAmd64.shared_link_flags(),
            &["-mdll", "-Wl,--export-all"]
        );
        for platform in Platform::ALL.iter().filter(|p| !p.is_windows()) {
            assert_eq!(platform.shared_link_flags(), &["-shared"]);
        }
    }

    #[test]
    fn test_serde_uses_snake_case_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            platform: Platform,
        }

        let w: Wrapper = toml::from_str("platform = \"linux_gnu_armv7l\"").unwrap();
        assert_eq!(w.platform, Platform::LinuxGnuArmv7l);
        assert!(toml::from_str::<Wrapper>("platform = \"beos\"").is_err());
    }
}
