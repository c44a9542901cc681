//! Static classification data and default thresholds.

/// Default cut-off for the high-memory preset, in MB.
pub const HIGH_MEMORY_THRESHOLD_MB: f64 = 500.0;

/// Processes below this RSS are dropped at snapshot time, in MB.
pub const DEFAULT_MIN_MEMORY_MB: f64 = 5.0;

/// Longest command line kept in a record, in characters.
pub const CMDLINE_MAX_CHARS: usize = 200;

/// Targets listed in a CLI confirmation or preview.
pub const PREVIEW_LIMIT: usize = 5;

/// Targets listed in the GUI confirmation dialog.
pub const CONFIRM_PREVIEW_LIMIT: usize = 10;

/// Parent names that mark a process as re-parented to init.
pub const INIT_PARENT_NAMES: &[&str] = &["systemd", "init"];

/// Executables under these prefixes are treated as system services.
pub const SYSTEM_EXE_PATHS: &[&str] = &["/usr/lib", "/usr/libexec", "/lib"];

/// Process names that must never be offered for bulk termination.
/// Compared case-insensitively.
pub const CRITICAL_SERVICES: &[&str] = &[
    // Display/session
    "gnome-shell",
    "kwin",
    "kwin_x11",
    "kwin_wayland",
    "plasmashell",
    "mutter",
    // Audio
    "pipewire",
    "pipewire-pulse",
    "wireplumber",
    "pulseaudio",
    // Remote sessions
    "tmux: server",
    "tmux",
    "mosh-server",
    // Shells
    "zsh",
    "-zsh",
    "bash",
    "-bash",
    "fish",
    "-fish",
    "ssh",
    "sshd",
    // System
    "systemd",
    "init",
    "dbus-daemon",
    "dbus-broker",
    // Desktop services
    "ibus-daemon",
    "gjs",
    "gnome-keyring-daemon",
];
