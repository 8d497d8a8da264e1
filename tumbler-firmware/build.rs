//! Build script for tumbler-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates vault.toml and bakes it into the firmware as constants

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tumbler_core::config::VaultConfig;

/// Bluetooth serial module settings
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RemoteSection {
    device_name: String,
    baudrate: u32,
    handshake_timeout_ms: u64,
    response_timeout_ms: u64,
}

impl Default for RemoteSection {
    fn default() -> Self {
        Self {
            device_name: "UnicornVault".into(),
            baudrate: 9600,
            handshake_timeout_ms: 1000,
            response_timeout_ms: 2000,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VaultFile {
    vault: VaultConfig,
    remote: RemoteSection,
}

fn main() {
    setup_linker();
    let file = load_config();
    generate_config(&file);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read and validate vault.toml
fn load_config() -> VaultFile {
    println!("cargo:rerun-if-changed=vault.toml");

    let config_path = Path::new("vault.toml");

    if !config_path.exists() {
        println!("cargo:warning=vault.toml not found, building with default settings");
        return VaultFile::default();
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read vault.toml", &e.to_string()),
    };

    let file: VaultFile = match toml::from_str(&config_content) {
        Ok(file) => file,
        Err(e) => fail("Invalid vault.toml", &e.to_string()),
    };

    if let Err(e) = file.vault.validate() {
        fail("Invalid [vault] settings in vault.toml", &format!("{:?}", e));
    }

    let mut errors = Vec::new();
    if file.remote.device_name.is_empty() {
        errors.push("[remote] device_name must not be empty".to_string());
    }
    if !(1200..=115_200).contains(&file.remote.baudrate) {
        errors.push("[remote] baudrate must be 1200-115200".to_string());
    }
    if file.remote.handshake_timeout_ms == 0 || file.remote.response_timeout_ms == 0 {
        errors.push("[remote] timeouts must be non-zero".to_string());
    }
    if !errors.is_empty() {
        fail("Invalid [remote] settings in vault.toml", &errors.join("\n"));
    }

    println!("cargo:warning=vault.toml validated successfully");
    file
}

/// Write the validated settings as Rust constants into OUT_DIR
fn generate_config(file: &VaultFile) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let v = &file.vault;
    let r = &file.remote;

    let source = format!(
        "/// Vault settings from vault.toml\n\
        pub const VAULT_CONFIG: VaultConfig = VaultConfig {{\n    \
            read_input_delay_ms: {},\n    \
            button_debounce_ms: {},\n    \
            reset_button_debounce_ms: {},\n    \
            flash_time_ms: {},\n    \
            flash_count: {},\n    \
            refresh_lock_wait_ms: {},\n    \
            max_incorrect_tries: {},\n    \
            lock_time_s: {},\n    \
            unlock_lock_delay_ms: {},\n    \
            lock_delay_ms: {},\n    \
            reset_lock_delay_ms: {},\n    \
            buzzer_time_ms: {},\n    \
            default_passcode: {:?},\n\
        }};\n\
        \n\
        pub const REMOTE_DEVICE_NAME: &str = {:?};\n\
        pub const REMOTE_BAUDRATE: u32 = {};\n\
        pub const REMOTE_HANDSHAKE_TIMEOUT_MS: u64 = {};\n\
        pub const REMOTE_RESPONSE_TIMEOUT_MS: u64 = {};\n",
        v.read_input_delay_ms,
        v.button_debounce_ms,
        v.reset_button_debounce_ms,
        v.flash_time_ms,
        v.flash_count,
        v.refresh_lock_wait_ms,
        v.max_incorrect_tries,
        v.lock_time_s,
        v.unlock_lock_delay_ms,
        v.lock_delay_ms,
        v.reset_lock_delay_ms,
        v.buzzer_time_ms,
        v.default_passcode,
        r.device_name,
        r.baudrate,
        r.handshake_timeout_ms,
        r.response_timeout_ms,
    );

    fs::write(out_dir.join("vault_config.rs"), source).unwrap();
}

/// Abort the build with a boxed error message
fn fail(title: &str, detail: &str) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        format_error_lines(detail)
    );
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
