//! Best-effort host machine sampling.
//!
//! Every lookup degrades to a placeholder instead of failing, so the
//! machine-info endpoint never errors.

use std::net::UdpSocket;

use serde::Serialize;

/// Fixed application name reported in every snapshot.
pub const APPLICATION_NAME: &str = "machine-info-app";

/// Sentinel for lookups that cannot be answered on this host.
pub const UNKNOWN: &str = "unknown";

/// Address used to discover the primary outbound interface. The socket
/// is connectionless; no traffic is actually sent toward it.
const PROBE_ADDR: &str = "8.8.8.8:80";

/// Operating system identification strings from `uname(2)`.
#[derive(Debug, Serialize)]
pub struct OsInfo {
    pub system: String,
    pub release: String,
    pub version: String,
}

/// Snapshot of host state returned by `/machine-info`.
#[derive(Debug, Serialize)]
pub struct MachineInfo {
    pub application: &'static str,
    pub hostname: String,
    pub ip: String,
    pub os: OsInfo,
    pub architecture: String,
    /// Toolchain version, informational only.
    pub rust: &'static str,
    pub cpu_count: Option<usize>,
    /// 1/5/15-minute load averages where the platform exposes them.
    pub load_avg: Option<[f64; 3]>,
    pub uptime_seconds: u64,
    pub port: u16,
}

/// Sample the host. `uptime_seconds` and `port` come from the caller so
/// process start stays an explicit value rather than a global.
pub fn sample(uptime_seconds: u64, port: u16) -> MachineInfo {
    let (os, architecture) = os_info();
    MachineInfo {
        application: APPLICATION_NAME,
        hostname: hostname(),
        ip: primary_ip(),
        os,
        architecture,
        rust: env!("CARGO_PKG_RUST_VERSION"),
        cpu_count: std::thread::available_parallelism().ok().map(|n| n.get()),
        load_avg: load_avg(),
        uptime_seconds,
        port,
    }
}

/// Best-effort primary outbound IP: "connect" a UDP socket toward a
/// well-known address and read back the local endpoint the kernel picked.
fn primary_ip() -> String {
    fn local_addr() -> std::io::Result<std::net::SocketAddr> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.connect(PROBE_ADDR)?;
        socket.local_addr()
    }
    local_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|_| UNKNOWN.to_string())
}

#[cfg(unix)]
fn hostname() -> String {
    let mut buf = [0 as libc::c_char; 256];
    // SAFETY: buf outlives the call and its length is passed alongside.
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr(), buf.len()) };
    if rc == 0 {
        let name = cstr_field(&buf);
        if !name.is_empty() {
            return name;
        }
    }
    UNKNOWN.to_string()
}

#[cfg(not(unix))]
fn hostname() -> String {
    std::env::var("COMPUTERNAME").unwrap_or_else(|_| UNKNOWN.to_string())
}

#[cfg(unix)]
fn os_info() -> (OsInfo, String) {
    let mut uts = std::mem::MaybeUninit::<libc::utsname>::uninit();
    // SAFETY: uname fills the struct on success (rc == 0).
    let rc = unsafe { libc::uname(uts.as_mut_ptr()) };
    if rc == 0 {
        let uts = unsafe { uts.assume_init() };
        (
            OsInfo {
                system: cstr_field(&uts.sysname),
                release: cstr_field(&uts.release),
                version: cstr_field(&uts.version),
            },
            cstr_field(&uts.machine),
        )
    } else {
        fallback_os_info()
    }
}

#[cfg(not(unix))]
fn os_info() -> (OsInfo, String) {
    fallback_os_info()
}

fn fallback_os_info() -> (OsInfo, String) {
    (
        OsInfo {
            system: std::env::consts::OS.to_string(),
            release: UNKNOWN.to_string(),
            version: UNKNOWN.to_string(),
        },
        std::env::consts::ARCH.to_string(),
    )
}

#[cfg(unix)]
fn load_avg() -> Option<[f64; 3]> {
    let mut loads = [0f64; 3];
    // SAFETY: loads holds the three samples getloadavg is asked for.
    let n = unsafe { libc::getloadavg(loads.as_mut_ptr(), 3) };
    (n == 3).then_some(loads)
}

#[cfg(not(unix))]
fn load_avg() -> Option<[f64; 3]> {
    None
}

/// Read a NUL-terminated `c_char` array into an owned string.
#[cfg(unix)]
fn cstr_field(field: &[libc::c_char]) -> String {
    let bytes: Vec<u8> = field
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}
