//! Debug logging for terrain generation
//!
//! Writes to `perlin_terrain_debug.log` in the working directory.
//! Nothing is written until `init_debug_log()` has been called; the file is
//! recreated on each call.

use std::fs::File;
use std::io::Write;
use std::sync::Mutex;

const DEBUG_LOG_PATH: &str = "perlin_terrain_debug.log";

lazy_static::lazy_static! {
    static ref DEBUG_LOG: Mutex<Option<File>> = Mutex::new(None);
}

/// Log a debug message to the terrain debug log file
pub fn debug_log(msg: &str) {
    if let Ok(mut guard) = DEBUG_LOG.lock() {
        if let Some(ref mut file) = *guard {
            let _ = writeln!(file, "{}", msg);
            let _ = file.flush();
        }
    }
}

/// Initialize the debug log file (overwrites any existing log)
pub fn init_debug_log() {
    if let Ok(mut guard) = DEBUG_LOG.lock() {
        *guard = File::create(DEBUG_LOG_PATH).ok();
        if let Some(ref mut file) = *guard {
            let _ = writeln!(file, "=== PERLIN TERRAIN DEBUG LOG ===");
            let _ = writeln!(file, "Timestamp: {:?}", std::time::SystemTime::now());
            let _ = writeln!(file);
        }
    }
}

/// Statistics about normals in a mesh
#[derive(Debug, PartialEq)]
pub struct NormalStats {
    pub min_len: f32,
    pub max_len: f32,
    pub degenerate_count: usize,
}

/// Compute statistics about normal vectors
/// A normal is considered degenerate if its length is not close to 1.0
pub fn compute_normal_stats(normals: &[[f32; 3]]) -> NormalStats {
    if normals.is_empty() {
        return NormalStats {
            min_len: 0.0,
            max_len: 0.0,
            degenerate_count: 0,
        };
    }

    let mut min_len = f32::MAX;
    let mut max_len = f32::MIN;
    let mut degenerate_count = 0;

    for n in normals {
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        min_len = min_len.min(len);
        max_len = max_len.max(len);

        // Outside [0.99, 1.01] or NaN
        if !(0.99..=1.01).contains(&len) {
            degenerate_count += 1;
        }
    }

    NormalStats {
        min_len,
        max_len,
        degenerate_count,
    }
}
