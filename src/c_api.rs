use crate::{body::Pose, config::SystemConfig, registry::OrbitRegistry};
use std::ffi::{CStr, c_char};
use std::path::Path;
use ultraviolet::DVec3;

fn into_handle(result: Result<OrbitRegistry, crate::ConfigError>) -> *mut OrbitRegistry {
    match result {
        Ok(registry) => Box::into_raw(Box::new(registry)),
        Err(err) => {
            tracing::error!(%err, "failed to build orbit registry");
            std::ptr::null_mut()
        }
    }
}

/// Creates the default inner solar system. Returns null on failure.
#[unsafe(no_mangle)]
pub extern "C" fn OrbitRegistry_Create() -> *mut OrbitRegistry {
    into_handle(OrbitRegistry::solar_system())
}

/// Creates a registry from a RON file. Returns null on failure.
///
/// # Safety
/// `path` must be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn OrbitRegistry_CreateFromConfig(path: *const c_char) -> *mut OrbitRegistry {
    if path.is_null() {
        return std::ptr::null_mut();
    }
    let path = unsafe { CStr::from_ptr(path) };
    let Ok(path) = path.to_str() else {
        return std::ptr::null_mut();
    };
    into_handle(SystemConfig::load(Path::new(path)).and_then(|c| OrbitRegistry::from_config(&c)))
}

/// # Safety
/// `handle` must be null or come from one of the create functions, and not be used afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn OrbitRegistry_Destroy(handle: *mut OrbitRegistry) {
    if !handle.is_null() {
        unsafe { drop(Box::from_raw(handle)) };
    }
}

/// # Safety
/// `handle` must be null or a live registry.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn OrbitRegistry_Step(handle: *mut OrbitRegistry) {
    if let Some(registry) = unsafe { handle.as_mut() } {
        registry.step();
    }
}

/// # Safety
/// `handle` must be null or a live registry.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn OrbitRegistry_GetFrame(handle: *const OrbitRegistry) -> usize {
    unsafe { handle.as_ref() }.map_or(0, |r| r.frame())
}

/// # Safety
/// `handle` must be null or a live registry; `out` must be null or writable.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn OrbitRegistry_GetStarPose(
    handle: *const OrbitRegistry,
    out: *mut Pose,
) -> bool {
    let (Some(registry), Some(out)) = (unsafe { handle.as_ref() }, unsafe { out.as_mut() }) else {
        return false;
    };
    *out = registry.star().pose();
    true
}

/// Number of primary bodies.
///
/// # Safety
/// `handle` must be null or a live registry.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn OrbitRegistry_GetBodyCount(handle: *const OrbitRegistry) -> usize {
    unsafe { handle.as_ref() }.map_or(0, |r| r.bodies().len())
}

/// # Safety
/// `handle` must be null or a live registry; `out` must be null or writable.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn OrbitRegistry_GetBodyPose(
    handle: *const OrbitRegistry,
    index: usize,
    out: *mut Pose,
) -> bool {
    let (Some(registry), Some(out)) = (unsafe { handle.as_ref() }, unsafe { out.as_mut() }) else {
        return false;
    };
    match registry.bodies().get(index) {
        Some(body) => {
            *out = body.pose();
            true
        }
        None => false,
    }
}

/// # Safety
/// `handle` must be null or a live registry.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn OrbitRegistry_GetOrbitPathLen(
    handle: *const OrbitRegistry,
    index: usize,
) -> usize {
    unsafe { handle.as_ref() }
        .and_then(|r| r.orbit_paths().get(index))
        .map_or(0, |p| p.len())
}

/// Points of a body's orbit guide, valid for the registry's lifetime.
///
/// This is the open sample of [`OrbitRegistry_GetOrbitPathLen`] points; the
/// last point does not repeat the first. Line-strip renderers that want a
/// closed loop should use [`OrbitRegistry_CopyOrbitPath`] with `closed` set.
///
/// # Safety
/// `handle` must be null or a live registry.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn OrbitRegistry_GetOrbitPath(
    handle: *const OrbitRegistry,
    index: usize,
) -> *const DVec3 {
    unsafe { handle.as_ref() }
        .and_then(|r| r.orbit_paths().get(index))
        .map_or(std::ptr::null(), |p| p.points().as_ptr())
}

/// Copies a body's orbit guide into `out`, appending the first point again
/// when `closed` is set.
///
/// Returns the number of points in the requested strip, which may exceed
/// `capacity`; only `min(capacity, returned)` points are written. Pass a null
/// `out` to query the size. Returns 0 for a null handle or unknown index.
///
/// # Safety
/// `handle` must be null or a live registry; `out` must be null or valid for
/// `capacity` writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn OrbitRegistry_CopyOrbitPath(
    handle: *const OrbitRegistry,
    index: usize,
    closed: bool,
    out: *mut DVec3,
    capacity: usize,
) -> usize {
    let Some(path) = unsafe { handle.as_ref() }.and_then(|r| r.orbit_paths().get(index)) else {
        return 0;
    };
    let needed = if closed && !path.is_empty() {
        path.len() + 1
    } else {
        path.len()
    };
    if out.is_null() || capacity == 0 {
        return needed;
    }

    let dest = unsafe { std::slice::from_raw_parts_mut(out, capacity) };
    if closed {
        for (slot, point) in dest.iter_mut().zip(path.closed()) {
            *slot = point;
        }
    } else {
        for (slot, point) in dest.iter_mut().zip(path.points()) {
            *slot = *point;
        }
    }
    needed
}

/// # Safety
/// `handle` must be null or a live registry.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn OrbitRegistry_GetSatelliteCount(handle: *const OrbitRegistry) -> usize {
    unsafe { handle.as_ref() }.map_or(0, |r| r.satellite_count())
}

/// Writes a satellite's pose and illumination direction.
///
/// # Safety
/// `handle` must be null or a live registry; `out_pose` and `out_light` must be null or writable.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn OrbitRegistry_GetSatellitePose(
    handle: *const OrbitRegistry,
    index: usize,
    out_pose: *mut Pose,
    out_light: *mut DVec3,
) -> bool {
    let Some(satellite) = unsafe { handle.as_ref() }.and_then(|r| r.satellites().nth(index)) else {
        return false;
    };
    if let Some(out) = unsafe { out_pose.as_mut() } {
        *out = satellite.pose();
    }
    if let Some(out) = unsafe { out_light.as_mut() } {
        *out = satellite.light_direction();
    }
    true
}

/// Marks a body's renderable as loaded.
///
/// # Safety
/// `handle` must be null or a live registry; `name` must be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn OrbitRegistry_MarkReady(
    handle: *mut OrbitRegistry,
    name: *const c_char,
) -> bool {
    if name.is_null() {
        return false;
    }
    let Some(registry) = (unsafe { handle.as_mut() }) else {
        return false;
    };
    match unsafe { CStr::from_ptr(name) }.to_str() {
        Ok(name) => registry.mark_ready(name),
        Err(_) => false,
    }
}
