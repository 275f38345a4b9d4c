// ─── Version Comparison ───
// Dotted game-version comparison and the Forge build-system generation check
// that decides how a loader's version descriptor is resolved.

use crate::error::{CoreError, CoreResult};

/// Last ForgeGradle 2 build. Anything above ships a `version.json` sidecar.
const MAX_FG2_BUILD: [u64; 4] = [14, 23, 5, 2847];

fn parse_segments(version: &str) -> CoreResult<Vec<u64>> {
    version
        .split('.')
        .map(|seg| {
            seg.parse::<u64>()
                .map_err(|_| CoreError::MalformedVersion(version.to_string()))
        })
        .collect()
}

/// Returns true if `actual` is greater than or equal to `desired`.
///
/// Both strings are dotted integer versions; `actual` is padded with trailing
/// zeros when it has fewer segments than `desired` ("1.13" satisfies a
/// desired "1.13.0"). Non-numeric segments are rejected outright.
pub fn version_at_least(desired: &str, actual: &str) -> CoreResult<bool> {
    let des = parse_segments(desired)?;
    let mut act = parse_segments(actual)?;

    while act.len() < des.len() {
        act.push(0);
    }

    for (d, a) in des.iter().zip(act.iter()) {
        if a > d {
            return Ok(true);
        } else if a < d {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Whether a Forge release was built with ForgeGradle 3 or later.
///
/// From Minecraft 1.13 on, every Forge build is FG3. Before that, the build
/// number after the `-` in the Forge version (e.g. `14.23.5.2860` in
/// `1.12.2-14.23.5.2860`) is compared element-wise against the last FG2
/// build. FG3-era loaders ship their version descriptor as a sidecar
/// manifest; older ones bury it inside the installer JAR.
pub fn is_forge_gradle3(minecraft_version: &str, forge_version: &str) -> CoreResult<bool> {
    if version_at_least("1.13", minecraft_version)? {
        return Ok(true);
    }

    let build = forge_version
        .split('-')
        .nth(1)
        .ok_or_else(|| CoreError::MalformedVersion(forge_version.to_string()))?;
    let segments = parse_segments(build)
        .map_err(|_| CoreError::MalformedVersion(forge_version.to_string()))?;

    for (i, max) in MAX_FG2_BUILD.iter().enumerate() {
        let actual = *segments
            .get(i)
            .ok_or_else(|| CoreError::MalformedVersion(forge_version.to_string()))?;
        if actual > *max {
            return Ok(true);
        } else if actual < *max {
            return Ok(false);
        }
    }

    Ok(false)
}
