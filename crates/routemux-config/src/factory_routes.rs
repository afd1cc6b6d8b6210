//! Factory routes bundled with the library.
//!
//! Common channel layouts that are always available without route files.

use std::path::Path;

use crate::{ConfigError, RouteFile};

/// Array of factory route names for external access.
pub static FACTORY_ROUTE_NAMES: &[&str] = &[
    "stereo-split",
    "stereo-join",
    "mono-to-stereo",
    "downmix",
    "quad-split",
    "stereo-mix",
];

static FACTORY_ROUTES_TOML: &[(&str, &str)] = &[
    ("stereo-split", STEREO_SPLIT),
    ("stereo-join", STEREO_JOIN),
    ("mono-to-stereo", MONO_TO_STEREO),
    ("downmix", DOWNMIX),
    ("quad-split", QUAD_SPLIT),
    ("stereo-mix", STEREO_MIX),
];

const STEREO_SPLIT: &str = r#"
name = "stereo-split"
description = "Left to pipeline 1, right to pipeline 2"
role = "demux"
format = "s16le"
channels = 2

[[streams]]
pipeline_id = 1
masks = [0b01]

[[streams]]
pipeline_id = 2
masks = [0b10]
"#;

const STEREO_JOIN: &str = r#"
name = "stereo-join"
description = "Mono pipelines 1 and 2 into the left and right channels"
role = "mux"
format = "s16le"
channels = 2

[[streams]]
pipeline_id = 1
channels = 1
masks = [0b1, 0b0]

[[streams]]
pipeline_id = 2
channels = 1
masks = [0b0, 0b1]
"#;

const MONO_TO_STEREO: &str = r#"
name = "mono-to-stereo"
description = "Duplicate a mono stream into both channels of pipeline 1"
role = "demux"
format = "s16le"
channels = 1

[[streams]]
pipeline_id = 1
masks = [0b1, 0b1]
"#;

const DOWNMIX: &str = r#"
name = "downmix"
description = "Sum left and right into mono pipeline 1, saturating"
role = "demux"
format = "s32le"
channels = 2

[[streams]]
pipeline_id = 1
masks = [0b11]
"#;

const QUAD_SPLIT: &str = r#"
name = "quad-split"
description = "Front pair to pipeline 1, rear pair to pipeline 2"
role = "demux"
format = "s24le"
channels = 4

[[streams]]
pipeline_id = 1
masks = [0b0001, 0b0010]

[[streams]]
pipeline_id = 2
masks = [0b0100, 0b1000]
"#;

const STEREO_MIX: &str = r#"
name = "stereo-mix"
description = "Mix stereo pipelines 1 and 2 channel for channel"
role = "mux"
format = "s16le"
channels = 2

[[streams]]
pipeline_id = 1
masks = [0b01, 0b10]

[[streams]]
pipeline_id = 2
masks = [0b01, 0b10]
"#;

/// Get all factory routes.
///
/// Entries that fail to parse are skipped; the tests keep that set empty.
pub fn factory_routes() -> Vec<RouteFile> {
    FACTORY_ROUTES_TOML
        .iter()
        .filter_map(|(_, toml)| RouteFile::from_toml(toml).ok())
        .collect()
}

/// Get a factory route by name (case-insensitive).
pub fn get_factory_route(name: &str) -> Option<RouteFile> {
    FACTORY_ROUTES_TOML
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .and_then(|(_, toml)| RouteFile::from_toml(toml).ok())
}

/// Get the names of all factory routes.
pub fn factory_route_names() -> &'static [&'static str] {
    FACTORY_ROUTE_NAMES
}

/// Check whether a name is a factory route.
pub fn is_factory_route(name: &str) -> bool {
    FACTORY_ROUTE_NAMES
        .iter()
        .any(|n| n.eq_ignore_ascii_case(name))
}

/// Resolve a route by factory name, then as a path to a TOML file.
///
/// File routes are validated before they are returned.
pub fn find_route(name: &str) -> Result<RouteFile, ConfigError> {
    if let Some(route) = get_factory_route(name) {
        return Ok(route);
    }

    let path = Path::new(name);
    if !path.is_file() {
        return Err(ConfigError::RouteNotFound(name.to_string()));
    }
    let route = RouteFile::load(path)?;
    route.validate()?;
    Ok(route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    #[test]
    fn all_factory_routes_parse_and_validate() {
        for (name, toml) in FACTORY_ROUTES_TOML {
            let route = RouteFile::from_toml(toml)
                .unwrap_or_else(|e| panic!("factory route '{name}' failed to parse: {e}"));
            assert_eq!(route.name, *name);
            route
                .validate()
                .unwrap_or_else(|e| panic!("factory route '{name}' is invalid: {e}"));
        }
        assert_eq!(factory_routes().len(), FACTORY_ROUTE_NAMES.len());
    }

    #[test]
    fn names_match_table() {
        let table: Vec<&str> = FACTORY_ROUTES_TOML.iter().map(|(n, _)| *n).collect();
        assert_eq!(table, FACTORY_ROUTE_NAMES);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let route = get_factory_route("Stereo-Join").unwrap();
        assert_eq!(route.role, Role::Mux);
        assert!(is_factory_route("DOWNMIX"));
        assert!(!is_factory_route("surround"));
        assert!(get_factory_route("surround").is_none());
    }

    #[test]
    fn find_route_reports_missing_names() {
        assert_eq!(find_route("downmix").unwrap().name, "downmix");
        assert!(matches!(
            find_route("surround"),
            Err(ConfigError::RouteNotFound(name)) if name == "surround"
        ));
    }
}
