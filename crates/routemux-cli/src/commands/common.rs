//! Shared CLI helpers used across multiple commands.

use clap::ValueEnum;
use routemux_component::ComponentType;
use routemux_config::{ConfigError, Role, RouteFile, find_route};

/// Component role as a command-line value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    /// Combine several streams into one
    Mux,
    /// Split one stream into several
    Demux,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Mux => Role::Mux,
            RoleArg::Demux => Role::Demux,
        }
    }
}

/// Component type servicing a route role.
pub fn component_type(role: Role) -> ComponentType {
    match role {
        Role::Mux => ComponentType::Mux,
        Role::Demux => ComponentType::Demux,
    }
}

/// Route role of a component type.
pub fn role_of(kind: ComponentType) -> Role {
    match kind {
        ComponentType::Mux => Role::Mux,
        ComponentType::Demux => Role::Demux,
    }
}

/// Load a route by name or path.
///
/// Factory routes are tried first, then the argument is read as a TOML file.
pub fn load_route(name: &str) -> anyhow::Result<RouteFile> {
    match find_route(name) {
        Err(ConfigError::RouteNotFound(_)) => anyhow::bail!(
            "Route '{}' not found. Use 'routemux routes list' to see factory routes.",
            name
        ),
        other => Ok(other?),
    }
}

/// Render a byte count for humans.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Render a mask as the channel bits it selects.
pub fn format_mask(mask: u8) -> String {
    if mask == 0 {
        return "-".to_string();
    }
    let mut out = String::new();
    for bit in 0..8 {
        if mask & (1 << bit) != 0 {
            if !out.is_empty() {
                out.push('+');
            }
            out.push_str(&bit.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_factory_route_by_name() {
        let route = load_route("stereo-split").unwrap();
        assert_eq!(route.role, Role::Demux);
    }

    #[test]
    fn load_missing_route_fails() {
        let err = load_route("/nonexistent/route.toml").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn mask_rendering() {
        assert_eq!(format_mask(0), "-");
        assert_eq!(format_mask(0b01), "0");
        assert_eq!(format_mask(0b101), "0+2");
    }

    #[test]
    fn role_mapping_round_trips() {
        for role in [Role::Mux, Role::Demux] {
            assert_eq!(role_of(component_type(role)), role);
        }
        assert_eq!(Role::from(RoleArg::Demux), Role::Demux);
    }
}
