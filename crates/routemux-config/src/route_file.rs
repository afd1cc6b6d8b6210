//! Route file format and operations.

use std::path::Path;

use routemux_core::{FrameFormat, MAX_CHANNELS, RouteConfig, RouteError, StreamRoute, wire};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which way a route file moves audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Many pipelines into one stream.
    Mux,
    /// One stream into many pipelines.
    Demux,
}

impl Role {
    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Role::Mux => "mux",
            Role::Demux => "demux",
        }
    }
}

/// One `[[streams]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamEntry {
    /// Pipeline owning the stream.
    pub pipeline_id: u32,

    /// Channels carried by the stream, when it differs from the mask count.
    ///
    /// Mux routes index masks by output channel, so a mono source feeding a
    /// stereo sink has one channel and two masks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<u8>,

    /// One routing mask per channel (demux) or per output channel (mux).
    pub masks: Vec<u8>,
}

impl StreamEntry {
    /// Entry with one mask per channel.
    pub fn new(pipeline_id: u32, masks: impl Into<Vec<u8>>) -> Self {
        Self {
            pipeline_id,
            channels: None,
            masks: masks.into(),
        }
    }

    /// Sets an explicit channel count.
    pub fn with_channels(mut self, channels: u8) -> Self {
        self.channels = Some(channels);
        self
    }

    /// Core route for this entry.
    ///
    /// A route holds at most [`MAX_CHANNELS`] masks; more is an error rather
    /// than a silent truncation.
    fn to_route(&self) -> Result<StreamRoute, ConfigError> {
        if self.masks.len() > MAX_CHANNELS {
            return Err(RouteError::TooManyChannels {
                pipeline_id: self.pipeline_id,
                channels: self.masks.len(),
                max: MAX_CHANNELS,
            }
            .into());
        }
        Ok(match self.channels {
            Some(channels) => StreamRoute::with_channels(self.pipeline_id, channels, &self.masks),
            None => StreamRoute::new(self.pipeline_id, &self.masks),
        })
    }

    fn from_route(route: &StreamRoute, role: Role, primary_channels: u16) -> Self {
        match role {
            Role::Demux => Self::new(route.pipeline_id, route.masks()),
            Role::Mux => {
                let outputs = usize::from(primary_channels).min(route.mask.len());
                let entry = Self::new(route.pipeline_id, &route.mask[..outputs]);
                if outputs == usize::from(route.channels) {
                    entry
                } else {
                    entry.with_channels(route.channels)
                }
            }
        }
    }
}

/// Routing description stored as TOML.
///
/// # TOML Format
///
/// ```toml
/// name = "stereo-split"
/// description = "Left and right to separate pipelines"
/// role = "demux"
/// format = "s16le"
/// channels = 2
///
/// [[streams]]
/// pipeline_id = 1
/// masks = [1]
///
/// [[streams]]
/// pipeline_id = 2
/// masks = [2]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteFile {
    /// Name of the route.
    pub name: String,

    /// Optional description of the route.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Mux or demux.
    pub role: Role,

    /// Frame format name (defaults to `s16le`).
    #[serde(default = "default_format")]
    pub format: String,

    /// Channels of the primary stream.
    pub channels: u16,

    /// Routed streams.
    #[serde(default)]
    pub streams: Vec<StreamEntry>,
}

fn default_format() -> String {
    FrameFormat::S16Le.name().to_string()
}

impl RouteFile {
    /// Create an empty route.
    pub fn new(name: impl Into<String>, role: Role, channels: u16) -> Self {
        Self {
            name: name.into(),
            description: None,
            role,
            format: default_format(),
            channels,
            streams: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the frame format.
    pub fn with_format(mut self, format: FrameFormat) -> Self {
        self.format = format_name(format);
        self
    }

    /// Add a stream.
    pub fn with_stream(mut self, stream: StreamEntry) -> Self {
        self.streams.push(stream);
        self
    }

    /// Load a route from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a route from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the route to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the route to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Parsed frame format.
    ///
    /// Accepts the names of [`FrameFormat::from_name`] and raw numeric tags.
    pub fn frame_format(&self) -> Result<FrameFormat, ConfigError> {
        FrameFormat::from_name(&self.format)
            .or_else(|| self.format.parse().ok().map(FrameFormat::from_raw))
            .ok_or_else(|| ConfigError::UnknownFormat(self.format.clone()))
    }

    /// Build the validated routing configuration.
    pub fn to_config(&self) -> Result<RouteConfig, ConfigError> {
        let routes = self
            .streams
            .iter()
            .map(StreamEntry::to_route)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RouteConfig::new(self.frame_format()?, self.channels, routes)?)
    }

    /// Check the route against the configuration model.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.to_config().map(|_| ())
    }

    /// Describe an existing configuration.
    pub fn from_config(name: impl Into<String>, role: Role, config: &RouteConfig) -> Self {
        Self {
            name: name.into(),
            description: None,
            role,
            format: format_name(config.frame_format()),
            channels: config.channels(),
            streams: config
                .streams()
                .iter()
                .map(|route| StreamEntry::from_route(route, role, config.channels()))
                .collect(),
        }
    }

    /// Serialize to the control blob.
    pub fn to_blob(&self) -> Result<Vec<u8>, ConfigError> {
        Ok(wire::encode(&self.to_config()?))
    }

    /// Describe a control blob.
    pub fn from_blob(name: impl Into<String>, role: Role, blob: &[u8]) -> Result<Self, ConfigError> {
        let config = wire::decode(blob)?;
        Ok(Self::from_config(name, role, &config))
    }
}

fn format_name(format: FrameFormat) -> String {
    match format {
        FrameFormat::Unknown(raw) => raw.to_string(),
        known => known.name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_demux_route() {
        let toml = r#"
name = "split"
role = "demux"
format = "s24le"
channels = 2

[[streams]]
pipeline_id = 1
masks = [1]

[[streams]]
pipeline_id = 2
masks = [0b10, 0b11]
"#;
        let route = RouteFile::from_toml(toml).unwrap();
        assert_eq!(route.role, Role::Demux);
        assert!(route.description.is_none());

        let config = route.to_config().unwrap();
        assert_eq!(config.frame_format(), FrameFormat::S24_4Le);
        assert_eq!(config.channels(), 2);
        assert_eq!(config.streams()[1].masks(), &[0b10, 0b11]);
        assert_eq!(config.streams()[1].channels, 2);
    }

    #[test]
    fn minimal_route_defaults_to_s16() {
        let route = RouteFile::from_toml("name = \"m\"\nrole = \"mux\"\nchannels = 1\n").unwrap();
        assert_eq!(route.format, "s16le");
        assert!(route.streams.is_empty());
        let config = route.to_config().unwrap();
        assert_eq!(config.frame_format(), FrameFormat::S16Le);
        assert_eq!(config.channels(), 1);
        assert_eq!(config.num_streams(), 0);
    }

    #[test]
    fn mux_channels_override() {
        let route = RouteFile::new("join", Role::Mux, 2)
            .with_stream(StreamEntry::new(1, [1, 0]).with_channels(1))
            .with_stream(StreamEntry::new(2, [0, 1]).with_channels(1));
        let config = route.to_config().unwrap();
        assert_eq!(config.streams()[0].channels, 1);
        assert_eq!(config.streams()[1].mask_for(1), 1);

        let back = RouteFile::from_config("join", Role::Mux, &config);
        assert_eq!(back.streams, route.streams);
    }

    #[test]
    fn unknown_format_name() {
        let mut route = RouteFile::new("x", Role::Demux, 2);
        route.format = "u8".to_string();
        assert!(matches!(
            route.to_config(),
            Err(ConfigError::UnknownFormat(ref name)) if name == "u8"
        ));

        route.format = "42".to_string();
        assert_eq!(route.frame_format().unwrap(), FrameFormat::Unknown(42));
    }

    #[test]
    fn invalid_routes_are_rejected() {
        let route = RouteFile::new("dup", Role::Demux, 2)
            .with_stream(StreamEntry::new(1, [1]))
            .with_stream(StreamEntry::new(1, [2]));
        assert!(matches!(route.validate(), Err(ConfigError::Route(_))));
    }

    #[test]
    fn masks_past_channel_limit_are_rejected() {
        let route = RouteFile::new("wide", Role::Mux, 2)
            .with_stream(StreamEntry::new(3, [1; MAX_CHANNELS + 1]).with_channels(1));
        assert!(matches!(
            route.to_config(),
            Err(ConfigError::Route(RouteError::TooManyChannels {
                pipeline_id: 3,
                channels: 9,
                max: MAX_CHANNELS,
            }))
        ));
        assert!(route.to_blob().is_err());
    }

    #[test]
    fn bad_role_fails_to_parse() {
        let err = RouteFile::from_toml("name = \"x\"\nrole = \"split\"\nchannels = 2\n").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn blob_round_trip() {
        let route = RouteFile::new("split", Role::Demux, 2)
            .with_format(FrameFormat::S32Le)
            .with_stream(StreamEntry::new(4, [1, 2]))
            .with_stream(StreamEntry::new(9, [3]));
        let blob = route.to_blob().unwrap();
        let back = RouteFile::from_blob("split", Role::Demux, &blob).unwrap();
        assert_eq!(back, route);
    }
}
