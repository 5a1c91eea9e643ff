//! Loader configuration

use crate::document::POINT_LIGHTS_MAX;

/// Options shared by the parser and serializer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapConfig {
    /// Point lights a document may hold; further `pointlight` records are rejected
    pub point_lights_max: usize,
    /// Strip one trailing `\r` from every line (files saved with CRLF endings)
    pub accept_crlf: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            point_lights_max: POINT_LIGHTS_MAX,
            accept_crlf: true,
        }
    }
}

impl MapConfig {
    /// Set the point light capacity
    pub fn with_point_lights_max(mut self, max: usize) -> Self {
        self.point_lights_max = max;
        self
    }

    /// Enable or disable CRLF tolerance
    pub fn with_accept_crlf(mut self, accept: bool) -> Self {
        self.accept_crlf = accept;
        self
    }
}
