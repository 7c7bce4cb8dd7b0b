//! Build metadata served by the info endpoint.
//!
//! The payload is assembled once when the endpoint is enabled:
//!
//! ```json
//! {"version":"0.1.0","build_settings":{"package":"my_service","profile":"release"},"region":"eu"}
//! ```

use std::collections::BTreeMap;

use bytes::Bytes;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::InfoError;

/// Version and build settings of a binary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub version: String,
    pub settings: BTreeMap<String, String>,
}

impl BuildInfo {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            settings: BTreeMap::new(),
        }
    }

    /// Add a build setting. Empty values are skipped.
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.settings.insert(key.into(), value);
        }
        self
    }

    /// Build metadata of this crate.
    ///
    /// Services should prefer [`build_info!`](crate::build_info), which
    /// captures the calling crate instead.
    pub fn current() -> Self {
        Self::new(env!("CARGO_PKG_VERSION"))
            .with_setting("package", env!("CARGO_PKG_NAME"))
            .with_setting("commit", env!("BUILD_VERSION"))
            .with_setting("profile", env!("BUILD_PROFILE"))
            .with_setting("target", env!("BUILD_TARGET"))
            .with_setting("opt_level", env!("BUILD_OPT_LEVEL"))
    }
}

/// Capture [`BuildInfo`] of the crate invoking the macro.
///
/// Reads `CARGO_PKG_VERSION` and `CARGO_PKG_NAME`, plus `BUILD_VERSION`,
/// `BUILD_PROFILE`, `BUILD_TARGET` and `BUILD_OPT_LEVEL` when the caller's
/// build script sets them.
#[macro_export]
macro_rules! build_info {
    () => {
        $crate::info::BuildInfo::new(env!("CARGO_PKG_VERSION"))
            .with_setting("package", env!("CARGO_PKG_NAME"))
            .with_setting("commit", option_env!("BUILD_VERSION").unwrap_or_default())
            .with_setting("profile", option_env!("BUILD_PROFILE").unwrap_or_default())
            .with_setting("target", option_env!("BUILD_TARGET").unwrap_or_default())
            .with_setting("opt_level", option_env!("BUILD_OPT_LEVEL").unwrap_or_default())
    };
}

/// Serialize the info payload.
///
/// `extra` must serialize to a JSON object (or `null` for none). Its keys are
/// kept, except `version` and `build_settings`, which always come from `build`.
pub fn info_payload<T>(build: &BuildInfo, extra: &T) -> Result<Bytes, InfoError>
where
    T: Serialize + ?Sized,
{
    let mut fields = match serde_json::to_value(extra)? {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => return Err(InfoError::NotAnObject(json_kind(&other))),
    };

    fields.insert("version".into(), Value::String(build.version.clone()));
    fields.insert(
        "build_settings".into(),
        Value::Object(
            build
                .settings
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        ),
    );

    Ok(Bytes::from(serde_json::to_vec(&Value::Object(fields))?))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
