//! Logger setup
//!
//! Two presets on top of `env_logger`: a human readable one for development
//! and one JSON object per line for production. `RUST_LOG` wins over the
//! level passed on the command line.

use std::io::Write;

use chrono::{DateTime, Local, Utc};
use env_logger::{Builder, Env};
use log::kv::{self, Key, VisitSource};

use crate::config::logging;

/// Output preset of the logger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogPreset {
    Development,
    Production,
}

impl LogPreset {
    /// Preset named by `value`, falling back to development
    pub fn from_env_value(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => LogPreset::Production,
            _ => LogPreset::Development,
        }
    }
}

/// `2024-05-01 12:00:00: WARN: message`
pub fn format_dev_line(timestamp: &DateTime<Local>, level: &str, message: &str) -> String {
    format!(
        "{}: {}: {}",
        timestamp.format(logging::DEV_TIMESTAMP_FORMAT),
        level,
        message
    )
}

/// One JSON record per line; `fields` never replace the standard keys
pub fn format_prod_line(
    timestamp: &DateTime<Utc>,
    level: log::Level,
    target: &str,
    message: &str,
    fields: serde_json::Map<String, serde_json::Value>,
) -> String {
    let mut record = fields;
    record.insert("timestamp".into(), timestamp.to_rfc3339().into());
    record.insert("level".into(), level.as_str().into());
    record.insert("target".into(), target.into());
    record.insert("message".into(), message.into());
    record.insert("service".into(), logging::SERVICE_NAME.into());
    serde_json::Value::Object(record).to_string()
}

/// Collects the key/value pairs attached to a log record
#[derive(Default)]
struct JsonFields(serde_json::Map<String, serde_json::Value>);

impl<'kvs> VisitSource<'kvs> for JsonFields {
    fn visit_pair(&mut self, key: Key<'kvs>, value: kv::Value<'kvs>) -> Result<(), kv::Error> {
        self.0.insert(key.to_string(), value.to_string().into());
        Ok(())
    }
}

fn record_fields(source: &dyn kv::Source) -> serde_json::Map<String, serde_json::Value> {
    let mut fields = JsonFields::default();
    // a failing visit only loses the extra fields
    let _ = source.visit(&mut fields);
    fields.0
}

/// Logger builder for `preset`, filtering at `level` unless `RUST_LOG` is set
pub fn build_logger(preset: LogPreset, level: &str) -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or(level));
    match preset {
        LogPreset::Development => {
            builder.format(|buf, record| {
                let style = buf.default_level_style(record.level());
                let level = format!("{style}{}{style:#}", record.level());
                writeln!(
                    buf,
                    "{}",
                    format_dev_line(&Local::now(), &level, &record.args().to_string())
                )
            });
        }
        LogPreset::Production => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{}",
                    format_prod_line(
                        &Utc::now(),
                        record.level(),
                        record.target(),
                        &record.args().to_string(),
                        record_fields(record.key_values()),
                    )
                )
            });
        }
    }
    builder
}

/// Install the global logger
pub fn init_logger(preset: LogPreset, level: &str) {
    build_logger(preset, level).init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_preset_from_env_value() {
        assert_eq!(LogPreset::from_env_value("production"), LogPreset::Production);
        assert_eq!(LogPreset::from_env_value(" PROD "), LogPreset::Production);
        assert_eq!(LogPreset::from_env_value("development"), LogPreset::Development);
        assert_eq!(LogPreset::from_env_value(""), LogPreset::Development);
        assert_eq!(LogPreset::from_env_value("staging"), LogPreset::Development);
    }

    #[test]
    fn test_dev_line() {
        let ts = Local.with_ymd_and_hms(2024, 5, 1, 12, 3, 4).unwrap();
        assert_eq!(
            format_dev_line(&ts, "WARN", "careful"),
            "2024-05-01 12:03:04: WARN: careful"
        );
    }

    #[test]
    fn test_prod_line_is_single_json_object() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 3, 4).unwrap();
        let line = format_prod_line(
            &ts,
            log::Level::Error,
            "cfctl::cf::api",
            "boom\nagain",
            serde_json::Map::new(),
        );

        assert!(!line.contains('\n'));
        let record: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(record["timestamp"], "2024-05-01T12:03:04+00:00");
        assert_eq!(record["level"], "ERROR");
        assert_eq!(record["target"], "cfctl::cf::api");
        assert_eq!(record["message"], "boom\nagain");
        assert_eq!(record["service"], "cfctl");
    }

    #[test]
    fn test_prod_line_carries_record_fields() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 3, 4).unwrap();
        let kvs: &[(&str, &str)] = &[("meta1", "meta1"), ("service", "other")];

        let line = format_prod_line(
            &ts,
            log::Level::Info,
            "cfctl::commands",
            "hi",
            record_fields(&kvs),
        );
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["meta1"], "meta1");
        assert_eq!(value["service"], "cfctl");
        assert_eq!(value["message"], "hi");
    }
}
