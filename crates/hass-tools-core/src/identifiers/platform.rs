//! Helper platform recognition for composite ids (`input_boolean.my_switch`)

use serde::{Deserialize, Serialize};

/// A platform that provides configuration-defined helpers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelperPlatform {
    InputBoolean,
    InputNumber,
    InputText,
    InputSelect,
    InputDatetime,
    InputButton,
    Counter,
    Timer,
    Schedule,
    Group,
    Template,
    Threshold,
    Derivative,
    Integration,
    UtilityMeter,
    MinMax,
}

impl HelperPlatform {
    /// Every recognized platform, in match order
    pub const ALL: [HelperPlatform; 16] = [
        HelperPlatform::InputBoolean,
        HelperPlatform::InputNumber,
        HelperPlatform::InputText,
        HelperPlatform::InputSelect,
        HelperPlatform::InputDatetime,
        HelperPlatform::InputButton,
        HelperPlatform::Counter,
        HelperPlatform::Timer,
        HelperPlatform::Schedule,
        HelperPlatform::Group,
        HelperPlatform::Template,
        HelperPlatform::Threshold,
        HelperPlatform::Derivative,
        HelperPlatform::Integration,
        HelperPlatform::UtilityMeter,
        HelperPlatform::MinMax,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HelperPlatform::InputBoolean => "input_boolean",
            HelperPlatform::InputNumber => "input_number",
            HelperPlatform::InputText => "input_text",
            HelperPlatform::InputSelect => "input_select",
            HelperPlatform::InputDatetime => "input_datetime",
            HelperPlatform::InputButton => "input_button",
            HelperPlatform::Counter => "counter",
            HelperPlatform::Timer => "timer",
            HelperPlatform::Schedule => "schedule",
            HelperPlatform::Group => "group",
            HelperPlatform::Template => "template",
            HelperPlatform::Threshold => "threshold",
            HelperPlatform::Derivative => "derivative",
            HelperPlatform::Integration => "integration",
            HelperPlatform::UtilityMeter => "utility_meter",
            HelperPlatform::MinMax => "min_max",
        }
    }

    /// Split a composite id into its platform and local id
    ///
    /// Scans the recognized platforms in order and takes the first whose
    /// `<token>.` prefixes `composite_id`. Ids from other domains
    /// (`light.kitchen`) return `None`.
    pub fn split(composite_id: &str) -> Option<(HelperPlatform, &str)> {
        HelperPlatform::ALL.iter().find_map(|platform| {
            composite_id
                .strip_prefix(platform.as_str())
                .and_then(|rest| rest.strip_prefix('.'))
                .map(|local_id| (*platform, local_id))
        })
    }
}

impl std::fmt::Display for HelperPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a composite helper id into `(platform, local_id)`
///
/// Returns `("", "")` when no recognized platform prefixes the id; callers
/// report that as an argument error.
pub fn parse_helper_id(composite_id: &str) -> (&'static str, &str) {
    match HelperPlatform::split(composite_id) {
        Some((platform, local_id)) => (platform.as_str(), local_id),
        None => ("", ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recognized_platform() {
        assert_eq!(parse_helper_id("input_boolean.my_switch"), ("input_boolean", "my_switch"));
        assert_eq!(
            parse_helper_id("utility_meter.daily_energy"),
            ("utility_meter", "daily_energy")
        );
    }

    #[test]
    fn test_parse_unrecognized_platform() {
        assert_eq!(parse_helper_id("light.kitchen"), ("", ""));
        assert_eq!(parse_helper_id(""), ("", ""));
        assert_eq!(parse_helper_id("counter"), ("", ""));
    }

    #[test]
    fn test_prefix_must_end_at_dot() {
        // "input_booleanx" is not "input_boolean" followed by a dot
        assert_eq!(parse_helper_id("input_booleanx.y"), ("", ""));
        assert_eq!(parse_helper_id("timers.x"), ("", ""));
    }

    #[test]
    fn test_local_id_keeps_remaining_dots() {
        assert_eq!(parse_helper_id("template.sensor.outdoor"), ("template", "sensor.outdoor"));
    }

    #[test]
    fn test_split_is_typed() {
        assert_eq!(
            HelperPlatform::split("min_max.avg_temp"),
            Some((HelperPlatform::MinMax, "avg_temp"))
        );
        assert_eq!(HelperPlatform::split("sensor.temp"), None);
    }
}
