use serde::Deserialize;

use super::CaptureError;

#[derive(Deserialize)]
struct MonitorStatus {
    focused: bool,
    name: Option<String>,
    width: Option<i32>,
    height: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct FocusedMonitor {
    pub(super) name: String,
    pub(super) width: Option<u32>,
    pub(super) height: Option<u32>,
}

fn normalize_monitor_dimension(value: Option<i32>) -> Option<u32> {
    value
        .and_then(|size| u32::try_from(size).ok())
        .filter(|size| *size > 0)
}

pub(super) fn parse_focused_monitor(monitors_json: &str) -> Result<FocusedMonitor, CaptureError> {
    let monitors: Vec<MonitorStatus> = serde_json::from_str(monitors_json).map_err(|err| {
        CaptureError::InvalidMonitorMetadata {
            message: err.to_string(),
        }
    })?;
    let monitor = monitors
        .into_iter()
        .find(|monitor| monitor.focused)
        .ok_or(CaptureError::NoFocusedMonitor)?;
    let name = monitor
        .name
        .filter(|item| !item.is_empty())
        .ok_or(CaptureError::NoFocusedMonitor)?;

    Ok(FocusedMonitor {
        name,
        width: normalize_monitor_dimension(monitor.width),
        height: normalize_monitor_dimension(monitor.height),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_focused_monitor_prefers_focused_monitor() {
        let json = r#"[{"name":"DP-1","focused":false},{"name":"HDMI-A-1","focused":true,"x":100,"y":200,"width":2560,"height":1440}]"#;
        assert_eq!(
            parse_focused_monitor(json).expect("focused monitor should parse"),
            FocusedMonitor {
                name: "HDMI-A-1".to_string(),
                width: Some(2560),
                height: Some(1440),
            }
        );
    }

    #[test]
    fn parse_focused_monitor_errors_without_focused() {
        let json = r#"[{"name":"DP-1","focused":false}]"#;
        assert!(matches!(
            parse_focused_monitor(json).expect_err("must error without focused monitor"),
            CaptureError::NoFocusedMonitor
        ));
    }

    #[test]
    fn parse_focused_monitor_rejects_malformed_json_and_empty_names() {
        assert!(matches!(
            parse_focused_monitor("not json"),
            Err(CaptureError::InvalidMonitorMetadata { .. })
        ));
        assert!(matches!(
            parse_focused_monitor(r#"[{"name":"","focused":true,"width":-4}]"#),
            Err(CaptureError::NoFocusedMonitor)
        ));
    }
}
