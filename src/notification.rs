const APP_NAME: &str = "SlimShot";

pub fn send(body: impl Into<String>) {
    let body = body.into();
    if let Err(err) = notify_rust::Notification::new()
        .appname(APP_NAME)
        .summary(APP_NAME)
        .body(&body)
        .show()
    {
        tracing::warn!("system notification failed: {err}");
    }
}

/// Reports a capture that produced no image.
pub fn capture_failed(err: &crate::capture::CaptureError) {
    tracing::error!(?err, "screen capture failed");
    send(format!("Screen capture failed: {err}"));
}

/// Reports a capture that arrived while the editor could not take it.
pub fn capture_discarded(err: &crate::editor::EditError) {
    tracing::warn!(%err, "captured image discarded");
    send(capture_discarded_message(err));
}

fn capture_discarded_message(err: &crate::editor::EditError) -> String {
    format!("Screenshot discarded: {err}. Capture again once the editor is idle.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::EditError;

    #[test]
    fn discarded_capture_message_names_the_reason() {
        assert_eq!(
            capture_discarded_message(&EditError::CropInProgress),
            "Screenshot discarded: a crop gesture is in progress. \
             Capture again once the editor is idle."
        );
    }
}
