//! Plain-text rendering of poll states and request history.

use std::fmt::Write;

use url::Url;

use tryon_models::{format_processing_time, resolve_result_url, TryOnRequestDetail, TryOnStatus};

use crate::poller::PollState;

/// Render the result panel for the current poll state.
pub fn render_state(state: &PollState, static_base: &Url) -> String {
    let mut out = String::new();

    match state {
        PollState::Loading => {
            out.push_str("Loading...");
            return out;
        }
        PollState::Errored(message) => {
            let _ = write!(out, "Error: {}", message);
            return out;
        }
        PollState::Processing(detail) | PollState::Completed(detail) | PollState::Failed(detail) => {
            let _ = writeln!(out, "Try-On Result #{}", detail.id);
            let _ = write!(out, "Status: {}", detail.status.as_str().to_uppercase());
            render_body(&mut out, detail, static_base);
        }
    }

    out
}

fn render_body(out: &mut String, detail: &TryOnRequestDetail, static_base: &Url) {
    match &detail.status {
        TryOnStatus::Pending => {
            out.push_str("\nWaiting for the service to pick up your request...");
        }
        TryOnStatus::Processing => {
            out.push_str("\nProcessing your try-on request...");
        }
        TryOnStatus::Completed => match detail.result_image_path() {
            Some(path) => {
                let _ = write!(out, "\nResult image: {}", result_link(static_base, path));
                // A zero time means the service did not measure it
                if let Some(seconds) = detail.processing_time().filter(|s| *s > 0.0) {
                    let _ = write!(out, "\nProcessing time: {}", format_processing_time(seconds));
                }
            }
            None => out.push_str("\nResult image not available"),
        },
        TryOnStatus::Failed => {
            out.push_str("\nTry-on failed");
            if let Some(message) = detail.error_message() {
                let _ = write!(out, "\n{}", message);
            }
        }
        TryOnStatus::Unknown(raw) => {
            let _ = write!(out, "\nWaiting for the service (status: {})", raw);
        }
    }
}

/// Resolved result URL, or the raw path if it cannot be resolved.
pub fn result_link(static_base: &Url, path: &str) -> String {
    resolve_result_url(static_base, path)
        .map(String::from)
        .unwrap_or_else(|_| path.to_string())
}

/// One line per request, newest first as returned by the service.
pub fn render_history(requests: &[TryOnRequestDetail], static_base: &Url) -> String {
    if requests.is_empty() {
        return "No try-on requests yet".to_string();
    }

    let mut out = String::new();
    for detail in requests {
        let _ = write!(
            out,
            "#{:<6} {:<11} {:<14} {}",
            detail.id,
            detail.status.as_str(),
            detail.pose,
            detail.created_at.format("%Y-%m-%d %H:%M:%S")
        );
        if let Some(path) = detail.result_image_path() {
            let _ = write!(out, "  {}", result_link(static_base, path));
        }
        if let Some(message) = detail.error_message() {
            let _ = write!(out, "  {}", message);
        }
        out.push('\n');
    }
    out.truncate(out.trim_end().len());
    out
}
