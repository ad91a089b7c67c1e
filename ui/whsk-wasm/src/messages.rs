//! Operation overlay: a count badge that expands into the record list.

use whsk_core::AppConfig;
use whsk_types::{OperationRecord, OperationStatus};

use crate::dom::{self, Elements, escape_html};
use crate::state;

const CHECK_PATH: &str = "M5 13l4 4L19 7";
const CROSS_PATH: &str = "M6 18L18 6M6 6l12 12";
const EXTERNAL_PATH: &str = "M10 6H6a2 2 0 00-2 2v10a2 2 0 002 2h10a2 2 0 002-2v-4M14 4h6m0 0v6m0-6L10 14";

fn svg(path: &str) -> String {
    format!(
        r#"<svg fill="none" stroke="currentColor" viewBox="0 0 24 24"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="{path}"/></svg>"#
    )
}

fn status_icon(status: OperationStatus) -> String {
    match status {
        OperationStatus::Pending => r#"<div class="status-icon pending spinner"></div>"#.to_owned(),
        OperationStatus::Success => format!(r#"<div class="status-icon success">{}</div>"#, svg(CHECK_PATH)),
        OperationStatus::Error => format!(r#"<div class="status-icon error">{}</div>"#, svg(CROSS_PATH)),
    }
}

/// Markup for one record. Terminal records carry a close control whose
/// `data-dismiss` attribute holds the record id.
pub fn record_html(record: &OperationRecord, config: &AppConfig) -> String {
    let id = escape_html(&record.id);
    let link = record
        .tx_hash
        .as_deref()
        .map(|hash| {
            format!(
                r#"<a class="explorer-link" href="{}" target="_blank" rel="noopener noreferrer">View on Explorer {}</a>"#,
                escape_html(&config.explorer_link(hash)),
                svg(EXTERNAL_PATH)
            )
        })
        .unwrap_or_default();
    let close = if record.status.is_terminal() {
        format!(r#"<button class="dismiss-btn" data-dismiss="{id}" title="Dismiss">&times;</button>"#)
    } else {
        String::new()
    };
    format!(
        r#"<div class="message {status}" data-id="{id}">{icon}<div class="message-body"><h3>{title}</h3><p>{description}</p>{link}</div>{close}</div>"#,
        status = record.status.as_str(),
        icon = status_icon(record.status),
        title = escape_html(&record.title),
        description = escape_html(&record.description),
    )
}

pub fn render(els: &Elements) {
    state::with(|s| {
        dom::set_text(&els.message_count, &s.log.len().to_string());
        dom::set_hidden(&els.message_list, !s.log.is_expanded());
        let html: String = s.log.records().iter().map(|r| record_html(r, &s.config)).collect();
        dom::set_inner_html(&els.message_list, &html);
    });
}
