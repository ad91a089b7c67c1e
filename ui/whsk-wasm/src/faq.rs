use whsk_core::content::{FAQ, FAQ_HEADING, FaqEntry};

use crate::dom::{self, Elements, escape_html};

pub fn entries_html(entries: &[FaqEntry]) -> String {
    entries
        .iter()
        .map(|e| {
            format!(
                r#"<div class="faq-item"><h3>{}</h3><p>{}</p></div>"#,
                escape_html(e.question),
                escape_html(e.answer)
            )
        })
        .collect()
}

pub fn render(els: &Elements) {
    dom::set_text(&els.faq_heading, FAQ_HEADING);
    dom::set_inner_html(&els.faq_list, &entries_html(FAQ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_every_entry_in_order() {
        let html = entries_html(FAQ);
        assert_eq!(html.matches("faq-item").count(), FAQ.len());
        let first = html.find("What is WHSK?");
        let second = html.find("How do I wrap HSK?");
        assert!(first.is_some() && first < second);
    }
}
