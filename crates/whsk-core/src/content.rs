//! Static page copy.

pub const APP_TITLE: &str = "Wrapped HSK";
pub const FAQ_HEADING: &str = "FAQ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaqEntry {
    pub question: &'static str,
    pub answer: &'static str,
}

pub const FAQ: &[FaqEntry] = &[
    FaqEntry {
        question: "What is WHSK?",
        answer: "WHSK is the wrapped version of the HSK token. It is an ERC-20 token backed 1:1 by HSK held in the WHSK contract.",
    },
    FaqEntry {
        question: "How do I wrap HSK?",
        answer: "Connect your wallet, make sure you are on the right network, then enter the amount of HSK you want to wrap.",
    },
];
