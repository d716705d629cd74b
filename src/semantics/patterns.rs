use super::{Purpose, SectionPurpose};
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

/// Ordered first-match table of (label, pattern) rules.
///
/// Signals are tried in the order given; for each signal the rules are tried in
/// table order, and the first rule that matches any part of the signal wins.
#[derive(Debug)]
pub struct PatternTable<L> {
    rules: Vec<(L, Regex)>,
}

impl<L: Copy> PatternTable<L> {
    pub fn new(rules: &[(L, &str)]) -> Self {
        let rules = rules
            .iter()
            .map(|(label, pattern)| {
                let regex = RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .expect("built-in purpose pattern should be valid");
                (*label, regex)
            })
            .collect();
        Self { rules }
    }

    pub fn first_match<S: AsRef<str>>(&self, signals: &[S]) -> Option<L> {
        signals.iter().find_map(|signal| {
            let signal = signal.as_ref();
            self.rules
                .iter()
                .find(|(_, regex)| regex.is_match(signal))
                .map(|(label, _)| *label)
        })
    }

    pub fn labels(&self) -> impl Iterator<Item = L> + '_ {
        self.rules.iter().map(|(label, _)| *label)
    }
}

/// Purpose rules for interactive elements
pub static ACTION_PATTERNS: LazyLock<PatternTable<Purpose>> = LazyLock::new(|| {
    PatternTable::new(&[
        (Purpose::Submit, r"submit|send|save|confirm|ok|apply"),
        (Purpose::Search, r"search|find|lookup"),
        (Purpose::Navigate, r"menu|nav|go to|link"),
        (Purpose::Delete, r"delete|remove|clear"),
        (Purpose::Edit, r"edit|modify|change|update"),
        (Purpose::Form, r"form|input|enter"),
        (Purpose::Login, r"login|sign in|signin"),
        (Purpose::Register, r"register|sign up|signup"),
        (Purpose::Download, r"download|export|get"),
        (Purpose::Upload, r"upload|import|attach"),
    ])
});

/// Purpose rules for page regions
pub static SECTION_PATTERNS: LazyLock<PatternTable<SectionPurpose>> = LazyLock::new(|| {
    PatternTable::new(&[
        (SectionPurpose::Header, r"header|banner|top"),
        (SectionPurpose::Footer, r"footer|bottom"),
        (SectionPurpose::Sidebar, r"sidebar|aside"),
        (SectionPurpose::Main, r"main|content|article"),
        (SectionPurpose::Navigation, r"nav|menu"),
        (SectionPurpose::Search, r"search"),
        (SectionPurpose::Login, r"login|signin"),
        (SectionPurpose::Form, r"form|contact"),
    ])
});
