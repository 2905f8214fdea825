use regex::Regex;
use schedule_types::MeetingKind;
use std::sync::LazyLock;
use tracing::trace;

pub(crate) static RE_OFFICE_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:office|student|instructor|drop-in)[ \t]+hours?\b").expect("office regex")
});

static RE_LAB_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:labs?|laborator(?:y|ies)|studios?)\b").expect("lab hint regex")
});

static RE_DISCUSSION_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:discussions?|recitations?|precepts?|tutorials?|sections?)\b")
        .expect("discussion hint regex")
});

static RE_CLASS_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:lectures?|class(?:es)?|seminars?|meetings?|meets)\b")
        .expect("class hint regex")
});

/// Everything the classifier may look at for one candidate meeting.
#[derive(Debug, Clone, Copy)]
pub struct Signals<'a> {
    /// The matched (or synthesized) schedule line
    pub line: &'a str,
    pub location: Option<&'a str>,
    /// Kind of the section span the match falls in
    pub span_kind: Option<MeetingKind>,
    /// Preceding context window
    pub context: &'a str,
}

impl Signals<'_> {
    /// The line with its location text blanked out, so a lecture held in
    /// "Lab 204" is not mistaken for a lab.
    fn line_without_location(&self) -> String {
        match self.location {
            Some(loc) if !loc.is_empty() => self.line.replacen(loc, " ", 1),
            _ => self.line.to_string(),
        }
    }
}

type Rule = fn(&Signals<'_>) -> Option<MeetingKind>;

/// Classification precedence, first match wins.
pub const RULES: &[(&str, Rule)] = &[
    ("office phrase in context", office_in_context),
    ("office phrase on line", office_on_line),
    ("enclosing section span", enclosing_span),
    ("inline keyword", inline_keyword),
];

fn office_in_context(s: &Signals<'_>) -> Option<MeetingKind> {
    RE_OFFICE_PHRASE
        .is_match(s.context)
        .then_some(MeetingKind::Office)
}

fn office_on_line(s: &Signals<'_>) -> Option<MeetingKind> {
    RE_OFFICE_PHRASE
        .is_match(s.line)
        .then_some(MeetingKind::Office)
}

fn enclosing_span(s: &Signals<'_>) -> Option<MeetingKind> {
    s.span_kind.filter(|k| *k != MeetingKind::Class)
}

fn inline_keyword(s: &Signals<'_>) -> Option<MeetingKind> {
    let line = s.line_without_location();
    if RE_LAB_HINT.is_match(&line) {
        Some(MeetingKind::Lab)
    } else if RE_DISCUSSION_HINT.is_match(&line) {
        Some(MeetingKind::Discussion)
    } else if RE_CLASS_HINT.is_match(&line) {
        Some(MeetingKind::Class)
    } else {
        None
    }
}

/// Decide the meeting kind; `CLASS` when no rule fires.
pub fn classify(signals: &Signals<'_>) -> MeetingKind {
    for (name, rule) in RULES {
        if let Some(kind) = rule(signals) {
            trace!(rule = name, kind = kind.as_str(), line = signals.line, "classified");
            return kind;
        }
    }
    MeetingKind::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals<'a>(line: &'a str, context: &'a str, span_kind: Option<MeetingKind>) -> Signals<'a> {
        Signals {
            line,
            location: None,
            span_kind,
            context,
        }
    }

    #[test]
    fn test_office_line_never_class() {
        let s = Signals {
            location: Some("Rm 210"),
            ..signals("Office Hours: M 3-4pm, Rm 210", "", None)
        };
        assert_eq!(classify(&s), MeetingKind::Office);
    }

    #[test]
    fn test_context_beats_span() {
        let s = signals("Tu 2-4pm", "Student hours\n", Some(MeetingKind::Lab));
        assert_eq!(classify(&s), MeetingKind::Office);
    }

    #[test]
    fn test_span_beats_inline_keyword() {
        let s = signals("Lecture review MWF 9-10", "", Some(MeetingKind::Discussion));
        assert_eq!(classify(&s), MeetingKind::Discussion);
    }

    #[test]
    fn test_class_span_defers_to_keywords() {
        let s = signals("Lab Tu 2-4pm", "", Some(MeetingKind::Class));
        assert_eq!(classify(&s), MeetingKind::Lab);
    }

    #[test]
    fn test_inline_keyword_order() {
        assert_eq!(classify(&signals("Lab Sections: Tu 1-3pm", "", None)), MeetingKind::Lab);
        assert_eq!(classify(&signals("Recitation F 9-10", "", None)), MeetingKind::Discussion);
        assert_eq!(classify(&signals("Seminar W 3-5pm", "", None)), MeetingKind::Class);
    }

    #[test]
    fn test_location_text_ignored_for_keywords() {
        let s = Signals {
            location: Some("Lab 204"),
            ..signals("MWF 9-10 Lab 204", "", None)
        };
        assert_eq!(classify(&s), MeetingKind::Class);
    }

    #[test]
    fn test_default_is_class() {
        assert_eq!(classify(&signals("MWF 9-10", "", None)), MeetingKind::Class);
    }

    #[test]
    fn test_rules_are_in_precedence_order() {
        let names: Vec<&str> = RULES.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                "office phrase in context",
                "office phrase on line",
                "enclosing section span",
                "inline keyword"
            ]
        );
    }
}
