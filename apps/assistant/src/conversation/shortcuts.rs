/// A canned prompt the user can send with one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    pub label: &'static str,
    pub question: &'static str,
}

pub const SHORTCUTS: &[Shortcut] = &[
    Shortcut {
        label: "Introduce Mayar",
        question: "Tell me about Mayar.",
    },
    Shortcut {
        label: "Skills",
        question: "What are Mayar's skills?",
    },
    Shortcut {
        label: "Experience",
        question: "What is Mayar's work experience?",
    },
    Shortcut {
        label: "Projects",
        question: "What projects has Mayar built?",
    },
    Shortcut {
        label: "Education",
        question: "Where did Mayar study?",
    },
    Shortcut {
        label: "Contact",
        question: "How can I contact Mayar?",
    },
];

/// Looks up a shortcut by its 1-based menu number.
pub fn by_number(number: usize) -> Option<&'static Shortcut> {
    number.checked_sub(1).and_then(|index| SHORTCUTS.get(index))
}
