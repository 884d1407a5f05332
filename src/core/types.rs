use serde::{Deserialize, Serialize};

/// Category of a hymn record.
///
/// This is a closed enumeration: every record and every reference key carries
/// exactly one of these. The external-dialect codes used to render a type in
/// scheme A or scheme B live in [`crate::parsing::translate`], not here, so
/// that identity comparison and dialect translation stay separate concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HymnType {
    /// Classic hymn (the English hymnal proper)
    Classic,
    /// New tune for an existing classic hymn
    NewTune,
    /// New song
    NewSong,
    /// Children's song
    Children,
    /// Chinese hymn (traditional script; simplified is a key variant)
    Chinese,
    /// Chinese supplement hymn
    ChineseSupplement,
    Tagalog,
    Cebuano,
    French,
    German,
    Korean,
    Japanese,
    Farsi,
    Indonesian,
    /// Scripture song
    Scripture,
    /// Howard Higashi (Long Beach) song
    HowardHigashi,
    /// Placeholder for a "be filled" slot not yet backed by a real hymn
    BeFilled,
    /// Record whose category could not be determined from the source
    Unclassified,
}

impl HymnType {
    /// The class a type is compared under for the "at most one translation
    /// per type" rule. Howard Higashi songs are new songs published under a
    /// separate index, so they conflict with new songs rather than standing
    /// alone.
    #[must_use]
    pub fn relation_class(self) -> HymnType {
        match self {
            Self::HowardHigashi => Self::NewSong,
            other => other,
        }
    }
}

impl std::fmt::Display for HymnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Classic => "classic",
            Self::NewTune => "new-tune",
            Self::NewSong => "new-song",
            Self::Children => "children",
            Self::Chinese => "chinese",
            Self::ChineseSupplement => "chinese-supplement",
            Self::Tagalog => "tagalog",
            Self::Cebuano => "cebuano",
            Self::French => "french",
            Self::German => "german",
            Self::Korean => "korean",
            Self::Japanese => "japanese",
            Self::Farsi => "farsi",
            Self::Indonesian => "indonesian",
            Self::Scripture => "scripture",
            Self::HowardHigashi => "howard-higashi",
            Self::BeFilled => "be-filled",
            Self::Unclassified => "unclassified",
        };
        write!(f, "{name}")
    }
}

/// Which stored reference list a relation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Translation of the same hymn into another language or dialect
    Language,
    /// Alternate tune or adapted version of the same hymn
    Relevant,
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Language => write!(f, "language"),
            Self::Relevant => write!(f, "relevant"),
        }
    }
}
