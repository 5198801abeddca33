/// The category of a compilation unit or artefact the file manager deals in.
///
/// Each kind has a canonical filename extension; `Other` has none. When
/// inferring a kind from a filename, longer extensions are tried first so
/// that a future subset extension (e.g. `.ss` vs `.java`) can never shadow
/// an existing one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Source,
    Class,
    Html,
    Other,
}

const RANKED_KINDS: &[Kind] = &[Kind::Source, Kind::Class, Kind::Html];

impl Kind {
    pub fn extension(self) -> &'static str {
        match self {
            Kind::Source => ".java",
            Kind::Class => ".class",
            Kind::Html => ".html",
            Kind::Other => "",
        }
    }

    /// Infer the [`Kind`] of a file from its name, trying longer extensions
    /// first so a future kind whose extension is a suffix of another's can
    /// never mis-match ahead of the longer, more specific one.
    pub fn from_filename(name: &str) -> Kind {
        let mut candidates: Vec<Kind> = RANKED_KINDS.to_vec();
        candidates.sort_by_key(|k| std::cmp::Reverse(k.extension().len()));
        for kind in candidates {
            if name.ends_with(kind.extension()) {
                return kind;
            }
        }
        Kind::Other
    }
}
