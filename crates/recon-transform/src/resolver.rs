//! Canonical column roles.
//!
//! Vendor extracts name the same concept differently (`USUBJID`, `Subject ID`,
//! `PT`, ...). Each [`Role`] carries an ordered candidate-token list; resolution
//! is a pure function of the column names, so the same columns always resolve
//! to the same [`RoleMap`].
//!
//! Resolution never fails outright. When nothing matches, a fixed default
//! column name is returned (or the first column, for the subject identifier),
//! and rules reading it simply see missing values.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use recon_model::{CellValue, Record};

/// Subject identifier candidates, compared after upper-casing and removing `_` and spaces.
const SUBJECT_ID_CANDIDATES: &[&str] = &["USUBJID", "SUBJID", "SUBJECT", "PT", "PATIENT", "SUBJ_ID"];

/// Semantic role of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    SubjectId,
    // Safety
    Seriousness,
    Causality,
    Outcome,
    DispositionReason,
    Term,
    Code,
    // Labs and visits
    VisitDate,
    LabDate,
    LabComment,
    ResultValue,
    // Medications and history
    Indication,
    HistoryTerm,
    // Queries
    QueryStatus,
    QueryAge,
    QueryResponse,
    RevisionCount,
    FormName,
    // Protocol deviations
    DeviationCategory,
    DeviationVisit,
    EdcVisit,
    VisitWindow,
    // Risk count tables
    Site,
    SubjectGroup,
    Country,
    QueryCount,
    SaeCount,
    MajorDeviations,
    MinorDeviations,
    TotalDeviations,
    SubjectCount,
}

impl Role {
    /// Upper-case substrings that identify the role in a column name.
    pub fn tokens(self) -> &'static [&'static str] {
        match self {
            Self::SubjectId => SUBJECT_ID_CANDIDATES,
            Self::Seriousness => &["SER"],
            Self::Causality => &["REL"],
            Self::Outcome => &["OUT"],
            Self::DispositionReason => &["REAS"],
            Self::Term => &["TERM"],
            Self::Code => &["LLT", "CODE"],
            Self::VisitDate | Self::LabDate => &["DAT"],
            Self::LabComment => &["COMM", "STAT"],
            Self::ResultValue => &["RES"],
            Self::Indication => &["IND"],
            Self::HistoryTerm => &["TERM"],
            Self::QueryStatus => &["STAT"],
            Self::QueryAge => &["AGE"],
            Self::QueryResponse => &["RESP", "ANS"],
            Self::RevisionCount => &["REV"],
            Self::FormName => &["FORM"],
            Self::DeviationCategory => &["CAT", "TERM"],
            Self::DeviationVisit => &["VISIT"],
            Self::EdcVisit => &["VISIT", "FOLDER"],
            Self::VisitWindow => &["WINDOW"],
            Self::Site => &["SITE"],
            Self::SubjectGroup => &["SUBJ"],
            Self::Country => &["CTRY"],
            Self::QueryCount => &["QUERY"],
            Self::SaeCount => &["SAE"],
            Self::MajorDeviations => &["MAJ"],
            Self::MinorDeviations => &["MIN"],
            Self::TotalDeviations => &["DEV", "PD"],
            Self::SubjectCount => &["COUNT", "SUBJ"],
        }
    }

    /// Column name assumed when no column matches.
    pub fn default_column(self) -> Option<&'static str> {
        match self {
            Self::SubjectId => None,
            Self::Seriousness => Some("AESER"),
            Self::Causality => Some("AEREL"),
            Self::Outcome => Some("AEOUT"),
            Self::DispositionReason => Some("DSDECOD"),
            Self::Term => Some("AETERM"),
            Self::Code => Some("AELLT"),
            Self::VisitDate => Some("VISITDAT"),
            Self::LabDate => Some("LBDAT"),
            Self::LabComment => None,
            Self::ResultValue => Some("LBORRES"),
            Self::Indication => Some("CMINDC"),
            Self::HistoryTerm => Some("MHTERM"),
            Self::QueryStatus => Some("QueryStatus"),
            Self::QueryAge => Some("DaysOpen"),
            Self::QueryResponse => Some("QueryResponse"),
            Self::RevisionCount => None,
            Self::FormName => Some("FormOID"),
            Self::DeviationCategory => Some("Category"),
            Self::DeviationVisit => Some("Visit"),
            Self::EdcVisit => Some("Folder"),
            Self::VisitWindow => None,
            Self::Site => Some("SiteID"),
            Self::SubjectGroup => Some("SubjectID"),
            Self::Country => Some("Country"),
            Self::QueryCount => Some("Queries"),
            Self::SaeCount => Some("SAEs"),
            Self::MajorDeviations => None,
            Self::MinorDeviations => None,
            Self::TotalDeviations => Some("PD_Total"),
            Self::SubjectCount => Some("SubjCount"),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::SubjectId => "SubjectID",
            Self::Seriousness => "SeriousnessFlag",
            Self::Causality => "Causality",
            Self::Outcome => "Outcome",
            Self::DispositionReason => "DispositionReason",
            Self::Term => "Term",
            Self::Code => "Code",
            Self::VisitDate => "VisitDate",
            Self::LabDate => "LabDate",
            Self::LabComment => "Comment",
            Self::ResultValue => "ResultValue",
            Self::Indication => "Indication",
            Self::HistoryTerm => "HistoryTerm",
            Self::QueryStatus => "QueryStatus",
            Self::QueryAge => "QueryAge",
            Self::QueryResponse => "QueryResponse",
            Self::RevisionCount => "RevisionCount",
            Self::FormName => "FormName",
            Self::DeviationCategory => "DeviationCategory",
            Self::DeviationVisit => "DeviationVisit",
            Self::EdcVisit => "EdcVisit",
            Self::VisitWindow => "VisitWindow",
            Self::Site => "Site",
            Self::SubjectGroup => "Subject",
            Self::Country => "Country",
            Self::QueryCount => "Queries",
            Self::SaeCount => "SAEs",
            Self::MajorDeviations => "MajorDeviations",
            Self::MinorDeviations => "MinorDeviations",
            Self::TotalDeviations => "TotalDeviations",
            Self::SubjectCount => "SubjectCount",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a role was resolved against a column set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A column matched one of the role's tokens.
    Matched(String),
    /// Nothing matched; the role's default (or first column) is used.
    Fallback(String),
    /// Nothing matched and the role has no default.
    Unresolved,
}

impl Resolution {
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::Matched(column) | Self::Fallback(column) => Some(column),
            Self::Unresolved => None,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }
}

/// Resolves roles against column names.
pub struct ColumnResolver;

impl ColumnResolver {
    /// Best-matching column for `role`.
    pub fn resolve<S: AsRef<str>>(columns: &[S], role: Role) -> Resolution {
        match role {
            Role::SubjectId => Self::resolve_subject_id(columns),
            _ => Self::resolve_by_tokens(columns, role.tokens())
                .map(Resolution::Matched)
                .or_else(|| {
                    role.default_column()
                        .map(|column| Resolution::Fallback(column.to_string()))
                })
                .unwrap_or(Resolution::Unresolved),
        }
    }

    /// First declared column whose upper-cased name contains any token.
    fn resolve_by_tokens<S: AsRef<str>>(columns: &[S], tokens: &[&str]) -> Option<String> {
        columns
            .iter()
            .map(AsRef::as_ref)
            .find(|column| {
                let upper = column.to_uppercase();
                tokens.iter().any(|token| upper.contains(token))
            })
            .map(str::to_string)
    }

    /// Exact match after normalization; candidate order decides, first declared
    /// column wins among columns that normalize identically.
    fn resolve_subject_id<S: AsRef<str>>(columns: &[S]) -> Resolution {
        let mut normalized: HashMap<String, &str> = HashMap::new();
        for column in columns.iter().map(AsRef::as_ref) {
            normalized.entry(normalize_column_name(column)).or_insert(column);
        }
        SUBJECT_ID_CANDIDATES
            .iter()
            .find_map(|candidate| normalized.get(&normalize_column_name(candidate)))
            .map(|column| Resolution::Matched((*column).to_string()))
            .or_else(|| {
                columns
                    .first()
                    .map(|column| Resolution::Fallback(column.as_ref().to_string()))
            })
            .unwrap_or(Resolution::Unresolved)
    }
}

/// Upper-case with `_` and spaces removed.
pub fn normalize_column_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_' && !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Resolved roles for one dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleMap {
    entries: BTreeMap<Role, Resolution>,
}

impl RoleMap {
    /// Resolve every requested role against `columns`.
    pub fn resolve<S: AsRef<str>>(columns: &[S], roles: &[Role]) -> Self {
        let mut entries = BTreeMap::new();
        for role in roles {
            let resolution = ColumnResolver::resolve(columns, *role);
            if !resolution.is_matched() {
                tracing::debug!(role = %role, fallback = ?resolution.column(), "role not matched");
            }
            entries.insert(*role, resolution);
        }
        Self { entries }
    }

    pub fn resolution(&self, role: Role) -> &Resolution {
        static UNRESOLVED: Resolution = Resolution::Unresolved;
        self.entries.get(&role).unwrap_or(&UNRESOLVED)
    }

    /// Column used for `role`, including fallbacks.
    pub fn column(&self, role: Role) -> Option<&str> {
        self.resolution(role).column()
    }

    pub fn is_matched(&self, role: Role) -> bool {
        self.resolution(role).is_matched()
    }

    /// Value of `role` in `record`; `Missing` when the column is absent.
    pub fn value<'a>(&self, record: &'a Record, role: Role) -> &'a CellValue {
        static MISSING: CellValue = CellValue::Missing;
        match self.column(role) {
            Some(column) => record.value(column),
            None => &MISSING,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &Resolution)> {
        self.entries.iter().map(|(role, resolution)| (*role, resolution))
    }
}
