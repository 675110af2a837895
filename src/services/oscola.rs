//! OSCOLA legal citation formatting.
//!
//! Two entry points: [`format_reference`] builds a citation from structured
//! fields and lints what is missing, and [`parse_citation`] recognises a
//! free-text citation and normalises its spacing.
use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationKind {
    Case,
    Statute,
    Book,
    Article,
    Website,
}

impl CitationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CitationKind::Case => "case",
            CitationKind::Statute => "statute",
            CitationKind::Book => "book",
            CitationKind::Article => "article",
            CitationKind::Website => "website",
        }
    }

    pub fn expected_format(self) -> &'static str {
        match self {
            CitationKind::Case => "Case Name v Other Party [Year] Citation",
            CitationKind::Statute => "Act Name Year",
            CitationKind::Book => "Author Name, Book Title (Publisher Year)",
            CitationKind::Article => "Author Name, 'Article Title' (Year) Journal Details",
            CitationKind::Website => "Author, 'Page Title' (Website, accessed Date) <URL>",
        }
    }
}

/// One author or several
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Authors {
    One(String),
    Many(Vec<String>),
}

impl Authors {
    fn names(&self) -> Vec<&str> {
        let names: Vec<&str> = match self {
            Authors::One(name) => vec![name.as_str()],
            Authors::Many(names) => names.iter().map(String::as_str).collect(),
        };
        names.into_iter().map(str::trim).filter(|n| !n.is_empty()).collect()
    }
}

/// Structured reference fields; each kind reads the subset it needs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReferenceFields {
    pub case_name: Option<String>,
    pub citation: Option<String>,
    pub court: Option<String>,
    pub judge: Option<String>,
    pub paragraph: Option<String>,
    pub title: Option<String>,
    pub chapter: Option<String>,
    pub section: Option<String>,
    pub subsection: Option<String>,
    pub author: Option<Authors>,
    pub edition: Option<String>,
    pub publisher: Option<String>,
    pub journal: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub pages: Option<String>,
    pub website: Option<String>,
    pub url: Option<String>,
    pub access_date: Option<String>,
    pub year: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormattedReference {
    #[serde(rename = "type")]
    pub kind: CitationKind,
    pub formatted: String,
    pub lint_messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParsedCitation {
    #[serde(rename = "type")]
    pub kind: Option<CitationKind>,
    pub formatted: String,
    pub original: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BibliographyEntry {
    pub index: usize,
    #[serde(flatten)]
    pub citation: ParsedCitation,
}

#[derive(Debug, Clone, Serialize)]
pub struct BibliographySummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub valid_percentage: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BibliographyReport {
    pub results: Vec<BibliographyEntry>,
    pub summary: BibliographySummary,
}

const UNRECOGNISED: &str = "Citation format not recognized. Please check OSCOLA guidelines.";

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Build an OSCOLA citation from fields. Case names and book titles are
/// wrapped in `*` for italics.
pub fn format_reference(kind: CitationKind, fields: &ReferenceFields) -> FormattedReference {
    let mut lint = Vec::new();
    let formatted = match kind {
        CitationKind::Case => format_case(fields, &mut lint),
        CitationKind::Statute => format_statute(fields, &mut lint),
        CitationKind::Book => format_book(fields, &mut lint),
        CitationKind::Article => format_article(fields, &mut lint),
        CitationKind::Website => format_website(fields, &mut lint),
    };
    let formatted = if formatted.trim().is_empty() {
        format!("Invalid {} reference", kind.as_str())
    } else {
        formatted
    };
    FormattedReference {
        kind,
        formatted,
        lint_messages: lint,
    }
}

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").expect("year pattern"));

fn format_case(fields: &ReferenceFields, lint: &mut Vec<String>) -> String {
    let case_name = present(&fields.case_name);
    let citation = present(&fields.citation);
    if case_name.is_none() {
        lint.push("Case name is required".into());
    }
    if citation.is_none() {
        lint.push("Citation is required".into());
    }

    let mut parts = Vec::new();
    if let Some(name) = case_name {
        parts.push(format!("*{}*", name));
    }
    if let Some(year) = present(&fields.year) {
        parts.push(format!("[{}]", year));
    }
    if let Some(citation) = citation {
        parts.push(citation.to_string());
    }
    if let Some(court) = present(&fields.court) {
        if !citation.is_some_and(|c| c.contains(court)) {
            parts.push(format!("({})", court));
        }
    }
    if let Some(paragraph) = present(&fields.paragraph) {
        parts.push(format!("[{}]", paragraph));
    }
    if let Some(judge) = present(&fields.judge) {
        parts.push(format!("({})", judge));
    }

    if citation.is_some_and(|c| !YEAR.is_match(c)) {
        lint.push("Citation should include a year".into());
    }
    if let Some(name) = case_name {
        let lower = name.to_lowercase();
        if !lower.contains(" v ") && (lower.contains(" vs ") || lower.contains(" vs. ")) {
            lint.push("Use \"v\" instead of \"vs\" in case names".into());
        }
    }
    parts.join(" ")
}

fn format_statute(fields: &ReferenceFields, lint: &mut Vec<String>) -> String {
    let title = present(&fields.title);
    let year = present(&fields.year);
    if title.is_none() {
        lint.push("Statute title is required".into());
    }
    if year.is_none() {
        lint.push("Year is required for statutes".into());
    }

    let mut out = [title, year].into_iter().flatten().collect::<Vec<_>>().join(" ");
    match present(&fields.chapter) {
        Some(chapter) => out.push_str(&format!(" c {}", chapter)),
        None if year.is_some() => lint.push("Chapter number usually required for statutes".into()),
        None => {}
    }
    if let Some(section) = present(&fields.section) {
        out.push_str(&format!(", s {}", section));
    }
    if let Some(subsection) = present(&fields.subsection) {
        out.push_str(&format!("({})", subsection));
    }
    out
}

fn author_list(authors: &[&str]) -> String {
    match authors {
        [] => String::new(),
        [one] => one.to_string(),
        [first, second] => format!("{} and {}", first, second),
        [first, ..] => format!("{} and others", first),
    }
}

fn format_book(fields: &ReferenceFields, lint: &mut Vec<String>) -> String {
    let authors = fields.author.as_ref().map(Authors::names).unwrap_or_default();
    let title = present(&fields.title);
    let year = present(&fields.year);
    if authors.is_empty() {
        lint.push("Author is required".into());
    }
    if title.is_none() {
        lint.push("Book title is required".into());
    }
    if year.is_none() {
        lint.push("Publication year is required".into());
    }

    let mut out = author_list(&authors);
    if let Some(title) = title {
        if !out.is_empty() {
            out.push_str(", ");
        }
        out.push_str(&format!("*{}*", title));
    }

    let publication = [present(&fields.publisher), year]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    match present(&fields.edition).filter(|e| *e != "1st") {
        Some(edition) if publication.is_empty() => out.push_str(&format!(" ({} edn)", edition)),
        Some(edition) => out.push_str(&format!(" ({} edn, {})", edition, publication)),
        None if !publication.is_empty() => out.push_str(&format!(" ({})", publication)),
        None => {}
    }
    if let Some(pages) = present(&fields.pages) {
        out.push_str(&format!(" {}", pages));
    }
    out
}

fn format_article(fields: &ReferenceFields, lint: &mut Vec<String>) -> String {
    let authors = fields.author.as_ref().map(Authors::names).unwrap_or_default();
    let title = present(&fields.title);
    let journal = present(&fields.journal);
    if authors.is_empty() {
        lint.push("Author is required".into());
    }
    if title.is_none() {
        lint.push("Article title is required".into());
    }
    if journal.is_none() {
        lint.push("Journal name is required".into());
    }

    let mut out = author_list(&authors);
    if let Some(title) = title {
        if !out.is_empty() {
            out.push_str(", ");
        }
        out.push_str(&format!("'{}'", title));
    }
    if let Some(year) = present(&fields.year) {
        out.push_str(&format!(" ({})", year));
    }
    if let Some(volume) = present(&fields.volume) {
        out.push_str(&format!(" {}", volume));
    }
    if let Some(journal) = journal {
        out.push_str(&format!(" {}", journal));
    }
    if let Some(issue) = present(&fields.issue) {
        out.push_str(&format!("({})", issue));
    }
    if let Some(pages) = present(&fields.pages) {
        out.push_str(&format!(" {}", pages));
    }
    out
}

/// `2026-03-14` or an RFC 3339 timestamp, shown as `14 March 2026`
fn long_date(raw: &str) -> Option<String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .map(|date| date.format("%-d %B %Y").to_string())
}

fn format_website(fields: &ReferenceFields, lint: &mut Vec<String>) -> String {
    let title = present(&fields.title);
    let url = present(&fields.url);
    let access_date = present(&fields.access_date);
    if title.is_none() {
        lint.push("Page title is required".into());
    }
    if url.is_none() {
        lint.push("URL is required".into());
    }
    if access_date.is_none() {
        lint.push("Access date is recommended for websites".into());
    }

    let mut out = String::new();
    let authors = fields.author.as_ref().map(Authors::names).unwrap_or_default();
    if !authors.is_empty() {
        out.push_str(&author_list(&authors));
        out.push_str(", ");
    }
    if let Some(title) = title {
        out.push_str(&format!("'{}'", title));
    }

    let accessed = access_date.map(|raw| match long_date(raw) {
        Some(date) => date,
        None => {
            lint.push("Access date is not a valid date".into());
            raw.to_string()
        }
    });
    match (present(&fields.website), accessed) {
        (Some(site), Some(date)) => out.push_str(&format!(" ({}, accessed {})", site, date)),
        (Some(site), None) => out.push_str(&format!(" ({})", site)),
        (None, Some(date)) => out.push_str(&format!(" (accessed {})", date)),
        (None, None) => {}
    }
    if let Some(url) = url {
        out.push_str(&format!(" <{}>", url));
        if !url.starts_with("http://") && !url.starts_with("https://") {
            lint.push("URL should include http:// or https://".into());
        }
    }
    out.trim_start().to_string()
}

struct Pattern {
    kind: CitationKind,
    regex: Regex,
    render: fn(&Captures) -> String,
}

fn cap<'a>(caps: &'a Captures, i: usize) -> &'a str {
    caps.get(i).map_or("", |m| m.as_str())
}

/// Free-text shapes, tried in this order when the kind is not given
static PATTERNS: Lazy<Vec<Pattern>> = Lazy::new(|| {
    vec![
        Pattern {
            kind: CitationKind::Case,
            regex: Regex::new(r"(?i)^(.+?)\s+v\s+(.+?)\s*\[(\d{4})\]\s*(.+)$").expect("case pattern"),
            render: |c| format!("{} v {} [{}] {}", cap(c, 1), cap(c, 2), cap(c, 3), cap(c, 4)),
        },
        Pattern {
            kind: CitationKind::Statute,
            regex: Regex::new(r"^(.+?)\s+(\d{4})$").expect("statute pattern"),
            render: |c| format!("{} {}", cap(c, 1), cap(c, 2)),
        },
        Pattern {
            kind: CitationKind::Book,
            regex: Regex::new(r"^(.+?),\s*(.+?)\s*\((.+?)\s+(\d{4})\)$").expect("book pattern"),
            render: |c| format!("{}, {} ({} {})", cap(c, 1), cap(c, 2), cap(c, 3), cap(c, 4)),
        },
        Pattern {
            kind: CitationKind::Article,
            regex: Regex::new(r"^(.+?),\s*'(.+?)'\s*\((\d{4})\)\s*(.+?)$").expect("article pattern"),
            render: |c| format!("{}, '{}' ({}) {}", cap(c, 1), cap(c, 2), cap(c, 3), cap(c, 4)),
        },
    ]
});

/// Recognise a free-text citation.
///
/// With `kind` set only that shape is tried and a mismatch is an error holding
/// the expected shape. Without it the first matching shape wins, and text no
/// shape matches comes back unchanged with `valid: false`.
pub fn parse_citation(text: &str, kind: Option<CitationKind>) -> Result<ParsedCitation, String> {
    let original = text.trim().to_string();
    let candidates = PATTERNS.iter().filter(|p| kind.map_or(true, |k| p.kind == k));

    for pattern in candidates {
        if let Some(caps) = pattern.regex.captures(&original) {
            return Ok(ParsedCitation {
                kind: Some(pattern.kind),
                formatted: (pattern.render)(&caps),
                original,
                valid: true,
                warning: None,
            });
        }
    }

    match kind {
        Some(kind) => Err(format!(
            "Citation doesn't match {} format. Expected: {}",
            kind.as_str(),
            kind.expected_format()
        )),
        None => Ok(ParsedCitation {
            kind: None,
            formatted: original.clone(),
            original,
            valid: false,
            warning: Some(UNRECOGNISED.to_string()),
        }),
    }
}

/// Auto-detect every citation and count how many were recognised
pub fn validate_bibliography(citations: &[String]) -> BibliographyReport {
    let results: Vec<BibliographyEntry> = citations
        .iter()
        .enumerate()
        .map(|(index, text)| BibliographyEntry {
            index,
            citation: parse_citation(text, None).unwrap_or_else(|warning| ParsedCitation {
                kind: None,
                formatted: text.trim().to_string(),
                original: text.trim().to_string(),
                valid: false,
                warning: Some(warning),
            }),
        })
        .collect();

    let total = results.len();
    let valid = results.iter().filter(|r| r.citation.valid).count();
    let valid_percentage = if total == 0 {
        0
    } else {
        ((valid as f64 / total as f64) * 100.0).round() as u32
    };
    BibliographyReport {
        results,
        summary: BibliographySummary {
            total,
            valid,
            invalid: total - valid,
            valid_percentage,
        },
    }
}

/// Worked examples and house rules shown next to the formatter
pub fn guidance() -> Value {
    json!({
        "examples": {
            "case": {
                "correct": "Carlill v Carbolic Smoke Ball Co [1893] 1 QB 256",
                "incorrect": "Carlill vs Carbolic Smoke Ball Co (1893) 1 QB 256",
                "explanation": "Use 'v' not 'vs', square brackets for the year and the full law report citation"
            },
            "statute": {
                "correct": "Human Rights Act 1998",
                "incorrect": "Human Rights Act, 1998",
                "explanation": "No comma before the year, capitalise Act"
            },
            "book": {
                "correct": "F H Lawson, Introduction to the Law of Property (Oxford University Press 1958)",
                "incorrect": "F.H. Lawson, Introduction to the Law of Property, Oxford University Press, 1958",
                "explanation": "No full stops in initials, publisher and year in parentheses"
            },
            "article": {
                "correct": "Tony Weir, 'The Staggering March of Negligence' (1980) 23 MLR 233",
                "incorrect": "Tony Weir, The Staggering March of Negligence, (1980) 23 MLR 233",
                "explanation": "Article title in single quotes, no comma before the year"
            }
        },
        "guidelines": [
            "Cases: Name v Name [Year] Citation",
            "Statutes: Full Name Year",
            "Books: Author, Title (Publisher Year)",
            "Articles: Author, 'Title' (Year) Citation",
            "Use single quotes for article and chapter titles",
            "Use square brackets for neutral citations",
            "No full stops in author initials",
            "Italicise case names in final documents"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: serde_json::Value) -> ReferenceFields {
        serde_json::from_value(pairs).unwrap()
    }

    #[test]
    fn formats_a_full_case() {
        let out = format_reference(
            CitationKind::Case,
            &fields(json!({
                "case_name": "Donoghue v Stevenson",
                "year": "1932",
                "citation": "AC 562",
                "court": "HL",
                "paragraph": "580",
                "judge": "Lord Atkin"
            })),
        );
        assert_eq!(out.formatted, "*Donoghue v Stevenson* [1932] AC 562 (HL) [580] (Lord Atkin)");
        assert!(out.lint_messages.contains(&"Citation should include a year".to_string()));
    }

    #[test]
    fn case_lints_vs_and_missing_parts() {
        let out = format_reference(CitationKind::Case, &fields(json!({ "case_name": "Smith vs Jones" })));
        assert_eq!(out.formatted, "*Smith vs Jones*");
        assert!(out.lint_messages.contains(&"Citation is required".to_string()));
        assert!(out.lint_messages.iter().any(|m| m.contains("instead of \"vs\"")));

        let empty = format_reference(CitationKind::Case, &ReferenceFields::default());
        assert_eq!(empty.formatted, "Invalid case reference");
    }

    #[test]
    fn statute_sections_and_chapter_lint() {
        let out = format_reference(
            CitationKind::Statute,
            &fields(json!({ "title": "Human Rights Act", "year": "1998", "chapter": "42", "section": "3", "subsection": "1" })),
        );
        assert_eq!(out.formatted, "Human Rights Act 1998 c 42, s 3(1)");
        assert!(out.lint_messages.is_empty());

        let bare = format_reference(CitationKind::Statute, &fields(json!({ "title": "Theft Act", "year": "1968" })));
        assert_eq!(bare.lint_messages, vec!["Chapter number usually required for statutes"]);
    }

    #[test]
    fn book_authors_and_editions() {
        let two = format_reference(
            CitationKind::Book,
            &fields(json!({
                "author": ["Paul Craig", "Gráinne de Búrca"],
                "title": "EU Law",
                "edition": "7th",
                "publisher": "OUP",
                "year": "2020"
            })),
        );
        assert_eq!(two.formatted, "Paul Craig and Gráinne de Búrca, *EU Law* (7th edn, OUP 2020)");

        let many = format_reference(
            CitationKind::Book,
            &fields(json!({ "author": ["A", "B", "C"], "title": "Torts", "edition": "1st", "year": "2001", "pages": "12" })),
        );
        assert_eq!(many.formatted, "A and others, *Torts* (2001) 12");
    }

    #[test]
    fn article_layout() {
        let out = format_reference(
            CitationKind::Article,
            &fields(json!({
                "author": "Tony Weir",
                "title": "The Staggering March of Negligence",
                "year": "1980",
                "volume": "23",
                "journal": "MLR",
                "pages": "233"
            })),
        );
        assert_eq!(out.formatted, "Tony Weir, 'The Staggering March of Negligence' (1980) 23 MLR 233");
        assert!(out.lint_messages.is_empty());
    }

    #[test]
    fn website_dates_and_url_lint() {
        let out = format_reference(
            CitationKind::Website,
            &fields(json!({
                "title": "Judgments",
                "website": "UK Supreme Court",
                "url": "www.supremecourt.uk",
                "access_date": "2026-03-04"
            })),
        );
        assert_eq!(
            out.formatted,
            "'Judgments' (UK Supreme Court, accessed 4 March 2026) <www.supremecourt.uk>"
        );
        assert_eq!(out.lint_messages, vec!["URL should include http:// or https://"]);
    }

    #[test]
    fn auto_detects_free_text() {
        let case = parse_citation("  Carlill v  Carbolic Smoke Ball Co [1893]  1 QB 256 ", None).unwrap();
        assert_eq!(case.kind, Some(CitationKind::Case));
        assert_eq!(case.formatted, "Carlill v Carbolic Smoke Ball Co [1893] 1 QB 256");

        let statute = parse_citation("Human Rights Act 1998", None).unwrap();
        assert_eq!(statute.kind, Some(CitationKind::Statute));

        let article = parse_citation("Tony Weir, 'Negligence' (1980) 23 MLR 233", None).unwrap();
        assert_eq!(article.kind, Some(CitationKind::Article));

        let unknown = parse_citation("see my notes", None).unwrap();
        assert!(!unknown.valid);
        assert_eq!(unknown.formatted, "see my notes");
        assert!(unknown.warning.is_some());
    }

    #[test]
    fn explicit_kind_must_match() {
        let err = parse_citation("Human Rights Act 1998", Some(CitationKind::Book)).unwrap_err();
        assert!(err.contains("Author Name, Book Title (Publisher Year)"));
    }

    #[test]
    fn bibliography_summary() {
        let report = validate_bibliography(&[
            "Human Rights Act 1998".to_string(),
            "nonsense".to_string(),
            "F H Lawson, Introduction to the Law of Property (Oxford University Press 1958)".to_string(),
        ]);
        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.valid, 2);
        assert_eq!(report.summary.invalid, 1);
        assert_eq!(report.summary.valid_percentage, 67);
        assert_eq!(report.results[2].citation.kind, Some(CitationKind::Book));
    }
}
