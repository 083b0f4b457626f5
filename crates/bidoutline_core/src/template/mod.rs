//! Chapter-title template resolution.
//!
//! # Responsibility
//! - Map a chapter title to suggested boilerplate text.
//! - Keep rules and template texts as data: an ordered rule table plus a
//!   registry keyed by `TemplateId`.
//!
//! # Invariants
//! - Rules are evaluated in insertion order; the first match wins.
//! - Built-in template texts are embedded verbatim and never rewritten, since
//!   stored documents were generated from them.
//! - Unmatched titles resolve to an empty string.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));
static BUILTIN_RESOLVER: Lazy<TemplateResolver> = Lazy::new(TemplateResolver::builtin);

const BID_LETTER_TEXT: &str = include_str!("bid_letter.txt");
const POWER_OF_ATTORNEY_TEXT: &str = include_str!("power_of_attorney.txt");

/// Registry key of one template text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TemplateId(Cow<'static, str>);

impl TemplateId {
    /// Bid letter (`投标函`).
    pub const BID_LETTER: TemplateId = TemplateId(Cow::Borrowed("bid_letter"));
    /// Power of attorney (`授权委托书`).
    pub const POWER_OF_ATTORNEY: TemplateId = TemplateId(Cow::Borrowed("power_of_attorney"));

    pub fn new(value: impl Into<String>) -> Self {
        Self(Cow::Owned(value.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TemplateId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors raised while extending a resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Rule references a template that is not registered.
    UnknownTemplate(TemplateId),
    /// Rule has no non-blank needle.
    EmptyRule(TemplateId),
}

impl Display for TemplateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTemplate(id) => write!(f, "template not registered: {id}"),
            Self::EmptyRule(id) => write!(f, "template rule for {id} has no needle"),
        }
    }
}

impl Error for TemplateError {}

/// One title matcher: matches when the normalized title contains any needle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRule {
    needles: Vec<String>,
    template_id: TemplateId,
}

impl TemplateRule {
    fn new<I, S>(needles: I, template_id: TemplateId) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let needles = needles
            .into_iter()
            .map(|needle| normalize_title(needle.as_ref()))
            .filter(|needle| !needle.is_empty())
            .collect();
        Self {
            needles,
            template_id,
        }
    }

    fn matches(&self, normalized_title: &str) -> bool {
        self.needles
            .iter()
            .any(|needle| normalized_title.contains(needle.as_str()))
    }

    pub fn template_id(&self) -> &TemplateId {
        &self.template_id
    }
}

/// Ordered rule table plus template registry.
#[derive(Debug, Clone, Default)]
pub struct TemplateResolver {
    rules: Vec<TemplateRule>,
    templates: BTreeMap<TemplateId, Cow<'static, str>>,
}

impl TemplateResolver {
    /// Creates a resolver with no rules; every title resolves to `""`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates the resolver holding the built-in bid templates.
    pub fn builtin() -> Self {
        let mut resolver = Self::empty();
        resolver.register_builtin(TemplateId::BID_LETTER, BID_LETTER_TEXT, &["投标函", "投标涵"]);
        resolver.register_builtin(
            TemplateId::POWER_OF_ATTORNEY,
            POWER_OF_ATTORNEY_TEXT,
            &["授权委托书", "委托书"],
        );
        resolver
    }

    /// Registers or replaces one template text.
    pub fn with_template(mut self, id: TemplateId, text: impl Into<String>) -> Self {
        self.templates.insert(id, Cow::Owned(text.into()));
        self
    }

    /// Appends one rule after the existing ones.
    ///
    /// # Errors
    /// - `UnknownTemplate` when `template_id` is not registered.
    /// - `EmptyRule` when every needle is blank.
    pub fn with_rule<I, S>(mut self, needles: I, template_id: TemplateId) -> Result<Self, TemplateError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !self.templates.contains_key(&template_id) {
            return Err(TemplateError::UnknownTemplate(template_id));
        }
        let rule = TemplateRule::new(needles, template_id);
        if rule.needles.is_empty() {
            return Err(TemplateError::EmptyRule(rule.template_id));
        }
        self.rules.push(rule);
        Ok(self)
    }

    /// Returns the ordered rule table.
    pub fn rules(&self) -> &[TemplateRule] {
        &self.rules
    }

    /// Returns the registered text for `id`.
    pub fn template(&self, id: &TemplateId) -> Option<&str> {
        self.templates.get(id).map(|text| &**text)
    }

    /// Returns the template id of the first rule matching `title`.
    pub fn match_title(&self, title: &str) -> Option<&TemplateId> {
        let normalized = normalize_title(title);
        if normalized.is_empty() {
            return None;
        }
        self.rules
            .iter()
            .find(|rule| rule.matches(&normalized))
            .map(TemplateRule::template_id)
    }

    /// Resolves boilerplate text for `title`, or `""` when no rule matches.
    pub fn resolve(&self, title: &str) -> String {
        self.match_title(title)
            .and_then(|id| self.template(id))
            .map(str::to_string)
            .unwrap_or_default()
    }

    fn register_builtin(&mut self, id: TemplateId, text: &'static str, needles: &[&str]) {
        self.templates.insert(id.clone(), Cow::Borrowed(text));
        self.rules.push(TemplateRule::new(needles.iter(), id));
    }
}

/// Resolves `title` against the built-in rule table.
pub fn resolve_template(title: &str) -> String {
    BUILTIN_RESOLVER.resolve(title)
}

/// Returns the process-wide built-in resolver.
pub fn builtin_resolver() -> &'static TemplateResolver {
    &BUILTIN_RESOLVER
}

/// Strips all whitespace and lowercases Latin fragments.
pub fn normalize_title(title: &str) -> String {
    WHITESPACE_RE.replace_all(title, "").to_lowercase()
}
