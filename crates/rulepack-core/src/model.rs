//! # Domain Rule Model
//!
//! The configuration shape the SpeedReader runtime reads from the artifact:
//! an ordered list of [`DomainRule`] records, each binding a web domain to
//! URL-matching rules and optional content-rewrite instructions.
//!
//! Optional fields are `Option<_>` and are omitted on serialization when
//! absent, so the encoded document contains exactly the fields that were
//! present after validation.

use std::fmt;

use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The full configuration document: domain rules in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration(Vec<DomainRule>);

impl Configuration {
    /// Wrap an ordered list of rules.
    pub fn new(rules: Vec<DomainRule>) -> Self {
        Self(rules)
    }

    /// Number of domain rules.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the document holds no rules.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the rules in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, DomainRule> {
        self.0.iter()
    }

    /// Domains in source order, duplicates included.
    pub fn domains(&self) -> Vec<&str> {
        self.0.iter().map(|r| r.domain.as_str()).collect()
    }

    /// Look up the rule for an exact domain.
    ///
    /// The runtime keys its whitelist by domain and later entries replace
    /// earlier ones, so this returns the last match.
    pub fn find_domain(&self, domain: &str) -> Option<&DomainRule> {
        self.0.iter().rev().find(|r| r.domain == domain)
    }

    /// Domains that appear more than once, sorted and deduplicated.
    pub fn duplicate_domains(&self) -> Vec<&str> {
        let mut seen = std::collections::BTreeMap::<&str, usize>::new();
        for rule in &self.0 {
            *seen.entry(rule.domain.as_str()).or_default() += 1;
        }
        seen.into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(domain, _)| domain)
            .collect()
    }

    /// Consumes self and returns the inner rules.
    pub fn into_inner(self) -> Vec<DomainRule> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Configuration {
    type Item = &'a DomainRule;
    type IntoIter = std::slice::Iter<'a, DomainRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One configuration entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRule {
    /// Web domain the rule applies to, e.g. `cnn.com`.
    pub domain: String,
    /// Adblock-style URL patterns selecting readable pages. Never empty strings.
    pub url_rules: Vec<String>,
    /// Declarative content extraction for the domain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declarative_rewrite: Option<RewriteRules>,
}

impl DomainRule {
    /// A rule with URL patterns only.
    pub fn new(domain: impl Into<String>, url_rules: Vec<String>) -> Self {
        Self {
            domain: domain.into(),
            url_rules,
            declarative_rewrite: None,
        }
    }
}

/// How to extract and clean the main content of a matched page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRules {
    pub main_content: Vec<String>,
    pub main_content_cleanup: Vec<String>,
    pub delazify: bool,
    pub fix_embeds: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_script: Option<String>,
    pub preprocess: Vec<AttributeRewrite>,
}

/// A single DOM-attribute transformation applied before extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRewrite {
    pub selector: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<AttributePair>,
    pub element_name: String,
}

/// Source and target attribute names, either of which may be absent.
///
/// Encoded as a JSON array of up to two entries, each a string or `null`.
/// Trailing absent entries are omitted, so `(Some("a"), None)` encodes as
/// `["a"]` and `(None, None)` as `[]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributePair {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl AttributePair {
    pub fn new(from: Option<String>, to: Option<String>) -> Self {
        Self { from, to }
    }
}

impl Serialize for AttributePair {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = match (&self.from, &self.to) {
            (_, Some(_)) => 2,
            (Some(_), None) => 1,
            (None, None) => 0,
        };
        let mut seq = serializer.serialize_seq(Some(len))?;
        if len >= 1 {
            seq.serialize_element(&self.from)?;
        }
        if len == 2 {
            seq.serialize_element(&self.to)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for AttributePair {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PairVisitor;

        impl<'de> Visitor<'de> for PairVisitor {
            type Value = AttributePair;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an array of at most two attribute names")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let from = seq.next_element::<Option<String>>()?.flatten();
                let to = seq.next_element::<Option<String>>()?.flatten();
                if seq.next_element::<de::IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(3, &self));
                }
                Ok(AttributePair { from, to })
            }
        }

        deserializer.deserialize_seq(PairVisitor)
    }
}
