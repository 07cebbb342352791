//! Heuristic email risk classification.
//!
//! [`EmailAnalyzer`] is a pure rule engine: it inspects a title/content/sender
//! triple and produces a category, a confidence score, a severity level and
//! the list of triggered indicators. It holds no state, performs no I/O and
//! is deterministic, so the batch endpoint can re-run it freely and tests can
//! assert byte-identical output.
//!
//! Four indicator families are evaluated in a fixed order (phishing, spam,
//! sender anomalies, links). Each triggered rule fires at most once and adds
//! a fixed weight to its family score, which keeps the aggregated confidence
//! monotone in the set of triggered rules.

pub mod lexicon;

use std::sync::OnceLock;

use regex::Regex;
use rocket_okapi::okapi::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};

use self::lexicon::*;

/// Final classification label assigned to an email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Safe,
    Suspicious,
    Spam,
    Phishing,
    /// Pre-classification state of stored records. Never produced by
    /// [`EmailAnalyzer::analyze`]; the batch endpoint consumes it.
    Unknown,
}

impl Category {
    /// All categories in id order, for stats breakdowns.
    pub const ALL: [Category; 5] = [
        Category::Safe,
        Category::Suspicious,
        Category::Spam,
        Category::Phishing,
        Category::Unknown,
    ];

    /// Stable numeric code. This mapping is the single source of truth;
    /// nothing else in the crate recomputes ids from names.
    pub fn id(self) -> i32 {
        match self {
            Category::Safe => 0,
            Category::Suspicious => 1,
            Category::Spam => 2,
            Category::Phishing => 3,
            Category::Unknown => 4,
        }
    }

    /// Lowercase name as stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Safe => "safe",
            Category::Suspicious => "suspicious",
            Category::Spam => "spam",
            Category::Phishing => "phishing",
            Category::Unknown => "unknown",
        }
    }

    /// Parse a stored or user-supplied category name.
    pub fn from_name(name: &str) -> Option<Category> {
        match name {
            "safe" => Some(Category::Safe),
            "suspicious" => Some(Category::Suspicious),
            "spam" => Some(Category::Spam),
            "phishing" => Some(Category::Phishing),
            "unknown" => Some(Category::Unknown),
            _ => None,
        }
    }
}

/// Severity tier derived from the confidence score via fixed bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    /// Band the score into a severity tier. The bands are total over [0, 1]
    /// and monotonic: a higher score never maps to a lower tier.
    pub fn from_score(score: f64) -> Level {
        if score < 0.3 {
            Level::Low
        } else if score < 0.6 {
            Level::Medium
        } else {
            Level::High
        }
    }

    /// Lowercase name as stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
        }
    }
}

/// Immutable verdict for one analyzed email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisResult {
    /// Final classification.
    pub category: Category,
    /// Numeric code for [`Self::category`] (always `category.id()`).
    pub category_id: i32,
    /// Aggregate risk signal strength in [0, 1].
    pub confidence_score: f64,
    /// Severity tier derived from the confidence score.
    pub level: Level,
    /// Human-readable descriptions of every triggered rule, in family
    /// evaluation order. Empty exactly when the verdict is `safe`.
    pub suspicious_indicators: Vec<String>,
}

static URL_REGEX: OnceLock<Regex> = OnceLock::new();
static ANCHOR_REGEX: OnceLock<Regex> = OnceLock::new();
static DOMAIN_REGEX: OnceLock<Regex> = OnceLock::new();

fn url_regex() -> &'static Regex {
    URL_REGEX.get_or_init(|| {
        Regex::new(r#"https?://[^\s<>"']+"#).expect("invalid URL regex")
    })
}

fn anchor_regex() -> &'static Regex {
    ANCHOR_REGEX.get_or_init(|| {
        Regex::new(r#"(?is)<a\s[^>]*href\s*=\s*["']([^"']+)["'][^>]*>(.*?)</a>"#)
            .expect("invalid anchor regex")
    })
}

fn domain_regex() -> &'static Regex {
    DOMAIN_REGEX.get_or_init(|| {
        Regex::new(r"\b[a-z0-9][a-z0-9-]*(?:\.[a-z0-9][a-z0-9-]*)*\.[a-z]{2,}\b")
            .expect("invalid domain regex")
    })
}

/// Stateless rule-based scoring engine.
///
/// Construct one wherever a verdict is needed; there is intentionally no
/// shared instance because the analyzer carries no configuration or state.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailAnalyzer;

impl EmailAnalyzer {
    pub fn new() -> Self {
        EmailAnalyzer
    }

    /// Classify one email. Total over any string input: empty fields simply
    /// contribute no signal, and no input can make this return an error.
    pub fn analyze(&self, title: &str, content: &str, sender: &str) -> AnalysisResult {
        let title_norm = title.to_lowercase();
        let content_norm = content.to_lowercase();
        let text = format!("{title_norm}\n{content_norm}");
        let sender_domain = sender_domain(sender);

        let mut indicators = Vec::new();
        let phishing = scan_phishing(&text, sender_domain.as_deref(), &mut indicators);
        let spam = scan_spam(&text, title, &mut indicators);
        let sender_score = scan_sender(sender, sender_domain.as_deref(), &text, &mut indicators);
        let link = scan_links(&content_norm, &mut indicators);

        let confidence_score = (phishing * FAMILY_WEIGHT_PHISHING
            + spam * FAMILY_WEIGHT_SPAM
            + sender_score * FAMILY_WEIGHT_SENDER
            + link * FAMILY_WEIGHT_LINK)
            .clamp(0.0, 1.0);

        // Highest-severity family wins; direct analysis never yields
        // `unknown`, the floor is `safe`.
        let category = if phishing >= PHISHING_THRESHOLD {
            Category::Phishing
        } else if spam >= SPAM_THRESHOLD {
            Category::Spam
        } else if confidence_score >= SUSPICIOUS_THRESHOLD {
            Category::Suspicious
        } else {
            Category::Safe
        };

        // A safe verdict carries no indicators: sub-threshold matches are
        // dropped rather than reported.
        if category == Category::Safe {
            indicators.clear();
        }

        AnalysisResult {
            category,
            category_id: category.id(),
            confidence_score,
            level: Level::from_score(confidence_score),
            suspicious_indicators: indicators,
        }
    }
}

/// Lowercased domain part of the sender address, if it has one.
fn sender_domain(sender: &str) -> Option<String> {
    let trimmed = sender.trim().to_lowercase();
    let (_, domain) = trimmed.rsplit_once('@')?;
    if domain.is_empty() {
        return None;
    }
    Some(domain.trim_matches(|c: char| c == '>' || c == '<').to_string())
}

fn scan_phishing(text: &str, sender_domain: Option<&str>, indicators: &mut Vec<String>) -> f64 {
    let mut score = 0.0;

    for &(phrase, weight) in PHISHING_PHRASES {
        if text.contains(phrase) {
            score += weight;
            indicators.push(format!("Phishing phrase detected: '{phrase}'"));
        }
    }

    // Impersonation: the message talks about a brand but the sender domain
    // is not the brand's. Needs a sender domain to compare against.
    if let Some(domain) = sender_domain {
        for &(brand, official) in IMPERSONATED_BRANDS {
            if text.contains(brand) && domain != official && !domain.ends_with(&format!(".{official}"))
            {
                score += WEIGHT_BRAND_IMPERSONATION;
                indicators.push(format!(
                    "Mentions {brand} but was sent from '{domain}' instead of {official}"
                ));
                break;
            }
        }
    }

    score
}

fn scan_spam(text: &str, title: &str, indicators: &mut Vec<String>) -> f64 {
    let mut score = 0.0;

    for &(phrase, weight) in SPAM_PHRASES {
        if text.contains(phrase) {
            score += weight;
            indicators.push(format!("Spam phrase detected: '{phrase}'"));
        }
    }

    if title.matches('!').count() >= 3 {
        score += WEIGHT_EXCESSIVE_EXCLAMATION;
        indicators.push("Excessive exclamation marks in title".to_string());
    }

    let letters: Vec<char> = title.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() >= 12 {
        let uppercase = letters.iter().filter(|c| c.is_uppercase()).count();
        if uppercase as f64 / letters.len() as f64 > 0.6 {
            score += WEIGHT_UPPERCASE_TITLE;
            indicators.push("Title is mostly uppercase".to_string());
        }
    }

    score
}

fn scan_sender(
    sender: &str,
    sender_domain: Option<&str>,
    text: &str,
    indicators: &mut Vec<String>,
) -> f64 {
    let Some(domain) = sender_domain else {
        return 0.0;
    };
    let mut score = 0.0;

    // Sender claims no relationship to any domain the message itself names.
    let mentioned: Vec<&str> = domain_regex()
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|d| !d.ends_with(&format!(".{domain}")))
        .collect();
    if !mentioned.is_empty() && !mentioned.iter().any(|d| *d == domain) {
        score += WEIGHT_DOMAIN_MISMATCH;
        indicators.push(format!(
            "Sender domain '{domain}' does not match any domain mentioned in the message"
        ));
    }

    if FREEMAIL_DOMAINS.contains(&domain)
        && TRANSACTIONAL_TERMS.iter().any(|term| text.contains(term))
    {
        score += WEIGHT_FREEMAIL_NOTICE;
        indicators.push(format!(
            "Free-mail sender '{domain}' used for an account or payment notice"
        ));
    }

    let local = sender
        .trim()
        .to_lowercase()
        .rsplit_once('@')
        .map(|(local, _)| local.to_string())
        .unwrap_or_default();
    if looks_machine_generated(&local) {
        score += WEIGHT_RANDOM_LOCAL_PART;
        indicators.push(format!("Sender address local part '{local}' looks machine-generated"));
    }

    score
}

/// Long alphanumeric local parts dominated by digits are typical of
/// throwaway sending accounts.
fn looks_machine_generated(local: &str) -> bool {
    let alnum: Vec<char> = local.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    if alnum.len() < 10 {
        return false;
    }
    let digits = alnum.iter().filter(|c| c.is_ascii_digit()).count();
    digits as f64 / alnum.len() as f64 >= 0.4
}

fn scan_links(content_norm: &str, indicators: &mut Vec<String>) -> f64 {
    let mut score = 0.0;

    let urls: Vec<&str> = url_regex()
        .find_iter(content_norm)
        .map(|m| m.as_str())
        .collect();
    let hosts: Vec<&str> = urls.iter().map(|url| host_of(url)).collect();

    if let Some(host) = hosts.iter().find(|h| is_ip_host(h)) {
        score += WEIGHT_IP_ADDRESS_URL;
        indicators.push(format!("Link points at a raw IP address ({host})"));
    }

    if let Some(host) = hosts
        .iter()
        .find(|h| URL_SHORTENERS.contains(&h.trim_start_matches("www.")))
    {
        score += WEIGHT_URL_SHORTENER;
        indicators.push(format!("Link uses URL shortener '{host}'"));
    }

    // HTML anchors whose visible text is itself a link to somewhere else.
    for captures in anchor_regex().captures_iter(content_norm) {
        let href_host = host_of(&captures[1]);
        let display = captures[2].trim();
        let display_host = url_regex()
            .find(display)
            .map(|m| host_of(m.as_str()))
            .or_else(|| domain_regex().find(display).map(|m| m.as_str()));
        if let Some(display_host) = display_host {
            if !href_host.is_empty() && display_host != href_host {
                score += WEIGHT_ANCHOR_MISMATCH;
                indicators.push(format!(
                    "Link text shows '{display_host}' but points at '{href_host}'"
                ));
                break;
            }
        }
    }

    if urls.len() > MAX_REASONABLE_LINKS {
        score += WEIGHT_EXCESSIVE_LINKS;
        indicators.push(format!("Message contains {} links", urls.len()));
    }

    score
}

/// Host portion of a URL, without scheme, port, path or credentials.
fn host_of(url: &str) -> &str {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let rest = rest.rsplit_once('@').map(|(_, host)| host).unwrap_or(rest);
    rest.split(['/', ':', '?', '#']).next().unwrap_or(rest)
}

fn is_ip_host(host: &str) -> bool {
    let octets: Vec<&str> = host.split('.').collect();
    octets.len() == 4 && octets.iter().all(|o| !o.is_empty() && o.chars().all(|c| c.is_ascii_digit()))
}
