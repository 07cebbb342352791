//! Fixed keyword tables and weights used by the rule engine.
//!
//! Every table is a `const` slice so evaluation order (and therefore
//! indicator order) is stable across runs. Weights are tuning constants,
//! not input-dependent values.

/// Credential-harvesting and urgency phrases. Matched against the
/// lowercased title + content.
pub const PHISHING_PHRASES: &[(&str, f64)] = &[
    ("verify your account", 0.30),
    ("confirm your identity", 0.25),
    ("reset your password", 0.25),
    ("update your payment", 0.25),
    ("login to your account", 0.20),
    ("suspended", 0.25),
    ("unusual activity", 0.20),
    ("unauthorized access", 0.20),
    ("security alert", 0.15),
    ("click here", 0.15),
    ("action required", 0.15),
    ("within 24 hours", 0.15),
];

/// Promotional and scam trigger phrases. Matched against the lowercased
/// title + content.
pub const SPAM_PHRASES: &[(&str, f64)] = &[
    ("nigerian prince", 0.40),
    ("viagra", 0.40),
    ("you have won", 0.30),
    ("free money", 0.30),
    ("million dollar", 0.30),
    ("lottery", 0.30),
    ("wire transfer", 0.25),
    ("casino", 0.25),
    ("buy now", 0.20),
    ("act now", 0.20),
    ("limited time", 0.20),
    ("winner", 0.20),
    ("special offer", 0.15),
    ("congratulations", 0.15),
    ("unsubscribe", 0.10),
];

/// Brand names commonly impersonated in credential-phishing mail, paired
/// with the brand's legitimate sending domain.
pub const IMPERSONATED_BRANDS: &[(&str, &str)] = &[
    ("paypal", "paypal.com"),
    ("apple", "apple.com"),
    ("amazon", "amazon.com"),
    ("microsoft", "microsoft.com"),
    ("netflix", "netflix.com"),
    ("google", "google.com"),
    ("facebook", "facebook.com"),
    ("instagram", "instagram.com"),
    ("wells fargo", "wellsfargo.com"),
    ("bank of america", "bankofamerica.com"),
    ("dhl", "dhl.com"),
];

/// Consumer free-mail providers. Legitimate for personal mail, anomalous
/// as the origin of account/payment notices.
pub const FREEMAIL_DOMAINS: &[&str] = &[
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "aol.com",
    "mail.com",
    "gmx.com",
    "proton.me",
    "icloud.com",
    "yandex.com",
];

/// Transactional vocabulary that makes a free-mail sender suspicious.
pub const TRANSACTIONAL_TERMS: &[&str] = &["account", "payment", "invoice", "bank", "billing"];

/// Well-known URL-shortener hosts that hide the real link target.
pub const URL_SHORTENERS: &[&str] = &[
    "bit.ly",
    "tinyurl.com",
    "goo.gl",
    "t.co",
    "ow.ly",
    "is.gd",
    "buff.ly",
    "rb.gy",
    "cutt.ly",
    "shorturl.at",
];

// Rule weights for the non-lexicon heuristics.
pub const WEIGHT_BRAND_IMPERSONATION: f64 = 0.30;
pub const WEIGHT_EXCESSIVE_EXCLAMATION: f64 = 0.15;
pub const WEIGHT_UPPERCASE_TITLE: f64 = 0.20;
pub const WEIGHT_DOMAIN_MISMATCH: f64 = 0.15;
pub const WEIGHT_FREEMAIL_NOTICE: f64 = 0.15;
pub const WEIGHT_RANDOM_LOCAL_PART: f64 = 0.20;
pub const WEIGHT_IP_ADDRESS_URL: f64 = 0.35;
pub const WEIGHT_URL_SHORTENER: f64 = 0.25;
pub const WEIGHT_ANCHOR_MISMATCH: f64 = 0.30;
pub const WEIGHT_EXCESSIVE_LINKS: f64 = 0.15;

// Family weights applied when aggregating into the final confidence score.
pub const FAMILY_WEIGHT_PHISHING: f64 = 1.0;
pub const FAMILY_WEIGHT_SPAM: f64 = 0.9;
pub const FAMILY_WEIGHT_SENDER: f64 = 0.8;
pub const FAMILY_WEIGHT_LINK: f64 = 0.9;

// Classification thresholds. Family thresholds apply to the raw family
// score; the suspicious threshold applies to the aggregated confidence.
pub const PHISHING_THRESHOLD: f64 = 0.25;
pub const SPAM_THRESHOLD: f64 = 0.25;
pub const SUSPICIOUS_THRESHOLD: f64 = 0.15;

/// Links beyond this count trigger the excessive-link rule.
pub const MAX_REASONABLE_LINKS: usize = 5;
