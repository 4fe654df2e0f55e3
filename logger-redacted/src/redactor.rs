use base64::{engine::general_purpose, Engine as _};
use regex::{Captures, Regex};
use sha2::{Digest, Sha256};

const EMAIL_PATTERN: &str = r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b";
const PHONE_PATTERN: &str =
    r"(?:\+1[-.\s]?)?(?:\(\d{3}\)|\b\d{3})[-.\s]?\d{3}[-.\s]?\d{4}\b";
const SSN_PATTERN: &str = r"\b\d{3}-\d{2}-\d{4}\b";
const PATIENT_ID_PATTERN: &str = r"\b(?:PAT-?\d{3,}|MRN\d{4,})\b";

/// PII redaction configuration
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub redact_emails: bool,
    pub redact_phones: bool,
    pub redact_ssn: bool,
    pub redact_patient_ids: bool,
    /// Replace matches with a short hash so the same value can be correlated
    /// across log lines without being readable
    pub hash_for_correlation: bool,
    /// `(pattern, replacement)` pairs applied after the built-in rules
    pub custom_patterns: Vec<(String, String)>,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            redact_emails: true,
            redact_phones: true,
            redact_ssn: true,
            redact_patient_ids: true,
            hash_for_correlation: true,
            custom_patterns: Vec::new(),
        }
    }
}

impl RedactionConfig {
    /// Pass every line through untouched
    pub fn disabled() -> Self {
        Self {
            redact_emails: false,
            redact_phones: false,
            redact_ssn: false,
            redact_patient_ids: false,
            hash_for_correlation: false,
            custom_patterns: Vec::new(),
        }
    }

    pub fn with_custom_pattern(mut self, pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.custom_patterns.push((pattern.into(), replacement.into()));
        self
    }
}

/// PII redactor for log messages
#[derive(Debug)]
pub struct PiiRedactor {
    config: RedactionConfig,
    email: Regex,
    phone: Regex,
    ssn: Regex,
    patient_id: Regex,
    custom: Vec<(Regex, String)>,
}

impl PiiRedactor {
    /// # Errors
    ///
    /// Returns [`crate::LoggingError::InvalidPattern`] when a custom pattern
    /// is not a valid regular expression.
    pub fn new(config: RedactionConfig) -> crate::LoggingResult<Self> {
        let custom = config
            .custom_patterns
            .iter()
            .map(|(pattern, replacement)| Ok((Regex::new(pattern)?, replacement.clone())))
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self {
            email: Regex::new(EMAIL_PATTERN)?,
            phone: Regex::new(PHONE_PATTERN)?,
            ssn: Regex::new(SSN_PATTERN)?,
            patient_id: Regex::new(PATIENT_ID_PATTERN)?,
            custom,
            config,
        })
    }

    pub fn redact(&self, text: &str) -> String {
        let mut result = text.to_string();

        if self.config.redact_emails {
            result = self.redact_emails(&result);
        }

        // SSNs first so the phone rule does not claim them
        if self.config.redact_ssn {
            result = self.replace(&self.ssn, &result, "SSN", "***-**-****");
        }

        if self.config.redact_phones {
            result = self.replace(&self.phone, &result, "PHONE", "(***) ***-****");
        }

        if self.config.redact_patient_ids {
            result = self.replace(&self.patient_id, &result, "PATIENT", "PAT-****");
        }

        for (pattern, replacement) in &self.custom {
            result = pattern.replace_all(&result, replacement.as_str()).into_owned();
        }

        result
    }

    fn redact_emails(&self, text: &str) -> String {
        self.email
            .replace_all(text, |caps: &Captures| {
                let email = caps.get(0).map_or("", |m| m.as_str());
                if self.config.hash_for_correlation {
                    return format!("EMAIL[{}]", hash_value(email));
                }
                match email.split_once('@') {
                    Some((local, domain)) => {
                        format!("{}***@{}***", first_char(local), first_char(domain))
                    }
                    None => "***@***".to_string(),
                }
            })
            .into_owned()
    }

    fn replace(&self, pattern: &Regex, text: &str, label: &str, mask: &str) -> String {
        pattern
            .replace_all(text, |caps: &Captures| {
                let value = caps.get(0).map_or("", |m| m.as_str());
                if self.config.hash_for_correlation {
                    format!("{label}[{}]", hash_value(value))
                } else {
                    mask.to_string()
                }
            })
            .into_owned()
    }
}

/// Mask an identifier for structured log fields, keeping just enough of it
/// to tell records apart during an investigation.
pub fn mask_identifier(identifier: &str) -> String {
    let chars: Vec<char> = identifier.trim().chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let head: String = chars.iter().take(2).collect();
    let tail: String = chars.iter().skip(chars.len().saturating_sub(2)).collect();
    format!("{head}****{tail}")
}

fn first_char(value: &str) -> String {
    value.chars().next().map(String::from).unwrap_or_default()
}

fn hash_value(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    // First 8 bytes keep the marker short
    general_purpose::STANDARD_NO_PAD.encode(digest.get(..8).unwrap_or_default())
}
