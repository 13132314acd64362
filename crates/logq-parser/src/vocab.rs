//! Vocabulary and synonym tables: the read-only configuration shared by
//! the rule extractor, normalizer and clarifier.
//!
//! Rule tables are ordered: the first matching pattern wins. Reordering a
//! table changes the output for texts that match more than one pattern.

use std::collections::BTreeMap;

use serde::Deserialize;

use logq_protocol::SlotName;

/// A single `(pattern, value)` rule.
///
/// `value` may reference capture groups (`$1`, `${name}`) of `pattern`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RulePattern {
    pub pattern: String,
    pub value: String,
}

/// Ordered rules plus the enumerated choice list for one slot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SlotTable {
    /// Matched in order against lowercased text.
    #[serde(default)]
    pub rules: Vec<RulePattern>,
    /// Canonical values offered by the clarifier, in display order.
    #[serde(default)]
    pub choices: Vec<String>,
    /// Captured values that must not be accepted as a slot value.
    #[serde(default)]
    pub stopwords: Vec<String>,
}

impl SlotTable {
    pub fn is_canonical(&self, value: &str) -> bool {
        self.choices.iter().any(|c| c == value)
    }
}

/// Per-slot rule tables. Sections missing from a config file fall back to
/// the built-in tables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VocabularyTables {
    pub action: SlotTable,
    pub time: SlotTable,
    pub user: SlotTable,
    pub source: SlotTable,
}

impl VocabularyTables {
    pub fn table(&self, slot: SlotName) -> &SlotTable {
        match slot {
            SlotName::Action => &self.action,
            SlotName::Time => &self.time,
            SlotName::User => &self.user,
            SlotName::Source => &self.source,
        }
    }

    pub fn table_mut(&mut self, slot: SlotName) -> &mut SlotTable {
        match slot {
            SlotName::Action => &mut self.action,
            SlotName::Time => &mut self.time,
            SlotName::User => &mut self.user,
            SlotName::Source => &mut self.source,
        }
    }

    pub fn choices(&self, slot: SlotName) -> &[String] {
        &self.table(slot).choices
    }
}

fn rule(pattern: &str, value: &str) -> RulePattern {
    RulePattern {
        pattern: pattern.to_string(),
        value: value.to_string(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl Default for VocabularyTables {
    fn default() -> Self {
        Self {
            action: default_action_table(),
            time: default_time_table(),
            user: default_user_table(),
            source: default_source_table(),
        }
    }
}

// ── Action ────────────────────────────────────────────────────

// Outcome-qualified logins come before plain logins, and firewall
// verdicts before generic access words.
fn default_action_table() -> SlotTable {
    SlotTable {
        rules: vec![
            rule(
                r"\bfailed\s+(?:log-?ins?|logons?|passwords?|auth\w*)\b|\blog-?in\s+failures?\b|\bauth(?:entication)?\s+failures?\b|\bevent\s+4625\b|\bbrute[\s-]?force\b",
                "failure",
            ),
            rule(
                r"\bsuccessful(?:ly)?\s+(?:log-?ins?|logons?|auth\w*)\b|\bauth(?:entication)?\s+success(?:es)?\b|\baccepted\s+password\b|\bevent\s+4624\b",
                "success",
            ),
            rule(
                r"\b(?:deny|denies|denied|block|blocks|blocked|drop|drops|dropped|reject|rejects|rejected)\b",
                "deny",
            ),
            rule(
                r"\b(?:allow|allows|allowed|permit|permits|permitted|accept|accepts|accepted)\b",
                "allow",
            ),
            rule(
                r"\buser\s+creations?\b|\bcreated\s+(?:users?|accounts?)\b|\bnew\s+(?:users?|accounts?)\b|\bevent\s+4720\b",
                "creation",
            ),
            rule(
                r"\blog-?ins?\b|\blogons?\b|\blogged\s+in\b|\bsign(?:ed)?[\s-]?ins?\b|\bauth(?:entication)?\s+(?:events?|attempts?)\b|\bpassword\s+changes?\b",
                "login",
            ),
            rule(
                r"\blog-?outs?\b|\blogged\s+out\b|\blogoffs?\b|\bsign(?:ed)?[\s-]?(?:off|out)\b",
                "logout",
            ),
            rule(
                r"\b(?:errors?|crash(?:es|ed)?|problems?|failures?|fatal|exceptions?)\b|\bsecurity\s+alerts?\b",
                "error",
            ),
            rule(r"\bdownload(?:s|ed|ing)?\b", "download"),
            rule(r"\bupload(?:s|ed|ing)?\b", "upload"),
            rule(r"\brestart(?:s|ed|ing)?\b|\breboot(?:s|ed|ing)?\b", "restart"),
            rule(r"\bdelet(?:e|es|ed|ing|ion|ions)\b|\bremov(?:e|ed|al)\b", "deletion"),
            rule(
                r"\baccess(?:es|ed|ing)?\b|\bconnections?\b|\brequests?\b|\btraffic\b|\bsudo\b",
                "access",
            ),
        ],
        choices: strings(&[
            "failure", "success", "login", "logout", "error", "access", "download", "upload",
            "restart", "deletion", "deny", "allow", "creation",
        ]),
        stopwords: Vec::new(),
    }
}

// ── Time ──────────────────────────────────────────────────────

// Some rules emit phrasing tokens (`yesterday`, `thisweek`, `thismonth`)
// that the normalizer collapses onto the canonical windows.
fn default_time_table() -> SlotTable {
    SlotTable {
        rules: vec![
            rule(
                r"\bsince\s+yesterday\b|\b(?:last|past)\s+(?:day|24\s*(?:hours?|hrs?|h))\b",
                "last24h",
            ),
            rule(
                r"\b(?:last|past)\s+(?:hour|\d{1,2}\s+min(?:ute)?s?)\b",
                "last1h",
            ),
            rule(
                r"\btoday\b|\bsince\s+midnight\b|\bthis\s+(?:morning|afternoon)\b",
                "today",
            ),
            rule(
                r"\byesterday\b|\b(?:the\s+)?previous\s+day\b|\blast\s+night\b",
                "yesterday",
            ),
            rule(r"\bthis\s+week\b", "thisweek"),
            rule(r"\b(?:last|past)\s+(?:7\s+days|seven\s+days|week)\b", "last7d"),
            rule(r"\bthis\s+month\b", "thismonth"),
            rule(r"\b(?:last|past)\s+(?:30\s+days|thirty\s+days|month)\b", "last30d"),
        ],
        choices: strings(&["last1h", "today", "last24h", "last7d", "last30d"]),
        stopwords: Vec::new(),
    }
}

// ── User ──────────────────────────────────────────────────────

fn default_user_table() -> SlotTable {
    SlotTable {
        rules: vec![
            rule(r"\b(root|alice|bob|jsmith|admin|anonymous)\b", "$1"),
            rule(
                r"\b(?:username|user|account)(?:\s*[:=]\s*|\s+)([a-z0-9_][a-z0-9_.\-]*)",
                "$1",
            ),
        ],
        choices: strings(&["root", "alice", "bob", "jsmith", "admin", "anonymous"]),
        stopwords: strings(&[
            "a", "account", "accounts", "activity", "all", "an", "and", "any", "at", "by",
            "creation", "creations", "event", "events", "for", "from", "in", "is", "last",
            "log", "login", "logins", "logs", "name", "names", "of", "on", "or", "past",
            "session", "sessions", "the", "this", "to", "today", "was", "with", "yesterday",
        ]),
    }
}

// ── Source ────────────────────────────────────────────────────

// Specific sources first; `host` is the catch-all for generic machine words.
fn default_source_table() -> SlotTable {
    SlotTable {
        rules: vec![
            rule(
                r"\b(?:auth|authentication|security|secure)\s+logs?\b|\bauth\.log\b|\bauth\b",
                "auth",
            ),
            rule(r"\bsshd?\b|\bsecure\s+shell\b", "ssh"),
            rule(r"\bfirewalls?\b|\bfw\b|\bnetwork\s+security\b|\biptables\b", "firewall"),
            rule(
                r"\bwindows\b|\bevent\s+(?:logs?|viewer)\b|\bwineventlog\b|\bevent\s+4[67]\d\d\b",
                "windows",
            ),
            rule(
                r"\bweb\b|\bweb\s*servers?\b|\bnginx\b|\bapache\b|\bhttps?\b|\bhttpd\b",
                "web",
            ),
            rule(r"\bdatabases?\b|\bdb\b|\bmysql\b|\bpostgres(?:ql)?\b", "database"),
            rule(
                r"\bfile\s*systems?\b|\bfiles?\b|\bdisk\b|\bdirector(?:y|ies)\b",
                "filesystem",
            ),
            rule(r"\bhosts?\b|\bservers?\b|\bmachines?\b|\bsystem\b|\bsyslog\b", "host"),
        ],
        choices: strings(&[
            "auth", "web", "ssh", "database", "filesystem", "host", "firewall", "windows",
        ]),
        stopwords: Vec::new(),
    }
}

// ── Synonyms ──────────────────────────────────────────────────

/// Per-slot synonym → canonical value maps used by the normalizer.
///
/// Keys are matched case-insensitively after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SynonymTables {
    pub action: BTreeMap<String, String>,
    pub time: BTreeMap<String, String>,
    pub user: BTreeMap<String, String>,
    pub source: BTreeMap<String, String>,
}

impl SynonymTables {
    pub fn table(&self, slot: SlotName) -> &BTreeMap<String, String> {
        match slot {
            SlotName::Action => &self.action,
            SlotName::Time => &self.time,
            SlotName::User => &self.user,
            SlotName::Source => &self.source,
        }
    }
}

fn synonyms(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

impl Default for SynonymTables {
    fn default() -> Self {
        Self {
            action: synonyms(&[
                ("fail", "failure"),
                ("failed", "failure"),
                ("failures", "failure"),
                ("failed login", "failure"),
                ("errors", "error"),
                ("crash", "error"),
                ("logins", "login"),
                ("logon", "login"),
                ("signin", "login"),
                ("authentication", "login"),
                ("logoff", "logout"),
                ("signout", "logout"),
                ("denied", "deny"),
                ("blocked", "deny"),
                ("dropped", "deny"),
                ("allowed", "allow"),
                ("permitted", "allow"),
                ("delete", "deletion"),
                ("deleted", "deletion"),
                ("removed", "deletion"),
                ("created", "creation"),
                ("downloads", "download"),
                ("uploads", "upload"),
                ("reboot", "restart"),
                ("connection", "access"),
                ("request", "access"),
            ]),
            time: synonyms(&[
                ("yesterday", "last24h"),
                ("sinceyesterday", "last24h"),
                ("24h", "last24h"),
                ("last day", "last24h"),
                ("past day", "last24h"),
                ("last 24 hours", "last24h"),
                ("past 24 hours", "last24h"),
                ("since midnight", "today"),
                ("1h", "last1h"),
                ("60m", "last1h"),
                ("last hour", "last1h"),
                ("past hour", "last1h"),
                ("7d", "last7d"),
                ("thisweek", "last7d"),
                ("lastweek", "last7d"),
                ("this week", "last7d"),
                ("last week", "last7d"),
                ("past week", "last7d"),
                ("last 7 days", "last7d"),
                ("30d", "last30d"),
                ("thismonth", "last30d"),
                ("this month", "last30d"),
                ("last month", "last30d"),
                ("last 30 days", "last30d"),
            ]),
            user: synonyms(&[
                ("administrator", "admin"),
                ("anon", "anonymous"),
                ("superuser", "root"),
            ]),
            source: synonyms(&[
                ("authentication", "auth"),
                ("security", "auth"),
                ("secure", "auth"),
                ("login", "auth"),
                ("nginx", "web"),
                ("apache", "web"),
                ("http", "web"),
                ("webserver", "web"),
                ("sshd", "ssh"),
                ("db", "database"),
                ("mysql", "database"),
                ("postgres", "database"),
                ("disk", "filesystem"),
                ("fs", "filesystem"),
                ("server", "host"),
                ("system", "host"),
                ("syslog", "host"),
                ("fw", "firewall"),
                ("eventlog", "windows"),
                ("wineventlog", "windows"),
            ]),
        }
    }
}
