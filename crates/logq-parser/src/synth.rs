//! SPL query synthesis from a final parse result.
//!
//! Output shape:
//! `index=<idx> [sourcetype=<st>] [(<action terms>)] [user="<u>"] [earliest=<e> latest=<l>]`
//!
//! Values that come from the query text are always double-quoted with `\`
//! and `"` escaped, so the output stays well-formed for any input.

use std::collections::BTreeMap;

use serde::Deserialize;

use logq_protocol::{ParseResult, SlotValue};

/// Index and sourcetype for one canonical source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogTarget {
    pub index: String,
    #[serde(default)]
    pub sourcetype: Option<String>,
}

/// Relative time bounds for one canonical window.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimeWindow {
    pub earliest: String,
    #[serde(default = "default_latest")]
    pub latest: String,
}

fn default_latest() -> String {
    "now".into()
}

/// Template tables consulted by the synthesizer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QueryTemplates {
    /// Index used when the source is wildcard or unknown.
    pub default_index: String,
    /// Field compared against the user slot.
    pub user_field: String,
    /// Canonical action → search phrases, OR-ed together.
    pub actions: BTreeMap<String, Vec<String>>,
    pub sources: BTreeMap<String, LogTarget>,
    pub windows: BTreeMap<String, TimeWindow>,
}

fn target(index: &str, sourcetype: &str) -> LogTarget {
    LogTarget {
        index: index.into(),
        sourcetype: Some(sourcetype.into()),
    }
}

fn window(earliest: &str) -> TimeWindow {
    TimeWindow {
        earliest: earliest.into(),
        latest: default_latest(),
    }
}

fn phrases(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl Default for QueryTemplates {
    fn default() -> Self {
        let actions = [
            ("failure", phrases(&["failed password", "authentication failure", "login failed", "failure"])),
            ("success", phrases(&["accepted password", "session opened", "login succeeded", "success"])),
            ("login", phrases(&["login", "logged in", "session opened"])),
            ("logout", phrases(&["logout", "logged out", "session closed"])),
            ("error", phrases(&["error", "fatal", "exception"])),
            ("access", phrases(&["access", "connection", "request"])),
            ("download", phrases(&["download"])),
            ("upload", phrases(&["upload"])),
            ("restart", phrases(&["restart", "reboot", "shutdown"])),
            ("deletion", phrases(&["delete", "deleted", "removed", "unlink"])),
            ("deny", phrases(&["deny", "denied", "blocked", "drop"])),
            ("allow", phrases(&["allow", "allowed", "permit", "accepted"])),
            ("creation", phrases(&["useradd", "user created", "new user", "created"])),
        ];
        let sources = [
            ("auth", target("security", "linux_secure")),
            ("web", target("web", "access_combined")),
            ("ssh", target("security", "sshd")),
            ("database", target("database", "mysqld")),
            ("filesystem", target("os", "auditd")),
            ("host", target("os", "syslog")),
            ("firewall", target("network", "cisco:asa")),
            ("windows", target("wineventlog", "WinEventLog:Security")),
        ];
        let windows = [
            ("last1h", window("-60m")),
            ("today", window("@d")),
            ("last24h", window("-24h")),
            ("last7d", window("-7d@d")),
            ("last30d", window("-30d@d")),
        ];
        Self {
            default_index: "*".into(),
            user_field: "user".into(),
            actions: actions.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            sources: sources.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            windows: windows.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        }
    }
}

/// Deterministic `ParseResult` → SPL translation.
#[derive(Debug, Clone)]
pub struct QuerySynthesizer {
    templates: QueryTemplates,
}

impl QuerySynthesizer {
    pub fn new(templates: QueryTemplates) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &QueryTemplates {
        &self.templates
    }

    /// Build the query string. Total: every result yields a query.
    pub fn to_query(&self, result: &ParseResult) -> String {
        let mut parts = Vec::with_capacity(6);

        match &result.source {
            SlotValue::Wildcard => parts.push(format!("index={}", term(&self.templates.default_index))),
            SlotValue::Value(source) => match self.templates.sources.get(source) {
                Some(t) => {
                    parts.push(format!("index={}", term(&t.index)));
                    if let Some(st) = &t.sourcetype {
                        parts.push(format!("sourcetype={}", term(st)));
                    }
                }
                None => {
                    parts.push(format!("index={}", term(&self.templates.default_index)));
                    parts.push(format!("sourcetype={}", quote(source)));
                }
            },
        }

        if let SlotValue::Value(action) = &result.action {
            match self.templates.actions.get(action) {
                Some(list) if !list.is_empty() => parts.push(or_clause(list)),
                Some(_) => {}
                None => parts.push(quote(action)),
            }
        }

        if let SlotValue::Value(user) = &result.user {
            parts.push(format!("{}={}", term(&self.templates.user_field), quote(user)));
        }

        if let SlotValue::Value(time) = &result.time {
            match self.templates.windows.get(time) {
                Some(w) => {
                    parts.push(format!("earliest={}", term(&w.earliest)));
                    parts.push(format!("latest={}", term(&w.latest)));
                }
                None => tracing::debug!(time = %time, "no window for time value, bounds omitted"),
            }
        }

        parts.join(" ")
    }
}

/// Double-quote a literal, escaping `\` and `"`. Control characters become
/// spaces.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Bare token when safe, quoted otherwise.
fn term(value: &str) -> String {
    let bare = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':' | '@' | '*' | '.'));
    if bare { value.to_string() } else { quote(value) }
}

fn or_clause(phrases: &[String]) -> String {
    let quoted: Vec<String> = phrases.iter().map(|p| quote(p)).collect();
    if quoted.len() == 1 {
        quoted.into_iter().collect()
    } else {
        format!("({})", quoted.join(" OR "))
    }
}

/// Balanced parentheses outside quotes, closed quotes, no dangling escape,
/// and a leading `index=` term.
pub fn is_well_formed(query: &str) -> bool {
    if !query.starts_with("index=") {
        return false;
    }
    let mut depth = 0usize;
    let mut in_quote = false;
    let mut escaped = false;
    for c in query.chars() {
        if in_quote {
            match (escaped, c) {
                (true, _) => escaped = false,
                (false, '\\') => escaped = true,
                (false, '"') => in_quote = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_quote = true,
            '(' => depth += 1,
            ')' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            c if c.is_control() => return false,
            _ => {}
        }
    }
    !in_quote && depth == 0
}
