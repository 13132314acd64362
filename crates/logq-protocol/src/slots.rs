use serde::{Deserialize, Serialize};

/// Sentinel meaning "unspecified, match anything".
pub const WILDCARD: &str = "*";

/// One of the four fixed fields extracted from a query.
///
/// Declaration order is the canonical visiting order used by the
/// clarifier and by every table keyed on slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotName {
    Action,
    Time,
    User,
    Source,
}

impl SlotName {
    pub const ALL: [SlotName; 4] = [Self::Action, Self::Time, Self::User, Self::Source];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Action => "action",
            Self::Time => "time",
            Self::User => "user",
            Self::Source => "source",
        }
    }
}

impl std::fmt::Display for SlotName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SlotName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "action" => Ok(Self::Action),
            "time" => Ok(Self::Time),
            "user" => Ok(Self::User),
            "source" => Ok(Self::Source),
            other => Err(format!("unknown slot: {other}")),
        }
    }
}

// ── Slot Value ────────────────────────────────────────────────

/// Value of a single slot. Absence is always `Wildcard`, never omission.
///
/// Serialized as a plain string; `"*"` round-trips to `Wildcard`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SlotValue {
    #[default]
    Wildcard,
    Value(String),
}

impl SlotValue {
    /// Build a value, mapping blank text and `"*"` onto the wildcard.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == WILDCARD {
            Self::Wildcard
        } else if trimmed.len() == raw.len() {
            Self::Value(raw)
        } else {
            Self::Value(trimmed.to_string())
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Wildcard => WILDCARD,
            Self::Value(v) => v,
        }
    }

    /// The concrete value, or `None` for the wildcard.
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Wildcard => None,
            Self::Value(v) => Some(v),
        }
    }
}

impl From<String> for SlotValue {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SlotValue {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<SlotValue> for String {
    fn from(v: SlotValue) -> Self {
        match v {
            SlotValue::Wildcard => WILDCARD.to_string(),
            SlotValue::Value(s) => s,
        }
    }
}

impl std::fmt::Display for SlotValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Slot Result ───────────────────────────────────────────────

/// A single extractor's reading for one slot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SlotResult {
    pub value: SlotValue,
    /// Present for statistical readings, absent for rule readings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl SlotResult {
    pub fn rule(value: impl Into<SlotValue>) -> Self {
        Self {
            value: value.into(),
            confidence: None,
        }
    }

    pub fn scored(value: impl Into<SlotValue>, confidence: f64) -> Self {
        Self {
            value: value.into(),
            confidence: Some(confidence.clamp(0.0, 1.0)),
        }
    }

    pub fn unresolved() -> Self {
        Self::scored(SlotValue::Wildcard, 0.0)
    }
}

// ── Slot Map ──────────────────────────────────────────────────

/// A fixed four-field record keyed by [`SlotName`].
///
/// Every slot is always present; there is no partial map.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlotMap<T> {
    pub action: T,
    pub time: T,
    pub user: T,
    pub source: T,
}

impl<T> SlotMap<T> {
    pub fn from_fn(mut f: impl FnMut(SlotName) -> T) -> Self {
        Self {
            action: f(SlotName::Action),
            time: f(SlotName::Time),
            user: f(SlotName::User),
            source: f(SlotName::Source),
        }
    }

    pub fn get(&self, slot: SlotName) -> &T {
        match slot {
            SlotName::Action => &self.action,
            SlotName::Time => &self.time,
            SlotName::User => &self.user,
            SlotName::Source => &self.source,
        }
    }

    pub fn get_mut(&mut self, slot: SlotName) -> &mut T {
        match slot {
            SlotName::Action => &mut self.action,
            SlotName::Time => &mut self.time,
            SlotName::User => &mut self.user,
            SlotName::Source => &mut self.source,
        }
    }

    pub fn set(&mut self, slot: SlotName, value: T) {
        *self.get_mut(slot) = value;
    }

    /// Iterate in canonical slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotName, &T)> {
        SlotName::ALL.into_iter().map(move |s| (s, self.get(s)))
    }

    pub fn map<U>(&self, mut f: impl FnMut(SlotName, &T) -> U) -> SlotMap<U> {
        SlotMap::from_fn(|s| f(s, self.get(s)))
    }
}

/// Final slot dictionary handed to the query synthesizer.
pub type ParseResult = SlotMap<SlotValue>;

/// Per-slot readings from one extractor.
pub type SlotReadings = SlotMap<SlotResult>;

impl ParseResult {
    pub fn wildcard() -> Self {
        Self::default()
    }

    pub fn wildcard_slots(&self) -> Vec<SlotName> {
        self.iter()
            .filter(|(_, v)| v.is_wildcard())
            .map(|(s, _)| s)
            .collect()
    }

    pub fn is_fully_resolved(&self) -> bool {
        self.iter().all(|(_, v)| !v.is_wildcard())
    }
}

impl SlotReadings {
    /// Discard confidences, keeping only the values.
    pub fn values(&self) -> ParseResult {
        self.map(|_, r| r.value.clone())
    }
}

/// Which extractor was authoritative for a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Authority {
    #[default]
    Rule,
    Statistical,
    Clarified,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_order_is_canonical() {
        let names: Vec<_> = SlotName::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(names, ["action", "time", "user", "source"]);
        assert!(SlotName::Action < SlotName::Source);
    }

    #[test]
    fn slot_name_from_str() {
        assert_eq!("Source".parse::<SlotName>().unwrap(), SlotName::Source);
        assert!("hostname".parse::<SlotName>().is_err());
    }

    #[test]
    fn blank_and_star_are_wildcard() {
        assert_eq!(SlotValue::new(""), SlotValue::Wildcard);
        assert_eq!(SlotValue::new("  "), SlotValue::Wildcard);
        assert_eq!(SlotValue::new("*"), SlotValue::Wildcard);
        assert_eq!(SlotValue::new(" alice "), SlotValue::Value("alice".into()));
    }

    #[test]
    fn slot_value_serializes_as_string() {
        let json = serde_json::to_string(&SlotValue::Wildcard).unwrap();
        assert_eq!(json, r#""*""#);
        let v: SlotValue = serde_json::from_str(r#""auth""#).unwrap();
        assert_eq!(v.value(), Some("auth"));
    }

    #[test]
    fn parse_result_serializes_all_four_keys() {
        let mut result = ParseResult::wildcard();
        result.set(SlotName::User, "alice".into());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["action"], "*");
        assert_eq!(json["time"], "*");
        assert_eq!(json["user"], "alice");
        assert_eq!(json["source"], "*");
    }

    #[test]
    fn wildcard_slots_in_order() {
        let mut result = ParseResult::wildcard();
        result.set(SlotName::Time, "last24h".into());
        assert_eq!(
            result.wildcard_slots(),
            vec![SlotName::Action, SlotName::User, SlotName::Source]
        );
        assert!(!result.is_fully_resolved());
    }

    #[test]
    fn scored_confidence_is_clamped() {
        assert_eq!(SlotResult::scored("x", 1.7).confidence, Some(1.0));
        assert_eq!(SlotResult::scored("x", -0.2).confidence, Some(0.0));
        assert!(SlotResult::rule("x").confidence.is_none());
    }

    #[test]
    fn rule_result_omits_confidence_field() {
        let json = serde_json::to_string(&SlotResult::rule("auth")).unwrap();
        assert!(!json.contains("confidence"));
    }
}
