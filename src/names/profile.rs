// OneHand Name Profiles
// Copyright (c) 2026 Xing_The_Creator | OneHand

use serde::{Deserialize, Serialize};

/// Full analysis as produced by the LLM (and stored in the cache).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameProfile {
    pub name: Option<String>,
    pub meaning: Option<String>,
    pub origin: Option<String>,
    pub etymology: Option<String>,
    pub gender: Option<String>,
    pub famous_bearers: Vec<String>,
    pub variations: Vec<String>,
    pub description: Option<String>,
}

/// Statistical guesses stitched together from the public name APIs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NameEstimate {
    pub name: String,
    pub age_prediction: Option<u32>,
    pub origin: Option<String>,
    pub gender: Option<String>,
    pub gender_probability: Option<f64>,
}

/// Where an analysis came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisSource {
    Cache,
    Llm,
    PublicApis,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NameDetails {
    Profile(NameProfile),
    Estimate(NameEstimate),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NameAnalysis {
    pub source: AnalysisSource,
    pub details: NameDetails,
}

impl NameAnalysis {
    pub fn formatted_description(&self) -> String {
        match &self.details {
            NameDetails::Profile(profile) => describe_profile(profile),
            NameDetails::Estimate(estimate) => describe_estimate(estimate),
        }
    }
}

/// Trim and title-case every word: `"  mARIA clara "` -> `"Maria Clara"`.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Capitalize the first letter of every run of letters and lowercase the rest,
/// so `jean-luc` becomes `Jean-Luc` and `o'brien` becomes `O'Brien`.
pub fn title_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut in_word = false;
    for ch in word.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

/// Percentages print like a float: `98.0`, `87.65`.
pub fn format_percent(value: f64) -> String {
    format!("{:?}", value)
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn describe_profile(info: &NameProfile) -> String {
    let name = present(&info.name).unwrap_or("N/A");
    let mut parts = vec![format!("🔍 NAME ANALYSIS: {}", name)];

    if let Some(meaning) = present(&info.meaning) {
        parts.push(format!("\n📋 MEANING: {}", meaning));
    }
    if let Some(origin) = present(&info.origin) {
        parts.push(format!("🌍 ORIGIN: {}", origin));
    }
    if let Some(etymology) = present(&info.etymology) {
        parts.push(format!("📜 ETYMOLOGY: {}", etymology));
    }
    if let Some(gender) = present(&info.gender) {
        parts.push(format!("⚥ GENDER: {}", normalize_name(gender)));
    }
    if !info.variations.is_empty() {
        parts.push(format!("🎨 VARIATIONS: {}", info.variations.join(", ")));
    }
    if !info.famous_bearers.is_empty() {
        parts.push(format!("🏆 FAMOUS BEARERS: {}", info.famous_bearers.join(", ")));
    }
    if let Some(description) = present(&info.description) {
        parts.push(format!("\n📝 DESCRIPTION:\n{}", description));
    }

    parts.join("\n")
}

pub fn describe_estimate(info: &NameEstimate) -> String {
    let name = if info.name.is_empty() { "N/A" } else { info.name.as_str() };
    let mut parts = vec![format!("🔍 NAME ANALYSIS: {}", name)];

    if let Some(origin) = present(&info.origin) {
        parts.push(format!("🌍 ORIGIN: {}", origin));
    }
    if let Some(gender) = present(&info.gender) {
        let probability = info.gender_probability.unwrap_or(0.0);
        parts.push(format!(
            "⚥ GENDER PREDICTION: Most likely {} (probability: {}%)",
            gender,
            format_percent(probability)
        ));
    }
    if let Some(age) = info.age_prediction {
        parts.push(format!(
            "📅 AGE CONNECTION: Commonly associated with people around age {}",
            age
        ));
    }

    if parts.len() <= 1 {
        return format!("❌ No detailed information found for the name {}. ", name);
    }

    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  kenneth "), "Kenneth");
        assert_eq!(normalize_name("mARIA   clara"), "Maria Clara");
        assert_eq!(normalize_name("   "), "");
        assert_eq!(normalize_name("jean-luc"), "Jean-Luc");
        assert_eq!(normalize_name("o'BRIEN"), "O'Brien");
        assert_eq!(normalize_name("ma. teresa"), "Ma. Teresa");
    }

    #[test]
    fn test_format_percent_keeps_decimal() {
        assert_eq!(format_percent(98.0), "98.0");
        assert_eq!(format_percent(87.65), "87.65");
    }

    #[test]
    fn test_describe_profile_skips_missing_fields() {
        let profile = NameProfile {
            name: Some("Jose".to_string()),
            meaning: Some("God will increase".to_string()),
            gender: Some("male".to_string()),
            variations: vec!["Joseph".to_string(), "Pepe".to_string()],
            ..Default::default()
        };

        let text = describe_profile(&profile);
        assert_eq!(
            text,
            "🔍 NAME ANALYSIS: Jose\n\n📋 MEANING: God will increase\n⚥ GENDER: Male\n🎨 VARIATIONS: Joseph, Pepe"
        );
        assert!(!text.contains("ETYMOLOGY"));
        assert!(!text.contains("FAMOUS"));
    }

    #[test]
    fn test_describe_profile_without_name() {
        let text = describe_profile(&NameProfile::default());
        assert_eq!(text, "🔍 NAME ANALYSIS: N/A");
    }

    #[test]
    fn test_describe_estimate() {
        let estimate = NameEstimate {
            name: "Andres".to_string(),
            age_prediction: Some(41),
            origin: Some("Philippines (confidence: 12.5%)".to_string()),
            gender: Some("Male".to_string()),
            gender_probability: Some(99.0),
        };

        let text = describe_estimate(&estimate);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "🔍 NAME ANALYSIS: Andres");
        assert_eq!(lines[1], "🌍 ORIGIN: Philippines (confidence: 12.5%)");
        assert_eq!(lines[2], "⚥ GENDER PREDICTION: Most likely Male (probability: 99.0%)");
        assert!(lines[3].ends_with("around age 41"));
    }

    #[test]
    fn test_describe_empty_estimate() {
        let estimate = NameEstimate {
            name: "Xyzzy".to_string(),
            ..Default::default()
        };
        assert_eq!(
            describe_estimate(&estimate),
            "❌ No detailed information found for the name Xyzzy. "
        );
    }

    #[test]
    fn test_profile_deserializes_partial_json() {
        let profile: NameProfile =
            serde_json::from_str(r#"{"name": "Rizal", "famous_bearers": ["José Rizal"]}"#).unwrap();
        assert_eq!(profile.name.as_deref(), Some("Rizal"));
        assert_eq!(profile.famous_bearers, vec!["José Rizal".to_string()]);
        assert!(profile.variations.is_empty());
    }
}
