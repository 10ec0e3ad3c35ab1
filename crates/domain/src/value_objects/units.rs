//! Units and locale tags shared by the routing surface

use serde::{Deserialize, Serialize};
use std::fmt;

/// Distance unit requested for route narratives and summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    /// Kilometers (engine default)
    #[default]
    Km,
    /// Miles
    Mi,
}

/// Long-form unit name echoed back in responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValhallaLongUnits {
    /// Kilometers
    Kilometers,
    /// Miles
    Miles,
}

impl From<DistanceUnit> for ValhallaLongUnits {
    fn from(unit: DistanceUnit) -> Self {
        match unit {
            DistanceUnit::Km => Self::Kilometers,
            DistanceUnit::Mi => Self::Miles,
        }
    }
}

/// Narrative languages supported by the routing engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValhallaLanguage {
    #[serde(rename = "cs-CZ")]
    CsCz,
    #[serde(rename = "da-DK")]
    DaDk,
    #[serde(rename = "de-DE")]
    DeDe,
    #[serde(rename = "en-GB")]
    EnGb,
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "es-ES")]
    EsEs,
    #[serde(rename = "et-EE")]
    EtEe,
    #[serde(rename = "fi-FI")]
    FiFi,
    #[serde(rename = "fr-FR")]
    FrFr,
    #[serde(rename = "it-IT")]
    ItIt,
    #[serde(rename = "ja-JP")]
    JaJp,
    #[serde(rename = "ko-KR")]
    KoKr,
    #[serde(rename = "nl-NL")]
    NlNl,
    #[serde(rename = "pl-PL")]
    PlPl,
    #[serde(rename = "pt-PT")]
    PtPt,
    #[serde(rename = "ru-RU")]
    RuRu,
    #[serde(rename = "sv-SE")]
    SvSe,
    #[serde(rename = "uk-UA")]
    UkUa,
}

impl ValhallaLanguage {
    /// The BCP 47 tag sent on the wire
    #[must_use]
    pub const fn as_tag(&self) -> &'static str {
        match self {
            Self::CsCz => "cs-CZ",
            Self::DaDk => "da-DK",
            Self::DeDe => "de-DE",
            Self::EnGb => "en-GB",
            Self::EnUs => "en-US",
            Self::EsEs => "es-ES",
            Self::EtEe => "et-EE",
            Self::FiFi => "fi-FI",
            Self::FrFr => "fr-FR",
            Self::ItIt => "it-IT",
            Self::JaJp => "ja-JP",
            Self::KoKr => "ko-KR",
            Self::NlNl => "nl-NL",
            Self::PlPl => "pl-PL",
            Self::PtPt => "pt-PT",
            Self::RuRu => "ru-RU",
            Self::SvSe => "sv-SE",
            Self::UkUa => "uk-UA",
        }
    }
}

impl fmt::Display for ValhallaLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}
