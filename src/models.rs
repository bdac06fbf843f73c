use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A land-ownership record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LandParcel {
    pub id: String,
    pub owner: String,
    /// Free text such as "500 m²"; only the leading number is meaningful
    pub area: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_number: Option<String>,
    #[serde(default)]
    pub verified: bool,
}

impl LandParcel {
    pub fn new(
        id: impl Into<String>,
        owner: impl Into<String>,
        area: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        LandParcel {
            id: id.into(),
            owner: owner.into(),
            area: area.into(),
            location: location.into(),
            certificate_number: None,
            verified: false,
        }
    }

    pub fn with_certificate(mut self, number: impl Into<String>) -> Self {
        self.certificate_number = Some(number.into());
        self
    }

    pub fn verified(mut self) -> Self {
        self.verified = true;
        self
    }

    /// Area in square metres, if the text starts with a number
    pub fn area_m2(&self) -> Option<u64> {
        parse_area(&self.area)
    }
}

/// Extracts the leading integer of a free-text area ("1200 m²" -> 1200).
///
/// Thousands separators ("1.200" or "1,200") are accepted; anything after the
/// first non-numeric character is ignored.
pub fn parse_area(text: &str) -> Option<u64> {
    static LEADING_NUMBER: OnceLock<Regex> = OnceLock::new();
    let re = LEADING_NUMBER.get_or_init(|| {
        Regex::new(r"^\s*(\d{1,3}(?:[.,]\d{3})+|\d+)").expect("static regex")
    });

    let digits: String = re
        .captures(text)?
        .get(1)?
        .as_str()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Indonesian land certificate types
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CertificateKind {
    /// Sertifikat Hak Milik
    #[default]
    SHM,
    /// Sertifikat Hak Guna Bangunan
    SHGB,
    /// Sertifikat Hak Pakai
    SHP,
    /// Sertifikat Hak Usaha
    SHU,
}

impl CertificateKind {
    pub const ALL: [CertificateKind; 4] = [
        CertificateKind::SHM,
        CertificateKind::SHGB,
        CertificateKind::SHP,
        CertificateKind::SHU,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CertificateKind::SHM => "SHM",
            CertificateKind::SHGB => "SHGB",
            CertificateKind::SHP => "SHP",
            CertificateKind::SHU => "SHU",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CertificateKind::SHM => "Sertifikat Hak Milik (SHM)",
            CertificateKind::SHGB => "Sertifikat Hak Guna Bangunan (SHGB)",
            CertificateKind::SHP => "Sertifikat Hak Pakai (SHP)",
            CertificateKind::SHU => "Sertifikat Hak Usaha (SHU)",
        }
    }

    pub fn next(&self) -> CertificateKind {
        match self {
            CertificateKind::SHM => CertificateKind::SHGB,
            CertificateKind::SHGB => CertificateKind::SHP,
            CertificateKind::SHP => CertificateKind::SHU,
            CertificateKind::SHU => CertificateKind::SHM,
        }
    }

    pub fn prev(&self) -> CertificateKind {
        match self {
            CertificateKind::SHM => CertificateKind::SHU,
            CertificateKind::SHGB => CertificateKind::SHM,
            CertificateKind::SHP => CertificateKind::SHGB,
            CertificateKind::SHU => CertificateKind::SHP,
        }
    }

    pub fn from_label(label: &str) -> Option<CertificateKind> {
        Self::ALL.into_iter().find(|k| k.as_str() == label)
    }
}

/// Certificate details entered in the certificate form
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    pub number: String,
    pub issued_on: String,
    pub validity: String,
    pub kind: CertificateKind,
}

/// Ownership change entered in the transfer form
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OwnershipTransfer {
    pub new_owner: String,
    pub new_owner_address: String,
    pub transfer_date: String,
    pub reason: String,
}

/// Dashboard summary over the parcel list
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stats {
    pub total: usize,
    pub verified: usize,
    pub pending: usize,
    pub area_m2: u64,
    /// Parcels left out of `area_m2`: no leading number, or too large to add
    pub unparsed_area: usize,
}

impl Stats {
    pub fn from_parcels(parcels: &[LandParcel]) -> Self {
        let mut stats = Stats {
            total: parcels.len(),
            ..Stats::default()
        };
        for parcel in parcels {
            if parcel.verified {
                stats.verified += 1;
            } else {
                stats.pending += 1;
            }
            match parcel.area_m2().and_then(|area| stats.area_m2.checked_add(area)) {
                Some(total) => stats.area_m2 = total,
                None => stats.unparsed_area += 1,
            }
        }
        stats
    }
}

/// Completed contract call, newest first in the ledger
#[derive(Clone, Debug)]
pub struct ActivityEntry {
    pub parcel_id: Option<String>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Today's date as shown in date fields (YYYY-MM-DD)
pub fn today() -> String {
    let date: NaiveDate = chrono::Local::now().date_naive();
    date.format("%Y-%m-%d").to_string()
}

/// Shortens a wallet address for display: `addr_alg…cdef`
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 14 {
        return address.to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}

/// Parcels loaded on wallet connect
pub fn mock_parcels() -> Vec<LandParcel> {
    vec![
        LandParcel::new(
            "TNH-001",
            "Budi Santoso",
            "500 m²",
            "Jl. Merdeka No. 123, Jakarta Pusat",
        )
        .with_certificate("SHM-123456")
        .verified(),
        LandParcel::new(
            "TNH-002",
            "Siti Aminah",
            "750 m²",
            "Jl. Sudirman No. 456, Jakarta Selatan",
        ),
        LandParcel::new(
            "TNH-003",
            "Ahmad Wijaya",
            "1200 m²",
            "Jl. Gatot Subroto No. 789, Jakarta Barat",
        )
        .with_certificate("SHGB-789012")
        .verified(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_area_leading_number() {
        assert_eq!(parse_area("500 m²"), Some(500));
        assert_eq!(parse_area("  1200m2"), Some(1200));
        assert_eq!(parse_area("1.200 m²"), Some(1200));
        assert_eq!(parse_area("2,500 sq m"), Some(2500));
    }

    #[test]
    fn test_parse_area_rejects_non_numeric() {
        assert_eq!(parse_area("about 500 m²"), None);
        assert_eq!(parse_area(""), None);
        assert_eq!(parse_area("m² 500"), None);
    }

    #[test]
    fn test_stats_over_mock_parcels() {
        let stats = Stats::from_parcels(&mock_parcels());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.verified, 2);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.area_m2, 2450);
        assert_eq!(stats.unparsed_area, 0);
    }

    #[test]
    fn test_stats_skip_unparseable_area() {
        let parcels = vec![
            LandParcel::new("A", "x", "300 m²", "here"),
            LandParcel::new("B", "y", "half a hectare", "there"),
        ];
        let stats = Stats::from_parcels(&parcels);
        assert_eq!(stats.area_m2, 300);
        assert_eq!(stats.unparsed_area, 1);
    }

    #[test]
    fn test_stats_skip_area_that_overflows_total() {
        let mut parcels = mock_parcels();
        parcels.push(LandParcel::new("TNH-BIG", "x", "18446744073709551615 m²", "here"));
        let stats = Stats::from_parcels(&parcels);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.area_m2, 2450);
        assert_eq!(stats.unparsed_area, 1);
    }

    #[test]
    fn test_certificate_kind_cycle() {
        let mut kind = CertificateKind::default();
        for _ in 0..CertificateKind::ALL.len() {
            kind = kind.next();
        }
        assert_eq!(kind, CertificateKind::SHM);
        assert_eq!(CertificateKind::SHM.prev(), CertificateKind::SHU);
        assert_eq!(CertificateKind::from_label("SHGB"), Some(CertificateKind::SHGB));
    }

    #[test]
    fn test_short_address() {
        assert_eq!(
            short_address("addr_algorand_test_1234567890abcdef"),
            "addr_alg…cdef"
        );
        assert_eq!(short_address("addr_1"), "addr_1");
    }
}
