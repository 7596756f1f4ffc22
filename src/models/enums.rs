use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid {field} value: {value}")]
pub struct InvalidEnumValue {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnumValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(InvalidEnumValue {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(DocumentType {
    LetterOfCredit => "letter_of_credit",
    BillOfLading => "bill_of_lading",
    CommercialInvoice => "commercial_invoice",
    PackingList => "packing_list",
    CertificateOfOrigin => "certificate_of_origin",
    BillOfExchange => "bill_of_exchange",
    InsuranceCertificate => "insurance_certificate",
    BeneficiaryCertificate => "beneficiary_certificate",
    CertificateOfQuality => "certificate_of_quality",
    CertificateOfQuantity => "certificate_of_quantity",
    CertificateOfAnalysis => "certificate_of_analysis",
    InspectionCertificate => "inspection_certificate",
    UllageReport => "ullage_report",
    WeightOutturnReport => "weight_outturn_report",
    LetterOfIndemnity => "letter_of_indemnity",
    ExportLicense => "export_license",
    CertificateOfOwnership => "certificate_of_ownership",
    TankCleanlinessCertificate => "tank_cleanliness_certificate",
    CargoManifest => "cargo_manifest",
    MastersReceipt => "masters_receipt",
    CharterPartyAgreement => "charter_party_agreement",
    DraftSurveyReport => "draft_survey_report",
    SafetyDataSheet => "safety_data_sheet",
    VesselClassificationCertificate => "vessel_classification_certificate",
    Other => "other",
});

str_enum!(Verdict {
    Go => "go",
    Wait => "wait",
    NoGo => "no_go",
});

str_enum!(Severity {
    Minor => "minor",
    Major => "major",
    Critical => "critical",
});

str_enum!(PaymentMode {
    Lc => "lc",
    NoLc => "no_lc",
});

str_enum!(Channel {
    Web => "web",
    Api => "api",
    Email => "email",
    Whatsapp => "whatsapp",
});

impl Severity {
    /// Total ordering rank: critical > major > minor.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Minor => 0,
            Self::Major => 1,
            Self::Critical => 2,
        }
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}
